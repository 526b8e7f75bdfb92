//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode during startup and the run so
//! that `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ascension_core::config::ConfigError,
    },

    /// Starting map construction failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: ascension_world::WorldError,
    },

    /// Seed agent creation or registration failed.
    #[error("agent error: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: ascension_agents::AgentError,
    },

    /// The simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: ascension_core::runner::RunnerError,
    },
}
