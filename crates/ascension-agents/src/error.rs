//! Error types for the ascension-agents crate.
//!
//! All operations that can fail return typed errors rather than panicking.

use ascension_types::AgentId;

/// Errors that can occur during agent operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    /// Agent with the given ID was not found in the registry.
    #[error("agent not found: {0}")]
    AgentNotFound(AgentId),

    /// An agent with the same ID is already registered.
    #[error("duplicate agent id: {0}")]
    DuplicateAgent(AgentId),

    /// A relation was requested between an agent and itself.
    #[error("agent {0} cannot relate to itself")]
    SelfRelation(AgentId),

    /// The awakening age range is empty.
    #[error("invalid awakening age range {min}..={max}")]
    InvalidAgeRange {
        /// Lower bound in years.
        min: u32,
        /// Upper bound in years.
        max: u32,
    },

    /// The map used for placement has no tiles.
    #[error("cannot place an agent on an empty map")]
    EmptyMap,
}
