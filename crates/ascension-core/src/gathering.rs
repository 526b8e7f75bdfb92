//! Gathering manager trait.
//!
//! Gatherings are multi-agent events such as auctions and tournaments that
//! run on their own schedule rather than from individual plans. The
//! manager lives in the [`World`] and is consulted once per month.

use ascension_types::Event;

use crate::world::World;

/// Errors raised by a gathering manager.
#[derive(Debug, thiserror::Error)]
pub enum GatheringError {
    /// The call did not finish within the deadline.
    #[error("gathering manager timed out (deadline: {deadline_ms}ms)")]
    Timeout {
        /// The deadline in milliseconds.
        deadline_ms: u64,
    },

    /// The manager failed.
    #[error("gathering manager error: {message}")]
    Internal {
        /// Description of the error.
        message: String,
    },
}

/// Schedules and resolves gatherings.
#[async_trait::async_trait]
pub trait GatheringManager: Send + Sync {
    /// Run every gathering that is due this month and return its events.
    ///
    /// While this runs the manager has been taken out of
    /// [`World::gathering_manager`], so `world` does not contain it.
    ///
    /// # Errors
    ///
    /// Returns [`GatheringError`] if a due gathering cannot be resolved.
    async fn check_and_run_all(&mut self, world: &mut World) -> Result<Vec<Event>, GatheringError>;
}
