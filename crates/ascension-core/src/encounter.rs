//! Encounter service trait.
//!
//! Each month every living agent gets one fortune check and one misfortune
//! check. The checks run concurrently and only read the agent; any
//! resulting [`Encounter`] is applied by the orchestrator afterwards.

use ascension_agents::{Agent, Encounter};
use ascension_types::{AgentId, MonthStamp};
use ascension_world::PhenomenonModifier;

/// Errors raised by the per-agent services (encounters and persona).
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The call did not finish within the deadline.
    #[error("service call for {agent_id} timed out (deadline: {deadline_ms}ms)")]
    Timeout {
        /// The agent the call was for.
        agent_id: AgentId,
        /// The deadline in milliseconds.
        deadline_ms: u64,
    },

    /// The service failed.
    #[error("service error: {message}")]
    Internal {
        /// Description of the error.
        message: String,
    },
}

/// Per-agent inputs to an encounter check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncounterContext {
    /// The month being simulated.
    pub now: MonthStamp,
    /// The current phenomenon's modifier.
    pub modifier: PhenomenonModifier,
    /// Seed private to this agent and month.
    pub rng_seed: u64,
}

/// Rolls fortune and misfortune encounters.
#[async_trait::async_trait]
pub trait EncounterService: Send + Sync {
    /// Roll a fortunate encounter for `agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] on failure; the orchestrator logs it and
    /// moves on.
    async fn fortune(
        &self,
        agent: &Agent,
        ctx: &EncounterContext,
    ) -> Result<Option<Encounter>, ServiceError>;

    /// Roll a misfortune for `agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] on failure; the orchestrator logs it and
    /// moves on.
    async fn misfortune(
        &self,
        agent: &Agent,
        ctx: &EncounterContext,
    ) -> Result<Option<Encounter>, ServiceError>;
}

/// An encounter service under which nothing ever happens.
#[derive(Debug, Clone, Default)]
pub struct NoEncounters;

#[async_trait::async_trait]
impl EncounterService for NoEncounters {
    async fn fortune(
        &self,
        _agent: &Agent,
        _ctx: &EncounterContext,
    ) -> Result<Option<Encounter>, ServiceError> {
        Ok(None)
    }

    async fn misfortune(
        &self,
        _agent: &Agent,
        _ctx: &EncounterContext,
    ) -> Result<Option<Encounter>, ServiceError> {
        Ok(None)
    }
}
