//! Decision service trait and stub implementation.
//!
//! During the decision phase the orchestrator collects every living agent
//! that is idle and has nothing queued, and asks the [`DecisionService`]
//! for plans in a single batch call. The service could be an LLM backend,
//! a scripted planner, or a test stub. It must not mutate the world; the
//! orchestrator loads the returned plan chains onto the agents itself.

use std::collections::BTreeMap;

use ascension_agents::PlannedAction;
use ascension_types::{AgentId, Event};

use crate::world::World;

/// Errors that can occur during the decision phase.
#[derive(Debug, thiserror::Error)]
pub enum DecisionError {
    /// The service did not respond within the deadline.
    #[error("decision service timed out (deadline: {deadline_ms}ms)")]
    Timeout {
        /// The deadline in milliseconds.
        deadline_ms: u64,
    },

    /// An internal error in the decision service.
    #[error("decision service error: {message}")]
    Internal {
        /// Description of the error.
        message: String,
    },
}

/// What the decision service chose for one agent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecisionOutcome {
    /// Plan chain to queue, head first.
    pub plan: Vec<PlannedAction>,
    /// Reasoning text.
    pub thinking: String,
    /// Short-term objective.
    pub short_term_objective: String,
    /// An event the service may attach. The orchestrator discards it: the
    /// commit phase emits the start event instead.
    pub event: Option<Event>,
}

/// A source of agent plans.
#[async_trait::async_trait]
pub trait DecisionService: Send + Sync {
    /// Decide plans for `agents`, all of which are idle with nothing queued.
    ///
    /// Agents missing from the returned map simply stay idle this month.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError`] if the batch fails as a whole.
    async fn decide(
        &self,
        world: &World,
        agents: &[AgentId],
    ) -> Result<BTreeMap<AgentId, DecisionOutcome>, DecisionError>;
}

/// A decision service that never plans anything.
///
/// Every agent stays idle. Useful for exercising the step without a
/// planner.
#[derive(Debug, Clone, Default)]
pub struct StubDecisionService;

impl StubDecisionService {
    /// Create a new stub decision service.
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl DecisionService for StubDecisionService {
    async fn decide(
        &self,
        _world: &World,
        _agents: &[AgentId],
    ) -> Result<BTreeMap<AgentId, DecisionOutcome>, DecisionError> {
        Ok(BTreeMap::new())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ascension_types::MonthStamp;
    use ascension_world::WorldMap;

    use super::*;

    #[tokio::test]
    async fn stub_returns_no_plans() {
        let world = World::new(WorldMap::new(2, 2).unwrap(), MonthStamp::new(0), 1);
        let service = StubDecisionService::new();
        let plans = service.decide(&world, &[AgentId::new()]).await.unwrap();
        assert!(plans.is_empty());
    }
}
