//! Action executor trait.
//!
//! The executor advances one agent's current action by one step. It may
//! finish the action and start the next queued one in the same call; it
//! reports that through [`ActionStep::chained`] so the orchestrator can give
//! the new action a turn before the month ends.
//!
//! An executor touches only the agent it was handed. Everything else it
//! sees through [`ActionContext`] is read-only.

use ascension_agents::Agent;
use ascension_types::{AgentId, Event, MonthStamp};
use ascension_world::{PhenomenonModifier, WorldMap};

/// Errors raised while advancing an action.
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    /// The step did not finish within the deadline.
    #[error("action step for {agent_id} timed out (deadline: {deadline_ms}ms)")]
    Timeout {
        /// The agent whose step timed out.
        agent_id: AgentId,
        /// The deadline in milliseconds.
        deadline_ms: u64,
    },

    /// The executor failed.
    #[error("action executor error: {message}")]
    Internal {
        /// Description of the error.
        message: String,
    },
}

impl ExecutorError {
    /// Short world-facing description of what went wrong.
    pub const fn cause(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "the moment passed before it could be completed",
            Self::Internal { .. } => "the technique went awry",
        }
    }
}

/// Read-only world view available to an action step.
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
    /// The month being simulated.
    pub now: MonthStamp,
    /// The map, for movement and region lookups.
    pub map: &'a WorldMap,
    /// The current phenomenon's modifier.
    pub modifier: PhenomenonModifier,
}

/// The result of one executor call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionStep {
    /// Events emitted by the step, in order.
    pub events: Vec<Event>,
    /// Whether a new action began during this step.
    pub chained: bool,
}

impl ActionStep {
    /// A step that emitted nothing and started nothing.
    pub const fn idle() -> Self {
        Self {
            events: Vec::new(),
            chained: false,
        }
    }
}

/// Advances agents' actions.
#[async_trait::async_trait]
pub trait ActionExecutor: Send + Sync {
    /// Advance `agent`'s current action by one step.
    ///
    /// Called for every living agent once per month, and again (up to the
    /// configured round limit) for agents whose previous step chained.
    /// Agents with no current action should return [`ActionStep::idle`].
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError`] if the step fails. The orchestrator
    /// isolates the failure to this agent.
    async fn tick(
        &self,
        agent: &mut Agent,
        ctx: &ActionContext<'_>,
    ) -> Result<ActionStep, ExecutorError>;
}

/// An executor that completes every action on its first step without
/// chaining.
#[derive(Debug, Clone, Default)]
pub struct InstantExecutor;

impl InstantExecutor {
    /// Create a new instant executor.
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl ActionExecutor for InstantExecutor {
    async fn tick(
        &self,
        agent: &mut Agent,
        _ctx: &ActionContext<'_>,
    ) -> Result<ActionStep, ExecutorError> {
        agent.current_action = None;
        Ok(ActionStep::idle())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ascension_agents::{Age, PlannedAction};
    use ascension_types::Gender;
    use ascension_world::Position;

    use super::*;

    #[tokio::test]
    async fn instant_executor_clears_action() {
        let map = WorldMap::new(2, 2).unwrap();
        let mut agent = Agent::new(
            "Bai Yue",
            Gender::Female,
            Age::from_years(20, 80),
            Position::new(0, 0),
            MonthStamp::new(0),
        );
        agent.load_plan_chain(vec![PlannedAction::new("cultivate")]);
        agent.commit_next_plan(MonthStamp::new(0));
        let ctx = ActionContext {
            now: MonthStamp::new(0),
            map: &map,
            modifier: PhenomenonModifier::default(),
        };
        let step = InstantExecutor::new().tick(&mut agent, &ctx).await.unwrap();
        assert!(!step.chained);
        assert!(agent.is_idle());
    }

    #[test]
    fn cause_omits_agent_id() {
        let agent_id = AgentId::new();
        let timeout = ExecutorError::Timeout {
            agent_id,
            deadline_ms: 20,
        };
        assert!(timeout.to_string().contains(&agent_id.to_string()));
        assert!(!timeout.cause().contains(&agent_id.to_string()));
        let internal = ExecutorError::Internal {
            message: String::from("qi deviation"),
        };
        assert_eq!(internal.cause(), "the technique went awry");
    }
}
