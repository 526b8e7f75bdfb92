//! Rule-based decision service.
//!
//! Plans short chains for idle cultivators without any external model:
//!
//! - badly wounded agents rest until healed;
//! - agents holding a cave cultivate there;
//! - everyone else travels to a random spot and cultivates on arrival,
//!   hoping to pass an ownerless cave on the way.
//!
//! Destinations are drawn from the agent's private per-month seed, so the
//! same world always yields the same plans.

use std::collections::BTreeMap;

use ascension_agents::{Agent, PlannedAction};
use ascension_core::decision::{DecisionError, DecisionOutcome, DecisionService};
use ascension_core::world::World;
use ascension_types::AgentId;
use ascension_world::Position;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

/// Name of the cultivation action.
pub const CULTIVATE: &str = "cultivate";
/// Name of the travel action.
pub const TRAVEL: &str = "travel";
/// Name of the rest action.
pub const REST: &str = "rest";

/// Plans cultivate, travel and rest chains from simple rules.
#[derive(Debug, Clone)]
pub struct RuleBasedPlanner {
    cultivation_months: u32,
    rest_months: u32,
}

impl RuleBasedPlanner {
    /// Create a planner that cultivates in blocks of `cultivation_months`.
    pub const fn new(cultivation_months: u32) -> Self {
        Self {
            cultivation_months,
            rest_months: 2,
        }
    }

    fn plan_for(&self, world: &World, agent: &Agent) -> DecisionOutcome {
        let health = agent.health;
        if health.current.saturating_mul(2) < health.max {
            return DecisionOutcome {
                plan: vec![
                    PlannedAction::new(REST)
                        .with_params(json!({ "months": self.rest_months }))
                        .announced("withdraws from the world to tend their wounds."),
                ],
                thinking: String::from("My meridians are damaged. Pushing on now would be fatal."),
                short_term_objective: String::from("recover from injuries"),
                event: None,
            };
        }

        if let Some(home) = world
            .map
            .occupied_by(agent.id)
            .first()
            .and_then(|id| world.map.get_region(*id))
        {
            return DecisionOutcome {
                plan: vec![self.cultivate().announced(format!(
                    "enters closed-door cultivation in {}.",
                    home.name
                ))],
                thinking: format!("{} is mine. Every month here is a step closer.", home.name),
                short_term_objective: String::from("deepen cultivation"),
                event: None,
            };
        }

        let mut rng = SmallRng::seed_from_u64(world.agent_seed(agent.id));
        let target = Position::new(
            rng.random_range(0..world.map.width()),
            rng.random_range(0..world.map.height()),
        );
        DecisionOutcome {
            plan: vec![
                PlannedAction::new(TRAVEL)
                    .with_params(json!({ "x": target.x, "y": target.y }))
                    .announced(format!(
                        "sets out toward ({}, {}) in search of a cave abode.",
                        target.x, target.y
                    )),
                self.cultivate()
                    .announced("settles down to cultivate after a long journey."),
            ],
            thinking: String::from("Without a place of my own, my progress crawls."),
            short_term_objective: String::from("find a cave abode"),
            event: None,
        }
    }

    fn cultivate(&self) -> PlannedAction {
        PlannedAction::new(CULTIVATE).with_params(json!({ "months": self.cultivation_months }))
    }
}

impl Default for RuleBasedPlanner {
    fn default() -> Self {
        Self::new(6)
    }
}

#[async_trait::async_trait]
impl DecisionService for RuleBasedPlanner {
    async fn decide(
        &self,
        world: &World,
        agents: &[AgentId],
    ) -> Result<BTreeMap<AgentId, DecisionOutcome>, DecisionError> {
        Ok(agents
            .iter()
            .filter_map(|id| world.registry.get(*id))
            .map(|agent| (agent.id, self.plan_for(world, agent)))
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use ascension_agents::Age;
    use ascension_types::{Gender, MonthStamp};
    use ascension_world::create_starting_map;

    use super::*;

    fn world_with_agent() -> (World, AgentId, ascension_world::StartingRegionIds) {
        let (map, ids) = create_starting_map().unwrap();
        let mut world = World::new(map, MonthStamp::new(1200), 5);
        let agent = Agent::new(
            "Qing Mo",
            Gender::Male,
            Age::from_years(20, 90),
            Position::new(0, 0),
            MonthStamp::new(0),
        );
        let id = world.registry.register(agent, false).unwrap();
        (world, id, ids)
    }

    #[tokio::test]
    async fn homeless_agent_travels_then_cultivates() {
        let (world, id, _) = world_with_agent();
        let plans = RuleBasedPlanner::default().decide(&world, &[id]).await.unwrap();
        let plan = &plans[&id].plan;
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].name, TRAVEL);
        assert_eq!(plan[1].name, CULTIVATE);
        assert!(plan[0].announcement.is_some());
    }

    #[tokio::test]
    async fn cave_holder_cultivates_at_home() {
        let (mut world, id, ids) = world_with_agent();
        world.map.claim_region(ids.caves[0], id).unwrap();
        let plans = RuleBasedPlanner::new(4).decide(&world, &[id]).await.unwrap();
        let plan = &plans[&id].plan;
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].name, CULTIVATE);
        assert_eq!(plan[0].params["months"], 4);
        assert!(plan[0].announcement.as_deref().unwrap().contains("Cold Spring Grotto"));
    }

    #[tokio::test]
    async fn wounded_agent_rests() {
        let (mut world, id, _) = world_with_agent();
        world.registry.get_mut(id).unwrap().health.current = 10;
        let plans = RuleBasedPlanner::default().decide(&world, &[id]).await.unwrap();
        assert_eq!(plans[&id].plan[0].name, REST);
        assert_eq!(plans[&id].short_term_objective, "recover from injuries");
    }

    #[tokio::test]
    async fn same_world_same_destination() {
        let (world, id, _) = world_with_agent();
        let planner = RuleBasedPlanner::default();
        let first = planner.decide(&world, &[id]).await.unwrap();
        let second = planner.decide(&world, &[id]).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn unknown_agents_are_skipped() {
        let (world, _, _) = world_with_agent();
        let plans = RuleBasedPlanner::default()
            .decide(&world, &[AgentId::new()])
            .await
            .unwrap();
        assert!(plans.is_empty());
    }
}
