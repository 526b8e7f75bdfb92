//! Duration-based action executor.
//!
//! Each call advances the agent's current action by one step:
//!
//! | Action | Params | Per step | Done when |
//! |--------|--------|----------|-----------|
//! | `cultivate` | `months` | progress from base gain, home density, effects, phenomenon | `months` steps taken |
//! | `rest` | `months` | extra healing | `months` steps taken |
//! | `travel` | `x`, `y` | up to [`TRAVEL_SPEED`] tiles toward the target | target reached |
//!
//! When an action finishes the next queued plan starts immediately, and the
//! step reports `chained` so the orchestrator gives it a turn this month.

use ascension_agents::Agent;
use ascension_core::executor::{ActionContext, ActionExecutor, ActionStep, ExecutorError};
use ascension_types::Event;
use ascension_world::Position;
use serde_json::Value;

use crate::planner::{CULTIVATE, REST, TRAVEL};

/// Tiles moved per travel step.
pub const TRAVEL_SPEED: u32 = 3;

/// Extra health restored per rest step.
pub const REST_HEAL: i32 = 15;

/// Advances cultivate, rest and travel actions.
#[derive(Debug, Clone)]
pub struct DurationExecutor {
    base_cultivation_gain: u32,
}

impl DurationExecutor {
    /// Create an executor with the given base cultivation gain per step.
    pub const fn new(base_cultivation_gain: u32) -> Self {
        Self {
            base_cultivation_gain,
        }
    }

    fn cultivation_gain(&self, agent: &Agent, ctx: &ActionContext<'_>) -> u32 {
        let density: u32 = ctx
            .map
            .occupied_by(agent.id)
            .into_iter()
            .filter_map(|id| ctx.map.get_region(id))
            .map(ascension_world::Region::essence_density)
            .max()
            .unwrap_or(0);
        let raw = self
            .base_cultivation_gain
            .saturating_add(density.saturating_mul(2));
        scale_pct(raw, ctx.modifier.cultivation_pct)
    }
}

impl Default for DurationExecutor {
    fn default() -> Self {
        Self::new(8)
    }
}

#[async_trait::async_trait]
impl ActionExecutor for DurationExecutor {
    async fn tick(
        &self,
        agent: &mut Agent,
        ctx: &ActionContext<'_>,
    ) -> Result<ActionStep, ExecutorError> {
        let Some(action) = agent.current_action.as_mut() else {
            return Ok(ActionStep::idle());
        };
        let steps = action.advance();
        let name = action.name.clone();
        let params = action.params.clone();

        let mut events = Vec::new();
        let finished = match name.as_str() {
            CULTIVATE => {
                let months = param_u32(&params, "months")?;
                let gain = self.cultivation_gain(agent, ctx);
                if agent.gain_cultivation(gain) > 0 {
                    events.push(Event::about(
                        ctx.now,
                        format!(
                            "{} broke through to level {} of the {} realm.",
                            agent.display_name(),
                            agent.cultivation.level,
                            agent.cultivation.realm()
                        ),
                        agent.id,
                    ));
                }
                steps >= months
            }
            REST => {
                let months = param_u32(&params, "months")?;
                agent.health.heal(REST_HEAL);
                steps >= months || !agent.health.is_wounded()
            }
            TRAVEL => {
                let target = Position::new(param_u32(&params, "x")?, param_u32(&params, "y")?);
                if !ctx.map.contains(target) {
                    return Err(ExecutorError::Internal {
                        message: format!("travel target ({}, {}) is off the map", target.x, target.y),
                    });
                }
                agent.position = step_toward(agent.position, target, TRAVEL_SPEED);
                agent.position == target
            }
            other => {
                return Err(ExecutorError::Internal {
                    message: format!("unknown action '{other}'"),
                });
            }
        };

        if !finished {
            return Ok(ActionStep {
                events,
                chained: false,
            });
        }

        agent.current_action = None;
        events.extend(agent.commit_next_plan(ctx.now));
        Ok(ActionStep {
            events,
            chained: agent.current_action.is_some(),
        })
    }
}

/// Move up to `speed` tiles toward `target`, along x first.
pub fn step_toward(from: Position, target: Position, speed: u32) -> Position {
    let dx = from.x.abs_diff(target.x).min(speed);
    let x = if target.x >= from.x {
        from.x.saturating_add(dx)
    } else {
        from.x.saturating_sub(dx)
    };
    let remaining = speed.saturating_sub(dx);
    let dy = from.y.abs_diff(target.y).min(remaining);
    let y = if target.y >= from.y {
        from.y.saturating_add(dy)
    } else {
        from.y.saturating_sub(dy)
    };
    Position::new(x, y)
}

/// Scale `value` by `100 + pct` percent, floored at zero.
pub fn scale_pct(value: u32, pct: i32) -> u32 {
    let factor = i64::from(100_i32.saturating_add(pct).max(0));
    let scaled = i64::from(value).saturating_mul(factor) / 100;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

fn param_u32(params: &Value, key: &str) -> Result<u32, ExecutorError> {
    params
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| ExecutorError::Internal {
            message: format!("missing or invalid action parameter '{key}'"),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ascension_agents::{Age, PlannedAction};
    use ascension_types::{Gender, MonthStamp};
    use ascension_world::{PhenomenonModifier, Region, WorldMap};
    use serde_json::json;

    use super::*;

    fn agent_at(x: u32, y: u32) -> Agent {
        Agent::new(
            "Liu Xian",
            Gender::Female,
            Age::from_years(20, 90),
            Position::new(x, y),
            MonthStamp::new(0),
        )
    }

    fn ctx(map: &WorldMap) -> ActionContext<'_> {
        ActionContext {
            now: MonthStamp::new(1200),
            map,
            modifier: PhenomenonModifier::default(),
        }
    }

    #[test]
    fn step_toward_moves_x_then_y() {
        let from = Position::new(0, 0);
        assert_eq!(step_toward(from, Position::new(2, 5), 3), Position::new(2, 1));
        assert_eq!(step_toward(from, Position::new(5, 5), 3), Position::new(3, 0));
        assert_eq!(
            step_toward(Position::new(4, 4), Position::new(3, 3), 3),
            Position::new(3, 3)
        );
    }

    #[test]
    fn scale_pct_floors_at_zero() {
        assert_eq!(scale_pct(10, 0), 10);
        assert_eq!(scale_pct(10, 30), 13);
        assert_eq!(scale_pct(10, -25), 7);
        assert_eq!(scale_pct(10, -200), 0);
    }

    #[tokio::test]
    async fn travel_arrival_chains_into_cultivation() {
        let map = WorldMap::new(10, 10).unwrap();
        let mut agent = agent_at(0, 0);
        agent.load_plan_chain(vec![
            PlannedAction::new(TRAVEL).with_params(json!({ "x": 2, "y": 0 })),
            PlannedAction::new(CULTIVATE)
                .with_params(json!({ "months": 3 }))
                .announced("begins to cultivate."),
        ]);
        agent.commit_next_plan(MonthStamp::new(1200));

        let step = DurationExecutor::default()
            .tick(&mut agent, &ctx(&map))
            .await
            .unwrap();

        assert!(step.chained);
        assert_eq!(agent.position, Position::new(2, 0));
        assert_eq!(agent.current_action.as_ref().unwrap().name, CULTIVATE);
        assert_eq!(step.events.len(), 1);
        assert!(step.events[0].description().ends_with("begins to cultivate."));
    }

    #[tokio::test]
    async fn cultivation_runs_for_its_duration() {
        let map = WorldMap::new(4, 4).unwrap();
        let mut agent = agent_at(0, 0);
        agent.load_plan_chain(vec![
            PlannedAction::new(CULTIVATE).with_params(json!({ "months": 2 })),
        ]);
        agent.commit_next_plan(MonthStamp::new(1200));
        let executor = DurationExecutor::new(10);

        let first = executor.tick(&mut agent, &ctx(&map)).await.unwrap();
        assert!(!first.chained);
        assert!(agent.current_action.is_some());
        assert_eq!(agent.cultivation.progress, 10);

        executor.tick(&mut agent, &ctx(&map)).await.unwrap();
        assert!(agent.is_idle());
        assert_eq!(agent.cultivation.progress, 20);
    }

    #[tokio::test]
    async fn home_cave_speeds_cultivation() {
        let mut map = WorldMap::new(4, 4).unwrap();
        let cave = map.add_region(Region::cultivation("Cave", "rich", 5)).unwrap();
        let mut agent = agent_at(0, 0);
        map.claim_region(cave, agent.id).unwrap();
        agent.load_plan_chain(vec![
            PlannedAction::new(CULTIVATE).with_params(json!({ "months": 5 })),
        ]);
        agent.commit_next_plan(MonthStamp::new(1200));

        DurationExecutor::new(10)
            .tick(&mut agent, &ctx(&map))
            .await
            .unwrap();
        assert_eq!(agent.cultivation.progress, 20);
    }

    #[tokio::test]
    async fn unknown_action_is_an_error() {
        let map = WorldMap::new(4, 4).unwrap();
        let mut agent = agent_at(0, 0);
        agent.load_plan_chain(vec![PlannedAction::new("fly to the moon")]);
        agent.commit_next_plan(MonthStamp::new(1200));
        let result = DurationExecutor::default().tick(&mut agent, &ctx(&map)).await;
        assert!(matches!(result, Err(ExecutorError::Internal { .. })));
    }

    #[tokio::test]
    async fn idle_agent_does_nothing() {
        let map = WorldMap::new(4, 4).unwrap();
        let mut agent = agent_at(1, 1);
        let step = DurationExecutor::default()
            .tick(&mut agent, &ctx(&map))
            .await
            .unwrap();
        assert_eq!(step, ActionStep::idle());
    }
}
