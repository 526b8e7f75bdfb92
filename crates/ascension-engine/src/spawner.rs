//! Seed cultivators for the start of a run.
//!
//! At simulation start the spawner awakens `initial_agents` mortals through
//! the same routine used for monthly births, so seed agents and later
//! arrivals share one name pool and one set of age and lifespan rules.
//! The first seed agent has metrics tracking enabled.

use ascension_agents::{AwakeningParams, awaken_random_mortal};
use ascension_core::world::World;
use ascension_types::AgentId;
use tracing::{debug, info};

use crate::error::EngineError;

/// Awaken `count` seed agents into `world` and return their ids in
/// registration order.
///
/// Seed agents are not marked newly born.
///
/// # Errors
///
/// Returns [`EngineError::Agent`] if the age range is invalid or the map is
/// empty.
pub fn spawn_seed_agents(
    world: &mut World,
    count: u32,
    params: AwakeningParams,
) -> Result<Vec<AgentId>, EngineError> {
    let now = world.month_stamp;
    let mut ids = Vec::new();

    for index in 0..count {
        let registry = &world.registry;
        let mut agent = awaken_random_mortal(&mut world.rng, now, &world.map, params, |name| {
            registry.name_taken(name)
        })?;
        agent.metrics_tracking = index == 0;
        debug!(
            name = %agent.name,
            age_years = agent.age.years(),
            x = agent.position.x,
            y = agent.position.y,
            "Seed agent awakened"
        );
        ids.push(world.registry.register(agent, false)?);
    }

    info!(agents_spawned = ids.len(), "Seed agents spawned");
    Ok(ids)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use ascension_types::MonthStamp;
    use ascension_world::create_starting_map;

    use super::*;

    fn make_test_world() -> World {
        let (map, _) = create_starting_map().unwrap();
        World::new(map, MonthStamp::new(1200), 42)
    }

    #[test]
    fn spawns_correct_count() {
        let mut world = make_test_world();
        let ids = spawn_seed_agents(&mut world, 8, AwakeningParams::default()).unwrap();
        assert_eq!(ids.len(), 8);
        assert_eq!(world.registry.living_count(), 8);
        assert!(world.registry.newly_born().is_empty());
    }

    #[test]
    fn all_unique_names() {
        let mut world = make_test_world();
        spawn_seed_agents(&mut world, 40, AwakeningParams::default()).unwrap();
        let names: BTreeSet<&str> = world.registry.all().map(|a| a.name.as_str()).collect();
        assert_eq!(names.len(), 40);
    }

    #[test]
    fn only_first_agent_is_tracked() {
        let mut world = make_test_world();
        let ids = spawn_seed_agents(&mut world, 3, AwakeningParams::default()).unwrap();
        let tracked: Vec<bool> = ids
            .iter()
            .map(|id| world.registry.get(*id).unwrap().metrics_tracking)
            .collect();
        assert_eq!(tracked, vec![true, false, false]);
    }

    #[test]
    fn zero_agents_returns_empty() {
        let mut world = make_test_world();
        let ids = spawn_seed_agents(&mut world, 0, AwakeningParams::default()).unwrap();
        assert!(ids.is_empty());
        assert!(world.registry.is_empty());
    }

    #[test]
    fn invalid_age_range_is_an_error() {
        let mut world = make_test_world();
        let params = AwakeningParams {
            min_age: 50,
            max_age: 20,
        };
        assert!(matches!(
            spawn_seed_agents(&mut world, 1, params),
            Err(EngineError::Agent { .. })
        ));
    }
}
