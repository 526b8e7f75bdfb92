//! Region discovery and auto-occupation.
//!
//! Every living agent scans the tiles within its observation radius
//! (Manhattan distance, clipped to the map) and learns every region those
//! tiles belong to. An agent that holds no region claims the first
//! occupiable, ownerless region it observes.
//!
//! Claims are first-come: agents are visited in registry order and each
//! agent's observed regions in ascending region id, so the same world
//! always resolves to the same claims. Ownership is checked against a
//! snapshot taken before the scan plus every claim granted during it, so
//! no agent ever ends up with two regions this way.

use std::collections::BTreeSet;

use ascension_agents::observation_radius;
use ascension_types::{AgentId, Event, RegionId};
use tracing::debug;

use crate::tick::TickError;
use crate::world::World;

/// Run the perception phase and return one event per claim.
///
/// # Errors
///
/// Returns [`TickError::World`] if a claim violates region occupancy.
pub fn perceive_and_occupy(world: &mut World) -> Result<Vec<Event>, TickError> {
    let now = world.month_stamp;
    let mut owners: BTreeSet<AgentId> = world.map.occupants();
    let mut events = Vec::new();

    let scans: Vec<(AgentId, BTreeSet<RegionId>)> = world
        .registry
        .living()
        .map(|agent| {
            let radius = observation_radius(agent);
            (agent.id, world.map.regions_within(agent.position, radius))
        })
        .collect();

    for (agent_id, observed) in scans {
        let Some(agent) = world.registry.get_mut(agent_id) else {
            continue;
        };
        let learned = agent.learn_regions(observed.iter().copied());
        if !learned.is_empty() {
            debug!(agent_id = %agent_id, learned = learned.len(), "Regions discovered");
        }

        for region_id in observed {
            if owners.contains(&agent_id) {
                break;
            }
            let Some(region) = world.map.get_region(region_id) else {
                continue;
            };
            if !region.is_occupiable() || !region.is_ownerless() {
                continue;
            }
            let region_name = region.name.clone();
            world.map.claim_region(region_id, agent_id)?;
            owners.insert(agent_id);
            events.push(Event::about(
                now,
                format!(
                    "{} passed by {region_name}, found it ownerless, and occupied it.",
                    agent.name
                ),
                agent_id,
            ));
        }
    }

    Ok(events)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use ascension_agents::{Age, Agent};
    use ascension_types::{Gender, MonthStamp};
    use ascension_world::{Position, Region, RegionKind, WorldMap};

    use super::*;

    struct Fixture {
        world: World,
        plains: RegionId,
        cave_west: RegionId,
        cave_east: RegionId,
    }

    /// A 10x3 map: plains everywhere except a cave at x=2 and a cave at x=7
    /// on the middle row.
    fn fixture() -> Fixture {
        let mut map = WorldMap::new(10, 3).unwrap();
        let plains = map
            .add_region(Region::new("Plains", "open", RegionKind::Wilderness))
            .unwrap();
        let cave_west = map
            .add_region(Region::cultivation("West Cave", "damp", 3))
            .unwrap();
        let cave_east = map
            .add_region(Region::cultivation("East Cave", "dry", 5))
            .unwrap();
        map.assign_rect(Position::new(0, 0), Position::new(9, 2), plains)
            .unwrap();
        map.assign_tile(Position::new(2, 1), cave_west).unwrap();
        map.assign_tile(Position::new(7, 1), cave_east).unwrap();
        Fixture {
            world: World::new(map, MonthStamp::new(1200), 1),
            plains,
            cave_west,
            cave_east,
        }
    }

    fn add(world: &mut World, name: &str, x: u32, y: u32) -> AgentId {
        let agent = Agent::new(
            name,
            Gender::Male,
            Age::from_years(20, 80),
            Position::new(x, y),
            MonthStamp::new(0),
        );
        world.registry.register(agent, false).unwrap()
    }

    #[test]
    fn learns_regions_in_radius() {
        let mut fx = fixture();
        let id = add(&mut fx.world, "Mo Xuan", 3, 1);
        perceive_and_occupy(&mut fx.world).unwrap();
        let known = &fx.world.registry.get(id).unwrap().known_regions;
        assert!(known.contains(&fx.plains));
        assert!(known.contains(&fx.cave_west));
        assert!(!known.contains(&fx.cave_east));
    }

    #[test]
    fn first_observer_in_registry_order_claims() {
        let mut fx = fixture();
        let first = add(&mut fx.world, "Lin Feng", 1, 1);
        let second = add(&mut fx.world, "Su Mei", 3, 1);
        let events = perceive_and_occupy(&mut fx.world).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].related_agents(), &[first]);
        assert_eq!(
            fx.world.map.get_region(fx.cave_west).unwrap().occupant(),
            Some(first)
        );
        assert!(fx.world.map.occupied_by(second).is_empty());
    }

    #[test]
    fn owner_never_gains_second_region() {
        let mut fx = fixture();
        let id = add(&mut fx.world, "Ye Chen", 2, 1);
        fx.world.registry.get_mut(id).unwrap().cultivation.level = 100;
        // Radius 4 from (2,1) does not reach (7,1); move closer to see both.
        fx.world.registry.get_mut(id).unwrap().position = Position::new(5, 1);

        let events = perceive_and_occupy(&mut fx.world).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(fx.world.map.occupied_by(id).len(), 1);

        let again = perceive_and_occupy(&mut fx.world).unwrap();
        assert!(again.is_empty());
        assert_eq!(fx.world.map.occupied_by(id).len(), 1);
    }

    #[test]
    fn existing_owner_does_not_claim() {
        let mut fx = fixture();
        let id = add(&mut fx.world, "Han Li", 7, 1);
        fx.world.map.claim_region(fx.cave_east, id).unwrap();
        fx.world.registry.get_mut(id).unwrap().position = Position::new(2, 1);
        let events = perceive_and_occupy(&mut fx.world).unwrap();
        assert!(events.is_empty());
        assert!(fx.world.map.get_region(fx.cave_west).unwrap().is_ownerless());
    }

    #[test]
    fn dead_agents_do_not_perceive() {
        let mut fx = fixture();
        let id = add(&mut fx.world, "Qin Lan", 2, 1);
        fx.world
            .registry
            .get_mut(id)
            .unwrap()
            .mark_dead(MonthStamp::new(1), ascension_types::DeathCause::OldAge);
        let events = perceive_and_occupy(&mut fx.world).unwrap();
        assert!(events.is_empty());
        assert!(fx.world.registry.get(id).unwrap().known_regions.is_empty());
    }
}
