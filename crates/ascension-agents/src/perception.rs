//! How far an avatar can see.

use crate::agent::Agent;
use crate::vitals::Realm;

/// Observation radius in tiles, derived from the cultivation realm.
///
/// Qi Refinement sees 1 tile, each higher realm one tile further.
pub const fn observation_radius(agent: &Agent) -> u32 {
    match agent.cultivation.realm() {
        Realm::QiRefinement => 1,
        Realm::Foundation => 2,
        Realm::CoreFormation => 3,
        Realm::NascentSoul => 4,
    }
}
