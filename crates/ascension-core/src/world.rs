//! The world aggregate passed by reference into every phase.
//!
//! [`World`] bundles everything a monthly step reads or mutates: the clock,
//! the map, the agent registry, the gathering manager, the event archive,
//! the current celestial phenomenon, and the seeded random source. There is
//! no process-wide state; two worlds never share anything.

use ascension_agents::AgentRegistry;
use ascension_types::{AgentId, MonthStamp};
use ascension_world::{EventArchive, PhenomenonModifier, PhenomenonState, WorldMap};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::{ConfigError, WorldConfig};
use crate::gathering::GatheringManager;

/// The mutable simulation state advanced by the step orchestrator.
pub struct World {
    /// Current month. Advanced only at the end of a successful step.
    pub month_stamp: MonthStamp,
    /// The map and its regions.
    pub map: WorldMap,
    /// Every agent, living or dead.
    pub registry: AgentRegistry,
    /// Scheduler for multi-agent gatherings, if any.
    pub gathering_manager: Option<Box<dyn GatheringManager>>,
    /// Append-only record of every finalized event.
    pub archive: EventArchive,
    /// The phenomenon in force; `None` before the first step.
    pub phenomenon: Option<PhenomenonState>,
    /// Random source for synchronous draws.
    pub rng: SmallRng,
    seed: u64,
}

impl World {
    /// Create a world with an empty registry starting at `month_stamp`.
    pub fn new(map: WorldMap, month_stamp: MonthStamp, seed: u64) -> Self {
        Self {
            month_stamp,
            map,
            registry: AgentRegistry::new(),
            gathering_manager: None,
            archive: EventArchive::new(),
            phenomenon: None,
            rng: SmallRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create a world from the `world` section of the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configured start date is invalid.
    pub fn from_config(map: WorldMap, config: &WorldConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(map, config.start_stamp()?, config.seed))
    }

    /// Install a gathering manager.
    #[must_use]
    pub fn with_gathering_manager(mut self, manager: Box<dyn GatheringManager>) -> Self {
        self.gathering_manager = Some(manager);
        self
    }

    /// The seed the world was created with.
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// The modifier of the current phenomenon, or no change if none.
    pub fn modifier(&self) -> PhenomenonModifier {
        self.phenomenon
            .as_ref()
            .map(|state| state.phenomenon.modifier)
            .unwrap_or_default()
    }

    /// A seed private to one agent in the current month.
    ///
    /// Concurrent per-agent checks each build their own random source from
    /// this value, so within a run their outcomes do not depend on
    /// completion order. Agent ids carry random bits, so the value is not
    /// stable across processes even for the same world seed.
    pub fn agent_seed(&self, agent: AgentId) -> u64 {
        derive_seed(self.seed, self.month_stamp, agent)
    }

    /// Capture the state a step may change before it finalizes.
    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            map: self.map.clone(),
            registry: self.registry.clone(),
            phenomenon: self.phenomenon.clone(),
            rng: self.rng.clone(),
        }
    }

    /// Put back the state captured by [`World::checkpoint`].
    ///
    /// The gathering manager is not part of the checkpoint; it keeps
    /// whatever bookkeeping it did during the failed step.
    pub(crate) fn restore(&mut self, checkpoint: Checkpoint) {
        self.map = checkpoint.map;
        self.registry = checkpoint.registry;
        self.phenomenon = checkpoint.phenomenon;
        self.rng = checkpoint.rng;
    }
}

/// Copy of the step-mutable parts of a [`World`].
pub(crate) struct Checkpoint {
    map: WorldMap,
    registry: AgentRegistry,
    phenomenon: Option<PhenomenonState>,
    rng: SmallRng,
}

impl core::fmt::Debug for World {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("World")
            .field("month_stamp", &self.month_stamp)
            .field("regions", &self.map.region_count())
            .field("agents", &self.registry.len())
            .field("has_gathering_manager", &self.gathering_manager.is_some())
            .field("archived_events", &self.archive.len())
            .field("phenomenon", &self.phenomenon)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

/// Mix a world seed, a month, and an agent id into one seed.
pub fn derive_seed(seed: u64, month: MonthStamp, agent: AgentId) -> u64 {
    let (high, low) = agent.into_inner().as_u64_pair();
    [month.months(), high, low]
        .into_iter()
        .fold(splitmix(seed), |acc, part| splitmix(acc ^ part))
}

const fn splitmix(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn world() -> World {
        World::new(WorldMap::new(4, 4).unwrap(), MonthStamp::new(1200), 42)
    }

    #[test]
    fn new_world_is_empty() {
        let w = world();
        assert!(w.registry.is_empty());
        assert!(w.archive.is_empty());
        assert!(w.phenomenon.is_none());
        assert!(w.gathering_manager.is_none());
        assert_eq!(w.modifier(), PhenomenonModifier::default());
    }

    #[test]
    fn from_config_uses_start_date() {
        let config = WorldConfig::default();
        let w = World::from_config(WorldMap::new(2, 2).unwrap(), &config).unwrap();
        assert_eq!(w.month_stamp.year(), 100);
        assert_eq!(w.seed(), 42);
    }

    #[test]
    fn agent_seed_varies_by_agent_and_month() {
        let mut w = world();
        let a = AgentId::new();
        let b = AgentId::new();
        let first = w.agent_seed(a);
        assert_eq!(first, w.agent_seed(a));
        assert_ne!(first, w.agent_seed(b));
        w.month_stamp = MonthStamp::new(1201);
        assert_ne!(first, w.agent_seed(a));
    }

    #[test]
    fn restore_undoes_changes_since_checkpoint() {
        use ascension_agents::{Age, Agent};
        use ascension_types::Gender;
        use ascension_world::Position;
        use rand::Rng;

        let mut w = world();
        let checkpoint = w.checkpoint();
        let expected: u64 = w.rng.clone().random();

        let agent = Agent::new(
            "Shen Yue",
            Gender::Female,
            Age::from_years(20, 80),
            Position::new(0, 0),
            w.month_stamp,
        );
        w.registry.register(agent, false).unwrap();
        let _: u64 = w.rng.random();

        w.restore(checkpoint);
        assert!(w.registry.is_empty());
        assert_eq!(w.rng.random::<u64>(), expected);
    }
}
