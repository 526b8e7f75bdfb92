//! Geography, regions, global phenomena, and the event archive for the
//! Ascension simulation.
//!
//! # Modules
//!
//! - [`archive`] -- Append-only [`EventArchive`] of every event the world
//!   has produced.
//! - [`error`] -- Error types for map and region operations.
//! - [`map`] -- The tile grid ([`WorldMap`]) with Manhattan-radius region
//!   queries and occupancy bookkeeping.
//! - [`phenomenon`] -- The celestial phenomenon catalogue and its random
//!   selector.
//! - [`region`] -- [`Region`] with the occupiable capability expressed as a
//!   tagged [`RegionKind`].
//! - [`starting_world`] -- Default starting map used by the engine.

pub mod archive;
pub mod error;
pub mod map;
pub mod phenomenon;
pub mod region;
pub mod starting_world;

// Re-export primary types at crate root.
pub use archive::EventArchive;
pub use error::WorldError;
pub use map::{Position, WorldMap};
pub use phenomenon::{
    CelestialPhenomenon, PhenomenonModifier, PhenomenonState, catalogue, pick_random_phenomenon,
};
pub use region::{Occupancy, Region, RegionKind};
pub use starting_world::{StartingRegionIds, create_starting_map};
