//! Default starting map for the Ascension simulation.
//!
//! A 24x16 grid holding a mortal city, a sect gate, open wilderness, and
//! four cultivation caves that the first wandering cultivators can claim.

use tracing::debug;

use ascension_types::RegionId;

use crate::error::WorldError;
use crate::map::{Position, WorldMap};
use crate::region::{Region, RegionKind};

/// Width of the starting map in tiles.
pub const STARTING_MAP_WIDTH: u32 = 24;

/// Height of the starting map in tiles.
pub const STARTING_MAP_HEIGHT: u32 = 16;

/// Identifiers for the starting regions, returned alongside the map so that
/// callers can reference specific regions.
#[derive(Debug, Clone)]
pub struct StartingRegionIds {
    /// Verdant Plains: the open heartland.
    pub verdant_plains: RegionId,
    /// Misty Marshes: the southern wetlands.
    pub misty_marshes: RegionId,
    /// Jade City: mortal trade hub.
    pub jade_city: RegionId,
    /// Azure Cloud Sect: mountain gate in the north.
    pub azure_cloud_sect: RegionId,
    /// Cultivation caves, west to east.
    pub caves: [RegionId; 4],
}

/// Create the default starting map.
///
/// # Errors
///
/// Returns [`WorldError`] only if the fixed layout is inconsistent.
pub fn create_starting_map() -> Result<(WorldMap, StartingRegionIds), WorldError> {
    let mut map = WorldMap::new(STARTING_MAP_WIDTH, STARTING_MAP_HEIGHT)?;

    let verdant_plains = map.add_region(Region::new(
        "Verdant Plains",
        "rolling grassland dotted with farming villages",
        RegionKind::Wilderness,
    ))?;
    let misty_marshes = map.add_region(Region::new(
        "Misty Marshes",
        "fog-bound wetlands where strange beasts lurk",
        RegionKind::Wilderness,
    ))?;
    let jade_city = map.add_region(Region::new(
        "Jade City",
        "a walled mortal city famed for its markets",
        RegionKind::City,
    ))?;
    let azure_cloud_sect = map.add_region(Region::new(
        "Azure Cloud Sect",
        "cloud-wrapped peaks where the sect's disciples train",
        RegionKind::Sect,
    ))?;
    let caves = [
        map.add_region(Region::cultivation(
            "Cold Spring Grotto",
            "an icy cave fed by an underground spring",
            3,
        ))?,
        map.add_region(Region::cultivation(
            "Red Cliff Abode",
            "a cave abode carved into a crimson cliff",
            4,
        ))?,
        map.add_region(Region::cultivation(
            "Whispering Pine Cave",
            "a quiet cave shaded by ancient pines",
            2,
        ))?,
        map.add_region(Region::cultivation(
            "Thunder Peak Cavern",
            "a cavern where lightning strikes the peak above",
            5,
        ))?,
    ];

    // Base layers first; smaller regions are painted over them.
    map.assign_rect(Position::new(0, 0), Position::new(23, 10), verdant_plains)?;
    map.assign_rect(Position::new(0, 11), Position::new(23, 15), misty_marshes)?;
    map.assign_rect(Position::new(9, 5), Position::new(13, 8), jade_city)?;
    map.assign_rect(Position::new(16, 0), Position::new(21, 3), azure_cloud_sect)?;

    let [cold_spring, red_cliff, whispering_pine, thunder_peak] = caves;
    map.assign_rect(Position::new(2, 2), Position::new(3, 3), cold_spring)?;
    map.assign_rect(Position::new(6, 12), Position::new(7, 13), red_cliff)?;
    map.assign_rect(Position::new(14, 11), Position::new(15, 12), whispering_pine)?;
    map.assign_rect(Position::new(22, 1), Position::new(23, 2), thunder_peak)?;

    debug!(regions = map.region_count(), "Starting map created");

    Ok((
        map,
        StartingRegionIds {
            verdant_plains,
            misty_marshes,
            jade_city,
            azure_cloud_sect,
            caves,
        },
    ))
}
