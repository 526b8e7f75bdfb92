//! The world map: a rectangular tile grid partitioned into regions.
//!
//! Each tile belongs to at most one [`Region`]. Tile storage is row-major;
//! tiles outside every region (sea, void) hold `None`. Map generation is
//! not done here -- callers build maps from regions and tile assignments.

use std::collections::{BTreeMap, BTreeSet};

use ascension_types::{AgentId, RegionId};
use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::region::Region;

/// A tile coordinate.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    /// Column, 0-based.
    pub x: u32,
    /// Row, 0-based.
    pub y: u32,
}

impl Position {
    /// Create a position.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another position.
    pub const fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).saturating_add(self.y.abs_diff(other.y))
    }
}

/// The tile grid and the regions laid over it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldMap {
    /// Width in tiles.
    width: u32,
    /// Height in tiles.
    height: u32,
    /// Region membership per tile, row-major.
    tiles: Vec<Option<RegionId>>,
    /// All regions indexed by id.
    regions: BTreeMap<RegionId, Region>,
}

impl WorldMap {
    /// Create an empty map of the given size.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`] if either side is zero or
    /// the tile count does not fit in memory addressing.
    pub fn new(width: u32, height: u32) -> Result<Self, WorldError> {
        let invalid = WorldError::InvalidDimensions { width, height };
        if width == 0 || height == 0 {
            return Err(invalid);
        }
        let count = usize::try_from(width)
            .ok()
            .zip(usize::try_from(height).ok())
            .and_then(|(w, h)| w.checked_mul(h))
            .ok_or(invalid)?;
        Ok(Self {
            width,
            height,
            tiles: vec![None; count],
            regions: BTreeMap::new(),
        })
    }

    /// Map width in tiles.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Map height in tiles.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Whether the position lies on the map.
    pub const fn contains(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    fn tile_index(&self, pos: Position) -> Result<usize, WorldError> {
        let out_of_bounds = WorldError::OutOfBounds {
            x: pos.x,
            y: pos.y,
            width: self.width,
            height: self.height,
        };
        if !self.contains(pos) {
            return Err(out_of_bounds);
        }
        u64::from(pos.y)
            .checked_mul(u64::from(self.width))
            .and_then(|row| row.checked_add(u64::from(pos.x)))
            .and_then(|i| usize::try_from(i).ok())
            .ok_or(out_of_bounds)
    }

    // -------------------------------------------------------------------
    // Regions
    // -------------------------------------------------------------------

    /// Add a region to the map. It covers no tiles until assigned.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateRegion`] if the id is already present.
    pub fn add_region(&mut self, region: Region) -> Result<RegionId, WorldError> {
        let id = region.id;
        if self.regions.contains_key(&id) {
            return Err(WorldError::DuplicateRegion(id));
        }
        self.regions.insert(id, region);
        Ok(id)
    }

    /// Assign a tile to a region.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RegionNotFound`] or [`WorldError::OutOfBounds`].
    pub fn assign_tile(&mut self, pos: Position, region: RegionId) -> Result<(), WorldError> {
        if !self.regions.contains_key(&region) {
            return Err(WorldError::RegionNotFound(region));
        }
        let index = self.tile_index(pos)?;
        if let Some(tile) = self.tiles.get_mut(index) {
            *tile = Some(region);
        }
        Ok(())
    }

    /// Assign every tile in the inclusive rectangle `from..=to` to a region.
    ///
    /// # Errors
    ///
    /// Fails like [`assign_tile`](Self::assign_tile) on the first bad tile.
    pub fn assign_rect(
        &mut self,
        from: Position,
        to: Position,
        region: RegionId,
    ) -> Result<(), WorldError> {
        for y in from.y..=to.y {
            for x in from.x..=to.x {
                self.assign_tile(Position::new(x, y), region)?;
            }
        }
        Ok(())
    }

    /// Return the region covering a tile, if any.
    pub fn region_at(&self, pos: Position) -> Option<RegionId> {
        let index = self.tile_index(pos).ok()?;
        self.tiles.get(index).copied().flatten()
    }

    /// Get a region by id.
    pub fn get_region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(&id)
    }

    /// Get a region mutably by id.
    pub fn get_region_mut(&mut self, id: RegionId) -> Option<&mut Region> {
        self.regions.get_mut(&id)
    }

    /// Iterate over all regions in id order.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    /// Number of regions.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Collect the distinct regions touched by tiles within Manhattan
    /// distance `radius` of `center`, clipped to the map bounds.
    pub fn regions_within(&self, center: Position, radius: u32) -> BTreeSet<RegionId> {
        let mut found = BTreeSet::new();
        let start_x = center.x.saturating_sub(radius);
        let end_x = center.x.saturating_add(radius).min(self.width.saturating_sub(1));
        let start_y = center.y.saturating_sub(radius);
        let end_y = center.y.saturating_add(radius).min(self.height.saturating_sub(1));

        for y in start_y..=end_y {
            for x in start_x..=end_x {
                let pos = Position::new(x, y);
                if pos.manhattan(center) <= radius
                    && let Some(region) = self.region_at(pos)
                {
                    found.insert(region);
                }
            }
        }
        found
    }

    // -------------------------------------------------------------------
    // Occupancy
    // -------------------------------------------------------------------

    /// Return every agent that currently occupies some region.
    pub fn occupants(&self) -> BTreeSet<AgentId> {
        self.regions.values().filter_map(Region::occupant).collect()
    }

    /// Return the regions occupied by `agent`.
    pub fn occupied_by(&self, agent: AgentId) -> Vec<RegionId> {
        self.regions
            .values()
            .filter(|r| r.occupant() == Some(agent))
            .map(|r| r.id)
            .collect()
    }

    /// Assign `agent` as occupant of `region`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::RegionNotFound`] or the region's claim error.
    pub fn claim_region(&mut self, region: RegionId, agent: AgentId) -> Result<(), WorldError> {
        self.regions
            .get_mut(&region)
            .ok_or(WorldError::RegionNotFound(region))?
            .claim(agent)
    }

    /// Vacate every region held by `agent`, returning the vacated ids.
    pub fn vacate_all(&mut self, agent: AgentId) -> Vec<RegionId> {
        self.regions
            .values_mut()
            .filter_map(|r| r.vacate(agent).then_some(r.id))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::region::RegionKind;

    fn small_map() -> (WorldMap, RegionId, RegionId) {
        let mut map = WorldMap::new(10, 10).unwrap();
        let plains = map
            .add_region(Region::new("Plains", "flat", RegionKind::Wilderness))
            .unwrap();
        let cave = map.add_region(Region::cultivation("Cave", "damp", 5)).unwrap();
        map.assign_rect(Position::new(0, 0), Position::new(9, 4), plains)
            .unwrap();
        map.assign_tile(Position::new(5, 8), cave).unwrap();
        (map, plains, cave)
    }

    #[test]
    fn zero_sized_map_is_rejected() {
        assert!(WorldMap::new(0, 4).is_err());
        assert!(WorldMap::new(4, 0).is_err());
    }

    #[test]
    fn out_of_bounds_tile_is_rejected() {
        let (mut map, plains, _) = small_map();
        assert!(matches!(
            map.assign_tile(Position::new(10, 0), plains),
            Err(WorldError::OutOfBounds { .. })
        ));
        assert_eq!(map.region_at(Position::new(42, 42)), None);
    }

    #[test]
    fn radius_uses_manhattan_distance() {
        let (map, plains, cave) = small_map();
        // (5,5) -> (5,8) is distance 3.
        let near = map.regions_within(Position::new(5, 5), 2);
        assert!(near.contains(&plains));
        assert!(!near.contains(&cave));

        let far = map.regions_within(Position::new(5, 5), 3);
        assert!(far.contains(&cave));

        // (7,7) -> (5,8) is distance 3 even though it lies inside the 2-tile square.
        let diag = map.regions_within(Position::new(7, 7), 2);
        assert!(!diag.contains(&cave));
    }

    #[test]
    fn radius_is_clipped_to_bounds() {
        let (map, plains, _) = small_map();
        let found = map.regions_within(Position::new(0, 0), 100);
        assert!(found.contains(&plains));
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn vacate_all_clears_every_held_region() {
        let (mut map, _, cave) = small_map();
        let agent = AgentId::new();
        map.claim_region(cave, agent).unwrap();
        assert_eq!(map.occupied_by(agent), vec![cave]);
        assert!(map.occupants().contains(&agent));
        assert_eq!(map.vacate_all(agent), vec![cave]);
        assert!(map.occupied_by(agent).is_empty());
    }
}
