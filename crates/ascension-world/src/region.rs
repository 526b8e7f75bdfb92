//! Map regions and the occupiable capability.
//!
//! Occupancy is modelled as data on the region, never as a pointer to the
//! agent: the occupant is stored by [`AgentId`] and resolved through the
//! agent registry when needed. Whether a region can be occupied at all is a
//! property of its [`RegionKind`], queried through [`Region::occupancy`].

use ascension_types::{AgentId, RegionId};
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// The resident-owner slot of an occupiable region.
///
/// Holds at most one occupant at any time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupancy {
    /// Current occupant, if any.
    occupant: Option<AgentId>,
}

impl Occupancy {
    /// Return the current occupant.
    pub const fn occupant(&self) -> Option<AgentId> {
        self.occupant
    }

    /// Whether nobody occupies the region.
    pub const fn is_ownerless(&self) -> bool {
        self.occupant.is_none()
    }
}

/// What kind of area a region is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionKind {
    /// Untamed land; nobody can hold it.
    Wilderness,
    /// A mortal city.
    City,
    /// A sect's mountain gate.
    Sect,
    /// A cave abode with spiritual energy that a single cultivator may hold.
    Cultivation {
        /// Spiritual energy density, used by cultivation actions.
        essence_density: u32,
        /// The resident-owner slot.
        occupancy: Occupancy,
    },
}

/// A named area of the map made up of one or more tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    /// Unique region identifier.
    pub id: RegionId,
    /// Display name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Region kind and kind-specific state.
    pub kind: RegionKind,
}

impl Region {
    /// Create a region that cannot be occupied.
    pub fn new(name: impl Into<String>, description: impl Into<String>, kind: RegionKind) -> Self {
        Self {
            id: RegionId::new(),
            name: name.into(),
            description: description.into(),
            kind,
        }
    }

    /// Create an ownerless cultivation region.
    pub fn cultivation(
        name: impl Into<String>,
        description: impl Into<String>,
        essence_density: u32,
    ) -> Self {
        Self::new(
            name,
            description,
            RegionKind::Cultivation {
                essence_density,
                occupancy: Occupancy::default(),
            },
        )
    }

    /// Return the occupancy slot if this region is occupiable.
    pub const fn occupancy(&self) -> Option<&Occupancy> {
        match &self.kind {
            RegionKind::Cultivation { occupancy, .. } => Some(occupancy),
            RegionKind::Wilderness | RegionKind::City | RegionKind::Sect => None,
        }
    }

    /// Spiritual energy density; zero outside cultivation regions.
    pub const fn essence_density(&self) -> u32 {
        match &self.kind {
            RegionKind::Cultivation {
                essence_density, ..
            } => *essence_density,
            RegionKind::Wilderness | RegionKind::City | RegionKind::Sect => 0,
        }
    }

    /// Whether this region can have a resident owner.
    pub const fn is_occupiable(&self) -> bool {
        self.occupancy().is_some()
    }

    /// Return the current occupant, if the region is occupiable and held.
    pub fn occupant(&self) -> Option<AgentId> {
        self.occupancy().and_then(Occupancy::occupant)
    }

    /// Whether the region is occupiable and currently has no occupant.
    pub fn is_ownerless(&self) -> bool {
        self.occupancy().is_some_and(Occupancy::is_ownerless)
    }

    /// Assign `agent` as occupant.
    ///
    /// Claiming a region the agent already holds is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::NotOccupiable`] for non-occupiable regions and
    /// [`WorldError::AlreadyOccupied`] if someone else holds it.
    pub fn claim(&mut self, agent: AgentId) -> Result<(), WorldError> {
        let region = self.id;
        let RegionKind::Cultivation { occupancy, .. } = &mut self.kind else {
            return Err(WorldError::NotOccupiable(region));
        };
        match occupancy.occupant {
            Some(current) if current != agent => Err(WorldError::AlreadyOccupied {
                region,
                occupant: current,
            }),
            _ => {
                occupancy.occupant = Some(agent);
                Ok(())
            }
        }
    }

    /// Clear the occupant if it is `agent`. Returns whether anything changed.
    pub fn vacate(&mut self, agent: AgentId) -> bool {
        if let RegionKind::Cultivation { occupancy, .. } = &mut self.kind
            && occupancy.occupant == Some(agent)
        {
            occupancy.occupant = None;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_cultivation_regions_are_occupiable() {
        let cave = Region::cultivation("Cave", "damp", 3);
        let city = Region::new("City", "busy", RegionKind::City);
        assert!(cave.is_occupiable());
        assert!(cave.is_ownerless());
        assert!(!city.is_occupiable());
        assert!(!city.is_ownerless());
    }

    #[test]
    fn second_claimant_is_rejected() {
        let mut cave = Region::cultivation("Cave", "damp", 3);
        let first = AgentId::new();
        let second = AgentId::new();
        assert!(cave.claim(first).is_ok());
        assert!(cave.claim(first).is_ok());
        assert_eq!(
            cave.claim(second),
            Err(WorldError::AlreadyOccupied {
                region: cave.id,
                occupant: first,
            })
        );
        assert_eq!(cave.occupant(), Some(first));
    }

    #[test]
    fn claiming_a_city_fails() {
        let mut city = Region::new("City", "busy", RegionKind::City);
        assert_eq!(city.claim(AgentId::new()), Err(WorldError::NotOccupiable(city.id)));
    }

    #[test]
    fn vacate_only_clears_matching_occupant() {
        let mut cave = Region::cultivation("Cave", "damp", 3);
        let owner = AgentId::new();
        assert!(cave.claim(owner).is_ok());
        assert!(!cave.vacate(AgentId::new()));
        assert!(cave.vacate(owner));
        assert!(cave.is_ownerless());
    }
}
