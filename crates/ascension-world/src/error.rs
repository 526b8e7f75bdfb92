//! Error types for the `ascension-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`] through the
//! standard [`Result`] type alias.

use ascension_types::{AgentId, RegionId};

/// Errors that can occur during map and region operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// A region was not found in the map.
    #[error("region not found: {0}")]
    RegionNotFound(RegionId),

    /// A region with the same id was already added.
    #[error("duplicate region id: {0}")]
    DuplicateRegion(RegionId),

    /// A tile coordinate lies outside the map.
    #[error("tile ({x}, {y}) is outside the {width}x{height} map")]
    OutOfBounds {
        /// Column.
        x: u32,
        /// Row.
        y: u32,
        /// Map width.
        width: u32,
        /// Map height.
        height: u32,
    },

    /// The map dimensions are unusable.
    #[error("invalid map dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// The region cannot be occupied at all.
    #[error("region {0} is not occupiable")]
    NotOccupiable(RegionId),

    /// The region already has a different occupant.
    #[error("region {region} is already occupied by {occupant}")]
    AlreadyOccupied {
        /// The contested region.
        region: RegionId,
        /// The current occupant.
        occupant: AgentId,
    },
}
