//! Shared type definitions for the Ascension simulation.
//!
//! This crate is the single source of truth for the value types that flow
//! between the world, agent, and orchestration crates.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for all entity identifiers
//! - [`calendar`] -- [`MonthStamp`] tick counter and [`Month`] of year
//! - [`event`] -- Immutable world [`Event`] records
//! - [`enums`] -- Gender, death causes, and metric tags
//! - [`metrics`] -- Per-month [`AvatarMetrics`] snapshots

pub mod calendar;
pub mod enums;
pub mod event;
pub mod ids;
pub mod metrics;

// Re-export all public types at crate root for convenience.
pub use calendar::{CalendarError, MONTHS_PER_YEAR, Month, MonthStamp};
pub use enums::{DeathCause, Gender, MetricTag};
pub use event::Event;
pub use ids::{AgentId, EventId, RegionId};
pub use metrics::AvatarMetrics;
