//! Avatar state, plans, relations, and lifecycle for the Ascension simulation.
//!
//! This crate contains the logic layer for avatars -- everything that
//! operates on agent state without touching I/O or the tick schedule. It
//! sits between `ascension-types`/`ascension-world` and the orchestration
//! crate.
//!
//! # Modules
//!
//! - [`agent`] -- The [`Agent`] entity and its per-agent operations
//! - [`awakening`] -- Creation of newly awakened cultivators
//! - [`death`] -- Non-combat death checks
//! - [`encounter`] -- Fortune and misfortune outcomes applied to an agent
//! - [`error`] -- Error types for all agent operations ([`AgentError`])
//! - [`perception`] -- Observation radius derived from cultivation realm
//! - [`plan`] -- Queued plans and the action in progress
//! - [`registry`] -- The [`AgentRegistry`] owning every agent
//! - [`social`] -- Interaction counters and relations
//! - [`vitals`] -- Age, health, cultivation, and temporary effects

pub mod agent;
pub mod awakening;
pub mod death;
pub mod encounter;
pub mod error;
pub mod perception;
pub mod plan;
pub mod registry;
pub mod social;
pub mod vitals;

// Re-export primary types at crate root for convenience.
pub use agent::{Agent, DeathRecord};
pub use awakening::{AwakeningParams, awaken_random_mortal};
pub use death::check_death;
pub use encounter::{Encounter, EncounterEffect};
pub use error::AgentError;
pub use perception::observation_radius;
pub use plan::{ActiveAction, PlannedAction};
pub use registry::AgentRegistry;
pub use social::{InteractionState, Relation};
pub use vitals::{Age, Cultivation, Health, Realm, TemporaryEffect};
