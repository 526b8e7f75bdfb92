//! Configuration, collaborators, and the monthly step orchestrator for the
//! Ascension simulation.
//!
//! This crate owns the fixed-order phase pipeline that advances the world
//! by one month, the traits through which it reaches external services,
//! and the bounded runner loop around it.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `ascension-config.yaml` into
//!   strongly-typed structs.
//! - [`decision`] -- [`DecisionService`] trait and [`StubDecisionService`].
//! - [`executor`] -- [`ActionExecutor`] trait for per-agent action steps.
//! - [`relation`] -- [`RelationshipResolver`] trait for batch relation changes.
//! - [`gathering`] -- [`GatheringManager`] trait for multi-agent events.
//! - [`encounter`] -- [`EncounterService`] trait for fortune and misfortune.
//! - [`persona`] -- [`PersonaService`] trait for nicknames and long-term goals.
//! - [`death`] -- [`DeathHandler`] trait and [`StandardDeathHandler`].
//! - [`world`] -- The [`World`] aggregate passed through every phase.
//! - [`perception`] -- Region discovery and auto-occupation.
//! - [`social`] -- Interaction bookkeeping and the relation scheduler.
//! - [`tick`] -- The [`Simulator`] and its monthly step.
//! - [`runner`] -- Bounded simulation loop.
//!
//! [`DecisionService`]: decision::DecisionService
//! [`StubDecisionService`]: decision::StubDecisionService
//! [`ActionExecutor`]: executor::ActionExecutor
//! [`RelationshipResolver`]: relation::RelationshipResolver
//! [`GatheringManager`]: gathering::GatheringManager
//! [`EncounterService`]: encounter::EncounterService
//! [`PersonaService`]: persona::PersonaService
//! [`DeathHandler`]: death::DeathHandler
//! [`StandardDeathHandler`]: death::StandardDeathHandler
//! [`World`]: world::World
//! [`Simulator`]: tick::Simulator

pub mod config;
pub mod death;
pub mod decision;
pub mod encounter;
pub mod executor;
pub mod gathering;
pub mod perception;
pub mod persona;
pub mod relation;
pub mod runner;
pub mod social;
pub mod tick;
pub mod world;
