//! Non-combat death conditions.
//!
//! Combat deaths are applied by actions while they execute. The monthly
//! death phase only checks the two remaining conditions, in priority order:
//!
//! 1. Health at or below zero: death by serious injury
//! 2. Age at or past lifespan: death by old age

use ascension_types::DeathCause;

use crate::agent::Agent;

/// Check whether a living agent meets a non-combat death condition.
///
/// Returns `Some(cause)` if the agent must die, `None` otherwise. Dead
/// agents always return `None`. This only inspects state.
pub fn check_death(agent: &Agent) -> Option<DeathCause> {
    if !agent.is_alive() {
        return None;
    }
    if agent.health.is_depleted() {
        return Some(DeathCause::SeriousInjury);
    }
    if agent.age.is_exhausted() {
        return Some(DeathCause::OldAge);
    }
    None
}
