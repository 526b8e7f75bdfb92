//! Death handling: the world-side consequences of an agent dying.
//!
//! The death phase decides *that* an agent dies and emits the event; the
//! [`DeathHandler`] applies what follows. [`StandardDeathHandler`] flags the
//! agent dead (it stays in the registry) and vacates every region it
//! occupied.

use ascension_agents::AgentError;
use ascension_types::{AgentId, DeathCause};
use tracing::info;

use crate::world::World;

/// Applies the consequences of a death.
pub trait DeathHandler: Send + Sync {
    /// Apply the death of `agent` from `cause` to `world`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::AgentNotFound`] if the agent does not exist.
    fn handle(&self, world: &mut World, agent: AgentId, cause: DeathCause)
    -> Result<(), AgentError>;
}

/// The default death handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardDeathHandler;

impl DeathHandler for StandardDeathHandler {
    fn handle(
        &self,
        world: &mut World,
        agent: AgentId,
        cause: DeathCause,
    ) -> Result<(), AgentError> {
        let now = world.month_stamp;
        let target = world.registry.require_mut(agent)?;
        if !target.mark_dead(now, cause) {
            return Ok(());
        }
        let vacated = world.map.vacate_all(agent);
        info!(
            month = %now,
            agent_id = %agent,
            cause = ?cause,
            vacated = vacated.len(),
            "Agent died"
        );
        Ok(())
    }
}
