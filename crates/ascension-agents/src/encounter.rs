//! Fortune and misfortune outcomes.
//!
//! Encounter checks run concurrently and only read the agent. They return
//! an [`Encounter`] describing what happened; the orchestrator applies the
//! effect afterwards, one agent at a time.

use ascension_types::Event;
use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::vitals::TemporaryEffect;

/// A state change caused by an encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterEffect {
    /// Found spirit stones.
    SpiritStones(u64),
    /// Gained cultivation insight.
    Insight(u32),
    /// Received a temporary effect.
    Blessing(TemporaryEffect),
    /// Took damage.
    Injury(i32),
    /// Lost spirit stones.
    Robbed(u64),
}

impl EncounterEffect {
    /// Apply the effect to the agent.
    pub fn apply(self, agent: &mut Agent) {
        match self {
            Self::SpiritStones(amount) => {
                agent.spirit_stones = agent.spirit_stones.saturating_add(amount);
            }
            Self::Insight(amount) => {
                agent.gain_cultivation(amount);
            }
            Self::Blessing(effect) => agent.apply_effect(effect),
            Self::Injury(amount) => agent.take_damage(amount),
            Self::Robbed(amount) => {
                agent.spirit_stones = agent.spirit_stones.saturating_sub(amount);
            }
        }
    }

    /// Whether the effect harms the agent.
    pub const fn is_harmful(&self) -> bool {
        matches!(self, Self::Injury(_) | Self::Robbed(_))
    }
}

/// The outcome of one triggered encounter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encounter {
    /// Event describing the encounter.
    pub event: Event,
    /// Effect to apply to the agent.
    pub effect: EncounterEffect,
}

impl Encounter {
    /// Apply the effect and hand back the event.
    pub fn resolve(self, agent: &mut Agent) -> Event {
        self.effect.apply(agent);
        self.event
    }
}
