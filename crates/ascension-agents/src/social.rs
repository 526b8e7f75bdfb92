//! Interaction counters and relations between avatars.
//!
//! Every event that names two or more avatars counts as an interaction
//! between each pair it names. Once a pair has interacted often enough the
//! relationship scheduler hands it to a resolver, which may set a
//! [`Relation`]. Counters are kept on both sides and are always reset
//! together.

use serde::{Deserialize, Serialize};

/// Per-peer interaction bookkeeping held by one avatar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionState {
    /// Interactions since the pair was last checked.
    pub count: u32,
    /// How many times the pair has been submitted for resolution.
    pub checked_times: u32,
}

impl InteractionState {
    /// Count one more interaction.
    pub const fn record(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    /// Reset the counter and note that the pair was checked.
    pub const fn mark_checked(&mut self) {
        self.count = 0;
        self.checked_times = self.checked_times.saturating_add(1);
    }
}

/// An established relation between two avatars.
///
/// Relations are symmetric: both sides always hold the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// Friends.
    Friend,
    /// Friendly competitors.
    Rival,
    /// Dao companions.
    Lover,
    /// Sworn brothers or sisters.
    SwornSibling,
    /// Mortal enemies.
    Enemy,
}

impl core::fmt::Display for Relation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Friend => write!(f, "friends"),
            Self::Rival => write!(f, "rivals"),
            Self::Lover => write!(f, "dao companions"),
            Self::SwornSibling => write!(f, "sworn siblings"),
            Self::Enemy => write!(f, "enemies"),
        }
    }
}
