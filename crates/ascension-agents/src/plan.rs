//! Queued plans and the action an avatar is currently carrying out.
//!
//! A decision service hands back an ordered chain of [`PlannedAction`]s.
//! The chain is loaded onto the agent without starting anything; the
//! commit phase later pops the head and turns it into an [`ActiveAction`].

use ascension_types::MonthStamp;
use serde::{Deserialize, Serialize};

/// One queued action specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedAction {
    /// Action name understood by the action executor (e.g. `"cultivate"`).
    pub name: String,
    /// Free-form parameters for the executor.
    pub params: serde_json::Value,
    /// Short human-readable description used in the "started" event.
    /// `None` means the action starts silently.
    pub announcement: Option<String>,
}

impl PlannedAction {
    /// Create a planned action with no parameters that starts silently.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: serde_json::Value::Null,
            announcement: None,
        }
    }

    /// Attach executor parameters.
    #[must_use]
    pub fn with_params(mut self, params: serde_json::Value) -> Self {
        self.params = params;
        self
    }

    /// Announce the action with the given text when it starts.
    #[must_use]
    pub fn announced(mut self, text: impl Into<String>) -> Self {
        self.announcement = Some(text.into());
        self
    }
}

/// The action an avatar is executing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveAction {
    /// Action name.
    pub name: String,
    /// Executor parameters.
    pub params: serde_json::Value,
    /// Month the action started.
    pub started_at: MonthStamp,
    /// How many times the executor has advanced this action.
    pub steps_taken: u32,
}

impl ActiveAction {
    /// Start a planned action at `now`.
    pub fn start(plan: PlannedAction, now: MonthStamp) -> Self {
        Self {
            name: plan.name,
            params: plan.params,
            started_at: now,
            steps_taken: 0,
        }
    }

    /// Record one executor step and return the new step count.
    pub const fn advance(&mut self) -> u32 {
        self.steps_taken = self.steps_taken.saturating_add(1);
        self.steps_taken
    }
}
