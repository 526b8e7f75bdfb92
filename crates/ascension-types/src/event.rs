//! Immutable world events.
//!
//! An [`Event`] records something that happened during a tick. Its
//! [`EventId`] is its identity: clones of an event are the same occurrence,
//! and the step orchestrator deduplicates and archives by id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::MonthStamp;
use crate::ids::{AgentId, EventId};

/// A single occurrence in the simulated world.
///
/// Fields are private so an event cannot be altered after construction;
/// in particular the related-agent list never changes once set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique event identifier.
    id: EventId,
    /// The month in which the event occurred.
    timestamp: MonthStamp,
    /// Human-readable description.
    description: String,
    /// Agents involved, in the order the emitter listed them.
    related_agents: Vec<AgentId>,
    /// Real-world timestamp when the event was created.
    created_at: DateTime<Utc>,
}

impl Event {
    /// Create a new event with a fresh identity.
    pub fn new(
        timestamp: MonthStamp,
        description: impl Into<String>,
        related_agents: Vec<AgentId>,
    ) -> Self {
        Self {
            id: EventId::new(),
            timestamp,
            description: description.into(),
            related_agents,
            created_at: Utc::now(),
        }
    }

    /// Create an event that concerns the world rather than any agent.
    pub fn world(timestamp: MonthStamp, description: impl Into<String>) -> Self {
        Self::new(timestamp, description, Vec::new())
    }

    /// Create an event concerning a single agent.
    pub fn about(timestamp: MonthStamp, description: impl Into<String>, agent: AgentId) -> Self {
        Self::new(timestamp, description, vec![agent])
    }

    /// Return the event identifier.
    pub const fn id(&self) -> EventId {
        self.id
    }

    /// Return the month the event occurred in.
    pub const fn timestamp(&self) -> MonthStamp {
        self.timestamp
    }

    /// Return the description text.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Return the related agents.
    pub fn related_agents(&self) -> &[AgentId] {
        &self.related_agents
    }

    /// Return when the event record was created.
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether the event involves two or more agents and so counts as an
    /// interaction between them.
    pub fn is_interaction(&self) -> bool {
        self.related_agents.len() >= 2
    }

    /// Whether the given agent is among the related agents.
    pub fn involves(&self, agent: AgentId) -> bool {
        self.related_agents.contains(&agent)
    }
}

impl core::fmt::Display for Event {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{}] {}", self.timestamp, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_identity() {
        let event = Event::world(MonthStamp::new(12), "the sky darkens");
        let copy = event.clone();
        assert_eq!(event.id(), copy.id());
    }

    #[test]
    fn independently_built_events_differ() {
        let a = Event::world(MonthStamp::new(12), "same text");
        let b = Event::world(MonthStamp::new(12), "same text");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn interaction_requires_two_agents() {
        let one = Event::about(MonthStamp::new(0), "alone", AgentId::new());
        let two = Event::new(
            MonthStamp::new(0),
            "duel",
            vec![AgentId::new(), AgentId::new()],
        );
        assert!(!one.is_interaction());
        assert!(two.is_interaction());
    }

    #[test]
    fn display_includes_stamp() {
        let event = Event::world(MonthStamp::new(1201), "rain");
        assert_eq!(event.to_string(), "[100y2m] rain");
    }
}
