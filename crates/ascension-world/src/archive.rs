//! Append-only archive of every event the world has produced.

use std::collections::BTreeMap;

use ascension_types::{AgentId, Event, EventId};
use tracing::debug;

/// Append-only event store with an id index.
///
/// Adding an event whose id is already archived is ignored.
#[derive(Debug, Clone, Default)]
pub struct EventArchive {
    /// Events in archival order.
    events: Vec<Event>,
    /// Position of each event in `events`.
    index: BTreeMap<EventId, usize>,
}

impl EventArchive {
    /// Create an empty archive.
    pub const fn new() -> Self {
        Self {
            events: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// Append an event. Returns `false` if the id was already archived.
    pub fn add(&mut self, event: Event) -> bool {
        let id = event.id();
        if self.index.contains_key(&id) {
            debug!(event_id = %id, "Event already archived, skipping");
            return false;
        }
        self.index.insert(id, self.events.len());
        self.events.push(event);
        true
    }

    /// Look up an event by id.
    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.index.get(&id).and_then(|&i| self.events.get(i))
    }

    /// Number of archived events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the archive is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// All events in archival order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events that involve `agent`, in archival order.
    pub fn events_for_agent(&self, agent: AgentId) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.involves(agent))
    }

    /// The most recent `count` events, oldest first.
    pub fn latest(&self, count: usize) -> &[Event] {
        let start = self.events.len().saturating_sub(count);
        self.events.get(start..).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use ascension_types::MonthStamp;

    use super::*;

    #[test]
    fn duplicate_ids_are_ignored() {
        let mut archive = EventArchive::new();
        let event = Event::world(MonthStamp::new(1), "storm");
        assert!(archive.add(event.clone()));
        assert!(!archive.add(event.clone()));
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.get(event.id()), Some(&event));
    }

    #[test]
    fn filters_by_agent_and_recency() {
        let mut archive = EventArchive::new();
        let agent = AgentId::new();
        archive.add(Event::world(MonthStamp::new(1), "a"));
        archive.add(Event::about(MonthStamp::new(2), "b", agent));
        archive.add(Event::world(MonthStamp::new(3), "c"));

        let mine: Vec<_> = archive.events_for_agent(agent).collect();
        assert_eq!(mine.len(), 1);

        let latest = archive.latest(2);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest.first().map(Event::description), Some("b"));
        assert_eq!(archive.latest(10).len(), 3);
    }
}
