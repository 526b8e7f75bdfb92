//! Interaction bookkeeping and the relation scheduler.
//!
//! Interaction counting runs twice per step: once after action execution
//! and once after the remaining phases. [`InteractionLedger`] remembers
//! which event ids it has already counted so that no event is counted twice
//! within one step.
//!
//! [`schedule_relation_pairs`] collects every unordered pair whose counter
//! reached the threshold, keyed by the smaller id first, and resets both
//! sides before the pairs go to the resolver.

use std::collections::BTreeSet;

use ascension_agents::{AgentError, AgentRegistry};
use ascension_types::{AgentId, Event, EventId};
use tracing::debug;

/// Tracks which events have been counted as interactions during a step.
#[derive(Debug, Clone, Default)]
pub struct InteractionLedger {
    processed: BTreeSet<EventId>,
}

impl InteractionLedger {
    /// Create an empty ledger.
    pub const fn new() -> Self {
        Self {
            processed: BTreeSet::new(),
        }
    }

    /// Count interactions for every event not seen before.
    ///
    /// An event with two or more related agents adds one interaction to
    /// every pair of distinct agents it names. Agents missing from the
    /// registry are skipped. Returns how many events were counted.
    pub fn process(&mut self, registry: &mut AgentRegistry, events: &[Event]) -> usize {
        let mut counted: usize = 0;
        for event in events {
            if !self.processed.insert(event.id()) || !event.is_interaction() {
                continue;
            }
            let participants: Vec<AgentId> = event
                .related_agents()
                .iter()
                .copied()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .filter(|id| registry.get(*id).is_some())
                .collect();
            for (i, a) in participants.iter().enumerate() {
                for b in participants.iter().skip(i.saturating_add(1)) {
                    if let Err(err) = registry.record_interaction(*a, *b) {
                        debug!(error = %err, "Skipped interaction");
                    }
                }
            }
            counted = counted.saturating_add(1);
        }
        counted
    }

    /// Whether an event has been processed.
    pub fn contains(&self, id: EventId) -> bool {
        self.processed.contains(&id)
    }
}

/// Collect the pairs due for relation resolution and reset their counters.
///
/// A pair is due when either living side's counter toward a living peer
/// has reached `threshold`. Each unordered pair is returned at most once,
/// smaller id first, in the order it was first found. Both sides' counters
/// are reset to zero and their check counts incremented before returning.
///
/// # Errors
///
/// Returns [`AgentError`] if a scheduled agent disappears from the registry.
pub fn schedule_relation_pairs(
    registry: &mut AgentRegistry,
    threshold: u32,
) -> Result<Vec<(AgentId, AgentId)>, AgentError> {
    let mut seen = BTreeSet::new();
    let mut pairs = Vec::new();

    for agent in registry.living() {
        for peer in agent.peers_at_threshold(threshold) {
            if peer == agent.id || !registry.is_alive(peer) {
                continue;
            }
            let key = if agent.id < peer {
                (agent.id, peer)
            } else {
                (peer, agent.id)
            };
            if seen.insert(key) {
                pairs.push(key);
            }
        }
    }

    for (a, b) in &pairs {
        registry.mark_pair_checked(*a, *b)?;
    }
    Ok(pairs)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use ascension_agents::{Age, Agent};
    use ascension_types::{DeathCause, Gender, MonthStamp};
    use ascension_world::Position;

    use super::*;

    fn registry_with(n: usize) -> (AgentRegistry, Vec<AgentId>) {
        let mut reg = AgentRegistry::new();
        let ids = (0..n)
            .map(|i| {
                let agent = Agent::new(
                    format!("Agent {i}"),
                    Gender::Male,
                    Age::from_years(20, 80),
                    Position::new(0, 0),
                    MonthStamp::new(0),
                );
                reg.register(agent, false).unwrap()
            })
            .collect();
        (reg, ids)
    }

    #[test]
    fn events_are_counted_once() {
        let (mut reg, ids) = registry_with(3);
        let event = Event::new(MonthStamp::new(0), "duel", vec![ids[0], ids[1]]);
        let solo = Event::about(MonthStamp::new(0), "meditates", ids[2]);
        let mut ledger = InteractionLedger::new();

        let batch = vec![event.clone(), solo, event.clone()];
        assert_eq!(ledger.process(&mut reg, &batch), 1);
        assert_eq!(ledger.process(&mut reg, &[event]), 0);
        assert_eq!(reg.get(ids[0]).unwrap().interactions[&ids[1]].count, 1);
        assert_eq!(reg.get(ids[1]).unwrap().interactions[&ids[0]].count, 1);
        assert!(reg.get(ids[2]).unwrap().interactions.is_empty());
    }

    #[test]
    fn three_party_event_counts_every_pair() {
        let (mut reg, ids) = registry_with(3);
        let event = Event::new(MonthStamp::new(0), "tea", ids.clone());
        InteractionLedger::new().process(&mut reg, &[event]);
        for a in &ids {
            let agent = reg.get(*a).unwrap();
            assert_eq!(agent.interactions.len(), 2);
            assert!(agent.interactions.values().all(|s| s.count == 1));
        }
    }

    #[test]
    fn pair_scheduled_once_and_both_sides_reset() {
        let (mut reg, ids) = registry_with(2);
        for _ in 0..3 {
            reg.record_interaction(ids[0], ids[1]).unwrap();
        }
        let pairs = schedule_relation_pairs(&mut reg, 3).unwrap();
        assert_eq!(pairs.len(), 1);
        let (a, b) = pairs[0];
        assert!(a < b);
        for (x, y) in [(ids[0], ids[1]), (ids[1], ids[0])] {
            let state = reg.get(x).unwrap().interactions[&y];
            assert_eq!(state.count, 0);
            assert_eq!(state.checked_times, 1);
        }
        assert!(schedule_relation_pairs(&mut reg, 3).unwrap().is_empty());
    }

    #[test]
    fn below_threshold_not_scheduled() {
        let (mut reg, ids) = registry_with(2);
        reg.record_interaction(ids[0], ids[1]).unwrap();
        assert!(schedule_relation_pairs(&mut reg, 2).unwrap().is_empty());
        assert_eq!(reg.get(ids[0]).unwrap().interactions[&ids[1]].count, 1);
    }

    #[test]
    fn dead_peer_skipped() {
        let (mut reg, ids) = registry_with(2);
        for _ in 0..3 {
            reg.record_interaction(ids[0], ids[1]).unwrap();
        }
        reg.get_mut(ids[1])
            .unwrap()
            .mark_dead(MonthStamp::new(0), DeathCause::OldAge);
        assert!(schedule_relation_pairs(&mut reg, 3).unwrap().is_empty());
        assert_eq!(reg.get(ids[0]).unwrap().interactions[&ids[1]].count, 3);
    }
}
