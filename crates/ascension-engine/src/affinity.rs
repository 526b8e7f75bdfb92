//! Affinity-based relationship resolver.
//!
//! Every scheduled pair rolls an affinity score in `0..100` from a seed
//! shared by both sides, so the outcome does not depend on which side is
//! listed first. The score moves the pair along these transitions:
//!
//! | From | Score | To |
//! |------|-------|----|
//! | none | >= 60 | Friend |
//! | none | < 25 | Rival |
//! | Friend | >= 50, checked at least 3 times | Lover (different gender) or SwornSibling |
//! | Friend | < 15 | none |
//! | Rival | < 30 | Enemy |
//! | Rival | >= 80 | Friend |
//!
//! Lover, SwornSibling and Enemy are final.

use ascension_agents::{AgentRegistry, Relation};
use ascension_core::relation::{RelationError, RelationshipResolver};
use ascension_core::world::derive_seed;
use ascension_types::{AgentId, Event, MonthStamp};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Checks needed before friends may deepen their bond.
const DEEPEN_AFTER_CHECKS: u32 = 3;

/// Resolves relation changes from a seeded affinity roll.
#[derive(Debug, Clone, Copy)]
pub struct AffinityResolver {
    seed: u64,
}

impl AffinityResolver {
    /// Create a resolver drawing from `seed`.
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn score(&self, now: MonthStamp, a: AgentId, b: AgentId) -> u32 {
        let pair_seed = derive_seed(self.seed, now, a) ^ derive_seed(self.seed, now, b);
        SmallRng::seed_from_u64(pair_seed).random_range(0..100)
    }
}

/// The relation a pair moves to, or `None` for no change.
fn transition(
    current: Option<Relation>,
    score: u32,
    checked_times: u32,
    same_gender: bool,
) -> Option<Option<Relation>> {
    match current {
        None if score >= 60 => Some(Some(Relation::Friend)),
        None if score < 25 => Some(Some(Relation::Rival)),
        Some(Relation::Friend) if score >= 50 && checked_times >= DEEPEN_AFTER_CHECKS => {
            Some(Some(if same_gender {
                Relation::SwornSibling
            } else {
                Relation::Lover
            }))
        }
        Some(Relation::Friend) if score < 15 => Some(None),
        Some(Relation::Rival) if score < 30 => Some(Some(Relation::Enemy)),
        Some(Relation::Rival) if score >= 80 => Some(Some(Relation::Friend)),
        _ => None,
    }
}

fn describe(a: &str, b: &str, from: Option<Relation>, to: Option<Relation>) -> String {
    match (from, to) {
        (_, None) => format!("{a} and {b} drifted apart."),
        (Some(Relation::Rival), Some(Relation::Friend)) => {
            format!("{a} and {b} set aside their rivalry and became friends.")
        }
        (_, Some(Relation::Friend)) => format!("{a} and {b} became friends."),
        (_, Some(Relation::Rival)) => format!("{a} and {b} became rivals."),
        (_, Some(Relation::Enemy)) => format!("{a} and {b} became bitter enemies."),
        (_, Some(Relation::Lover)) => format!("{a} and {b} became dao companions."),
        (_, Some(Relation::SwornSibling)) => format!("{a} and {b} swore an oath of brotherhood."),
    }
}

fn internal(err: &ascension_agents::AgentError) -> RelationError {
    RelationError::Internal {
        message: err.to_string(),
    }
}

#[async_trait::async_trait]
impl RelationshipResolver for AffinityResolver {
    async fn run_batch(
        &self,
        registry: &mut AgentRegistry,
        pairs: &[(AgentId, AgentId)],
        now: MonthStamp,
    ) -> Result<Vec<Event>, RelationError> {
        let mut events = Vec::new();
        for &(a, b) in pairs {
            let (left, right) = registry.get_pair_mut(a, b).map_err(|e| internal(&e))?;
            let current = left.relations.get(&b).copied();
            let checked = left.interactions.get(&b).map_or(0, |s| s.checked_times);
            let score = self.score(now, a, b);
            let same_gender = left.gender == right.gender;

            let Some(next) = transition(current, score, checked, same_gender) else {
                continue;
            };
            let text = describe(&left.display_name(), &right.display_name(), current, next);

            match next {
                Some(relation) => registry
                    .set_relation(a, b, relation)
                    .map_err(|e| internal(&e))?,
                None => {
                    registry.clear_relation(a, b).map_err(|e| internal(&e))?;
                }
            }
            debug!(month = %now, score, from = ?current, to = ?next, "Relation changed");
            events.push(Event::new(now, text, vec![a, b]));
        }
        Ok(events)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use ascension_agents::{Age, Agent};
    use ascension_types::Gender;
    use ascension_world::Position;

    use super::*;

    #[test]
    fn strangers_warm_or_sour() {
        assert_eq!(transition(None, 70, 1, true), Some(Some(Relation::Friend)));
        assert_eq!(transition(None, 10, 1, true), Some(Some(Relation::Rival)));
        assert_eq!(transition(None, 40, 1, true), None);
    }

    #[test]
    fn friends_deepen_only_after_repeated_checks() {
        assert_eq!(transition(Some(Relation::Friend), 90, 1, false), None);
        assert_eq!(
            transition(Some(Relation::Friend), 90, 3, false),
            Some(Some(Relation::Lover))
        );
        assert_eq!(
            transition(Some(Relation::Friend), 90, 3, true),
            Some(Some(Relation::SwornSibling))
        );
        assert_eq!(transition(Some(Relation::Friend), 5, 1, true), Some(None));
    }

    #[test]
    fn final_relations_never_change() {
        for relation in [Relation::Enemy, Relation::Lover, Relation::SwornSibling] {
            for score in [0, 50, 99] {
                assert_eq!(transition(Some(relation), score, 10, true), None);
            }
        }
    }

    #[test]
    fn score_is_symmetric() {
        let resolver = AffinityResolver::new(9);
        let (a, b) = (AgentId::new(), AgentId::new());
        let now = MonthStamp::new(1300);
        assert_eq!(resolver.score(now, a, b), resolver.score(now, b, a));
        assert!(resolver.score(now, a, b) < 100);
    }

    #[tokio::test]
    async fn batch_applies_symmetric_changes() {
        let mut registry = AgentRegistry::new();
        let mut ids = Vec::new();
        for name in ["Hua Rong", "Jin Yu"] {
            let agent = Agent::new(
                name,
                Gender::Male,
                Age::from_years(20, 80),
                Position::new(0, 0),
                MonthStamp::new(0),
            );
            ids.push(registry.register(agent, false).unwrap());
        }
        let pair = (ids[0].min(ids[1]), ids[0].max(ids[1]));
        let resolver = AffinityResolver::new(1);

        let mut changed = 0;
        for month in 0..24 {
            let events = resolver
                .run_batch(&mut registry, &[pair], MonthStamp::new(month))
                .await
                .unwrap();
            assert!(events.len() <= 1);
            changed += events.len();
            let left = registry.get(pair.0).unwrap().relations.get(&pair.1).copied();
            let right = registry.get(pair.1).unwrap().relations.get(&pair.0).copied();
            assert_eq!(left, right);
        }
        assert!(changed > 0);
    }
}
