//! Rule-based persona service.
//!
//! Long-term objectives follow the agent's realm: each realm has one
//! ambition, set when the agent first has none and revised on entering a
//! new realm. Nicknames are earned once, on reaching Foundation, from a
//! fixed epithet list chosen by agent id.

use ascension_agents::{Agent, Realm};
use ascension_core::encounter::ServiceError;
use ascension_core::persona::{PersonaService, PersonaUpdate};
use ascension_types::{Event, MonthStamp};

/// Level at which a cultivator's name starts to travel.
const NICKNAME_LEVEL: u32 = 31;

const EPITHETS: &[&str] = &[
    "Azure Sword",
    "Iron Palm",
    "Silent Lotus",
    "Crimson Phoenix",
    "Frost Blade",
    "Thunder Step",
    "Jade Serpent",
    "Wandering Cloud",
];

fn ambition(realm: Realm) -> &'static str {
    match realm {
        Realm::QiRefinement => "lay a flawless foundation",
        Realm::Foundation => "condense a golden core",
        Realm::CoreFormation => "give birth to a nascent soul",
        Realm::NascentSoul => "seek the path beyond mortality",
    }
}

fn epithet_for(agent: &Agent) -> &'static str {
    let (_, low) = agent.id.into_inner().as_u64_pair();
    let len = u64::try_from(EPITHETS.len()).unwrap_or(1);
    usize::try_from(low.checked_rem(len).unwrap_or(0))
        .ok()
        .and_then(|i| EPITHETS.get(i))
        .copied()
        .unwrap_or("Nameless")
}

/// Revises objectives and nicknames from cultivation progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedPersona;

#[async_trait::async_trait]
impl PersonaService for RuleBasedPersona {
    async fn nickname(
        &self,
        agent: &Agent,
        now: MonthStamp,
    ) -> Result<Option<PersonaUpdate>, ServiceError> {
        if agent.nickname.is_some() || agent.cultivation.level < NICKNAME_LEVEL {
            return Ok(None);
        }
        let epithet = epithet_for(agent);
        Ok(Some(PersonaUpdate {
            value: epithet.to_owned(),
            event: Some(Event::about(
                now,
                format!(
                    "Word of {}'s deeds spreads; the world now calls them the {epithet}.",
                    agent.name
                ),
                agent.id,
            )),
        }))
    }

    async fn long_term_objective(
        &self,
        agent: &Agent,
        now: MonthStamp,
    ) -> Result<Option<PersonaUpdate>, ServiceError> {
        let target = ambition(agent.cultivation.realm());
        let text = match agent.long_term_objective.as_deref() {
            Some(current) if current == target => return Ok(None),
            Some(_) => format!(
                "Having surpassed old ambitions, {} now resolves to {target}.",
                agent.display_name()
            ),
            None => format!("{} vows to {target}.", agent.display_name()),
        };
        Ok(Some(PersonaUpdate {
            value: target.to_owned(),
            event: Some(Event::about(now, text, agent.id)),
        }))
    }
}
