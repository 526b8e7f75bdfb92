//! Annual tournament gathering.
//!
//! Once a year, in the configured month, the strongest living cultivators
//! meet in a single-elimination bracket. Every bout is an interaction
//! between both fighters; losers are wounded and the champion takes the
//! prize in spirit stones.

use ascension_core::gathering::{GatheringError, GatheringManager};
use ascension_core::world::World;
use ascension_types::{AgentId, Event, MetricTag, Month};
use rand::Rng;
use tracing::info;

/// Display name of the gathering.
const TOURNAMENT_NAME: &str = "Heaven Ladder Tournament";

/// Holds the annual tournament.
#[derive(Debug, Clone)]
pub struct TournamentManager {
    month: Month,
    max_entrants: usize,
    prize: u64,
    last_held_year: Option<u64>,
}

impl TournamentManager {
    /// Create a manager holding the tournament every `month`.
    pub const fn new(month: Month, max_entrants: usize, prize: u64) -> Self {
        Self {
            month,
            max_entrants,
            prize,
            last_held_year: None,
        }
    }
}

impl Default for TournamentManager {
    fn default() -> Self {
        Self::new(Month::September, 8, 100)
    }
}

fn name_of(world: &World, id: AgentId) -> Result<String, GatheringError> {
    world
        .registry
        .get(id)
        .map(ascension_agents::Agent::display_name)
        .ok_or_else(|| GatheringError::Internal {
            message: format!("tournament entrant {id} vanished"),
        })
}

/// Fight one bout and return `(winner, loser)`.
fn bout(world: &mut World, a: AgentId, b: AgentId) -> Result<(AgentId, AgentId), GatheringError> {
    let power = |world: &World, id: AgentId| {
        world
            .registry
            .get(id)
            .map_or(0, |agent| agent.cultivation.level.saturating_mul(10))
    };
    let roll_a = power(world, a).saturating_add(world.rng.random_range(0..=25));
    let roll_b = power(world, b).saturating_add(world.rng.random_range(0..=25));
    let (winner, loser) = if roll_a >= roll_b { (a, b) } else { (b, a) };

    let wound = world.rng.random_range(5..=20);
    let loser_agent = world
        .registry
        .get_mut(loser)
        .ok_or_else(|| GatheringError::Internal {
            message: format!("tournament entrant {loser} vanished"),
        })?;
    loser_agent.take_damage(wound);
    loser_agent.pending_tags.push(MetricTag::Battle);
    if let Some(winner_agent) = world.registry.get_mut(winner) {
        winner_agent.pending_tags.push(MetricTag::Battle);
    }
    Ok((winner, loser))
}

#[async_trait::async_trait]
impl GatheringManager for TournamentManager {
    async fn check_and_run_all(&mut self, world: &mut World) -> Result<Vec<Event>, GatheringError> {
        let now = world.month_stamp;
        if now.month() != self.month || self.last_held_year == Some(now.year()) {
            return Ok(Vec::new());
        }
        self.last_held_year = Some(now.year());

        let mut contenders: Vec<(u32, AgentId)> = world
            .registry
            .living()
            .map(|agent| (agent.cultivation.level, agent.id))
            .collect();
        contenders.sort_by(|x, y| y.0.cmp(&x.0).then(x.1.cmp(&y.1)));
        let mut bracket: Vec<AgentId> = contenders
            .into_iter()
            .take(self.max_entrants)
            .map(|(_, id)| id)
            .collect();
        if bracket.len() < 2 {
            return Ok(Vec::new());
        }

        let mut events = vec![Event::new(
            now,
            format!(
                "The {TOURNAMENT_NAME} opens with {} contenders.",
                bracket.len()
            ),
            bracket.clone(),
        )];

        while bracket.len() > 1 {
            let mut next_round = Vec::new();
            for pair in bracket.chunks(2) {
                match *pair {
                    [a, b] => {
                        let (winner, loser) = bout(world, a, b)?;
                        events.push(Event::new(
                            now,
                            format!(
                                "{} defeated {} in the {TOURNAMENT_NAME}.",
                                name_of(world, winner)?,
                                name_of(world, loser)?
                            ),
                            vec![winner, loser],
                        ));
                        next_round.push(winner);
                    }
                    [bye] => next_round.push(bye),
                    _ => {}
                }
            }
            bracket = next_round;
        }

        if let Some(&champion) = bracket.first() {
            let name = name_of(world, champion)?;
            if let Some(agent) = world.registry.get_mut(champion) {
                agent.spirit_stones = agent.spirit_stones.saturating_add(self.prize);
            }
            info!(month = %now, agent_id = %champion, prize = self.prize, "Tournament champion crowned");
            events.push(Event::about(
                now,
                format!(
                    "{name} was crowned champion of the {TOURNAMENT_NAME} and won {} spirit stones.",
                    self.prize
                ),
                champion,
            ));
        }
        Ok(events)
    }
}
