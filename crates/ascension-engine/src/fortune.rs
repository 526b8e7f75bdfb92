//! Rate-based fortune and misfortune.
//!
//! Each check builds its own random source from the agent's per-month seed
//! (salted by kind), so concurrent checks never share state and always
//! agree for the same world. The base rates are scaled by the current
//! phenomenon's fortune and misfortune percentages.

use ascension_agents::{Agent, Encounter, EncounterEffect, TemporaryEffect};
use ascension_core::encounter::{EncounterContext, EncounterService, ServiceError};
use ascension_types::{Event, MonthStamp};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const FORTUNE_SALT: u64 = 0x0F0F_F0F0_5EED_0001;
const MISFORTUNE_SALT: u64 = 0xF0F0_0F0F_5EED_0002;

/// Months a spirit fruit blessing lasts.
const BLESSING_MONTHS: u64 = 6;

/// Rolls encounters at fixed monthly rates.
#[derive(Debug, Clone, Copy)]
pub struct RateEncounterService {
    fortune_rate: f64,
    misfortune_rate: f64,
}

impl RateEncounterService {
    /// Create a service with the given monthly probabilities.
    pub const fn new(fortune_rate: f64, misfortune_rate: f64) -> Self {
        Self {
            fortune_rate,
            misfortune_rate,
        }
    }
}

/// Scale a probability by `100 + pct` percent and clamp it to `[0, 1]`.
fn scaled_rate(rate: f64, pct: i32) -> f64 {
    (rate * f64::from(100_i32.saturating_add(pct)) / 100.0).clamp(0.0, 1.0)
}

fn fortune_for(agent: &Agent, now: MonthStamp, rng: &mut SmallRng) -> Encounter {
    let name = agent.display_name();
    match rng.random_range(0..3) {
        0 => {
            let stones = rng.random_range(10..=60);
            Encounter {
                event: Event::about(
                    now,
                    format!("{name} stumbled upon a hidden cache of {stones} spirit stones."),
                    agent.id,
                ),
                effect: EncounterEffect::SpiritStones(stones),
            }
        }
        1 => Encounter {
            event: Event::about(
                now,
                format!("{name} gained sudden insight while watching the clouds."),
                agent.id,
            ),
            effect: EncounterEffect::Insight(rng.random_range(10..=40)),
        },
        _ => Encounter {
            event: Event::about(now, format!("{name} found and ate a rare spirit fruit."), agent.id),
            effect: EncounterEffect::Blessing(TemporaryEffect {
                name: String::from("Spirit Fruit"),
                expires_at: MonthStamp::new(now.months().saturating_add(BLESSING_MONTHS)),
                regen_bonus: 3,
                cultivation_bonus: 4,
            }),
        },
    }
}

fn misfortune_for(agent: &Agent, now: MonthStamp, rng: &mut SmallRng) -> Encounter {
    let name = agent.display_name();
    if agent.spirit_stones > 0 && rng.random_bool(0.5) {
        let stolen = agent.spirit_stones.min(rng.random_range(5..=50));
        return Encounter {
            event: Event::about(
                now,
                format!("{name} was waylaid by bandits and lost {stolen} spirit stones."),
                agent.id,
            ),
            effect: EncounterEffect::Robbed(stolen),
        };
    }
    Encounter {
        event: Event::about(
            now,
            format!("{name} was ambushed by a demonic beast and badly wounded."),
            agent.id,
        ),
        effect: EncounterEffect::Injury(rng.random_range(10..=40)),
    }
}

#[async_trait::async_trait]
impl EncounterService for RateEncounterService {
    async fn fortune(
        &self,
        agent: &Agent,
        ctx: &EncounterContext,
    ) -> Result<Option<Encounter>, ServiceError> {
        let mut rng = SmallRng::seed_from_u64(ctx.rng_seed ^ FORTUNE_SALT);
        let rate = scaled_rate(self.fortune_rate, ctx.modifier.fortune_pct);
        if rng.random::<f64>() >= rate {
            return Ok(None);
        }
        Ok(Some(fortune_for(agent, ctx.now, &mut rng)))
    }

    async fn misfortune(
        &self,
        agent: &Agent,
        ctx: &EncounterContext,
    ) -> Result<Option<Encounter>, ServiceError> {
        let mut rng = SmallRng::seed_from_u64(ctx.rng_seed ^ MISFORTUNE_SALT);
        let rate = scaled_rate(self.misfortune_rate, ctx.modifier.misfortune_pct);
        if rng.random::<f64>() >= rate {
            return Ok(None);
        }
        Ok(Some(misfortune_for(agent, ctx.now, &mut rng)))
    }
}
