//! Creation of newly awakened cultivators.
//!
//! Each month a mortal somewhere may awaken to cultivation. The awakened
//! avatar gets a random gender, a name drawn from the gendered name pool,
//! a random age within the configured range, and a random tile on the map.

use ascension_types::{Gender, MonthStamp};
use ascension_world::{Position, WorldMap};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::agent::Agent;
use crate::error::AgentError;
use crate::vitals::{Age, Realm};

// -----------------------------------------------------------------------
// Name pool
// -----------------------------------------------------------------------

const SURNAMES: &[&str] = &[
    "Lin", "Su", "Han", "Xiao", "Mo", "Ye", "Bai", "Qin", "Gu", "Shen", "Lu", "Yun", "Jiang",
    "Fang", "Wei", "Liu",
];

const MALE_GIVEN_NAMES: &[&str] = &[
    "Feng", "Yan", "Chen", "Tian", "Jun", "Hao", "Lei", "Ming", "Xuan", "Kai", "Zhen", "Long",
];

const FEMALE_GIVEN_NAMES: &[&str] = &[
    "Mei", "Xue", "Lan", "Yue", "Qing", "Ling", "Hua", "Yao", "Shuang", "Ning", "Ru", "Xi",
];

/// Extra lifespan years granted at random on top of the realm base.
const LIFESPAN_VARIANCE_YEARS: u32 = 20;

/// Bounds for a random awakening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AwakeningParams {
    /// Youngest awakening age in years.
    pub min_age: u32,
    /// Oldest awakening age in years.
    pub max_age: u32,
}

impl Default for AwakeningParams {
    fn default() -> Self {
        Self {
            min_age: 16,
            max_age: 60,
        }
    }
}

/// Create a random newly awakened cultivator.
///
/// `name_taken` reports whether a candidate name is already in use; on a
/// collision a numeric suffix is appended until the name is free.
pub fn awaken_random_mortal<R, F>(
    rng: &mut R,
    now: MonthStamp,
    map: &WorldMap,
    params: AwakeningParams,
    name_taken: F,
) -> Result<Agent, AgentError>
where
    R: Rng + ?Sized,
    F: Fn(&str) -> bool,
{
    if params.min_age > params.max_age {
        return Err(AgentError::InvalidAgeRange {
            min: params.min_age,
            max: params.max_age,
        });
    }
    if map.width() == 0 || map.height() == 0 {
        return Err(AgentError::EmptyMap);
    }

    let gender = *Gender::ALL.choose(rng).unwrap_or(&Gender::Male);
    let name = unique_name(random_name(rng, gender), name_taken);
    let years = rng.random_range(params.min_age..=params.max_age);
    let lifespan = Realm::QiRefinement
        .base_lifespan_years()
        .saturating_add(rng.random_range(0..=LIFESPAN_VARIANCE_YEARS));
    let position = Position::new(
        rng.random_range(0..map.width()),
        rng.random_range(0..map.height()),
    );

    Ok(Agent::new(
        name,
        gender,
        Age::from_years(years, lifespan),
        position,
        now,
    ))
}

/// Draw a surname and a given name matching the gender.
pub fn random_name<R: Rng + ?Sized>(rng: &mut R, gender: Gender) -> String {
    let given_pool = match gender {
        Gender::Male => MALE_GIVEN_NAMES,
        Gender::Female => FEMALE_GIVEN_NAMES,
    };
    let surname = SURNAMES.choose(rng).copied().unwrap_or("Lin");
    let given = given_pool.choose(rng).copied().unwrap_or("Yi");
    format!("{surname} {given}")
}

fn unique_name<F: Fn(&str) -> bool>(base: String, name_taken: F) -> String {
    if !name_taken(&base) {
        return base;
    }
    let mut suffix: u32 = 2;
    loop {
        let candidate = format!("{base} {suffix}");
        if !name_taken(&candidate) {
            return candidate;
        }
        suffix = suffix.saturating_add(1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn map() -> WorldMap {
        WorldMap::new(8, 6).unwrap()
    }

    #[test]
    fn awakened_agent_respects_bounds() {
        let mut rng = SmallRng::seed_from_u64(7);
        let map = map();
        for _ in 0..50 {
            let agent = awaken_random_mortal(
                &mut rng,
                MonthStamp::new(1200),
                &map,
                AwakeningParams::default(),
                |_| false,
            )
            .unwrap();
            let years = agent.age.years();
            assert!((16..=60).contains(&years));
            assert!(agent.age.lifespan_years >= 80);
            assert!(map.contains(agent.position));
            assert_eq!(agent.cultivation.level, 1);
            assert!(!agent.metrics_tracking);
            assert_eq!(agent.awakened_at, MonthStamp::new(1200));
        }
    }

    #[test]
    fn same_seed_same_agent() {
        let map = map();
        let mut a = SmallRng::seed_from_u64(99);
        let mut b = SmallRng::seed_from_u64(99);
        let x = awaken_random_mortal(&mut a, MonthStamp::new(0), &map, AwakeningParams::default(), |_| false)
            .unwrap();
        let y = awaken_random_mortal(&mut b, MonthStamp::new(0), &map, AwakeningParams::default(), |_| false)
            .unwrap();
        assert_eq!(x.name, y.name);
        assert_eq!(x.age, y.age);
        assert_eq!(x.position, y.position);
    }

    #[test]
    fn collision_appends_suffix() {
        let name = unique_name(String::from("Lin Feng"), |n| n == "Lin Feng" || n == "Lin Feng 2");
        assert_eq!(name, "Lin Feng 3");
    }

    #[test]
    fn invalid_range_rejected() {
        let mut rng = SmallRng::seed_from_u64(1);
        let result = awaken_random_mortal(
            &mut rng,
            MonthStamp::new(0),
            &map(),
            AwakeningParams {
                min_age: 40,
                max_age: 20,
            },
            |_| false,
        );
        assert_eq!(
            result.map(|a| a.name),
            Err(AgentError::InvalidAgeRange { min: 40, max: 20 })
        );
    }
}
