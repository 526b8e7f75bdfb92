//! Celestial phenomena: slow-changing global world modifiers.
//!
//! A phenomenon lasts a fixed number of years. The step orchestrator asks
//! [`pick_random_phenomenon`] for a replacement when the world has none yet
//! or when the current one has run its course.

use ascension_types::{Month, MonthStamp};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

/// Percentage adjustments a phenomenon applies to world mechanics.
///
/// Zero means no change; positive values speed up or raise, negative values
/// slow down or lower.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhenomenonModifier {
    /// Cultivation speed adjustment in percent.
    pub cultivation_pct: i32,
    /// Fortune encounter rate adjustment in percent.
    pub fortune_pct: i32,
    /// Misfortune encounter rate adjustment in percent.
    pub misfortune_pct: i32,
}

/// A global world modifier with a limited duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CelestialPhenomenon {
    /// Display name.
    pub name: String,
    /// Description shown in world events.
    pub description: String,
    /// How many years the phenomenon lasts.
    pub duration_years: u32,
    /// Mechanical effect.
    pub modifier: PhenomenonModifier,
}

/// The phenomenon currently in force and when it began.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhenomenonState {
    /// The active phenomenon.
    pub phenomenon: CelestialPhenomenon,
    /// Calendar year in which it started.
    pub start_year: u64,
}

impl PhenomenonState {
    /// Whether the phenomenon should be replaced at `now`.
    ///
    /// Expiry is only checked in January, once the years elapsed since the
    /// start year reach the configured duration.
    pub fn is_expired(&self, now: MonthStamp) -> bool {
        now.month() == Month::January
            && now.years_since(self.start_year) >= u64::from(self.phenomenon.duration_years)
    }
}

fn phenomenon(
    name: &str,
    description: &str,
    duration_years: u32,
    cultivation_pct: i32,
    fortune_pct: i32,
    misfortune_pct: i32,
) -> CelestialPhenomenon {
    CelestialPhenomenon {
        name: name.to_owned(),
        description: description.to_owned(),
        duration_years,
        modifier: PhenomenonModifier {
            cultivation_pct,
            fortune_pct,
            misfortune_pct,
        },
    }
}

/// The full phenomenon catalogue.
pub fn catalogue() -> Vec<CelestialPhenomenon> {
    vec![
        phenomenon(
            "Tranquil Heavens",
            "the heavens are calm and spiritual energy flows evenly",
            10,
            0,
            0,
            0,
        ),
        phenomenon(
            "Spirit Tide",
            "spiritual energy surges across the land and cultivation quickens",
            5,
            30,
            10,
            0,
        ),
        phenomenon(
            "Blood Moon",
            "a crimson moon hangs low and calamity stalks the wilds",
            3,
            0,
            -10,
            50,
        ),
        phenomenon(
            "Withered Qi",
            "the world's essence thins and breakthroughs grow scarce",
            4,
            -25,
            0,
            10,
        ),
        phenomenon(
            "Auspicious Stars",
            "lucky stars align and hidden treasures reveal themselves",
            5,
            10,
            50,
            -20,
        ),
    ]
}

/// Pick a phenomenon uniformly at random from the catalogue.
pub fn pick_random_phenomenon<R: Rng + ?Sized>(rng: &mut R) -> Option<CelestialPhenomenon> {
    catalogue().choose(rng).cloned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn state(duration_years: u32, start_year: u64) -> PhenomenonState {
        let mut phenomenon = catalogue().into_iter().next().unwrap();
        phenomenon.duration_years = duration_years;
        PhenomenonState {
            phenomenon,
            start_year,
        }
    }

    #[test]
    fn catalogue_durations_are_positive() {
        assert!(catalogue().iter().all(|p| p.duration_years > 0));
    }

    #[test]
    fn picks_from_catalogue() {
        let mut rng = SmallRng::seed_from_u64(7);
        let picked = pick_random_phenomenon(&mut rng).unwrap();
        assert!(catalogue().contains(&picked));
    }

    #[test]
    fn expires_in_january_once_duration_elapsed() {
        let state = state(3, 100);
        let jan_102 = MonthStamp::from_year_month(102, Month::January).unwrap();
        let jan_103 = MonthStamp::from_year_month(103, Month::January).unwrap();
        let feb_103 = MonthStamp::from_year_month(103, Month::February).unwrap();
        assert!(!state.is_expired(jan_102));
        assert!(state.is_expired(jan_103));
        assert!(!state.is_expired(feb_103));
    }
}
