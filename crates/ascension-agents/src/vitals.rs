//! Age, health, cultivation, and temporary effects of an avatar.
//!
//! These are the numeric attributes the monthly step advances in its
//! synchronous phases:
//!
//! - Age grows by one month per tick; lifespan is counted in years
//! - Health regenerates by `regen_per_month` plus any active effect bonus
//! - Cultivation progress accumulates toward the next level
//! - Temporary effects lapse once their expiry month is reached
//!
//! All arithmetic is saturating. No panics, no silent overflow.

use ascension_types::{MONTHS_PER_YEAR, MonthStamp};
use serde::{Deserialize, Serialize};

/// Cultivation progress needed to advance one level.
pub const PROGRESS_PER_LEVEL: u32 = 100;

/// An avatar's age and lifespan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Age {
    /// Age in months.
    pub months: u64,
    /// Natural lifespan in years.
    pub lifespan_years: u32,
}

impl Age {
    /// Create an age from whole years.
    pub fn from_years(years: u32, lifespan_years: u32) -> Self {
        Self {
            months: u64::from(years).saturating_mul(MONTHS_PER_YEAR),
            lifespan_years,
        }
    }

    /// Age in whole years.
    pub fn years(self) -> u32 {
        u32::try_from(self.months.checked_div(MONTHS_PER_YEAR).unwrap_or(0)).unwrap_or(u32::MAX)
    }

    /// Advance by one month.
    pub const fn advance(&mut self) {
        self.months = self.months.saturating_add(1);
    }

    /// Whether the avatar has reached the end of its natural lifespan.
    pub fn is_exhausted(self) -> bool {
        self.years() >= self.lifespan_years
    }
}

/// Current and maximum health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Current health. Zero or below is lethal.
    pub current: i32,
    /// Maximum health.
    pub max: i32,
    /// Health restored at the end of every month.
    pub regen_per_month: i32,
}

impl Health {
    /// Full health with the given maximum and regeneration.
    pub const fn full(max: i32, regen_per_month: i32) -> Self {
        Self {
            current: max,
            max,
            regen_per_month,
        }
    }

    /// Whether health is at or below zero.
    pub const fn is_depleted(self) -> bool {
        self.current <= 0
    }

    /// Whether the avatar is below maximum health.
    pub const fn is_wounded(self) -> bool {
        self.current < self.max
    }

    /// Subtract damage.
    pub const fn damage(&mut self, amount: i32) {
        self.current = self.current.saturating_sub(amount);
    }

    /// Restore health, never exceeding the maximum.
    ///
    /// Depleted avatars do not heal; they are resolved by the death check.
    pub fn heal(&mut self, amount: i32) {
        if self.is_depleted() {
            return;
        }
        self.current = self.current.saturating_add(amount).min(self.max);
    }
}

/// Major cultivation realm, derived from level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Realm {
    /// Levels 1 to 30.
    QiRefinement,
    /// Levels 31 to 60.
    Foundation,
    /// Levels 61 to 90.
    CoreFormation,
    /// Level 91 and above.
    NascentSoul,
}

impl Realm {
    /// Realm for the given level.
    pub const fn from_level(level: u32) -> Self {
        match level {
            0..=30 => Self::QiRefinement,
            31..=60 => Self::Foundation,
            61..=90 => Self::CoreFormation,
            _ => Self::NascentSoul,
        }
    }

    /// Base lifespan in years granted by the realm.
    pub const fn base_lifespan_years(self) -> u32 {
        match self {
            Self::QiRefinement => 80,
            Self::Foundation => 150,
            Self::CoreFormation => 300,
            Self::NascentSoul => 600,
        }
    }
}

impl core::fmt::Display for Realm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::QiRefinement => write!(f, "Qi Refinement"),
            Self::Foundation => write!(f, "Foundation Establishment"),
            Self::CoreFormation => write!(f, "Core Formation"),
            Self::NascentSoul => write!(f, "Nascent Soul"),
        }
    }
}

/// Cultivation level and progress toward the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cultivation {
    /// Current level, starting at 1.
    pub level: u32,
    /// Progress toward the next level, below [`PROGRESS_PER_LEVEL`].
    pub progress: u32,
}

impl Cultivation {
    /// A fresh cultivator at level 1.
    pub const fn novice() -> Self {
        Self {
            level: 1,
            progress: 0,
        }
    }

    /// The realm of the current level.
    pub const fn realm(self) -> Realm {
        Realm::from_level(self.level)
    }

    /// Add progress and return the number of levels gained.
    pub fn gain(&mut self, amount: u32) -> u32 {
        let total = self.progress.saturating_add(amount);
        let levels = total.checked_div(PROGRESS_PER_LEVEL).unwrap_or(0);
        self.progress = total.checked_rem(PROGRESS_PER_LEVEL).unwrap_or(0);
        self.level = self.level.saturating_add(levels);
        levels
    }
}

impl Default for Cultivation {
    fn default() -> Self {
        Self::novice()
    }
}

/// A time-limited effect such as a consumed elixir.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporaryEffect {
    /// Display name of the effect.
    pub name: String,
    /// First month in which the effect no longer applies.
    pub expires_at: MonthStamp,
    /// Extra health restored per month while active.
    pub regen_bonus: i32,
    /// Extra cultivation progress granted per month while active.
    pub cultivation_bonus: u32,
}

impl TemporaryEffect {
    /// Whether the effect has lapsed at `now`.
    pub fn is_expired(&self, now: MonthStamp) -> bool {
        now >= self.expires_at
    }
}
