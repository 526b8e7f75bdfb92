//! Monthly calendar for the Ascension simulation.
//!
//! The [`MonthStamp`] is the single source of truth for simulated time. It
//! counts months since year 0; the year and month-of-year are derived from
//! it and never stored independently.

use serde::{Deserialize, Serialize};

/// Number of months in one simulated year.
pub const MONTHS_PER_YEAR: u64 = 12;

/// Errors that can occur during calendar arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    /// The month counter would overflow.
    #[error("month stamp overflow: cannot advance beyond {0}")]
    Overflow(u64),

    /// A month-of-year outside 1..=12 was supplied.
    #[error("invalid month of year: {0}")]
    InvalidMonth(u8),
}

/// A month of the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    /// First month; phenomenon expiry is checked here.
    January,
    /// Second month.
    February,
    /// Third month.
    March,
    /// Fourth month.
    April,
    /// Fifth month.
    May,
    /// Sixth month.
    June,
    /// Seventh month.
    July,
    /// Eighth month.
    August,
    /// Ninth month.
    September,
    /// Tenth month.
    October,
    /// Eleventh month.
    November,
    /// Twelfth month.
    December,
}

impl Month {
    /// All months in calendar order.
    pub const ALL: [Self; 12] = [
        Self::January,
        Self::February,
        Self::March,
        Self::April,
        Self::May,
        Self::June,
        Self::July,
        Self::August,
        Self::September,
        Self::October,
        Self::November,
        Self::December,
    ];

    /// Return the 1-based number of this month (January = 1).
    pub const fn number(self) -> u8 {
        match self {
            Self::January => 1,
            Self::February => 2,
            Self::March => 3,
            Self::April => 4,
            Self::May => 5,
            Self::June => 6,
            Self::July => 7,
            Self::August => 8,
            Self::September => 9,
            Self::October => 10,
            Self::November => 11,
            Self::December => 12,
        }
    }

    /// Parse a 1-based month number.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::InvalidMonth`] outside `1..=12`.
    pub fn from_number(number: u8) -> Result<Self, CalendarError> {
        let index = usize::from(number)
            .checked_sub(1)
            .ok_or(CalendarError::InvalidMonth(number))?;
        Self::ALL
            .get(index)
            .copied()
            .ok_or(CalendarError::InvalidMonth(number))
    }
}

/// Totally ordered month counter.
///
/// Advanced by exactly one at the end of every successful tick and by
/// nothing else.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MonthStamp(u64);

impl MonthStamp {
    /// Create a stamp from a raw month count.
    pub const fn new(months: u64) -> Self {
        Self(months)
    }

    /// Create a stamp for the given year and month of year.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::Overflow`] if the month count does not fit.
    pub fn from_year_month(year: u64, month: Month) -> Result<Self, CalendarError> {
        let offset = u64::from(month.number()).saturating_sub(1);
        year.checked_mul(MONTHS_PER_YEAR)
            .and_then(|m| m.checked_add(offset))
            .map(Self)
            .ok_or(CalendarError::Overflow(year))
    }

    /// Return the raw month count.
    pub const fn months(self) -> u64 {
        self.0
    }

    /// Return the year this stamp falls in.
    pub const fn year(self) -> u64 {
        self.0 / MONTHS_PER_YEAR
    }

    /// Return the month of year this stamp falls in.
    pub fn month(self) -> Month {
        let index = usize::try_from(self.0 % MONTHS_PER_YEAR).unwrap_or(0);
        Month::ALL.get(index).copied().unwrap_or(Month::January)
    }

    /// Return the stamp one month later.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::Overflow`] at `u64::MAX`.
    pub const fn checked_next(self) -> Result<Self, CalendarError> {
        match self.0.checked_add(1) {
            Some(next) => Ok(Self(next)),
            None => Err(CalendarError::Overflow(self.0)),
        }
    }

    /// Whole years elapsed since `earlier` started (by calendar year).
    pub const fn years_since(self, earlier_year: u64) -> u64 {
        self.year().saturating_sub(earlier_year)
    }
}

impl From<MonthStamp> for u64 {
    fn from(stamp: MonthStamp) -> Self {
        stamp.0
    }
}

impl core::fmt::Display for MonthStamp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}y{}m", self.year(), self.month().number())
    }
}
