//! Tick callback that keeps a running chronicle of the run.
//!
//! Every month is logged at `debug`; at the end of each year a summary of
//! the population and the year's events is logged at `info`.

use ascension_core::runner::TickCallback;
use ascension_core::world::World;
use ascension_types::{Event, Month};
use tracing::{debug, info};

/// Counts events and logs a yearly summary.
#[derive(Debug, Clone, Default)]
pub struct ChronicleCallback {
    months: u64,
    events_this_year: usize,
    total_events: usize,
}

impl ChronicleCallback {
    /// Create an empty chronicle.
    pub const fn new() -> Self {
        Self {
            months: 0,
            events_this_year: 0,
            total_events: 0,
        }
    }

    /// Months observed so far.
    pub const fn months(&self) -> u64 {
        self.months
    }

    /// Events observed so far.
    pub const fn total_events(&self) -> usize {
        self.total_events
    }
}

impl TickCallback for ChronicleCallback {
    fn on_tick(&mut self, events: &[Event], world: &World) {
        self.months = self.months.saturating_add(1);
        self.events_this_year = self.events_this_year.saturating_add(events.len());
        self.total_events = self.total_events.saturating_add(events.len());

        debug!(
            month = %world.month_stamp,
            events = events.len(),
            living = world.registry.living_count(),
            "Month recorded"
        );

        // The clock has already advanced, so January closes the previous year.
        if world.month_stamp.month() == Month::January {
            info!(
                year = world.month_stamp.year().saturating_sub(1),
                living = world.registry.living_count(),
                total_agents = world.registry.len(),
                events = self.events_this_year,
                phenomenon = world
                    .phenomenon
                    .as_ref()
                    .map_or("none", |state| state.phenomenon.name.as_str()),
                "Year in review"
            );
            self.events_this_year = 0;
        }
    }
}
