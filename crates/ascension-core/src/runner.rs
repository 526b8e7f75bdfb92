//! Bounded simulation loop.
//!
//! [`run_simulation`] drives [`Simulator::step`] month after month until
//! the month limit is reached or no living agent remains, sleeping the
//! configured interval between months and handing every month's events to
//! a [`TickCallback`].

use std::time::Duration;

use ascension_types::{Event, MonthStamp};
use tracing::{info, warn};

use crate::config::SimulationBoundsConfig;
use crate::tick::{Simulator, TickError};
use crate::world::World;

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A step failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationEndReason {
    /// The configured number of months ran.
    MaxMonthsReached,
    /// Every agent is dead.
    Extinction,
}

/// Result of the simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// Total number of months stepped.
    pub total_months: u64,
    /// The world clock after the last step.
    pub final_month: MonthStamp,
    /// Living agents after the last step.
    pub agents_alive: usize,
}

/// Callback invoked after each month completes.
pub trait TickCallback: Send {
    /// Called after a step succeeds with that month's events.
    fn on_tick(&mut self, events: &[Event], world: &World);
}

/// A callback that ignores every month.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _events: &[Event], _world: &World) {}
}

/// Run the simulation until a bound is hit.
///
/// # Errors
///
/// Returns [`RunnerError`] if a step fails. The world is left at the last
/// month that completed.
pub async fn run_simulation(
    simulator: &Simulator,
    world: &mut World,
    bounds: &SimulationBoundsConfig,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut total_months: u64 = 0;

    info!(
        start = %world.month_stamp,
        max_months = bounds.max_months,
        tick_interval_ms = bounds.tick_interval_ms,
        agents = world.registry.living_count(),
        "Simulation starting"
    );

    loop {
        let events = simulator.step(world).await?;
        total_months = total_months.saturating_add(1);

        callback.on_tick(&events, world);

        let agents_alive = world.registry.living_count();
        let end_reason = if agents_alive == 0 {
            info!(month = %world.month_stamp, "All agents dead -- extinction");
            Some(SimulationEndReason::Extinction)
        } else if bounds.max_months > 0 && total_months >= bounds.max_months {
            info!(months = total_months, "Month limit reached");
            Some(SimulationEndReason::MaxMonthsReached)
        } else {
            None
        };

        if let Some(end_reason) = end_reason {
            return Ok(SimulationResult {
                end_reason,
                total_months,
                final_month: world.month_stamp,
                agents_alive,
            });
        }

        if bounds.tick_interval_ms > 0 {
            tokio::time::sleep(Duration::from_millis(bounds.tick_interval_ms)).await;
        }
    }
}

/// Log the end of a run.
pub fn log_simulation_end(result: &SimulationResult, world: &World) {
    info!(
        reason = ?result.end_reason,
        total_months = result.total_months,
        final_month = %result.final_month,
        agents_alive = result.agents_alive,
        archived_events = world.archive.len(),
        "Simulation ended"
    );
    if world.archive.is_empty() {
        warn!("Simulation ended with no events recorded");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ascension_agents::{Age, Agent};
    use ascension_types::Gender;
    use ascension_world::{Position, WorldMap};

    use super::*;
    use crate::tick::StepSettings;

    fn quiet() -> Simulator {
        Simulator::new(StepSettings {
            awakening_rate: 0.0,
            ..StepSettings::default()
        })
    }

    fn world_with(age_years: u32, lifespan_years: u32) -> World {
        let mut world = World::new(WorldMap::new(3, 3).unwrap(), MonthStamp::new(1200), 3);
        let agent = Agent::new(
            "Shen Qiu",
            Gender::Male,
            Age::from_years(age_years, lifespan_years),
            Position::new(1, 1),
            MonthStamp::new(0),
        );
        world.registry.register(agent, false).unwrap();
        world
    }

    fn bounds(max_months: u64) -> SimulationBoundsConfig {
        SimulationBoundsConfig {
            max_months,
            tick_interval_ms: 0,
        }
    }

    #[tokio::test]
    async fn bounded_by_max_months() {
        let mut world = world_with(20, 80);
        let result = run_simulation(&quiet(), &mut world, &bounds(5), &mut NoOpCallback)
            .await
            .unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::MaxMonthsReached);
        assert_eq!(result.total_months, 5);
        assert_eq!(result.final_month, MonthStamp::new(1205));
        assert_eq!(world.month_stamp, MonthStamp::new(1205));
    }

    #[tokio::test]
    async fn extinction_stops_simulation() {
        let mut world = world_with(80, 80);
        let result = run_simulation(&quiet(), &mut world, &bounds(0), &mut NoOpCallback)
            .await
            .unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::Extinction);
        assert_eq!(result.total_months, 1);
        assert_eq!(result.agents_alive, 0);
    }

    #[tokio::test]
    async fn tick_callback_is_called() {
        struct CountCallback {
            count: u64,
            events: usize,
        }
        impl TickCallback for CountCallback {
            fn on_tick(&mut self, events: &[Event], _world: &World) {
                self.count = self.count.saturating_add(1);
                self.events = self.events.saturating_add(events.len());
            }
        }

        let mut world = world_with(20, 80);
        let mut cb = CountCallback {
            count: 0,
            events: 0,
        };
        run_simulation(&quiet(), &mut world, &bounds(3), &mut cb)
            .await
            .unwrap();

        assert_eq!(cb.count, 3);
        assert_eq!(cb.events, world.archive.len());
    }

    #[tokio::test]
    async fn step_error_propagates() {
        let mut world = world_with(20, 80);
        world.month_stamp = MonthStamp::new(u64::MAX);
        let result = run_simulation(&quiet(), &mut world, &bounds(2), &mut NoOpCallback).await;
        assert!(matches!(result, Err(RunnerError::Tick { .. })));
    }
}
