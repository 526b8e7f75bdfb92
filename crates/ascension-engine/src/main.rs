//! Engine binary for the Ascension simulation.
//!
//! Wires the step orchestrator to local, rule-based collaborators, seeds
//! the starting world with cultivators, and runs the monthly loop until a
//! bound is hit.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `ascension-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Create the starting map
//! 4. Create the world and install the tournament manager
//! 5. Spawn seed cultivators
//! 6. Assemble the simulator and its collaborators
//! 7. Run the simulation loop
//! 8. Log the result

mod actions;
mod affinity;
mod chronicle;
mod error;
mod fortune;
mod persona;
mod planner;
mod spawner;
mod tournament;

use std::path::Path;

use ascension_agents::AwakeningParams;
use ascension_core::config::SimulationConfig;
use ascension_core::runner;
use ascension_core::tick::{Simulator, StepSettings};
use ascension_core::world::World;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::actions::DurationExecutor;
use crate::affinity::AffinityResolver;
use crate::chronicle::ChronicleCallback;
use crate::error::EngineError;
use crate::fortune::RateEncounterService;
use crate::persona::RuleBasedPersona;
use crate::planner::RuleBasedPlanner;
use crate::tournament::TournamentManager;

/// Configuration file looked up in the working directory.
const CONFIG_PATH: &str = "ascension-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the simulation itself fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("ascension-engine starting");
    info!(
        from_file,
        world_name = config.world.name,
        seed = config.world.seed,
        start_year = config.world.start_year,
        initial_agents = config.population.initial_agents,
        max_months = config.simulation.max_months,
        "Configuration loaded"
    );

    // 3. Create the starting map.
    let (map, regions) = ascension_world::create_starting_map()?;
    info!(
        region_count = map.region_count(),
        caves = regions.caves.len(),
        "Starting map created"
    );

    // 4. Create the world.
    let mut world = World::from_config(map, &config.world)?
        .with_gathering_manager(Box::new(TournamentManager::default()));
    info!(start = %world.month_stamp, "World created");

    // 5. Spawn seed cultivators.
    let params = AwakeningParams {
        min_age: config.population.awakening_min_age,
        max_age: config.population.awakening_max_age,
    };
    spawner::spawn_seed_agents(&mut world, config.population.initial_agents, params)?;

    // 6. Assemble the simulator.
    let simulator = Simulator::new(StepSettings::from_config(&config))
        .with_decision_service(Box::new(RuleBasedPlanner::default()))
        .with_executor(Box::new(DurationExecutor::default()))
        .with_resolver(Box::new(AffinityResolver::new(config.world.seed)))
        .with_encounters(Box::new(RateEncounterService::new(
            config.encounters.fortune_rate,
            config.encounters.misfortune_rate,
        )))
        .with_persona(Box::new(RuleBasedPersona));
    info!(
        max_local_rounds = config.execution.max_local_rounds,
        relation_check_threshold = config.social.relation_check_threshold,
        "Simulator assembled, entering monthly loop"
    );

    // 7. Run the simulation.
    let mut callback = ChronicleCallback::new();
    let result =
        runner::run_simulation(&simulator, &mut world, &config.simulation, &mut callback)
            .await
            .map_err(EngineError::from)?;

    // 8. Log results.
    runner::log_simulation_end(&result, &world);
    info!(
        end_reason = ?result.end_reason,
        months_chronicled = callback.months(),
        total_events = callback.total_events(),
        "ascension-engine shutdown complete"
    );

    Ok(())
}

/// Load and validate the configuration, falling back to defaults when the
/// file is absent. Also reports whether the file was found.
fn load_config() -> Result<(SimulationConfig, bool), EngineError> {
    let path = Path::new(CONFIG_PATH);
    let (config, from_file) = if path.exists() {
        (SimulationConfig::from_file(path)?, true)
    } else {
        (SimulationConfig::default(), false)
    };
    config.validate()?;
    Ok((config, from_file))
}
