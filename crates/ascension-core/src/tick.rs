//! The monthly step: the fixed-order phase pipeline that advances the world.
//!
//! Each call to [`Simulator::step`] runs these phases in order:
//!
//! 1. **Perception** -- agents learn nearby regions; homeless agents claim
//!    the first ownerless cave they see.
//! 2. **Long-term objectives** -- persona service fan-out.
//! 3. **Gatherings** -- the world's gathering manager runs due events.
//! 4. **Decision** -- one batch call for every idle agent with no plan.
//! 5. **Commit** -- idle agents start the head of their plan chain.
//! 6. **Execution** -- executor fan-out with bounded same-month retries for
//!    agents whose action chained into a new one.
//! 7. **Interactions** -- count interactions from the events so far.
//! 8. **Relations** -- schedule pairs over the threshold, reset both sides,
//!    resolve as one batch.
//! 9. **Death** -- injury, then old age.
//! 10. **Age and birth** -- every living agent ages one month; at most one
//!     mortal awakens.
//! 11. **Passive effects** -- effect expiry and regeneration, then the
//!     fortune and misfortune fan-out.
//! 12. **Nicknames** -- persona service fan-out.
//! 13. **Celestial phenomenon** -- replace the phenomenon when due.
//! 14. **Interactions** -- count events not yet counted.
//! 15. **Finalize** -- metrics snapshots, dedup by event id, archive, log,
//!     advance the clock.
//!
//! Phases never overlap. Fan-outs create every future before awaiting any
//! and merge results in the order the futures were created, so the event
//! order is deterministic regardless of completion order. A phase that
//! fails fatally aborts the step: the world is restored to its state at
//! the start of the step and the clock does not move.

use std::collections::BTreeSet;
use std::time::Duration;

use ascension_agents::{AgentError, AwakeningParams, awaken_random_mortal, check_death};
use ascension_types::{AgentId, CalendarError, DeathCause, Event, MonthStamp};
use ascension_world::{PhenomenonState, WorldError, pick_random_phenomenon};
use futures::future::join_all;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::{ExecutionConfig, SimulationConfig};
use crate::death::{DeathHandler, StandardDeathHandler};
use crate::decision::{DecisionError, DecisionService, StubDecisionService};
use crate::encounter::{EncounterContext, EncounterService, NoEncounters, ServiceError};
use crate::executor::{ActionContext, ActionExecutor, ExecutorError, InstantExecutor};
use crate::gathering::GatheringError;
use crate::perception::perceive_and_occupy;
use crate::persona::{PersonaService, StaticPersona};
use crate::relation::{RelationError, RelationshipResolver, StubRelationshipResolver};
use crate::social::{InteractionLedger, schedule_relation_pairs};
use crate::world::World;

/// Errors that abort a step. The clock does not advance when one occurs.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// The decision service failed or timed out.
    #[error("decision error: {source}")]
    Decision {
        /// The underlying decision error.
        #[from]
        source: DecisionError,
    },

    /// The relationship resolver failed or timed out.
    #[error("relation error: {source}")]
    Relation {
        /// The underlying resolver error.
        #[from]
        source: RelationError,
    },

    /// The gathering manager failed or timed out.
    #[error("gathering error: {source}")]
    Gathering {
        /// The underlying gathering error.
        #[from]
        source: GatheringError,
    },

    /// An agent operation failed.
    #[error("agent error: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },

    /// A world operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// The clock cannot advance.
    #[error("calendar error: {source}")]
    Calendar {
        /// The underlying calendar error.
        #[from]
        source: CalendarError,
    },
}

/// Tunables the step reads every month.
#[derive(Debug, Clone, PartialEq)]
pub struct StepSettings {
    /// Interactions needed before a pair is resolved.
    pub relation_check_threshold: u32,
    /// Probability per month that one mortal awakens.
    pub awakening_rate: f64,
    /// Age bounds for awakened mortals.
    pub awakening: AwakeningParams,
    /// Round limit and call budgets.
    pub execution: ExecutionConfig,
}

impl StepSettings {
    /// Extract the step settings from a full configuration.
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            relation_check_threshold: config.social.relation_check_threshold,
            awakening_rate: config.population.awakening_rate_per_month,
            awakening: AwakeningParams {
                min_age: config.population.awakening_min_age,
                max_age: config.population.awakening_max_age,
            },
            execution: config.execution.clone(),
        }
    }
}

impl Default for StepSettings {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

/// Which persona field a fan-out revises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PersonaField {
    LongTermObjective,
    Nickname,
}

/// Which encounter a check rolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EncounterKind {
    Fortune,
    Misfortune,
}

/// The step orchestrator and its collaborators.
pub struct Simulator {
    settings: StepSettings,
    decision: Box<dyn DecisionService>,
    executor: Box<dyn ActionExecutor>,
    resolver: Box<dyn RelationshipResolver>,
    encounters: Box<dyn EncounterService>,
    persona: Box<dyn PersonaService>,
    death_handler: Box<dyn DeathHandler>,
}

impl Simulator {
    /// Create a simulator with inert collaborators: no plans, instant
    /// actions, no relation changes, no encounters, no persona changes,
    /// and the [`StandardDeathHandler`].
    pub fn new(settings: StepSettings) -> Self {
        Self {
            settings,
            decision: Box::new(StubDecisionService::new()),
            executor: Box::new(InstantExecutor::new()),
            resolver: Box::new(StubRelationshipResolver::new()),
            encounters: Box::new(NoEncounters),
            persona: Box::new(StaticPersona),
            death_handler: Box::new(StandardDeathHandler),
        }
    }

    /// Replace the decision service.
    #[must_use]
    pub fn with_decision_service(mut self, service: Box<dyn DecisionService>) -> Self {
        self.decision = service;
        self
    }

    /// Replace the action executor.
    #[must_use]
    pub fn with_executor(mut self, executor: Box<dyn ActionExecutor>) -> Self {
        self.executor = executor;
        self
    }

    /// Replace the relationship resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Box<dyn RelationshipResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace the encounter service.
    #[must_use]
    pub fn with_encounters(mut self, service: Box<dyn EncounterService>) -> Self {
        self.encounters = service;
        self
    }

    /// Replace the persona service.
    #[must_use]
    pub fn with_persona(mut self, service: Box<dyn PersonaService>) -> Self {
        self.persona = service;
        self
    }

    /// Replace the death handler.
    #[must_use]
    pub fn with_death_handler(mut self, handler: Box<dyn DeathHandler>) -> Self {
        self.death_handler = handler;
        self
    }

    /// The step settings.
    pub const fn settings(&self) -> &StepSettings {
        &self.settings
    }

    /// Advance the world by one month and return the month's events.
    ///
    /// The returned list holds no two events with the same id, in the
    /// order they were first produced. Calling `step` twice advances the
    /// clock twice.
    ///
    /// # Errors
    ///
    /// Returns [`TickError`] if the decision service, relationship resolver,
    /// or gathering manager fails or times out, or if world state is
    /// inconsistent. Executor, encounter, and persona failures are isolated
    /// per agent and never abort the step. On error the map, the registry,
    /// the phenomenon, and the random source are restored to their state
    /// before the step, nothing is archived, and the clock is unchanged.
    pub async fn step(&self, world: &mut World) -> Result<Vec<Event>, TickError> {
        let now = world.month_stamp;
        let next = now.checked_next()?;
        debug!(month = %now, living = world.registry.living_count(), "Step started");

        let checkpoint = world.checkpoint();
        match self.run_phases(world).await {
            Ok(events) => Ok(finalize(world, events, next)),
            Err(err) => {
                world.restore(checkpoint);
                warn!(month = %now, error = %err, "Step failed, world rolled back");
                Err(err)
            }
        }
    }

    /// Phases 1 to 14. Finalization is left to [`Simulator::step`].
    async fn run_phases(&self, world: &mut World) -> Result<Vec<Event>, TickError> {
        world.registry.clear_newly_born();
        let mut events: Vec<Event> = Vec::new();
        let mut ledger = InteractionLedger::new();

        // 1. Perception and auto-occupation
        events.extend(perceive_and_occupy(world)?);

        // 2. Long-term objectives
        events.extend(self.phase_persona(world, PersonaField::LongTermObjective).await);

        // 3. Gatherings
        events.extend(self.phase_gatherings(world).await?);

        // 4. Decision
        self.phase_decide(world).await?;

        // 5. Commit
        events.extend(phase_commit(world));

        // 6. Execution
        events.extend(self.phase_execute(world).await);

        // 7. Interactions so far
        ledger.process(&mut world.registry, &events);

        // 8. Relations
        events.extend(self.phase_evolve_relations(world).await?);

        // 9. Death
        events.extend(self.phase_resolve_death(world)?);

        // 10. Age and birth
        events.extend(self.phase_age_and_birth(world)?);

        // 11. Passive effects and encounters
        events.extend(self.phase_passive_effects(world).await);

        // 12. Nicknames
        events.extend(self.phase_persona(world, PersonaField::Nickname).await);

        // 13. Celestial phenomenon
        events.extend(phase_celestial_phenomenon(world));

        // 14. Remaining interactions
        ledger.process(&mut world.registry, &events);

        Ok(events)
    }

    /// Phase 3: run due gatherings through the world's manager.
    async fn phase_gatherings(&self, world: &mut World) -> Result<Vec<Event>, TickError> {
        let Some(mut manager) = world.gathering_manager.take() else {
            return Ok(Vec::new());
        };
        let deadline_ms = self.settings.execution.gathering_timeout_ms;
        let result = with_deadline(
            self.settings.execution.gathering_timeout(),
            manager.check_and_run_all(world),
            || GatheringError::Timeout { deadline_ms },
        )
        .await;
        world.gathering_manager = Some(manager);
        Ok(result?)
    }

    /// Phase 4: ask the decision service for plans for every idle agent
    /// with nothing queued, and load them without starting anything.
    async fn phase_decide(&self, world: &mut World) -> Result<(), TickError> {
        let idle: Vec<AgentId> = world
            .registry
            .living()
            .filter(|agent| agent.needs_decision())
            .map(|agent| agent.id)
            .collect();
        if idle.is_empty() {
            return Ok(());
        }

        let deadline_ms = self.settings.execution.decision_timeout_ms;
        let decisions = with_deadline(
            self.settings.execution.decision_timeout(),
            self.decision.decide(world, &idle),
            || DecisionError::Timeout { deadline_ms },
        )
        .await?;
        debug!(requested = idle.len(), returned = decisions.len(), "Decisions received");

        for (agent_id, outcome) in decisions {
            let Some(agent) = world.registry.get_mut(agent_id) else {
                warn!(agent_id = %agent_id, "Decision for unknown agent ignored");
                continue;
            };
            if !agent.is_alive() {
                continue;
            }
            agent.load_plan_chain(outcome.plan);
            agent.thinking = outcome.thinking;
            agent.short_term_objective = outcome.short_term_objective;
        }
        Ok(())
    }

    /// Phase 6: advance every living agent's action, then give agents whose
    /// action chained another turn, up to the round limit.
    ///
    /// A failing or timed-out step drops that agent's action and emits an
    /// "action faulted" event; the agent is not retried this month.
    async fn phase_execute(&self, world: &mut World) -> Vec<Event> {
        let now = world.month_stamp;
        let modifier = world.modifier();
        let deadline = self.settings.execution.executor_timeout();
        let deadline_ms = self.settings.execution.executor_timeout_ms;
        let max_rounds = self.settings.execution.max_local_rounds;
        let executor = self.executor.as_ref();

        let mut events = Vec::new();
        let mut pending: BTreeSet<AgentId> = world.registry.living_ids().into_iter().collect();
        let mut round: u32 = 0;

        while !pending.is_empty() && round < max_rounds {
            round = round.saturating_add(1);
            let ctx = ActionContext {
                now,
                map: &world.map,
                modifier,
            };
            let ctx = &ctx;
            let tasks = world
                .registry
                .living_mut()
                .filter(|agent| pending.contains(&agent.id))
                .map(move |agent| async move {
                    let agent_id = agent.id;
                    let outcome = with_deadline(deadline, executor.tick(agent, ctx), || {
                        ExecutorError::Timeout {
                            agent_id,
                            deadline_ms,
                        }
                    })
                    .await;
                    (agent_id, outcome)
                });
            let outcomes = join_all(tasks).await;

            let mut chained = BTreeSet::new();
            for (agent_id, outcome) in outcomes {
                match outcome {
                    Ok(step) => {
                        events.extend(step.events);
                        if step.chained {
                            chained.insert(agent_id);
                        }
                    }
                    Err(err) => {
                        warn!(month = %now, agent_id = %agent_id, round, error = %err, "Action faulted");
                        if let Some(agent) = world.registry.get_mut(agent_id) {
                            agent.current_action = None;
                            events.push(Event::about(
                                now,
                                format!("{}'s action faulted: {}", agent.name, err.cause()),
                                agent_id,
                            ));
                        }
                    }
                }
            }
            debug!(month = %now, round, chained = chained.len(), "Execution round finished");
            pending = chained;
        }
        events
    }

    /// Phase 8: schedule pairs whose interactions crossed the threshold and
    /// resolve them as one batch.
    async fn phase_evolve_relations(&self, world: &mut World) -> Result<Vec<Event>, TickError> {
        let pairs =
            schedule_relation_pairs(&mut world.registry, self.settings.relation_check_threshold)?;
        if pairs.is_empty() {
            return Ok(Vec::new());
        }
        debug!(pairs = pairs.len(), "Resolving relations");
        let deadline_ms = self.settings.execution.resolver_timeout_ms;
        let events = with_deadline(
            self.settings.execution.resolver_timeout(),
            self.resolver
                .run_batch(&mut world.registry, &pairs, world.month_stamp),
            || RelationError::Timeout { deadline_ms },
        )
        .await?;
        Ok(events)
    }

    /// Phase 9: kill agents at zero health or past their lifespan.
    fn phase_resolve_death(&self, world: &mut World) -> Result<Vec<Event>, TickError> {
        let now = world.month_stamp;
        let due: Vec<(AgentId, DeathCause, String)> = world
            .registry
            .living()
            .filter_map(|agent| check_death(agent).map(|cause| (agent.id, cause, agent.name.clone())))
            .collect();

        let mut events = Vec::with_capacity(due.len());
        for (agent_id, cause, name) in due {
            events.push(Event::about(now, format!("{name} {cause}"), agent_id));
            self.death_handler.handle(world, agent_id, cause)?;
        }
        Ok(events)
    }

    /// Phase 10: age every living agent and roll for one awakening.
    fn phase_age_and_birth(&self, world: &mut World) -> Result<Vec<Event>, TickError> {
        let now = world.month_stamp;
        for agent in world.registry.living_mut() {
            agent.advance_age();
        }

        if world.rng.random::<f64>() >= self.settings.awakening_rate {
            return Ok(Vec::new());
        }
        let registry = &world.registry;
        let agent = awaken_random_mortal(
            &mut world.rng,
            now,
            &world.map,
            self.settings.awakening,
            |name| registry.name_taken(name),
        )?;
        let text = format!("{} has ascended to a cultivator.", agent.name);
        let agent_id = world.registry.register(agent, true)?;
        info!(month = %now, agent_id = %agent_id, "Mortal awakened");
        Ok(vec![Event::about(now, text, agent_id)])
    }

    /// Phase 11: expire effects and regenerate, then roll fortune and
    /// misfortune for every living agent concurrently.
    async fn phase_passive_effects(&self, world: &mut World) -> Vec<Event> {
        let now = world.month_stamp;
        for agent in world.registry.living_mut() {
            agent.expire_effects(now);
            agent.apply_time_effects();
        }

        let modifier = world.modifier();
        let deadline = self.settings.execution.service_timeout();
        let deadline_ms = self.settings.execution.service_timeout_ms;
        let service = self.encounters.as_ref();
        let world_ref = &*world;

        let checks = world_ref
            .registry
            .living()
            .map(|agent| (agent, EncounterKind::Fortune))
            .chain(
                world_ref
                    .registry
                    .living()
                    .map(|agent| (agent, EncounterKind::Misfortune)),
            );
        let tasks = checks.map(|(agent, kind)| {
            let ctx = EncounterContext {
                now,
                modifier,
                rng_seed: world_ref.agent_seed(agent.id),
            };
            async move {
                let agent_id = agent.id;
                let roll = async {
                    match kind {
                        EncounterKind::Fortune => service.fortune(agent, &ctx).await,
                        EncounterKind::Misfortune => service.misfortune(agent, &ctx).await,
                    }
                };
                let outcome = with_deadline(deadline, roll, || ServiceError::Timeout {
                    agent_id,
                    deadline_ms,
                })
                .await;
                (agent_id, kind, outcome)
            }
        });
        let outcomes = join_all(tasks).await;

        let mut events = Vec::new();
        for (agent_id, kind, outcome) in outcomes {
            match outcome {
                Ok(Some(encounter)) => {
                    if let Some(agent) = world.registry.get_mut(agent_id) {
                        events.push(encounter.resolve(agent));
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(month = %now, agent_id = %agent_id, kind = ?kind, error = %err, "Encounter check failed");
                }
            }
        }
        events
    }

    /// Phases 2 and 12: let the persona service revise one field for every
    /// living agent concurrently.
    async fn phase_persona(&self, world: &mut World, field: PersonaField) -> Vec<Event> {
        let now = world.month_stamp;
        let deadline = self.settings.execution.service_timeout();
        let deadline_ms = self.settings.execution.service_timeout_ms;
        let service = self.persona.as_ref();

        let tasks = world.registry.living().map(move |agent| async move {
            let agent_id = agent.id;
            let revise = async {
                match field {
                    PersonaField::LongTermObjective => {
                        service.long_term_objective(agent, now).await
                    }
                    PersonaField::Nickname => service.nickname(agent, now).await,
                }
            };
            let outcome = with_deadline(deadline, revise, || ServiceError::Timeout {
                agent_id,
                deadline_ms,
            })
            .await;
            (agent_id, outcome)
        });
        let outcomes = join_all(tasks).await;

        let mut events = Vec::new();
        for (agent_id, outcome) in outcomes {
            match outcome {
                Ok(Some(update)) => {
                    let Some(agent) = world.registry.get_mut(agent_id) else {
                        continue;
                    };
                    match field {
                        PersonaField::LongTermObjective => {
                            agent.long_term_objective = Some(update.value);
                        }
                        PersonaField::Nickname => agent.nickname = Some(update.value),
                    }
                    events.extend(update.event);
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(month = %now, agent_id = %agent_id, field = ?field, error = %err, "Persona update failed");
                }
            }
        }
        events
    }
}

impl core::fmt::Debug for Simulator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Simulator")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Phase 5: start the head of the plan chain for every idle living agent.
fn phase_commit(world: &mut World) -> Vec<Event> {
    let now = world.month_stamp;
    world
        .registry
        .living_mut()
        .filter_map(|agent| agent.commit_next_plan(now))
        .collect()
}

/// Phase 13: pick a phenomenon on the first step, or in January once the
/// current one has lasted its duration.
fn phase_celestial_phenomenon(world: &mut World) -> Option<Event> {
    let now = world.month_stamp;
    let due = world
        .phenomenon
        .as_ref()
        .is_none_or(|state| state.is_expired(now));
    if !due {
        return None;
    }
    let next = pick_random_phenomenon(&mut world.rng)?;
    let text = match &world.phenomenon {
        None => format!(
            "At the dawn of the world, {} appeared: {}",
            next.name, next.description
        ),
        Some(old) => format!(
            "{} has faded; {} now shrouds the world: {}",
            old.phenomenon.name, next.name, next.description
        ),
    };
    info!(month = %now, phenomenon = %next.name, years = next.duration_years, "Celestial phenomenon changed");
    world.phenomenon = Some(PhenomenonState {
        phenomenon: next,
        start_year: now.year(),
    });
    Some(Event::world(now, text))
}

/// Phase 15: record metrics, deduplicate, archive, log, advance the clock.
fn finalize(world: &mut World, events: Vec<Event>, next: MonthStamp) -> Vec<Event> {
    let now = world.month_stamp;
    for agent in world.registry.all_mut() {
        agent.record_metrics(now);
    }

    let mut seen = BTreeSet::new();
    let unique: Vec<Event> = events
        .into_iter()
        .filter(|event| seen.insert(event.id()))
        .collect();

    for event in &unique {
        world.archive.add(event.clone());
        info!(month = %now, event_id = %event.id(), "{}", event.description());
    }

    world.month_stamp = next;
    debug!(month = %now, events = unique.len(), "Step finished");
    unique
}

/// Await `future`, converting an elapsed deadline into `on_timeout()`.
async fn with_deadline<T, E, F>(
    deadline: Duration,
    future: F,
    on_timeout: impl FnOnce() -> E,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    tokio::time::timeout(deadline, future)
        .await
        .unwrap_or_else(|_elapsed| Err(on_timeout()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use ascension_agents::{Age, Agent};
    use ascension_types::{Gender, Month};
    use ascension_world::{WorldMap, catalogue};

    use super::*;

    fn quiet_settings() -> StepSettings {
        StepSettings {
            awakening_rate: 0.0,
            ..StepSettings::default()
        }
    }

    fn world_at(year: u64, month: Month) -> World {
        World::new(
            WorldMap::new(4, 4).unwrap(),
            MonthStamp::from_year_month(year, month).unwrap(),
            7,
        )
    }

    fn add(world: &mut World, name: &str) -> AgentId {
        let agent = Agent::new(
            name,
            Gender::Female,
            Age::from_years(20, 80),
            ascension_world::Position::new(0, 0),
            MonthStamp::new(0),
        );
        world.registry.register(agent, false).unwrap()
    }

    #[tokio::test]
    async fn genesis_on_first_step_only() {
        let sim = Simulator::new(quiet_settings());
        let mut world = world_at(100, Month::January);

        let first = sim.step(&mut world).await.unwrap();
        assert_eq!(first.len(), 1);
        assert!(first[0].description().starts_with("At the dawn of the world"));
        assert_eq!(world.phenomenon.as_ref().unwrap().start_year, 100);

        let second = sim.step(&mut world).await.unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn phenomenon_changes_in_january_after_duration() {
        let mut world = world_at(110, Month::January);
        let mut old = catalogue()[0].clone();
        old.duration_years = 10;
        world.phenomenon = Some(PhenomenonState {
            phenomenon: old,
            start_year: 100,
        });
        let event = phase_celestial_phenomenon(&mut world).unwrap();
        assert!(event.description().contains("has faded"));
        assert_eq!(world.phenomenon.as_ref().unwrap().start_year, 110);
    }

    #[test]
    fn phenomenon_kept_outside_january() {
        let mut world = world_at(110, Month::March);
        let mut old = catalogue()[0].clone();
        old.duration_years = 1;
        world.phenomenon = Some(PhenomenonState {
            phenomenon: old,
            start_year: 100,
        });
        assert!(phase_celestial_phenomenon(&mut world).is_none());
    }

    #[tokio::test]
    async fn clock_and_age_advance_by_one() {
        let sim = Simulator::new(quiet_settings());
        let mut world = world_at(100, Month::May);
        let id = add(&mut world, "Yun Ning");
        let before = world.registry.get(id).unwrap().age.months;
        let start = world.month_stamp;

        sim.step(&mut world).await.unwrap();

        assert_eq!(world.month_stamp, start.checked_next().unwrap());
        assert_eq!(world.registry.get(id).unwrap().age.months, before + 1);
    }

    #[tokio::test]
    async fn certain_awakening_registers_newborn() {
        let sim = Simulator::new(StepSettings {
            awakening_rate: 1.0,
            ..StepSettings::default()
        });
        let mut world = world_at(100, Month::May);
        let events = sim.step(&mut world).await.unwrap();

        assert_eq!(world.registry.len(), 1);
        assert_eq!(world.registry.newly_born().len(), 1);
        assert!(
            events
                .iter()
                .any(|e| e.description().ends_with("has ascended to a cultivator."))
        );
    }

    #[test]
    fn finalize_archives_unique_events() {
        let mut world = world_at(100, Month::May);
        let event = Event::world(world.month_stamp, "a comet passes");
        let next = world.month_stamp.checked_next().unwrap();
        let out = finalize(&mut world, vec![event.clone(), event.clone(), event], next);
        assert_eq!(out.len(), 1);
        assert_eq!(world.archive.len(), 1);
        assert_eq!(world.month_stamp, next);
    }

    #[tokio::test]
    async fn clock_overflow_aborts_before_any_phase() {
        let sim = Simulator::new(quiet_settings());
        let mut world = World::new(WorldMap::new(2, 2).unwrap(), MonthStamp::new(u64::MAX), 1);
        let result = sim.step(&mut world).await;
        assert!(matches!(result, Err(TickError::Calendar { .. })));
        assert!(world.phenomenon.is_none());
        assert_eq!(world.month_stamp, MonthStamp::new(u64::MAX));
    }
}
