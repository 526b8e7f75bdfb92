//! The avatar entity and its per-agent operations.
//!
//! An [`Agent`] is owned by the [`AgentRegistry`](crate::AgentRegistry) and
//! is never removed from it: death only sets [`Agent::death`], so events and
//! relations that reference a dead avatar stay resolvable.
//!
//! Every method here touches only the agent's own state. Operations that
//! must change two agents together (interaction resets, relations) live on
//! the registry.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use ascension_types::{
    AgentId, AvatarMetrics, DeathCause, Event, Gender, MetricTag, MonthStamp, RegionId,
};
use ascension_world::Position;
use serde::{Deserialize, Serialize};

use crate::plan::{ActiveAction, PlannedAction};
use crate::social::{InteractionState, Relation};
use crate::vitals::{Age, Cultivation, Health, TemporaryEffect};

/// Default maximum health of a new avatar.
pub const DEFAULT_MAX_HP: i32 = 100;

/// Default monthly health regeneration of a new avatar.
pub const DEFAULT_REGEN_PER_MONTH: i32 = 2;

/// When and how an avatar died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathRecord {
    /// Month of death.
    pub month: MonthStamp,
    /// Cause of death.
    pub cause: DeathCause,
}

/// A simulated cultivator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Unique identifier.
    pub id: AgentId,
    /// Display name.
    pub name: String,
    /// Gender.
    pub gender: Gender,
    /// Month the avatar awakened as a cultivator.
    pub awakened_at: MonthStamp,
    /// Tile the avatar stands on.
    pub position: Position,
    /// Age and lifespan.
    pub age: Age,
    /// Health.
    pub health: Health,
    /// Cultivation level and progress.
    pub cultivation: Cultivation,
    /// Spirit stones held.
    pub spirit_stones: u64,
    /// Action being executed; `None` means idle.
    pub current_action: Option<ActiveAction>,
    /// Queued plan chain, head first.
    pub plans: VecDeque<PlannedAction>,
    /// Latest reasoning text from the decision service.
    pub thinking: String,
    /// Latest short-term objective.
    pub short_term_objective: String,
    /// Long-term goal, if one has been set.
    pub long_term_objective: Option<String>,
    /// Social nickname, if one has been earned.
    pub nickname: Option<String>,
    /// Interaction counters keyed by peer.
    pub interactions: BTreeMap<AgentId, InteractionState>,
    /// Established relations keyed by peer.
    pub relations: BTreeMap<AgentId, Relation>,
    /// Regions the avatar has observed.
    pub known_regions: BTreeSet<RegionId>,
    /// Active temporary effects.
    pub effects: Vec<TemporaryEffect>,
    /// Whether a metrics snapshot is recorded every month.
    pub metrics_tracking: bool,
    /// Recorded metrics snapshots, oldest first.
    pub metrics_history: Vec<AvatarMetrics>,
    /// Tags collected since the last snapshot.
    pub pending_tags: Vec<MetricTag>,
    /// Set once the avatar dies.
    pub death: Option<DeathRecord>,
}

impl Agent {
    /// Create a living, idle avatar at full health and cultivation level 1.
    pub fn new(
        name: impl Into<String>,
        gender: Gender,
        age: Age,
        position: Position,
        awakened_at: MonthStamp,
    ) -> Self {
        Self {
            id: AgentId::new(),
            name: name.into(),
            gender,
            awakened_at,
            position,
            age,
            health: Health::full(DEFAULT_MAX_HP, DEFAULT_REGEN_PER_MONTH),
            cultivation: Cultivation::novice(),
            spirit_stones: 0,
            current_action: None,
            plans: VecDeque::new(),
            thinking: String::new(),
            short_term_objective: String::new(),
            long_term_objective: None,
            nickname: None,
            interactions: BTreeMap::new(),
            relations: BTreeMap::new(),
            known_regions: BTreeSet::new(),
            effects: Vec::new(),
            metrics_tracking: false,
            metrics_history: Vec::new(),
            pending_tags: Vec::new(),
            death: None,
        }
    }

    /// Whether the avatar is alive.
    pub const fn is_alive(&self) -> bool {
        self.death.is_none()
    }

    /// Whether the avatar has no action in progress.
    pub const fn is_idle(&self) -> bool {
        self.current_action.is_none()
    }

    /// Whether the avatar has queued plans.
    pub fn has_plans(&self) -> bool {
        !self.plans.is_empty()
    }

    /// Whether the avatar needs a decision: idle with nothing queued.
    pub fn needs_decision(&self) -> bool {
        self.is_alive() && self.is_idle() && !self.has_plans()
    }

    /// Append a plan chain without starting anything.
    pub fn load_plan_chain(&mut self, chain: impl IntoIterator<Item = PlannedAction>) {
        self.plans.extend(chain);
    }

    /// Start the head of the plan chain if the avatar is idle.
    ///
    /// Returns the "started" event when the plan carries an announcement.
    pub fn commit_next_plan(&mut self, now: MonthStamp) -> Option<Event> {
        if !self.is_alive() || !self.is_idle() {
            return None;
        }
        let plan = self.plans.pop_front()?;
        let announcement = plan.announcement.clone();
        self.current_action = Some(ActiveAction::start(plan, now));
        announcement.map(|text| Event::about(now, format!("{} {text}", self.name), self.id))
    }

    /// Count one interaction with `peer` on this side only.
    pub fn record_interaction(&mut self, peer: AgentId) {
        if peer == self.id {
            return;
        }
        self.interactions.entry(peer).or_default().record();
    }

    /// Reset this side's counter toward `peer` and bump its check count.
    pub fn mark_relation_checked(&mut self, peer: AgentId) {
        self.interactions.entry(peer).or_default().mark_checked();
    }

    /// Peers whose interaction count has reached `threshold`.
    pub fn peers_at_threshold(&self, threshold: u32) -> impl Iterator<Item = AgentId> + '_ {
        self.interactions
            .iter()
            .filter(move |(_, state)| state.count >= threshold)
            .map(|(peer, _)| *peer)
    }

    /// Mark regions as known and return those that were new.
    pub fn learn_regions(&mut self, regions: impl IntoIterator<Item = RegionId>) -> Vec<RegionId> {
        regions
            .into_iter()
            .filter(|region| self.known_regions.insert(*region))
            .collect()
    }

    /// Advance age by one month.
    pub const fn advance_age(&mut self) {
        self.age.advance();
    }

    /// Remove effects that have lapsed at `now` and return them.
    pub fn expire_effects(&mut self, now: MonthStamp) -> Vec<TemporaryEffect> {
        let (expired, active): (Vec<_>, Vec<_>) =
            self.effects.drain(..).partition(|effect| effect.is_expired(now));
        self.effects = active;
        expired
    }

    /// Apply one month of passive effects: regeneration and effect bonuses.
    pub fn apply_time_effects(&mut self) {
        let was_wounded = self.health.is_wounded() && !self.health.is_depleted();
        let regen = self
            .effects
            .iter()
            .fold(self.health.regen_per_month, |acc, effect| {
                acc.saturating_add(effect.regen_bonus)
            });
        self.health.heal(regen);
        if was_wounded && !self.health.is_wounded() {
            self.pending_tags.push(MetricTag::Recovered);
        }

        let bonus = self
            .effects
            .iter()
            .fold(0_u32, |acc, effect| acc.saturating_add(effect.cultivation_bonus));
        if bonus > 0 {
            self.gain_cultivation(bonus);
        }
    }

    /// Add cultivation progress and return levels gained.
    ///
    /// Each breakthrough is tagged, and entering a higher realm extends the
    /// lifespan to at least the realm's base lifespan.
    pub fn gain_cultivation(&mut self, amount: u32) -> u32 {
        let levels = self.cultivation.gain(amount);
        if levels > 0 {
            self.pending_tags.push(MetricTag::Breakthrough);
            let base = self.cultivation.realm().base_lifespan_years();
            self.age.lifespan_years = self.age.lifespan_years.max(base);
        }
        levels
    }

    /// Apply damage and tag the injury.
    pub fn take_damage(&mut self, amount: i32) {
        if amount <= 0 {
            return;
        }
        self.health.damage(amount);
        self.pending_tags.push(MetricTag::Injured);
    }

    /// Add a temporary effect.
    pub fn apply_effect(&mut self, effect: TemporaryEffect) {
        self.effects.push(effect);
    }

    /// Flag the avatar dead and clear anything it was doing.
    ///
    /// Returns `false` if the avatar was already dead.
    pub fn mark_dead(&mut self, month: MonthStamp, cause: DeathCause) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.death = Some(DeathRecord { month, cause });
        self.current_action = None;
        self.plans.clear();
        self.pending_tags.push(MetricTag::Death);
        true
    }

    /// Build a snapshot of the current state without recording it.
    pub fn snapshot(&self, now: MonthStamp) -> AvatarMetrics {
        AvatarMetrics {
            timestamp: now,
            age_years: self.age.years(),
            cultivation_level: self.cultivation.level,
            cultivation_progress: self.cultivation.progress,
            hp: self.health.current,
            hp_max: self.health.max,
            spirit_stones: self.spirit_stones,
            relations_count: u32::try_from(self.relations.len()).unwrap_or(u32::MAX),
            known_regions_count: u32::try_from(self.known_regions.len()).unwrap_or(u32::MAX),
            tags: self.pending_tags.clone(),
        }
    }

    /// Record a metrics snapshot if tracking is enabled.
    ///
    /// Pending tags are consumed by the snapshot. Returns whether a snapshot
    /// was recorded.
    pub fn record_metrics(&mut self, now: MonthStamp) -> bool {
        if !self.metrics_tracking {
            return false;
        }
        let snapshot = self.snapshot(now);
        self.pending_tags.clear();
        self.metrics_history.push(snapshot);
        true
    }

    /// Name with nickname, as used in event text.
    pub fn display_name(&self) -> String {
        match &self.nickname {
            Some(nick) => format!("{} \"{nick}\"", self.name),
            None => self.name.clone(),
        }
    }
}
