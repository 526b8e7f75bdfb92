//! The registry that owns every avatar, living or dead.
//!
//! Agents are stored in a `BTreeMap` keyed by [`AgentId`]. Ids are UUID v7,
//! so ascending key order is registration order and every iteration over
//! the registry is deterministic.

use std::collections::BTreeMap;

use ascension_types::AgentId;

use crate::agent::Agent;
use crate::error::AgentError;
use crate::social::Relation;

/// Owner of all agents.
#[derive(Debug, Clone, Default)]
pub struct AgentRegistry {
    agents: BTreeMap<AgentId, Agent>,
    newly_born: Vec<AgentId>,
}

impl AgentRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            agents: BTreeMap::new(),
            newly_born: Vec::new(),
        }
    }

    /// Register an agent. `newly_born` marks it as awakened this month.
    pub fn register(&mut self, agent: Agent, newly_born: bool) -> Result<AgentId, AgentError> {
        let id = agent.id;
        if self.agents.contains_key(&id) {
            return Err(AgentError::DuplicateAgent(id));
        }
        self.agents.insert(id, agent);
        if newly_born {
            self.newly_born.push(id);
        }
        Ok(id)
    }

    /// Look up an agent.
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    /// Look up an agent mutably.
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(&id)
    }

    /// Look up an agent, failing if absent.
    pub fn require(&self, id: AgentId) -> Result<&Agent, AgentError> {
        self.get(id).ok_or(AgentError::AgentNotFound(id))
    }

    /// Look up an agent mutably, failing if absent.
    pub fn require_mut(&mut self, id: AgentId) -> Result<&mut Agent, AgentError> {
        self.get_mut(id).ok_or(AgentError::AgentNotFound(id))
    }

    /// Whether the agent exists and is alive.
    pub fn is_alive(&self, id: AgentId) -> bool {
        self.get(id).is_some_and(Agent::is_alive)
    }

    /// Ids of living agents in registry order.
    pub fn living_ids(&self) -> Vec<AgentId> {
        self.living().map(|agent| agent.id).collect()
    }

    /// Living agents in registry order.
    pub fn living(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values().filter(|agent| agent.is_alive())
    }

    /// Living agents in registry order, mutably.
    ///
    /// The borrows are disjoint, so the result can feed a per-agent fan-out.
    pub fn living_mut(&mut self) -> impl Iterator<Item = &mut Agent> {
        self.agents.values_mut().filter(|agent| agent.is_alive())
    }

    /// Every agent, living or dead, in registry order.
    pub fn all(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    /// Every agent mutably, living or dead, in registry order.
    pub fn all_mut(&mut self) -> impl Iterator<Item = &mut Agent> {
        self.agents.values_mut()
    }

    /// Total number of agents ever registered.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether no agent was ever registered.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Number of living agents.
    pub fn living_count(&self) -> usize {
        self.living().count()
    }

    /// Agents registered as newly born since the last [`Self::clear_newly_born`].
    pub fn newly_born(&self) -> &[AgentId] {
        &self.newly_born
    }

    /// Forget the newly-born bookkeeping.
    pub fn clear_newly_born(&mut self) {
        self.newly_born.clear();
    }

    /// Borrow two distinct agents mutably at once.
    pub fn get_pair_mut(
        &mut self,
        a: AgentId,
        b: AgentId,
    ) -> Result<(&mut Agent, &mut Agent), AgentError> {
        if a == b {
            return Err(AgentError::SelfRelation(a));
        }
        if !self.agents.contains_key(&a) {
            return Err(AgentError::AgentNotFound(a));
        }
        if !self.agents.contains_key(&b) {
            return Err(AgentError::AgentNotFound(b));
        }
        let mut first = None;
        let mut second = None;
        for (id, agent) in &mut self.agents {
            if *id == a {
                first = Some(agent);
            } else if *id == b {
                second = Some(agent);
            }
        }
        match (first, second) {
            (Some(x), Some(y)) => Ok((x, y)),
            (None, _) => Err(AgentError::AgentNotFound(a)),
            (_, None) => Err(AgentError::AgentNotFound(b)),
        }
    }

    /// Count one interaction between `a` and `b` on both sides.
    pub fn record_interaction(&mut self, a: AgentId, b: AgentId) -> Result<(), AgentError> {
        let (left, right) = self.get_pair_mut(a, b)?;
        left.record_interaction(b);
        right.record_interaction(a);
        Ok(())
    }

    /// Reset both sides' counters for the pair and bump their check counts.
    pub fn mark_pair_checked(&mut self, a: AgentId, b: AgentId) -> Result<(), AgentError> {
        let (left, right) = self.get_pair_mut(a, b)?;
        left.mark_relation_checked(b);
        right.mark_relation_checked(a);
        Ok(())
    }

    /// Set a relation on both sides.
    pub fn set_relation(
        &mut self,
        a: AgentId,
        b: AgentId,
        relation: Relation,
    ) -> Result<(), AgentError> {
        let (left, right) = self.get_pair_mut(a, b)?;
        left.relations.insert(b, relation);
        right.relations.insert(a, relation);
        Ok(())
    }

    /// Clear the relation on both sides. Returns the previous value.
    pub fn clear_relation(
        &mut self,
        a: AgentId,
        b: AgentId,
    ) -> Result<Option<Relation>, AgentError> {
        let (left, right) = self.get_pair_mut(a, b)?;
        right.relations.remove(&a);
        Ok(left.relations.remove(&b))
    }

    /// Whether any agent with this name exists.
    pub fn name_taken(&self, name: &str) -> bool {
        self.agents.values().any(|agent| agent.name == name)
    }
}
