//! Persona service trait: nicknames and long-term objectives.
//!
//! Both are slow-changing descriptions of an agent that an external service
//! may revise at most once per agent per month. Calls run concurrently and
//! only read the agent.

use ascension_agents::Agent;
use ascension_types::{Event, MonthStamp};

use crate::encounter::ServiceError;

/// A new value for a persona field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaUpdate {
    /// The new nickname or objective.
    pub value: String,
    /// Event announcing the change, if it is worth one.
    pub event: Option<Event>,
}

/// Revises nicknames and long-term objectives.
#[async_trait::async_trait]
pub trait PersonaService: Send + Sync {
    /// Decide whether `agent` earns a new nickname.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] on failure; the orchestrator logs it and
    /// moves on.
    async fn nickname(
        &self,
        agent: &Agent,
        now: MonthStamp,
    ) -> Result<Option<PersonaUpdate>, ServiceError>;

    /// Decide whether `agent` sets or revises its long-term objective.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError`] on failure; the orchestrator logs it and
    /// moves on.
    async fn long_term_objective(
        &self,
        agent: &Agent,
        now: MonthStamp,
    ) -> Result<Option<PersonaUpdate>, ServiceError>;
}

/// A persona service that never changes anything.
#[derive(Debug, Clone, Default)]
pub struct StaticPersona;

#[async_trait::async_trait]
impl PersonaService for StaticPersona {
    async fn nickname(
        &self,
        _agent: &Agent,
        _now: MonthStamp,
    ) -> Result<Option<PersonaUpdate>, ServiceError> {
        Ok(None)
    }

    async fn long_term_objective(
        &self,
        _agent: &Agent,
        _now: MonthStamp,
    ) -> Result<Option<PersonaUpdate>, ServiceError> {
        Ok(None)
    }
}
