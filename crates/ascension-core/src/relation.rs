//! Relationship resolver trait.
//!
//! The relation scheduler hands the resolver every unordered pair whose
//! interaction count crossed the threshold this month, as one batch. The
//! resolver decides whether each pair's relation changes, applies the
//! change through the registry (which keeps both sides in step), and
//! returns the resulting events.

use ascension_agents::AgentRegistry;
use ascension_types::{AgentId, Event, MonthStamp};

/// Errors raised by a relationship resolver.
#[derive(Debug, thiserror::Error)]
pub enum RelationError {
    /// The batch did not finish within the deadline.
    #[error("relationship resolver timed out (deadline: {deadline_ms}ms)")]
    Timeout {
        /// The deadline in milliseconds.
        deadline_ms: u64,
    },

    /// The resolver failed.
    #[error("relationship resolver error: {message}")]
    Internal {
        /// Description of the error.
        message: String,
    },
}

/// Resolves relation changes for batches of agent pairs.
#[async_trait::async_trait]
pub trait RelationshipResolver: Send + Sync {
    /// Resolve every pair in `pairs`. Each unordered pair appears once,
    /// with the smaller id first.
    ///
    /// # Errors
    ///
    /// Returns [`RelationError`] if the batch fails as a whole.
    async fn run_batch(
        &self,
        registry: &mut AgentRegistry,
        pairs: &[(AgentId, AgentId)],
        now: MonthStamp,
    ) -> Result<Vec<Event>, RelationError>;
}

/// A resolver that never changes any relation.
#[derive(Debug, Clone, Default)]
pub struct StubRelationshipResolver;

impl StubRelationshipResolver {
    /// Create a new stub resolver.
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl RelationshipResolver for StubRelationshipResolver {
    async fn run_batch(
        &self,
        _registry: &mut AgentRegistry,
        _pairs: &[(AgentId, AgentId)],
        _now: MonthStamp,
    ) -> Result<Vec<Event>, RelationError> {
        Ok(Vec::new())
    }
}
