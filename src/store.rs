//! The entity store abstraction and the in-memory reference backend.
//!
//! The engine never talks to a knowledge-base API directly; it fetches and
//! persists entities through the [`EntityStore`] trait. Production backends
//! wrap the remote API, while [`MemoryStore`] backs tests and embedded use.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

use crate::entity::{Entity, EntityId};

/// Errors produced by entity store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No entity with the given ID exists.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// A transient failure (connection reset, timeout, rate limit).
    #[error("transient store failure: {0}")]
    Transient(String),

    /// The remote API rejected the request.
    #[error("API error (code {code}): {message}")]
    Api {
        /// HTTP-style status code.
        code: u32,
        /// Human-readable message from the backend.
        message: String,
    },

    /// The backend could not encode or decode an entity.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A lock or other internal backend invariant failed.
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns true if the same request may succeed on retry.
    ///
    /// Transient failures and server-side API errors (code >= 500) are
    /// retryable; everything else is fatal for the current payload.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transient(_) => true,
            Self::Api { code, .. } => *code >= 500,
            Self::EntityNotFound(_) | Self::Serialization(_) | Self::Backend(_) => false,
        }
    }
}

/// Fetch and persist entities.
///
/// Implementations should be cheap to call from a single thread; the engine
/// performs no internal locking and commits synchronously.
pub trait EntityStore {
    /// Fetches an entity by ID.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::EntityNotFound`] for unknown IDs, or a backend
    /// failure.
    fn fetch(&self, id: &EntityId) -> Result<Entity, StoreError>;

    /// Persists the entity with an edit summary.
    ///
    /// `bot_edit` marks the edit as automated where the backend supports
    /// the distinction.
    ///
    /// # Errors
    ///
    /// Returns a backend failure; the commit driver retries when
    /// [`StoreError::is_retryable`] holds.
    fn commit(&self, entity: &Entity, summary: &str, bot_edit: bool) -> Result<(), StoreError>;
}

/// One persisted edit, as recorded by [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// The entity that was written.
    pub entity_id: EntityId,
    /// The edit summary supplied by the driver.
    pub summary: String,
    /// Whether the edit was flagged as automated.
    pub bot_edit: bool,
}

#[derive(Debug, Default)]
struct MemoryState {
    entities: HashMap<EntityId, Entity>,
    commits: Vec<CommitRecord>,
}

/// In-memory entity store.
///
/// Stores full entity snapshots and keeps a log of every commit so tests
/// can assert on summaries and edit counts without a network.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with an entity, replacing any previous snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the internal lock is poisoned.
    pub fn seed(&self, entity: Entity) -> Result<(), StoreError> {
        let mut state = self
            .state
            .write()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        state.entities.insert(entity.id.clone(), entity);
        Ok(())
    }

    /// Returns the commit log so far.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Backend`] if the internal lock is poisoned.
    pub fn commits(&self) -> Result<Vec<CommitRecord>, StoreError> {
        let state = self
            .state
            .read()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(state.commits.clone())
    }
}

impl EntityStore for MemoryStore {
    fn fetch(&self, id: &EntityId) -> Result<Entity, StoreError> {
        let state = self
            .state
            .read()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        state
            .entities
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::EntityNotFound(id.clone()))
    }

    fn commit(&self, entity: &Entity, summary: &str, bot_edit: bool) -> Result<(), StoreError> {
        let mut state = self
            .state
            .write()
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        state.entities.insert(entity.id.clone(), entity.clone());
        state.commits.push(CommitRecord {
            entity_id: entity.id.clone(),
            summary: summary.to_string(),
            bot_edit,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::Statement;
    use crate::value::Value;

    #[test]
    fn test_retryability() {
        assert!(StoreError::Transient("reset".to_string()).is_retryable());
        assert!(StoreError::Api {
            code: 503,
            message: "overloaded".to_string()
        }
        .is_retryable());
        assert!(!StoreError::Api {
            code: 400,
            message: "bad request".to_string()
        }
        .is_retryable());
        assert!(!StoreError::EntityNotFound(EntityId::new("Q1")).is_retryable());
    }

    #[test]
    fn test_fetch_unknown_entity() {
        let store = MemoryStore::new();
        let err = store.fetch(&EntityId::new("Q404")).unwrap_err();
        assert!(matches!(err, StoreError::EntityNotFound(_)));
    }

    #[test]
    fn test_seed_fetch_commit_round_trip() {
        let store = MemoryStore::new();
        let mut entity = Entity::new("Q42");
        entity.push_statement(Statement::new("P31", Value::item("Q5")));
        store.seed(entity.clone()).unwrap();

        let fetched = store.fetch(&EntityId::new("Q42")).unwrap();
        assert_eq!(fetched, entity);

        store.commit(&fetched, "test edit", true).unwrap();
        let commits = store.commits().unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].summary, "test edit");
        assert!(commits[0].bot_edit);
    }

    #[test]
    fn test_commit_replaces_snapshot() {
        let store = MemoryStore::new();
        let mut entity = Entity::new("Q42");
        store.seed(entity.clone()).unwrap();

        entity.push_statement(Statement::new("P31", Value::item("Q5")));
        store.commit(&entity, "add claim", false).unwrap();

        let fetched = store.fetch(&EntityId::new("Q42")).unwrap();
        assert_eq!(fetched.statements(&"P31".into()).len(), 1);
    }
}
