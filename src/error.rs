//! Error types for claimsync.
//!
//! All errors are strongly typed with thiserror. The split mirrors the
//! propagation policy: parse failures are local and never retried, store
//! failures carry a retryability discriminator consumed by the commit
//! driver, and engine failures are what callers see per entity.

use thiserror::Error;

use crate::entity::EntityId;
use crate::store::StoreError;

/// Input parsing errors. Fail fast, never retried.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The URL is not a well-formed entity concept URI.
    #[error("invalid entity URL: {url}")]
    InvalidEntityUrl {
        /// The offending URL.
        url: String,
    },
}

/// Top-level error type for one reconciliation run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Input parsing failed.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A store operation failed (after exhausting retries, for commits).
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The entity could not be serialized for content hashing.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A hook requested a re-cycle but no statement actually changed.
    ///
    /// Only raised when
    /// [`Config::throw_on_no_edit_cycle`](crate::Config::throw_on_no_edit_cycle)
    /// is set; otherwise the reconciliation loop stops silently.
    #[error("re-cycle requested for {entity} without any change to its statements")]
    NoProgressCycle {
        /// The entity being reconciled when the loop stalled.
        entity: EntityId,
    },
}

impl EngineError {
    /// Returns true if retrying the whole run might succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Store(e) => e.is_retryable(),
            Self::Parse(_) | Self::Serialization(_) | Self::NoProgressCycle { .. } => false,
        }
    }
}
