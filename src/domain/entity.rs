//! Domain Layer - Core Entity Trait
//!
//! This trait defines the basic contract for all domain entities.
//! All entities must have a unique ID and be thread-safe.

use thiserror::Error;

/// Core trait for all domain entities
pub trait Entity: Sized + Send + Sync + Clone {
    /// The type of the entity's unique identifier
    type Id: Copy + Eq + std::hash::Hash + Send + Sync;

    /// Returns the entity's unique identifier
    fn id(&self) -> Self::Id;
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
///
/// Every failure an operation can hit maps to exactly one variant, so
/// callers can assert on failure paths instead of seeing silent no-ops.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Seed fetch could not reach the remote endpoint
    #[error("network failure: {0}")]
    Network(#[from] reqwest::Error),

    /// Seed payload was not the expected JSON shape
    #[error("malformed seed payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// A store query failed
    #[error("store read failed: {0}")]
    StoreRead(String),

    /// A store commit failed; the store is unchanged
    #[error("store write failed: {0}")]
    StoreWrite(String),

    /// Mutation target does not exist
    #[error("task {0} not found")]
    NotFound(i32),
}
