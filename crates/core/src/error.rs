//! Errors raised by pure domain logic.

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Deterministic rejection of a command or value. Storage failures are
/// modelled by the layers that own storage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Non-positive quantity, blank name, unknown wire name and the like.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A command addressed to the wrong aggregate.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("not found")]
    NotFound,

    /// The requested state is already in place.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The aggregate is deactivated and rejects further stock mutation.
    #[error("inactive: {0}")]
    Inactive(String),

    /// A removal asked for more than is on hand.
    #[error("insufficient stock (requested: {requested}, available: {available})")]
    InsufficientStock { requested: Decimal, available: Decimal },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn inactive(msg: impl Into<String>) -> Self {
        Self::Inactive(msg.into())
    }

    pub fn insufficient_stock(requested: Decimal, available: Decimal) -> Self {
        Self::InsufficientStock {
            requested,
            available,
        }
    }
}
