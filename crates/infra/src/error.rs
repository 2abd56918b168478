//! Coordinator error surface.

use rust_decimal::Decimal;
use thiserror::Error;

use pawtrack_core::{DomainError, ItemId};

use crate::repository::RepositoryError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StockError {
    /// Input rejected before any state was read or written.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("inventory item not found")]
    NotFound,

    #[error("inventory item {0} is inactive")]
    ItemInactive(ItemId),

    #[error("insufficient stock (requested: {requested}, available: {available})")]
    InsufficientStock { requested: Decimal, available: Decimal },

    /// Another writer kept winning, or the per-item lock could not be acquired
    /// in time. Safe to retry.
    #[error("concurrency conflict: {0}")]
    ConcurrencyConflict(String),

    /// The item or ledger store failed; no partial write is left behind.
    #[error("store error: {0}")]
    Store(RepositoryError),

    /// The item was written but neither the ledger append nor the compensating
    /// restore succeeded. Item and ledger disagree until repaired.
    #[error("item and ledger are inconsistent: {0}")]
    Consistency(String),
}

impl StockError {
    /// Map a domain rejection raised while operating on `item_id`.
    pub(crate) fn from_domain(item_id: ItemId, err: DomainError) -> Self {
        match err {
            DomainError::Inactive(_) => StockError::ItemInactive(item_id),
            other => StockError::from(other),
        }
    }
}

impl From<DomainError> for StockError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => StockError::Validation(msg),
            DomainError::InvalidId(msg) => StockError::Validation(msg),
            DomainError::InvariantViolation(msg) => StockError::Validation(msg),
            DomainError::NotFound => StockError::NotFound,
            DomainError::Conflict(msg) => StockError::Validation(msg),
            DomainError::Inactive(msg) => StockError::Validation(msg),
            DomainError::InsufficientStock {
                requested,
                available,
            } => StockError::InsufficientStock {
                requested,
                available,
            },
        }
    }
}

impl From<RepositoryError> for StockError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Conflict(msg) => StockError::ConcurrencyConflict(msg),
            RepositoryError::NotFound => StockError::NotFound,
            other => StockError::Store(other),
        }
    }
}
