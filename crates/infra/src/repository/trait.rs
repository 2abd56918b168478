use std::sync::Arc;

use thiserror::Error;

use pawtrack_core::{ExpectedVersion, ItemId};
use pawtrack_inventory::{InventoryItem, StockTransaction};

use super::query::{ItemFilter, Page, TransactionFilter};

/// Repository operation error.
///
/// These are infrastructure errors (storage, concurrency) as opposed to domain
/// errors (validation, invariants).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// A version-conditioned write found a different stored version.
    #[error("optimistic concurrency check failed: {0}")]
    Conflict(String),

    #[error("record not found")]
    NotFound,

    /// Insert of an identifier (or unique key) that already exists.
    #[error("duplicate record: {0}")]
    Duplicate(String),

    /// The backing store could not serve the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Current-state storage for inventory items.
///
/// Items are stored as whole values and replaced on write. There is no delete:
/// retired items are deactivated instead.
pub trait ItemRepository: Send + Sync {
    /// Store a new item. Fails with `Duplicate` on a known ID or SKU.
    fn insert(&self, item: &InventoryItem) -> Result<(), RepositoryError>;

    fn find_by_id(&self, id: ItemId) -> Result<Option<InventoryItem>, RepositoryError>;

    fn find_by_sku(&self, sku: &str) -> Result<Option<InventoryItem>, RepositoryError>;

    /// Replace the stored item if its version satisfies `expected`.
    fn update(
        &self,
        item: &InventoryItem,
        expected: ExpectedVersion,
    ) -> Result<(), RepositoryError>;

    fn list(&self, filter: &ItemFilter) -> Result<Page<InventoryItem>, RepositoryError>;
}

/// Append-only storage for ledger entries.
pub trait TransactionRepository: Send + Sync {
    /// Append one entry. Fails with `Duplicate` if its ID is already stored.
    fn append(&self, entry: &StockTransaction) -> Result<(), RepositoryError>;

    fn list(&self, filter: &TransactionFilter) -> Result<Page<StockTransaction>, RepositoryError>;
}

impl<R> ItemRepository for Arc<R>
where
    R: ItemRepository + ?Sized,
{
    fn insert(&self, item: &InventoryItem) -> Result<(), RepositoryError> {
        (**self).insert(item)
    }

    fn find_by_id(&self, id: ItemId) -> Result<Option<InventoryItem>, RepositoryError> {
        (**self).find_by_id(id)
    }

    fn find_by_sku(&self, sku: &str) -> Result<Option<InventoryItem>, RepositoryError> {
        (**self).find_by_sku(sku)
    }

    fn update(
        &self,
        item: &InventoryItem,
        expected: ExpectedVersion,
    ) -> Result<(), RepositoryError> {
        (**self).update(item, expected)
    }

    fn list(&self, filter: &ItemFilter) -> Result<Page<InventoryItem>, RepositoryError> {
        (**self).list(filter)
    }
}

impl<R> TransactionRepository for Arc<R>
where
    R: TransactionRepository + ?Sized,
{
    fn append(&self, entry: &StockTransaction) -> Result<(), RepositoryError> {
        (**self).append(entry)
    }

    fn list(&self, filter: &TransactionFilter) -> Result<Page<StockTransaction>, RepositoryError> {
        (**self).list(filter)
    }
}
