use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use pawtrack_core::{AggregateRoot, ExpectedVersion, ItemId, TransactionId};
use pawtrack_inventory::{InventoryItem, StockTransaction};

use super::query::{ItemFilter, Page, SortOrder, TransactionFilter};
use super::r#trait::{ItemRepository, RepositoryError, TransactionRepository};

fn same_sku(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}

/// In-memory item store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryItemRepository {
    items: RwLock<HashMap<ItemId, InventoryItem>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn sku_taken(items: &HashMap<ItemId, InventoryItem>, item: &InventoryItem) -> bool {
        items
            .values()
            .any(|other| other.id_typed() != item.id_typed() && same_sku(other.sku(), item.sku()))
    }
}

impl ItemRepository for InMemoryItemRepository {
    fn insert(&self, item: &InventoryItem) -> Result<(), RepositoryError> {
        let mut items = self.items.write().map_err(|_| RepositoryError::Poisoned)?;

        if items.contains_key(item.id()) {
            return Err(RepositoryError::Duplicate(format!("item {}", item.id())));
        }
        if Self::sku_taken(&items, item) {
            return Err(RepositoryError::Duplicate(format!(
                "sku {}",
                item.sku().unwrap_or_default()
            )));
        }

        items.insert(item.id_typed(), item.clone());
        Ok(())
    }

    fn find_by_id(&self, id: ItemId) -> Result<Option<InventoryItem>, RepositoryError> {
        let items = self.items.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(items.get(&id).cloned())
    }

    fn find_by_sku(&self, sku: &str) -> Result<Option<InventoryItem>, RepositoryError> {
        let items = self.items.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(items
            .values()
            .find(|item| same_sku(item.sku(), Some(sku.trim())))
            .cloned())
    }

    fn update(
        &self,
        item: &InventoryItem,
        expected: ExpectedVersion,
    ) -> Result<(), RepositoryError> {
        let mut items = self.items.write().map_err(|_| RepositoryError::Poisoned)?;

        let current = items
            .get(item.id())
            .map(|stored| stored.version())
            .ok_or(RepositoryError::NotFound)?;

        if !expected.matches(current) {
            return Err(RepositoryError::Conflict(format!(
                "expected {expected:?}, found {current}"
            )));
        }
        if Self::sku_taken(&items, item) {
            return Err(RepositoryError::Duplicate(format!(
                "sku {}",
                item.sku().unwrap_or_default()
            )));
        }

        items.insert(item.id_typed(), item.clone());
        Ok(())
    }

    fn list(&self, filter: &ItemFilter) -> Result<Page<InventoryItem>, RepositoryError> {
        let items = self.items.read().map_err(|_| RepositoryError::Poisoned)?;

        let mut rows: Vec<InventoryItem> = items
            .values()
            .map(|item| match &filter.as_of {
                Some((now, policy)) => item.refreshed(*now, policy),
                None => item.clone(),
            })
            .filter(|item| filter.matches(item))
            .collect();
        drop(items);

        rows.sort_by(|a, b| a.name().cmp(b.name()).then(a.id_typed().cmp(&b.id_typed())));
        Ok(filter.page.apply(rows))
    }
}

#[derive(Debug, Default)]
struct Ledger {
    entries: Vec<StockTransaction>,
    ids: HashSet<TransactionId>,
}

/// In-memory append-only ledger.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryTransactionRepository {
    ledger: RwLock<Ledger>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransactionRepository for InMemoryTransactionRepository {
    fn append(&self, entry: &StockTransaction) -> Result<(), RepositoryError> {
        let mut ledger = self.ledger.write().map_err(|_| RepositoryError::Poisoned)?;

        if !ledger.ids.insert(entry.id_typed()) {
            return Err(RepositoryError::Duplicate(format!(
                "transaction {}",
                entry.id_typed()
            )));
        }
        ledger.entries.push(entry.clone());
        Ok(())
    }

    fn list(&self, filter: &TransactionFilter) -> Result<Page<StockTransaction>, RepositoryError> {
        let ledger = self.ledger.read().map_err(|_| RepositoryError::Poisoned)?;

        let mut rows: Vec<StockTransaction> = ledger
            .entries
            .iter()
            .filter(|entry| filter.matches(entry))
            .cloned()
            .collect();
        drop(ledger);

        rows.sort_by(|a, b| {
            a.processed_at()
                .cmp(&b.processed_at())
                .then(a.sequence().cmp(&b.sequence()))
        });
        if filter.order == SortOrder::NewestFirst {
            rows.reverse();
        }
        Ok(filter.page.apply(rows))
    }
}
