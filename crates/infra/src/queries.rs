//! Read side: lookups, filtered listings, history and statistics.
//!
//! Nothing here takes item locks. Every returned item has its derived flags
//! evaluated at the time of the read.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use pawtrack_core::ItemId;
use pawtrack_inventory::{
    InventoryItem, InventoryStatistics, ItemCategory, ItemStatus, StockTransaction,
    TransactionStatistics, verify_chain,
};

use crate::clock::{Clock, SystemClock};
use crate::config::CoordinatorConfig;
use crate::error::StockError;
use crate::repository::{
    ItemFilter, ItemRepository, Page, Pagination, SortOrder, TransactionFilter,
    TransactionRepository,
};

/// Both statistics rollups, computed at the same instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryOverview {
    pub items: InventoryStatistics,
    pub transactions: TransactionStatistics,
}

pub struct InventoryQueries<I, T> {
    items: I,
    ledger: T,
    clock: Arc<dyn Clock>,
    config: CoordinatorConfig,
}

impl<I, T> InventoryQueries<I, T>
where
    I: ItemRepository,
    T: TransactionRepository,
{
    pub fn new(items: I, ledger: T) -> Self {
        Self {
            items,
            ledger,
            clock: Arc::new(SystemClock),
            config: CoordinatorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CoordinatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    fn refresh(&self, item: InventoryItem) -> InventoryItem {
        item.refreshed(self.clock.now(), &self.config.expiration)
    }

    pub fn get_by_id(&self, item_id: ItemId) -> Result<InventoryItem, StockError> {
        let item = self.items.find_by_id(item_id)?.ok_or(StockError::NotFound)?;
        Ok(self.refresh(item))
    }

    pub fn get_by_sku(&self, sku: &str) -> Result<InventoryItem, StockError> {
        let item = self.items.find_by_sku(sku)?.ok_or(StockError::NotFound)?;
        Ok(self.refresh(item))
    }

    /// Filtered listing. Flags are always re-derived before matching.
    pub fn list(&self, filter: ItemFilter) -> Result<Page<InventoryItem>, StockError> {
        let filter = filter.as_of(self.clock.now(), self.config.expiration);
        Ok(self.items.list(&filter)?)
    }

    fn active(&self, filter: ItemFilter) -> Result<Vec<InventoryItem>, StockError> {
        Ok(self.list(filter.with_status(ItemStatus::Active))?.items)
    }

    pub fn by_category(&self, category: ItemCategory) -> Result<Vec<InventoryItem>, StockError> {
        self.active(ItemFilter::default().with_category(category))
    }

    pub fn low_stock(&self) -> Result<Vec<InventoryItem>, StockError> {
        self.active(ItemFilter {
            is_low_stock: Some(true),
            ..ItemFilter::default()
        })
    }

    pub fn out_of_stock(&self) -> Result<Vec<InventoryItem>, StockError> {
        self.active(ItemFilter {
            is_out_of_stock: Some(true),
            ..ItemFilter::default()
        })
    }

    pub fn expired(&self) -> Result<Vec<InventoryItem>, StockError> {
        self.active(ItemFilter {
            is_expired: Some(true),
            ..ItemFilter::default()
        })
    }

    pub fn expiring_soon(&self) -> Result<Vec<InventoryItem>, StockError> {
        self.active(ItemFilter {
            is_expiring_soon: Some(true),
            ..ItemFilter::default()
        })
    }

    pub fn needing_reorder(&self) -> Result<Vec<InventoryItem>, StockError> {
        self.active(ItemFilter {
            needs_reorder: Some(true),
            ..ItemFilter::default()
        })
    }

    /// Ledger entries for one item, newest first.
    pub fn history(
        &self,
        item_id: ItemId,
        page: Pagination,
    ) -> Result<Page<StockTransaction>, StockError> {
        let filter = TransactionFilter::for_item(item_id)
            .with_order(SortOrder::NewestFirst)
            .with_page(page);
        Ok(self.ledger.list(&filter)?)
    }

    pub fn transactions(
        &self,
        filter: &TransactionFilter,
    ) -> Result<Page<StockTransaction>, StockError> {
        Ok(self.ledger.list(filter)?)
    }

    pub fn statistics(&self) -> Result<InventoryOverview, StockError> {
        let now = self.clock.now();
        let items = self.items.list(&ItemFilter::default())?.items;
        let entries = self.ledger.list(&TransactionFilter::default())?.items;

        Ok(InventoryOverview {
            items: InventoryStatistics::compute(&items, now, &self.config.expiration),
            transactions: TransactionStatistics::compute(&entries, now),
        })
    }

    /// Check that the item's ledger explains its current stock.
    pub fn verify_ledger(&self, item_id: ItemId) -> Result<(), StockError> {
        let item = self.items.find_by_id(item_id)?.ok_or(StockError::NotFound)?;
        let entries = self
            .ledger
            .list(&TransactionFilter::for_item(item_id).with_order(SortOrder::OldestFirst))?
            .items;

        verify_chain(&item, &entries).map_err(|drift| {
            tracing::error!(item_id = %item_id, error = %drift, "ledger drift detected");
            StockError::Consistency(drift.to_string())
        })
    }
}
