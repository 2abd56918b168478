//! Filter and pagination types for repository listings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pawtrack_core::{EntityRef, ItemId, UserId};
use pawtrack_inventory::{
    ExpirationPolicy, InventoryItem, ItemCategory, ItemStatus, StockTransaction, TransactionType,
};

const MAX_PAGE_SIZE: usize = 1000;

/// Pagination parameters. No limit means "everything from `offset`".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: Option<usize>,
    pub offset: usize,
}

impl Pagination {
    pub fn new(limit: Option<usize>, offset: Option<usize>) -> Self {
        Self {
            limit: limit.map(|l| l.min(MAX_PAGE_SIZE)),
            offset: offset.unwrap_or(0),
        }
    }

    /// Slice `rows`, capping the limit at `MAX_PAGE_SIZE`.
    pub fn apply<T>(&self, rows: Vec<T>) -> Page<T> {
        let total = rows.len();
        let limit = self.limit.map(|l| l.min(MAX_PAGE_SIZE));
        let rows = rows.into_iter().skip(self.offset);
        let items = match limit {
            Some(limit) => rows.take(limit).collect(),
            None => rows.collect(),
        };
        Page {
            items,
            total,
            limit,
            offset: self.offset,
        }
    }
}

/// One page of results plus the unpaginated match count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub limit: Option<usize>,
    pub offset: usize,
}

/// Item listing criteria. Unset fields match everything; results are sorted
/// by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub category: Option<ItemCategory>,
    pub status: Option<ItemStatus>,
    pub is_low_stock: Option<bool>,
    pub is_out_of_stock: Option<bool>,
    pub needs_reorder: Option<bool>,
    pub is_expired: Option<bool>,
    pub is_expiring_soon: Option<bool>,
    pub location: Option<String>,
    /// Case-insensitive match on name, SKU or description.
    pub search: Option<String>,
    /// Item must carry every listed tag.
    pub tags: Vec<String>,
    /// Re-derive flags at this instant before matching. Without it stored
    /// flags are used as they are.
    pub as_of: Option<(DateTime<Utc>, ExpirationPolicy)>,
    pub page: Pagination,
}

impl ItemFilter {
    pub fn with_category(mut self, category: ItemCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_status(mut self, status: ItemStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_page(mut self, page: Pagination) -> Self {
        self.page = page;
        self
    }

    pub fn as_of(mut self, now: DateTime<Utc>, policy: ExpirationPolicy) -> Self {
        self.as_of = Some((now, policy));
        self
    }

    /// Whether `item` (already refreshed if `as_of` is set) matches.
    pub fn matches(&self, item: &InventoryItem) -> bool {
        fn flag(wanted: Option<bool>, actual: bool) -> bool {
            wanted.is_none_or(|w| w == actual)
        }

        if self.category.is_some_and(|c| c != item.category()) {
            return false;
        }
        if self.status.is_some_and(|s| s != item.status()) {
            return false;
        }
        if !flag(self.is_low_stock, item.is_low_stock())
            || !flag(self.is_out_of_stock, pawtrack_inventory::status::is_out_of_stock(item))
            || !flag(self.needs_reorder, pawtrack_inventory::status::needs_reorder(item))
            || !flag(self.is_expired, item.is_expired())
            || !flag(self.is_expiring_soon, item.is_expiring_soon())
        {
            return false;
        }
        if let Some(location) = &self.location {
            if item.location() != Some(location.as_str()) {
                return false;
            }
        }
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let hit =
                |field: Option<&str>| field.is_some_and(|f| f.to_lowercase().contains(&needle));
            if !(hit(Some(item.name())) || hit(item.sku()) || hit(item.description())) {
                return false;
            }
        }
        self.tags.iter().all(|tag| item.tags().contains(tag))
    }
}

/// Ledger ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

/// Ledger listing criteria. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub item_id: Option<ItemId>,
    pub kind: Option<TransactionType>,
    pub processed_by: Option<UserId>,
    pub related_entity_id: Option<EntityRef>,
    /// Inclusive lower bound on `processed_at`.
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `processed_at`.
    pub to: Option<DateTime<Utc>>,
    pub order: SortOrder,
    pub page: Pagination,
}

impl TransactionFilter {
    pub fn for_item(item_id: ItemId) -> Self {
        Self {
            item_id: Some(item_id),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_page(mut self, page: Pagination) -> Self {
        self.page = page;
        self
    }

    pub fn matches(&self, entry: &StockTransaction) -> bool {
        self.item_id.is_none_or(|id| id == entry.item_id())
            && self.kind.is_none_or(|k| k == entry.kind())
            && self.processed_by.is_none_or(|u| u == entry.processed_by())
            && self
                .related_entity_id
                .is_none_or(|r| entry.related_entity().is_some_and(|e| e.entity_id == r))
            && self.from.is_none_or(|from| entry.processed_at() >= from)
            && self.to.is_none_or(|to| entry.processed_at() < to)
    }
}
