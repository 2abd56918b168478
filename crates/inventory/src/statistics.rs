//! Read-side rollups over items and ledger entries.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Months, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::item::{InventoryItem, ItemCategory};
use crate::status::{self, ExpirationPolicy};
use crate::transaction::{StockTransaction, TransactionType};

/// Item counts and valuation.
///
/// `total_items` counts every item; all other figures only count active ones,
/// with expiry evaluated at the `now` passed to [`InventoryStatistics::compute`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryStatistics {
    pub total_items: usize,
    pub active_items: usize,
    pub by_category: BTreeMap<ItemCategory, usize>,
    pub low_stock_items: usize,
    pub out_of_stock_items: usize,
    pub expired_items: usize,
    pub expiring_soon_items: usize,
    pub items_needing_reorder: usize,
    pub total_value: Decimal,
}

impl InventoryStatistics {
    pub fn compute<'a>(
        items: impl IntoIterator<Item = &'a InventoryItem>,
        now: DateTime<Utc>,
        policy: &ExpirationPolicy,
    ) -> Self {
        let mut stats = Self::default();

        for item in items {
            stats.total_items += 1;
            if !item.is_active() {
                continue;
            }

            stats.active_items += 1;
            *stats.by_category.entry(item.category()).or_default() += 1;
            stats.low_stock_items += usize::from(status::is_low_stock(item));
            stats.out_of_stock_items += usize::from(status::is_out_of_stock(item));
            stats.expired_items += usize::from(status::is_expired(item, now));
            stats.expiring_soon_items += usize::from(status::is_expiring_soon(item, now, policy));
            stats.items_needing_reorder += usize::from(status::needs_reorder(item));
            stats.total_value = stats.total_value.saturating_add(item.total_value());
        }

        stats
    }
}

/// Ledger activity rollup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionStatistics {
    pub total_transactions: usize,
    pub by_type: BTreeMap<TransactionType, usize>,
    /// Quantity received (`in` + `donation`).
    pub total_stock_in: Decimal,
    /// Quantity issued (`out` + `return`).
    pub total_stock_out: Decimal,
    pub total_waste: Decimal,
    /// Since midnight UTC.
    pub transactions_today: usize,
    /// Within the last seven days.
    pub transactions_this_week: usize,
    /// Within the last calendar-month span.
    pub transactions_this_month: usize,
}

impl TransactionStatistics {
    pub fn compute<'a>(
        entries: impl IntoIterator<Item = &'a StockTransaction>,
        now: DateTime<Utc>,
    ) -> Self {
        let today = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|midnight| midnight.and_utc())
            .unwrap_or(now);
        let week_ago = now - Duration::days(7);
        let month_ago = now.checked_sub_months(Months::new(1)).unwrap_or(now);

        let mut stats = Self::default();

        for entry in entries {
            stats.total_transactions += 1;
            *stats.by_type.entry(entry.kind()).or_default() += 1;

            match entry.kind() {
                TransactionType::In | TransactionType::Donation => {
                    stats.total_stock_in = stats.total_stock_in.saturating_add(entry.quantity());
                }
                TransactionType::Out | TransactionType::Return => {
                    stats.total_stock_out = stats.total_stock_out.saturating_add(entry.quantity());
                }
                TransactionType::Waste => {
                    stats.total_waste = stats.total_waste.saturating_add(entry.quantity());
                }
                TransactionType::Adjustment | TransactionType::Transfer => {}
            }

            let at = entry.processed_at();
            stats.transactions_today += usize::from(at >= today);
            stats.transactions_this_week += usize::from(at >= week_ago);
            stats.transactions_this_month += usize::from(at >= month_ago);
        }

        stats
    }
}
