//! Status derivation: pure predicates over item state.
//!
//! Nothing here mutates an item. The aggregate calls these to refresh its
//! stored flags after a change, and read paths call them to evaluate flags
//! at the time of the read.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::item::InventoryItem;

const DEFAULT_EXPIRING_SOON_DAYS: i64 = 30;

/// How far ahead an expiration date counts as "expiring soon".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationPolicy {
    pub expiring_soon_within: Duration,
}

impl ExpirationPolicy {
    pub fn within_days(days: i64) -> Self {
        Self {
            expiring_soon_within: Duration::days(days),
        }
    }
}

impl Default for ExpirationPolicy {
    fn default() -> Self {
        Self::within_days(DEFAULT_EXPIRING_SOON_DAYS)
    }
}

/// Low-stock rule. The reorder point wins over the minimum stock level when
/// both are set; with neither set an item is never low on stock.
pub fn is_low_stock(item: &InventoryItem) -> bool {
    let thresholds = item.thresholds();
    let stock = item.current_stock();
    if thresholds.reorder_point > Decimal::ZERO {
        stock <= thresholds.reorder_point
    } else if thresholds.minimum_stock > Decimal::ZERO {
        stock <= thresholds.minimum_stock
    } else {
        false
    }
}

pub fn is_out_of_stock(item: &InventoryItem) -> bool {
    item.current_stock() <= Decimal::ZERO
}

pub fn needs_reorder(item: &InventoryItem) -> bool {
    let reorder_point = item.thresholds().reorder_point;
    reorder_point > Decimal::ZERO && item.current_stock() <= reorder_point
}

/// Stock level as a percentage of `maximum_stock` (0 when no maximum is set).
pub fn stock_percentage(item: &InventoryItem) -> Decimal {
    let maximum = item.thresholds().maximum_stock;
    if maximum <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    item.current_stock()
        .checked_div(maximum)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::MAX)
}

fn tracked_expiration(item: &InventoryItem) -> Option<DateTime<Utc>> {
    if item.has_expiration() {
        item.expiration_date()
    } else {
        None
    }
}

/// An expiration date equal to `now` counts as expired.
pub fn is_expired(item: &InventoryItem, now: DateTime<Utc>) -> bool {
    tracked_expiration(item).is_some_and(|date| now >= date)
}

pub fn is_expiring_soon(
    item: &InventoryItem,
    now: DateTime<Utc>,
    policy: &ExpirationPolicy,
) -> bool {
    tracked_expiration(item).is_some_and(|date| {
        date < now + policy.expiring_soon_within && !is_expired(item, now)
    })
}

/// Snapshot of every derived predicate for one item at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockStatus {
    pub low_stock: bool,
    pub out_of_stock: bool,
    pub needs_reorder: bool,
    pub expired: bool,
    pub expiring_soon: bool,
    pub stock_percentage: Decimal,
}

impl StockStatus {
    pub fn derive(item: &InventoryItem, now: DateTime<Utc>, policy: &ExpirationPolicy) -> Self {
        Self {
            low_stock: is_low_stock(item),
            out_of_stock: is_out_of_stock(item),
            needs_reorder: needs_reorder(item),
            expired: is_expired(item, now),
            expiring_soon: is_expiring_soon(item, now, policy),
            stock_percentage: stock_percentage(item),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{
        ItemCategory, ItemDetails, ItemUnit, MAX_QUANTITY, NewItem, StockThresholds,
    };
    use crate::test_support::{item_with_stock, test_time};
    use pawtrack_core::{ItemId, UserId};
    use rust_decimal_macros::dec;

    fn thresholds(minimum: Decimal, reorder: Decimal, maximum: Decimal) -> StockThresholds {
        StockThresholds {
            minimum_stock: minimum,
            reorder_point: reorder,
            maximum_stock: maximum,
            reorder_quantity: Decimal::ZERO,
        }
    }

    fn perishable(expiration_date: DateTime<Utc>) -> InventoryItem {
        InventoryItem::create(&NewItem {
            item_id: ItemId::new(),
            name: "Kitten formula".to_string(),
            category: ItemCategory::Food,
            unit: ItemUnit::Can,
            created_by: UserId::new(),
            details: ItemDetails {
                has_expiration: true,
                expiration_date: Some(expiration_date),
                ..ItemDetails::default()
            },
            occurred_at: test_time(),
        })
        .unwrap()
    }

    #[test]
    fn no_thresholds_means_never_low() {
        let item = item_with_stock(dec!(0), StockThresholds::default());
        assert!(!is_low_stock(&item));
        assert!(!needs_reorder(&item));
        assert!(is_out_of_stock(&item));
    }

    #[test]
    fn reorder_point_takes_priority_over_minimum() {
        let item = item_with_stock(dec!(6), thresholds(dec!(8), dec!(5), dec!(0)));
        assert!(!is_low_stock(&item), "6 > reorder point 5 even though 6 <= minimum 8");

        let item = item_with_stock(dec!(8), thresholds(dec!(8), dec!(0), dec!(0)));
        assert!(is_low_stock(&item), "falls back to minimum stock");
    }

    #[test]
    fn needs_reorder_ignores_minimum_stock() {
        let item = item_with_stock(dec!(1), thresholds(dec!(5), dec!(0), dec!(0)));
        assert!(is_low_stock(&item));
        assert!(!needs_reorder(&item));

        let item = item_with_stock(dec!(5), thresholds(dec!(0), dec!(5), dec!(0)));
        assert!(needs_reorder(&item));
    }

    #[test]
    fn stock_percentage_relative_to_maximum() {
        let item = item_with_stock(dec!(25), thresholds(dec!(0), dec!(0), dec!(200)));
        assert_eq!(stock_percentage(&item), dec!(12.5));

        let item = item_with_stock(dec!(25), StockThresholds::default());
        assert_eq!(stock_percentage(&item), Decimal::ZERO);
    }

    #[test]
    fn stock_percentage_saturates_for_tiny_maximum() {
        let tiny = dec!(0.0000000000000001);
        let item = item_with_stock(MAX_QUANTITY, thresholds(dec!(0), dec!(0), tiny));
        assert_eq!(stock_percentage(&item), Decimal::MAX);
    }

    #[test]
    fn expiration_exactly_now_is_expired_not_expiring_soon() {
        let now = test_time();
        let item = perishable(now);
        let policy = ExpirationPolicy::default();
        assert!(is_expired(&item, now));
        assert!(!is_expiring_soon(&item, now, &policy));
    }

    #[test]
    fn expiring_soon_inside_horizon_only() {
        let now = test_time();
        let policy = ExpirationPolicy::default();

        assert!(is_expiring_soon(&perishable(now + Duration::days(29)), now, &policy));
        assert!(!is_expiring_soon(&perishable(now + Duration::days(30)), now, &policy));
        assert!(!is_expired(&perishable(now + Duration::seconds(1)), now));
        assert!(is_expiring_soon(
            &perishable(now + Duration::days(3)),
            now,
            &ExpirationPolicy::within_days(7)
        ));
    }

    #[test]
    fn untracked_expiration_never_flags() {
        let now = test_time();
        let item = InventoryItem::create(&NewItem {
            item_id: ItemId::new(),
            name: "Leash".to_string(),
            category: ItemCategory::Equipment,
            unit: ItemUnit::Piece,
            created_by: UserId::new(),
            details: ItemDetails {
                has_expiration: false,
                expiration_date: Some(now - Duration::days(5)),
                ..ItemDetails::default()
            },
            occurred_at: now,
        })
        .unwrap();

        let status = StockStatus::derive(&item, now, &ExpirationPolicy::default());
        assert!(!status.expired);
        assert!(!status.expiring_soon);
    }
}
