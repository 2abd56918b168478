//! Shared fixtures for unit tests in this crate.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;

use pawtrack_core::{Aggregate, ItemId, TransactionId, UserId};

use crate::item::{
    AddStock, AdjustStock, InboundKind, InventoryItem, ItemCategory, ItemDetails, ItemUnit,
    NewItem, OutboundKind, RemoveStock, StockCommand, StockMovement, StockThresholds,
};

pub fn test_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()
}

pub fn command(item_id: ItemId, movement: StockMovement) -> StockCommand {
    StockCommand {
        item_id,
        transaction_id: TransactionId::new(),
        actor: UserId::new(),
        occurred_at: test_time(),
        movement,
    }
}

pub fn add(quantity: Decimal, unit_cost: Decimal) -> StockMovement {
    StockMovement::Add(AddStock {
        quantity,
        unit_cost,
        source: InboundKind::Purchase,
        supplier: None,
        expiration_date: None,
        reference: None,
        notes: None,
    })
}

pub fn remove(quantity: Decimal) -> StockMovement {
    StockMovement::Remove(RemoveStock {
        quantity,
        kind: OutboundKind::Usage,
        related_entity: None,
        reason: None,
        reference: None,
        notes: None,
    })
}

pub fn adjust(new_quantity: Decimal) -> StockMovement {
    StockMovement::Adjust(AdjustStock {
        new_quantity,
        reason: Some("physical count".to_string()),
        notes: None,
    })
}

pub fn new_item(thresholds: StockThresholds) -> InventoryItem {
    InventoryItem::create(&NewItem {
        item_id: ItemId::new(),
        name: "Canned cat food".to_string(),
        category: ItemCategory::Food,
        unit: ItemUnit::Can,
        created_by: UserId::new(),
        details: ItemDetails {
            thresholds,
            ..ItemDetails::default()
        },
        occurred_at: test_time(),
    })
    .unwrap()
}

/// Item brought to `stock` through a real ledger entry.
pub fn item_with_stock(stock: Decimal, thresholds: StockThresholds) -> InventoryItem {
    let mut item = new_item(thresholds);
    if stock > Decimal::ZERO {
        let events = item
            .handle(&command(item.id_typed(), add(stock, Decimal::ZERO)))
            .unwrap();
        for event in &events {
            item.apply(event);
        }
    }
    item
}
