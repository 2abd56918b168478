//! Inventory domain module.
//!
//! Business rules for shelter stock, implemented purely as deterministic
//! domain logic (no IO, no locking, no storage). The item aggregate decides
//! one ledger entry per stock movement and evolves itself from it; status,
//! ledger and statistics are pure functions over that state.

pub mod item;
pub mod ledger;
pub mod statistics;
pub mod status;
pub mod transaction;

#[cfg(test)]
mod test_support;

pub use item::{
    AddStock, AdjustStock, InboundKind, InventoryItem, ItemCategory, ItemDetails, ItemStatus,
    ItemUnit, ItemUpdate, MAX_QUANTITY, MAX_UNIT_COST, NewItem, OutboundKind, RemoveStock,
    StockCommand, StockMovement, StockThresholds, TransferStock,
};
pub use ledger::{LedgerDrift, verify_chain};
pub use statistics::{InventoryStatistics, TransactionStatistics};
pub use status::{ExpirationPolicy, StockStatus};
pub use transaction::{
    EntryContext, RelatedEntity, StockDirection, StockTransaction, SupplierRef, TransactionType,
};
