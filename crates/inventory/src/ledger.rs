//! Ledger chain verification.
//!
//! The ledger is never read to compute item state, but it must always be able
//! to explain it: ordered by sequence, every entry starts where the previous
//! one ended, the first starts at zero and the last ends at the item's
//! current stock.

use rust_decimal::Decimal;
use thiserror::Error;

use pawtrack_core::{AggregateRoot, TransactionId};

use crate::item::InventoryItem;
use crate::transaction::StockTransaction;

/// Divergence between an item and its ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerDrift {
    #[error("entry {transaction_id} belongs to another item")]
    ForeignEntry { transaction_id: TransactionId },

    #[error("entry {transaction_id} stock_after disagrees with its type")]
    SignMismatch { transaction_id: TransactionId },

    #[error("sequence {next} does not follow {previous}")]
    NonMonotonicSequence { previous: u64, next: u64 },

    #[error("entry {transaction_id} starts at {found}, expected {expected}")]
    BrokenChain {
        transaction_id: TransactionId,
        expected: Decimal,
        found: Decimal,
    },

    #[error("ledger ends at {ledger} but item holds {item}")]
    Drift { ledger: Decimal, item: Decimal },
}

/// Check `entries` (any order) against `item`.
pub fn verify_chain(item: &InventoryItem, entries: &[StockTransaction]) -> Result<(), LedgerDrift> {
    let mut ordered: Vec<&StockTransaction> = entries.iter().collect();
    ordered.sort_by_key(|e| e.sequence());

    let mut running = Decimal::ZERO;
    let mut previous_sequence: Option<u64> = None;

    for entry in ordered {
        if entry.item_id() != *item.id() {
            return Err(LedgerDrift::ForeignEntry {
                transaction_id: entry.id_typed(),
            });
        }
        if !entry.is_consistent() {
            return Err(LedgerDrift::SignMismatch {
                transaction_id: entry.id_typed(),
            });
        }
        if let Some(previous) = previous_sequence {
            if entry.sequence() <= previous {
                return Err(LedgerDrift::NonMonotonicSequence {
                    previous,
                    next: entry.sequence(),
                });
            }
        }
        if entry.stock_before() != running {
            return Err(LedgerDrift::BrokenChain {
                transaction_id: entry.id_typed(),
                expected: running,
                found: entry.stock_before(),
            });
        }

        running = entry.stock_after();
        previous_sequence = Some(entry.sequence());
    }

    if running != item.current_stock() {
        return Err(LedgerDrift::Drift {
            ledger: running,
            item: item.current_stock(),
        });
    }
    Ok(())
}
