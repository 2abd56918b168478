//! Persistence boundary for items and the stock ledger.
//!
//! The coordinator only relies on these contracts. The in-memory
//! implementations back tests and development; a document or SQL store
//! plugs in by implementing the same traits.

pub mod in_memory;
pub mod query;
pub mod r#trait;

pub use in_memory::{InMemoryItemRepository, InMemoryTransactionRepository};
pub use query::{ItemFilter, Page, Pagination, SortOrder, TransactionFilter};
pub use r#trait::{ItemRepository, RepositoryError, TransactionRepository};
