//! Infrastructure layer: stores, locking, the stock mutation pipeline and reads.

pub mod clock;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod keyed_lock;
pub mod queries;
pub mod repository;


pub use clock::{Clock, FixedClock, SystemClock};
pub use config::CoordinatorConfig;
pub use coordinator::{ItemDraft, StockCoordinator, StockMutation};
pub use error::StockError;
pub use keyed_lock::{KeyGuard, KeyedLock, LockError};
pub use queries::{InventoryOverview, InventoryQueries};
pub use repository::{
    InMemoryItemRepository, InMemoryTransactionRepository, ItemFilter, ItemRepository, Page,
    Pagination, RepositoryError, SortOrder, TransactionFilter, TransactionRepository,
};
