//! Shared tracing setup for the stock service.

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use crate::tracing::{DEFAULT_FILTER, init, init_for_tests};
