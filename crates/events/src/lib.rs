//! Domain events and the audit trail boundary.

pub mod audit;
pub mod event;
pub mod in_memory_sink;
pub mod sink;

pub use audit::{AuditAction, AuditEntry};
pub use event::Event;
pub use in_memory_sink::{InMemoryAuditSink, InMemorySinkError};
pub use sink::{AuditSink, TracingAuditSink};
