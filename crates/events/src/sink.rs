//! Audit sink abstraction (delivery mechanics only).
//!
//! The audit log is an external collaborator. Writers hand it one
//! [`AuditEntry`] per successful mutation; what happens next (a document
//! collection, a log pipeline, a SIEM) is up to the implementation.
//!
//! Delivery is best-effort from the writer's point of view: a failing sink must
//! never undo a committed business operation, so callers log sink errors and
//! move on.

use std::sync::Arc;

use crate::audit::AuditEntry;

/// Destination for audit entries.
///
/// Implementations must be safe to share across threads; several writers may
/// record concurrently.
pub trait AuditSink: Send + Sync {
    type Error: core::fmt::Debug + core::fmt::Display + Send + Sync + 'static;

    fn record(&self, entry: AuditEntry) -> Result<(), Self::Error>;
}

impl<S> AuditSink for Arc<S>
where
    S: AuditSink + ?Sized,
{
    type Error = S::Error;

    fn record(&self, entry: AuditEntry) -> Result<(), Self::Error> {
        (**self).record(entry)
    }
}

/// Sink that writes entries to the tracing pipeline at `info` level.
///
/// Useful as a default in development where no audit store is wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    type Error = core::convert::Infallible;

    fn record(&self, entry: AuditEntry) -> Result<(), Self::Error> {
        tracing::info!(
            target: "audit",
            actor = %entry.actor,
            action = %entry.action,
            resource = %entry.resource,
            resource_id = %entry.resource_id,
            "{}",
            entry.description
        );
        Ok(())
    }
}
