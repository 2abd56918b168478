//! In-memory audit sink for tests/dev.

use std::sync::Mutex;

use thiserror::Error;

use crate::audit::AuditEntry;
use crate::sink::AuditSink;

#[derive(Debug, Error)]
pub enum InMemorySinkError {
    /// Record failed due to internal lock poisoning.
    #[error("audit sink lock poisoned")]
    Poisoned,
}

/// In-memory audit sink.
///
/// - No IO
/// - Keeps every entry in arrival order
#[derive(Debug, Default)]
pub struct InMemoryAuditSink {
    entries: Mutex<Vec<AuditEntry>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn entries(&self) -> Result<Vec<AuditEntry>, InMemorySinkError> {
        let entries = self.entries.lock().map_err(|_| InMemorySinkError::Poisoned)?;
        Ok(entries.clone())
    }

    /// Entries recorded for one resource identifier.
    pub fn entries_for(&self, resource_id: &str) -> Result<Vec<AuditEntry>, InMemorySinkError> {
        Ok(self
            .entries()?
            .into_iter()
            .filter(|e| e.resource_id == resource_id)
            .collect())
    }
}

impl AuditSink for InMemoryAuditSink {
    type Error = InMemorySinkError;

    fn record(&self, entry: AuditEntry) -> Result<(), Self::Error> {
        let mut entries = self.entries.lock().map_err(|_| InMemorySinkError::Poisoned)?;
        entries.push(entry);
        Ok(())
    }
}
