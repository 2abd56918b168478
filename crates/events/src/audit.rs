//! Audit trail records emitted by write operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pawtrack_core::UserId;

/// What kind of action an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
        }
    }
}

impl core::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit trail entry: who did what to which resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub actor: UserId,
    pub action: AuditAction,
    /// Resource family, e.g. "inventory".
    pub resource: String,
    /// Identifier of the affected record, rendered as text.
    pub resource_id: String,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(
        actor: UserId,
        action: AuditAction,
        resource: impl Into<String>,
        resource_id: impl ToString,
        description: impl Into<String>,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            actor,
            action,
            resource: resource.into(),
            resource_id: resource_id.to_string(),
            description: description.into(),
            occurred_at,
        }
    }
}
