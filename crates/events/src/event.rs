use chrono::{DateTime, Utc};

/// A recorded fact about an inventory record. Never edited once written.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Dotted routing name, e.g. `inventory.stock.waste`.
    fn event_type(&self) -> &'static str;

    /// Payload schema revision.
    fn schema_version(&self) -> u32 {
        1
    }

    /// Identifier of the record the event is about.
    fn subject(&self) -> String;

    fn occurred_at(&self) -> DateTime<Utc>;
}
