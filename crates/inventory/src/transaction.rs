use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pawtrack_core::{DomainError, DomainResult, Entity, EntityRef, ItemId, TransactionId, UserId};
use pawtrack_events::Event;

/// Kind of stock movement recorded by a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Stock added (purchase, restock).
    In,
    /// Stock removed for use.
    Out,
    /// Inventory count correction.
    Adjustment,
    /// Move between storage locations.
    Transfer,
    /// Expired or damaged goods written off.
    Waste,
    /// Returned to the supplier.
    Return,
    /// Donated goods received.
    Donation,
}

/// How a transaction type moves the item's stock level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDirection {
    /// `stock_after = stock_before + quantity`
    Increase,
    /// `stock_after = stock_before - quantity`
    Decrease,
    /// `quantity` is already a signed delta.
    Delta,
    /// Stock level unchanged (location-only movement).
    Unchanged,
}

impl StockDirection {
    /// `None` when the result does not fit in a `Decimal`.
    pub fn resolve(self, stock_before: Decimal, quantity: Decimal) -> Option<Decimal> {
        match self {
            StockDirection::Increase => stock_before.checked_add(quantity),
            StockDirection::Decrease => stock_before.checked_sub(quantity),
            StockDirection::Delta => stock_before.checked_add(quantity),
            StockDirection::Unchanged => Some(stock_before),
        }
    }
}

impl TransactionType {
    pub const ALL: [TransactionType; 7] = [
        TransactionType::In,
        TransactionType::Out,
        TransactionType::Adjustment,
        TransactionType::Transfer,
        TransactionType::Waste,
        TransactionType::Return,
        TransactionType::Donation,
    ];

    /// Sign convention applied to `quantity` to go from `stock_before` to `stock_after`.
    pub fn direction(self) -> StockDirection {
        match self {
            TransactionType::In | TransactionType::Donation => StockDirection::Increase,
            TransactionType::Out | TransactionType::Waste | TransactionType::Return => {
                StockDirection::Decrease
            }
            TransactionType::Adjustment => StockDirection::Delta,
            TransactionType::Transfer => StockDirection::Unchanged,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::In => "in",
            TransactionType::Out => "out",
            TransactionType::Adjustment => "adjustment",
            TransactionType::Transfer => "transfer",
            TransactionType::Waste => "waste",
            TransactionType::Return => "return",
            TransactionType::Donation => "donation",
        }
    }
}

impl core::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for TransactionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if s.is_empty() {
            return Err(DomainError::validation("transaction type is required"));
        }
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown transaction type: {s}")))
    }
}

/// Supplier that delivered an inbound movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierRef {
    pub supplier_id: Option<EntityRef>,
    pub name: String,
}

/// Record owned by another module that a movement relates to
/// (e.g. "animal", "purchase_order").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedEntity {
    pub entity_type: String,
    pub entity_id: EntityRef,
}

/// Identity and provenance shared by every ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryContext {
    pub transaction_id: TransactionId,
    pub item_id: ItemId,
    /// Item version this entry commits at.
    pub sequence: u64,
    pub processed_by: UserId,
    pub processed_at: DateTime<Utc>,
}

/// Immutable ledger entry: one stock movement with its before/after snapshot.
///
/// `stock_after` is always derived from `stock_before`, `quantity` and the
/// type's [`StockDirection`]; it cannot be supplied independently. The `with_*`
/// builders only exist to annotate an entry before it is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockTransaction {
    id: TransactionId,
    item_id: ItemId,
    #[serde(rename = "type")]
    kind: TransactionType,
    sequence: u64,

    quantity: Decimal,
    stock_before: Decimal,
    stock_after: Decimal,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    unit_cost: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total_cost: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    /// PO number, invoice, etc.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    related_entity: Option<RelatedEntity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    from_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    to_location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    supplier: Option<SupplierRef>,
    /// Batch expiration for goods that carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expiration_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,

    processed_by: UserId,
    processed_at: DateTime<Utc>,
}

impl StockTransaction {
    /// Build an entry, computing `stock_after` from the sign convention.
    pub fn record(
        ctx: EntryContext,
        kind: TransactionType,
        quantity: Decimal,
        stock_before: Decimal,
    ) -> DomainResult<Self> {
        let stock_after = kind
            .direction()
            .resolve(stock_before, quantity)
            .ok_or_else(out_of_range)?;

        Ok(Self {
            id: ctx.transaction_id,
            item_id: ctx.item_id,
            kind,
            sequence: ctx.sequence,
            quantity,
            stock_before,
            stock_after,
            unit_cost: None,
            total_cost: None,
            reason: None,
            reference: None,
            related_entity: None,
            from_location: None,
            to_location: None,
            supplier: None,
            expiration_date: None,
            notes: None,
            processed_by: ctx.processed_by,
            processed_at: ctx.processed_at,
        })
    }

    pub fn with_cost(mut self, unit_cost: Decimal) -> DomainResult<Self> {
        let total_cost = unit_cost.checked_mul(self.quantity).ok_or_else(out_of_range)?;
        self.unit_cost = Some(unit_cost);
        self.total_cost = Some(total_cost);
        Ok(self)
    }

    pub fn with_supplier(mut self, supplier: SupplierRef) -> Self {
        self.supplier = Some(supplier);
        self
    }

    pub fn with_locations(mut self, from: Option<String>, to: Option<String>) -> Self {
        self.from_location = from.and_then(non_blank);
        self.to_location = to.and_then(non_blank);
        self
    }

    pub fn with_related_entity(mut self, related: RelatedEntity) -> Self {
        self.related_entity = Some(related);
        self
    }

    pub fn with_reason(mut self, reason: Option<String>) -> Self {
        self.reason = reason.and_then(non_blank);
        self
    }

    pub fn with_reference(mut self, reference: Option<String>) -> Self {
        self.reference = reference.and_then(non_blank);
        self
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes.and_then(non_blank);
        self
    }

    pub fn with_expiration_date(mut self, expiration_date: Option<DateTime<Utc>>) -> Self {
        self.expiration_date = expiration_date;
        self
    }

    pub fn id_typed(&self) -> TransactionId {
        self.id
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn stock_before(&self) -> Decimal {
        self.stock_before
    }

    pub fn stock_after(&self) -> Decimal {
        self.stock_after
    }

    pub fn unit_cost(&self) -> Option<Decimal> {
        self.unit_cost
    }

    pub fn total_cost(&self) -> Option<Decimal> {
        self.total_cost
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn related_entity(&self) -> Option<&RelatedEntity> {
        self.related_entity.as_ref()
    }

    pub fn from_location(&self) -> Option<&str> {
        self.from_location.as_deref()
    }

    pub fn to_location(&self) -> Option<&str> {
        self.to_location.as_deref()
    }

    pub fn supplier(&self) -> Option<&SupplierRef> {
        self.supplier.as_ref()
    }

    pub fn expiration_date(&self) -> Option<DateTime<Utc>> {
        self.expiration_date
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn processed_by(&self) -> UserId {
        self.processed_by
    }

    pub fn processed_at(&self) -> DateTime<Utc> {
        self.processed_at
    }

    /// Whether `stock_after` agrees with the sign convention.
    pub fn is_consistent(&self) -> bool {
        self.kind.direction().resolve(self.stock_before, self.quantity) == Some(self.stock_after)
    }
}

impl Entity for StockTransaction {
    type Id = TransactionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Event for StockTransaction {
    fn event_type(&self) -> &'static str {
        match self.kind {
            TransactionType::In => "inventory.stock.in",
            TransactionType::Out => "inventory.stock.out",
            TransactionType::Adjustment => "inventory.stock.adjustment",
            TransactionType::Transfer => "inventory.stock.transfer",
            TransactionType::Waste => "inventory.stock.waste",
            TransactionType::Return => "inventory.stock.return",
            TransactionType::Donation => "inventory.stock.donation",
        }
    }

    fn subject(&self) -> String {
        self.item_id.to_string()
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.processed_at
    }
}

pub(crate) fn out_of_range() -> DomainError {
    DomainError::validation("quantity out of range")
}

pub(crate) fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
