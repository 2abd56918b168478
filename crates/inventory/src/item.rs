use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pawtrack_core::{
    Aggregate, AggregateRoot, DomainError, DomainResult, ItemId, TransactionId, UserId, ValueObject,
};

use crate::status::{self, ExpirationPolicy};
use crate::transaction::{
    EntryContext, RelatedEntity, StockTransaction, SupplierRef, TransactionType, non_blank,
    out_of_range,
};

/// Largest quantity a single movement or count may carry (10^12).
pub const MAX_QUANTITY: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// Largest unit cost an inbound movement may carry (10^12).
pub const MAX_UNIT_COST: Decimal = MAX_QUANTITY;

fn ensure_quantity_in_range(quantity: Decimal) -> DomainResult<()> {
    if quantity > MAX_QUANTITY {
        return Err(out_of_range());
    }
    Ok(())
}

/// Closed set of item categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Food,
    Medicine,
    Supplies,
    Toys,
    Bedding,
    Cleaning,
    Equipment,
    Grooming,
    MedicalSupplies,
    Office,
    Other,
}

impl ItemCategory {
    pub const ALL: [ItemCategory; 11] = [
        ItemCategory::Food,
        ItemCategory::Medicine,
        ItemCategory::Supplies,
        ItemCategory::Toys,
        ItemCategory::Bedding,
        ItemCategory::Cleaning,
        ItemCategory::Equipment,
        ItemCategory::Grooming,
        ItemCategory::MedicalSupplies,
        ItemCategory::Office,
        ItemCategory::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ItemCategory::Food => "food",
            ItemCategory::Medicine => "medicine",
            ItemCategory::Supplies => "supplies",
            ItemCategory::Toys => "toys",
            ItemCategory::Bedding => "bedding",
            ItemCategory::Cleaning => "cleaning",
            ItemCategory::Equipment => "equipment",
            ItemCategory::Grooming => "grooming",
            ItemCategory::MedicalSupplies => "medical_supplies",
            ItemCategory::Office => "office",
            ItemCategory::Other => "other",
        }
    }
}

impl core::fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for ItemCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if s.is_empty() {
            return Err(DomainError::validation("category is required"));
        }
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown category: {s}")))
    }
}

/// Unit of measure an item is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemUnit {
    Piece,
    Box,
    Bag,
    Bottle,
    Can,
    #[serde(rename = "lb")]
    Pound,
    #[serde(rename = "kg")]
    Kilogram,
    Liter,
    Gallon,
    Package,
    Roll,
    Case,
}

impl ItemUnit {
    pub const ALL: [ItemUnit; 12] = [
        ItemUnit::Piece,
        ItemUnit::Box,
        ItemUnit::Bag,
        ItemUnit::Bottle,
        ItemUnit::Can,
        ItemUnit::Pound,
        ItemUnit::Kilogram,
        ItemUnit::Liter,
        ItemUnit::Gallon,
        ItemUnit::Package,
        ItemUnit::Roll,
        ItemUnit::Case,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ItemUnit::Piece => "piece",
            ItemUnit::Box => "box",
            ItemUnit::Bag => "bag",
            ItemUnit::Bottle => "bottle",
            ItemUnit::Can => "can",
            ItemUnit::Pound => "lb",
            ItemUnit::Kilogram => "kg",
            ItemUnit::Liter => "liter",
            ItemUnit::Gallon => "gallon",
            ItemUnit::Package => "package",
            ItemUnit::Roll => "roll",
            ItemUnit::Case => "case",
        }
    }
}

impl core::fmt::Display for ItemUnit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for ItemUnit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if s.is_empty() {
            return Err(DomainError::validation("unit is required"));
        }
        Self::ALL
            .into_iter()
            .find(|u| u.as_str() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown unit: {s}")))
    }
}

/// Lifecycle state. Inactive items reject every stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Active,
    Inactive,
}

/// Replenishment thresholds. Zero means "not set".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockThresholds {
    pub minimum_stock: Decimal,
    pub reorder_point: Decimal,
    pub maximum_stock: Decimal,
    pub reorder_quantity: Decimal,
}

impl ValueObject for StockThresholds {}

impl StockThresholds {
    pub fn validate(&self) -> DomainResult<()> {
        let fields = [
            ("minimum_stock", self.minimum_stock),
            ("reorder_point", self.reorder_point),
            ("maximum_stock", self.maximum_stock),
            ("reorder_quantity", self.reorder_quantity),
        ];
        for (name, value) in fields {
            if value < Decimal::ZERO {
                return Err(DomainError::validation(format!("{name} cannot be negative")));
            }
        }
        Ok(())
    }
}

/// Descriptive metadata shared by item creation and detail edits.
///
/// Stock levels, usage history and unit cost are deliberately absent: those
/// only move through ledger entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetails {
    pub description: Option<String>,
    pub sku: Option<String>,
    pub barcode: Option<String>,
    pub sub_category: Option<String>,
    pub thresholds: StockThresholds,
    pub preferred_supplier: Option<String>,
    pub supplier_product_code: Option<String>,
    pub location: Option<String>,
    pub storage_conditions: Option<String>,
    pub has_expiration: bool,
    pub expiration_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
}

impl ItemDetails {
    /// Tracking expiration without a date is accepted; the flags stay clear.
    pub fn validate(&self) -> DomainResult<()> {
        self.thresholds.validate()
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    Ok(())
}

fn clean_tags(tags: &[String]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags.iter().filter_map(|t| non_blank(t.clone())) {
        if !cleaned.contains(&tag) {
            cleaned.push(tag);
        }
    }
    cleaned
}

/// Input for [`InventoryItem::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub item_id: ItemId,
    pub name: String,
    pub category: ItemCategory,
    pub unit: ItemUnit,
    pub created_by: UserId,
    pub details: ItemDetails,
    pub occurred_at: DateTime<Utc>,
}

/// Replacement descriptive state for [`InventoryItem::update_details`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUpdate {
    pub name: String,
    pub category: ItemCategory,
    pub unit: ItemUnit,
    pub details: ItemDetails,
    pub occurred_at: DateTime<Utc>,
}

impl ItemUpdate {
    pub fn validate(&self) -> DomainResult<()> {
        validate_name(&self.name)?;
        self.details.validate()
    }
}

/// Aggregate root: InventoryItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    id: ItemId,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    barcode: Option<String>,
    category: ItemCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub_category: Option<String>,
    unit: ItemUnit,

    current_stock: Decimal,
    #[serde(flatten)]
    thresholds: StockThresholds,
    unit_cost: Decimal,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    preferred_supplier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    supplier_product_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    storage_conditions: Option<String>,

    has_expiration: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expiration_date: Option<DateTime<Utc>>,

    is_low_stock: bool,
    is_expired: bool,
    is_expiring_soon: bool,
    status: ItemStatus,

    total_used: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_used_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_restocked_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    #[serde(default)]
    tags: Vec<String>,

    created_by: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

impl InventoryItem {
    /// New item with zero stock and zero unit cost, Active, at version 1.
    ///
    /// Expiry flags start clear; callers holding an [`ExpirationPolicy`]
    /// refresh them with [`InventoryItem::check_expiration`].
    pub fn create(new: &NewItem) -> DomainResult<Self> {
        validate_name(&new.name)?;
        new.details.validate()?;

        let mut item = Self {
            id: new.item_id,
            name: new.name.trim().to_string(),
            description: None,
            sku: None,
            barcode: None,
            category: new.category,
            sub_category: None,
            unit: new.unit,
            current_stock: Decimal::ZERO,
            thresholds: StockThresholds::default(),
            unit_cost: Decimal::ZERO,
            preferred_supplier: None,
            supplier_product_code: None,
            location: None,
            storage_conditions: None,
            has_expiration: false,
            expiration_date: None,
            is_low_stock: false,
            is_expired: false,
            is_expiring_soon: false,
            status: ItemStatus::Active,
            total_used: Decimal::ZERO,
            last_used_at: None,
            last_restocked_at: None,
            notes: None,
            tags: Vec::new(),
            created_by: new.created_by,
            created_at: new.occurred_at,
            updated_at: new.occurred_at,
            version: 1,
        };
        item.set_details(&new.details);
        item.check_low_stock();
        Ok(item)
    }

    fn set_details(&mut self, details: &ItemDetails) {
        self.description = details.description.clone().and_then(non_blank);
        self.sku = details.sku.clone().and_then(non_blank);
        self.barcode = details.barcode.clone().and_then(non_blank);
        self.sub_category = details.sub_category.clone().and_then(non_blank);
        self.thresholds = details.thresholds;
        self.preferred_supplier = details.preferred_supplier.clone().and_then(non_blank);
        self.supplier_product_code = details.supplier_product_code.clone().and_then(non_blank);
        self.location = details.location.clone().and_then(non_blank);
        self.storage_conditions = details.storage_conditions.clone().and_then(non_blank);
        self.has_expiration = details.has_expiration;
        self.expiration_date = details.expiration_date;
        self.notes = details.notes.clone().and_then(non_blank);
        self.tags = clean_tags(&details.tags);
    }

    /// Replace descriptive metadata. Stock, usage history, unit cost and
    /// status are untouched; derived flags are re-evaluated.
    pub fn update_details(
        &mut self,
        update: &ItemUpdate,
        policy: &ExpirationPolicy,
    ) -> DomainResult<()> {
        update.validate()?;

        self.name = update.name.trim().to_string();
        self.category = update.category;
        self.unit = update.unit;
        self.set_details(&update.details);
        self.check_low_stock();
        self.check_expiration(update.occurred_at, policy);
        self.touch(update.occurred_at);
        Ok(())
    }

    pub fn activate(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status == ItemStatus::Active {
            return Err(DomainError::conflict("item is already active"));
        }
        self.status = ItemStatus::Active;
        self.touch(now);
        Ok(())
    }

    pub fn deactivate(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status == ItemStatus::Inactive {
            return Err(DomainError::conflict("item is already inactive"));
        }
        self.status = ItemStatus::Inactive;
        self.touch(now);
        Ok(())
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
        self.version += 1;
    }

    pub fn ensure_active(&self) -> DomainResult<()> {
        match self.status {
            ItemStatus::Active => Ok(()),
            ItemStatus::Inactive => {
                Err(DomainError::inactive(format!("item {} is inactive", self.id)))
            }
        }
    }

    pub fn check_low_stock(&mut self) {
        self.is_low_stock = status::is_low_stock(self);
    }

    pub fn check_expiration(&mut self, now: DateTime<Utc>, policy: &ExpirationPolicy) {
        self.is_expired = status::is_expired(self, now);
        self.is_expiring_soon = status::is_expiring_soon(self, now, policy);
    }

    /// Copy with every derived flag evaluated at `now`.
    pub fn refreshed(&self, now: DateTime<Utc>, policy: &ExpirationPolicy) -> Self {
        let mut item = self.clone();
        item.check_low_stock();
        item.check_expiration(now, policy);
        item
    }

    /// `current_stock * unit_cost`, saturating at `Decimal::MAX`.
    pub fn total_value(&self) -> Decimal {
        self.current_stock.saturating_mul(self.unit_cost)
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn sku(&self) -> Option<&str> {
        self.sku.as_deref()
    }

    pub fn barcode(&self) -> Option<&str> {
        self.barcode.as_deref()
    }

    pub fn category(&self) -> ItemCategory {
        self.category
    }

    pub fn sub_category(&self) -> Option<&str> {
        self.sub_category.as_deref()
    }

    pub fn unit(&self) -> ItemUnit {
        self.unit
    }

    pub fn current_stock(&self) -> Decimal {
        self.current_stock
    }

    pub fn thresholds(&self) -> &StockThresholds {
        &self.thresholds
    }

    pub fn unit_cost(&self) -> Decimal {
        self.unit_cost
    }

    pub fn preferred_supplier(&self) -> Option<&str> {
        self.preferred_supplier.as_deref()
    }

    pub fn supplier_product_code(&self) -> Option<&str> {
        self.supplier_product_code.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn storage_conditions(&self) -> Option<&str> {
        self.storage_conditions.as_deref()
    }

    pub fn has_expiration(&self) -> bool {
        self.has_expiration
    }

    pub fn expiration_date(&self) -> Option<DateTime<Utc>> {
        self.expiration_date
    }

    pub fn is_low_stock(&self) -> bool {
        self.is_low_stock
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired
    }

    pub fn is_expiring_soon(&self) -> bool {
        self.is_expiring_soon
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == ItemStatus::Active
    }

    pub fn total_used(&self) -> Decimal {
        self.total_used
    }

    pub fn last_used_at(&self) -> Option<DateTime<Utc>> {
        self.last_used_at
    }

    pub fn last_restocked_at(&self) -> Option<DateTime<Utc>> {
        self.last_restocked_at
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn created_by(&self) -> UserId {
        self.created_by
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl AggregateRoot for InventoryItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Where inbound stock came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InboundKind {
    #[default]
    Purchase,
    Donation,
}

impl InboundKind {
    pub fn transaction_type(self) -> TransactionType {
        match self {
            InboundKind::Purchase => TransactionType::In,
            InboundKind::Donation => TransactionType::Donation,
        }
    }
}

/// Why stock leaves the shelf.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutboundKind {
    #[default]
    Usage,
    Waste,
    Return,
}

impl OutboundKind {
    pub fn transaction_type(self) -> TransactionType {
        match self {
            OutboundKind::Usage => TransactionType::Out,
            OutboundKind::Waste => TransactionType::Waste,
            OutboundKind::Return => TransactionType::Return,
        }
    }
}

/// Movement: AddStock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddStock {
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    #[serde(default)]
    pub source: InboundKind,
    pub supplier: Option<SupplierRef>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

impl AddStock {
    pub fn validate(&self) -> DomainResult<()> {
        if self.quantity <= Decimal::ZERO {
            return Err(DomainError::validation("quantity must be greater than zero"));
        }
        if self.unit_cost < Decimal::ZERO {
            return Err(DomainError::validation("unit cost cannot be negative"));
        }
        if self.unit_cost > MAX_UNIT_COST {
            return Err(DomainError::validation("unit cost out of range"));
        }
        ensure_quantity_in_range(self.quantity)
    }
}

/// Movement: RemoveStock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveStock {
    pub quantity: Decimal,
    #[serde(default)]
    pub kind: OutboundKind,
    pub related_entity: Option<RelatedEntity>,
    pub reason: Option<String>,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

impl RemoveStock {
    pub fn validate(&self) -> DomainResult<()> {
        if self.quantity <= Decimal::ZERO {
            return Err(DomainError::validation("quantity must be greater than zero"));
        }
        ensure_quantity_in_range(self.quantity)
    }
}

/// Movement: AdjustStock (physical count correction).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustStock {
    pub new_quantity: Decimal,
    pub reason: Option<String>,
    pub notes: Option<String>,
}

impl AdjustStock {
    pub fn validate(&self) -> DomainResult<()> {
        if self.new_quantity < Decimal::ZERO {
            return Err(DomainError::validation("new quantity cannot be negative"));
        }
        ensure_quantity_in_range(self.new_quantity)
    }
}

/// Movement: TransferStock (storage location change only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferStock {
    pub to_location: String,
    pub notes: Option<String>,
}

impl TransferStock {
    pub fn validate(&self) -> DomainResult<()> {
        if self.to_location.trim().is_empty() {
            return Err(DomainError::validation("destination location cannot be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockMovement {
    Add(AddStock),
    Remove(RemoveStock),
    Adjust(AdjustStock),
    Transfer(TransferStock),
}

impl StockMovement {
    pub fn validate(&self) -> DomainResult<()> {
        match self {
            StockMovement::Add(m) => m.validate(),
            StockMovement::Remove(m) => m.validate(),
            StockMovement::Adjust(m) => m.validate(),
            StockMovement::Transfer(m) => m.validate(),
        }
    }

    /// Short label used in logs and audit descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            StockMovement::Add(_) => "add_stock",
            StockMovement::Remove(_) => "remove_stock",
            StockMovement::Adjust(_) => "adjust_stock",
            StockMovement::Transfer(_) => "transfer_stock",
        }
    }
}

/// Command: one stock movement against one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockCommand {
    pub item_id: ItemId,
    /// Identity of the ledger entry this command produces.
    pub transaction_id: TransactionId,
    pub actor: UserId,
    pub occurred_at: DateTime<Utc>,
    pub movement: StockMovement,
}

impl Aggregate for InventoryItem {
    type Command = StockCommand;
    type Event = StockTransaction;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        self.current_stock = event.stock_after();

        match event.kind() {
            TransactionType::In | TransactionType::Donation => {
                if let Some(unit_cost) = event.unit_cost() {
                    self.unit_cost = unit_cost;
                }
                self.last_restocked_at = Some(event.processed_at());
            }
            TransactionType::Out => {
                self.total_used = self.total_used.saturating_add(event.quantity());
                self.last_used_at = Some(event.processed_at());
            }
            TransactionType::Transfer => {
                if let Some(to) = event.to_location() {
                    self.location = Some(to.to_string());
                }
            }
            TransactionType::Waste | TransactionType::Return | TransactionType::Adjustment => {}
        }

        self.check_low_stock();
        self.touch(event.processed_at());
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        self.ensure_item_id(command.item_id)?;
        command.movement.validate()?;
        self.ensure_active()?;

        let ctx = EntryContext {
            transaction_id: command.transaction_id,
            item_id: self.id,
            sequence: self.version + 1,
            processed_by: command.actor,
            processed_at: command.occurred_at,
        };

        let entry = match &command.movement {
            StockMovement::Add(m) => self.decide_add(ctx, m)?,
            StockMovement::Remove(m) => self.decide_remove(ctx, m)?,
            StockMovement::Adjust(m) => self.decide_adjust(ctx, m)?,
            StockMovement::Transfer(m) => self.decide_transfer(ctx, m)?,
        };
        Ok(vec![entry])
    }
}

impl InventoryItem {
    fn ensure_item_id(&self, item_id: ItemId) -> DomainResult<()> {
        if self.id != item_id {
            return Err(DomainError::invariant("item_id mismatch"));
        }
        Ok(())
    }

    fn decide_add(&self, ctx: EntryContext, m: &AddStock) -> DomainResult<StockTransaction> {
        let entry = StockTransaction::record(
            ctx,
            m.source.transaction_type(),
            m.quantity,
            self.current_stock,
        )?
        .with_cost(m.unit_cost)?
        .with_reference(m.reference.clone())
        .with_notes(m.notes.clone())
        .with_expiration_date(m.expiration_date);

        Ok(match &m.supplier {
            Some(supplier) => entry.with_supplier(supplier.clone()),
            None => entry,
        })
    }

    fn decide_remove(&self, ctx: EntryContext, m: &RemoveStock) -> DomainResult<StockTransaction> {
        if self.current_stock < m.quantity {
            return Err(DomainError::insufficient_stock(m.quantity, self.current_stock));
        }

        let entry = StockTransaction::record(
            ctx,
            m.kind.transaction_type(),
            m.quantity,
            self.current_stock,
        )?
        .with_reason(m.reason.clone())
        .with_reference(m.reference.clone())
        .with_notes(m.notes.clone());

        Ok(match &m.related_entity {
            Some(related) => entry.with_related_entity(related.clone()),
            None => entry,
        })
    }

    fn decide_adjust(&self, ctx: EntryContext, m: &AdjustStock) -> DomainResult<StockTransaction> {
        // Signed delta, unlike add/remove which record magnitudes.
        let delta = m
            .new_quantity
            .checked_sub(self.current_stock)
            .ok_or_else(out_of_range)?;
        Ok(
            StockTransaction::record(ctx, TransactionType::Adjustment, delta, self.current_stock)?
                .with_reason(m.reason.clone())
                .with_notes(m.notes.clone()),
        )
    }

    fn decide_transfer(
        &self,
        ctx: EntryContext,
        m: &TransferStock,
    ) -> DomainResult<StockTransaction> {
        Ok(StockTransaction::record(
            ctx,
            TransactionType::Transfer,
            self.current_stock,
            self.current_stock,
        )?
        .with_locations(self.location.clone(), Some(m.to_location.clone()))
        .with_notes(m.notes.clone()))
    }
}
