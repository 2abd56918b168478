//! Stock mutation pipeline.
//!
//! Every write for one item runs under that item's lock:
//!
//! ```text
//! validate request
//!   ↓
//! acquire per-item lock (timeout → ConcurrencyConflict)
//!   ↓
//! 1. Load current item
//!   ↓
//! 2. Decide the ledger entry (pure, aggregate `handle`)
//!   ↓
//! 3. Apply it and re-derive flags
//!   ↓
//! 4. Conditioned item write (stale version → retry from 1)
//!   ↓
//! 5. Append ledger entry (retried; failure → restore item from step 1)
//!   ↓
//! 6. Audit entry (best-effort)
//! ```
//!
//! The lock serializes writers going through this coordinator; the
//! version-conditioned write catches anyone else touching the item store.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use pawtrack_core::{
    Aggregate, AggregateRoot, DomainResult, ExpectedVersion, ItemId, TransactionId, UserId,
};
use pawtrack_events::{AuditAction, AuditEntry, AuditSink, Event};
use pawtrack_inventory::{
    AddStock, AdjustStock, InventoryItem, ItemCategory, ItemDetails, ItemUnit, ItemUpdate, NewItem,
    RemoveStock, StockCommand, StockMovement, StockTransaction, TransferStock,
};

use crate::clock::{Clock, SystemClock};
use crate::config::CoordinatorConfig;
use crate::error::StockError;
use crate::keyed_lock::{KeyGuard, KeyedLock, LockError};
use crate::repository::{ItemRepository, RepositoryError, TransactionRepository};

const AUDIT_RESOURCE: &str = "inventory";

/// Descriptive state for creating an item or replacing its details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    pub category: ItemCategory,
    pub unit: ItemUnit,
    pub details: ItemDetails,
}

/// Result of an accepted stock movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockMutation {
    pub item: InventoryItem,
    pub transaction: StockTransaction,
}

/// Serializes and commits inventory writes.
///
/// ## Generic Parameters
///
/// - `I`: item store
/// - `T`: ledger store
/// - `A`: audit sink
pub struct StockCoordinator<I, T, A> {
    items: I,
    ledger: T,
    audit: A,
    clock: Arc<dyn Clock>,
    config: CoordinatorConfig,
    locks: KeyedLock<ItemId>,
}

impl<I, T, A> StockCoordinator<I, T, A>
where
    I: ItemRepository,
    T: TransactionRepository,
    A: AuditSink,
{
    pub fn new(items: I, ledger: T, audit: A) -> Self {
        Self {
            items,
            ledger,
            audit,
            clock: Arc::new(SystemClock),
            config: CoordinatorConfig::default(),
            locks: KeyedLock::new(),
        }
    }

    pub fn with_config(mut self, config: CoordinatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn create_item(
        &self,
        draft: ItemDraft,
        actor: UserId,
    ) -> Result<InventoryItem, StockError> {
        let now = self.clock.now();
        let mut item = InventoryItem::create(&NewItem {
            item_id: ItemId::new(),
            name: draft.name,
            category: draft.category,
            unit: draft.unit,
            created_by: actor,
            details: draft.details,
            occurred_at: now,
        })?;
        item.check_expiration(now, &self.config.expiration);

        // The id is fresh, so no other writer can contend for it yet.
        let item_id = item.id_typed();
        self.items.insert(&item)?;

        tracing::info!(item_id = %item_id, name = %item.name(), "inventory item created");
        self.record_audit(
            actor,
            AuditAction::Create,
            item_id,
            format!("created inventory item {}", item.name()),
            now,
        );
        Ok(item)
    }

    pub fn add_stock(
        &self,
        item_id: ItemId,
        request: AddStock,
        actor: UserId,
    ) -> Result<StockMutation, StockError> {
        self.execute(item_id, StockMovement::Add(request), actor)
    }

    pub fn remove_stock(
        &self,
        item_id: ItemId,
        request: RemoveStock,
        actor: UserId,
    ) -> Result<StockMutation, StockError> {
        self.execute(item_id, StockMovement::Remove(request), actor)
    }

    /// Set stock to a counted quantity. A count equal to the current stock is
    /// still recorded, as a zero-delta entry.
    pub fn adjust_stock(
        &self,
        item_id: ItemId,
        request: AdjustStock,
        actor: UserId,
    ) -> Result<StockMutation, StockError> {
        self.execute(item_id, StockMovement::Adjust(request), actor)
    }

    pub fn transfer_stock(
        &self,
        item_id: ItemId,
        request: TransferStock,
        actor: UserId,
    ) -> Result<StockMutation, StockError> {
        self.execute(item_id, StockMovement::Transfer(request), actor)
    }

    pub fn activate_item(
        &self,
        item_id: ItemId,
        actor: UserId,
    ) -> Result<InventoryItem, StockError> {
        self.change_item(item_id, actor, "activate_item", |item, now, _| item.activate(now))
    }

    pub fn deactivate_item(
        &self,
        item_id: ItemId,
        actor: UserId,
    ) -> Result<InventoryItem, StockError> {
        self.change_item(item_id, actor, "deactivate_item", |item, now, _| item.deactivate(now))
    }

    /// Replace descriptive metadata; stock and usage history are untouched.
    pub fn update_item_details(
        &self,
        item_id: ItemId,
        draft: ItemDraft,
        actor: UserId,
    ) -> Result<InventoryItem, StockError> {
        let to_update = |occurred_at| ItemUpdate {
            name: draft.name.clone(),
            category: draft.category,
            unit: draft.unit,
            details: draft.details.clone(),
            occurred_at,
        };
        to_update(self.clock.now()).validate()?;

        self.change_item(item_id, actor, "update_item_details", |item, now, config| {
            item.update_details(&to_update(now), &config.expiration)
        })
    }

    fn lock(&self, item_id: ItemId) -> Result<KeyGuard<'_, ItemId>, StockError> {
        match self.locks.acquire(&item_id, self.config.lock_timeout) {
            Ok(guard) => {
                tracing::debug!(item_id = %item_id, "item lock acquired");
                Ok(guard)
            }
            Err(LockError::Timeout(waited)) => {
                tracing::warn!(
                    item_id = %item_id,
                    waited_ms = waited.as_millis() as u64,
                    "item lock timed out"
                );
                Err(StockError::ConcurrencyConflict(format!("item {item_id} is busy")))
            }
            Err(LockError::Poisoned) => Err(StockError::Store(RepositoryError::Poisoned)),
        }
    }

    /// Run `attempt` until it stops losing version races or attempts run out.
    fn with_retries<R>(
        &self,
        item_id: ItemId,
        operation: &'static str,
        mut attempt: impl FnMut() -> Result<R, StockError>,
    ) -> Result<R, StockError> {
        let mut tries = 1;
        loop {
            match attempt() {
                Err(StockError::ConcurrencyConflict(reason))
                    if tries < self.config.max_attempts =>
                {
                    tracing::warn!(
                        item_id = %item_id,
                        operation,
                        attempt = tries,
                        %reason,
                        "write conflict, retrying"
                    );
                    tries += 1;
                }
                Err(StockError::ConcurrencyConflict(reason)) => {
                    tracing::warn!(
                        item_id = %item_id,
                        operation,
                        attempts = tries,
                        %reason,
                        "giving up after repeated conflicts"
                    );
                    return Err(StockError::ConcurrencyConflict(reason));
                }
                other => return other,
            }
        }
    }

    fn load(&self, item_id: ItemId) -> Result<InventoryItem, StockError> {
        self.items.find_by_id(item_id)?.ok_or(StockError::NotFound)
    }

    fn execute(
        &self,
        item_id: ItemId,
        movement: StockMovement,
        actor: UserId,
    ) -> Result<StockMutation, StockError> {
        movement.validate()?;
        let operation = movement.label();
        // One identity across retries so a landed append is recognised.
        let transaction_id = TransactionId::new();

        let _guard = self.lock(item_id)?;
        let mutation = self.with_retries(item_id, operation, || {
            self.commit_movement(item_id, transaction_id, &movement, actor)
        })?;

        let entry = &mutation.transaction;
        tracing::info!(
            item_id = %item_id,
            transaction_id = %entry.id_typed(),
            event_type = entry.event_type(),
            quantity = %entry.quantity(),
            stock_before = %entry.stock_before(),
            stock_after = %entry.stock_after(),
            sequence = entry.sequence(),
            "stock movement committed"
        );
        self.record_audit(
            actor,
            AuditAction::Update,
            item_id,
            format!(
                "{operation}: {} {} ({} -> {})",
                entry.kind(),
                entry.quantity(),
                entry.stock_before(),
                entry.stock_after()
            ),
            entry.processed_at(),
        );
        Ok(mutation)
    }

    fn commit_movement(
        &self,
        item_id: ItemId,
        transaction_id: TransactionId,
        movement: &StockMovement,
        actor: UserId,
    ) -> Result<StockMutation, StockError> {
        let current = self.load(item_id)?;
        let now = self.clock.now();

        let command = StockCommand {
            item_id,
            transaction_id,
            actor,
            occurred_at: now,
            movement: movement.clone(),
        };
        let entries = current
            .handle(&command)
            .map_err(|e| StockError::from_domain(item_id, e))?;

        let mut updated = current.clone();
        for entry in &entries {
            updated.apply(entry);
        }
        updated.check_expiration(now, &self.config.expiration);
        tracing::debug!(item_id = %item_id, version = updated.version(), "movement decided");

        self.items
            .update(&updated, ExpectedVersion::Exact(current.version()))?;

        for entry in &entries {
            self.append_or_restore(&current, &updated, entry)?;
        }

        let transaction = entries.into_iter().next().ok_or_else(|| {
            StockError::Validation("movement produced no ledger entry".to_string())
        })?;
        Ok(StockMutation {
            item: updated,
            transaction,
        })
    }

    /// Append `entry`, or put `previous` back if the ledger will not take it.
    fn append_or_restore(
        &self,
        previous: &InventoryItem,
        written: &InventoryItem,
        entry: &StockTransaction,
    ) -> Result<(), StockError> {
        let item_id = previous.id_typed();
        let mut failure = None;

        for attempt in 1..=self.config.ledger_append_attempts {
            match self.ledger.append(entry) {
                Ok(()) => return Ok(()),
                // An earlier attempt landed even though it reported failure.
                Err(RepositoryError::Duplicate(_)) if attempt > 1 => return Ok(()),
                Err(err @ RepositoryError::Duplicate(_)) => {
                    failure = Some(err);
                    break;
                }
                Err(err) => {
                    tracing::warn!(
                        item_id = %item_id,
                        transaction_id = %entry.id_typed(),
                        attempt,
                        error = %err,
                        "ledger append failed"
                    );
                    failure = Some(err);
                }
            }
        }

        let failure = failure.unwrap_or_else(|| {
            RepositoryError::Unavailable("ledger append was not attempted".to_string())
        });

        match self
            .items
            .update(previous, ExpectedVersion::Exact(written.version()))
        {
            Ok(()) => {
                tracing::warn!(
                    item_id = %item_id,
                    transaction_id = %entry.id_typed(),
                    error = %failure,
                    "item restored after ledger append failure"
                );
                Err(StockError::Store(failure))
            }
            Err(restore) => {
                tracing::error!(
                    item_id = %item_id,
                    transaction_id = %entry.id_typed(),
                    append_error = %failure,
                    restore_error = %restore,
                    "item written without ledger entry and could not be restored"
                );
                Err(StockError::Consistency(format!(
                    "item {item_id} at version {} has no ledger entry {}: {failure}; \
                     restore failed: {restore}",
                    written.version(),
                    entry.id_typed()
                )))
            }
        }
    }

    fn change_item(
        &self,
        item_id: ItemId,
        actor: UserId,
        operation: &'static str,
        change: impl Fn(&mut InventoryItem, DateTime<Utc>, &CoordinatorConfig) -> DomainResult<()>,
    ) -> Result<InventoryItem, StockError> {
        let _guard = self.lock(item_id)?;

        let updated = self.with_retries(item_id, operation, || {
            let current = self.load(item_id)?;
            let now = self.clock.now();

            let mut updated = current.clone();
            change(&mut updated, now, &self.config)
                .map_err(|e| StockError::from_domain(item_id, e))?;
            updated.check_expiration(now, &self.config.expiration);

            self.items
                .update(&updated, ExpectedVersion::Exact(current.version()))?;
            Ok(updated)
        })?;

        tracing::info!(
            item_id = %item_id,
            operation,
            version = updated.version(),
            "inventory item updated"
        );
        self.record_audit(
            actor,
            AuditAction::Update,
            item_id,
            format!("{operation}: {}", updated.name()),
            updated.updated_at(),
        );
        Ok(updated)
    }

    fn record_audit(
        &self,
        actor: UserId,
        action: AuditAction,
        item_id: ItemId,
        description: String,
        occurred_at: DateTime<Utc>,
    ) {
        let entry =
            AuditEntry::new(actor, action, AUDIT_RESOURCE, item_id, description, occurred_at);
        if let Err(err) = self.audit.record(entry) {
            tracing::warn!(
                item_id = %item_id,
                action = %action,
                error = %err,
                "audit record failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::repository::{
        InMemoryItemRepository, InMemoryTransactionRepository, TransactionFilter,
    };
    use chrono::{Duration, TimeZone};
    use pawtrack_core::DomainError;
    use pawtrack_events::InMemoryAuditSink;
    use pawtrack_inventory::{
        InboundKind, ItemStatus, MAX_QUANTITY, MAX_UNIT_COST, OutboundKind, StockThresholds,
        TransactionType,
    };
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    type TestCoordinator = StockCoordinator<
        Arc<InMemoryItemRepository>,
        Arc<InMemoryTransactionRepository>,
        Arc<InMemoryAuditSink>,
    >;

    struct Fixture {
        coordinator: TestCoordinator,
        items: Arc<InMemoryItemRepository>,
        ledger: Arc<InMemoryTransactionRepository>,
        audit: Arc<InMemoryAuditSink>,
        clock: Arc<FixedClock>,
        actor: UserId,
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 2, 10, 0, 0).unwrap()
    }

    fn setup() -> Fixture {
        let items = Arc::new(InMemoryItemRepository::new());
        let ledger = Arc::new(InMemoryTransactionRepository::new());
        let audit = Arc::new(InMemoryAuditSink::new());
        let clock = Arc::new(FixedClock::new(start()));
        let coordinator = StockCoordinator::new(items.clone(), ledger.clone(), audit.clone())
            .with_clock(clock.clone());
        Fixture {
            coordinator,
            items,
            ledger,
            audit,
            clock,
            actor: UserId::new(),
        }
    }

    fn draft(reorder_point: Decimal) -> ItemDraft {
        ItemDraft {
            name: "Dry dog food".to_string(),
            category: ItemCategory::Food,
            unit: ItemUnit::Bag,
            details: ItemDetails {
                thresholds: StockThresholds {
                    reorder_point,
                    ..StockThresholds::default()
                },
                ..ItemDetails::default()
            },
        }
    }

    fn add(quantity: Decimal, unit_cost: Decimal) -> AddStock {
        AddStock {
            quantity,
            unit_cost,
            source: InboundKind::Purchase,
            supplier: None,
            expiration_date: None,
            reference: Some("PO-1042".to_string()),
            notes: None,
        }
    }

    fn usage(quantity: Decimal) -> RemoveStock {
        RemoveStock {
            quantity,
            kind: OutboundKind::Usage,
            related_entity: None,
            reason: Some("feeding".to_string()),
            reference: None,
            notes: None,
        }
    }

    fn count(new_quantity: Decimal) -> AdjustStock {
        AdjustStock {
            new_quantity,
            reason: Some("cycle count".to_string()),
            notes: None,
        }
    }

    fn history(f: &Fixture, item_id: ItemId) -> Vec<StockTransaction> {
        f.ledger
            .list(&TransactionFilter::for_item(item_id))
            .unwrap()
            .items
    }

    #[test]
    fn add_then_remove_then_overdraw() {
        let f = setup();
        let item = f.coordinator.create_item(draft(dec!(5)), f.actor).unwrap();
        let id = item.id_typed();

        let added = f.coordinator.add_stock(id, add(dec!(10), dec!(2.50)), f.actor).unwrap();
        assert_eq!(added.item.current_stock(), dec!(10));
        assert_eq!(added.item.total_value(), dec!(25.00));
        assert_eq!(added.transaction.kind(), TransactionType::In);
        assert_eq!(added.transaction.stock_before(), dec!(0));
        assert_eq!(added.transaction.stock_after(), dec!(10));

        let removed = f.coordinator.remove_stock(id, usage(dec!(6)), f.actor).unwrap();
        assert_eq!(removed.item.current_stock(), dec!(4));
        assert!(removed.item.is_low_stock());
        assert_eq!(removed.transaction.kind(), TransactionType::Out);
        assert_eq!(removed.transaction.quantity(), dec!(6));
        assert_eq!(removed.transaction.stock_before(), dec!(10));
        assert_eq!(removed.transaction.stock_after(), dec!(4));

        let err = f.coordinator.remove_stock(id, usage(dec!(10)), f.actor).unwrap_err();
        assert_eq!(
            err,
            StockError::InsufficientStock {
                requested: dec!(10),
                available: dec!(4)
            }
        );
        assert_eq!(f.items.find_by_id(id).unwrap().unwrap().current_stock(), dec!(4));
        assert_eq!(history(&f, id).len(), 2);
    }

    #[test]
    fn count_correction_records_signed_delta() {
        let f = setup();
        let id = f.coordinator.create_item(draft(dec!(0)), f.actor).unwrap().id_typed();
        f.coordinator.add_stock(id, add(dec!(4), dec!(1)), f.actor).unwrap();

        let adjusted = f.coordinator.adjust_stock(id, count(dec!(0)), f.actor).unwrap();
        assert_eq!(adjusted.item.current_stock(), dec!(0));
        assert_eq!(adjusted.transaction.kind(), TransactionType::Adjustment);
        assert_eq!(adjusted.transaction.quantity(), dec!(-4));

        let confirmed = f.coordinator.adjust_stock(id, count(dec!(0)), f.actor).unwrap();
        assert_eq!(confirmed.transaction.quantity(), Decimal::ZERO);
        assert_eq!(history(&f, id).len(), 3);
    }

    #[test]
    fn concurrent_creations_get_distinct_items() {
        let f = setup();
        let created: Vec<InventoryItem> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| f.coordinator.create_item(draft(dec!(0)), f.actor)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap().unwrap()).collect()
        });

        let ids: std::collections::HashSet<ItemId> =
            created.iter().map(InventoryItem::id_typed).collect();
        assert_eq!(ids.len(), 8);
        for id in &ids {
            let stored = f.items.find_by_id(*id).unwrap().unwrap();
            assert_eq!(stored.version(), 1);
            assert!(history(&f, *id).is_empty());
        }

        let entries = f.audit.entries().unwrap();
        assert_eq!(entries.len(), 8);
        assert!(entries.iter().all(|e| e.action == AuditAction::Create));
    }

    #[test]
    fn inactive_item_rejects_stock_changes() {
        let f = setup();
        let id = f.coordinator.create_item(draft(dec!(0)), f.actor).unwrap().id_typed();
        f.coordinator.add_stock(id, add(dec!(5), dec!(1)), f.actor).unwrap();
        let inactive = f.coordinator.deactivate_item(id, f.actor).unwrap();
        assert_eq!(inactive.status(), ItemStatus::Inactive);
        let audited = f.audit.entries().unwrap().len();

        let move_to_shed = TransferStock {
            to_location: "Shed B".to_string(),
            notes: None,
        };
        let results = [
            f.coordinator.add_stock(id, add(dec!(1), dec!(1)), f.actor),
            f.coordinator.remove_stock(id, usage(dec!(2)), f.actor),
            f.coordinator.adjust_stock(id, count(dec!(3)), f.actor),
            f.coordinator.transfer_stock(id, move_to_shed, f.actor),
        ];
        for result in results {
            assert_eq!(result.unwrap_err(), StockError::ItemInactive(id));
        }

        let stored = f.items.find_by_id(id).unwrap().unwrap();
        assert_eq!(stored, inactive);
        assert_eq!(stored.version(), inactive.version());
        assert_eq!(history(&f, id).len(), 1);
        assert_eq!(f.audit.entries().unwrap().len(), audited);

        let again = f.coordinator.deactivate_item(id, f.actor).unwrap_err();
        assert!(matches!(again, StockError::Validation(_)));
    }

    #[test]
    fn oversized_movements_are_rejected_without_panicking() {
        let f = setup();
        let id = f.coordinator.create_item(draft(dec!(0)), f.actor).unwrap().id_typed();

        let huge = Decimal::from(1_000_000_000_000_000i64);
        let err = f.coordinator.add_stock(id, add(huge, huge), f.actor).unwrap_err();
        assert!(matches!(err, StockError::Validation(_)));
        let err = f.coordinator.add_stock(id, add(Decimal::MAX, dec!(0)), f.actor).unwrap_err();
        assert!(matches!(err, StockError::Validation(_)));

        let stored = f.items.find_by_id(id).unwrap().unwrap();
        assert_eq!(stored.current_stock(), Decimal::ZERO);
        assert_eq!(stored.version(), 1);
        assert!(history(&f, id).is_empty());

        let largest = f
            .coordinator
            .add_stock(id, add(MAX_QUANTITY, MAX_UNIT_COST), f.actor)
            .unwrap();
        assert_eq!(largest.item.total_value(), MAX_QUANTITY * MAX_UNIT_COST);
    }

    #[test]
    fn validation_precedes_lookup() {
        let f = setup();
        let err = f
            .coordinator
            .add_stock(ItemId::new(), add(dec!(0), dec!(1)), f.actor)
            .unwrap_err();
        assert!(matches!(err, StockError::Validation(_)));

        let err = f
            .coordinator
            .add_stock(ItemId::new(), add(dec!(1), dec!(1)), f.actor)
            .unwrap_err();
        assert_eq!(err, StockError::NotFound);

        let err = f
            .coordinator
            .create_item(
                ItemDraft {
                    name: " ".to_string(),
                    ..draft(dec!(0))
                },
                f.actor,
            )
            .unwrap_err();
        assert!(matches!(err, StockError::Validation(_)));
    }

    #[test]
    fn expiry_flags_follow_the_clock() {
        let f = setup();
        let mut perishable = draft(dec!(0));
        perishable.details.has_expiration = true;
        perishable.details.expiration_date = Some(start() + Duration::days(40));
        let id = f.coordinator.create_item(perishable, f.actor).unwrap().id_typed();

        f.clock.advance(Duration::days(15));
        let added = f.coordinator.add_stock(id, add(dec!(2), dec!(9)), f.actor).unwrap();
        assert!(added.item.is_expiring_soon());
        assert!(!added.item.is_expired());

        f.clock.set(start() + Duration::days(40));
        let removed = f.coordinator.remove_stock(id, usage(dec!(1)), f.actor).unwrap();
        assert!(removed.item.is_expired());
        assert_eq!(removed.item.last_used_at(), Some(start() + Duration::days(40)));
    }

    #[test]
    fn update_details_keeps_stock() {
        let f = setup();
        let id = f.coordinator.create_item(draft(dec!(0)), f.actor).unwrap().id_typed();
        f.coordinator.add_stock(id, add(dec!(8), dec!(3)), f.actor).unwrap();

        let mut renamed = draft(dec!(10));
        renamed.name = "Senior dog food".to_string();
        let updated = f.coordinator.update_item_details(id, renamed, f.actor).unwrap();

        assert_eq!(updated.name(), "Senior dog food");
        assert_eq!(updated.current_stock(), dec!(8));
        assert_eq!(updated.unit_cost(), dec!(3));
        assert!(updated.is_low_stock());
        assert_eq!(history(&f, id).len(), 1);
    }

    #[test]
    fn transfer_records_location_move() {
        let f = setup();
        let id = f.coordinator.create_item(draft(dec!(0)), f.actor).unwrap().id_typed();
        f.coordinator.add_stock(id, add(dec!(5), dec!(1)), f.actor).unwrap();

        let moved = f
            .coordinator
            .transfer_stock(
                id,
                TransferStock {
                    to_location: "Kennel B pantry".to_string(),
                    notes: None,
                },
                f.actor,
            )
            .unwrap();
        assert_eq!(moved.item.location(), Some("Kennel B pantry"));
        assert_eq!(moved.transaction.stock_before(), moved.transaction.stock_after());

        let err = f
            .coordinator
            .transfer_stock(
                id,
                TransferStock {
                    to_location: "  ".to_string(),
                    notes: None,
                },
                f.actor,
            )
            .unwrap_err();
        assert_eq!(
            err,
            StockError::from(DomainError::validation("destination location cannot be empty"))
        );
    }

    #[test]
    fn every_write_is_audited() {
        let f = setup();
        let id = f.coordinator.create_item(draft(dec!(0)), f.actor).unwrap().id_typed();
        f.coordinator.add_stock(id, add(dec!(2), dec!(1)), f.actor).unwrap();
        f.coordinator.deactivate_item(id, f.actor).unwrap();
        let _ = f.coordinator.add_stock(id, add(dec!(2), dec!(1)), f.actor);

        let entries = f.audit.entries_for(&id.to_string()).unwrap();
        let actions: Vec<_> = entries.iter().map(|e| e.action).collect();
        assert_eq!(
            actions,
            vec![AuditAction::Create, AuditAction::Update, AuditAction::Update]
        );
        assert!(entries.iter().all(|e| e.resource == "inventory" && e.actor == f.actor));
    }
}
