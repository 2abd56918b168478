use std::hint::black_box;
use std::sync::Arc;
use std::thread;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use pawtrack_core::{ItemId, UserId};
use pawtrack_events::TracingAuditSink;
use pawtrack_infra::{
    InMemoryItemRepository, InMemoryTransactionRepository, InventoryQueries, ItemDraft,
    StockCoordinator,
};
use pawtrack_inventory::{
    AddStock, InboundKind, ItemCategory, ItemDetails, ItemUnit, OutboundKind, RemoveStock,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

type Coordinator = StockCoordinator<
    Arc<InMemoryItemRepository>,
    Arc<InMemoryTransactionRepository>,
    TracingAuditSink,
>;

type Queries = InventoryQueries<Arc<InMemoryItemRepository>, Arc<InMemoryTransactionRepository>>;

fn setup() -> (Arc<Coordinator>, Queries) {
    let items = Arc::new(InMemoryItemRepository::new());
    let ledger = Arc::new(InMemoryTransactionRepository::new());
    let coordinator =
        Arc::new(StockCoordinator::new(items.clone(), ledger.clone(), TracingAuditSink));
    (coordinator, InventoryQueries::new(items, ledger))
}

fn create(coordinator: &Coordinator, name: &str) -> ItemId {
    coordinator
        .create_item(
            ItemDraft {
                name: name.to_string(),
                category: ItemCategory::Supplies,
                unit: ItemUnit::Bag,
                details: ItemDetails::default(),
            },
            UserId::new(),
        )
        .unwrap()
        .id_typed()
}

fn restock(quantity: Decimal) -> AddStock {
    AddStock {
        quantity,
        unit_cost: dec!(8.75),
        source: InboundKind::Purchase,
        supplier: None,
        expiration_date: None,
        reference: None,
        notes: None,
    }
}

fn usage(quantity: Decimal) -> RemoveStock {
    RemoveStock {
        quantity,
        kind: OutboundKind::Usage,
        related_entity: None,
        reason: None,
        reference: None,
        notes: None,
    }
}

fn bench_mutation_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("mutation_latency");
    group.sample_size(500);

    group.bench_function("create_item", |b| {
        let (coordinator, _) = setup();
        b.iter(|| black_box(create(&coordinator, "Clumping litter")));
    });

    group.bench_function("add_then_remove", |b| {
        let (coordinator, _) = setup();
        let id = create(&coordinator, "Clumping litter");
        let actor = UserId::new();
        b.iter(|| {
            coordinator.add_stock(id, restock(dec!(2)), actor).unwrap();
            black_box(coordinator.remove_stock(id, usage(dec!(2)), actor).unwrap());
        });
    });

    group.finish();
}

fn bench_contention(c: &mut Criterion) {
    let mut group = c.benchmark_group("contention");
    let writes_per_thread = 50;

    for threads in [2usize, 4, 8] {
        group.throughput(Throughput::Elements((threads * writes_per_thread) as u64));

        group.bench_with_input(BenchmarkId::new("one_item", threads), &threads, |b, &threads| {
            let (coordinator, _) = setup();
            let id = create(&coordinator, "Shared bin");
            b.iter(|| {
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let coordinator = coordinator.clone();
                        thread::spawn(move || {
                            for _ in 0..writes_per_thread {
                                coordinator.add_stock(id, restock(dec!(1)), UserId::new()).unwrap();
                            }
                        })
                    })
                    .collect();
                for h in handles {
                    h.join().unwrap();
                }
            });
        });

        let per_thread = BenchmarkId::new("item_per_thread", threads);
        group.bench_with_input(per_thread, &threads, |b, &threads| {
            let (coordinator, _) = setup();
            let ids: Vec<_> = (0..threads)
                .map(|n| create(&coordinator, &format!("Bin {n}")))
                .collect();
            b.iter(|| {
                let handles: Vec<_> = ids
                    .iter()
                    .map(|&id| {
                        let coordinator = coordinator.clone();
                        thread::spawn(move || {
                            for _ in 0..writes_per_thread {
                                coordinator.add_stock(id, restock(dec!(1)), UserId::new()).unwrap();
                            }
                        })
                    })
                    .collect();
                for h in handles {
                    h.join().unwrap();
                }
            });
        });
    }

    group.finish();
}

fn bench_ledger_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger_verification");

    for history in [100usize, 1_000] {
        let (coordinator, queries) = setup();
        let id = create(&coordinator, "Audited bin");
        let actor = UserId::new();
        for _ in 0..history {
            coordinator.add_stock(id, restock(dec!(1)), actor).unwrap();
        }

        group.throughput(Throughput::Elements(history as u64));
        group.bench_with_input(BenchmarkId::from_parameter(history), &history, |b, _| {
            b.iter(|| black_box(queries.verify_ledger(id).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_mutation_latency,
    bench_contention,
    bench_ledger_verification
);
criterion_main!(benches);
