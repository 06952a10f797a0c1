//! Concurrent reservations never oversell.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use proptest::prelude::*;

use figures_core::{
    Cart, CartPosition, CoreResult, FigureFactory, FigureKind, InventoryStore, Money, Order,
    OrderStorage, PricingPolicy, ReservationItem,
};
use figures_service::{InventoryState, OrderError, OrderService};

const KINDS: [&str; 3] = ["Triangle", "Square", "Circle"];

#[derive(Default)]
struct RecordingStorage {
    saves: AtomicUsize,
}

#[async_trait]
impl OrderStorage for RecordingStorage {
    async fn save(&self, order: &Order) -> CoreResult<Money> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(order.total())
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_orders_sell_exactly_the_stock() {
    let stock = InventoryState::with_levels([(FigureKind::circle(), 20)]);
    let storage = Arc::new(RecordingStorage::default());
    let service = OrderService::new(
        FigureFactory::standard(),
        PricingPolicy::standard(),
        Arc::new(stock.clone()),
        storage.clone(),
    )
    .unwrap();

    let handles: Vec<_> = (0..50)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .place_order(&Cart::new(vec![CartPosition::new("Circle", vec![1.0], 1)]))
                    .await
            })
        })
        .collect();

    let mut succeeded = 0;
    let mut short = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(OrderError::InsufficientStock { .. }) => short += 1,
            Err(other) => panic!("unexpected {other:?}"),
        }
    }

    assert_eq!(succeeded, 20);
    assert_eq!(short, 30);
    assert_eq!(storage.saves.load(Ordering::SeqCst), 20);
    assert_eq!(stock.available(&FigureKind::circle()).await.unwrap(), 0);
}

fn batch() -> impl Strategy<Value = Vec<ReservationItem>> {
    prop::collection::vec((0usize..KINDS.len(), 1u32..6), 1..4).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(kind, count)| ReservationItem::new(KINDS[kind], count))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn concurrent_batches_conserve_stock(
        initial in prop::collection::vec(0u32..15, KINDS.len()),
        batches in prop::collection::vec(batch(), 1..24),
    ) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .build()
            .unwrap();

        let (reserved, finals) = runtime.block_on(async {
            let stock = InventoryState::with_levels(
                KINDS.iter().zip(&initial).map(|(kind, count)| (FigureKind::new(*kind), *count)),
            );

            let handles: Vec<_> = batches
                .iter()
                .cloned()
                .map(|items| {
                    let stock = stock.clone();
                    tokio::spawn(async move {
                        let ok = stock.check_and_reserve(&items).await.is_ok();
                        (ok, items)
                    })
                })
                .collect();

            let mut reserved: HashMap<FigureKind, u32> = HashMap::new();
            for handle in handles {
                let (ok, items) = handle.await.unwrap();
                if ok {
                    for item in items {
                        *reserved.entry(item.kind).or_default() += item.count;
                    }
                }
            }

            let mut finals = Vec::new();
            for kind in KINDS {
                finals.push(stock.available(&FigureKind::new(kind)).await.unwrap());
            }
            (reserved, finals)
        });

        for (index, kind) in KINDS.iter().enumerate() {
            let taken = reserved.get(&FigureKind::new(*kind)).copied().unwrap_or(0);
            prop_assert!(taken <= initial[index]);
            prop_assert_eq!(finals[index] + taken, initial[index]);
        }
    }

    #[test]
    fn reserve_then_release_is_identity(
        initial in prop::collection::vec(0u32..15, KINDS.len()),
        items in batch(),
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();

        let (before, after) = runtime.block_on(async {
            let stock = InventoryState::with_levels(
                KINDS.iter().zip(&initial).map(|(kind, count)| (FigureKind::new(*kind), *count)),
            );
            let before = stock.snapshot().unwrap();
            if stock.check_and_reserve(&items).await.is_ok() {
                stock.release(&items).await.unwrap();
            }
            (before, stock.snapshot().unwrap())
        });

        prop_assert_eq!(before, after);
    }
}
