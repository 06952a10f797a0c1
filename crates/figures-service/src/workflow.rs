//! # Order Workflow
//!
//! Turns a cart into a persisted order, or into a rejection that left no
//! trace behind.
//!
//! ## Stages
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Received ──► Validated ──► Reserved ──► Priced ──► Persisted ✓        │
//! │     │            │             │            │           │               │
//! │     │            │             │            └── save fails              │
//! │     │            │             └── no price rule        │               │
//! │     │            │                     │                ▼               │
//! │     │            │                     └──────────► release ──► Failed  │
//! │     │            └── InsufficientStock ──► Rejected (nothing reserved)  │
//! │     └── bad line / unknown kind ────────► Rejected (nothing touched)    │
//! │         price out of i64 cents ─────────► Rejected (nothing touched)    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Cancellation
//! Everything from reservation onwards runs in a spawned task. If the
//! caller's future is dropped, the task still finishes: the order is
//! either persisted or its reservation released.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn, Instrument};
use uuid::Uuid;

use figures_core::order::reservation_items;
use figures_core::validation::{validate_cart_size, validate_count};
use figures_core::{
    Cart, CoreError, FigureFactory, FigureKind, InventoryStore, Money, Order, OrderStorage,
    PricingPolicy, ReservationItem, ValidatedLine, MAX_CART_LINES,
};

use crate::error::{OrderError, OrderResult};

// =============================================================================
// Receipt & Stage
// =============================================================================

/// Successful outcome of `place_order`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderReceipt {
    pub order_id: Uuid,

    /// Total as confirmed by the order store.
    pub total: Money,
}

/// Workflow stage, used as a structured log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStage {
    Received,
    Validated,
    Reserved,
    Priced,
    Persisted,
    Rejected,
    Failed,
}

impl fmt::Display for OrderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStage::Received => "received",
            OrderStage::Validated => "validated",
            OrderStage::Reserved => "reserved",
            OrderStage::Priced => "priced",
            OrderStage::Persisted => "persisted",
            OrderStage::Rejected => "rejected",
            OrderStage::Failed => "failed",
        };
        f.write_str(name)
    }
}

// =============================================================================
// OrderService
// =============================================================================

/// The order workflow with its collaborators.
///
/// Cheap to clone; clones share the factory, pricing table and stores.
#[derive(Clone)]
pub struct OrderService {
    factory: Arc<FigureFactory>,
    pricing: Arc<PricingPolicy>,
    inventory: Arc<dyn InventoryStore>,
    storage: Arc<dyn OrderStorage>,
    max_cart_lines: usize,
}

impl fmt::Debug for OrderService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderService")
            .field("factory", &self.factory)
            .field("pricing", &self.pricing)
            .field("max_cart_lines", &self.max_cart_lines)
            .finish_non_exhaustive()
    }
}

impl OrderService {
    /// Creates the service.
    ///
    /// ## Errors
    /// `OrderError::Internal` if any kind the factory can build has no
    /// pricing rule; such a service could reserve stock it cannot price.
    pub fn new(
        factory: FigureFactory,
        pricing: PricingPolicy,
        inventory: Arc<dyn InventoryStore>,
        storage: Arc<dyn OrderStorage>,
    ) -> OrderResult<Self> {
        let missing = pricing.missing_rules(&factory.kinds());
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(FigureKind::as_str).collect();
            return Err(OrderError::Internal(format!(
                "no pricing rule for: {}",
                names.join(", ")
            )));
        }

        Ok(OrderService {
            factory: Arc::new(factory),
            pricing: Arc::new(pricing),
            inventory,
            storage,
            max_cart_lines: MAX_CART_LINES,
        })
    }

    /// Overrides the maximum number of cart lines.
    pub fn with_max_cart_lines(mut self, max: usize) -> Self {
        self.max_cart_lines = max;
        self
    }

    /// The inventory this service reserves from.
    pub fn inventory(&self) -> &Arc<dyn InventoryStore> {
        &self.inventory
    }

    /// Places an order for `cart`.
    ///
    /// ## Returns
    /// * `Ok(OrderReceipt)` - reserved, priced and persisted
    /// * `Err(OrderError::Rejected | InvalidCart)` - bad input or a price out
    ///   of range, nothing touched
    /// * `Err(OrderError::InsufficientStock)` - nothing reserved
    /// * `Err(OrderError::Persistence)` - reservation released
    /// * `Err(OrderError::Internal)` - see the error log
    pub async fn place_order(&self, cart: &Cart) -> OrderResult<OrderReceipt> {
        info!(stage = %OrderStage::Received, lines = cart.positions.len(), "Order received");

        let lines = self.validate(cart).inspect_err(|err| {
            warn!(stage = %OrderStage::Rejected, error = %err, "Cart rejected");
        })?;

        debug!(stage = %OrderStage::Validated, lines = lines.len(), "Cart validated");

        let fulfilment = Fulfilment {
            items: reservation_items(&lines),
            lines,
            pricing: Arc::clone(&self.pricing),
            inventory: Arc::clone(&self.inventory),
            storage: Arc::clone(&self.storage),
        };

        // Detached from the caller so a dropped request cannot strand a
        // reservation between reserve and release.
        let task = tokio::spawn(fulfilment.run().in_current_span());

        task.await
            .map_err(|e| OrderError::Internal(format!("order task failed: {e}")))?
    }

    /// Runs the factory over every line and prices it; the first failure wins.
    ///
    /// Line totals and their running sum are checked here, so a cart whose
    /// price leaves the `i64` cents range is rejected before any stock is
    /// reserved. A factory or price table that disagrees with itself is
    /// `Internal`, not the caller's fault.
    fn validate(&self, cart: &Cart) -> OrderResult<Vec<ValidatedLine>> {
        validate_cart_size(cart.positions.len(), self.max_cart_lines)?;

        let mut total = Money::zero();
        let mut lines = Vec::with_capacity(cart.positions.len());

        for (line, position) in cart.positions.iter().enumerate() {
            let rejected = |source: CoreError| {
                if matches!(
                    source,
                    CoreError::KindMismatch { .. } | CoreError::MissingPriceRule(_)
                ) {
                    error!(line, error = %source, "Factory and pricing disagree");
                    return OrderError::Internal(source.to_string());
                }
                OrderError::Rejected { line, source }
            };

            let kind = FigureKind::parse(&position.kind).map_err(|e| rejected(e.into()))?;
            validate_count(position.count).map_err(|e| rejected(e.into()))?;
            let figure = self
                .factory
                .create(&kind, &position.measurements)
                .map_err(rejected)?;

            let line_total = self
                .pricing
                .line_total(&figure, position.count)
                .map_err(rejected)?;
            total = total.checked_add(line_total).map_err(rejected)?;

            lines.push(ValidatedLine {
                figure,
                count: position.count,
            });
        }

        debug!(total_cents = total.cents(), "Cart priced");
        Ok(lines)
    }
}

// =============================================================================
// Fulfilment (reserve → price → persist, with compensation)
// =============================================================================

/// Everything the detached part of the workflow needs, owned.
struct Fulfilment {
    lines: Vec<ValidatedLine>,
    items: Vec<ReservationItem>,
    pricing: Arc<PricingPolicy>,
    inventory: Arc<dyn InventoryStore>,
    storage: Arc<dyn OrderStorage>,
}

impl Fulfilment {
    async fn run(self) -> OrderResult<OrderReceipt> {
        let Fulfilment {
            lines,
            items,
            pricing,
            inventory,
            storage,
        } = self;

        inventory.check_and_reserve(&items).await.map_err(|err| {
            warn!(stage = %OrderStage::Rejected, error = %err, "Reservation failed");
            OrderError::from_store(err)
        })?;

        for item in &items {
            debug!(stage = %OrderStage::Reserved, kind = %item.kind, count = item.count, "Reserved");
        }

        let order = match Order::price(lines, &pricing) {
            Ok(order) => order,
            Err(err) => {
                error!(stage = %OrderStage::Failed, error = %err, "Pricing failed after reservation");
                release(&*inventory, &items, None).await?;
                return Err(OrderError::Internal(err.to_string()));
            }
        };

        debug!(
            stage = %OrderStage::Priced,
            order_id = %order.id(),
            total_cents = order.total().cents(),
            "Order priced"
        );

        match storage.save(&order).await {
            Ok(total) => {
                info!(
                    stage = %OrderStage::Persisted,
                    order_id = %order.id(),
                    total = %total,
                    "Order persisted"
                );
                Ok(OrderReceipt {
                    order_id: order.id(),
                    total,
                })
            }
            Err(err) => {
                warn!(
                    stage = %OrderStage::Failed,
                    order_id = %order.id(),
                    error = %err,
                    "Save failed, releasing reservation"
                );
                release(&*inventory, &items, Some(order.id())).await?;
                Err(match err {
                    CoreError::Storage(msg) => OrderError::Persistence(msg),
                    other => OrderError::Persistence(other.to_string()),
                })
            }
        }
    }
}

/// Compensating release. A failure here leaks stock and is never hidden.
async fn release(
    inventory: &dyn InventoryStore,
    items: &[ReservationItem],
    order_id: Option<Uuid>,
) -> OrderResult<()> {
    match inventory.release(items).await {
        Ok(()) => {
            info!(order_id = ?order_id, items = items.len(), "Reservation released");
            Ok(())
        }
        Err(err) => {
            error!(
                order_id = ?order_id,
                error = %err,
                items = ?items,
                "Compensating release failed; reserved stock leaked"
            );
            Err(OrderError::Internal(format!(
                "reservation could not be released: {err}"
            )))
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
