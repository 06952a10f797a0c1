//! # Order Types
//!
//! What comes in (a [`Cart`]), what gets reserved ([`ReservationItem`]) and
//! what gets persisted (an [`Order`]).
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart { positions }                    ← deserialized from the caller  │
//! │    │                                                                    │
//! │    │  FigureFactory::create per line                                    │
//! │    ▼                                                                    │
//! │  Vec<ValidatedLine>                    ← figure + count, no I/O yet     │
//! │    │                                                                    │
//! │    ├──► reservation_items()  → [ (Circle, 3), (Square, 1) ]            │
//! │    │                            summed per kind, first-seen order       │
//! │    │                                                                    │
//! │    │  Order::price(lines, &PricingPolicy)                               │
//! │    ▼                                                                    │
//! │  Order { id, created_at, lines, total }  ← immutable, handed to storage │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreResult;
use crate::figure::{FigureKind, ValidatedFigure};
use crate::money::Money;
use crate::pricing::PricingPolicy;

// =============================================================================
// Cart (input)
// =============================================================================

/// One requested line of a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartPosition {
    /// Figure kind name, e.g. "Circle".
    #[serde(rename = "type")]
    pub kind: String,

    /// Measurements in the kind's canonical order.
    #[serde(default)]
    pub measurements: Vec<f64>,

    /// How many figures of this shape are wanted.
    pub count: u32,
}

impl CartPosition {
    pub fn new(kind: impl Into<String>, measurements: Vec<f64>, count: u32) -> Self {
        CartPosition {
            kind: kind.into(),
            measurements,
            count,
        }
    }
}

/// A checkout request.
///
/// ## JSON
/// ```json
/// { "positions": [ { "type": "Circle", "measurements": [2.0], "count": 1 } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub positions: Vec<CartPosition>,
}

impl Cart {
    pub fn new(positions: Vec<CartPosition>) -> Self {
        Cart { positions }
    }
}

// =============================================================================
// Validated Line
// =============================================================================

/// A cart line after its figure passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedLine {
    pub figure: ValidatedFigure,
    pub count: u32,
}

// =============================================================================
// Reservation Items
// =============================================================================

/// Quantity of one kind to reserve or release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationItem {
    pub kind: FigureKind,
    pub count: u32,
}

impl ReservationItem {
    pub fn new(kind: impl Into<FigureKind>, count: u32) -> Self {
        ReservationItem {
            kind: kind.into(),
            count,
        }
    }
}

/// Sums counts per kind, keeping each kind at its first-seen position.
///
/// ## Example
/// ```rust
/// use figures_core::order::{reservation_items, ValidatedLine};
/// use figures_core::figure::{Circle, Square};
///
/// let lines = vec![
///     ValidatedLine { figure: Circle::from_measurements(&[1.0]).unwrap(), count: 1 },
///     ValidatedLine { figure: Square::from_measurements(&[1.0]).unwrap(), count: 4 },
///     ValidatedLine { figure: Circle::from_measurements(&[3.0]).unwrap(), count: 2 },
/// ];
/// let items = reservation_items(&lines);
/// assert_eq!(items[0].kind.as_str(), "Circle");
/// assert_eq!(items[0].count, 3);
/// assert_eq!(items[1].count, 4);
/// ```
pub fn reservation_items(lines: &[ValidatedLine]) -> Vec<ReservationItem> {
    let mut items: Vec<ReservationItem> = Vec::new();

    for line in lines {
        let kind = line.figure.kind();
        match items.iter_mut().find(|item| item.kind == kind) {
            Some(item) => item.count = item.count.saturating_add(line.count),
            None => items.push(ReservationItem::new(kind, line.count)),
        }
    }

    items
}

// =============================================================================
// Order
// =============================================================================

/// A priced line of a finalized order.
#[derive(Debug, Clone)]
pub struct OrderLine {
    figure: ValidatedFigure,
    count: u32,
    unit_price: Money,
    line_total: Money,
}

impl OrderLine {
    pub fn figure(&self) -> &ValidatedFigure {
        &self.figure
    }

    pub fn kind(&self) -> FigureKind {
        self.figure.kind()
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// unit_price × count.
    pub fn line_total(&self) -> Money {
        self.line_total
    }
}

/// A finalized order, ready for the storage port.
///
/// Immutable: built once by [`Order::price`], then only read.
#[derive(Debug, Clone)]
pub struct Order {
    id: Uuid,
    created_at: DateTime<Utc>,
    lines: Vec<OrderLine>,
    total: Money,
}

impl Order {
    /// Prices validated lines and assembles the order.
    ///
    /// ## Returns
    /// * `Ok(Order)` - every line priced, total = Σ unit_price × count
    /// * `Err(CoreError::MissingPriceRule)` - a kind has no multiplier
    /// * `Err(CoreError::PriceOverflow)` - a line or the total leaves `i64` cents
    pub fn price(lines: Vec<ValidatedLine>, pricing: &PricingPolicy) -> CoreResult<Order> {
        let lines = lines
            .into_iter()
            .map(|line| {
                let unit_price = pricing.unit_price(&line.figure)?;
                Ok(OrderLine {
                    line_total: unit_price.multiply_quantity(line.count)?,
                    unit_price,
                    count: line.count,
                    figure: line.figure,
                })
            })
            .collect::<CoreResult<Vec<OrderLine>>>()?;

        let total = Money::total(lines.iter().map(OrderLine::line_total))?;

        Ok(Order {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            lines,
            total,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Sum of all line totals.
    pub fn total(&self) -> Money {
        self.total
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::figure::{Circle, Square, Triangle};

    fn line(figure: ValidatedFigure, count: u32) -> ValidatedLine {
        ValidatedLine { figure, count }
    }

    #[test]
    fn test_cart_json() {
        let json = r#"{"positions":[{"type":"Triangle","measurements":[3,4,5],"count":2}]}"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(
            cart.positions[0],
            CartPosition::new("Triangle", vec![3.0, 4.0, 5.0], 2)
        );
    }

    #[test]
    fn test_reservation_items_aggregate_in_order() {
        let lines = vec![
            line(Square::from_measurements(&[1.0]).unwrap(), 2),
            line(Circle::from_measurements(&[1.0]).unwrap(), 1),
            line(Square::from_measurements(&[5.0]).unwrap(), 3),
        ];
        assert_eq!(
            reservation_items(&lines),
            vec![
                ReservationItem::new(FigureKind::square(), 5),
                ReservationItem::new(FigureKind::circle(), 1),
            ]
        );
    }

    #[test]
    fn test_order_total_scales_with_count() {
        let lines = vec![
            line(Triangle::from_measurements(&[3.0, 4.0, 5.0]).unwrap(), 2),
            line(Circle::from_measurements(&[2.0]).unwrap(), 1),
        ];
        let order = Order::price(lines, &PricingPolicy::standard()).unwrap();

        assert_eq!(order.lines().len(), 2);
        assert_eq!(order.lines()[0].unit_price().cents(), 720);
        assert_eq!(order.lines()[0].line_total().cents(), 1440);
        assert_eq!(order.lines()[1].line_total().cents(), 1131);
        assert_eq!(order.total().cents(), 1440 + 1131);
    }

    #[test]
    fn test_order_missing_price_rule() {
        let lines = vec![line(Square::from_measurements(&[2.0]).unwrap(), 1)];
        let err = Order::price(lines, &PricingPolicy::new()).unwrap_err();
        assert!(matches!(err, CoreError::MissingPriceRule(_)));
    }

    #[test]
    fn test_order_total_out_of_range() {
        // Each line fits on its own; their sum does not
        let big = || line(Circle::from_measurements(&[1.4e8]).unwrap(), 1);
        let err = Order::price(vec![big(), big()], &PricingPolicy::standard()).unwrap_err();
        assert!(matches!(err, CoreError::PriceOverflow(_)));

        let err = Order::price(
            vec![line(Circle::from_measurements(&[1.4e8]).unwrap(), 2)],
            &PricingPolicy::standard(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::PriceOverflow(_)));
    }
}
