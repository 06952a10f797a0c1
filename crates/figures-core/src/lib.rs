//! # figures-core: Pure Business Logic for the Figures Store
//!
//! This crate is the **heart** of the figures store. It contains the figure
//! model, pricing and order construction as pure code with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Figures Store Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              figures-service (OrderService)                     │   │
//! │  │    validate ──► reserve ──► price ──► persist ──► receipt       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ figures-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  figure   │  │  factory  │  │  pricing  │  │   order   │  │   │
//! │  │   │ Triangle  │  │ kind →    │  │ kind →    │  │ Cart      │  │   │
//! │  │   │ Square    │  │ validated │  │ multiplier│  │ Order     │  │   │
//! │  │   │ Circle    │  │ figure    │  │ Money     │  │ Lines     │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   ports: InventoryStore, OrderStorage (traits only)             │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK                             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 figures-db (Database Layer)                     │   │
//! │  │            SQLite inventory, order repository                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`figure`] - Figure trait, shapes, validation and area
//! - [`factory`] - Kind → constructor registry
//! - [`pricing`] - Kind → multiplier table
//! - [`money`] - Integer-cents money type
//! - [`order`] - Cart input, reservation items, priced orders
//! - [`inventory`] - Pure batch planning for inventory stores
//! - [`ports`] - Storage traits implemented elsewhere
//! - [`validation`] - Cart-level checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use figures_core::{FigureFactory, FigureKind, PricingPolicy};
//!
//! let factory = FigureFactory::standard();
//! let pricing = PricingPolicy::standard();
//!
//! let triangle = factory.create(&FigureKind::triangle(), &[3.0, 4.0, 5.0]).unwrap();
//! let line_total = pricing.line_total(&triangle, 2).unwrap();
//!
//! // 6.0 area × 1.2 × 2
//! assert_eq!(line_total.cents(), 1440);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod factory;
pub mod figure;
pub mod inventory;
pub mod money;
pub mod order;
pub mod ports;
pub mod pricing;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use factory::FigureFactory;
pub use figure::{Figure, FigureKind, ValidatedFigure};
pub use money::Money;
pub use order::{Cart, CartPosition, Order, OrderLine, ReservationItem, ValidatedLine};
pub use ports::{InventoryStore, OrderStorage};
pub use pricing::{PriceMultiplier, PricingPolicy};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single cart (default for `[limits]`).
pub const MAX_CART_LINES: usize = 100;

/// Maximum count of a single cart line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: u32 = 999;
