//! # figures-service: Order Workflow for the Figures Store
//!
//! Wires the pure core to concrete stores and exposes
//! [`OrderService::place_order`].
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   figures-store (main.rs)                                              │
//! │     • AppConfig::load      (config)                                    │
//! │     • init_tracing         (telemetry)                                 │
//! │     • Database::new        (figures-db)                                │
//! │            │                                                            │
//! │            ▼                                                            │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │             ★ figures-service (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   OrderService ──► FigureFactory, PricingPolicy  (figures-core) │   │
//! │  │        │                                                        │   │
//! │  │        ├──► Arc<dyn InventoryStore>                             │   │
//! │  │        │      InventoryState | InventoryRepository              │   │
//! │  │        └──► Arc<dyn OrderStorage>                               │   │
//! │  │               OrderRepository                                   │   │
//! │  │                                                                 │   │
//! │  │   OrderError ──► ErrorCode ──► { code, message }                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`workflow`] - `OrderService`, stages, compensation
//! - [`state`] - In-process inventory
//! - [`error`] - `OrderError` and error codes
//! - [`config`] - TOML + environment configuration
//! - [`telemetry`] - Tracing subscriber setup

pub mod config;
pub mod error;
pub mod state;
pub mod telemetry;
pub mod workflow;

pub use config::{AppConfig, ConfigError};
pub use error::{ErrorBody, ErrorCode, OrderError, OrderResult};
pub use state::InventoryState;
pub use workflow::{OrderReceipt, OrderService, OrderStage};
