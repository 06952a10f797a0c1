//! # Repository Module
//!
//! SQLite implementations of the figures-core ports.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  OrderService                                                           │
//! │       │                                                                 │
//! │       │  inventory.check_and_reserve(&items)                            │
//! │       ▼                                                                 │
//! │  InventoryRepository  (impl InventoryStore)                            │
//! │  ├── check_and_reserve  one transaction, conditional UPDATE per item    │
//! │  ├── release            one transaction, upsert per item                │
//! │  ├── restock / set_level                                                │
//! │  └── available / levels                                                 │
//! │                                                                         │
//! │  OrderRepository      (impl OrderStorage)                              │
//! │  ├── save               order + lines in one transaction                │
//! │  ├── get_by_id                                                          │
//! │  └── count                                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod inventory;
pub mod order;
