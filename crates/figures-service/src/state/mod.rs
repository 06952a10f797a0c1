//! # State Module
//!
//! Process-local state shared between concurrent orders.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  OrderService (cloned per request)                                      │
//! │       │                                                                 │
//! │       └──► Arc<dyn InventoryStore>                                      │
//! │               ├── InventoryState      Arc<Mutex<HashMap<kind, u32>>>    │
//! │               └── InventoryRepository (figures-db)                      │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • InventoryState: one lock acquisition per batch, never across .await │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod inventory;

pub use inventory::InventoryState;
