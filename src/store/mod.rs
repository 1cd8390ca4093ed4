//! Store Module
//!
//! The restaurant dataset and the crash-safe file store that owns it.

mod durable;
mod state;

pub use durable::{CachedData, DurableStore, ORDERS_KEY, SNAPSHOT_KEY, TABLES_KEY};
pub use state::{Order, OrderStatus, PersistedState, Table, TableStatus, MAX_TABLES};
