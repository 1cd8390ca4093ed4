//! Persisted Dataset
//!
//! Orders and tables as stored in the data file, plus the mutations the API
//! applies to them. Status fields are open-ended: unknown strings round-trip
//! unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Largest number of tables a dataset may hold.
pub const MAX_TABLES: u32 = 1000;

// == Order Status ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Completed,
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Completed => "completed",
            OrderStatus::Other(other) => other,
        }
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => OrderStatus::Pending,
            "preparing" => OrderStatus::Preparing,
            "completed" => OrderStatus::Completed,
            _ => OrderStatus::Other(value),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Table Status ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TableStatus {
    Available,
    Pending,
    Occupied,
    Other(String),
}

impl TableStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TableStatus::Available => "available",
            TableStatus::Pending => "pending",
            TableStatus::Occupied => "occupied",
            TableStatus::Other(other) => other,
        }
    }
}

impl From<String> for TableStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "available" => TableStatus::Available,
            "pending" => TableStatus::Pending,
            "occupied" => TableStatus::Occupied,
            _ => TableStatus::Other(value),
        }
    }
}

impl From<TableStatus> for String {
    fn from(status: TableStatus) -> Self {
        match status {
            TableStatus::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Order ==
/// A placed order. Fields beyond the ones the server interprets are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Zero means "unassigned"; the store replaces it on insert
    #[serde(default)]
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    /// Items, notes, totals and anything else the client sends
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Order {
    pub fn new(table_id: Option<u32>) -> Self {
        Self {
            id: 0,
            table_id,
            status: None,
            details: Map::new(),
        }
    }
}

// == Table ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: u32,
    pub status: TableStatus,
    #[serde(default)]
    pub current_order: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Table {
    /// A free table with no order attached.
    pub fn available(id: u32) -> Self {
        Self {
            id,
            status: TableStatus::Available,
            current_order: None,
            extra: Map::new(),
        }
    }

    /// Merges `updates` into this table as JSON fields. `id` is never changed.
    pub fn apply_updates(&mut self, updates: &Map<String, Value>) -> serde_json::Result<()> {
        let mut merged = serde_json::to_value(&*self)?;
        if let Value::Object(fields) = &mut merged {
            for (key, value) in updates.iter().filter(|(key, _)| key.as_str() != "id") {
                fields.insert(key.clone(), value.clone());
            }
        }
        *self = serde_json::from_value(merged)?;
        Ok(())
    }
}

// == Persisted State ==
/// The whole dataset: orders newest first, tables with ids `1..=N`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub tables: Vec<Table>,
}

impl PersistedState {
    /// Empty order list and `count` available tables.
    pub fn with_tables(count: u32) -> Self {
        Self {
            orders: Vec::new(),
            tables: (1..=count).map(Table::available).collect(),
        }
    }

    pub fn order(&self, id: i64) -> Option<&Order> {
        self.orders.iter().find(|order| order.id == id)
    }

    pub fn table(&self, id: u32) -> Option<&Table> {
        self.tables.iter().find(|table| table.id == id)
    }

    fn table_mut(&mut self, id: u32) -> Option<&mut Table> {
        self.tables.iter_mut().find(|table| table.id == id)
    }

    // == Place Order ==
    /// Inserts `order` at the front and marks its table pending.
    ///
    /// An order without an id gets the current Unix time in milliseconds,
    /// bumped until it is unique.
    pub fn place_order(&mut self, mut order: Order) -> Order {
        if order.id == 0 {
            let mut id = chrono::Utc::now().timestamp_millis();
            while self.order(id).is_some() {
                id += 1;
            }
            order.id = id;
        }

        if let Some(table) = order.table_id.and_then(|id| self.table_mut(id)) {
            table.status = TableStatus::Pending;
            table.current_order = Some(order.id);
        }

        self.orders.insert(0, order.clone());
        order
    }

    // == Update Order Status ==
    /// Sets the status of order `id` and moves its table along.
    ///
    /// `preparing` occupies the table; `completed` frees it. Returns false if
    /// no such order exists.
    pub fn update_order_status(&mut self, id: i64, status: OrderStatus) -> bool {
        let Some(order) = self.orders.iter_mut().find(|order| order.id == id) else {
            return false;
        };
        order.status = Some(status.clone());
        let table_id = order.table_id;

        if let Some(table) = table_id.and_then(|table_id| self.table_mut(table_id)) {
            match status {
                OrderStatus::Completed => {
                    table.status = TableStatus::Available;
                    table.current_order = None;
                }
                OrderStatus::Preparing => table.status = TableStatus::Occupied,
                _ => {}
            }
        }
        true
    }

    // == Update Table ==
    /// Merges `updates` into table `id`. Returns false if no such table exists.
    pub fn update_table(
        &mut self,
        id: u32,
        updates: &Map<String, Value>,
    ) -> serde_json::Result<bool> {
        match self.table_mut(id) {
            Some(table) => table.apply_updates(updates).map(|_| true),
            None => Ok(false),
        }
    }

    // == Resize Tables ==
    /// Rebuilds the table list as ids `1..=count`, keeping existing tables.
    pub fn resize_tables(&mut self, count: u32) {
        let mut current = std::mem::take(&mut self.tables);
        self.tables = (1..=count)
            .map(|id| match current.iter().position(|table| table.id == id) {
                Some(index) => current.swap_remove(index),
                None => Table::available(id),
            })
            .collect();
    }

    // == Delete Order ==
    /// Removes order `id`. Its table keeps whatever status it had.
    pub fn delete_order(&mut self, id: i64) -> bool {
        let before = self.orders.len();
        self.orders.retain(|order| order.id != id);
        self.orders.len() != before
    }
}
