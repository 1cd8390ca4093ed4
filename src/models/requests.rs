//! Request DTOs for the restaurant API
//!
//! Defines the structure of incoming HTTP request bodies. Placing an order
//! takes an [`Order`](crate::store::Order) body directly.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::store::{OrderStatus, MAX_TABLES};

/// Request body for `POST /api/orders/update`
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrderRequest {
    pub id: i64,
    pub status: OrderStatus,
}

/// Request body for `POST /api/orders/delete`
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteOrderRequest {
    pub id: i64,
}

/// Request body for `POST /api/tables/update`
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTableRequest {
    pub id: u32,
    /// Fields to merge into the table
    #[serde(default)]
    pub updates: Map<String, Value>,
}

/// Request body for `POST /api/tables/count`
#[derive(Debug, Clone, Deserialize)]
pub struct TableCountRequest {
    #[serde(default = "default_table_count")]
    pub count: u32,
}

fn default_table_count() -> u32 {
    10
}

impl TableCountRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.count == 0 {
            return Some("Table count must be at least 1".to_string());
        }
        if self.count > MAX_TABLES {
            return Some(format!("Table count cannot exceed {}", MAX_TABLES));
        }
        None
    }
}
