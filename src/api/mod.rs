//! API Module
//!
//! HTTP handlers, middleware and routing for the restaurant REST API.
//!
//! # Endpoints
//! - `GET /api/orders` / `POST /api/orders` - List or place orders
//! - `POST /api/orders/update` - Change an order's status
//! - `POST /api/orders/delete` - Remove an order
//! - `GET /api/tables` - List tables
//! - `POST /api/tables/update` - Edit a table
//! - `POST /api/tables/count` - Change the number of tables
//! - `GET /api/data` - Whole dataset
//! - `GET /api/health` - Health check endpoint
//! - `GET /api/stats` - Cache statistics and limits

pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use extract::ApiJson;
pub use handlers::*;
pub use middleware::{client_key, rate_limit_middleware, ClientKey};
pub use routes::create_router;
