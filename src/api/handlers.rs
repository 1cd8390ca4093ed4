//! API Handlers
//!
//! HTTP request handlers for the restaurant endpoints. Store operations may
//! touch the disk, so they run on the blocking thread pool.

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, Extension, Json};
use tracing::info;

use super::extract::ApiJson;
use super::middleware::ClientKey;
use crate::cache::Cache;
use crate::config::Config;
use crate::error::{Result, ServerError};
use crate::limiter::RateLimiter;
use crate::models::{
    DeleteOrderRequest, HealthResponse, OrderCreatedResponse, StatsResponse, SuccessResponse,
    TableCountRequest, UpdateOrderRequest, UpdateTableRequest,
};
use crate::store::{CachedData, DurableStore, Order, PersistedState, Table};

/// Application state shared across all handlers.
///
/// Built once at startup; every field is a shared handle.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<Cache<CachedData>>,
    pub limiter: Arc<RateLimiter>,
    pub store: Arc<DurableStore>,
    pub config: Arc<Config>,
    pub started_at: Instant,
}

impl AppState {
    /// Creates the cache, rate limiter and store described by `config`.
    pub fn from_config(config: Config) -> Self {
        let cache = Arc::new(Cache::from_config(&config));
        let limiter = Arc::new(RateLimiter::from_config(&config));
        let store = Arc::new(DurableStore::from_config(&config, Arc::clone(&cache)));
        Self {
            cache,
            limiter,
            store,
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }
}

/// Runs a store operation on the blocking pool.
async fn with_store<T, F>(state: &AppState, op: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&DurableStore) -> Result<T> + Send + 'static,
{
    let store = Arc::clone(&state.store);
    tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|e| ServerError::Internal(format!("Store task failed: {}", e)))?
}

/// Handler for GET /api/orders
pub async fn orders_handler(State(state): State<AppState>) -> Result<Json<Arc<Vec<Order>>>> {
    let orders = with_store(&state, |store| Ok(store.orders())).await?;
    Ok(Json(orders))
}

/// Handler for GET /api/tables
pub async fn tables_handler(State(state): State<AppState>) -> Result<Json<Arc<Vec<Table>>>> {
    let tables = with_store(&state, |store| Ok(store.tables())).await?;
    Ok(Json(tables))
}

/// Handler for GET /api/data
pub async fn data_handler(State(state): State<AppState>) -> Result<Json<Arc<PersistedState>>> {
    let data = with_store(&state, |store| Ok(store.load())).await?;
    Ok(Json(data))
}

/// Handler for POST /api/orders
///
/// Stores the order and marks its table pending.
pub async fn create_order_handler(
    State(state): State<AppState>,
    ApiJson(order): ApiJson<Order>,
) -> Result<Json<OrderCreatedResponse>> {
    let order = with_store(&state, move |store| {
        store.write(|data| Ok(data.place_order(order)))
    })
    .await?;

    info!(order_id = order.id, table_id = ?order.table_id, "Order placed");
    Ok(Json(OrderCreatedResponse::new(order)))
}

/// Handler for POST /api/orders/update
pub async fn update_order_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UpdateOrderRequest>,
) -> Result<Json<SuccessResponse>> {
    let UpdateOrderRequest { id, status } = req;
    let label = status.to_string();

    with_store(&state, move |store| {
        store.write(|data| {
            if data.update_order_status(id, status) {
                Ok(())
            } else {
                Err(ServerError::NotFound(format!("Order {}", id)))
            }
        })
    })
    .await?;

    info!(order_id = id, status = %label, "Order status updated");
    Ok(Json(SuccessResponse::ok()))
}

/// Handler for POST /api/orders/delete
pub async fn delete_order_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<DeleteOrderRequest>,
) -> Result<Json<SuccessResponse>> {
    let id = req.id;
    with_store(&state, move |store| {
        store.write(|data| {
            if data.delete_order(id) {
                Ok(())
            } else {
                Err(ServerError::NotFound(format!("Order {}", id)))
            }
        })
    })
    .await?;

    info!(order_id = id, "Order deleted");
    Ok(Json(SuccessResponse::ok()))
}

/// Handler for POST /api/tables/update
///
/// Merges arbitrary fields into one table.
pub async fn update_table_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UpdateTableRequest>,
) -> Result<Json<SuccessResponse>> {
    let UpdateTableRequest { id, updates } = req;
    with_store(&state, move |store| {
        store.write(|data| match data.update_table(id, &updates) {
            Ok(true) => Ok(()),
            Ok(false) => Err(ServerError::NotFound(format!("Table {}", id))),
            Err(e) => Err(ServerError::InvalidRequest(format!(
                "Invalid table update: {}",
                e
            ))),
        })
    })
    .await?;

    Ok(Json(SuccessResponse::ok()))
}

/// Handler for POST /api/tables/count
pub async fn table_count_handler(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TableCountRequest>,
) -> Result<Json<SuccessResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ServerError::InvalidRequest(error_msg));
    }

    let count = req.count;
    with_store(&state, move |store| {
        store.write(|data| {
            data.resize_tables(count);
            Ok(())
        })
    })
    .await?;

    info!(count, "Table count changed");
    Ok(Json(SuccessResponse::ok()))
}

/// Handler for GET /api/health
pub async fn health_handler(
    State(state): State<AppState>,
    Extension(client): Extension<ClientKey>,
) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(
        &state.config,
        state.started_at.elapsed().as_secs(),
        state.limiter.remaining(&client.0),
        state.cache.stats(),
    ))
}

/// Handler for GET /api/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(
        &state.config,
        state.cache.stats(),
        state.limiter.tracked_clients(),
    ))
}
