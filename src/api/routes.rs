//! API Routes
//!
//! Configures the Axum router with the restaurant endpoints and static files.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{
    compression::{
        predicate::{DefaultPredicate, Predicate, SizeAbove},
        CompressionLayer,
    },
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use super::handlers::{
    create_order_handler, data_handler, delete_order_handler, health_handler, orders_handler,
    stats_handler, table_count_handler, tables_handler, update_order_handler,
    update_table_handler, AppState,
};
use super::middleware::rate_limit_middleware;

/// Responses smaller than this are sent uncompressed.
pub const GZIP_MIN_SIZE: u16 = 1024;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/orders`, `GET /api/tables`, `GET /api/data` - Read the dataset
/// - `POST /api/orders` - Place an order
/// - `POST /api/orders/update`, `POST /api/orders/delete` - Change or remove an order
/// - `POST /api/tables/update`, `POST /api/tables/count` - Edit tables
/// - `GET /api/health`, `GET /api/stats` - Introspection
/// - anything else - Static files from the configured directory
///
/// # Middleware (outermost first)
/// - Tracing: Logs all requests
/// - CORS: Allows any origin, method and header
/// - Concurrency limit: At most `max_workers` requests in flight; the rest wait
/// - Compression: gzip when the client accepts it and the body is at least 1 KiB
/// - Body limit: Rejects bodies over `max_body_size` with 413
/// - Rate limit: Per-client sliding window, 429 when exceeded
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let config = state.config.clone();

    Router::new()
        .route("/api/orders", get(orders_handler).post(create_order_handler))
        .route("/api/orders/update", post(update_order_handler))
        .route("/api/orders/delete", post(delete_order_handler))
        .route("/api/tables", get(tables_handler))
        .route("/api/tables/update", post(update_table_handler))
        .route("/api/tables/count", post(table_count_handler))
        .route("/api/data", get(data_handler))
        .route("/api/health", get(health_handler))
        .route("/api/stats", get(stats_handler))
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(DefaultBodyLimit::max(config.max_body_size))
        .layer(
            CompressionLayer::new()
                .compress_when(DefaultPredicate::new().and(SizeAbove::new(GZIP_MIN_SIZE))),
        )
        .layer(GlobalConcurrencyLimitLayer::new(config.max_workers.max(1)))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
