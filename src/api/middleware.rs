//! Rate Limiting Middleware
//!
//! Admits or rejects every request before any handler work happens.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use super::handlers::AppState;
use crate::error::ServerError;

const X_RATELIMIT_LIMIT: &str = "x-ratelimit-limit";
const X_RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Identity the rate limiter counts requests against.
///
/// Inserted into request extensions for handlers that report quota.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientKey(pub String);

/// Derives the client key: first `X-Forwarded-For` hop, then the peer address.
pub fn client_key(request: &Request) -> ClientKey {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|first| !first.is_empty());

    if let Some(first) = forwarded {
        return ClientKey(first.to_string());
    }

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());

    ClientKey(peer.unwrap_or_else(|| "unknown".to_string()))
}

/// Rejects requests over the client's quota with 429 and a `Retry-After` header.
///
/// Every response, admitted or not, carries `x-ratelimit-limit` and
/// `x-ratelimit-remaining`.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let client = client_key(&request);
    let limit = state.limiter.max_requests();

    if !state.limiter.is_allowed(&client.0) {
        let retry_after = state.limiter.retry_after_secs(&client.0);
        warn!(client = %client.0, retry_after, "Rate limit exceeded");
        let mut response = ServerError::RateLimited { retry_after }.into_response();
        insert_quota_headers(&mut response, limit, 0);
        return response;
    }

    let remaining = state.limiter.remaining(&client.0);
    request.extensions_mut().insert(client);

    let mut response = next.run(request).await;
    insert_quota_headers(&mut response, limit, remaining);
    response
}

fn insert_quota_headers(response: &mut Response, limit: usize, remaining: usize) {
    let headers = response.headers_mut();
    headers.insert(
        HeaderName::from_static(X_RATELIMIT_LIMIT),
        HeaderValue::from(limit),
    );
    headers.insert(
        HeaderName::from_static(X_RATELIMIT_REMAINING),
        HeaderValue::from(remaining),
    );
}
