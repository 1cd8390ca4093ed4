//! Request Extractors
//!
//! JSON body extractor whose rejections use the API's `{"error": ...}` body.

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
};

use crate::error::ServerError;

/// Like [`axum::Json`], but rejections are answered with a JSON error body.
///
/// Oversized bodies stay 413; a missing content type, malformed JSON or a body
/// of the wrong shape become 400.
#[derive(Debug, Clone, FromRequest)]
#[from_request(via(axum::Json), rejection(ServerError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ServerError::PayloadTooLarge(rejection.body_text())
        } else {
            ServerError::InvalidRequest(rejection.body_text())
        }
    }
}
