//! Request and Response models for the restaurant API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    DeleteOrderRequest, TableCountRequest, UpdateOrderRequest, UpdateTableRequest,
};
pub use responses::{
    CacheStatsResponse, ConnectionSettings, ErrorResponse, HealthResponse, OrderCreatedResponse,
    ServerSettings, StatsResponse, SuccessResponse,
};
