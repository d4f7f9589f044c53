//! API module
//!
//! Contains HTTP request handlers for the property endpoints and the
//! router wiring shared by the binary and the integration tests.

pub mod properties;

use crate::properties::PropertyService;
use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Hello response for the root route
#[derive(Serialize)]
pub struct HelloResponse {
    /// Human-readable message
    pub message: String,
    /// Status indicator
    pub status: String,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Health status
    pub status: String,
    /// Crate version
    pub version: String,
}

/// Build the application router over the property service
pub fn router(service: Arc<PropertyService>) -> Router {
    Router::new()
        .route("/", get(hello_world))
        .route("/api/health", get(health_check))
        // Property listing API
        .route(
            "/api/properties",
            get(properties::list_properties).post(properties::create_property),
        )
        .route("/api/properties/mine", get(properties::list_my_properties))
        .route(
            "/api/properties/pending",
            get(properties::list_unapproved_properties),
        )
        .route(
            "/api/properties/:id",
            get(properties::get_property)
                .put(properties::update_property)
                .delete(properties::delete_property),
        )
        .route(
            "/api/properties/:id/approve",
            post(properties::approve_property),
        )
        .with_state(service)
}

async fn hello_world() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Hello world from the property listings backend".to_string(),
        status: "ok".to_string(),
    })
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
