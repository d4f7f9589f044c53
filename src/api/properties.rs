//! Property API handlers
//!
//! HTTP request handlers for the listing CRUD operations and the approval
//! workflow. Owner identity arrives in the `x-offerer-id` header, set by
//! the upstream authentication layer.

use crate::error::AppError;
use crate::properties::{Property, PropertyPage, PropertyService};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Header carrying the authenticated offerer id
pub const OFFERER_HEADER: &str = "x-offerer-id";

/// Mutation acknowledgment
#[derive(Debug, Serialize)]
pub struct AckResponse {
    /// Human-readable message
    pub message: String,
    /// Status indicator (e.g., "ok")
    pub status: String,
}

impl AckResponse {
    fn ok(message: &str) -> Self {
        Self {
            message: message.to_string(),
            status: "ok".to_string(),
        }
    }
}

/// GET /api/properties - Public filtered listing search
pub async fn list_properties(
    State(service): State<Arc<PropertyService>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<PropertyPage>, AppError> {
    let filters = query_to_params(query);
    let page = service.find_all(&filters).await?;
    Ok(Json(page))
}

/// GET /api/properties/:id - Get one visible property
pub async fn get_property(
    State(service): State<Arc<PropertyService>>,
    Path(id): Path<String>,
) -> Result<Json<Property>, AppError> {
    let property = service.find_by_id(&id).await?;
    Ok(Json(property))
}

/// POST /api/properties - Create a listing for the calling offerer
pub async fn create_property(
    State(service): State<Arc<PropertyService>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Property>), AppError> {
    let offerer = require_offerer(&headers)?;
    let params = body_to_params(body);
    let created = service.insert(&offerer, &params).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/properties/:id - Update an owned listing
pub async fn update_property(
    State(service): State<Arc<PropertyService>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<AckResponse>, AppError> {
    let offerer = require_offerer(&headers)?;
    let params = body_to_params(body);
    service.update(&id, &params, &offerer).await?;
    Ok(Json(AckResponse::ok("Property updated successfully")))
}

/// DELETE /api/properties/:id - Soft-delete an owned listing
pub async fn delete_property(
    State(service): State<Arc<PropertyService>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<AckResponse>, AppError> {
    let offerer = require_offerer(&headers)?;
    service.destroy(&id, &offerer).await?;
    Ok(Json(AckResponse::ok("Property deleted successfully")))
}

/// POST /api/properties/:id/approve - Approve a listing (admin path)
pub async fn approve_property(
    State(service): State<Arc<PropertyService>>,
    Path(id): Path<String>,
) -> Result<Json<AckResponse>, AppError> {
    service.approve(&id).await?;
    Ok(Json(AckResponse::ok("Property approved successfully")))
}

/// GET /api/properties/mine - List the calling offerer's listings
pub async fn list_my_properties(
    State(service): State<Arc<PropertyService>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<PropertyPage>, AppError> {
    // Requiredness of the offerer id is the service's check here
    let offerer = offerer_from_headers(&headers).unwrap_or_default();
    let queries = query_to_params(query);
    let page = service.find_my_properties(&offerer, &queries).await?;
    Ok(Json(page))
}

/// GET /api/properties/pending - List unapproved listings (admin path)
pub async fn list_unapproved_properties(
    State(service): State<Arc<PropertyService>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Json<PropertyPage>, AppError> {
    let queries = query_to_params(query);
    let page = service.find_unapproved_properties(&queries).await?;
    Ok(Json(page))
}

fn offerer_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(OFFERER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
}

fn require_offerer(headers: &HeaderMap) -> Result<String, AppError> {
    offerer_from_headers(headers).ok_or_else(|| AppError::FieldsRequired("offerer".to_string()))
}

/// Convert query-string pairs into the raw parameter mapping the service
/// consumes; values stay strings, coercion happens at bind time
fn query_to_params(query: HashMap<String, String>) -> Map<String, Value> {
    query
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect()
}

/// A non-object body is treated as empty and fails the required-field check
fn body_to_params(body: Value) -> Map<String, Value> {
    match body {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
