use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::common::{created_response, message_response, require, success_response, validate_input};
use crate::services::materials::{MaterialFields, MaterialFilter};
use crate::{errors::ServiceError, AppState};

/// Create payload. Required fields arrive as options so their absence maps
/// to a descriptive 400 rather than a body rejection.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMaterialRequest {
    #[validate(length(min = 1))]
    pub code: Option<String>,
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[serde(default)]
    pub category: String,
    #[validate(length(min = 1))]
    pub unit: Option<String>,
    pub quantity: Option<Decimal>,
    pub price_without_vat: Option<Decimal>,
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub comment: String,
}

/// Update payload: full-row replace of the mutable fields; the code is
/// identity and cannot change.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMaterialRequest {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[serde(default)]
    pub category: String,
    #[validate(length(min = 1))]
    pub unit: Option<String>,
    pub quantity: Option<Decimal>,
    pub price_without_vat: Option<Decimal>,
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub comment: String,
}

/// List materials with optional filtering
#[utoipa::path(
    get,
    path = "/api/materials",
    params(
        ("category" = Option<String>, Query, description = "Exact category match"),
        ("search" = Option<String>, Query, description = "Substring match against code or name"),
    ),
    responses(
        (status = 200, description = "Materials sorted by code", body = Vec<crate::entities::material::Model>),
        (status = 500, description = "Store failure", body = crate::errors::ErrorResponse),
    )
)]
pub async fn list_materials(
    State(state): State<AppState>,
    Query(filter): Query<MaterialFilter>,
) -> Result<Response, ServiceError> {
    let materials = state.services.materials.list_materials(filter).await?;
    Ok(success_response(materials))
}

/// Get single material by ID
#[utoipa::path(
    get,
    path = "/api/materials/{id}",
    params(("id" = i32, Path, description = "Material ID")),
    responses(
        (status = 200, description = "Material", body = crate::entities::material::Model),
        (status = 404, description = "Material not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_material(
    State(state): State<AppState>,
    Path(material_id): Path<i32>,
) -> Result<Response, ServiceError> {
    let material = state
        .services
        .materials
        .get_material(material_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Material not found".to_string()))?;

    Ok(success_response(material))
}

/// Distinct non-empty material categories, sorted
#[utoipa::path(
    get,
    path = "/api/materials/categories",
    responses((status = 200, description = "Category values", body = Vec<String>))
)]
pub async fn list_material_categories(
    State(state): State<AppState>,
) -> Result<Response, ServiceError> {
    let categories = state.services.materials.list_categories().await?;
    Ok(success_response(categories))
}

/// Create new material
#[utoipa::path(
    post,
    path = "/api/materials",
    request_body = CreateMaterialRequest,
    responses(
        (status = 201, description = "Material created"),
        (status = 400, description = "Missing field or duplicate code", body = crate::errors::ErrorResponse),
        (status = 500, description = "Store failure", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_material(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateMaterialRequest>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;

    let code = require(payload.code, "code")?;
    let fields = MaterialFields {
        name: require(payload.name, "name")?,
        category: payload.category,
        unit: require(payload.unit, "unit")?,
        quantity: payload.quantity.unwrap_or(Decimal::ONE),
        price_without_vat: require(payload.price_without_vat, "price_without_vat")?,
        supplier: payload.supplier,
        comment: payload.comment,
    };

    let material_id = state.services.materials.create_material(code, fields).await?;

    Ok(created_response(
        material_id,
        "Material created successfully",
    ))
}

/// Update existing material
#[utoipa::path(
    put,
    path = "/api/materials/{id}",
    params(("id" = i32, Path, description = "Material ID")),
    request_body = UpdateMaterialRequest,
    responses(
        (status = 200, description = "Material updated"),
        (status = 400, description = "Missing field", body = crate::errors::ErrorResponse),
        (status = 404, description = "Material not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_material(
    State(state): State<AppState>,
    Path(material_id): Path<i32>,
    axum::Json(payload): axum::Json<UpdateMaterialRequest>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;

    let fields = MaterialFields {
        name: require(payload.name, "name")?,
        category: payload.category,
        unit: require(payload.unit, "unit")?,
        quantity: payload.quantity.unwrap_or(Decimal::ONE),
        price_without_vat: require(payload.price_without_vat, "price_without_vat")?,
        supplier: payload.supplier,
        comment: payload.comment,
    };

    state
        .services
        .materials
        .update_material(material_id, fields)
        .await?;

    Ok(message_response("Material updated successfully"))
}

/// Delete material
#[utoipa::path(
    delete,
    path = "/api/materials/{id}",
    params(("id" = i32, Path, description = "Material ID")),
    responses(
        (status = 200, description = "Material deleted"),
        (status = 404, description = "Material not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn delete_material(
    State(state): State<AppState>,
    Path(material_id): Path<i32>,
) -> Result<Response, ServiceError> {
    state.services.materials.delete_material(material_id).await?;

    Ok(message_response("Material deleted successfully"))
}
