use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::common::{created_response, message_response, require, success_response, validate_input};
use crate::services::configurations::{ConfigurationFields, ConfigurationFilter, MaterialLineInput};
use crate::services::parse_product_type;
use crate::{errors::ServiceError, AppState};

/// Wire-format filters; `type` mirrors the query parameter name.
#[derive(Debug, Deserialize)]
pub struct ConfigurationListQuery {
    #[serde(rename = "type")]
    pub product_type: Option<String>,
    pub category_id: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateConfigurationRequest {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub product_type: Option<String>,
    pub category_id: Option<i32>,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub materials: Vec<MaterialLineInput>,
}

/// List active configurations with optional type/category filtering
#[utoipa::path(
    get,
    path = "/api/configurations",
    params(
        ("type" = Option<String>, Query, description = "Product type filter: hot_tub or sauna"),
        ("category_id" = Option<i32>, Query, description = "Category filter"),
    ),
    responses(
        (status = 200, description = "Active configurations ordered by category sort order then name",
            body = Vec<crate::services::configurations::ConfigurationResponse>),
    )
)]
pub async fn list_configurations(
    State(state): State<AppState>,
    Query(query): Query<ConfigurationListQuery>,
) -> Result<Response, ServiceError> {
    let filter = ConfigurationFilter {
        product_type: query.product_type,
        category_id: query.category_id,
    };

    let configurations = state
        .services
        .configurations
        .list_configurations(filter)
        .await?;

    Ok(success_response(configurations))
}

/// Get configuration with materials
#[utoipa::path(
    get,
    path = "/api/configurations/{id}",
    params(("id" = i32, Path, description = "Configuration ID")),
    responses(
        (status = 200, description = "Configuration with its material lines",
            body = crate::services::configurations::ConfigurationDetail),
        (status = 404, description = "Configuration not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_configuration(
    State(state): State<AppState>,
    Path(configuration_id): Path<i32>,
) -> Result<Response, ServiceError> {
    let configuration = state
        .services
        .configurations
        .get_configuration(configuration_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Configuration not found".to_string()))?;

    Ok(success_response(configuration))
}

/// Configuration categories in display order
#[utoipa::path(
    get,
    path = "/api/configurations/categories",
    responses((status = 200, description = "Categories ordered by sort order",
        body = Vec<crate::entities::configuration_category::Model>))
)]
pub async fn list_configuration_categories(
    State(state): State<AppState>,
) -> Result<Response, ServiceError> {
    let categories = state.services.configurations.list_categories().await?;
    Ok(success_response(categories))
}

/// Create configuration with optional material lines
#[utoipa::path(
    post,
    path = "/api/configurations",
    request_body = CreateConfigurationRequest,
    responses(
        (status = 201, description = "Configuration created"),
        (status = 400, description = "Missing field or unknown product type", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_configuration(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateConfigurationRequest>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;

    let fields = configuration_fields(payload)?;

    let configuration_id = state
        .services
        .configurations
        .create_configuration(fields)
        .await?;

    Ok(created_response(
        configuration_id,
        "Configuration created successfully",
    ))
}

/// Update configuration, replacing its material lines
#[utoipa::path(
    put,
    path = "/api/configurations/{id}",
    params(("id" = i32, Path, description = "Configuration ID")),
    request_body = CreateConfigurationRequest,
    responses(
        (status = 200, description = "Configuration updated"),
        (status = 404, description = "Configuration not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_configuration(
    State(state): State<AppState>,
    Path(configuration_id): Path<i32>,
    axum::Json(payload): axum::Json<CreateConfigurationRequest>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;

    let fields = configuration_fields(payload)?;

    state
        .services
        .configurations
        .update_configuration(configuration_id, fields)
        .await?;

    Ok(message_response("Configuration updated successfully"))
}

/// Delete configuration
#[utoipa::path(
    delete,
    path = "/api/configurations/{id}",
    params(("id" = i32, Path, description = "Configuration ID")),
    responses(
        (status = 200, description = "Configuration deleted"),
        (status = 404, description = "Configuration not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn delete_configuration(
    State(state): State<AppState>,
    Path(configuration_id): Path<i32>,
) -> Result<Response, ServiceError> {
    state
        .services
        .configurations
        .delete_configuration(configuration_id)
        .await?;

    Ok(message_response("Configuration deleted successfully"))
}

fn configuration_fields(
    payload: CreateConfigurationRequest,
) -> Result<ConfigurationFields, ServiceError> {
    let product_type = require(payload.product_type, "product_type")?;
    parse_product_type(&product_type)?;

    Ok(ConfigurationFields {
        name: require(payload.name, "name")?,
        product_type,
        category_id: payload.category_id,
        is_active: payload.is_active.unwrap_or(true),
        materials: payload.materials,
    })
}
