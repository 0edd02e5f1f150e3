use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::common::{created_response, message_response, require, success_response, validate_input};
use crate::services::orders::{OrderFields, OrderFilter, OrderItemFields};
use crate::services::parse_product_type;
use crate::{errors::ServiceError, AppState};

/// Wire-format filters; `type` mirrors the query parameter name.
#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub product_type: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1))]
    pub order_number: Option<String>,
    #[serde(default)]
    pub client_order_number: String,
    /// Defaults to today when absent.
    pub order_date: Option<NaiveDate>,
    pub country: Option<String>,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_address: String,
    pub product_type: Option<String>,
    pub status: Option<String>,
}

/// Update payload: full-row replace of the header fields. The order number
/// is identity and the totals are derived, so neither appears here.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderRequest {
    #[serde(default)]
    pub client_order_number: String,
    pub order_date: Option<NaiveDate>,
    pub country: Option<String>,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_address: String,
    pub product_type: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct OrderItemRequest {
    #[validate(length(min = 1))]
    pub item_type: Option<String>,
    pub configuration_id: Option<i32>,
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[serde(default)]
    pub name_production: String,
    pub quantity: Option<Decimal>,
    pub material_cost: Option<Decimal>,
    pub labor_cost: Option<Decimal>,
    pub labor_hours: Option<Decimal>,
    pub total_cost: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub total_price: Option<Decimal>,
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub comment: String,
}

/// List orders with optional status/type filtering
#[utoipa::path(
    get,
    path = "/api/orders",
    params(
        ("status" = Option<String>, Query, description = "Status filter, e.g. draft or production"),
        ("type" = Option<String>, Query, description = "Product type filter: hot_tub or sauna"),
    ),
    responses(
        (status = 200, description = "Orders, newest first", body = Vec<crate::entities::order::Model>),
    )
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> Result<Response, ServiceError> {
    let filter = OrderFilter {
        status: query.status,
        product_type: query.product_type,
    };

    let orders = state.services.orders.list_orders(filter).await?;

    Ok(success_response(orders))
}

/// Get order with all items
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with items", body = crate::services::orders::OrderDetail),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
) -> Result<Response, ServiceError> {
    let order = state
        .services
        .orders
        .get_order(order_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))?;

    Ok(success_response(order))
}

/// Create new order
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created"),
        (status = 400, description = "Missing field or duplicate order number", body = crate::errors::ErrorResponse),
    )
)]
pub async fn create_order(
    State(state): State<AppState>,
    axum::Json(payload): axum::Json<CreateOrderRequest>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;

    let order_number = require(payload.order_number, "order_number")?;
    let product_type = require(payload.product_type, "product_type")?;
    parse_product_type(&product_type)?;

    let fields = OrderFields {
        client_order_number: payload.client_order_number,
        order_date: payload.order_date.unwrap_or_else(|| Utc::now().date_naive()),
        country: payload.country.unwrap_or_else(|| "LT".to_string()),
        customer_name: payload.customer_name,
        customer_address: payload.customer_address,
        product_type,
        status: payload.status.unwrap_or_else(|| "draft".to_string()),
    };

    let order_id = state.services.orders.create_order(order_number, fields).await?;

    Ok(created_response(order_id, "Order created successfully"))
}

/// Update order header fields
#[utoipa::path(
    put,
    path = "/api/orders/{id}",
    params(("id" = i32, Path, description = "Order ID")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated"),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_order(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
    axum::Json(payload): axum::Json<UpdateOrderRequest>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;

    let product_type = require(payload.product_type, "product_type")?;
    parse_product_type(&product_type)?;

    let fields = OrderFields {
        client_order_number: payload.client_order_number,
        order_date: payload.order_date.unwrap_or_else(|| Utc::now().date_naive()),
        country: payload.country.unwrap_or_else(|| "LT".to_string()),
        customer_name: payload.customer_name,
        customer_address: payload.customer_address,
        product_type,
        status: payload.status.unwrap_or_else(|| "draft".to_string()),
    };

    state.services.orders.update_order(order_id, fields).await?;

    Ok(message_response("Order updated successfully"))
}

/// Delete order and its items
#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    params(("id" = i32, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order deleted"),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
) -> Result<Response, ServiceError> {
    state.services.orders.delete_order(order_id).await?;

    Ok(message_response("Order deleted successfully"))
}

/// Add item to order, recalculating the order totals
#[utoipa::path(
    post,
    path = "/api/orders/{id}/items",
    params(("id" = i32, Path, description = "Order ID")),
    request_body = OrderItemRequest,
    responses(
        (status = 201, description = "Item added and totals recalculated"),
        (status = 400, description = "Missing field", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    )
)]
pub async fn add_order_item(
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
    axum::Json(payload): axum::Json<OrderItemRequest>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;

    let fields = order_item_fields(payload)?;

    let item_id = state.services.orders.add_order_item(order_id, fields).await?;

    Ok(created_response(item_id, "Item added successfully"))
}

/// Replace an item, recalculating the order totals
#[utoipa::path(
    put,
    path = "/api/orders/{id}/items/{item_id}",
    params(
        ("id" = i32, Path, description = "Order ID"),
        ("item_id" = i32, Path, description = "Item ID"),
    ),
    request_body = OrderItemRequest,
    responses(
        (status = 200, description = "Item updated and totals recalculated"),
        (status = 404, description = "Item not found under this order", body = crate::errors::ErrorResponse),
    )
)]
pub async fn update_order_item(
    State(state): State<AppState>,
    Path((order_id, item_id)): Path<(i32, i32)>,
    axum::Json(payload): axum::Json<OrderItemRequest>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;

    let fields = order_item_fields(payload)?;

    state
        .services
        .orders
        .update_order_item(order_id, item_id, fields)
        .await?;

    Ok(message_response("Item updated successfully"))
}

/// Remove an item, recalculating the order totals
#[utoipa::path(
    delete,
    path = "/api/orders/{id}/items/{item_id}",
    params(
        ("id" = i32, Path, description = "Order ID"),
        ("item_id" = i32, Path, description = "Item ID"),
    ),
    responses(
        (status = 200, description = "Item deleted and totals recalculated"),
        (status = 404, description = "Item not found under this order", body = crate::errors::ErrorResponse),
    )
)]
pub async fn delete_order_item(
    State(state): State<AppState>,
    Path((order_id, item_id)): Path<(i32, i32)>,
) -> Result<Response, ServiceError> {
    state
        .services
        .orders
        .delete_order_item(order_id, item_id)
        .await?;

    Ok(message_response("Item deleted successfully"))
}

fn order_item_fields(payload: OrderItemRequest) -> Result<OrderItemFields, ServiceError> {
    Ok(OrderItemFields {
        item_type: require(payload.item_type, "item_type")?,
        configuration_id: payload.configuration_id,
        name: require(payload.name, "name")?,
        name_production: payload.name_production,
        quantity: payload.quantity.unwrap_or(Decimal::ONE),
        material_cost: payload.material_cost.unwrap_or(Decimal::ZERO),
        labor_cost: payload.labor_cost.unwrap_or(Decimal::ZERO),
        labor_hours: payload.labor_hours.unwrap_or(Decimal::ZERO),
        total_cost: payload.total_cost.unwrap_or(Decimal::ZERO),
        unit_price: payload.unit_price.unwrap_or(Decimal::ZERO),
        total_price: payload.total_price.unwrap_or(Decimal::ZERO),
        sort_order: payload.sort_order.unwrap_or(0),
        comment: payload.comment,
    })
}
