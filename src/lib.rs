//! Wild ERP API Library
//!
//! This crate provides the backend for a small manufacturing ERP:
//! materials, product configurations, customer orders and their line
//! items, with derived order totals kept consistent on every item change.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod openapi;
pub mod services;

use axum::routing::{get, post, put};
use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn material_service(&self) -> Arc<services::materials::MaterialService> {
        self.services.materials.clone()
    }

    pub fn configuration_service(&self) -> Arc<services::configurations::ConfigurationService> {
        self.services.configurations.clone()
    }

    pub fn order_service(&self) -> Arc<services::orders::OrderService> {
        self.services.orders.clone()
    }

    pub fn stats_service(&self) -> Arc<services::stats::StatsService> {
        self.services.stats.clone()
    }
}

/// All HTTP routes under the `/api` prefix.
///
/// Static path segments (`/categories`) are registered alongside their
/// parameterized siblings (`/:id`); axum matches the literal first.
pub fn api_routes() -> Router<AppState> {
    let materials = Router::new()
        .route(
            "/materials",
            get(handlers::materials::list_materials).post(handlers::materials::create_material),
        )
        .route(
            "/materials/categories",
            get(handlers::materials::list_material_categories),
        )
        .route(
            "/materials/:id",
            get(handlers::materials::get_material)
                .put(handlers::materials::update_material)
                .delete(handlers::materials::delete_material),
        );

    let configurations = Router::new()
        .route(
            "/configurations",
            get(handlers::configurations::list_configurations)
                .post(handlers::configurations::create_configuration),
        )
        .route(
            "/configurations/categories",
            get(handlers::configurations::list_configuration_categories),
        )
        .route(
            "/configurations/:id",
            get(handlers::configurations::get_configuration)
                .put(handlers::configurations::update_configuration)
                .delete(handlers::configurations::delete_configuration),
        );

    let orders = Router::new()
        .route(
            "/orders",
            get(handlers::orders::list_orders).post(handlers::orders::create_order),
        )
        .route(
            "/orders/:id",
            get(handlers::orders::get_order)
                .put(handlers::orders::update_order)
                .delete(handlers::orders::delete_order),
        )
        .route("/orders/:id/items", post(handlers::orders::add_order_item))
        .route(
            "/orders/:id/items/:item_id",
            put(handlers::orders::update_order_item).delete(handlers::orders::delete_order_item),
        );

    Router::new()
        .merge(materials)
        .merge(configurations)
        .merge(orders)
        .route("/stats", get(handlers::stats::get_stats))
        .route("/health", get(handlers::health::health))
}
