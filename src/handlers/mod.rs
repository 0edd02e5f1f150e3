use std::sync::Arc;

use crate::db::DbPool;
use crate::services::{
    configurations::ConfigurationService, materials::MaterialService, orders::OrderService,
    stats::StatsService,
};

pub mod common;
pub mod configurations;
pub mod health;
pub mod materials;
pub mod orders;
pub mod stats;

/// Aggregate of the services used by HTTP handlers, all sharing one
/// connection pool.
#[derive(Clone)]
pub struct AppServices {
    pub materials: Arc<MaterialService>,
    pub configurations: Arc<ConfigurationService>,
    pub orders: Arc<OrderService>,
    pub stats: Arc<StatsService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            materials: Arc::new(MaterialService::new(db_pool.clone())),
            configurations: Arc::new(ConfigurationService::new(db_pool.clone())),
            orders: Arc::new(OrderService::new(db_pool.clone())),
            stats: Arc::new(StatsService::new(db_pool)),
        }
    }
}
