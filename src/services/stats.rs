use crate::{
    db::DbPool,
    entities::{material, order},
    errors::ServiceError,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

/// Dashboard counters. Four independent counts taken at request time; the
/// values are a snapshot without cross-count isolation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatsResponse {
    pub materials_count: u64,
    pub orders_count: u64,
    pub orders_draft: u64,
    pub orders_production: u64,
}

#[derive(Clone)]
pub struct StatsService {
    db_pool: Arc<DbPool>,
}

impl StatsService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Freshly computed dashboard statistics; never cached.
    #[instrument(skip(self))]
    pub async fn get_stats(&self) -> Result<StatsResponse, ServiceError> {
        let db = &*self.db_pool;

        let materials_count = material::Entity::find()
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let orders_count = order::Entity::find()
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let orders_draft = order::Entity::find()
            .filter(order::Column::Status.eq("draft"))
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let orders_production = order::Entity::find()
            .filter(order::Column::Status.eq("production"))
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(StatsResponse {
            materials_count,
            orders_count,
            orders_draft,
            orders_production,
        })
    }
}
