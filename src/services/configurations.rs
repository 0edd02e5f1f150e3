use crate::{
    db::DbPool,
    entities::{
        configuration::{
            self, ActiveModel as ConfigurationActiveModel, Entity as ConfigurationEntity,
        },
        configuration_category::{self, Entity as CategoryEntity},
        configuration_material::{
            self, ActiveModel as ConfigurationMaterialActiveModel,
            Entity as ConfigurationMaterialEntity,
        },
        material,
    },
    errors::ServiceError,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, Order, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

/// Optional filters for the configuration listing.
#[derive(Debug, Default)]
pub struct ConfigurationFilter {
    pub product_type: Option<String>,
    pub category_id: Option<i32>,
}

/// A configuration row enriched with its category name for display.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConfigurationResponse {
    #[serde(flatten)]
    pub configuration: configuration::Model,
    pub category_name: Option<String>,
}

/// A configuration with its bill-of-materials lines.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConfigurationDetail {
    #[serde(flatten)]
    pub configuration: configuration::Model,
    pub category_name: Option<String>,
    pub materials: Vec<ConfigurationMaterialLine>,
}

/// A bill-of-materials line enriched with the material's code/name/unit.
#[derive(Debug, Serialize, ToSchema)]
pub struct ConfigurationMaterialLine {
    pub id: i32,
    pub configuration_id: i32,
    pub material_id: i32,
    pub quantity: Decimal,
    pub code: String,
    pub material_name: String,
    pub unit: String,
}

/// One entry of the material list supplied on create/update.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MaterialLineInput {
    pub material_id: i32,
    pub quantity: Decimal,
}

/// Field set shared by configuration create and update.
#[derive(Debug)]
pub struct ConfigurationFields {
    pub name: String,
    pub product_type: String,
    pub category_id: Option<i32>,
    pub is_active: bool,
    pub materials: Vec<MaterialLineInput>,
}

/// Service for managing bill-of-materials templates.
#[derive(Clone)]
pub struct ConfigurationService {
    db_pool: Arc<DbPool>,
}

impl ConfigurationService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Lists active configurations with their category names, ordered by
    /// category sort order then name.
    #[instrument(skip(self))]
    pub async fn list_configurations(
        &self,
        filter: ConfigurationFilter,
    ) -> Result<Vec<ConfigurationResponse>, ServiceError> {
        let db = &*self.db_pool;

        let mut query = ConfigurationEntity::find()
            .filter(configuration::Column::IsActive.eq(true))
            .find_also_related(CategoryEntity);

        if let Some(product_type) = &filter.product_type {
            query = query.filter(configuration::Column::ProductType.eq(product_type.clone()));
        }

        if let Some(category_id) = filter.category_id {
            query = query.filter(configuration::Column::CategoryId.eq(category_id));
        }

        let rows = query
            .order_by(configuration_category::Column::SortOrder, Order::Asc)
            .order_by(configuration::Column::Name, Order::Asc)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(rows
            .into_iter()
            .map(|(configuration, category)| ConfigurationResponse {
                configuration,
                category_name: category.map(|c| c.name),
            })
            .collect())
    }

    /// Retrieves a configuration with its material lines.
    #[instrument(skip(self), fields(configuration_id = %configuration_id))]
    pub async fn get_configuration(
        &self,
        configuration_id: i32,
    ) -> Result<Option<ConfigurationDetail>, ServiceError> {
        let db = &*self.db_pool;

        let found = ConfigurationEntity::find_by_id(configuration_id)
            .find_also_related(CategoryEntity)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let Some((configuration, category)) = found else {
            return Ok(None);
        };

        let materials = ConfigurationMaterialEntity::find()
            .filter(configuration_material::Column::ConfigurationId.eq(configuration_id))
            .find_also_related(material::Entity)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .into_iter()
            .filter_map(|(line, material)| {
                // A line whose material vanished carries no display data;
                // the FK cascade makes this unreachable in practice.
                material.map(|m| ConfigurationMaterialLine {
                    id: line.id,
                    configuration_id: line.configuration_id,
                    material_id: line.material_id,
                    quantity: line.quantity,
                    code: m.code,
                    material_name: m.name,
                    unit: m.unit,
                })
            })
            .collect();

        Ok(Some(ConfigurationDetail {
            configuration,
            category_name: category.map(|c| c.name),
            materials,
        }))
    }

    /// Categories ordered for display.
    #[instrument(skip(self))]
    pub async fn list_categories(
        &self,
    ) -> Result<Vec<configuration_category::Model>, ServiceError> {
        let db = &*self.db_pool;

        CategoryEntity::find()
            .order_by_asc(configuration_category::Column::SortOrder)
            .order_by_asc(configuration_category::Column::Name)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Creates a configuration together with its material lines.
    #[instrument(skip(self, fields), fields(name = %fields.name))]
    pub async fn create_configuration(
        &self,
        fields: ConfigurationFields,
    ) -> Result<i32, ServiceError> {
        let db = &*self.db_pool;

        let txn = db.begin().await.map_err(ServiceError::DatabaseError)?;

        let active_model = ConfigurationActiveModel {
            name: Set(fields.name),
            product_type: Set(fields.product_type),
            category_id: Set(fields.category_id),
            is_active: Set(fields.is_active),
            ..Default::default()
        };

        let model = active_model
            .insert(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        insert_material_lines(&txn, model.id, &fields.materials).await?;

        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        info!(configuration_id = model.id, "Configuration created");

        Ok(model.id)
    }

    /// Full-row replace of a configuration, including a replace-all of its
    /// material lines.
    #[instrument(skip(self, fields), fields(configuration_id = %configuration_id))]
    pub async fn update_configuration(
        &self,
        configuration_id: i32,
        fields: ConfigurationFields,
    ) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let txn = db.begin().await.map_err(ServiceError::DatabaseError)?;

        let existing = ConfigurationEntity::find_by_id(configuration_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                warn!(
                    configuration_id = configuration_id,
                    "Configuration not found for update"
                );
                ServiceError::NotFound("Configuration not found".to_string())
            })?;

        let mut active_model: ConfigurationActiveModel = existing.into();
        active_model.name = Set(fields.name);
        active_model.product_type = Set(fields.product_type);
        active_model.category_id = Set(fields.category_id);
        active_model.is_active = Set(fields.is_active);
        active_model.updated_at = Set(Utc::now());

        active_model
            .update(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        ConfigurationMaterialEntity::delete_many()
            .filter(configuration_material::Column::ConfigurationId.eq(configuration_id))
            .exec(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        insert_material_lines(&txn, configuration_id, &fields.materials).await?;

        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        info!(configuration_id = configuration_id, "Configuration updated");

        Ok(())
    }

    /// Deletes a configuration; its material lines go with it.
    #[instrument(skip(self), fields(configuration_id = %configuration_id))]
    pub async fn delete_configuration(&self, configuration_id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let result = ConfigurationEntity::delete_by_id(configuration_id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if result.rows_affected == 0 {
            warn!(
                configuration_id = configuration_id,
                "Configuration not found for delete"
            );
            return Err(ServiceError::NotFound(
                "Configuration not found".to_string(),
            ));
        }

        info!(configuration_id = configuration_id, "Configuration deleted");

        Ok(())
    }
}

async fn insert_material_lines<C: sea_orm::ConnectionTrait>(
    conn: &C,
    configuration_id: i32,
    lines: &[MaterialLineInput],
) -> Result<(), ServiceError> {
    for line in lines {
        let active_model = ConfigurationMaterialActiveModel {
            configuration_id: Set(configuration_id),
            material_id: Set(line.material_id),
            quantity: Set(line.quantity),
            ..Default::default()
        };
        active_model
            .insert(conn)
            .await
            .map_err(ServiceError::DatabaseError)?;
    }

    Ok(())
}
