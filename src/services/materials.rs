use crate::{
    db::DbPool,
    entities::material::{self, Entity as MaterialEntity, ActiveModel as MaterialActiveModel},
    errors::ServiceError,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Optional filters for the material listing.
#[derive(Debug, Default, Deserialize)]
pub struct MaterialFilter {
    pub category: Option<String>,
    pub search: Option<String>,
}

/// Field set shared by create and update. Updates are full-row replaces:
/// every mutable field is written, absent optionals fall back to defaults.
#[derive(Debug)]
pub struct MaterialFields {
    pub name: String,
    pub category: String,
    pub unit: String,
    pub quantity: Decimal,
    pub price_without_vat: Decimal,
    pub supplier: String,
    pub comment: String,
}

/// Service for managing the materials catalog.
#[derive(Clone)]
pub struct MaterialService {
    db_pool: Arc<DbPool>,
}

impl MaterialService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Lists materials with optional category/search filters, sorted by code.
    ///
    /// The search term matches code OR name as a substring; case behavior
    /// follows the store collation (SQLite LIKE is ASCII case-insensitive).
    #[instrument(skip(self))]
    pub async fn list_materials(
        &self,
        filter: MaterialFilter,
    ) -> Result<Vec<material::Model>, ServiceError> {
        let db = &*self.db_pool;

        let mut query = MaterialEntity::find();

        if let Some(category) = &filter.category {
            query = query.filter(material::Column::Category.eq(category.clone()));
        }

        if let Some(search) = &filter.search {
            query = query.filter(
                Condition::any()
                    .add(material::Column::Code.contains(search))
                    .add(material::Column::Name.contains(search)),
            );
        }

        let materials = query
            .order_by_asc(material::Column::Code)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(materials)
    }

    /// Retrieves a material by ID.
    #[instrument(skip(self), fields(material_id = %material_id))]
    pub async fn get_material(
        &self,
        material_id: i32,
    ) -> Result<Option<material::Model>, ServiceError> {
        let db = &*self.db_pool;

        MaterialEntity::find_by_id(material_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Distinct non-empty category values, sorted.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<String>, ServiceError> {
        let db = &*self.db_pool;

        let categories: Vec<String> = MaterialEntity::find()
            .select_only()
            .column(material::Column::Category)
            .filter(material::Column::Category.ne(""))
            .distinct()
            .order_by_asc(material::Column::Category)
            .into_tuple()
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(categories)
    }

    /// Creates a material and returns its assigned id. A duplicate code is
    /// a rejected write, not a store failure.
    #[instrument(skip(self, fields), fields(code = %code))]
    pub async fn create_material(
        &self,
        code: String,
        fields: MaterialFields,
    ) -> Result<i32, ServiceError> {
        let db = &*self.db_pool;

        let active_model = MaterialActiveModel {
            code: Set(code.clone()),
            name: Set(fields.name),
            category: Set(fields.category),
            unit: Set(fields.unit),
            quantity: Set(fields.quantity),
            price_without_vat: Set(fields.price_without_vat),
            supplier: Set(fields.supplier),
            comment: Set(fields.comment),
            ..Default::default()
        };

        let model = active_model
            .insert(db)
            .await
            .map_err(|e| ServiceError::from_insert_err(e, "Material code already exists"))?;

        info!(material_id = model.id, "Material created");

        Ok(model.id)
    }

    /// Full-row replace of a material's mutable fields. The code is identity
    /// and is not updatable.
    #[instrument(skip(self, fields), fields(material_id = %material_id))]
    pub async fn update_material(
        &self,
        material_id: i32,
        fields: MaterialFields,
    ) -> Result<material::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = MaterialEntity::find_by_id(material_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                warn!(material_id = material_id, "Material not found for update");
                ServiceError::NotFound("Material not found".to_string())
            })?;

        let mut active_model: MaterialActiveModel = existing.into();
        active_model.name = Set(fields.name);
        active_model.category = Set(fields.category);
        active_model.unit = Set(fields.unit);
        active_model.quantity = Set(fields.quantity);
        active_model.price_without_vat = Set(fields.price_without_vat);
        active_model.supplier = Set(fields.supplier);
        active_model.comment = Set(fields.comment);
        active_model.updated_at = Set(Utc::now());

        let updated = active_model
            .update(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        info!(material_id = material_id, "Material updated");

        Ok(updated)
    }

    /// Deletes a material.
    #[instrument(skip(self), fields(material_id = %material_id))]
    pub async fn delete_material(&self, material_id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let result = MaterialEntity::delete_by_id(material_id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if result.rows_affected == 0 {
            warn!(material_id = material_id, "Material not found for delete");
            return Err(ServiceError::NotFound("Material not found".to_string()));
        }

        info!(material_id = material_id, "Material deleted");

        Ok(())
    }
}
