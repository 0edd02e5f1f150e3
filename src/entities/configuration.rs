use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue, Set};
use serde::{Deserialize, Serialize};

/// A named bill-of-materials template for a product variant.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[schema(as = Configuration)]
#[sea_orm(table_name = "configurations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub product_type: String,
    pub category_id: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::configuration_category::Entity",
        from = "Column::CategoryId",
        to = "super::configuration_category::Column::Id"
    )]
    Category,
    #[sea_orm(has_many = "super::configuration_material::Entity")]
    ConfigurationMaterial,
}

impl Related<super::configuration_category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::configuration_material::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ConfigurationMaterial.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;

        let now = Utc::now();

        if insert {
            if let ActiveValue::NotSet = active_model.created_at {
                active_model.created_at = Set(now);
            }
        }

        if let ActiveValue::NotSet = active_model.updated_at {
            active_model.updated_at = Set(now);
        }

        Ok(active_model)
    }
}
