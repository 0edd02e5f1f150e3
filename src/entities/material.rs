use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::*;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveModelBehavior, ActiveValue, Set};
use serde::{Deserialize, Serialize};

/// A purchasable raw input tracked with cost and supplier.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[schema(as = Material)]
#[sea_orm(table_name = "materials")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub quantity: Decimal,
    pub price_without_vat: Decimal,
    pub supplier: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::configuration_material::Entity")]
    ConfigurationMaterial,
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
