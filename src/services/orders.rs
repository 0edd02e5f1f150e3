use crate::{
    db::DbPool,
    entities::order::{self, ActiveModel as OrderActiveModel, Entity as OrderEntity},
    entities::order_item::{
        self, ActiveModel as OrderItemActiveModel, Entity as OrderItemEntity,
    },
    errors::ServiceError,
};
use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

/// Optional filters for the order listing.
#[derive(Debug, Default)]
pub struct OrderFilter {
    pub status: Option<String>,
    pub product_type: Option<String>,
}

/// An order with its line items, ordered by sort_order then id.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: order::Model,
    pub items: Vec<order_item::Model>,
}

/// Header fields shared by order create and update. The five derived totals
/// are never written through this path.
#[derive(Debug)]
pub struct OrderFields {
    pub client_order_number: String,
    pub order_date: NaiveDate,
    pub country: String,
    pub customer_name: String,
    pub customer_address: String,
    pub product_type: String,
    pub status: String,
}

/// Field set shared by item create and update.
#[derive(Debug)]
pub struct OrderItemFields {
    pub item_type: String,
    pub configuration_id: Option<i32>,
    pub name: String,
    pub name_production: String,
    pub quantity: Decimal,
    pub material_cost: Decimal,
    pub labor_cost: Decimal,
    pub labor_hours: Decimal,
    pub total_cost: Decimal,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub sort_order: i32,
    pub comment: String,
}

/// The five derived totals of an order.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct OrderTotals {
    pub total_materials: Decimal,
    pub total_labor: Decimal,
    pub total_labor_hours: Decimal,
    pub total_cost: Decimal,
    pub total_price: Decimal,
}

/// Sums the weighted item figures. An empty item set yields zeros, never
/// an absent value.
pub fn sum_item_totals(items: &[order_item::Model]) -> OrderTotals {
    items.iter().fold(OrderTotals::default(), |mut acc, item| {
        acc.total_materials += item.material_cost * item.quantity;
        acc.total_labor += item.labor_cost * item.quantity;
        acc.total_labor_hours += item.labor_hours * item.quantity;
        acc.total_cost += item.total_cost * item.quantity;
        acc.total_price += item.total_price * item.quantity;
        acc
    })
}

/// Service for managing orders and their line items, including the derived
/// totals recalculation.
#[derive(Clone)]
pub struct OrderService {
    db_pool: Arc<DbPool>,
    // One lock per order id so that concurrent item mutations cannot
    // interleave their read-sum-write cycles and persist a stale total.
    // Entries are never pruned; the active order set stays small.
    recalc_locks: Arc<DashMap<i32, Arc<Mutex<()>>>>,
}

impl OrderService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            db_pool,
            recalc_locks: Arc::new(DashMap::new()),
        }
    }

    /// Lists orders, newest first (order date desc, id desc).
    #[instrument(skip(self))]
    pub async fn list_orders(
        &self,
        filter: OrderFilter,
    ) -> Result<Vec<order::Model>, ServiceError> {
        let db = &*self.db_pool;

        let mut query = OrderEntity::find();

        if let Some(status) = &filter.status {
            query = query.filter(order::Column::Status.eq(status.clone()));
        }

        if let Some(product_type) = &filter.product_type {
            query = query.filter(order::Column::ProductType.eq(product_type.clone()));
        }

        query
            .order_by_desc(order::Column::OrderDate)
            .order_by_desc(order::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Retrieves an order with its items.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: i32) -> Result<Option<OrderDetail>, ServiceError> {
        let db = &*self.db_pool;

        let Some(order) = OrderEntity::find_by_id(order_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
        else {
            return Ok(None);
        };

        let items = OrderItemEntity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .order_by_asc(order_item::Column::SortOrder)
            .order_by_asc(order_item::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(Some(OrderDetail { order, items }))
    }

    /// Creates an order header and returns its assigned id. Totals start at
    /// zero; items are appended afterwards. A duplicate order number is a
    /// rejected write.
    #[instrument(skip(self, fields), fields(order_number = %order_number))]
    pub async fn create_order(
        &self,
        order_number: String,
        fields: OrderFields,
    ) -> Result<i32, ServiceError> {
        let db = &*self.db_pool;

        let active_model = OrderActiveModel {
            order_number: Set(order_number.clone()),
            client_order_number: Set(fields.client_order_number),
            order_date: Set(fields.order_date),
            country: Set(fields.country),
            customer_name: Set(fields.customer_name),
            customer_address: Set(fields.customer_address),
            product_type: Set(fields.product_type),
            status: Set(fields.status),
            total_materials: Set(Decimal::ZERO),
            total_labor: Set(Decimal::ZERO),
            total_labor_hours: Set(Decimal::ZERO),
            total_cost: Set(Decimal::ZERO),
            total_price: Set(Decimal::ZERO),
            ..Default::default()
        };

        let model = active_model
            .insert(db)
            .await
            .map_err(|e| ServiceError::from_insert_err(e, "Order number already exists"))?;

        info!(order_id = model.id, "Order created");

        Ok(model.id)
    }

    /// Full-row replace of an order's header fields. The order number is
    /// identity and the totals stay derived.
    #[instrument(skip(self, fields), fields(order_id = %order_id))]
    pub async fn update_order(
        &self,
        order_id: i32,
        fields: OrderFields,
    ) -> Result<order::Model, ServiceError> {
        let db = &*self.db_pool;

        let existing = OrderEntity::find_by_id(order_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                warn!(order_id = order_id, "Order not found for update");
                ServiceError::NotFound("Order not found".to_string())
            })?;

        let mut active_model: OrderActiveModel = existing.into();
        active_model.client_order_number = Set(fields.client_order_number);
        active_model.order_date = Set(fields.order_date);
        active_model.country = Set(fields.country);
        active_model.customer_name = Set(fields.customer_name);
        active_model.customer_address = Set(fields.customer_address);
        active_model.product_type = Set(fields.product_type);
        active_model.status = Set(fields.status);
        active_model.updated_at = Set(Utc::now());

        let updated = active_model
            .update(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        info!(order_id = order_id, "Order updated");

        Ok(updated)
    }

    /// Deletes an order; its items cascade with it.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn delete_order(&self, order_id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let result = OrderEntity::delete_by_id(order_id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if result.rows_affected == 0 {
            warn!(order_id = order_id, "Order not found for delete");
            return Err(ServiceError::NotFound("Order not found".to_string()));
        }

        info!(order_id = order_id, "Order deleted");

        Ok(())
    }

    /// Appends an item to an order, then recalculates the order's totals.
    #[instrument(skip(self, fields), fields(order_id = %order_id))]
    pub async fn add_order_item(
        &self,
        order_id: i32,
        fields: OrderItemFields,
    ) -> Result<i32, ServiceError> {
        let db = &*self.db_pool;

        // The FK would reject the insert anyway; checking first turns it
        // into a clean 404.
        let order_exists = OrderEntity::find_by_id(order_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .is_some();
        if !order_exists {
            warn!(order_id = order_id, "Order not found for item insert");
            return Err(ServiceError::NotFound("Order not found".to_string()));
        }

        let active_model = item_active_model(order_id, fields);

        let model = active_model
            .insert(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        self.recalculate_totals(order_id).await?;

        info!(order_id = order_id, item_id = model.id, "Order item added");

        Ok(model.id)
    }

    /// Full-row replace of an item, then recalculates the owning order's
    /// totals. The item must belong to the given order.
    #[instrument(skip(self, fields), fields(order_id = %order_id, item_id = %item_id))]
    pub async fn update_order_item(
        &self,
        order_id: i32,
        item_id: i32,
        fields: OrderItemFields,
    ) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let existing = OrderItemEntity::find_by_id(item_id)
            .filter(order_item::Column::OrderId.eq(order_id))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                warn!(
                    order_id = order_id,
                    item_id = item_id,
                    "Order item not found for update"
                );
                ServiceError::NotFound("Order item not found".to_string())
            })?;

        let mut active_model: OrderItemActiveModel = existing.into();
        active_model.item_type = Set(fields.item_type);
        active_model.configuration_id = Set(fields.configuration_id);
        active_model.name = Set(fields.name);
        active_model.name_production = Set(fields.name_production);
        active_model.quantity = Set(fields.quantity);
        active_model.material_cost = Set(fields.material_cost);
        active_model.labor_cost = Set(fields.labor_cost);
        active_model.labor_hours = Set(fields.labor_hours);
        active_model.total_cost = Set(fields.total_cost);
        active_model.unit_price = Set(fields.unit_price);
        active_model.total_price = Set(fields.total_price);
        active_model.sort_order = Set(fields.sort_order);
        active_model.comment = Set(fields.comment);

        active_model
            .update(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        self.recalculate_totals(order_id).await?;

        info!(order_id = order_id, item_id = item_id, "Order item updated");

        Ok(())
    }

    /// Removes an item, then recalculates the owning order's totals.
    #[instrument(skip(self), fields(order_id = %order_id, item_id = %item_id))]
    pub async fn delete_order_item(&self, order_id: i32, item_id: i32) -> Result<(), ServiceError> {
        let db = &*self.db_pool;

        let result = OrderItemEntity::delete_many()
            .filter(order_item::Column::Id.eq(item_id))
            .filter(order_item::Column::OrderId.eq(order_id))
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if result.rows_affected == 0 {
            warn!(
                order_id = order_id,
                item_id = item_id,
                "Order item not found for delete"
            );
            return Err(ServiceError::NotFound("Order item not found".to_string()));
        }

        self.recalculate_totals(order_id).await?;

        info!(order_id = order_id, item_id = item_id, "Order item deleted");

        Ok(())
    }

    /// Recomputes the order's five totals from its current item set and
    /// persists them, refreshing the modification timestamp.
    ///
    /// Serialized per order id: two concurrent item mutations on the same
    /// order recalculate one after the other, so the write that lands last
    /// reflects both. Reads and the write share one transaction.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn recalculate_totals(&self, order_id: i32) -> Result<(), ServiceError> {
        let lock = self
            .recalc_locks
            .entry(order_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        let db = &*self.db_pool;
        let txn = db.begin().await.map_err(ServiceError::DatabaseError)?;

        let items = OrderItemEntity::find()
            .filter(order_item::Column::OrderId.eq(order_id))
            .all(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let totals = sum_item_totals(&items);

        let order = OrderEntity::find_by_id(order_id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))?;

        let mut active_model: OrderActiveModel = order.into();
        active_model.total_materials = Set(totals.total_materials);
        active_model.total_labor = Set(totals.total_labor);
        active_model.total_labor_hours = Set(totals.total_labor_hours);
        active_model.total_cost = Set(totals.total_cost);
        active_model.total_price = Set(totals.total_price);
        active_model.updated_at = Set(Utc::now());

        active_model
            .update(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        info!(order_id = order_id, "Order totals recalculated");

        Ok(())
    }
}

fn item_active_model(order_id: i32, fields: OrderItemFields) -> OrderItemActiveModel {
    OrderItemActiveModel {
        order_id: Set(order_id),
        item_type: Set(fields.item_type),
        configuration_id: Set(fields.configuration_id),
        name: Set(fields.name),
        name_production: Set(fields.name_production),
        quantity: Set(fields.quantity),
        material_cost: Set(fields.material_cost),
        labor_cost: Set(fields.labor_cost),
        labor_hours: Set(fields.labor_hours),
        total_cost: Set(fields.total_cost),
        unit_price: Set(fields.unit_price),
        total_price: Set(fields.total_price),
        sort_order: Set(fields.sort_order),
        comment: Set(fields.comment),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(
        material_cost: Decimal,
        labor_cost: Decimal,
        labor_hours: Decimal,
        total_cost: Decimal,
        total_price: Decimal,
        quantity: Decimal,
    ) -> order_item::Model {
        order_item::Model {
            id: 0,
            order_id: 1,
            item_type: "configuration".to_string(),
            configuration_id: None,
            name: "Test item".to_string(),
            name_production: String::new(),
            quantity,
            material_cost,
            labor_cost,
            labor_hours,
            total_cost,
            unit_price: Decimal::ZERO,
            total_price,
            sort_order: 0,
            comment: String::new(),
        }
    }

    #[test]
    fn totals_are_weighted_sums_over_items() {
        let items = vec![
            item(dec!(10), dec!(5), dec!(1), dec!(15), dec!(20), dec!(2)),
            item(dec!(3), dec!(0), dec!(0.5), dec!(3), dec!(4), dec!(1)),
        ];

        let totals = sum_item_totals(&items);

        assert_eq!(totals.total_materials, dec!(23));
        assert_eq!(totals.total_labor, dec!(10));
        assert_eq!(totals.total_labor_hours, dec!(2.5));
        assert_eq!(totals.total_cost, dec!(33));
        assert_eq!(totals.total_price, dec!(44));
    }

    #[test]
    fn empty_item_set_sums_to_zero() {
        let totals = sum_item_totals(&[]);

        assert_eq!(totals.total_materials, Decimal::ZERO);
        assert_eq!(totals.total_labor, Decimal::ZERO);
        assert_eq!(totals.total_labor_hours, Decimal::ZERO);
        assert_eq!(totals.total_cost, Decimal::ZERO);
        assert_eq!(totals.total_price, Decimal::ZERO);
    }
}
