//! PostgreSQL implementation of the order and reference-data stores

use async_trait::async_trait;
use shared::ReferenceKind;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use super::{
    NewOrder, OrderChanges, OrderDetails, OrderOrigin, OrderStore, OrderTransaction,
    ReferenceLookup,
};
use crate::error::{AppError, AppResult};

const ORDER_DETAILS_SELECT: &str = r#"
    SELECT o.id, o.lr_number,
           o.from_name, o.from_address, o.from_district, o.from_phone,
           o.to_name, o.to_address, o.to_district, o.to_phone,
           o.quantity, o.weight, it.name AS item_type,
           o.invoice_number, o.invoice_date, o.invoice_value,
           o.lr_charge, o.freight_charge, o.fuel_surcharge, o.ie_charge,
           o.door_delivery_charge, o.hamali_charge,
           o.eway_bill,
           r.name AS route, pm.name AS payment_method, tod.name AS terms_of_delivery,
           os.name AS status, os.color AS status_color,
           o.created_at, o.updated_at
    FROM orders o
    LEFT JOIN routes r ON o.route_id = r.id
    LEFT JOIN payment_methods pm ON o.payment_method_id = pm.id
    LEFT JOIN terms_of_delivery tod ON o.terms_of_delivery_id = tod.id
    LEFT JOIN item_types it ON o.item_type_id = it.id
    LEFT JOIN order_status os ON o.status_id = os.id
"#;

/// Order store backed by the shared connection pool
#[derive(Clone)]
pub struct PgOrderStore {
    db: PgPool,
}

impl PgOrderStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReferenceLookup for PgOrderStore {
    async fn find_reference_id(&self, kind: ReferenceKind, name: &str) -> AppResult<Option<i32>> {
        // Table names come from a closed enum, never from the request
        let query = format!("SELECT id FROM {} WHERE name = $1 LIMIT 1", kind.table());
        let id = sqlx::query_scalar::<_, i32>(&query)
            .bind(name)
            .fetch_optional(&self.db)
            .await?;
        Ok(id)
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    type Tx = PgOrderTransaction;

    async fn begin(&self) -> AppResult<Self::Tx> {
        let tx = self.db.begin().await?;
        Ok(PgOrderTransaction { tx })
    }

    async fn list_orders(&self) -> AppResult<Vec<OrderDetails>> {
        let query = format!("{} ORDER BY o.created_at DESC, o.id DESC", ORDER_DETAILS_SELECT);
        let orders = sqlx::query_as::<_, OrderDetails>(&query)
            .fetch_all(&self.db)
            .await?;
        Ok(orders)
    }

    async fn find_order(&self, id: i32) -> AppResult<Option<OrderDetails>> {
        let query = format!("{} WHERE o.id = $1", ORDER_DETAILS_SELECT);
        let order = sqlx::query_as::<_, OrderDetails>(&query)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(order)
    }

    async fn find_order_by_lr_number(&self, lr_number: &str) -> AppResult<Option<OrderDetails>> {
        let query = format!("{} WHERE o.lr_number = $1", ORDER_DETAILS_SELECT);
        let order = sqlx::query_as::<_, OrderDetails>(&query)
            .bind(lr_number)
            .fetch_optional(&self.db)
            .await?;
        Ok(order)
    }

    async fn find_origin(&self, id: i32) -> AppResult<Option<OrderOrigin>> {
        let row = sqlx::query_as::<_, (Option<String>, String)>(
            "SELECT from_district, lr_number FROM orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(|(from_district, lr_number)| OrderOrigin {
            from_district,
            lr_number,
        }))
    }

    async fn apply_changes(&self, id: i32, changes: &OrderChanges) -> AppResult<u64> {
        let mut query = build_update(id, changes);
        let result = query
            .build()
            .execute(&self.db)
            .await
            .map_err(|e| AppError::from_db(e, "Order"))?;
        Ok(result.rows_affected())
    }

    async fn delete_order(&self, id: i32) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(|e| AppError::from_db(e, "Order"))?;
        Ok(result.rows_affected())
    }
}

/// `UPDATE orders SET <present columns>, updated_at = NOW() WHERE id = $n`
fn build_update(id: i32, changes: &OrderChanges) -> QueryBuilder<'_, Postgres> {
    let mut query = QueryBuilder::<Postgres>::new("UPDATE orders SET ");
    {
        let mut set = query.separated(", ");

        macro_rules! set_column {
            ($column:literal, $value:expr) => {
                if let Some(value) = $value {
                    set.push(concat!($column, " = "));
                    set.push_bind_unseparated(value);
                }
            };
        }

        set_column!("lr_number", &changes.lr_number);
        set_column!("from_name", &changes.from_name);
        set_column!("from_address", &changes.from_address);
        set_column!("from_district", &changes.from_district);
        set_column!("from_phone", &changes.from_phone);
        set_column!("to_name", &changes.to_name);
        set_column!("to_address", &changes.to_address);
        set_column!("to_district", &changes.to_district);
        set_column!("to_phone", &changes.to_phone);
        set_column!("quantity", changes.quantity);
        set_column!("weight", changes.weight);
        set_column!("invoice_number", &changes.invoice_number);
        set_column!("invoice_date", changes.invoice_date);
        set_column!("invoice_value", changes.invoice_value);
        set_column!("lr_charge", changes.lr_charge);
        set_column!("freight_charge", changes.freight_charge);
        set_column!("fuel_surcharge", changes.fuel_surcharge);
        set_column!("ie_charge", changes.ie_charge);
        set_column!("door_delivery_charge", changes.door_delivery_charge);
        set_column!("hamali_charge", changes.hamali_charge);
        set_column!("eway_bill", &changes.eway_bill);
        set_column!("route_id", changes.route_id);
        set_column!("payment_method_id", changes.payment_method_id);
        set_column!("terms_of_delivery_id", changes.terms_of_delivery_id);
        set_column!("item_type_id", changes.item_type_id);
        set_column!("status_id", changes.status_id);

        set.push("updated_at = NOW()");
    }
    query.push(" WHERE id = ");
    query.push_bind(id);
    query
}

/// Booking transaction; rolls back when dropped uncommitted
pub struct PgOrderTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl OrderTransaction for PgOrderTransaction {
    async fn insert_provisional(&mut self, order: &NewOrder, placeholder: &str) -> AppResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO orders (
                lr_number,
                from_name, from_address, from_district, from_phone,
                to_name, to_address, to_district, to_phone,
                quantity, weight, item_type_id,
                invoice_number, invoice_date, invoice_value,
                lr_charge, freight_charge, fuel_surcharge, ie_charge, door_delivery_charge, hamali_charge,
                route_id, eway_bill, payment_method_id, terms_of_delivery_id, status_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26)
            RETURNING id
            "#,
        )
        .bind(placeholder)
        .bind(&order.from_name)
        .bind(&order.from_address)
        .bind(&order.from_district)
        .bind(&order.from_phone)
        .bind(&order.to_name)
        .bind(&order.to_address)
        .bind(&order.to_district)
        .bind(&order.to_phone)
        .bind(order.quantity)
        .bind(order.weight)
        .bind(order.item_type_id)
        .bind(&order.invoice_number)
        .bind(order.invoice_date)
        .bind(order.invoice_value)
        .bind(order.charges.lr_charge)
        .bind(order.charges.freight_charge)
        .bind(order.charges.fuel_surcharge)
        .bind(order.charges.ie_charge)
        .bind(order.charges.door_delivery_charge)
        .bind(order.charges.hamali_charge)
        .bind(order.route_id)
        .bind(&order.eway_bill)
        .bind(order.payment_method_id)
        .bind(order.terms_of_delivery_id)
        .bind(order.status_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| AppError::from_db(e, "Order"))?;

        Ok(id)
    }

    async fn assign_lr_number(&mut self, id: i32, lr_number: &str) -> AppResult<()> {
        let result = sqlx::query("UPDATE orders SET lr_number = $1 WHERE id = $2")
            .bind(lr_number)
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| AppError::from_db(e, "Order"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::Internal(format!(
                "Provisional order {} vanished before LR number assignment",
                id
            )));
        }
        Ok(())
    }

    async fn commit(self) -> AppResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> AppResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
