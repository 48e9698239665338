//! Storage seams for orders and reference data
//!
//! Services talk to the database through these traits so the booking
//! workflows do not depend on a live connection.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{OrderCharges, ReferenceKind};

pub mod postgres;

#[cfg(test)]
pub mod memory;

pub use postgres::PgOrderStore;

use crate::error::AppResult;

/// Order row ready to insert, with reference names already resolved to ids
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub from_name: String,
    pub from_address: Option<String>,
    pub from_district: Option<String>,
    pub from_phone: Option<String>,
    pub to_name: String,
    pub to_address: Option<String>,
    pub to_district: Option<String>,
    pub to_phone: Option<String>,
    pub quantity: Option<i32>,
    pub weight: Option<Decimal>,
    pub item_type_id: i32,
    pub invoice_number: Option<String>,
    pub invoice_date: Option<NaiveDate>,
    pub invoice_value: Option<Decimal>,
    pub charges: OrderCharges,
    pub route_id: i32,
    pub payment_method_id: i32,
    pub terms_of_delivery_id: i32,
    pub status_id: i32,
    pub eway_bill: Option<String>,
}

/// Column-level change set for a partial update.
///
/// `None` means "leave the column alone"; only `Some` fields are written,
/// and `Some(None)` on a nullable column writes `NULL`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderChanges {
    pub lr_number: Option<String>,
    pub from_name: Option<String>,
    pub from_address: Option<Option<String>>,
    pub from_district: Option<Option<String>>,
    pub from_phone: Option<Option<String>>,
    pub to_name: Option<String>,
    pub to_address: Option<Option<String>>,
    pub to_district: Option<Option<String>>,
    pub to_phone: Option<Option<String>>,
    pub quantity: Option<Option<i32>>,
    pub weight: Option<Option<Decimal>>,
    pub invoice_number: Option<Option<String>>,
    pub invoice_date: Option<Option<NaiveDate>>,
    pub invoice_value: Option<Option<Decimal>>,
    pub lr_charge: Option<Decimal>,
    pub freight_charge: Option<Decimal>,
    pub fuel_surcharge: Option<Decimal>,
    pub ie_charge: Option<Decimal>,
    pub door_delivery_charge: Option<Decimal>,
    pub hamali_charge: Option<Decimal>,
    pub eway_bill: Option<Option<String>>,
    pub route_id: Option<i32>,
    pub payment_method_id: Option<i32>,
    pub terms_of_delivery_id: Option<i32>,
    pub item_type_id: Option<i32>,
    pub status_id: Option<i32>,
}

impl OrderChanges {
    pub fn is_empty(&self) -> bool {
        *self == OrderChanges::default()
    }
}

/// What the update workflow needs to know about the stored row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderOrigin {
    pub from_district: Option<String>,
    pub lr_number: String,
}

/// Order joined with the names of its reference rows
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    pub id: i32,
    pub lr_number: String,
    pub from_name: String,
    pub from_address: Option<String>,
    pub from_district: Option<String>,
    pub from_phone: Option<String>,
    pub to_name: String,
    pub to_address: Option<String>,
    pub to_district: Option<String>,
    pub to_phone: Option<String>,
    pub quantity: Option<i32>,
    pub weight: Option<Decimal>,
    pub item_type: Option<String>,
    pub invoice_number: Option<String>,
    pub invoice_date: Option<NaiveDate>,
    pub invoice_value: Option<Decimal>,
    pub lr_charge: Decimal,
    pub freight_charge: Decimal,
    pub fuel_surcharge: Decimal,
    pub ie_charge: Decimal,
    pub door_delivery_charge: Decimal,
    pub hamali_charge: Decimal,
    #[serde(rename = "eWayBill")]
    pub eway_bill: Option<String>,
    pub route: Option<String>,
    pub payment_method: Option<String>,
    pub terms_of_delivery: Option<String>,
    pub status: Option<String>,
    pub status_color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderDetails {
    pub fn charges(&self) -> OrderCharges {
        OrderCharges {
            lr_charge: self.lr_charge,
            freight_charge: self.freight_charge,
            fuel_surcharge: self.fuel_surcharge,
            ie_charge: self.ie_charge,
            door_delivery_charge: self.door_delivery_charge,
            hamali_charge: self.hamali_charge,
        }
    }
}

/// Name to id resolution against the lookup tables
#[async_trait]
pub trait ReferenceLookup: Send + Sync {
    /// Exact, case-sensitive match; `None` when no row has that name
    async fn find_reference_id(&self, kind: ReferenceKind, name: &str) -> AppResult<Option<i32>>;
}

/// Order persistence
#[async_trait]
pub trait OrderStore: ReferenceLookup {
    type Tx: OrderTransaction;

    async fn begin(&self) -> AppResult<Self::Tx>;

    async fn list_orders(&self) -> AppResult<Vec<OrderDetails>>;

    async fn find_order(&self, id: i32) -> AppResult<Option<OrderDetails>>;

    async fn find_order_by_lr_number(&self, lr_number: &str) -> AppResult<Option<OrderDetails>>;

    async fn find_origin(&self, id: i32) -> AppResult<Option<OrderOrigin>>;

    /// Write `changes` and refresh `updated_at` in one statement; returns rows affected
    async fn apply_changes(&self, id: i32, changes: &OrderChanges) -> AppResult<u64>;

    /// Returns rows affected
    async fn delete_order(&self, id: i32) -> AppResult<u64>;
}

/// Unit of work for the two-phase booking insert.
///
/// Dropping an uncommitted transaction rolls it back.
#[async_trait]
pub trait OrderTransaction: Send {
    /// Insert with a placeholder LR number; returns the store-assigned id
    async fn insert_provisional(&mut self, order: &NewOrder, placeholder: &str) -> AppResult<i32>;

    async fn assign_lr_number(&mut self, id: i32, lr_number: &str) -> AppResult<()>;

    async fn commit(self) -> AppResult<()>;

    async fn rollback(self) -> AppResult<()>;
}
