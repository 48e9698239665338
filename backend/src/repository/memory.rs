//! In-memory order store for workflow tests
//!
//! Mirrors the database behaviour the workflows rely on: identity ids that
//! are never reused, a unique `lr_number`, transactions that only become
//! visible on commit, and reference lookup by exact name.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use shared::ReferenceKind;

use super::{
    NewOrder, OrderChanges, OrderDetails, OrderOrigin, OrderStore, OrderTransaction,
    ReferenceLookup,
};
use crate::error::{AppError, AppResult};

#[derive(Default)]
struct State {
    next_id: i32,
    orders: BTreeMap<i32, OrderDetails>,
    references: HashMap<ReferenceKind, Vec<(i32, String)>>,
    fail_lr_assignment: bool,
    fail_rollback: bool,
    delete_before_update: bool,
    rollbacks: usize,
}

impl State {
    fn lr_taken(&self, lr_number: &str, except: Option<i32>) -> bool {
        self.orders
            .values()
            .any(|o| o.lr_number == lr_number && Some(o.id) != except)
    }

    fn reference_name(&self, kind: ReferenceKind, id: i32) -> Option<String> {
        self.references
            .get(&kind)
            .and_then(|rows| rows.iter().find(|(row_id, _)| *row_id == id))
            .map(|(_, name)| name.clone())
    }
}

fn duplicate_lr() -> AppError {
    AppError::Conflict {
        resource: "Order".to_string(),
        message: "Possible duplicate entry for Order (e.g. LR number)".to_string(),
    }
}

#[derive(Clone, Default)]
pub struct MemoryOrderStore {
    state: Arc<Mutex<State>>,
}

impl MemoryOrderStore {
    /// Store seeded with the standard reference rows
    pub fn seeded() -> Self {
        let store = Self::default();
        {
            let mut state = store.lock();
            state.next_id = 1;
            state.references.insert(
                ReferenceKind::Route,
                vec![(1, "Erode - Salem".into()), (2, "Salem - Trichy".into())],
            );
            state.references.insert(
                ReferenceKind::PaymentMethod,
                vec![(1, "Paid".into()), (2, "To Pay".into())],
            );
            state.references.insert(
                ReferenceKind::TermsOfDelivery,
                vec![(1, "Door Delivery".into()), (2, "Godown Delivery".into())],
            );
            state.references.insert(
                ReferenceKind::ItemType,
                vec![(1, "Textiles".into()), (2, "Machinery".into())],
            );
            state.references.insert(
                ReferenceKind::OrderStatus,
                vec![
                    (1, "Pending".into()),
                    (2, "In Transit".into()),
                    (3, "Delivered".into()),
                ],
            );
        }
        store
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("memory store poisoned")
    }

    /// Next identity value handed out on insert
    pub fn set_next_id(&self, id: i32) {
        self.lock().next_id = id;
    }

    pub fn fail_lr_assignment(&self) {
        self.lock().fail_lr_assignment = true;
    }

    pub fn fail_rollback(&self) {
        self.lock().fail_rollback = true;
    }

    /// Simulate a concurrent delete between the existence check and the update
    pub fn delete_before_update(&self) {
        self.lock().delete_before_update = true;
    }

    pub fn order_count(&self) -> usize {
        self.lock().orders.len()
    }

    pub fn rollbacks(&self) -> usize {
        self.lock().rollbacks
    }

    /// Overwrite the stored LR number, bypassing the workflows
    pub fn force_lr_number(&self, id: i32, lr_number: &str) {
        if let Some(order) = self.lock().orders.get_mut(&id) {
            order.lr_number = lr_number.to_string();
        }
    }
}

#[async_trait]
impl ReferenceLookup for MemoryOrderStore {
    async fn find_reference_id(&self, kind: ReferenceKind, name: &str) -> AppResult<Option<i32>> {
        let state = self.lock();
        Ok(state
            .references
            .get(&kind)
            .and_then(|rows| rows.iter().find(|(_, row_name)| row_name == name))
            .map(|(id, _)| *id))
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    type Tx = MemoryTransaction;

    async fn begin(&self) -> AppResult<Self::Tx> {
        Ok(MemoryTransaction {
            state: self.state.clone(),
            staged: BTreeMap::new(),
        })
    }

    async fn list_orders(&self) -> AppResult<Vec<OrderDetails>> {
        Ok(self.lock().orders.values().rev().cloned().collect())
    }

    async fn find_order(&self, id: i32) -> AppResult<Option<OrderDetails>> {
        Ok(self.lock().orders.get(&id).cloned())
    }

    async fn find_order_by_lr_number(&self, lr_number: &str) -> AppResult<Option<OrderDetails>> {
        Ok(self
            .lock()
            .orders
            .values()
            .find(|o| o.lr_number == lr_number)
            .cloned())
    }

    async fn find_origin(&self, id: i32) -> AppResult<Option<OrderOrigin>> {
        Ok(self.lock().orders.get(&id).map(|o| OrderOrigin {
            from_district: o.from_district.clone(),
            lr_number: o.lr_number.clone(),
        }))
    }

    async fn apply_changes(&self, id: i32, changes: &OrderChanges) -> AppResult<u64> {
        let mut state = self.lock();
        if state.delete_before_update {
            state.orders.remove(&id);
        }
        if let Some(lr_number) = &changes.lr_number {
            if state.lr_taken(lr_number, Some(id)) {
                return Err(duplicate_lr());
            }
        }

        let names: Vec<(ReferenceKind, Option<String>)> = [
            (ReferenceKind::Route, changes.route_id),
            (ReferenceKind::PaymentMethod, changes.payment_method_id),
            (ReferenceKind::TermsOfDelivery, changes.terms_of_delivery_id),
            (ReferenceKind::ItemType, changes.item_type_id),
            (ReferenceKind::OrderStatus, changes.status_id),
        ]
        .into_iter()
        .filter_map(|(kind, id)| id.map(|id| (kind, state.reference_name(kind, id))))
        .collect();

        let Some(order) = state.orders.get_mut(&id) else {
            return Ok(0);
        };

        macro_rules! apply {
            ($($field:ident),*) => {
                $(if let Some(value) = &changes.$field {
                    order.$field = value.clone();
                })*
            };
        }
        apply!(
            lr_number, from_name, from_address, from_district, from_phone, to_name,
            to_address, to_district, to_phone, quantity, weight, invoice_number,
            invoice_date, invoice_value, lr_charge, freight_charge, fuel_surcharge,
            ie_charge, door_delivery_charge, hamali_charge, eway_bill
        );

        for (kind, name) in names {
            match kind {
                ReferenceKind::Route => order.route = name,
                ReferenceKind::PaymentMethod => order.payment_method = name,
                ReferenceKind::TermsOfDelivery => order.terms_of_delivery = name,
                ReferenceKind::ItemType => order.item_type = name,
                ReferenceKind::OrderStatus => order.status = name,
            }
        }
        order.updated_at = Utc::now();
        Ok(1)
    }

    async fn delete_order(&self, id: i32) -> AppResult<u64> {
        Ok(self.lock().orders.remove(&id).map_or(0, |_| 1))
    }
}

pub struct MemoryTransaction {
    state: Arc<Mutex<State>>,
    staged: BTreeMap<i32, OrderDetails>,
}

impl MemoryTransaction {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("memory store poisoned")
    }
}

#[async_trait]
impl OrderTransaction for MemoryTransaction {
    async fn insert_provisional(&mut self, order: &NewOrder, placeholder: &str) -> AppResult<i32> {
        let details = {
            let mut state = self.lock();
            if state.lr_taken(placeholder, None) {
                return Err(duplicate_lr());
            }
            let id = state.next_id;
            state.next_id += 1;

            let now = Utc::now();
            OrderDetails {
                id,
                lr_number: placeholder.to_string(),
                from_name: order.from_name.clone(),
                from_address: order.from_address.clone(),
                from_district: order.from_district.clone(),
                from_phone: order.from_phone.clone(),
                to_name: order.to_name.clone(),
                to_address: order.to_address.clone(),
                to_district: order.to_district.clone(),
                to_phone: order.to_phone.clone(),
                quantity: order.quantity,
                weight: order.weight,
                item_type: state.reference_name(ReferenceKind::ItemType, order.item_type_id),
                invoice_number: order.invoice_number.clone(),
                invoice_date: order.invoice_date,
                invoice_value: order.invoice_value,
                lr_charge: order.charges.lr_charge,
                freight_charge: order.charges.freight_charge,
                fuel_surcharge: order.charges.fuel_surcharge,
                ie_charge: order.charges.ie_charge,
                door_delivery_charge: order.charges.door_delivery_charge,
                hamali_charge: order.charges.hamali_charge,
                eway_bill: order.eway_bill.clone(),
                route: state.reference_name(ReferenceKind::Route, order.route_id),
                payment_method: state
                    .reference_name(ReferenceKind::PaymentMethod, order.payment_method_id),
                terms_of_delivery: state
                    .reference_name(ReferenceKind::TermsOfDelivery, order.terms_of_delivery_id),
                status: state.reference_name(ReferenceKind::OrderStatus, order.status_id),
                status_color: None,
                created_at: now,
                updated_at: now,
            }
        };

        let id = details.id;
        self.staged.insert(id, details);
        Ok(id)
    }

    async fn assign_lr_number(&mut self, id: i32, lr_number: &str) -> AppResult<()> {
        {
            let state = self.lock();
            if state.fail_lr_assignment || state.lr_taken(lr_number, None) {
                return Err(duplicate_lr());
            }
        }
        let order = self
            .staged
            .get_mut(&id)
            .ok_or_else(|| AppError::Internal(format!("order {} not staged", id)))?;
        order.lr_number = lr_number.to_string();
        Ok(())
    }

    async fn commit(self) -> AppResult<()> {
        let mut state = self.state.lock().expect("memory store poisoned");
        for (id, order) in self.staged {
            state.orders.insert(id, order);
        }
        Ok(())
    }

    async fn rollback(self) -> AppResult<()> {
        let mut state = self.state.lock().expect("memory store poisoned");
        state.rollbacks += 1;
        if state.fail_rollback {
            return Err(AppError::Internal("rollback failed".to_string()));
        }
        Ok(())
    }
}
