//! Order booking service: LR-numbered creation, partial updates, and lookups

use chrono::Utc;
use shared::{
    generate_lr_number, provisional_lr_number, validate_create_order, validate_update_order,
    CreateOrderInput, CreatedOrder, OrderUpdated, ReferenceKind, UnresolvedReference,
    UpdateOrderInput, DEFAULT_ORDER_STATUS,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::repository::{
    NewOrder, OrderChanges, OrderDetails, OrderStore, OrderTransaction, ReferenceLookup,
};

/// Reference names carried by a request; `None` means "not supplied"
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceNames<'a> {
    pub route: Option<&'a str>,
    pub payment_method: Option<&'a str>,
    pub terms_of_delivery: Option<&'a str>,
    pub item_type: Option<&'a str>,
    pub status: Option<&'a str>,
}

impl<'a> ReferenceNames<'a> {
    fn get(&self, kind: ReferenceKind) -> Option<&'a str> {
        match kind {
            ReferenceKind::Route => self.route,
            ReferenceKind::PaymentMethod => self.payment_method,
            ReferenceKind::TermsOfDelivery => self.terms_of_delivery,
            ReferenceKind::ItemType => self.item_type,
            ReferenceKind::OrderStatus => self.status,
        }
    }
}

/// Ids for the supplied names; `None` for names not supplied
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedReferences {
    pub route_id: Option<i32>,
    pub payment_method_id: Option<i32>,
    pub terms_of_delivery_id: Option<i32>,
    pub item_type_id: Option<i32>,
    pub status_id: Option<i32>,
}

/// Resolve every supplied name concurrently.
///
/// Fails with [`AppError::InvalidReference`] listing each supplied name that
/// matched no row.
pub async fn resolve_references<L: ReferenceLookup + ?Sized>(
    lookup: &L,
    names: ReferenceNames<'_>,
) -> AppResult<ResolvedReferences> {
    let find = |kind: ReferenceKind| async move {
        match names.get(kind) {
            Some(name) => lookup.find_reference_id(kind, name).await,
            None => Ok(None),
        }
    };

    let (route_id, payment_method_id, terms_of_delivery_id, item_type_id, status_id) =
        tokio::try_join!(
            find(ReferenceKind::Route),
            find(ReferenceKind::PaymentMethod),
            find(ReferenceKind::TermsOfDelivery),
            find(ReferenceKind::ItemType),
            find(ReferenceKind::OrderStatus),
        )?;

    let resolved = ResolvedReferences {
        route_id,
        payment_method_id,
        terms_of_delivery_id,
        item_type_id,
        status_id,
    };

    let unresolved: Vec<UnresolvedReference> = ReferenceKind::ALL
        .into_iter()
        .filter_map(|kind| {
            let name = names.get(kind)?;
            resolved.get(kind).is_none().then(|| UnresolvedReference {
                kind,
                name: name.to_string(),
            })
        })
        .collect();

    if !unresolved.is_empty() {
        return Err(AppError::InvalidReference(unresolved));
    }
    Ok(resolved)
}

impl ResolvedReferences {
    fn get(&self, kind: ReferenceKind) -> Option<i32> {
        match kind {
            ReferenceKind::Route => self.route_id,
            ReferenceKind::PaymentMethod => self.payment_method_id,
            ReferenceKind::TermsOfDelivery => self.terms_of_delivery_id,
            ReferenceKind::ItemType => self.item_type_id,
            ReferenceKind::OrderStatus => self.status_id,
        }
    }

    fn require(&self, kind: ReferenceKind) -> AppResult<i32> {
        self.get(kind)
            .ok_or_else(|| AppError::Internal(format!("{} was not resolved", kind)))
    }
}

/// Name supplied for a reference field; nulls are rejected by validation
fn supplied(value: &Option<Option<String>>) -> Option<&str> {
    value.as_ref().and_then(Option::as_deref)
}

/// Temporary LR number: `TEMP-<unix millis>-<6 random hex chars>`
fn placeholder_lr_number() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    provisional_lr_number(Utc::now().timestamp_millis(), &suffix[..6])
}

/// Order service, generic over the backing store
#[derive(Clone)]
pub struct OrderService<S> {
    store: S,
}

impl<S: OrderStore> OrderService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Book a new order.
    ///
    /// The LR number embeds the store-assigned id, so the row is inserted with
    /// a placeholder and corrected before commit inside one transaction. No
    /// committed row ever carries the placeholder.
    pub async fn create_order(&self, input: CreateOrderInput) -> AppResult<CreatedOrder> {
        validate_create_order(&input)?;

        let refs = resolve_references(
            &self.store,
            ReferenceNames {
                route: Some(&input.route),
                payment_method: Some(&input.payment_method),
                terms_of_delivery: Some(&input.terms_delivery),
                item_type: Some(&input.item_type),
                status: Some(DEFAULT_ORDER_STATUS),
            },
        )
        .await?;

        let new_order = NewOrder {
            route_id: refs.require(ReferenceKind::Route)?,
            payment_method_id: refs.require(ReferenceKind::PaymentMethod)?,
            terms_of_delivery_id: refs.require(ReferenceKind::TermsOfDelivery)?,
            item_type_id: refs.require(ReferenceKind::ItemType)?,
            status_id: refs.require(ReferenceKind::OrderStatus)?,
            from_name: input.from_name,
            from_address: input.from_address,
            from_district: input.from_district,
            from_phone: input.from_phone,
            to_name: input.to_name,
            to_address: input.to_address,
            to_district: input.to_district,
            to_phone: input.to_phone,
            quantity: input.quantity,
            weight: input.weight,
            invoice_number: input.invoice_number,
            invoice_date: input.invoice_date,
            invoice_value: input.invoice_value,
            charges: input.charges,
            eway_bill: input.eway_bill,
        };

        let mut tx = self.store.begin().await?;
        match Self::insert_with_lr_number(&mut tx, &new_order).await {
            Ok(created) => {
                tx.commit().await.map_err(|e| {
                    tracing::error!("Commit failed for order {}: {}", created.id, e);
                    AppError::TransactionFailure(format!("commit of order {} failed", created.id))
                })?;
                tracing::info!(
                    "Order created successfully: ID={}, LR={}",
                    created.id,
                    created.lr_number
                );
                Ok(created)
            }
            Err(e) => {
                tracing::warn!(
                    "Rolling back transaction due to error during order creation: {}",
                    e
                );
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(
                        "CRITICAL: Error rolling back order creation transaction: {:?}",
                        rollback_err
                    );
                }
                Err(e)
            }
        }
    }

    async fn insert_with_lr_number(tx: &mut S::Tx, order: &NewOrder) -> AppResult<CreatedOrder> {
        let placeholder = placeholder_lr_number();
        let id = tx.insert_provisional(order, &placeholder).await?;

        let lr_number = generate_lr_number(order.from_district.as_deref(), id);
        tracing::debug!(
            "Order {} inserted with placeholder {}, LR number {}",
            id,
            placeholder,
            lr_number
        );

        tx.assign_lr_number(id, &lr_number).await?;
        Ok(CreatedOrder { id, lr_number })
    }

    /// Apply a partial update.
    ///
    /// Only the fields present in `input` are written. Changing the origin
    /// district regenerates the LR number when it no longer matches the
    /// stored one.
    pub async fn update_order(&self, id: i32, input: UpdateOrderInput) -> AppResult<OrderUpdated> {
        let origin = self
            .store
            .find_origin(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        validate_update_order(&input)?;

        let refs = resolve_references(
            &self.store,
            ReferenceNames {
                route: supplied(&input.route),
                payment_method: supplied(&input.payment_method),
                terms_of_delivery: supplied(&input.terms_delivery),
                item_type: supplied(&input.item_type),
                status: supplied(&input.status),
            },
        )
        .await?;

        let [
            lr_charge,
            freight_charge,
            fuel_surcharge,
            ie_charge,
            door_delivery_charge,
            hamali_charge,
        ] = input.charges().map(|(_, amount)| amount);

        let mut changes = OrderChanges {
            lr_number: None,
            from_name: input.from_name.flatten(),
            from_address: input.from_address,
            from_district: input.from_district,
            from_phone: input.from_phone,
            to_name: input.to_name.flatten(),
            to_address: input.to_address,
            to_district: input.to_district,
            to_phone: input.to_phone,
            quantity: input.quantity,
            weight: input.weight,
            invoice_number: input.invoice_number,
            invoice_date: input.invoice_date,
            invoice_value: input.invoice_value,
            lr_charge,
            freight_charge,
            fuel_surcharge,
            ie_charge,
            door_delivery_charge,
            hamali_charge,
            eway_bill: input.eway_bill,
            route_id: refs.route_id,
            payment_method_id: refs.payment_method_id,
            terms_of_delivery_id: refs.terms_of_delivery_id,
            item_type_id: refs.item_type_id,
            status_id: refs.status_id,
        };

        if let Some(district) = &changes.from_district {
            let regenerated = generate_lr_number(district.as_deref(), id);
            if regenerated != origin.lr_number {
                tracing::warn!(
                    "Updating LR number for order {} due to district change: {} -> {}",
                    id,
                    origin.lr_number,
                    regenerated
                );
                changes.lr_number = Some(regenerated);
            }
        }

        if changes.is_empty() {
            tracing::debug!("No fields provided to update for order {}", id);
            return Ok(OrderUpdated {
                id,
                lr_number: origin.lr_number,
                changed: false,
            });
        }

        let affected = self.store.apply_changes(id, &changes).await?;
        if affected == 0 {
            tracing::warn!("Update affected 0 rows for order {}", id);
            return Err(AppError::NotFound("Order".to_string()));
        }

        tracing::info!("Order updated successfully: ID={}", id);
        Ok(OrderUpdated {
            id,
            lr_number: changes.lr_number.unwrap_or(origin.lr_number),
            changed: true,
        })
    }

    pub async fn delete_order(&self, id: i32) -> AppResult<()> {
        let affected = self.store.delete_order(id).await?;
        if affected == 0 {
            return Err(AppError::NotFound("Order".to_string()));
        }
        tracing::info!("Order deleted successfully: ID={}", id);
        Ok(())
    }

    pub async fn get_order(&self, id: i32) -> AppResult<OrderDetails> {
        self.store
            .find_order(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Order".to_string()))
    }

    /// Public tracking lookup by LR number
    pub async fn get_order_by_lr_number(&self, lr_number: &str) -> AppResult<OrderDetails> {
        self.store
            .find_order_by_lr_number(lr_number.trim())
            .await?
            .ok_or_else(|| AppError::NotFound("Order".to_string()))
    }

    pub async fn list_orders(&self) -> AppResult<Vec<OrderDetails>> {
        self.store.list_orders().await
    }
}
