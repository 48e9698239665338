//! Reference data handlers for the booking form dropdowns

use axum::{extract::State, Json};
use shared::{OrderStatus, ReferenceItem, ReferenceKind};

use crate::error::AppResult;
use crate::services::ReferenceService;
use crate::AppState;

async fn list(state: AppState, kind: ReferenceKind) -> AppResult<Json<Vec<ReferenceItem>>> {
    let service = ReferenceService::new(state.db.clone());
    Ok(Json(service.list(kind).await?))
}

pub async fn list_routes(State(state): State<AppState>) -> AppResult<Json<Vec<ReferenceItem>>> {
    list(state, ReferenceKind::Route).await
}

pub async fn list_payment_methods(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ReferenceItem>>> {
    list(state, ReferenceKind::PaymentMethod).await
}

pub async fn list_terms_of_delivery(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ReferenceItem>>> {
    list(state, ReferenceKind::TermsOfDelivery).await
}

pub async fn list_item_types(State(state): State<AppState>) -> AppResult<Json<Vec<ReferenceItem>>> {
    list(state, ReferenceKind::ItemType).await
}

/// Statuses carry a badge color
pub async fn list_order_statuses(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<OrderStatus>>> {
    let service = ReferenceService::new(state.db.clone());
    Ok(Json(service.list_statuses().await?))
}
