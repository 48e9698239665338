//! Order booking HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use shared::{CreateOrderInput, ExportFormat, UpdateOrderInput};

use crate::error::AppResult;
use crate::repository::{OrderDetails, PgOrderStore};
use crate::services::{OrderService, ReportingService};
use crate::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub format: ExportFormat,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: i32,
    pub lr_number: String,
    pub message: String,
}

fn order_service(state: &AppState) -> OrderService<PgOrderStore> {
    OrderService::new(PgOrderStore::new(state.db.clone()))
}

/// List all orders, newest first; `?format=csv` downloads them
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<impl IntoResponse> {
    let orders = order_service(&state).list_orders().await?;

    match query.format {
        ExportFormat::Csv => {
            let csv = ReportingService::export_to_csv(&orders)?;
            Ok((
                [
                    (header::CONTENT_TYPE, "text/csv"),
                    (header::CONTENT_DISPOSITION, "attachment; filename=\"orders.csv\""),
                ],
                csv,
            )
                .into_response())
        }
        ExportFormat::Json => Ok(Json(orders).into_response()),
    }
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<OrderDetails>> {
    Ok(Json(order_service(&state).get_order(id).await?))
}

/// Public tracking lookup by LR number
pub async fn track_order(
    State(state): State<AppState>,
    Path(lr_number): Path<String>,
) -> AppResult<Json<OrderDetails>> {
    Ok(Json(order_service(&state).get_order_by_lr_number(&lr_number).await?))
}

/// Book a new order
pub async fn create_order(
    State(state): State<AppState>,
    Json(input): Json<CreateOrderInput>,
) -> AppResult<impl IntoResponse> {
    let created = order_service(&state).create_order(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderResponse {
            id: created.id,
            lr_number: created.lr_number,
            message: "Order created successfully".to_string(),
        }),
    ))
}

/// Partially update an order
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<UpdateOrderInput>,
) -> AppResult<Json<OrderResponse>> {
    let updated = order_service(&state).update_order(id, input).await?;

    let message = if updated.changed {
        "Order updated successfully"
    } else {
        "No fields provided to update"
    };
    Ok(Json(OrderResponse {
        id: updated.id,
        lr_number: updated.lr_number,
        message: message.to_string(),
    }))
}

pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<serde_json::Value>> {
    order_service(&state).delete_order(id).await?;
    Ok(Json(serde_json::json!({ "message": "Order deleted successfully" })))
}
