//! Fleet handlers

use axum::{
    extract::{Query, State},
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::{Vehicle, VehicleAllocation};

use crate::error::{AppError, AppResult};
use crate::services::VehicleService;
use crate::AppState;

#[derive(Deserialize)]
pub struct AllocationQuery {
    pub weight: Option<String>,
    pub quantity: Option<String>,
}

fn required<T: std::str::FromStr>(field: &str, value: Option<&str>) -> AppResult<T> {
    value
        .and_then(|v| v.trim().parse().ok())
        .ok_or_else(|| AppError::Validation {
            field: field.to_string(),
            message: format!("{} is required and must be a number", field),
        })
}

pub async fn list_vehicles(State(state): State<AppState>) -> AppResult<Json<Vec<Vehicle>>> {
    let service = VehicleService::new(state.db.clone());
    Ok(Json(service.list_vehicles().await?))
}

/// `GET /vehicle-allocation?weight=&quantity=`
pub async fn allocate_vehicle(
    State(state): State<AppState>,
    Query(query): Query<AllocationQuery>,
) -> AppResult<Json<VehicleAllocation>> {
    let weight: Decimal = required("weight", query.weight.as_deref())?;
    let quantity: i32 = required("quantity", query.quantity.as_deref())?;

    let service = VehicleService::new(state.db.clone());
    Ok(Json(service.allocate(weight, quantity).await?))
}
