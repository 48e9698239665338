//! Fleet vehicles and best-fit allocation

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Warning attached when no vehicle can carry the whole shipment
pub const CAPACITY_WARNING: &str =
    "Warning: Order may exceed capacity of the largest available vehicle.";

/// A vehicle and its carrying capacity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: i32,
    pub name: String,
    /// Maximum load in kg
    pub max_weight: Decimal,
    /// Maximum number of packages
    pub max_quantity: i32,
}

impl Vehicle {
    /// Whether this vehicle covers both the weight and the quantity
    pub fn can_carry(&self, weight: Decimal, quantity: i32) -> bool {
        self.max_weight >= weight && self.max_quantity >= quantity
    }
}

/// Result of an allocation: the chosen vehicle and an optional warning
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VehicleAllocation {
    pub vehicle: Vehicle,
    #[serde(rename = "message", skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl VehicleAllocation {
    pub fn exceeds_capacity(&self) -> bool {
        self.warning.is_some()
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AllocationError {
    #[error("No vehicles found in the fleet")]
    NoVehicles,
}

fn by_capacity(a: &Vehicle, b: &Vehicle) -> Ordering {
    a.max_weight
        .cmp(&b.max_weight)
        .then(a.max_quantity.cmp(&b.max_quantity))
}

/// Pick the smallest vehicle that carries both `weight` and `quantity`.
///
/// Ties on capacity go to the lowest id. When nothing fits, the largest
/// vehicle is returned together with [`CAPACITY_WARNING`].
pub fn allocate_vehicle(
    weight: Decimal,
    quantity: i32,
    fleet: &[Vehicle],
) -> Result<VehicleAllocation, AllocationError> {
    let best_fit = fleet
        .iter()
        .filter(|v| v.can_carry(weight, quantity))
        .min_by(|a, b| by_capacity(a, b).then(a.id.cmp(&b.id)));

    if let Some(vehicle) = best_fit {
        return Ok(VehicleAllocation {
            vehicle: vehicle.clone(),
            warning: None,
        });
    }

    fleet
        .iter()
        .max_by(|a, b| by_capacity(a, b).then(b.id.cmp(&a.id)))
        .map(|vehicle| VehicleAllocation {
            vehicle: vehicle.clone(),
            warning: Some(CAPACITY_WARNING.to_string()),
        })
        .ok_or(AllocationError::NoVehicles)
}

/// Standard fleet used by the booking page when the server fleet is unavailable
pub fn default_fleet() -> Vec<Vehicle> {
    vec![
        Vehicle {
            id: 1,
            name: "Delivery Bike".to_string(),
            max_weight: Decimal::from(20),
            max_quantity: 5,
        },
        Vehicle {
            id: 2,
            name: "Mini Van".to_string(),
            max_weight: Decimal::from(500),
            max_quantity: 50,
        },
        Vehicle {
            id: 3,
            name: "Delivery Truck".to_string(),
            max_weight: Decimal::from(2000),
            max_quantity: 200,
        },
        Vehicle {
            id: 4,
            name: "Heavy Duty Truck".to_string(),
            max_weight: Decimal::from(10000),
            max_quantity: 1000,
        },
    ]
}
