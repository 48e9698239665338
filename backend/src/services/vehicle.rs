//! Fleet service: vehicle listing and load allocation

use rust_decimal::Decimal;
use shared::{allocate_vehicle, validate_allocation_request, Vehicle, VehicleAllocation};
use sqlx::PgPool;

use crate::error::AppResult;

/// Vehicle service
#[derive(Clone)]
pub struct VehicleService {
    db: PgPool,
}

impl VehicleService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn list_vehicles(&self) -> AppResult<Vec<Vehicle>> {
        let rows = sqlx::query_as::<_, (i32, String, Decimal, i32)>(
            "SELECT id, name, max_weight, max_quantity FROM vehicles ORDER BY max_weight, max_quantity, id",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, max_weight, max_quantity)| Vehicle {
                id,
                name,
                max_weight,
                max_quantity,
            })
            .collect())
    }

    /// Smallest vehicle that carries the load, or the largest one with a warning
    pub async fn allocate(&self, weight: Decimal, quantity: i32) -> AppResult<VehicleAllocation> {
        validate_allocation_request(weight, quantity)?;
        let fleet = self.list_vehicles().await?;
        choose_vehicle(weight, quantity, &fleet)
    }
}

fn choose_vehicle(
    weight: Decimal,
    quantity: i32,
    fleet: &[Vehicle],
) -> AppResult<VehicleAllocation> {
    let allocation = allocate_vehicle(weight, quantity, fleet).map_err(|e| {
        tracing::error!("No vehicles found in the database");
        e
    })?;

    if allocation.exceeds_capacity() {
        tracing::warn!(
            "No suitable vehicle found for weight={}, quantity={}. Using largest: {}",
            weight,
            quantity,
            allocation.vehicle.name
        );
    } else {
        tracing::debug!(
            "Allocated {} for weight={}, quantity={}",
            allocation.vehicle.name,
            weight,
            quantity
        );
    }
    Ok(allocation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use shared::{default_fleet, CAPACITY_WARNING};

    #[test]
    fn test_choose_best_fit() {
        let allocation = choose_vehicle(Decimal::from(450), 30, &default_fleet()).unwrap();
        assert_eq!(allocation.vehicle.name, "Mini Van");
        assert!(!allocation.exceeds_capacity());
    }

    #[test]
    fn test_choose_oversized_load() {
        let allocation = choose_vehicle(Decimal::from(25_000), 10, &default_fleet()).unwrap();
        assert_eq!(allocation.vehicle.name, "Heavy Duty Truck");
        assert_eq!(allocation.warning.as_deref(), Some(CAPACITY_WARNING));
    }

    #[test]
    fn test_empty_fleet_is_not_found() {
        let err = choose_vehicle(Decimal::ONE, 1, &[]).unwrap_err();
        assert!(matches!(err, AppError::NotFound(resource) if resource == "Vehicle"));
    }
}
