//! WebAssembly module for the N2K Logistics booking page
//!
//! Provides client-side computation for:
//! - LR number previews
//! - Vehicle allocation
//! - Charge totals
//! - Offline booking validation

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::log_1(&JsValue::from_str("N2K booking module loaded"));
}

fn to_decimal(field: &str, value: f64) -> Result<Decimal, String> {
    if !value.is_finite() {
        return Err(format!("{}: Value must be a finite number", field));
    }
    Decimal::try_from(value).map_err(|e| format!("{}: {}", field, e))
}

/// LR number the order would receive if it were booked with `order_id`
#[wasm_bindgen]
pub fn generate_lr_number_preview(from_district: Option<String>, order_id: i32) -> String {
    generate_lr_number(from_district.as_deref(), order_id)
}

fn allocate_json(weight: f64, quantity: i32, fleet: &[Vehicle]) -> Result<String, String> {
    let weight = to_decimal("weight", weight)?;
    validate_allocation_request(weight, quantity).map_err(|e| e.to_string())?;
    let allocation =
        shared::allocate_vehicle(weight, quantity, fleet).map_err(|e| e.to_string())?;
    serde_json::to_string(&allocation).map_err(|e| e.to_string())
}

/// Allocate against a fleet given as a JSON array of vehicles.
/// Returns `{"vehicle": {...}, "message"?: "..."}` as JSON.
#[wasm_bindgen]
pub fn allocate_vehicle(weight: f64, quantity: i32, fleet_json: &str) -> Result<String, JsValue> {
    let fleet: Vec<Vehicle> = serde_json::from_str(fleet_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid fleet JSON: {}", e)))?;
    allocate_json(weight, quantity, &fleet).map_err(|e| JsValue::from_str(&e))
}

/// Allocate against the standard fleet
#[wasm_bindgen]
pub fn allocate_default_vehicle(weight: f64, quantity: i32) -> Result<String, JsValue> {
    allocate_json(weight, quantity, &default_fleet()).map_err(|e| JsValue::from_str(&e))
}

fn total_charges(charges_json: &str) -> Result<Decimal, String> {
    let charges: OrderCharges =
        serde_json::from_str(charges_json).map_err(|e| format!("Invalid charges JSON: {}", e))?;
    Ok(charges.total())
}

/// Sum of the six order charges; missing or null charges count as zero
#[wasm_bindgen]
pub fn calculate_total_charges(charges_json: &str) -> Result<f64, JsValue> {
    let total = total_charges(charges_json).map_err(|e| JsValue::from_str(&e))?;
    Ok(total.to_f64().unwrap_or(0.0))
}

/// Efficiency score an order in `status` contributes to route reports
#[wasm_bindgen]
pub fn route_efficiency_score(status: &str) -> f64 {
    efficiency_score(status).to_f64().unwrap_or(0.0)
}

#[derive(Serialize)]
struct BookingCheck {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// Validate a booking form before submitting it.
/// Returns `{"valid": true}` or `{"valid": false, "field", "message"}`.
#[wasm_bindgen]
pub fn validate_booking(booking_json: &str) -> String {
    let check = match serde_json::from_str::<CreateOrderInput>(booking_json) {
        Ok(input) => match validate_create_order(&input) {
            Ok(()) => BookingCheck {
                valid: true,
                field: None,
                message: None,
            },
            Err(e) => BookingCheck {
                valid: false,
                field: Some(e.field),
                message: Some(e.message),
            },
        },
        Err(e) => BookingCheck {
            valid: false,
            field: None,
            message: Some(format!("Invalid booking JSON: {}", e)),
        },
    };
    serde_json::to_string(&check).unwrap_or_else(|_| r#"{"valid":false}"#.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lr_number_preview() {
        assert_eq!(generate_lr_number_preview(Some("erode".into()), 101), "N2KE101");
        assert_eq!(generate_lr_number_preview(None, 7), "N2KX7");
    }

    #[test]
    fn test_allocate_against_default_fleet() {
        let json = allocate_json(120.0, 8, &default_fleet()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["vehicle"]["name"], "Mini Van");
        assert!(value.get("message").is_none());
    }

    #[test]
    fn test_allocate_rejects_negative_load() {
        let err = allocate_json(-5.0, -3, &default_fleet()).unwrap_err();
        assert!(err.starts_with("weight"));

        let err = allocate_json(5.0, -3, &default_fleet()).unwrap_err();
        assert!(err.starts_with("quantity"));
    }

    #[test]
    fn test_allocate_rejects_non_finite_weight() {
        assert!(allocate_json(f64::NAN, 1, &default_fleet()).is_err());
        assert!(allocate_json(f64::INFINITY, 1, &default_fleet()).is_err());
    }

    #[test]
    fn test_allocate_empty_fleet() {
        assert!(allocate_json(1.0, 1, &[]).is_err());
    }

    #[test]
    fn test_total_charges() {
        let total = total_charges(r#"{"lrCharge": 50, "freightCharge": 1200.5, "hamali": 30}"#);
        assert_eq!(total.unwrap(), Decimal::new(12805, 1));
        assert!(total_charges("not json").is_err());
    }

    #[test]
    fn test_route_efficiency_score() {
        assert_eq!(route_efficiency_score("Delivered"), 100.0);
        assert_eq!(route_efficiency_score("Lost"), 25.0);
    }

    #[test]
    fn test_validate_booking() {
        let ok = validate_booking(
            r#"{"fromName": "A", "toName": "B", "itemType": "Textiles",
                "route": "Erode - Salem", "paymentMethod": "Paid", "termsDelivery": "Door Delivery"}"#,
        );
        assert_eq!(ok, r#"{"valid":true}"#);

        let missing = validate_booking(
            r#"{"fromName": "A", "toName": "", "itemType": "Textiles",
                "route": "Erode - Salem", "paymentMethod": "Paid", "termsDelivery": "Door Delivery"}"#,
        );
        let value: serde_json::Value = serde_json::from_str(&missing).unwrap();
        assert_eq!(value["valid"], false);
        assert_eq!(value["field"], "toName");
    }
}
