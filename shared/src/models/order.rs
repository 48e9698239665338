//! Shipment order (LR entry) models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Six independent charges on an order, each defaulting to zero
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderCharges {
    #[serde(default, deserialize_with = "zero_if_null")]
    pub lr_charge: Decimal,
    #[serde(default, alias = "frightCharge", deserialize_with = "zero_if_null")]
    pub freight_charge: Decimal,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub fuel_surcharge: Decimal,
    /// Inter-state / export charge
    #[serde(default, deserialize_with = "zero_if_null")]
    pub ie_charge: Decimal,
    #[serde(default, deserialize_with = "zero_if_null")]
    pub door_delivery_charge: Decimal,
    /// Loading / unloading (hamali) charge
    #[serde(default, alias = "hamali", deserialize_with = "zero_if_null")]
    pub hamali_charge: Decimal,
}

impl OrderCharges {
    pub fn total(&self) -> Decimal {
        self.lr_charge
            + self.freight_charge
            + self.fuel_surcharge
            + self.ie_charge
            + self.door_delivery_charge
            + self.hamali_charge
    }

    /// (request field, amount) pairs, for validation
    pub fn named(&self) -> [(&'static str, Decimal); 6] {
        [
            ("lrCharge", self.lr_charge),
            ("freightCharge", self.freight_charge),
            ("fuelSurcharge", self.fuel_surcharge),
            ("ieCharge", self.ie_charge),
            ("doorDeliveryCharge", self.door_delivery_charge),
            ("hamaliCharge", self.hamali_charge),
        ]
    }
}

/// Booking request for a new order. Reference fields carry names.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderInput {
    #[validate(length(min = 1, message = "Sender name is required"))]
    pub from_name: String,
    pub from_address: Option<String>,
    pub from_district: Option<String>,
    pub from_phone: Option<String>,

    #[validate(length(min = 1, message = "Receiver name is required"))]
    pub to_name: String,
    pub to_address: Option<String>,
    pub to_district: Option<String>,
    pub to_phone: Option<String>,

    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: Option<i32>,
    pub weight: Option<Decimal>,
    #[validate(length(min = 1, message = "Item type is required"))]
    pub item_type: String,

    pub invoice_number: Option<String>,
    pub invoice_date: Option<NaiveDate>,
    pub invoice_value: Option<Decimal>,

    #[serde(flatten)]
    pub charges: OrderCharges,

    #[validate(length(min = 1, message = "Route is required"))]
    pub route: String,
    #[validate(length(min = 1, message = "Payment method is required"))]
    pub payment_method: String,
    #[serde(alias = "termsOfDelivery")]
    #[validate(length(min = 1, message = "Terms of delivery is required"))]
    pub terms_delivery: String,
    #[serde(rename = "eWayBill", alias = "ewayBill")]
    pub eway_bill: Option<String>,
}

/// Partial update of an order.
///
/// Every field is `Option<Option<T>>`: the outer `None` means the key was
/// absent and the column stays untouched, `Some(None)` is an explicit JSON
/// `null`. A null clears nullable columns, counts as zero for charges, and
/// is rejected for required text and reference names.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderInput {
    #[serde(default, deserialize_with = "present")]
    pub from_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub from_address: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub from_district: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub from_phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub to_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub to_address: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub to_district: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub to_phone: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    pub quantity: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub weight: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "present")]
    pub item_type: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    pub invoice_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub invoice_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "present")]
    pub invoice_value: Option<Option<Decimal>>,

    #[serde(default, deserialize_with = "present")]
    pub lr_charge: Option<Option<Decimal>>,
    #[serde(default, alias = "frightCharge", deserialize_with = "present")]
    pub freight_charge: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "present")]
    pub fuel_surcharge: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "present")]
    pub ie_charge: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "present")]
    pub door_delivery_charge: Option<Option<Decimal>>,
    #[serde(default, alias = "hamali", deserialize_with = "present")]
    pub hamali_charge: Option<Option<Decimal>>,

    #[serde(default, deserialize_with = "present")]
    pub route: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub payment_method: Option<Option<String>>,
    #[serde(default, alias = "termsOfDelivery", deserialize_with = "present")]
    pub terms_delivery: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub status: Option<Option<String>>,
    #[serde(
        default,
        rename = "eWayBill",
        alias = "ewayBill",
        deserialize_with = "present"
    )]
    pub eway_bill: Option<Option<String>>,
}

impl UpdateOrderInput {
    /// Charges present in the request, keyed by request field. A null
    /// charge is written as zero, as on create.
    pub fn charges(&self) -> [(&'static str, Option<Decimal>); 6] {
        [
            ("lrCharge", self.lr_charge),
            ("freightCharge", self.freight_charge),
            ("fuelSurcharge", self.fuel_surcharge),
            ("ieCharge", self.ie_charge),
            ("doorDeliveryCharge", self.door_delivery_charge),
            ("hamaliCharge", self.hamali_charge),
        ]
        .map(|(field, amount)| (field, amount.map(Option::unwrap_or_default)))
    }

    /// Fields that may be changed but never cleared
    pub fn required_text(&self) -> [(&'static str, Option<Option<&str>>); 7] {
        fn text(value: &Option<Option<String>>) -> Option<Option<&str>> {
            value.as_ref().map(Option::as_deref)
        }
        [
            ("fromName", text(&self.from_name)),
            ("toName", text(&self.to_name)),
            ("itemType", text(&self.item_type)),
            ("route", text(&self.route)),
            ("paymentMethod", text(&self.payment_method)),
            ("termsDelivery", text(&self.terms_delivery)),
            ("status", text(&self.status)),
        ]
    }
}

/// Identity of a freshly booked order
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrder {
    pub id: i32,
    pub lr_number: String,
}

/// Outcome of a partial update
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdated {
    pub id: i32,
    pub lr_number: String,
    /// False when the request carried nothing to write
    pub changed: bool,
}

fn zero_if_null<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Decimal>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Marks a field as present even when its value is `null`
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_charges_total() {
        let charges = OrderCharges {
            lr_charge: Decimal::new(5000, 2),
            freight_charge: Decimal::new(120000, 2),
            fuel_surcharge: Decimal::new(7550, 2),
            ie_charge: Decimal::ZERO,
            door_delivery_charge: Decimal::new(10000, 2),
            hamali_charge: Decimal::new(2500, 2),
        };
        assert_eq!(charges.total(), Decimal::new(145050, 2));
    }

    #[test]
    fn test_create_input_defaults_and_aliases() {
        let input: CreateOrderInput = serde_json::from_value(json!({
            "fromName": "Sri Murugan Traders",
            "fromDistrict": "Erode",
            "toName": "Lakshmi Stores",
            "itemType": "Textiles",
            "route": "Erode - Salem",
            "paymentMethod": "To Pay",
            "termsDelivery": "Door Delivery",
            "frightCharge": 450.5,
            "hamali": null,
            "eWayBill": "EWB123"
        }))
        .unwrap();

        assert_eq!(input.charges.freight_charge, Decimal::new(4505, 1));
        assert_eq!(input.charges.hamali_charge, Decimal::ZERO);
        assert_eq!(input.charges.lr_charge, Decimal::ZERO);
        assert_eq!(input.eway_bill.as_deref(), Some("EWB123"));
        assert!(input.quantity.is_none());
    }

    #[test]
    fn test_update_input_distinguishes_null_from_absent() {
        let input: UpdateOrderInput =
            serde_json::from_value(json!({ "weight": null, "toName": "Ravi" })).unwrap();
        assert_eq!(input.weight, Some(None));
        assert_eq!(input.quantity, None);
        assert_eq!(input.to_name, Some(Some("Ravi".to_string())));

        let input: UpdateOrderInput = serde_json::from_value(json!({ "weight": 12.5 })).unwrap();
        assert_eq!(input.weight, Some(Some(Decimal::new(125, 1))));
    }

    #[test]
    fn test_update_null_charge_counts_as_zero() {
        let input: UpdateOrderInput =
            serde_json::from_value(json!({ "lrCharge": null, "hamali": 30 })).unwrap();
        let charges = input.charges();
        assert_eq!(charges[0], ("lrCharge", Some(Decimal::ZERO)));
        assert_eq!(charges[1], ("freightCharge", None));
        assert_eq!(charges[5], ("hamaliCharge", Some(Decimal::from(30))));
    }

    #[test]
    fn test_update_null_text_is_present() {
        let input: UpdateOrderInput =
            serde_json::from_value(json!({ "fromName": null, "eWayBill": null })).unwrap();
        assert_eq!(input.from_name, Some(None));
        assert_eq!(input.eway_bill, Some(None));
        assert_eq!(input.to_name, None);
        assert_eq!(input.required_text()[0], ("fromName", Some(None)));
    }

    #[test]
    fn test_created_order_serializes_camel_case() {
        let created = CreatedOrder {
            id: 101,
            lr_number: "N2KE101".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&created).unwrap(),
            json!({ "id": 101, "lrNumber": "N2KE101" })
        );
    }
}
