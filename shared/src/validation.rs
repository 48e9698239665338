//! Input validation for bookings, allocation requests, and reports

use rust_decimal::Decimal;
use thiserror::Error;
use validator::Validate;

use crate::models::{CreateOrderInput, UpdateOrderInput};
use crate::types::DateRange;

/// A rejected request field
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Amounts
// ============================================================================

/// Amounts (weight, invoice value, charges) must not be negative
pub fn validate_non_negative(field: &str, value: Decimal) -> Result<(), FieldError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(FieldError::new(field, "Value cannot be negative"));
    }
    Ok(())
}

fn validate_optional_amount(field: &str, value: Option<Decimal>) -> Result<(), FieldError> {
    match value {
        Some(amount) => validate_non_negative(field, amount),
        None => Ok(()),
    }
}

fn validate_required_text(field: &str, value: &str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::new(field, "Value cannot be empty"));
    }
    Ok(())
}

// ============================================================================
// Orders
// ============================================================================

/// Validate a booking request before any lookup happens
pub fn validate_create_order(input: &CreateOrderInput) -> Result<(), FieldError> {
    if let Err(errors) = input.validate() {
        let mut field_errors: Vec<_> = errors.field_errors().into_iter().collect();
        field_errors.sort_by_key(|(field, _)| *field);
        if let Some((field, errors)) = field_errors.first() {
            let message = errors
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| "Invalid value".to_string());
            return Err(FieldError::new(to_camel_case(field), message));
        }
    }

    validate_required_text("fromName", &input.from_name)?;
    validate_required_text("toName", &input.to_name)?;
    validate_optional_amount("weight", input.weight)?;
    validate_optional_amount("invoiceValue", input.invoice_value)?;
    for (field, amount) in input.charges.named() {
        validate_non_negative(field, amount)?;
    }
    Ok(())
}

/// Validate the fields present in a partial update
pub fn validate_update_order(input: &UpdateOrderInput) -> Result<(), FieldError> {
    for (field, value) in input.required_text() {
        match value {
            Some(Some(text)) => validate_required_text(field, text)?,
            Some(None) => return Err(FieldError::new(field, "Value cannot be null")),
            None => {}
        }
    }

    if let Some(Some(quantity)) = input.quantity {
        if quantity < 0 {
            return Err(FieldError::new("quantity", "Quantity cannot be negative"));
        }
    }
    validate_optional_amount("weight", input.weight.flatten())?;
    validate_optional_amount("invoiceValue", input.invoice_value.flatten())?;
    for (field, amount) in input.charges() {
        validate_optional_amount(field, amount)?;
    }
    Ok(())
}

// ============================================================================
// Allocation and reports
// ============================================================================

pub fn validate_allocation_request(weight: Decimal, quantity: i32) -> Result<(), FieldError> {
    validate_non_negative("weight", weight)?;
    if quantity < 0 {
        return Err(FieldError::new("quantity", "Quantity cannot be negative"));
    }
    Ok(())
}

pub fn validate_date_range(range: &DateRange) -> Result<(), FieldError> {
    if range.start_date > range.end_date {
        return Err(FieldError::new(
            "startDate",
            "Start date must not be after end date",
        ));
    }
    Ok(())
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
