//! Lorry Receipt (LR) number generation

/// Organization prefix carried by every LR number
pub const LR_PREFIX: &str = "N2K";

/// District code used when the origin district is missing or empty
pub const FALLBACK_DISTRICT_CODE: char = 'X';

/// Prefix of the temporary value written before the order id is known
pub const PROVISIONAL_PREFIX: &str = "TEMP-";

/// District code: first character of the district, upper-cased.
///
/// Non-letters pass through unchanged. Some characters upper-case to more
/// than one character (e.g. "ß" -> "SS"), which is kept as-is.
pub fn district_code(from_district: Option<&str>) -> String {
    match from_district.and_then(|district| district.chars().next()) {
        Some(first) => first.to_uppercase().collect(),
        None => FALLBACK_DISTRICT_CODE.to_string(),
    }
}

/// Generate the LR number for an order: `N2K` + district code + order id.
///
/// e.g. `generate_lr_number(Some("Erode"), 101) == "N2KE101"`
pub fn generate_lr_number(from_district: Option<&str>, order_id: i32) -> String {
    format!("{}{}{}", LR_PREFIX, district_code(from_district), order_id)
}

/// Placeholder written into the non-nullable `lr_number` column until the
/// real value can be derived from the store-assigned id.
pub fn provisional_lr_number(timestamp_millis: i64, suffix: &str) -> String {
    format!("{}{}-{}", PROVISIONAL_PREFIX, timestamp_millis, suffix)
}

pub fn is_provisional_lr_number(lr_number: &str) -> bool {
    lr_number.starts_with(PROVISIONAL_PREFIX)
}
