//! Field normalization applied to gateway payloads before forwarding.
//!
//! Gateways disagree on formatting for phones, documents, and timestamps.
//! Everything the relay sends downstream goes through these helpers so the
//! attribution platform sees one consistent shape regardless of source.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Placeholder used when a gateway omits a customer or product name.
pub const MISSING_NAME: &str = "N/A";

/// Prefix for product ids generated when the gateway sends none.
pub const GENERATED_PRODUCT_PREFIX: &str = "prod";

/// Longest national phone number in Brazil: 2-digit area code plus 9 digits.
const MAX_NATIONAL_PHONE_LEN: usize = 11;

/// Strips every non-digit character from a string.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Normalizes a phone number to its national form: digits only, with the
/// `55` country code removed when present.
///
/// The code is only stripped when the digit count exceeds the longest
/// national number, so an 11-digit number that happens to start with 55
/// (an area-code-55 subscriber) is left alone.
pub fn normalize_phone(raw: &str) -> String {
    let digits = digits_only(raw);
    if digits.len() > MAX_NATIONAL_PHONE_LEN && digits.starts_with("55") {
        digits[2..].to_string()
    } else {
        digits
    }
}

/// Normalizes a CPF/CNPJ document to digits only.
pub fn normalize_document(raw: &str) -> String {
    digits_only(raw)
}

/// Returns the trimmed name, or the placeholder when missing or blank.
pub fn name_or_placeholder(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => MISSING_NAME.to_string(),
    }
}

/// Generates a product id for payloads that arrive without one. Millisecond
/// resolution keeps ids distinct across webhooks without any shared state.
pub fn generated_product_id() -> String {
    format!("{}-{}", GENERATED_PRODUCT_PREFIX, Utc::now().timestamp_millis())
}

/// Formats a timestamp the way the attribution platform expects it.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Parses a gateway timestamp and reformats it, substituting the current
/// time when the field is absent or unparseable.
pub fn normalize_timestamp(raw: Option<&str>) -> String {
    let ts = raw.and_then(parse_timestamp).unwrap_or_else(Utc::now);
    format_timestamp(ts)
}

/// Accepts RFC 3339 (what both gateways document) and the already-normalized
/// `YYYY-MM-DD HH:MM:SS` form (what some of them actually send).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}
