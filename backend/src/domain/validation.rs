//! Receipt form validation.
//!
//! Turns the raw field set sent by the input collector into a
//! [`ValidatedReceipt`] or a map of every field that failed, keyed by field
//! name. Malformed input is an expected outcome here, so nothing in this module
//! panics or logs above `debug`.
//!
//! ## Rules
//!
//! - Text fields are trimmed; names, words, tracking numbers and purposes need
//!   at least two characters, the receipt number at least one.
//! - The date is a calendar day (`YYYY-MM-DD`) stored as UTC midnight. Full
//!   RFC 3339 timestamps are accepted too, kept to microseconds.
//! - A field sent with the wrong JSON type fails on that field only.
//! - The amount may arrive as a number or as text with grouping commas and the
//!   currency symbol; it must be greater than zero.
//! - The carrier must be one of the known carriers. Unknown values are rejected,
//!   never defaulted.
//! - `amountWords` is not compared with `amountNumeric`.

use chrono::{DateTime, NaiveDate, SubsecRound, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::{AmountInput, CreateReceiptRequest, TextInput, CURRENCY_SYMBOL};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use super::models::{Carrier, ValidatedReceipt};

/// Standard service description used when the form leaves the purpose unset
pub const DEFAULT_PURPOSE: &str = "Logistic Service";

/// Form fields, named as the input collector names them
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReceiptField {
    ReceiptNumber,
    Date,
    CustomerName,
    AmountWords,
    AmountNumeric,
    TrackingNumber,
    Purpose,
    Carrier,
}

impl ReceiptField {
    /// Key used in error maps
    pub fn key(&self) -> &'static str {
        match self {
            ReceiptField::ReceiptNumber => "receiptNumber",
            ReceiptField::Date => "date",
            ReceiptField::CustomerName => "customerName",
            ReceiptField::AmountWords => "amountWords",
            ReceiptField::AmountNumeric => "amountNumeric",
            ReceiptField::TrackingNumber => "trackingNumber",
            ReceiptField::Purpose => "purpose",
            ReceiptField::Carrier => "carrier",
        }
    }

    /// Label shown to the user
    pub fn label(&self) -> &'static str {
        match self {
            ReceiptField::ReceiptNumber => "Receipt number",
            ReceiptField::Date => "Date",
            ReceiptField::CustomerName => "Customer name",
            ReceiptField::AmountWords => "Amount in words",
            ReceiptField::AmountNumeric => "Amount",
            ReceiptField::TrackingNumber => "Tracking number",
            ReceiptField::Purpose => "Purpose",
            ReceiptField::Carrier => "Carrier",
        }
    }
}

impl fmt::Display for ReceiptField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Why a single field was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("is required")]
    Required,
    #[error("must be text, got {0}")]
    NotText(String),
    #[error("must be at least {min} characters")]
    TooShort { min: usize },
    #[error("must be a calendar date (YYYY-MM-DD), got '{0}'")]
    InvalidDate(String),
    #[error("must be a number, got '{0}'")]
    InvalidAmount(String),
    #[error("must be greater than 0")]
    AmountNotPositive,
    #[error("must be one of UPS, DHL, FEDEX, ARAMEX, got '{0}'")]
    UnknownCarrier(String),
}

/// Every rejected field of one submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<ReceiptField, FieldError>);

impl FieldErrors {
    pub fn insert(&mut self, field: ReceiptField, error: FieldError) {
        self.0.insert(field, error);
    }

    pub fn get(&self, field: ReceiptField) -> Option<&FieldError> {
        self.0.get(&field)
    }

    pub fn contains(&self, field: ReceiptField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = ReceiptField> + '_ {
        self.0.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// User-facing message per field key, e.g. `amountNumeric -> "Amount must be greater than 0"`
    pub fn messages(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|(field, error)| (field.key().to_string(), format!("{} {}", field.label(), error)))
            .collect()
    }

    /// Keep the value of a successful check, or record the failure under `field`
    fn capture<T>(&mut self, field: ReceiptField, result: Result<T, FieldError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.insert(field, error);
                None
            }
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.0.keys().map(ReceiptField::key).collect();
        write!(f, "invalid fields: {}", keys.join(", "))
    }
}

impl std::error::Error for FieldErrors {}

/// Validation settings
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationConfig {
    /// Minimum characters for free-text fields
    pub min_text_length: usize,
    pub default_purpose: String,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_text_length: 2,
            default_purpose: DEFAULT_PURPOSE.to_string(),
        }
    }
}

/// Validates raw receipt submissions
#[derive(Debug, Clone, Default)]
pub struct ReceiptValidator {
    config: ValidationConfig,
}

impl ReceiptValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a raw field set, reporting every failing field at once
    pub fn validate(&self, request: &CreateReceiptRequest) -> Result<ValidatedReceipt, FieldErrors> {
        let min = self.config.min_text_length;
        let mut errors = FieldErrors::default();

        let receipt_number = errors.capture(
            ReceiptField::ReceiptNumber,
            check_text(request.receipt_number.as_ref(), 1),
        );
        let date = errors.capture(
            ReceiptField::Date,
            text_of(request.date.as_ref()).and_then(parse_receipt_date),
        );
        let customer_name = errors.capture(
            ReceiptField::CustomerName,
            check_text(request.customer_name.as_ref(), min),
        );
        let amount_words = errors.capture(
            ReceiptField::AmountWords,
            check_text(request.amount_words.as_ref(), min),
        );
        let amount_numeric = errors.capture(
            ReceiptField::AmountNumeric,
            parse_amount(request.amount_numeric.as_ref()),
        );
        let tracking_number = errors.capture(
            ReceiptField::TrackingNumber,
            check_text(request.tracking_number.as_ref(), min),
        );
        let purpose = errors.capture(
            ReceiptField::Purpose,
            match request.purpose.as_ref() {
                None => Ok(self.config.default_purpose.clone()),
                Some(purpose) => check_text(Some(purpose), min),
            },
        );
        let carrier = errors.capture(
            ReceiptField::Carrier,
            text_of(request.carrier.as_ref()).and_then(parse_carrier),
        );

        match (
            receipt_number,
            date,
            customer_name,
            amount_words,
            amount_numeric,
            tracking_number,
            purpose,
            carrier,
        ) {
            (
                Some(receipt_number),
                Some(date),
                Some(customer_name),
                Some(amount_words),
                Some(amount_numeric),
                Some(tracking_number),
                Some(purpose),
                Some(carrier),
            ) if errors.is_empty() => Ok(ValidatedReceipt {
                receipt_number,
                date,
                customer_name,
                amount_words,
                amount_numeric,
                tracking_number,
                purpose,
                carrier,
            }),
            _ => {
                debug!("Receipt submission rejected: {}", errors);
                Err(errors)
            }
        }
    }
}

/// The text of a raw field, or `NotText` when it arrived as another JSON type
fn text_of(value: Option<&TextInput>) -> Result<Option<&str>, FieldError> {
    match value {
        None => Ok(None),
        Some(TextInput::Text(text)) => Ok(Some(text.as_str())),
        Some(TextInput::Other(other)) => Err(FieldError::NotText(json_kind(other).to_string())),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "text",
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Object(_) => "an object",
    }
}

fn check_text(value: Option<&TextInput>, min_chars: usize) -> Result<String, FieldError> {
    let trimmed = text_of(value)?.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(FieldError::Required);
    }
    if trimmed.chars().count() < min_chars {
        return Err(FieldError::TooShort { min: min_chars });
    }
    Ok(trimmed.to_string())
}

/// Normalize a form date to an absolute instant.
///
/// `YYYY-MM-DD` maps to UTC midnight of that day; RFC 3339 timestamps are
/// converted to UTC and truncated to microseconds, the precision storage keeps.
pub fn parse_receipt_date(value: Option<&str>) -> Result<DateTime<Utc>, FieldError> {
    let raw = value.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(FieldError::Required);
    }

    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return day
            .and_hms_opt(0, 0, 0)
            .map(|midnight| Utc.from_utc_datetime(&midnight))
            .ok_or_else(|| FieldError::InvalidDate(raw.to_string()));
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|instant| instant.with_timezone(&Utc).trunc_subsecs(6))
        .map_err(|_| FieldError::InvalidDate(raw.to_string()))
}

/// Coerce the raw amount to a positive decimal
pub fn parse_amount(value: Option<&AmountInput>) -> Result<Decimal, FieldError> {
    let raw = match value {
        None => return Err(FieldError::Required),
        Some(AmountInput::Number(number)) => number.to_string(),
        Some(AmountInput::Text(text)) => text.trim().to_string(),
        Some(AmountInput::Other(other)) => return Err(FieldError::InvalidAmount(other.to_string())),
    };

    // Same clean-up the money forms do: drop the symbol, grouping commas and spaces
    let cleaned: String = raw
        .replace(CURRENCY_SYMBOL, "")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    if cleaned.is_empty() {
        return Err(FieldError::Required);
    }

    let amount = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|_| FieldError::InvalidAmount(raw.clone()))?;

    if amount <= Decimal::ZERO {
        return Err(FieldError::AmountNotPositive);
    }
    Ok(amount)
}

fn parse_carrier(value: Option<&str>) -> Result<Carrier, FieldError> {
    let raw = value.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(FieldError::Required);
    }
    raw.parse::<Carrier>()
        .map_err(|unknown| FieldError::UnknownCarrier(unknown.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateReceiptRequest {
        CreateReceiptRequest {
            receipt_number: Some("MC-10234".into()),
            date: Some("2024-01-15".into()),
            customer_name: Some("Ada Okafor".into()),
            amount_words: Some("Fifteen thousand naira only".into()),
            amount_numeric: Some(AmountInput::from(15000_u64)),
            tracking_number: Some("LL99887766".into()),
            purpose: Some("Logistic Service".into()),
            carrier: Some("DHL".into()),
        }
    }

    fn error_keys(errors: &FieldErrors) -> Vec<ReceiptField> {
        errors.fields().collect()
    }

    #[test]
    fn test_valid_request_passes() {
        let validated = ReceiptValidator::new().validate(&valid_request()).unwrap();

        assert_eq!(validated.receipt_number, "MC-10234");
        assert_eq!(validated.customer_name, "Ada Okafor");
        assert_eq!(validated.amount_numeric, Decimal::from(15000));
        assert_eq!(validated.carrier, Carrier::Dhl);
        assert_eq!(validated.date.to_rfc3339(), "2024-01-15T00:00:00+00:00");
    }

    #[test]
    fn test_single_invalid_field_reports_only_that_field() {
        let cases: [(ReceiptField, fn(&mut CreateReceiptRequest)); 8] = [
            (ReceiptField::ReceiptNumber, |r| r.receipt_number = Some("  ".into())),
            (ReceiptField::Date, |r| r.date = Some("15/01/2024".into())),
            (ReceiptField::CustomerName, |r| r.customer_name = Some("A".into())),
            (ReceiptField::AmountWords, |r| r.amount_words = None),
            (ReceiptField::AmountNumeric, |r| r.amount_numeric = Some(AmountInput::from("twelve"))),
            (ReceiptField::TrackingNumber, |r| r.tracking_number = Some("L".into())),
            (ReceiptField::Purpose, |r| r.purpose = Some("".into())),
            (ReceiptField::Carrier, |r| r.carrier = Some("USPS".into())),
        ];

        for (field, break_field) in cases {
            let mut request = valid_request();
            break_field(&mut request);

            let errors = ReceiptValidator::new().validate(&request).unwrap_err();
            assert_eq!(error_keys(&errors), vec![field], "breaking {field}");
        }
    }

    #[test]
    fn test_all_violations_reported_together() {
        let request = CreateReceiptRequest {
            customer_name: Some("A".into()),
            amount_numeric: Some(AmountInput::from(0_u64)),
            carrier: Some("POSTNL".into()),
            ..valid_request()
        };

        let errors = ReceiptValidator::new().validate(&request).unwrap_err();

        assert_eq!(errors.len(), 3);
        assert!(errors.contains(ReceiptField::CustomerName));
        assert!(errors.contains(ReceiptField::AmountNumeric));
        assert!(errors.contains(ReceiptField::Carrier));
    }

    #[test]
    fn test_empty_request_reports_every_required_field() {
        let errors = ReceiptValidator::new()
            .validate(&CreateReceiptRequest::default())
            .unwrap_err();

        // purpose falls back to the default when absent
        assert_eq!(errors.len(), 7);
        assert!(!errors.contains(ReceiptField::Purpose));
        assert_eq!(errors.get(ReceiptField::Carrier), Some(&FieldError::Required));
    }

    #[test]
    fn test_zero_amount_is_rejected_on_amount_only() {
        let request = CreateReceiptRequest {
            amount_numeric: Some(AmountInput::from(0_u64)),
            ..valid_request()
        };

        let errors = ReceiptValidator::new().validate(&request).unwrap_err();

        assert_eq!(error_keys(&errors), vec![ReceiptField::AmountNumeric]);
        assert_eq!(
            errors.messages().get("amountNumeric").map(String::as_str),
            Some("Amount must be greater than 0")
        );
    }

    #[test]
    fn test_amount_coercion() {
        let parse = |text: &str| parse_amount(Some(&AmountInput::from(text)));

        assert_eq!(parse("13,000.50"), Ok(Decimal::from_str("13000.50").unwrap()));
        assert_eq!(parse("₦ 2 500"), Ok(Decimal::from(2500)));
        assert_eq!(parse("0.01"), Ok(Decimal::from_str("0.01").unwrap()));
        assert_eq!(parse("-4"), Err(FieldError::AmountNotPositive));
        assert_eq!(parse("abc"), Err(FieldError::InvalidAmount("abc".to_string())));
        assert_eq!(parse("   "), Err(FieldError::Required));
        assert_eq!(parse_amount(None), Err(FieldError::Required));

        let number: serde_json::Number = serde_json::from_str("13000.5").unwrap();
        assert_eq!(
            parse_amount(Some(&AmountInput::Number(number))),
            Ok(Decimal::from_str("13000.5").unwrap())
        );
    }

    #[test]
    fn test_purpose_defaults_when_unset() {
        let request = CreateReceiptRequest {
            purpose: None,
            ..valid_request()
        };

        let validated = ReceiptValidator::new().validate(&request).unwrap();
        assert_eq!(validated.purpose, DEFAULT_PURPOSE);

        let custom = ReceiptValidator::with_config(ValidationConfig {
            default_purpose: "Freight Forwarding".to_string(),
            ..ValidationConfig::default()
        });
        assert_eq!(custom.validate(&request).unwrap().purpose, "Freight Forwarding");
    }

    #[test]
    fn test_text_fields_are_trimmed() {
        let request = CreateReceiptRequest {
            customer_name: Some("  Ada Okafor ".into()),
            carrier: Some(" aramex ".into()),
            ..valid_request()
        };

        let validated = ReceiptValidator::new().validate(&request).unwrap();
        assert_eq!(validated.customer_name, "Ada Okafor");
        assert_eq!(validated.carrier, Carrier::Aramex);
    }

    #[test]
    fn test_date_normalization() {
        let midnight = parse_receipt_date(Some("2024-03-07")).unwrap();
        assert_eq!(midnight.to_rfc3339(), "2024-03-07T00:00:00+00:00");

        let instant = parse_receipt_date(Some("2024-03-07T10:30:00+01:00")).unwrap();
        assert_eq!(instant.to_rfc3339(), "2024-03-07T09:30:00+00:00");

        let precise = parse_receipt_date(Some("2024-03-07T10:30:00.1234567Z")).unwrap();
        assert_eq!(precise.to_rfc3339(), "2024-03-07T10:30:00.123456+00:00");

        assert_eq!(parse_receipt_date(None), Err(FieldError::Required));
        assert_eq!(
            parse_receipt_date(Some("2024-02-30")),
            Err(FieldError::InvalidDate("2024-02-30".to_string()))
        );
    }

    #[test]
    fn test_wrong_json_types_fail_on_their_own_fields() {
        let request: CreateReceiptRequest = serde_json::from_value(serde_json::json!({
            "receiptNumber": "MC-10234",
            "date": 20240115,
            "customerName": 5,
            "amountWords": "Fifteen thousand naira only",
            "amountNumeric": true,
            "trackingNumber": "LL99887766",
            "carrier": "DHL"
        }))
        .unwrap();

        let errors = ReceiptValidator::new().validate(&request).unwrap_err();

        assert_eq!(
            error_keys(&errors),
            vec![ReceiptField::Date, ReceiptField::CustomerName, ReceiptField::AmountNumeric]
        );
        assert_eq!(
            errors.get(ReceiptField::CustomerName),
            Some(&FieldError::NotText("a number".to_string()))
        );
        assert_eq!(
            errors.get(ReceiptField::AmountNumeric),
            Some(&FieldError::InvalidAmount("true".to_string()))
        );
    }
}
