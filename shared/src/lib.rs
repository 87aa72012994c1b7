use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Currency symbol printed next to the display amount. Never embedded in the amount itself.
pub const CURRENCY_SYMBOL: &str = "₦";

/// Placeholder printed for an empty text field on a receipt
pub const PLACEHOLDER_LINE: &str = "........................................................";

/// A stored receipt as exchanged with the input collector and the history view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Opaque identifier assigned by the store
    pub id: String,
    /// Human-readable receipt code supplied by the caller (e.g. "MC-10234")
    pub receipt_number: String,
    /// Calendar date of the payment, stored as UTC midnight of that day
    pub date: DateTime<Utc>,
    /// Name of the payer ("Received From")
    pub customer_name: String,
    /// Amount spelled out in words ("The Sum of")
    pub amount_words: String,
    /// Amount as a decimal quantity
    pub amount_numeric: Decimal,
    /// Shipment tracking number
    pub tracking_number: String,
    /// What the payment is for ("Being Payment for")
    pub purpose: String,
    /// Carrier code as stored (UPS, DHL, FEDEX, ARAMEX)
    pub carrier: String,
    /// When the store persisted this receipt
    pub created_at: DateTime<Utc>,
}

/// Raw amount as typed into the form: a JSON number, free-form text, or any
/// other JSON value, which validation rejects on this field alone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(serde_json::Number),
    Text(String),
    Other(serde_json::Value),
}

impl From<&str> for AmountInput {
    fn from(value: &str) -> Self {
        AmountInput::Text(value.to_string())
    }
}

impl From<u64> for AmountInput {
    fn from(value: u64) -> Self {
        AmountInput::Number(value.into())
    }
}

/// Raw text field. Values of the wrong JSON type are kept so validation can
/// report them against their field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextInput {
    Text(String),
    Other(serde_json::Value),
}

impl TextInput {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TextInput::Text(text) => Some(text),
            TextInput::Other(_) => None,
        }
    }
}

impl From<&str> for TextInput {
    fn from(value: &str) -> Self {
        TextInput::Text(value.to_string())
    }
}

impl From<String> for TextInput {
    fn from(value: String) -> Self {
        TextInput::Text(value)
    }
}

/// Raw field set submitted by the input collector. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateReceiptRequest {
    pub receipt_number: Option<TextInput>,
    /// Date-only string (YYYY-MM-DD)
    pub date: Option<TextInput>,
    pub customer_name: Option<TextInput>,
    pub amount_words: Option<TextInput>,
    pub amount_numeric: Option<AmountInput>,
    pub tracking_number: Option<TextInput>,
    /// Falls back to the standard service description when absent
    pub purpose: Option<TextInput>,
    pub carrier: Option<TextInput>,
}

/// Closed set of carrier badges shown in the receipt header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CarrierBadge {
    #[default]
    Ups,
    Dhl,
    Fedex,
    Aramex,
}

impl CarrierBadge {
    /// Logo asset for this badge
    pub fn asset_path(&self) -> &'static str {
        match self {
            CarrierBadge::Ups => "/images/ups-logo.png",
            CarrierBadge::Dhl => "/images/dhl-logo.png",
            CarrierBadge::Fedex => "/images/fedex-logo.png",
            CarrierBadge::Aramex => "/images/aramex-logo.png",
        }
    }

    /// Tag printed on the badge
    pub fn label(&self) -> &'static str {
        match self {
            CarrierBadge::Ups => "UPS",
            CarrierBadge::Dhl => "DHL",
            CarrierBadge::Fedex => "FEDEX",
            CarrierBadge::Aramex => "ARAMEX",
        }
    }
}

impl fmt::Display for CarrierBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A receipt formatted for display. Consumers lay these strings out as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedReceipt {
    pub receipt_id: String,
    pub receipt_number: String,
    /// DD/MM/YYYY
    pub display_date: String,
    /// Upper-cased payer name
    pub customer_name: String,
    /// Upper-cased amount in words
    pub amount_words: String,
    /// Grouped-thousands amount without currency symbol (e.g. "13,000.5")
    pub display_amount: String,
    pub tracking_number: String,
    pub purpose: String,
    /// Carrier code exactly as stored
    pub carrier: String,
    pub carrier_badge: CarrierBadge,
    /// Title used when printing/exporting (e.g. "Receipt-MC-10234")
    pub document_title: String,
}

/// A stored receipt paired with its rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptView {
    pub receipt: Receipt,
    pub rendered: RenderedReceipt,
}

/// History listing, most recent first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptListResponse {
    pub receipts: Vec<ReceiptView>,
    pub count: usize,
}

/// Field-keyed validation failures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationErrorResponse {
    pub message: String,
    pub errors: BTreeMap<String, String>,
}

/// Result of the validation-only endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResponse {
    pub is_valid: bool,
    pub errors: BTreeMap<String, String>,
}

/// Generic failure body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
}

/// Suggested receipt number for a fresh form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptNumberResponse {
    pub receipt_number: String,
}

/// Outcome of exporting one receipt as a printable document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReceiptResponse {
    pub file_name: String,
    pub file_path: String,
    pub page_count: usize,
    pub bytes_written: usize,
}
