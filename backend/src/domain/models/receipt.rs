//! Domain model for a receipt.
//!
//! A receipt is created once, from a validated field set, and never changes
//! afterwards. The two display derivations used by the formatter live here so
//! that every consumer derives dates and amounts the same way.
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Maximum fractional digits shown in a display amount
const DISPLAY_FRACTION_DIGITS: u32 = 3;

/// Carriers the business ships with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Carrier {
    Ups,
    Dhl,
    Fedex,
    Aramex,
}

impl Carrier {
    pub const ALL: [Carrier; 4] = [Carrier::Ups, Carrier::Dhl, Carrier::Fedex, Carrier::Aramex];

    /// Storage code for this carrier
    pub fn code(&self) -> &'static str {
        match self {
            Carrier::Ups => "UPS",
            Carrier::Dhl => "DHL",
            Carrier::Fedex => "FEDEX",
            Carrier::Aramex => "ARAMEX",
        }
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown carrier: {0}")]
pub struct UnknownCarrier(pub String);

impl FromStr for Carrier {
    type Err = UnknownCarrier;

    /// Case-insensitive match on the carrier code, ignoring surrounding whitespace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Carrier::ALL
            .into_iter()
            .find(|carrier| carrier.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| UnknownCarrier(s.to_string()))
    }
}

/// A field set that passed validation and is ready to be persisted
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedReceipt {
    pub receipt_number: String,
    pub date: DateTime<Utc>,
    pub customer_name: String,
    pub amount_words: String,
    pub amount_numeric: Decimal,
    pub tracking_number: String,
    pub purpose: String,
    pub carrier: Carrier,
}

/// A persisted receipt
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptRecord {
    pub id: Uuid,
    pub receipt_number: String,
    pub date: DateTime<Utc>,
    pub customer_name: String,
    pub amount_words: String,
    pub amount_numeric: Decimal,
    pub tracking_number: String,
    pub purpose: String,
    /// Carrier code exactly as stored. Validated on the way in, but rows written
    /// by other tools may carry anything, so it is kept as text.
    pub carrier: String,
    pub created_at: DateTime<Utc>,
}

impl ReceiptRecord {
    /// Build the stored form of a validated field set. `id` and `created_at`
    /// come from the gateway.
    pub fn from_validated(validated: ValidatedReceipt, id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            receipt_number: validated.receipt_number,
            date: validated.date,
            customer_name: validated.customer_name,
            amount_words: validated.amount_words,
            amount_numeric: validated.amount_numeric,
            tracking_number: validated.tracking_number,
            purpose: validated.purpose,
            carrier: validated.carrier.code().to_string(),
            created_at,
        }
    }

    pub fn display_date(&self) -> String {
        display_date(&self.date)
    }

    pub fn display_amount(&self) -> String {
        display_amount(&self.amount_numeric)
    }
}

/// Calendar date of an instant as DD/MM/YYYY, always read in UTC
pub fn display_date(date: &DateTime<Utc>) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Grouped-thousands amount with at most three fractional digits.
///
/// `13000.5` becomes `13,000.5` and `15000.00` becomes `15,000`.
pub fn display_amount(amount: &Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(DISPLAY_FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let plain = rounded.abs().to_string();
    let (integer, fraction) = match plain.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (plain.as_str(), None),
    };

    let mut grouped = String::with_capacity(plain.len() + integer.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.push('-');
    }
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn test_display_amount_groups_thousands() {
        assert_eq!(display_amount(&dec("13000.5")), "13,000.5");
        assert_eq!(display_amount(&dec("15000")), "15,000");
        assert_eq!(display_amount(&dec("15000.00")), "15,000");
        assert_eq!(display_amount(&dec("999")), "999");
        assert_eq!(display_amount(&dec("1000")), "1,000");
        assert_eq!(display_amount(&dec("1234567.891")), "1,234,567.891");
        assert_eq!(display_amount(&dec("0.01")), "0.01");
    }

    #[test]
    fn test_display_amount_rounds_to_three_digits() {
        assert_eq!(display_amount(&dec("1.2345")), "1.235");
        assert_eq!(display_amount(&dec("2.0004")), "2");
        assert_eq!(display_amount(&dec("-1500.25")), "-1,500.25");
    }

    #[test]
    fn test_display_date_is_day_month_year() {
        let date = Utc.with_ymd_and_hms(2024, 3, 7, 0, 0, 0).unwrap();
        assert_eq!(display_date(&date), "07/03/2024");

        let late = Utc.with_ymd_and_hms(2024, 1, 15, 23, 59, 59).unwrap();
        assert_eq!(display_date(&late), "15/01/2024");
    }

    #[test]
    fn test_carrier_parsing_is_closed() {
        assert_eq!("DHL".parse::<Carrier>(), Ok(Carrier::Dhl));
        assert_eq!(" fedex ".parse::<Carrier>(), Ok(Carrier::Fedex));
        assert_eq!("Aramex".parse::<Carrier>(), Ok(Carrier::Aramex));
        assert!("USPS".parse::<Carrier>().is_err());
        assert!("".parse::<Carrier>().is_err());
    }

    #[test]
    fn test_from_validated_keeps_every_field() {
        let validated = ValidatedReceipt {
            receipt_number: "MC-10234".to_string(),
            date: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
            customer_name: "Ada Okafor".to_string(),
            amount_words: "Fifteen thousand naira only".to_string(),
            amount_numeric: dec("15000"),
            tracking_number: "LL99887766".to_string(),
            purpose: "Logistic Service".to_string(),
            carrier: Carrier::Dhl,
        };
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        let record = ReceiptRecord::from_validated(validated.clone(), id, created_at);

        assert_eq!(record.id, id);
        assert_eq!(record.created_at, created_at);
        assert_eq!(record.receipt_number, validated.receipt_number);
        assert_eq!(record.carrier, "DHL");
        assert_eq!(record.display_amount(), "15,000");
        assert_eq!(record.display_date(), "15/01/2024");
    }
}
