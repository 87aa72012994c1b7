//! Text encodings shared by the file and SQL backends.
//!
//! Instants are written as RFC 3339 in UTC with exactly six fractional digits,
//! so that lexical order equals chronological order. Amounts are written as
//! decimal strings so no precision is lost.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

pub fn encode_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_instant(value: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("invalid stored timestamp '{}'", value))?;
    Ok(parsed.with_timezone(&Utc))
}

pub fn encode_amount(amount: &Decimal) -> String {
    amount.to_string()
}

pub fn decode_amount(value: &str) -> Result<Decimal> {
    Decimal::from_str(value).with_context(|| format!("invalid stored amount '{}'", value))
}

pub fn decode_id(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value).with_context(|| format!("invalid stored receipt id '{}'", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_instants_sort_lexically() {
        let earlier = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        let later = earlier + chrono::Duration::microseconds(1);

        let (a, b) = (encode_instant(&earlier), encode_instant(&later));
        assert_eq!(a, "2024-01-15T09:00:00.000000Z");
        assert!(a < b);
        assert_eq!(decode_instant(&b).unwrap(), later);
    }

    #[test]
    fn test_amount_keeps_scale() {
        let amount = Decimal::from_str("13000.50").unwrap();
        assert_eq!(encode_amount(&amount), "13000.50");
        assert_eq!(decode_amount("13000.50").unwrap(), amount);
        assert!(decode_amount("lots").is_err());
    }
}
