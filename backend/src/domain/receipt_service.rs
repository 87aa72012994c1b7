//! Receipt workflow.
//!
//! Orchestrates a submission from raw form fields to a stored, rendered
//! receipt, and re-renders stored receipts for the history and preview views.

use rand::Rng;
use shared::{CreateReceiptRequest, RenderedReceipt};
use tracing::info;

use super::models::ReceiptRecord;
use super::receipt_gateway::{ReceiptGateway, StoreError};
use super::rendering::ReceiptFormatter;
use super::validation::{FieldErrors, ReceiptValidator};

/// Range of the numeric part of suggested receipt numbers
const SUGGESTED_NUMBER_RANGE: std::ops::RangeInclusive<u32> = 10000..=99999;

/// A stored receipt together with its rendering. Owned by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptPreview {
    pub record: ReceiptRecord,
    pub rendered: RenderedReceipt,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("{0}")]
    Validation(FieldErrors),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct ReceiptService {
    validator: ReceiptValidator,
    gateway: ReceiptGateway,
    formatter: ReceiptFormatter,
    number_prefix: String,
}

impl ReceiptService {
    pub fn new(validator: ReceiptValidator, gateway: ReceiptGateway, number_prefix: impl Into<String>) -> Self {
        Self {
            validator,
            gateway,
            formatter: ReceiptFormatter::new(),
            number_prefix: number_prefix.into(),
        }
    }

    /// Validate without storing anything
    pub fn validate(&self, request: &CreateReceiptRequest) -> Result<(), FieldErrors> {
        self.validator.validate(request).map(|_| ())
    }

    /// Validate, store and render a new receipt. Nothing is stored when validation fails.
    pub async fn submit(&self, request: &CreateReceiptRequest) -> Result<ReceiptPreview, SubmitError> {
        let validated = self.validator.validate(request).map_err(SubmitError::Validation)?;

        let record = self.gateway.create(validated).await?;
        info!("Issued receipt {} for {}", record.receipt_number, record.customer_name);
        Ok(self.preview_of(record))
    }

    /// Every stored receipt, newest first, rendered
    pub async fn history(&self) -> Result<Vec<ReceiptPreview>, StoreError> {
        let records = self.gateway.list_all().await?;
        Ok(records.into_iter().map(|record| self.preview_of(record)).collect())
    }

    pub async fn preview(&self, id: &str) -> Result<Option<ReceiptPreview>, StoreError> {
        let record = self.gateway.get_by_id(id).await?;
        Ok(record.map(|record| self.preview_of(record)))
    }

    /// A fresh receipt number for a new form, e.g. `MC-48213`. Not checked against stored receipts.
    pub fn suggest_receipt_number(&self) -> String {
        let number = rand::thread_rng().gen_range(SUGGESTED_NUMBER_RANGE);
        format!("{}{}", self.number_prefix, number)
    }

    fn preview_of(&self, record: ReceiptRecord) -> ReceiptPreview {
        let rendered = self.formatter.format(&record);
        ReceiptPreview { record, rendered }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::ReceiptField;
    use crate::storage::MemoryReceiptRepository;
    use rust_decimal::Decimal;
    use shared::{AmountInput, CarrierBadge};
    use std::sync::Arc;

    fn service() -> ReceiptService {
        let gateway = ReceiptGateway::new(Arc::new(MemoryReceiptRepository::new()));
        ReceiptService::new(ReceiptValidator::new(), gateway, "MC-")
    }

    fn ada_request() -> CreateReceiptRequest {
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

    #[tokio::test]
    async fn test_submit_then_history_and_preview() {
        let service = service();

        let issued = service.submit(&ada_request()).await.unwrap();

        assert_eq!(issued.record.amount_numeric, Decimal::from(15000));
        assert_eq!(issued.rendered.display_date, "15/01/2024");
        assert_eq!(issued.rendered.display_amount, "15,000");
        assert_eq!(issued.rendered.customer_name, "ADA OKAFOR");
        assert_eq!(issued.rendered.carrier_badge, CarrierBadge::Dhl);

        let history = service.history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0], issued);

        let preview = service.preview(&issued.record.id.to_string()).await.unwrap();
        assert_eq!(preview, Some(issued));
    }

    #[tokio::test]
    async fn test_rejected_submission_stores_nothing() {
        let service = service();
        service.submit(&ada_request()).await.unwrap();

        let request = CreateReceiptRequest {
            amount_numeric: Some(AmountInput::from(0_u64)),
            ..ada_request()
        };

        match service.submit(&request).await {
            Err(SubmitError::Validation(errors)) => {
                assert_eq!(errors.fields().collect::<Vec<_>>(), vec![ReceiptField::AmountNumeric]);
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
        assert_eq!(service.history().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_history_is_newest_first() {
        let service = service();
        for number in ["MC-1", "MC-2", "MC-3"] {
            let request = CreateReceiptRequest {
                receipt_number: Some(number.into()),
                ..ada_request()
            };
            service.submit(&request).await.unwrap();
        }

        let numbers: Vec<String> = service
            .history()
            .await
            .unwrap()
            .into_iter()
            .map(|preview| preview.rendered.receipt_number)
            .collect();
        assert_eq!(numbers, vec!["MC-3", "MC-2", "MC-1"]);
    }

    #[tokio::test]
    async fn test_preview_of_unknown_id_is_none() {
        let service = service();
        assert_eq!(service.preview("missing").await.unwrap(), None);
    }

    #[test]
    fn test_validate_only() {
        let service = service();
        assert!(service.validate(&ada_request()).is_ok());
        assert!(service.validate(&CreateReceiptRequest::default()).is_err());
    }

    #[test]
    fn test_suggested_numbers() {
        let service = service();
        for _ in 0..50 {
            let suggested = service.suggest_receipt_number();
            let digits = suggested.strip_prefix("MC-").unwrap();
            let value: u32 = digits.parse().unwrap();
            assert!(SUGGESTED_NUMBER_RANGE.contains(&value));
        }
    }
}
