use shared::{Receipt as SharedReceipt, ReceiptView};

use crate::domain::models::ReceiptRecord;
use crate::domain::ReceiptPreview;

pub struct ReceiptMapper;

impl ReceiptMapper {
    pub fn to_dto(domain: ReceiptRecord) -> SharedReceipt {
        SharedReceipt {
            id: domain.id.to_string(),
            receipt_number: domain.receipt_number,
            date: domain.date,
            customer_name: domain.customer_name,
            amount_words: domain.amount_words,
            amount_numeric: domain.amount_numeric,
            tracking_number: domain.tracking_number,
            purpose: domain.purpose,
            carrier: domain.carrier,
            created_at: domain.created_at,
        }
    }

    pub fn to_view(preview: ReceiptPreview) -> ReceiptView {
        ReceiptView {
            receipt: Self::to_dto(preview.record),
            rendered: preview.rendered,
        }
    }
}
