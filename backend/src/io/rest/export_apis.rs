//! # REST API for Receipt Export
//!
//! Endpoints for exporting a receipt as a printable document and the receipt
//! history as a CSV file.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use chrono::Utc;
use shared::{ErrorResponse, ExportReceiptResponse, RenderedReceipt};
use tracing::{error, info};

use crate::AppState;

/// Write the printable document for one receipt
pub async fn export_receipt(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("POST /api/receipts/{}/export", id);

    let preview = match state.receipt_service.preview(&id).await {
        Ok(Some(preview)) => preview,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Receipt {} not found", id),
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!("Failed to fetch receipt {} for export: {}", id, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error: e.to_string() })).into_response();
        }
    };

    match state.export_service.export_receipt(&preview.rendered).await {
        Ok(artifact) => {
            let response = ExportReceiptResponse {
                file_name: artifact.file_name,
                file_path: artifact.path.display().to_string(),
                page_count: artifact.page_count,
                bytes_written: artifact.bytes_written,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Failed to export receipt {}: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to export receipt".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Download the receipt history as CSV
pub async fn export_history_csv(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/receipts/export/csv");

    let previews = match state.receipt_service.history().await {
        Ok(previews) => previews,
        Err(e) => {
            error!("Failed to load history for export: {}", e);
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error: e.to_string() })).into_response();
        }
    };

    let rendered: Vec<RenderedReceipt> = previews.into_iter().map(|preview| preview.rendered).collect();
    match state.export_service.export_history_csv(&rendered, Utc::now()) {
        Ok(csv) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", csv.file_name),
                ),
            ],
            csv.content,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to export receipt history: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to export receipt history".to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_state;
    use axum::body::to_bytes;
    use shared::{AmountInput, CreateReceiptRequest};

    fn request(receipt_number: &str, customer_name: &str) -> CreateReceiptRequest {
        CreateReceiptRequest {
            receipt_number: Some(receipt_number.into()),
            date: Some("2024-01-15".into()),
            customer_name: Some(customer_name.into()),
            amount_words: Some("Fifteen thousand naira only".into()),
            amount_numeric: Some(AmountInput::from("15,000")),
            tracking_number: Some("LL99887766".into()),
            purpose: Some("Logistic Service".into()),
            carrier: Some("ARAMEX".into()),
        }
    }

    #[tokio::test]
    async fn test_export_receipt_writes_document() {
        let (state, temp_dir) = memory_state();
        let issued = state
            .receipt_service
            .submit(&request("MC-10234", "Ada Okafor"))
            .await
            .unwrap();

        let response = export_receipt(State(state), Path(issued.record.id.to_string()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ExportReceiptResponse = serde_json::from_slice(&bytes).unwrap();
        let expected = format!("Receipt-MC-10234-{}.txt", &issued.record.id.simple().to_string()[..8]);
        assert_eq!(body.file_name, expected);

        let written = std::fs::read_to_string(temp_dir.path().join(&expected)).unwrap();
        assert!(written.contains("ADA OKAFOR"));
        assert!(written.contains("[ARAMEX]"));
        assert_eq!(written.len(), body.bytes_written);
    }

    #[tokio::test]
    async fn test_receipts_sharing_a_number_export_separately() {
        let (state, temp_dir) = memory_state();
        let mut paths = Vec::new();
        for name in ["Ada Okafor", "Bola Ade"] {
            let issued = state.receipt_service.submit(&request("MC-7", name)).await.unwrap();
            let response = export_receipt(State(state.clone()), Path(issued.record.id.to_string()))
                .await
                .into_response();
            assert_eq!(response.status(), StatusCode::OK);
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body: ExportReceiptResponse = serde_json::from_slice(&bytes).unwrap();
            paths.push(body.file_path);
        }

        assert_ne!(paths[0], paths[1]);
        assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 2);
        let first = std::fs::read_to_string(&paths[0]).unwrap();
        assert!(first.contains("ADA OKAFOR"));
        assert!(!first.contains("BOLA ADE"));
    }

    #[tokio::test]
    async fn test_export_unknown_receipt_is_not_found() {
        let (state, _temp_dir) = memory_state();

        let response = export_receipt(State(state), Path(uuid::Uuid::new_v4().to_string()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_export_history_csv() {
        let (state, _temp_dir) = memory_state();
        for (number, name) in [("MC-1", "Ada Okafor"), ("MC-2", "Bola Ade")] {
            state.receipt_service.submit(&request(number, name)).await.unwrap();
        }

        let response = export_history_csv(State(state)).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/csv; charset=utf-8"
        );
        let disposition = response.headers().get(header::CONTENT_DISPOSITION).unwrap();
        assert!(disposition.to_str().unwrap().starts_with("attachment; filename=\"receipt_history_"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let content = String::from_utf8(bytes.to_vec()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("MC-2,15/01/2024,BOLA ADE,"));
        assert!(lines[2].starts_with("MC-1,15/01/2024,ADA OKAFOR,"));
    }
}
