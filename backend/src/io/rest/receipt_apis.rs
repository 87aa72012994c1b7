//! # REST API for Receipts
//!
//! Endpoints for issuing, validating, listing and fetching receipts.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use shared::{
    CreateReceiptRequest, ErrorResponse, ReceiptListResponse, ReceiptNumberResponse, ReceiptView, TextInput,
    ValidationErrorResponse, ValidationResponse,
};
use std::collections::BTreeMap;
use tracing::{debug, error, info};

use super::mappers::ReceiptMapper;
use crate::domain::SubmitError;
use crate::AppState;

fn internal_error(message: String) -> axum::response::Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error: message })).into_response()
}

/// Issue a new receipt
pub async fn create_receipt(
    State(state): State<AppState>,
    Json(request): Json<CreateReceiptRequest>,
) -> impl IntoResponse {
    let receipt_number = request.receipt_number.as_ref().and_then(TextInput::as_text);
    info!("POST /api/receipts - receipt number: {:?}", receipt_number);

    match state.receipt_service.submit(&request).await {
        Ok(preview) => (StatusCode::CREATED, Json(ReceiptMapper::to_view(preview))).into_response(),
        Err(SubmitError::Validation(errors)) => {
            debug!("Receipt rejected: {}", errors);
            let body = ValidationErrorResponse {
                message: "Receipt has invalid fields".to_string(),
                errors: errors.messages(),
            };
            (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
        }
        Err(SubmitError::Store(e)) => {
            error!("Failed to create receipt: {}", e);
            internal_error(e.to_string())
        }
    }
}

/// Check a form without storing it
pub async fn validate_receipt(
    State(state): State<AppState>,
    Json(request): Json<CreateReceiptRequest>,
) -> impl IntoResponse {
    info!("POST /api/receipts/validate");

    let response = match state.receipt_service.validate(&request) {
        Ok(()) => ValidationResponse {
            is_valid: true,
            errors: BTreeMap::new(),
        },
        Err(errors) => ValidationResponse {
            is_valid: false,
            errors: errors.messages(),
        },
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// List every receipt, newest first
pub async fn list_receipts(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/receipts");

    match state.receipt_service.history().await {
        Ok(previews) => {
            let receipts: Vec<ReceiptView> = previews.into_iter().map(ReceiptMapper::to_view).collect();
            let count = receipts.len();
            (StatusCode::OK, Json(ReceiptListResponse { receipts, count })).into_response()
        }
        Err(e) => {
            error!("Failed to list receipts: {}", e);
            internal_error(e.to_string())
        }
    }
}

/// Suggest a receipt number for a fresh form
pub async fn next_receipt_number(State(state): State<AppState>) -> impl IntoResponse {
    let receipt_number = state.receipt_service.suggest_receipt_number();
    info!("GET /api/receipts/next-number - {}", receipt_number);
    (StatusCode::OK, Json(ReceiptNumberResponse { receipt_number })).into_response()
}

/// Fetch one receipt with its rendering
pub async fn get_receipt(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    info!("GET /api/receipts/{}", id);

    match state.receipt_service.preview(&id).await {
        Ok(Some(preview)) => (StatusCode::OK, Json(ReceiptMapper::to_view(preview))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Receipt {} not found", id),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to fetch receipt {}: {}", id, e);
            internal_error(e.to_string())
        }
    }
}
