//! # Receipt Desk Backend
//!
//! Issues, stores and reproduces payment receipts for McAnderson Logistics.
//!
//! The crate is layered the usual way:
//! ```text
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (validation, gateway, rendering, export)
//!     ↓
//! Storage Layer (SQLite, CSV or in-memory)
//! ```
//!
//! This module wires the layers together: [`initialize_backend`] builds the
//! services from an [`AppConfig`] and [`create_router`] exposes them over HTTP.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::{AppConfig, ServerConfig};
use crate::domain::{ExportService, FileDocumentTarget, ReceiptGateway, ReceiptService, ReceiptValidator};
use crate::io::rest::{export_apis, receipt_apis};
use crate::storage::ReceiptStorage;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub receipt_service: ReceiptService,
    pub export_service: ExportService,
}

impl AppState {
    /// Build the services on top of an already opened storage backend
    pub fn from_storage(config: &AppConfig, storage: Arc<dyn ReceiptStorage>) -> Self {
        let validator = ReceiptValidator::with_config(config.receipts.validation_config());
        let gateway = ReceiptGateway::new(storage);
        let receipt_service = ReceiptService::new(validator, gateway, config.receipts.number_prefix.clone());

        let target = Arc::new(FileDocumentTarget::new(&config.export.output_dir));
        let export_service = ExportService::with_config(config.export.export_config(), target);

        Self {
            receipt_service,
            export_service,
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up {} storage", config.storage.backend);
    let storage = storage::open_storage(&config.storage).await?;

    info!("Setting up application state");
    Ok(AppState::from_storage(config, storage))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, server: &ServerConfig) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health))
        .route(
            "/receipts",
            get(receipt_apis::list_receipts).post(receipt_apis::create_receipt),
        )
        .route("/receipts/validate", post(receipt_apis::validate_receipt))
        .route("/receipts/next-number", get(receipt_apis::next_receipt_number))
        .route("/receipts/export/csv", get(export_apis::export_history_csv))
        .route("/receipts/:id", get(receipt_apis::get_receipt))
        .route("/receipts/:id/export", post(export_apis::export_receipt));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// CORS for the configured origins, or any origin when none are configured
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let origins: Vec<HeaderValue> = server
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(origins)
    }
}

async fn health() -> &'static str {
    "ok"
}
