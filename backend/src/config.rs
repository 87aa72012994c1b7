//! # Application Configuration
//!
//! Settings are read from a single YAML file. Every field has a default, so a
//! missing file or a partial file is fine.
//!
//! ## Lookup order
//!
//! 1. The file named by `RECEIPT_DESK_CONFIG`, if set
//! 2. `receipt_desk.yaml` in the working directory, if present
//! 3. Built-in defaults
//!
//! Environment overrides are applied last.
//!
//! ## YAML Format
//!
//! ```yaml
//! server:
//!   host: "127.0.0.1"
//!   port: 3000
//!   allowed_origins: ["http://localhost:8080"]
//! storage:
//!   backend: sqlite          # sqlite | csv | memory
//!   database_url: "sqlite:receipts.db"
//!   max_connections: 5
//!   data_dir: "data"
//! export:
//!   output_dir: "exports"
//!   page_width: 64
//!   lines_per_page: 40
//! receipts:
//!   number_prefix: "MC-"
//!   default_purpose: "Logistic Service"
//!   min_text_length: 2
//! logging:
//!   filter: "info,receipt_desk=debug"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::domain::export_service::ExportConfig;
use crate::domain::validation::{ValidationConfig, DEFAULT_PURPOSE};
use crate::storage::sqlite::connection::DATABASE_URL;

/// Env var naming the config file
pub const CONFIG_PATH_ENV: &str = "RECEIPT_DESK_CONFIG";

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "receipt_desk.yaml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub export: ExportSettings,
    pub receipts: ReceiptSettings,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS. Empty allows any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            allowed_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Csv,
    Memory,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageBackend::Sqlite => "sqlite",
            StorageBackend::Csv => "csv",
            StorageBackend::Memory => "memory",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "csv" => Ok(StorageBackend::Csv),
            "memory" => Ok(StorageBackend::Memory),
            other => anyhow::bail!("unknown storage backend '{}'", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub database_url: String,
    pub max_connections: u32,
    /// Directory holding `receipts.csv` for the csv backend
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_url: DATABASE_URL.to_string(),
            max_connections: 5,
            data_dir: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub output_dir: PathBuf,
    pub page_width: usize,
    pub lines_per_page: usize,
}

impl Default for ExportSettings {
    fn default() -> Self {
        let defaults = ExportConfig::default();
        Self {
            output_dir: PathBuf::from("exports"),
            page_width: defaults.page_width,
            lines_per_page: defaults.lines_per_page,
        }
    }
}

impl ExportSettings {
    pub fn export_config(&self) -> ExportConfig {
        ExportConfig {
            page_width: self.page_width,
            lines_per_page: self.lines_per_page,
            ..ExportConfig::default()
        }
    }
}

/// Free-text fields always need at least this many characters
const MIN_TEXT_LENGTH_FLOOR: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptSettings {
    /// Prefix of suggested receipt numbers
    pub number_prefix: String,
    pub default_purpose: String,
    /// Shortest accepted free-text value. Values below 2 are raised to 2.
    pub min_text_length: usize,
}

impl Default for ReceiptSettings {
    fn default() -> Self {
        Self {
            number_prefix: "MC-".to_string(),
            default_purpose: DEFAULT_PURPOSE.to_string(),
            min_text_length: 2,
        }
    }
}

impl ReceiptSettings {
    pub fn validation_config(&self) -> ValidationConfig {
        ValidationConfig {
            min_text_length: self.min_text_length.max(MIN_TEXT_LENGTH_FLOOR),
            default_purpose: self.default_purpose.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load the configuration from the usual places, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE)?,
            Err(_) => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml_content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_yaml_str(&yaml_content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml_str(yaml_content: &str) -> Result<Self> {
        if yaml_content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml_content)?)
    }

    /// Apply `RECEIPT_DESK_*` overrides. `lookup` returns the value of a variable, if set.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("RECEIPT_DESK_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("RECEIPT_DESK_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("RECEIPT_DESK_PORT is not a port number: '{}'", port))?;
        }
        if let Some(backend) = lookup("RECEIPT_DESK_STORAGE") {
            self.storage.backend = backend.parse()?;
        }
        if let Some(url) = lookup("RECEIPT_DESK_DATABASE_URL") {
            self.storage.database_url = url;
        }
        if let Some(dir) = lookup("RECEIPT_DESK_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("RECEIPT_DESK_EXPORT_DIR") {
            self.export.output_dir = PathBuf::from(dir);
        }
        Ok(())
    }
}
