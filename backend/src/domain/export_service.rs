//! Export service for printable receipts and the receipt history.
//!
//! A rendered receipt is laid out as a fixed-width, paginated text document
//! and handed to a [`DocumentTarget`]. The history table is exported as CSV.
//! Exports only read rendered values; stored receipts are never touched.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{RenderedReceipt, CURRENCY_SYMBOL};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// Column headers of the history export
pub const HISTORY_HEADERS: [&str; 6] = [
    "Receipt No.",
    "Date",
    "Received From",
    "Amount (₦)",
    "Tracking No.",
    "Carrier",
];

/// Separator between pages of a text document
pub const PAGE_BREAK: char = '\u{0C}';

/// Characters of the receipt id appended to export file names
const FILE_ID_CHARS: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to build CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("export produced invalid text: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("document '{0}' has no pages")]
    EmptyDocument(String),
}

/// Page geometry and the fixed text printed on every receipt
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    pub page_width: usize,
    pub lines_per_page: usize,
    pub business_name: String,
    pub document_heading: String,
    pub signature_caption: String,
    pub footer_tagline: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            page_width: 64,
            lines_per_page: 40,
            business_name: "MCANDERSON LOGISTICS".to_string(),
            document_heading: "OFFICIAL RECEIPT".to_string(),
            signature_caption: "Receiver's Signature / Stamp".to_string(),
            footer_tagline: "LOGISTICS & FREIGHT SERVICES".to_string(),
        }
    }
}

/// A laid-out receipt, one string per page
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptDocument {
    pub title: String,
    pub receipt_id: String,
    pub pages: Vec<String>,
}

impl ReceiptDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// `<title>-<first 8 id chars>.txt`, unique per receipt even when numbers repeat
    pub fn file_name(&self) -> String {
        let id_part: String = self
            .receipt_id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .take(FILE_ID_CHARS)
            .collect();
        let stem = safe_file_stem(&self.title);
        if id_part.is_empty() {
            format!("{}.txt", stem)
        } else {
            format!("{}-{}.txt", stem, id_part)
        }
    }

    /// All pages joined by form feeds
    pub fn to_text(&self) -> String {
        self.pages.join(&PAGE_BREAK.to_string())
    }
}

/// Where an exported document ends up
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub path: PathBuf,
    pub page_count: usize,
    pub bytes_written: usize,
}

/// History table as a CSV file body
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryCsv {
    pub file_name: String,
    pub content: String,
    pub receipt_count: usize,
}

/// Destination for composed documents
#[async_trait]
pub trait DocumentTarget: Send + Sync {
    async fn emit(&self, document: &ReceiptDocument) -> Result<ExportArtifact, ExportError>;
}

/// Writes each document to its own file in a directory
#[derive(Debug, Clone)]
pub struct FileDocumentTarget {
    directory: PathBuf,
}

impl FileDocumentTarget {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

#[async_trait]
impl DocumentTarget for FileDocumentTarget {
    async fn emit(&self, document: &ReceiptDocument) -> Result<ExportArtifact, ExportError> {
        if document.pages.is_empty() {
            return Err(ExportError::EmptyDocument(document.title.clone()));
        }

        fs::create_dir_all(&self.directory)?;

        let file_name = document.file_name();
        let file_path = self.directory.join(&file_name);
        // Own temp file per write so concurrent exports never share one
        let temp_path = self
            .directory
            .join(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));
        let text = document.to_text();

        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;
            file.write_all(text.as_bytes())?;
            file.flush()?;
        }

        // Atomic move from temp to final file
        if let Err(e) = fs::rename(&temp_path, &file_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        Ok(ExportArtifact {
            file_name,
            path: file_path,
            page_count: document.page_count(),
            bytes_written: text.len(),
        })
    }
}

/// Export service that lays out and emits receipts
#[derive(Clone)]
pub struct ExportService {
    config: ExportConfig,
    target: Arc<dyn DocumentTarget>,
}

impl ExportService {
    pub fn new(target: Arc<dyn DocumentTarget>) -> Self {
        Self::with_config(ExportConfig::default(), target)
    }

    pub fn with_config(config: ExportConfig, target: Arc<dyn DocumentTarget>) -> Self {
        Self { config, target }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Lay out a rendered receipt as fixed-width pages.
    ///
    /// Field values are never cut: a value too long for its label line moves
    /// to its own line and may run past the page width.
    pub fn compose(&self, rendered: &RenderedReceipt) -> ReceiptDocument {
        let width = self.config.page_width;
        let rule = "=".repeat(width);
        let dotted = ".".repeat(width);

        let mut lines = vec![
            rule.clone(),
            center(&self.config.business_name, width),
            align_right(&format!("[{}]", rendered.carrier_badge.label()), width),
            rule,
            String::new(),
            center(&self.config.document_heading, width),
            String::new(),
        ];

        lines.extend(spread(
            &format!("No. {}", rendered.receipt_number),
            &format!("Date: {}", rendered.display_date),
            width,
        ));
        lines.push(dotted.clone());

        let fields = [
            ("Received From: ", rendered.customer_name.as_str()),
            ("The Sum of: ", rendered.amount_words.as_str()),
        ];
        for (label, value) in fields {
            lines.extend(labelled(label, value, width));
            lines.push(dotted.clone());
        }

        lines.extend(spread(
            &format!("{} {}", CURRENCY_SYMBOL, rendered.display_amount),
            &format!("Tracking No: {}", rendered.tracking_number),
            width,
        ));
        lines.push(dotted.clone());
        lines.extend(labelled("Being Payment for: ", &rendered.purpose, width));
        lines.push(dotted);

        lines.push(String::new());
        lines.push(String::new());
        // Signature block sits at the right margin
        let block_width = self
            .config
            .signature_caption
            .chars()
            .count()
            .max(self.config.footer_tagline.chars().count());
        let indent = " ".repeat(width.saturating_sub(block_width));
        for line in [
            "_".repeat(block_width),
            center(&self.config.signature_caption, block_width),
            center(&self.config.footer_tagline, block_width),
        ] {
            lines.push(format!("{}{}", indent, line));
        }

        // A value holding newlines prints as several lines, so count each one
        let lines: Vec<&str> = lines.iter().flat_map(|line| line.split('\n')).collect();

        let per_page = self.config.lines_per_page.max(1);
        let pages = lines
            .chunks(per_page)
            .map(|page| {
                let mut text = page.join("\n");
                text.push('\n');
                text
            })
            .collect();

        ReceiptDocument {
            title: rendered.document_title.clone(),
            receipt_id: rendered.receipt_id.clone(),
            pages,
        }
    }

    /// Compose a receipt and emit it through the configured target
    pub async fn export_receipt(&self, rendered: &RenderedReceipt) -> Result<ExportArtifact, ExportError> {
        info!("📄 EXPORT: Exporting receipt {}", rendered.receipt_number);

        let document = self.compose(rendered);
        match self.target.emit(&document).await {
            Ok(artifact) => {
                info!(
                    "✅ EXPORT: Wrote {} ({} pages, {} bytes)",
                    artifact.path.display(),
                    artifact.page_count,
                    artifact.bytes_written
                );
                Ok(artifact)
            }
            Err(e) => {
                error!("❌ EXPORT: Failed to export {}: {}", document.title, e);
                Err(e)
            }
        }
    }

    /// History table as CSV, rows in the order given
    pub fn export_history_csv(
        &self,
        receipts: &[RenderedReceipt],
        generated_at: DateTime<Utc>,
    ) -> Result<HistoryCsv, ExportError> {
        let mut csv_writer = csv::Writer::from_writer(Vec::new());
        csv_writer.write_record(HISTORY_HEADERS)?;
        for receipt in receipts {
            csv_writer.write_record([
                receipt.receipt_number.as_str(),
                receipt.display_date.as_str(),
                receipt.customer_name.as_str(),
                receipt.display_amount.as_str(),
                receipt.tracking_number.as_str(),
                receipt.carrier.as_str(),
            ])?;
        }
        let bytes = csv_writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))?;
        let content = String::from_utf8(bytes)?;

        let file_name = format!("receipt_history_{}.csv", generated_at.format("%Y%m%d"));
        info!("✅ EXPORT: Built {} with {} receipts", file_name, receipts.len());

        Ok(HistoryCsv {
            file_name,
            content,
            receipt_count: receipts.len(),
        })
    }
}

/// Title reduced to characters safe in a file name
fn safe_file_stem(title: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "Receipt".to_string()
    } else {
        stem
    }
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let left = (width - len) / 2;
    format!("{}{}", " ".repeat(left), text)
}

fn align_right(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    format!("{}{}", " ".repeat(width - len), text)
}

/// `left` and `right` on one line, or on two when they don't fit
fn spread(left: &str, right: &str, width: usize) -> Vec<String> {
    let used = left.chars().count() + right.chars().count();
    if used < width {
        vec![format!("{}{}{}", left, " ".repeat(width - used), right)]
    } else {
        vec![left.to_string(), align_right(right, width)]
    }
}

fn labelled(label: &str, value: &str, width: usize) -> Vec<String> {
    if label.chars().count() + value.chars().count() <= width {
        vec![format!("{}{}", label, value)]
    } else {
        vec![label.trim_end().to_string(), format!("  {}", value)]
    }
}
