//! Export of the enriched title table.
//!
//! [`ExportManager`] picks a [`FormatHandler`] by [`ExportFormat`]; rows are
//! filtered and sorted by [`ExportConfig`] before any handler sees them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

pub mod csv_exporter;
pub mod json_exporter;

pub use csv_exporter::CsvExporter;
pub use json_exporter::JsonExporter;

use crate::enrichment::EnrichedTitle;

/// Column names of the enriched title table, in output order.
pub const TITLE_TABLE_COLUMNS: [&str; 8] = [
    "Split Title",
    "Series",
    "Year Start",
    "Year End",
    "Genre",
    "Country From",
    "Actors",
    "Rating",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn file_extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// Guesses the format from a file extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        [ExportFormat::Csv, ExportFormat::Json]
            .into_iter()
            .find(|format| extension.eq_ignore_ascii_case(format.file_extension()))
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unsupported format: {format:?}")]
    UnsupportedFormat { format: ExportFormat },

    #[error("Invalid data: {message}")]
    InvalidData { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub format: ExportFormat,
    /// Keep sentinel rows of titles the catalog could not resolve
    pub include_unresolved: bool,
    pub max_records: Option<usize>,
    pub sort_order: SortOrder,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            include_unresolved: false,
            max_records: None,
            sort_order: SortOrder::ByTitle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Table order as produced by enrichment
    Original,
    ByTitle,
    /// Highest rating first
    ByRating,
    /// Oldest release first
    ByYear,
}

/// Applies the filter, sort and limit settings of `config`.
pub fn prepare_rows(titles: &[EnrichedTitle], config: &ExportConfig) -> Vec<EnrichedTitle> {
    let mut rows: Vec<EnrichedTitle> = titles
        .iter()
        .filter(|title| config.include_unresolved || title.is_resolved())
        .cloned()
        .collect();

    match config.sort_order {
        SortOrder::Original => {}
        SortOrder::ByTitle => rows.sort_by(|a, b| {
            a.split_title
                .cmp(&b.split_title)
                .then(a.is_series.cmp(&b.is_series))
        }),
        SortOrder::ByRating => rows.sort_by(|a, b| b.rating.cmp(&a.rating)),
        SortOrder::ByYear => rows.sort_by_key(|title| (title.year_start, title.year_end)),
    }

    if let Some(max_records) = config.max_records {
        rows.truncate(max_records);
    }
    rows
}

pub trait FormatHandler: Send + Sync {
    fn export(&self, titles: &[EnrichedTitle], config: &ExportConfig)
        -> Result<Vec<u8>, ExportError>;
}

pub struct ExportManager {
    format_handlers: HashMap<ExportFormat, Box<dyn FormatHandler>>,
}

impl ExportManager {
    pub fn new() -> Self {
        let mut manager = Self {
            format_handlers: HashMap::new(),
        };

        manager.register_handler(ExportFormat::Csv, Box::new(CsvExporter::new()));
        manager.register_handler(ExportFormat::Json, Box::new(JsonExporter::new()));

        manager
    }

    pub fn register_handler(&mut self, format: ExportFormat, handler: Box<dyn FormatHandler>) {
        self.format_handlers.insert(format, handler);
    }

    pub fn export(
        &self,
        titles: &[EnrichedTitle],
        config: &ExportConfig,
    ) -> Result<Vec<u8>, ExportError> {
        self.validate_config(config)?;
        let handler =
            self.format_handlers
                .get(&config.format)
                .ok_or(ExportError::UnsupportedFormat {
                    format: config.format,
                })?;

        handler.export(titles, config)
    }

    pub fn export_to_file(
        &self,
        titles: &[EnrichedTitle],
        config: &ExportConfig,
        path: &Path,
    ) -> Result<usize, ExportError> {
        let bytes = self.export(titles, config)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &bytes)?;

        tracing::info!(
            "📤 Exported {} bytes as {:?} to {}",
            bytes.len(),
            config.format,
            path.display()
        );
        Ok(bytes.len())
    }

    pub fn validate_config(&self, config: &ExportConfig) -> Result<(), ExportError> {
        if !self.format_handlers.contains_key(&config.format) {
            return Err(ExportError::UnsupportedFormat {
                format: config.format,
            });
        }

        if config.max_records == Some(0) {
            return Err(ExportError::InvalidData {
                message: "max_records must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for ExportManager {
    fn default() -> Self {
        Self::new()
    }
}
