//! Delimited-text export.

use super::{prepare_rows, ExportConfig, ExportError, FormatHandler, TITLE_TABLE_COLUMNS};
use crate::enrichment::EnrichedTitle;

/// Writes the enriched title table as delimited text.
pub struct CsvExporter {
    delimiter: char,
    include_headers: bool,
}

impl CsvExporter {
    pub fn new() -> Self {
        Self {
            delimiter: ',',
            include_headers: true,
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_headers(mut self, include_headers: bool) -> Self {
        self.include_headers = include_headers;
        self
    }

    fn escape_csv_field(&self, field: &str) -> String {
        if field.contains(self.delimiter)
            || field.contains('"')
            || field.contains('\n')
            || field.contains('\r')
        {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn generate_headers(&self) -> String {
        TITLE_TABLE_COLUMNS.join(&self.delimiter.to_string())
    }

    fn title_to_csv_row(&self, title: &EnrichedTitle) -> String {
        let fields = [
            self.escape_csv_field(&title.split_title),
            title.is_series.to_string(),
            title.year_start.to_string(),
            title.year_end.to_string(),
            self.escape_csv_field(&title.genre_label()),
            self.escape_csv_field(&title.origin_country),
            self.escape_csv_field(&title.actors_label()),
            title.rating.to_string(),
        ];

        fields.join(&self.delimiter.to_string())
    }
}

impl FormatHandler for CsvExporter {
    fn export(
        &self,
        titles: &[EnrichedTitle],
        config: &ExportConfig,
    ) -> Result<Vec<u8>, ExportError> {
        let rows = prepare_rows(titles, config);
        let mut csv_content = Vec::new();

        if self.include_headers {
            csv_content.extend_from_slice(self.generate_headers().as_bytes());
            csv_content.push(b'\n');
        }

        for title in &rows {
            csv_content.extend_from_slice(self.title_to_csv_row(title).as_bytes());
            csv_content.push(b'\n');
        }

        Ok(csv_content)
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}
