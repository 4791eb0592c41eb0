//! JSON export, one object per title keyed by column name.

use serde::Serialize;

use super::{prepare_rows, ExportConfig, ExportError, FormatHandler};
use crate::enrichment::EnrichedTitle;

/// Writes the enriched title table as an array of objects keyed like the
/// CSV header.
pub struct JsonExporter {
    pretty_print: bool,
}

#[derive(Serialize)]
struct TitleRow<'a> {
    #[serde(rename = "Split Title")]
    split_title: &'a str,
    #[serde(rename = "Series")]
    series: bool,
    #[serde(rename = "Year Start")]
    year_start: i32,
    #[serde(rename = "Year End")]
    year_end: i32,
    #[serde(rename = "Genre")]
    genre: String,
    #[serde(rename = "Country From")]
    country_from: &'a str,
    #[serde(rename = "Actors")]
    actors: String,
    #[serde(rename = "Rating")]
    rating: i32,
}

impl<'a> From<&'a EnrichedTitle> for TitleRow<'a> {
    fn from(title: &'a EnrichedTitle) -> Self {
        Self {
            split_title: &title.split_title,
            series: title.is_series,
            year_start: title.year_start,
            year_end: title.year_end,
            genre: title.genre_label(),
            country_from: &title.origin_country,
            actors: title.actors_label(),
            rating: title.rating,
        }
    }
}

impl JsonExporter {
    pub fn new() -> Self {
        Self { pretty_print: true }
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }
}

impl FormatHandler for JsonExporter {
    fn export(
        &self,
        titles: &[EnrichedTitle],
        config: &ExportConfig,
    ) -> Result<Vec<u8>, ExportError> {
        let rows = prepare_rows(titles, config);
        let table: Vec<TitleRow> = rows.iter().map(TitleRow::from).collect();

        if self.pretty_print {
            serde_json::to_vec_pretty(&table)
        } else {
            serde_json::to_vec(&table)
        }
        .map_err(|e| ExportError::Serialization(e.to_string()))
    }
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self::new()
    }
}
