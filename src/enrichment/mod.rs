//! Title enrichment: catalog lookup of every distinct watched title and the
//! join of the resulting metadata back onto viewing events.

pub mod cache;
pub mod pipeline;
pub mod title_key;

pub use cache::{CacheError, EnrichmentCache, MemoryCache, NoCache};
pub use pipeline::{merge_enriched, resolved_titles, EnrichedView, EnrichmentPipeline};
pub use title_key::{distinct_title_keys, split_title};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{CatalogError, DetailFields, DetailPageError};
use crate::io::ViewEvent;

/// Placeholder used for text fields of an unresolved title.
pub const UNRESOLVED_TEXT: &str = "-";
/// Placeholder used for numeric fields of an unresolved title.
pub const UNRESOLVED_NUMBER: i32 = -1;

/// Enrichment join key derived from a raw title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TitleKey {
    pub split_title: String,
    pub is_series: bool,
}

/// Catalog metadata of one distinct title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedTitle {
    pub split_title: String,
    pub is_series: bool,
    pub year_start: i32,
    pub year_end: i32,
    pub genres: Vec<String>,
    pub origin_country: String,
    pub cast: Vec<String>,
    pub rating: i32,
}

impl EnrichedTitle {
    /// Sentinel for a title that could not be enriched.
    pub fn unresolved(key: &TitleKey) -> Self {
        Self {
            split_title: key.split_title.clone(),
            is_series: key.is_series,
            year_start: UNRESOLVED_NUMBER,
            year_end: UNRESOLVED_NUMBER,
            genres: vec![UNRESOLVED_TEXT.to_string()],
            origin_country: UNRESOLVED_TEXT.to_string(),
            cast: Vec::new(),
            rating: UNRESOLVED_NUMBER,
        }
    }

    pub fn from_fields(key: &TitleKey, fields: DetailFields) -> Self {
        Self {
            split_title: key.split_title.clone(),
            is_series: key.is_series,
            year_start: fields.origin.year_start,
            year_end: fields.origin.year_end,
            genres: fields.genres,
            origin_country: fields.origin.country,
            cast: fields.cast,
            rating: fields.rating,
        }
    }

    pub fn key(&self) -> TitleKey {
        TitleKey {
            split_title: self.split_title.clone(),
            is_series: self.is_series,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.year_start != UNRESOLVED_NUMBER
    }

    /// Genres as one comma separated value.
    pub fn genre_label(&self) -> String {
        self.genres.join(",")
    }

    /// Cast as one comma separated value.
    pub fn actors_label(&self) -> String {
        self.cast.join(",")
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }
}

/// Viewing event together with its title's catalog metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedViewEvent {
    pub event: ViewEvent,
    pub title: EnrichedTitle,
}

/// Reasons a single title ends unresolved.
#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("Network error: {0}")]
    Network(#[from] CatalogError),

    #[error("{stage} request returned HTTP {status}")]
    HttpStatus { stage: &'static str, status: u16 },

    #[error("No catalog entry named '{title}'")]
    NoMatch { title: String },

    #[error("Detail page unusable: {0}")]
    Structure(#[from] DetailPageError),
}

/// Terminal state a title reached in the enrichment state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionState {
    /// Detail page fetched and parsed
    Parsed,
    /// Search ran but no candidate matched
    Unmatched,
    /// A request or the page structure failed
    Failed { reason: String },
}

/// Result of enriching one title key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentOutcome {
    pub title: EnrichedTitle,
    pub state: ResolutionState,
}

impl EnrichmentOutcome {
    pub fn is_resolved(&self) -> bool {
        self.state == ResolutionState::Parsed
    }
}
