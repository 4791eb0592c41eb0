//! Viewing-history analytics with catalog enrichment.
//!
//! The export is loaded by [`io`], every distinct title is looked up in the
//! catalog by [`enrichment`] through [`catalog`], and [`analytics`] turns the
//! joined rows into breakdowns and exports.

pub mod analytics;
pub mod catalog;
pub mod config;
pub mod database;
pub mod enrichment;
pub mod error;
pub mod io;
pub mod utils;

pub use error::{WatchlensError, WatchlensResult};

pub use catalog::{CatalogSource, CsfdClient, Pacing};
pub use enrichment::{
    EnrichedTitle, EnrichedView, EnrichedViewEvent, EnrichmentCache, EnrichmentPipeline,
    TitleKey,
};
pub use io::{load_viewing_activity, LoadError, ViewEvent};

pub use database::SqliteCache;
