//! Caller-provided storage of enriched tables, keyed by profile name.

use parking_lot::RwLock;
use std::collections::HashMap;
use thiserror::Error;

use super::EnrichedTitle;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cache error in {context}: {message}")]
    Generic { context: String, message: String },
}

impl CacheError {
    pub fn generic(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Generic {
            context: context.into(),
            message: message.into(),
        }
    }
}

/// Key-value store of previously computed enriched tables.
pub trait EnrichmentCache: Send + Sync {
    fn get(&self, profile_name: &str) -> Result<Option<Vec<EnrichedTitle>>, CacheError>;
    fn put(&self, profile_name: &str, titles: &[EnrichedTitle]) -> Result<(), CacheError>;
}

/// Process-local cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Vec<EnrichedTitle>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl EnrichmentCache for MemoryCache {
    fn get(&self, profile_name: &str) -> Result<Option<Vec<EnrichedTitle>>, CacheError> {
        Ok(self.entries.read().get(profile_name).cloned())
    }

    fn put(&self, profile_name: &str, titles: &[EnrichedTitle]) -> Result<(), CacheError> {
        self.entries
            .write()
            .insert(profile_name.to_string(), titles.to_vec());
        Ok(())
    }
}

/// Cache that never stores anything; every run scrapes.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl EnrichmentCache for NoCache {
    fn get(&self, _profile_name: &str) -> Result<Option<Vec<EnrichedTitle>>, CacheError> {
        Ok(None)
    }

    fn put(&self, _profile_name: &str, _titles: &[EnrichedTitle]) -> Result<(), CacheError> {
        Ok(())
    }
}
