use thiserror::Error;

use crate::analytics::ExportError;
use crate::catalog::CatalogError;
use crate::enrichment::CacheError;
use crate::io::LoadError;

/// Top-level error of the library's fallible entry points.
#[derive(Error, Debug)]
pub enum WatchlensError {
    #[error("Failed to load viewing activity: {0}")]
    Load(#[from] LoadError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Unknown profile '{name}'")]
    UnknownProfile { name: String },
}

impl WatchlensError {
    pub fn unknown_profile(name: impl Into<String>) -> Self {
        Self::UnknownProfile { name: name.into() }
    }
}

pub type WatchlensResult<T> = Result<T, WatchlensError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions_and_messages() {
        let load: WatchlensError = LoadError::invalid_record(7, "bad duration '??'").into();
        assert_eq!(
            load.to_string(),
            "Failed to load viewing activity: Invalid record on line 7: bad duration '??'"
        );

        assert_eq!(
            WatchlensError::unknown_profile("Kokos").to_string(),
            "Unknown profile 'Kokos'"
        );
        let cache: WatchlensError = CacheError::generic("cached_at", "bad timestamp").into();
        assert_eq!(
            cache.to_string(),
            "Cache error: Cache error in cached_at: bad timestamp"
        );
    }
}
