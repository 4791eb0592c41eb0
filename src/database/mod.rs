//! SQLite-backed enrichment cache.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, Row};
use std::path::{Path, PathBuf};

use crate::enrichment::{CacheError, EnrichedTitle, EnrichmentCache};

/// Cached enriched tables stored in one SQLite file.
pub struct SqliteCache {
    connection: Mutex<Connection>,
}

/// Bookkeeping row for one cached profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedProfile {
    pub profile_name: String,
    pub cached_at: DateTime<Utc>,
    pub title_count: usize,
}

impl SqliteCache {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, CacheError> {
        let connection = Connection::open(db_path)?;
        Self::with_connection(connection)
    }

    /// In-memory database (tests)
    pub fn new_in_memory() -> Result<Self, CacheError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(connection: Connection) -> Result<Self, CacheError> {
        connection.execute_batch(include_str!("schema.sql"))?;
        tracing::debug!("🗄️ Cache schema initialized");
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn cached_profiles(&self) -> Result<Vec<CachedProfile>, CacheError> {
        let connection = self.connection.lock();
        let mut stmt = connection.prepare(
            "SELECT profile_name, cached_at, title_count FROM cached_profiles ORDER BY profile_name",
        )?;
        let rows = stmt.query_map([], |row| {
            let cached_at: String = row.get(1)?;
            let title_count: i64 = row.get(2)?;
            Ok((row.get::<_, String>(0)?, cached_at, title_count))
        })?;

        let mut profiles = Vec::new();
        for row in rows {
            let (profile_name, cached_at, title_count) = row?;
            let cached_at = DateTime::parse_from_rfc3339(&cached_at)
                .map_err(|e| CacheError::generic("cached_at", e.to_string()))?
                .with_timezone(&Utc);
            profiles.push(CachedProfile {
                profile_name,
                cached_at,
                title_count: title_count.max(0) as usize,
            });
        }
        Ok(profiles)
    }

    /// Drops the cached table of one profile. Returns whether it existed.
    pub fn invalidate(&self, profile_name: &str) -> Result<bool, CacheError> {
        let mut connection = self.connection.lock();
        let tx = connection.transaction()?;
        tx.execute(
            "DELETE FROM enriched_titles WHERE profile_name = ?1",
            params![profile_name],
        )?;
        let removed = tx.execute(
            "DELETE FROM cached_profiles WHERE profile_name = ?1",
            params![profile_name],
        )?;
        tx.commit()?;

        if removed > 0 {
            tracing::info!("🗑️ Invalidated cached titles for '{}'", profile_name);
        }
        Ok(removed > 0)
    }
}

fn title_from_row(row: &Row) -> rusqlite::Result<(EnrichedTitleRow, String, String)> {
    Ok((
        EnrichedTitleRow {
            split_title: row.get(0)?,
            is_series: row.get(1)?,
            year_start: row.get(2)?,
            year_end: row.get(3)?,
            origin_country: row.get(5)?,
            rating: row.get(7)?,
        },
        row.get(4)?,
        row.get(6)?,
    ))
}

struct EnrichedTitleRow {
    split_title: String,
    is_series: bool,
    year_start: i32,
    year_end: i32,
    origin_country: String,
    rating: i32,
}

impl EnrichmentCache for SqliteCache {
    fn get(&self, profile_name: &str) -> Result<Option<Vec<EnrichedTitle>>, CacheError> {
        let connection = self.connection.lock();

        let cached: i64 = connection.query_row(
            "SELECT COUNT(*) FROM cached_profiles WHERE profile_name = ?1",
            params![profile_name],
            |row| row.get(0),
        )?;
        if cached == 0 {
            return Ok(None);
        }

        let mut stmt = connection.prepare(
            "SELECT split_title, is_series, year_start, year_end, genres, origin_country, cast_members, rating
             FROM enriched_titles WHERE profile_name = ?1 ORDER BY position",
        )?;
        let rows = stmt.query_map(params![profile_name], title_from_row)?;

        let mut titles = Vec::new();
        for row in rows {
            let (row, genres, cast) = row?;
            titles.push(EnrichedTitle {
                split_title: row.split_title,
                is_series: row.is_series,
                year_start: row.year_start,
                year_end: row.year_end,
                genres: serde_json::from_str(&genres)?,
                origin_country: row.origin_country,
                cast: serde_json::from_str(&cast)?,
                rating: row.rating,
            });
        }

        tracing::debug!("💾 Cache hit for '{}' ({} titles)", profile_name, titles.len());
        Ok(Some(titles))
    }

    fn put(&self, profile_name: &str, titles: &[EnrichedTitle]) -> Result<(), CacheError> {
        let mut connection = self.connection.lock();
        let tx = connection.transaction()?;

        tx.execute(
            "DELETE FROM enriched_titles WHERE profile_name = ?1",
            params![profile_name],
        )?;
        tx.execute(
            "INSERT OR REPLACE INTO cached_profiles (profile_name, cached_at, title_count)
             VALUES (?1, ?2, ?3)",
            params![profile_name, Utc::now().to_rfc3339(), titles.len() as i64],
        )?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO enriched_titles
                 (profile_name, position, split_title, is_series, year_start, year_end, genres, origin_country, cast_members, rating)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for (position, title) in titles.iter().enumerate() {
                stmt.execute(params![
                    profile_name,
                    position as i64,
                    title.split_title,
                    title.is_series,
                    title.year_start,
                    title.year_end,
                    serde_json::to_string(&title.genres)?,
                    title.origin_country,
                    serde_json::to_string(&title.cast)?,
                    title.rating,
                ])?;
            }
        }

        tx.commit()?;
        tracing::info!(
            "💾 Cached {} titles for profile '{}'",
            titles.len(),
            profile_name
        );
        Ok(())
    }
}

/// Default cache file under the XDG data directory.
pub fn default_database_path() -> anyhow::Result<PathBuf> {
    let project_dirs = crate::config::project_dirs()?;
    let data_dir = project_dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join("watchlens.db"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shawshank() -> EnrichedTitle {
        EnrichedTitle {
            split_title: "The Shawshank Redemption".to_string(),
            is_series: false,
            year_start: 1994,
            year_end: 1994,
            genres: vec!["Drama".to_string(), "Krimi".to_string()],
            origin_country: "USA".to_string(),
            cast: vec!["Tim Robbins".to_string(), "Morgan Freeman".to_string()],
            rating: 95,
        }
    }

    fn brooklyn() -> EnrichedTitle {
        EnrichedTitle {
            split_title: "Brooklyn Nine-Nine".to_string(),
            is_series: true,
            year_start: 2013,
            year_end: 2021,
            genres: vec!["Komedie".to_string(), "Krimi".to_string()],
            origin_country: "USA".to_string(),
            cast: vec!["Andy Samberg".to_string()],
            rating: 83,
        }
    }

    #[test]
    fn test_round_trip_keeps_order() {
        let cache = SqliteCache::new_in_memory().unwrap();
        assert_eq!(cache.get("Daniel").unwrap(), None);

        cache.put("Daniel", &[shawshank(), brooklyn()]).unwrap();
        assert_eq!(
            cache.get("Daniel").unwrap(),
            Some(vec![shawshank(), brooklyn()])
        );
        assert_eq!(cache.get("Dagmar").unwrap(), None);
    }

    #[test]
    fn test_empty_table_is_a_hit() {
        let cache = SqliteCache::new_in_memory().unwrap();
        cache.put("Kokos", &[]).unwrap();
        assert_eq!(cache.get("Kokos").unwrap(), Some(vec![]));
    }

    #[test]
    fn test_put_replaces_and_invalidate_removes() {
        let cache = SqliteCache::new_in_memory().unwrap();
        cache.put("Daniel", &[shawshank(), brooklyn()]).unwrap();
        cache.put("Daniel", &[brooklyn()]).unwrap();
        assert_eq!(cache.get("Daniel").unwrap(), Some(vec![brooklyn()]));

        let profiles = cache.cached_profiles().unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].title_count, 1);

        assert!(cache.invalidate("Daniel").unwrap());
        assert!(!cache.invalidate("Daniel").unwrap());
        assert_eq!(cache.get("Daniel").unwrap(), None);
    }

    #[test]
    fn test_persists_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.db");

        SqliteCache::new(&path)
            .unwrap()
            .put("Daniel", &[shawshank()])
            .unwrap();

        let reopened = SqliteCache::new(&path).unwrap();
        assert_eq!(reopened.get("Daniel").unwrap(), Some(vec![shawshank()]));
    }
}
