//! Loader for the streaming service's `ViewingActivity.csv` export.

use chrono::{NaiveDateTime, TimeDelta};
use std::path::Path;
use thiserror::Error;

use super::csv_reader::{parse_records, CsvError, CsvRecord};

pub const PROFILE_NAME_COLUMN: &str = "Profile Name";
pub const START_TIME_COLUMN: &str = "Start Time";
pub const DURATION_COLUMN: &str = "Duration";
pub const TITLE_COLUMN: &str = "Title";
pub const COUNTRY_COLUMN: &str = "Country";

pub const REQUIRED_COLUMNS: [&str; 5] = [
    PROFILE_NAME_COLUMN,
    START_TIME_COLUMN,
    DURATION_COLUMN,
    TITLE_COLUMN,
    COUNTRY_COLUMN,
];

pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Segments of this length or shorter are dropped on load.
pub const DEFAULT_MIN_DURATION_SECS: i64 = 300;

/// Longest accepted segment; keeps sums over a whole export in range.
pub const MAX_DURATION_HOURS: i64 = 1_000_000;

pub fn default_min_duration() -> TimeDelta {
    TimeDelta::seconds(DEFAULT_MIN_DURATION_SECS)
}

/// One watched session segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewEvent {
    pub profile_name: String,
    pub start_time: NaiveDateTime,
    pub duration: TimeDelta,
    pub title: String,
    pub country: String,
}

impl ViewEvent {
    /// None when the end falls outside the representable date range.
    pub fn end_time(&self) -> Option<NaiveDateTime> {
        self.start_time.checked_add_signed(self.duration)
    }
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    #[error("Missing required columns: {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("Invalid record on line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },
}

impl LoadError {
    pub fn invalid_record(line: usize, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            line,
            reason: reason.into(),
        }
    }
}

/// Parses `HH:MM:SS`. Hours may exceed 23 but not [`MAX_DURATION_HOURS`].
pub fn parse_duration(text: &str) -> Option<TimeDelta> {
    let mut parts = text.trim().split(':');
    let hours: i64 = parts.next()?.parse().ok()?;
    let minutes: i64 = parts.next()?.parse().ok()?;
    let seconds: i64 = parts.next()?.parse().ok()?;
    if parts.next().is_some()
        || !(0..=MAX_DURATION_HOURS).contains(&hours)
        || !(0..60).contains(&minutes)
        || !(0..60).contains(&seconds)
    {
        return None;
    }
    let total = hours
        .checked_mul(3600)?
        .checked_add(minutes * 60)?
        .checked_add(seconds)?;
    TimeDelta::try_seconds(total)
}

pub fn parse_start_time(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), START_TIME_FORMAT).ok()
}

struct ColumnIndex {
    profile_name: usize,
    start_time: usize,
    duration: usize,
    title: usize,
    country: usize,
}

impl ColumnIndex {
    fn from_header(header: &[String]) -> Result<Self, LoadError> {
        let position = |name: &str| header.iter().position(|column| column.trim() == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| position(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(LoadError::MissingColumns { columns: missing });
        }

        let index = |name: &str| position(name).unwrap_or_default();
        Ok(Self {
            profile_name: index(PROFILE_NAME_COLUMN),
            start_time: index(START_TIME_COLUMN),
            duration: index(DURATION_COLUMN),
            title: index(TITLE_COLUMN),
            country: index(COUNTRY_COLUMN),
        })
    }

    fn event(&self, record: &CsvRecord) -> Result<ViewEvent, LoadError> {
        let field = |index: usize, name: &str| {
            record
                .fields
                .get(index)
                .ok_or_else(|| LoadError::invalid_record(record.line, format!("missing '{}'", name)))
        };

        let start_text = field(self.start_time, START_TIME_COLUMN)?;
        let start_time = parse_start_time(start_text).ok_or_else(|| {
            LoadError::invalid_record(record.line, format!("bad start time '{}'", start_text))
        })?;

        let duration_text = field(self.duration, DURATION_COLUMN)?;
        let duration = parse_duration(duration_text).ok_or_else(|| {
            LoadError::invalid_record(record.line, format!("bad duration '{}'", duration_text))
        })?;

        let event = ViewEvent {
            profile_name: field(self.profile_name, PROFILE_NAME_COLUMN)?.clone(),
            start_time,
            duration,
            title: field(self.title, TITLE_COLUMN)?.clone(),
            country: field(self.country, COUNTRY_COLUMN)?.clone(),
        };
        if event.end_time().is_none() {
            return Err(LoadError::invalid_record(
                record.line,
                format!("session starting {} ends out of range", start_text),
            ));
        }
        Ok(event)
    }
}

/// Parses export text, keeping segments longer than `min_duration` in file
/// order.
pub fn parse_viewing_activity(
    text: &str,
    min_duration: TimeDelta,
) -> Result<Vec<ViewEvent>, LoadError> {
    let records = parse_records(text)?;
    let mut records = records.into_iter();

    let header = records
        .next()
        .ok_or_else(|| LoadError::MissingColumns {
            columns: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
        })?;
    let columns = ColumnIndex::from_header(&header.fields)?;

    let mut events = Vec::new();
    let mut skipped = 0usize;
    for record in records {
        let event = columns.event(&record)?;
        if event.duration > min_duration {
            events.push(event);
        } else {
            skipped += 1;
        }
    }

    tracing::debug!(
        "📄 Loaded {} viewing events ({} short segments skipped)",
        events.len(),
        skipped
    );
    Ok(events)
}

pub fn load_viewing_activity(
    path: impl AsRef<Path>,
    min_duration: TimeDelta,
) -> Result<Vec<ViewEvent>, LoadError> {
    let path = path.as_ref();
    tracing::info!("📂 Reading viewing activity from {}", path.display());
    let text = std::fs::read_to_string(path)?;
    parse_viewing_activity(&text, min_duration)
}
