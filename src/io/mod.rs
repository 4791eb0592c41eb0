//! Input file handling.
//!
//! Reads the viewing activity CSV export into typed events.

pub mod csv_reader;
pub mod viewing_activity;

pub use csv_reader::{parse_records, CsvError, CsvRecord};
pub use viewing_activity::{
    default_min_duration, load_viewing_activity, parse_duration, parse_start_time,
    parse_viewing_activity, LoadError, ViewEvent, DEFAULT_MIN_DURATION_SECS, MAX_DURATION_HOURS,
    REQUIRED_COLUMNS,
};
