//! Process-wide helpers.

pub mod logging;

pub use logging::{init_logging, resolve_log_dir, LOG_FILE_PREFIX};
