//! Error types for configuration loading.
//!
//! The scrolling core itself has no failure modes; bad input degrades to
//! "nothing scrolls".  Only the config file can be wrong in a way worth
//! reporting.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("`{key}` = {value} is out of range (expected {expected})")]
    OutOfRange {
        key: &'static str,
        value: f64,
        expected: &'static str,
    },
}
