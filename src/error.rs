//! Error types for roslist.

use thiserror::Error;

/// Failure taxonomy for a generation run.
///
/// Every pipeline stage reports through this type so callers can tell a
/// network failure from a bad record or an unwritable output path.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid record: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
