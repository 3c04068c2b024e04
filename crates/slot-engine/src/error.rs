//! Error types for slot-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlotError {
    /// A weekday template is internally inconsistent (e.g. `start >= end`).
    #[error("Invalid schedule entry: {0}")]
    Validation(String),

    /// The slot configuration can never produce a slot.
    #[error("Invalid slot configuration: {0}")]
    Config(String),

    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Caller-supplied data has the wrong shape (unknown weekday, bad tag, ...).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SlotError>;
