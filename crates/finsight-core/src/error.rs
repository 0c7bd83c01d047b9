//! Error types for Finsight

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A transaction record failed validation (non-positive amount,
    /// unparseable date, blank category)
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Create a validation error for the record at `index`
    pub fn validation(index: usize, msg: impl std::fmt::Display) -> Self {
        Self::Validation(format!("transaction {}: {}", index, msg))
    }

    /// Whether this error means the caller supplied malformed input
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
