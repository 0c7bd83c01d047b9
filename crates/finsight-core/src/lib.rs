//! Finsight Core Library
//!
//! Shared functionality for the Finsight personal finance service:
//! - Insights engine (spending patterns, category health, budgets, anomalies)
//! - Seeded one-dimensional isolation forest
//! - Analytics configuration with file overrides
//! - CSV and JSON transaction import
//! - SQLite transaction store

pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod insights;
pub mod models;

pub use config::{AnalyticsConfig, AnomalyConfig, DailyAverageScope, ReportConfig};
pub use db::{Database, InsertSummary, UserSummary};
pub use error::{Error, Result};
pub use import::{import_file, parse_csv, parse_json, ImportFormat, ParsedImport};
pub use insights::{InsightsEngine, InsightsResponse};
pub use models::{
    Category, NormalizedTransaction, TransactionBatch, TransactionRecord, TransactionType,
};
