//! Insights Engine - descriptive spending analytics
//!
//! Turns a list of dated, categorized transactions into one report. The
//! pipeline runs left to right, and no stage depends on a later one:
//!
//! - **Normalizer** - validates records, remaps categories, assigns ids
//! - **Income/Expense Splitter** - totals, net balance and savings rate
//! - **Pattern Analyzer** - per-category totals, counts, averages, shares
//! - **Category Health Assessor** - share of spend against guidelines
//! - **Budget Recommender** - absolute spend against guideline targets
//! - **Anomaly Detector** - isolation forest over expense amounts
//! - **Savings Synthesizer** - a short list of suggestions
//!
//! ## Usage
//!
//! ```rust,ignore
//! use finsight_core::insights::InsightsEngine;
//!
//! let engine = InsightsEngine::default();
//! let report = engine.analyze(&records, "user-1")?;
//! ```

pub mod anomaly;
pub mod budget;
pub mod engine;
pub mod guidelines;
pub mod health;
pub mod income;
pub mod isolation_forest;
pub mod normalize;
pub mod patterns;
pub mod savings;
pub mod types;

pub use anomaly::AnomalyDetector;
pub use engine::{InsightsEngine, EMPTY_MESSAGE};
pub use isolation_forest::{FittedIsolationForest, IsolationForest};
pub use normalize::{normalize, normalize_record, parse_timestamp};
pub use savings::BALANCED_MESSAGE;
pub use types::{
    AnomalyDetection, BudgetRecommendation, CategoryHealth, FinancialStatus, HealthStatus,
    IncomeVsExpense, InsightsResponse, Priority, SpendingPattern,
};
