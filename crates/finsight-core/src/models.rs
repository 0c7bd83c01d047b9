//! Domain models for Finsight
//!
//! `TransactionRecord` is the boundary shape: what the API, the store and the
//! importers hand to the engine. The engine turns it into a
//! `NormalizedTransaction` before any analysis runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Spending category (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Transport,
    Entertainment,
    Utilities,
    Healthcare,
    Shopping,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Entertainment => "entertainment",
            Self::Utilities => "utilities",
            Self::Healthcare => "healthcare",
            Self::Shopping => "shopping",
            Self::Other => "other",
        }
    }

    /// All categories, in declaration order
    pub fn all() -> &'static [Category] {
        &[
            Self::Food,
            Self::Transport,
            Self::Entertainment,
            Self::Utilities,
            Self::Healthcare,
            Self::Shopping,
            Self::Other,
        ]
    }

    /// Map an arbitrary category string onto the closed set.
    ///
    /// Matching is case-insensitive; anything outside the set becomes
    /// `Other`. Returns `None` only for blank input, which cannot be mapped
    /// to anything.
    pub fn coerce(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }
        Some(normalized.parse().unwrap_or(Self::Other))
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "food" => Ok(Self::Food),
            "transport" => Ok(Self::Transport),
            "entertainment" => Ok(Self::Entertainment),
            "utilities" => Ok(Self::Utilities),
            "healthcare" => Ok(Self::Healthcare),
            "shopping" => Ok(Self::Shopping),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Income,
    #[default]
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }

    /// Resolve a raw `type` value. Exact, case-sensitive match; anything
    /// missing or unrecognized is an expense.
    pub fn from_raw(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or_default()
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "INCOME" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction as supplied by a caller (API body, store row, import file)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Stable identifier; a synthetic `tx_{index}` is used when absent
    #[serde(default)]
    pub id: Option<String>,
    /// Always positive; direction is carried by `tx_type`
    pub amount: f64,
    /// Category name, remapped onto the closed set during normalization
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Timestamp string (RFC 3339, ISO date-time, or plain date)
    pub date: String,
    #[serde(default)]
    pub user_id: String,
    /// INCOME or EXPENSE; missing means EXPENSE
    #[serde(default, rename = "type")]
    pub tx_type: Option<String>,
}

impl TransactionRecord {
    /// Create an expense record
    pub fn expense(amount: f64, category: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id: None,
            amount,
            category: category.into(),
            description: None,
            date: date.into(),
            user_id: String::new(),
            tx_type: Some(TransactionType::Expense.as_str().to_string()),
        }
    }

    /// Create an income record
    pub fn income(amount: f64, category: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            tx_type: Some(TransactionType::Income.as_str().to_string()),
            ..Self::expense(amount, category, date)
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Clear the type so it falls back to the default
    pub fn without_type(mut self) -> Self {
        self.tx_type = None;
        self
    }
}

/// A batch of transactions for one user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBatch {
    pub transactions: Vec<TransactionRecord>,
    pub user_id: String,
}

/// A validated transaction in the engine's internal representation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTransaction {
    pub id: String,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub amount: f64,
    pub category: Category,
    pub description: String,
    pub date: DateTime<Utc>,
    pub user_id: String,
}

impl NormalizedTransaction {
    pub fn is_expense(&self) -> bool {
        self.tx_type == TransactionType::Expense
    }

    pub fn is_income(&self) -> bool {
        self.tx_type == TransactionType::Income
    }
}
