//! Core types for the insights report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::Category;

/// Overall financial status derived from the savings rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancialStatus {
    /// Saving at least 20% of income
    Healthy,
    /// Saving 10-20% of income
    Concerning,
    /// Saving under 10% of income (or spending more than earned)
    Critical,
}

impl FinancialStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinancialStatus::Healthy => "healthy",
            FinancialStatus::Concerning => "concerning",
            FinancialStatus::Critical => "critical",
        }
    }

    /// Classify a savings rate (percentage)
    pub fn from_savings_rate(rate: f64) -> Self {
        if rate >= 20.0 {
            FinancialStatus::Healthy
        } else if rate >= 10.0 {
            FinancialStatus::Concerning
        } else {
            FinancialStatus::Critical
        }
    }
}

impl fmt::Display for FinancialStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FinancialStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "healthy" => Ok(FinancialStatus::Healthy),
            "concerning" => Ok(FinancialStatus::Concerning),
            "critical" => Ok(FinancialStatus::Critical),
            _ => Err(format!("Unknown financial status: {}", s)),
        }
    }
}

/// Health tier of a spending category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Good,
    Warning,
    Bad,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Good => "good",
            HealthStatus::Warning => "warning",
            HealthStatus::Bad => "bad",
        }
    }

    /// Sort rank (bad first)
    pub fn rank(&self) -> u8 {
        match self {
            HealthStatus::Bad => 0,
            HealthStatus::Warning => 1,
            HealthStatus::Good => 2,
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HealthStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "good" => Ok(HealthStatus::Good),
            "warning" => Ok(HealthStatus::Warning),
            "bad" => Ok(HealthStatus::Bad),
            _ => Err(format!("Unknown health status: {}", s)),
        }
    }
}

/// Priority of a budget recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(format!("Unknown priority: {}", s)),
        }
    }
}

/// Spending aggregated over one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingPattern {
    pub category: Category,
    pub total_amount: f64,
    pub transaction_count: usize,
    pub average_amount: f64,
    /// Share of total expense (0-100)
    pub percentage: f64,
}

/// Health assessment of one category against its guideline share
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryHealth {
    pub category: Category,
    pub status: HealthStatus,
    pub reason: String,
    pub spending: f64,
    pub recommendation: String,
}

/// Budget target for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRecommendation {
    pub category: Category,
    pub recommended_amount: f64,
    pub current_spending: f64,
    pub reason: String,
    pub priority: Priority,
}

/// A transaction flagged as unusual
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyDetection {
    pub transaction_id: String,
    pub amount: f64,
    pub category: Category,
    pub date: DateTime<Utc>,
    /// Non-negative; larger means more unusual
    pub anomaly_score: f64,
    pub reason: String,
}

/// Income versus expense summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeVsExpense {
    pub total_income: f64,
    pub total_expense: f64,
    pub net_balance: f64,
    /// Percentage of income retained
    pub savings_rate: f64,
    pub status: FinancialStatus,
}

impl IncomeVsExpense {
    /// All-zero summary used for empty input
    pub fn empty() -> Self {
        Self {
            total_income: 0.0,
            total_expense: 0.0,
            net_balance: 0.0,
            savings_rate: 0.0,
            status: FinancialStatus::Healthy,
        }
    }
}

/// The complete insights report for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResponse {
    pub user_id: String,
    pub income_vs_expense: IncomeVsExpense,
    pub spending_patterns: Vec<SpendingPattern>,
    pub category_health: Vec<CategoryHealth>,
    pub budget_recommendations: Vec<BudgetRecommendation>,
    pub anomalies: Vec<AnomalyDetection>,
    pub total_spending: f64,
    pub average_daily_spending: f64,
    pub projected_monthly_spending: f64,
    pub savings_opportunities: Vec<String>,
}
