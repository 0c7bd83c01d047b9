//! Insights engine - runs the analysis pipeline and assembles the report

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::{AnalyticsConfig, DailyAverageScope};
use crate::models::{NormalizedTransaction, TransactionRecord};
use crate::Result;

use super::anomaly::AnomalyDetector;
use super::budget::recommend_budgets;
use super::health::assess_category_health;
use super::income::IncomeExpenseSplit;
use super::normalize::normalize;
use super::patterns::analyze_spending_patterns;
use super::savings::identify_savings_opportunities;
use super::types::{IncomeVsExpense, InsightsResponse};

/// Savings suggestion returned for a user with no transactions
pub const EMPTY_MESSAGE: &str = "Start tracking your expenses to get personalized insights!";

/// Stateless analytics engine.
///
/// Holds configuration only. Each call normalizes its input and builds every
/// derived value from scratch, so one engine can be shared freely.
#[derive(Debug, Clone, Default)]
pub struct InsightsEngine {
    config: AnalyticsConfig,
}

impl InsightsEngine {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Analyze raw records for `user_id`.
    ///
    /// Fails with a validation error if any record is malformed; nothing is
    /// dropped silently.
    pub fn analyze(&self, transactions: &[TransactionRecord], user_id: &str) -> Result<InsightsResponse> {
        if transactions.is_empty() {
            debug!(user_id, "No transactions, returning empty report");
            return Ok(Self::empty_response(user_id));
        }

        let normalized = normalize(transactions)?;
        Ok(self.analyze_normalized(&normalized, user_id))
    }

    /// Analyze transactions that are already normalized
    pub fn analyze_normalized(
        &self,
        transactions: &[NormalizedTransaction],
        user_id: &str,
    ) -> InsightsResponse {
        if transactions.is_empty() {
            return Self::empty_response(user_id);
        }

        let split = IncomeExpenseSplit::new(transactions);
        let income_vs_expense = split.summary();
        let total_spending = income_vs_expense.total_expense;

        let spending_patterns = analyze_spending_patterns(&split.expenses);
        let category_health = assess_category_health(&spending_patterns);
        let budget_recommendations = recommend_budgets(&spending_patterns, total_spending);
        let anomalies = AnomalyDetector::new(self.config.anomaly.clone()).detect(&split.expenses);
        let savings_opportunities = identify_savings_opportunities(
            &spending_patterns,
            &budget_recommendations,
            self.config.report.max_savings_opportunities,
        );

        let span_days = match self.config.report.daily_average_scope {
            DailyAverageScope::AllTransactions => day_span(transactions.iter()),
            DailyAverageScope::ExpensesOnly => day_span(split.expenses.iter().copied()),
        };
        let average_daily_spending = total_spending / span_days.max(1) as f64;
        let projected_monthly_spending =
            average_daily_spending * self.config.report.projection_days as f64;

        debug!(
            user_id,
            transactions = transactions.len(),
            expenses = split.expenses.len(),
            categories = spending_patterns.len(),
            anomalies = anomalies.len(),
            span_days,
            "Insights generated"
        );

        InsightsResponse {
            user_id: user_id.to_string(),
            income_vs_expense,
            spending_patterns,
            category_health,
            budget_recommendations,
            anomalies,
            total_spending,
            average_daily_spending,
            projected_monthly_spending,
            savings_opportunities,
        }
    }

    /// Canonical report for a user with no data
    pub fn empty_response(user_id: &str) -> InsightsResponse {
        InsightsResponse {
            user_id: user_id.to_string(),
            income_vs_expense: IncomeVsExpense::empty(),
            spending_patterns: Vec::new(),
            category_health: Vec::new(),
            budget_recommendations: Vec::new(),
            anomalies: Vec::new(),
            total_spending: 0.0,
            average_daily_spending: 0.0,
            projected_monthly_spending: 0.0,
            savings_opportunities: vec![EMPTY_MESSAGE.to_string()],
        }
    }
}

/// Whole days between the earliest and latest date (0 for an empty set)
fn day_span<'a>(transactions: impl Iterator<Item = &'a NormalizedTransaction>) -> i64 {
    let mut bounds: Option<(DateTime<Utc>, DateTime<Utc>)> = None;
    for tx in transactions {
        bounds = Some(match bounds {
            None => (tx.date, tx.date),
            Some((min, max)) => (min.min(tx.date), max.max(tx.date)),
        });
    }
    bounds.map(|(min, max)| (max - min).num_days()).unwrap_or(0)
}
