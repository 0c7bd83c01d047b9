//! Budget recommender

use super::guidelines::guideline_fraction;
use super::types::{BudgetRecommendation, Priority, SpendingPattern};

/// Spend above recommended × this is high priority
const HIGH_PRIORITY_RATIO: f64 = 1.5;
/// Spend above recommended × this is medium priority
const MEDIUM_PRIORITY_RATIO: f64 = 1.2;

/// Build one recommendation per pattern, keeping the pattern order
pub fn recommend_budgets(
    patterns: &[SpendingPattern],
    total_expense: f64,
) -> Vec<BudgetRecommendation> {
    patterns
        .iter()
        .map(|pattern| {
            let current = pattern.total_amount;
            let recommended = total_expense * guideline_fraction(pattern.category);

            let (priority, reason) = if current > recommended * HIGH_PRIORITY_RATIO {
                (
                    Priority::High,
                    format!(
                        "Spending is {:.0}% over recommended budget",
                        (current / recommended - 1.0) * 100.0
                    ),
                )
            } else if current > recommended * MEDIUM_PRIORITY_RATIO {
                (
                    Priority::Medium,
                    "Spending is slightly above recommended budget".to_string(),
                )
            } else {
                (
                    Priority::Low,
                    "Spending is within recommended range".to_string(),
                )
            };

            BudgetRecommendation {
                category: pattern.category,
                recommended_amount: recommended,
                current_spending: current,
                reason,
                priority,
            }
        })
        .collect()
}
