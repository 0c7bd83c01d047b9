//! Savings synthesizer - short list of actionable suggestions

use super::types::{BudgetRecommendation, Priority, SpendingPattern};

/// Suggestion used when no rule fires
pub const BALANCED_MESSAGE: &str = "Your spending is well-balanced. Keep up the good work!";

/// At most this many "reduce" suggestions come from budget recommendations
const MAX_REDUCE_SUGGESTIONS: usize = 3;
/// Categories with more purchases than this may be consolidated
const CONSOLIDATE_MIN_COUNT: usize = 20;
/// ...when their average purchase is below this
const CONSOLIDATE_MAX_AVERAGE: f64 = 10.0;
/// Share of small-purchase spend assumed recoverable by consolidating
const CONSOLIDATE_SAVING_RATE: f64 = 0.3;

/// Derive up to `max` suggestions, in generation order
pub fn identify_savings_opportunities(
    patterns: &[SpendingPattern],
    recommendations: &[BudgetRecommendation],
    max: usize,
) -> Vec<String> {
    let mut opportunities: Vec<String> = recommendations
        .iter()
        .filter(|rec| rec.priority == Priority::High)
        .take(MAX_REDUCE_SUGGESTIONS)
        .filter(|rec| rec.current_spending > rec.recommended_amount)
        .map(|rec| {
            format!(
                "Reduce {} spending by ${:.2}/month to meet budget goals",
                rec.category,
                rec.current_spending - rec.recommended_amount
            )
        })
        .collect();

    opportunities.extend(
        patterns
            .iter()
            .filter(|p| {
                p.transaction_count > CONSOLIDATE_MIN_COUNT
                    && p.average_amount < CONSOLIDATE_MAX_AVERAGE
            })
            .map(|p| {
                format!(
                    "Consolidate small {} purchases to save up to ${:.2}/month",
                    p.category,
                    p.transaction_count as f64 * p.average_amount * CONSOLIDATE_SAVING_RATE
                )
            }),
    );

    if opportunities.is_empty() {
        opportunities.push(BALANCED_MESSAGE.to_string());
    }

    opportunities.truncate(max);
    opportunities
}
