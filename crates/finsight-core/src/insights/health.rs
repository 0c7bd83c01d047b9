//! Category health assessor

use super::guidelines::guideline_percentage;
use super::types::{CategoryHealth, HealthStatus, SpendingPattern};

/// Share of spend cut suggested for a category in the warning tier
const WARNING_CUT: f64 = 0.2;
/// Share of spend cut suggested for a category in the bad tier
const BAD_CUT: f64 = 0.3;

/// Assess one category's share of spend against its guideline
pub fn assess_category(pattern: &SpendingPattern) -> CategoryHealth {
    let category = pattern.category;
    let current_pct = pattern.percentage;
    let recommended = guideline_percentage(category);

    let (status, reason, recommendation) = if current_pct <= recommended {
        (
            HealthStatus::Good,
            format!(
                "Spending is within healthy limits ({:.1}% of total)",
                current_pct
            ),
            format!("Great job managing your {} expenses!", category),
        )
    } else if current_pct <= recommended * 1.5 {
        (
            HealthStatus::Warning,
            format!(
                "Spending is {:.0}% over recommended",
                (current_pct / recommended - 1.0) * 100.0
            ),
            format!(
                "Try to reduce {} spending by ${:.2}",
                category,
                pattern.total_amount * WARNING_CUT
            ),
        )
    } else {
        (
            HealthStatus::Bad,
            format!(
                "Spending is significantly over recommended ({:.1}% vs {}%)",
                current_pct, recommended
            ),
            format!(
                "Priority: Cut {} expenses by ${:.2} or more",
                category,
                pattern.total_amount * BAD_CUT
            ),
        )
    };

    CategoryHealth {
        category,
        status,
        reason,
        spending: pattern.total_amount,
        recommendation,
    }
}

/// Assess every pattern, ordered bad, warning, good.
///
/// Within a tier the pattern order is kept (stable sort).
pub fn assess_category_health(patterns: &[SpendingPattern]) -> Vec<CategoryHealth> {
    let mut health: Vec<CategoryHealth> = patterns.iter().map(assess_category).collect();
    health.sort_by_key(|h| h.status.rank());
    health
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn pattern(category: Category, total: f64, percentage: f64) -> SpendingPattern {
        SpendingPattern {
            category,
            total_amount: total,
            transaction_count: 1,
            average_amount: total,
            percentage,
        }
    }

    #[test]
    fn test_good_tier() {
        let health = assess_category(&pattern(Category::Food, 100.0, 15.0));
        assert_eq!(health.status, HealthStatus::Good);
        assert_eq!(
            health.reason,
            "Spending is within healthy limits (15.0% of total)"
        );
        assert_eq!(health.recommendation, "Great job managing your food expenses!");
    }

    #[test]
    fn test_warning_tier() {
        // 12% against a 10% guideline is 20% over
        let health = assess_category(&pattern(Category::Transport, 250.0, 12.0));
        assert_eq!(health.status, HealthStatus::Warning);
        assert_eq!(health.reason, "Spending is 20% over recommended");
        assert_eq!(
            health.recommendation,
            "Try to reduce transport spending by $50.00"
        );
    }

    #[test]
    fn test_bad_tier() {
        let health = assess_category(&pattern(Category::Entertainment, 400.0, 40.0));
        assert_eq!(health.status, HealthStatus::Bad);
        assert_eq!(
            health.reason,
            "Spending is significantly over recommended (40.0% vs 5%)"
        );
        assert_eq!(
            health.recommendation,
            "Priority: Cut entertainment expenses by $120.00 or more"
        );
        assert_eq!(health.spending, 400.0);
    }

    #[test]
    fn test_ordering_bad_warning_good() {
        let patterns = vec![
            pattern(Category::Food, 10.0, 10.0),         // good
            pattern(Category::Shopping, 60.0, 60.0),     // bad
            pattern(Category::Utilities, 12.0, 12.0),    // warning
            pattern(Category::Healthcare, 4.0, 4.0),     // good
            pattern(Category::Other, 14.0, 14.0),        // bad
        ];
        let health = assess_category_health(&patterns);
        let order: Vec<(Category, HealthStatus)> =
            health.iter().map(|h| (h.category, h.status)).collect();

        assert_eq!(
            order,
            vec![
                (Category::Shopping, HealthStatus::Bad),
                (Category::Other, HealthStatus::Bad),
                (Category::Utilities, HealthStatus::Warning),
                (Category::Food, HealthStatus::Good),
                (Category::Healthcare, HealthStatus::Good),
            ]
        );
    }
}
