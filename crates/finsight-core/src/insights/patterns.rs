//! Pattern analyzer - per-category spending aggregates

use crate::models::{Category, NormalizedTransaction};

use super::types::SpendingPattern;

/// Group expenses by category.
///
/// Sorted by total descending; the sort is stable so ties keep the order in
/// which categories first appear in `expenses`.
pub fn analyze_spending_patterns(expenses: &[&NormalizedTransaction]) -> Vec<SpendingPattern> {
    let total = expenses.iter().fold(0.0, |acc, tx| acc + tx.amount);

    // (category, total, count) in first-seen order
    let mut groups: Vec<(Category, f64, usize)> = Vec::new();
    for tx in expenses {
        match groups.iter_mut().find(|(cat, _, _)| *cat == tx.category) {
            Some(group) => {
                group.1 += tx.amount;
                group.2 += 1;
            }
            None => groups.push((tx.category, tx.amount, 1)),
        }
    }

    let mut patterns: Vec<SpendingPattern> = groups
        .into_iter()
        .map(|(category, cat_total, count)| SpendingPattern {
            category,
            total_amount: cat_total,
            transaction_count: count,
            average_amount: cat_total / count as f64,
            percentage: if total > 0.0 {
                cat_total / total * 100.0
            } else {
                0.0
            },
        })
        .collect();

    patterns.sort_by(|a, b| {
        b.total_amount
            .partial_cmp(&a.total_amount)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    patterns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::normalize::normalize;
    use crate::models::TransactionRecord;

    fn patterns_for(records: &[TransactionRecord]) -> Vec<SpendingPattern> {
        let txs = normalize(records).unwrap();
        let expenses: Vec<&NormalizedTransaction> = txs.iter().collect();
        analyze_spending_patterns(&expenses)
    }

    #[test]
    fn test_two_categories_sorted_by_total() {
        let patterns = patterns_for(&[
            TransactionRecord::expense(50.0, "food", "2024-01-01"),
            TransactionRecord::expense(100.0, "transport", "2024-01-02"),
        ]);

        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].category, Category::Transport);
        assert!((patterns[0].percentage - 66.666_666).abs() < 0.01);
        assert_eq!(patterns[1].category, Category::Food);
        assert!((patterns[1].percentage - 33.333_333).abs() < 0.01);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let patterns = patterns_for(&[
            TransactionRecord::expense(30.0, "shopping", "2024-01-01"),
            TransactionRecord::expense(30.0, "food", "2024-01-02"),
            TransactionRecord::expense(10.0, "healthcare", "2024-01-03"),
        ]);

        let order: Vec<Category> = patterns.iter().map(|p| p.category).collect();
        assert_eq!(
            order,
            vec![Category::Shopping, Category::Food, Category::Healthcare]
        );
    }

    #[test]
    fn test_aggregates_are_consistent() {
        let patterns = patterns_for(&[
            TransactionRecord::expense(12.5, "food", "2024-01-01"),
            TransactionRecord::expense(7.25, "food", "2024-01-02"),
            TransactionRecord::expense(3.0, "food", "2024-01-03"),
            TransactionRecord::expense(80.0, "utilities", "2024-01-04"),
            TransactionRecord::expense(19.99, "fun stuff", "2024-01-05"),
        ]);

        let pct_sum: f64 = patterns.iter().map(|p| p.percentage).sum();
        assert!((pct_sum - 100.0).abs() < 0.01);

        for p in &patterns {
            let rebuilt = p.average_amount * p.transaction_count as f64;
            assert!((rebuilt - p.total_amount).abs() < 1e-9);
        }

        let food = patterns.iter().find(|p| p.category == Category::Food).unwrap();
        assert_eq!(food.transaction_count, 3);
        assert!(patterns.iter().any(|p| p.category == Category::Other));
    }

    #[test]
    fn test_empty_expenses() {
        assert!(analyze_spending_patterns(&[]).is_empty());
    }
}
