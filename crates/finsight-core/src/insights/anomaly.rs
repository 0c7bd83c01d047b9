//! Anomaly detector - isolation forest over expense amounts

use std::collections::HashMap;

use tracing::debug;

use crate::config::AnomalyConfig;
use crate::models::{Category, NormalizedTransaction};

use super::types::AnomalyDetection;

/// Flags unusual expenses.
///
/// Holds only settings; every call to [`AnomalyDetector::detect`] fits a
/// fresh forest.
#[derive(Debug, Clone, Default)]
pub struct AnomalyDetector {
    config: AnomalyConfig,
}

impl AnomalyDetector {
    pub fn new(config: AnomalyConfig) -> Self {
        Self { config }
    }

    /// Flag outliers among `expenses`, in input order.
    ///
    /// Returns nothing when there are fewer than `min_transactions` expenses.
    pub fn detect(&self, expenses: &[&NormalizedTransaction]) -> Vec<AnomalyDetection> {
        if expenses.is_empty() || expenses.len() < self.config.min_transactions {
            debug!(
                count = expenses.len(),
                min = self.config.min_transactions,
                "Too few expenses for anomaly detection"
            );
            return Vec::new();
        }

        let amounts: Vec<f64> = expenses.iter().map(|tx| tx.amount).collect();
        let forest = self.config.forest().fit(&amounts);
        let means = category_means(expenses);

        let anomalies: Vec<AnomalyDetection> = expenses
            .iter()
            .filter(|tx| forest.is_outlier(tx.amount))
            .map(|tx| {
                let mean = means.get(&tx.category).copied().unwrap_or(0.0);
                AnomalyDetection {
                    transaction_id: tx.id.clone(),
                    amount: tx.amount,
                    category: tx.category,
                    date: tx.date,
                    anomaly_score: forest.score(tx.amount).abs(),
                    reason: format!(
                        "Amount is ${:.2} away from average {} spending",
                        (tx.amount - mean).abs(),
                        tx.category
                    ),
                }
            })
            .collect();

        debug!(
            checked = expenses.len(),
            flagged = anomalies.len(),
            "Anomaly detection complete"
        );
        anomalies
    }
}

fn category_means(expenses: &[&NormalizedTransaction]) -> HashMap<Category, f64> {
    let mut sums: HashMap<Category, (f64, usize)> = HashMap::new();
    for tx in expenses {
        let entry = sums.entry(tx.category).or_insert((0.0, 0));
        entry.0 += tx.amount;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(cat, (sum, count))| (cat, sum / count as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::normalize::normalize;
    use crate::models::TransactionRecord;

    fn grocery_run(n: usize) -> Vec<TransactionRecord> {
        (0..n)
            .map(|i| {
                TransactionRecord::expense(
                    40.0 + (i % 5) as f64 * 3.0,
                    "food",
                    format!("2024-02-{:02}", i + 1),
                )
            })
            .collect()
    }

    #[test]
    fn test_too_few_expenses() {
        let records = grocery_run(9);
        let txs = normalize(&records).unwrap();
        let expenses: Vec<&NormalizedTransaction> = txs.iter().collect();

        assert!(AnomalyDetector::default().detect(&expenses).is_empty());
    }

    #[test]
    fn test_runs_at_exactly_min_transactions() {
        let mut records = grocery_run(9);
        records.push(TransactionRecord::expense(2400.0, "food", "2024-02-15").with_id("spike"));
        let txs = normalize(&records).unwrap();
        let expenses: Vec<&NormalizedTransaction> = txs.iter().collect();
        assert_eq!(expenses.len(), AnomalyConfig::default().min_transactions);

        let anomalies = AnomalyDetector::default().detect(&expenses);
        assert!(anomalies.iter().any(|a| a.transaction_id == "spike"));
    }

    #[test]
    fn test_flags_large_purchase() {
        let mut records = grocery_run(15);
        records.insert(
            7,
            TransactionRecord::expense(2400.0, "shopping", "2024-02-20").with_id("tv"),
        );
        let txs = normalize(&records).unwrap();
        let expenses: Vec<&NormalizedTransaction> = txs.iter().collect();

        let anomalies = AnomalyDetector::default().detect(&expenses);
        let tv = anomalies
            .iter()
            .find(|a| a.transaction_id == "tv")
            .expect("large purchase flagged");

        assert_eq!(tv.category, Category::Shopping);
        assert!(tv.anomaly_score > 0.0);
        // Only purchase in its category, so it sits on its own mean
        assert_eq!(tv.reason, "Amount is $0.00 away from average shopping spending");
    }

    #[test]
    fn test_synthetic_ids_and_order() {
        let mut records = grocery_run(12);
        records.push(TransactionRecord::expense(900.0, "food", "2024-02-28"));
        let txs = normalize(&records).unwrap();
        let expenses: Vec<&NormalizedTransaction> = txs.iter().collect();

        let anomalies = AnomalyDetector::default().detect(&expenses);
        assert!(anomalies.iter().any(|a| a.transaction_id == "tx_12"));

        let positions: Vec<usize> = anomalies
            .iter()
            .map(|a| txs.iter().position(|t| t.id == a.transaction_id).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_reason_uses_category_mean() {
        let mut records = grocery_run(12);
        records.push(TransactionRecord::expense(900.0, "food", "2024-02-28").with_id("big"));
        let txs = normalize(&records).unwrap();
        let expenses: Vec<&NormalizedTransaction> = txs.iter().collect();

        let mean = expenses.iter().map(|t| t.amount).sum::<f64>() / expenses.len() as f64;
        let anomalies = AnomalyDetector::default().detect(&expenses);
        let big = anomalies.iter().find(|a| a.transaction_id == "big").unwrap();

        assert_eq!(
            big.reason,
            format!(
                "Amount is ${:.2} away from average food spending",
                (900.0 - mean).abs()
            )
        );
    }

    #[test]
    fn test_repeatable() {
        let mut records = grocery_run(20);
        records.push(TransactionRecord::expense(700.0, "utilities", "2024-02-27"));
        let txs = normalize(&records).unwrap();
        let expenses: Vec<&NormalizedTransaction> = txs.iter().collect();

        let detector = AnomalyDetector::default();
        assert_eq!(detector.detect(&expenses), detector.detect(&expenses));
    }
}
