//! Insight report commands

use std::path::Path;

use anyhow::{Context, Result};
use finsight_core::import::import_file;
use finsight_core::insights::{normalize_record, HealthStatus, InsightsResponse};
use finsight_core::models::{NormalizedTransaction, TransactionRecord};
use finsight_core::{AnalyticsConfig, Database, InsightsEngine};
use tracing::warn;

use super::import::parse_format;
use super::truncate;

/// Analyze a file without touching the store
pub fn cmd_analyze(
    config: &AnalyticsConfig,
    file: &Path,
    user_id: &str,
    format: Option<&str>,
    json: bool,
) -> Result<()> {
    let format = parse_format(format)?;
    let parsed = import_file(file, format, user_id)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    if parsed.skipped > 0 {
        warn!(skipped = parsed.skipped, "Some rows were invalid and left out");
    }

    let engine = InsightsEngine::new(config.clone());
    let report = engine
        .analyze(&parsed.records, user_id)
        .context("Failed to analyze transactions")?;

    emit_report(&report, json)
}

/// Analyze a user's stored transactions
pub fn cmd_insights(db: &Database, config: &AnalyticsConfig, user_id: &str, json: bool) -> Result<()> {
    let records = db
        .list_user_transactions(user_id)
        .with_context(|| format!("Failed to load transactions for {}", user_id))?;

    let transactions = normalize_stored(user_id, &records);
    let report = InsightsEngine::new(config.clone()).analyze_normalized(&transactions, user_id);

    emit_report(&report, json)
}

/// Normalize stored rows, logging and dropping any that fail validation
pub fn normalize_stored(user_id: &str, records: &[TransactionRecord]) -> Vec<NormalizedTransaction> {
    records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match normalize_record(index, record) {
            Ok(tx) => Some(tx),
            Err(e) => {
                warn!(user_id, id = ?record.id, error = %e, "Skipping stored transaction");
                None
            }
        })
        .collect()
}

fn emit_report(report: &InsightsResponse, json: bool) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        println!("{}", out);
    } else {
        print_report(report);
    }
    Ok(())
}

/// Render a report as text
pub fn print_report(report: &InsightsResponse) {
    let summary = &report.income_vs_expense;

    println!();
    println!("📊 Insights for {}", report.user_id);
    println!();
    println!("   Income:        ${:>12.2}", summary.total_income);
    println!("   Expenses:      ${:>12.2}", summary.total_expense);
    println!("   Net balance:   ${:>12.2}", summary.net_balance);
    println!(
        "   Savings rate:  {:>12.1}%  ({})",
        summary.savings_rate, summary.status
    );
    println!();
    println!("   Daily average: ${:>12.2}", report.average_daily_spending);
    println!("   Projected:     ${:>12.2} / month", report.projected_monthly_spending);

    if !report.spending_patterns.is_empty() {
        println!();
        println!("💳 Spending by category");
        println!(
            "   {:15} │ {:>10} │ {:>5} │ {:>9} │ {:>6}",
            "Category", "Total", "Count", "Average", "Share"
        );
        println!("   ────────────────┼────────────┼───────┼───────────┼────────");
        for p in &report.spending_patterns {
            println!(
                "   {:15} │ {:>10.2} │ {:>5} │ {:>9.2} │ {:>5.1}%",
                p.category.as_str(),
                p.total_amount,
                p.transaction_count,
                p.average_amount,
                p.percentage
            );
        }
    }

    if !report.category_health.is_empty() {
        println!();
        println!("🩺 Category health");
        for h in &report.category_health {
            let icon = match h.status {
                HealthStatus::Bad => "🔴",
                HealthStatus::Warning => "🟡",
                HealthStatus::Good => "🟢",
            };
            println!("   {} {:15} {}", icon, h.category.as_str(), h.reason);
            println!("      → {}", h.recommendation);
        }
    }

    if !report.budget_recommendations.is_empty() {
        println!();
        println!("🎯 Budget recommendations");
        for r in &report.budget_recommendations {
            println!(
                "   [{:6}] {:15} ${:>9.2} (now ${:.2}) {}",
                r.priority.as_str(),
                r.category.as_str(),
                r.recommended_amount,
                r.current_spending,
                r.reason
            );
        }
    }

    if !report.anomalies.is_empty() {
        println!();
        println!("⚠️  Unusual transactions");
        for a in &report.anomalies {
            println!(
                "   {} {:20} ${:>9.2} {:15} score {:.3}",
                a.date.format("%Y-%m-%d"),
                truncate(&a.transaction_id, 20),
                a.amount,
                a.category.as_str(),
                a.anomaly_score
            );
        }
    }

    println!();
    println!("💡 Savings opportunities");
    for s in &report.savings_opportunities {
        println!("   • {}", s);
    }
}
