//! Normalizer - validates transaction records into the engine's representation

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{Error, Result};
use crate::models::{Category, NormalizedTransaction, TransactionRecord, TransactionType};

/// Date-time formats accepted without an explicit offset (interpreted as UTC)
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Date-only formats (midnight UTC)
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", // 2024-01-15
    "%m/%d/%Y", // 01/15/2024
    "%m/%d/%y", // 01/15/24
    "%m-%d-%Y", // 01-15-2024
    "%d/%m/%Y", // 15/01/2024 (European)
];

/// Parse a timestamp string into UTC
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    None
}

/// Validate and coerce a single record
///
/// `index` is the record's position in the input; it names the synthetic id
/// (`tx_{index}`) and is quoted in validation errors.
pub fn normalize_record(index: usize, record: &TransactionRecord) -> Result<NormalizedTransaction> {
    if !record.amount.is_finite() || record.amount <= 0.0 {
        return Err(Error::validation(
            index,
            format!("amount must be positive, got {}", record.amount),
        ));
    }

    let category = Category::coerce(&record.category)
        .ok_or_else(|| Error::validation(index, "category is blank"))?;

    let date = parse_timestamp(&record.date)
        .ok_or_else(|| Error::validation(index, format!("unparseable date '{}'", record.date)))?;

    let id = record
        .id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("tx_{}", index));

    Ok(NormalizedTransaction {
        id,
        tx_type: TransactionType::from_raw(record.tx_type.as_deref()),
        amount: record.amount,
        category,
        description: record.description.clone().unwrap_or_default(),
        date,
        user_id: record.user_id.clone(),
    })
}

/// Normalize a full batch, failing on the first invalid record
pub fn normalize(records: &[TransactionRecord]) -> Result<Vec<NormalizedTransaction>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| normalize_record(index, record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_timestamp_formats() {
        let rfc = parse_timestamp("2024-03-01T10:30:00+02:00").unwrap();
        assert_eq!(rfc.hour(), 8);

        let naive = parse_timestamp("2024-03-01T10:30:00.250").unwrap();
        assert_eq!(naive.minute(), 30);

        let date = parse_timestamp("2024-03-01").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 3, 1));

        let us = parse_timestamp("01/15/2024").unwrap();
        assert_eq!(us.day(), 15);

        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_normalize_defaults() {
        let record = TransactionRecord::expense(20.0, "Groceries", "2024-01-01").without_type();
        let tx = normalize_record(3, &record).unwrap();

        assert_eq!(tx.id, "tx_3");
        assert_eq!(tx.tx_type, TransactionType::Expense);
        assert_eq!(tx.category, Category::Other);
        assert_eq!(tx.description, "");
    }

    #[test]
    fn test_normalize_keeps_explicit_id() {
        let record = TransactionRecord::income(500.0, "other", "2024-01-01").with_id("pay-7");
        let tx = normalize_record(0, &record).unwrap();
        assert_eq!(tx.id, "pay-7");
        assert!(tx.is_income());
    }

    #[test]
    fn test_normalize_rejects_non_positive_amount() {
        let zero = TransactionRecord::expense(0.0, "food", "2024-01-01");
        let negative = TransactionRecord::expense(-5.0, "food", "2024-01-01");
        let nan = TransactionRecord::expense(f64::NAN, "food", "2024-01-01");

        for record in [zero, negative, nan] {
            let err = normalize_record(0, &record).unwrap_err();
            assert!(err.is_validation());
        }
    }

    #[test]
    fn test_normalize_rejects_bad_date_and_blank_category() {
        let bad_date = TransactionRecord::expense(5.0, "food", "not a date");
        assert!(normalize_record(0, &bad_date).unwrap_err().is_validation());

        let blank = TransactionRecord::expense(5.0, "  ", "2024-01-01");
        assert!(normalize_record(0, &blank).unwrap_err().is_validation());
    }

    #[test]
    fn test_normalize_batch_reports_index() {
        let records = vec![
            TransactionRecord::expense(5.0, "food", "2024-01-01"),
            TransactionRecord::expense(-1.0, "food", "2024-01-02"),
        ];
        let err = normalize(&records).unwrap_err();
        assert!(err.to_string().contains("transaction 1"));
    }
}
