//! Transaction import from CSV and JSON files

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::insights::normalize::normalize_record;
use crate::models::{TransactionBatch, TransactionRecord, TransactionType};

/// Supported import file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Csv,
    Json,
}

impl ImportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        ext.parse().ok()
    }
}

impl std::str::FromStr for ImportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown import format: {}", s)),
        }
    }
}

impl std::fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Records read from a file, plus how many rows were rejected
#[derive(Debug, Default)]
pub struct ParsedImport {
    pub records: Vec<TransactionRecord>,
    pub skipped: usize,
}

impl ParsedImport {
    /// Keep `record` if it would normalize, otherwise log and count it
    fn push_validated(&mut self, row: usize, record: TransactionRecord) {
        match normalize_record(row, &record) {
            Ok(_) => self.records.push(record),
            Err(e) => {
                warn!(row, error = %e, "Skipping invalid row");
                self.skipped += 1;
            }
        }
    }
}

/// Column positions resolved from a CSV header row
struct Columns {
    date: usize,
    amount: usize,
    category: usize,
    tx_type: Option<usize>,
    description: Option<usize>,
    id: Option<usize>,
    user_id: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |names: &[&str]| {
            headers.iter().position(|h| {
                let h = h.trim().to_lowercase();
                names.iter().any(|n| h == *n)
            })
        };
        let require = |name: &str| {
            find(&[name]).ok_or_else(|| Error::Import(format!("Missing required column: {}", name)))
        };

        Ok(Self {
            date: require("date")?,
            amount: require("amount")?,
            category: require("category")?,
            tx_type: find(&["type"]),
            description: find(&["description"]),
            id: find(&["id"]),
            user_id: find(&["userid", "user_id"]),
        })
    }
}

fn field<'r>(record: &'r StringRecord, index: Option<usize>) -> Option<&'r str> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Parse a headed CSV file.
///
/// Required columns are `date`, `amount` and `category`; `type`,
/// `description`, `id` and `userId` are optional. Rows without a `userId`
/// belong to `user_id`. A negative amount with no type is read as an expense
/// of the absolute value. Rows that fail validation are skipped.
pub fn parse_csv<R: Read>(reader: R, user_id: &str) -> Result<ParsedImport> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut parsed = ParsedImport::default();

    for (row, result) in rdr.records().enumerate() {
        let record = result?;

        let amount = match field(&record, Some(columns.amount)).map(parse_amount) {
            Some(Ok(amount)) => amount,
            Some(Err(e)) => {
                warn!(row, error = %e, "Skipping row with bad amount");
                parsed.skipped += 1;
                continue;
            }
            None => {
                warn!(row, "Skipping row with no amount");
                parsed.skipped += 1;
                continue;
            }
        };

        let tx_type = match field(&record, columns.tx_type) {
            Some(raw) => Some(canonical_type(raw)),
            None if amount < 0.0 => Some(TransactionType::Expense.as_str().to_string()),
            None => None,
        };

        let tx = TransactionRecord {
            id: field(&record, columns.id).map(str::to_string),
            amount: amount.abs(),
            category: field(&record, Some(columns.category))
                .unwrap_or_default()
                .to_string(),
            description: field(&record, columns.description).map(str::to_string),
            date: field(&record, Some(columns.date))
                .unwrap_or_default()
                .to_string(),
            user_id: field(&record, columns.user_id)
                .unwrap_or(user_id)
                .to_string(),
            tx_type,
        };

        parsed.push_validated(row, tx);
    }

    debug!(
        imported = parsed.records.len(),
        skipped = parsed.skipped,
        "Parsed CSV transactions"
    );
    Ok(parsed)
}

/// JSON import accepts a full batch or a bare array of records
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonPayload {
    Batch(TransactionBatch),
    Records(Vec<TransactionRecord>),
}

/// Parse a JSON file holding a `TransactionBatch` or an array of records.
///
/// Records without a `userId` take the batch's `userId`, falling back to
/// `user_id`. Records that fail validation are skipped.
pub fn parse_json<R: Read>(reader: R, user_id: &str) -> Result<ParsedImport> {
    let (records, owner) = match serde_json::from_reader(reader)? {
        JsonPayload::Batch(batch) => {
            let owner = if batch.user_id.trim().is_empty() {
                user_id.to_string()
            } else {
                batch.user_id
            };
            (batch.transactions, owner)
        }
        JsonPayload::Records(records) => (records, user_id.to_string()),
    };

    let mut parsed = ParsedImport::default();
    for (row, mut record) in records.into_iter().enumerate() {
        if record.user_id.trim().is_empty() {
            record.user_id = owner.clone();
        }
        parsed.push_validated(row, record);
    }

    debug!(
        imported = parsed.records.len(),
        skipped = parsed.skipped,
        "Parsed JSON transactions"
    );
    Ok(parsed)
}

/// Read and parse a file, detecting the format from its extension unless
/// one is given
pub fn import_file(path: &Path, format: Option<ImportFormat>, user_id: &str) -> Result<ParsedImport> {
    let format = format
        .or_else(|| ImportFormat::from_path(path))
        .ok_or_else(|| {
            Error::Import(format!(
                "Cannot detect format of {} (use .csv or .json)",
                path.display()
            ))
        })?;

    let reader = BufReader::new(File::open(path)?);
    match format {
        ImportFormat::Csv => parse_csv(reader, user_id),
        ImportFormat::Json => parse_json(reader, user_id),
    }
}

/// Parse an amount string, handling currency symbols, commas and
/// accounting-style parentheses
pub fn parse_amount(s: &str) -> Result<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::Import(format!("Unable to parse amount: {}", s)))
}

/// Upper-case the two known type names; anything else passes through
fn canonical_type(raw: &str) -> String {
    let upper = raw.to_uppercase();
    match upper.as_str() {
        "INCOME" | "EXPENSE" => upper,
        _ => raw.to_string(),
    }
}
