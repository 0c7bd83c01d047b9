//! Transaction operations

use std::collections::HashMap;

use rusqlite::{params, Row};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::Database;
use crate::error::Result;
use crate::insights::normalize::parse_timestamp;
use crate::models::{Category, TransactionRecord};

/// Outcome of a bulk insert
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InsertSummary {
    pub inserted: usize,
    pub duplicates: usize,
}

/// A user with stored transactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub user_id: String,
    pub transaction_count: i64,
}

/// Stable id for a record without one, derived from its contents.
///
/// `occurrence` numbers identical records within one batch (two same-day
/// coffees) so each is stored; the first occurrence hashes without it.
pub fn content_hash(tx: &TransactionRecord, occurrence: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(tx.user_id.as_bytes());
    hasher.update(tx.date.trim().as_bytes());
    hasher.update(tx.amount.to_be_bytes());
    hasher.update(tx.category.trim().as_bytes());
    hasher.update(tx.description.as_deref().unwrap_or("").as_bytes());
    hasher.update(tx.tx_type.as_deref().unwrap_or("").as_bytes());
    if occurrence > 0 {
        hasher.update(occurrence.to_be_bytes());
    }
    hex::encode(hasher.finalize())
}

fn explicit_id(tx: &TransactionRecord) -> Option<String> {
    tx.id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Ids under which a batch is stored, numbering repeated content hashes
fn storage_ids(records: &[TransactionRecord]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    records
        .iter()
        .map(|tx| {
            explicit_id(tx).unwrap_or_else(|| {
                let occurrence = seen.entry(content_hash(tx, 0)).or_insert(0);
                let id = content_hash(tx, *occurrence);
                *occurrence += 1;
                id
            })
        })
        .collect()
}

/// Dates that parse are stored as RFC 3339 so they sort chronologically
fn storage_date(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| raw.trim().to_string())
}

const INSERT_SQL: &str = r#"
    INSERT OR IGNORE INTO transactions (id, user_id, type, amount, category, description, date)
    VALUES (?, ?, ?, ?, ?, ?, ?)
"#;

impl Database {
    /// Insert a transaction (skips duplicates based on id)
    ///
    /// Returns the stored id, or `None` if a row with that id already exists.
    pub fn insert_transaction(&self, tx: &TransactionRecord) -> Result<Option<String>> {
        let conn = self.conn()?;
        let id = explicit_id(tx).unwrap_or_else(|| content_hash(tx, 0));

        let changed = conn.execute(
            INSERT_SQL,
            params![
                id,
                tx.user_id,
                tx.tx_type,
                tx.amount,
                tx.category,
                tx.description,
                storage_date(&tx.date),
            ],
        )?;

        Ok((changed > 0).then_some(id))
    }

    /// Insert many transactions in one SQLite transaction.
    ///
    /// Identical records without ids inside one batch are all kept; importing
    /// the same batch again reproduces their ids, so they count as duplicates.
    pub fn insert_transactions(&self, records: &[TransactionRecord]) -> Result<InsertSummary> {
        let mut conn = self.conn()?;
        let db_tx = conn.transaction()?;
        let mut summary = InsertSummary::default();

        {
            let mut stmt = db_tx.prepare(INSERT_SQL)?;
            for (tx, id) in records.iter().zip(storage_ids(records)) {
                let changed = stmt.execute(params![
                    id,
                    tx.user_id,
                    tx.tx_type,
                    tx.amount,
                    tx.category,
                    tx.description,
                    storage_date(&tx.date),
                ])?;
                if changed > 0 {
                    summary.inserted += 1;
                } else {
                    summary.duplicates += 1;
                }
            }
        }

        db_tx.commit()?;
        debug!(
            inserted = summary.inserted,
            duplicates = summary.duplicates,
            "Stored transactions"
        );
        Ok(summary)
    }

    /// All transactions for a user, oldest first.
    ///
    /// Categories come back remapped onto the closed set; rows are not
    /// otherwise validated.
    pub fn list_user_transactions(&self, user_id: &str) -> Result<Vec<TransactionRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, type, amount, category, description, date
            FROM transactions
            WHERE user_id = ?
            ORDER BY date ASC, rowid ASC
            "#,
        )?;

        let records = stmt
            .query_map(params![user_id], |row| Self::row_to_record(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn row_to_record(row: &Row) -> rusqlite::Result<TransactionRecord> {
        let category: String = row.get(4)?;
        let category = Category::coerce(&category)
            .map(|c| c.as_str().to_string())
            .unwrap_or(category);

        Ok(TransactionRecord {
            id: Some(row.get(0)?),
            user_id: row.get(1)?,
            tx_type: row.get(2)?,
            amount: row.get(3)?,
            category,
            description: row.get(5)?,
            date: row.get(6)?,
        })
    }

    /// Number of stored transactions for a user
    pub fn count_transactions(&self, user_id: &str) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Users with stored transactions, alphabetically
    pub fn list_users(&self) -> Result<Vec<UserSummary>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT user_id, COUNT(*)
            FROM transactions
            GROUP BY user_id
            ORDER BY user_id
            "#,
        )?;

        let users = stmt
            .query_map([], |row| {
                Ok(UserSummary {
                    user_id: row.get(0)?,
                    transaction_count: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(users)
    }

    /// Delete every transaction for a user, returning how many were removed
    pub fn delete_user_transactions(&self, user_id: &str) -> Result<usize> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM transactions WHERE user_id = ?", params![user_id])?;
        Ok(deleted)
    }
}
