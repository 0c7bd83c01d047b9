//! Transaction handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use tracing::info;

use crate::{AppError, AppState};
use finsight_core::insights::normalize_record;
use finsight_core::models::TransactionBatch;
use finsight_core::InsertSummary;

/// POST /api/v1/transactions - Store a batch for later analysis
///
/// Records without a `userId` take the batch's. The whole batch is rejected
/// if any record is invalid; re-sent records are counted as duplicates.
pub async fn store_transactions(
    State(state): State<Arc<AppState>>,
    Json(batch): Json<TransactionBatch>,
) -> Result<Json<InsertSummary>, AppError> {
    if batch.user_id.trim().is_empty() {
        return Err(AppError::bad_request("userId is required"));
    }

    let mut records = batch.transactions;
    for (index, record) in records.iter_mut().enumerate() {
        if record.user_id.trim().is_empty() {
            record.user_id = batch.user_id.clone();
        }
        normalize_record(index, record).map_err(AppError::from_core)?;
    }

    let summary = state.db.insert_transactions(&records)?;

    info!(
        user_id = %batch.user_id,
        inserted = summary.inserted,
        duplicates = summary.duplicates,
        "Stored transactions"
    );
    Ok(Json(summary))
}
