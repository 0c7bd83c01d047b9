//! Insight handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::{AppError, AppState};
use finsight_core::insights::{normalize_record, InsightsResponse};
use finsight_core::models::{Category, TransactionBatch, TransactionRecord};

/// Response for the category listing
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<&'static str>,
}

/// GET /api/v1/insights/categories - The closed category set
pub async fn list_categories() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: Category::all().iter().map(|c| c.as_str()).collect(),
    })
}

/// POST /api/v1/insights/analyze - Analyze a batch for one user
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(batch): Json<TransactionBatch>,
) -> Result<Json<InsightsResponse>, AppError> {
    let report = state
        .engine
        .analyze(&batch.transactions, &batch.user_id)
        .map_err(AppError::from_core)?;

    info!(
        user_id = %batch.user_id,
        transactions = batch.transactions.len(),
        "Analyzed batch"
    );
    Ok(Json(report))
}

/// POST /api/v1/insights/quick-analyze - Analyze a bare list of records
///
/// The user id is taken from the first record.
pub async fn quick_analyze(
    State(state): State<Arc<AppState>>,
    Json(transactions): Json<Vec<TransactionRecord>>,
) -> Result<Json<InsightsResponse>, AppError> {
    let first = transactions
        .first()
        .ok_or_else(|| AppError::bad_request("No transactions provided"))?;
    let user_id = first.user_id.clone();

    let report = state
        .engine
        .analyze(&transactions, &user_id)
        .map_err(AppError::from_core)?;

    Ok(Json(report))
}

/// GET /api/v1/insights/user/:user_id - Analyze a user's stored transactions
///
/// Stored rows that fail validation are logged and left out.
pub async fn user_insights(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<InsightsResponse>, AppError> {
    let records = state.db.list_user_transactions(&user_id)?;

    let mut skipped = 0usize;
    let transactions: Vec<_> = records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match normalize_record(index, record) {
            Ok(tx) => Some(tx),
            Err(e) => {
                warn!(user_id = %user_id, id = ?record.id, error = %e, "Skipping stored transaction");
                skipped += 1;
                None
            }
        })
        .collect();

    if skipped > 0 {
        warn!(user_id = %user_id, skipped, "Some stored transactions were invalid");
    }

    Ok(Json(state.engine.analyze_normalized(&transactions, &user_id)))
}
