use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{Duration, NaiveDate};
use std::sync::Arc;

use super::AppState;
use crate::api::models::ReportResponse;
use crate::engine::ComparisonEngine;
use crate::store::SnapshotStore;

/// The comparison report for a stored snapshot date, as JSON rows.
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> impl IntoResponse {
    let Ok(date) = NaiveDate::parse_from_str(&date, "%Y-%m-%d") else {
        return (StatusCode::BAD_REQUEST, "Dates look like YYYY-MM-DD").into_response();
    };

    let current = match state.store.load(date) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Store error: {e}"))
                .into_response()
        }
    };
    if current.is_empty() {
        return (
            StatusCode::NOT_FOUND,
            format!("No snapshot recorded for {date}"),
        )
            .into_response();
    }

    let yesterday = match state.store.load(date - Duration::days(1)) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Store error: {e}"))
                .into_response()
        }
    };

    let engine = ComparisonEngine::new(&state.store, state.config.windows.clone());
    match engine.build_comparison(&current, &yesterday, date) {
        Ok(rows) => Json(ReportResponse {
            date: date.to_string(),
            rows,
        })
        .into_response(),
        Err(e) => {
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Report error: {e}")).into_response()
        }
    }
}
