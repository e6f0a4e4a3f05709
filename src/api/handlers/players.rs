use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use super::{normalized_name, AppState, NameParams};
use crate::api::models::{HistoryPoint, NeverOnlineResponse, PlayerHistoryResponse};
use crate::store::SnapshotStore;

/// Experience history of one player across every stored snapshot.
pub async fn get_player_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NameParams>,
) -> impl IntoResponse {
    let Some(name) = normalized_name(&params) else {
        return (StatusCode::BAD_REQUEST, "Player name is required").into_response();
    };

    let dates = match state.store.list_available_dates() {
        Ok(dates) => dates,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Store error: {e}"))
                .into_response()
        }
    };
    if dates.is_empty() {
        return (StatusCode::NOT_FOUND, "No snapshot data available").into_response();
    }

    let mut history = Vec::new();
    for date in dates {
        let snapshot = match state.store.load(date) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                return (StatusCode::INTERNAL_SERVER_ERROR, format!("Store error: {e}"))
                    .into_response()
            }
        };
        if let Some(record) = snapshot.get(&name) {
            history.push(HistoryPoint {
                date: date.to_string(),
                experience: record.experience,
            });
        }
    }

    if history.is_empty() {
        return (
            StatusCode::NOT_FOUND,
            format!("Player \"{name}\" not found in any snapshot"),
        )
            .into_response();
    }

    Json(PlayerHistoryResponse {
        player: name,
        history,
    })
    .into_response()
}

/// Characters never observed online at the same time as the given one.
pub async fn get_never_online_with(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NameParams>,
) -> impl IntoResponse {
    let Some(name) = normalized_name(&params) else {
        return (StatusCode::BAD_REQUEST, "Player name is required").into_response();
    };

    match state.online_log.never_online_with(&name) {
        Ok(names) => Json(NeverOnlineResponse {
            player: name,
            never_online_with: names,
        })
        .into_response(),
        Err(e) => {
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Log error: {e}")).into_response()
        }
    }
}
