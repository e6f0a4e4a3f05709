use serde::Serialize;

use crate::domain::ComparisonRow;

#[derive(Serialize)]
pub struct HistoryPoint {
    pub date: String,
    pub experience: u64,
}

#[derive(Serialize)]
pub struct PlayerHistoryResponse {
    pub player: String,
    pub history: Vec<HistoryPoint>,
}

#[derive(Serialize)]
pub struct ReportResponse {
    pub date: String,
    pub rows: Vec<ComparisonRow>,
}

#[derive(Serialize)]
pub struct NeverOnlineResponse {
    pub player: String,
    pub never_online_with: Vec<String>,
}
