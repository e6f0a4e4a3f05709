use serde::Deserialize;

use crate::config::settings::AppConfig;
use crate::store::{CsvSnapshotStore, OnlineLog};

pub mod players;
pub mod reports;

pub struct AppState {
    pub store: CsvSnapshotStore,
    pub online_log: OnlineLog,
    pub config: AppConfig,
}

#[derive(Deserialize)]
pub struct NameParams {
    pub name: Option<String>,
}

/// A trimmed, non-empty player name, or nothing worth looking up.
pub fn normalized_name(params: &NameParams) -> Option<String> {
    params
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
