use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use log::info;
use std::collections::BTreeSet;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One capture of the who-is-online page.
#[derive(Debug, Clone)]
pub struct OnlineSession {
    pub timestamp: String,
    pub players: Vec<String>,
}

/// Append-only log of who was online at each capture.
///
/// Rows are variable length: a timestamp followed by every character name
/// seen online at that moment.
pub struct OnlineLog {
    path: PathBuf,
}

impl OnlineLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn record(&self, timestamp: NaiveDateTime, players: &[String]) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open online log {}", self.path.display()))?;

        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_writer(file);

        let mut row = vec![timestamp.format(TIMESTAMP_FORMAT).to_string()];
        row.extend(players.iter().cloned());
        writer.write_record(&row)?;
        writer.flush().context("Failed to flush online log")?;

        info!("Logged {} online players", players.len());
        Ok(())
    }

    /// All captures, oldest first. A missing log file is just an empty log.
    pub fn sessions(&self) -> Result<Vec<OnlineSession>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_path(&self.path)
            .with_context(|| format!("Failed to open online log {}", self.path.display()))?;

        let mut sessions = Vec::new();
        for row in reader.records() {
            let row = row.context("Failed to read online log row")?;
            let Some(timestamp) = row.get(0) else {
                continue;
            };
            sessions.push(OnlineSession {
                timestamp: timestamp.to_string(),
                players: row
                    .iter()
                    .skip(1)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect(),
            });
        }
        Ok(sessions)
    }

    /// Characters that were never observed online at the same time as
    /// `target`, sorted by name. `target` itself is excluded.
    pub fn never_online_with(&self, target: &str) -> Result<Vec<String>> {
        let mut all_players = BTreeSet::new();
        let mut online_with_target = BTreeSet::new();

        for session in self.sessions()? {
            let has_target = session.players.iter().any(|name| name == target);
            for player in session.players {
                if has_target {
                    online_with_target.insert(player.clone());
                }
                all_players.insert(player);
            }
        }

        all_players.remove(target);
        Ok(all_players
            .into_iter()
            .filter(|name| !online_with_target.contains(name))
            .collect())
    }
}
