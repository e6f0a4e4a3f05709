use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of the experience highscore table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub experience: u64,
    /// Rank as stored in an older snapshot file. Advisory only, ranks are
    /// always recomputed from experience.
    pub rank: Option<u32>,
    /// Level as stored in an older snapshot file. Advisory only.
    pub level: Option<f64>,
}

impl PlayerRecord {
    pub fn new(name: impl Into<String>, experience: u64) -> Self {
        Self {
            name: name.into(),
            experience,
            rank: None,
            level: None,
        }
    }
}

/// A dated, write-once capture of the full highscore table.
///
/// Keyed by player name, which is unique within a capture. Insertion order is
/// preserved: the stable tie-break in rank calculation depends on the order
/// players were encountered in the source.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    date: Option<NaiveDate>,
    records: Vec<PlayerRecord>,
    by_name: HashMap<String, usize>,
}

impl Snapshot {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            records: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// An empty, undated snapshot. Signals "nothing recorded for that date".
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Insert a record. A duplicate name overwrites the earlier record but
    /// keeps its original position.
    pub fn insert(&mut self, record: PlayerRecord) {
        match self.by_name.get(&record.name) {
            Some(&idx) => self.records[idx] = record,
            None => {
                self.by_name.insert(record.name.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&PlayerRecord> {
        self.by_name.get(name).map(|&idx| &self.records[idx])
    }

    /// Records in the order they were inserted.
    pub fn iter(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<PlayerRecord> for Snapshot {
    fn from_iter<I: IntoIterator<Item = PlayerRecord>>(iter: I) -> Self {
        let mut snapshot = Snapshot::empty();
        for record in iter {
            snapshot.insert(record);
        }
        snapshot
    }
}

/// How far a historical lookup may drift from its preferred day before
/// giving up. A policy value, carried in configuration.
#[derive(Debug, Clone, Copy)]
pub struct LookbackWindow {
    pub target_days_back: i64,
    pub max_days_back: i64,
}

impl LookbackWindow {
    pub fn new(target_days_back: i64, max_days_back: i64) -> Self {
        Self {
            target_days_back,
            max_days_back,
        }
    }
}

/// One report line for a player present in the current snapshot.
///
/// Comparison columns are `None` when the corresponding historical snapshot
/// is missing or does not contain the player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub name: String,
    pub experience: u64,
    pub rank: Option<u32>,
    pub level: f64,
    pub yesterday_exp: Option<u64>,
    pub exp_day_change: Option<i64>,
    /// Positive means the player climbed the table since yesterday.
    pub rank_day_change: Option<i64>,
    pub week_exp: Option<u64>,
    pub exp_week_change: Option<i64>,
    pub month_exp: Option<u64>,
    pub exp_month_change: Option<i64>,
}
