use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::{info, warn};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use super::SnapshotStore;
use crate::domain::{PlayerRecord, Snapshot};

/// Flat-file snapshot store: one `highscores_YYYY-MM-DD.csv` per capture day.
pub struct CsvSnapshotStore {
    snapshot_dir: PathBuf,
    filename_regex: Regex,
}

impl CsvSnapshotStore {
    pub fn new<P: AsRef<Path>>(snapshot_dir: P) -> Result<Self> {
        let snapshot_dir = snapshot_dir.as_ref().to_path_buf();
        fs::create_dir_all(&snapshot_dir).context("Failed to create snapshot directory")?;

        let filename_regex = Regex::new(r"^highscores_(\d{4}-\d{2}-\d{2})\.csv$")
            .context("Failed to compile snapshot filename regex")?;

        Ok(Self {
            snapshot_dir,
            filename_regex,
        })
    }

    /// Write a capture to its dated file. Snapshots are write-once: a second
    /// save for the same date replaces the file wholesale.
    pub fn save(&self, snapshot: &Snapshot) -> Result<PathBuf> {
        let date = snapshot
            .date()
            .context("Cannot save a snapshot without a date")?;
        let path = self.snapshot_path(date);

        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("Failed to create snapshot file {}", path.display()))?;
        writer.write_record(["Name", "Experience"])?;
        for record in snapshot.iter() {
            let experience = record.experience.to_string();
            writer.write_record([record.name.as_str(), experience.as_str()])?;
        }
        writer
            .flush()
            .context("Failed to flush snapshot file")?;

        info!(
            "Saved snapshot {} ({} players)",
            path.display(),
            snapshot.len()
        );
        Ok(path)
    }

    fn snapshot_path(&self, date: NaiveDate) -> PathBuf {
        self.snapshot_dir.join(format!("highscores_{date}.csv"))
    }

    fn read_snapshot(&self, path: &Path, date: NaiveDate) -> Result<Snapshot> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Failed to open snapshot file {}", path.display()))?;

        let columns = SnapshotColumns::from_headers(reader.headers()?)
            .with_context(|| format!("Unrecognized snapshot header in {}", path.display()))?;

        let mut snapshot = Snapshot::new(date);
        for row in reader.records() {
            let row = row.context("Failed to read snapshot row")?;
            match columns.parse_row(&row) {
                Some(record) => snapshot.insert(record),
                None => warn!("Skipping malformed row in {}", path.display()),
            }
        }
        Ok(snapshot)
    }
}

impl SnapshotStore for CsvSnapshotStore {
    fn load(&self, date: NaiveDate) -> Result<Snapshot> {
        let path = self.snapshot_path(date);
        if !path.exists() {
            return Ok(Snapshot::empty());
        }
        self.read_snapshot(&path, date)
    }

    fn list_available_dates(&self) -> Result<Vec<NaiveDate>> {
        let entries = fs::read_dir(&self.snapshot_dir)
            .with_context(|| format!("Failed to list {}", self.snapshot_dir.display()))?;

        let mut dates = Vec::new();
        for entry in entries {
            let file_name = entry?.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if let Some(captures) = self.filename_regex.captures(name) {
                // The regex only checks the shape, the parse rejects
                // nonsense like month 13.
                if let Ok(date) = NaiveDate::parse_from_str(&captures[1], "%Y-%m-%d") {
                    dates.push(date);
                }
            }
        }
        dates.sort();
        Ok(dates)
    }
}

/// Column positions resolved from the header row.
///
/// Early snapshot files carried only `Name,Experience`; later ones added
/// advisory `Rank` and `Level` columns. Both shapes normalize to the same
/// canonical record here, so nothing downstream branches on file vintage.
struct SnapshotColumns {
    name: usize,
    experience: usize,
    rank: Option<usize>,
    level: Option<usize>,
}

impl SnapshotColumns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let position = |wanted: &str| {
            headers
                .iter()
                .position(|header| header.trim().eq_ignore_ascii_case(wanted))
        };

        Ok(Self {
            name: position("Name").context("No Name column")?,
            experience: position("Experience").context("No Experience column")?,
            rank: position("Rank"),
            level: position("Level"),
        })
    }

    fn parse_row(&self, row: &csv::StringRecord) -> Option<PlayerRecord> {
        let name = row.get(self.name)?.trim();
        if name.is_empty() {
            return None;
        }
        let experience = parse_grouped_u64(row.get(self.experience)?)?;

        let mut record = PlayerRecord::new(name, experience);
        record.rank = self.optional_field(row, self.rank);
        record.level = self.optional_field(row, self.level);
        Some(record)
    }

    fn optional_field<T: std::str::FromStr>(
        &self,
        row: &csv::StringRecord,
        column: Option<usize>,
    ) -> Option<T> {
        column
            .and_then(|idx| row.get(idx))
            .and_then(|value| value.trim().parse().ok())
    }
}

/// The site renders experience with comma separators and early snapshot
/// files kept them.
fn parse_grouped_u64(value: &str) -> Option<u64> {
    let cleaned = value.trim().replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::TempDir;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn write_file(dir: &TempDir, name: &str, contents: &str) {
        let mut file = fs::File::create(dir.path().join(name)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn save_then_load_round_trips_in_order() {
        let dir = TempDir::new().unwrap();
        let store = CsvSnapshotStore::new(dir.path()).unwrap();

        let day = date(2025, 6, 20);
        let mut snapshot = Snapshot::new(day);
        snapshot.insert(PlayerRecord::new("Zoe", 123_456_789));
        snapshot.insert(PlayerRecord::new("Anna", 50));

        store.save(&snapshot).unwrap();
        let loaded = store.load(day).unwrap();

        assert_eq!(loaded.date(), Some(day));
        let names: Vec<&str> = loaded.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Zoe", "Anna"]);
        assert_eq!(loaded.get("Zoe").unwrap().experience, 123_456_789);
    }

    #[test]
    fn missing_date_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = CsvSnapshotStore::new(dir.path()).unwrap();
        let loaded = store.load(date(2025, 6, 20)).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn legacy_file_with_grouped_experience_parses() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "highscores_2025-06-20.csv",
            "Name,Experience\nAnna,\"1,234,567\"\nBob,999\n",
        );

        let store = CsvSnapshotStore::new(dir.path()).unwrap();
        let loaded = store.load(date(2025, 6, 20)).unwrap();
        assert_eq!(loaded.get("Anna").unwrap().experience, 1_234_567);
        assert_eq!(loaded.get("Bob").unwrap().experience, 999);
    }

    #[test]
    fn structured_file_with_rank_and_level_columns_parses() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "highscores_2025-06-20.csv",
            "Rank,Name,Level,Experience\n1,Anna,140.5,1234567\n2,Bob,55,999\n",
        );

        let store = CsvSnapshotStore::new(dir.path()).unwrap();
        let loaded = store.load(date(2025, 6, 20)).unwrap();

        let anna = loaded.get("Anna").unwrap();
        assert_eq!(anna.experience, 1_234_567);
        assert_eq!(anna.rank, Some(1));
        assert_eq!(anna.level, Some(140.5));
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let dir = TempDir::new().unwrap();
        write_file(
            &dir,
            "highscores_2025-06-20.csv",
            "Name,Experience\nAnna,100\nBroken,not-a-number\n,42\n",
        );

        let store = CsvSnapshotStore::new(dir.path()).unwrap();
        let loaded = store.load(date(2025, 6, 20)).unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.get("Anna").is_some());
    }

    #[test]
    fn lists_only_valid_snapshot_dates_ascending() {
        let dir = TempDir::new().unwrap();
        write_file(&dir, "highscores_2025-06-20.csv", "Name,Experience\n");
        write_file(&dir, "highscores_2025-06-18.csv", "Name,Experience\n");
        write_file(&dir, "highscores_2025-13-40.csv", "Name,Experience\n");
        write_file(&dir, "changes_2025-06-20.html", "<html></html>");
        write_file(&dir, "notes.txt", "nothing");

        let store = CsvSnapshotStore::new(dir.path()).unwrap();
        let dates = store.list_available_dates().unwrap();
        assert_eq!(dates, vec![date(2025, 6, 18), date(2025, 6, 20)]);
    }
}
