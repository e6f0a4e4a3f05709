pub mod csv_store;
pub mod online_log;

pub use csv_store::CsvSnapshotStore;
pub use online_log::OnlineLog;

use anyhow::Result;
use chrono::NaiveDate;

use crate::domain::Snapshot;

/// Read contract for dated snapshot storage.
///
/// The comparison engine only ever reads through this trait, so the backing
/// format stays swappable. A date with nothing recorded loads as an empty
/// snapshot, never as an error.
pub trait SnapshotStore {
    fn load(&self, date: NaiveDate) -> Result<Snapshot>;

    /// Every date with a recorded snapshot, ascending.
    fn list_available_dates(&self) -> Result<Vec<NaiveDate>>;
}
