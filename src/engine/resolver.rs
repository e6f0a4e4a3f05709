use anyhow::Result;
use chrono::{Duration, NaiveDate};
use log::debug;

use crate::domain::{LookbackWindow, Snapshot};
use crate::store::SnapshotStore;

/// A historical snapshot picked for a lookback window, together with where
/// it actually came from.
#[derive(Debug)]
pub struct ResolvedSnapshot {
    pub snapshot: Snapshot,
    pub date: NaiveDate,
    pub days_back: i64,
}

/// Finds the best available historical snapshot for a lookback window.
///
/// Snapshot captures are not guaranteed daily, so the exact day a window asks
/// for is often missing; the resolver scans outward from the preferred day
/// and takes the first date with data.
pub struct HistoricalResolver<'a> {
    store: &'a dyn SnapshotStore,
    reference_date: NaiveDate,
}

impl<'a> HistoricalResolver<'a> {
    pub fn new(store: &'a dyn SnapshotStore, reference_date: NaiveDate) -> Self {
        Self {
            store,
            reference_date,
        }
    }

    /// First non-empty snapshot between `target_days_back` and
    /// `max_days_back` (inclusive, nearest-to-target first). `None` means no
    /// data anywhere in the window, which is a soft miss, not an error.
    pub fn find_best_historical(&self, window: LookbackWindow) -> Result<Option<ResolvedSnapshot>> {
        for days_back in window.target_days_back..=window.max_days_back {
            let date = self.reference_date - Duration::days(days_back);
            let snapshot = self.store.load(date)?;
            if !snapshot.is_empty() {
                debug!("Resolved {days_back}-day lookback to snapshot {date}");
                return Ok(Some(ResolvedSnapshot {
                    snapshot,
                    date,
                    days_back,
                }));
            }
        }
        Ok(None)
    }

    /// The earliest snapshot the store knows about. Last-resort substitute
    /// when a windowed search comes up empty, so a long-range comparison
    /// still appears whenever any history exists at all.
    pub fn find_oldest_available(&self) -> Result<Option<ResolvedSnapshot>> {
        let Some(oldest) = self.store.list_available_dates()?.into_iter().min() else {
            return Ok(None);
        };

        let snapshot = self.store.load(oldest)?;
        if snapshot.is_empty() {
            return Ok(None);
        }

        let days_back = (self.reference_date - oldest).num_days();
        debug!("Falling back to oldest snapshot {oldest} ({days_back} days back)");
        Ok(Some(ResolvedSnapshot {
            snapshot,
            date: oldest,
            days_back,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{date, MemoryStore};

    #[test]
    fn nearest_to_target_wins() {
        // Only D-5 and D-9 exist; a (target 3, max 10) scan lands on D-5.
        let reference = date(2025, 6, 20);
        let store = MemoryStore::with_dates(&[
            (date(2025, 6, 15), &[("Anna", 100)]),
            (date(2025, 6, 11), &[("Anna", 50)]),
        ]);

        let resolver = HistoricalResolver::new(&store, reference);
        let resolved = resolver
            .find_best_historical(LookbackWindow::new(3, 10))
            .unwrap()
            .expect("a snapshot exists in the window");

        assert_eq!(resolved.date, date(2025, 6, 15));
        assert_eq!(resolved.days_back, 5);
        assert_eq!(resolved.snapshot.get("Anna").map(|r| r.experience), Some(100));
    }

    #[test]
    fn exhausted_window_is_a_soft_miss() {
        let store = MemoryStore::default();
        let resolver = HistoricalResolver::new(&store, date(2025, 6, 20));

        let resolved = resolver
            .find_best_historical(LookbackWindow::new(3, 10))
            .unwrap();
        assert!(resolved.is_none());
    }

    #[test]
    fn max_days_back_is_inclusive() {
        let reference = date(2025, 6, 20);
        let store = MemoryStore::with_dates(&[(date(2025, 6, 10), &[("Anna", 100)])]);

        let resolver = HistoricalResolver::new(&store, reference);
        let resolved = resolver
            .find_best_historical(LookbackWindow::new(3, 10))
            .unwrap()
            .expect("D-10 sits exactly on the bound");
        assert_eq!(resolved.days_back, 10);
    }

    #[test]
    fn oldest_available_picks_earliest_date() {
        let reference = date(2025, 6, 20);
        let store = MemoryStore::with_dates(&[
            (date(2025, 6, 18), &[("Anna", 300)]),
            (date(2025, 5, 1), &[("Anna", 10)]),
            (date(2025, 6, 1), &[("Anna", 100)]),
        ]);

        let resolver = HistoricalResolver::new(&store, reference);
        let resolved = resolver.find_oldest_available().unwrap().unwrap();
        assert_eq!(resolved.date, date(2025, 5, 1));
        assert_eq!(resolved.days_back, 50);
    }

    #[test]
    fn oldest_available_on_empty_store_is_none() {
        let store = MemoryStore::default();
        let resolver = HistoricalResolver::new(&store, date(2025, 6, 20));
        assert!(resolver.find_oldest_available().unwrap().is_none());
    }
}
