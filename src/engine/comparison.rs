use anyhow::{bail, Result};
use chrono::NaiveDate;
use log::info;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::config::settings::WindowSettings;
use crate::domain::{ComparisonRow, LookbackWindow, Snapshot};
use crate::engine::level::estimate_level;
use crate::engine::ranks::compute_ranks;
use crate::engine::resolver::{HistoricalResolver, ResolvedSnapshot};
use crate::store::SnapshotStore;

/// Builds the per-player comparison report for a reference date.
///
/// Pure orchestration over the store handle it is given: resolves the week
/// and month snapshots, recomputes ranks, and emits one row per player that
/// changed. Calling it twice with the same inputs gives the same output.
pub struct ComparisonEngine<'a> {
    store: &'a dyn SnapshotStore,
    windows: WindowSettings,
}

impl<'a> ComparisonEngine<'a> {
    pub fn new(store: &'a dyn SnapshotStore, windows: WindowSettings) -> Self {
        Self { store, windows }
    }

    /// One ordered row per player in `current` with at least one non-zero
    /// experience delta.
    ///
    /// An empty `current` snapshot is a precondition failure. Empty or
    /// missing historical snapshots are not: their columns come out `None`.
    pub fn build_comparison(
        &self,
        current: &Snapshot,
        yesterday: &Snapshot,
        reference_date: NaiveDate,
    ) -> Result<Vec<ComparisonRow>> {
        if current.is_empty() {
            bail!("no snapshot data for {reference_date}, refusing to build a report");
        }

        let resolver = HistoricalResolver::new(self.store, reference_date);
        let week = self.resolve_window(&resolver, self.windows.week)?;
        let month = self.resolve_window(&resolver, self.windows.month)?;

        let current_ranks = compute_ranks(current);
        let yesterday_ranks = compute_ranks(yesterday);

        let mut rows: Vec<ComparisonRow> = current
            .iter()
            .map(|record| {
                build_row(
                    record.name.as_str(),
                    record.experience,
                    yesterday,
                    week.as_ref(),
                    month.as_ref(),
                    &current_ranks,
                    &yesterday_ranks,
                )
            })
            .filter(has_nonzero_delta)
            .collect();

        sort_rows(&mut rows);

        info!(
            "Built comparison for {reference_date}: {} of {} players changed",
            rows.len(),
            current.len()
        );
        Ok(rows)
    }

    /// Windowed search first, oldest-ever snapshot as last resort.
    fn resolve_window(
        &self,
        resolver: &HistoricalResolver,
        window: LookbackWindow,
    ) -> Result<Option<ResolvedSnapshot>> {
        match resolver.find_best_historical(window)? {
            Some(resolved) => Ok(Some(resolved)),
            None => resolver.find_oldest_available(),
        }
    }
}

fn build_row(
    name: &str,
    experience: u64,
    yesterday: &Snapshot,
    week: Option<&ResolvedSnapshot>,
    month: Option<&ResolvedSnapshot>,
    current_ranks: &HashMap<String, u32>,
    yesterday_ranks: &HashMap<String, u32>,
) -> ComparisonRow {
    let yesterday_exp = yesterday.get(name).map(|r| r.experience);
    let week_exp = lookup_experience(week, name);
    let month_exp = lookup_experience(month, name);

    let rank = current_ranks.get(name).copied();
    let rank_day_change = match (yesterday_ranks.get(name), rank) {
        (Some(&old), Some(new)) => Some(old as i64 - new as i64),
        _ => None,
    };

    ComparisonRow {
        name: name.to_string(),
        experience,
        rank,
        level: estimate_level(experience),
        yesterday_exp,
        exp_day_change: delta(experience, yesterday_exp),
        rank_day_change,
        week_exp,
        exp_week_change: delta(experience, week_exp),
        month_exp,
        exp_month_change: delta(experience, month_exp),
    }
}

fn lookup_experience(resolved: Option<&ResolvedSnapshot>, name: &str) -> Option<u64> {
    resolved
        .and_then(|r| r.snapshot.get(name))
        .map(|record| record.experience)
}

fn delta(current: u64, comparison: Option<u64>) -> Option<i64> {
    comparison.map(|old| current as i64 - old as i64)
}

/// Players flat across every window carry no signal and are dropped.
fn has_nonzero_delta(row: &ComparisonRow) -> bool {
    [row.exp_day_change, row.exp_week_change, row.exp_month_change]
        .iter()
        .any(|change| matches!(change, Some(c) if *c != 0))
}

/// Current rank ascending, missing rank last, ties by case-insensitive name.
fn sort_rows(rows: &mut [ComparisonRow]) {
    rows.sort_by(|a, b| match (a.rank, b.rank) {
        (Some(ra), Some(rb)) => ra.cmp(&rb).then_with(|| name_order(a, b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => name_order(a, b),
    });
}

fn name_order(a: &ComparisonRow, b: &ComparisonRow) -> Ordering {
    a.name.to_lowercase().cmp(&b.name.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlayerRecord;
    use crate::engine::test_support::{date, snapshot_at, MemoryStore};

    fn default_windows() -> WindowSettings {
        WindowSettings::default()
    }

    #[test]
    fn day_only_comparison_drops_unchanged_players() {
        let reference = date(2025, 6, 20);
        let current = snapshot_at(reference, &[("A", 1500), ("B", 800)]);
        let yesterday = snapshot_at(reference.pred_opt().unwrap(), &[("A", 1000), ("B", 800)]);
        let store = MemoryStore::default();

        let engine = ComparisonEngine::new(&store, default_windows());
        let rows = engine
            .build_comparison(&current, &yesterday, reference)
            .unwrap();

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.name, "A");
        assert_eq!(row.rank, Some(1));
        assert_eq!(row.exp_day_change, Some(500));
        assert_eq!(row.exp_week_change, None);
        assert_eq!(row.exp_month_change, None);
    }

    #[test]
    fn empty_current_snapshot_is_an_error() {
        let store = MemoryStore::default();
        let engine = ComparisonEngine::new(&store, default_windows());
        let result =
            engine.build_comparison(&Snapshot::empty(), &Snapshot::empty(), date(2025, 6, 20));
        assert!(result.is_err());
    }

    #[test]
    fn missing_player_yesterday_gives_null_day_columns() {
        let reference = date(2025, 6, 20);
        let current = snapshot_at(reference, &[("New", 900), ("Old", 400)]);
        let yesterday = snapshot_at(reference.pred_opt().unwrap(), &[("Old", 100)]);
        // A week-old snapshot makes "New" reportable through the week delta.
        let store = MemoryStore::with_dates(&[(date(2025, 6, 17), &[("New", 200)])]);

        let engine = ComparisonEngine::new(&store, default_windows());
        let rows = engine
            .build_comparison(&current, &yesterday, reference)
            .unwrap();

        let new = rows.iter().find(|r| r.name == "New").unwrap();
        assert_eq!(new.yesterday_exp, None);
        assert_eq!(new.exp_day_change, None);
        assert_eq!(new.rank_day_change, None);
        assert_eq!(new.exp_week_change, Some(700));
    }

    #[test]
    fn rank_day_change_is_positive_when_climbing() {
        let reference = date(2025, 6, 20);
        // Yesterday: Anna rank 2, Bob rank 1. Today Anna overtakes.
        let current = snapshot_at(reference, &[("Anna", 2000), ("Bob", 1500)]);
        let yesterday = snapshot_at(reference.pred_opt().unwrap(), &[("Bob", 1400), ("Anna", 1000)]);
        let store = MemoryStore::default();

        let engine = ComparisonEngine::new(&store, default_windows());
        let rows = engine
            .build_comparison(&current, &yesterday, reference)
            .unwrap();

        let anna = rows.iter().find(|r| r.name == "Anna").unwrap();
        let bob = rows.iter().find(|r| r.name == "Bob").unwrap();
        assert_eq!(anna.rank_day_change, Some(1));
        assert_eq!(bob.rank_day_change, Some(-1));
    }

    #[test]
    fn rows_come_out_in_rank_order() {
        let reference = date(2025, 6, 20);
        let current = snapshot_at(reference, &[("Low", 100), ("High", 5000), ("Mid", 900)]);
        let yesterday = snapshot_at(
            reference.pred_opt().unwrap(),
            &[("Low", 50), ("High", 4000), ("Mid", 800)],
        );
        let store = MemoryStore::default();

        let engine = ComparisonEngine::new(&store, default_windows());
        let rows = engine
            .build_comparison(&current, &yesterday, reference)
            .unwrap();

        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["High", "Mid", "Low"]);
        assert_eq!(rows[0].rank, Some(1));
    }

    #[test]
    fn oldest_snapshot_substitutes_for_missing_windows() {
        let reference = date(2025, 6, 20);
        let current = snapshot_at(reference, &[("Anna", 1000)]);
        // Far outside both window ranges, so both fall back to it.
        let store = MemoryStore::with_dates(&[(date(2025, 1, 1), &[("Anna", 100)])]);

        let engine = ComparisonEngine::new(&store, default_windows());
        let rows = engine
            .build_comparison(&current, &Snapshot::empty(), reference)
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].exp_week_change, Some(900));
        assert_eq!(rows[0].exp_month_change, Some(900));
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let reference = date(2025, 6, 20);
        let current = snapshot_at(reference, &[("Anna", 1500), ("Bob", 900)]);
        let yesterday = snapshot_at(reference.pred_opt().unwrap(), &[("Anna", 1000), ("Bob", 700)]);
        let store = MemoryStore::with_dates(&[
            (date(2025, 6, 16), &[("Anna", 800)]),
            (date(2025, 5, 30), &[("Anna", 300), ("Bob", 100)]),
        ]);

        let engine = ComparisonEngine::new(&store, default_windows());
        let first = engine
            .build_comparison(&current, &yesterday, reference)
            .unwrap();
        let second = engine
            .build_comparison(&current, &yesterday, reference)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn inputs_are_never_mutated() {
        let reference = date(2025, 6, 20);
        let mut current = Snapshot::new(reference);
        let mut record = PlayerRecord::new("Anna", 1500);
        record.rank = Some(99); // stored rank must be ignored, not trusted
        current.insert(record);
        let yesterday = snapshot_at(reference.pred_opt().unwrap(), &[("Anna", 1000)]);
        let store = MemoryStore::default();

        let engine = ComparisonEngine::new(&store, default_windows());
        let rows = engine
            .build_comparison(&current, &yesterday, reference)
            .unwrap();

        assert_eq!(rows[0].rank, Some(1));
        assert_eq!(current.get("Anna").unwrap().rank, Some(99));
    }
}
