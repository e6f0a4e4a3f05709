use anyhow::{bail, Context, Result};
use chrono::{Duration, Local, NaiveDate};
use log::info;
use std::fs;
use std::path::PathBuf;

use crate::config::settings::AppConfig;
use crate::domain::ComparisonRow;
use crate::engine::ComparisonEngine;
use crate::report::render_report;
use crate::store::{CsvSnapshotStore, SnapshotStore};

pub struct ReportService {
    config: AppConfig,
}

impl ReportService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, date: Option<NaiveDate>) -> Result<()> {
        let reference_date = date.unwrap_or_else(|| Local::now().date_naive());
        info!("=== Building Report for {reference_date} ===\n");

        let store = CsvSnapshotStore::new(self.config.storage.snapshot_dir)?;

        // Step 1: Load the snapshots the engine needs up front
        let current = store.load(reference_date)?;
        if current.is_empty() {
            bail!("No snapshot recorded for {reference_date}; run `ingest` first");
        }
        let yesterday = store.load(reference_date - Duration::days(1))?;
        info!(
            "  → Loaded current ({} players) and yesterday ({} players)\n",
            current.len(),
            yesterday.len()
        );

        // Step 2: Run the comparison
        let engine = ComparisonEngine::new(&store, self.config.windows.clone());
        let rows = engine.build_comparison(&current, &yesterday, reference_date)?;
        info!("  → {} players with changes\n", rows.len());

        // Step 3: Render
        let path = self.write_report(&rows, reference_date)?;
        info!("  → Report written to {}\n", path.display());

        info!("=== Report Complete ===");
        Ok(())
    }

    fn write_report(&self, rows: &[ComparisonRow], reference_date: NaiveDate) -> Result<PathBuf> {
        let html = render_report(rows, reference_date);
        let path = PathBuf::from(self.config.storage.snapshot_dir)
            .join(format!("changes_{reference_date}.html"));
        fs::write(&path, html)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        Ok(path)
    }
}
