use anyhow::Result;
use chrono::Local;
use log::info;

use crate::config::settings::AppConfig;
use crate::domain::{PlayerRecord, Snapshot};
use crate::fetchers::HighscoreScraper;
use crate::store::CsvSnapshotStore;

pub struct IngestionService {
    scraper: HighscoreScraper,
    store: CsvSnapshotStore,
}

impl IngestionService {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            scraper: HighscoreScraper::new(config.scraper.clone())?,
            store: CsvSnapshotStore::new(config.storage.snapshot_dir)?,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        info!("=== Starting Highscore Capture ===\n");

        // Step 1: Scrape the paged highscore table
        let records = self.scraper.scrape_highscores().await?;
        info!("  → Scraped {} highscore rows\n", records.len());

        // Step 2: Assemble today's snapshot
        let snapshot = build_snapshot(records);
        info!("  → {} unique players\n", snapshot.len());

        // Step 3: Persist the dated CSV
        let path = self.store.save(&snapshot)?;
        info!("  → Snapshot written to {}\n", path.display());

        info!("=== Capture Complete ===");
        Ok(())
    }
}

fn build_snapshot(records: Vec<PlayerRecord>) -> Snapshot {
    let mut snapshot = Snapshot::new(Local::now().date_naive());
    for record in records {
        snapshot.insert(record);
    }
    snapshot
}
