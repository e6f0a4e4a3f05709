use anyhow::Result;
use chrono::Local;
use log::info;

use crate::config::settings::AppConfig;
use crate::fetchers::OnlineScraper;
use crate::store::OnlineLog;

/// Captures the current online player list into the log.
///
/// One capture per invocation; the cadence belongs to the operator's
/// scheduler, not to this process.
pub struct TrackingService {
    scraper: OnlineScraper,
    log: OnlineLog,
}

impl TrackingService {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            scraper: OnlineScraper::new(config.scraper.clone())?,
            log: OnlineLog::new(config.storage.online_log),
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        info!("=== Capturing Online Players ===\n");

        let players = self.scraper.fetch_online_players().await?;
        self.log.record(Local::now().naive_local(), &players)?;
        info!("  → Logged {} online players\n", players.len());

        info!("=== Online Capture Complete ===");
        Ok(())
    }
}
