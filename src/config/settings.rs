use crate::domain::LookbackWindow;

#[derive(Debug, Clone)]
pub struct ScraperSettings {
    pub highscores_url: &'static str,
    /// Paged variant; `{}` is the zero-based page suffix of the site.
    pub highscores_paged_url: &'static str,
    pub online_url: &'static str,
    pub pages: usize,
    pub page_delay_ms: u64,
    pub user_agent: &'static str,
    pub timeout_secs: u64,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            highscores_url: "https://classic.dura-online.com/?highscores/experience",
            highscores_paged_url: "https://classic.dura-online.com/?highscores/experience/{}",
            online_url: "https://classic.dura-online.com/?online",
            pages: 10,
            page_delay_ms: 250,
            user_agent: "DuraHighscores/1.0",
            timeout_secs: 30,
        }
    }
}

/// Lookback ranges for the historical comparisons. The exact spans drifted
/// between deployments, so they live here rather than in the engine.
#[derive(Debug, Clone)]
pub struct WindowSettings {
    pub week: LookbackWindow,
    pub month: LookbackWindow,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            week: LookbackWindow::new(3, 10),
            month: LookbackWindow::new(15, 35),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub snapshot_dir: &'static str,
    pub online_log: &'static str,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            snapshot_dir: "snapshots",
            online_log: "online_log.csv",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub scraper: ScraperSettings,
    pub windows: WindowSettings,
    pub storage: StorageSettings,
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }
}
