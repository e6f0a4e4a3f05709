use anyhow::{anyhow, Result};
use log::info;
use scraper::{ElementRef, Html, Selector};

use crate::config::settings::ScraperSettings;
use crate::http::PacedClient;

/// Scraper for the who-is-online page.
pub struct OnlineScraper {
    client: PacedClient,
    settings: ScraperSettings,
    selectors: TableSelectors,
}

impl OnlineScraper {
    pub fn new(settings: ScraperSettings) -> Result<Self> {
        let client = PacedClient::new(
            settings.user_agent,
            settings.timeout_secs,
            settings.page_delay_ms,
        )?;

        Ok(Self {
            client,
            settings,
            selectors: TableSelectors::compile()?,
        })
    }

    pub async fn fetch_online_players(&mut self) -> Result<Vec<String>> {
        let html = self.client.fetch_text(self.settings.online_url).await?;
        let players = self.parse_online_players(&html);
        info!("{} players online", players.len());
        Ok(players)
    }

    /// The second table on the page is the player list; its rows are
    /// name, level, vocation. A page without that table reads as nobody
    /// online.
    fn parse_online_players(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let Some(table) = document.select(&self.selectors.table).nth(1) else {
            return Vec::new();
        };

        let mut players = Vec::new();
        for row in table.select(&self.selectors.row).skip(1) {
            let cells: Vec<ElementRef> = row.select(&self.selectors.cell).collect();
            if cells.len() != 3 {
                continue;
            }
            let name = cells[0].text().collect::<String>().trim().to_string();
            if !name.is_empty() {
                players.push(name);
            }
        }
        players
    }
}

struct TableSelectors {
    table: Selector,
    row: Selector,
    cell: Selector,
}

impl TableSelectors {
    fn compile() -> Result<Self> {
        let compile = |css: &str| {
            Selector::parse(css).map_err(|e| anyhow!("Failed to compile selector `{css}`: {e}"))
        };
        Ok(Self {
            table: compile("table")?,
            row: compile("tr")?,
            cell: compile("td")?,
        })
    }
}
