use anyhow::{anyhow, Result};
use log::info;
use scraper::{ElementRef, Html, Selector};

use crate::config::settings::ScraperSettings;
use crate::domain::PlayerRecord;
use crate::http::PacedClient;

/// Scraper for the paged experience highscore table.
pub struct HighscoreScraper {
    client: PacedClient,
    settings: ScraperSettings,
    selectors: RowSelectors,
}

impl HighscoreScraper {
    pub fn new(settings: ScraperSettings) -> Result<Self> {
        let client = PacedClient::new(
            settings.user_agent,
            settings.timeout_secs,
            settings.page_delay_ms,
        )?;

        Ok(Self {
            client,
            settings,
            selectors: RowSelectors::compile()?,
        })
    }

    /// Fetch every configured page and collect highscore rows in table order.
    pub async fn scrape_highscores(&mut self) -> Result<Vec<PlayerRecord>> {
        let mut records = Vec::new();
        for page in 1..=self.settings.pages {
            info!("Fetching highscore page {}/{}", page, self.settings.pages);
            let html = self.client.fetch_text(&self.page_url(page)).await?;
            records.extend(self.parse_highscores(&html));
        }
        Ok(records)
    }

    /// The first page has no page suffix; page N maps to suffix N-1.
    fn page_url(&self, page: usize) -> String {
        if page == 1 {
            self.settings.highscores_url.to_string()
        } else {
            self.settings
                .highscores_paged_url
                .replace("{}", &(page - 1).to_string())
        }
    }

    /// Highscore entries are the 4-column table rows: rank, name, level,
    /// points. Anything else on the page (navigation, headers) has a
    /// different column count and falls through.
    fn parse_highscores(&self, html: &str) -> Vec<PlayerRecord> {
        let document = Html::parse_document(html);
        let mut records = Vec::new();

        for row in document.select(&self.selectors.row) {
            let cells: Vec<ElementRef> = row.select(&self.selectors.cell).collect();
            if cells.len() != 4 {
                continue;
            }
            let Some(name) = self.extract_name(&cells[1]) else {
                continue;
            };
            let Some(experience) = extract_experience(&cells[3]) else {
                continue;
            };
            records.push(PlayerRecord::new(name, experience));
        }
        records
    }

    /// The name cell nests the character name in an `<a>` or `<span>`;
    /// guild annotations sit in a trailing `<small>` that must not leak in.
    fn extract_name(&self, cell: &ElementRef) -> Option<String> {
        if let Some(tag) = cell.select(&self.selectors.name_tag).next() {
            let name = collapse_text(tag);
            if !name.is_empty() {
                return Some(name);
            }
        }

        // Fallback for unmarked cells: the text before the line break.
        let raw: String = cell.text().collect();
        let name = raw.trim().lines().next()?.trim().to_string();
        (!name.is_empty()).then_some(name)
    }
}

struct RowSelectors {
    row: Selector,
    cell: Selector,
    name_tag: Selector,
}

impl RowSelectors {
    fn compile() -> Result<Self> {
        Ok(Self {
            row: compile_selector("tr")?,
            cell: compile_selector("td")?,
            name_tag: compile_selector("a, span")?,
        })
    }
}

fn compile_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Failed to compile selector `{css}`: {e}"))
}

fn collapse_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Points render with comma separators; reject anything that is not a plain
/// grouped number.
fn extract_experience(cell: &ElementRef) -> Option<u64> {
    let text = cell
        .text()
        .collect::<String>()
        .trim()
        .replace(',', "");
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
