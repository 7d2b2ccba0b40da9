use anyhow::{Result, anyhow};
use chrono::Local;
use tracing::info;

use lineup_scraper::competition::{COMPETITIONS, Competition, FixtureSource, season_tag};
use lineup_scraper::config::{ScrapeConfig, load_dotenv};
use lineup_scraper::logging;
use lineup_scraper::match_scrape::{MatchesDocument, scrape_competition};
use lineup_scraper::page_fetch::SitePageSource;
use lineup_scraper::persist::{DataLayout, now_timestamp, write_json_atomic};

fn main() -> Result<()> {
    load_dotenv();
    logging::init();

    let cfg = ScrapeConfig::from_env();
    let layout = DataLayout::new(&cfg.data_dir);
    let source = SitePageSource::new(cfg.request_delay);
    let now = Local::now().naive_local();
    let season = season_tag(now.date()).to_string();

    let targets = site_competitions()?;
    for competition in targets {
        let matches = scrape_competition(&source, competition, &season, now);
        let doc = MatchesDocument {
            league: competition.key.to_string(),
            season: season.clone(),
            last_updated: now_timestamp(),
            matches,
        };
        let path = layout.matches_path(competition.key);
        write_json_atomic(&path, &doc)?;
        info!(competition = competition.key, path = %path.display(), "matches written");
        println!("{}: {} matches", competition.key, doc.matches.len());
    }
    Ok(())
}

/// Competitions without an API feed, optionally narrowed by keys on the
/// command line.
fn site_competitions() -> Result<Vec<&'static Competition>> {
    let scraped = COMPETITIONS
        .iter()
        .filter(|c| c.fixture_source == FixtureSource::SitePages);
    let keys = std::env::args().skip(1).collect::<Vec<_>>();
    if keys.is_empty() {
        return Ok(scraped.collect());
    }
    let picked: Vec<_> = scraped.filter(|c| keys.iter().any(|k| k == c.key)).collect();
    if picked.is_empty() {
        return Err(anyhow!("no site-scraped competition matches {keys:?}"));
    }
    Ok(picked)
}
