use std::fs;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{error, info, warn};

use lineup_scraper::competition::{COMPETITIONS, FixtureSource, season_tag};
use lineup_scraper::config::{ScrapeConfig, UploadConfig, load_dotenv};
use lineup_scraper::logging;
use lineup_scraper::openligadb::{api_season, fetch_with_fallback};
use lineup_scraper::persist::{DataLayout, write_json_atomic};
use lineup_scraper::upload::{GitHubStore, UploadTally, put_file};

const REMOTE_DIR: &str = "data/matches";

fn main() -> Result<()> {
    load_dotenv();
    logging::init();

    let upload = UploadConfig::from_env()?;
    let scrape = ScrapeConfig::from_env();
    let layout = DataLayout::new(&scrape.data_dir);
    let store = GitHubStore::new(&upload)?;
    store.check_access()?;

    let season = api_season(season_tag(Local::now().date_naive()));
    let mut tally = UploadTally::default();

    for competition in COMPETITIONS {
        let path = layout.matches_path(competition.key);
        let content = match competition.fixture_source {
            FixtureSource::OpenLigaDb(shortcut) => {
                let (used, records) = match fetch_with_fallback(shortcut, season) {
                    Ok(found) => found,
                    Err(err) => {
                        error!(competition = competition.key, error = %format!("{err:#}"), "openligadb fetch failed");
                        tally.failed += 1;
                        continue;
                    }
                };
                info!(competition = competition.key, season = used, count = records.len(), "fixtures fetched");
                write_json_atomic(&path, &records)?;
                serde_json::to_vec_pretty(&records).context("failed to encode fixtures")?
            }
            FixtureSource::SitePages => match fs::read(&path) {
                Ok(raw) => raw,
                Err(_) => {
                    warn!(competition = competition.key, path = %path.display(), "no scraped matches to upload");
                    continue;
                }
            },
        };

        let remote = format!("{REMOTE_DIR}/matches_{}.json", competition.key);
        let message = format!("Update {} matches", competition.key);
        tally.record(put_file(&store, &remote, &content, &message, &upload.retry));
    }

    println!("Match upload complete");
    println!("Uploaded: {}", tally.uploaded);
    println!("Failed: {}", tally.failed);
    Ok(())
}
