use std::fs;

use anyhow::Result;
use tracing::warn;

use lineup_scraper::competition::COMPETITIONS;
use lineup_scraper::config::{ScrapeConfig, UploadConfig, load_dotenv};
use lineup_scraper::logging;
use lineup_scraper::persist::DataLayout;
use lineup_scraper::upload::{GitHubStore, UploadTally, put_file};

const REMOTE_DIR: &str = "data/lineups";

fn main() -> Result<()> {
    load_dotenv();
    logging::init();

    let upload = UploadConfig::from_env()?;
    let layout = DataLayout::new(&ScrapeConfig::from_env().data_dir);
    let store = GitHubStore::new(&upload)?;

    let mut tally = UploadTally::default();
    for competition in COMPETITIONS {
        let path = layout.lineups_path(competition.key);
        let Ok(content) = fs::read(&path) else {
            warn!(competition = competition.key, path = %path.display(), "no lineup file");
            continue;
        };
        let remote = format!("{REMOTE_DIR}/lineups_{}.json", competition.key);
        let message = format!("Update {} lineups", competition.key);
        tally.record(put_file(&store, &remote, &content, &message, &upload.retry));
    }

    println!("Lineup upload complete");
    println!("Uploaded: {}", tally.uploaded);
    println!("Failed: {}", tally.failed);
    Ok(())
}
