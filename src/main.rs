use anyhow::{Result, anyhow};
use chrono::Local;
use tracing::{error, info};

use lineup_scraper::competition::{COMPETITIONS, Competition, competition_by_key};
use lineup_scraper::config::{ScrapeConfig, load_dotenv};
use lineup_scraper::logging;
use lineup_scraper::page_fetch::SitePageSource;
use lineup_scraper::persist::DataLayout;
use lineup_scraper::pipeline::{RunContext, run_competition};

fn main() -> Result<()> {
    load_dotenv();
    logging::init();

    let competitions = selected_competitions()?;
    let cfg = ScrapeConfig::from_env();
    let layout = DataLayout::new(&cfg.data_dir);
    let source = SitePageSource::new(cfg.request_delay);
    let ctx = RunContext {
        source: &source,
        layout: &layout,
        window: cfg.window,
        now: Local::now().naive_local(),
    };

    info!(
        data_dir = %layout.root().display(),
        competitions = competitions.len(),
        "lineup scrape starting"
    );

    let mut total_ok = 0;
    let mut total_failed = 0;
    let mut errored = 0;
    for competition in competitions {
        match run_competition(&ctx, competition) {
            Ok(summary) => {
                println!(
                    "{}: {} lineups, {} failed",
                    summary.league, summary.succeeded, summary.failed
                );
                total_ok += summary.succeeded;
                total_failed += summary.failed;
            }
            Err(err) => {
                error!(competition = competition.key, error = %format!("{err:#}"), "competition aborted");
                errored += 1;
            }
        }
    }

    println!("Lineup scrape complete");
    println!("Lineups: {total_ok}");
    println!("Failed fixtures: {total_failed}");
    if errored > 0 {
        println!("Competitions with errors: {errored}");
    }
    Ok(())
}

/// Competition keys given on the command line, or every competition.
fn selected_competitions() -> Result<Vec<&'static Competition>> {
    let keys = std::env::args().skip(1).collect::<Vec<_>>();
    if keys.is_empty() {
        return Ok(COMPETITIONS.iter().collect());
    }
    keys.iter()
        .map(|key| competition_by_key(key).ok_or_else(|| anyhow!("unknown competition: {key}")))
        .collect()
}
