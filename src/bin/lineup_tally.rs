use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use lineup_scraper::appearances::{parse_schedule, render_report, tally_team};
use lineup_scraper::config::{ScrapeConfig, load_dotenv};
use lineup_scraper::logging;
use lineup_scraper::page_fetch::SitePageSource;
use lineup_scraper::persist::write_text_atomic;

const REPORT_FILE: &str = "lineup_tally.txt";

fn main() -> Result<()> {
    load_dotenv();
    logging::init();

    let mut args = std::env::args().skip(1);
    let schedule_path = args
        .next()
        .map(PathBuf::from)
        .context("usage: lineup_tally <schedule_file> [team]")?;
    let only_team = args.next();

    let cfg = ScrapeConfig::from_env();
    let raw = fs::read_to_string(&schedule_path)
        .with_context(|| format!("failed to read {}", schedule_path.display()))?;
    let mut teams = parse_schedule(&raw);
    if let Some(only) = &only_team {
        teams.retain(|t| t.team.eq_ignore_ascii_case(only));
    }

    let source = SitePageSource::new(cfg.request_delay);
    let mut tallies = Vec::new();
    for team in &teams {
        let tally = tally_team(&source, &team.team, &team.links);
        if !tally.is_empty() {
            tallies.push((team.team.clone(), tally));
        }
    }

    let out = cfg.data_dir.join(REPORT_FILE);
    write_text_atomic(&out, &render_report(&tallies))?;

    println!("Lineup tally complete");
    println!("Teams: {} of {}", tallies.len(), teams.len());
    println!("File: {}", out.display());
    Ok(())
}
