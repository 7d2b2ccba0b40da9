use anyhow::{Context, Result, bail};
use reqwest::header::USER_AGENT;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::fixtures_input::{fixture_records, team_names};
use crate::http_client::http_client;

const API_BASE: &str = "https://api.openligadb.de/getmatchdata";
const API_AGENT: &str = "lineup-scraper/0.1";
const CUP_SHORTCUT: &str = "dfb";

/// The API names a season after the year it starts in, one behind the
/// scraped site.
pub fn api_season(site_season: i32) -> i32 {
    site_season - 1
}

/// Raw match records for a league season, as the API returns them.
pub fn fetch_season(shortcut: &str, season: i32) -> Result<Vec<Value>> {
    let url = format!("{API_BASE}/{shortcut}/{season}");
    let client = http_client()?;
    let resp = client
        .get(&url)
        .header(USER_AGENT, API_AGENT)
        .send()
        .with_context(|| format!("openligadb request failed: {url}"))?;
    let status = resp.status();
    if !status.is_success() {
        bail!("openligadb returned http {status} for {url}");
    }
    let body: Value = resp
        .json()
        .with_context(|| format!("invalid openligadb json from {url}"))?;
    let records = filter_records(shortcut, &body);
    debug!(url, kept = records.len(), "openligadb season loaded");
    Ok(records)
}

/// Keeps records with two named teams. Cup seasons sometimes carry league
/// fixtures; those are dropped by their league shortcut.
pub fn filter_records(shortcut: &str, body: &Value) -> Vec<Value> {
    fixture_records(body)
        .iter()
        .filter(|record| {
            if team_names(record).is_none() {
                debug!("openligadb record without team names");
                return false;
            }
            if shortcut != CUP_SHORTCUT {
                return true;
            }
            match record_league(record) {
                Some(league) if !league.eq_ignore_ascii_case(CUP_SHORTCUT) => {
                    debug!(league, "dropping non-cup record");
                    false
                }
                _ => true,
            }
        })
        .cloned()
        .collect()
}

fn record_league(record: &Value) -> Option<&str> {
    record
        .get("LeagueShortcut")
        .or_else(|| record.get("leagueShortcut"))
        .or_else(|| record.get("League").and_then(|l| l.get("LeagueShortcut")))
        .and_then(Value::as_str)
}

/// Fetches `season`, falling back to the season before when it is empty.
/// Returns the season that produced the records.
pub fn fetch_with_fallback(shortcut: &str, season: i32) -> Result<(i32, Vec<Value>)> {
    let records = fetch_season(shortcut, season)?;
    if !records.is_empty() {
        return Ok((season, records));
    }
    let previous = season - 1;
    warn!(shortcut, season, previous, "no matches, trying previous season");
    let records = fetch_season(shortcut, previous)?;
    info!(shortcut, season = previous, count = records.len(), "openligadb fallback season");
    Ok((previous, records))
}
