use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::warn;

use crate::competition::Designator;

/// A fixture as read from a persisted match file. Only the designators
/// get refined later; the teams never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub home_team: String,
    pub away_team: String,
    pub date_time: Option<String>,
    pub matchday: Option<Designator>,
    pub phase: Option<String>,
}

const TEAM_NAME_KEYS: &[&str] = &["TeamName", "teamName", "name", "Name", "shortName", "ShortName"];
const DATE_KEYS: &[&str] = &["MatchDateTime", "matchDateTime", "dateTime"];
const MATCHDAY_KEYS: &[&str] = &[
    "Matchday",
    "matchday",
    "MatchDay",
    "matchDay",
    "GroupOrderID",
    "groupOrderID",
];
const GROUP_KEYS: &[&str] = &["Group", "group"];
const LEAGUE_KEYS: &[&str] = &["League", "league"];

/// Loads a match file. A missing file is an empty list.
pub fn load_fixtures(path: &Path) -> Result<Vec<Fixture>> {
    if !path.exists() {
        warn!(path = %path.display(), "match file not found");
        return Ok(Vec::new());
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_fixtures_json(&raw).with_context(|| format!("invalid match file {}", path.display()))
}

pub fn parse_fixtures_json(raw: &str) -> Result<Vec<Fixture>> {
    let value: Value = serde_json::from_str(raw).context("invalid json")?;
    Ok(parse_fixtures(&value))
}

/// Accepts a bare array of records or an object with a `matches` array.
pub fn parse_fixtures(value: &Value) -> Vec<Fixture> {
    fixture_records(value)
        .iter()
        .enumerate()
        .filter_map(|(idx, record)| {
            let fixture = parse_fixture(record);
            if fixture.is_none() {
                warn!(index = idx, "skipping match record without team names");
            }
            fixture
        })
        .collect()
}

/// The raw fixture objects of a match file, for callers that rewrite them.
pub fn fixture_records(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("matches") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        },
        _ => &[],
    }
}

pub fn parse_fixture(record: &Value) -> Option<Fixture> {
    let (home_team, away_team) = team_names(record)?;
    Some(Fixture {
        home_team,
        away_team,
        date_time: pick_string(record, DATE_KEYS),
        matchday: matchday(record),
        phase: phase(record),
    })
}

/// `homeTeam`/`awayTeam` strings, or `Team1`/`Team2` given either as
/// objects or as plain strings.
pub fn team_names(record: &Value) -> Option<(String, String)> {
    if let (Some(home), Some(away)) = (
        pick_string(record, &["homeTeam"]),
        pick_string(record, &["awayTeam"]),
    ) {
        return Some((home, away));
    }
    let home = team_side(record, &["Team1", "team1"])?;
    let away = team_side(record, &["Team2", "team2"])?;
    Some((home, away))
}

fn team_side(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match record.get(*key)? {
        Value::String(s) => non_empty(s),
        obj @ Value::Object(_) => pick_string(obj, TEAM_NAME_KEYS),
        _ => None,
    })
}

fn matchday(record: &Value) -> Option<Designator> {
    let from_group = GROUP_KEYS
        .iter()
        .filter_map(|key| record.get(*key))
        .find_map(|group| pick_designator(group, &["GroupOrderID", "groupOrderID"]));
    from_group
        .or_else(|| pick_designator(record, MATCHDAY_KEYS))
        .or_else(|| {
            LEAGUE_KEYS
                .iter()
                .filter_map(|key| record.get(*key))
                .find_map(|league| pick_designator(league, &["GroupOrderID", "groupOrderID"]))
        })
}

fn phase(record: &Value) -> Option<String> {
    GROUP_KEYS
        .iter()
        .filter_map(|key| record.get(*key))
        .find_map(|group| pick_string(group, &["GroupName", "groupName"]))
        .or_else(|| pick_string(record, &["phase"]))
}

fn pick_designator(value: &Value, keys: &[&str]) -> Option<Designator> {
    for key in keys {
        match value.get(*key) {
            Some(Value::Number(n)) => {
                if let Some(num) = n.as_u64().filter(|n| *n > 0) {
                    return Some(Designator::Number(num as u32));
                }
            }
            Some(Value::String(s)) => {
                let s = s.trim();
                if s.is_empty() {
                    continue;
                }
                return Some(match s.parse::<u32>() {
                    Ok(n) => Designator::Number(n),
                    Err(_) => Designator::Name(s.to_string()),
                });
            }
            _ => {}
        }
    }
    None
}

fn pick_string(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find_map(|v| v.as_str().and_then(non_empty))
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
