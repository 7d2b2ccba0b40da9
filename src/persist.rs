use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::competition::Designator;
use crate::lineup::LineupEntries;

const MATCHES_DIR: &str = "matches";
const LINEUPS_DIR: &str = "lineups";

/// Where match and lineup files live under the data root.
#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn matches_path(&self, league: &str) -> PathBuf {
        self.root
            .join(MATCHES_DIR)
            .join(format!("matches_{league}.json"))
    }

    pub fn lineups_path(&self, league: &str) -> PathBuf {
        self.root
            .join(LINEUPS_DIR)
            .join(format!("lineups_{league}.json"))
    }

    pub fn failed_path(&self, league: &str) -> PathBuf {
        self.root
            .join(LINEUPS_DIR)
            .join(format!("failed_{league}.json"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineupRecord {
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub date_time: String,
    pub matchday: Option<Designator>,
    #[serde(default)]
    pub phase: String,
    pub home_lineup: LineupEntries,
    pub away_lineup: LineupEntries,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineupDocument {
    pub league: String,
    pub season: String,
    pub last_updated: String,
    pub lineups: Vec<LineupRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedFixture {
    pub home_team: String,
    pub away_team: String,
    pub matchday: Option<Designator>,
    #[serde(default)]
    pub phase: String,
    #[serde(default)]
    pub date_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedReport {
    pub league: String,
    pub season: String,
    pub failed_count: usize,
    pub failed_matches: Vec<FailedFixture>,
    pub timestamp: String,
}

/// ISO-8601 UTC, second precision.
pub fn utc_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

pub fn now_timestamp() -> String {
    utc_timestamp(Utc::now())
}

/// Pretty JSON written through a temp file and renamed into place.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to encode json")?;
    write_text_atomic(path, &json)
}

pub fn write_text_atomic(path: &Path, text: &str) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, text).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("failed to move into {}", path.display()))?;
    Ok(())
}

pub fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid json in {}", path.display()))
}
