use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};

use crate::fixture_window::{DEFAULT_RESCHEDULE_GAP_DAYS, DEFAULT_WINDOW_DAYS, WindowConfig};
use crate::upload::RetryPolicy;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_DELAY_MS: u64 = 500;
const DEFAULT_BRANCH: &str = "main";
const DEFAULT_UPLOAD_ATTEMPTS: u32 = 3;
const DEFAULT_BACKOFF_SECS: u64 = 5;

/// Loads `.env.local` then `.env`; neither has to exist.
pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub data_dir: PathBuf,
    pub request_delay: Duration,
    pub window: WindowConfig,
}

impl ScrapeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = get("LINEUPS_DATA_DIR")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
        let delay_ms = get("SCRAPE_DELAY_MS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_DELAY_MS)
            .clamp(0, 10_000);
        let reschedule_gap_days = get("RESCHEDULE_GAP_DAYS")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_RESCHEDULE_GAP_DAYS)
            .clamp(1, 60);
        let window_days = get("FIXTURE_WINDOW_DAYS")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(DEFAULT_WINDOW_DAYS)
            .clamp(0, 60);

        Self {
            data_dir: PathBuf::from(data_dir),
            request_delay: Duration::from_millis(delay_ms),
            window: WindowConfig {
                reschedule_gap_days,
                window_days,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub token: String,
    /// `owner/name`.
    pub repo: String,
    pub branch: String,
    pub retry: RetryPolicy,
}

impl UploadConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| {
            get(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let Some(token) = non_empty("GITHUB_TOKEN") else {
            bail!("GITHUB_TOKEN is not set");
        };
        let Some(repo) = non_empty("GITHUB_REPO") else {
            bail!("GITHUB_REPO is not set");
        };
        if !repo.contains('/') {
            bail!("GITHUB_REPO must look like owner/name, got {repo:?}");
        }
        let branch = non_empty("GITHUB_BRANCH").unwrap_or_else(|| DEFAULT_BRANCH.to_string());
        let max_attempts = non_empty("UPLOAD_MAX_ATTEMPTS")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(DEFAULT_UPLOAD_ATTEMPTS)
            .clamp(1, 10);
        let backoff_secs = non_empty("UPLOAD_BACKOFF_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_BACKOFF_SECS)
            .clamp(0, 120);

        Ok(Self {
            token,
            repo,
            branch,
            retry: RetryPolicy {
                max_attempts,
                backoff_step: Duration::from_secs(backoff_secs),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn scrape_defaults() {
        let cfg = ScrapeConfig::from_lookup(|_| None);
        assert_eq!(cfg.data_dir, PathBuf::from("data"));
        assert_eq!(cfg.request_delay, Duration::from_millis(500));
        assert_eq!(cfg.window, WindowConfig::default());
    }

    #[test]
    fn scrape_overrides_are_clamped() {
        let env = vars(&[("SCRAPE_DELAY_MS", "99999"), ("FIXTURE_WINDOW_DAYS", "10")]);
        let cfg = ScrapeConfig::from_lookup(|k| env.get(k).cloned());
        assert_eq!(cfg.request_delay, Duration::from_millis(10_000));
        assert_eq!(cfg.window.window_days, 10);
    }

    #[test]
    fn upload_requires_credentials() {
        assert!(UploadConfig::from_lookup(|_| None).is_err());
        let env = vars(&[("GITHUB_TOKEN", "abc")]);
        assert!(UploadConfig::from_lookup(|k| env.get(k).cloned()).is_err());
    }

    #[test]
    fn upload_defaults() {
        let env = vars(&[("GITHUB_TOKEN", "abc"), ("GITHUB_REPO", "me/data")]);
        let cfg = UploadConfig::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(cfg.branch, "main");
        assert_eq!(cfg.retry.max_attempts, 3);
        assert_eq!(cfg.retry.backoff_step, Duration::from_secs(5));
    }
}
