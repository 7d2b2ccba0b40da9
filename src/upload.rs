use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::config::UploadConfig;
use crate::http_client::http_client;

const GITHUB_API_BASE: &str = "https://api.github.com/repos";
const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const UPLOADER_AGENT: &str = "lineup-scraper-uploader";
const TRANSIENT_STATUSES: &[u16] = &[500, 502, 503];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_step: Duration,
}

impl RetryPolicy {
    /// Linear: one step after the first attempt, two after the second.
    pub fn wait_after(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded,
    /// The revision kept moving under us until attempts ran out.
    Conflict,
    Failed,
}

/// What one PUT came back with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutAttempt {
    Status(u16),
    Timeout,
    Transport(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttemptClass {
    Done,
    Conflict,
    Retry,
    Fatal,
}

fn classify(attempt: &PutAttempt) -> AttemptClass {
    match attempt {
        PutAttempt::Status(200 | 201) => AttemptClass::Done,
        PutAttempt::Status(409) => AttemptClass::Conflict,
        PutAttempt::Status(code) if TRANSIENT_STATUSES.contains(code) => AttemptClass::Retry,
        PutAttempt::Status(_) => AttemptClass::Fatal,
        PutAttempt::Timeout | PutAttempt::Transport(_) => AttemptClass::Retry,
    }
}

/// A remote file store with revision markers for optimistic writes.
pub trait ContentStore {
    /// Revision marker of the file at `path`, `None` when it does not exist.
    fn revision(&self, path: &str) -> Option<String>;
    fn put(&self, path: &str, content: &[u8], message: &str, revision: Option<&str>) -> PutAttempt;
}

/// Writes a file, retrying transient failures with linear backoff and
/// refetching the revision after a conflict.
pub fn put_file(
    store: &dyn ContentStore,
    path: &str,
    content: &[u8],
    message: &str,
    policy: &RetryPolicy,
) -> UploadOutcome {
    let attempts = policy.max_attempts.max(1);
    let mut revision = store.revision(path);
    let mut last_conflict = false;

    for attempt in 1..=attempts {
        let result = store.put(path, content, message, revision.as_deref());
        match classify(&result) {
            AttemptClass::Done => {
                info!(path, attempt, "uploaded");
                return UploadOutcome::Uploaded;
            }
            AttemptClass::Fatal => {
                warn!(path, ?result, "upload rejected");
                return UploadOutcome::Failed;
            }
            AttemptClass::Conflict => {
                warn!(path, attempt, "revision moved, refetching");
                last_conflict = true;
                revision = store.revision(path);
            }
            AttemptClass::Retry => {
                warn!(path, attempt, ?result, "transient upload failure");
                last_conflict = false;
                if attempt < attempts {
                    let wait = policy.wait_after(attempt);
                    if !wait.is_zero() {
                        thread::sleep(wait);
                    }
                }
            }
        }
    }

    warn!(path, attempts, "giving up on upload");
    if last_conflict {
        UploadOutcome::Conflict
    } else {
        UploadOutcome::Failed
    }
}

/// `Bearer {token}` unless the token already names its scheme.
pub fn auth_header(token: &str) -> String {
    if token.starts_with("Bearer ") || token.starts_with("token ") {
        token.to_string()
    } else {
        format!("Bearer {token}")
    }
}

/// GitHub contents API on one branch of one repository.
pub struct GitHubStore {
    client: &'static Client,
    auth: String,
    repo: String,
    branch: String,
}

impl GitHubStore {
    pub fn new(cfg: &UploadConfig) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            auth: auth_header(&cfg.token),
            repo: cfg.repo.clone(),
            branch: cfg.branch.clone(),
        })
    }

    fn contents_url(&self, path: &str) -> String {
        format!("{GITHUB_API_BASE}/{}/contents/{path}", self.repo)
    }

    fn get(&self, url: &str) -> reqwest::blocking::RequestBuilder {
        self.client
            .get(url)
            .header(AUTHORIZATION, &self.auth)
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(USER_AGENT, UPLOADER_AGENT)
    }

    /// Fails before any upload when the repository is missing or the token
    /// cannot see it.
    pub fn check_access(&self) -> Result<()> {
        let url = format!("{GITHUB_API_BASE}/{}", self.repo);
        let resp = self
            .get(&url)
            .send()
            .with_context(|| format!("repository check failed for {}", self.repo))?;
        match resp.status().as_u16() {
            200 => Ok(()),
            404 => bail!("repository {} not found or not visible to this token", self.repo),
            403 => bail!("token lacks access to repository {}", self.repo),
            code => bail!("repository check for {} returned http {code}", self.repo),
        }
    }
}

impl ContentStore for GitHubStore {
    fn revision(&self, path: &str) -> Option<String> {
        let resp = self
            .get(&self.contents_url(path))
            .query(&[("ref", self.branch.as_str())])
            .send()
            .ok()?;
        if !resp.status().is_success() {
            return None;
        }
        let body: Value = resp.json().ok()?;
        body.get("sha")?.as_str().map(str::to_string)
    }

    fn put(&self, path: &str, content: &[u8], message: &str, revision: Option<&str>) -> PutAttempt {
        let mut body = json!({
            "message": message,
            "content": STANDARD.encode(content),
            "branch": self.branch,
        });
        if let Some(sha) = revision {
            body["sha"] = Value::String(sha.to_string());
        }
        let sent = self
            .client
            .put(self.contents_url(path))
            .header(AUTHORIZATION, &self.auth)
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(USER_AGENT, UPLOADER_AGENT)
            .json(&body)
            .send();
        match sent {
            Ok(resp) => PutAttempt::Status(resp.status().as_u16()),
            Err(err) if err.is_timeout() => PutAttempt::Timeout,
            Err(err) => PutAttempt::Transport(err.to_string()),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UploadTally {
    pub uploaded: usize,
    pub failed: usize,
}

impl UploadTally {
    pub fn record(&mut self, outcome: UploadOutcome) {
        match outcome {
            UploadOutcome::Uploaded => self.uploaded += 1,
            UploadOutcome::Conflict | UploadOutcome::Failed => self.failed += 1,
        }
    }
}
