use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::http_client::http_client;

/// Pages shorter than this are error stubs or consent walls.
pub const MIN_PAGE_LEN: usize = 1000;

/// Anything that can hand back a page body for a URL.
///
/// Failures of any kind come back as `None`; callers treat them as
/// inconclusive and move on.
pub trait PageSource {
    fn fetch(&self, url: &str) -> Option<String>;
}

/// Fetches a page and discards bodies too short to be real content.
pub fn fetch_page(source: &dyn PageSource, url: &str) -> Option<String> {
    let body = source.fetch(url)?;
    if body.len() < MIN_PAGE_LEN {
        debug!(url, len = body.len(), "page too short, treating as absent");
        return None;
    }
    Some(body)
}

/// Live site, one request at a time with a fixed pause before each.
pub struct SitePageSource {
    delay: Duration,
}

impl SitePageSource {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl PageSource for SitePageSource {
    fn fetch(&self, url: &str) -> Option<String> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        let client = match http_client() {
            Ok(client) => client,
            Err(err) => {
                debug!(url, error = %err, "no http client");
                return None;
            }
        };
        let resp = match client.get(url).send() {
            Ok(resp) => resp,
            Err(err) => {
                debug!(url, error = %err, timeout = err.is_timeout(), "fetch failed");
                return None;
            }
        };
        let status = resp.status();
        if !status.is_success() {
            debug!(url, %status, "fetch returned non-success status");
            return None;
        }
        match resp.text() {
            Ok(body) => Some(body),
            Err(err) => {
                debug!(url, error = %err, "failed to read body");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    impl PageSource for Fixed {
        fn fetch(&self, _url: &str) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    #[test]
    fn short_bodies_are_absent() {
        assert_eq!(fetch_page(&Fixed("<html>404</html>"), "x"), None);
    }

    #[test]
    fn long_bodies_pass_through() {
        let body: &'static str = Box::leak("a".repeat(MIN_PAGE_LEN).into_boxed_str());
        assert_eq!(fetch_page(&Fixed(body), "x").map(|b| b.len()), Some(MIN_PAGE_LEN));
    }
}
