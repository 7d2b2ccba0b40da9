#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};

use lineup_scraper::page_fetch::{MIN_PAGE_LEN, PageSource};

pub fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

pub fn at(y: i32, m: u32, d: u32, hour: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(hour, min, 0))
        .expect("valid timestamp")
}

/// Sunday 18 October 2026, midday.
pub fn now() -> NaiveDateTime {
    at(2026, 10, 18, 12, 0)
}

/// In-memory site keyed by full URL. Unknown URLs fail like a 404.
#[derive(Default)]
pub struct FakeSite {
    pages: HashMap<String, String>,
    requests: RefCell<Vec<String>>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a page, padded past the short-body threshold.
    pub fn page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), pad(body.into()));
        self
    }

    /// Registers a body as-is, however short.
    pub fn raw_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), body.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub fn was_requested(&self, url: &str) -> bool {
        self.requests.borrow().iter().any(|u| u == url)
    }
}

impl PageSource for FakeSite {
    fn fetch(&self, url: &str) -> Option<String> {
        self.requests.borrow_mut().push(url.to_string());
        self.pages.get(url).cloned()
    }
}

fn pad(mut body: String) -> String {
    if body.len() < MIN_PAGE_LEN {
        body.push_str("\n<!--");
        while body.len() < MIN_PAGE_LEN + 16 {
            body.push_str(" padding");
        }
        body.push_str(" -->\n");
    }
    body
}

/// Listing-page markup for a finished fixture.
pub fn played(href: &str, label: &str, date: NaiveDate, score: &str) -> String {
    format!(
        r#"<a class="ergebnis" href="{href}" title="{label} ({})"><span class="team">{label}</span><span id="r-{}">{score}</span></a>"#,
        date.format("%d.%m.%Y"),
        href.len()
    )
}

/// Listing-page markup for a fixture that has not kicked off.
pub fn scheduled(href: &str, label: &str, date: NaiveDate, kickoff: &str) -> String {
    format!(
        r#"<a href="{href}" title="{label} ({} {kickoff})"><span class="team">{label}</span><span>{kickoff}</span></a>"#,
        date.format("%d.%m.%Y")
    )
}

pub fn listing(blocks: &[String]) -> String {
    format!(
        "<html><body><div class=\"spiele\">\n{}\n</div></body></html>",
        blocks.join("\n")
    )
}
