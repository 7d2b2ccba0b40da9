use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::page_fetch::{PageSource, fetch_page};

static TITLE_ANCHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"title="([^"]*?)\s*\((\d{2})\.(\d{2})\.(\d{4})(?:\s+(\d{2}):(\d{2}))?[^)]*\)[^"]*""#,
    )
    .expect("invalid regex: title anchor")
});
static LIVE_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)class="[^"]*ergebnis[^"]*live"#).expect("invalid regex: live marker")
});
static SCORE_DIV: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<div[^>]*class="[^"]*ergebnis[^"]*"[^>]*>\s*(\d+:\d+)\s*</div>"#)
        .expect("invalid regex: score div")
});
static SCORE_SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<span[^>]*\bid="[^"]*"[^>]*>\s*(\d+:\d+)\s*</span>"#)
        .expect("invalid regex: score span")
});
/// Only consulted once the block is known not to be a result anchor, since a
/// bare `<span>10:10</span>` score reads the same as a kickoff time.
static KICKOFF_SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<span>\s*(\d{2}):(\d{2})\s*</span>").expect("invalid regex: kickoff span")
});
static LIVE_SCORE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<span[^>]*>\s*(\d+:\d+)\s*</span>").expect("invalid regex: live score")
});
static RESULT_ANCHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bclass="[^"]*ergebnis"#).expect("invalid regex: result anchor")
});
static HREF_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href="([^"]*)""#).expect("invalid regex: href"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureState {
    Played,
    Live,
    Scheduled,
}

impl FixtureState {
    /// Live fixtures still count as open for scheduling.
    pub fn is_unplayed(self) -> bool {
        !matches!(self, FixtureState::Played)
    }
}

/// One fixture as listed on a matchday page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureSummary {
    pub date: NaiveDate,
    pub kickoff: Option<NaiveTime>,
    pub state: FixtureState,
    /// "Home - Away" as written in the link title.
    pub label: String,
    pub href: Option<String>,
    pub score: Option<String>,
}

impl FixtureSummary {
    pub fn teams(&self) -> Option<(&str, &str)> {
        let (home, away) = self.label.split_once(" - ")?;
        let (home, away) = (home.trim(), away.trim());
        (!home.is_empty() && !away.is_empty()).then_some((home, away))
    }

    pub fn starts_at_or_after(&self, now: NaiveDateTime) -> bool {
        match self.kickoff {
            Some(time) => self.date.and_time(time) >= now,
            None => self.date >= now.date(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PageProbe {
    pub body: Option<String>,
    pub fixtures: Vec<FixtureSummary>,
    pub has_upcoming: bool,
}

impl PageProbe {
    pub fn absent() -> Self {
        Self {
            body: None,
            fixtures: Vec::new(),
            has_upcoming: false,
        }
    }
}

/// Fetches a listing page and reads its fixtures.
pub fn probe_page(source: &dyn PageSource, url: &str, now: NaiveDateTime) -> PageProbe {
    let Some(body) = fetch_page(source, url) else {
        return PageProbe::absent();
    };
    let fixtures = extract_fixtures(&body);
    let has_upcoming = has_upcoming(&body, &fixtures, now);
    PageProbe {
        body: Some(body),
        fixtures,
        has_upcoming,
    }
}

/// Any live marker on the page, or a scheduled fixture that has not kicked
/// off yet.
pub fn has_upcoming(html: &str, fixtures: &[FixtureSummary], now: NaiveDateTime) -> bool {
    if LIVE_MARKER.is_match(html) {
        return true;
    }
    fixtures
        .iter()
        .any(|f| f.state == FixtureState::Scheduled && f.starts_at_or_after(now))
}

/// Every dated fixture link on the page, in page order.
///
/// A fixture's markup runs from the tag carrying its `title` to the tag of
/// the next dated title. Blocks with neither a score nor a kickoff time are
/// left out.
pub fn extract_fixtures(html: &str) -> Vec<FixtureSummary> {
    let anchors: Vec<_> = TITLE_ANCHOR.captures_iter(html).collect();
    let starts: Vec<usize> = anchors
        .iter()
        .map(|caps| {
            let at = caps.get(0).map(|m| m.start()).unwrap_or(0);
            html[..at].rfind('<').unwrap_or(at)
        })
        .collect();

    let mut out = Vec::new();
    for (idx, caps) in anchors.iter().enumerate() {
        let start = starts[idx];
        let end = starts.get(idx + 1).copied().unwrap_or(html.len()).max(start);
        let block = &html[start..end];

        let Some(date) = parse_date(&caps[2], &caps[3], &caps[4]) else {
            continue;
        };
        let title_time = match (caps.get(5), caps.get(6)) {
            (Some(h), Some(m)) => parse_time(h.as_str(), m.as_str()),
            _ => None,
        };
        let open_tag = &block[..block.find('>').map(|i| i + 1).unwrap_or(block.len())];
        let href = HREF_ATTR.captures(open_tag).map(|c| c[1].to_string());
        let label = caps[1].trim().to_string();

        let (state, kickoff, score) = if LIVE_MARKER.is_match(block) {
            let score = LIVE_SCORE.captures(block).map(|c| c[1].to_string());
            (FixtureState::Live, title_time, score)
        } else if let Some(score) = SCORE_DIV
            .captures(block)
            .or_else(|| SCORE_SPAN.captures(block))
        {
            (FixtureState::Played, title_time, Some(score[1].to_string()))
        } else if let Some(score) = RESULT_ANCHOR
            .is_match(open_tag)
            .then(|| LIVE_SCORE.captures(block))
            .flatten()
        {
            (FixtureState::Played, title_time, Some(score[1].to_string()))
        } else if let Some(time) = KICKOFF_SPAN.captures(block) {
            let kickoff = parse_time(&time[1], &time[2]).or(title_time);
            (FixtureState::Scheduled, kickoff, None)
        } else {
            continue;
        };

        out.push(FixtureSummary {
            date,
            kickoff,
            state,
            label,
            href,
            score,
        });
    }
    out
}

fn parse_date(day: &str, month: &str, year: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn parse_time(hour: &str, minute: &str) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(hour.parse().ok()?, minute.parse().ok()?, 0)
}
