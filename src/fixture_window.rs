use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use crate::competition::{Competition, PageId};
use crate::fixture_page::{FixtureSummary, probe_page};
use crate::page_fetch::PageSource;

pub const DEFAULT_RESCHEDULE_GAP_DAYS: i64 = 6;
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    /// Played-to-unplayed gap above which a page holds postponed fixtures.
    pub reschedule_gap_days: i64,
    /// How far ahead of today an unplayed fixture is due.
    pub window_days: i64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            reschedule_gap_days: DEFAULT_RESCHEDULE_GAP_DAYS,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageVerdict {
    /// Nothing left to play.
    Resolved,
    Rescheduled { gap_days: i64 },
    InWindow { days_ahead: i64 },
    OutOfWindow { days_ahead: i64 },
}

/// Decides what a listing page means for the scrape window.
pub fn classify_page(fixtures: &[FixtureSummary], today: NaiveDate, cfg: &WindowConfig) -> PageVerdict {
    let last_played = fixtures
        .iter()
        .filter(|f| !f.state.is_unplayed())
        .map(|f| f.date)
        .max();
    let Some(first_open) = fixtures
        .iter()
        .filter(|f| f.state.is_unplayed())
        .map(|f| f.date)
        .min()
    else {
        return PageVerdict::Resolved;
    };

    if let Some(last_played) = last_played {
        let gap_days = (first_open - last_played).num_days();
        if gap_days > cfg.reschedule_gap_days {
            return PageVerdict::Rescheduled { gap_days };
        }
    }

    let days_ahead = (first_open - today).num_days();
    if days_ahead <= cfg.window_days {
        PageVerdict::InWindow { days_ahead }
    } else {
        PageVerdict::OutOfWindow { days_ahead }
    }
}

/// Pages worth scraping now: pages with postponed fixtures first, then the
/// pages whose next fixture is inside the window.
///
/// Pages are chronological, so the scan stops at the first page whose next
/// fixture is beyond the window. Postponed pages never stop the scan.
pub fn select_matchdays_to_scrape(
    source: &dyn PageSource,
    competition: &Competition,
    season: &str,
    now: NaiveDateTime,
    cfg: &WindowConfig,
) -> Vec<PageId> {
    let today = now.date();
    let mut rescheduled = Vec::new();
    let mut in_window = Vec::new();

    for page in competition.candidate_pages() {
        let url = competition.page_url(season, &page);
        let probe = probe_page(source, &url, now);
        if probe.body.is_none() || probe.fixtures.is_empty() {
            continue;
        }
        match classify_page(&probe.fixtures, today, cfg) {
            PageVerdict::Resolved => {}
            PageVerdict::Rescheduled { gap_days } => {
                debug!(competition = competition.key, %page, gap_days, "postponed fixtures");
                rescheduled.push(page);
            }
            PageVerdict::InWindow { days_ahead } => {
                debug!(competition = competition.key, %page, days_ahead, "inside window");
                in_window.push(page);
            }
            PageVerdict::OutOfWindow { days_ahead } => {
                debug!(competition = competition.key, %page, days_ahead, "beyond window, stopping");
                break;
            }
        }
    }

    info!(
        competition = competition.key,
        rescheduled = rescheduled.len(),
        in_window = in_window.len(),
        "selected pages"
    );
    rescheduled.extend(in_window);
    rescheduled
}

/// First numbered page with live or not yet started fixtures. Used for
/// competitions that are not window-scanned.
pub fn find_current_page(
    source: &dyn PageSource,
    competition: &Competition,
    season: &str,
    now: NaiveDateTime,
) -> Option<PageId> {
    competition.candidate_pages().into_iter().find(|page| {
        let url = competition.page_url(season, page);
        probe_page(source, &url, now).has_upcoming
    })
}
