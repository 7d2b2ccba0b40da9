use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::competition::{Competition, Designator, NumberingScheme, PageId};
use crate::fixture_page::{FixtureState, FixtureSummary, probe_page};
use crate::page_fetch::PageSource;

/// Sequential scans give up after this many empty pages in a row.
const MAX_CONSECUTIVE_EMPTY: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedMatch {
    pub matchday: Option<Designator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    pub home_team: String,
    pub away_team: String,
    pub date_time: String,
    pub score: Option<String>,
    pub is_finished: bool,
    pub is_live: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchesDocument {
    pub league: String,
    pub season: String,
    pub last_updated: String,
    pub matches: Vec<ScrapedMatch>,
}

/// Every fixture listed for a competition's season.
pub fn scrape_competition(
    source: &dyn PageSource,
    competition: &Competition,
    season: &str,
    now: NaiveDateTime,
) -> Vec<ScrapedMatch> {
    let mut out = Vec::new();
    match competition.scheme {
        NumberingScheme::Sequential { .. } | NumberingScheme::NamedRounds(_) => {
            let mut empty_run = 0;
            for page in competition.candidate_pages() {
                let found = scrape_page(source, competition, season, &page, now);
                if found.is_empty() {
                    empty_run += 1;
                    if matches!(competition.scheme, NumberingScheme::Sequential { .. })
                        && empty_run >= MAX_CONSECUTIVE_EMPTY
                    {
                        debug!(competition = competition.key, %page, "stopping after empty pages");
                        break;
                    }
                    continue;
                }
                empty_run = 0;
                out.extend(found);
            }
        }
        NumberingScheme::PhaseMatchday(phases) => {
            for phase in phases {
                match competition.phase_candidates(phase.name) {
                    Some(pages) => {
                        for page in pages {
                            let found = scrape_page(source, competition, season, &page, now);
                            if found.is_empty() {
                                break;
                            }
                            out.extend(found);
                        }
                    }
                    None => {
                        let page = PageId::Phase(phase.name.to_string());
                        out.extend(scrape_page(source, competition, season, &page, now));
                    }
                }
            }
        }
    }
    info!(competition = competition.key, matches = out.len(), "scraped fixtures");
    out
}

fn scrape_page(
    source: &dyn PageSource,
    competition: &Competition,
    season: &str,
    page: &PageId,
    now: NaiveDateTime,
) -> Vec<ScrapedMatch> {
    let url = competition.page_url(season, page);
    let probe = probe_page(source, &url, now);
    let matches: Vec<_> = probe
        .fixtures
        .iter()
        .filter_map(|f| to_match(f, page))
        .collect();
    debug!(url, count = matches.len(), "listing page");
    matches
}

fn to_match(fixture: &FixtureSummary, page: &PageId) -> Option<ScrapedMatch> {
    let (home_team, away_team) = match fixture.teams() {
        Some((home, away)) => (home.to_string(), away.to_string()),
        None => teams_from_href(fixture.href.as_deref()?)?,
    };
    // Played fixtures often carry no kickoff on listing pages.
    let kickoff = fixture
        .kickoff
        .or_else(|| NaiveTime::from_hms_opt(15, 0, 0))
        .unwrap_or_default();
    let date_time = fixture
        .date
        .and_time(kickoff)
        .format("%Y-%m-%dT%H:%M:%SZ")
        .to_string();
    Some(ScrapedMatch {
        matchday: page.designator(),
        phase: page.phase().map(str::to_string),
        home_team,
        away_team,
        date_time,
        score: fixture.score.clone(),
        is_finished: fixture.state == FixtureState::Played,
        is_live: fixture.state == FixtureState::Live,
    })
}

/// `/england/2027/5/man.city-arsenal/` -> ("Man City", "Arsenal").
fn teams_from_href(href: &str) -> Option<(String, String)> {
    let last = href.trim_end_matches('/').rsplit('/').next()?;
    let (home, away) = last.split_once('-')?;
    Some((display_from_slug(home)?, display_from_slug(away)?))
}

fn display_from_slug(slug: &str) -> Option<String> {
    let words: Vec<String> = slug
        .split(['.', '-'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();
    (!words.is_empty()).then(|| words.join(" "))
}
