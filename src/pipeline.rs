use std::collections::HashSet;

use anyhow::Result;
use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::competition::{Competition, Designator, NumberingScheme, PageId, season_tag};
use crate::fixture_window::{WindowConfig, find_current_page, select_matchdays_to_scrape};
use crate::fixtures_input::{Fixture, load_fixtures};
use crate::lineup_fetch::find_lineup;
use crate::matchday_locator::{LocateHints, locate_matchday};
use crate::page_fetch::PageSource;
use crate::persist::{
    DataLayout, FailedFixture, FailedReport, LineupDocument, LineupRecord, now_timestamp,
    write_json_atomic,
};
use crate::slug::resolve_slug;

/// Fixtures probed with the locator when none carries a usable designator.
const LOCATE_PROBE_LIMIT: usize = 10;

pub struct RunContext<'a> {
    pub source: &'a dyn PageSource,
    pub layout: &'a DataLayout,
    pub window: WindowConfig,
    pub now: NaiveDateTime,
}

#[derive(Debug, Clone)]
pub struct LeagueRun {
    pub document: LineupDocument,
    pub failures: Vec<FailedFixture>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueSummary {
    pub league: String,
    pub succeeded: usize,
    pub failed: usize,
}

struct Slugs {
    home: String,
    away: String,
}

fn resolve_pair(competition: &Competition, fixture: &Fixture) -> Option<Slugs> {
    Some(Slugs {
        home: resolve_slug(&fixture.home_team, competition.id, competition.international)?,
        away: resolve_slug(&fixture.away_team, competition.id, competition.international)?,
    })
}

/// Pages worth looking at right now.
pub fn pages_to_scrape(ctx: &RunContext<'_>, competition: &Competition, season: &str) -> Vec<PageId> {
    if competition.international {
        find_current_page(ctx.source, competition, season, ctx.now)
            .into_iter()
            .collect()
    } else {
        select_matchdays_to_scrape(ctx.source, competition, season, ctx.now, &ctx.window)
    }
}

fn locate(
    ctx: &RunContext<'_>,
    competition: &Competition,
    season: &str,
    fixture: &Fixture,
    supplied: Option<PageId>,
) -> Option<PageId> {
    let slugs = resolve_pair(competition, fixture);
    let hints = LocateHints {
        phase: fixture.phase.clone(),
        page: supplied,
    };
    locate_matchday(
        ctx.source,
        competition,
        season,
        slugs.as_ref().map(|s| s.home.as_str()),
        slugs.as_ref().map(|s| s.away.as_str()),
        &hints,
        ctx.now,
    )
}

/// Narrows fixtures to the selected pages. When no fixture carries a
/// designator that maps onto them, the first few are located on the site;
/// when that finds nothing either, every fixture is kept.
pub fn filter_fixtures(
    ctx: &RunContext<'_>,
    competition: &Competition,
    season: &str,
    fixtures: Vec<Fixture>,
    pages: &[PageId],
) -> Vec<Fixture> {
    if pages.is_empty() {
        info!(competition = competition.key, "no pages selected, keeping every fixture");
        return fixtures;
    }
    let wanted: HashSet<&PageId> = pages.iter().collect();
    let direct: Vec<Fixture> = fixtures
        .iter()
        .filter(|f| {
            competition
                .page_for(f.matchday.as_ref(), f.phase.as_deref())
                .is_some_and(|page| wanted.contains(&page))
        })
        .cloned()
        .collect();
    if !direct.is_empty() || fixtures.is_empty() {
        return direct;
    }

    warn!(
        competition = competition.key,
        "no fixture designator matches the selected pages, locating"
    );
    let located: Vec<Fixture> = fixtures
        .iter()
        .take(LOCATE_PROBE_LIMIT)
        .filter(|f| {
            locate(ctx, competition, season, f, None).is_some_and(|page| wanted.contains(&page))
        })
        .cloned()
        .collect();
    if located.is_empty() {
        warn!(competition = competition.key, "located nothing, keeping every fixture");
        return fixtures;
    }
    located
}

/// Cup feeds number every round 1, so a cup `1` says nothing.
fn designator_untrusted(competition: &Competition, fixture: &Fixture) -> bool {
    matches!(competition.scheme, NumberingScheme::NamedRounds(_))
        && fixture.matchday == Some(Designator::Number(1))
}

/// The page a fixture's lineup should be searched around.
pub fn refine_page(
    ctx: &RunContext<'_>,
    competition: &Competition,
    season: &str,
    fixture: &Fixture,
    pages: &[PageId],
) -> Option<PageId> {
    let supplied = competition.page_for(fixture.matchday.as_ref(), fixture.phase.as_deref());
    let needs_locate = fixture.matchday.is_none()
        || supplied.is_none()
        || designator_untrusted(competition, fixture);
    if !needs_locate {
        return supplied;
    }
    debug!(
        home = %fixture.home_team,
        away = %fixture.away_team,
        "locating fixture page"
    );
    locate(ctx, competition, season, fixture, supplied.clone())
        .or(supplied)
        .or_else(|| pages.first().cloned())
}

/// Resolves and extracts lineups for every due fixture of a competition.
pub fn scrape_lineups(ctx: &RunContext<'_>, competition: &Competition) -> Result<LeagueRun> {
    let season = season_tag(ctx.now.date()).to_string();
    let fixtures = load_fixtures(&ctx.layout.matches_path(competition.key))?;
    info!(competition = competition.key, season, fixtures = fixtures.len(), "loaded fixtures");

    let pages = pages_to_scrape(ctx, competition, &season);
    let fixtures = filter_fixtures(ctx, competition, &season, fixtures, &pages);
    info!(competition = competition.key, due = fixtures.len(), "fixtures to scrape");

    let mut lineups = Vec::new();
    let mut failures = Vec::new();
    for fixture in &fixtures {
        let page = refine_page(ctx, competition, &season, fixture, &pages);
        let designator = page
            .as_ref()
            .and_then(PageId::designator)
            .or_else(|| fixture.matchday.clone());
        let phase = fixture
            .phase
            .clone()
            .or_else(|| page.as_ref().and_then(|p| p.phase().map(str::to_string)))
            .unwrap_or_default();

        let lineup = match (&page, resolve_pair(competition, fixture)) {
            (Some(page), Some(slugs)) => {
                find_lineup(ctx.source, competition, &season, page, &slugs.home, &slugs.away)
            }
            (None, _) => {
                debug!(home = %fixture.home_team, away = %fixture.away_team, "no page for fixture");
                None
            }
            (_, None) => {
                debug!(home = %fixture.home_team, away = %fixture.away_team, "no slug for fixture");
                None
            }
        };

        match lineup {
            Some(lineup) => {
                debug!(
                    home = %fixture.home_team,
                    away = %fixture.away_team,
                    home_players = lineup.home.len(),
                    away_players = lineup.away.len(),
                    "lineup scraped"
                );
                lineups.push(LineupRecord {
                    home_team: fixture.home_team.clone(),
                    away_team: fixture.away_team.clone(),
                    date_time: fixture.date_time.clone().unwrap_or_default(),
                    matchday: designator,
                    phase,
                    home_lineup: lineup.home_entries(),
                    away_lineup: lineup.away_entries(),
                });
            }
            None => {
                warn!(
                    competition = competition.key,
                    home = %fixture.home_team,
                    away = %fixture.away_team,
                    "lineup not found"
                );
                failures.push(FailedFixture {
                    home_team: fixture.home_team.clone(),
                    away_team: fixture.away_team.clone(),
                    matchday: designator,
                    phase,
                    date_time: fixture.date_time.clone().unwrap_or_default(),
                });
            }
        }
    }

    Ok(LeagueRun {
        document: LineupDocument {
            league: competition.key.to_string(),
            season,
            last_updated: now_timestamp(),
            lineups,
        },
        failures,
    })
}

/// Scrapes one competition and writes its lineup file, plus a failure
/// report when anything was missed.
pub fn run_competition(ctx: &RunContext<'_>, competition: &Competition) -> Result<LeagueSummary> {
    let run = scrape_lineups(ctx, competition)?;
    write_json_atomic(&ctx.layout.lineups_path(competition.key), &run.document)?;
    if !run.failures.is_empty() {
        let report = FailedReport {
            league: competition.key.to_string(),
            season: run.document.season.clone(),
            failed_count: run.failures.len(),
            failed_matches: run.failures.clone(),
            timestamp: now_timestamp(),
        };
        write_json_atomic(&ctx.layout.failed_path(competition.key), &report)?;
    }
    let summary = LeagueSummary {
        league: competition.key.to_string(),
        succeeded: run.document.lineups.len(),
        failed: run.failures.len(),
    };
    info!(
        competition = competition.key,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "competition done"
    );
    Ok(summary)
}
