use chrono::NaiveDateTime;
use tracing::debug;

use crate::competition::{Competition, NumberingScheme, PageId};
use crate::fixture_page::probe_page;
use crate::page_fetch::PageSource;

/// What the caller already knows about where a fixture lives.
#[derive(Debug, Clone, Default)]
pub struct LocateHints {
    pub phase: Option<String>,
    /// Page to fall back on for phases the locator cannot search.
    pub page: Option<PageId>,
}

/// Pages the locator walks for a competition, in order. `Err` carries the
/// answer directly when the phase has no numbered pages.
fn search_space(competition: &Competition, hints: &LocateHints) -> Result<Vec<PageId>, Option<PageId>> {
    match competition.scheme {
        NumberingScheme::PhaseMatchday(_) => {
            let Some(phase) = hints.phase.as_deref() else {
                return Err(hints.page.clone());
            };
            competition
                .phase_candidates(phase)
                .ok_or_else(|| hints.page.clone())
        }
        _ => Ok(competition.candidate_pages()),
    }
}

/// Finds the one listing page that carries a fixture.
///
/// With both slugs known a page matches when its body contains
/// `home-away` or `away-home`. Without them the first page showing any
/// live or not yet started fixture is taken. That fallback does not check
/// that the page holds this fixture and can pick the wrong one.
///
/// Unreachable or short pages are skipped, never treated as a miss.
pub fn locate_matchday(
    source: &dyn PageSource,
    competition: &Competition,
    season: &str,
    home_slug: Option<&str>,
    away_slug: Option<&str>,
    hints: &LocateHints,
    now: NaiveDateTime,
) -> Option<PageId> {
    let candidates = match search_space(competition, hints) {
        Ok(pages) => pages,
        Err(direct) => return direct,
    };
    let pair = match (home_slug, away_slug) {
        (Some(home), Some(away)) if !home.is_empty() && !away.is_empty() => {
            Some((format!("{home}-{away}"), format!("{away}-{home}")))
        }
        _ => None,
    };

    for page in candidates {
        let url = competition.page_url(season, &page);
        let probe = probe_page(source, &url, now);
        let Some(body) = probe.body.as_deref() else {
            continue;
        };
        match &pair {
            Some((forward, reverse)) => {
                if body.contains(forward.as_str()) || body.contains(reverse.as_str()) {
                    debug!(competition = competition.key, %page, "fixture found on page");
                    return Some(page);
                }
            }
            None => {
                if probe.has_upcoming {
                    debug!(
                        competition = competition.key,
                        %page,
                        "accepting page with upcoming fixtures, fixture not verified"
                    );
                    return Some(page);
                }
            }
        }
    }
    None
}
