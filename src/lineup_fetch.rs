use tracing::debug;

use crate::competition::{Competition, NumberingScheme, PageId};
use crate::lineup::{ExtractedLineup, extract_lineup};
use crate::page_fetch::{PageSource, fetch_page};

/// Looks for a fixture's lineup page around `page`.
///
/// Both team orders are tried on the page itself. Sequential leagues then
/// get one more go on the matchdays either side. The result is oriented to
/// `home_slug`/`away_slug` by the URL that matched, never by page content.
pub fn find_lineup(
    source: &dyn PageSource,
    competition: &Competition,
    season: &str,
    page: &PageId,
    home_slug: &str,
    away_slug: &str,
) -> Option<ExtractedLineup> {
    if let Some(lineup) = try_page(source, competition, season, page, home_slug, away_slug) {
        return Some(lineup);
    }
    if !matches!(competition.scheme, NumberingScheme::Sequential { .. }) {
        return None;
    }
    competition
        .neighbours(page)
        .iter()
        .find_map(|near| try_page(source, competition, season, near, home_slug, away_slug))
}

fn try_page(
    source: &dyn PageSource,
    competition: &Competition,
    season: &str,
    page: &PageId,
    home_slug: &str,
    away_slug: &str,
) -> Option<ExtractedLineup> {
    let orders = [(home_slug, away_slug, false), (away_slug, home_slug, true)];
    for (first, second, reversed) in orders {
        let url = competition.lineup_url(season, page, first, second);
        let Some(html) = fetch_page(source, &url) else {
            debug!(url, "no lineup page");
            continue;
        };
        let Some(lineup) = extract_lineup(&html, competition.assigns_positions()) else {
            debug!(url, "page has no lineup containers");
            continue;
        };
        if !lineup.has_both_sides() {
            debug!(
                url,
                home = lineup.home.len(),
                away = lineup.away.len(),
                "lineup page parsed without players"
            );
            continue;
        }
        debug!(url, "lineup found");
        return Some(if reversed { lineup.swapped() } else { lineup });
    }
    None
}
