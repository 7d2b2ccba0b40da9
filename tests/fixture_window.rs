mod common;

use chrono::{Duration, NaiveDate};

use lineup_scraper::competition::{PageId, competition_by_key};
use lineup_scraper::fixture_window::{
    WindowConfig, find_current_page, select_matchdays_to_scrape,
};

use common::{FakeSite, listing, now, played, scheduled};

const SEASON: &str = "2027";

fn url(matchday: u32) -> String {
    format!("https://www.fussballdaten.de/bundesliga/{SEASON}/{matchday}/")
}

fn days(offset: i64) -> NaiveDate {
    now().date() + Duration::days(offset)
}

#[test]
fn includes_page_with_recent_results_and_fixtures_due_soon() {
    let site = FakeSite::new()
        .page(
            url(1),
            listing(&[played("/bundesliga/2027/1/a-b/", "A - B", days(-50), "1:0")]),
        )
        .page(
            url(7),
            listing(&[
                played("/bundesliga/2027/7/c-d/", "C - D", days(-3), "2:2"),
                scheduled("/bundesliga/2027/7/e-f/", "E - F", days(2), "15:30"),
            ]),
        );
    let bl = competition_by_key("bundesliga").unwrap();
    let pages = select_matchdays_to_scrape(&site, bl, SEASON, now(), &WindowConfig::default());
    assert_eq!(pages, vec![PageId::Matchday(7)]);
}

#[test]
fn rescheduled_page_leads_and_does_not_stop_the_scan() {
    let site = FakeSite::new()
        .page(
            url(5),
            listing(&[
                played("/bundesliga/2027/5/a-b/", "A - B", days(-10), "3:1"),
                scheduled("/bundesliga/2027/5/c-d/", "C - D", days(1), "20:30"),
            ]),
        )
        .page(
            url(7),
            listing(&[scheduled("/bundesliga/2027/7/e-f/", "E - F", days(3), "15:30")]),
        )
        .page(
            url(8),
            listing(&[scheduled("/bundesliga/2027/8/g-h/", "G - H", days(9), "15:30")]),
        )
        .page(
            url(9),
            listing(&[scheduled("/bundesliga/2027/9/i-j/", "I - J", days(2), "15:30")]),
        );
    let bl = competition_by_key("bundesliga").unwrap();
    let pages = select_matchdays_to_scrape(&site, bl, SEASON, now(), &WindowConfig::default());
    assert_eq!(pages, vec![PageId::Matchday(5), PageId::Matchday(7)]);
    assert!(site.was_requested(&url(8)));
    assert!(!site.was_requested(&url(9)));
}

#[test]
fn short_and_missing_pages_are_skipped() {
    let site = FakeSite::new().raw_page(url(1), "<html>maintenance</html>").page(
        url(2),
        listing(&[scheduled("/bundesliga/2027/2/a-b/", "A - B", days(0), "18:30")]),
    );
    let bl = competition_by_key("bundesliga").unwrap();
    let pages = select_matchdays_to_scrape(&site, bl, SEASON, now(), &WindowConfig::default());
    assert_eq!(pages, vec![PageId::Matchday(2)]);
}

#[test]
fn wider_window_reaches_further() {
    let site = FakeSite::new().page(
        url(8),
        listing(&[scheduled("/bundesliga/2027/8/g-h/", "G - H", days(9), "15:30")]),
    );
    let bl = competition_by_key("bundesliga").unwrap();
    let wide = WindowConfig {
        reschedule_gap_days: 6,
        window_days: 14,
    };
    assert_eq!(
        select_matchdays_to_scrape(&site, bl, SEASON, now(), &wide),
        vec![PageId::Matchday(8)]
    );
    assert!(select_matchdays_to_scrape(&site, bl, SEASON, now(), &WindowConfig::default()).is_empty());
}

#[test]
fn international_current_page_is_first_with_upcoming_fixtures() {
    let base = "https://www.fussballdaten.de/championsleague/2027";
    let site = FakeSite::new()
        .page(
            format!("{base}/league-stage/1/"),
            listing(&[played("/championsleague/2027/league-stage/1/a-b/", "A - B", days(-30), "1:1")]),
        )
        .page(
            format!("{base}/league-stage/3/"),
            listing(&[scheduled("/championsleague/2027/league-stage/3/c-d/", "C - D", days(3), "21:00")]),
        );
    let cl = competition_by_key("championsleague").unwrap();
    assert_eq!(
        find_current_page(&site, cl, SEASON, now()),
        Some(PageId::PhaseMatchday {
            phase: "league-stage".into(),
            matchday: 3
        })
    );
}
