mod common;

use std::fs;

use chrono::{Duration, NaiveDate};
use tempfile::tempdir;

use lineup_scraper::competition::{Designator, competition_by_key};
use lineup_scraper::fixture_window::WindowConfig;
use lineup_scraper::lineup::LineupEntries;
use lineup_scraper::persist::{DataLayout, FailedReport, LineupDocument, read_json};
use lineup_scraper::pipeline::{LeagueSummary, RunContext, run_competition};

use common::{FakeSite, listing, now, played, read_fixture, scheduled};

const BL: &str = "https://www.fussballdaten.de/bundesliga/2027";
const CUP: &str = "https://www.fussballdaten.de/dfb-pokal/2027";

fn days(offset: i64) -> NaiveDate {
    now().date() + Duration::days(offset)
}

fn small_lineup(self_link: &str, home: &[&str], away: &[&str]) -> String {
    let links = |names: &[&str]| {
        names
            .iter()
            .map(|n| {
                let token = n.to_lowercase().replace(' ', "-");
                format!(r#"<a class="player-name" href="/person/{token}/" title="{n}">{n}</a>"#)
            })
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!(
        r#"<html><head><link rel="canonical" href="{self_link}"></head><body>
<div class="heim-content">{}</div>
<div class="gast-content">{}</div>
</body></html>"#,
        links(home),
        links(away)
    )
}

fn bundesliga_site() -> FakeSite {
    FakeSite::new()
        .page(
            format!("{BL}/7/"),
            listing(&[
                played("/bundesliga/2027/7/bayern-dortmund/", "Bayern - Dortmund", days(-1), "3:2"),
                scheduled("/bundesliga/2027/7/koeln-bremen/", "Köln - Bremen", days(0), "17:30"),
            ]),
        )
        .page(
            format!("{BL}/8/"),
            listing(&[scheduled(
                "/bundesliga/2027/8/stuttgart-leverkusen/",
                "Stuttgart - Leverkusen",
                days(7),
                "15:30",
            )]),
        )
        .page(
            format!("{BL}/9/"),
            listing(&[scheduled("/bundesliga/2027/9/mainz-kiel/", "Mainz - Kiel", days(13), "15:30")]),
        )
        .page(
            format!("{BL}/7/bayern-dortmund/"),
            read_fixture("lineup_bayern_dortmund.html"),
        )
        .page(
            format!("{BL}/8/leverkusen-stuttgart/"),
            small_lineup(
                "/bundesliga/2027/8/leverkusen-stuttgart/",
                &["Patrik Schick", "Florian Wirtz"],
                &["Deniz Undav", "Alexander Nuebel"],
            ),
        )
}

#[test]
fn bundesliga_run_writes_lineups_and_failures() {
    let dir = tempdir().expect("tempdir");
    let layout = DataLayout::new(dir.path());
    let matches = layout.matches_path("bundesliga");
    fs::create_dir_all(matches.parent().unwrap()).unwrap();
    fs::write(&matches, read_fixture("openligadb_bl1.json")).unwrap();

    let site = bundesliga_site();
    let ctx = RunContext {
        source: &site,
        layout: &layout,
        window: WindowConfig::default(),
        now: now(),
    };
    let bl = competition_by_key("bundesliga").unwrap();
    let summary = run_competition(&ctx, bl).expect("run succeeds");
    assert_eq!(
        summary,
        LeagueSummary {
            league: "bundesliga".into(),
            succeeded: 2,
            failed: 1
        }
    );

    let doc: LineupDocument = read_json(&layout.lineups_path("bundesliga")).unwrap();
    assert_eq!(doc.league, "bundesliga");
    assert_eq!(doc.season, "2027");
    assert!(doc.last_updated.ends_with('Z'));
    assert_eq!(doc.lineups.len(), 2);

    let first = &doc.lineups[0];
    assert_eq!(first.home_team, "FC Bayern München");
    assert_eq!(first.matchday, Some(Designator::Number(7)));
    assert_eq!(first.phase, "7. Spieltag");
    let LineupEntries::Names(home) = &first.home_lineup else {
        panic!("bundesliga lineups carry plain names");
    };
    assert_eq!(home.len(), 11);
    assert_eq!(home[0], "Harry Kane");

    let second = &doc.lineups[1];
    assert_eq!(second.home_team, "VfB Stuttgart");
    assert_eq!(
        second.home_lineup,
        LineupEntries::Names(vec!["Deniz Undav".into(), "Alexander Nuebel".into()])
    );
    assert_eq!(
        second.away_lineup,
        LineupEntries::Names(vec!["Patrik Schick".into(), "Florian Wirtz".into()])
    );

    let failed: FailedReport = read_json(&layout.failed_path("bundesliga")).unwrap();
    assert_eq!(failed.failed_count, 1);
    assert_eq!(failed.failed_matches[0].home_team, "1. FC Köln");
    assert_eq!(failed.failed_matches[0].matchday, Some(Designator::Number(7)));
    assert!(site.was_requested(&format!("{BL}/6/koeln-bremen/")));
    assert!(site.was_requested(&format!("{BL}/8/bremen-koeln/")));
    assert!(!site.was_requested(&format!("{BL}/10/")));
}

#[test]
fn clean_run_writes_no_failure_report() {
    let dir = tempdir().expect("tempdir");
    let layout = DataLayout::new(dir.path());
    let matches = layout.matches_path("bundesliga");
    fs::create_dir_all(matches.parent().unwrap()).unwrap();
    fs::write(
        &matches,
        r#"[{"homeTeam": "FC Bayern München", "awayTeam": "Borussia Dortmund", "matchday": 7}]"#,
    )
    .unwrap();

    let site = bundesliga_site();
    let ctx = RunContext {
        source: &site,
        layout: &layout,
        window: WindowConfig::default(),
        now: now(),
    };
    let summary = run_competition(&ctx, competition_by_key("bundesliga").unwrap()).unwrap();
    assert_eq!((summary.succeeded, summary.failed), (1, 0));
    assert!(!layout.failed_path("bundesliga").exists());
}

#[test]
fn missing_match_file_still_writes_empty_document() {
    let dir = tempdir().expect("tempdir");
    let layout = DataLayout::new(dir.path());
    let site = FakeSite::new();
    let ctx = RunContext {
        source: &site,
        layout: &layout,
        window: WindowConfig::default(),
        now: now(),
    };
    let summary = run_competition(&ctx, competition_by_key("france").unwrap()).unwrap();
    assert_eq!((summary.succeeded, summary.failed), (0, 0));
    let doc: LineupDocument = read_json(&layout.lineups_path("france")).unwrap();
    assert!(doc.lineups.is_empty());
}

#[test]
fn cup_round_one_is_relocated() {
    let dir = tempdir().expect("tempdir");
    let layout = DataLayout::new(dir.path());
    let matches = layout.matches_path("dfbpokal");
    fs::create_dir_all(matches.parent().unwrap()).unwrap();
    fs::write(
        &matches,
        r#"[{"team1": {"teamName": "Hertha BSC"}, "team2": {"teamName": "SV Werder Bremen"},
             "group": {"groupName": "2. Runde", "groupOrderID": 1},
             "matchDateTime": "2026-10-20T18:00:00"}]"#,
    )
    .unwrap();

    let site = FakeSite::new()
        .page(
            format!("{CUP}/1-runde/"),
            listing(&[played("/dfb-pokal/2027/1-runde/ulm-bayern/", "Ulm - Bayern", days(-60), "0:4")]),
        )
        .page(
            format!("{CUP}/2-runde/"),
            listing(&[scheduled(
                "/dfb-pokal/2027/2-runde/herthabsc-bremen/",
                "Hertha - Bremen",
                days(2),
                "18:00",
            )]),
        )
        .page(
            format!("{CUP}/2-runde/herthabsc-bremen/"),
            small_lineup(
                "/dfb-pokal/2027/2-runde/herthabsc-bremen/",
                &["Fabian Reese"],
                &["Marvin Ducksch"],
            ),
        );
    let ctx = RunContext {
        source: &site,
        layout: &layout,
        window: WindowConfig::default(),
        now: now(),
    };
    let summary = run_competition(&ctx, competition_by_key("dfbpokal").unwrap()).unwrap();
    assert_eq!((summary.succeeded, summary.failed), (1, 0));

    let doc: LineupDocument = read_json(&layout.lineups_path("dfbpokal")).unwrap();
    let record = &doc.lineups[0];
    assert_eq!(record.matchday, Some(Designator::Name("2-runde".into())));
    assert_eq!(record.phase, "2. Runde");
    assert_eq!(record.date_time, "2026-10-20T18:00:00");
    assert_eq!(record.home_lineup, LineupEntries::Names(vec!["Fabian Reese".into()]));
}
