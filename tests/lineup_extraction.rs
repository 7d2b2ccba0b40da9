mod common;

use lineup_scraper::lineup::{
    LineupEntries, PositionedPlayer, Side, extract_lineup, parse_starting_eleven, starting_eleven,
};

use common::read_fixture;

#[test]
fn full_eleven_gets_positional_lines() {
    let html = read_fixture("lineup_bayern_dortmund.html");
    let lineup = extract_lineup(&html, true).expect("lineup containers");

    assert_eq!(lineup.home.len(), 11);
    let LineupEntries::Positioned(players) = lineup.home_entries() else {
        panic!("expected positioned entries");
    };
    let lines: Vec<&str> = players.iter().map(|p| p.position.as_str()).collect();
    assert_eq!(
        lines,
        vec![
            "attack", "attack", "midfield", "midfield", "midfield", "midfield", "midfield",
            "defense", "defense", "defense", "goalkeeper"
        ]
    );
    assert_eq!(
        players[0],
        PositionedPlayer {
            name: "Harry Kane".into(),
            position: "attack".into()
        }
    );
    assert_eq!(players[10].name, "Manuel Neuer");
}

#[test]
fn title_text_is_preferred_and_simplified() {
    let html = read_fixture("lineup_bayern_dortmund.html");
    let lineup = extract_lineup(&html, false).unwrap();
    assert_eq!(lineup.home[3], "Leroy Sane");
    assert_eq!(lineup.home[5], "Leon Goretzka");
    assert_eq!(lineup.home[6], "Aleksandar Pavlovic");
    assert!(!lineup.home.iter().any(|n| n.contains("Kompany")));
    assert!(!lineup.home.iter().any(|n| n.contains("Muller")));
}

#[test]
fn duplicate_person_link_is_counted_once() {
    let html = read_fixture("lineup_bayern_dortmund.html");
    let lineup = extract_lineup(&html, true).unwrap();
    assert_eq!(lineup.away.len(), 11);
    let guirassy = lineup.away.iter().filter(|n| *n == "Serhou Guirassy").count();
    assert_eq!(guirassy, 1);
    assert_eq!(lineup.away[4], "Pascal Gross");
    assert_eq!(lineup.away[10], "Gregor Kobel");
    assert!(!lineup.away.iter().any(|n| n == "Alexander Meyer"));
}

#[test]
fn excluded_competitions_get_plain_names() {
    let html = read_fixture("lineup_bayern_dortmund.html");
    let lineup = extract_lineup(&html, false).unwrap();
    assert!(matches!(lineup.home_entries(), LineupEntries::Names(ref names) if names.len() == 11));
}

#[test]
fn containers_decide_sides_regardless_of_links_on_the_page() {
    let html = format!(
        r#"{}<a href="/bundesliga/2027/24/dortmund-bayern/">Rückspiel</a>"#,
        read_fixture("lineup_bayern_dortmund.html")
    );
    let lineup = extract_lineup(&html, false).unwrap();
    assert_eq!(lineup.home[0], "Harry Kane");
    assert_eq!(lineup.away[0], "Serhou Guirassy");
}

#[test]
fn single_side_reads_the_same_eleven() {
    let html = read_fixture("lineup_bayern_dortmund.html");
    let lineup = extract_lineup(&html, false).unwrap();
    assert_eq!(starting_eleven(&html, Side::Home), Some(lineup.home));
    assert_eq!(starting_eleven(&html, Side::Away), Some(lineup.away));
}

#[test]
fn partial_lineup_is_returned_without_lines() {
    let html = r#"<div class="heim-content">
        <a class="name" href="/person/a/" title="Alpha One">A</a>
        <a class="name" href="/person/b/" title="Beta Two">B</a>
      </div>
      <div class="gast-content">
        <a class="name" href="/person/c/">Gamma <b>Three</b></a>
      </div>"#;
    let lineup = extract_lineup(html, true).unwrap();
    assert_eq!(lineup.home, vec!["Alpha One", "Beta Two"]);
    assert_eq!(lineup.away, vec!["Gamma Three"]);
    let LineupEntries::Positioned(players) = lineup.home_entries() else {
        panic!("expected positioned entries");
    };
    assert!(players.iter().all(|p| p.position.is_empty()));
}

#[test]
fn missing_containers_is_not_a_lineup_page() {
    let html = r#"<div class="heim-content"><a class="name" href="/person/a/">A</a></div>"#;
    assert_eq!(extract_lineup(html, true), None);
    assert_eq!(extract_lineup("<html></html>", true), None);
}

#[test]
fn links_without_name_class_or_person_href_are_ignored() {
    let fragment = r#"
        <a class="club" href="/person/a/">Club Link</a>
        <a class="name" href="/verein/bayern/">Bayern</a>
        <a class="name" href="/person/b/" title="Real Player">R</a>"#;
    assert_eq!(parse_starting_eleven(fragment), vec!["Real Player"]);
}
