use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::normalize::{is_coach, simplify_display_name};

pub const STARTING_ELEVEN: usize = 11;

const HOME_CONTAINER: &str = "heim-content";
const AWAY_CONTAINER: &str = "gast-content";
const BENCH_MARKERS: &[&str] = &["Reservebank", "Ersatzbank", "Bank"];

static HOME_OPEN: Lazy<Regex> = Lazy::new(|| container_regex(HOME_CONTAINER));
static AWAY_OPEN: Lazy<Regex> = Lazy::new(|| container_regex(AWAY_CONTAINER));
static LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<a\s([^>]*)>([\s\S]*?)</a>").expect("invalid regex: link"));
static CLASS_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bclass="([^"]*)""#).expect("invalid regex: class"));
static PERSON_HREF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\bhref="/person/([^/"]+)/""#).expect("invalid regex: person href")
});
static TITLE_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\btitle="([^"]*)""#).expect("invalid regex: title"));
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("invalid regex: tag"));

fn container_regex(class: &str) -> Regex {
    Regex::new(&format!(
        r#"(?i)<div[^>]*class="[^"]*{}[^"]*"[^>]*>"#,
        regex::escape(class)
    ))
    .expect("invalid regex: lineup container")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TacticalLine {
    Attack,
    Midfield,
    Defense,
    Goalkeeper,
}

impl TacticalLine {
    /// Line for a slot in a starting list ordered forwards first, keeper last.
    pub fn for_slot(idx: usize) -> Self {
        match idx {
            0 | 1 => TacticalLine::Attack,
            7..=9 => TacticalLine::Defense,
            10 => TacticalLine::Goalkeeper,
            _ => TacticalLine::Midfield,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TacticalLine::Attack => "attack",
            TacticalLine::Midfield => "midfield",
            TacticalLine::Defense => "defense",
            TacticalLine::Goalkeeper => "goalkeeper",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionedPlayer {
    pub name: String,
    /// Empty when the list was not a full eleven.
    pub position: String,
}

/// A side's lineup as written to disk: plain names, or names with lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LineupEntries {
    Names(Vec<String>),
    Positioned(Vec<PositionedPlayer>),
}

impl LineupEntries {
    pub fn len(&self) -> usize {
        match self {
            LineupEntries::Names(names) => names.len(),
            LineupEntries::Positioned(players) => players.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Labels an ordered list by slot. Anything but a full eleven gets empty
/// labels.
pub fn assign_lines(players: &[String]) -> Vec<PositionedPlayer> {
    let full = players.len() == STARTING_ELEVEN;
    players
        .iter()
        .enumerate()
        .map(|(idx, name)| PositionedPlayer {
            name: name.clone(),
            position: if full {
                TacticalLine::for_slot(idx).as_str().to_string()
            } else {
                String::new()
            },
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedLineup {
    pub home: Vec<String>,
    pub away: Vec<String>,
    pub assign_positions: bool,
}

impl ExtractedLineup {
    pub fn swapped(self) -> Self {
        Self {
            home: self.away,
            away: self.home,
            assign_positions: self.assign_positions,
        }
    }

    pub fn has_both_sides(&self) -> bool {
        !self.home.is_empty() && !self.away.is_empty()
    }

    pub fn home_entries(&self) -> LineupEntries {
        self.entries(&self.home)
    }

    pub fn away_entries(&self) -> LineupEntries {
        self.entries(&self.away)
    }

    fn entries(&self, players: &[String]) -> LineupEntries {
        if self.assign_positions {
            LineupEntries::Positioned(assign_lines(players))
        } else {
            LineupEntries::Names(players.to_vec())
        }
    }
}

/// Reads both starting elevens off a match page, home container first.
///
/// Orientation is left to the caller, which knows which URL it fetched.
/// `None` means the page has no lineup containers at all. A page that has
/// them but yields short lists still comes back; the caller decides what a
/// partial lineup is worth.
pub fn extract_lineup(html: &str, assign_positions: bool) -> Option<ExtractedLineup> {
    Some(ExtractedLineup {
        home: starting_eleven(html, Side::Home)?,
        away: starting_eleven(html, Side::Away)?,
        assign_positions,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

/// One side's starting eleven. `None` unless both containers are present.
pub fn starting_eleven(html: &str, side: Side) -> Option<Vec<String>> {
    let fragment = match side {
        Side::Home => side_fragment(html, &HOME_OPEN, &AWAY_OPEN)?,
        Side::Away => side_fragment(html, &AWAY_OPEN, &HOME_OPEN)?,
    };
    Some(parse_starting_eleven(starting_area(fragment)))
}

/// Text after this side's container opens, up to the next container of
/// the other side.
fn side_fragment<'a>(html: &'a str, this: &Regex, other: &Regex) -> Option<&'a str> {
    let start = this.find(html)?.end();
    other.find(html)?;
    let end = other
        .find_at(html, start)
        .map(|m| m.start())
        .unwrap_or(html.len());
    Some(&html[start..end])
}

fn starting_area(side: &str) -> &str {
    let cut = BENCH_MARKERS
        .iter()
        .filter_map(|marker| side.find(marker))
        .min()
        .unwrap_or(side.len());
    &side[..cut]
}

/// Person links in order, coaches dropped, one entry per person, at most
/// eleven.
pub fn parse_starting_eleven(fragment: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut players = Vec::new();
    for caps in LINK.captures_iter(fragment) {
        if players.len() >= STARTING_ELEVEN {
            break;
        }
        let attrs = &caps[1];
        let inner = &caps[2];
        let is_name_link = CLASS_ATTR
            .captures(attrs)
            .is_some_and(|c| c[1].to_ascii_lowercase().contains("name"));
        if !is_name_link {
            continue;
        }
        let Some(token) = PERSON_HREF.captures(attrs).map(|c| c[1].trim().to_string()) else {
            continue;
        };
        if seen.contains(&token) {
            continue;
        }

        let title = TITLE_ATTR
            .captures(attrs)
            .or_else(|| TITLE_ATTR.captures(inner))
            .map(|c| c[1].to_string())
            .filter(|t| !t.trim().is_empty());
        let raw = title.unwrap_or_else(|| TAG.replace_all(inner, " ").into_owned());
        let name = simplify_display_name(&raw);
        if name.is_empty() || is_coach(&name) {
            continue;
        }
        seen.insert(token);
        players.push(name);
    }
    players
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_map_to_lines() {
        let labels: Vec<_> = (0..11).map(|i| TacticalLine::for_slot(i).as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "attack", "attack", "midfield", "midfield", "midfield", "midfield", "midfield",
                "defense", "defense", "defense", "goalkeeper"
            ]
        );
    }

    #[test]
    fn short_lists_get_empty_labels() {
        let players: Vec<String> = (0..10).map(|i| format!("P{i}")).collect();
        assert!(assign_lines(&players).iter().all(|p| p.position.is_empty()));
    }

    #[test]
    fn bench_cuts_the_fragment() {
        let side = r#"<a class="name" href="/person/a/">A</a><h3>Ersatzbank</h3><a class="name" href="/person/b/">B</a>"#;
        assert_eq!(parse_starting_eleven(starting_area(side)), vec!["A".to_string()]);
    }

    #[test]
    fn title_beats_link_text_and_coaches_drop() {
        let side = r#"
            <a href="/person/x/" class="player-name" title="Jérôme Boateng">J. Boateng</a>
            <a class="name" href="/person/t/">Trainer Nagelsmann</a>
            <a class="name" href="/person/y/" title=" "><span>Thomas</span> <b>Müller</b></a>
            <a class="logo" href="/person/z/">Not a name link</a>"#;
        assert_eq!(
            parse_starting_eleven(side),
            vec!["Jerome Boateng".to_string(), "Thomas Muller".to_string()]
        );
    }

    #[test]
    fn missing_containers_fail() {
        let html = r#"<div class="heim-content"><a class="name" href="/person/a/">A</a></div>"#;
        assert_eq!(extract_lineup(html, false), None);
        assert_eq!(starting_eleven(html, Side::Home), None);
    }
}
