//! How often each player started across a team's recent lineup pages.

use std::collections::HashMap;
use std::fmt::Write as _;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::lineup::{STARTING_ELEVEN, Side, starting_eleven};
use crate::normalize::{fold, normalize};
use crate::page_fetch::{PageSource, fetch_page};

/// Club-form tokens dropped before matching a team name against URL slugs.
const CLUB_TOKENS: &[&str] = &["1.", "fsv", "sv", "fc", "vfl", "tsg", "sc", "spvgg", "borussia"];

static SCHEDULE_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[Link: (https://[^\]]+)\]").expect("invalid regex: schedule link"));
static HOME_HEADER: Lazy<Regex> = Lazy::new(|| header_regex("heim"));
static AWAY_HEADER: Lazy<Regex> = Lazy::new(|| header_regex("gast"));
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("invalid regex: tag"));

fn header_regex(side: &str) -> Regex {
    Regex::new(&format!(
        r#"(?i)<div[^>]*class="[^"]*col-md-6[^"]*{side}[^"]*"[^>]*>([\s\S]*?)<div[^>]*class="[^"]*{side}-content"#
    ))
    .expect("invalid regex: side header")
}

/// Lineup page URLs listed for one team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamLinks {
    pub team: String,
    pub links: Vec<String>,
}

/// Reads a team schedule listing: `=== Team ===` headers, each followed by
/// match lines ending in `[Link: https://.../aufstellung/]`. Lines without
/// a lineup link are skipped.
pub fn parse_schedule(text: &str) -> Vec<TeamLinks> {
    let mut teams: Vec<TeamLinks> = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if let Some(team) = line
            .strip_prefix("=== ")
            .and_then(|rest| rest.strip_suffix(" ==="))
        {
            teams.push(TeamLinks {
                team: team.trim().to_string(),
                links: Vec::new(),
            });
            continue;
        }
        let Some(current) = teams.last_mut() else {
            continue;
        };
        if !line.contains("aufstellung/") {
            continue;
        }
        if let Some(caps) = SCHEDULE_LINK.captures(line) {
            current.links.push(caps[1].to_string());
        }
    }
    teams
}

/// Team name reduced for comparison with URL slugs: accents folded, club
/// tokens dropped, spaces removed.
fn slug_form(team: &str) -> String {
    fold(team)
        .split_whitespace()
        .filter(|token| !CLUB_TOKENS.contains(token))
        .collect()
}

/// Side from the page headers above each lineup container.
pub fn side_from_headers(html: &str, team: &str) -> Option<Side> {
    let target = normalize(team);
    if target.is_empty() {
        return None;
    }
    if header_text(html, &HOME_HEADER).is_some_and(|text| text.contains(&target)) {
        return Some(Side::Home);
    }
    if header_text(html, &AWAY_HEADER).is_some_and(|text| text.contains(&target)) {
        return Some(Side::Away);
    }
    None
}

fn header_text(html: &str, header: &Regex) -> Option<String> {
    header
        .captures(html)
        .map(|caps| normalize(&TAG.replace_all(&caps[1], " ")))
}

/// Side from the `home-away` path segment of a match URL.
pub fn side_from_url(url: &str, team: &str) -> Option<Side> {
    let segment = url.split('/').rev().find(|s| s.contains('-'))?;
    let (home, _) = segment.split_once('-')?;
    let away = segment.rsplit('-').next().unwrap_or_default();
    let name = slug_form(team);
    if name.is_empty() {
        return None;
    }
    if slug_overlaps(&name, home) {
        Some(Side::Home)
    } else if slug_overlaps(&name, away) {
        Some(Side::Away)
    } else {
        None
    }
}

fn slug_overlaps(name: &str, slug: &str) -> bool {
    !slug.is_empty() && (name.contains(slug) || slug.contains(name))
}

/// Headers first, then the URL, then home.
pub fn team_side(html: &str, url: &str, team: &str) -> Side {
    side_from_headers(html, team)
        .or_else(|| side_from_url(url, team))
        .unwrap_or_else(|| {
            debug!(team, url, "side unclear, assuming home");
            Side::Home
        })
}

/// Start counts per player, first-seen order kept for ties.
#[derive(Debug, Clone, Default)]
pub struct StartTally {
    counts: HashMap<String, (u32, usize)>,
    pub matches: u32,
}

impl StartTally {
    pub fn record(&mut self, starters: &[String]) {
        self.matches += 1;
        for name in starters {
            let next = self.counts.len();
            self.counts.entry(name.clone()).or_insert((0, next)).0 += 1;
        }
    }

    pub fn starts(&self, name: &str) -> u32 {
        self.counts.get(name).map(|(n, _)| *n).unwrap_or(0)
    }

    /// Most starts first.
    pub fn ranked(&self) -> Vec<(&str, u32)> {
        let mut rows: Vec<_> = self
            .counts
            .iter()
            .map(|(name, (n, seen))| (name.as_str(), *n, *seen))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        rows.into_iter().map(|(name, n, _)| (name, n)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Fetches each lineup page and counts the team's starters.
pub fn tally_team(source: &dyn PageSource, team: &str, links: &[String]) -> StartTally {
    let mut tally = StartTally::default();
    for (idx, url) in links.iter().enumerate() {
        let Some(html) = fetch_page(source, url) else {
            warn!(team, url, "lineup page unavailable");
            continue;
        };
        let side = team_side(&html, url, team);
        let Some(starters) = starting_eleven(&html, side) else {
            warn!(team, url, ?side, "no lineup containers");
            continue;
        };
        if starters.len() < STARTING_ELEVEN {
            warn!(team, url, found = starters.len(), "incomplete starting eleven");
        }
        debug!(team, game = idx + 1, ?side, starters = starters.len(), "lineup counted");
        tally.record(&starters);
    }
    info!(team, games = tally.matches, players = tally.counts.len(), "team tallied");
    tally
}

/// Plain-text report, one `=== Team ===` block per team.
pub fn render_report(teams: &[(String, StartTally)]) -> String {
    let mut out = String::new();
    for (team, tally) in teams {
        let _ = writeln!(out, "=== {team} ===");
        for (pos, (name, starts)) in tally.ranked().into_iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>2}. {name}: {starts} of {} starts",
                pos + 1,
                tally.matches
            );
        }
        out.push('\n');
    }
    out
}
