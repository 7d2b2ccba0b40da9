use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::CACHE_CONTROL;
use scraper::{Html, Selector};
use tracing::{debug, info};

use crate::http_client::http_client;
use crate::normalize::normalize;

const INJURY_PAGES: &[&str] = &[
    "https://www.transfermarkt.de/bundesliga/verletztespieler/wettbewerb/L1",
    "https://www.transfermarkt.de/2-bundesliga/verletztespieler/wettbewerb/L2",
];
const SUSPENSION_PAGES: &[&str] = &[
    "https://www.transfermarkt.de/bundesliga/sperrenausfaelle/wettbewerb/L1",
    "https://www.transfermarkt.de/bundesliga/sperrenausfaelle/wettbewerb/L2",
];

/// Team column plus six player columns.
const MIN_COLUMNS: usize = 7;
const PLAYER_COLUMNS: usize = 6;
const UTF8_BOM: char = '\u{feff}';
const NOT_IN_SQUAD: &str = "nicht_im_kader";
/// Surnames shorter than this match too many players to be used alone.
const MIN_SURNAME_KEY: usize = 4;

static PLAYER_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table a.spielprofil_tooltip").expect("invalid selector: player"));
static MARKER_TAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*\(false(?::([^)]*))?\)\s*$").expect("invalid regex: marker tail")
});
static OLD_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*\(false(?::[a-z]+)?\)$").expect("invalid regex: availability marker")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Injured,
    Suspended,
}

impl Availability {
    pub fn marker(self) -> &'static str {
        match self {
            Availability::Injured => "verletzt",
            Availability::Suspended => "gesperrt",
        }
    }
}

/// Normalized player name to why they are out.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<String, Availability>,
}

impl Lexicon {
    /// Suspensions win over injuries for the same player.
    pub fn from_names<'a>(
        injured: impl IntoIterator<Item = &'a str>,
        suspended: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut entries = HashMap::new();
        for name in injured {
            insert(&mut entries, name, Availability::Injured);
        }
        for name in suspended {
            insert(&mut entries, name, Availability::Suspended);
        }
        Self { entries }
    }

    pub fn status(&self, name: &str) -> Option<Availability> {
        self.entries.get(&normalize(name)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn insert(entries: &mut HashMap<String, Availability>, name: &str, status: Availability) {
    let key = normalize(name);
    if !key.is_empty() {
        entries.insert(key, status);
    }
}

/// Player names from a Transfermarkt absence table.
pub fn listed_players(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    doc.select(&PLAYER_LINK)
        .map(|link| link.text().collect::<String>().trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

fn fetch_listing(url: &str) -> Result<String> {
    let resp = http_client()?
        .get(url)
        .header(CACHE_CONTROL, "no-cache")
        .send()
        .with_context(|| format!("request failed: {url}"))?;
    let status = resp.status();
    if !status.is_success() {
        bail!("http {status} for {url}");
    }
    resp.text().with_context(|| format!("failed to read body: {url}"))
}

/// Builds the lexicon from the live absence tables. Any page failing
/// aborts; a partial lexicon would mark players fit who are not.
pub fn fetch_lexicon() -> Result<Lexicon> {
    let mut injured = Vec::new();
    for url in INJURY_PAGES {
        injured.extend(listed_players(&fetch_listing(url)?));
    }
    let mut suspended = Vec::new();
    for url in SUSPENSION_PAGES {
        suspended.extend(listed_players(&fetch_listing(url)?));
    }
    let lexicon = Lexicon::from_names(
        injured.iter().map(String::as_str),
        suspended.iter().map(String::as_str),
    );
    info!(
        injured = injured.len(),
        suspended = suspended.len(),
        "availability lexicon built"
    );
    Ok(lexicon)
}

pub fn strip_marker(player: &str) -> String {
    OLD_MARKER.replace(player.trim(), "").into_owned()
}

/// Rewrites `Team | p1 | ... | p6` lines, marking unavailable players as
/// `name (false:verletzt)` or `name (false:gesperrt)`. Comments, blank
/// lines and short rows pass through untouched.
pub fn mark_lines(text: &str, lexicon: &Lexicon) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        out.push_str(&mark_line(line, lexicon));
        out.push('\n');
    }
    out
}

fn mark_line(line: &str, lexicon: &Lexicon) -> String {
    if line.is_empty() || line.starts_with('#') {
        return line.to_string();
    }
    let parts: Vec<&str> = line.split('|').map(str::trim).collect();
    if parts.len() < MIN_COLUMNS {
        return line.to_string();
    }
    let mut cols = Vec::with_capacity(parts.len());
    cols.push(parts[0].to_string());
    for player in &parts[1..=PLAYER_COLUMNS] {
        let player = strip_marker(player);
        let marked = match lexicon.status(&player) {
            Some(status) if !player.is_empty() => format!("{player} (false:{})", status.marker()),
            _ => player,
        };
        cols.push(marked);
    }
    cols.extend(parts[MIN_COLUMNS..].iter().map(|s| s.to_string()));
    cols.join(" | ")
}

/// Marks a recommendations file in place.
pub fn mark_file(path: &Path, lexicon: &Lexicon) -> Result<()> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let text = raw.strip_prefix(UTF8_BOM).unwrap_or(&raw);
    let mut marked = String::new();
    marked.push(UTF8_BOM);
    marked.push_str(&mark_lines(text, lexicon));
    fs::write(path, marked).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Keys a player name can be matched under: the full name, surname plus
/// first name, and the surname alone when it is long enough.
pub fn name_variants(name: &str) -> Vec<String> {
    let mut keys = Vec::new();
    let full = normalize(name);
    if full.is_empty() {
        return keys;
    }
    keys.push(full);
    let parts: Vec<&str> = name
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|p| !p.is_empty())
        .collect();
    if let (Some(first), Some(last)) = (parts.first(), parts.last()) {
        let (first, last) = (normalize(first), normalize(last));
        if !first.is_empty() && !last.is_empty() {
            push_unique(&mut keys, format!("{last}{first}"));
        }
        if last.len() >= MIN_SURNAME_KEY {
            push_unique(&mut keys, last);
        }
    }
    keys
}

/// Keys a team name can be matched under. Squad files sometimes spell
/// umlauts out ("Muenster") where other sources fold them ("Munster").
pub fn team_keys(team: &str) -> Vec<String> {
    let base = normalize(team);
    let mut keys = vec![base.clone()];
    push_unique(
        &mut keys,
        base.replace("ae", "a").replace("oe", "o").replace("ue", "u"),
    );
    keys
}

fn push_unique(keys: &mut Vec<String>, key: String) {
    if !key.is_empty() && !keys.contains(&key) {
        keys.push(key);
    }
}

/// Current squads by team, read from a squad listing of
/// `=== Team ===` headers followed by `- Player` lines.
#[derive(Debug, Clone, Default)]
pub struct SquadIndex {
    teams: HashMap<String, HashSet<String>>,
}

impl SquadIndex {
    pub fn parse(text: &str) -> Self {
        let mut teams: HashMap<String, HashSet<String>> = HashMap::new();
        let mut current: Vec<String> = Vec::new();
        for line in text.lines() {
            let line = line.trim().trim_start_matches(UTF8_BOM);
            if let Some(team) = line
                .strip_prefix("=== ")
                .and_then(|rest| rest.strip_suffix(" ==="))
            {
                current = team_keys(team.trim());
                for key in &current {
                    teams.entry(key.clone()).or_default();
                }
                continue;
            }
            let Some(player) = line.strip_prefix("- ") else {
                continue;
            };
            for team in &current {
                if let Some(squad) = teams.get_mut(team) {
                    squad.extend(name_variants(player.trim()));
                }
            }
        }
        Self { teams }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Self::parse(&raw))
    }

    pub fn knows_team(&self, team: &str) -> bool {
        team_keys(team).iter().any(|k| self.teams.contains_key(k))
    }

    pub fn in_squad(&self, team: &str, player: &str) -> bool {
        let variants = name_variants(player);
        team_keys(team)
            .iter()
            .filter_map(|k| self.teams.get(k))
            .any(|squad| variants.iter().any(|v| squad.contains(v)))
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }
}

/// Appends `nicht_im_kader` to players missing from their team's squad,
/// merging with any marker already present: `name (false:verletzt)`
/// becomes `name (false:verletzt,nicht_im_kader)`. Rows for teams the
/// index does not know are left alone.
pub fn mark_squad_lines(text: &str, squads: &SquadIndex) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        out.push_str(&mark_squad_line(line, squads));
        out.push('\n');
    }
    out
}

fn mark_squad_line(line: &str, squads: &SquadIndex) -> String {
    if line.is_empty() || line.starts_with('#') {
        return line.to_string();
    }
    let parts: Vec<&str> = line.split('|').map(str::trim).collect();
    if parts.len() < MIN_COLUMNS {
        return line.to_string();
    }
    let team = parts[0];
    if !squads.knows_team(team) {
        debug!(team, "team missing from squad index, row left as is");
        return line.to_string();
    }
    let mut cols = Vec::with_capacity(parts.len());
    cols.push(team.to_string());
    for player in &parts[1..=PLAYER_COLUMNS] {
        cols.push(mark_squad_player(team, player, squads));
    }
    cols.extend(parts[MIN_COLUMNS..].iter().map(|s| s.to_string()));
    cols.join(" | ")
}

fn mark_squad_player(team: &str, player: &str, squads: &SquadIndex) -> String {
    if player.is_empty() {
        return String::new();
    }
    let (base, existing) = match MARKER_TAIL.captures(player) {
        Some(caps) => {
            let start = caps.get(0).map(|m| m.start()).unwrap_or(player.len());
            let marks = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
            (player[..start].trim(), marks)
        }
        None => (player, ""),
    };
    if squads.in_squad(team, base) {
        return player.to_string();
    }
    let marks = if existing.is_empty() {
        NOT_IN_SQUAD.to_string()
    } else if existing.split(',').any(|m| m.trim() == NOT_IN_SQUAD) {
        existing.to_string()
    } else {
        format!("{existing},{NOT_IN_SQUAD}")
    };
    format!("{base} (false:{marks})")
}

/// Squad check of a recommendations file, in place.
pub fn mark_squad_file(path: &Path, squads: &SquadIndex) -> Result<()> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let text = raw.strip_prefix(UTF8_BOM).unwrap_or(&raw);
    let mut marked = String::new();
    marked.push(UTF8_BOM);
    marked.push_str(&mark_squad_lines(text, squads));
    fs::write(path, marked).with_context(|| format!("failed to write {}", path.display()))?;
    info!(file = %path.display(), teams = squads.team_count(), "squad check written");
    Ok(())
}
