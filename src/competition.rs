use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::normalize::fold;

pub const SITE_BASE_URL: &str = "https://www.fussballdaten.de";

/// Slug group id for the mixed Bundesliga conference view.
pub const CONFERENCE_ID: u32 = 99;

/// Competitions whose lineups are published as bare name lists.
const NO_LINE_LABEL_IDS: &[u32] = &[1, 2, 3];

const CUP_ROUNDS: &[&str] = &[
    "1-runde",
    "2-runde",
    "achtelfinale",
    "viertelfinale",
    "halbfinale",
    "finale",
];

const INTERNATIONAL_PHASES: &[Phase] = &[
    Phase::numbered("gruppenphase", 20),
    Phase::numbered("league-stage", 20),
    Phase::knockout("play-offs"),
    Phase::knockout("achtelfinale"),
    Phase::knockout("viertelfinale"),
    Phase::knockout("halbfinale"),
    Phase::knockout("finale"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    pub name: &'static str,
    /// Highest matchday for phases that are paged by matchday.
    pub matchdays: Option<u32>,
}

impl Phase {
    const fn numbered(name: &'static str, matchdays: u32) -> Self {
        Self {
            name,
            matchdays: Some(matchdays),
        }
    }

    const fn knockout(name: &'static str) -> Self {
        Self {
            name,
            matchdays: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberingScheme {
    Sequential { first: u32, last: u32 },
    NamedRounds(&'static [&'static str]),
    PhaseMatchday(&'static [Phase]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureSource {
    OpenLigaDb(&'static str),
    SitePages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Competition {
    pub key: &'static str,
    pub path: &'static str,
    pub id: u32,
    pub international: bool,
    pub scheme: NumberingScheme,
    pub fixture_source: FixtureSource,
}

pub const COMPETITIONS: &[Competition] = &[
    Competition {
        key: "bundesliga",
        path: "bundesliga",
        id: 1,
        international: false,
        scheme: NumberingScheme::Sequential { first: 1, last: 34 },
        fixture_source: FixtureSource::OpenLigaDb("bl1"),
    },
    Competition {
        key: "2bundesliga",
        path: "2liga",
        id: 2,
        international: false,
        scheme: NumberingScheme::Sequential { first: 1, last: 34 },
        fixture_source: FixtureSource::OpenLigaDb("bl2"),
    },
    Competition {
        key: "dfbpokal",
        path: "dfb-pokal",
        id: 3,
        international: false,
        scheme: NumberingScheme::NamedRounds(CUP_ROUNDS),
        fixture_source: FixtureSource::OpenLigaDb("dfb"),
    },
    Competition {
        key: "championsleague",
        path: "championsleague",
        id: 11,
        international: true,
        scheme: NumberingScheme::PhaseMatchday(INTERNATIONAL_PHASES),
        fixture_source: FixtureSource::SitePages,
    },
    Competition {
        key: "europaleague",
        path: "europaleague",
        id: 12,
        international: true,
        scheme: NumberingScheme::PhaseMatchday(INTERNATIONAL_PHASES),
        fixture_source: FixtureSource::SitePages,
    },
    Competition {
        key: "conferenceleague",
        path: "conferenceleague",
        id: 13,
        international: true,
        scheme: NumberingScheme::PhaseMatchday(INTERNATIONAL_PHASES),
        fixture_source: FixtureSource::SitePages,
    },
    Competition {
        key: "england",
        path: "england",
        id: 51,
        international: false,
        scheme: NumberingScheme::Sequential { first: 1, last: 38 },
        fixture_source: FixtureSource::SitePages,
    },
    Competition {
        key: "spain",
        path: "spanien",
        id: 41,
        international: false,
        scheme: NumberingScheme::Sequential { first: 1, last: 38 },
        fixture_source: FixtureSource::SitePages,
    },
    Competition {
        key: "italy",
        path: "italien",
        id: 31,
        international: false,
        scheme: NumberingScheme::Sequential { first: 1, last: 38 },
        fixture_source: FixtureSource::SitePages,
    },
    Competition {
        key: "france",
        path: "frankreich",
        id: 21,
        international: false,
        scheme: NumberingScheme::Sequential { first: 1, last: 34 },
        fixture_source: FixtureSource::SitePages,
    },
];

pub fn competition_by_key(key: &str) -> Option<&'static Competition> {
    COMPETITIONS.iter().find(|c| c.key == key)
}

/// A listing page on the source site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PageId {
    Matchday(u32),
    Round(String),
    PhaseMatchday { phase: String, matchday: u32 },
    Phase(String),
}

impl PageId {
    pub fn path_segment(&self) -> String {
        match self {
            PageId::Matchday(n) => n.to_string(),
            PageId::Round(name) | PageId::Phase(name) => name.clone(),
            PageId::PhaseMatchday { phase, matchday } => format!("{phase}/{matchday}"),
        }
    }

    pub fn designator(&self) -> Option<Designator> {
        match self {
            PageId::Matchday(n) | PageId::PhaseMatchday { matchday: n, .. } => {
                Some(Designator::Number(*n))
            }
            PageId::Round(name) => Some(Designator::Name(name.clone())),
            PageId::Phase(_) => None,
        }
    }

    pub fn phase(&self) -> Option<&str> {
        match self {
            PageId::PhaseMatchday { phase, .. } | PageId::Phase(phase) => Some(phase),
            _ => None,
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path_segment())
    }
}

/// Matchday number or round name as it appears in fixture records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Designator {
    Number(u32),
    Name(String),
}

impl Designator {
    pub fn as_number(&self) -> Option<u32> {
        match self {
            Designator::Number(n) => Some(*n),
            Designator::Name(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for Designator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Designator::Number(n) => write!(f, "{n}"),
            Designator::Name(s) => f.write_str(s),
        }
    }
}

impl Competition {
    pub fn assigns_positions(&self) -> bool {
        !NO_LINE_LABEL_IDS.contains(&self.id)
    }

    /// Every listing page in site order.
    pub fn candidate_pages(&self) -> Vec<PageId> {
        match self.scheme {
            NumberingScheme::Sequential { first, last } => {
                (first..=last).map(PageId::Matchday).collect()
            }
            NumberingScheme::NamedRounds(rounds) => {
                rounds.iter().map(|r| PageId::Round((*r).to_string())).collect()
            }
            NumberingScheme::PhaseMatchday(phases) => phases
                .iter()
                .flat_map(|p| phase_pages(p).unwrap_or_default())
                .collect(),
        }
    }

    /// Matchday pages of one phase; `None` when the phase is unknown or not
    /// paged by matchday.
    pub fn phase_candidates(&self, phase: &str) -> Option<Vec<PageId>> {
        let NumberingScheme::PhaseMatchday(phases) = self.scheme else {
            return None;
        };
        phases.iter().find(|p| p.name == phase).and_then(phase_pages)
    }

    pub fn phase_names(&self) -> Vec<&'static str> {
        match self.scheme {
            NumberingScheme::PhaseMatchday(phases) => phases.iter().map(|p| p.name).collect(),
            _ => Vec::new(),
        }
    }

    /// Maps a fixture record's raw designators onto a listing page.
    pub fn page_for(&self, matchday: Option<&Designator>, phase: Option<&str>) -> Option<PageId> {
        match self.scheme {
            NumberingScheme::Sequential { first, last } => {
                let n = matchday?.as_number()?;
                (first..=last).contains(&n).then_some(PageId::Matchday(n))
            }
            NumberingScheme::NamedRounds(rounds) => {
                let from_matchday = match matchday {
                    Some(Designator::Name(name)) => round_slug(name),
                    _ => None,
                };
                from_matchday
                    .or_else(|| phase.and_then(round_slug))
                    .filter(|slug| rounds.contains(&slug.as_str()))
                    .map(PageId::Round)
            }
            NumberingScheme::PhaseMatchday(phases) => {
                let phase_name = phase?.trim();
                let known = phases.iter().find(|p| p.name == phase_name)?;
                match known.matchdays {
                    Some(max) => {
                        let n = matchday?.as_number()?;
                        (1..=max).contains(&n).then(|| PageId::PhaseMatchday {
                            phase: known.name.to_string(),
                            matchday: n,
                        })
                    }
                    None => Some(PageId::Phase(known.name.to_string())),
                }
            }
        }
    }

    /// Sequential neighbours of a matchday that are still in range.
    pub fn neighbours(&self, page: &PageId) -> Vec<PageId> {
        let (NumberingScheme::Sequential { first, last }, PageId::Matchday(n)) = (self.scheme, page)
        else {
            return Vec::new();
        };
        let mut out = Vec::new();
        if *n > first {
            out.push(PageId::Matchday(n - 1));
        }
        if *n < last {
            out.push(PageId::Matchday(n + 1));
        }
        out
    }

    pub fn page_url(&self, season: &str, page: &PageId) -> String {
        format!(
            "{SITE_BASE_URL}/{}/{season}/{}/",
            self.path,
            page.path_segment()
        )
    }

    pub fn lineup_url(&self, season: &str, page: &PageId, first: &str, second: &str) -> String {
        format!(
            "{SITE_BASE_URL}/{}/{season}/{}/{first}-{second}/",
            self.path,
            page.path_segment()
        )
    }
}

fn phase_pages(phase: &Phase) -> Option<Vec<PageId>> {
    let max = phase.matchdays?;
    Some(
        (1..=max)
            .map(|matchday| PageId::PhaseMatchday {
                phase: phase.name.to_string(),
                matchday,
            })
            .collect(),
    )
}

/// "1. Runde" -> "1-runde", "Achtelfinale" -> "achtelfinale".
fn round_slug(label: &str) -> Option<String> {
    let folded = fold(label);
    let slug = folded
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    (!slug.is_empty()).then_some(slug)
}

/// Site season tag: a season is named after the calendar year it ends in,
/// switching over in July.
pub fn season_tag(today: NaiveDate) -> i32 {
    if today.month() >= 7 {
        today.year() + 1
    } else {
        today.year()
    }
}
