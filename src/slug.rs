use once_cell::sync::Lazy;
use regex::Regex;

use crate::competition::CONFERENCE_ID;
use crate::normalize::fold;

/// Slug group ids that get the German club-token rules.
const GERMAN_GROUP_IDS: &[u32] = &[1, 2, 3, CONFERENCE_ID];

const INTERNATIONAL_SLUGS: &[(&str, &str)] = &[
    ("Slavia Prag", "slaviaprag"),
    ("Arsenal FC", "arsenal"),
    ("SSC Napoli", "sscneapel"),
    ("Eintracht Frankfurt", "frankfurt"),
    ("Olympiakos Piräus", "olympiakos"),
    ("PSV Eindhoven", "eindhoven"),
    ("Atlético Madrid", "atlmadrid"),
    ("Royale Union Saint-Gilloise", "stgilloise"),
    ("FK Bodø/Glimt", "bodo/glimt"),
    ("AS Monaco", "monaco"),
    ("Juventus Turin", "juventusturin"),
    ("Sporting Lissabon", "sporting"),
    ("Liverpool FC", "liverpool"),
    ("Real Madrid CF", "realmadrid"),
    ("Tottenham Hotspur FC", "tottenham"),
    ("FC Kopenhagen", "kopenhagen"),
    ("Paris Saint-Germain", "psg"),
    ("FC Bayern München", "bayern"),
    ("AEP Paphos FC", "aeppaphosfc"),
    ("Villarreal CF", "villarreal"),
    ("FK Qarabağ Ağdam", "karabakh"),
    ("Chelsea FC", "chelsea"),
    ("Olympique de Marseille", "olmarseille"),
    ("Atalanta Bergamo", "bergamo"),
    ("Newcastle United FC", "newcastle"),
    ("Athletic Club Bilbao", "athbilbao"),
    ("Manchester City FC", "mancity"),
    ("Borussia Dortmund", "dortmund"),
    ("Club Brugge KV", "clubbrugge"),
    ("FC Barcelona", "fcbarcelona"),
    ("Inter Mailand", "intermailand"),
    ("FC Kairat Almaty", "kairat"),
    ("Ajax Amsterdam", "ajaxamsterdam"),
    ("Galatasaray Istanbul", "galatasaray"),
    ("Benfica Lissabon", "benfica"),
    ("Bayer 04 Leverkusen", "leverkusen"),
];

/// Name variants seen in fixture feeds for the conference view.
const CONFERENCE_SLUGS: &[(&str, &str)] = &[
    // Bundesliga
    ("FC Bayern München", "bayern"),
    ("Bayern München", "bayern"),
    ("Bayern", "bayern"),
    ("FC Bayern", "bayern"),
    ("Borussia Dortmund", "dortmund"),
    ("BVB", "dortmund"),
    ("RB Leipzig", "rbleipzig"),
    ("Leipzig", "rbleipzig"),
    ("RasenBallsport Leipzig", "rbleipzig"),
    ("Bayer 04 Leverkusen", "leverkusen"),
    ("Leverkusen", "leverkusen"),
    ("Bayer Leverkusen", "leverkusen"),
    ("VfB Stuttgart", "stuttgart"),
    ("Stuttgart", "stuttgart"),
    ("Eintracht Frankfurt", "frankfurt"),
    ("Frankfurt", "frankfurt"),
    ("Eintracht", "frankfurt"),
    ("SC Freiburg", "freiburg"),
    ("Freiburg", "freiburg"),
    ("TSG 1899 Hoffenheim", "hoffenheim"),
    ("Hoffenheim", "hoffenheim"),
    ("TSG Hoffenheim", "hoffenheim"),
    ("1899 Hoffenheim", "hoffenheim"),
    ("VfL Wolfsburg", "wolfsburg"),
    ("Wolfsburg", "wolfsburg"),
    ("Borussia Mönchengladbach", "mgladbach"),
    ("Mönchengladbach", "mgladbach"),
    ("Borussia M'gladbach", "mgladbach"),
    ("1. FSV Mainz 05", "mainz"),
    ("Mainz 05", "mainz"),
    ("Mainz", "mainz"),
    ("FSV Mainz", "mainz"),
    ("1. FC Union Berlin", "unionberlin"),
    ("Union Berlin", "unionberlin"),
    ("Union", "unionberlin"),
    ("FC Union Berlin", "unionberlin"),
    ("FC Augsburg", "augsburg"),
    ("Augsburg", "augsburg"),
    ("1. FC Heidenheim", "heidenheim"),
    ("Heidenheim", "heidenheim"),
    ("FC Heidenheim", "heidenheim"),
    ("1. FC Heidenheim 1846", "heidenheim"),
    ("1. FC Köln", "koeln"),
    ("FC Köln", "koeln"),
    ("Köln", "koeln"),
    ("Werder Bremen", "bremen"),
    ("SV Werder Bremen", "bremen"),
    ("Bremen", "bremen"),
    ("Werder", "bremen"),
    ("Hamburger SV", "hamburg"),
    ("HSV", "hamburg"),
    ("Hamburg", "hamburg"),
    ("Hamburger", "hamburg"),
    ("FC St. Pauli", "stpauli"),
    ("St. Pauli", "stpauli"),
    ("St Pauli", "stpauli"),
    // 2. Bundesliga
    ("Holstein Kiel", "kiel"),
    ("Kiel", "kiel"),
    ("Holstein", "kiel"),
    ("VfL Bochum", "vflbochum"),
    ("Bochum", "vflbochum"),
    ("SV Elversberg", "elversberg"),
    ("Elversberg", "elversberg"),
    ("SV 07 Elversberg", "elversberg"),
    ("SC Paderborn 07", "paderborn"),
    ("Paderborn 07", "paderborn"),
    ("Paderborn", "paderborn"),
    ("SC Paderborn", "paderborn"),
    ("1. FC Magdeburg", "magdeburg"),
    ("Magdeburg", "magdeburg"),
    ("FC Magdeburg", "magdeburg"),
    ("Fortuna Düsseldorf", "dusseldorf"),
    ("Düsseldorf", "dusseldorf"),
    ("Fortuna", "dusseldorf"),
    ("1. FC Kaiserslautern", "klautern"),
    ("Kaiserslautern", "klautern"),
    ("FC Kaiserslautern", "klautern"),
    ("Karlsruher SC", "karlsruhe"),
    ("Karlsruhe", "karlsruhe"),
    ("Karlsruher", "karlsruhe"),
    ("KSC", "karlsruhe"),
    ("Hannover 96", "hannover"),
    ("Hannover", "hannover"),
    ("1. FC Nürnberg", "nuernberg"),
    ("Nürnberg", "nuernberg"),
    ("FC Nürnberg", "nuernberg"),
    ("Hertha BSC", "herthabsc"),
    ("Hertha BSC Berlin", "herthabsc"),
    ("Hertha", "herthabsc"),
    ("Hertha Berlin", "herthabsc"),
    ("SV Darmstadt 98", "darmstadt"),
    ("Darmstadt 98", "darmstadt"),
    ("Darmstadt", "darmstadt"),
    ("SV Darmstadt", "darmstadt"),
    ("SpVgg Greuther Fürth", "fuerth"),
    ("Greuther Fürth", "fuerth"),
    ("Fürth", "fuerth"),
    ("Greuther", "fuerth"),
    ("FC Schalke 04", "schalke"),
    ("Schalke 04", "schalke"),
    ("Schalke", "schalke"),
    ("FC Schalke", "schalke"),
    ("SC Preußen Münster", "muenster"),
    ("Preußen Münster", "muenster"),
    ("Münster", "muenster"),
    ("Preussen Muenster", "muenster"),
    ("Eintracht Braunschweig", "braunschweig"),
    ("Braunschweig", "braunschweig"),
    ("Eintracht BS", "braunschweig"),
    ("DSC Arminia Bielefeld", "arminiabielefeld"),
    ("Arminia Bielefeld", "arminiabielefeld"),
    ("Bielefeld", "arminiabielefeld"),
    ("Arminia", "arminiabielefeld"),
    ("Dynamo Dresden", "dresden"),
    ("SG Dynamo Dresden", "dresden"),
];

/// Generic-rule outputs the site spells differently.
const GERMAN_CORRECTIONS: &[(&str, &str)] = &[
    ("bayernmunchen", "bayern"),
    ("fcbayernmunchen", "bayern"),
    ("fcbayern", "bayern"),
    ("borussiadortmund", "dortmund"),
    ("bvb", "dortmund"),
    ("borussiamonchengladbach", "mgladbach"),
    ("monchengladbach", "mgladbach"),
    ("werderbremen", "bremen"),
    ("svwerderbremen", "bremen"),
    ("svwerder", "bremen"),
    ("heidenheim1846", "heidenheim"),
    ("fcheidenheim1846", "heidenheim"),
    ("fcheidenheim", "heidenheim"),
    ("1heidenheim1846", "heidenheim"),
    ("1fcheidenheim1846", "heidenheim"),
    ("koln", "koeln"),
    ("fckoln", "koeln"),
    ("fckoeln", "koeln"),
    ("1fckoln", "koeln"),
    ("1fckoeln", "koeln"),
    ("dusseldorf", "duesseldorf"),
    ("fortunadusseldorf", "duesseldorf"),
    ("fortunaduesseldorf", "duesseldorf"),
    ("herthabscc", "herthabsc"),
    ("1899hoffenheim", "hoffenheim"),
    ("tsghoffenheim", "hoffenheim"),
    ("leipzigrb", "rbleipzig"),
    ("fcunionberlin", "unionberlin"),
    ("1unionberlin", "unionberlin"),
    ("1fcunionberlin", "unionberlin"),
    ("fcstpauli", "stpauli"),
    ("mainz05", "mainz"),
    ("fsvmainz05", "mainz"),
    ("1fsvmainz05", "mainz"),
    ("hamburger", "hamburg"),
    ("hamburgersv", "hamburg"),
    ("hsv", "hamburg"),
    ("vfbstuttgart", "stuttgart"),
    ("scfreiburg", "freiburg"),
    ("eintrachtfrankfurt", "frankfurt"),
    ("eintracht", "frankfurt"),
    ("bayer04leverkusen", "leverkusen"),
    ("bayerleverkusen", "leverkusen"),
    ("bayer04", "leverkusen"),
    ("leverkusen04", "leverkusen"),
    ("hannover96", "hannover"),
    ("schalke04", "schalke"),
    ("paderborn07", "paderborn"),
    ("kaiserslautern", "klautern"),
    ("1fckaiserslautern", "klautern"),
    ("karlsruher", "karlsruhe"),
    ("darmstadt98", "darmstadt"),
    ("07elversberg", "elversberg"),
    ("elversberg07", "elversberg"),
    ("greutherfurth", "fuerth"),
    ("greuterfurth", "fuerth"),
    ("bochum", "vflbochum"),
    ("dynamodresden", "dresden"),
    ("preussenmuenster", "muenster"),
    ("preussenmunster", "muenster"),
    ("munster", "muenster"),
    ("nurnberg", "nuernberg"),
];

static GERMAN_ORDINAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(1\.|2\.|3\.)\s*").expect("ordinal regex"));
static GERMAN_LEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(fc|sv|fsv|vfl|vfb|tsg|sc|spvgg|eintracht|fortuna|arminia|preussen)\s+")
        .expect("leading club token regex")
});
static GERMAN_TRAILING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+(fc|sv|fsv|vfl|vfb|tsg|sc|spvgg|eintracht|fortuna|arminia|preussen)\b")
        .expect("trailing club token regex")
});
static FOREIGN_LEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(fc|as|rc|osc|ogc|stade|olympique|le)\s+").expect("leading club token regex")
});
static FOREIGN_TRAILING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+(fc|ac|hsc|cv)\b").expect("trailing club token regex"));

/// What a rule knows about the competition the name belongs to.
#[derive(Debug, Clone, Copy)]
pub struct SlugContext {
    pub competition_id: u32,
    pub international: bool,
}

type SlugRule = fn(&str, SlugContext) -> Option<String>;

/// Tried in order; the first rule that yields a slug wins.
const RULES: &[SlugRule] = &[
    international_table,
    international_fallback,
    conference_override,
    generic_rule,
];

/// Site URL slug for a team, or `None` when nothing usable comes out.
///
/// The generic rule is a best guess. Callers confirm a slug against a
/// fetched page before trusting it.
pub fn resolve_slug(team_name: &str, competition_id: u32, international: bool) -> Option<String> {
    let ctx = SlugContext {
        competition_id,
        international,
    };
    RULES
        .iter()
        .find_map(|rule| rule(team_name, ctx))
        .filter(|slug| !slug.is_empty())
}

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn international_table(name: &str, ctx: SlugContext) -> Option<String> {
    if !ctx.international {
        return None;
    }
    lookup(INTERNATIONAL_SLUGS, name).map(str::to_string)
}

/// Crude and often wrong for unmapped clubs.
fn international_fallback(name: &str, ctx: SlugContext) -> Option<String> {
    if !ctx.international {
        return None;
    }
    Some(name.to_lowercase().replace([' ', '-'], ""))
}

fn conference_override(name: &str, ctx: SlugContext) -> Option<String> {
    if ctx.competition_id != CONFERENCE_ID {
        return None;
    }
    lookup(CONFERENCE_SLUGS, name).map(str::to_string)
}

fn generic_rule(name: &str, ctx: SlugContext) -> Option<String> {
    let folded = fold(name);
    let german = GERMAN_GROUP_IDS.contains(&ctx.competition_id);
    let stripped = if german {
        let s = GERMAN_ORDINAL.replace_all(&folded, "");
        let s = GERMAN_LEADING.replace_all(&s, "");
        GERMAN_TRAILING.replace_all(&s, "").into_owned()
    } else {
        let s = FOREIGN_LEADING.replace_all(&folded, "");
        FOREIGN_TRAILING.replace_all(&s, "").into_owned()
    };
    let slug: String = stripped
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect();
    if german {
        if let Some(fixed) = lookup(GERMAN_CORRECTIONS, &slug) {
            return Some(fixed.to_string());
        }
    }
    Some(slug)
}
