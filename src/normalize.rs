use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Canonical decomposition with every combining mark dropped.
pub fn strip_diacritics(raw: &str) -> String {
    raw.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Diacritic-free lowercase text with `ß` spelled out. Punctuation and
/// spacing are left alone.
pub fn fold(raw: &str) -> String {
    strip_diacritics(raw).to_lowercase().replace('ß', "ss")
}

/// Comparison key for a team or player name.
///
/// Lowercase ASCII letters and digits only. Whitespace-separated tokens
/// that carry no letter ("04", "1.", "1899") are club-registration noise
/// and drop out, so "Bayer 04 Leverkusen" and "Bayer Leverkusen" share a
/// key.
pub fn normalize(name: &str) -> String {
    let folded = fold(name);
    let mut out = String::with_capacity(folded.len());
    for token in folded.split_whitespace() {
        let key: String = token.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
        if key.chars().any(|c| c.is_ascii_alphabetic()) {
            out.push_str(&key);
        }
    }
    out
}

/// Human-readable name from scraped link text: entities decoded, accents
/// stripped, whitespace collapsed.
pub fn simplify_display_name(raw: &str) -> String {
    let decoded = decode_entities(raw);
    let cleaned = strip_diacritics(&decoded).replace('ß', "ss");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn is_coach(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("trainer") || lower.contains("coach")
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::{is_coach, normalize, simplify_display_name};

    #[test]
    fn normalize_strips_accents_and_punctuation() {
        assert_eq!(normalize("Borussia Mönchengladbach"), "borussiamonchengladbach");
        assert_eq!(normalize("Müller-Weiß"), "mullerweiss");
        assert_eq!(normalize("  N'Golo Kanté "), "ngolokante");
    }

    #[test]
    fn normalize_drops_numeral_tokens() {
        assert_eq!(normalize("Bayer 04 Leverkusen"), normalize("Bayer Leverkusen"));
        assert_eq!(normalize("1. FC Köln"), "fckoln");
        assert_eq!(normalize("Schalke 04"), "schalke");
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in [
            "",
            "Ødegaard",
            "TSG 1899 Hoffenheim",
            "ø1 x",
            "FK Bodø/Glimt",
            "Paris Saint-Germain",
            "04",
        ] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn normalize_empty_is_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("  -- "), "");
    }

    #[test]
    fn display_name_decodes_and_collapses() {
        assert_eq!(
            simplify_display_name("  Jérôme\n   Boateng &amp; Co "),
            "Jerome Boateng & Co"
        );
        assert_eq!(simplify_display_name("Weißhaupt"), "Weisshaupt");
    }

    #[test]
    fn coach_detection_is_case_insensitive() {
        assert!(is_coach("Trainer: Vincent Kompany"));
        assert!(is_coach("Head Coach"));
        assert!(!is_coach("Harry Kane"));
    }
}
