// src/specs/medalist.rs
//! Gold medalist of an individual event.
//!
//! Three strategies, tried in order, each a pure function of the page:
//! 1. prose: "<Name> of <Country> won the gold" (or "<Country>'s <Name> won …")
//! 2. infobox: a gold marker followed by a linked name, with a silver marker
//!    close by so a stray "gold" in running text doesn't count
//! 3. ranked table: a cell holding just "1" followed by a linked name
//!
//! The first candidate whose name passes validation wins. A missing country
//! code is looked for once more in the plain text afterwards.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::CountryIndex;
use crate::config::consts::{
    COUNTRY_CODE_WINDOW, GOLD_LINK_WINDOW, GOLD_TAG, MAX_GOLD_MARKERS, RANK_LINK_WINDOW,
    SILVER_MARKER_WINDOW,
};
use crate::core::sanitize::{decode_entities, normalize_ws};

/// Surnames that are really headings or template words.
const SURNAME_DENYLIST: &[&str] = &[
    "ROUND", "FINAL", "FINALS", "QUALIFICATION", "TRAINING", "OFFICIAL", "SESSION", "MEDAL",
    "MEDALISTS", "EVENT", "COMPETITION", "OLYMPIC", "OLYMPICS", "WINTER", "GAMES", "RESULTS",
    "RUN", "HEAT", "STANDINGS", "SCHEDULE",
];

// A capitalised name word: "Klæbo", "Gut-Behrami", "McKinnon".
const WORD: &str = r"\p{Lu}\p{Ll}[\p{L}\-]*";
const WON_GOLD: &str = r"\s+(?:won|claimed)\s+(?:the\s+)?(?:(?i:olympic)\s+)?(?:gold|competition)";

static PROSE_OF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?P<name>{WORD}(?:\s+{WORD})+)\s+(?:of\s+(?:the\s+)?)?(?P<country>{WORD}(?:\s+{WORD})?){WON_GOLD}"
    ))
    .expect("prose regex")
});

static PROSE_POSSESSIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?P<country>{WORD}(?:\s+{WORD})?)(?:'s|’s|'|’)?\s+(?P<name>{WORD}(?:\s+{WORD})+){WON_GOLD}"
    ))
    .expect("possessive prose regex")
});

static GOLD_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)1st\s*place|\bgold(?:[_ ]medal(?:ist)?)?|🥇").expect("gold marker regex"));

static SILVER_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)2nd\s*place|\bsilver|🥈").expect("silver marker regex"));

static RANK_ONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<t[dh][^>]*>\s*1\s*</t[dh]>").expect("rank cell regex"));

static LINKED_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<a\s[^>]*>([^<]+)</a>").expect("link regex"));

static CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([A-Z]{3})\)").expect("code regex"));

/// The two views of an event page every strategy may look at.
#[derive(Clone, Copy, Debug)]
pub struct EventPage<'a> {
    pub markup: &'a str,
    /// Plain text of `markup` (tags stripped, entities decoded).
    pub text: &'a str,
}

/// What a strategy found, before validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub name: String,
    pub code: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoldMedalist {
    pub name: String,
    /// Last word of the name, upper-cased.
    pub surname: String,
    pub code: Option<String>,
}

impl GoldMedalist {
    /// "🥇 SURNAME (CODE)", or "🥇 SURNAME" when the country is unknown.
    pub fn result_tag(&self) -> String {
        match &self.code {
            Some(code) => format!("{GOLD_TAG} {} ({code})", self.surname),
            None => format!("{GOLD_TAG} {}", self.surname),
        }
    }
}

pub type Strategy = fn(&EventPage<'_>, &CountryIndex) -> Option<Candidate>;

pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("prose", prose_strategy),
    ("infobox", infobox_strategy),
    ("ranked table", ranked_table_strategy),
];

/// Run the strategies in order; the first validated candidate wins.
pub fn extract(page: &EventPage<'_>, idx: &CountryIndex) -> Option<GoldMedalist> {
    for (label, strategy) in STRATEGIES {
        let Some(candidate) = strategy(page, idx) else {
            continue;
        };
        let Some(surname) = validate(&candidate.name, idx) else {
            log::debug!("Medalist: {label} candidate '{}' rejected", candidate.name);
            continue;
        };
        let code = candidate
            .code
            .or_else(|| country_from_text(page.text, last_word(&candidate.name), idx));
        log::debug!("Medalist via {label}: {} ({})", candidate.name, code.as_deref().unwrap_or("?"));
        return Some(GoldMedalist { name: candidate.name, surname, code });
    }
    None
}

fn prose_strategy(page: &EventPage<'_>, idx: &CountryIndex) -> Option<Candidate> {
    from_prose(page.text, idx)
}

fn infobox_strategy(page: &EventPage<'_>, idx: &CountryIndex) -> Option<Candidate> {
    from_infobox(page.markup, idx)
}

fn ranked_table_strategy(page: &EventPage<'_>, idx: &CountryIndex) -> Option<Candidate> {
    from_ranked_table(page.markup, idx)
}

/// Strategy 1. Only matches whose country resolves are taken.
pub fn from_prose(text: &str, idx: &CountryIndex) -> Option<Candidate> {
    [&*PROSE_OF, &*PROSE_POSSESSIVE].into_iter().find_map(|re| {
        re.captures_iter(text).find_map(|c| {
            let code = idx.lookup(&c["country"])?;
            let name = normalize_ws(&c["name"]);
            validate(&name, idx)?;
            Some(Candidate { name, code: Some(s!(code)) })
        })
    })
}

/// Strategy 2.
pub fn from_infobox(markup: &str, idx: &CountryIndex) -> Option<Candidate> {
    for m in GOLD_MARKER.find_iter(markup).take(MAX_GOLD_MARKERS) {
        if !SILVER_MARKER.is_match(window(markup, m.start(), SILVER_MARKER_WINDOW)) {
            continue;
        }
        let after = window(markup, m.end(), GOLD_LINK_WINDOW);
        if let Some((name, end)) = first_linked_name(after, idx) {
            let code = code_near(markup, m.start(), m.end() + end, idx);
            return Some(Candidate { name, code });
        }
    }
    None
}

/// Strategy 3.
pub fn from_ranked_table(markup: &str, idx: &CountryIndex) -> Option<Candidate> {
    for m in RANK_ONE.find_iter(markup) {
        let after = window(markup, m.end(), RANK_LINK_WINDOW);
        if let Some((name, end)) = first_linked_name(after, idx) {
            let code = code_near(markup, m.start(), m.end() + end, idx);
            return Some(Candidate { name, code });
        }
    }
    None
}

/// Name check shared by all strategies. Returns the upper-cased surname.
pub fn validate(name: &str, idx: &CountryIndex) -> Option<String> {
    if !is_person_name(name) || idx.exact(name).is_some() {
        return None;
    }
    surname_of(name)
}

/// At least two words, longer than four characters, every word capitalised.
pub fn is_person_name(name: &str) -> bool {
    let words: Vec<&str> = name.split_whitespace().collect();
    words.len() >= 2
        && name.trim().chars().count() > 4
        && words.iter().all(|w| w.chars().next().is_some_and(char::is_uppercase))
}

/// Upper-cased last word, unless it's a heading word or a number.
pub fn surname_of(name: &str) -> Option<String> {
    let surname = last_word(name).to_uppercase();
    if surname.is_empty()
        || surname.chars().all(|c| c.is_ascii_digit())
        || SURNAME_DENYLIST.contains(&surname.as_str())
    {
        return None;
    }
    Some(surname)
}

/// Look for the medalist's country in running text.
/// Tries "Surname (XXX)", "Surname of [the] <country>", "<Country>, with … Surname".
pub fn country_from_text(text: &str, surname: &str, idx: &CountryIndex) -> Option<String> {
    if surname.is_empty() {
        return None;
    }
    let s = regex::escape(surname);

    let inline = Regex::new(&format!(r"\b{s}\s*\(([A-Z]{{3}})\)")).ok()?;
    if let Some(code) = inline.captures_iter(text).find_map(|c| known_code(&c[1], idx)) {
        return Some(code);
    }

    let of = Regex::new(&format!(r"\b{s}\s+of\s+(?:the\s+)?([^,.;:()]{{1,60}})")).ok()?;
    if let Some(code) = of.captures_iter(text).find_map(|c| idx.resolve_prefix(&c[1])) {
        return Some(s!(code));
    }

    let with = Regex::new(&format!(r"({WORD}(?:\s+{WORD})?),\s+with\s+[^.]{{0,120}}?\b{s}\b")).ok()?;
    with.captures_iter(text)
        .find_map(|c| idx.resolve_prefix(&c[1]))
        .map(|code| s!(code))
}

/* ---------------- helpers ---------------- */

fn last_word(name: &str) -> &str {
    name.split_whitespace().last().unwrap_or_default()
}

fn known_code(code: &str, idx: &CountryIndex) -> Option<String> {
    idx.exact(code).filter(|c| *c == code).map(|c| s!(c))
}

/// First link in `markup` whose text is a valid name, with the byte offset
/// just past it.
fn first_linked_name(markup: &str, idx: &CountryIndex) -> Option<(String, usize)> {
    LINKED_NAME.captures_iter(markup).find_map(|c| {
        let name = normalize_ws(&decode_entities(&c[1]));
        validate(&name, idx)?;
        Some((name, c.get(0)?.end()))
    })
}

/// Parenthesised country code between `from` and a little past `to`.
fn code_near(markup: &str, from: usize, to: usize, idx: &CountryIndex) -> Option<String> {
    let span = to.saturating_sub(from) + COUNTRY_CODE_WINDOW;
    CODE.captures_iter(window(markup, from, span))
        .find_map(|c| known_code(&c[1], idx))
}

/// `len` bytes of `s` from `start`, both ends pulled back onto char boundaries.
fn window(s: &str, start: usize, len: usize) -> &str {
    let mut lo = start.min(s.len());
    while !s.is_char_boundary(lo) {
        lo -= 1;
    }
    let mut hi = start.saturating_add(len).min(s.len());
    while !s.is_char_boundary(hi) {
        hi -= 1;
    }
    &s[lo..hi.max(lo)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TournamentConfig;
    use crate::core::html::plain_text;

    fn idx() -> CountryIndex {
        TournamentConfig::default().index()
    }

    fn run(markup: &str) -> Option<GoldMedalist> {
        let text = plain_text(markup);
        extract(&EventPage { markup, text: &text }, &idx())
    }

    #[test]
    fn prose_with_of() {
        let m = run("<p>Federica Brignone of Italy won the gold medal in a time of 1:23.45.</p>").unwrap();
        assert_eq!(m.result_tag(), "🥇 BRIGNONE (ITA)");
    }

    #[test]
    fn prose_with_the_and_olympic() {
        let m = run("<p>Breezy Johnson of the United States won the Olympic gold.</p>").unwrap();
        assert_eq!((m.surname.as_str(), m.code.as_deref()), ("JOHNSON", Some("USA")));
    }

    #[test]
    fn prose_possessive_and_demonym() {
        let a = from_prose("Norway's Johannes Klæbo won the gold.", &idx()).unwrap();
        assert_eq!((a.name.as_str(), a.code.as_deref()), ("Johannes Klæbo", Some("NOR")));
        let b = from_prose("Italian Federica Brignone claimed the competition.", &idx()).unwrap();
        assert_eq!((b.name.as_str(), b.code.as_deref()), ("Federica Brignone", Some("ITA")));
    }

    #[test]
    fn prose_needs_a_known_country() {
        assert_eq!(from_prose("Mathilde Gremaud of Atlantis won the gold.", &idx()), None);
    }

    const INFOBOX: &str = r#"<table class="infobox"><tr><th colspan="2">Medalists</th></tr>
        <tr><td><a href="/wiki/File:Gold_medal_icon.svg"><img alt="1st place, gold medalist(s)"></a></td>
        <td><a href="/wiki/Mathilde_Gremaud" title="Mathilde Gremaud">Mathilde Gremaud</a> (SUI)</td></tr>
        <tr><td><img alt="2nd place, silver medalist(s)"></td>
        <td><a href="/wiki/Eileen_Gu">Eileen Gu</a> (CHN)</td></tr></table>"#;

    #[test]
    fn infobox_with_silver_confirmation() {
        let m = run(INFOBOX).unwrap();
        assert_eq!(m.result_tag(), "🥇 GREMAUD (SUI)");
    }

    #[test]
    fn incidental_gold_is_ignored() {
        let doc = r#"<p>The gold course at <a href="/wiki/Livigno_Park">Livigno Park</a> was icy.</p>"#;
        assert_eq!(from_infobox(doc, &idx()), None);
    }

    #[test]
    fn ranked_table_then_country_from_text() {
        let doc = r#"<p>Marco Odermatt of Switzerland led from the first split.</p>
            <table class="wikitable"><tr><th>Rank</th><th>Athlete</th><th>Time</th></tr>
            <tr><td>1</td><td><a href="/wiki/Marco_Odermatt">Marco Odermatt</a></td><td>1:41.20</td></tr></table>"#;
        let m = run(doc).unwrap();
        assert_eq!(m.result_tag(), "🥇 ODERMATT (SUI)");
    }

    #[test]
    fn rank_cell_skips_country_links() {
        let doc = r#"<tr><td> 1 </td><td><a href="/wiki/Austria_at_the_2026_Winter_Olympics">Austria</a></td>
            <td><a href="/wiki/Anna_Gasser">Anna Gasser</a> (AUT)</td></tr>"#;
        let c = from_ranked_table(doc, &idx()).unwrap();
        assert_eq!((c.name.as_str(), c.code.as_deref()), ("Anna Gasser", Some("AUT")));
    }

    #[test]
    fn unknown_codes_are_not_countries() {
        let doc = r#"<tr><td>1</td><td><a href="/wiki/Anna_Gasser">Anna Gasser</a> (UTC)</td></tr>"#;
        assert_eq!(from_ranked_table(doc, &idx()).unwrap().code, None);
    }

    #[test]
    fn name_validation() {
        let idx = idx();
        assert_eq!(validate("Mikaela Shiffrin", &idx).as_deref(), Some("SHIFFRIN"));
        assert_eq!(validate("Lara Gut-Behrami", &idx).as_deref(), Some("GUT-BEHRAMI"));
        assert_eq!(validate("Mikaela", &idx), None);
        assert_eq!(validate("Big air", &idx), None);
        assert_eq!(validate("Qualification Round", &idx), None);
        assert_eq!(validate("Winter Olympics", &idx), None);
        assert_eq!(validate("United States", &idx), None);
        assert_eq!(validate("Al B", &idx), None);
    }

    #[test]
    fn secondary_country_forms() {
        let idx = idx();
        let text = "Norway, with Johannes Klæbo anchoring, took the relay.";
        assert_eq!(country_from_text(text, "Klæbo", &idx).as_deref(), Some("NOR"));
        let text = "It was Shiffrin of the United States with a run of 52.1.";
        assert_eq!(country_from_text(text, "Shiffrin", &idx).as_deref(), Some("USA"));
        assert_eq!(country_from_text("Gu (CHN) landed a 1620.", "Gu", &idx).as_deref(), Some("CHN"));
        assert_eq!(country_from_text("No country here.", "Gu", &idx), None);
    }

    #[test]
    fn no_candidate_is_none() {
        assert_eq!(run("<p>The event will be held on Friday.</p>"), None);
    }

    #[test]
    fn window_respects_char_boundaries() {
        let s = "ab🥇cd";
        assert_eq!(window(s, 0, 3), "ab");
        assert_eq!(window(s, 3, 2), "");
        assert_eq!(window(s, 2, 5), "🥇c");
        assert_eq!(window(s, 10, 5), "");
    }
}
