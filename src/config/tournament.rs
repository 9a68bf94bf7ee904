// src/config/tournament.rs
//! Immutable tournament configuration.
//!
//! Everything that names the tournament lives here: countries and flags,
//! demonyms and variant spellings, which event ids map to which pages,
//! the keyword maps used to line up schedule entries with event ids, and the
//! duration table. It is built once (defaults or a TOML file) and passed by
//! reference into each parser, so tests can swap in a different tournament.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::consts::{DEFAULT_DURATION_MIN, UNKNOWN_FLAG};
use crate::error::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
    pub flag: String,
}

/// The team whose medal count is projected and whose fixtures are scored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackedTeam {
    pub code: String,
    pub name: String,
    pub prior_gold: f64,
    pub prior_total: f64,
}

/// A two-team match: the page carrying its score and the other side's name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub page: String,
    pub opponent: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subsection {
    /// Token as it appears in event ids (`hp` in `sb-w-hp-final`).
    pub token: String,
    pub keywords: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sport {
    /// Event id prefix (`sb` in `sb-w-hp-final`).
    pub prefix: String,
    pub keywords: Vec<String>,
    /// Header text containing any of these is some other sport.
    #[serde(default)]
    pub excludes: Vec<String>,
    #[serde(default)]
    pub subsections: Vec<Subsection>,
}

impl Sport {
    /// Does a schedule header / sport field name this sport?
    pub fn matches(&self, text: &str) -> bool {
        let lc = text.to_lowercase();
        self.keywords.iter().any(|k| lc.contains(k.as_str()))
            && !self.excludes.iter().any(|x| lc.contains(x.as_str()))
    }

    pub fn subsection(&self, token: &str) -> Option<&Subsection> {
        self.subsections.iter().find(|s| s.token == token)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TournamentConfig {
    /// Display name, also used to recognise "<Country> at <name>" links.
    pub name: String,
    pub wiki_base: String,
    pub medal_table_page: String,
    /// External free-text schedule; reconciliation is skipped without one.
    pub schedule_url: Option<String>,
    pub events_total: u32,
    pub tracked: TrackedTeam,
    pub countries: Vec<Country>,
    /// Demonyms and variant spellings, lower-case → code.
    pub variants: BTreeMap<String, String>,
    /// Medal event id → page slug.
    pub event_pages: BTreeMap<String, String>,
    /// Fixture event id → page + opponent.
    pub fixtures: BTreeMap<String, Fixture>,
    pub sports: Vec<Sport>,
    /// Event id token → phrases that describe it in schedule text.
    pub phrases: BTreeMap<String, Vec<String>>,
    /// Event id token → gender word.
    pub genders: BTreeMap<String, String>,
    /// Tag → expected duration in minutes.
    pub durations: BTreeMap<String, u32>,
    pub default_duration: u32,
    pub fallback_model: String,
}

impl TournamentConfig {
    /// Load a TOML file; anything it leaves out keeps the default.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn page_url(&self, slug: &str) -> String {
        join!(&self.wiki_base, slug)
    }

    pub fn medal_table_url(&self) -> String {
        self.page_url(&self.medal_table_page)
    }

    /// Href fragment of "<Country> at <tournament>" links.
    pub fn link_marker(&self) -> String {
        join!("_at_the_", &self.name.replace(' ', "_"))
    }

    /// Title suffix of "<Country> at <tournament>" links.
    pub fn title_marker(&self) -> String {
        join!(" at the ", &self.name)
    }

    pub fn country(&self, code: &str) -> Option<&Country> {
        self.countries.iter().find(|c| c.code == code)
    }

    pub fn flag(&self, code: &str) -> String {
        self.country(code).map(|c| c.flag.clone()).unwrap_or_else(|| s!(UNKNOWN_FLAG))
    }

    /// Sport owning an event id, by its first segment.
    pub fn sport_for(&self, event_id: &str) -> Option<&Sport> {
        let prefix = event_id.split('-').next()?;
        self.sports.iter().find(|s| s.prefix == prefix)
    }

    /// Expected duration of an event with these tags.
    pub fn duration_for(&self, tags: &[String]) -> u32 {
        tags.iter()
            .find_map(|t| self.durations.get(t).copied())
            .unwrap_or(self.default_duration)
    }

    pub fn index(&self) -> CountryIndex {
        CountryIndex::new(self)
    }
}

fn strs(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn sport(prefix: &str, keywords: &[&str], excludes: &[&str], subsections: &[(&str, &[&str])]) -> Sport {
    Sport {
        prefix: s!(prefix),
        keywords: strs(keywords),
        excludes: strs(excludes),
        subsections: subsections
            .iter()
            .map(|(token, kw)| Subsection { token: s!(*token), keywords: strs(kw) })
            .collect(),
    }
}

const COUNTRIES: &[(&str, &str, &str)] = &[
    ("NOR", "Norway", "🇳🇴"), ("USA", "United States", "🇺🇸"), ("ITA", "Italy", "🇮🇹"),
    ("JPN", "Japan", "🇯🇵"), ("AUT", "Austria", "🇦🇹"), ("GER", "Germany", "🇩🇪"),
    ("CZE", "Czechia", "🇨🇿"), ("FRA", "France", "🇫🇷"), ("SWE", "Sweden", "🇸🇪"),
    ("SUI", "Switzerland", "🇨🇭"), ("KOR", "South Korea", "🇰🇷"), ("SLO", "Slovenia", "🇸🇮"),
    ("BUL", "Bulgaria", "🇧🇬"), ("CAN", "Canada", "🇨🇦"), ("CHN", "China", "🇨🇳"),
    ("NED", "Netherlands", "🇳🇱"), ("FIN", "Finland", "🇫🇮"), ("GBR", "Great Britain", "🇬🇧"),
    ("AUS", "Australia", "🇦🇺"), ("NZL", "New Zealand", "🇳🇿"), ("ESP", "Spain", "🇪🇸"),
    ("POL", "Poland", "🇵🇱"), ("BEL", "Belgium", "🇧🇪"), ("ROU", "Romania", "🇷🇴"),
    ("HUN", "Hungary", "🇭🇺"), ("CRO", "Croatia", "🇭🇷"), ("SVK", "Slovakia", "🇸🇰"),
    ("UKR", "Ukraine", "🇺🇦"), ("KAZ", "Kazakhstan", "🇰🇿"), ("LAT", "Latvia", "🇱🇻"),
    ("EST", "Estonia", "🇪🇪"), ("LTU", "Lithuania", "🇱🇹"), ("DEN", "Denmark", "🇩🇰"),
];

const VARIANTS: &[(&str, &str)] = &[
    ("swiss", "SUI"), ("chinese", "CHN"), ("american", "USA"), ("japanese", "JPN"),
    ("norwegian", "NOR"), ("italian", "ITA"), ("german", "GER"), ("french", "FRA"),
    ("austrian", "AUT"), ("swedish", "SWE"), ("canadian", "CAN"), ("korean", "KOR"),
    ("south korean", "KOR"), ("republic of korea", "KOR"), ("czech", "CZE"),
    ("czech republic", "CZE"), ("slovenian", "SLO"), ("slovene", "SLO"), ("dutch", "NED"),
    ("the netherlands", "NED"), ("finnish", "FIN"), ("british", "GBR"), ("australian", "AUS"),
    ("new zealander", "NZL"), ("spanish", "ESP"), ("polish", "POL"), ("belgian", "BEL"),
    ("romanian", "ROU"), ("hungarian", "HUN"), ("croatian", "CRO"), ("slovak", "SVK"),
    ("ukrainian", "UKR"), ("kazakh", "KAZ"), ("kazakhstani", "KAZ"), ("latvian", "LAT"),
    ("estonian", "EST"), ("lithuanian", "LTU"), ("danish", "DEN"), ("bulgarian", "BUL"),
    ("the united states", "USA"), ("united states of america", "USA"),
];

const EVENT_PAGES: &[(&str, &str)] = &[
    ("alp-m-dh", "Men%27s_downhill"),
    ("alp-w-dh", "Women%27s_downhill"),
    ("alp-w-sg", "Women%27s_super-G"),
    ("alp-w-gs", "Women%27s_giant_slalom"),
    ("alp-w-sl", "Women%27s_slalom"),
    ("frs-w-slope", "Women%27s_slopestyle"),
    ("frs-m-slope", "Men%27s_slopestyle"),
    ("frs-w-moguls", "Women%27s_moguls"),
    ("frs-m-moguls", "Men%27s_moguls"),
    ("frs-w-bigair", "Women%27s_big_air"),
    ("frs-m-bigair", "Men%27s_big_air"),
    ("frs-w-hp", "Women%27s_halfpipe"),
    ("frs-w-aerials", "Women%27s_aerials"),
    ("frs-m-aerials", "Men%27s_aerials"),
    ("sj-m-nh", "Men%27s_normal_hill_individual"),
    ("sb-w-bigair", "Women%27s_big_air"),
    ("sb-w-hp-final", "Women%27s_halfpipe"),
    ("sb-m-hp", "Men%27s_halfpipe"),
    ("ss-m-1000", "Men%27s_1000_metres"),
    ("ss-m-500", "Men%27s_500_metres"),
    ("ss-w-500", "Women%27s_500_metres"),
    ("luge-w-final", "Women%27s_singles"),
    ("luge-relay", "Team_relay"),
    ("fs-m-free", "Men%27s_singles"),
    ("fs-id-free", "Ice_dance"),
    ("fs-w-free", "Women%27s_singles"),
    ("bob-mono-final", "Women%27s_monobob"),
    ("hoc-w-gold", "Women%27s_tournament"),
    ("hoc-m-gold", "Men%27s_tournament"),
];

const FIXTURES: &[(&str, &str, &str)] = &[
    ("hoc-w-fin", "Ice_hockey", "Women%27s_tournament"),
    ("hoc-w-sui", "Ice_hockey", "Women%27s_tournament"),
    ("hoc-w-can", "Ice_hockey", "Women%27s_tournament"),
    ("hoc-m-lat", "Ice_hockey", "Men%27s_tournament"),
    ("hoc-m-den", "Ice_hockey", "Men%27s_tournament"),
    ("curl-md-ita", "Curling", "Mixed_doubles_tournament"),
];

const FRS_SUBSECTIONS: &[(&str, &[&str])] = &[
    ("hp", &["halfpipe"]),
    ("slope", &["slopestyle"]),
    ("bigair", &["big air"]),
    ("moguls", &["moguls"]),
    ("aerials", &["aerials"]),
    ("sx", &["ski cross"]),
];

const SB_SUBSECTIONS: &[(&str, &[&str])] = &[
    ("hp", &["halfpipe"]),
    ("slope", &["slopestyle"]),
    ("bigair", &["big air"]),
    ("sbx", &["snowboard cross", "cross"]),
    ("pgs", &["parallel"]),
];

const PHRASES: &[(&str, &[&str])] = &[
    ("dh", &["downhill"]),
    ("sg", &["super-g", "super g"]),
    ("gs", &["giant slalom"]),
    ("sl", &["slalom"]),
    ("comb", &["combined"]),
    ("slope", &["slopestyle"]),
    ("moguls", &["moguls"]),
    ("bigair", &["big air"]),
    ("hp", &["halfpipe"]),
    ("aerials", &["aerials"]),
    ("nh", &["normal hill"]),
    ("lh", &["large hill"]),
    ("500", &["500m", "500 m", "500 meters", "500 metres"]),
    ("1000", &["1000m", "1,000m", "1000 m", "1,000 m"]),
    ("1500", &["1500m", "1,500m", "1500 m", "1,500 m"]),
    ("free", &["free skate", "free dance", "free"]),
    ("short", &["short program", "rhythm dance"]),
    ("id", &["ice dance"]),
    ("mono", &["monobob"]),
    ("relay", &["relay"]),
    ("final", &["final"]),
    ("gold", &["gold medal"]),
    ("md", &["mixed doubles"]),
    ("fin", &["finland"]),
    ("sui", &["switzerland"]),
    ("can", &["canada"]),
    ("lat", &["latvia"]),
    ("den", &["denmark"]),
    ("ita", &["italy"]),
    ("open", &["opening ceremony"]),
    ("close", &["closing ceremony"]),
];

/// Page sport name for an event id prefix, as used in "<Sport>_at_the_<Games>_–_<Event>".
fn page_sport(prefix: &str) -> &'static str {
    match prefix {
        "alp" => "Alpine_skiing",
        "frs" => "Freestyle_skiing",
        "sj" => "Ski_jumping",
        "sb" => "Snowboard",
        "ss" => "Speed_skating",
        "luge" => "Luge",
        "fs" => "Figure_skating",
        "bob" => "Bobsleigh",
        "hoc" => "Ice_hockey",
        _ => "Curling",
    }
}

fn event_slug(sport: &str, games: &str, event: &str) -> String {
    format!("{sport}_at_the_{games}_%E2%80%93_{event}")
}

impl Default for TournamentConfig {
    fn default() -> Self {
        let name = s!("2026 Winter Olympics");
        let games = name.replace(' ', "_");

        let countries = COUNTRIES
            .iter()
            .map(|(code, name, flag)| Country { code: s!(*code), name: s!(*name), flag: s!(*flag) })
            .collect();

        let variants = VARIANTS.iter().map(|(k, v)| (s!(*k), s!(*v))).collect();

        let event_pages = EVENT_PAGES
            .iter()
            .map(|(id, event)| {
                let prefix = id.split('-').next().unwrap_or_default();
                (s!(*id), event_slug(page_sport(prefix), &games, event))
            })
            .collect();

        let opponents: HashMap<&str, &str> = [
            ("fin", "Finland"), ("sui", "Switzerland"), ("can", "Canada"),
            ("lat", "Latvia"), ("den", "Denmark"), ("ita", "Italy"),
        ]
        .into_iter()
        .collect();
        let fixtures = FIXTURES
            .iter()
            .filter_map(|(id, sport, event)| {
                let token = id.rsplit('-').next()?;
                let opponent = opponents.get(token)?;
                Some((s!(*id), Fixture { page: event_slug(sport, &games, event), opponent: s!(*opponent) }))
            })
            .collect();

        let sports = vec![
            sport("alp", &["alpine"], &[], &[]),
            sport("bia", &["biathlon"], &[], &[]),
            sport("bob", &["bobsled", "bobsleigh"], &[], &[]),
            sport("xc", &["cross-country", "cross country"], &[], &[]),
            sport("curl", &["curling"], &[], &[]),
            sport("fs", &["figure skating"], &[], &[]),
            sport("frs", &["freestyle"], &[], FRS_SUBSECTIONS),
            sport("hoc", &["hockey"], &[], &[]),
            sport("luge", &["luge"], &[], &[]),
            sport("nc", &["nordic combined"], &[], &[]),
            sport("st", &["short track"], &[], &[]),
            sport("skel", &["skeleton"], &[], &[]),
            sport("sj", &["ski jumping"], &["nordic combined"], &[]),
            sport("smo", &["ski mountaineering"], &[], &[]),
            sport("sb", &["snowboard"], &[], SB_SUBSECTIONS),
            sport("ss", &["speed skating"], &["short track"], &[]),
            sport("cer", &["ceremony"], &[], &[]),
        ];

        let phrases = PHRASES.iter().map(|(k, v)| (s!(*k), strs(v))).collect();

        let genders = [("m", "men"), ("w", "women"), ("x", "mixed"), ("mx", "mixed")]
            .into_iter()
            .map(|(k, v)| (s!(k), s!(v)))
            .collect();

        let durations = [("hockey", 180), ("curling", 180), ("ceremony", 210)]
            .into_iter()
            .map(|(k, v)| (s!(k), v))
            .collect();

        Self {
            name,
            wiki_base: s!("https://en.wikipedia.org/wiki/"),
            medal_table_page: s!("2026_Winter_Olympics_medal_table"),
            schedule_url: None,
            events_total: 116,
            tracked: TrackedTeam {
                code: s!("USA"),
                name: s!("United States"),
                prior_gold: 10.0,
                prior_total: 30.0,
            },
            countries,
            variants,
            event_pages,
            fixtures,
            sports,
            phrases,
            genders,
            durations,
            default_duration: DEFAULT_DURATION_MIN,
            fallback_model: s!("claude-haiku-4-5-20251001"),
        }
    }
}

/// Name → code lookups derived from a [`TournamentConfig`].
#[derive(Clone, Debug)]
pub struct CountryIndex {
    /// Full names, variants and codes, lower-case.
    exact: HashMap<String, String>,
    /// Single name words longer than three letters (`korea`, `zealand`).
    words: HashMap<String, String>,
    /// Full names in configuration order for substring matching.
    names: Vec<(String, String)>,
}

impl CountryIndex {
    pub fn new(cfg: &TournamentConfig) -> Self {
        let mut exact = HashMap::new();
        let mut words = HashMap::new();
        let mut names = Vec::new();
        for c in &cfg.countries {
            let lc = c.name.to_lowercase();
            exact.entry(lc.clone()).or_insert_with(|| c.code.clone());
            exact.entry(c.code.to_lowercase()).or_insert_with(|| c.code.clone());
            for part in lc.split_whitespace().filter(|p| p.chars().count() > 3) {
                words.entry(s!(part)).or_insert_with(|| c.code.clone());
            }
            names.push((lc, c.code.clone()));
        }
        for (variant, code) in &cfg.variants {
            exact.entry(variant.to_lowercase()).or_insert_with(|| code.clone());
        }
        Self { exact, words, names }
    }

    /// Exact, case-insensitive lookup of a full name, variant or code.
    pub fn exact(&self, name: &str) -> Option<&str> {
        self.exact.get(name.trim().to_lowercase().as_str()).map(String::as_str)
    }

    /// Exact lookup, then single-word lookup (`Korea`).
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.exact(name)
            .or_else(|| self.words.get(name.trim().to_lowercase().as_str()).map(String::as_str))
    }

    /// Exact lookup, then substring match in either direction against full names.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        if let Some(code) = self.exact(name) {
            return Some(code);
        }
        let lc = name.trim().to_lowercase();
        if lc.chars().count() < 3 {
            return None;
        }
        self.names
            .iter()
            .find(|(full, _)| full.contains(lc.as_str()) || lc.contains(full.as_str()))
            .map(|(_, code)| code.as_str())
    }

    /// Try the longest word prefix of `phrase` first, then shorter ones
    /// (`United States with a time of` → `United States`).
    pub fn resolve_prefix(&self, phrase: &str) -> Option<&str> {
        let words: Vec<&str> = phrase
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
            .collect();
        (1..=words.len()).rev().find_map(|n| self.lookup(&words[..n].join(" ")))
    }
}
