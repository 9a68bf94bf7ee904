// src/specs/schedule.rs
//! External free-text schedule.
//!
//! The page is flattened to lines and read top to bottom:
//!
//! ```text
//! Thursday, February 12, 2026      day header: new date, context reset
//! Snowboard                        sport line (short, no time)
//! Halfpipe                         subsection of the current sport
//! 1:30 p.m. Women's final          entry under the current date
//! ```
//!
//! Entries are then lined up with tracked events to correct their start
//! times. Nothing here fetches or decides completion.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::consts::SCHEDULE_HEADER_MAX;
use crate::config::tournament::Sport;
use crate::config::TournamentConfig;
use crate::core::html::{plain_text, remove_blocks};
use crate::model::{EventTime, ScheduledEvent};

static BLOCK_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</?(?:p|div|br|li|ul|ol|tr|table|h[1-6]|section|article|header|dt|dd)\b[^>]*>")
        .expect("block tag regex")
});

static DAY_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:mon|tues|wednes|thurs|fri|satur|sun)day,?\s+([a-z]+)\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})\b",
    )
    .expect("day header regex")
});

static LEADING_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\d{1,2}):(\d{2})\s*([ap])\.?\s*m\b\.?").expect("time regex"));

static ANY_TIME: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{1,2}:\d{2}").expect("time regex"));

const MONTHS: &[&str] = &[
    "january", "february", "march", "april", "may", "june", "july", "august", "september", "october",
    "november", "december",
];

/// One timed line of the schedule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub time: NaiveTime,
    /// Sport header the line was under, as written.
    pub sport: String,
    pub desc: String,
    /// Subsection token (`hp`, `bigair`, …) when one was active.
    pub subsection: Option<String>,
}

pub type ScheduleDays = BTreeMap<NaiveDate, Vec<ScheduleEntry>>;

/// Markup to non-empty text lines; block-level tags break lines.
pub fn to_lines(markup: &str) -> Vec<String> {
    let clean = remove_blocks(&remove_blocks(markup, "script"), "style");
    BLOCK_TAG
        .replace_all(&clean, "\n")
        .split('\n')
        .map(plain_text)
        .filter(|l| !l.is_empty())
        .collect()
}

pub fn parse(markup: &str, cfg: &TournamentConfig) -> ScheduleDays {
    parse_lines(&to_lines(markup), cfg)
}

/// One pass over the lines. Priority: day header, sport line, subsection
/// line, time line. Lines before the first day header are ignored.
pub fn parse_lines<S: AsRef<str>>(lines: &[S], cfg: &TournamentConfig) -> ScheduleDays {
    let mut days = ScheduleDays::new();
    let mut date: Option<NaiveDate> = None;
    let mut sport: Option<(&Sport, String)> = None;
    let mut subsection: Option<String> = None;

    for line in lines {
        let line = line.as_ref().trim();

        if let Some(d) = day_header(line) {
            date = Some(d);
            sport = None;
            subsection = None;
            continue;
        }
        let Some(day) = date else { continue };

        let is_header = line.chars().count() <= SCHEDULE_HEADER_MAX && !ANY_TIME.is_match(line);
        if is_header {
            let current = sport.as_ref().map(|(s, _)| *s);
            let named = cfg.sports.iter().find(|s| s.matches(line));
            let sub = current.and_then(|s| subsection_token(s, line));

            // "Snowboard Cross" under Snowboard is a subsection, not a new sport
            match (named, sub) {
                (Some(s), Some(tok)) if current.is_some_and(|c| c.prefix == s.prefix) => subsection = Some(tok),
                (Some(s), _) => {
                    sport = Some((s, s!(line)));
                    subsection = None;
                }
                (None, Some(tok)) => subsection = Some(tok),
                (None, None) => {}
            }
            continue;
        }

        if line.to_lowercase().contains("airs at") {
            continue;
        }
        let Some((time, rest)) = leading_time(line) else { continue };
        days.entry(day).or_default().push(ScheduleEntry {
            time,
            sport: sport.as_ref().map(|(_, text)| text.clone()).unwrap_or_default(),
            desc: s!(rest),
            subsection: subsection.clone(),
        });
    }
    days
}

/// Correct the start time of every not-done event with a known time that
/// lines up with exactly one schedule entry. Returns how many changed.
pub fn reconcile(events: &mut [ScheduledEvent], days: &ScheduleDays, cfg: &TournamentConfig) -> usize {
    let mut changed = 0usize;
    for ev in events.iter_mut().filter(|e| !e.is_done()) {
        let EventTime::At(current) = ev.time else { continue };
        let Some(entries) = days.get(&ev.date) else { continue };
        let Some(time) = match_entry(&ev.id, entries, cfg) else { continue };
        if time != current {
            log::info!("Schedule: {} moves {} -> {}", ev.id, ev.time, EventTime::At(time));
            ev.time = EventTime::At(time);
            changed += 1;
        }
    }
    changed
}

/// Time of the entry that stands for event `id`, if one can be picked.
pub fn match_entry(id: &str, entries: &[ScheduleEntry], cfg: &TournamentConfig) -> Option<NaiveTime> {
    let sport = cfg.sport_for(id)?;
    let tokens: Vec<&str> = id.split('-').skip(1).collect();

    let mut candidates: Vec<&ScheduleEntry> = entries.iter().filter(|e| sport.matches(&e.sport)).collect();

    // an id naming a subsection only ever matches inside it
    if let Some(tok) = tokens.iter().find(|t| sport.subsection(t).is_some()) {
        candidates.retain(|e| e.subsection.as_deref() == Some(*tok));
    }

    match candidates.as_slice() {
        [] => return None,
        [only] => return Some(only.time),
        _ => {}
    }

    let gender = tokens.iter().find_map(|t| cfg.genders.get(*t));
    let phrases: Vec<&String> = tokens.iter().filter_map(|t| cfg.phrases.get(*t)).flatten().collect();
    let descs: Vec<String> = candidates.iter().map(|e| fold(&e.desc)).collect();

    if let Some(g) = gender {
        let marker = gender_marker(g);
        for p in &phrases {
            let combo = format!("{marker} {p}");
            if let Some(i) = descs.iter().position(|d| contains_phrase(d, &combo)) {
                return Some(candidates[i].time);
            }
        }
    }

    let others: Vec<String> = cfg
        .genders
        .values()
        .filter(|g| Some(*g) != gender)
        .map(|g| gender_marker(g))
        .collect();
    let wrong_gender = |d: &str| gender.is_some() && others.iter().any(|m| contains_phrase(d, m));

    phrases.iter().find_map(|p| {
        descs
            .iter()
            .position(|d| !wrong_gender(d) && contains_phrase(d, p))
            .map(|i| candidates[i].time)
    })
}

/* ---------------- helpers ---------------- */

fn day_header(line: &str) -> Option<NaiveDate> {
    let c = DAY_HEADER.captures(line)?;
    let month = c[1].to_lowercase();
    let m = MONTHS.iter().position(|name| month.len() >= 3 && name.starts_with(&month))? as u32 + 1;
    NaiveDate::from_ymd_opt(c[3].parse().ok()?, m, c[2].parse().ok()?)
}

/// "5:30 a.m. Men's downhill" → (05:30, "Men's downhill").
fn leading_time(line: &str) -> Option<(NaiveTime, &str)> {
    let c = LEADING_TIME.captures(line)?;
    let hour: u32 = c[1].parse().ok()?;
    let min: u32 = c[2].parse().ok()?;
    if !(1..=12).contains(&hour) {
        return None;
    }
    let pm = c[3].eq_ignore_ascii_case("p");
    let time = NaiveTime::from_hms_opt(hour % 12 + if pm { 12 } else { 0 }, min, 0)?;
    let rest = line[c.get(0)?.end()..].trim_start_matches(|ch: char| ch.is_whitespace() || ch == '-' || ch == '–');
    Some((time, rest.trim()))
}

fn subsection_token(sport: &Sport, line: &str) -> Option<String> {
    let lc = line.to_lowercase();
    sport
        .subsections
        .iter()
        .find(|s| s.keywords.iter().any(|k| lc.contains(k.as_str())))
        .map(|s| s.token.clone())
}

fn gender_marker(gender: &str) -> String {
    if gender == "mixed" { s!(gender) } else { join!(gender, "'s") }
}

// Lower-case with typographic apostrophes folded.
fn fold(s: &str) -> String {
    s.to_lowercase().replace('\u{2019}', "'")
}

/// `needle` occurs in `hay` with no letter or digit on either side.
fn contains_phrase(hay: &str, needle: &str) -> bool {
    hay.match_indices(needle).any(|(i, _)| {
        let before = hay[..i].chars().next_back();
        let after = hay[i + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<div class="intro">All times Eastern. Replays airs at night.</div>
        <h2>Thursday, February 12, 2026</h2>
        <h3>Alpine Skiing</h3>
        <p>5:30 a.m. Men's Downhill</p>
        <p>7:00 AM &ndash; Women&#8217;s Downhill</p>
        <p>8:00 p.m. Women's Downhill (encore) airs at 8:00 p.m.</p>
        <h3>Snowboard</h3>
        <h4>Halfpipe</h4>
        <p>1:30 pm Women's final</p>
        <h4>Big Air</h4>
        <p>12:00 p.m. Men's qualification</p>
        <h2>Friday, February 13, 2026</h2>
        <h3>Speed Skating</h3>
        <p>10:00 am Men's 1000m</p>
        <h3>Short Track Speed Skating</h3>
        <p>1:15 p.m. Men's 1000m final</p>"#;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, day).unwrap()
    }

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn ev(id: &str, day: u32, time: &str) -> ScheduledEvent {
        ScheduledEvent::new(id, id, d(day), EventTime::parse(time))
    }

    #[test]
    fn parses_days_sports_and_subsections() {
        let days = parse(PAGE, &TournamentConfig::default());
        let thu = &days[&d(12)];
        assert_eq!(thu.len(), 4);
        assert_eq!((thu[0].time, thu[0].sport.as_str()), (t(5, 30), "Alpine Skiing"));
        assert_eq!(thu[1].desc, "Women’s Downhill");
        assert_eq!((thu[2].time, thu[2].subsection.as_deref()), (t(13, 30), Some("hp")));
        assert_eq!((thu[3].time, thu[3].subsection.as_deref()), (t(12, 0), Some("bigair")));
        let fri = &days[&d(13)];
        assert_eq!(fri[1].sport, "Short Track Speed Skating");
        assert_eq!(fri[1].subsection, None);
    }

    #[test]
    fn replays_are_not_entries() {
        let days = parse(PAGE, &TournamentConfig::default());
        assert!(days[&d(12)].iter().all(|e| e.time != t(20, 0)));
    }

    #[test]
    fn gendered_phrase_picks_the_right_race() {
        let cfg = TournamentConfig::default();
        let days = parse(PAGE, &cfg);
        let mut events = vec![ev("alp-w-dh", 12, "5:00 AM"), ev("alp-m-dh", 12, "6:00 AM")];
        assert_eq!(reconcile(&mut events, &days, &cfg), 2);
        assert_eq!(events[0].time.to_string(), "7:00 AM");
        assert_eq!(events[1].time.to_string(), "5:30 AM");
    }

    #[test]
    fn subsection_and_sport_filters() {
        let cfg = TournamentConfig::default();
        let days = parse(PAGE, &cfg);
        let mut events = vec![ev("sb-w-hp-final", 12, "1:00 PM"), ev("ss-m-1000", 13, "9:00 AM")];
        assert_eq!(reconcile(&mut events, &days, &cfg), 2);
        assert_eq!(events[0].time.to_string(), "1:30 PM");
        assert_eq!(events[1].time.to_string(), "10:00 AM");
    }

    #[test]
    fn empty_subsection_leaves_event_alone() {
        let cfg = TournamentConfig::default();
        let days = parse(PAGE, &cfg);
        let mut events = vec![ev("sb-w-slope", 12, "9:00 AM")];
        assert_eq!(reconcile(&mut events, &days, &cfg), 0);
        assert_eq!(events[0].time.to_string(), "9:00 AM");
    }

    #[test]
    fn done_and_tbd_events_are_skipped() {
        let cfg = TournamentConfig::default();
        let days = parse(PAGE, &cfg);
        let mut done = ev("ss-m-1000", 13, "9:00 AM");
        done.mark_done();
        let mut events = vec![done, ev("sb-w-hp-final", 12, "TBD")];
        assert_eq!(reconcile(&mut events, &days, &cfg), 0);
        assert_eq!(events[0].time.to_string(), "9:00 AM");
        assert_eq!(events[1].time, EventTime::Tbd);
    }

    #[test]
    fn meridiem_forms() {
        assert_eq!(leading_time("12:05 a.m. Late"), Some((t(0, 5), "Late")));
        assert_eq!(leading_time("12:00 PM Noon"), Some((t(12, 0), "Noon")));
        assert_eq!(leading_time("9:15pm - Final"), Some((t(21, 15), "Final")));
        assert_eq!(leading_time("13:00 pm x"), None);
        assert_eq!(leading_time("Starts 9:15 pm"), None);
    }

    #[test]
    fn phrase_needs_word_boundaries() {
        assert!(contains_phrase("men's downhill", "men's downhill"));
        assert!(!contains_phrase("women's downhill", "men's downhill"));
        assert!(!contains_phrase("1500m", "500m"));
    }
}
