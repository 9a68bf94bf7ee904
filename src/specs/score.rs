// src/specs/score.rs
//! Scores of two-team fixtures (hockey games, curling draws).
//!
//! Works on plain text. Two forms are recognised, each tried with either
//! team first:
//! - box score: `United States 5–1 (1–0, 3–1, 1–0) Finland`
//! - line score rows, only after a "final"/"gold medal game" heading:
//!   `Italy (…) 1 0 2 0 1 0 X 4 United States (…) 0 2 0 1 0 3 1 7`
//!   where the last number of each row is the final score.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

static FINAL_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:gold medal game|final)\b").expect("final marker regex"));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

/// A score from the tracked team's side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixtureScore {
    pub ours: u32,
    pub theirs: u32,
    /// Period breakdown as printed, e.g. `1–0, 3–1, 1–0`.
    pub periods: Option<String>,
}

impl FixtureScore {
    pub fn outcome(&self) -> Outcome {
        match self.ours.cmp(&self.theirs) {
            std::cmp::Ordering::Greater => Outcome::Win,
            std::cmp::Ordering::Less => Outcome::Loss,
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }

    /// "USA wins 5-1", "Lost 2-3" or "Draw 3-3".
    pub fn result_string(&self, code: &str) -> String {
        match self.outcome() {
            Outcome::Win => format!("{code} wins {self}"),
            Outcome::Loss => format!("Lost {self}"),
            Outcome::Draw => format!("Draw {self}"),
        }
    }
}

impl fmt::Display for FixtureScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.ours, self.theirs)
    }
}

/// Score of `team` against `opponent` in `text`: the box score form
/// anywhere, else line score rows after a final-section heading.
pub fn extract(text: &str, team: &str, opponent: &str) -> Option<FixtureScore> {
    box_score(text, team, opponent).or_else(|| final_section_rows(text, team, opponent))
}

/// `<A> a–b [(periods)] <B>`, first with `team` as A, then with `opponent` as A.
pub fn box_score(text: &str, team: &str, opponent: &str) -> Option<FixtureScore> {
    let pattern = |a: &str, b: &str| {
        format!(
            r"(?i){}\s+(\d{{1,2}})\s*[-–—]\s*(\d{{1,2}})(?:\s*\(([^)]*)\))?\s+{}",
            name_pattern(a),
            name_pattern(b)
        )
    };

    for (re, ours_first) in [(pattern(team, opponent), true), (pattern(opponent, team), false)] {
        let re = Regex::new(&re).ok()?;
        if let Some(c) = re.captures(text) {
            let (first, second) = (c[1].parse().ok()?, c[2].parse().ok()?);
            let (ours, theirs) = if ours_first { (first, second) } else { (second, first) };
            let periods = c.get(3).map(|m| s!(m.as_str().trim())).filter(|p| !p.is_empty());
            return Some(FixtureScore { ours, theirs, periods });
        }
    }
    None
}

/// Line score rows after the last final-section heading. Headings that
/// introduce a table ("Final standings") rather than a game don't count.
pub fn final_section_rows(text: &str, team: &str, opponent: &str) -> Option<FixtureScore> {
    let row = |a: &str, b: &str| {
        format!(
            r"(?i){}\s*\([^)]*\)\s*(?:[\dX]+\s+)*(\d+)\s+{}\s*\([^)]*\)\s*(?:[\dX]+\s+)*(\d+)\b",
            name_pattern(a),
            name_pattern(b)
        )
    };
    let start = FINAL_MARKER
        .find_iter(text)
        .filter(|m| !introduces_table(&text[m.end()..]))
        .last()?
        .end();
    let scoped = &text[start..];

    if let Some(c) = Regex::new(&row(team, opponent)).ok()?.captures(scoped) {
        return Some(FixtureScore { ours: c[1].parse().ok()?, theirs: c[2].parse().ok()?, periods: None });
    }
    let c = Regex::new(&row(opponent, team)).ok()?.captures(scoped)?;
    Some(FixtureScore { ours: c[2].parse().ok()?, theirs: c[1].parse().ok()?, periods: None })
}

const TABLE_WORDS: &[&str] = &["standings", "standing", "ranking", "rankings", "classification"];

fn introduces_table(rest: &str) -> bool {
    rest.split_whitespace()
        .next()
        .is_some_and(|w| TABLE_WORDS.contains(&w.to_lowercase().as_str()))
}

// Escaped name with any run of whitespace allowed between its words.
fn name_pattern(name: &str) -> String {
    name.split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+")
}

#[cfg(test)]
mod tests {
    use super::*;

    const US: &str = "United States";

    #[test]
    fn box_score_with_periods() {
        let s = extract("Group A. United States 5–1 (1–0, 3–1, 1–0) Finland Recap", US, "Finland").unwrap();
        assert_eq!(s.result_string("USA"), "USA wins 5-1");
        assert_eq!(s.periods.as_deref(), Some("1–0, 3–1, 1–0"));
    }

    #[test]
    fn opponent_listed_first() {
        let s = extract("Switzerland 0—5 (0–1, 0–1, 0–3) United States", US, "Switzerland").unwrap();
        assert_eq!((s.ours, s.theirs), (5, 0));
        assert_eq!(s.result_string("USA"), "USA wins 5-0");
    }

    #[test]
    fn loss_and_draw_from_our_side() {
        let lost = extract("Canada 3-2 United States", US, "Canada").unwrap();
        assert_eq!(lost.result_string("USA"), "Lost 2-3");
        assert_eq!(lost.outcome(), Outcome::Loss);
        let draw = extract("UNITED  STATES 3-3 finland", US, "Finland").unwrap();
        assert_eq!(draw.result_string("USA"), "Draw 3-3");
        assert_eq!(draw.periods, None);
    }

    #[test]
    fn other_teams_do_not_count() {
        assert_eq!(extract("Canada 4–1 Finland. United States vs Finland tomorrow.", US, "Finland"), None);
    }

    const CURLING: &str = "Round robin Italy (Constantini / Mosaner) 0 2 1 0 3 6 \
        United States (Thiesse / Dropkin) 1 0 0 2 2 5 Semifinals ... \
        Final Italy (Constantini / Mosaner) 1 0 2 0 1 0 X 4 \
        United States (Thiesse / Dropkin) 0 2 0 1 0 3 1 7 Player percentages";

    #[test]
    fn line_score_after_final_heading() {
        let s = extract(CURLING, US, "Italy").unwrap();
        assert_eq!((s.ours, s.theirs), (7, 4));
        assert_eq!(s.result_string("USA"), "USA wins 7-4");
    }

    #[test]
    fn earlier_rounds_never_count_once_a_final_is_listed() {
        // the last final is between two other teams; the round-robin rows
        // after an earlier "final draw" mention must not be taken
        let text = "Round robin, final draw Italy (Constantini / Mosaner) 0 2 1 0 3 6 \
            United States (Thiesse / Dropkin) 1 0 0 2 2 5 Semifinals ... \
            Final Sweden (Wranå / Wranå) 2 0 1 3 8 Norway (Skaslien / Nedregotten) 0 1 2 0 6";
        assert_eq!(final_section_rows(text, US, "Italy"), None);
        assert_eq!(extract(text, US, "Italy"), None);
    }

    #[test]
    fn standings_heading_is_not_a_final_section() {
        let text = format!("{CURLING} Final standings 1 United States 2 Italy");
        assert_eq!(extract(&text, US, "Italy").unwrap().result_string("USA"), "USA wins 7-4");
    }

    #[test]
    fn rows_before_any_heading_are_ignored() {
        let text = "Italy (Constantini / Mosaner) 0 2 1 0 3 6 United States (Thiesse / Dropkin) 1 0 0 2 2 5";
        assert_eq!(final_section_rows(text, US, "Italy"), None);
    }
}
