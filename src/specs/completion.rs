// src/specs/completion.rs
//! Tense gate for event pages.
//!
//! Pages are often filled in before an event is held. If the prose only talks
//! in the future tense, nothing on it can be a result yet. The gate only ever
//! blocks: a page with neither kind of phrasing still goes to the extractors.

const FUTURE_SIGNALS: &[&str] = &[
    "will be held",
    "will be started",
    "the event will",
    "will take place",
    "is scheduled to",
];

const PAST_SIGNALS: &[&str] = &[
    "was held",
    "was won",
    "won the competition",
    "won the gold",
    "won the event",
    "claimed gold",
    "claimed the gold",
    "took gold",
    "finished first",
    "became the champion",
    "became the olympic champion",
    "won the olympic",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Only future-tense phrasing: don't look for a result.
    Upcoming,
    /// Past-tense phrasing, or nothing decisive: extractors may try.
    MaybeConcluded,
}

pub fn has_future_signal(text_lc: &str) -> bool {
    FUTURE_SIGNALS.iter().any(|s| text_lc.contains(s))
}

pub fn has_past_signal(text_lc: &str) -> bool {
    PAST_SIGNALS.iter().any(|s| text_lc.contains(s))
}

/// Classify the plain text of an event page.
pub fn classify(text: &str) -> Verdict {
    let lc = text.to_lowercase();
    if has_future_signal(&lc) && !has_past_signal(&lc) {
        Verdict::Upcoming
    } else {
        Verdict::MaybeConcluded
    }
}
