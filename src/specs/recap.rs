// src/specs/recap.rs
//! One-line recap from the lead paragraphs of an event page.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::consts::{RECAP_COMMA_MIN, RECAP_CUT_AT, RECAP_MAX_LEN, RECAP_MIN_PARAGRAPH, RECAP_PARAGRAPHS};
use crate::core::html::{remove_blocks, strip_tags, tag_blocks};
use crate::core::sanitize::{normalize_ws, strip_citations};

static RESULT_VERB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:won|wins|claimed|defeated|clinched|beat|captured|earned)\b").expect("result verb regex")
});

/// First lead sentence that reports a result, trimmed for display.
/// With a `winner`, a sentence naming them is preferred over an earlier one.
pub fn extract(markup: &str, winner: Option<&str>) -> Option<String> {
    let sentences = result_sentences(markup);
    let surname = winner
        .and_then(|w| w.split_whitespace().last())
        .map(str::to_lowercase);

    let chosen = surname
        .and_then(|s| sentences.iter().find(|t| t.to_lowercase().contains(&s)))
        .or_else(|| sentences.first())?;
    Some(trim_recap(chosen))
}

/// Recap for one game on a page that covers a whole tournament: only a
/// result sentence naming both teams will do.
pub fn for_fixture(markup: &str, team: &str, opponent: &str) -> Option<String> {
    let (team, opponent) = (team.to_lowercase(), opponent.to_lowercase());
    result_sentences(markup)
        .iter()
        .find(|t| {
            let lc = t.to_lowercase();
            lc.contains(&team) && lc.contains(&opponent)
        })
        .map(|t| trim_recap(t))
}

/// Sentences with a result verb from the first paragraphs, in page order.
pub fn result_sentences(markup: &str) -> Vec<String> {
    let clean = remove_blocks(&remove_blocks(markup, "script"), "style");
    tag_blocks(&clean, "<p", "</p>")
        .into_iter()
        .take(RECAP_PARAGRAPHS)
        .map(|p| normalize_ws(&strip_citations(&strip_tags(p))))
        .filter(|p| p.chars().count() >= RECAP_MIN_PARAGRAPH)
        .flat_map(|p| split_sentences(&p).into_iter().map(String::from).collect::<Vec<_>>())
        .filter(|s| RESULT_VERB.is_match(s))
        .collect()
}

/// Split on ". " followed by an upper-case letter. The closing period of
/// each sentence is dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0usize;
    for (i, _) in text.match_indices(". ") {
        let next = text[i + 2..].chars().next();
        if next.is_some_and(char::is_uppercase) {
            push_sentence(&mut out, &text[start..i]);
            start = i + 2;
        }
    }
    push_sentence(&mut out, text[start..].trim_end().trim_end_matches('.'));
    out
}

fn push_sentence<'a>(out: &mut Vec<&'a str>, s: &'a str) {
    let s = s.trim();
    if !s.is_empty() {
        out.push(s);
    }
}

/// Cut at a comma between characters 20 and 70; otherwise shorten anything
/// past 70 characters at the last space before 67 and add an ellipsis.
pub fn trim_recap(sentence: &str) -> String {
    let chars: Vec<char> = sentence.chars().collect();
    let comma = chars
        .iter()
        .enumerate()
        .position(|(i, c)| *c == ',' && (RECAP_COMMA_MIN..RECAP_MAX_LEN).contains(&i));
    if let Some(i) = comma {
        return chars[..i].iter().collect::<String>().trim_end().to_string();
    }
    if chars.len() <= RECAP_MAX_LEN {
        return s!(sentence);
    }
    let head = &chars[..RECAP_CUT_AT];
    let cut = head.iter().rposition(|c| *c == ' ').unwrap_or(RECAP_CUT_AT);
    let mut out: String = head[..cut].iter().collect();
    out.truncate(out.trim_end().len());
    out.push('…');
    out
}
