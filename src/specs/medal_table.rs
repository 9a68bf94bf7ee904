// src/specs/medal_table.rs
//! Standings from the medal table page.
//!
//! - The table is the first `<table class="wikitable sortable …">`.
//! - Header rows (only `<th>` cells) and totals rows are skipped.
//! - Country identity: the "<Country> at the <Games>" link, else the first
//!   non-numeric cell longer than two characters.
//! - The last four integer cells are gold, silver, bronze, total, whatever
//!   rank/flag columns come before them.
//!
//! An empty result means "nothing usable"; callers keep their previous table.

use std::cmp::Reverse;
use std::collections::HashSet;

use regex::Regex;

use crate::config::{CountryIndex, TournamentConfig};
use crate::core::html::{attr, opener, plain_text, row_cells, strip_tags, tag_blocks, to_lower};
use crate::core::sanitize::name_only_trim;
use crate::model::CountryMedalRecord;

/// Parse the standings table. Rows whose country can't be resolved are
/// logged and dropped.
pub fn parse_doc(doc: &str, cfg: &TournamentConfig, idx: &CountryIndex) -> Vec<CountryMedalRecord> {
    let Some(table) = find_table(doc) else {
        log::warn!("Could not find medal table");
        return Vec::new();
    };

    let mut out: Vec<CountryMedalRecord> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for row in tag_blocks(table, "<tr", "</tr>") {
        let cells = row_cells(row);
        if cells.is_empty() || is_header_row(&cells) {
            continue;
        }
        let texts: Vec<String> = cells.iter().map(strip_tags).collect();
        if is_totals_row(&texts) {
            continue;
        }

        let Some(name) = row_country(row, &texts, cfg) else {
            log::debug!("Medal table: row without a country: {:?}", texts);
            continue;
        };
        let Some(code) = idx.resolve(&name) else {
            log::info!("Medal table: unresolved country '{name}', row dropped");
            continue;
        };

        let counts: Vec<u32> = texts.iter().filter_map(|t| as_count(t)).collect();
        let [gold, silver, bronze, total] = match counts.as_slice() {
            [.., g, s, b, t] => [*g, *s, *b, *t],
            _ => {
                log::debug!("Medal table: '{name}' has {} numeric cells, need 4", counts.len());
                continue;
            }
        };

        if !seen.insert(s!(code)) {
            log::debug!("Medal table: duplicate row for {code}");
            continue;
        }

        out.push(CountryMedalRecord {
            name: cfg.country(code).map(|c| c.name.clone()).unwrap_or(name),
            code: s!(code),
            flag: cfg.flag(code),
            gold,
            silver,
            bronze,
            total,
            rank: 0,
        });
    }

    rank_standings(&mut out);
    out
}

/// Sort by gold, silver, bronze (all descending) and number the rows.
/// Ties keep their incoming order.
pub fn rank_standings(rows: &mut [CountryMedalRecord]) {
    rows.sort_by_key(|m| (Reverse(m.gold), Reverse(m.silver), Reverse(m.bronze)));
    for (i, m) in rows.iter_mut().enumerate() {
        m.rank = i as u32 + 1;
    }
}

/// "N of T events completed" / "Completed events: N" on the standings page.
pub fn parse_events_completed(doc: &str, events_total: u32) -> Option<u32> {
    let text = plain_text(doc);
    let of_total = Regex::new(&format!(r"(?i)(\d+)\s*of\s*{events_total}\s*events?\s*completed")).ok()?;
    if let Some(c) = of_total.captures(&text) {
        return c[1].parse().ok();
    }
    let labelled = Regex::new(r"(?i)completed events\D{0,40}?(\d+)").ok()?;
    labelled.captures(&text).and_then(|c| c[1].parse().ok())
}

/* ---------------- helpers ---------------- */

fn find_table(doc: &str) -> Option<&str> {
    tag_blocks(doc, "<table", "</table>").into_iter().find(|t| {
        let class = attr(opener(t), "class").unwrap_or_default().to_ascii_lowercase();
        let tokens: Vec<&str> = class.split_whitespace().collect();
        tokens.contains(&"wikitable") && tokens.contains(&"sortable")
    })
}

fn is_header_row(cells: &[&str]) -> bool {
    cells.iter().all(|c| to_lower(&c[..c.len().min(3)]) == "<th")
}

// Only a cell that *starts* with "total" marks the totals row, so a country
// whose name merely contains the word is kept.
fn is_totals_row(texts: &[String]) -> bool {
    texts.iter().any(|t| t.to_lowercase().starts_with("total"))
}

fn as_count(text: &str) -> Option<u32> {
    let t = text.trim();
    if t.is_empty() || !t.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    t.parse().ok()
}

fn row_country(row: &str, texts: &[String], cfg: &TournamentConfig) -> Option<String> {
    let href_marker = to_lower(&cfg.link_marker());
    let title_marker = to_lower(&cfg.title_marker());

    for a in tag_blocks(row, "<a", "</a>") {
        let open = opener(a);
        let href = attr(open, "href").map(|h| to_lower(&h)).unwrap_or_default();
        let title = attr(open, "title").unwrap_or_default();
        let title_lc = to_lower(&title);
        if !href.contains(&href_marker) && !title_lc.contains(&title_marker) {
            continue;
        }
        let text = name_only_trim(&strip_tags(a));
        if text.chars().count() > 2 {
            return Some(text);
        }
        // flag-icon links carry no text; the title still names the country
        if let Some(cut) = title_lc.find(&title_marker) {
            let name = title[..cut].trim();
            if !name.is_empty() {
                return Some(s!(name));
            }
        }
    }

    texts
        .iter()
        .map(|t| name_only_trim(t))
        .find(|t| t.chars().count() > 2 && as_count(t).is_none())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(rank: &str, country: &str, g: u32, s: u32, b: u32, t: u32) -> String {
        format!(
            r#"<tr><td>{rank}</td><th scope="row"><span class="flagicon"><img src="x.png"></span>&nbsp;<a href="/wiki/{u}_at_the_2026_Winter_Olympics" title="{country} at the 2026 Winter Olympics">{country}</a></th><td>{g}</td><td>{s}</td><td>{b}</td><td>{t}</td></tr>"#,
            u = country.replace(' ', "_")
        )
    }

    fn page(rows: &[String]) -> String {
        format!(
            r#"<html><body><table class="infobox"><tr><td>1</td></tr></table>
            <table class="wikitable sortable plainrowheaders jquery-tablesorter">
            <tbody><tr><th>Rank</th><th>NOC</th><th>Gold</th><th>Silver</th><th>Bronze</th><th>Total</th></tr>
            {}
            <tr class="sortbottom"><td colspan="2">Totals (3 entries)</td><td>9</td><td>7</td><td>5</td><td>21</td></tr>
            </tbody></table></body></html>"#,
            rows.join("\n")
        )
    }

    fn parse(doc: &str) -> Vec<CountryMedalRecord> {
        let cfg = TournamentConfig::default();
        parse_doc(doc, &cfg, &cfg.index())
    }

    #[test]
    fn gold_dominates_total() {
        let doc = page(&[row("2", "United States", 4, 4, 3, 11), row("1", "Norway", 5, 3, 2, 10)]);
        let out = parse(&doc);
        assert_eq!(out.len(), 2);
        assert_eq!((out[0].code.as_str(), out[0].rank), ("NOR", 1));
        assert_eq!((out[1].code.as_str(), out[1].rank), ("USA", 2));
        assert_eq!(out[1].total, 11);
        assert_eq!(out[0].flag, "🇳🇴");
    }

    #[test]
    fn ties_keep_source_order() {
        let doc = page(&[
            row("1", "Italy", 2, 1, 0, 3),
            row("1", "Japan", 2, 1, 0, 3),
            row("3", "Austria", 2, 1, 1, 4),
        ]);
        let codes: Vec<String> = parse(&doc).into_iter().map(|m| m.code).collect();
        assert_eq!(codes, vec!["AUT", "ITA", "JPN"]);
    }

    #[test]
    fn source_total_wins_over_sum() {
        let doc = page(&[row("1", "Sweden", 1, 1, 1, 4)]);
        assert_eq!(parse(&doc)[0].total, 4);
    }

    #[test]
    fn unresolved_rows_are_dropped_not_fatal() {
        let doc = page(&[row("1", "Atlantis", 9, 9, 9, 27), row("2", "Canada", 1, 0, 0, 1)]);
        let out = parse(&doc);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].code, "CAN");
        assert_eq!(out[0].rank, 1);
    }

    #[test]
    fn plain_text_country_cell_fallback() {
        let doc = page(&[s!("<tr><td>1</td><td>Netherlands*</td><td>3</td><td>0</td><td>1</td><td>4</td></tr>")]);
        let out = parse(&doc);
        assert_eq!(out[0].code, "NED");
        assert_eq!(out[0].name, "Netherlands");
        assert_eq!((out[0].gold, out[0].bronze, out[0].total), (3, 1, 4));
    }

    #[test]
    fn no_table_is_empty() {
        assert!(parse("<table class=\"wikitable\"><tr><td>Norway</td></tr></table>").is_empty());
        assert!(parse("").is_empty());
    }

    #[test]
    fn reparse_is_identical() {
        let doc = page(&[row("1", "Norway", 5, 3, 2, 10), row("2", "Germany", 2, 2, 2, 6)]);
        assert_eq!(parse(&doc), parse(&doc));
    }

    #[test]
    fn events_completed_counter() {
        assert_eq!(parse_events_completed("<p>As of today, 42 of 116 events completed.</p>", 116), Some(42));
        assert_eq!(parse_events_completed("<th>Completed events</th><td>17</td>", 116), Some(17));
        assert_eq!(parse_events_completed("<p>nothing here</p>", 116), None);
    }
}
