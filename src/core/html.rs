// src/core/html.rs
// Tolerant, case-insensitive scanning over raw markup. No DOM; blocks are
// located by their opener and the next matching closer.

use super::sanitize::{decode_entities, normalize_ws};
use super::vischars::VisChars;

pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii() {
                c.to_ascii_lowercase()
            } else {
                c
            }
        })
        .collect()
}

/// Find `open` (already lower-cased) in `lc` at or after `from`, requiring a
/// tag-name boundary after it so `<p` does not match `<pre` and `<th` does not
/// match `<thead`.
fn find_open(lc: &str, open: &str, from: usize) -> Option<usize> {
    let needs_boundary = open.ends_with(|c: char| c.is_ascii_alphanumeric());
    let mut pos = from;
    loop {
        let at = lc.get(pos..)?.find(open)? + pos;
        let next = lc.as_bytes().get(at + open.len()).copied();
        let ok = !needs_boundary
            || matches!(next, None | Some(b'>' | b'/' | b' ' | b'\t' | b'\r' | b'\n'));
        if ok {
            return Some(at);
        }
        pos = at + open.len();
    }
}

/// All `<o …>…c` blocks in `s`, in document order.
pub fn tag_blocks<'a>(s: &'a str, o: &str, c: &str) -> Vec<&'a str> {
    let lc = to_lower(s);
    let ol = to_lower(o);
    let cl = to_lower(c);
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some(start) = find_open(&lc, &ol, pos) {
        let Some(gt) = s[start..].find('>') else { break };
        let open_end = start + gt + 1;
        let Some(end_rel) = lc[open_end..].find(&cl) else { break };
        let end = open_end + end_rel + c.len();
        out.push(&s[start..end]);
        pos = end;
    }
    out
}

/// Table cells (`<td>` and `<th>`) of one row, in order.
pub fn row_cells(row: &str) -> Vec<&str> {
    let lc = to_lower(row);
    let mut out = Vec::new();
    let mut pos = 0usize;
    loop {
        let td = find_open(&lc, "<td", pos);
        let th = find_open(&lc, "<th", pos);
        let (start, close) = match (td, th) {
            (Some(a), Some(b)) if a <= b => (a, "</td>"),
            (Some(_), Some(b)) => (b, "</th>"),
            (Some(a), None) => (a, "</td>"),
            (None, Some(b)) => (b, "</th>"),
            (None, None) => break,
        };
        let Some(gt) = row[start..].find('>') else { break };
        let open_end = start + gt + 1;
        let Some(end_rel) = lc[open_end..].find(close) else { break };
        let end = open_end + end_rel + close.len();
        out.push(&row[start..end]);
        pos = end;
    }
    out
}

/// The opening tag of a block, up to and including `>`.
pub fn opener(block: &str) -> &str {
    match block.find('>') {
        Some(gt) => &block[..=gt],
        None => block,
    }
}

/// Attribute value from an opening tag; quotes optional, name case-insensitive.
pub fn attr(open_tag: &str, name: &str) -> Option<String> {
    let lc = to_lower(open_tag);
    let needle = join!(" ", &to_lower(name), "=");
    let hp = lc.find(&needle).or_else(|| {
        // attribute right after the tag name on a new line / tab
        let alt = join!("\t", &to_lower(name), "=");
        lc.find(&alt)
    })?;
    let val = open_tag[hp + needle.len()..].trim_start();
    let (quote, start_off) = match val.as_bytes().first() {
        Some(b'"') => ('"', 1),
        Some(b'\'') => ('\'', 1),
        _ => ('\0', 0),
    };
    let end = if quote != '\0' {
        val[start_off..].find(quote).map(|e| start_off + e)
    } else {
        val.find(|c: char| c.is_ascii_whitespace() || c == '>')
    }
    .unwrap_or(val.len());
    Some(decode_entities(&val[start_off..end]))
}

/// Visible text of a markup fragment: tags dropped, entities decoded,
/// whitespace collapsed.
pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let out: String = VisChars::new(s.as_ref()).collect();
    normalize_ws(&out)
}

/// Whole-page plain text: every tag becomes a gap, entities decoded,
/// whitespace collapsed.
pub fn plain_text(markup: &str) -> String {
    let out: String = VisChars::new(markup).with_tag_gaps().collect();
    normalize_ws(&out)
}

/// Drop every `<tag …>…</tag>` block (e.g. `script`, `style`) from `markup`.
pub fn remove_blocks(markup: &str, tag: &str) -> String {
    let open = join!("<", tag);
    let close = join!("</", tag, ">");
    let lc = to_lower(markup);
    let mut out = String::with_capacity(markup.len());
    let mut pos = 0usize;
    while let Some(start) = find_open(&lc, &open, pos) {
        out.push_str(&markup[pos..start]);
        match lc[start..].find(&close) {
            Some(rel) => pos = start + rel + close.len(),
            None => {
                pos = markup.len();
                break;
            }
        }
    }
    out.push_str(&markup[pos..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_requires_tag_boundary() {
        let doc = "<pre>x</pre><p class=a>para</p>";
        assert_eq!(tag_blocks(doc, "<p", "</p>"), vec!["<p class=a>para</p>"]);
    }

    #[test]
    fn cells_mix_td_and_th() {
        let row = r#"<tr><td>1</td><th scope="row">Norway</th><td>5</td></tr>"#;
        let cells: Vec<String> = row_cells(row).into_iter().map(strip_tags).collect();
        assert_eq!(cells, vec!["1", "Norway", "5"]);
    }

    #[test]
    fn attr_handles_quote_styles() {
        assert_eq!(attr(r#"<a href="/wiki/X" title='Y Z'>"#, "title").as_deref(), Some("Y Z"));
        assert_eq!(attr("<a href=/wiki/X>", "href").as_deref(), Some("/wiki/X"));
        assert_eq!(attr("<a>", "href"), None);
    }

    #[test]
    fn remove_blocks_drops_scripts() {
        let doc = "<p>a</p><script type=x>var s = '<p>';</script><p>b</p><SCRIPT>x</SCRIPT>";
        assert_eq!(remove_blocks(doc, "script"), "<p>a</p><p>b</p>");
    }

    #[test]
    fn plain_text_keeps_cells_apart() {
        assert_eq!(plain_text("<td>United States</td><td>5&ndash;1</td>"), "United States 5\u{2013}1");
    }

    #[test]
    fn strip_tags_decodes_and_collapses() {
        assert_eq!(strip_tags("<b>Big</b>&nbsp;&amp;\n <i>bold</i>"), "Big & bold");
    }
}
