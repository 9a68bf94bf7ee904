// src/core/sanitize.rs

/// Decode one entity body (the part between `&` and `;`).
pub fn decode_entity(body: &str) -> Option<char> {
    if let Some(num) = body.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    let ch = match body {
        "nbsp" => '\u{a0}',
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "minus" => '\u{2212}',
        "thinsp" => '\u{2009}',
        "ensp" => '\u{2002}',
        "emsp" => '\u{2003}',
        "hellip" => '\u{2026}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201c}',
        "rdquo" => '\u{201d}',
        "middot" => '\u{b7}',
        "times" => '\u{d7}',
        "deg" => '\u{b0}',
        _ => return None,
    };
    Some(ch)
}

/// Decode entities in text that has no tags left in it.
pub fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let decoded = after
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&after[..semi]).map(|ch| (ch, semi)));
        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &after[semi + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Remove short `[ ... ]` tags such as `[12]`, `[a]`, `[citation needed]`.
/// Longer bracketed text is kept as-is.
pub fn strip_citations(s: &str) -> String {
    const MAX_TAG: usize = 25;
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(open) = rest.find('[') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find(']') {
            Some(close) if close <= MAX_TAG && !after[..close].contains('[') => {
                rest = &after[close + 1..];
            }
            _ => {
                out.push('[');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Keep the leading name part of a cell: letters, spaces and the punctuation
/// that occurs in country names, up to the first other character
/// (`Italy*` → `Italy`, `Norway (NOR)` → `Norway`).
pub fn name_only_trim(s: &str) -> String {
    let s = normalize_ws(s);
    for (i, ch) in s.char_indices() {
        if !(ch.is_alphabetic() || ch.is_whitespace() || matches!(ch, '.' | '-' | '\'' | '\u{2019}')) {
            return s[..i].trim_end().to_string();
        }
    }
    s.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_named_entities() {
        assert_eq!(decode_entities("Men&#39;s &ndash; 5&#x2013;1 &bogus; AT&T"), "Men's \u{2013} 5\u{2013}1 &bogus; AT&T");
    }

    #[test]
    fn citations_are_dropped_but_long_brackets_stay() {
        assert_eq!(strip_citations("won gold.[12][a] Next"), "won gold. Next");
        assert_eq!(
            strip_citations("[this bracket is clearly far too long to be a note]"),
            "[this bracket is clearly far too long to be a note]"
        );
    }

    #[test]
    fn name_trim_drops_host_marker_and_code() {
        assert_eq!(name_only_trim(" Italy* "), "Italy");
        assert_eq!(name_only_trim("Norway (NOR)"), "Norway");
        assert_eq!(name_only_trim("Côte d'Ivoire"), "Côte d'Ivoire");
    }
}
