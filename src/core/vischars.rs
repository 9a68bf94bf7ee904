// src/core/vischars.rs
// Visible-text character iterator over markup.
// Skips tags (<...>), decodes entities (&...;), collapses ASCII whitespace to a single ' '.
// With `tag_gaps` every skipped tag counts as whitespace, so adjacent cells
// and paragraphs don't run together.

use super::sanitize::decode_entity;

/// Longest entity body we try to decode (`&thinsp;`, `&#x2013;`, …).
const MAX_ENTITY: usize = 10;

pub struct VisChars<'a> {
    s: &'a str,
    b: &'a [u8],
    i: usize,
    n: usize,
    tag_gaps: bool,
}

impl<'a> VisChars<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, b: s.as_bytes(), i: 0, n: s.len(), tag_gaps: false }
    }

    pub fn with_tag_gaps(mut self) -> Self {
        self.tag_gaps = true;
        self
    }

    #[inline]
    fn skip_tag(&mut self) {
        // called when current byte is '<'
        self.i += 1;
        let mut in_s = false; // '
        let mut in_d = false; // "
        while self.i < self.n {
            match self.b[self.i] {
                b'\'' if !in_d => in_s = !in_s,
                b'"' if !in_s => in_d = !in_d,
                b'>' if !in_s && !in_d => {
                    self.i += 1;
                    break;
                }
                _ => {}
            }
            self.i += 1;
        }
    }

    #[inline]
    fn entity(&mut self) -> char {
        // called when current byte is '&'
        let body_start = self.i + 1;
        let limit = (body_start + MAX_ENTITY).min(self.n);
        let semi = self.b[body_start..limit].iter().position(|&c| c == b';');
        if let Some(off) = semi {
            let body = &self.s[body_start..body_start + off];
            if let Some(ch) = decode_entity(body) {
                self.i = body_start + off + 1;
                return ch;
            }
        }
        self.i += 1;
        '&'
    }

    #[inline]
    fn next_char(&mut self) -> Option<char> {
        let ch = self.s.get(self.i..)?.chars().next()?;
        self.i += ch.len_utf8();
        Some(ch)
    }

    #[inline]
    fn is_ws(c: u8) -> bool {
        matches!(c, b' ' | b'\t' | b'\r' | b'\n')
    }
}

impl Iterator for VisChars<'_> {
    type Item = char;
    fn next(&mut self) -> Option<Self::Item> {
        while self.i < self.n {
            match self.b[self.i] {
                b'<' => {
                    self.skip_tag();
                    if self.tag_gaps {
                        return Some(' ');
                    }
                    continue;
                }
                b'&' => return Some(self.entity()),
                c if Self::is_ws(c) => {
                    // collapse consecutive whitespace to a single space
                    while self.i < self.n && Self::is_ws(self.b[self.i]) {
                        self.i += 1;
                    }
                    return Some(' ');
                }
                _ => return self.next_char(),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::VisChars;

    #[test]
    fn decodes_entities_and_keeps_stray_ampersands() {
        let s: String = VisChars::new("5&#8211;1 &ndash; A & B&amp;C").collect();
        assert_eq!(s, "5\u{2013}1 \u{2013} A & B&C");
    }

    #[test]
    fn tag_gaps_separate_cells() {
        let plain: String = VisChars::new("<td>Norway</td><td>5</td>").collect();
        let gapped: String = VisChars::new("<td>Norway</td><td>5</td>").with_tag_gaps().collect();
        assert_eq!(plain, "Norway5");
        assert_eq!(gapped.split_whitespace().collect::<Vec<_>>(), vec!["Norway", "5"]);
    }
}
