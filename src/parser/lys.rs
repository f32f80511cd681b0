//! Lyricify Syllable (LYS) style parser
//!
//! Syllable-timed format: an optional bracketed single-digit attribute
//! marker followed by repeated `content(start,duration)` tokens, both
//! numbers non-negative integer milliseconds.
//!
//! Marker digit semantics:
//! - 0..=5: main vocal, 6..: accompaniment (background vocal)
//! - 2, 5, 8: start-aligned, everything else end-aligned
//!
//! Parsing is lenient: a token that fails the numeric-pair shape becomes
//! a visible `("Error", 0, 0)` sentinel and the scan continues, so one
//! bad token never discards a line.

use crate::model::{Alignment, KaraokeLine, Syllable, SyncedLine, normalize_lines};

/// Attributes selected by the line marker.
#[derive(Debug, Clone, Copy, Default)]
struct LineAttrs {
    is_accompaniment: bool,
    alignment: Alignment,
}

/// Recognize the attribute marker via the strict positional check: the
/// first `]` sits exactly two bytes after the first `[` and the byte
/// between them is an ASCII digit. Anything else means the whole line is
/// unmarked content.
fn parse_marker(src: &str) -> Option<(usize, LineAttrs)> {
    let open = src.find('[')?;
    let close = src.find(']')?;
    if close != open + 2 {
        return None;
    }

    let digit = src[open + 1..close].chars().next()?.to_digit(10)?;

    let attrs = LineAttrs {
        is_accompaniment: digit > 5,
        alignment: if matches!(digit, 2 | 5 | 8) {
            Alignment::Start
        } else {
            Alignment::End
        },
    };

    Some((close + 1, attrs))
}

/// Parse the timing pair `(start,duration)` at the head of `src`.
fn parse_timing(src: &str) -> Option<(usize, u64, u64)> {
    if !src.starts_with('(') {
        return None;
    }

    let end_paren = src.find(')')?;
    let (start_str, duration_str) = src[1..end_paren].split_once(',')?;

    let start: u64 = start_str.parse().ok()?;
    let duration: u64 = duration_str.parse().ok()?;

    Some((end_paren + 1, start, duration))
}

/// Scan the syllable stream, substituting sentinels for malformed tokens.
fn parse_syllables(src: &str) -> Vec<Syllable> {
    let mut syllables = Vec::new();
    let mut pos = 0;

    while pos < src.len() {
        let rest = &src[pos..];

        let Some(paren) = rest.find('(') else {
            // Trailing text with no timing pair at all
            if !rest.trim().is_empty() {
                tracing::warn!(token = rest, "syllable token without timing, using sentinel");
                syllables.push(Syllable::error_sentinel());
            }
            break;
        };

        let text = &rest[..paren];
        match parse_timing(&rest[paren..]) {
            Some((consumed, start, duration)) => {
                syllables.push(Syllable::new(text, start, start.saturating_add(duration)));
                pos += paren + consumed;
            }
            None => {
                tracing::warn!(token = text, "malformed syllable timing, using sentinel");
                syllables.push(Syllable::error_sentinel());
                // Skip past the broken pair so sibling tokens still parse
                let skip = rest[paren..]
                    .find(')')
                    .map(|i| paren + i + 1)
                    .unwrap_or(rest.len());
                pos += skip;
            }
        }
    }

    syllables
}

/// Parse a single line; `None` for blank lines or lines with no tokens.
fn parse_line(line: &str) -> Option<KaraokeLine> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (attrs, content) = match parse_marker(line) {
        Some((consumed, attrs)) => (attrs, &line[consumed..]),
        None => (LineAttrs::default(), line),
    };

    let syllables = parse_syllables(content);
    if syllables.is_empty() {
        return None;
    }

    Some(KaraokeLine {
        syllables,
        translation: None,
        is_accompaniment: attrs.is_accompaniment,
        alignment: attrs.alignment,
    })
}

/// Parse raw lines into karaoke lines, sorted by start time.
pub fn parse_lines(lines: &[&str]) -> Vec<SyncedLine> {
    let mut result = Vec::with_capacity(lines.len().min(1024));

    for line in lines {
        if let Some(parsed) = parse_line(line) {
            result.push(SyncedLine::Karaoke(parsed));
        }
    }

    normalize_lines(&mut result);

    result
}

/// Count well-formed `content(start,duration)` tokens in a raw line.
///
/// Used by format sniffing; markers are irrelevant to the count.
pub(crate) fn token_count(line: &str) -> usize {
    let mut count = 0;
    let mut pos = 0;

    while let Some(offset) = line[pos..].find('(') {
        let at = pos + offset;
        match parse_timing(&line[at..]) {
            Some((consumed, _, _)) => {
                count += 1;
                pos = at + consumed;
            }
            None => pos = at + 1,
        }
    }

    count
}

/// Convert karaoke lines back to the syllable format.
///
/// Inverse of [`parse_lines`] for well-formed input; plain lines are
/// skipped.
pub fn stringify(lines: &[SyncedLine]) -> String {
    use std::fmt::Write;

    let capacity: usize = lines
        .iter()
        .map(|line| match line {
            SyncedLine::Karaoke(k) => {
                k.syllables.iter().map(|s| s.text.len()).sum::<usize>() + 32
            }
            SyncedLine::Plain(_) => 0,
        })
        .sum();
    let mut result = String::with_capacity(capacity);

    for line in lines {
        let SyncedLine::Karaoke(karaoke) = line else {
            continue;
        };
        if karaoke.syllables.is_empty() {
            continue;
        }

        let marker = match (karaoke.is_accompaniment, karaoke.alignment) {
            (true, Alignment::Start) => "[8]",
            (true, _) => "[6]",
            (false, Alignment::Start) => "[2]",
            (false, _) => "[0]",
        };
        result.push_str(marker);

        for syllable in karaoke.syllables.iter() {
            let start = syllable.start_ms();
            let duration = syllable.duration_ms();
            result.push_str(&syllable.text);
            write!(result, "({start},{duration})").unwrap();
        }
        result.push('\n');
    }

    result
}
