//! Lyric parsing: format sniffing, dispatch and the translation join
//!
//! Supported formats:
//! - LYS-style syllable timing: `[n]content(start,duration)...`
//! - LRC line timing: `[mm:ss.xx]text`
//!
//! Input arrives as already newline-split raw lines; encoding and I/O
//! are the caller's concern. Parsing is best-effort per token; only
//! total failure (empty input, nothing recognizable) surfaces as
//! [`ParseError`].

pub mod lrc;
pub mod lys;

use std::collections::HashMap;

use crate::model::{SyncedDocument, SyncedLine};

/// Detected lyric syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LyricFormat {
    /// Syllable-timed `content(start,duration)` tokens
    Lys,
    /// Line-timed `[mm:ss.xx]text`
    Lrc,
    /// Nothing recognizable; parsing will still attempt LRC
    Unknown,
}

/// Unrecoverable parse failure. Per-token damage never raises this; it
/// is recovered inline with sentinel syllables.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty lyric input")]
    EmptyInput,
    #[error("no recognizable lyric timing in input")]
    UnrecognizedFormat,
}

/// Lines inspected when sniffing the format.
const DETECT_SAMPLE: usize = 32;

/// Detect the lyric format by counting syllable tokens against leading
/// timestamps over a sample of non-empty lines.
pub fn detect_format(lines: &[&str]) -> LyricFormat {
    let mut syllable_tokens = 0usize;
    let mut timestamps = 0usize;

    let mut non_empty = lines.iter().filter(|line| !line.trim().is_empty());

    for line in non_empty.by_ref().take(DETECT_SAMPLE) {
        syllable_tokens += lys::token_count(line);
        if lrc::has_leading_timestamp(line) {
            timestamps += 1;
        }
    }

    // The sample can miss late syllable timing; only a document with no
    // tokens anywhere falls back to line-synced parsing
    if syllable_tokens == 0 {
        syllable_tokens = non_empty.map(|line| lys::token_count(line)).sum();
    }

    if syllable_tokens == 0 {
        if timestamps > 0 {
            LyricFormat::Lrc
        } else {
            LyricFormat::Unknown
        }
    } else if syllable_tokens >= timestamps {
        LyricFormat::Lys
    } else {
        LyricFormat::Lrc
    }
}

/// Parse raw lyric lines into a document.
pub fn parse_lines(lines: &[&str]) -> Result<SyncedDocument, ParseError> {
    if lines.iter().all(|line| line.trim().is_empty()) {
        return Err(ParseError::EmptyInput);
    }

    let format = detect_format(lines);
    tracing::debug!(?format, lines = lines.len(), "detected lyric format");

    let document = match format {
        LyricFormat::Lys => SyncedDocument {
            lines: lys::parse_lines(lines),
            metadata: Default::default(),
        },
        LyricFormat::Lrc | LyricFormat::Unknown => {
            let (parsed, metadata) = lrc::parse_lines(lines);
            SyncedDocument {
                lines: parsed,
                metadata,
            }
        }
    };

    if document.is_empty() {
        return Err(ParseError::UnrecognizedFormat);
    }

    tracing::debug!(lines = document.len(), "parsed lyric document");
    Ok(document)
}

/// Parse a whole lyric text, splitting it into lines first.
pub fn parse_str(content: &str) -> Result<SyncedDocument, ParseError> {
    let lines: Vec<&str> = content.lines().collect();
    parse_lines(&lines)
}

/// Attach translations from a secondary document to a primary one.
///
/// Pure cross-document join: lines are matched by exact start time, the
/// primary document is copied structurally and never mutated, unmatched
/// lines keep their translation untouched (`None` straight after
/// parsing). Partial coverage is expected and is not an error.
pub fn attach_translation(
    primary: &SyncedDocument,
    secondary: &SyncedDocument,
) -> SyncedDocument {
    let by_start: HashMap<u64, String> = secondary
        .lines
        .iter()
        .map(|line| (line.start_ms(), line.text()))
        .collect();

    let lines = primary
        .lines
        .iter()
        .map(|line| {
            let Some(text) = by_start.get(&line.start_ms()) else {
                return line.clone();
            };
            let mut line = line.clone();
            match &mut line {
                SyncedLine::Karaoke(karaoke) => karaoke.translation = Some(text.clone()),
                SyncedLine::Plain(plain) => plain.translation = Some(text.clone()),
            }
            line
        })
        .collect();

    SyncedDocument {
        lines,
        metadata: primary.metadata.clone(),
    }
}
