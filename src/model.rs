//! Timed lyric data model
//!
//! The canonical representation shared by every parser and consumer:
//! syllables, karaoke lines, plain synced lines and the document that
//! holds them. Documents are immutable once built; anything that looks
//! like an edit (attaching translations) produces a new document.

use serde::{Deserialize, Serialize};

/// Maximum representable timestamp: 999:99.999
pub const MAX_TIME_MS: u64 = 60_039_999;

/// Extra focus window applied to accompaniment lines, per side.
///
/// Background vocals fade in/out around their sung window; without the
/// tolerance they flicker at the boundary.
pub const ACCOMPANIMENT_TOLERANCE_MS: u64 = 700;

/// Inclusive time span in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    /// Start time in milliseconds
    pub start_ms: u64,
    /// End time in milliseconds, never before `start_ms`
    pub end_ms: u64,
}

impl TimeRange {
    /// Build a range, clamping `end_ms` so it never precedes `start_ms`.
    pub fn new(start_ms: u64, end_ms: u64) -> Self {
        Self {
            start_ms,
            end_ms: end_ms.max(start_ms),
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }

    /// Inclusive containment on both ends.
    pub fn contains(&self, t: u64) -> bool {
        self.start_ms <= t && t <= self.end_ms
    }

    /// Widen the range by a lead/trail tolerance.
    pub fn expanded(&self, lead_ms: u64, trail_ms: u64) -> Self {
        Self {
            start_ms: self.start_ms.saturating_sub(lead_ms),
            end_ms: self.end_ms.saturating_add(trail_ms),
        }
    }

    fn clamped(self) -> Self {
        Self {
            start_ms: self.start_ms.min(MAX_TIME_MS),
            end_ms: self.end_ms.min(MAX_TIME_MS),
        }
    }
}

/// Smallest timed text unit within a karaoke line.
///
/// Whitespace-only text is legal and represents a timed gap: invisible
/// but time-occupying.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Syllable {
    pub range: TimeRange,
    pub text: String,
}

impl Syllable {
    pub fn new(text: impl Into<String>, start_ms: u64, end_ms: u64) -> Self {
        Self {
            range: TimeRange::new(start_ms, end_ms),
            text: text.into(),
        }
    }

    /// Visibly-erroneous stand-in for a token that failed to parse.
    pub fn error_sentinel() -> Self {
        Self::new("Error", 0, 0)
    }

    pub fn start_ms(&self) -> u64 {
        self.range.start_ms
    }

    pub fn end_ms(&self) -> u64 {
        self.range.end_ms
    }

    pub fn duration_ms(&self) -> u64 {
        self.range.duration_ms()
    }

    /// Check if the syllable is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Highlight progress at time `t`, clamped to `[0, 1]`.
    ///
    /// A zero-duration syllable counts as complete as soon as `t`
    /// reaches its start.
    pub fn progress(&self, t: u64) -> f32 {
        if t < self.range.start_ms {
            return 0.0;
        }
        let duration = self.range.duration_ms();
        if duration == 0 || t >= self.range.end_ms {
            return 1.0;
        }
        (t - self.range.start_ms) as f32 / duration as f32
    }
}

/// Horizontal placement of a rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    #[default]
    Start,
    End,
    Center,
}

/// A lyric line with per-syllable timing.
///
/// The line's time range is derived from its first and last syllable,
/// never authored independently. Syllables are kept in reading order
/// with non-decreasing start times; slight end/start overlap between
/// neighbors is tolerated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KaraokeLine {
    pub syllables: Vec<Syllable>,
    /// Pre-aligned translation text, attached after parsing
    #[serde(default)]
    pub translation: Option<String>,
    /// Secondary/background vocal line
    #[serde(default)]
    pub is_accompaniment: bool,
    #[serde(default)]
    pub alignment: Alignment,
}

impl KaraokeLine {
    /// Derived span: first syllable's start to last syllable's end.
    pub fn range(&self) -> TimeRange {
        match (self.syllables.first(), self.syllables.last()) {
            (Some(first), Some(last)) => TimeRange::new(first.start_ms(), last.end_ms()),
            _ => TimeRange::default(),
        }
    }

    pub fn start_ms(&self) -> u64 {
        self.range().start_ms
    }

    pub fn end_ms(&self) -> u64 {
        self.range().end_ms
    }

    /// Full line text, syllables joined in reading order.
    pub fn text(&self) -> String {
        self.syllables.iter().map(|s| s.text.as_str()).collect()
    }

    /// Check if the line is empty
    pub fn is_blank(&self) -> bool {
        self.syllables.is_empty() || self.syllables.iter().all(|s| s.is_blank())
    }

    /// Whether the line is active at `t`. Accompaniment lines widen
    /// their window by [`ACCOMPANIMENT_TOLERANCE_MS`] on each side.
    pub fn is_focused(&self, t: u64) -> bool {
        let range = self.range();
        if self.is_accompaniment {
            range
                .expanded(ACCOMPANIMENT_TOLERANCE_MS, ACCOMPANIMENT_TOLERANCE_MS)
                .contains(t)
        } else {
            range.contains(t)
        }
    }
}

/// A line-synced lyric line without internal syllable timing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlainLine {
    pub range: TimeRange,
    pub text: String,
    #[serde(default)]
    pub translation: Option<String>,
}

impl PlainLine {
    pub fn new(text: impl Into<String>, start_ms: u64, end_ms: u64) -> Self {
        Self {
            range: TimeRange::new(start_ms, end_ms),
            text: text.into(),
            translation: None,
        }
    }

    pub fn start_ms(&self) -> u64 {
        self.range.start_ms
    }

    pub fn end_ms(&self) -> u64 {
        self.range.end_ms
    }

    pub fn is_focused(&self, t: u64) -> bool {
        self.range.contains(t)
    }
}

/// A synced line of either kind, tagged for renderer dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SyncedLine {
    Karaoke(KaraokeLine),
    Plain(PlainLine),
}

impl SyncedLine {
    pub fn start_ms(&self) -> u64 {
        match self {
            SyncedLine::Karaoke(line) => line.start_ms(),
            SyncedLine::Plain(line) => line.start_ms(),
        }
    }

    pub fn end_ms(&self) -> u64 {
        match self {
            SyncedLine::Karaoke(line) => line.end_ms(),
            SyncedLine::Plain(line) => line.end_ms(),
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms() - self.start_ms()
    }

    pub fn text(&self) -> String {
        match self {
            SyncedLine::Karaoke(line) => line.text(),
            SyncedLine::Plain(line) => line.text.clone(),
        }
    }

    pub fn translation(&self) -> Option<&str> {
        match self {
            SyncedLine::Karaoke(line) => line.translation.as_deref(),
            SyncedLine::Plain(line) => line.translation.as_deref(),
        }
    }

    pub fn is_accompaniment(&self) -> bool {
        match self {
            SyncedLine::Karaoke(line) => line.is_accompaniment,
            SyncedLine::Plain(_) => false,
        }
    }

    pub fn alignment(&self) -> Alignment {
        match self {
            SyncedLine::Karaoke(line) => line.alignment,
            SyncedLine::Plain(_) => Alignment::Start,
        }
    }

    pub fn is_focused(&self, t: u64) -> bool {
        match self {
            SyncedLine::Karaoke(line) => line.is_focused(t),
            SyncedLine::Plain(line) => line.is_focused(t),
        }
    }
}

/// Song-level metadata carried alongside the lines.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub id: Option<String>,
}

/// A parsed lyric document: lines ordered by non-decreasing start time.
///
/// Built once per parse, read-only afterwards. Safe to share across
/// threads because nothing mutates it; edits build a new document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncedDocument {
    pub lines: Vec<SyncedLine>,
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

impl SyncedDocument {
    pub fn lines(&self) -> &[SyncedLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Normalize parsed lines: sort by start time and clamp timestamps.
pub(crate) fn normalize_lines(lines: &mut [SyncedLine]) {
    lines.sort_by_key(|line| line.start_ms());

    for line in lines.iter_mut() {
        match line {
            SyncedLine::Karaoke(karaoke) => {
                for syllable in karaoke.syllables.iter_mut() {
                    syllable.range = syllable.range.clamped();
                }
            }
            SyncedLine::Plain(plain) => {
                plain.range = plain.range.clamped();
            }
        }
    }
}
