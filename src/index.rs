//! Temporal index: playback time to active line(s)
//!
//! `highlight_index` runs on every rendered frame (~60 Hz), so it is a
//! binary search over the document's sorted lines rather than a scan.
//! `all_highlight_indices` answers the duet case where several lines
//! (typically an accompaniment window) are active at once.

use crate::model::SyncedDocument;

/// Lines inspected on each side of the primary index when collecting
/// all highlighted lines.
pub const HIGHLIGHT_NEIGHBORHOOD: usize = 3;

/// Binary search for `t` over `[start, end]` ranges.
///
/// Returns the landed index plus the number of probes, so tests can
/// hold the logarithmic bound.
fn search(doc: &SyncedDocument, t: u64) -> (usize, usize) {
    let lines = doc.lines();
    let mut probes = 0;

    let mut lo = 0usize;
    let mut hi = lines.len();
    while lo < hi {
        probes += 1;
        let mid = lo + (hi - lo) / 2;
        let line = &lines[mid];
        if t < line.start_ms() {
            hi = mid;
        } else if t > line.end_ms() {
            lo = mid + 1;
        } else {
            return (mid, probes);
        }
    }

    // No containing line: lo is the first index whose start exceeds t,
    // so lo - 1 is the preceding, already-finished line
    let index = if lo == 0 {
        0
    } else if lo >= lines.len() {
        lines.len() - 1
    } else {
        lo - 1
    };
    (index, probes)
}

/// Index of the line to highlight at time `t`.
///
/// A line containing `t` wins; in a gap the preceding finished line is
/// returned, before the first line the upcoming one. An empty document
/// yields `0`, so callers must check [`SyncedDocument::is_empty`]
/// before indexing.
pub fn highlight_index(doc: &SyncedDocument, t: u64) -> usize {
    if doc.is_empty() {
        return 0;
    }
    search(doc, t).0
}

/// Every line index active at `t`, honoring the accompaniment focus
/// window, scanning [`HIGHLIGHT_NEIGHBORHOOD`] lines around the primary
/// index.
pub fn all_highlight_indices(doc: &SyncedDocument, t: u64) -> Vec<usize> {
    all_highlight_indices_windowed(doc, t, HIGHLIGHT_NEIGHBORHOOD)
}

/// [`all_highlight_indices`] with an explicit neighborhood bound.
pub fn all_highlight_indices_windowed(
    doc: &SyncedDocument,
    t: u64,
    window: usize,
) -> Vec<usize> {
    let lines = doc.lines();
    if lines.is_empty() {
        return Vec::new();
    }

    let primary = highlight_index(doc, t);
    let lo = primary.saturating_sub(window);
    let hi = (primary + window + 1).min(lines.len());

    (lo..hi).filter(|&i| lines[i].is_focused(t)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{KaraokeLine, PlainLine, Syllable, SyncedLine};

    fn plain_doc(ranges: &[(u64, u64)]) -> SyncedDocument {
        SyncedDocument {
            lines: ranges
                .iter()
                .map(|&(start, end)| SyncedLine::Plain(PlainLine::new("x", start, end)))
                .collect(),
            metadata: Default::default(),
        }
    }

    fn karaoke_line(start: u64, end: u64, is_accompaniment: bool) -> SyncedLine {
        SyncedLine::Karaoke(KaraokeLine {
            syllables: vec![Syllable::new("x", start, end)],
            is_accompaniment,
            ..Default::default()
        })
    }

    #[test]
    fn test_containment() {
        let doc = plain_doc(&[(0, 1000), (1000, 2000), (2000, 3000)]);
        assert_eq!(highlight_index(&doc, 1500), 1);
        assert_eq!(highlight_index(&doc, 2500), 2);
    }

    #[test]
    fn test_gap_returns_preceding_line() {
        let doc = plain_doc(&[(0, 1000), (5000, 6000), (9000, 10000)]);
        assert_eq!(highlight_index(&doc, 3000), 0);
        assert_eq!(highlight_index(&doc, 7000), 1);
    }

    #[test]
    fn test_before_first_and_after_last() {
        let doc = plain_doc(&[(1000, 2000), (2000, 3000)]);
        assert_eq!(highlight_index(&doc, 0), 0);
        assert_eq!(highlight_index(&doc, 50000), 1);
    }

    #[test]
    fn test_empty_document() {
        let doc = plain_doc(&[]);
        assert_eq!(highlight_index(&doc, 5000), 0);
        assert!(all_highlight_indices(&doc, 5000).is_empty());
    }

    #[test]
    fn test_probe_count_logarithmic() {
        for exp in [8u32, 10, 12, 14] {
            let n = 1usize << exp;
            let ranges: Vec<(u64, u64)> = (0..n as u64)
                .map(|i| (i * 1000, i * 1000 + 900))
                .collect();
            let doc = plain_doc(&ranges);

            let mut worst = 0;
            for t in [0, 450, (n as u64 / 2) * 1000 + 17, (n as u64 - 1) * 1000] {
                let (_, probes) = search(&doc, t);
                worst = worst.max(probes);
            }
            assert!(
                worst <= exp as usize + 1,
                "n={n}: {worst} probes exceeds log bound"
            );
        }
    }

    #[test]
    fn test_duet_accompaniment_window() {
        let doc = SyncedDocument {
            lines: vec![
                karaoke_line(0, 4000, false),
                karaoke_line(1000, 3000, true),
                karaoke_line(4000, 8000, false),
            ],
            metadata: Default::default(),
        };

        // Main line and overlapping accompaniment both active
        assert_eq!(all_highlight_indices(&doc, 2000), vec![0, 1]);
        // Accompaniment stays focused through its tolerance window
        assert_eq!(all_highlight_indices(&doc, 3500), vec![0, 1]);
        // Past the tolerance only the containing line remains
        assert_eq!(all_highlight_indices(&doc, 5000), vec![2]);
    }

    #[test]
    fn test_windowed_bound_limits_scan() {
        let ranges: Vec<(u64, u64)> = (0..10).map(|i| (i * 1000, i * 1000 + 999)).collect();
        let doc = plain_doc(&ranges);
        assert_eq!(all_highlight_indices_windowed(&doc, 4500, 0), vec![4]);
    }
}
