//! Standard LRC format parser
//!
//! Line-synced `[mm:ss.xx]text` lyrics. A line may carry several leading
//! timestamps (the text repeats at each one). Header tags such as
//! `[ti:...]` and `[ar:...]` feed document metadata; other alphabetic
//! tags are skipped. Each line ends where the next one starts; the last
//! line gets a sentinel end clamped during normalization.

use crate::model::{DocumentMetadata, PlainLine, SyncedLine, normalize_lines};

/// Parse a leading timestamp: `[mm:ss]`, `[mm:ss.xx]`, `[mm:ss.xxx]` or
/// `[mm:ss:xx]`. Returns `None` for metadata tags like `[ar:Artist]`.
pub(crate) fn parse_timestamp(src: &str) -> Option<(usize, u64)> {
    if !src.starts_with('[') {
        return None;
    }

    let end_bracket = src.find(']')?;
    let time_str = &src[1..end_bracket];

    // Metadata tags start with a letter
    if time_str
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic())
    {
        return None;
    }

    let parts: Vec<&str> = time_str.split([':', '.']).collect();

    let time_ms = match parts.len() {
        2 => {
            let min: u64 = parts[0].parse().ok()?;
            let sec: u64 = parts[1].parse().ok()?;
            min * 60 * 1000 + sec * 1000
        }
        3 => {
            let min: u64 = parts[0].parse().ok()?;
            let sec: u64 = parts[1].parse().ok()?;
            let frac = parts[2];
            let mut ms: u64 = frac.parse().ok()?;

            // Fractional precision: x / xx (centiseconds) / xxx
            match frac.len() {
                1 => ms *= 100,
                2 => ms *= 10,
                3 => {}
                _ => return None,
            }

            min * 60 * 1000 + sec * 1000 + ms
        }
        _ => return None,
    };

    Some((end_bracket + 1, time_ms))
}

/// Parse a leading `[key:value]` header tag with an alphabetic key.
fn parse_header_tag(line: &str) -> Option<(String, String)> {
    let rest = line.trim().strip_prefix('[')?;
    let close = rest.find(']')?;
    let (key, value) = rest[..close].split_once(':')?;

    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    Some((key.to_ascii_lowercase(), value.trim().to_string()))
}

/// Parse a single raw line, which may carry multiple timestamps.
fn parse_line(line: &str) -> Vec<PlainLine> {
    let line = line.trim();
    let mut timestamps = Vec::new();
    let mut pos = 0;

    while pos < line.len() {
        if let Some((consumed, time)) = parse_timestamp(&line[pos..]) {
            timestamps.push(time);
            pos += consumed;
        } else {
            break;
        }
    }

    if timestamps.is_empty() {
        return Vec::new();
    }

    let text = line[pos..].trim();

    timestamps
        .into_iter()
        // End times are assigned once all lines are collected
        .map(|start| PlainLine::new(text, start, start))
        .collect()
}

/// Parse raw lines into plain synced lines plus document metadata.
pub fn parse_lines(lines: &[&str]) -> (Vec<SyncedLine>, DocumentMetadata) {
    let mut plain = Vec::with_capacity(lines.len().min(1024));
    let mut metadata = DocumentMetadata::default();

    for line in lines {
        let parsed = parse_line(line);
        if parsed.is_empty() {
            if let Some((key, value)) = parse_header_tag(line) {
                match key.as_str() {
                    "ti" => metadata.title = Some(value),
                    "ar" => metadata.artist = Some(value),
                    "id" => metadata.id = Some(value),
                    _ => {}
                }
            }
            continue;
        }
        plain.extend(parsed);
    }

    plain.sort_by_key(|line| line.start_ms());

    // Each line ends where the next begins; the last gets a sentinel end
    let mut next_start = u64::MAX;
    for line in plain.iter_mut().rev() {
        line.range.end_ms = next_start.max(line.range.start_ms);
        next_start = line.range.start_ms;
    }

    let mut result: Vec<SyncedLine> = plain.into_iter().map(SyncedLine::Plain).collect();
    normalize_lines(&mut result);

    (result, metadata)
}

/// Whether the raw line opens with a recognizable timestamp.
pub(crate) fn has_leading_timestamp(line: &str) -> bool {
    parse_timestamp(line.trim()).is_some()
}

/// Write a timestamp in `[mm:ss.mmm]` form.
fn write_timestamp(result: &mut String, time: u64) {
    use std::fmt::Write;

    let ms = time % 1000;
    let sec = (time / 1000) % 60;
    let min = time / 60000;
    write!(result, "[{min:02}:{sec:02}.{ms:03}]").unwrap();
}

/// Convert synced lines to LRC text, one timestamp per line.
pub fn stringify(lines: &[SyncedLine]) -> String {
    let capacity: usize = lines.iter().map(|line| line.text().len() + 13).sum();
    let mut result = String::with_capacity(capacity);

    for line in lines {
        write_timestamp(&mut result, line.start_ms());
        result.push_str(&line.text());
        result.push('\n');
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MAX_TIME_MS;

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("[00:01.12]"), Some((10, 1120)));
        assert_eq!(parse_timestamp("[00:10.254]"), Some((11, 10254)));
        assert_eq!(parse_timestamp("[01:10.1]"), Some((9, 70100)));
        assert_eq!(parse_timestamp("[02:30]"), Some((7, 150000)));
        assert_eq!(parse_timestamp("[00:05:25]"), Some((10, 5250)));
        assert_eq!(parse_timestamp("[ar:Artist]"), None);
        assert_eq!(parse_timestamp("no brackets"), None);
    }

    #[test]
    fn test_parse_line_single() {
        let lines = parse_line("[00:01.12] test LyRiC");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].start_ms(), 1120);
        assert_eq!(lines[0].text, "test LyRiC");
    }

    #[test]
    fn test_parse_line_multiple_timestamps() {
        let lines = parse_line("[00:12.50][01:30.00]Repeated line");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].start_ms(), 12500);
        assert_eq!(lines[1].start_ms(), 90000);
        assert_eq!(lines[0].text, lines[1].text);
    }

    #[test]
    fn test_end_times_follow_next_start() {
        let (lines, _) =
            parse_lines(&["[00:00.00]First", "[00:05.00]Second", "[00:10.00]Third"]);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].end_ms(), 5000);
        assert_eq!(lines[1].end_ms(), 10000);
        // Sentinel end for the last line, clamped by normalization
        assert_eq!(lines[2].end_ms(), MAX_TIME_MS);
    }

    #[test]
    fn test_header_tags_feed_metadata() {
        let (lines, metadata) = parse_lines(&[
            "[ti:Test Song]",
            "[ar:Test Artist]",
            "[al:Ignored Album]",
            "[offset:500]",
            "[00:01.00]Only line",
        ]);
        assert_eq!(lines.len(), 1);
        assert_eq!(metadata.title.as_deref(), Some("Test Song"));
        assert_eq!(metadata.artist.as_deref(), Some("Test Artist"));
        assert!(metadata.id.is_none());
    }

    #[test]
    fn test_multi_timestamp_lines_sorted() {
        let (lines, _) = parse_lines(&["[00:12.50][00:02.00]Chorus", "[00:07.00]Verse"]);
        let starts: Vec<u64> = lines.iter().map(|l| l.start_ms()).collect();
        assert_eq!(starts, vec![2000, 7000, 12500]);
        assert_eq!(lines[0].text(), "Chorus");
        assert_eq!(lines[1].text(), "Verse");
    }

    #[test]
    fn test_stringify() {
        let (lines, _) = parse_lines(&["[00:01.12] test LyRiC", "[00:10.254] sssxxx"]);
        let output = stringify(&lines);
        assert!(output.contains("[00:01.120]test LyRiC"));
        assert!(output.contains("[00:10.254]sssxxx"));
    }
}
