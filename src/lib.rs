//! Karaoke lyric synchronization and layout engine
//!
//! Turns raw timed-lyric text into an immutable [`SyncedDocument`],
//! answers "which line is active at time `t`" fast enough for per-frame
//! use, and wraps measured syllables into balanced display lines.
//!
//! - [`model`]: the timed-entity model shared by everything else
//! - [`parser`]: format sniffing, the syllable-timed and LRC parsers,
//!   translation attachment
//! - [`index`]: binary-search temporal lookup
//! - [`layout`]: optimal line breaking over caller-measured widths
//!
//! The crate is pure: no I/O, no shared mutable state. The host app
//! feeds playback time and text measurements in and paints the results.
//!
//! ```
//! use lyrisync::{highlight_index, parse_str, wrap_with};
//!
//! let doc = parse_str("[2]Hello(0,500) (500,100)world(600,400)").unwrap();
//! assert_eq!(highlight_index(&doc, 700), 0);
//!
//! if let lyrisync::SyncedLine::Karaoke(line) = &doc.lines[0] {
//!     // Widths normally come from the renderer's text shaper
//!     let wrapped = wrap_with(&line.syllables, 120.0, |text| text.len() as f32 * 12.0);
//!     assert!(!wrapped.is_empty());
//! }
//! ```

pub mod index;
pub mod layout;
pub mod model;
pub mod parser;

pub use index::{HIGHLIGHT_NEIGHBORHOOD, all_highlight_indices, highlight_index};
pub use layout::{DisplayLine, MeasuredSyllable, wrap, wrap_with};
pub use model::{
    Alignment, DocumentMetadata, KaraokeLine, PlainLine, Syllable, SyncedDocument, SyncedLine,
    TimeRange,
};
pub use parser::{LyricFormat, ParseError, attach_translation, detect_format, parse_lines, parse_str};
