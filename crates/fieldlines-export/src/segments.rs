//! Segment soup text format, the input handed over by an external
//! streamline tracer.
//!
//! One segment per line: `x0; y0; x1; y1`. Blank lines and lines whose
//! first non-space character is `#` are ignored, so tracers can emit
//! headers.

use fieldlines_core::{Point, Segment};

use crate::record::{ParseError, parse_record, write_record};

/// Serialize segments, one per line.
#[must_use]
pub fn to_segments(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        write_record(&mut out, &[segment.start, segment.end]);
    }
    out
}

/// Parse segment soup text.
///
/// # Errors
///
/// Returns [`ParseError`] for a data line that is not exactly four
/// numbers.
pub fn parse_segments(text: &str) -> Result<Vec<Segment>, ParseError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim_start();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(|(index, line)| {
            let [x0, y0, x1, y1] = parse_record::<4>(line, index + 1)?;
            Ok(Segment::new(Point::new(x0, y0), Point::new(x1, y1)))
        })
        .collect()
}
