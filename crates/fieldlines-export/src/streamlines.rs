//! Streamlines file serializer (`streamlines.dat`).
//!
//! Each polyline is a run of `x; y` lines, one per point. Consecutive
//! polylines are separated by exactly one blank line, with no blank line
//! before the first or after the last. Plotting tools that treat blank
//! lines as pen-up (gnuplot, pgfplots) draw the file directly.
//!
//! This is a pure function with no I/O; it returns a `String`.

use fieldlines_core::{Point, Polyline};

use crate::record::{ParseError, parse_record, write_point};

/// Serialize polylines into streamlines text.
///
/// # Examples
///
/// ```
/// use fieldlines_core::{Point, Polyline};
/// use fieldlines_export::to_streamlines;
///
/// let text = to_streamlines(&[
///     Polyline::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]),
///     Polyline::new(vec![Point::new(0.0, 1.0), Point::new(1.0, 1.0)]),
/// ]);
/// assert_eq!(text.lines().count(), 5);
/// assert_eq!(text.lines().nth(2), Some(""));
/// ```
#[must_use]
pub fn to_streamlines(polylines: &[Polyline]) -> String {
    let mut out = String::new();
    for (i, polyline) in polylines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        for &point in polyline.points() {
            write_point(&mut out, point);
            out.push('\n');
        }
    }
    out
}

/// Parse streamlines text back into polylines.
///
/// Any run of blank lines ends the current polyline.
///
/// # Errors
///
/// Returns [`ParseError`] for a line that is not exactly two numbers.
pub fn parse_streamlines(text: &str) -> Result<Vec<Polyline>, ParseError> {
    let mut polylines = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                polylines.push(Polyline::new(std::mem::take(&mut current)));
            }
            continue;
        }
        let [x, y] = parse_record::<2>(line, index + 1)?;
        current.push(Point::new(x, y));
    }
    if !current.is_empty() {
        polylines.push(Polyline::new(current));
    }
    Ok(polylines)
}
