//! Shared record layout for the `.dat` text formats.
//!
//! Every record is one line of fixed-point numbers with 16 fractional
//! digits, separated by `"; "`. Parsers split on `;` and trim, so
//! hand-edited files with other spacing still load.

use std::fmt::Write;
use std::num::ParseFloatError;

use fieldlines_core::Point;

/// Fractional digits written for every coordinate.
pub const PRECISION: usize = 16;

/// Field separator between coordinates.
pub const SEPARATOR: &str = "; ";

/// Errors raised while parsing a `.dat` file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// A record had the wrong number of fields.
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        /// 1-based line number.
        line: usize,
        /// Fields the format requires.
        expected: usize,
        /// Fields present.
        found: usize,
    },

    /// A field was not a floating-point number.
    #[error("line {line}: invalid number {field:?}: {source}")]
    InvalidNumber {
        /// 1-based line number.
        line: usize,
        /// The offending field text, trimmed.
        field: String,
        /// Underlying parse failure.
        source: ParseFloatError,
    },
}

/// Append `x; y` for `point` without a line terminator.
pub(crate) fn write_point(out: &mut String, point: Point) {
    let _ = write!(
        out,
        "{:.prec$}{SEPARATOR}{:.prec$}",
        point.x,
        point.y,
        prec = PRECISION
    );
}

/// Append a full record of `points` followed by `'\n'`.
pub(crate) fn write_record(out: &mut String, points: &[Point]) {
    for (i, &point) in points.iter().enumerate() {
        if i > 0 {
            out.push_str(SEPARATOR);
        }
        write_point(out, point);
    }
    out.push('\n');
}

/// Parse a record of exactly `N` coordinates.
///
/// `line` is the 1-based line number used in errors.
pub(crate) fn parse_record<const N: usize>(text: &str, line: usize) -> Result<[f64; N], ParseError> {
    let fields: Vec<&str> = text.split(';').map(str::trim).collect();
    if fields.len() != N {
        return Err(ParseError::FieldCount {
            line,
            expected: N,
            found: fields.len(),
        });
    }

    let mut values = [0.0; N];
    for (value, field) in values.iter_mut().zip(fields) {
        *value = field.parse().map_err(|source| ParseError::InvalidNumber {
            line,
            field: field.to_string(),
            source,
        })?;
    }
    Ok(values)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn point_uses_sixteen_fractional_digits() {
        let mut out = String::new();
        write_point(&mut out, Point::new(1.5, -0.25));
        assert_eq!(out, "1.5000000000000000; -0.2500000000000000");
    }

    #[test]
    fn record_joins_points_and_ends_line() {
        let mut out = String::new();
        write_record(&mut out, &[Point::new(0.0, 1.0), Point::new(2.0, 3.0)]);
        assert_eq!(
            out,
            "0.0000000000000000; 1.0000000000000000; 2.0000000000000000; 3.0000000000000000\n"
        );
    }

    #[test]
    fn parse_tolerates_spacing() {
        let values: [f64; 2] = parse_record("  1.25 ;-3", 1).unwrap();
        assert_eq!(values, [1.25, -3.0]);
    }

    #[test]
    fn parse_rejects_wrong_field_count() {
        let err = parse_record::<2>("1; 2; 3", 7).unwrap_err();
        assert_eq!(
            err,
            ParseError::FieldCount {
                line: 7,
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn parse_reports_bad_number() {
        let err = parse_record::<2>("1; abc", 3).unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidNumber { line: 3, ref field, .. } if field == "abc"
        ));
        assert!(err.to_string().starts_with("line 3:"));
    }
}
