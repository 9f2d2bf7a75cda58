//! Arrows file serializer (`streamarrows.dat`).
//!
//! One line per placed arrow:
//! `tail.x; tail.y; mid.x; mid.y; head.x; head.y`. Streamlines without an
//! arrow contribute nothing, so line `n` of this file does not in general
//! belong to polyline `n` of the streamlines file.

use fieldlines_core::{Arrow, Point};

use crate::record::{ParseError, parse_record, write_record};

/// Serialize arrows, one per line.
///
/// Accepts any iterator of arrows, so
/// [`Streamplot::placed_arrows`](fieldlines_core::Streamplot::placed_arrows)
/// can be passed directly.
#[must_use]
pub fn to_arrows<'a, I>(arrows: I) -> String
where
    I: IntoIterator<Item = &'a Arrow>,
{
    let mut out = String::new();
    for arrow in arrows {
        write_record(&mut out, &[arrow.tail, arrow.mid, arrow.head]);
    }
    out
}

/// Parse arrows text. Blank lines are skipped.
///
/// # Errors
///
/// Returns [`ParseError`] for a line that is not exactly six numbers.
pub fn parse_arrows(text: &str) -> Result<Vec<Arrow>, ParseError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            let [tx, ty, mx, my, hx, hy] = parse_record::<6>(line, index + 1)?;
            Ok(Arrow {
                tail: Point::new(tx, ty),
                mid: Point::new(mx, my),
                head: Point::new(hx, hy),
            })
        })
        .collect()
}
