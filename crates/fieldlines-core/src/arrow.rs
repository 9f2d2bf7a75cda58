//! Direction arrows at the arc-length midpoint of a polyline.
//!
//! The arrow is a short shaft lying on the edge that contains the
//! midpoint, extending symmetrically towards the nearer end of that edge.
//! The shaft never shrinks below a minimum fraction of the edge, so
//! arrows near an edge end stay drawable.

use crate::types::{Arrow, Point, Polyline};

/// Default minimum edge fraction kept on either side of the midpoint.
pub const DEFAULT_MIN_EDGE_FRACTION: f64 = 0.01;

/// Arrow centred on the arc-length midpoint of `points`.
///
/// Returns `None` for fewer than two points, and for polylines with no
/// edge of positive length.
///
/// `min_edge_fraction` is clamped into `[0, 0.5]`; a non-finite value
/// falls back to [`DEFAULT_MIN_EDGE_FRACTION`].
#[must_use]
pub fn midpoint_arrow(points: &[Point], min_edge_fraction: f64) -> Option<Arrow> {
    if points.len() < 2 {
        return None;
    }

    let lengths = cumulative_lengths(points);
    let half_length = 0.5 * lengths.last()?;

    // Last vertex not past the midpoint: lengths[n] <= half < lengths[n + 1].
    let n = lengths
        .partition_point(|&l| l <= half_length)
        .checked_sub(1)?;
    let (&l0, &l1) = (lengths.get(n)?, lengths.get(n + 1)?);
    let (&p0, &p1) = (points.get(n)?, points.get(n + 1)?);

    let eps = if min_edge_fraction.is_finite() {
        min_edge_fraction.clamp(0.0, 0.5)
    } else {
        DEFAULT_MIN_EDGE_FRACTION
    };
    let fraction = ((half_length - l0) / (l1 - l0)).clamp(eps, 1.0 - eps);
    let extension = fraction.min(1.0 - fraction);

    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;
    let mid = p0.lerp(p1, fraction);
    Some(Arrow {
        tail: Point::new(extension.mul_add(-dx, mid.x), extension.mul_add(-dy, mid.y)),
        mid,
        head: Point::new(extension.mul_add(dx, mid.x), extension.mul_add(dy, mid.y)),
    })
}

/// One arrow slot per polyline, `None` where no arrow fits.
#[must_use]
pub fn generate_stream_arrows(polylines: &[Polyline], min_edge_fraction: f64) -> Vec<Option<Arrow>> {
    polylines
        .iter()
        .map(|pl| midpoint_arrow(pl.points(), min_edge_fraction))
        .collect()
}

/// Arc length from the first point to each vertex.
fn cumulative_lengths(points: &[Point]) -> Vec<f64> {
    let mut lengths = Vec::with_capacity(points.len());
    let mut total = 0.0;
    let mut previous: Option<Point> = None;
    for &point in points {
        if let Some(prev) = previous {
            total += prev.distance(point);
        }
        lengths.push(total);
        previous = Some(point);
    }
    lengths
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn assert_close(actual: Point, expected: (f64, f64)) {
        assert!(
            (actual.x - expected.0).abs() < 1e-12 && (actual.y - expected.1).abs() < 1e-12,
            "expected {expected:?}, got {actual:?}",
        );
    }

    #[test]
    fn single_point_has_no_arrow() {
        assert_eq!(midpoint_arrow(&[Point::new(1.0, 1.0)], 0.01), None);
        assert_eq!(midpoint_arrow(&[], 0.01), None);
    }

    #[test]
    fn straight_segment_arrow_spans_the_edge() {
        // f = 0.5 sits inside [0.01, 0.99], so the shaft reaches both ends.
        let arrow = midpoint_arrow(&[Point::new(0.0, 0.0), Point::new(10.0, 0.0)], 0.01).unwrap();
        assert_eq!(arrow.tail, Point::new(0.0, 0.0));
        assert_eq!(arrow.mid, Point::new(5.0, 0.0));
        assert_eq!(arrow.head, Point::new(10.0, 0.0));
    }

    #[test]
    fn arrow_extends_to_nearer_edge_end() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(10.0, 0.0),
        ];
        let arrow = midpoint_arrow(&points, 0.01).unwrap();
        assert_close(arrow.tail, (4.0, 0.0));
        assert_close(arrow.mid, (5.0, 0.0));
        assert_close(arrow.head, (6.0, 0.0));
    }

    #[test]
    fn midpoint_on_vertex_is_clamped_into_next_edge() {
        // Midpoint falls exactly on (10, 0); it belongs to the second edge
        // and the fraction 0 is lifted to the minimum.
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ];
        let arrow = midpoint_arrow(&points, 0.01).unwrap();
        assert_close(arrow.tail, (10.0, 0.0));
        assert_close(arrow.mid, (10.0, 0.1));
        assert_close(arrow.head, (10.0, 0.2));
    }

    #[test]
    fn coincident_points_have_no_arrow() {
        let p = Point::new(2.0, 2.0);
        assert_eq!(midpoint_arrow(&[p, p, p], 0.01), None);
    }

    #[test]
    fn zero_length_edges_are_skipped() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(0.0, 2.0),
        ];
        let arrow = midpoint_arrow(&points, 0.01).unwrap();
        assert_close(arrow.mid, (0.0, 1.0));
    }

    #[test]
    fn oversized_fraction_is_clamped() {
        let arrow = midpoint_arrow(&[Point::new(0.0, 0.0), Point::new(2.0, 0.0)], 3.0).unwrap();
        assert_close(arrow.tail, (1.0, 0.0));
        assert_close(arrow.mid, (1.0, 0.0));
        assert_close(arrow.head, (1.0, 0.0));
    }

    #[test]
    fn arrows_keep_one_slot_per_polyline() {
        let polylines = vec![
            Polyline::new(vec![Point::new(0.0, 0.0)]),
            Polyline::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]),
        ];
        let arrows = generate_stream_arrows(&polylines, DEFAULT_MIN_EDGE_FRACTION);
        assert_eq!(arrows.len(), 2);
        assert!(arrows[0].is_none());
        assert!(arrows[1].is_some());
    }
}
