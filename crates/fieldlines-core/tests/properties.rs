//! Property tests for reconstruction, clipping, and arrow placement.

#![allow(clippy::unwrap_used, clippy::cast_precision_loss)]

use fieldlines_core::{
    AffineManifold, ClipStrategy, FieldMode, ManifoldClipper, Point, Polyline, Segment,
    SwitchingManifold, midpoint_arrow, reconstruct,
};
use proptest::prelude::*;

/// Disjoint open paths: path `j` runs along `y = j` through `x = 0..len`.
fn paths() -> impl Strategy<Value = Vec<Vec<Point>>> {
    prop::collection::vec(2..8usize, 1..6).prop_map(|lengths| {
        lengths
            .into_iter()
            .enumerate()
            .map(|(j, len)| {
                (0..len)
                    .map(|i| Point::new(i as f64 * 0.5, j as f64))
                    .collect()
            })
            .collect()
    })
}

fn segments_of(paths: &[Vec<Point>]) -> Vec<Segment> {
    paths
        .iter()
        .flat_map(|path| path.windows(2).map(|w| Segment::new(w[0], w[1])))
        .collect()
}

/// Paths and the same segments in a random order.
fn shuffled() -> impl Strategy<Value = (Vec<Vec<Point>>, Vec<Segment>)> {
    paths().prop_flat_map(|paths| {
        let segments = segments_of(&paths);
        (Just(paths), Just(segments).prop_shuffle())
    })
}

fn sorted_lines(segments: &[Segment]) -> Vec<Vec<(f64, f64)>> {
    let mut lines: Vec<Vec<(f64, f64)>> = reconstruct(segments)
        .unwrap()
        .into_iter()
        .map(|s| s.polyline.points().iter().map(|p| (p.x, p.y)).collect())
        .collect();
    lines.sort_by(|a, b| a[0].partial_cmp(&b[0]).unwrap());
    lines
}

fn expected_lines(paths: &[Vec<Point>]) -> Vec<Vec<(f64, f64)>> {
    let mut lines: Vec<Vec<(f64, f64)>> = paths
        .iter()
        .map(|path| path.iter().map(|p| (p.x, p.y)).collect())
        .collect();
    lines.sort_by(|a, b| a[0].partial_cmp(&b[0]).unwrap());
    lines
}

fn polyline() -> impl Strategy<Value = Polyline> {
    prop::collection::vec((-5.0..5.0f64, -5.0..5.0f64), 2..12).prop_map(|coords| {
        Polyline::new(coords.into_iter().map(|(x, y)| Point::new(x, y)).collect())
    })
}

proptest! {
    #[test]
    fn any_segment_order_rebuilds_every_path((paths, segments) in shuffled()) {
        prop_assert_eq!(sorted_lines(&segments), expected_lines(&paths));
    }

    #[test]
    fn reconstruction_is_order_independent(
        (_, a) in shuffled(),
        seed in any::<u64>(),
    ) {
        // Rotating the order is another permutation of the same segments.
        let mut b = a.clone();
        let len = b.len();
        b.rotate_left(usize::try_from(seed % len as u64).unwrap());
        prop_assert_eq!(sorted_lines(&a), sorted_lines(&b));
    }

    #[test]
    fn singular_segments_never_change_the_result(
        (paths, mut segments) in shuffled(),
        positions in prop::collection::vec(any::<prop::sample::Index>(), 0..5),
    ) {
        for (n, index) in positions.into_iter().enumerate() {
            let p = Point::new(100.0 + n as f64, -100.0);
            let at = index.index(segments.len() + 1);
            segments.insert(at, Segment::new(p, p));
        }
        prop_assert_eq!(sorted_lines(&segments), expected_lines(&paths));
    }

    #[test]
    fn crossing_sections_stay_on_the_valid_side(
        line in polyline(),
        upper in any::<bool>(),
    ) {
        let manifold = AffineManifold::new(0.3, 1.0, -0.2);
        let mode = if upper { FieldMode::Upper } else { FieldMode::Lower };
        let clipped = ManifoldClipper::default().clip(&line, mode, &manifold);

        for section in &clipped.sections {
            prop_assert!(section.len() >= 2);
            for &p in section.points() {
                prop_assert!(mode.signed_value(&manifold, p) >= -1e-9);
            }
        }
        prop_assert_eq!(clipped.stats.unavailable_crossings, 0);
    }

    #[test]
    fn sections_end_on_the_manifold_where_they_leave_it(line in polyline()) {
        let manifold = AffineManifold::new(0.0, 1.0, 0.0);
        let points = line.points();
        let clipped = ManifoldClipper::new(ClipStrategy::Crossing, Default::default())
            .clip(&line, FieldMode::Lower, &manifold);

        // A section that does not end on the input's last vertex was cut
        // by an exit crossing.
        let last = *points.last().unwrap();
        for section in &clipped.sections {
            let end = *section.last().unwrap();
            if end != last {
                prop_assert!(manifold.value(end).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn straight_line_arrow_sits_inside_the_line(
        mut xs in prop::collection::vec(0.0..100.0f64, 2..10),
        eps in 0.0..0.5f64,
    ) {
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        xs.dedup();
        prop_assume!(xs.len() >= 2);
        let points: Vec<Point> = xs.iter().map(|&x| Point::new(x, 1.0)).collect();

        let arrow = midpoint_arrow(&points, eps).unwrap();
        let (lo, hi) = (xs[0], xs[xs.len() - 1]);
        prop_assert!(arrow.tail.x <= arrow.mid.x + 1e-9);
        prop_assert!(arrow.mid.x <= arrow.head.x + 1e-9);
        prop_assert!(arrow.tail.x >= lo - 1e-9 && arrow.head.x <= hi + 1e-9);
        prop_assert!((arrow.mid.y - 1.0).abs() < 1e-12);
    }
}
