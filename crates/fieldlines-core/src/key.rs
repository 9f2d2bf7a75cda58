//! Exact endpoint identity.
//!
//! The external tracer writes shared segment endpoints with identical
//! coordinate values, so endpoints are matched by the IEEE-754 bit
//! pattern of each coordinate instead of a distance tolerance. Two
//! points share a key iff both coordinates are bit-identical: `0.0` and
//! `-0.0` are different keys, and a NaN only matches a NaN with the same
//! payload.

use std::fmt;

use crate::types::Point;

/// Hashable exact identity of a [`Point`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointKey {
    x: u64,
    y: u64,
}

impl PointKey {
    /// Key of the given point.
    #[must_use]
    pub const fn of(point: Point) -> Self {
        Self {
            x: point.x.to_bits(),
            y: point.y.to_bits(),
        }
    }

    /// The point this key was derived from.
    #[must_use]
    pub const fn point(self) -> Point {
        Point::new(f64::from_bits(self.x), f64::from_bits(self.y))
    }
}

impl fmt::Display for PointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.point();
        write!(f, "({}, {}) [{:016x}:{:016x}]", p.x, p.y, self.x, self.y)
    }
}

/// Keys of the two free ends of a line under construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StitchKey {
    /// Key of the first point.
    pub front: PointKey,
    /// Key of the last point.
    pub back: PointKey,
}

impl StitchKey {
    /// Create a key from front and back endpoint keys.
    #[must_use]
    pub const fn new(front: PointKey, back: PointKey) -> Self {
        Self { front, back }
    }
}
