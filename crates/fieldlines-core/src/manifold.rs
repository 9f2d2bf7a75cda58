//! Switching manifolds of piecewise-smooth (Filippov) vector fields.
//!
//! A piecewise-smooth field is made of two smooth component fields. A
//! scalar function `S(x, y)` decides which one governs each point: field
//! [`FieldMode::Lower`] is valid where `S <= 0`, field
//! [`FieldMode::Upper`] where `S >= 0`. Points exactly on the manifold
//! belong to both.

use serde::{Deserialize, Serialize};

use crate::types::Point;

/// A scalar function whose zero-level set is the switching surface.
pub trait SwitchingManifold {
    /// Evaluate `S` at `point`.
    fn value(&self, point: Point) -> f64;
}

impl<F> SwitchingManifold for F
where
    F: Fn(Point) -> f64,
{
    fn value(&self, point: Point) -> f64 {
        self(point)
    }
}

/// Straight switching line `S(x, y) = a*x + b*y + c`.
///
/// Sliding-mode controllers of switching power converters commonly use
/// a linear combination of the state variables like this one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineManifold {
    /// Coefficient of `x`.
    pub a: f64,
    /// Coefficient of `y`.
    pub b: f64,
    /// Constant offset.
    pub c: f64,
}

impl AffineManifold {
    /// Create `S(x, y) = a*x + b*y + c`.
    #[must_use]
    pub const fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }
}

impl SwitchingManifold for AffineManifold {
    fn value(&self, point: Point) -> f64 {
        self.a.mul_add(point.x, self.b.mul_add(point.y, self.c))
    }
}

/// Which component field produced a streamline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldMode {
    /// Field 0, valid on the non-positive side (`S <= 0`).
    Lower,
    /// Field 1, valid on the non-negative side (`S >= 0`).
    Upper,
}

impl FieldMode {
    /// Mode for the control input `u` (0 or 1).
    #[must_use]
    pub const fn from_index(u: u8) -> Option<Self> {
        match u {
            0 => Some(Self::Lower),
            1 => Some(Self::Upper),
            _ => None,
        }
    }

    /// The control input `u` of this mode.
    #[must_use]
    pub const fn index(self) -> u8 {
        match self {
            Self::Lower => 0,
            Self::Upper => 1,
        }
    }

    /// Factor that turns `S` into a value that is non-negative exactly
    /// where this mode is valid.
    #[must_use]
    pub const fn sign_factor(self) -> f64 {
        match self {
            Self::Lower => -1.0,
            Self::Upper => 1.0,
        }
    }

    /// `S` scaled so that the valid side is non-negative.
    #[must_use]
    pub fn signed_value<M: SwitchingManifold + ?Sized>(self, manifold: &M, point: Point) -> f64 {
        self.sign_factor() * manifold.value(point)
    }

    /// Returns `true` if `point` lies where this mode's field is valid.
    ///
    /// A NaN manifold value is never visible.
    #[must_use]
    pub fn is_visible<M: SwitchingManifold + ?Sized>(self, manifold: &M, point: Point) -> bool {
        self.signed_value(manifold, point) >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_is_a_manifold() {
        let s = |p: Point| p.y;
        assert!((s.value(Point::new(3.0, -2.0)) + 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn affine_manifold_evaluates() {
        let s = AffineManifold::new(2.0, -1.0, 0.5);
        assert!((s.value(Point::new(1.0, 3.0)) + 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn modes_partition_the_plane() {
        let s = |p: Point| p.y;
        let below = Point::new(0.0, -1.0);
        let above = Point::new(0.0, 1.0);
        assert!(FieldMode::Lower.is_visible(&s, below));
        assert!(!FieldMode::Lower.is_visible(&s, above));
        assert!(FieldMode::Upper.is_visible(&s, above));
        assert!(!FieldMode::Upper.is_visible(&s, below));
    }

    #[test]
    fn manifold_points_are_visible_in_both_modes() {
        let s = |p: Point| p.y;
        let on = Point::new(4.0, 0.0);
        assert!(FieldMode::Lower.is_visible(&s, on));
        assert!(FieldMode::Upper.is_visible(&s, on));
    }

    #[test]
    fn nan_is_never_visible() {
        let s = |_: Point| f64::NAN;
        assert!(!FieldMode::Lower.is_visible(&s, Point::new(0.0, 0.0)));
        assert!(!FieldMode::Upper.is_visible(&s, Point::new(0.0, 0.0)));
    }

    #[test]
    fn index_round_trip() {
        assert_eq!(FieldMode::from_index(0), Some(FieldMode::Lower));
        assert_eq!(FieldMode::from_index(1), Some(FieldMode::Upper));
        assert_eq!(FieldMode::from_index(2), None);
        assert_eq!(FieldMode::Upper.index(), 1);
    }
}
