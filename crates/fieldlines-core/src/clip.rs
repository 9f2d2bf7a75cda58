//! Switching-manifold clipping: keep only the parts of a streamline that
//! lie where the field which produced it is valid.
//!
//! A streamline traced through field `u` over the whole plane is only
//! physically meaningful on field `u`'s side of the switching manifold.
//! The clipper walks the polyline, collects each maximal run of visible
//! vertices into a section, and terminates every section exactly on the
//! manifold by root-finding the crossing on the edge that leaves (or
//! enters) the visible region.
//!
//! # Strategy pattern
//!
//! [`ClipStrategy::Crossing`] is the canonical behavior.
//! [`ClipStrategy::Filter`] keeps the visible runs without inserting
//! crossing points; sections then stop short of the manifold by up to
//! one edge. It is retained for comparison.

use std::ops::AddAssign;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::manifold::{FieldMode, SwitchingManifold};
use crate::root::{NewtonSettings, solve_scalar};
use crate::types::{Point, Polyline};

/// Selects how sections are terminated at the manifold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClipStrategy {
    /// Cut each section exactly at the manifold with a root-found
    /// crossing point.
    #[default]
    Crossing,

    /// Keep visible vertices only, without crossing points.
    Filter,
}

/// Parameter slack accepted outside `[0, 1]` before a crossing is
/// considered off the edge.
const EDGE_SLACK: f64 = 1e-9;

/// Counts gathered while clipping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipStats {
    /// Polylines examined.
    pub polylines_in: usize,
    /// Sections emitted.
    pub sections_out: usize,
    /// Crossing points inserted into sections.
    pub crossings: usize,
    /// Crossings the root finder could not locate on the edge.
    pub unavailable_crossings: usize,
    /// Visible runs dropped for having fewer than two points.
    pub discarded_runs: usize,
}

impl AddAssign for ClipStats {
    fn add_assign(&mut self, rhs: Self) {
        self.polylines_in += rhs.polylines_in;
        self.sections_out += rhs.sections_out;
        self.crossings += rhs.crossings;
        self.unavailable_crossings += rhs.unavailable_crossings;
        self.discarded_runs += rhs.discarded_runs;
    }
}

/// Visible sections together with clipping statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipOutput {
    /// Sections in scan order, each with at least two points.
    pub sections: Vec<Polyline>,
    /// What happened along the way.
    pub stats: ClipStats,
}

/// Splits polylines at a switching manifold.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ManifoldClipper {
    /// How sections are terminated.
    pub strategy: ClipStrategy,
    /// Settings for the crossing solver.
    pub newton: NewtonSettings,
}

impl ManifoldClipper {
    /// Create a clipper.
    #[must_use]
    pub const fn new(strategy: ClipStrategy, newton: NewtonSettings) -> Self {
        Self { strategy, newton }
    }

    /// Clip a single polyline produced by the field of `mode`.
    #[must_use = "returns the visible sections"]
    pub fn clip<M>(&self, polyline: &Polyline, mode: FieldMode, manifold: &M) -> ClipOutput
    where
        M: SwitchingManifold + ?Sized,
    {
        let mut stats = ClipStats::default();
        let sections = self.clip_into(polyline.points(), mode, manifold, &mut stats);
        ClipOutput { sections, stats }
    }

    /// Clip every polyline independently, concatenating the sections.
    #[must_use = "returns the visible sections"]
    pub fn clip_all<M>(&self, polylines: &[Polyline], mode: FieldMode, manifold: &M) -> ClipOutput
    where
        M: SwitchingManifold + ?Sized,
    {
        let mut stats = ClipStats::default();
        let sections: Vec<Polyline> = polylines
            .iter()
            .flat_map(|pl| self.clip_into(pl.points(), mode, manifold, &mut stats))
            .collect();
        debug!(
            "clipped {} polylines for field {} into {} sections ({} crossings, {} unavailable)",
            stats.polylines_in,
            mode.index(),
            stats.sections_out,
            stats.crossings,
            stats.unavailable_crossings,
        );
        ClipOutput { sections, stats }
    }

    fn clip_into<M>(
        &self,
        points: &[Point],
        mode: FieldMode,
        manifold: &M,
        stats: &mut ClipStats,
    ) -> Vec<Polyline>
    where
        M: SwitchingManifold + ?Sized,
    {
        stats.polylines_in += 1;
        let visible: Vec<bool> = points
            .iter()
            .map(|&p| mode.is_visible(manifold, p))
            .collect();

        let mut sections = Vec::new();
        let mut i = 0;
        while i < points.len() {
            let start = i;
            while i < points.len() && visible[i] {
                i += 1;
            }
            let end = i;

            if end > start {
                let mut section = Vec::with_capacity(end - start + 2);
                if self.strategy == ClipStrategy::Crossing && start > 0 {
                    let (inside, outside) = (points[start], points[start - 1]);
                    self.push_crossing(&mut section, inside, outside, manifold, stats);
                }
                section.extend_from_slice(&points[start..end]);
                if self.strategy == ClipStrategy::Crossing && end < points.len() {
                    let (inside, outside) = (points[end - 1], points[end]);
                    self.push_crossing(&mut section, inside, outside, manifold, stats);
                }

                if section.len() >= 2 {
                    sections.push(Polyline::new(section));
                } else {
                    stats.discarded_runs += 1;
                }
            }

            while i < points.len() && !visible[i] {
                i += 1;
            }
        }

        stats.sections_out += sections.len();
        sections
    }

    /// Locate the crossing on the edge from `inside` to `outside` and push
    /// it onto `section`. For an entering edge `section` is still empty,
    /// so the crossing ends up in front of the visible run.
    ///
    /// A crossing that lands on `inside` itself is skipped so sections
    /// never carry zero-length edges.
    fn push_crossing<M>(
        &self,
        section: &mut Vec<Point>,
        inside: Point,
        outside: Point,
        manifold: &M,
        stats: &mut ClipStats,
    ) where
        M: SwitchingManifold + ?Sized,
    {
        let Some(crossing) = self.crossing(inside, outside, manifold) else {
            stats.unavailable_crossings += 1;
            return;
        };
        if crossing.key() == inside.key() {
            return;
        }
        section.push(crossing);
        stats.crossings += 1;
    }

    /// Point on the edge `p0 -> p1` where the manifold vanishes.
    fn crossing<M>(&self, p0: Point, p1: Point, manifold: &M) -> Option<Point>
    where
        M: SwitchingManifold + ?Sized,
    {
        match solve_scalar(|t| manifold.value(p0.lerp(p1, t)), 0.5, self.newton) {
            Ok(t) if (-EDGE_SLACK..=1.0 + EDGE_SLACK).contains(&t) => {
                Some(p0.lerp(p1, t.clamp(0.0, 1.0)))
            }
            Ok(t) => {
                debug!("manifold crossing at t={t} lies outside the edge {p0:?} -> {p1:?}");
                None
            }
            Err(e) => {
                debug!("manifold crossing on edge {p0:?} -> {p1:?} unavailable: {e}");
                None
            }
        }
    }
}

/// Clip `polyline` with the canonical crossing strategy and default
/// solver settings.
#[must_use = "returns the visible sections"]
pub fn visible_sections<M>(polyline: &Polyline, mode: FieldMode, manifold: &M) -> Vec<Polyline>
where
    M: SwitchingManifold + ?Sized,
{
    ManifoldClipper::default()
        .clip(polyline, mode, manifold)
        .sections
}
