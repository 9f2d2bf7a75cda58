//! Shared types for the fieldlines streamline pipeline.

use serde::{Deserialize, Serialize};

use crate::clip::{ClipStrategy, ManifoldClipper};
use crate::key::{PointKey, StitchKey};
use crate::root::NewtonSettings;
use crate::stitch::StitchError;

/// A 2D point in phase-plane coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// First state coordinate.
    pub x: f64,
    /// Second state coordinate.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Exact identity key of this point (see [`PointKey`]).
    #[must_use]
    pub const fn key(self) -> PointKey {
        PointKey::of(self)
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Point at parameter `t` along the segment from `self` to `other`.
    ///
    /// `t = 0` yields `self`, `t = 1` yields `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            t.mul_add(other.x - self.x, self.x),
            t.mul_add(other.y - self.y, self.y),
        )
    }
}

/// A sequence of connected points forming a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline(Vec<Point>);

impl Polyline {
    /// Create a new polyline from a vector of points.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Returns `true` if the polyline has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of points in the polyline.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the first point, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Point> {
        self.0.first()
    }

    /// Returns the last point, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Point> {
        self.0.last()
    }

    /// Returns a slice of all points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Consumes the polyline and returns the underlying vector of points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }
}

/// A directed line segment as emitted by an external streamline tracer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Where the tracer started the segment.
    pub start: Point,
    /// Where the tracer ended the segment.
    pub end: Point,
}

impl Segment {
    /// Create a new directed segment.
    #[must_use]
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Endpoint keys of the segment as `(start, end)`.
    #[must_use]
    pub const fn key(&self) -> StitchKey {
        StitchKey::new(self.start.key(), self.end.key())
    }

    /// Returns `true` if both endpoints have identical bit patterns.
    ///
    /// Singular segments carry no direction and are dropped before
    /// stitching.
    #[must_use]
    pub fn is_singular(&self) -> bool {
        self.start.key() == self.end.key()
    }
}

/// A polyline produced by stitching, together with its topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Streamline {
    /// Points in travel order.
    pub polyline: Polyline,
    /// `true` when a segment joined the last point back to the first.
    ///
    /// The closing edge is implicit: the first point is not repeated.
    pub closed: bool,
}

/// Short oriented segment centred on a polyline's arc-length midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arrow {
    /// Start of the arrow shaft.
    pub tail: Point,
    /// Arc-length midpoint of the annotated polyline.
    pub mid: Point,
    /// Arrowhead position.
    pub head: Point,
}

/// Finished streamlines and their direction arrows.
///
/// `arrows` holds one entry per element of `streamlines`, in the same
/// order; polylines too short to carry an arrow have `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Streamplot {
    /// Visible streamlines.
    pub streamlines: Vec<Polyline>,
    /// Direction arrow for each streamline.
    pub arrows: Vec<Option<Arrow>>,
}

impl Streamplot {
    /// Arrows that were actually placed, skipping absent entries.
    pub fn placed_arrows(&self) -> impl Iterator<Item = &Arrow> {
        self.arrows.iter().flatten()
    }
}

/// Configuration for the streamline pipeline.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamplotConfig {
    /// How reconstructed lines are cut at the switching manifold.
    pub clip_strategy: ClipStrategy,

    /// Minimum fraction of the midpoint edge kept on either side of an
    /// arrow's midpoint. Must lie in `[0, 0.5]`.
    pub min_arrow_fraction: f64,

    /// Absolute residual below which a manifold crossing is accepted.
    pub root_tolerance: f64,

    /// Iteration cap for the manifold crossing solver.
    pub root_max_iterations: usize,
}

impl StreamplotConfig {
    /// Default minimum arrow edge fraction.
    pub const DEFAULT_MIN_ARROW_FRACTION: f64 = 0.01;

    /// Default residual tolerance for crossing points.
    pub const DEFAULT_ROOT_TOLERANCE: f64 = 1e-12;

    /// Default iteration cap for crossing points.
    pub const DEFAULT_ROOT_MAX_ITERATIONS: usize = 50;

    /// Check the invariants the pipeline relies on.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if `min_arrow_fraction`
    /// is not a finite value in `[0, 0.5]`, if `root_tolerance` is not
    /// finite and positive, or if `root_max_iterations` is zero.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !(0.0..=0.5).contains(&self.min_arrow_fraction) {
            return Err(PipelineError::InvalidConfig(format!(
                "min_arrow_fraction must be within [0, 0.5], got {}",
                self.min_arrow_fraction
            )));
        }
        if !self.root_tolerance.is_finite() || self.root_tolerance <= 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "root_tolerance must be finite and positive, got {}",
                self.root_tolerance
            )));
        }
        if self.root_max_iterations == 0 {
            return Err(PipelineError::InvalidConfig(
                "root_max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Clipper configured from the strategy and solver settings.
    #[must_use]
    pub const fn clipper(&self) -> ManifoldClipper {
        ManifoldClipper::new(
            self.clip_strategy,
            NewtonSettings {
                max_steps: self.root_max_iterations,
                tolerance: self.root_tolerance,
            },
        )
    }
}

impl Default for StreamplotConfig {
    fn default() -> Self {
        Self {
            clip_strategy: ClipStrategy::default(),
            min_arrow_fraction: Self::DEFAULT_MIN_ARROW_FRACTION,
            root_tolerance: Self::DEFAULT_ROOT_TOLERANCE,
            root_max_iterations: Self::DEFAULT_ROOT_MAX_ITERATIONS,
        }
    }
}

/// Errors that can occur while building a streamplot.
///
/// Uses custom `Serialize`/`Deserialize` so diagnostics consumers can
/// carry failures as JSON. The `Stitch` variant is serialized as its
/// `Display` string.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The traced segments do not form simple paths.
    #[error("malformed segment topology: {0}")]
    Stitch(#[from] StitchError),

    /// Pipeline configuration is invalid.
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),
}

/// Serde-compatible proxy for `PipelineError`.
///
/// `StitchError` carries point keys that are meaningless outside the
/// process, so the proxy stores its message instead.
#[derive(Serialize, Deserialize)]
enum PipelineErrorProxy {
    Stitch(String),
    InvalidConfig(String),
}

impl Serialize for PipelineError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let proxy = match self {
            Self::Stitch(e) => PipelineErrorProxy::Stitch(e.to_string()),
            Self::InvalidConfig(s) => PipelineErrorProxy::InvalidConfig(s.clone()),
        };
        proxy.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PipelineError {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let proxy = PipelineErrorProxy::deserialize(deserializer)?;
        Ok(match proxy {
            // The typed stitch error cannot be rebuilt from its message.
            PipelineErrorProxy::Stitch(msg) => {
                Self::InvalidConfig(format!("malformed segment topology: {msg}"))
            }
            PipelineErrorProxy::InvalidConfig(s) => Self::InvalidConfig(s),
        })
    }
}
