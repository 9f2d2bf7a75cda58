//! Incremental pipeline: advance stage-by-stage, inspecting each
//! intermediate result before continuing.
//!
//! Unlike [`crate::process`] which runs the entire pipeline in one call,
//! [`Pipeline`] lets the caller drive execution one step at a time:
//!
//! ```rust
//! # use fieldlines_core::{Pipeline, PipelineError, Point, Segment, StreamplotConfig, StreamplotInput};
//! # fn main() -> Result<(), PipelineError> {
//! let segments = vec![
//!     Segment::new(Point::new(1.0, 0.0), Point::new(2.0, 0.0)),
//!     Segment::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0)),
//! ];
//! let input: StreamplotInput = StreamplotInput::Smooth { segments };
//! let streamplot = Pipeline::new(input, StreamplotConfig::default())
//!     .reconstruct()?
//!     .clip()
//!     .place_arrows()
//!     .into_result();
//!
//! assert_eq!(streamplot.streamlines.len(), 1);
//! assert_eq!(streamplot.streamlines[0].len(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! Each stage method consumes `self` and returns the next pipeline state
//! (or `Result` for the fallible reconstruction stage). The caller can
//! inspect the current stage's output via accessor methods at any point.

use log::warn;

use crate::arrow::generate_stream_arrows;
use crate::clip::ClipStats;
use crate::diagnostics::{StageMetrics, total_points};
use crate::manifold::{AffineManifold, FieldMode, SwitchingManifold};
use crate::reconstruct::{ReconstructStats, Reconstructor};
use crate::stitch::StitchError;
use crate::types::{
    Arrow, PipelineError, Polyline, Segment, Streamline, Streamplot, StreamplotConfig,
};

/// Traced segments for one streamplot.
///
/// A smooth field produces one segment soup. A piecewise-smooth field
/// produces one soup per component field, each traced over the whole
/// plane, plus the switching manifold that separates them.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamplotInput<M = AffineManifold> {
    /// Segments of a single smooth field; nothing is clipped.
    Smooth {
        /// Segments in any order.
        segments: Vec<Segment>,
    },
    /// Segments of both component fields of a Filippov system.
    PiecewiseSmooth {
        /// Segments traced through field 0 (valid where `S <= 0`).
        field0: Vec<Segment>,
        /// Segments traced through field 1 (valid where `S >= 0`).
        field1: Vec<Segment>,
        /// The switching manifold `S`.
        manifold: M,
    },
}

impl<M> StreamplotInput<M> {
    /// Total number of segments across all fields.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        match self {
            Self::Smooth { segments } => segments.len(),
            Self::PiecewiseSmooth { field0, field1, .. } => field0.len() + field1.len(),
        }
    }
}

/// Streamlines reconstructed from one field's segments.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructedField {
    /// Component field the segments came from; `None` for a smooth field.
    pub mode: Option<FieldMode>,
    /// Reconstructed streamlines.
    pub streamlines: Vec<Streamline>,
    /// Stitching counts for this field.
    pub stats: ReconstructStats,
}

fn reconstruct_field(
    mode: Option<FieldMode>,
    segments: &[Segment],
) -> Result<ReconstructedField, StitchError> {
    let mut reconstructor = Reconstructor::new();
    for segment in segments {
        reconstructor.add_segment(segment)?;
    }
    let stats = reconstructor.stats();
    Ok(ReconstructedField {
        mode,
        streamlines: reconstructor.finish(),
        stats,
    })
}

// ───────────────────────── Stage 0: Pending ──────────────────────────

/// Pipeline state before any processing has occurred.
///
/// Call [`reconstruct`](Self::reconstruct) to advance to the next stage.
#[must_use = "pipeline stages are consumed by advancing; call .reconstruct() to continue"]
pub struct Pending<M = AffineManifold> {
    config: StreamplotConfig,
    input: StreamplotInput<M>,
}

impl<M> Pending<M> {
    /// The traced input segments.
    #[must_use]
    pub const fn input(&self) -> &StreamplotInput<M> {
        &self.input
    }

    /// Validate the configuration and stitch every field's segments
    /// into streamlines.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if the configuration is
    /// invalid, and [`PipelineError::Stitch`] if the segments of either
    /// field do not form simple paths.
    pub fn reconstruct(self) -> Result<Reconstructed<M>, PipelineError> {
        let Self { config, input } = self;
        config.validate()?;

        let (fields, manifold) = match input {
            StreamplotInput::Smooth { segments } => {
                (vec![reconstruct_field(None, &segments)?], None)
            }
            StreamplotInput::PiecewiseSmooth {
                field0,
                field1,
                manifold,
            } => (
                vec![
                    reconstruct_field(Some(FieldMode::Lower), &field0)?,
                    reconstruct_field(Some(FieldMode::Upper), &field1)?,
                ],
                Some(manifold),
            ),
        };

        Ok(Reconstructed {
            config,
            fields,
            manifold,
        })
    }
}

// ───────────────────────── Stage 1: Reconstructed ────────────────────

/// Pipeline state after segment stitching.
///
/// Call [`clip`](Self::clip) to advance to the next stage.
#[must_use = "pipeline stages are consumed by advancing; call .clip() to continue"]
pub struct Reconstructed<M = AffineManifold> {
    config: StreamplotConfig,
    fields: Vec<ReconstructedField>,
    manifold: Option<M>,
}

impl<M> Reconstructed<M> {
    /// Reconstructed streamlines, one entry per input field.
    #[must_use]
    pub fn fields(&self) -> &[ReconstructedField] {
        &self.fields
    }

    /// Stitching counts summed over all fields.
    #[must_use]
    pub fn stats(&self) -> ReconstructStats {
        let mut total = ReconstructStats::default();
        for field in &self.fields {
            total += field.stats;
        }
        total
    }

    /// Metrics for this stage.
    #[must_use]
    pub fn metrics(&self) -> StageMetrics {
        let stats = self.stats();
        let streamlines = self.fields.iter().flat_map(|f| &f.streamlines);
        let (mut count, mut points) = (0, 0);
        for streamline in streamlines {
            count += 1;
            points += streamline.polyline.len();
        }
        StageMetrics::Reconstruct {
            segments: stats.segments,
            singular: stats.singular,
            streamlines: count,
            merges: stats.merged,
            closed_loops: stats.closed,
            points,
        }
    }
}

impl<M: SwitchingManifold> Reconstructed<M> {
    /// Clip each field's streamlines to the side of the manifold where
    /// that field is valid.
    ///
    /// Sections of field 0 come first, then those of field 1. Smooth
    /// input passes through unchanged.
    pub fn clip(self) -> Clipped {
        let Self {
            config,
            fields,
            manifold,
        } = self;

        let clipper = config.clipper();
        let mut sections = Vec::new();
        let mut stats: Option<ClipStats> = None;

        for field in fields {
            let polylines: Vec<Polyline> = field
                .streamlines
                .into_iter()
                .map(|s| s.polyline)
                .collect();
            match (field.mode, manifold.as_ref()) {
                (Some(mode), Some(manifold)) => {
                    let clipped = clipper.clip_all(&polylines, mode, manifold);
                    sections.extend(clipped.sections);
                    *stats.get_or_insert_with(ClipStats::default) += clipped.stats;
                }
                _ => sections.extend(polylines),
            }
        }

        if let Some(stats) = stats
            && stats.unavailable_crossings > 0
        {
            warn!(
                "{} manifold crossings could not be located; those sections end at their last visible vertex",
                stats.unavailable_crossings,
            );
        }

        Clipped {
            config,
            sections,
            stats,
        }
    }
}

// ───────────────────────── Stage 2: Clipped ──────────────────────────

/// Pipeline state after manifold clipping.
///
/// Call [`place_arrows`](Self::place_arrows) to advance to the next stage.
#[must_use = "pipeline stages are consumed by advancing; call .place_arrows() to continue"]
pub struct Clipped {
    config: StreamplotConfig,
    sections: Vec<Polyline>,
    stats: Option<ClipStats>,
}

impl Clipped {
    /// The visible streamline sections.
    #[must_use]
    pub fn sections(&self) -> &[Polyline] {
        &self.sections
    }

    /// Clipping counts, or `None` if nothing was clipped.
    #[must_use]
    pub const fn stats(&self) -> Option<ClipStats> {
        self.stats
    }

    /// Metrics for this stage, or `None` if nothing was clipped.
    #[must_use]
    pub fn metrics(&self) -> Option<StageMetrics> {
        self.stats.map(|stats| StageMetrics::Clip {
            strategy: format!("{:?}", self.config.clip_strategy),
            polylines_in: stats.polylines_in,
            sections_out: stats.sections_out,
            crossings: stats.crossings,
            unavailable_crossings: stats.unavailable_crossings,
            discarded_runs: stats.discarded_runs,
            points: total_points(&self.sections),
        })
    }

    /// Place a direction arrow on every section.
    pub fn place_arrows(self) -> ArrowsPlaced {
        let arrows = generate_stream_arrows(&self.sections, self.config.min_arrow_fraction);
        ArrowsPlaced {
            min_edge_fraction: self.config.min_arrow_fraction,
            streamlines: self.sections,
            arrows,
        }
    }
}

// ───────────────────────── Stage 3: ArrowsPlaced ─────────────────────

/// Final pipeline state.
///
/// Call [`into_result`](Self::into_result) to extract the [`Streamplot`].
#[must_use = "call .into_result() to extract the Streamplot"]
pub struct ArrowsPlaced {
    min_edge_fraction: f64,
    streamlines: Vec<Polyline>,
    arrows: Vec<Option<Arrow>>,
}

impl ArrowsPlaced {
    /// One arrow slot per streamline.
    #[must_use]
    pub fn arrows(&self) -> &[Option<Arrow>] {
        &self.arrows
    }

    /// Metrics for this stage.
    #[must_use]
    pub fn metrics(&self) -> StageMetrics {
        StageMetrics::Arrows {
            min_edge_fraction: self.min_edge_fraction,
            polylines: self.streamlines.len(),
            placed: self.arrows.iter().flatten().count(),
        }
    }

    /// Consume the pipeline and return the [`Streamplot`].
    #[must_use]
    pub fn into_result(self) -> Streamplot {
        Streamplot {
            streamlines: self.streamlines,
            arrows: self.arrows,
        }
    }
}

/// Entry point for the staged pipeline.
pub struct Pipeline;

impl Pipeline {
    /// Create a new pipeline from traced segments and config.
    ///
    /// No processing is performed. Call
    /// [`.reconstruct()`](Pending::reconstruct) to begin.
    #[allow(clippy::new_ret_no_self)]
    pub const fn new<M>(input: StreamplotInput<M>, config: StreamplotConfig) -> Pending<M> {
        Pending { config, input }
    }
}
