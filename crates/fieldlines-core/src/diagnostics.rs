//! Pipeline diagnostics: timing, counts, and other metrics for each stage.
//!
//! These diagnostics are permanent instrumentation for tuning the clip
//! strategy and solver settings against real tracer output. Call
//! [`process_with_diagnostics`] to collect them alongside the
//! [`Streamplot`].
//!
//! The core never reads a system clock itself. Timing goes through the
//! [`Clock`] trait, which the caller implements (the CLI backs it with
//! [`std::time::Instant`]).
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::manifold::SwitchingManifold;
use crate::pipeline::{Pipeline, StreamplotInput};
use crate::types::{PipelineError, Polyline, Streamplot, StreamplotConfig};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Source of monotonic timestamps for stage timing.
pub trait Clock {
    /// Opaque point in time.
    type Instant;

    /// The current instant.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Diagnostics collected from a single pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDiagnostics {
    /// Stage 1: segment stitching.
    pub reconstruct: StageDiagnostics,
    /// Stage 2: manifold clipping (only for piecewise-smooth input).
    pub clip: Option<StageDiagnostics>,
    /// Stage 3: arrow placement.
    pub arrows: StageDiagnostics,
    /// Total wall-clock duration of the entire pipeline (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts across all stages.
    pub summary: PipelineSummary,
}

/// Diagnostics for a single pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics that vary by pipeline stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Segment stitching metrics.
    Reconstruct {
        /// Segments offered, including singular ones.
        segments: usize,
        /// Zero-length segments dropped.
        singular: usize,
        /// Streamlines produced.
        streamlines: usize,
        /// Segments that bridged two partial lines.
        merges: usize,
        /// Streamlines closed into loops.
        closed_loops: usize,
        /// Total points across all streamlines.
        points: usize,
    },
    /// Manifold clipping metrics.
    Clip {
        /// Which clip strategy was used.
        strategy: String,
        /// Polylines examined.
        polylines_in: usize,
        /// Visible sections emitted.
        sections_out: usize,
        /// Crossing points inserted.
        crossings: usize,
        /// Crossings the solver could not place on their edge.
        unavailable_crossings: usize,
        /// Single-point runs dropped.
        discarded_runs: usize,
        /// Total points across all sections.
        points: usize,
    },
    /// Arrow placement metrics.
    Arrows {
        /// Minimum edge fraction applied.
        min_edge_fraction: f64,
        /// Polylines considered.
        polylines: usize,
        /// Arrows actually placed.
        placed: usize,
    },
}

/// High-level summary counts for the entire pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Segments in the input, across both fields.
    pub segment_count: usize,
    /// Streamlines in the final streamplot.
    pub streamline_count: usize,
    /// Arrows placed.
    pub arrow_count: usize,
    /// Points across all final streamlines.
    pub point_count: usize,
}

impl PipelineDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Pipeline Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!("Input: {} segments", self.summary.segment_count));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<24} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);

        let mut stages = vec![("Reconstruct", &self.reconstruct)];
        if let Some(ref clip) = self.clip {
            stages.push(("Clip", clip));
        }
        stages.push(("Arrows", &self.arrows));

        for (name, diag) in &stages {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<24} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.push(String::new());
        lines.push(format!(
            "Streamlines: {}  |  Arrows: {}  |  Points: {}",
            self.summary.streamline_count, self.summary.arrow_count, self.summary.point_count,
        ));

        lines.join("\n")
    }
}

/// Run the whole pipeline, timing each stage with `clock`.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] if `config` fails
/// validation and [`PipelineError::Stitch`] if the segments do not form
/// simple paths.
pub fn process_with_diagnostics<M, C>(
    input: StreamplotInput<M>,
    config: &StreamplotConfig,
    clock: &C,
) -> Result<(Streamplot, PipelineDiagnostics), PipelineError>
where
    M: SwitchingManifold,
    C: Clock,
{
    let segment_count = input.segment_count();
    let total_start = clock.now();

    let start = clock.now();
    let reconstructed = Pipeline::new(input, config.clone()).reconstruct()?;
    let reconstruct = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: reconstructed.metrics(),
    };

    let start = clock.now();
    let clipped = reconstructed.clip();
    let clip = clipped.metrics().map(|metrics| StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics,
    });

    let start = clock.now();
    let placed = clipped.place_arrows();
    let arrows = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: placed.metrics(),
    };

    let streamplot = placed.into_result();
    let total_duration = clock.elapsed(&total_start);

    let summary = PipelineSummary {
        segment_count,
        streamline_count: streamplot.streamlines.len(),
        arrow_count: streamplot.placed_arrows().count(),
        point_count: total_points(&streamplot.streamlines),
    };

    Ok((
        streamplot,
        PipelineDiagnostics {
            reconstruct,
            clip,
            arrows,
            total_duration,
            summary,
        },
    ))
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Reconstruct {
            segments,
            singular,
            streamlines,
            merges,
            closed_loops,
            points,
        } => {
            format!(
                "{segments} segs ({singular} singular) -> {streamlines} lines, {points} pts, merges={merges} loops={closed_loops}",
            )
        }
        StageMetrics::Clip {
            strategy,
            polylines_in,
            sections_out,
            crossings,
            unavailable_crossings,
            discarded_runs,
            points,
        } => {
            format!(
                "{strategy} {polylines_in}->{sections_out} sections, {points} pts, crossings={crossings} unavailable={unavailable_crossings} dropped={discarded_runs}",
            )
        }
        StageMetrics::Arrows {
            min_edge_fraction,
            polylines,
            placed,
        } => {
            format!("eps={min_edge_fraction:.3} {placed}/{polylines} placed")
        }
    }
}

/// Total points across a slice of polylines.
pub(crate) fn total_points(polylines: &[Polyline]) -> usize {
    polylines.iter().map(Polyline::len).sum()
}
