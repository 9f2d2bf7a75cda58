//! fieldlines-core: Streamline reconstruction and switching-manifold
//! clipping (sans-IO).
//!
//! Turns the unordered segment soup emitted by a streamline tracer into
//! a streamplot through:
//! reconstruct -> clip (piecewise-smooth fields only) -> place arrows.
//!
//! This crate has **no I/O dependencies**. It operates on in-memory
//! segments and returns structured data; parsing and writing files lives
//! in `fieldlines-export` and `fieldlines-io`.

pub mod arrow;
pub mod clip;
pub mod deque;
pub mod diagnostics;
pub mod key;
pub mod manifold;
pub mod pipeline;
pub mod reconstruct;
pub mod root;
pub mod stitch;
pub mod types;

pub use arrow::{generate_stream_arrows, midpoint_arrow};
pub use clip::{ClipStrategy, ManifoldClipper, visible_sections};
pub use deque::SpliceDeque;
pub use key::{PointKey, StitchKey};
pub use manifold::{AffineManifold, FieldMode, SwitchingManifold};
pub use pipeline::{Pipeline, StreamplotInput};
pub use reconstruct::{Reconstructor, reconstruct};
pub use stitch::{StitchError, StitchIndex};
pub use types::{
    Arrow, PipelineError, Point, Polyline, Segment, Streamline, Streamplot, StreamplotConfig,
};

/// Run the full streamline pipeline.
///
/// # Pipeline steps
///
/// 1. Validate `config`
/// 2. Stitch each field's segments into streamlines
/// 3. Clip each field's streamlines to its side of the manifold
///    (piecewise-smooth input only); field 0 sections come first
/// 4. Place one midpoint arrow per streamline
///
/// # Errors
///
/// Returns [`PipelineError::InvalidConfig`] if `config` is invalid.
/// Returns [`PipelineError::Stitch`] if the segments do not form simple
/// paths.
pub fn process<M: SwitchingManifold>(
    input: StreamplotInput<M>,
    config: &StreamplotConfig,
) -> Result<Streamplot, PipelineError> {
    Ok(Pipeline::new(input, config.clone())
        .reconstruct()?
        .clip()
        .place_arrows()
        .into_result())
}
