//! fieldlines-export: Pure text serializers and parsers (sans-IO)
//!
//! Converts streamplots to the `.dat` text formats consumed by plotting
//! tools, and parses the segment soup produced by external tracers.
//! Filesystem access lives in `fieldlines-io`.

pub mod arrows;
pub mod record;
pub mod segments;
pub mod streamlines;

pub use arrows::{parse_arrows, to_arrows};
pub use record::ParseError;
pub use segments::{parse_segments, to_segments};
pub use streamlines::{parse_streamlines, to_streamlines};
