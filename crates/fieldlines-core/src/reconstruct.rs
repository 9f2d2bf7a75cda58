//! Streamline reconstruction: stitch an unordered segment soup into
//! maximal polylines.
//!
//! A streamline tracer emits many short directed segments in no
//! particular order. Consecutive segments of one streamline share an
//! endpoint with an identical bit pattern, so each incoming segment
//! `a -> b` can be placed with two O(1) lookups in a [`StitchIndex`]:
//!
//! | line begins at `b` | line ends at `a` | action |
//! |---|---|---|
//! | yes | yes | splice the two lines through the segment |
//! | yes | no | prepend `a` to the line beginning at `b` |
//! | no | yes | append `b` to the line ending at `a` |
//! | no | no | start a new line `[a, b]` |
//!
//! When both lookups hit the *same* line the segment closes a loop; the
//! line is marked closed and left as it is.

use std::ops::AddAssign;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::key::StitchKey;
use crate::stitch::{PartialLine, StitchError, StitchIndex};
use crate::types::{Polyline, Segment, Streamline};

/// Counts describing what happened to each segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconstructStats {
    /// Segments offered to the reconstructor.
    pub segments: usize,
    /// Zero-length segments that were dropped.
    pub singular: usize,
    /// Segments that started a new line.
    pub created: usize,
    /// Segments prepended to an existing line.
    pub extended_front: usize,
    /// Segments appended to an existing line.
    pub extended_back: usize,
    /// Segments that bridged two lines into one.
    pub merged: usize,
    /// Segments that closed a line into a loop.
    pub closed: usize,
}

impl AddAssign for ReconstructStats {
    fn add_assign(&mut self, rhs: Self) {
        self.segments += rhs.segments;
        self.singular += rhs.singular;
        self.created += rhs.created;
        self.extended_front += rhs.extended_front;
        self.extended_back += rhs.extended_back;
        self.merged += rhs.merged;
        self.closed += rhs.closed;
    }
}

/// Incremental segment stitcher.
///
/// Feed segments with [`add_segment`](Self::add_segment) in any order,
/// then call [`finish`](Self::finish) to obtain the polylines.
#[derive(Debug, Default)]
pub struct Reconstructor {
    index: StitchIndex,
    stats: ReconstructStats,
}

impl Reconstructor {
    /// Create an empty reconstructor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts accumulated so far.
    #[must_use]
    pub const fn stats(&self) -> ReconstructStats {
        self.stats
    }

    /// Stitch one segment into the lines built so far.
    ///
    /// # Errors
    ///
    /// Returns a [`StitchError`] if the segment would give some point
    /// more than one free line end on the same side, or would extend a
    /// closed loop. The segments seen so far do not form simple paths in
    /// that case, and the reconstructor should be discarded.
    pub fn add_segment(&mut self, segment: &Segment) -> Result<(), StitchError> {
        self.stats.segments += 1;
        if segment.is_singular() {
            self.stats.singular += 1;
            trace!("dropping singular segment at {}", segment.start.key());
            return Ok(());
        }

        let StitchKey { front: ka, back: kb } = segment.key();
        let begins_at_end = self.index.has_beginning_at(kb);
        let ends_at_start = self.index.has_ending_at(ka);

        match (begins_at_end, ends_at_start) {
            (true, true) if self.index.is_same_line(kb, ka) => {
                self.index.close_loop(kb)?;
                self.stats.closed += 1;
                trace!("segment closes a loop through {kb}");
            }
            (true, true) => {
                let (back_key, mut back_part) = self.index.take_beginning_at(kb)?;
                let (front_key, mut front_part) = self.index.take_ending_at(ka)?;
                front_part.splice_back(&mut back_part);
                self.index
                    .insert(StitchKey::new(front_key.front, back_key.back), front_part)?;
                self.stats.merged += 1;
            }
            (true, false) => {
                let (key, mut line) = self.index.take_beginning_at(kb)?;
                line.push_front(segment.start);
                self.index.insert(StitchKey::new(ka, key.back), line)?;
                self.stats.extended_front += 1;
            }
            (false, true) => {
                let (key, mut line) = self.index.take_ending_at(ka)?;
                line.push_back(segment.end);
                self.index.insert(StitchKey::new(key.front, kb), line)?;
                self.stats.extended_back += 1;
            }
            (false, false) => {
                let mut line = PartialLine::new();
                line.push_back(segment.start);
                line.push_back(segment.end);
                self.index.insert(StitchKey::new(ka, kb), line)?;
                self.stats.created += 1;
            }
        }
        Ok(())
    }

    /// Drain every line into a finished [`Streamline`].
    ///
    /// Each line appears exactly once. The order across lines follows
    /// insertion into the index and is not meaningful; callers that need
    /// a stable order should sort the result.
    #[must_use]
    pub fn finish(self) -> Vec<Streamline> {
        let stats = self.stats;
        let streamlines: Vec<Streamline> = self
            .index
            .into_lines()
            .into_iter()
            .map(|(mut line, closed)| Streamline {
                polyline: Polyline::new(line.drain_to_vec()),
                closed,
            })
            .collect();
        debug!(
            "reconstructed {} streamlines from {} segments ({} singular, {} merges, {} loops)",
            streamlines.len(),
            stats.segments,
            stats.singular,
            stats.merged,
            stats.closed,
        );
        streamlines
    }
}

/// Stitch `segments` into streamlines in one call.
///
/// # Errors
///
/// Returns the first [`StitchError`] raised by
/// [`Reconstructor::add_segment`].
pub fn reconstruct<'a, I>(segments: I) -> Result<Vec<Streamline>, StitchError>
where
    I: IntoIterator<Item = &'a Segment>,
{
    let mut reconstructor = Reconstructor::new();
    for segment in segments {
        reconstructor.add_segment(segment)?;
    }
    Ok(reconstructor.finish())
}
