//! Two-sided registry of lines under construction.
//!
//! [`StitchIndex`] owns every partial line while segments are being
//! stitched and answers two questions in O(1): "which line begins at this
//! point?" and "which line ends at this point?". Both lookup maps are
//! updated together on every insert and take, so they always describe
//! each line's *current* free ends.

use std::collections::{BTreeMap, HashMap};

use crate::deque::SpliceDeque;
use crate::key::{PointKey, StitchKey};
use crate::types::Point;

/// A polyline under construction.
pub type PartialLine = SpliceDeque<Point>;

/// Segment topology that cannot be stitched into simple paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StitchError {
    /// Two lines would share the same free front end.
    #[error("more than one line begins at {0}")]
    DuplicateFront(PointKey),

    /// Two lines would share the same free back end.
    #[error("more than one line ends at {0}")]
    DuplicateBack(PointKey),

    /// A take was issued for a front end nobody owns.
    #[error("no line begins at {0}")]
    NoLineBeginningAt(PointKey),

    /// A take was issued for a back end nobody owns.
    #[error("no line ends at {0}")]
    NoLineEndingAt(PointKey),

    /// A segment tried to extend a line that already forms a loop.
    #[error("segment touches the closed loop through {0}")]
    ClosedLoop(PointKey),
}

/// Registry-internal handle; never leaves this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct LineId(usize);

#[derive(Debug)]
struct Entry {
    key: StitchKey,
    line: PartialLine,
    closed: bool,
}

/// Lines under construction, indexed by both free ends.
///
/// Each [`PointKey`] is the front of at most one line and the back of at
/// most one line. Violations are reported as [`StitchError`] instead of
/// silently overwriting an entry.
#[derive(Debug, Default)]
pub struct StitchIndex {
    lines: BTreeMap<LineId, Entry>,
    beginning_at: HashMap<PointKey, LineId>,
    ending_at: HashMap<PointKey, LineId>,
    next_id: usize,
}

impl StitchIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lines currently registered, closed loops included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if no line is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Register `line` under both of its free ends.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::DuplicateFront`] or
    /// [`StitchError::DuplicateBack`] if another line already owns one of
    /// the ends. The index is left unchanged in that case.
    pub fn insert(&mut self, key: StitchKey, line: PartialLine) -> Result<(), StitchError> {
        if self.beginning_at.contains_key(&key.front) {
            return Err(StitchError::DuplicateFront(key.front));
        }
        if self.ending_at.contains_key(&key.back) {
            return Err(StitchError::DuplicateBack(key.back));
        }

        let id = LineId(self.next_id);
        self.next_id += 1;
        self.beginning_at.insert(key.front, id);
        self.ending_at.insert(key.back, id);
        self.lines.insert(
            id,
            Entry {
                key,
                line,
                closed: false,
            },
        );
        Ok(())
    }

    /// Returns `true` if some line begins at `key`.
    #[must_use]
    pub fn has_beginning_at(&self, key: PointKey) -> bool {
        self.beginning_at.contains_key(&key)
    }

    /// Returns `true` if some line ends at `key`.
    #[must_use]
    pub fn has_ending_at(&self, key: PointKey) -> bool {
        self.ending_at.contains_key(&key)
    }

    /// Returns `true` if the line beginning at `front` is the very line
    /// ending at `back`.
    #[must_use]
    pub fn is_same_line(&self, front: PointKey, back: PointKey) -> bool {
        match (self.beginning_at.get(&front), self.ending_at.get(&back)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Remove and return the line whose front end is `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::NoLineBeginningAt`] if no line begins at
    /// `key`, and [`StitchError::ClosedLoop`] if that line has been
    /// closed (closed loops have no free ends to extend).
    pub fn take_beginning_at(
        &mut self,
        key: PointKey,
    ) -> Result<(StitchKey, PartialLine), StitchError> {
        let id = *self
            .beginning_at
            .get(&key)
            .ok_or(StitchError::NoLineBeginningAt(key))?;
        self.take(id, key)
    }

    /// Remove and return the line whose back end is `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::NoLineEndingAt`] if no line ends at `key`,
    /// and [`StitchError::ClosedLoop`] if that line has been closed.
    pub fn take_ending_at(
        &mut self,
        key: PointKey,
    ) -> Result<(StitchKey, PartialLine), StitchError> {
        let id = *self
            .ending_at
            .get(&key)
            .ok_or(StitchError::NoLineEndingAt(key))?;
        self.take(id, key)
    }

    /// Mark the line beginning at `front` as a closed loop.
    ///
    /// The line keeps its points and both map entries; any later attempt
    /// to take it fails with [`StitchError::ClosedLoop`].
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::NoLineBeginningAt`] if no line begins at
    /// `front`, or [`StitchError::ClosedLoop`] if it was already closed.
    pub fn close_loop(&mut self, front: PointKey) -> Result<(), StitchError> {
        let id = *self
            .beginning_at
            .get(&front)
            .ok_or(StitchError::NoLineBeginningAt(front))?;
        let entry = self
            .lines
            .get_mut(&id)
            .ok_or(StitchError::NoLineBeginningAt(front))?;
        if entry.closed {
            return Err(StitchError::ClosedLoop(front));
        }
        entry.closed = true;
        Ok(())
    }

    /// Consume the index, returning every line once together with its
    /// closed flag, ordered by when each line was last inserted.
    #[must_use]
    pub fn into_lines(self) -> Vec<(PartialLine, bool)> {
        debug_assert_eq!(self.beginning_at.len(), self.lines.len());
        debug_assert_eq!(self.ending_at.len(), self.lines.len());
        self.lines
            .into_values()
            .map(|entry| (entry.line, entry.closed))
            .collect()
    }

    fn take(
        &mut self,
        id: LineId,
        requested: PointKey,
    ) -> Result<(StitchKey, PartialLine), StitchError> {
        if self.lines.get(&id).is_some_and(|entry| entry.closed) {
            return Err(StitchError::ClosedLoop(requested));
        }
        let entry = self
            .lines
            .remove(&id)
            .ok_or(StitchError::NoLineBeginningAt(requested))?;
        self.beginning_at.remove(&entry.key.front);
        self.ending_at.remove(&entry.key.back);
        Ok((entry.key, entry.line))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn key(x: f64) -> PointKey {
        Point::new(x, 0.0).key()
    }

    fn line(xs: &[f64]) -> PartialLine {
        xs.iter().map(|&x| Point::new(x, 0.0)).collect()
    }

    #[test]
    fn insert_registers_both_ends() {
        let mut index = StitchIndex::new();
        index
            .insert(StitchKey::new(key(0.0), key(1.0)), line(&[0.0, 1.0]))
            .unwrap();
        assert!(index.has_beginning_at(key(0.0)));
        assert!(index.has_ending_at(key(1.0)));
        assert!(!index.has_beginning_at(key(1.0)));
        assert!(!index.has_ending_at(key(0.0)));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn take_beginning_removes_both_ends() {
        let mut index = StitchIndex::new();
        let k = StitchKey::new(key(0.0), key(1.0));
        index.insert(k, line(&[0.0, 1.0])).unwrap();

        let (taken_key, taken) = index.take_beginning_at(key(0.0)).unwrap();
        assert_eq!(taken_key, k);
        assert_eq!(taken, line(&[0.0, 1.0]));
        assert!(!index.has_beginning_at(key(0.0)));
        assert!(!index.has_ending_at(key(1.0)));
        assert!(index.is_empty());
    }

    #[test]
    fn take_ending_removes_both_ends() {
        let mut index = StitchIndex::new();
        index
            .insert(StitchKey::new(key(0.0), key(1.0)), line(&[0.0, 1.0]))
            .unwrap();
        let (taken_key, _) = index.take_ending_at(key(1.0)).unwrap();
        assert_eq!(taken_key.front, key(0.0));
        assert!(index.is_empty());
    }

    #[test]
    fn take_missing_key_is_an_error() {
        let mut index = StitchIndex::new();
        assert_eq!(
            index.take_beginning_at(key(3.0)).unwrap_err(),
            StitchError::NoLineBeginningAt(key(3.0)),
        );
        assert_eq!(
            index.take_ending_at(key(3.0)).unwrap_err(),
            StitchError::NoLineEndingAt(key(3.0)),
        );
    }

    #[test]
    fn key_may_be_front_of_one_line_and_back_of_another() {
        let mut index = StitchIndex::new();
        index
            .insert(StitchKey::new(key(0.0), key(1.0)), line(&[0.0, 1.0]))
            .unwrap();
        index
            .insert(StitchKey::new(key(2.0), key(0.0)), line(&[2.0, 0.0]))
            .unwrap();
        assert!(index.has_beginning_at(key(0.0)));
        assert!(index.has_ending_at(key(0.0)));
        assert!(!index.is_same_line(key(0.0), key(0.0)));
    }

    #[test]
    fn duplicate_front_is_rejected_without_corruption() {
        let mut index = StitchIndex::new();
        index
            .insert(StitchKey::new(key(0.0), key(1.0)), line(&[0.0, 1.0]))
            .unwrap();
        let err = index
            .insert(StitchKey::new(key(0.0), key(2.0)), line(&[0.0, 2.0]))
            .unwrap_err();
        assert_eq!(err, StitchError::DuplicateFront(key(0.0)));
        assert!(!index.has_ending_at(key(2.0)));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn duplicate_back_is_rejected() {
        let mut index = StitchIndex::new();
        index
            .insert(StitchKey::new(key(0.0), key(1.0)), line(&[0.0, 1.0]))
            .unwrap();
        let err = index
            .insert(StitchKey::new(key(5.0), key(1.0)), line(&[5.0, 1.0]))
            .unwrap_err();
        assert_eq!(err, StitchError::DuplicateBack(key(1.0)));
    }

    #[test]
    fn same_line_detection() {
        let mut index = StitchIndex::new();
        index
            .insert(StitchKey::new(key(0.0), key(1.0)), line(&[0.0, 1.0]))
            .unwrap();
        assert!(index.is_same_line(key(0.0), key(1.0)));
        assert!(!index.is_same_line(key(1.0), key(0.0)));
    }

    #[test]
    fn closed_loop_cannot_be_taken() {
        let mut index = StitchIndex::new();
        index
            .insert(StitchKey::new(key(0.0), key(1.0)), line(&[0.0, 1.0]))
            .unwrap();
        index.close_loop(key(0.0)).unwrap();
        assert_eq!(
            index.take_ending_at(key(1.0)).unwrap_err(),
            StitchError::ClosedLoop(key(1.0)),
        );
        assert_eq!(
            index.close_loop(key(0.0)).unwrap_err(),
            StitchError::ClosedLoop(key(0.0)),
        );
        let lines = index.into_lines();
        assert_eq!(lines, vec![(line(&[0.0, 1.0]), true)]);
    }

    #[test]
    fn into_lines_returns_each_line_once_in_insertion_order() {
        let mut index = StitchIndex::new();
        index
            .insert(StitchKey::new(key(0.0), key(1.0)), line(&[0.0, 1.0]))
            .unwrap();
        index
            .insert(StitchKey::new(key(5.0), key(6.0)), line(&[5.0, 6.0]))
            .unwrap();
        let lines = index.into_lines();
        assert_eq!(
            lines,
            vec![(line(&[0.0, 1.0]), false), (line(&[5.0, 6.0]), false)],
        );
    }
}
