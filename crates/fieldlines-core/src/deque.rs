//! Double-ended sequence with constant-time splicing.
//!
//! Lines under construction grow at both ends and are merged with other
//! lines whenever a segment bridges two free ends. [`SpliceDeque`] keeps
//! every one of those operations O(1) by relinking list nodes rather than
//! copying elements; only [`drain_to_vec`](SpliceDeque::drain_to_vec)
//! touches every element.

use std::collections::LinkedList;

/// A doubly linked sequence supporting O(1) push, pop, and splice at
/// both ends.
///
/// Accessors on an empty sequence return `None`; popping an empty
/// sequence is a no-op that returns `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpliceDeque<T> {
    nodes: LinkedList<T>,
}

impl<T> SpliceDeque<T> {
    /// Create an empty sequence.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: LinkedList::new(),
        }
    }

    /// Returns `true` if the sequence holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Insert `value` before the current front.
    pub fn push_front(&mut self, value: T) {
        self.nodes.push_front(value);
    }

    /// Insert `value` after the current back.
    pub fn push_back(&mut self, value: T) {
        self.nodes.push_back(value);
    }

    /// The first element, if any.
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        self.nodes.front()
    }

    /// The last element, if any.
    #[must_use]
    pub fn back(&self) -> Option<&T> {
        self.nodes.back()
    }

    /// Remove and return the first element.
    pub fn pop_front(&mut self) -> Option<T> {
        self.nodes.pop_front()
    }

    /// Remove and return the last element.
    pub fn pop_back(&mut self) -> Option<T> {
        self.nodes.pop_back()
    }

    /// Attach all of `other` before the current front, leaving `other`
    /// empty.
    pub fn splice_front(&mut self, other: &mut Self) {
        // `append` moves the receiver's nodes to the end of `other`;
        // swapping afterwards hands the combined chain back to `self`.
        other.nodes.append(&mut self.nodes);
        std::mem::swap(&mut self.nodes, &mut other.nodes);
    }

    /// Attach all of `other` after the current back, leaving `other`
    /// empty.
    pub fn splice_back(&mut self, other: &mut Self) {
        self.nodes.append(&mut other.nodes);
    }

    /// Remove every element, returning them front to back.
    pub fn drain_to_vec(&mut self) -> Vec<T> {
        std::mem::take(&mut self.nodes).into_iter().collect()
    }

    /// Iterate front to back without consuming.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.nodes.iter()
    }
}

impl<T> Default for SpliceDeque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for SpliceDeque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}
