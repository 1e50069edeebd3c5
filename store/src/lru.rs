//! Recency order over resident frames.
//!
//! Front is most recently used, back is the next eviction candidate. The
//! number of resident frames is bounded by the store's budget, so linear
//! search is cheap.

use std::collections::VecDeque;

/// LRU order of resident frame indices.
#[derive(Debug, Default)]
pub(crate) struct LruOrder {
    frames: VecDeque<usize>,
}

impl LruOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently used frame.
    #[inline]
    pub fn front(&self) -> Option<usize> {
        self.frames.front().copied()
    }

    /// Least recently used frame.
    #[inline]
    pub fn back(&self) -> Option<usize> {
        self.frames.back().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Move `frame` to the front, inserting it if absent.
    pub fn touch(&mut self, frame: usize) {
        if self.front() == Some(frame) {
            return;
        }
        if let Some(pos) = self.frames.iter().position(|&f| f == frame) {
            self.frames.remove(pos);
        }
        self.frames.push_front(frame);
    }

    /// Remove and return the least recently used frame.
    pub fn pop_back(&mut self) -> Option<usize> {
        self.frames.pop_back()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.frames.iter().copied()
    }
}
