//! Position-tracking accessor over a [`LineStore`].

use crate::error::StoreResult;
use crate::store::LineStore;
use std::fmt;

/// A line position over a store it does not own.
///
/// A cursor holds the current global line index and a hint naming the frame
/// that contains it. Repositioning scans frames from the hint in the
/// direction of travel, so sequential scrolling touches at most one
/// neighbouring frame per step.
///
/// Out-of-range navigation is an ordinary failure reported as `false`. A
/// forced move may leave the cursor on an out-of-range index, where
/// [`is_valid`](Self::is_valid) is false.
#[derive(Clone, Copy)]
pub struct Cursor<'a> {
    store: &'a LineStore,
    line: isize,
    frame: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(store: &'a LineStore) -> Self {
        Self {
            store,
            line: 0,
            frame: 0,
        }
    }

    /// Current global line index. May be out of range after a forced move.
    #[inline]
    pub fn current_index(&self) -> isize {
        self.line
    }

    /// Index of the frame believed to hold the current line.
    #[inline]
    pub fn frame_hint(&self) -> usize {
        self.frame
    }

    /// Check whether the current line falls within the hinted frame.
    pub fn is_valid(&self) -> bool {
        self.store.frame_contains(self.frame, self.line)
    }

    /// Move back to line 0, frame 0. Returns whether the store has a line 0.
    pub fn rewind(&mut self) -> bool {
        self.line = 0;
        self.frame = 0;
        !self.store.is_empty()
    }

    /// Move to `target`.
    ///
    /// Returns `true` if `target` is within `[0, len)`. An out-of-range
    /// target leaves the cursor untouched unless `force` is set, in which
    /// case the index is stored anyway and `false` is still returned.
    pub fn set_position(&mut self, target: isize, force: bool) -> bool {
        let len = self.store.len() as isize;
        if target < 0 || target >= len {
            if force {
                self.line = target;
            }
            return false;
        }

        if target == 0 {
            self.line = 0;
            self.frame = 0;
            return true;
        }

        if self.store.frame_contains(self.frame, target) {
            self.line = target;
            return true;
        }

        let forward = target > self.line;
        match self.store.locate(self.frame, target as usize, forward) {
            Ok(frame) => {
                self.line = target;
                self.frame = frame;
                true
            }
            Err(err) => {
                tracing::debug!(target, error = %err, "cursor reposition failed");
                false
            }
        }
    }

    /// Move to `target` only if it is in range.
    #[inline]
    pub fn set_if_valid(&mut self, target: isize) -> bool {
        self.set_position(target, false)
    }

    /// Move by `delta` lines, forced. A zero delta does nothing and fails.
    pub fn step(&mut self, delta: isize) -> bool {
        if delta == 0 {
            return false;
        }
        self.set_position(self.line.saturating_add(delta), true)
    }

    /// Move to the next line.
    #[inline]
    pub fn increment(&mut self) -> bool {
        self.step(1)
    }

    /// Move to the previous line.
    #[inline]
    pub fn decrement(&mut self) -> bool {
        self.step(-1)
    }

    /// Text of the current line, loading its frame if needed.
    ///
    /// On a cursor left out of range this returns
    /// [`StoreError::LineOutsideFrame`](crate::StoreError::LineOutsideFrame).
    pub fn get_line(&self) -> StoreResult<String> {
        self.store.read_line(self.frame, self.line)
    }
}

impl fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("line", &self.line)
            .field("frame", &self.frame)
            .finish()
    }
}
