//! The line store engine.
//!
//! [`LineStore`] owns the ordered frame sequence, the LRU order over
//! resident frames and the swap file. Every public operation takes the single
//! store lock for its full duration, so loads and evictions are never
//! overlapped and the swap file offset is only ever moved under the lock.
//!
//! # Eviction
//!
//! Touching a frame moves it to the front of the LRU order (loading it from
//! the swap file first when needed). While more than one frame is resident
//! and `resident * block_size_limit > max_total_size`, the LRU tail is
//! written out (unless a clean copy is already on disk) and its block is
//! dropped. Frame metadata is never removed.

use crate::config::StoreConfig;
use crate::cursor::Cursor;
use crate::error::{StoreError, StoreResult};
use crate::frame::{Block, Frame};
use crate::lru::LruOrder;
use crate::metrics::StoreStats;
use crate::swap::SwapFile;
use parking_lot::Mutex;

/// Characters stripped from the end of every appended line.
const TRAILING: &[char] = &[' ', '\t', '\r', '\n'];

/// Stand-in for a newline embedded inside a line. Swap records are newline
/// terminated, so a raw `\n` cannot be stored.
const EMBEDDED_NEWLINE: char = '\u{2424}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Open,
    Failed,
    Closed,
}

/// Block-structured, memory-budgeted store of text lines.
///
/// Lines are grouped into frames of roughly `block_size_limit` bytes. At
/// most `max_total_size / block_size_limit` frames (and never fewer than
/// one) keep their text in memory; the rest live in a private swap file and
/// are reloaded on demand.
///
/// # Thread Safety
///
/// `LineStore` is `Send + Sync`. A single ingestion path appends while any
/// number of [`Cursor`]s read concurrently; all of them serialize on one
/// lock.
///
/// # Example
///
/// ```
/// use line_store::LineStore;
///
/// let store = LineStore::with_limits(1024, 4096);
/// store.append("first line\n").unwrap();
/// store.append("second line").unwrap();
///
/// let mut cursor = store.cursor();
/// assert!(cursor.set_position(1, false));
/// assert_eq!(cursor.get_line().unwrap(), "second line");
///
/// store.shutdown().unwrap();
/// ```
pub struct LineStore {
    config: StoreConfig,
    inner: Mutex<Inner>,
}

struct Inner {
    frames: Vec<Frame>,
    lru: LruOrder,
    swap: Option<SwapFile>,
    /// Bytes appended to the last frame since it was started.
    last_block_size: usize,
    state: State,
    loads: u64,
    evictions: u64,
    flushes: u64,
}

impl LineStore {
    /// Create an empty store.
    pub fn new(config: StoreConfig) -> Self {
        tracing::debug!(
            block_size_limit = config.block_size_limit,
            max_total_size = config.max_total_size,
            resident_frames = config.resident_frames(),
            "created line store"
        );
        Self {
            config,
            inner: Mutex::new(Inner::new()),
        }
    }

    /// Create an empty store with byte limits. Non-positive values select
    /// the defaults.
    pub fn with_limits(block_size_limit: i64, max_total_size: i64) -> Self {
        Self::new(StoreConfig::from_limits(block_size_limit, max_total_size))
    }

    /// Create an empty store with limits in megabytes. Non-positive values
    /// select the defaults.
    pub fn with_limits_mb(block_size_limit_mb: i64, max_total_size_mb: i64) -> Self {
        Self::new(StoreConfig::from_limits_mb(
            block_size_limit_mb,
            max_total_size_mb,
        ))
    }

    /// The store configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Append a line.
    ///
    /// Trailing spaces, tabs, carriage returns and newlines are trimmed. A new
    /// frame is started when the last one already holds data and this line
    /// would push it past `block_size_limit`.
    pub fn append(&self, line: &str) -> StoreResult<()> {
        let line = normalize(line);
        let length = line.len();

        let mut inner = self.inner.lock();
        inner.check()?;

        let full = inner.last_block_size > 0
            && inner.last_block_size + length > self.config.block_size_limit;
        if inner.frames.is_empty() || full {
            let first_line = inner.len();
            inner.frames.push(Frame::new(first_line));
            inner.last_block_size = 0;
            tracing::trace!(
                frame = inner.frames.len() - 1,
                first_line,
                "started frame"
            );
        }

        let last = inner.frames.len() - 1;
        let result = inner
            .acquire(last, &self.config)
            .and_then(|_| inner.frames[last].push_line(last, line));
        inner.guard(result)?;
        inner.last_block_size += length;
        Ok(())
    }

    /// Total number of lines.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check whether the store holds no lines.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create a cursor positioned at line 0.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(self)
    }

    /// Take a statistics snapshot.
    pub fn stats(&self) -> StoreStats {
        let inner = self.inner.lock();
        StoreStats {
            lines: inner.len(),
            frames: inner.frames.len(),
            resident_frames: inner.lru.len(),
            swap_bytes: inner.swap.as_ref().map_or(0, SwapFile::bytes_written),
            swap_path: inner.swap.as_ref().map(|s| s.path().to_path_buf()),
            loads: inner.loads,
            evictions: inner.evictions,
            flushes: inner.flushes,
            block_size_limit: self.config.block_size_limit,
        }
    }

    /// Check whether a fatal swap error left the store unusable.
    pub fn is_failed(&self) -> bool {
        self.inner.lock().state == State::Failed
    }

    /// Check whether the store was shut down.
    pub fn is_closed(&self) -> bool {
        self.inner.lock().state == State::Closed
    }

    /// Shut the store down: close and delete the swap file and drop all
    /// frames. Idempotent.
    ///
    /// Nothing is flushed. Every later append or read returns
    /// [`StoreError::Closed`] and [`len`](Self::len) is zero.
    pub fn shutdown(&self) -> StoreResult<()> {
        let mut inner = self.inner.lock();
        if inner.state == State::Closed {
            return Ok(());
        }

        let lines = inner.len();
        inner.state = State::Closed;
        inner.frames = Vec::new();
        inner.lru.clear();
        inner.last_block_size = 0;
        tracing::debug!(lines, "line store shut down");

        match inner.swap.take() {
            Some(swap) => swap.close(),
            None => Ok(()),
        }
    }

    /// Check whether `frame` exists and contains `line`.
    pub(crate) fn frame_contains(&self, frame: usize, line: isize) -> bool {
        self.inner
            .lock()
            .frames
            .get(frame)
            .is_some_and(|f| f.contains(line))
    }

    /// Find the frame containing `target`, scanning from `hint` in the
    /// direction of travel.
    ///
    /// The scan is linear. A hint that went stale (the cursor was forced far
    /// out of range while the store grew) is recovered by scanning the other
    /// way.
    pub(crate) fn locate(&self, hint: usize, target: usize, forward: bool) -> StoreResult<usize> {
        let inner = self.inner.lock();
        inner.check()?;

        let frames = &inner.frames;
        if frames.is_empty() {
            return Err(StoreError::LineNotFound { line: target });
        }

        let start = hint.min(frames.len() - 1);
        let line = target as isize;
        let found = if forward {
            (start..frames.len()).find(|&j| frames[j].contains(line))
        } else {
            (0..=start).rev().find(|&j| frames[j].contains(line))
        };

        match found {
            Some(j) => Ok(j),
            None => {
                tracing::debug!(hint, target, forward, "frame hint stale, scanning back");
                let found = if forward {
                    (0..start).rev().find(|&j| frames[j].contains(line))
                } else {
                    (start + 1..frames.len()).find(|&j| frames[j].contains(line))
                };
                found.ok_or(StoreError::LineNotFound { line: target })
            }
        }
    }

    /// Acquire `frame` and return the text of global line `line` from it.
    pub(crate) fn read_line(&self, frame: usize, line: isize) -> StoreResult<String> {
        let mut inner = self.inner.lock();
        inner.check()?;

        let result = inner.acquire(frame, &self.config);
        inner.guard(result)?;

        let f = &inner.frames[frame];
        let offset = line - f.first_line() as isize;
        let text = if offset >= 0 && (offset as usize) < f.line_count() {
            f.block().and_then(|b| b.get(offset as usize))
        } else {
            None
        };

        text.map(str::to_owned)
            .ok_or(StoreError::LineOutsideFrame {
                line,
                frame,
                offset,
                lines: f.line_count(),
            })
    }
}

impl Default for LineStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl Inner {
    fn new() -> Self {
        Self {
            frames: Vec::new(),
            lru: LruOrder::new(),
            swap: None,
            last_block_size: 0,
            state: State::Open,
            loads: 0,
            evictions: 0,
            flushes: 0,
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.frames.last().map_or(0, Frame::end)
    }

    fn check(&self) -> StoreResult<()> {
        match self.state {
            State::Open => Ok(()),
            State::Failed => Err(StoreError::Failed),
            State::Closed => Err(StoreError::Closed),
        }
    }

    /// Mark the store failed when `result` carries a fatal error.
    fn guard<T>(&mut self, result: StoreResult<T>) -> StoreResult<T> {
        if let Err(err) = &result {
            if err.is_fatal() && self.state == State::Open {
                tracing::error!(error = %err, "line store failed");
                self.state = State::Failed;
            }
        }
        result
    }

    /// Make frame `index` resident and most recently used, evicting the LRU
    /// tail while over budget.
    fn acquire(&mut self, index: usize, config: &StoreConfig) -> StoreResult<()> {
        let resident = match self.frames.get(index) {
            Some(frame) => frame.is_resident(),
            None => {
                return Err(StoreError::FrameOutOfRange {
                    index,
                    frames: self.frames.len(),
                });
            }
        };

        if resident && self.lru.front() == Some(index) {
            return Ok(());
        }

        if !resident {
            self.load(index)?;
        }
        self.lru.touch(index);

        while self.lru.len() > 1 && config.over_budget(self.lru.len()) {
            self.evict_tail(config)?;
        }
        Ok(())
    }

    fn load(&mut self, index: usize) -> StoreResult<()> {
        let frame = &self.frames[index];
        let count = frame.line_count();
        let offset = frame
            .persist_offset()
            .ok_or(StoreError::NotPersisted { frame: index })?;
        let swap = self
            .swap
            .as_mut()
            .ok_or(StoreError::NotPersisted { frame: index })?;

        let lines = swap.read(index, offset, count)?;
        self.frames[index].load(Block::from(lines));
        self.loads += 1;
        tracing::trace!(frame = index, offset, lines = count, "loaded frame");
        Ok(())
    }

    fn evict_tail(&mut self, config: &StoreConfig) -> StoreResult<()> {
        let Some(victim) = self.lru.back() else {
            return Ok(());
        };

        if self.frames[victim].persist_offset().is_none() && self.swap.is_none() {
            self.swap = Some(SwapFile::create(config.swap_dir.as_deref())?);
        }

        let frame = &mut self.frames[victim];
        if frame.persist_offset().is_none() {
            let (Some(swap), Some(block)) = (self.swap.as_mut(), frame.block()) else {
                return Err(StoreError::NotPersisted { frame: victim });
            };
            let offset = swap.append(block.lines())?;
            frame.set_persist_offset(offset);
            self.flushes += 1;
            tracing::trace!(frame = victim, offset, "flushed frame");
        }

        frame.unload();
        self.lru.pop_back();
        self.evictions += 1;
        tracing::trace!(frame = victim, "evicted frame");
        Ok(())
    }
}

/// Trim trailing whitespace and neutralize embedded newlines.
fn normalize(line: &str) -> String {
    let line = line.trim_end_matches(TRAILING);
    if line.contains('\n') {
        line.replace('\n', &EMBEDDED_NEWLINE.to_string())
    } else {
        line.to_string()
    }
}
