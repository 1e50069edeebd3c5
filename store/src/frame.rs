//! Frame and block model.
//!
//! A [`Frame`] describes a contiguous run of lines. Its text lives in a
//! [`Block`] while the frame is resident; otherwise only the swap file
//! offset is kept.
//!
//! ```text
//! Frame { first_line: 40, line_count: 20, persist_offset: Some(1830) }
//!   payload: Loaded(Block ["line 40", ..., "line 59"])   <- resident
//!   payload: Unloaded                                    <- spilled
//! ```

use crate::error::{StoreError, StoreResult};

/// The in-memory text of one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    lines: Vec<String>,
}

impl Block {
    /// Create an empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lines in the block.
    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check whether the block holds no lines.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get a line by its offset within the block.
    #[inline]
    pub fn get(&self, offset: usize) -> Option<&str> {
        self.lines.get(offset).map(String::as_str)
    }

    /// All lines, in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn push(&mut self, line: String) {
        self.lines.push(line);
    }
}

impl From<Vec<String>> for Block {
    fn from(lines: Vec<String>) -> Self {
        Self { lines }
    }
}

/// Resident state of a frame's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Payload {
    Loaded(Block),
    Unloaded,
}

/// Metadata for a contiguous run of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Global index of the first line.
    first_line: usize,
    /// Number of lines in the frame.
    line_count: usize,
    /// Byte offset of the frame's records in the swap file.
    persist_offset: Option<u64>,
    payload: Payload,
}

impl Frame {
    /// Create an empty, resident frame starting at `first_line`.
    pub(crate) fn new(first_line: usize) -> Self {
        Self {
            first_line,
            line_count: 0,
            persist_offset: None,
            payload: Payload::Loaded(Block::new()),
        }
    }

    /// Global index of the first line.
    #[inline]
    pub fn first_line(&self) -> usize {
        self.first_line
    }

    /// Number of lines in the frame.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Global index one past the last line.
    #[inline]
    pub fn end(&self) -> usize {
        self.first_line + self.line_count
    }

    /// Swap file offset, if the current content was ever written out.
    #[inline]
    pub fn persist_offset(&self) -> Option<u64> {
        self.persist_offset
    }

    /// Check whether the frame's block is in memory.
    #[inline]
    pub fn is_resident(&self) -> bool {
        matches!(self.payload, Payload::Loaded(_))
    }

    /// Check whether global line index `line` falls within this frame.
    #[inline]
    pub fn contains(&self, line: isize) -> bool {
        line >= 0 && (line as usize) >= self.first_line && (line as usize) < self.end()
    }

    /// The resident block, if loaded.
    pub fn block(&self) -> Option<&Block> {
        match &self.payload {
            Payload::Loaded(block) => Some(block),
            Payload::Unloaded => None,
        }
    }

    /// Append a line to the resident block.
    ///
    /// The persisted copy no longer matches the block, so the offset is
    /// dropped and the next eviction writes the frame again.
    pub(crate) fn push_line(&mut self, index: usize, line: String) -> StoreResult<()> {
        match &mut self.payload {
            Payload::Loaded(block) => {
                block.push(line);
                self.line_count += 1;
                self.persist_offset = None;
                Ok(())
            }
            Payload::Unloaded => Err(StoreError::NotPersisted { frame: index }),
        }
    }

    pub(crate) fn set_persist_offset(&mut self, offset: u64) {
        self.persist_offset = Some(offset);
    }

    pub(crate) fn load(&mut self, block: Block) {
        debug_assert_eq!(block.len(), self.line_count);
        self.payload = Payload::Loaded(block);
    }

    /// Drop the resident block. Only valid once the frame is persisted.
    pub(crate) fn unload(&mut self) {
        debug_assert!(self.persist_offset.is_some());
        self.payload = Payload::Unloaded;
    }
}
