//! Error types for line store operations.

use std::fmt;
use std::io;

/// Swap file operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOp {
    /// Creating the temporary file.
    Create,
    /// Positioning the file offset.
    Seek,
    /// Reading a frame's records back.
    Read,
    /// Appending a frame's records.
    Write,
    /// Flushing written records to stable storage.
    Sync,
    /// Closing and removing the file.
    Remove,
}

impl fmt::Display for SwapOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Seek => write!(f, "seek"),
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
            Self::Sync => write!(f, "sync"),
            Self::Remove => write!(f, "remove"),
        }
    }
}

/// Errors that can occur during line store operations.
///
/// Errors fall into three classes:
///
/// - **Fatal**: the swap file can no longer be trusted. The store marks
///   itself failed and every later operation returns [`StoreError::Failed`].
/// - **Defect**: an internal invariant was broken (a cursor pointing outside
///   its frame, a frame with neither block nor swap offset).
/// - **Lifecycle**: the store was already shut down.
///
/// Out-of-range cursor navigation is not an error; it is reported as `false`
/// by the cursor methods.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A swap file operation failed.
    #[error("swap file {op} failed: {source}")]
    Swap {
        /// The operation that failed.
        op: SwapOp,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The swap file ended before a frame's records were all read.
    #[error("swap file truncated: frame {frame} expected {expected} lines, found {found}")]
    Truncated {
        /// Index of the frame being reloaded.
        frame: usize,
        /// Number of lines the frame metadata records.
        expected: usize,
        /// Number of lines actually read.
        found: usize,
    },

    /// A frame without a block has no swap offset to reload from.
    #[error("frame {frame} is not resident and was never persisted")]
    NotPersisted {
        /// Index of the offending frame.
        frame: usize,
    },

    /// A frame index does not exist.
    #[error("frame index {index} out of range ({frames} frames)")]
    FrameOutOfRange {
        /// Requested frame index.
        index: usize,
        /// Number of frames in the store.
        frames: usize,
    },

    /// A cursor's line is outside the frame its hint points at.
    #[error("line {line} is outside frame {frame} (offset {offset}, {lines} lines)")]
    LineOutsideFrame {
        /// Global line index held by the cursor.
        line: isize,
        /// Frame index held by the cursor.
        frame: usize,
        /// Computed in-block offset.
        offset: isize,
        /// Number of lines in the frame.
        lines: usize,
    },

    /// No frame contains the requested line.
    #[error("no frame contains line {line}")]
    LineNotFound {
        /// Requested global line index.
        line: usize,
    },

    /// An earlier fatal error left the store in an unknown state.
    #[error("store failed after an unrecoverable swap file error")]
    Failed,

    /// The store was shut down.
    #[error("store is shut down")]
    Closed,
}

impl StoreError {
    pub(crate) fn swap(op: SwapOp, source: io::Error) -> Self {
        Self::Swap { op, source }
    }

    /// Check whether this error leaves the store unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Swap { .. } | Self::Truncated { .. } | Self::NotPersisted { .. } | Self::Failed
        )
    }

    /// Check whether this error indicates a broken internal invariant.
    pub fn is_defect(&self) -> bool {
        matches!(
            self,
            Self::NotPersisted { .. }
                | Self::LineOutsideFrame { .. }
                | Self::LineNotFound { .. }
                | Self::FrameOutOfRange { .. }
        )
    }
}

/// Result type for line store operations.
pub type StoreResult<T> = Result<T, StoreError>;
