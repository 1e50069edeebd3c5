//! Configuration types for the line store.

use std::path::PathBuf;

/// One kibibyte.
pub const KB: usize = 1024;

/// One mebibyte.
pub const MB: usize = 1024 * KB;

/// Default per-block byte budget.
pub const DEFAULT_BLOCK_SIZE_LIMIT: usize = MB;

/// Default total resident byte budget.
pub const DEFAULT_TOTAL_SIZE_LIMIT: u64 = 100 * MB as u64;

/// Name prefix of the swap file. The leading dot keeps it hidden.
pub const SWAP_FILE_PREFIX: &str = ".m_swap_";

/// Name suffix of the swap file.
pub const SWAP_FILE_SUFFIX: &str = ".tmp";

/// Configuration for a [`LineStore`](crate::LineStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Byte budget of a single block. A new frame is started when the
    /// current one would grow past this size.
    /// Default: 1MB
    pub block_size_limit: usize,

    /// Total byte budget for resident blocks. Accounting is approximate:
    /// resident frames times `block_size_limit`.
    /// Default: 100MB
    pub max_total_size: u64,

    /// Directory for the swap file.
    /// Default: None (system temporary directory)
    pub swap_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            block_size_limit: DEFAULT_BLOCK_SIZE_LIMIT,
            max_total_size: DEFAULT_TOTAL_SIZE_LIMIT,
            swap_dir: None,
        }
    }
}

impl StoreConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a config from signed limits, as they arrive from flags or
    /// config files. Non-positive values select the defaults.
    pub fn from_limits(block_size_limit: i64, max_total_size: i64) -> Self {
        let block_size_limit = if block_size_limit > 0 {
            block_size_limit as usize
        } else {
            DEFAULT_BLOCK_SIZE_LIMIT
        };
        let max_total_size = if max_total_size > 0 {
            max_total_size as u64
        } else {
            DEFAULT_TOTAL_SIZE_LIMIT
        };
        Self {
            block_size_limit,
            max_total_size,
            swap_dir: None,
        }
    }

    /// Create a config from limits expressed in megabytes.
    pub fn from_limits_mb(block_size_limit_mb: i64, max_total_size_mb: i64) -> Self {
        Self::from_limits(
            block_size_limit_mb.saturating_mul(MB as i64),
            max_total_size_mb.saturating_mul(MB as i64),
        )
    }

    /// Set the per-block byte budget. Zero selects the default.
    pub fn block_size_limit(mut self, limit: usize) -> Self {
        self.block_size_limit = if limit == 0 {
            DEFAULT_BLOCK_SIZE_LIMIT
        } else {
            limit
        };
        self
    }

    /// Set the total resident byte budget. Zero selects the default.
    pub fn max_total_size(mut self, limit: u64) -> Self {
        self.max_total_size = if limit == 0 {
            DEFAULT_TOTAL_SIZE_LIMIT
        } else {
            limit
        };
        self
    }

    /// Set the directory the swap file is created in.
    pub fn swap_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.swap_dir = Some(dir.into());
        self
    }

    /// Number of frames that may stay resident, never less than one.
    pub fn resident_frames(&self) -> usize {
        let frames = self.max_total_size / self.block_size_limit as u64;
        (frames as usize).max(1)
    }

    /// Check whether `resident` frames exceed the total budget.
    #[inline]
    pub(crate) fn over_budget(&self, resident: usize) -> bool {
        (resident as u64).saturating_mul(self.block_size_limit as u64) > self.max_total_size
    }
}
