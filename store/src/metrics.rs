//! Line store statistics.

use std::fmt;
use std::path::PathBuf;

/// Point-in-time snapshot of a [`LineStore`](crate::LineStore).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Total number of lines.
    pub lines: usize,
    /// Number of frames.
    pub frames: usize,
    /// Number of frames whose block is in memory.
    pub resident_frames: usize,
    /// Bytes appended to the swap file.
    pub swap_bytes: u64,
    /// Path of the swap file, once created.
    pub swap_path: Option<PathBuf>,
    /// Frames reloaded from the swap file.
    pub loads: u64,
    /// Blocks dropped from memory.
    pub evictions: u64,
    /// Blocks written to the swap file.
    pub flushes: u64,
    /// Per-block byte budget the store was configured with.
    pub block_size_limit: usize,
}

impl StoreStats {
    /// Estimated resident bytes (resident frames times the block budget).
    pub fn resident_bytes(&self) -> u64 {
        self.resident_frames as u64 * self.block_size_limit as u64
    }

    /// Fraction of frames currently resident, as a percentage (0.0 - 100.0).
    pub fn residency(&self) -> f64 {
        if self.frames == 0 {
            0.0
        } else {
            (self.resident_frames as f64 / self.frames as f64) * 100.0
        }
    }
}

impl fmt::Display for StoreStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lines={} frames={} resident={} ({:.1}%, {}B) swap_bytes={} loads={} evictions={} flushes={}",
            self.lines,
            self.frames,
            self.resident_frames,
            self.residency(),
            self.resident_bytes(),
            self.swap_bytes,
            self.loads,
            self.evictions,
            self.flushes
        )
    }
}
