//! line-store: memory-bounded line storage with an on-disk spill file.
//!
//! This crate provides the data layer of a pager:
//!
//! - **Configuration**: `StoreConfig` with per-block and total byte budgets
//! - **Frames**: Contiguous runs of lines, resident or spilled
//! - **Swap**: A private, append-only temporary file for spilled blocks
//! - **Store**: `LineStore` owning frames, LRU order and the swap file
//! - **Cursor**: Line-number navigation and retrieval over a store
//! - **Metrics**: `StoreStats` snapshots
//!
//! # Architecture
//!
//! ```text
//!   ingestion                          readers
//!       |                                 |
//!       | append                          | set_position / get_line
//!       v                                 v
//!  +---------------------------------------------+
//!  |                 LineStore                   |
//!  |  frames: [F0][F1][F2] ... [Fn]   (one lock) |
//!  |  LRU:    Fn -> F2 -> F0          (resident) |
//!  +----------------------+----------------------+
//!                         | evict (flush once) / load
//!                         v
//!              +---------------------+
//!              |  .m_swap_XXXX.tmp   |
//!              |  newline records    |
//!              +---------------------+
//! ```
//!
//! At most `max(1, max_total_size / block_size_limit)` frames are resident
//! after any operation. The swap file is created on the first eviction and
//! deleted on shutdown or drop.
//!
//! # Example
//!
//! ```
//! use line_store::{LineStore, StoreConfig};
//!
//! let store = LineStore::new(
//!     StoreConfig::new()
//!         .block_size_limit(1024)
//!         .max_total_size(4096),
//! );
//!
//! for i in 0..500 {
//!     store.append(&format!("{:<50}", i)).unwrap();
//! }
//! assert_eq!(store.len(), 500);
//!
//! let mut cursor = store.cursor();
//! assert!(cursor.set_position(250, false));
//! assert_eq!(cursor.get_line().unwrap(), "250");
//! assert!(store.stats().resident_frames <= 4);
//!
//! store.shutdown().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core types
mod config;
mod error;
mod frame;
mod lru;
mod metrics;
mod swap;

// Re-exports
pub use config::{
    DEFAULT_BLOCK_SIZE_LIMIT, DEFAULT_TOTAL_SIZE_LIMIT, KB, MB, SWAP_FILE_PREFIX,
    SWAP_FILE_SUFFIX, StoreConfig,
};
pub use error::{StoreError, StoreResult, SwapOp};
pub use frame::{Block, Frame};
pub use metrics::StoreStats;

// Engine and navigation
mod cursor;
mod store;

pub use cursor::Cursor;
pub use store::LineStore;
