//! mpager: a pager for flat text files of any size.
//!
//! Lines are ingested into a memory-bounded [`LineStore`] that spills cold
//! blocks to a private swap file, and are viewed through a headless
//! [`Controller`] driving any [`Display`].

pub mod config;
pub mod controller;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod search;
pub mod signal;
pub mod text;

pub use config::Config;
pub use controller::{Action, Controller, Display, PlainDisplay};
pub use error::{PagerError, PagerResult};
pub use ingest::{IngestHandle, IngestSummary, Ingestor, Status};
pub use line_store::{Cursor, LineStore, StoreConfig, StoreError};
pub use search::{Match, SearchPattern};
