//! Error type for the pager.

use line_store::StoreError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PagerError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid search pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("file \"{0}\" does not exist")]
    NoSuchFile(PathBuf),
    #[error("ingestion thread panicked")]
    IngestPanicked,
}

impl PagerError {
    /// Errors after which the store must not be read again.
    pub fn is_fatal(&self) -> bool {
        match self {
            PagerError::Store(e) => e.is_fatal() || e.is_defect(),
            PagerError::Io(_) | PagerError::IngestPanicked => true,
            _ => false,
        }
    }
}

pub type PagerResult<T> = Result<T, PagerError>;
