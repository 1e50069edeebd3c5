//! Pager configuration.
//!
//! Loaded from a TOML file. Every section and field is optional; missing
//! values fall back to the same defaults the line store uses.

use crate::error::{PagerError, PagerResult};
use line_store::{DEFAULT_BLOCK_SIZE_LIMIT, DEFAULT_TOTAL_SIZE_LIMIT, StoreConfig};
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Name of the configuration file inside the per-program config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Annotated default configuration, as printed by `--print-config`.
pub const DEFAULT_CONFIG: &str = r#"# m pager configuration

[buffer]
# Size of a single block of lines kept in memory (e.g., "1MB", "512KB")
block_size = "1MB"

# Total memory for resident blocks; older blocks are swapped to disk
total_size = "100MB"

[view]
# Columns a tab expands to
spaces_per_tab = 4

# Seconds between view refreshes while data is still arriving
refresh_secs = 5

[search]
# Treat search text as a regular expression
regex = false

# Case-insensitive search
ignore_case = false

[logging]
# Log level: "error", "warn", "info", "debug", "trace"
level = "warn"

# Log format: "pretty", "json", or "compact"
format = "compact"

# Include timestamps, targets and thread names in log lines
timestamps = false
target = false
thread_names = false
"#;

/// Pager configuration loaded from TOML file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Line store budgets
    #[serde(default)]
    pub buffer: BufferConfig,

    /// Viewport settings
    #[serde(default)]
    pub view: ViewConfig,

    /// Search defaults
    #[serde(default)]
    pub search: SearchConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Line store budgets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BufferConfig {
    /// Byte budget of one block (e.g., "1MB", "512KB")
    #[serde(default = "default_block_size", deserialize_with = "deserialize_size")]
    pub block_size: usize,

    /// Total resident byte budget (e.g., "100MB")
    #[serde(default = "default_total_size", deserialize_with = "deserialize_size")]
    pub total_size: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            block_size: default_block_size(),
            total_size: default_total_size(),
        }
    }
}

/// Viewport settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewConfig {
    #[serde(default = "default_spaces_per_tab")]
    pub spaces_per_tab: usize,

    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            spaces_per_tab: default_spaces_per_tab(),
            refresh_secs: default_refresh_secs(),
        }
    }
}

/// Search defaults, overridden by command line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    #[serde(default)]
    pub regex: bool,

    #[serde(default)]
    pub ignore_case: bool,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line human readable output
    Pretty,
    /// JSON lines
    Json,
    /// Single-line human readable output
    #[default]
    Compact,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level filter, used unless RUST_LOG is set.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default)]
    pub timestamps: bool,

    #[serde(default)]
    pub target: bool,

    #[serde(default)]
    pub thread_names: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            timestamps: false,
            target: false,
            thread_names: false,
        }
    }
}

fn default_block_size() -> usize {
    DEFAULT_BLOCK_SIZE_LIMIT
}

fn default_total_size() -> usize {
    DEFAULT_TOTAL_SIZE_LIMIT as usize
}

fn default_spaces_per_tab() -> usize {
    4
}

fn default_refresh_secs() -> u64 {
    5
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn deserialize_size<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SizeValue {
        Number(usize),
        String(String),
    }

    match SizeValue::deserialize(deserializer)? {
        SizeValue::Number(n) => Ok(n),
        SizeValue::String(s) => parse_size(&s).map_err(D::Error::custom),
    }
}

/// Parse a size string like "512KB", "64MB", "1GB" into bytes.
pub fn parse_size(s: &str) -> Result<usize, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty size string".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| c.is_alphabetic()) {
        Some(idx) => (&s[..idx], s[idx..].to_uppercase()),
        None => (s, String::new()),
    };

    let num: usize = num_str
        .trim()
        .parse()
        .map_err(|_| format!("invalid number: {}", num_str))?;

    let multiplier: usize = match suffix.as_str() {
        "" | "B" => 1,
        "K" | "KB" | "KIB" => 1024,
        "M" | "MB" | "MIB" => 1024 * 1024,
        "G" | "GB" | "GIB" => 1024 * 1024 * 1024,
        _ => return Err(format!("unknown size suffix: {}", suffix)),
    };

    num.checked_mul(multiplier)
        .ok_or_else(|| "size overflow".to_string())
}

/// Format a byte count using the largest whole binary unit.
pub fn format_size(bytes: usize) -> String {
    const UNITS: [(usize, &str); 3] = [(1 << 30, "GB"), (1 << 20, "MB"), (1 << 10, "KB")];
    for (unit, suffix) in UNITS {
        if bytes >= unit && bytes % unit == 0 {
            return format!("{}{}", bytes / unit, suffix);
        }
    }
    format!("{}B", bytes)
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> PagerResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| PagerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&contents)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn parse(contents: &str) -> PagerResult<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the configuration for program `prog`.
    ///
    /// An explicit path must exist. Otherwise the first existing file among
    /// `$XDG_CONFIG_HOME/<prog>/config.toml` and
    /// `$HOME/.config/<prog>/config.toml` is used, falling back to defaults.
    pub fn locate(prog: &str, explicit: Option<&Path>) -> PagerResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidates = config_candidates(
            prog,
            std::env::var_os("XDG_CONFIG_HOME"),
            std::env::var_os("HOME"),
        );
        match candidates.iter().find(|p| p.is_file()) {
            Some(path) => Self::load(path),
            None => {
                tracing::debug!(prog, "no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> PagerResult<()> {
        if self.buffer.block_size == 0 {
            return Err(PagerError::Config("block_size must be positive".into()));
        }

        if self.buffer.total_size == 0 {
            return Err(PagerError::Config("total_size must be positive".into()));
        }

        if !(1..=16).contains(&self.view.spaces_per_tab) {
            return Err(PagerError::Config(format!(
                "spaces_per_tab ({}) must be between 1 and 16",
                self.view.spaces_per_tab
            )));
        }

        if self.view.refresh_secs == 0 {
            return Err(PagerError::Config("refresh_secs must be positive".into()));
        }

        Ok(())
    }

    /// Line store configuration, with optional megabyte overrides from the
    /// command line. Non-positive overrides keep the configured value.
    pub fn store_config(&self, block_mb: i64, total_mb: i64) -> StoreConfig {
        let mb = line_store::MB;
        let block = if block_mb > 0 {
            (block_mb as usize).saturating_mul(mb)
        } else {
            self.buffer.block_size
        };
        let total = if total_mb > 0 {
            (total_mb as u64).saturating_mul(mb as u64)
        } else {
            self.buffer.total_size as u64
        };
        StoreConfig::new().block_size_limit(block).max_total_size(total)
    }
}

/// Candidate config file paths, most specific first.
fn config_candidates(prog: &str, xdg: Option<OsString>, home: Option<OsString>) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = xdg.filter(|d| !d.is_empty()) {
        paths.push(PathBuf::from(dir).join(prog).join(CONFIG_FILE_NAME));
    }
    if let Some(dir) = home.filter(|d| !d.is_empty()) {
        paths.push(
            PathBuf::from(dir)
                .join(".config")
                .join(prog)
                .join(CONFIG_FILE_NAME),
        );
    }
    paths
}
