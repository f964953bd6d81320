//! Configuration types for the analyzer and the web server.
//!
//! There is no configuration file. [`AnalyzerConfig`] is built in code (or from
//! CLI flags) with builder methods; [`ServeConfig`] is read from environment
//! variables at startup and may be overridden by CLI flags.
//!
//! # Example
//!
//! ```rust
//! use zapmetrics::config::{AnalyzerConfig, DateOrder};
//!
//! let config = AnalyzerConfig::new()
//!     .with_date_order(DateOrder::MonthFirst)
//!     .with_min_word_len(5);
//!
//! assert_eq!(config.min_word_len, 5);
//! ```

use serde::{Deserialize, Serialize};

use crate::archive::DEFAULT_MAX_CHAT_BYTES;
use crate::error::{Result, ZapError};

const MIB: usize = 1024 * 1024;

/// Converts a MiB count from the environment into bytes, saturating at `usize::MAX`.
pub fn mib_to_bytes(mb: usize) -> usize {
    mb.saturating_mul(MIB)
}

/// Order of the day and month fields in the export's `N/N/YY` dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateOrder {
    /// `D/M/YY` - pt-BR and most non-US locales.
    #[default]
    DayFirst,
    /// `M/D/YY` - US locale exports.
    MonthFirst,
}

/// Settings for parsing and report generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// How to read `N/N/YY` dates (default: day first)
    pub date_order: DateOrder,

    /// Minimum character length of a cleaned token to be counted (default: 4)
    pub min_word_len: usize,

    /// Joined message text shorter than this skips the word cloud (default: 20)
    pub min_cloud_chars: usize,

    /// Number of emojis in the emoji chart (default: 15)
    pub top_emojis: usize,

    /// Number of weighted words fed to the word cloud (default: 100)
    pub cloud_words: usize,

    /// Emojis listed per biography (default: 10)
    pub bio_emojis: usize,

    /// Frequent words listed per biography (default: 10)
    pub bio_words: usize,

    /// Largest decompressed chat transcript accepted, in bytes (default: 256 MiB)
    pub max_chat_bytes: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            date_order: DateOrder::DayFirst,
            min_word_len: 4,
            min_cloud_chars: 20,
            top_emojis: 15,
            cloud_words: 100,
            bio_emojis: 10,
            bio_words: 10,
            max_chat_bytes: DEFAULT_MAX_CHAT_BYTES,
        }
    }
}

impl AnalyzerConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_date_order(mut self, order: DateOrder) -> Self {
        self.date_order = order;
        self
    }

    #[must_use]
    pub fn with_min_word_len(mut self, len: usize) -> Self {
        self.min_word_len = len;
        self
    }

    #[must_use]
    pub fn with_min_cloud_chars(mut self, chars: usize) -> Self {
        self.min_cloud_chars = chars;
        self
    }

    #[must_use]
    pub fn with_top_emojis(mut self, n: usize) -> Self {
        self.top_emojis = n;
        self
    }

    #[must_use]
    pub fn with_max_chat_bytes(mut self, bytes: usize) -> Self {
        self.max_chat_bytes = bytes;
        self
    }

    /// Rejects settings that would make every section empty.
    pub fn validate(&self) -> Result<()> {
        if self.min_word_len == 0 {
            return Err(ZapError::invalid_config("min_word_len", "must be at least 1"));
        }
        if self.top_emojis == 0 {
            return Err(ZapError::invalid_config("top_emojis", "must be at least 1"));
        }
        if self.max_chat_bytes == 0 {
            return Err(ZapError::invalid_config("max_chat_bytes", "must be at least 1"));
        }
        Ok(())
    }
}

/// Deployment flavour, read from `ZAPMETRICS_DEPLOY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Deployment {
    /// Local run; metrics endpoint allowed.
    #[default]
    Local,
    /// Hosted without a scraper; metrics disabled.
    Cloud,
    /// No UI, no scraper; metrics disabled.
    Headless,
}

impl std::str::FromStr for Deployment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "" => Ok(Deployment::Local),
            "cloud" => Ok(Deployment::Cloud),
            "headless" => Ok(Deployment::Headless),
            _ => Err(format!(
                "Unknown deployment: '{}'. Expected one of: local, cloud, headless",
                s
            )),
        }
    }
}

/// Runtime configuration for `zapmetrics serve`.
///
/// Every field has a default so the server works without any environment
/// variables set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServeConfig {
    /// TCP address of the upload UI (default: `"127.0.0.1:8501"`).
    pub bind_address: String,

    /// Port of the Prometheus `/metrics` endpoint (default: 8000).
    pub metrics_port: u16,

    /// Deployment flavour (default: local).
    pub deployment: Deployment,

    /// Explicit metrics switch; `false` wins over the deployment (default: true).
    pub metrics_enabled: bool,

    /// Upload size limit in MiB (default: 50).
    pub max_upload_mb: usize,

    /// Decompressed chat size limit in MiB (default: 256).
    pub max_chat_mb: usize,

    /// `tracing` filter string (default: `"info"`).
    pub log_level: String,

    /// Emit log records as newline-delimited JSON (default: false).
    pub log_json: bool,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8501".to_string(),
            metrics_port: 8000,
            deployment: Deployment::Local,
            metrics_enabled: true,
            max_upload_mb: 50,
            max_chat_mb: DEFAULT_MAX_CHAT_BYTES / MIB,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl ServeConfig {
    /// Builds [`ServeConfig`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds from an arbitrary key lookup (used by [`from_env`](Self::from_env) and tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let flag = |key: &str, default: bool| {
            lookup(key)
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(default)
        };

        Self {
            bind_address: lookup("ZAPMETRICS_BIND").unwrap_or(defaults.bind_address),
            metrics_port: lookup("ZAPMETRICS_METRICS_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.metrics_port),
            deployment: lookup("ZAPMETRICS_DEPLOY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.deployment),
            metrics_enabled: flag("ZAPMETRICS_METRICS", defaults.metrics_enabled),
            max_upload_mb: lookup("ZAPMETRICS_MAX_UPLOAD_MB")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_upload_mb),
            max_chat_mb: lookup("ZAPMETRICS_MAX_CHAT_MB")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_chat_mb),
            log_level: lookup("ZAPMETRICS_LOG").unwrap_or(defaults.log_level),
            log_json: flag("ZAPMETRICS_LOG_JSON", defaults.log_json),
        }
    }

    /// Whether the metrics endpoint should be started.
    pub fn metrics_active(&self) -> bool {
        self.metrics_enabled && self.deployment == Deployment::Local
    }

    pub fn max_upload_bytes(&self) -> usize {
        mib_to_bytes(self.max_upload_mb)
    }

    pub fn max_chat_bytes(&self) -> usize {
        mib_to_bytes(self.max_chat_mb)
    }
}
