//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] / [`Command`] - the `analyze` and `serve` subcommands
//! - [`OutputFormat`] - CLI-facing format values, convertible to
//!   [`crate::format::OutputFormat`]
//!
//! Flags only override; anything not given falls back to
//! [`AnalyzerConfig::default`] or [`ServeConfig::from_env`].

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{AnalyzerConfig, DateOrder, ServeConfig, mib_to_bytes};

/// Descriptive metrics, charts and mini-biographies for exported
/// WhatsApp conversations.
#[derive(Parser, Debug, Clone)]
#[command(name = "zapmetrics")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    zapmetrics analyze \"WhatsApp Chat com Ana.zip\"
    zapmetrics analyze chat.zip -f json -o report.json
    zapmetrics analyze chat.zip --month-first -f csv -o records.csv
    zapmetrics serve --bind 0.0.0.0:8501")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Analyze an exported chat archive and print or save the report
    Analyze(AnalyzeArgs),

    /// Start the upload web UI (and the Prometheus endpoint)
    Serve(ServeArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Path to the WhatsApp export (.zip)
    pub input: String,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format (default: from the -o extension, else markdown)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Read dates as M/D/YY (US exports) instead of D/M/YY
    #[arg(long)]
    pub month_first: bool,

    /// Minimum length of a cleaned word to be counted
    #[arg(long, value_name = "N")]
    pub min_word_len: Option<usize>,

    /// Minimum characters of text needed for the word cloud
    #[arg(long, value_name = "N")]
    pub min_cloud_chars: Option<usize>,

    /// Largest decompressed chat file accepted, in MiB
    #[arg(long, value_name = "MB")]
    pub max_chat_mb: Option<usize>,
}

impl AnalyzeArgs {
    /// The `-f` value, or the format implied by the `-o` extension.
    pub fn resolved_format(&self) -> crate::format::OutputFormat {
        if let Some(format) = self.format {
            return format.into();
        }
        self.output
            .as_deref()
            .and_then(|path| crate::format::OutputFormat::from_path(path).ok())
            .unwrap_or_default()
    }

    /// Builds the analyzer settings from the flags.
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        let mut config = AnalyzerConfig::new();
        if self.month_first {
            config = config.with_date_order(DateOrder::MonthFirst);
        }
        if let Some(n) = self.min_word_len {
            config = config.with_min_word_len(n);
        }
        if let Some(n) = self.min_cloud_chars {
            config = config.with_min_cloud_chars(n);
        }
        if let Some(mb) = self.max_chat_mb {
            config = config.with_max_chat_bytes(mib_to_bytes(mb));
        }
        config
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Address of the upload UI (overrides ZAPMETRICS_BIND)
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Port of the /metrics endpoint (overrides ZAPMETRICS_METRICS_PORT)
    #[arg(long, value_name = "PORT")]
    pub metrics_port: Option<u16>,

    /// Read dates as M/D/YY (US exports) instead of D/M/YY
    #[arg(long)]
    pub month_first: bool,
}

impl ServeArgs {
    /// Applies the flags on top of an environment-derived config.
    pub fn apply(&self, mut config: ServeConfig) -> ServeConfig {
        if let Some(bind) = &self.bind {
            config.bind_address.clone_from(bind);
        }
        if let Some(port) = self.metrics_port {
            config.metrics_port = port;
        }
        config
    }

    pub fn analyzer_config(&self) -> AnalyzerConfig {
        let config = AnalyzerConfig::new();
        if self.month_first {
            config.with_date_order(DateOrder::MonthFirst)
        } else {
            config
        }
    }
}

/// Output format options.
///
/// - [`Markdown`](OutputFormat::Markdown) - text tables (default)
/// - [`Json`](OutputFormat::Json) - report plus records
/// - [`Csv`](OutputFormat::Csv) - parsed records, `;` delimited
/// - [`Html`](OutputFormat::Html) - interactive page with charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    #[value(alias = "md")]
    Markdown,
    Json,
    Csv,
    Html,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&crate::format::OutputFormat::from(*self), f)
    }
}

// Conversion to library format type
impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> crate::format::OutputFormat {
        match format {
            OutputFormat::Markdown => crate::format::OutputFormat::Markdown,
            OutputFormat::Json => crate::format::OutputFormat::Json,
            OutputFormat::Csv => crate::format::OutputFormat::Csv,
            OutputFormat::Html => crate::format::OutputFormat::Html,
        }
    }
}
