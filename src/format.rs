//! Output format selection.
//!
//! Library-level format enum shared by the CLI and callers embedding the
//! crate; it carries no CLI framework types.
//!
//! # Example
//!
//! ```rust
//! # fn main() -> zapmetrics::Result<()> {
//! use zapmetrics::format::{OutputFormat, to_format_string};
//! use zapmetrics::report::Analyzer;
//!
//! let analysis = Analyzer::default().analyze("1/1/24, 9:00 AM - Alice: Hello")?;
//! let md = to_format_string(&analysis, OutputFormat::Markdown)?;
//! assert!(md.contains("Participante Alice"));
//!
//! let format = OutputFormat::from_path("report.html")?;
//! assert_eq!(format, OutputFormat::Html);
//! # Ok(())
//! # }
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ZapError};
use crate::report::Analysis;
use crate::report::output::{
    records_to_csv, render_html, render_json_with_records, render_markdown, write_records_csv,
};

/// Output format for an analysis.
///
/// - [`Markdown`](OutputFormat::Markdown) - text tables, the terminal default
/// - [`Json`](OutputFormat::Json) - report plus records, for other tools
/// - [`Csv`](OutputFormat::Csv) - parsed records with derived fields, `;` delimited
/// - [`Html`](OutputFormat::Html) - the interactive page served by `serve`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
    Csv,
    Html,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    ///
    /// ```rust
    /// use zapmetrics::format::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::Markdown.extension(), "md");
    /// assert_eq!(OutputFormat::Csv.extension(), "csv");
    /// ```
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Html => "html",
        }
    }

    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["markdown", "md", "json", "csv", "html"]
    }

    /// Returns all available formats.
    pub fn all() -> &'static [OutputFormat] {
        &[
            OutputFormat::Markdown,
            OutputFormat::Json,
            OutputFormat::Csv,
            OutputFormat::Html,
        ]
    }

    /// Detects format from a file path based on extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "html" | "htm" => Ok(OutputFormat::Html),
            _ => Err(ZapError::invalid_config(
                "format",
                format!("Unknown file extension: '.{ext}'. Expected one of: md, json, csv, html"),
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Markdown => write!(f, "Markdown"),
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Csv => write!(f, "CSV"),
            OutputFormat::Html => write!(f, "HTML"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "html" => Ok(OutputFormat::Html),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                OutputFormat::all_names().join(", ")
            )),
        }
    }
}

/// Writes an analysis to any writer in the given format.
pub fn write_format<W: Write>(
    analysis: &Analysis,
    mut writer: W,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Csv => write_records_csv(&analysis.records, writer),
        other => {
            writer.write_all(to_format_string(analysis, other)?.as_bytes())?;
            writer.flush()?;
            Ok(())
        }
    }
}

/// Writes an analysis to a file in the given format.
pub fn write_to_format(
    analysis: &Analysis,
    path: impl AsRef<Path>,
    format: OutputFormat,
) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    write_format(analysis, file, format)
}

/// Converts an analysis to a string in the given format.
pub fn to_format_string(analysis: &Analysis, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Markdown => Ok(render_markdown(&analysis.report)),
        OutputFormat::Json => render_json_with_records(analysis),
        OutputFormat::Csv => records_to_csv(&analysis.records),
        OutputFormat::Html => render_html(&analysis.report),
    }
}
