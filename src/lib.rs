//! # zapmetrics
//!
//! Descriptive metrics, charts and mini-biographies for conversations
//! exported from WhatsApp ("Export chat" → `.zip`).
//!
//! ## Overview
//!
//! One upload is processed start to finish:
//!
//! 1. [`archive`] pulls the first `.txt` entry out of the zip.
//! 2. [`parser`] turns the transcript into a [`RecordSet`].
//! 3. [`report`] aggregates the charts (messages per hour, day, weekday and
//!    period of day; top emojis; word cloud) and [`bio`] writes one
//!    mini-biography per participant.
//! 4. [`format`] renders the result as Markdown, JSON, CSV or HTML.
//!
//! Every step is timed through [`metrics`]; with the `server` feature the
//! timings are exposed to Prometheus next to the upload UI.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zapmetrics::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let analysis = Analyzer::new(AnalyzerConfig::default())
//!         .analyze_file("WhatsApp Chat com Ana.zip")?;
//!
//!     for bio in &analysis.report.biographies {
//!         println!("{}", bio.render_markdown());
//!     }
//!
//!     write_to_format(&analysis, "report.html", OutputFormat::Html)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Parsing text directly
//!
//! ```rust
//! use zapmetrics::parser::parse_messages;
//!
//! let records = parse_messages("1/1/24, 9:00 AM - Alice: Hello 😀\n1/1/24, 9:05 AM - Bob: Hi");
//! assert_eq!(records.authors(), vec!["Alice", "Bob"]);
//! ```
//!
//! ## Module Structure
//!
//! - [`archive`] — zip extraction ([`extract_chat_text`](archive::extract_chat_text))
//! - [`parser`] — [`WhatsAppParser`], [`ParseStats`]
//! - [`message`] — [`MessageRecord`], [`RecordSet`], [`Period`](message::Period)
//! - [`text`] — emoji detection, word cleaning, Portuguese stop words
//! - [`bio`] — [`Biography`](bio::Biography), calendar spans
//! - [`report`] — [`Analyzer`](report::Analyzer), [`Report`](report::Report), renderers
//! - [`metrics`] — [`StepRecorder`](metrics::StepRecorder) and the Prometheus recorder
//! - [`config`] — [`AnalyzerConfig`], [`ServeConfig`](config::ServeConfig)
//! - [`error`] — [`ZapError`], [`Result`]
//! - `server` — axum upload UI (feature `server`)
//! - `cli` — clap argument types (feature `cli`)

pub mod archive;
pub mod bio;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod message;
pub mod metrics;
pub mod parser;
mod parsing;
pub mod report;
#[cfg(feature = "server")]
pub mod server;
pub mod text;

// Re-export the main types at the crate root for convenience
pub use config::AnalyzerConfig;
pub use error::{Result, ZapError};
pub use message::{MessageRecord, RecordSet};
pub use parser::{ParseStats, WhatsAppParser};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use zapmetrics::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Result, ZapError};

    pub use crate::config::{AnalyzerConfig, DateOrder, ServeConfig};
    pub use crate::message::{MessageRecord, Period, RecordSet};
    pub use crate::parser::{ParseStats, WhatsAppParser, parse_messages};

    pub use crate::archive::{
        DEFAULT_MAX_CHAT_BYTES, ExtractedChat, extract_chat_file, extract_chat_text,
    };
    pub use crate::bio::{Biography, CalendarSpan, generate_biographies};
    pub use crate::report::{Analysis, Analyzer, Report, Section};

    pub use crate::format::{OutputFormat, to_format_string, write_to_format};
    pub use crate::metrics::{NoopRecorder, StepRecorder, track};
}
