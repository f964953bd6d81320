//! Report assembly.
//!
//! [`Analyzer`] drives the whole pipeline for one export: parse, then the
//! six chart aggregations, then the biographies. Every step runs under
//! [`track`] so its duration reaches the configured [`StepRecorder`].
//!
//! # Example
//!
//! ```rust
//! # fn main() -> zapmetrics::Result<()> {
//! use zapmetrics::config::AnalyzerConfig;
//! use zapmetrics::report::Analyzer;
//!
//! let text = "\
//! 1/1/24, 9:00 AM - Alice: Hello 😀
//! 1/1/24, 9:05 AM - Bob: Hi there";
//!
//! let analysis = Analyzer::new(AnalyzerConfig::default()).analyze(text)?;
//! assert_eq!(analysis.report.summary.messages, 2);
//! assert_eq!(analysis.report.biographies.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod charts;
pub mod output;

use std::io::{Read, Seek};
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::info;

use crate::archive::{extract_chat_file, extract_chat_text};
use crate::bio::{Biography, generate_biographies};
use crate::config::AnalyzerConfig;
use crate::error::{Result, ZapError};
use crate::message::RecordSet;
use crate::metrics::{NoopRecorder, SharedRecorder, StepRecorder, track};
use crate::parser::{ParseStats, WhatsAppParser};

pub use charts::{CountPoint, CountSeries};

/// Shown instead of the emoji chart when no message has an emoji.
pub const NO_EMOJI_NOTICE: &str = "Nenhum emoji encontrado.";

/// Shown instead of the word cloud when there is too little text.
pub const LITTLE_TEXT_NOTICE: &str = "Pouco texto para gerar nuvem de palavras.";

/// A chart, or the notice displayed in its place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Section<T> {
    Chart { data: T },
    Empty { notice: String },
}

impl<T> Section<T> {
    pub fn chart(data: T) -> Self {
        Section::Chart { data }
    }

    pub fn empty(notice: impl Into<String>) -> Self {
        Section::Empty {
            notice: notice.into(),
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Section::Chart { data } => Some(data),
            Section::Empty { .. } => None,
        }
    }

    pub fn notice(&self) -> Option<&str> {
        match self {
            Section::Chart { .. } => None,
            Section::Empty { notice } => Some(notice),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Section::Empty { .. })
    }
}

/// Headline numbers for the report header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Name of the chat file inside the archive, when known.
    pub source: Option<String>,
    pub messages: usize,
    pub authors: Vec<String>,
    pub first_message: Option<NaiveDateTime>,
    pub last_message: Option<NaiveDateTime>,
    pub parse: ParseStats,
}

/// Everything shown for one export, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub summary: Summary,
    pub hourly: Vec<CountSeries>,
    pub daily: Vec<CountSeries>,
    pub weekday: CountSeries,
    pub periods: Vec<CountSeries>,
    pub emojis: Section<Vec<CountPoint>>,
    pub word_cloud: Section<Vec<CountPoint>>,
    pub biographies: Vec<Biography>,
}

/// Parsed records together with the report built from them.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub records: RecordSet,
    pub report: Report,
}

/// Runs the analysis pipeline.
#[derive(Clone)]
pub struct Analyzer {
    config: AnalyzerConfig,
    recorder: SharedRecorder,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

impl Analyzer {
    /// Creates an analyzer that records nothing.
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            config,
            recorder: Arc::new(NoopRecorder),
        }
    }

    /// Sends step timings to `recorder`.
    #[must_use]
    pub fn with_recorder(mut self, recorder: SharedRecorder) -> Self {
        self.recorder = recorder;
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Extracts the chat from a zip and analyzes it.
    pub fn analyze_archive<R: Read + Seek>(&self, reader: R) -> Result<Analysis> {
        let chat = extract_chat_text(reader, self.config.max_chat_bytes)?;
        let mut analysis = self.analyze(&chat.text)?;
        analysis.report.summary.source = Some(chat.file_name);
        Ok(analysis)
    }

    /// Extracts the chat from a zip on disk and analyzes it.
    pub fn analyze_file(&self, path: impl AsRef<Path>) -> Result<Analysis> {
        let chat = extract_chat_file(path, self.config.max_chat_bytes)?;
        let mut analysis = self.analyze(&chat.text)?;
        analysis.report.summary.source = Some(chat.file_name);
        Ok(analysis)
    }

    /// Parses decoded chat text and builds the full report.
    ///
    /// # Errors
    ///
    /// [`ZapError::NoMessages`] if no line of `text` parses to a message;
    /// [`ZapError::InvalidConfig`] if the configuration is rejected.
    pub fn analyze(&self, text: &str) -> Result<Analysis> {
        self.config.validate()?;
        let recorder: &dyn StepRecorder = self.recorder.as_ref();

        let parser = WhatsAppParser::from_config(&self.config);
        let parsed = track(recorder, "parse_messages", || parser.parse_str(text));
        if parsed.records.is_empty() {
            return Err(ZapError::NoMessages);
        }
        recorder.set_messages(parsed.records.len());

        let report = self.build_report(&parsed.records, parsed.stats);
        info!(
            messages = report.summary.messages,
            authors = report.summary.authors.len(),
            dropped = parsed.stats.dropped_timestamps,
            "chat analyzed"
        );

        Ok(Analysis {
            records: parsed.records,
            report,
        })
    }

    /// Runs the chart and biography steps over already-parsed records.
    pub fn build_report(&self, records: &RecordSet, stats: ParseStats) -> Report {
        let recorder: &dyn StepRecorder = self.recorder.as_ref();
        let config = &self.config;

        let hourly = track(recorder, "plot_hour_author", || {
            charts::messages_by_hour_author(records)
        });
        let daily = track(recorder, "plot_day_author", || {
            charts::messages_by_day_author(records)
        });
        let weekday = track(recorder, "plot_weekday", || {
            charts::messages_by_weekday(records)
        });
        let periods = track(recorder, "plot_periods", || {
            charts::messages_by_period_author(records)
        });
        let emojis = track(recorder, "plot_emojis", || {
            let top = charts::top_emojis(records, config.top_emojis);
            if top.is_empty() {
                Section::empty(NO_EMOJI_NOTICE)
            } else {
                Section::chart(top)
            }
        });
        let word_cloud = track(recorder, "plot_wordcloud", || {
            match charts::word_cloud_weights(
                records,
                config.min_cloud_chars,
                config.min_word_len,
                config.cloud_words,
            ) {
                Some(words) => Section::chart(words),
                None => Section::empty(LITTLE_TEXT_NOTICE),
            }
        });
        let biographies = track(recorder, "generate_bios", || {
            generate_biographies(records, config)
        });

        let span = records.span();
        Report {
            summary: Summary {
                source: None,
                messages: records.len(),
                authors: records.authors().into_iter().map(String::from).collect(),
                first_message: span.map(|(first, _)| first),
                last_message: span.map(|(_, last)| last),
                parse: stats,
            },
            hourly,
            daily,
            weekday,
            periods,
            emojis,
            word_cloud,
            biographies,
        }
    }
}
