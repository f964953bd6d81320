//! WhatsApp chat log parser.
//!
//! Turns the decoded text of an export into a [`RecordSet`]. The parser walks
//! the text line by line:
//!
//! 1. A header line starts a new message.
//! 2. Continuation lines are appended (with `\n`) to the current body, up to
//!    the next timestamped line or end of text. Trailing lines at end of text
//!    therefore belong to the last message.
//! 3. Timestamped lines without an author (system notices) close the current
//!    message and are skipped.
//! 4. Lines before the first header are skipped.
//!
//! Headers whose timestamp does not form a valid date are dropped, together
//! with their body; the number dropped is reported in [`ParseStats`].
//!
//! # Example
//!
//! ```rust
//! use zapmetrics::parser::parse_messages;
//!
//! let text = "1/1/24, 9:00 AM - Alice: Hello 😀\n1/1/24, 9:05 AM - Bob: Hi there";
//! let records = parse_messages(text);
//!
//! assert_eq!(records.len(), 2);
//! assert_eq!(records.records()[1].message, "Hi there");
//! ```

use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{AnalyzerConfig, DateOrder};
use crate::error::Result;
use crate::message::{MessageRecord, RecordSet};
use crate::parsing::{LineKind, classify_line, parse_whatsapp_timestamp};

/// Counters collected while parsing one export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Lines recognised as message headers.
    pub headers_matched: usize,
    /// Records kept in the output.
    pub records: usize,
    /// Headers dropped because their timestamp was invalid.
    pub dropped_timestamps: usize,
    /// Lines appended to a previous body.
    pub continuation_lines: usize,
    /// Timestamped lines with no author.
    pub system_lines: usize,
}

/// Result of a parse: the kept records plus counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutput {
    pub records: RecordSet,
    pub stats: ParseStats,
}

/// Parser for WhatsApp TXT exports.
///
/// # Example
///
/// ```rust
/// use zapmetrics::config::DateOrder;
/// use zapmetrics::parser::WhatsAppParser;
///
/// let parser = WhatsAppParser::new().with_date_order(DateOrder::MonthFirst);
/// let output = parser.parse_str("3/15/24, 8:00 PM - Ana: oi");
/// assert_eq!(output.records.len(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct WhatsAppParser {
    date_order: DateOrder,
}

/// In-progress message while its continuation lines are collected.
struct Pending<'a> {
    timestamp: Option<NaiveDateTime>,
    author: &'a str,
    body: String,
}

impl WhatsAppParser {
    /// Creates a parser reading dates day-first.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parser from analyzer settings.
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self {
            date_order: config.date_order,
        }
    }

    #[must_use]
    pub fn with_date_order(mut self, order: DateOrder) -> Self {
        self.date_order = order;
        self
    }

    pub fn date_order(&self) -> DateOrder {
        self.date_order
    }

    /// Parses an export file from disk.
    pub fn parse(&self, path: &Path) -> Result<ParseOutput> {
        let content = fs::read_to_string(path)?;
        Ok(self.parse_str(&content))
    }

    /// Parses export text already in memory.
    pub fn parse_str(&self, content: &str) -> ParseOutput {
        let mut stats = ParseStats::default();
        let mut records: Vec<MessageRecord> = Vec::new();
        let mut pending: Option<Pending<'_>> = None;

        for line in content.lines() {
            match classify_line(line) {
                LineKind::Header(parts) => {
                    stats.headers_matched += 1;
                    Self::flush(pending.take(), &mut records, &mut stats);
                    pending = Some(Pending {
                        timestamp: parse_whatsapp_timestamp(&parts, self.date_order),
                        author: parts.author,
                        body: parts.body.to_string(),
                    });
                }
                LineKind::Notice => {
                    stats.system_lines += 1;
                    Self::flush(pending.take(), &mut records, &mut stats);
                }
                LineKind::Continuation => {
                    if let Some(current) = pending.as_mut() {
                        stats.continuation_lines += 1;
                        current.body.push('\n');
                        current.body.push_str(line);
                    }
                    // Orphan lines before the first header are skipped
                }
            }
        }
        Self::flush(pending, &mut records, &mut stats);

        stats.records = records.len();
        if stats.dropped_timestamps > 0 {
            warn!(
                dropped = stats.dropped_timestamps,
                "dropped messages with invalid timestamps"
            );
        }
        debug!(
            headers = stats.headers_matched,
            records = stats.records,
            system_lines = stats.system_lines,
            "parsed chat text"
        );

        ParseOutput {
            records: RecordSet::new(records),
            stats,
        }
    }

    fn flush(pending: Option<Pending<'_>>, records: &mut Vec<MessageRecord>, stats: &mut ParseStats) {
        let Some(Pending {
            timestamp,
            author,
            body,
        }) = pending
        else {
            return;
        };

        match timestamp {
            Some(ts) => records.push(MessageRecord::new(ts, author, body.trim())),
            None => stats.dropped_timestamps += 1,
        }
    }
}

/// Parses chat text with default settings and returns the records.
pub fn parse_messages(text: &str) -> RecordSet {
    WhatsAppParser::new().parse_str(text).records
}
