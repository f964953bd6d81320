//! Parsed chat records and their derived calendar fields.
//!
//! A [`MessageRecord`] is one `(timestamp, author, message)` tuple taken from
//! a WhatsApp export. Calendar fields (year, month, weekday, hour, period of
//! day) are derived on demand from the timestamp, so a record is never
//! mutated after parsing.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use zapmetrics::message::{MessageRecord, Period};
//!
//! let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
//!     .unwrap()
//!     .and_hms_opt(9, 0, 0)
//!     .unwrap();
//! let record = MessageRecord::new(ts, "Alice", "Hello");
//!
//! assert_eq!(record.hour(), 9);
//! assert_eq!(record.period(), Period::Manha);
//! assert_eq!(record.weekday_name(), "Segunda-feira");
//! assert_eq!(record.year_month(), "2024-01");
//! ```

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize, Serializer};
use serde::ser::SerializeStruct;

/// Time-of-day bucket used by the period chart and derived per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Period {
    /// 00:00–05:59
    Madrugada,
    /// 06:00–11:59
    #[serde(rename = "Manhã")]
    Manha,
    /// 12:00–17:59
    Tarde,
    /// 18:00–23:59
    Noite,
}

impl Period {
    /// Buckets an hour of day (0–23).
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => Period::Manha,
            12..=17 => Period::Tarde,
            18..=23 => Period::Noite,
            _ => Period::Madrugada,
        }
    }

    /// Chart display order.
    pub fn all() -> &'static [Period] {
        &[Period::Madrugada, Period::Manha, Period::Tarde, Period::Noite]
    }

    /// Portuguese label.
    pub fn label(self) -> &'static str {
        match self {
            Period::Madrugada => "Madrugada",
            Period::Manha => "Manhã",
            Period::Tarde => "Tarde",
            Period::Noite => "Noite",
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Portuguese weekday name.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Segunda-feira",
        Weekday::Tue => "Terça-feira",
        Weekday::Wed => "Quarta-feira",
        Weekday::Thu => "Quinta-feira",
        Weekday::Fri => "Sexta-feira",
        Weekday::Sat => "Sábado",
        Weekday::Sun => "Domingo",
    }
}

/// A single parsed chat message.
///
/// # Fields
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `timestamp` | `NaiveDateTime` | Local wall-clock time printed in the export |
/// | `author` | `String` | Display name exactly as exported |
/// | `message` | `String` | Trimmed body, may be empty or span lines |
///
/// Serialization includes the derived calendar fields, so JSON and CSV
/// consumers get the same columns the charts are built from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageRecord {
    /// When the message was sent (export-local time, no zone).
    pub timestamp: NaiveDateTime,

    /// Display name of the author. Not normalised or deduplicated.
    pub author: String,

    /// Message body, trimmed.
    pub message: String,
}

impl MessageRecord {
    /// Creates a new record.
    pub fn new(
        timestamp: NaiveDateTime,
        author: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            author: author.into(),
            message: message.into(),
        }
    }

    pub fn year(&self) -> i32 {
        self.timestamp.year()
    }

    pub fn month(&self) -> u32 {
        self.timestamp.month()
    }

    /// Year-month bucket, formatted `YYYY-MM`.
    pub fn year_month(&self) -> String {
        self.timestamp.format("%Y-%m").to_string()
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn weekday(&self) -> Weekday {
        self.timestamp.weekday()
    }

    /// Weekday in the target locale (pt-BR).
    pub fn weekday_name(&self) -> &'static str {
        weekday_name(self.weekday())
    }

    /// Hour of day, 0–23.
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    pub fn period(&self) -> Period {
        Period::from_hour(self.hour())
    }
}

impl Serialize for MessageRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("MessageRecord", 10)?;
        state.serialize_field("timestamp", &self.timestamp)?;
        state.serialize_field("author", &self.author)?;
        state.serialize_field("message", &self.message)?;
        state.serialize_field("year", &self.year())?;
        state.serialize_field("month", &self.month())?;
        state.serialize_field("year_month", &self.year_month())?;
        state.serialize_field("date", &self.date())?;
        state.serialize_field("weekday", self.weekday_name())?;
        state.serialize_field("hour", &self.hour())?;
        state.serialize_field("period", self.period().label())?;
        state.end()
    }
}

/// Ordered collection of records in chat order.
///
/// Authors are implicit: they are the distinct values of the `author` field,
/// taken in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSet {
    records: Vec<MessageRecord>,
}

impl RecordSet {
    pub fn new(records: Vec<MessageRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[MessageRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MessageRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct authors in order of first appearance.
    pub fn authors(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|r| r.author.as_str())
            .filter(|a| seen.insert(*a))
            .collect()
    }

    /// Message bodies written by `author`, in chat order.
    pub fn messages_by<'a>(&'a self, author: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.records
            .iter()
            .filter(move |r| r.author == author)
            .map(|r| r.message.as_str())
    }

    /// Global earliest and latest timestamp, or `None` for an empty set.
    pub fn span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.records.first()?.timestamp;
        Some(self.records.iter().fold((first, first), |(lo, hi), r| {
            (lo.min(r.timestamp), hi.max(r.timestamp))
        }))
    }

    /// All bodies joined with single spaces.
    pub fn joined_text(&self) -> String {
        let bodies: Vec<&str> = self.records.iter().map(|r| r.message.as_str()).collect();
        bodies.join(" ")
    }

    /// Character length of [`joined_text`](Self::joined_text).
    pub fn total_text_len(&self) -> usize {
        self.joined_text().chars().count()
    }
}

impl From<Vec<MessageRecord>> for RecordSet {
    fn from(records: Vec<MessageRecord>) -> Self {
        Self::new(records)
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a MessageRecord;
    type IntoIter = std::slice::Iter<'a, MessageRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
