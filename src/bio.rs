//! Per-author mini-biographies.
//!
//! One [`Biography`] per distinct author: message count, the first emojis
//! they used, their most frequent words and how long the conversation has
//! existed. The duration comes from the whole record set's first and last
//! timestamps, so every author in one report shows the same value.
//!
//! # Example
//!
//! ```
//! use zapmetrics::bio::generate_biographies;
//! use zapmetrics::config::AnalyzerConfig;
//! use zapmetrics::parser::parse_messages;
//!
//! let records = parse_messages(
//!     "1/1/24, 9:00 AM - Alice: Hello 😀\n1/1/24, 9:05 AM - Bob: Hi there",
//! );
//! let bios = generate_biographies(&records, &AnalyzerConfig::default());
//!
//! assert_eq!(bios[0].author, "Alice");
//! assert_eq!(bios[0].emojis, vec!['😀']);
//! assert_eq!(bios[1].frequent_words, vec!["there".to_string()]);
//! ```

use chrono::{Datelike, Months, NaiveDateTime};
use serde::Serialize;

use crate::config::AnalyzerConfig;
use crate::message::RecordSet;
use crate::text::{WordCounter, count_unique_emojis};

/// Calendar difference between two instants, in whole years, months and days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CalendarSpan {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl CalendarSpan {
    /// Difference from `start` to `end`; zero when `end` is not after `start`.
    ///
    /// Whole months are taken first (landing on the same day of month,
    /// clamped to the month's last day), then the remaining whole days.
    pub fn between(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        if end <= start {
            return Self::default();
        }

        let mut months =
            (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
        let mut anchor = add_months(start, months);
        while months > 0 && anchor.is_none_or(|a| a > end) {
            months -= 1;
            anchor = add_months(start, months);
        }
        let anchor = anchor.unwrap_or(start);
        let days = (end - anchor).num_days().max(0);

        Self {
            years: (months / 12) as u32,
            months: (months % 12) as u32,
            days: days as u32,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.years == 0 && self.months == 0 && self.days == 0
    }

    /// Portuguese rendering, e.g. `"1 ano, 2 meses, 3 dias"` or `"menos de 1 dia"`.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if self.years > 0 {
            parts.push(plural(self.years, "ano", "anos"));
        }
        if self.months > 0 {
            parts.push(plural(self.months, "mês", "meses"));
        }
        if self.days > 0 {
            parts.push(plural(self.days, "dia", "dias"));
        }
        if parts.is_empty() {
            return "menos de 1 dia".to_string();
        }
        parts.join(", ")
    }
}

fn add_months(start: NaiveDateTime, months: i32) -> Option<NaiveDateTime> {
    let months = u32::try_from(months).ok()?;
    start.checked_add_months(Months::new(months))
}

fn plural(n: u32, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

impl std::fmt::Display for CalendarSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Summary of one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Biography {
    pub author: String,
    pub message_count: usize,
    /// First emojis used, in order of first use.
    pub emojis: Vec<char>,
    /// Most frequent countable words, most frequent first.
    pub frequent_words: Vec<String>,
    /// Age of the whole conversation.
    pub duration: CalendarSpan,
}

impl Biography {
    /// Emojis joined for display, `"nenhum"` when none were used.
    pub fn emoji_summary(&self) -> String {
        if self.emojis.is_empty() {
            return "nenhum".to_string();
        }
        self.emojis
            .iter()
            .map(char::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Frequent words joined for display, `"nenhuma"` when empty.
    pub fn word_summary(&self) -> String {
        if self.frequent_words.is_empty() {
            return "nenhuma".to_string();
        }
        self.frequent_words.join(", ")
    }

    /// Markdown block shown under "Mini-Biografias".
    pub fn render_markdown(&self) -> String {
        format!(
            "**Participante {}**  \n\
             - Total de mensagens: {}  \n\
             - Emojis mais usados: {}  \n\
             - Palavras frequentes: {}\n\
             - Quanto tempo se conhecem: {}\n",
            self.author,
            self.message_count,
            self.emoji_summary(),
            self.word_summary(),
            self.duration.describe()
        )
    }
}

/// Builds one biography per author, in order of first appearance.
pub fn generate_biographies(records: &RecordSet, config: &AnalyzerConfig) -> Vec<Biography> {
    let duration = records
        .span()
        .map(|(first, last)| CalendarSpan::between(first, last))
        .unwrap_or_default();

    records
        .authors()
        .into_iter()
        .map(|author| {
            let messages: Vec<&str> = records.messages_by(author).collect();
            let text = messages.join(" ");

            let mut emojis = count_unique_emojis(&text);
            emojis.truncate(config.bio_emojis);

            let mut counter = WordCounter::new(config.min_word_len);
            counter.add_text(&text);
            let frequent_words = counter
                .most_common(config.bio_words)
                .into_iter()
                .map(|(word, _)| word)
                .collect();

            Biography {
                author: author.to_string(),
                message_count: messages.len(),
                emojis,
                frequent_words,
                duration,
            }
        })
        .collect()
}
