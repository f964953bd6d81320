//! Chart aggregations.
//!
//! Each function reduces the record set to the counts one chart plots.
//! Output is plain data ([`CountSeries`]); drawing is left to the renderers
//! in [`super::output`]. All orderings are deterministic: where counts tie,
//! first appearance in the chat wins.

use std::collections::HashMap;

use serde::Serialize;

use crate::message::{Period, RecordSet};
use crate::text::{WordCounter, count_unique_emojis};

/// One bar / histogram bin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountPoint {
    pub label: String,
    pub count: usize,
}

impl CountPoint {
    pub fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// A named sequence of bins; one per author in grouped charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountSeries {
    pub name: String,
    pub points: Vec<CountPoint>,
}

impl CountSeries {
    pub fn total(&self) -> usize {
        self.points.iter().map(|p| p.count).sum()
    }

    /// Count for a label, 0 when absent.
    pub fn count_for(&self, label: &str) -> usize {
        self.points
            .iter()
            .find(|p| p.label == label)
            .map_or(0, |p| p.count)
    }
}

/// Groups records per author, then counts by `key`; bins sorted by `order`.
fn grouped_by_author<K, F, O>(records: &RecordSet, key: F, order: O) -> Vec<CountSeries>
where
    K: Eq + std::hash::Hash + Clone + ToString,
    F: Fn(&crate::message::MessageRecord) -> K,
    O: Fn(&K, &K) -> std::cmp::Ordering,
{
    records
        .authors()
        .into_iter()
        .map(|author| {
            let mut counts: HashMap<K, usize> = HashMap::new();
            for record in records.iter().filter(|r| r.author == author) {
                *counts.entry(key(record)).or_insert(0) += 1;
            }
            let mut bins: Vec<(K, usize)> = counts.into_iter().collect();
            bins.sort_by(|a, b| order(&a.0, &b.0));
            CountSeries {
                name: author.to_string(),
                points: bins
                    .into_iter()
                    .map(|(k, count)| CountPoint::new(k.to_string(), count))
                    .collect(),
            }
        })
        .collect()
}

/// Messages per (author, hour of day). Only hours with messages appear.
pub fn messages_by_hour_author(records: &RecordSet) -> Vec<CountSeries> {
    grouped_by_author(records, |r| r.hour(), |a, b| a.cmp(b))
}

/// Messages per (author, calendar date), dates ascending.
pub fn messages_by_day_author(records: &RecordSet) -> Vec<CountSeries> {
    grouped_by_author(records, |r| r.date(), |a, b| a.cmp(b))
}

/// Messages per weekday name, most active first.
pub fn messages_by_weekday(records: &RecordSet) -> CountSeries {
    let mut order: Vec<&'static str> = Vec::new();
    let mut counts: HashMap<&'static str, usize> = HashMap::new();
    for record in records {
        let name = record.weekday_name();
        let count = counts.entry(name).or_insert_with(|| {
            order.push(name);
            0
        });
        *count += 1;
    }

    // stable sort keeps first appearance among ties
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    CountSeries {
        name: "Mensagens".to_string(),
        points: order
            .into_iter()
            .map(|name| CountPoint::new(name, counts[name]))
            .collect(),
    }
}

/// Messages per (author, period of day), periods in display order.
pub fn messages_by_period_author(records: &RecordSet) -> Vec<CountSeries> {
    let mut series = grouped_by_author(records, |r| r.period(), |a: &Period, b| a.cmp(b));
    for s in &mut series {
        // include empty periods so every author shares the category axis
        s.points = Period::all()
            .iter()
            .map(|p| CountPoint::new(p.label(), s.count_for(p.label())))
            .collect();
    }
    series
}

/// Most common emojis, counted once per message that contains them.
///
/// Returns an empty vector when no message contains an emoji.
pub fn top_emojis(records: &RecordSet, limit: usize) -> Vec<CountPoint> {
    let mut order: Vec<char> = Vec::new();
    let mut counts: HashMap<char, usize> = HashMap::new();
    for record in records {
        for emoji in count_unique_emojis(&record.message) {
            let count = counts.entry(emoji).or_insert_with(|| {
                order.push(emoji);
                0
            });
            *count += 1;
        }
    }

    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order
        .into_iter()
        .take(limit)
        .map(|emoji| CountPoint::new(emoji.to_string(), counts[&emoji]))
        .collect()
}

/// Weighted words for the word cloud.
///
/// Returns `None` when the joined message text is shorter than
/// `min_chars` characters.
pub fn word_cloud_weights(
    records: &RecordSet,
    min_chars: usize,
    min_word_len: usize,
    limit: usize,
) -> Option<Vec<CountPoint>> {
    let text = records.joined_text();
    if text.chars().count() < min_chars {
        return None;
    }

    let mut counter = WordCounter::new(min_word_len);
    counter.add_text(&text);
    Some(
        counter
            .most_common(limit)
            .into_iter()
            .map(|(word, count)| CountPoint::new(word, count))
            .collect(),
    )
}
