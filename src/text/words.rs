//! Token cleaning and word-frequency ranking.
//!
//! A token is counted when its cleaned form is non-empty, at least
//! `min_len` characters long and not a stop word. The length check looks at
//! the cleaned token, so `"oi!!"` (four raw characters, `"oi"` cleaned) is
//! not counted while `"there"` is.

use std::collections::HashMap;

use super::emoji::is_emoji;
use super::stopwords::is_stopword;

/// Default minimum cleaned length for a counted token.
pub const MIN_WORD_LEN: usize = 4;

/// Drops emoji from a token and lower-cases the rest, then keeps only word
/// characters and trims.
///
/// Word characters are letters, digits and `_`. Lower-casing runs before the
/// character filter, so marks produced by case mapping (`İ` lowers to `i`
/// plus U+0307) are filtered in the same pass and cleaning a cleaned token
/// returns it unchanged.
///
/// ```
/// use zapmetrics::text::clean_word;
///
/// assert_eq!(clean_word("Olá!!😀"), "olá");
/// assert_eq!(clean_word("snake_case"), "snake_case");
/// assert_eq!(clean_word("...🎉"), "");
/// ```
pub fn clean_word(word: &str) -> String {
    let lowered: String = word.chars().filter(|c| !is_emoji(*c)).collect::<String>().to_lowercase();
    lowered
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Whether a cleaned token takes part in frequency counting.
pub fn is_countable(cleaned: &str, min_len: usize) -> bool {
    !cleaned.is_empty() && cleaned.chars().count() >= min_len && !is_stopword(cleaned)
}

/// Frequency counter that remembers first-encounter order for ties.
#[derive(Debug, Clone)]
pub struct WordCounter {
    min_len: usize,
    counts: HashMap<String, (usize, usize)>,
    next_index: usize,
}

impl Default for WordCounter {
    fn default() -> Self {
        Self::new(MIN_WORD_LEN)
    }
}

impl WordCounter {
    pub fn new(min_len: usize) -> Self {
        Self {
            min_len,
            counts: HashMap::new(),
            next_index: 0,
        }
    }

    /// Splits `text` on whitespace and counts every eligible token.
    pub fn add_text(&mut self, text: &str) {
        for token in text.split_whitespace() {
            self.add_token(token);
        }
    }

    /// Cleans and counts a single raw token.
    pub fn add_token(&mut self, token: &str) {
        let cleaned = clean_word(token);
        if !is_countable(&cleaned, self.min_len) {
            return;
        }
        let index = self.next_index;
        let entry = self.counts.entry(cleaned).or_insert_with(|| (0, index));
        if entry.0 == 0 {
            self.next_index += 1;
        }
        entry.0 += 1;
    }

    /// Number of distinct counted words.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The `n` most frequent words with their counts; ties keep first-encounter order.
    pub fn most_common(&self, n: usize) -> Vec<(String, usize)> {
        let mut ranked: Vec<(&String, &(usize, usize))> = self.counts.iter().collect();
        ranked.sort_by(|a, b| b.1.0.cmp(&a.1.0).then(a.1.1.cmp(&b.1.1)));
        ranked
            .into_iter()
            .take(n)
            .map(|(word, (count, _))| (word.clone(), *count))
            .collect()
    }
}

/// Ranks countable words across `texts`, most frequent first.
pub fn count_words<'a>(
    texts: impl IntoIterator<Item = &'a str>,
    min_len: usize,
) -> Vec<(String, usize)> {
    let mut counter = WordCounter::new(min_len);
    for text in texts {
        counter.add_text(text);
    }
    counter.most_common(counter.len())
}
