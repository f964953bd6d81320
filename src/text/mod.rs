//! Stateless text helpers shared by the charts and the biographies.

pub mod emoji;
pub mod stopwords;
pub mod words;

pub use emoji::{count_unique_emojis, is_emoji};
pub use words::{WordCounter, clean_word, count_words, is_countable};
