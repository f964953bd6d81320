//! Emoji membership test.
//!
//! The emoji table is Unicode's `Extended_Pictographic` property plus the
//! skin-tone `Emoji_Modifier` code points, as shipped in the `regex` crate's
//! Unicode tables. Keycap bases (`0`–`9`, `#`, `*`), ZWJ and variation
//! selectors are deliberately outside the table: they are only emoji as
//! part of a sequence.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static EMOJI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{Extended_Pictographic}\p{Emoji_Modifier}]").expect("emoji class is valid")
});

/// Returns `true` if `c` is in the emoji table.
pub fn is_emoji(c: char) -> bool {
    let mut buf = [0u8; 4];
    EMOJI.is_match(c.encode_utf8(&mut buf))
}

/// Distinct emoji characters of `text`, in order of first appearance.
///
/// ```
/// use zapmetrics::text::count_unique_emojis;
///
/// assert_eq!(count_unique_emojis("oi 😀😀 tudo bem? 👍😀"), vec!['😀', '👍']);
/// assert!(count_unique_emojis("sem emoji 123 #").is_empty());
/// ```
pub fn count_unique_emojis(text: &str) -> Vec<char> {
    let mut seen = HashSet::new();
    EMOJI
        .find_iter(text)
        .filter_map(|m| m.as_str().chars().next())
        .filter(|c| seen.insert(*c))
        .collect()
}

/// Removes every emoji character from `text`.
pub fn strip_emojis(text: &str) -> String {
    EMOJI.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_emojis() {
        for c in ['😀', '❤', '👍', '🎉', '🔥', '©'] {
            assert!(is_emoji(c), "{c} should be an emoji");
        }
    }

    #[test]
    fn test_regional_indicator_alone_is_not_emoji() {
        assert!(!is_emoji('🇧'));
    }

    #[test]
    fn test_non_emojis() {
        for c in ['a', 'Z', '7', '#', '*', ' ', 'ç', '\u{200d}', '\u{fe0f}'] {
            assert!(!is_emoji(c), "{c:?} should not be an emoji");
        }
    }

    #[test]
    fn test_skin_tone_modifier_is_separate_char() {
        let found = count_unique_emojis("👍🏽");
        assert_eq!(found, vec!['👍', '🏽']);
    }

    #[test]
    fn test_zwj_sequence_splits_into_members() {
        // family: man ZWJ woman ZWJ girl
        let found = count_unique_emojis("👨\u{200d}👩\u{200d}👧");
        assert_eq!(found, vec!['👨', '👩', '👧']);
    }

    #[test]
    fn test_first_appearance_order() {
        assert_eq!(count_unique_emojis("🎉a😀b🎉c"), vec!['🎉', '😀']);
    }

    #[test]
    fn test_strip_emojis() {
        assert_eq!(strip_emojis("bom😀dia🎉!"), "bomdia!");
        assert_eq!(strip_emojis(""), "");
    }
}
