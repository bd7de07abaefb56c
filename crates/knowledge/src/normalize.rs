//! Text normalization for lexical scoring.
//!
//! Deterministic and total: any input, including the empty string, produces a
//! (possibly empty) word set without error.

use std::collections::HashSet;

/// High-frequency Russian functional words that carry no search signal.
///
/// A small closed list; keeping it closed is deliberate, the knowledge base
/// is curated in one language.
pub const STOP_WORDS: [&str; 16] = [
    "и", "в", "на", "с", "по", "у", "как", "все", "а", "для", "то", "что", "это", "не", "или",
    "если",
];

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Normalize arbitrary text into a set of search words.
///
/// Lowercases, strips every character that is neither a word character
/// (alphanumeric or `_`) nor whitespace, splits on whitespace, and drops
/// stop words.
pub fn word_set(text: &str) -> HashSet<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .filter(|w| !is_stop_word(w))
        .map(|w| w.to_string())
        .collect()
}

/// Split a raw comma-separated keyword string into trimmed keywords.
///
/// Empty segments are dropped; casing is preserved for display, so scoring
/// code must pass the result through [`keyword_set`].
pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|kw| kw.trim().to_string())
        .filter(|kw| !kw.is_empty())
        .collect()
}

/// Normalize a keyword list into a lowercased set minus stop words.
pub fn keyword_set(keywords: &[String]) -> HashSet<String> {
    keywords
        .iter()
        .map(|kw| kw.trim().to_lowercase())
        .filter(|kw| !kw.is_empty() && !is_stop_word(kw))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_set_lowercases_and_strips_punctuation() {
        let words = word_set("Как настроить Wi-Fi?!");
        assert!(words.contains("настроить"));
        // "как" is a stop word; "Wi-Fi" loses the hyphen and splits nowhere
        assert!(!words.contains("как"));
        assert!(words.contains("wifi"));
    }

    #[test]
    fn test_word_set_empty_input() {
        assert!(word_set("").is_empty());
        assert!(word_set("   \t\n ").is_empty());
    }

    #[test]
    fn test_word_set_only_punctuation() {
        assert!(word_set("?!...,,,###").is_empty());
    }

    #[test]
    fn test_word_set_removes_stop_words() {
        let words = word_set("как вернуть товар в магазин и на что");
        assert!(words.contains("вернуть"));
        assert!(words.contains("товар"));
        assert!(words.contains("магазин"));
        assert!(!words.contains("и"));
        assert!(!words.contains("в"));
        assert!(!words.contains("на"));
        assert!(!words.contains("что"));
    }

    #[test]
    fn test_word_set_deterministic() {
        assert_eq!(word_set("возврат денег"), word_set("возврат денег"));
    }

    #[test]
    fn test_split_keywords() {
        assert_eq!(
            split_keywords("wifi, настройка , ,роутер"),
            vec!["wifi", "настройка", "роутер"]
        );
        assert!(split_keywords("").is_empty());
        assert!(split_keywords(" , , ").is_empty());
    }

    #[test]
    fn test_keyword_set_lowercases_and_filters() {
        let keywords = vec!["WiFi".to_string(), "И".to_string(), "Роутер".to_string()];
        let set = keyword_set(&keywords);
        assert!(set.contains("wifi"));
        assert!(set.contains("роутер"));
        assert!(!set.contains("и"));
    }
}
