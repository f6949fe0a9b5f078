//! Word tokenizer

use once_cell::sync::Lazy;
use regex::Regex;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").expect("word pattern is valid"));

/// Lowercase `text` and return its word tokens in order, duplicates included.
///
/// Word characters are Unicode letters, digits and `_`; anything else
/// separates tokens.
pub fn split_to_words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_sentence() {
        assert_eq!(
            split_to_words("Hello, World! Hello again."),
            vec!["hello", "world", "hello", "again"]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(split_to_words("").is_empty());
        assert!(split_to_words("  ... !!! ").is_empty());
    }

    #[test]
    fn test_apostrophes_and_hyphens_split() {
        assert_eq!(split_to_words("How's it going?"), vec!["how", "s", "it", "going"]);
        assert_eq!(split_to_words("test-789"), vec!["test", "789"]);
    }

    #[test]
    fn test_underscores_and_digits_are_word_characters() {
        assert_eq!(split_to_words("test_456 and 123"), vec!["test_456", "and", "123"]);
    }

    #[test]
    fn test_unicode_words() {
        assert_eq!(split_to_words("Café ÜBER naïve"), vec!["café", "über", "naïve"]);
    }
}
