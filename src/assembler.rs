//! Word-by-word text assembly

use crate::resolver::WordTranslation;
use regex::Regex;
use std::sync::LazyLock;

/// Whitespace in front of a closing punctuation mark
static SPACE_BEFORE_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([.,!?;:])").expect("valid regex"));

/// Join the best translation of every token with single spaces and glue
/// closing punctuation to the word before it.
pub fn assemble(words: &[WordTranslation]) -> String {
    let joined = words
        .iter()
        .map(WordTranslation::best)
        .collect::<Vec<_>>()
        .join(" ");
    SPACE_BEFORE_PUNCTUATION
        .replace_all(&joined, "$1")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(surfaces: &[&str]) -> Vec<WordTranslation> {
        surfaces.iter().map(|s| WordTranslation::punctuation(s)).collect()
    }

    #[test]
    fn test_no_space_before_punctuation() {
        assert_eq!(assemble(&words(&["привет", ",", "мир", "!"])), "привет, мир!");
    }

    #[test]
    fn test_uses_first_translation() {
        let mut word = WordTranslation::punctuation("аба");
        word.translations = vec!["отец".to_string(), "папа".to_string()];
        assert_eq!(assemble(&[word]), "отец");
    }

    #[test]
    fn test_empty_translation_list_falls_back_to_source() {
        let mut word = WordTranslation::unknown("аба");
        word.translations.clear();
        assert_eq!(assemble(&[word]), "аба");
    }

    #[test]
    fn test_multiword_translation_and_all_marks() {
        let assembled = assemble(&words(&["мать", "большая", ".", "Что", "?", "!", "так", ";", "да", ":"]));
        assert_eq!(assembled, "мать большая. Что?! так; да:");
    }

    #[test]
    fn test_empty() {
        assert_eq!(assemble(&[]), "");
    }

    #[test]
    fn test_idempotent_on_assembled_punctuation() {
        let once = assemble(&words(&["привет", ",", "мир", "!"]));
        let twice = assemble(&words(&[once.as_str()]));
        assert_eq!(once, twice);
    }
}
