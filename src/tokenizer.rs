//! Splits raw text into word and punctuation tokens.
//!
//! Whitespace runs separate tokens and are dropped. Every character from
//! [`PUNCTUATION`] becomes a token of its own. Surface text is kept exactly
//! as written, including case.

use serde::{Deserialize, Serialize};

/// Characters that always form single-character punctuation tokens
pub const PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', ';', ':', '"', '\'', '(', ')', '[', ']', '{', '}',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Word,
    Punctuation,
}

/// A slice of the input text together with its classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub kind: TokenKind,
}

impl<'a> Token<'a> {
    pub fn is_punctuation(&self) -> bool {
        self.kind == TokenKind::Punctuation
    }
}

pub fn is_punctuation_char(c: char) -> bool {
    PUNCTUATION.contains(&c)
}

/// True iff `text` is non-empty and made only of [`PUNCTUATION`] characters
pub fn is_punctuation(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_punctuation_char)
}

/// Lazy token stream over a borrowed string.
///
/// The iterator is `Clone`, so a sequence can be restarted from any point
/// by cloning it before consuming.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.input[self.position..];
        let trimmed = rest.trim_start();
        self.position += rest.len() - trimmed.len();

        let first = trimmed.chars().next()?;
        let start = self.position;

        if is_punctuation_char(first) {
            self.position += first.len_utf8();
            return Some(Token {
                text: &self.input[start..self.position],
                kind: TokenKind::Punctuation,
            });
        }

        let len = trimmed
            .find(|c: char| c.is_whitespace() || is_punctuation_char(c))
            .unwrap_or(trimmed.len());
        self.position += len;
        Some(Token {
            text: &self.input[start..self.position],
            kind: TokenKind::Word,
        })
    }
}

impl std::iter::FusedIterator for Tokens<'_> {}

pub fn tokenize(text: &str) -> Tokens<'_> {
    Tokens {
        input: text,
        position: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<&str> {
        tokenize(input).map(|t| t.text).collect()
    }

    #[test]
    fn test_words_and_punctuation() {
        assert_eq!(texts("Привет, мир!"), vec!["Привет", ",", "мир", "!"]);
    }

    #[test]
    fn test_classification() {
        let kinds: Vec<TokenKind> = tokenize("Баба аьхю.").map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![TokenKind::Word, TokenKind::Word, TokenKind::Punctuation]
        );
    }

    #[test]
    fn test_empty_and_whitespace_only() {
        assert!(texts("").is_empty());
        assert!(texts("   \t\n ").is_empty());
    }

    #[test]
    fn test_repeated_punctuation_splits_per_character() {
        assert_eq!(texts("Что?!"), vec!["Что", "?", "!"]);
        assert_eq!(texts("(аба)"), vec!["(", "аба", ")"]);
    }

    #[test]
    fn test_case_and_inner_characters_preserved() {
        // Hyphens and the palochka-like "I" are not separators
        assert_eq!(texts("  КIвал-кIвал  "), vec!["КIвал-кIвал"]);
    }

    #[test]
    fn test_restartable() {
        let tokens = tokenize("аба баба");
        let first: Vec<_> = tokens.clone().collect();
        let second: Vec<_> = tokens.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_is_punctuation() {
        assert!(is_punctuation("!"));
        assert!(is_punctuation("?!"));
        assert!(!is_punctuation(""));
        assert!(!is_punctuation("а!"));
    }
}
