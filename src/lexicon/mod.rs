//! Dictionary entries and the lookup interface the resolver runs against
//!
//! The resolver never touches storage directly. Anything that can answer the
//! [`LexiconProvider`] queries can back it: the bundled [`InMemoryLexicon`]
//! loaded from a JSON export, a database, or a fake in tests.

pub mod memory;

pub use memory::InMemoryLexicon;

use serde::{Deserialize, Serialize};

/// Search normalization shared by every lookup: trimmed and lowercased
pub fn normalize_word(word: &str) -> String {
    word.trim().to_lowercase()
}

/// A usage example attached to an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub tabasaran: String,
    pub russian: String,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub id: u64,
    #[serde(rename = "word")]
    pub headword: String,
    #[serde(rename = "word_normalized")]
    pub normalized_headword: Option<String>,
    pub root: Option<String>,
    pub part_of_speech: Option<String>,
    /// Highest priority first
    pub translations: Vec<String>,
    pub examples: Vec<Example>,
    #[serde(rename = "is_verified")]
    pub verified: bool,
}

impl LexiconEntry {
    pub fn new(id: u64, headword: &str, translations: &[&str]) -> Self {
        Self {
            id,
            headword: headword.to_string(),
            normalized_headword: Some(normalize_word(headword)),
            root: None,
            part_of_speech: None,
            translations: translations.iter().map(|t| t.to_string()).collect(),
            examples: Vec::new(),
            verified: false,
        }
    }

    pub fn with_part_of_speech(mut self, part_of_speech: &str) -> Self {
        self.part_of_speech = Some(part_of_speech.to_string());
        self
    }

    pub fn with_root(mut self, root: &str) -> Self {
        self.root = Some(root.to_string());
        self
    }

    pub fn with_example(mut self, tabasaran: &str, russian: &str) -> Self {
        self.examples.push(Example {
            tabasaran: tabasaran.to_string(),
            russian: russian.to_string(),
            source: None,
        });
        self
    }

    pub fn verified(mut self) -> Self {
        self.verified = true;
        self
    }
}

/// Lightweight projection of an entry used for full-lexicon scans
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadwordForm {
    pub id: u64,
    pub headword: String,
    pub normalized: Option<String>,
    pub root: Option<String>,
    pub part_of_speech: Option<String>,
}

impl HeadwordForm {
    /// The form fuzzy matching compares against
    pub fn match_form(&self) -> String {
        self.normalized
            .as_deref()
            .unwrap_or(&self.headword)
            .to_lowercase()
    }
}

impl From<&LexiconEntry> for HeadwordForm {
    fn from(entry: &LexiconEntry) -> Self {
        Self {
            id: entry.id,
            headword: entry.headword.clone(),
            normalized: entry.normalized_headword.clone(),
            root: entry.root.clone(),
            part_of_speech: entry.part_of_speech.clone(),
        }
    }
}

/// Read-only lookups over a Tabasaran–Russian dictionary.
///
/// Implementations are shared between concurrent requests and must not
/// require exclusive access to answer a query.
pub trait LexiconProvider: Send + Sync {
    /// Entries whose headword equals `word`, or whose normalized headword
    /// equals `normalize_word(word)`
    fn lookup_exact(&self, word: &str) -> Vec<LexiconEntry>;

    /// Every headword in natural enumeration order
    fn normalized_forms(&self) -> Box<dyn Iterator<Item = HeadwordForm> + '_>;

    /// Entries with a Russian translation containing `target`, highest
    /// translation priority first
    fn lookup_reverse(&self, target: &str) -> Vec<LexiconEntry>;

    /// Distinct headwords starting with `prefix`, sorted, at most `limit`
    fn lookup_prefix(&self, prefix: &str, limit: usize) -> Vec<String>;

    fn lookup_by_root(&self, root: &str) -> Vec<LexiconEntry>;

    fn get_by_id(&self, id: u64) -> Option<LexiconEntry>;

    /// Number of entries
    fn entry_count(&self) -> usize;
}
