use super::{Example, HeadwordForm, LexiconEntry, LexiconProvider, normalize_word};
use crate::error::{TranslateError, TranslateResult};
use serde::Deserialize;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// One word as written by the dictionary import tooling
///
/// ```json
/// {
///     "id": 1,
///     "word": "аба",
///     "part_of_speech": "noun",
///     "translations": [
///         { "translation": "отец", "priority": 2 },
///         { "translation": "папа", "priority": 1 }
///     ]
/// }
/// ```
#[derive(Debug, Deserialize)]
struct WordRecord {
    id: u64,
    word: String,
    #[serde(default)]
    word_normalized: Option<String>,
    #[serde(default)]
    root: Option<String>,
    #[serde(default)]
    part_of_speech: Option<String>,
    #[serde(default)]
    translations: Vec<TranslationRecord>,
    #[serde(default)]
    examples: Vec<Example>,
    #[serde(default)]
    is_verified: bool,
}

#[derive(Debug, Deserialize)]
struct TranslationRecord {
    translation: String,
    #[serde(default)]
    priority: i32,
}

#[derive(Debug, Clone)]
struct StoredEntry {
    entry: LexiconEntry,
    /// Parallel to `entry.translations`, descending
    priorities: Vec<i32>,
}

/// Lexicon held entirely in memory, in insertion order
#[derive(Debug, Clone, Default)]
pub struct InMemoryLexicon {
    entries: Vec<StoredEntry>,
}

impl InMemoryLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry whose translations are already in priority order
    pub fn insert(&mut self, entry: LexiconEntry) -> &mut Self {
        let count = entry.translations.len();
        let priorities = (0..count).map(|i| (count - i) as i32).collect();
        self.insert_with_priorities(entry, priorities)
    }

    pub fn with_entry(mut self, entry: LexiconEntry) -> Self {
        self.insert(entry);
        self
    }

    fn insert_with_priorities(&mut self, mut entry: LexiconEntry, priorities: Vec<i32>) -> &mut Self {
        if entry.normalized_headword.is_none() {
            entry.normalized_headword = Some(normalize_word(&entry.headword));
        }
        self.entries.push(StoredEntry { entry, priorities });
        self
    }

    /// Parse a JSON array of word records
    ///
    /// # Errors
    /// - Invalid JSON or records missing `id`/`word`
    /// - Two records sharing an `id`
    pub fn from_json_str(content: &str) -> TranslateResult<Self> {
        let records: Vec<WordRecord> = serde_json::from_str(content)?;

        let mut lexicon = Self::new();
        let mut seen_ids = HashSet::new();
        for record in records {
            if !seen_ids.insert(record.id) {
                return Err(TranslateError::LexiconError(format!(
                    "duplicate id {} (word '{}')",
                    record.id, record.word
                )));
            }
            let mut translations = record.translations;
            // stable: equal priorities keep file order
            translations.sort_by_key(|t| std::cmp::Reverse(t.priority));

            let entry = LexiconEntry {
                id: record.id,
                headword: record.word,
                normalized_headword: record.word_normalized,
                root: record.root,
                part_of_speech: record.part_of_speech,
                translations: translations.iter().map(|t| t.translation.clone()).collect(),
                examples: record.examples,
                verified: record.is_verified,
            };
            let priorities = translations.iter().map(|t| t.priority).collect();
            lexicon.insert_with_priorities(entry, priorities);
        }
        Ok(lexicon)
    }

    /// Load a JSON dictionary file
    ///
    /// # Errors
    /// - File not found or unreadable
    /// - Invalid JSON or records missing `id`/`word`
    pub fn load(path: &Path) -> TranslateResult<Self> {
        debug!("Loading lexicon from {:?}", path);

        let content = fs::read_to_string(path).map_err(|e| {
            TranslateError::LexiconError(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        let lexicon = Self::from_json_str(&content).map_err(|e| {
            TranslateError::LexiconError(format!("Failed to parse '{}': {}", path.display(), e))
        })?;

        info!("Loaded {} lexicon entries", lexicon.entries.len());
        Ok(lexicon)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LexiconProvider for InMemoryLexicon {
    fn lookup_exact(&self, word: &str) -> Vec<LexiconEntry> {
        let normalized = normalize_word(word);
        self.entries
            .iter()
            .filter(|stored| {
                stored.entry.headword == word
                    || stored.entry.normalized_headword.as_deref() == Some(normalized.as_str())
            })
            .map(|stored| stored.entry.clone())
            .collect()
    }

    fn normalized_forms(&self) -> Box<dyn Iterator<Item = HeadwordForm> + '_> {
        Box::new(self.entries.iter().map(|stored| HeadwordForm::from(&stored.entry)))
    }

    fn lookup_reverse(&self, target: &str) -> Vec<LexiconEntry> {
        let needle = normalize_word(target);
        if needle.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<(i32, &LexiconEntry)> = self
            .entries
            .iter()
            .filter_map(|stored| {
                stored
                    .entry
                    .translations
                    .iter()
                    .zip(&stored.priorities)
                    .filter(|(translation, _)| translation.to_lowercase().contains(&needle))
                    .map(|(_, priority)| *priority)
                    .max()
                    .map(|priority| (priority, &stored.entry))
            })
            .collect();
        hits.sort_by_key(|(priority, _)| std::cmp::Reverse(*priority));

        hits.into_iter().map(|(_, entry)| entry.clone()).collect()
    }

    fn lookup_prefix(&self, prefix: &str, limit: usize) -> Vec<String> {
        let normalized = normalize_word(prefix);
        let headwords: BTreeSet<&str> = self
            .entries
            .iter()
            .filter(|stored| {
                stored.entry.headword.starts_with(prefix)
                    || stored
                        .entry
                        .normalized_headword
                        .as_deref()
                        .is_some_and(|n| n.starts_with(&normalized))
            })
            .map(|stored| stored.entry.headword.as_str())
            .collect();

        headwords.into_iter().take(limit).map(str::to_string).collect()
    }

    fn lookup_by_root(&self, root: &str) -> Vec<LexiconEntry> {
        self.entries
            .iter()
            .filter(|stored| stored.entry.root.as_deref() == Some(root))
            .map(|stored| stored.entry.clone())
            .collect()
    }

    fn get_by_id(&self, id: u64) -> Option<LexiconEntry> {
        self.entries
            .iter()
            .find(|stored| stored.entry.id == id)
            .map(|stored| stored.entry.clone())
    }

    fn entry_count(&self) -> usize {
        self.entries.len()
    }
}
