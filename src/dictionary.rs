//! Dictionary lookup service
//!
//! Direct queries against the lexicon for callers that want entries rather
//! than a translation: headword lookup with a fuzzy fallback, prefix
//! suggestions, reverse search and fetch by id.

use crate::config::{DEFAULT_FUZZY_THRESHOLD, Settings};
use crate::error::{TranslateError, TranslateResult};
use crate::fuzzy::FuzzyMatcher;
use crate::lexicon::{LexiconEntry, LexiconProvider};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_SUGGEST_LIMIT: usize = 10;
pub const MAX_SUGGEST_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResponse {
    pub query: String,
    pub results: Vec<LexiconEntry>,
    pub total: usize,
}

impl LookupResponse {
    fn new(query: &str, results: Vec<LexiconEntry>) -> Self {
        Self {
            query: query.to_string(),
            total: results.len(),
            results,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestResponse {
    pub query: String,
    pub suggestions: Vec<String>,
}

pub struct DictionaryService<L: ?Sized> {
    lexicon: Arc<L>,
    fuzzy: FuzzyMatcher,
    fuzzy_threshold: usize,
}

impl<L> DictionaryService<L>
where
    L: LexiconProvider + ?Sized,
{
    pub fn new(lexicon: Arc<L>) -> Self {
        Self {
            lexicon,
            fuzzy: FuzzyMatcher::default(),
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }

    pub fn from_settings(lexicon: Arc<L>, settings: &Settings) -> Self {
        Self {
            lexicon,
            fuzzy: FuzzyMatcher::new(settings.fuzzy_result_cap),
            fuzzy_threshold: settings.fuzzy_threshold,
        }
    }

    /// Exact headword lookup, falling back to near matches when `fuzzy` is set
    pub fn lookup(&self, word: &str, fuzzy: bool) -> LookupResponse {
        let mut results = self.lexicon.lookup_exact(word);
        if results.is_empty() && fuzzy {
            debug!("No exact entry for '{}', trying fuzzy lookup", word);
            results = self
                .fuzzy
                .lookup(self.lexicon.as_ref(), word, self.fuzzy_threshold)
                .into_iter()
                .map(|m| m.entry)
                .collect();
        }
        LookupResponse::new(word, results)
    }

    /// Sorted headwords starting with `prefix`
    ///
    /// # Errors
    ///
    /// `InvalidInput` when `prefix` is blank or `limit` is outside `1..=50`.
    pub fn suggest(&self, prefix: &str, limit: usize) -> TranslateResult<SuggestResponse> {
        if prefix.trim().is_empty() {
            return Err(TranslateError::InvalidInput(
                "prefix must not be empty".to_string(),
            ));
        }
        if !(1..=MAX_SUGGEST_LIMIT).contains(&limit) {
            return Err(TranslateError::InvalidInput(format!(
                "limit must be between 1 and {}, got {}",
                MAX_SUGGEST_LIMIT, limit
            )));
        }
        Ok(SuggestResponse {
            query: prefix.to_string(),
            suggestions: self.lexicon.lookup_prefix(prefix, limit),
        })
    }

    pub fn word(&self, id: u64) -> Option<LexiconEntry> {
        self.lexicon.get_by_id(id)
    }

    /// Entries with a Russian translation containing `word`
    pub fn search_reverse(&self, word: &str) -> LookupResponse {
        LookupResponse::new(word, self.lexicon.lookup_reverse(word))
    }

    /// Entries sharing the morphological root `root`
    pub fn family(&self, root: &str) -> LookupResponse {
        LookupResponse::new(root, self.lexicon.lookup_by_root(root))
    }

    pub fn entry_count(&self) -> usize {
        self.lexicon.entry_count()
    }
}
