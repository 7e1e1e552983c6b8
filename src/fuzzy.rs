//! Bounded edit-distance matching against every headword in a lexicon
//!
//! This is the most expensive stage of word resolution (a full scan), so the
//! resolver only reaches it after exact and morphological lookups failed.
//! Distance 0 is excluded: an exact match here means normalization disagreed
//! with the exact-lookup stage, not a near miss.

use crate::config::DEFAULT_FUZZY_RESULT_CAP;
use crate::lexicon::{HeadwordForm, LexiconEntry, LexiconProvider, normalize_word};
use strsim::levenshtein;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch {
    pub entry: LexiconEntry,
    pub distance: usize,
}

#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    max_results: usize,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_FUZZY_RESULT_CAP)
    }
}

impl FuzzyMatcher {
    pub fn new(max_results: usize) -> Self {
        Self { max_results }
    }

    /// Entries within `max_distance` edits of `query`, closest first.
    ///
    /// Ties keep the lexicon's enumeration order. At most `max_results`
    /// matches are returned.
    pub fn lookup<L>(&self, lexicon: &L, query: &str, max_distance: usize) -> Vec<FuzzyMatch>
    where
        L: LexiconProvider + ?Sized,
    {
        let normalized = normalize_word(query);

        let mut ranked: Vec<(HeadwordForm, usize)> = lexicon
            .normalized_forms()
            .filter_map(|form| {
                let distance = levenshtein(&normalized, &form.match_form());
                (distance > 0 && distance <= max_distance).then_some((form, distance))
            })
            .collect();
        ranked.sort_by_key(|(_, distance)| *distance);
        ranked.truncate(self.max_results);

        // fetch by headword and id together; ids alone need not be unique
        ranked
            .into_iter()
            .filter_map(|(form, distance)| {
                let entry = lexicon
                    .lookup_exact(&form.headword)
                    .into_iter()
                    .find(|entry| entry.id == form.id);
                if entry.is_none() {
                    warn!(
                        "Headword {} ('{}') listed by the lexicon but not retrievable",
                        form.id, form.headword
                    );
                }
                entry.map(|entry| FuzzyMatch { entry, distance })
            })
            .collect()
    }
}
