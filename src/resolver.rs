//! Per-token resolution with graded confidence
//!
//! Tabasaran → Russian runs a fixed four-stage chain and stops at the first
//! stage that produces a translation:
//!
//! | stage         | confidence                          |
//! |---------------|-------------------------------------|
//! | exact         | 1.0                                 |
//! | morphological | 0.8                                 |
//! | fuzzy         | `max(0.3, 1.0 - 0.2 * distance)`    |
//! | unknown       | 0.0, token echoed back              |
//!
//! Russian → Tabasaran is a single reverse lookup at a flat 0.9.

use crate::config::{DEFAULT_FUZZY_THRESHOLD, DEFAULT_REVERSE_RESULT_CAP, Settings};
use crate::error::TranslateError;
use crate::fuzzy::FuzzyMatcher;
use crate::lexicon::{LexiconEntry, LexiconProvider};
use crate::morphology::MorphologyAnalyzer;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

pub const EXACT_CONFIDENCE: f64 = 1.0;
pub const MORPHOLOGY_CONFIDENCE: f64 = 0.8;
pub const REVERSE_CONFIDENCE: f64 = 0.9;
pub const FUZZY_CONFIDENCE_FLOOR: f64 = 0.3;
pub const FUZZY_DECAY_PER_EDIT: f64 = 0.2;

/// Confidence of a fuzzy match `distance` edits away
pub fn fuzzy_confidence(distance: usize) -> f64 {
    (1.0 - distance as f64 * FUZZY_DECAY_PER_EDIT).max(FUZZY_CONFIDENCE_FLOOR)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// Tabasaran → Russian
    #[default]
    #[serde(rename = "tab-rus")]
    SourceToTarget,
    /// Russian → Tabasaran
    #[serde(rename = "rus-tab")]
    TargetToSource,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::SourceToTarget => "tab-rus",
            Direction::TargetToSource => "rus-tab",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tab-rus" => Ok(Direction::SourceToTarget),
            "rus-tab" => Ok(Direction::TargetToSource),
            other => Err(TranslateError::InvalidInput(format!(
                "Unknown direction '{}', expected tab-rus or rus-tab",
                other
            ))),
        }
    }
}

/// Translation of a single token
///
/// An unknown token always has `confidence == 0.0` and
/// `translations == [source_token]`. The converse does not hold: punctuation
/// and loanwords whose dictionary translation is spelled like the token
/// (`радио` → `радио`) echo the token too, with `is_unknown == false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTranslation {
    #[serde(rename = "word")]
    pub source_token: String,
    /// Best first, never empty
    pub translations: Vec<String>,
    pub part_of_speech: Option<String>,
    pub confidence: f64,
    pub is_unknown: bool,
}

impl WordTranslation {
    pub fn unknown(token: &str) -> Self {
        Self {
            source_token: token.to_string(),
            translations: vec![token.to_string()],
            part_of_speech: None,
            confidence: 0.0,
            is_unknown: true,
        }
    }

    /// Punctuation passes through untouched at full confidence
    pub fn punctuation(token: &str) -> Self {
        Self {
            source_token: token.to_string(),
            translations: vec![token.to_string()],
            part_of_speech: None,
            confidence: 1.0,
            is_unknown: false,
        }
    }

    /// `None` when the entry carries no translations
    pub fn from_entry(token: &str, entry: &LexiconEntry, confidence: f64) -> Option<Self> {
        if entry.translations.is_empty() {
            warn!(
                "Lexicon entry {} ('{}') has no translations, skipping",
                entry.id, entry.headword
            );
            return None;
        }
        Some(Self {
            source_token: token.to_string(),
            translations: entry.translations.clone(),
            part_of_speech: entry.part_of_speech.clone(),
            confidence,
            is_unknown: false,
        })
    }

    /// The surface form used when assembling text
    pub fn best(&self) -> &str {
        self.translations
            .first()
            .map(String::as_str)
            .unwrap_or(&self.source_token)
    }
}

/// Resolves single tokens against a shared lexicon
pub struct WordResolver<L: ?Sized> {
    lexicon: Arc<L>,
    morphology: MorphologyAnalyzer,
    fuzzy: FuzzyMatcher,
    fuzzy_threshold: usize,
    reverse_result_cap: usize,
}

impl<L> WordResolver<L>
where
    L: LexiconProvider + ?Sized,
{
    /// Create a resolver with the default Tabasaran affix tables and fuzzy limits
    ///
    /// # Arguments
    ///
    /// * `lexicon` - Shared dictionary, any [`LexiconProvider`] including `dyn LexiconProvider`
    ///
    /// # Example
    ///
    /// ```ignore
    /// let lexicon = InMemoryLexicon::new().with_entry(LexiconEntry::new(1, "аба", &["отец"]));
    /// let resolver = WordResolver::new(Arc::new(lexicon));
    /// ```
    pub fn new(lexicon: Arc<L>) -> Self {
        Self {
            lexicon,
            morphology: MorphologyAnalyzer::default(),
            fuzzy: FuzzyMatcher::default(),
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            reverse_result_cap: DEFAULT_REVERSE_RESULT_CAP,
        }
    }

    pub fn from_settings(lexicon: Arc<L>, settings: &Settings) -> Self {
        Self {
            lexicon,
            morphology: MorphologyAnalyzer::default(),
            fuzzy: FuzzyMatcher::new(settings.fuzzy_result_cap),
            fuzzy_threshold: settings.fuzzy_threshold,
            reverse_result_cap: settings.reverse_result_cap,
        }
    }

    pub fn with_morphology(mut self, morphology: MorphologyAnalyzer) -> Self {
        self.morphology = morphology;
        self
    }

    pub fn with_fuzzy_threshold(mut self, threshold: usize) -> Self {
        self.fuzzy_threshold = threshold;
        self
    }

    pub fn lexicon(&self) -> &L {
        &self.lexicon
    }

    pub fn fuzzy_matcher(&self) -> &FuzzyMatcher {
        &self.fuzzy
    }

    pub fn fuzzy_threshold(&self) -> usize {
        self.fuzzy_threshold
    }

    /// Resolve one word token
    ///
    /// Never fails: a token nothing matches comes back as
    /// [`WordTranslation::unknown`].
    ///
    /// # Arguments
    ///
    /// * `token` - A word token as written in the input (case is kept in the result)
    /// * `direction` - Forward four-stage chain, or reverse lookup
    ///
    /// # Example
    ///
    /// ```ignore
    /// let result = resolver.resolve("абаар", Direction::SourceToTarget);
    /// assert_eq!(result.confidence, 0.8); // plural suffix stripped to "аба"
    /// ```
    pub fn resolve(&self, token: &str, direction: Direction) -> WordTranslation {
        match direction {
            Direction::SourceToTarget => self.resolve_forward(token),
            Direction::TargetToSource => self.resolve_reverse(token),
        }
    }

    fn resolve_forward(&self, token: &str) -> WordTranslation {
        if let Some(found) = self.exact(token) {
            debug!("'{}' resolved by exact lookup", token);
            return found;
        }
        if let Some(found) = self.morphological(token) {
            debug!("'{}' resolved through morphology", token);
            return found;
        }
        if let Some(found) = self.fuzzy(token) {
            debug!(
                "'{}' resolved by fuzzy match (confidence {:.2})",
                token, found.confidence
            );
            return found;
        }
        debug!("'{}' is unknown", token);
        WordTranslation::unknown(token)
    }

    fn resolve_reverse(&self, token: &str) -> WordTranslation {
        let headwords: Vec<String> = self
            .lexicon
            .lookup_reverse(token)
            .into_iter()
            .take(self.reverse_result_cap)
            .map(|entry| entry.headword)
            .collect();

        if headwords.is_empty() {
            debug!("'{}' has no reverse match", token);
            return WordTranslation::unknown(token);
        }

        WordTranslation {
            source_token: token.to_string(),
            translations: headwords,
            part_of_speech: None,
            confidence: REVERSE_CONFIDENCE,
            is_unknown: false,
        }
    }

    /// Stage 1: the token itself is a headword
    pub fn exact(&self, token: &str) -> Option<WordTranslation> {
        self.lexicon
            .lookup_exact(token)
            .iter()
            .find_map(|entry| WordTranslation::from_entry(token, entry, EXACT_CONFIDENCE))
    }

    /// Stage 2: a stripped root of the token is a headword
    pub fn morphological(&self, token: &str) -> Option<WordTranslation> {
        let lowered = token.to_lowercase();
        let analysis = self.morphology.analyze(token);

        analysis
            .candidate_roots
            .iter()
            .filter(|root| **root != lowered)
            .find_map(|root| {
                self.lexicon.lookup_exact(root).iter().find_map(|entry| {
                    WordTranslation::from_entry(token, entry, MORPHOLOGY_CONFIDENCE)
                })
            })
    }

    /// Stage 3: the closest headword within the fuzzy threshold
    pub fn fuzzy(&self, token: &str) -> Option<WordTranslation> {
        self.fuzzy
            .lookup(self.lexicon.as_ref(), token, self.fuzzy_threshold)
            .iter()
            .find_map(|m| WordTranslation::from_entry(token, &m.entry, fuzzy_confidence(m.distance)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::InMemoryLexicon;

    fn resolver() -> WordResolver<InMemoryLexicon> {
        let lexicon = InMemoryLexicon::new()
            .with_entry(LexiconEntry::new(1, "аба", &["отец", "папа"]).with_part_of_speech("noun"))
            .with_entry(LexiconEntry::new(2, "баба", &["мать", "мама"]).with_part_of_speech("noun"))
            .with_entry(LexiconEntry::new(3, "аьхю", &["большой"]).with_part_of_speech("adj"))
            .with_entry(LexiconEntry::new(4, "дада", &["отец"]));
        WordResolver::new(Arc::new(lexicon))
    }

    fn assert_unknown(result: &WordTranslation, token: &str) {
        assert!(result.is_unknown);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.translations, vec![token.to_string()]);
    }

    #[test]
    fn test_fuzzy_confidence_curve() {
        assert_eq!(fuzzy_confidence(1), 1.0 - 0.2);
        assert_eq!(fuzzy_confidence(2), 1.0 - 2.0 * 0.2);
        assert_eq!(fuzzy_confidence(3), (1.0 - 3.0 * 0.2_f64).max(0.3));
        assert_eq!(fuzzy_confidence(4), 0.3);
        assert_eq!(fuzzy_confidence(10), 0.3);
        assert!((fuzzy_confidence(1) - 0.8).abs() < 1e-12);
        assert!((fuzzy_confidence(2) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_exact_stage() {
        let result = resolver().resolve("аба", Direction::SourceToTarget);
        assert_eq!(result.confidence, 1.0);
        assert!(!result.is_unknown);
        assert_eq!(result.translations, vec!["отец", "папа"]);
        assert_eq!(result.part_of_speech.as_deref(), Some("noun"));
        assert_eq!(result.source_token, "аба");
    }

    #[test]
    fn test_exact_stage_is_case_insensitive() {
        let result = resolver().resolve("Баба", Direction::SourceToTarget);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.source_token, "Баба");
    }

    #[test]
    fn test_morphological_stage() {
        let result = resolver().resolve("бабаар", Direction::SourceToTarget);
        assert_eq!(result.confidence, MORPHOLOGY_CONFIDENCE);
        assert_eq!(result.translations, vec!["мать", "мама"]);
        assert!(!result.is_unknown);
    }

    #[test]
    fn test_fuzzy_stage() {
        // one substitution from аьхю, no morphological root
        let result = resolver().resolve("аьхя", Direction::SourceToTarget);
        assert!((result.confidence - 0.8).abs() < 1e-12);
        assert_eq!(result.translations, vec!["большой"]);
        assert_eq!(result.part_of_speech.as_deref(), Some("adj"));
    }

    #[test]
    fn test_fuzzy_threshold_respected() {
        let resolver = resolver().with_fuzzy_threshold(1);
        // two edits from аьхю
        let result = resolver.resolve("уьхя", Direction::SourceToTarget);
        assert_unknown(&result, "уьхя");
    }

    #[test]
    fn test_unknown_echoes_token() {
        let result = resolver().resolve("зюзюка", Direction::SourceToTarget);
        assert_unknown(&result, "зюзюка");
        assert_eq!(result.part_of_speech, None);
    }

    #[test]
    fn test_earliest_stage_wins() {
        // "баба" is an exact headword even though "аба" is one edit away
        let result = resolver().resolve("баба", Direction::SourceToTarget);
        assert_eq!(result.confidence, 1.0);
        assert_eq!(result.translations, vec!["мать", "мама"]);
    }

    #[test]
    fn test_entry_without_translations_is_skipped() {
        let lexicon = InMemoryLexicon::new()
            .with_entry(LexiconEntry::new(1, "аба", &[]))
            .with_entry(LexiconEntry::new(2, "абаа", &["отцы"]));
        let resolver = WordResolver::new(Arc::new(lexicon));
        let result = resolver.resolve("аба", Direction::SourceToTarget);
        // exact hit is empty, falls through to the fuzzy neighbour
        assert!((result.confidence - 0.8).abs() < 1e-12);
        assert_eq!(result.translations, vec!["отцы"]);
    }

    #[test]
    fn test_fuzzy_stage_with_shared_ids() {
        let lexicon = InMemoryLexicon::new()
            .with_entry(LexiconEntry::new(1, "аба", &["отец"]))
            .with_entry(LexiconEntry::new(1, "кума", &["помощь"]));
        let resolver = WordResolver::new(Arc::new(lexicon));
        let result = resolver.resolve("кумп", Direction::SourceToTarget);
        assert!((result.confidence - 0.8).abs() < 1e-12);
        assert_eq!(result.translations, vec!["помощь"]);
    }

    #[test]
    fn test_reverse_lookup() {
        let result = resolver().resolve("отец", Direction::TargetToSource);
        assert_eq!(result.confidence, REVERSE_CONFIDENCE);
        assert_eq!(result.translations, vec!["аба", "дада"]);
        assert_eq!(result.part_of_speech, None);
    }

    #[test]
    fn test_reverse_lookup_caps_results() {
        let mut lexicon = InMemoryLexicon::new();
        for i in 0..5u64 {
            lexicon.insert(LexiconEntry::new(i, &format!("слово{}", i), &["вода"]));
        }
        let resolver = WordResolver::new(Arc::new(lexicon));
        let result = resolver.resolve("вода", Direction::TargetToSource);
        assert_eq!(result.translations.len(), 3);
    }

    #[test]
    fn test_reverse_lookup_unknown() {
        let result = resolver().resolve("самолёт", Direction::TargetToSource);
        assert_unknown(&result, "самолёт");
    }

    #[test]
    fn test_resolver_over_trait_object() {
        let lexicon: Arc<dyn LexiconProvider> = Arc::new(
            InMemoryLexicon::new().with_entry(LexiconEntry::new(1, "аба", &["отец"])),
        );
        let resolver = WordResolver::new(lexicon);
        assert_eq!(resolver.resolve("аба", Direction::SourceToTarget).confidence, 1.0);
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!("tab-rus".parse::<Direction>().unwrap(), Direction::SourceToTarget);
        assert_eq!("RUS-TAB".parse::<Direction>().unwrap(), Direction::TargetToSource);
        assert!("en-fr".parse::<Direction>().is_err());
        assert_eq!(Direction::default(), Direction::SourceToTarget);
        assert_eq!(
            serde_json::to_string(&Direction::TargetToSource).unwrap(),
            "\"rus-tab\""
        );
    }

    #[test]
    fn test_loanword_echo_is_not_unknown() {
        let lexicon = InMemoryLexicon::new().with_entry(LexiconEntry::new(1, "радио", &["радио"]));
        let result = WordResolver::new(Arc::new(lexicon)).resolve("радио", Direction::SourceToTarget);
        assert_eq!(result.translations, vec![result.source_token.clone()]);
        assert!(!result.is_unknown);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_best_falls_back_to_token() {
        let mut result = WordTranslation::unknown("аба");
        result.translations.clear();
        assert_eq!(result.best(), "аба");
    }
}
