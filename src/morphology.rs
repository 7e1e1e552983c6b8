//! Affix stripping for Tabasaran words
//!
//! Tabasaran is agglutinative: case, number and person markers stack up as
//! suffixes on a root, while prefixation is rare. The analyzer therefore strips
//! at most one prefix but chains any number of suffixes, and always keeps the
//! literal (lowercased) word as a last-resort candidate root.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MorphemeKind {
    Prefix,
    Suffix,
    Root,
    Infix,
}

/// One row of a morpheme table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MorphemeRule {
    pub surface: &'static str,
    pub kind: MorphemeKind,
    /// Grammatical label, e.g. "plural"
    pub label: &'static str,
    /// Russian gloss
    pub gloss: &'static str,
}

impl MorphemeRule {
    pub const fn prefix(surface: &'static str, label: &'static str, gloss: &'static str) -> Self {
        Self {
            surface,
            kind: MorphemeKind::Prefix,
            label,
            gloss,
        }
    }

    pub const fn suffix(surface: &'static str, label: &'static str, gloss: &'static str) -> Self {
        Self {
            surface,
            kind: MorphemeKind::Suffix,
            label,
            gloss,
        }
    }
}

pub const TABASARAN_SUFFIXES: &[MorphemeRule] = &[
    // case
    MorphemeRule::suffix("ди", "genitive", "родительный падеж"),
    MorphemeRule::suffix("з", "dative", "дательный падеж"),
    MorphemeRule::suffix("ъ", "ergative", "эргативный падеж"),
    MorphemeRule::suffix("ин", "locative", "местный падеж"),
    // number
    MorphemeRule::suffix("ар", "plural", "множественное число"),
    MorphemeRule::suffix("ер", "plural", "множественное число"),
    // verb
    MorphemeRule::suffix("уз", "1st person plural", "1 лицо мн.ч."),
    MorphemeRule::suffix("ру", "infinitive", "инфинитив"),
    // adjective
    MorphemeRule::suffix("ан", "adjective", "прилагательное"),
];

pub const TABASARAN_PREFIXES: &[MorphemeRule] =
    &[MorphemeRule::prefix("дар", "negation", "отрицание")];

/// Number of leading suffix rules used by [`MorphologyAnalyzer::possible_forms`]
const COMMON_FORM_SUFFIXES: usize = 5;

/// Result of [`MorphologyAnalyzer::analyze`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MorphAnalysis {
    pub original: String,
    /// Whatever is left after stripping; `None` only when nothing is left
    pub stripped_root: Option<String>,
    pub prefixes: Vec<MorphemeRule>,
    /// Stripped suffixes in root-to-surface order
    pub suffixes: Vec<MorphemeRule>,
    /// Roots worth looking up, best first; always ends with the lowercased word
    pub candidate_roots: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct MorphologyAnalyzer {
    prefixes: Vec<MorphemeRule>,
    /// Table order, used for form generation
    suffixes: Vec<MorphemeRule>,
    /// Longest surface first, ties in table order
    suffixes_by_length: Vec<MorphemeRule>,
}

impl Default for MorphologyAnalyzer {
    fn default() -> Self {
        Self::new(TABASARAN_PREFIXES, TABASARAN_SUFFIXES)
    }
}

impl MorphologyAnalyzer {
    pub fn new(prefixes: &[MorphemeRule], suffixes: &[MorphemeRule]) -> Self {
        let mut suffixes_by_length = suffixes.to_vec();
        // stable: equal lengths keep table order
        suffixes_by_length.sort_by_key(|rule| std::cmp::Reverse(rule.surface.chars().count()));

        Self {
            prefixes: prefixes.to_vec(),
            suffixes: suffixes.to_vec(),
            suffixes_by_length,
        }
    }

    pub fn analyze(&self, word: &str) -> MorphAnalysis {
        let lowered = word.to_lowercase();
        let mut remaining: &str = &lowered;

        let mut prefixes = Vec::new();
        for rule in &self.prefixes {
            if let Some(rest) = remaining.strip_prefix(rule.surface) {
                prefixes.push(*rule);
                remaining = rest;
                break;
            }
        }

        let mut suffixes = Vec::new();
        for rule in &self.suffixes_by_length {
            if let Some(rest) = remaining.strip_suffix(rule.surface) {
                if rest.is_empty() {
                    continue;
                }
                suffixes.insert(0, *rule);
                remaining = rest;
            }
        }

        let stripped_root = (!remaining.is_empty()).then(|| remaining.to_string());

        let mut candidate_roots = Vec::new();
        if let Some(root) = &stripped_root {
            candidate_roots.push(root.clone());
        }
        if !candidate_roots.contains(&lowered) {
            candidate_roots.push(lowered.clone());
        }

        MorphAnalysis {
            original: word.to_string(),
            stripped_root,
            prefixes,
            suffixes,
            candidate_roots,
        }
    }

    pub fn strip_affixes(&self, word: &str) -> Vec<String> {
        self.analyze(word).candidate_roots
    }

    /// The root followed by the root with each of the most common suffixes attached
    pub fn possible_forms(&self, root: &str) -> Vec<String> {
        std::iter::once(root.to_string())
            .chain(
                self.suffixes
                    .iter()
                    .take(COMMON_FORM_SUFFIXES)
                    .map(|rule| format!("{}{}", root, rule.surface)),
            )
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surfaces(rules: &[MorphemeRule]) -> Vec<&str> {
        rules.iter().map(|r| r.surface).collect()
    }

    #[test]
    fn test_plural_suffix_stripped() {
        let analysis = MorphologyAnalyzer::default().analyze("абаар");
        assert_eq!(analysis.stripped_root.as_deref(), Some("аба"));
        assert_eq!(surfaces(&analysis.suffixes), vec!["ар"]);
        assert_eq!(analysis.candidate_roots, vec!["аба", "абаар"]);
    }

    #[test]
    fn test_no_affix_keeps_single_candidate() {
        let analysis = MorphologyAnalyzer::default().analyze("Баба");
        assert_eq!(analysis.original, "Баба");
        assert_eq!(analysis.stripped_root.as_deref(), Some("баба"));
        assert!(analysis.prefixes.is_empty());
        assert!(analysis.suffixes.is_empty());
        assert_eq!(analysis.candidate_roots, vec!["баба"]);
    }

    #[test]
    fn test_suffixes_chain_in_root_to_surface_order() {
        // single pass: "ди" is checked before "з" strips, so it is not retried
        let analysis = MorphologyAnalyzer::default().analyze("дадидиз");
        assert_eq!(analysis.stripped_root.as_deref(), Some("дадиди"));
        assert_eq!(surfaces(&analysis.suffixes), vec!["з"]);

        // "ар" then "ди": the plural sits closer to the root than the genitive
        let analysis = MorphologyAnalyzer::default().analyze("бабаарди");
        assert_eq!(analysis.stripped_root.as_deref(), Some("баба"));
        assert_eq!(surfaces(&analysis.suffixes), vec!["ар", "ди"]);
    }

    #[test]
    fn test_suffix_never_consumes_whole_word() {
        let analysis = MorphologyAnalyzer::default().analyze("ар");
        assert_eq!(analysis.stripped_root.as_deref(), Some("ар"));
        assert!(analysis.suffixes.is_empty());

        let analysis = MorphologyAnalyzer::default().analyze("з");
        assert_eq!(analysis.stripped_root.as_deref(), Some("з"));
    }

    #[test]
    fn test_only_one_prefix() {
        const PREFIXES: &[MorphemeRule] = &[
            MorphemeRule::prefix("дар", "negation", "отрицание"),
            MorphemeRule::prefix("а", "test", "тест"),
        ];
        let analyzer = MorphologyAnalyzer::new(PREFIXES, &[]);
        let analysis = analyzer.analyze("дараба");
        assert_eq!(surfaces(&analysis.prefixes), vec!["дар"]);
        assert_eq!(analysis.stripped_root.as_deref(), Some("аба"));
    }

    #[test]
    fn test_prefix_only_word_has_no_root() {
        let analysis = MorphologyAnalyzer::default().analyze("Дар");
        assert_eq!(analysis.stripped_root, None);
        assert_eq!(analysis.candidate_roots, vec!["дар"]);
    }

    #[test]
    fn test_longest_suffix_preferred() {
        const SUFFIXES: &[MorphemeRule] = &[
            MorphemeRule::suffix("р", "short", ""),
            MorphemeRule::suffix("ар", "plural", ""),
        ];
        let analysis = MorphologyAnalyzer::new(&[], SUFFIXES).analyze("абаар");
        assert_eq!(surfaces(&analysis.suffixes), vec!["ар"]);
        assert_eq!(analysis.stripped_root.as_deref(), Some("аба"));
    }

    #[test]
    fn test_empty_word() {
        let analysis = MorphologyAnalyzer::default().analyze("");
        assert_eq!(analysis.stripped_root, None);
        assert_eq!(analysis.candidate_roots, vec![""]);
    }

    #[test]
    fn test_possible_forms_uses_first_five_rules() {
        let forms = MorphologyAnalyzer::default().possible_forms("аба");
        assert_eq!(
            forms,
            vec!["аба", "абади", "абаз", "абаъ", "абаин", "абаар"]
        );
    }

    #[test]
    fn test_strip_affixes() {
        assert_eq!(
            MorphologyAnalyzer::default().strip_affixes("бабаер"),
            vec!["баба", "бабаер"]
        );
    }
}
