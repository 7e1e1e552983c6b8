//! Process configuration
//!
//! Values come from the environment, using the same variable names as the
//! deployed service, and fall back to the defaults below. The binary lets
//! command-line flags override whatever was loaded here.

use crate::error::{TranslateError, TranslateResult};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Maximum Levenshtein distance accepted by the fuzzy stage
pub const DEFAULT_FUZZY_THRESHOLD: usize = 2;
/// Longest accepted input, in characters
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 5000;
/// At most this many resolved words are sent to the refinement service
pub const DEFAULT_CONTEXT_CAP: usize = 10;
/// At most this many fuzzy candidates are returned
pub const DEFAULT_FUZZY_RESULT_CAP: usize = 10;
/// At most this many headwords are returned by a reverse lookup
pub const DEFAULT_REVERSE_RESULT_CAP: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// JSON dictionary loaded into the in-memory lexicon
    pub lexicon_path: PathBuf,
    /// Base URL of the Ollama-compatible refinement server
    pub llm_server_url: String,
    pub llm_model: String,
    pub llm_timeout: Duration,
    pub max_text_length: usize,
    pub fuzzy_threshold: usize,
    pub context_cap: usize,
    pub fuzzy_result_cap: usize,
    pub reverse_result_cap: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lexicon_path: PathBuf::from("data/dictionary.json"),
            llm_server_url: "http://localhost:11434".to_string(),
            llm_model: "mistral:7b".to_string(),
            llm_timeout: Duration::from_secs(30),
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            context_cap: DEFAULT_CONTEXT_CAP,
            fuzzy_result_cap: DEFAULT_FUZZY_RESULT_CAP,
            reverse_result_cap: DEFAULT_REVERSE_RESULT_CAP,
        }
    }
}

impl Settings {
    /// Load settings from the process environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a numeric variable is set but cannot be parsed.
    pub fn from_env() -> TranslateResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup (the environment in production)
    pub fn from_lookup<F>(lookup: F) -> TranslateResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(path) = lookup("LEXICON_PATH") {
            settings.lexicon_path = PathBuf::from(path);
        }
        if let Some(url) = lookup("LLM_SERVER_URL") {
            settings.llm_server_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = lookup("LLM_MODEL") {
            settings.llm_model = model;
        }
        if let Some(secs) = parse_var::<u64, _>(&lookup, "LLM_TIMEOUT")? {
            settings.llm_timeout = Duration::from_secs(secs);
        }
        if let Some(len) = parse_var(&lookup, "MAX_TEXT_LENGTH")? {
            settings.max_text_length = len;
        }
        if let Some(threshold) = parse_var(&lookup, "FUZZY_THRESHOLD")? {
            settings.fuzzy_threshold = threshold;
        }

        Ok(settings)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> TranslateResult<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            TranslateError::ConfigError(format!("{} must be a non-negative integer, got '{}'", key, raw))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_match_deployment() {
        let settings = Settings::default();
        assert_eq!(settings.fuzzy_threshold, 2);
        assert_eq!(settings.max_text_length, 5000);
        assert_eq!(settings.context_cap, 10);
        assert_eq!(settings.fuzzy_result_cap, 10);
        assert_eq!(settings.reverse_result_cap, 3);
        assert_eq!(settings.llm_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_empty_environment_yields_defaults() {
        let settings = Settings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("FUZZY_THRESHOLD", "3"),
            ("LLM_TIMEOUT", "5"),
            ("LLM_SERVER_URL", "http://gpu:11434/"),
            ("LEXICON_PATH", "/tmp/dict.json"),
        ]))
        .unwrap();
        assert_eq!(settings.fuzzy_threshold, 3);
        assert_eq!(settings.llm_timeout, Duration::from_secs(5));
        assert_eq!(settings.llm_server_url, "http://gpu:11434");
        assert_eq!(settings.lexicon_path, PathBuf::from("/tmp/dict.json"));
    }

    #[test]
    fn test_unparsable_number_is_config_error() {
        let result = Settings::from_lookup(lookup_from(&[("MAX_TEXT_LENGTH", "lots")]));
        match result {
            Err(TranslateError::ConfigError(msg)) => assert!(msg.contains("MAX_TEXT_LENGTH")),
            other => panic!("Expected ConfigError, got {:?}", other),
        }
    }
}
