/// Error types for the translation pipeline
///
/// Unknown words are not errors: they surface as `WordTranslation::is_unknown`.
/// Refinement failures are recovered by the orchestrator and only ever reach
/// callers that talk to a `Refiner` directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// Empty or over-length input, rejected before the pipeline runs
    InvalidInput(String),
    /// Invalid or missing configuration value
    ConfigError(String),
    /// Lexicon file could not be read or parsed
    LexiconError(String),
    /// Connection-level failure talking to the refinement server
    NetworkError(String),
    /// Refinement call exceeded its time budget
    Timeout(String),
    /// Refinement server answered, but not with a usable translation
    RefinementError(String),
}

impl std::fmt::Display for TranslateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslateError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            TranslateError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            TranslateError::LexiconError(msg) => write!(f, "Lexicon error: {}", msg),
            TranslateError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            TranslateError::Timeout(msg) => write!(f, "Timed out: {}", msg),
            TranslateError::RefinementError(msg) => write!(f, "Refinement error: {}", msg),
        }
    }
}

impl std::error::Error for TranslateError {}

impl From<reqwest::Error> for TranslateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TranslateError::Timeout(err.to_string())
        } else {
            TranslateError::NetworkError(err.to_string())
        }
    }
}

impl From<std::io::Error> for TranslateError {
    fn from(err: std::io::Error) -> Self {
        TranslateError::LexiconError(err.to_string())
    }
}

impl From<serde_json::Error> for TranslateError {
    fn from(err: serde_json::Error) -> Self {
        TranslateError::LexiconError(err.to_string())
    }
}

/// Result type for pipeline operations
pub type TranslateResult<T> = Result<T, TranslateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        assert_eq!(
            TranslateError::InvalidInput("text is empty".to_string()).to_string(),
            "Invalid input: text is empty"
        );
        assert_eq!(
            TranslateError::Timeout("30s".to_string()).to_string(),
            "Timed out: 30s"
        );
    }

    #[test]
    fn test_json_error_maps_to_lexicon_error() {
        let err = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();
        match TranslateError::from(err) {
            TranslateError::LexiconError(_) => {}
            other => panic!("Expected LexiconError, got {:?}", other),
        }
    }
}
