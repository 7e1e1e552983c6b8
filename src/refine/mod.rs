//! Best-effort whole-text refinement
//!
//! A refiner receives the original text plus the dictionary translations the
//! resolver already found and may return a more fluent translation. Every
//! failure is recoverable: the orchestrator falls back to word-by-word
//! assembly whenever a refiner errors, returns nothing, or runs out of time.
//!
//! # Example
//!
//! ```ignore
//! use tabasaran_mt::refine::{OllamaRefiner, RefineRequest, Refiner};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let refiner = OllamaRefiner::new("http://localhost:11434", "mistral:7b", Duration::from_secs(30))?;
//!     let request = RefineRequest::new("Баба аьхю", vec![], Direction::SourceToTarget);
//!     println!("{}", refiner.refine(&request).await?);
//!     Ok(())
//! }
//! ```

pub mod mock;
pub mod ollama;

pub use mock::{MockMode, MockRefiner};
pub use ollama::OllamaRefiner;

use crate::error::TranslateResult;
use crate::resolver::{Direction, WordTranslation};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A resolved word handed to the refiner as dictionary context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub word: String,
    pub translations: Vec<String>,
}

impl From<&WordTranslation> for ContextEntry {
    fn from(word: &WordTranslation) -> Self {
        Self {
            word: word.source_token.clone(),
            translations: word.translations.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefineRequest {
    pub text: String,
    pub context: Vec<ContextEntry>,
    pub direction: Direction,
}

impl RefineRequest {
    pub fn new(text: &str, context: Vec<ContextEntry>, direction: Direction) -> Self {
        Self {
            text: text.to_string(),
            context,
            direction,
        }
    }
}

/// Generic trait for refinement providers
///
/// All methods are async to support network-backed providers.
#[async_trait]
pub trait Refiner: Send + Sync {
    /// Rewrite `request.text` as a full translation
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Non-empty refined translation
    /// * `Err(TranslateError)` - Timeout, connection failure, bad status or unusable body
    async fn refine(&self, request: &RefineRequest) -> TranslateResult<String>;

    /// Whether the provider is reachable right now
    async fn is_available(&self) -> bool;

    /// Used for logging to identify which provider handled a request
    fn provider_name(&self) -> &str;
}
