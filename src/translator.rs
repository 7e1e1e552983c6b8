//! Sentence-level translation
//!
//! Drives the whole pipeline for one request: tokenize, resolve each word,
//! optionally ask a [`Refiner`] for a fluent rewrite, and otherwise assemble
//! the word-by-word result. The refiner is strictly best effort; the request
//! never fails because of it.

use crate::assembler::assemble;
use crate::config::{DEFAULT_CONTEXT_CAP, Settings};
use crate::error::{TranslateError, TranslateResult};
use crate::lexicon::LexiconProvider;
use crate::refine::{ContextEntry, RefineRequest, Refiner};
use crate::resolver::{Direction, WordResolver, WordTranslation};
use crate::tokenizer::{is_punctuation, tokenize};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

fn default_use_llm() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    #[serde(default)]
    pub direction: Direction,
    /// Ask the refinement service for a context-aware rewrite
    #[serde(default = "default_use_llm")]
    pub use_llm: bool,
}

impl TranslateRequest {
    pub fn new(text: &str, direction: Direction, use_llm: bool) -> Self {
        Self {
            text: text.to_string(),
            direction,
            use_llm,
        }
    }

    /// Reject input the pipeline must never see
    ///
    /// # Errors
    ///
    /// `InvalidInput` when the text is blank or longer than `max_length` characters.
    pub fn validate(&self, max_length: usize) -> TranslateResult<()> {
        if self.text.trim().is_empty() {
            return Err(TranslateError::InvalidInput("text is empty".to_string()));
        }
        let length = self.text.chars().count();
        if length > max_length {
            return Err(TranslateError::InvalidInput(format!(
                "text is {} characters long, the limit is {}",
                length, max_length
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub original_text: String,
    pub translated_text: String,
    pub words: Vec<WordTranslation>,
    pub direction: Direction,
    pub llm_used: bool,
}

impl TranslateResponse {
    /// Share of word tokens that resolved to something, 1.0 for punctuation-only text
    pub fn coverage(&self) -> f64 {
        let (total, resolved) = self
            .words
            .iter()
            .filter(|w| !is_punctuation(&w.source_token))
            .fold((0usize, 0usize), |(total, resolved), w| {
                (total + 1, resolved + usize::from(!w.is_unknown))
            });
        if total == 0 {
            1.0
        } else {
            resolved as f64 / total as f64
        }
    }
}

pub struct TranslationService<L: ?Sized> {
    resolver: WordResolver<L>,
    refiner: Option<Arc<dyn Refiner>>,
    refine_timeout: Duration,
    context_cap: usize,
}

impl<L> TranslationService<L>
where
    L: LexiconProvider + ?Sized,
{
    pub fn new(resolver: WordResolver<L>) -> Self {
        Self {
            resolver,
            refiner: None,
            refine_timeout: Settings::default().llm_timeout,
            context_cap: DEFAULT_CONTEXT_CAP,
        }
    }

    pub fn from_settings(lexicon: Arc<L>, settings: &Settings) -> Self {
        Self {
            resolver: WordResolver::from_settings(lexicon, settings),
            refiner: None,
            refine_timeout: settings.llm_timeout,
            context_cap: settings.context_cap,
        }
    }

    pub fn with_refiner(mut self, refiner: Arc<dyn Refiner>) -> Self {
        self.refiner = Some(refiner);
        self
    }

    pub fn with_refine_timeout(mut self, timeout: Duration) -> Self {
        self.refine_timeout = timeout;
        self
    }

    pub fn resolver(&self) -> &WordResolver<L> {
        &self.resolver
    }

    pub fn refiner(&self) -> Option<&Arc<dyn Refiner>> {
        self.refiner.as_ref()
    }

    /// Translate already validated text (see [`TranslateRequest::validate`])
    pub async fn translate(&self, request: &TranslateRequest) -> TranslateResponse {
        let text = request.text.trim();

        let mut words = Vec::new();
        let mut context = Vec::new();
        for token in tokenize(text) {
            if token.is_punctuation() {
                words.push(WordTranslation::punctuation(token.text));
                continue;
            }
            let word = self.resolver.resolve(token.text, request.direction);
            if !word.is_unknown {
                context.push(ContextEntry::from(&word));
            }
            words.push(word);
        }

        let refined = if request.use_llm && !context.is_empty() {
            self.refine(text, context, request.direction).await
        } else {
            None
        };

        let llm_used = refined.is_some();
        let translated_text = refined.unwrap_or_else(|| assemble(&words));

        TranslateResponse {
            original_text: text.to_string(),
            translated_text,
            words,
            direction: request.direction,
            llm_used,
        }
    }

    /// Run the refiner as its own task under the refine timeout.
    /// `None` means "fall back to assembly".
    async fn refine(
        &self,
        text: &str,
        mut context: Vec<ContextEntry>,
        direction: Direction,
    ) -> Option<String> {
        let refiner = Arc::clone(self.refiner.as_ref()?);
        let provider = refiner.provider_name().to_string();

        context.truncate(self.context_cap);
        let request = RefineRequest::new(text, context, direction);

        let mut task = tokio::spawn(async move { refiner.refine(&request).await });

        match tokio::time::timeout(self.refine_timeout, &mut task).await {
            Ok(Ok(Ok(refined))) => {
                let refined = refined.trim();
                if refined.is_empty() {
                    warn!("{} returned an empty refinement, using assembled text", provider);
                    None
                } else {
                    info!("Translation refined by {}", provider);
                    Some(refined.to_string())
                }
            }
            Ok(Ok(Err(e))) => {
                warn!("{} refinement failed, using assembled text: {}", provider, e);
                None
            }
            Ok(Err(e)) => {
                warn!("{} refinement task did not complete: {}", provider, e);
                None
            }
            Err(_) => {
                task.abort();
                warn!(
                    "{} refinement timed out after {:?}, using assembled text",
                    provider, self.refine_timeout
                );
                None
            }
        }
    }
}
