//! Tabasaran–Russian translation
//!
//! Dictionary-driven translation between Tabasaran and Russian. Every word
//! is resolved on its own through a graded fallback chain, and the result can
//! optionally be rewritten by an LLM into fluent text.
//!
//! # Overview
//!
//! 1. **Tokenizer** - splits text into word and punctuation tokens
//! 2. **Morphology** - strips Tabasaran prefixes and suffixes to candidate roots
//! 3. **Fuzzy matching** - ranks headwords by edit distance
//! 4. **Resolver** - exact → morphological → fuzzy → unknown, each with a confidence
//! 5. **Assembler** - joins the best translation of every token
//! 6. **Refiner** - optional best-effort rewrite of the whole text
//! 7. **Translation service** - runs the pipeline for one request
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tabasaran_mt::{Direction, InMemoryLexicon, TranslateRequest, TranslationService, WordResolver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let lexicon = InMemoryLexicon::load("data/dictionary.json".as_ref())?;
//!     let service = TranslationService::new(WordResolver::new(Arc::new(lexicon)));
//!
//!     let request = TranslateRequest::new("Баба аьхю.", Direction::SourceToTarget, false);
//!     request.validate(5000)?;
//!     println!("{}", service.translate(&request).await.translated_text);
//!     Ok(())
//! }
//! ```

pub mod assembler;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod fuzzy;
pub mod lexicon;
pub mod morphology;
pub mod refine;
pub mod resolver;
pub mod tokenizer;
pub mod translator;


pub use assembler::assemble;
pub use config::Settings;
pub use dictionary::{DictionaryService, LookupResponse, SuggestResponse};
pub use error::{TranslateError, TranslateResult};
pub use fuzzy::{FuzzyMatch, FuzzyMatcher};
pub use lexicon::{InMemoryLexicon, LexiconEntry, LexiconProvider};
pub use morphology::{MorphAnalysis, MorphologyAnalyzer};
pub use refine::{MockMode, MockRefiner, OllamaRefiner, RefineRequest, Refiner};
pub use resolver::{Direction, WordResolver, WordTranslation};
pub use tokenizer::{Token, TokenKind, tokenize};
pub use translator::{TranslateRequest, TranslateResponse, TranslationService};
