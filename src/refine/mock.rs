//! Mock refiner for testing
//!
//! Deterministic, network-free stand-in for a refinement server, used to
//! exercise the orchestrator's success and fallback paths.

use super::{RefineRequest, Refiner};
use crate::error::{TranslateError, TranslateResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum MockMode {
    /// Always answer with this text
    Fixed(String),

    /// Join the first translation of every context entry with spaces
    Context,

    /// Return the input text unchanged
    Echo,

    /// Answer with an empty string (a server that produced nothing)
    Empty,

    /// Simulate a provider failure
    Error(String),
}

#[derive(Debug)]
pub struct MockRefiner {
    mode: MockMode,
    /// Simulated latency in milliseconds
    delay_ms: u64,
    available: bool,
    calls: AtomicUsize,
}

impl MockRefiner {
    /// Create a MockRefiner that answers immediately
    ///
    /// # Arguments
    ///
    /// * `mode` - How the refiner answers every request
    ///
    /// # Example
    ///
    /// ```ignore
    /// let mock = MockRefiner::new(MockMode::Fixed("Мать большая.".to_string()));
    /// ```
    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            delay_ms: 0,
            available: true,
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a MockRefiner that sleeps before answering
    ///
    /// # Arguments
    ///
    /// * `mode` - How the refiner answers every request
    /// * `delay_ms` - Simulated latency in milliseconds
    ///
    /// # Example
    ///
    /// ```ignore
    /// let mock = MockRefiner::with_delay(MockMode::Echo, 2_000);
    /// // Longer than a 50ms refine timeout, so the caller falls back
    /// ```
    pub fn with_delay(mode: MockMode, delay_ms: u64) -> Self {
        Self {
            delay_ms,
            ..Self::new(mode)
        }
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// How many times `refine` has been called
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn apply_delay(&self) {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }
}

#[async_trait]
impl Refiner for MockRefiner {
    async fn refine(&self, request: &RefineRequest) -> TranslateResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.apply_delay().await;

        match &self.mode {
            MockMode::Fixed(text) => Ok(text.clone()),
            MockMode::Context => Ok(request
                .context
                .iter()
                .filter_map(|entry| entry.translations.first().cloned())
                .collect::<Vec<_>>()
                .join(" ")),
            MockMode::Echo => Ok(request.text.clone()),
            MockMode::Empty => Ok(String::new()),
            MockMode::Error(msg) => Err(TranslateError::RefinementError(msg.clone())),
        }
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    fn provider_name(&self) -> &str {
        "Mock Refiner"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refine::ContextEntry;
    use crate::resolver::Direction;

    fn request() -> RefineRequest {
        RefineRequest::new(
            "Баба аьхю",
            vec![
                ContextEntry {
                    word: "Баба".to_string(),
                    translations: vec!["мать".to_string(), "мама".to_string()],
                },
                ContextEntry {
                    word: "аьхю".to_string(),
                    translations: vec!["большая".to_string()],
                },
            ],
            Direction::SourceToTarget,
        )
    }

    #[tokio::test]
    async fn test_fixed() {
        let mock = MockRefiner::new(MockMode::Fixed("Мать большая".to_string()));
        assert_eq!(mock.refine(&request()).await.unwrap(), "Мать большая");
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn test_context() {
        let mock = MockRefiner::new(MockMode::Context);
        assert_eq!(mock.refine(&request()).await.unwrap(), "мать большая");
    }

    #[tokio::test]
    async fn test_echo_and_empty() {
        assert_eq!(
            MockRefiner::new(MockMode::Echo).refine(&request()).await.unwrap(),
            "Баба аьхю"
        );
        assert_eq!(
            MockRefiner::new(MockMode::Empty).refine(&request()).await.unwrap(),
            ""
        );
    }

    #[tokio::test]
    async fn test_error_mode() {
        let mock = MockRefiner::new(MockMode::Error("server down".to_string()));
        match mock.refine(&request()).await {
            Err(TranslateError::RefinementError(msg)) => assert_eq!(msg, "server down"),
            other => panic!("Expected RefinementError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delay_adds_latency() {
        let mock = MockRefiner::with_delay(MockMode::Echo, 50);
        let start = std::time::Instant::now();
        let _ = mock.refine(&request()).await.unwrap();
        assert!(start.elapsed().as_millis() >= 50);
    }

    #[tokio::test]
    async fn test_availability() {
        assert!(MockRefiner::new(MockMode::Echo).is_available().await);
        assert!(!MockRefiner::new(MockMode::Echo).unavailable().is_available().await);
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(MockRefiner::new(MockMode::Echo).provider_name(), "Mock Refiner");
    }
}
