//! Refinement through an Ollama-compatible LLM server
//!
//! The refiner builds a direction-specific prompt (a short grammar sketch,
//! the dictionary context and a few sample translations) and calls the
//! non-streaming `/api/generate` endpoint.

use super::{ContextEntry, RefineRequest, Refiner};
use crate::config::{DEFAULT_CONTEXT_CAP, Settings};
use crate::error::{TranslateError, TranslateResult};
use crate::resolver::Direction;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Translations shown per context word
const TRANSLATIONS_PER_WORD: usize = 3;

const NO_CONTEXT: &str = "Контекст из словаря отсутствует.";

const TAB_RUS_GRAMMAR: &str = "\
ГРАММАТИКА ТАБАСАРАНСКОГО ЯЗЫКА:
- агглютинативный язык: суффиксы присоединяются к корню один за другим
- эргативный строй: субъект переходного глагола стоит в эргативе
- богатая система местных падежей
- порядок слов SOV, глагол согласуется с субъектом по классу и числу

ЧАСТЫЕ СУФФИКСЫ:
- -ар/-ер: множественное число
- -ин: родительный падеж
- -из: дательный падеж
- -на: эргативный падеж
- -хъ: локатив (внутри)
- -ъ: локатив (на поверхности)";

const RUS_TAB_GRAMMAR: &str = "\
ГРАММАТИКА ТАБАСАРАНСКОГО ЯЗЫКА:
- агглютинативный язык: суффиксы присоединяются к корню один за другим
- порядок слов SOV, глагол ставится в конце предложения";

const SAMPLES: &[(&str, &str)] = &[
    ("Узу школайиз шулу", "Я иду в школу"),
    ("Баба аьхю", "Мать большая"),
    ("Дада гъафну", "Отец пришёл"),
];

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f64,
    top_p: f64,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Clone)]
pub struct OllamaRefiner {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaRefiner {
    /// Timeout for the availability probe, independent of the refine timeout
    const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

    /// Create a refiner talking to `base_url` (e.g. `http://localhost:11434`)
    ///
    /// # Errors
    ///
    /// `ConfigError` for an empty URL or model, `NetworkError` if the HTTP
    /// client cannot be built.
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> TranslateResult<Self> {
        if base_url.trim().is_empty() {
            return Err(TranslateError::ConfigError(
                "LLM server URL cannot be empty".to_string(),
            ));
        }
        if model.trim().is_empty() {
            return Err(TranslateError::ConfigError(
                "LLM model cannot be empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                TranslateError::NetworkError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            model: model.trim().to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> TranslateResult<Self> {
        Self::new(
            &settings.llm_server_url,
            &settings.llm_model,
            settings.llm_timeout,
        )
    }

    /// One `• word — t1, t2, t3` line per context entry
    fn format_context(context: &[ContextEntry]) -> String {
        let lines: Vec<String> = context
            .iter()
            .take(DEFAULT_CONTEXT_CAP)
            .filter(|entry| !entry.translations.is_empty())
            .map(|entry| {
                let shown: Vec<&str> = entry
                    .translations
                    .iter()
                    .take(TRANSLATIONS_PER_WORD)
                    .map(String::as_str)
                    .collect();
                format!("• {} — {}", entry.word, shown.join(", "))
            })
            .collect();

        if lines.is_empty() {
            NO_CONTEXT.to_string()
        } else {
            lines.join("\n")
        }
    }

    fn build_prompt(request: &RefineRequest) -> String {
        let context = Self::format_context(&request.context);

        let (role, grammar, task) = match request.direction {
            Direction::SourceToTarget => (
                "Ты - эксперт-переводчик с табасаранского языка на русский.",
                TAB_RUS_GRAMMAR,
                "Переведи на русский язык, сохраняя смысл:",
            ),
            Direction::TargetToSource => (
                "Ты - эксперт-переводчик с русского языка на табасаранский.",
                RUS_TAB_GRAMMAR,
                "Переведи на табасаранский язык:",
            ),
        };

        let samples: Vec<String> = SAMPLES
            .iter()
            .map(|(tab, rus)| match request.direction {
                Direction::SourceToTarget => format!("• \"{}\" → \"{}\"", tab, rus),
                Direction::TargetToSource => format!("• \"{}\" → \"{}\"", rus, tab),
            })
            .collect();

        format!(
            "{role}\n\n{grammar}\n\nСЛОВАРНЫЙ КОНТЕКСТ:\n{context}\n\nПРИМЕРЫ ПЕРЕВОДОВ:\n{samples}\n\n{task}\n\"{text}\"\n\nОтветь ТОЛЬКО переводом, без пояснений.",
            samples = samples.join("\n"),
            text = request.text,
        )
    }
}

impl std::fmt::Debug for OllamaRefiner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaRefiner")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl Refiner for OllamaRefiner {
    async fn refine(&self, request: &RefineRequest) -> TranslateResult<String> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt: Self::build_prompt(request),
            stream: false,
            options: GenerateOptions {
                temperature: 0.3,
                top_p: 0.9,
            },
        };

        debug!("Requesting refinement from {} ({})", url, self.model);
        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TranslateError::RefinementError(format!(
                "LLM server returned {}: {}",
                status, error_text
            )));
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            TranslateError::RefinementError(format!("Failed to parse LLM response: {}", e))
        })?;

        let text = parsed.response.trim();
        if text.is_empty() {
            return Err(TranslateError::RefinementError(
                "LLM server returned an empty response".to_string(),
            ));
        }
        Ok(text.to_string())
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self
            .client
            .get(&url)
            .timeout(Self::HEALTH_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("LLM server at {} unavailable: {}", self.base_url, e);
                false
            }
        }
    }

    fn provider_name(&self) -> &str {
        "Ollama"
    }
}
