//! LLM clients for document analysis.
//!
//! Supports Ollama for local inference and any OpenAI-compatible API
//! (OpenAI, Groq, Together.ai). The provider is selected once, when the
//! backend is built, and callers only see the [`GenerativeBackend`] trait.

mod config;
mod handle;
mod ollama;
mod openai;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use config::{LlmConfig, LlmProvider};
pub use handle::BackendHandle;
pub use ollama::OllamaBackend;
pub use openai::OpenAiBackend;

/// Per-call generation overrides. `None` falls back to the configured value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerateOptions {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl GenerateOptions {
    /// Short, near-deterministic answers (labels, yes/no).
    pub fn terse() -> Self {
        Self {
            max_tokens: Some(16),
            temperature: Some(0.0),
        }
    }
}

/// A text-in, text-out generative model.
///
/// Responses are nondeterministic and may be malformed; callers own all
/// interpretation of the returned text.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &str;

    /// Send a prompt and return the raw completion text.
    async fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String, LlmError>;

    /// Check whether the backend answers at all.
    async fn is_available(&self) -> bool {
        true
    }
}

/// Errors that can occur during LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Failed to connect to LLM service
    #[error("Connection error: {0}")]
    Connection(String),
    /// Request exceeded the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    /// API returned an error
    #[error("API error: {0}")]
    Api(String),
    /// Failed to parse response
    #[error("Parse error: {0}")]
    Parse(String),
    /// LLM is disabled
    #[error("LLM is disabled")]
    Disabled,
}

impl LlmError {
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            LlmError::Timeout(timeout)
        } else {
            LlmError::Connection(err.to_string())
        }
    }
}

/// Backend used when LLM access is switched off in configuration.
struct DisabledBackend;

#[async_trait]
impl GenerativeBackend for DisabledBackend {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn generate(&self, _prompt: &str, _options: &GenerateOptions) -> Result<String, LlmError> {
        Err(LlmError::Disabled)
    }

    async fn is_available(&self) -> bool {
        false
    }
}

/// Build the backend selected by `config.provider`.
pub fn build_backend(config: &LlmConfig) -> Result<Arc<dyn GenerativeBackend>, LlmError> {
    if !config.enabled {
        return Ok(Arc::new(DisabledBackend));
    }

    let http = reqwest::Client::builder()
        .timeout(config.timeout())
        .build()
        .map_err(|e| LlmError::Connection(format!("failed to create HTTP client: {}", e)))?;

    let backend: Arc<dyn GenerativeBackend> = match config.provider {
        LlmProvider::Ollama => Arc::new(OllamaBackend::new(config.clone(), http)),
        LlmProvider::OpenAI => Arc::new(OpenAiBackend::new(config.clone(), http)),
    };
    Ok(backend)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted backend for pipeline tests.

    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Replays queued responses in order and records every prompt.
    ///
    /// When the queue runs dry every further call fails with a connection
    /// error, so tests notice unexpected extra calls.
    #[derive(Default)]
    pub struct ScriptedBackend {
        responses: Mutex<VecDeque<Result<String, LlmError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(self, text: &str) -> Self {
            self.push(Ok(text.to_string()));
            self
        }

        pub fn fail(self) -> Self {
            self.push(Err(LlmError::Connection("scripted failure".to_string())));
            self
        }

        fn push(&self, response: Result<String, LlmError>) {
            self.responses
                .lock()
                .expect("responses lock")
                .push_back(response);
        }

        pub fn calls(&self) -> usize {
            self.prompts.lock().expect("prompts lock").len()
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().expect("prompts lock").clone()
        }
    }

    #[async_trait]
    impl GenerativeBackend for ScriptedBackend {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(
            &self,
            prompt: &str,
            _options: &GenerateOptions,
        ) -> Result<String, LlmError> {
            self.prompts
                .lock()
                .expect("prompts lock")
                .push(prompt.to_string());
            self.responses
                .lock()
                .expect("responses lock")
                .pop_front()
                .unwrap_or_else(|| Err(LlmError::Connection("script exhausted".to_string())))
        }
    }
}
