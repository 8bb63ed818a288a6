//! OpenAI-compatible chat completions backend (OpenAI, Groq, Together.ai).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{GenerateOptions, GenerativeBackend, LlmConfig, LlmError};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Option<Vec<ChatChoice>>,
    error: Option<ChatError>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatError {
    message: String,
}

/// Backend for any API exposing `/v1/chat/completions`.
pub struct OpenAiBackend {
    config: LlmConfig,
    client: Client,
}

impl OpenAiBackend {
    pub fn new(config: LlmConfig, client: Client) -> Self {
        Self { config, client }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.api_key {
            Some(ref key) => request.bearer_auth(key),
            None => request,
        }
    }
}

/// Pull the first completion out of a chat response body.
fn first_completion(body: ChatResponse) -> Result<String, LlmError> {
    if let Some(err) = body.error {
        return Err(LlmError::Api(err.message));
    }
    body.choices
        .and_then(|choices| choices.into_iter().next())
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::Parse("response contained no choices".to_string()))
}

#[async_trait]
impl GenerativeBackend for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: options.max_tokens.unwrap_or(self.config.max_tokens),
            temperature: options.temperature.unwrap_or(self.config.temperature),
        };

        let url = format!("{}/v1/chat/completions", self.config.base_url());
        debug!("POST {} ({} prompt chars)", url, prompt.len());
        let resp = self
            .authorize(self.client.post(&url))
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(e, self.config.timeout()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {}: {}", status, body)));
        }

        let body: ChatResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        first_completion(body)
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/v1/models", self.config.base_url());
        match self.authorize(self.client.get(&url)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_completion() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"sla"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_completion(body).unwrap(), "sla");
    }

    #[test]
    fn test_error_body_is_api_error() {
        let body: ChatResponse =
            serde_json::from_str(r#"{"error":{"message":"rate limited"}}"#).unwrap();
        let err = first_completion(body).unwrap_err();
        assert!(matches!(err, LlmError::Api(ref m) if m == "rate limited"));
    }

    #[test]
    fn test_empty_choices_is_parse_error() {
        let body: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            first_completion(body).unwrap_err(),
            LlmError::Parse(_)
        ));
    }
}
