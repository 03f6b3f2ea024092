/// LLM Client: the single point of entry for all chat-completion calls in CareerForge.
///
/// No other module may call the LLM provider directly.
/// All LLM interactions go through `LlmClient`, which delegates transport to a
/// `ChatBackend` (Groq in production, a canned-response double in tests).
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;
pub mod scores;
#[cfg(test)]
pub mod testing;

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// True when the provider answered but the text could not be used.
    /// Callers with a sensible fallback recover from these; transport errors propagate.
    pub fn is_unusable_output(&self) -> bool {
        matches!(self, LlmError::Parse(_) | LlmError::EmptyContent)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Sampling options for a single completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionOptions {
    pub const fn new(max_tokens: u32, temperature: f32) -> Self {
        Self {
            max_tokens,
            temperature,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
}

/// Transport seam for chat completions.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: CompletionOptions,
    ) -> Result<Completion, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Groq (OpenAI-compatible chat completions)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Groq chat-completions backend with retry on 429, 5xx and request timeouts.
#[derive(Clone)]
pub struct GroqBackend {
    client: Client,
    api_key: String,
    model: String,
    api_url: String,
}

impl GroqBackend {
    pub fn new(api_key: String, model: String, api_url: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            api_key,
            model,
            api_url,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// 429 and 5xx answers are worth another attempt; other statuses are final.
fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

/// Exponential backoff before retry `attempt` (1-based): 1s, 2s, 4s...
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(1000 * (1 << (attempt.saturating_sub(1)).min(6)))
}

#[async_trait]
impl ChatBackend for GroqBackend {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: CompletionOptions,
    ) -> Result<Completion, LlmError> {
        let request_body = ChatCompletionRequest {
            model: &self.model,
            messages,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = backoff_delay(attempt);
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&self.api_url)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) if e.is_timeout() => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
                Err(e) => return Err(LlmError::Http(e)),
            };

            let status = response.status();

            if is_retryable_status(status.as_u16()) {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ProviderError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: ChatCompletionResponse = response.json().await?;
            let text = parsed
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.message.content)
                .unwrap_or_default();

            if let Some(usage) = &parsed.usage {
                debug!(
                    "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                    usage.prompt_tokens, usage.completion_tokens
                );
            }

            return Ok(Completion { text });
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client facade
// ────────────────────────────────────────────────────────────────────────────

/// The single LLM client used by all services.
#[derive(Clone)]
pub struct LlmClient {
    backend: Arc<dyn ChatBackend>,
}

impl LlmClient {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    /// Sends a system + user message pair and returns the trimmed text.
    pub async fn chat(
        &self,
        system: &str,
        prompt: &str,
        options: CompletionOptions,
    ) -> Result<String, LlmError> {
        let messages = [ChatMessage::system(system), ChatMessage::user(prompt)];
        let completion = self.backend.complete(&messages, options).await?;
        let text = completion.text.trim();
        if text.is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(text.to_string())
    }

    /// Calls the LLM and deserializes the JSON embedded in its answer.
    /// The prompt must instruct the model to return JSON; surrounding prose and
    /// markdown fences are tolerated.
    pub async fn chat_json<T: DeserializeOwned>(
        &self,
        system: &str,
        prompt: &str,
        options: CompletionOptions,
    ) -> Result<T, LlmError> {
        let text = self.chat(system, prompt, options).await?;
        let json = extract_json_span(strip_json_fences(&text));
        serde_json::from_str(json).map_err(LlmError::Parse)
    }

    /// Sends a tiny prompt; any failure means the provider is unreachable.
    pub async fn health_check(&self) -> bool {
        let messages = [ChatMessage::user("Hello, are you working?")];
        match self
            .backend
            .complete(&messages, CompletionOptions::new(50, 0.1))
            .await
        {
            Ok(_) => true,
            Err(e) => {
                warn!("LLM health check failed: {e}");
                false
            }
        }
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Returns the outermost JSON object or array in `text`, or `text` unchanged.
fn extract_json_span(text: &str) -> &str {
    let object = text.find('{');
    let array = text.find('[');
    let (start, close) = match (object, array) {
        (Some(o), Some(a)) if a < o => (a, ']'),
        (Some(o), _) => (o, '}'),
        (None, Some(a)) => (a, ']'),
        (None, None) => return text,
    };
    match text.rfind(close) {
        Some(end) if end > start => &text[start..=end],
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FixedBackend;
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_extract_json_span_skips_prose() {
        let input = "Sure! Here is the data:\n{\"score\": 8}\nHope this helps.";
        assert_eq!(extract_json_span(input), "{\"score\": 8}");
    }

    #[test]
    fn test_extract_json_span_prefers_leading_array() {
        let input = "[{\"question\": \"Why?\"}]";
        assert_eq!(extract_json_span(input), input);
    }

    #[test]
    fn test_extract_json_span_without_json_returns_input() {
        assert_eq!(extract_json_span("no json here"), "no json here");
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(is_retryable_status(429));
        assert!(is_retryable_status(500));
        assert!(is_retryable_status(503));
        assert!(!is_retryable_status(400));
        assert!(!is_retryable_status(401));
        assert!(!is_retryable_status(404));
    }

    #[tokio::test]
    async fn test_refused_connection_fails_without_backoff() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let backend = GroqBackend::new(
            "key".into(),
            "model".into(),
            format!("http://127.0.0.1:{port}/chat"),
        )
        .unwrap();

        let started = std::time::Instant::now();
        let err = backend
            .complete(&[ChatMessage::user("hi")], CompletionOptions::new(5, 0.0))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Http(_)));
        assert!(started.elapsed() < Duration::from_millis(900));
    }

    #[test]
    fn test_backoff_doubles() {
        assert_eq!(backoff_delay(1), Duration::from_secs(1));
        assert_eq!(backoff_delay(2), Duration::from_secs(2));
        assert_eq!(backoff_delay(3), Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_chat_json_parses_wrapped_answer() {
        let llm = FixedBackend::client(["Result:\n```json\n{\"a\": 1}\n```"]);
        let value: Value = llm
            .chat_json("sys", "prompt", CompletionOptions::new(10, 0.0))
            .await
            .unwrap();
        assert_eq!(value["a"], 1);
    }

    #[tokio::test]
    async fn test_chat_rejects_blank_answer() {
        let llm = FixedBackend::client(["   "]);
        let err = llm
            .chat("sys", "prompt", CompletionOptions::new(10, 0.0))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
        assert!(err.is_unusable_output());
    }

    #[tokio::test]
    async fn test_chat_sends_system_then_user() {
        let backend = Arc::new(FixedBackend::new(["ok"]));
        let llm = LlmClient::new(backend.clone());
        llm.chat("be brief", "say ok", CompletionOptions::new(10, 0.0))
            .await
            .unwrap();
        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][0], ChatMessage::system("be brief"));
        assert_eq!(calls[0][1], ChatMessage::user("say ok"));
    }

    #[tokio::test]
    async fn test_health_check_false_on_failure() {
        let llm = LlmClient::new(Arc::new(FixedBackend::failing(503)));
        assert!(!llm.health_check().await);
    }
}
