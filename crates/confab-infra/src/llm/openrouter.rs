//! OpenRouterProvider -- concrete [`CompletionProvider`] implementation for
//! OpenRouter-style chat-completion endpoints.
//!
//! Sends a single non-streaming JSON request with `Authorization: Bearer`,
//! `HTTP-Referer`, and `X-Title` headers, and extracts the reply from the
//! first returned choice. Models on OpenRouter answer in a few close but not
//! identical shapes, so extraction tries `message.content`, then `text`,
//! then `delta.content`.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use confab_core::llm::provider::CompletionProvider;
use confab_types::llm::{CompletionRequest, LlmError};

use crate::config::ProviderConfig;

/// Timeout for one completion request. Free-tier models can be slow.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// OpenRouter chat-completion provider.
///
/// # API Key Security
///
/// Does NOT derive Debug to prevent accidental exposure of the API key.
pub struct OpenRouterProvider {
    client: reqwest::Client,
    api_key: SecretString,
    url: String,
    model: String,
    referer: String,
    title: String,
}

impl OpenRouterProvider {
    /// Create a new provider from configuration.
    pub fn new(config: ProviderConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.api_key,
            url: config.base_url,
            model: config.model,
            referer: config.referer,
            title: config.title,
        })
    }

    /// The default model for this provider.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Fill in the default model when the request leaves it empty.
    fn resolve_model<'a>(&'a self, request: &'a CompletionRequest) -> &'a str {
        if request.model.is_empty() {
            &self.model
        } else {
            &request.model
        }
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Top-level completion response. `error` is set when the provider reports a
/// failure in a 200 body instead of an HTTP error status.
#[derive(Debug, Deserialize)]
struct ProviderResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ProviderErrorBody>,
}

/// One returned choice, covering the known response shapes.
#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
    text: Option<String>,
    delta: Option<ChoiceDelta>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceDelta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: Option<String>,
}

/// Extract a reply from the first choice, trying the known shapes in order:
/// full message content, plain text field, partial/streamed content field.
/// Whitespace is trimmed; an unusable choice yields `None`.
fn extract_reply(response: &ProviderResponse) -> Option<String> {
    let choice = response.choices.first()?;

    let raw = choice
        .message
        .as_ref()
        .and_then(|m| m.content.as_deref())
        .or(choice.text.as_deref())
        .or_else(|| choice.delta.as_ref().and_then(|d| d.content.as_deref()))?;

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl CompletionProvider for OpenRouterProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let body = CompletionRequest {
            model: self.resolve_model(request).to_string(),
            messages: request.messages.clone(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        tracing::debug!(
            model = %body.model,
            turns = body.messages.len(),
            "sending provider request"
        );

        let response = self
            .client
            .post(&self.url)
            .header("authorization", format!("Bearer {}", self.api_key.expose_secret()))
            .header("content-type", "application/json")
            .header("http-referer", &self.referer)
            .header("x-title", &self.title)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => LlmError::AuthenticationFailed,
                429 => LlmError::RateLimited,
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let parsed: ProviderResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout
            } else {
                LlmError::Deserialization(format!("failed to parse response: {e}"))
            }
        })?;

        if let Some(error) = &parsed.error {
            return Err(LlmError::Provider {
                message: error
                    .message
                    .clone()
                    .unwrap_or_else(|| "unknown provider error".to_string()),
            });
        }

        extract_reply(&parsed).ok_or(LlmError::EmptyReply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: serde_json::Value) -> ProviderResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_extract_reply_message_content() {
        let resp = parse(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "  Hello!  "}}]
        }));
        assert_eq!(extract_reply(&resp).as_deref(), Some("Hello!"));
    }

    #[test]
    fn test_extract_reply_text_field() {
        let resp = parse(serde_json::json!({
            "choices": [{"text": "plain text reply\n"}]
        }));
        assert_eq!(extract_reply(&resp).as_deref(), Some("plain text reply"));
    }

    #[test]
    fn test_extract_reply_delta_content() {
        let resp = parse(serde_json::json!({
            "choices": [{"delta": {"content": "streamed chunk"}}]
        }));
        assert_eq!(extract_reply(&resp).as_deref(), Some("streamed chunk"));
    }

    #[test]
    fn test_extract_reply_prefers_message_over_text() {
        let resp = parse(serde_json::json!({
            "choices": [{"message": {"content": "from message"}, "text": "from text"}]
        }));
        assert_eq!(extract_reply(&resp).as_deref(), Some("from message"));
    }

    #[test]
    fn test_extract_reply_empty_cases() {
        // No choices at all.
        let resp = parse(serde_json::json!({}));
        assert!(extract_reply(&resp).is_none());

        // A choice with none of the known fields.
        let resp = parse(serde_json::json!({"choices": [{}]}));
        assert!(extract_reply(&resp).is_none());

        // Whitespace-only content.
        let resp = parse(serde_json::json!({
            "choices": [{"message": {"content": "   \n  "}}]
        }));
        assert!(extract_reply(&resp).is_none());
    }

    #[test]
    fn test_error_payload_deserializes() {
        let resp = parse(serde_json::json!({
            "error": {"code": 402, "message": "Insufficient credits"}
        }));
        assert_eq!(
            resp.error.unwrap().message.as_deref(),
            Some("Insufficient credits")
        );
    }

    #[test]
    fn test_resolve_model_falls_back_to_default() {
        let provider = OpenRouterProvider::new(ProviderConfig {
            api_key: SecretString::from("sk-test".to_string()),
            model: "deepseek/deepseek-chat-v3-0324".to_string(),
            base_url: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            referer: "http://localhost:3000".to_string(),
            title: "Chatbot".to_string(),
        })
        .unwrap();

        let mut request = CompletionRequest {
            model: String::new(),
            messages: vec![],
            temperature: None,
            max_tokens: None,
        };
        assert_eq!(
            provider.resolve_model(&request),
            "deepseek/deepseek-chat-v3-0324"
        );

        request.model = "openai/gpt-4o-mini".to_string();
        assert_eq!(provider.resolve_model(&request), "openai/gpt-4o-mini");
    }
}
