// src/services/gateway.rs
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::config::ChatProfile;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const COMPLETIONS_PATH: &str = "/v1/chat/completions";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("completion credential is not configured")]
    MissingCredential,
    #[error("completion API rate limited")]
    RateLimited,
    #[error("completion API returned status {status}")]
    Upstream { status: u16 },
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid response format from completion API: {0}")]
    Malformed(String),
}

/// The external completion API, behind a trait so the request pipeline can
/// be exercised without network access.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Whether the credential needed to reach the gateway is present.
    fn is_configured(&self) -> bool;

    /// Run the fixed two-message prompt (profile persona + raw user message)
    /// and return the completion text.
    async fn complete(
        &self,
        profile: &ChatProfile,
        message: &str,
    ) -> Result<String, GatewayError>;
}

#[derive(serde::Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(serde::Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Deserialize)]
struct CompletionMessage {
    content: String,
}

/// HTTP client for an OpenAI-style chat-completions endpoint.
///
/// The credential is read from the process environment on every call, so a
/// key rotated (or missing) at deploy time is picked up without a restart
/// and its absence surfaces as a handled configuration error.
pub struct OpenAiClient {
    client: reqwest::Client,
    /// Full endpoint URL (base + COMPLETIONS_PATH).
    url: String,
    /// Name of the environment variable holding the API key.
    key_var: String,
}

impl OpenAiClient {
    pub fn new(base_url: impl Into<String>, key_var: impl Into<String>) -> Self {
        let base: String = base_url.into();
        let url = format!("{}{COMPLETIONS_PATH}", base.trim_end_matches('/'));
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            url,
            key_var: key_var.into(),
        }
    }

    /// Construct from the environment: `OPENAI_BASE_URL` (optional) and the
    /// `OPENAI_API_KEY` secret, which is only checked at request time.
    pub fn from_env() -> Self {
        let base =
            std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base, "OPENAI_API_KEY")
    }
}

#[async_trait]
impl CompletionGateway for OpenAiClient {
    fn is_configured(&self) -> bool {
        std::env::var(&self.key_var)
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false)
    }

    async fn complete(
        &self,
        profile: &ChatProfile,
        message: &str,
    ) -> Result<String, GatewayError> {
        let key = std::env::var(&self.key_var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(GatewayError::MissingCredential)?;

        let request = CompletionRequest {
            model: &profile.model,
            messages: vec![
                WireMessage {
                    role: "system",
                    content: &profile.system_prompt,
                },
                WireMessage {
                    role: "user",
                    content: message,
                },
            ],
            temperature: profile.temperature,
            max_tokens: profile.max_tokens,
            stream: false,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(key.trim())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, %body, "completion API returned an error");
            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(GatewayError::RateLimited);
            }
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let payload: CompletionResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(%body, "completion API payload did not parse");
            GatewayError::Malformed(e.to_string())
        })?;

        payload
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| GatewayError::Malformed("no completion choices".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_completion_payload() {
        let body = r#"{
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Hello!"}, "finish_reason": "stop"}
            ]
        }"#;
        let payload: CompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(payload.choices[0].message.content, "Hello!");
    }

    #[test]
    fn endpoint_url_tolerates_trailing_slash() {
        let client = OpenAiClient::new("https://example.test/", "UNUSED_KEY");
        assert_eq!(client.url, "https://example.test/v1/chat/completions");
    }
}
