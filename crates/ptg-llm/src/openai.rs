//! Client for providers that speak the OpenAI chat-completions protocol.

use crate::config::{LlmConfig, retry_delay};
use crate::error::{LlmError, Result};
use crate::provider::{CompletionProvider, Message};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Normalize a provider base URL so it ends in a version segment.
///
/// URLs that already contain `/api/` or end in `/v<digits>` are kept; all
/// others get `/v1` appended.
///
/// ```
/// use ptg_llm::openai::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://api.deepseek.com/"), "https://api.deepseek.com/v1");
/// assert_eq!(
///     normalize_base_url("https://open.bigmodel.cn/api/paas/v4/"),
///     "https://open.bigmodel.cn/api/paas/v4"
/// );
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    let url = base_url.trim().trim_end_matches('/');
    if url.is_empty() {
        return String::new();
    }

    let lower = url.to_ascii_lowercase();
    if lower.contains("/api/") || ends_with_version(&lower) {
        return url.to_string();
    }
    format!("{url}/v1")
}

fn ends_with_version(url: &str) -> bool {
    match url.rsplit_once('/') {
        Some((_, last)) => last
            .strip_prefix('v')
            .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())),
        None => false,
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
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

pub(crate) fn build_request_body<'a>(
    config: &'a LlmConfig,
    messages: &'a [Message],
) -> ChatRequest<'a> {
    ChatRequest {
        model: &config.model,
        messages,
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    }
}

/// Pull the first choice's text out of a chat-completions body.
pub(crate) fn decode_chat_response(body: &str) -> Result<String> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| LlmError::InvalidResponse {
            message: format!("Failed to parse chat completion: {e}"),
            raw_response: body.to_string(),
        })?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse {
            message: "No choices in response".to_string(),
            raw_response: body.to_string(),
        })?;

    Ok(choice.message.content.unwrap_or_default())
}

/// OpenAI-compatible chat client (DeepSeek, GLM, Doubao, ...).
#[derive(Debug)]
pub struct OpenAiCompatibleClient {
    config: LlmConfig,
    endpoint: String,
    client: Client,
}

impl OpenAiCompatibleClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|message| LlmError::InvalidConfig { message })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| LlmError::InvalidConfig {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        let endpoint = format!("{}/chat/completions", normalize_base_url(&config.base_url));
        Ok(Self {
            config,
            endpoint,
            client,
        })
    }

    /// Full URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn try_request(&self, messages: &[Message]) -> Result<String> {
        let body = build_request_body(&self.config, messages);

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout {
                    seconds: self.config.timeout_seconds,
                }
            } else {
                LlmError::ServiceUnreachable {
                    url: self.endpoint.clone(),
                    source: Box::new(e),
                }
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::GenerationFailed {
                message: format!("Failed to read {} response body", self.config.name),
                source: Some(Box::new(e)),
            })?;

        if !status.is_success() {
            return Err(LlmError::Status {
                provider: self.config.name.clone(),
                status: status.as_u16(),
                body: text,
            });
        }

        decode_chat_response(&text)
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompatibleClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        self.chat(&[Message::system(system), Message::user(user)]).await
    }

    async fn chat(&self, messages: &[Message]) -> Result<String> {
        let mut attempt = 0;
        loop {
            match self.try_request(messages).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        "{} request failed (attempt {}/{}), retrying: {}",
                        self.config.name,
                        attempt,
                        self.config.max_retries + 1,
                        err
                    );
                    tokio::time::sleep(retry_delay(attempt)).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn provider_name(&self) -> &str {
        &self.config.name
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LlmConfig {
        LlmConfig::openai_compatible("doubao", "https://ark.cn-beijing.volces.com/api/v3", "doubao-seed")
            .with_api_key("key")
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("  https://api.deepseek.com  "), "https://api.deepseek.com/v1");
        assert_eq!(normalize_base_url("http://localhost:1234/v1/"), "http://localhost:1234/v1");
        assert_eq!(normalize_base_url("https://host/V2"), "https://host/V2");
        assert_eq!(
            normalize_base_url("https://ark.cn-beijing.volces.com/api/v3"),
            "https://ark.cn-beijing.volces.com/api/v3"
        );
        assert_eq!(normalize_base_url("https://host/version"), "https://host/version/v1");
        assert_eq!(normalize_base_url(" / "), "");
    }

    #[test]
    fn test_endpoint_uses_normalized_base() {
        let client = OpenAiCompatibleClient::new(config()).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://ark.cn-beijing.volces.com/api/v3/chat/completions"
        );
        assert_eq!(client.provider_name(), "doubao");
        assert_eq!(client.model_name(), "doubao-seed");
    }

    #[test]
    fn test_missing_key_is_rejected_before_any_request() {
        let mut config = config();
        config.api_key = None;
        assert!(matches!(
            OpenAiCompatibleClient::new(config),
            Err(LlmError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_request_body_shape() {
        let config = config();
        let messages = [Message::system("sys"), Message::user("usr"), Message::user("more")];
        let body = build_request_body(&config, &messages);
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], "doubao-seed");
        assert_eq!(value["temperature"], 0.0);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "usr");
        assert_eq!(value["messages"][2]["role"], "user");
        assert!(value.get("max_tokens").is_none());
    }

    #[test]
    fn test_decode_chat_response() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"[]"}}]}"#;
        assert_eq!(decode_chat_response(body).unwrap(), "[]");

        let null_content = r#"{"choices":[{"message":{"content":null}}]}"#;
        assert_eq!(decode_chat_response(null_content).unwrap(), "");

        assert!(matches!(
            decode_chat_response(r#"{"choices":[]}"#),
            Err(LlmError::InvalidResponse { .. })
        ));
        assert!(matches!(
            decode_chat_response("<html>"),
            Err(LlmError::InvalidResponse { .. })
        ));
    }
}
