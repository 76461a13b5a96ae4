//! OpenAI-compatible chat completions client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{LanguageModel, Prompt};
use crate::error::UpstreamError;
use crate::models::config::LlmConfig;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for `POST {base_url}/chat/completions`.
pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
}

impl OpenAiClient {
    /// Create a client, reading the API key from the configured environment variable.
    ///
    /// A missing key is reported per request, not here, so that callers which
    /// never reach the language service do not need one.
    pub fn from_config(config: &LlmConfig) -> Result<Self, UpstreamError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());
        Self::new(config, api_key)
    }

    /// Create a client with an explicit API key.
    pub fn new(config: &LlmConfig, api_key: Option<String>) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key,
            api_key_env: config.api_key_env.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: config.timeout(),
        })
    }

    /// Full URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn transport_error(&self, e: reqwest::Error) -> UpstreamError {
        if e.is_timeout() {
            UpstreamError::Timeout(self.timeout)
        } else {
            UpstreamError::Transport(e.to_string())
        }
    }

    fn request<'a>(&'a self, prompt: &'a Prompt) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn complete(&self, prompt: &Prompt) -> Result<String, UpstreamError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| UpstreamError::MissingApiKey(self.api_key_env.clone()))?;

        info!(model = %self.model, chars = prompt.user.len(), "Requesting completion");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&self.request(prompt))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;
        let answer = answer_from_body(&body)?;
        debug!(chars = answer.len(), "Received completion");
        Ok(answer)
    }
}

/// Pull the first choice's content out of a chat completions body.
fn answer_from_body(body: &str) -> Result<String, UpstreamError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| UpstreamError::InvalidResponse(e.to_string()))?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(UpstreamError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn client(api_key: Option<&str>) -> OpenAiClient {
        let config = LlmConfig {
            base_url: "http://localhost:9/v1/".to_string(),
            ..LlmConfig::default()
        };
        OpenAiClient::new(&config, api_key.map(str::to_string)).unwrap()
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        assert_eq!(client(None).endpoint(), "http://localhost:9/v1/chat/completions");
    }

    #[test]
    fn test_request_body() {
        let client = client(Some("sk-test"));
        let prompt = Prompt {
            system: "sys".to_string(),
            user: "usr".to_string(),
        };
        let value = serde_json::to_value(client.request(&prompt)).unwrap();
        assert_eq!(value["model"], "gpt-3.5-turbo");
        assert_eq!(value["max_tokens"], 200);
        assert_eq!(
            value["messages"],
            json!([
                { "role": "system", "content": "sys" },
                { "role": "user", "content": "usr" }
            ])
        );
    }

    #[test]
    fn test_answer_from_body() {
        let body = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"PO number: 7"}}]}"#;
        assert_eq!(answer_from_body(body).unwrap(), "PO number: 7");
    }

    #[test]
    fn test_answer_without_choices_is_empty() {
        let err = answer_from_body(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, UpstreamError::EmptyResponse));

        let err = answer_from_body(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap_err();
        assert!(matches!(err, UpstreamError::EmptyResponse));
    }

    #[test]
    fn test_garbage_body_is_invalid() {
        let err = answer_from_body("<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, UpstreamError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_sending() {
        let prompt = Prompt {
            system: String::new(),
            user: String::new(),
        };
        let err = client(None).complete(&prompt).await.unwrap_err();
        match err {
            UpstreamError::MissingApiKey(var) => assert_eq!(var, "OPENAI_API_KEY"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
