//! REST client for OpenAI-compatible chat-completions endpoints.

use serde::{Deserialize, Serialize};

/// HTTP client for a single chat-completions provider.
pub struct ChatApi {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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

/// Body of `POST {api_url}/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

/// Errors from the chat-completions REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ChatApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Chat API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    /// A 2xx response with no choices.
    #[error("Chat API returned no choices")]
    NoChoices,
}

impl ChatApi {
    /// * `api_url` - Base URL, e.g. `https://api.openai.com/v1`.
    pub fn new(api_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url, api_key)
    }

    /// Reuse an existing [`reqwest::Client`], e.g. one built with a timeout.
    pub fn with_client(
        client: reqwest::Client,
        api_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Send one completion request and return the first choice's text.
    pub async fn complete(&self, request: &ChatRequest) -> Result<String, ChatApiError> {
        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.api_url))
            .json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let parsed: ChatResponse = Self::parse_response(response).await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ChatApiError::NoChoices)
    }

    // ---- private helpers ----

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ChatApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ChatApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ChatApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
