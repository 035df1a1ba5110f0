use async_trait::async_trait;
use reqwest::Client;

use crate::error::{Result, TopicError};
use crate::models::{ChatRequest, ChatResponse};

/// Where and as whom a chat request is sent
#[derive(Clone, Copy)]
pub struct Endpoint<'a> {
    pub url: &'a str,
    pub api_key: &'a str,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn chat(&self, endpoint: Endpoint<'_>, req: &ChatRequest) -> Result<ChatResponse>;
}

/// reqwest-backed transport. One attempt per call; no timeout is applied.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn chat(&self, endpoint: Endpoint<'_>, req: &ChatRequest) -> Result<ChatResponse> {
        tracing::debug!(url = endpoint.url, model = %req.model, "Sending chat-completion request");

        let response = self
            .client
            .post(endpoint.url)
            .header("Authorization", format!("Bearer {}", endpoint.api_key))
            .header("Content-Type", "application/json")
            .json(req)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(status = status.as_u16(), body = %body, "Chat-completion request rejected");
            return Err(TopicError::RequestFailed {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!("Failed to parse chat-completion response: {e}. Raw: {body}");
            TopicError::Json(e)
        })
    }
}
