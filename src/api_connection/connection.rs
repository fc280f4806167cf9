use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::endpoints::{ChatCompletionRequest, ChatCompletionResponse, ProviderKind};

const APP_NAME: &str = "FoodDiary";

#[derive(Debug, Error)]
pub enum ApiConnectionError {
    #[error("API key not configured for {0:?}")]
    MissingApiKey(ProviderKind),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("API error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// A configured chat-completions endpoint.
#[derive(Clone, Debug)]
pub struct Provider {
    kind: ProviderKind,
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

impl Provider {
    /// Builds a provider. `base_url` overrides the backend's public endpoint; `timeout` bounds
    /// every request made through it.
    pub fn new(
        kind: ProviderKind,
        api_key: Option<String>,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ApiConnectionError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url
            .unwrap_or_else(|| kind.default_base_url().to_string())
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            kind,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url,
            client,
        })
    }

    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    pub async fn call_chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ApiConnectionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ApiConnectionError::MissingApiKey(self.kind))?;

        let url = self.chat_completions_url();
        debug!(%url, model = %request.model, "Sending chat completion request");

        let mut builder = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .header("Content-Type", "application/json");
        if self.kind == ProviderKind::OpenRouter {
            builder = builder
                .header("HTTP-Referer", "http://localhost")
                .header("X-Title", APP_NAME);
        }

        let response = builder.json(request).send().await?;

        if response.status().is_success() {
            let body = response.text().await?;
            Ok(serde_json::from_str::<ChatCompletionResponse>(&body)?)
        } else {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            Err(ApiConnectionError::Api { status, body })
        }
    }
}
