//! Language model seam and the OpenAI chat-completions client

use crate::constants::api::OPENAI_URL;
use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::{json, Value};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// One system + user exchange
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

/// Something that turns a prompt into text
pub trait LanguageModel: Send + Sync {
    /// Raw completion text; empty when the model produced nothing
    fn complete(&self, request: &CompletionRequest) -> impl Future<Output = Result<String>> + Send;
}

/// OpenAI `/chat/completions` client
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        Self::with_base_url(api_key, model, OPENAI_URL, timeout)
    }

    pub fn with_base_url(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn body(&self, request: &CompletionRequest) -> Value {
        json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.user}
            ],
            "max_tokens": request.max_tokens,
            "temperature": request.temperature
        })
    }
}

impl LanguageModel for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Upstream {
                service: "OpenAI",
                status: status.to_string(),
            });
        }

        let body: Value = response.json().await?;
        let content = body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string();

        debug!(model = %self.model, chars = content.len(), "model completion");
        Ok(content)
    }
}
