//! HTTP client for talking to qlmd.

use anyhow::{anyhow, Result};
use qlm_common::envelope::{
    ChatCompletionChunk, ChatCompletionRequest, ChatCompletionResponse, ChatMessage,
    HealthResponse, ModelList, DEFAULT_MODEL,
};

pub const DEFAULT_URL: &str = "http://127.0.0.1:8000";

/// Client for communicating with qlmd
pub struct QlmdClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl QlmdClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.post(format!("{}{}", self.base_url, path));
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        builder
    }

    /// Get daemon health
    pub async fn health(&self) -> Result<HealthResponse> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// List models
    pub async fn models(&self) -> Result<ModelList> {
        let response = self
            .http
            .get(format!("{}/models", self.base_url))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// One-shot chat completion
    pub async fn chat(&self, message: &str) -> Result<ChatCompletionResponse> {
        let request = ChatCompletionRequest {
            model: DEFAULT_MODEL.to_string(),
            messages: vec![ChatMessage::user(message)],
            max_tokens: None,
            stream: false,
            stream_options: None,
        };

        let response = self
            .post("/chat/completions")
            .json(&request)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// Streaming chat completion. Calls `on_piece` with each content delta
    /// as it arrives.
    pub async fn chat_stream(
        &self,
        message: &str,
        on_piece: &mut dyn FnMut(&str),
    ) -> Result<()> {
        let request = ChatCompletionRequest {
            model: DEFAULT_MODEL.to_string(),
            messages: vec![ChatMessage::user(message)],
            max_tokens: None,
            stream: true,
            stream_options: None,
        };

        let mut response = self
            .post("/chat/completions")
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        // SSE lines can split across network chunks; carry the tail over.
        let mut buffer = String::new();
        while let Some(bytes) = response.chunk().await? {
            buffer.push_str(&String::from_utf8_lossy(&bytes));
            while let Some(pos) = buffer.find('\n') {
                let line: String = buffer.drain(..=pos).collect();
                let line = line.trim();
                let Some(data) = line.strip_prefix("data: ") else {
                    continue;
                };
                if data == "[DONE]" {
                    return Ok(());
                }
                let chunk: ChatCompletionChunk = serde_json::from_str(data)
                    .map_err(|e| anyhow!("Malformed stream chunk: {}", e))?;
                if let Some(choice) = chunk.choices.first() {
                    if let Some(content) = &choice.delta.content {
                        on_piece(content);
                    }
                }
            }
        }
        Ok(())
    }
}
