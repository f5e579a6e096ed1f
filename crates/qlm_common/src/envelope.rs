//! OpenAI-compatible wire types.
//!
//! The shapes mirror the chat-completion API closely enough that stock
//! client libraries work against the daemon unchanged. Token counts are
//! naive whitespace word counts; nothing here tokenizes for real.

use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// The one model this service pretends to be.
pub const DEFAULT_MODEL: &str = "quack-model";

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

/// `<prefix>-` plus 16 random bytes, hex-encoded.
pub fn completion_id(prefix: &str) -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    format!("{}-{}", prefix, hex::encode(bytes))
}

// ============================================================================
// Chat completions
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub stream: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_options: Option<StreamOptions>,
}

impl ChatCompletionRequest {
    /// The prompt is the trailing user message; anything else counts as no
    /// prompt.
    pub fn prompt(&self) -> String {
        match self.messages.last() {
            Some(m) if m.role == "user" => m.content.as_text(),
            _ => String::new(),
        }
    }

    pub fn include_usage_in_stream(&self) -> bool {
        self.stream_options
            .as_ref()
            .map(|o| o.include_usage)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamOptions {
    #[serde(default)]
    pub include_usage: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: MessageContent::Text(content.into()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Text(content.into()),
        }
    }
}

/// Message content arrives either as a bare string or as a list of typed
/// parts (multimodal clients send the list form).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Text(String::new())
    }
}

impl MessageContent {
    /// Flattens the content to plain text. Non-text parts are skipped.
    pub fn as_text(&self) -> String {
        match self {
            MessageContent::Text(s) => s.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter(|p| p.kind == "text")
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatChoice>,
    pub usage: Usage,
}

impl ChatCompletionResponse {
    pub fn new(model: &str, prompt: &str, reply: &str) -> Self {
        Self {
            id: completion_id("chatcmpl"),
            object: "chat.completion".to_string(),
            created: Utc::now().timestamp(),
            model: model.to_string(),
            choices: vec![ChatChoice {
                index: 0,
                message: ChatMessage::assistant(reply),
                finish_reason: "stop".to_string(),
            }],
            usage: Usage::count(prompt, reply),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub index: u32,
    pub message: ChatMessage,
    pub finish_reason: String,
}

// ============================================================================
// Streaming chunks
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChunkChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl ChatCompletionChunk {
    fn envelope(id: &str, created: i64, model: &str) -> Self {
        Self {
            id: id.to_string(),
            object: "chat.completion.chunk".to_string(),
            created,
            model: model.to_string(),
            choices: Vec::new(),
            usage: None,
        }
    }

    /// First chunk of a stream: announces the assistant role.
    pub fn role(id: &str, created: i64, model: &str) -> Self {
        let mut chunk = Self::envelope(id, created, model);
        chunk.choices.push(ChunkChoice {
            index: 0,
            delta: Delta {
                role: Some("assistant".to_string()),
                content: Some(String::new()),
            },
            finish_reason: None,
        });
        chunk
    }

    pub fn content(id: &str, created: i64, model: &str, piece: &str) -> Self {
        let mut chunk = Self::envelope(id, created, model);
        chunk.choices.push(ChunkChoice {
            index: 0,
            delta: Delta {
                role: None,
                content: Some(piece.to_string()),
            },
            finish_reason: None,
        });
        chunk
    }

    pub fn finish(id: &str, created: i64, model: &str) -> Self {
        let mut chunk = Self::envelope(id, created, model);
        chunk.choices.push(ChunkChoice {
            index: 0,
            delta: Delta::default(),
            finish_reason: Some("stop".to_string()),
        });
        chunk
    }

    /// Trailing usage chunk (empty choices list), sent only when the client
    /// asked for it via `stream_options.include_usage`.
    pub fn usage(id: &str, created: i64, model: &str, usage: Usage) -> Self {
        let mut chunk = Self::envelope(id, created, model);
        chunk.usage = Some(usage);
        chunk
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkChoice {
    pub index: u32,
    pub delta: Delta,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Delta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

// ============================================================================
// Legacy completions
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<TextChoice>,
    pub usage: Usage,
}

impl CompletionResponse {
    pub fn new(model: &str, prompt: &str, reply: &str) -> Self {
        Self {
            id: completion_id("cmpl"),
            object: "text_completion".to_string(),
            created: Utc::now().timestamp(),
            model: model.to_string(),
            choices: vec![TextChoice {
                text: reply.to_string(),
                index: 0,
                finish_reason: "stop".to_string(),
            }],
            usage: Usage::count(prompt, reply),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextChoice {
    pub text: String,
    pub index: u32,
    pub finish_reason: String,
}

// ============================================================================
// Usage, models, health, errors
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: usize,
    pub completion_tokens: usize,
    pub total_tokens: usize,
}

impl Usage {
    /// Whitespace word counts stand in for tokenization.
    pub fn count(prompt: &str, completion: &str) -> Self {
        let prompt_tokens = prompt.split_whitespace().count();
        let completion_tokens = completion.split_whitespace().count();
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelList {
    pub object: String,
    pub data: Vec<ModelInfo>,
}

impl ModelList {
    pub fn single(id: &str, owned_by: &str) -> Self {
        Self {
            object: "list".to_string(),
            data: vec![ModelInfo {
                id: id.to_string(),
                object: "model".to_string(),
                created: Utc::now().timestamp(),
                owned_by: owned_by.to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub owned_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub timestamp: i64,
}

/// OpenAI-style error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ErrorBody {
    pub fn invalid_api_key() -> Self {
        Self {
            error: ErrorDetail {
                message: "Incorrect API key provided. Keys look like sk-...".to_string(),
                kind: "invalid_request_error".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_counts_whitespace_words() {
        let usage = Usage::count("Hello world test", "quack quack");
        assert_eq!(usage.prompt_tokens, 3);
        assert_eq!(usage.completion_tokens, 2);
        assert_eq!(usage.total_tokens, 5);
    }

    #[test]
    fn test_usage_empty_prompt() {
        let usage = Usage::count("", "quack");
        assert_eq!(usage.prompt_tokens, 0);
        assert_eq!(usage.total_tokens, 1);
    }

    #[test]
    fn test_prompt_is_trailing_user_message() {
        let req: ChatCompletionRequest = serde_json::from_str(
            r#"{"model":"quack-model","messages":[
                {"role":"user","content":"first"},
                {"role":"assistant","content":"quack"},
                {"role":"user","content":"second"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(req.prompt(), "second");
    }

    #[test]
    fn test_prompt_empty_when_trailing_message_not_user() {
        let req: ChatCompletionRequest = serde_json::from_str(
            r#"{"messages":[{"role":"system","content":"be a duck"}]}"#,
        )
        .unwrap();
        assert_eq!(req.prompt(), "");
        assert_eq!(req.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_multimodal_content_flattens_text_parts() {
        let req: ChatCompletionRequest = serde_json::from_str(
            r#"{"messages":[{"role":"user","content":[
                {"type":"text","text":"Hello duck!"},
                {"type":"image_url","text":""}
            ]}],"stream":true,"stream_options":{"include_usage":true}}"#,
        )
        .unwrap();
        assert_eq!(req.prompt(), "Hello duck!");
        assert!(req.stream);
        assert!(req.include_usage_in_stream());
    }

    #[test]
    fn test_completion_id_shape() {
        let id = completion_id("chatcmpl");
        assert!(id.starts_with("chatcmpl-"));
        assert_eq!(id.len(), "chatcmpl-".len() + 32);
    }

    #[test]
    fn test_chat_response_shape() {
        let resp = ChatCompletionResponse::new("quack-model", "hi there", "quack");
        assert_eq!(resp.object, "chat.completion");
        assert_eq!(resp.choices.len(), 1);
        assert_eq!(resp.choices[0].finish_reason, "stop");
        assert_eq!(resp.choices[0].message.role, "assistant");
        assert_eq!(resp.usage.prompt_tokens, 2);

        // content serializes as a bare string, not a parts list
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["choices"][0]["message"]["content"], "quack");
    }

    #[test]
    fn test_legacy_completion_shape() {
        let resp = CompletionResponse::new("quack-model", "Test prompt", "Quack!");
        assert_eq!(resp.object, "text_completion");
        assert!(resp.id.starts_with("cmpl-"));
        assert_eq!(resp.choices[0].text, "Quack!");
    }

    #[test]
    fn test_chunk_serialization_skips_absent_fields() {
        let chunk = ChatCompletionChunk::content("chatcmpl-x", 0, "quack-model", "quack ");
        let json = serde_json::to_value(&chunk).unwrap();
        assert_eq!(json["object"], "chat.completion.chunk");
        assert!(json.get("usage").is_none());
        assert!(json["choices"][0]["delta"].get("role").is_none());
        assert_eq!(json["choices"][0]["delta"]["content"], "quack ");
        assert_eq!(json["choices"][0]["finish_reason"], serde_json::Value::Null);
    }

    #[test]
    fn test_usage_chunk_has_no_choices() {
        let chunk = ChatCompletionChunk::usage(
            "chatcmpl-x",
            0,
            "quack-model",
            Usage::count("hi", "quack"),
        );
        assert!(chunk.choices.is_empty());
        assert!(chunk.usage.is_some());
    }
}
