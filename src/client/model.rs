// Author: Jacques Murray

use serde::{Deserialize, Serialize};

/// Only the most recent turns are sent along with a new message.
pub const MAX_CONVERSATION_HISTORY: usize = 5;

/// Who wrote a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One prior turn of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Body of `POST /chat/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub conversation_history: Vec<ChatMessage>,
}

impl ChatRequest {
    /// Builds a request, keeping only the last
    /// [`MAX_CONVERSATION_HISTORY`] turns of `history`.
    pub fn new(message: impl Into<String>, history: &[ChatMessage]) -> Self {
        let start = history.len().saturating_sub(MAX_CONVERSATION_HISTORY);
        Self {
            message: message.into(),
            conversation_history: history[start..].to_vec(),
        }
    }
}

/// A passage the backend retrieved to ground its answer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RetrievedChunk {
    pub content: String,
    pub score: f64,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// Answer returned by `POST /chat/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    #[serde(default)]
    pub retrieved_chunks: Vec<RetrievedChunk>,
    pub confidence: f64,
}

/// Returned by `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub qdrant_connected: bool,
}
