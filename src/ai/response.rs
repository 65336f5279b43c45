use serde::{Deserialize, Serialize};

use crate::error::{CompletionError, CompletionResult};

/// Prefix that marks a locally generated failure reply.
pub const WARNING_MARKER: &str = "⚠️";

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> ChatMessage<'a> {
    pub fn system(content: &'a str) -> Self {
        Self {
            role: "system",
            content,
        }
    }

    pub fn user(content: &'a str) -> Self {
        Self {
            role: "user",
            content,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
pub struct ChatMessageResponse {
    pub content: Option<String>,
}

pub fn first_choice_text(response: ChatResponse) -> CompletionResult<String> {
    response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| CompletionError::Malformed("response contained no choices".to_string()))?
        .message
        .content
        .ok_or_else(|| CompletionError::Malformed("first choice has no text content".to_string()))
}

/// User-facing reply text for a failed upstream call.
pub fn format_upstream_failure(err: &CompletionError) -> String {
    format!("{WARNING_MARKER} The repair assistant could not reach the completion service: {err}")
}
