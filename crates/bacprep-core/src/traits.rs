//! The text-generation provider trait.
//!
//! This async trait is implemented by the `bacprep-providers` crate; the
//! [`Tutor`](crate::tutor::Tutor) gateway only ever talks to the external
//! service through it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trait for chat-completion backends that generate tutoring text.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Human-readable provider name (e.g. "openai").
    fn name(&self) -> &str;

    /// Run one chat completion.
    async fn complete(&self, request: &ChatRequest) -> anyhow::Result<ChatReply>;
}

/// Who authored a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatRole::System => write!(f, "system"),
            ChatRole::User => write!(f, "user"),
            ChatRole::Assistant => write!(f, "assistant"),
        }
    }
}

/// One turn of a conversation sent to the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Request for one chat completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The conversation so far, system turn included.
    pub messages: Vec<ChatTurn>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
    /// Ask the service to emit a JSON object instead of free text.
    #[serde(default)]
    pub json_mode: bool,
}

/// Response from a chat completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    /// The generated text.
    pub content: String,
    /// Model that actually generated the response.
    pub model: String,
    /// Token usage.
    pub token_usage: TokenUsage,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Token accounting reported by the service.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Extract a JSON payload from a possibly markdown-wrapped model reply.
///
/// Models asked for JSON frequently wrap it in ```json fences anyway.
/// Handles:
/// - A ```json``` block (first one wins)
/// - A generic ``` block (if no json-specific block found)
/// - Raw JSON with no fences (returned as-is)
pub fn extract_json_from_markdown(reply: &str) -> String {
    let mut json_block: Option<String> = None;
    let mut generic_block: Option<String> = None;
    let mut in_block = false;
    let mut is_json_block = false;
    let mut current = String::new();

    for line in reply.lines() {
        let trimmed = line.trim();

        if !in_block && trimmed.starts_with("```") {
            in_block = true;
            let lang = trimmed.trim_start_matches('`').trim().to_lowercase();
            is_json_block = lang == "json";
            current.clear();
            continue;
        }

        if in_block && trimmed == "```" {
            in_block = false;
            if is_json_block && json_block.is_none() {
                json_block = Some(current.clone());
            } else if !is_json_block && generic_block.is_none() {
                generic_block = Some(current.clone());
            }
            current.clear();
            continue;
        }

        if in_block {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }

    // Truncated (unclosed) fence: treat what accumulated as a block.
    if in_block && !current.is_empty() {
        if is_json_block && json_block.is_none() {
            json_block = Some(current);
        } else if !is_json_block && generic_block.is_none() {
            generic_block = Some(current);
        }
    }

    json_block
        .or(generic_block)
        .unwrap_or_else(|| reply.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_fenced_json_block() {
        let reply = "Here you go:\n\n```json\n{\"score\": 8}\n```\n\nGood luck!";
        assert_eq!(extract_json_from_markdown(reply), "{\"score\": 8}");
    }

    #[test]
    fn extract_generic_block_fallback() {
        let reply = "```\n{\"tasks\": []}\n```";
        assert_eq!(extract_json_from_markdown(reply), "{\"tasks\": []}");
    }

    #[test]
    fn extract_prefers_json_over_generic() {
        let reply = "```\nnot it\n```\n\n```json\n[1, 2]\n```";
        assert_eq!(extract_json_from_markdown(reply), "[1, 2]");
    }

    #[test]
    fn raw_json_passes_through() {
        let reply = "{\"questions\": []}";
        assert_eq!(extract_json_from_markdown(reply), reply);
    }

    #[test]
    fn unclosed_fence_is_still_captured() {
        let reply = "```json\n{\"feedback\": \"cut off";
        assert_eq!(extract_json_from_markdown(reply), "{\"feedback\": \"cut off");
    }

    #[test]
    fn chat_role_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ChatRole::Assistant).unwrap(),
            "\"assistant\""
        );
        assert_eq!(ChatRole::User.to_string(), "user");
    }
}
