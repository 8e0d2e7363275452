//! Mock provider for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use bacprep_core::error::ModelError;
use bacprep_core::traits::{ChatModel, ChatReply, ChatRequest, TokenUsage};

/// A mock chat backend for exercising the tutor gateway and the HTTP layer
/// without real API calls.
///
/// Replies are consumed from a scripted queue (falling back to a fixed
/// default when the queue runs dry), or every call fails when constructed
/// with [`MockProvider::failing`] — which is how tests reach the gateway's
/// fallback branches.
pub struct MockProvider {
    replies: Mutex<VecDeque<String>>,
    default_reply: String,
    failure: Option<String>,
    call_count: AtomicU32,
    last_request: Mutex<Option<ChatRequest>>,
}

impl MockProvider {
    /// A mock that always returns the same reply.
    pub fn with_fixed_reply(reply: &str) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            default_reply: reply.to_string(),
            failure: None,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// A mock that replays the given replies in order, then repeats the last
    /// one.
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let queue: VecDeque<String> = replies.into_iter().map(Into::into).collect();
        let default_reply = queue.back().cloned().unwrap_or_default();
        Self {
            replies: Mutex::new(queue),
            default_reply,
            failure: None,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// A mock whose every call fails with a network error.
    pub fn failing(message: &str) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            default_reply: String::new(),
            failure: Some(message.to_string()),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Number of completions requested so far.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// The most recent request received.
    pub fn last_request(&self) -> Option<ChatRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &ChatRequest) -> anyhow::Result<ChatReply> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap() = Some(request.clone());

        if let Some(message) = &self.failure {
            return Err(ModelError::Network(message.clone()).into());
        }

        let content = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default_reply.clone());
        let completion_tokens = (content.len() / 4) as u32; // Rough estimate

        Ok(ChatReply {
            content,
            model: "mock-model".to_string(),
            token_usage: TokenUsage {
                prompt_tokens: 0,
                completion_tokens,
                total_tokens: completion_tokens,
            },
            latency_ms: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bacprep_core::traits::ChatTurn;

    fn request() -> ChatRequest {
        ChatRequest {
            messages: vec![ChatTurn::user("hello")],
            max_tokens: 100,
            temperature: 0.0,
            json_mode: false,
        }
    }

    #[tokio::test]
    async fn fixed_reply() {
        let provider = MockProvider::with_fixed_reply("pong");
        let reply = provider.complete(&request()).await.unwrap();
        assert_eq!(reply.content, "pong");
        assert_eq!(provider.call_count(), 1);
        assert!(provider.last_request().is_some());
    }

    #[tokio::test]
    async fn scripted_replies_in_order_then_repeat() {
        let provider = MockProvider::with_replies(["one", "two"]);
        assert_eq!(provider.complete(&request()).await.unwrap().content, "one");
        assert_eq!(provider.complete(&request()).await.unwrap().content, "two");
        assert_eq!(provider.complete(&request()).await.unwrap().content, "two");
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn failing_mock_errors_every_call() {
        let provider = MockProvider::failing("simulated outage");
        let err = provider.complete(&request()).await.unwrap_err();
        assert!(err.to_string().contains("simulated outage"));
        assert_eq!(provider.call_count(), 1);
    }
}
