//! Scripted provider for tests: replies are queued up front and handed out
//! in order, no network involved.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::provider::{LlmProvider, LlmRequest, LlmResponse, StopReason, Usage};
use lingo_core::{LingoError, Result};

/// Reply used once the script runs out: a well-formed two-line example.
pub const FALLBACK_REPLY: &str = "Hola.\nHello.";

/// One scripted reply: completion text or a provider failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    Text(String),
    /// Text that stopped at the token limit.
    Truncated(String),
    Fail(String),
}

/// Replays [`MockReply`]s and records every request it sees.
///
/// ```
/// use lingo_llm::MockProvider;
/// let provider = MockProvider::new("test")
///     .with_response("Hola, ¿qué tal?\nHi, how are you?")
///     .with_error("HTTP 429: slow down");
/// assert_eq!(provider.pending(), 2);
/// ```
pub struct MockProvider {
    name: String,
    script: Mutex<VecDeque<MockReply>>,
    requests: Arc<Mutex<Vec<LlmRequest>>>,
}

impl MockProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: Mutex::new(VecDeque::new()),
            requests: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.push(MockReply::Text(text.into()));
        self
    }

    pub fn with_truncated(self, text: impl Into<String>) -> Self {
        self.push(MockReply::Truncated(text.into()));
        self
    }

    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.push(MockReply::Fail(message.into()));
        self
    }

    pub fn push(&self, reply: MockReply) {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(reply);
    }

    /// Replies not yet handed out.
    pub fn pending(&self) -> usize {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Shared handle to the requests seen so far. Stays valid after the
    /// provider is moved into an `Arc<dyn LlmProvider>`.
    pub fn recorded_requests(&self) -> Arc<Mutex<Vec<LlmRequest>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        let reply = self
            .script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or_else(|| MockReply::Text(FALLBACK_REPLY.into()));

        let (text, stop_reason) = match reply {
            MockReply::Text(text) => (text, StopReason::EndTurn),
            MockReply::Truncated(text) => (text, StopReason::MaxTokens),
            MockReply::Fail(message) => return Err(LingoError::LlmProvider(message)),
        };
        Ok(LlmResponse {
            usage: Usage {
                input_tokens: request.prompt_len() as u32,
                output_tokens: text.len() as u32,
            },
            text,
            stop_reason,
        })
    }
}
