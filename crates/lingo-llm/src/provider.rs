use async_trait::async_trait;
use lingo_core::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

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

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// One completion call. Example generation always sends a single user
/// prompt, optionally preceded by a system prompt.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub system: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl LlmRequest {
    pub fn oneshot(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(prompt)],
            system: None,
            max_tokens: 256,
            temperature: 0.7,
        }
    }

    /// Characters of prompt text, system prompt included.
    pub fn prompt_len(&self) -> usize {
        let system = self.system.as_deref().map_or(0, str::len);
        system + self.messages.iter().map(|m| m.content.len()).sum::<usize>()
    }
}

#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
    pub usage: Usage,
    pub stop_reason: StopReason,
}

/// Why the model stopped. A truncated reply may be missing its translation line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    ContentFilter,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl Usage {
    pub fn total_tokens(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// A chat-completion backend.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oneshot_request() {
        let req = LlmRequest::oneshot("gpt-4o", "hola");
        assert_eq!(req.messages, vec![ChatMessage::user("hola")]);
        assert!(req.system.is_none());
        assert_eq!(req.prompt_len(), 4);
    }

    #[test]
    fn test_prompt_len_counts_system() {
        let mut req = LlmRequest::oneshot("gpt-4o", "abc");
        req.system = Some("tutor".into());
        assert_eq!(req.prompt_len(), 8);
    }

    #[test]
    fn test_usage_total() {
        let usage = Usage {
            input_tokens: 12,
            output_tokens: 30,
        };
        assert_eq!(usage.total_tokens(), 42);
        assert_eq!(Usage::default().total_tokens(), 0);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatMessage::system("x")).unwrap();
        assert_eq!(json, r#"{"role":"system","content":"x"}"#);
    }
}
