use async_trait::async_trait;
use lingo_core::{LingoError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::provider::{ChatMessage, LlmProvider, LlmRequest, LlmResponse, StopReason, Usage};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Chat-completions client for OpenAI and compatible servers (vLLM, Ollama,
/// Together, ...).
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    name: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.into(),
            name: "openai".into(),
        }
    }

    pub fn with_base_url(mut self, url: String, name: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self.name = name;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LingoError::LlmProvider(e.to_string()))?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

// ── Wire format ────────────────────────────────────────────────

/// `POST /chat/completions` body.
#[derive(Debug, Serialize)]
pub struct ChatBody<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Reasoning models reject `max_tokens` and take this instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: WireMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

pub fn request_body(request: &LlmRequest) -> ChatBody<'_> {
    let messages = request
        .system
        .iter()
        .map(|s| ChatMessage::system(s.as_str()))
        .chain(request.messages.iter().cloned())
        .collect();

    let reasoning = ["o1", "o3", "o4", "gpt-5"]
        .iter()
        .any(|prefix| request.model.starts_with(prefix));
    let (max_tokens, max_completion_tokens) = if reasoning {
        (None, Some(request.max_tokens))
    } else {
        (Some(request.max_tokens), None)
    };

    ChatBody {
        model: &request.model,
        messages,
        temperature: request.temperature,
        max_tokens,
        max_completion_tokens,
    }
}

/// Take the first choice of a completion. No choices is an error.
pub fn parse_response(completion: ChatCompletion) -> Result<LlmResponse> {
    let usage = completion
        .usage
        .map(|u| Usage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        })
        .unwrap_or_default();
    let choice = completion
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LingoError::LlmProvider("completion has no choices".into()))?;

    let stop_reason = match choice.finish_reason.as_deref() {
        Some("length") => StopReason::MaxTokens,
        Some("content_filter") => StopReason::ContentFilter,
        _ => StopReason::EndTurn,
    };

    Ok(LlmResponse {
        text: choice.message.content.unwrap_or_default(),
        usage,
        stop_reason,
    })
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse> {
        debug!(model = %request.model, provider = %self.name, "requesting completion");

        let resp = self
            .client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&request_body(request))
            .send()
            .await
            .map_err(|e| LingoError::LlmProvider(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(LingoError::LlmProvider(format!("HTTP {status}: {detail}")));
        }

        let completion: ChatCompletion = resp
            .json()
            .await
            .map_err(|e| LingoError::LlmProvider(format!("unreadable completion: {e}")))?;
        let response = parse_response(completion)?;
        debug!(tokens = response.usage.total_tokens(), stop = ?response.stop_reason, "completion received");
        Ok(response)
    }
}
