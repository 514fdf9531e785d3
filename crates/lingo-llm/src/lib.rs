//! # lingo-llm
//!
//! Abstraction layer over chat-completion LLM providers. The example
//! generator only needs single-shot completions, so that is all a provider
//! has to offer.

pub mod mock;
pub mod openai;
pub mod provider;

pub use mock::{MockProvider, MockReply};
pub use openai::OpenAiProvider;
pub use provider::{ChatMessage, LlmProvider, LlmRequest, LlmResponse, Role, StopReason, Usage};
