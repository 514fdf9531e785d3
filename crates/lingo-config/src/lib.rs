//! # lingo-config
//!
//! Configuration system for lingo. Reads from `lingo.toml`, then applies
//! environment variable overrides; CLI flags are layered on top by the caller.

pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{
    ConfigWarning, GeneratorConfig, LingoConfig, LlmConfig, LoggingConfig, PlaybackConfig,
    WarningSeverity,
};
