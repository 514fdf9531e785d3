use thiserror::Error;

/// Unified error type for the entire lingo workspace.
#[derive(Error, Debug)]
pub enum LingoError {
    // ── Usage errors ───────────────────────────────────────────
    #[error("usage error: {0}")]
    Usage(String),

    // ── Generation errors ──────────────────────────────────────
    #[error("example generation failed: {reason}")]
    Generation {
        reason: String,
        /// Exit status of the generator process, if it exited normally.
        status: Option<i32>,
    },

    #[error("llm provider error: {0}")]
    LlmProvider(String),

    #[error("malformed example: {0}")]
    MalformedExample(String),

    // ── Store errors ───────────────────────────────────────────
    #[error("example store error: {0}")]
    Store(String),

    #[error("vocabulary error: {path}: {reason}")]
    Vocabulary { path: String, reason: String },

    // ── Playback errors ────────────────────────────────────────
    #[error("playback error: {0}")]
    Playback(String),

    // ── Config errors ──────────────────────────────────────────
    #[error("config error: {0}")]
    Config(String),

    #[error("config validation failed: {field}: {reason}")]
    ConfigValidation { field: String, reason: String },

    // ── Generic wrappers ───────────────────────────────────────
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LingoError {
    /// Process exit status this error maps to.
    ///
    /// A failed generator forwards its own status; a generator killed by a
    /// signal, and every other error, exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            LingoError::Generation {
                status: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, LingoError::Usage(_))
    }
}

pub type Result<T> = std::result::Result<T, LingoError>;
