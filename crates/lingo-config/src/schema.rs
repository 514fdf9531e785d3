use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration, maps to `lingo.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LingoConfig {
    pub generator: GeneratorConfig,
    pub llm: LlmConfig,
    pub playback: PlaybackConfig,
    pub logging: LoggingConfig,
}

// ── Generator ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// External generator command. Empty means the built-in LLM generator.
    /// `--language <lang> --count <n>` is appended on every run.
    pub command: Vec<String>,
    /// Number of examples requested per online run.
    pub count: usize,
    /// Vocabulary words sampled per generation call.
    pub vocab_sample_size: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            command: vec![],
            count: 10,
            vocab_sample_size: 20,
        }
    }
}

// ── LLM ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Chat-completions model name.
    pub model: String,
    /// Base URL of an OpenAI-compatible API.
    pub base_url: String,
    /// API key. Falls back to OPENAI_API_KEY, then OPENAI_KEY.
    pub api_key: Option<String>,
    /// Prompt template overriding the built-in one.
    /// Placeholders: {language}, {words_prefix}, {words}, {words_suffix}.
    pub prompt: Option<String>,
    /// File whose contents are sent as the system prompt.
    pub system_prompt_file: Option<PathBuf>,
    /// Maximum tokens per completion.
    pub max_tokens: u32,
    /// Temperature (0.0 - 2.0).
    pub temperature: f32,
    /// Per-request timeout. 0 disables the timeout.
    pub request_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".into(),
            base_url: "https://api.openai.com/v1".into(),
            api_key: None,
            prompt: None,
            system_prompt_file: None,
            max_tokens: 256,
            temperature: 0.7,
            request_timeout_secs: 60,
        }
    }
}

// ── Playback ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// External playback command. Empty means the built-in terminal player.
    pub command: Vec<String>,
    /// Text-to-speech program and leading arguments; the sentence is appended.
    pub speech_command: Vec<String>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            command: vec![],
            speech_command: vec!["espeak-ng".into()],
        }
    }
}

// ── Logging ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Output format: "pretty", "json".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "pretty".into(),
        }
    }
}

// ── Validation ─────────────────────────────────────────────────

/// A single config validation issue.
#[derive(Debug)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
    pub severity: WarningSeverity,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Error,
    Warning,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.severity {
            WarningSeverity::Error => "error",
            WarningSeverity::Warning => "warning",
        };
        write!(f, "{}: {}: {}", label, self.field, self.message)?;
        if let Some(ref h) = self.hint {
            write!(f, " ({})", h)?;
        }
        Ok(())
    }
}

impl LingoConfig {
    /// Validate the config and return a list of warnings.
    /// Returns `Err` with all error messages joined if any severity is Error.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>, String> {
        let mut warnings = Vec::new();

        // ── Generator ───
        if self.generator.count == 0 {
            warnings.push(ConfigWarning {
                field: "generator.count".into(),
                message: "count is 0, online runs would store empty batches".into(),
                severity: WarningSeverity::Error,
                hint: Some("Set to e.g. 10".into()),
            });
        }
        if self.generator.vocab_sample_size == 0 {
            warnings.push(ConfigWarning {
                field: "generator.vocab_sample_size".into(),
                message: "sample size is 0, vocabulary would never reach the generator".into(),
                severity: WarningSeverity::Error,
                hint: Some("Set to e.g. 20".into()),
            });
        }
        if self
            .generator
            .command
            .first()
            .is_some_and(|program| program.trim().is_empty())
        {
            warnings.push(ConfigWarning {
                field: "generator.command".into(),
                message: "program name is blank".into(),
                severity: WarningSeverity::Error,
                hint: Some("Use [] for the built-in generator".into()),
            });
        }

        // ── LLM ───
        if self.generator.command.is_empty() {
            if self.llm.model.is_empty() {
                warnings.push(ConfigWarning {
                    field: "llm.model".into(),
                    message: "model is empty".into(),
                    severity: WarningSeverity::Error,
                    hint: Some("Set to e.g. 'gpt-4o'".into()),
                });
            }
            if self.llm.api_key.is_none() {
                warnings.push(ConfigWarning {
                    field: "llm.api_key".into(),
                    message: "no API key configured, online mode will fail".into(),
                    severity: WarningSeverity::Warning,
                    hint: Some("Set llm.api_key or export OPENAI_API_KEY".into()),
                });
            }
        }
        if self.llm.temperature < 0.0 || self.llm.temperature > 2.0 {
            warnings.push(ConfigWarning {
                field: "llm.temperature".into(),
                message: format!("temperature {} is out of range", self.llm.temperature),
                severity: WarningSeverity::Error,
                hint: Some("Temperature must be between 0.0 and 2.0".into()),
            });
        }
        if self.llm.max_tokens == 0 {
            warnings.push(ConfigWarning {
                field: "llm.max_tokens".into(),
                message: "max_tokens is 0, the model can't produce an example".into(),
                severity: WarningSeverity::Error,
                hint: Some("Set to e.g. 256".into()),
            });
        }

        // ── Playback ───
        if self
            .playback
            .speech_command
            .first()
            .is_none_or(|program| program.trim().is_empty())
        {
            warnings.push(ConfigWarning {
                field: "playback.speech_command".into(),
                message: "speech command is empty".into(),
                severity: WarningSeverity::Error,
                hint: Some("Set to e.g. [\"espeak-ng\", \"-v\", \"es\"]".into()),
            });
        }

        // ── Logging ───
        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.format".into(),
                message: format!("unknown log format '{}'", self.logging.format),
                severity: WarningSeverity::Error,
                hint: Some(format!("Valid values: {}", valid_formats.join(", "))),
            });
        }

        let errors: Vec<String> = warnings
            .iter()
            .filter(|w| w.severity == WarningSeverity::Error)
            .map(|w| w.to_string())
            .collect();
        if !errors.is_empty() {
            return Err(errors.join("\n"));
        }

        Ok(warnings)
    }
}
