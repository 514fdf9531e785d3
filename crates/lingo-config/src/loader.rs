use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::schema::LingoConfig;

/// Loads the lingo configuration.
pub struct ConfigLoader {
    config: LingoConfig,
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Resolve the config path: explicit path > LINGO_CONFIG env > ~/.lingo/lingo.toml
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(p) = explicit {
            return p.to_path_buf();
        }
        if let Ok(p) = std::env::var("LINGO_CONFIG") {
            return PathBuf::from(p);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".lingo")
            .join("lingo.toml")
    }

    /// Load the config from disk, falling back to defaults.
    pub fn load(path: Option<&Path>) -> lingo_core::Result<Self> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Like [`ConfigLoader::load`], reading overrides through `env` instead of
    /// the process environment.
    pub fn load_with_env(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> lingo_core::Result<Self> {
        let config_path = Self::resolve_path(path);
        let config = if config_path.exists() {
            info!(?config_path, "loading configuration");
            let raw = std::fs::read_to_string(&config_path)?;
            Self::parse(&raw, &config_path)?
        } else {
            warn!(?config_path, "config file not found, using defaults");
            LingoConfig::default()
        };

        let config = Self::apply_env_overrides(config, env);

        match config.validate() {
            Ok(warnings) => {
                for w in &warnings {
                    warn!("{}", w);
                }
            }
            Err(e) => {
                return Err(lingo_core::LingoError::Config(e));
            }
        }

        Ok(Self {
            config,
            config_path,
        })
    }

    /// Get a copy of the loaded config.
    pub fn get(&self) -> LingoConfig {
        self.config.clone()
    }

    /// Path the config was resolved from (it may not exist).
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    fn parse(raw: &str, config_path: &Path) -> lingo_core::Result<LingoConfig> {
        toml::from_str::<LingoConfig>(raw).map_err(|e| {
            lingo_core::LingoError::Config(format!(
                "failed to parse {}: {}",
                config_path.display(),
                e
            ))
        })
    }

    /// Apply env var overrides (LINGO_LLM_MODEL, LINGO_LOG_LEVEL, SPEECH_COMMAND, API keys).
    fn apply_env_overrides(
        mut config: LingoConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> LingoConfig {
        if let Some(v) = env("LINGO_LLM_MODEL") {
            config.llm.model = v;
        }
        if let Some(v) = env("LINGO_LOG_LEVEL") {
            config.logging.level = v;
        }
        // Replaces only the program; configured voice arguments are kept.
        if let Some(v) = env("SPEECH_COMMAND").filter(|v| !v.trim().is_empty()) {
            match config.playback.speech_command.first_mut() {
                Some(program) => *program = v,
                None => config.playback.speech_command.push(v),
            }
        }
        // API key: config file takes priority, env is the fallback.
        if config.llm.api_key.is_none() {
            config.llm.api_key = env("OPENAI_API_KEY").or_else(|| env("OPENAI_KEY"));
        }
        config
    }
}
