use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use lingo_config::LingoConfig;
use lingo_core::{LingoError, Result};
use lingo_llm::{LlmProvider, OpenAiProvider};

use crate::generator::{CommandGenerator, Generator, LlmGenerator};
use crate::pipeline::Pipeline;
use crate::player::{CommandPlayer, Player};
use crate::terminal::TerminalPlayer;

/// Generator from `[generator]`/`[llm]`: the external command if one is set,
/// otherwise the built-in LLM generator.
pub fn build_generator(config: &LingoConfig) -> Result<Arc<dyn Generator>> {
    if !config.generator.command.is_empty() {
        debug!(command = ?config.generator.command, "using external generator");
        return Ok(Arc::new(CommandGenerator::new(&config.generator.command)?));
    }
    Ok(Arc::new(build_llm_generator(config)?))
}

/// The built-in LLM generator, regardless of `generator.command`.
pub fn build_llm_generator(config: &LingoConfig) -> Result<LlmGenerator> {
    let llm = &config.llm;
    let api_key = llm.api_key.clone().ok_or_else(|| LingoError::ConfigValidation {
        field: "llm.api_key".into(),
        reason: "no API key, set llm.api_key or OPENAI_API_KEY".into(),
    })?;

    let mut provider = OpenAiProvider::new(api_key).with_base_url(llm.base_url.clone(), "openai".into());
    if llm.request_timeout_secs > 0 {
        provider = provider.with_timeout(Duration::from_secs(llm.request_timeout_secs))?;
    }
    let provider: Arc<dyn LlmProvider> = Arc::new(provider);

    let system = match &llm.system_prompt_file {
        Some(path) => Some(std::fs::read_to_string(path).map_err(|e| {
            LingoError::Config(format!("cannot read system prompt {}: {}", path.display(), e))
        })?),
        None => None,
    };

    let mut generator = LlmGenerator::new(provider, llm.model.clone())
        .with_system(system)
        .with_sampling(llm.max_tokens, llm.temperature);
    if let Some(prompt) = &llm.prompt {
        generator = generator.with_prompt(prompt.clone());
    }
    Ok(generator)
}

/// Player from `[playback]`: the external command if one is set, otherwise
/// the built-in terminal player.
pub fn build_player(config: &LingoConfig) -> Result<Arc<dyn Player>> {
    if config.playback.command.is_empty() {
        return Ok(Arc::new(TerminalPlayer::new(config.playback.speech_command.clone())));
    }
    debug!(command = ?config.playback.command, "using external player");
    Ok(Arc::new(CommandPlayer::new(&config.playback.command)?))
}

/// Pipeline wired from config. The generator is only built when `online` is
/// set, so offline practice works without an API key.
pub fn build_pipeline(config: &LingoConfig, online: bool) -> Result<Pipeline> {
    let mut pipeline = Pipeline::new(build_player(config)?)
        .with_count(config.generator.count)
        .with_vocab_sample_size(config.generator.vocab_sample_size);
    if online {
        pipeline = pipeline.with_generator(build_generator(config)?);
    }
    Ok(pipeline)
}
