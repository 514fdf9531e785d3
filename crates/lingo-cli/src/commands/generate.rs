use clap::Parser;
use std::io::{IsTerminal, Read};
use tracing::debug;

use lingo_core::Result;
use lingo_runtime::{GenerationRequest, Generator, build_llm_generator};
use lingo_store::VocabSampler;

use super::CommonArgs;

/// Write example sentences as JSON Lines to stdout
///
/// Known words are read from stdin, one per line, unless stdin is a terminal.
#[derive(Parser, Debug)]
#[command(name = "lang-example-generate", version, about, long_about = None)]
pub struct GenerateCli {
    #[command(flatten)]
    common: CommonArgs,

    /// Number of examples to generate
    #[arg(short = 'n', long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    count: u64,

    /// Language to generate examples in
    #[arg(short = 'l', long, default_value = "spanish")]
    language: String,

    /// Prompt template ({language}, {words_prefix}, {words}, {words_suffix})
    #[arg(short = 'p', long)]
    prompt: Option<String>,
}

impl GenerateCli {
    pub async fn run(self) -> Result<i32> {
        let mut config = self.common.init()?;
        if let Some(prompt) = self.prompt {
            config.llm.prompt = Some(prompt);
        }
        // Always the built-in generator: `generator.command` may point back here.
        let generator = build_llm_generator(&config)?;

        let stdin = std::io::stdin();
        let vocabulary = if stdin.is_terminal() {
            None
        } else {
            let mut raw = String::new();
            stdin.lock().read_to_string(&mut raw)?;
            vocabulary_from(&raw)
        };
        debug!(words = vocabulary.as_ref().map_or(0, Vec::len), "vocabulary from stdin");

        let request = GenerationRequest {
            language: self.language,
            count: self.count as usize,
            vocabulary,
        };
        generator.generate(&request, &mut std::io::stdout()).await?;
        Ok(0)
    }
}

/// All non-blank words, shuffled. `None` when there are none.
fn vocabulary_from(raw: &str) -> Option<Vec<String>> {
    let sampler = VocabSampler::from_words(raw.lines().map(str::trim).filter(|w| !w.is_empty()));
    (!sampler.is_empty()).then(|| sampler.sample(sampler.len()))
}
