use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

use lingo_config::LingoConfig;
use lingo_core::{Mode, Result};
use lingo_runtime::{PracticeRequest, build_pipeline};

use super::CommonArgs;

/// Listening practice from freshly generated or cached example sentences
#[derive(Parser, Debug)]
#[command(name = "lang-listening-generate", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// Examples to generate in online mode (overrides generator.count)
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u64).range(1..))]
    count: Option<u64>,

    /// online (generate and store a new batch) or offline (replay the cache)
    #[arg(value_parser = Mode::from_str)]
    mode: Mode,

    /// Target language, passed to the generator
    language: String,

    /// Directory holding example-<N>.jsonl batches (created if missing)
    examples_dir: PathBuf,

    /// Known words, one per line; a sample steers generation
    vocab_file: Option<PathBuf>,

    /// Arguments passed through to the player
    #[arg(last = true)]
    playback_args: Vec<String>,
}

impl Cli {
    pub async fn run(self) -> Result<i32> {
        let config = self.common.init()?;
        self.execute(config).await
    }

    async fn execute(self, mut config: LingoConfig) -> Result<i32> {
        if let Some(count) = self.count {
            config.generator.count = count as usize;
        }

        let request = self.request();
        debug!(?request, "practice request");
        // Directory first: it is created even if online setup fails below.
        request.open_store()?;

        let pipeline = build_pipeline(&config, request.mode == Mode::Online)?;
        pipeline.run(&request).await
    }

    fn request(&self) -> PracticeRequest {
        PracticeRequest {
            mode: self.mode,
            language: self.language.clone(),
            examples_dir: self.examples_dir.clone(),
            vocab_file: self.vocab_file.clone(),
            playback_args: self.playback_args.clone(),
        }
    }
}
