use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use lingo_core::{LingoError, Mode, Result};
use lingo_store::{Batch, ExampleStore, VocabSampler};

use crate::generator::{GenerationRequest, Generator};
use crate::player::Player;

/// One practice invocation, as given on the command line.
#[derive(Debug, Clone)]
pub struct PracticeRequest {
    pub mode: Mode,
    pub language: String,
    pub examples_dir: PathBuf,
    pub vocab_file: Option<PathBuf>,
    /// Passed through to the player untouched.
    pub playback_args: Vec<String>,
}

impl PracticeRequest {
    /// Validate the arguments and open (creating if needed) the examples
    /// directory. Runs before any collaborator is built, so the directory
    /// exists even when online setup fails afterwards.
    pub fn open_store(&self) -> Result<ExampleStore> {
        if self.language.trim().is_empty() {
            return Err(LingoError::Usage("language must not be empty".into()));
        }
        ExampleStore::open(&self.examples_dir)
    }
}

/// The record stream handed to the player.
enum Stream {
    /// Online: the batch that was just stored.
    Batch(Batch),
    /// Offline: shuffled records of every batch, in a scratch file.
    Shuffled(NamedTempFile),
}

impl Stream {
    fn path(&self) -> &Path {
        match self {
            Stream::Batch(batch) => &batch.path,
            Stream::Shuffled(temp) => temp.path(),
        }
    }
}

/// Mode selection, storage and playback, run strictly one after another.
pub struct Pipeline {
    generator: Option<Arc<dyn Generator>>,
    player: Arc<dyn Player>,
    count: usize,
    vocab_sample_size: usize,
}

impl Pipeline {
    pub fn new(player: Arc<dyn Player>) -> Self {
        Self {
            generator: None,
            player,
            count: 10,
            vocab_sample_size: lingo_store::DEFAULT_SAMPLE_SIZE,
        }
    }

    /// Generator used in online mode. Offline runs never need one.
    pub fn with_generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Examples requested per online run.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn with_vocab_sample_size(mut self, size: usize) -> Self {
        self.vocab_sample_size = size;
        self
    }

    /// Run a practice session and return the player's exit status.
    ///
    /// A failed generation returns the error without starting the player and
    /// without adding a batch.
    pub async fn run(&self, request: &PracticeRequest) -> Result<i32> {
        let store = request.open_store()?;
        debug!(mode = %request.mode, language = %request.language, dir = ?store.dir(), "arguments validated");

        let stream = match request.mode {
            Mode::Online => Stream::Batch(
                self.generate_batch(&store, &request.language, request.vocab_file.as_deref())
                    .await?,
            ),
            Mode::Offline => Stream::Shuffled(self.shuffled_stream(&store)?),
        };

        info!(player = %self.player.name(), stream = ?stream.path(), "starting playback");
        let status = self.player.play(stream.path(), &request.playback_args).await?;
        debug!(status, "playback finished");
        Ok(status)
    }

    /// Generate and atomically store one new batch.
    pub async fn generate_batch(
        &self,
        store: &ExampleStore,
        language: &str,
        vocab_file: Option<&Path>,
    ) -> Result<Batch> {
        let generator = self.generator.as_ref().ok_or_else(|| {
            LingoError::Config("online mode needs a generator, none is configured".into())
        })?;

        let vocabulary = match vocab_file {
            Some(path) => {
                let sample = VocabSampler::from_file(path)?.sample(self.vocab_sample_size);
                debug!(words = sample.len(), "sampled vocabulary");
                (!sample.is_empty()).then_some(sample)
            }
            None => None,
        };
        let request = GenerationRequest {
            language: language.to_string(),
            count: self.count,
            vocabulary,
        };

        let mut pending = store.begin_batch()?;
        info!(
            index = pending.index(),
            generator = %generator.name(),
            count = request.count,
            "generating batch"
        );
        // On error `pending` is dropped here and its temp file removed.
        generator.generate(&request, pending.file()).await?;
        store.commit(pending)
    }

    fn shuffled_stream(&self, store: &ExampleStore) -> Result<NamedTempFile> {
        let records = store.shuffled_records()?;
        let mut temp = NamedTempFile::new()?;
        for record in &records {
            writeln!(temp, "{record}")?;
        }
        temp.flush()?;
        debug!(records = records.len(), "prepared offline stream");
        Ok(temp)
    }
}
