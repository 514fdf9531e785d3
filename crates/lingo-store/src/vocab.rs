use rand::seq::SliceRandom;
use std::path::{Path, PathBuf};
use tracing::debug;

use lingo_core::{LingoError, Result};

/// Words handed to the generator per call.
pub const DEFAULT_SAMPLE_SIZE: usize = 20;

/// Draws random subsets of a user's vocabulary file, one word per line.
///
/// No sampling state is kept; every call is an independent draw.
#[derive(Debug, Clone)]
pub struct VocabSampler {
    path: Option<PathBuf>,
    words: Vec<String>,
}

impl VocabSampler {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| LingoError::Vocabulary {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let words: Vec<String> = raw
            .lines()
            .map(str::trim)
            .filter(|w| !w.is_empty())
            .map(String::from)
            .collect();
        debug!(?path, words = words.len(), "loaded vocabulary");
        Ok(Self {
            path: Some(path.to_path_buf()),
            words,
        })
    }

    pub fn from_words(words: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            path: None,
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// `min(k, len)` distinct entries, chosen uniformly and in random order.
    pub fn sample(&self, k: usize) -> Vec<String> {
        let mut words = self.words.clone();
        words.shuffle(&mut rand::rng());
        words.truncate(k);
        words
    }
}
