use rand::seq::SliceRandom;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use lingo_core::{LingoError, Result};

const BATCH_PREFIX: &str = "example-";
const BATCH_SUFFIX: &str = ".jsonl";

/// A directory of numbered JSON Lines batch files (`example-<N>.jsonl`).
///
/// Batches are written once through [`ExampleStore::begin_batch`] and
/// [`ExampleStore::commit`] and never touched again.
#[derive(Debug, Clone)]
pub struct ExampleStore {
    dir: PathBuf,
}

/// A committed batch file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub index: u64,
    pub path: PathBuf,
}

/// A batch being written. Its content lives in a temp file inside the store
/// directory until [`ExampleStore::commit`] renames it; dropping it deletes
/// the temp file.
#[derive(Debug)]
pub struct PendingBatch {
    index: u64,
    temp: NamedTempFile,
}

impl PendingBatch {
    /// Index the batch will be committed under.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Writable handle to the temp file.
    pub fn file(&mut self) -> &mut File {
        self.temp.as_file_mut()
    }

    pub fn temp_path(&self) -> &Path {
        self.temp.path()
    }
}

/// Parse the batch index out of a file name, `None` if it isn't a batch file.
pub fn parse_batch_index(file_name: &str) -> Option<u64> {
    let digits = file_name
        .strip_prefix(BATCH_PREFIX)?
        .strip_suffix(BATCH_SUFFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u64>().ok().filter(|&n| n > 0)
}

pub fn batch_file_name(index: u64) -> String {
    format!("{BATCH_PREFIX}{index}{BATCH_SUFFIX}")
}

impl ExampleStore {
    /// Open the store at `dir`, creating the directory and its parents if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            LingoError::Store(format!("cannot create {}: {}", dir.display(), e))
        })?;
        debug!(?dir, "opened example store");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn batch_path(&self, index: u64) -> PathBuf {
        self.dir.join(batch_file_name(index))
    }

    /// All batch files, ordered by index.
    pub fn batches(&self) -> Result<Vec<Batch>> {
        let mut batches = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(index) = name.to_str().and_then(parse_batch_index) else {
                continue;
            };
            batches.push(Batch {
                index,
                path: entry.path(),
            });
        }
        batches.sort_by_key(|b| b.index);
        Ok(batches)
    }

    /// Index for the next batch: number of existing batches plus one.
    ///
    /// If manual deletions left that name taken, the next free index above it
    /// is used so an existing batch is never overwritten.
    pub fn next_index(&self) -> Result<u64> {
        let batches = self.batches()?;
        let mut index = batches.len() as u64 + 1;
        while batches.iter().any(|b| b.index == index) {
            index += 1;
        }
        Ok(index)
    }

    /// Reserve the next index and open a temp file for its content.
    pub fn begin_batch(&self) -> Result<PendingBatch> {
        let index = self.next_index()?;
        let temp = tempfile::Builder::new()
            .prefix(&format!(".{BATCH_PREFIX}{index}-"))
            .suffix(".tmp")
            .tempfile_in(&self.dir)
            .map_err(|e| {
                LingoError::Store(format!(
                    "cannot create temp file in {}: {}",
                    self.dir.display(),
                    e
                ))
            })?;
        debug!(index, temp = ?temp.path(), "started batch");
        Ok(PendingBatch { index, temp })
    }

    /// Flush the pending batch to disk and rename it to its final name.
    pub fn commit(&self, mut pending: PendingBatch) -> Result<Batch> {
        let path = self.batch_path(pending.index);
        let file = pending.temp.as_file_mut();
        file.flush()?;
        file.sync_all()?;

        pending.temp.persist_noclobber(&path).map_err(|e| {
            LingoError::Store(format!("cannot commit {}: {}", path.display(), e.error))
        })?;
        info!(index = pending.index, ?path, "stored new batch");

        Ok(Batch {
            index: pending.index,
            path,
        })
    }

    /// Every record of every batch, in batch order. Blank lines are skipped.
    pub fn records(&self) -> Result<Vec<String>> {
        let mut records = Vec::new();
        for batch in self.batches()? {
            let content = std::fs::read_to_string(&batch.path)?;
            records.extend(
                content
                    .lines()
                    .filter(|line| !line.trim().is_empty())
                    .map(String::from),
            );
        }
        Ok(records)
    }

    /// Every record of every batch in uniformly random order.
    pub fn shuffled_records(&self) -> Result<Vec<String>> {
        let mut records = self.records()?;
        if records.is_empty() {
            warn!(dir = ?self.dir, "no stored examples, playback stream is empty");
        }
        records.shuffle(&mut rand::rng());
        Ok(records)
    }
}
