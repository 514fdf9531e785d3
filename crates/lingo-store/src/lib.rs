//! # lingo-store
//!
//! On-disk cache of generated study material. Each successful online run adds
//! one `example-<N>.jsonl` batch; offline runs replay all of them shuffled.

pub mod store;
pub mod vocab;

pub use store::{Batch, ExampleStore, PendingBatch, batch_file_name, parse_batch_index};
pub use vocab::{DEFAULT_SAMPLE_SIZE, VocabSampler};
