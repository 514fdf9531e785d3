//! # lingo-cli
//!
//! Command-line interfaces for the lingo listening trainer.
//!
//! ## Binaries
//!
//! - `lang-listening-generate <online|offline> <language> <examples_dir> [vocab_file] [-- args...]`
//!   practices from a fresh batch or from the cache
//! - `lang-example-generate` writes example records to stdout (usable as an external generator)
//! - `lang-listening-ui` is the built-in terminal player reading records from fd 3

pub mod commands;

pub use commands::{Cli, GenerateCli, ListenCli, parse_args, report_error};
