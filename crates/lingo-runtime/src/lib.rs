//! # lingo-runtime
//!
//! Runs a practice session: picks online or offline mode, drives the example
//! generator and the example store, then hands the record stream to a player.
//!
//! Generators and players are traits so alternative backends (another model,
//! another UI) plug in without touching the store logic.

pub mod builder;
pub mod generator;
pub mod pipeline;
pub mod player;
pub mod terminal;

pub use builder::{build_generator, build_llm_generator, build_pipeline, build_player};
pub use generator::{CommandGenerator, GenerationRequest, Generator, LlmGenerator};
pub use pipeline::{Pipeline, PracticeRequest};
pub use player::{CommandPlayer, EXAMPLES_FD, EXAMPLES_FILE_ENV, Player};
pub use terminal::TerminalPlayer;
