//! # lingo-core
//!
//! Core types and primitives for the lingo listening trainer.
//! This crate defines the shared vocabulary used by every other crate in the workspace.

pub mod error;
pub mod types;

pub use error::{LingoError, Result};
pub use types::*;
