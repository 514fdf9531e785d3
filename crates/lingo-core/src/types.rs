use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LingoError;

/// Whether a practice session synthesises new material or replays the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Generate a fresh batch, store it, then play it.
    Online,
    /// Shuffle every stored batch and play the result.
    Offline,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Online => "online",
            Mode::Offline => "offline",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = LingoError;

    /// Exact, case-sensitive match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(Mode::Online),
            "offline" => Ok(Mode::Offline),
            other => Err(LingoError::Usage(format!(
                "unrecognized mode '{other}', expected 'online' or 'offline'"
            ))),
        }
    }
}

/// One study example: a target-language sentence and its translation.
///
/// The store never looks inside records; this shape is what the built-in
/// generator writes and the built-in player reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleRecord {
    /// Hex MD5 of the foreign sentence. Older or foreign-made records may omit it.
    #[serde(default)]
    pub id: Option<String>,
    /// Sentence in the language being studied.
    pub foreign: String,
    /// Translation into the learner's language.
    pub native: String,
    /// Vocabulary the generator was asked to prefer.
    #[serde(default)]
    pub words: Vec<String>,
}

impl ExampleRecord {
    pub fn new(foreign: impl Into<String>, native: impl Into<String>, words: Vec<String>) -> Self {
        let foreign = foreign.into();
        let id = format!("{:x}", md5::compute(foreign.as_bytes()));
        Self {
            id: Some(id),
            foreign,
            native: native.into(),
            words,
        }
    }

    /// Parse a single JSON Lines record.
    pub fn from_line(line: &str) -> crate::Result<Self> {
        serde_json::from_str(line)
            .map_err(|e| LingoError::MalformedExample(format!("{e}: {line}")))
    }

    /// Serialize to a single line (no trailing newline).
    pub fn to_line(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Id to show to the user; falls back to the 1-based position in the stream.
    pub fn display_id(&self, position: usize) -> String {
        self.id.clone().unwrap_or_else(|| position.to_string())
    }
}
