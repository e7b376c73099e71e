//! Conversation script store
//!
//! The script is a JSON array of `{ "speaker": ..., "text": ... }` records,
//! loaded once at startup and read-only afterwards.

use crate::config::normalize_name;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("script is not a valid list of turns: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("script has no turns")]
    Empty,
    #[error("turn {index} has an empty {field}")]
    BlankField { index: usize, field: &'static str },
}

/// One scripted line and who is expected to say it
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConversationTurn {
    pub speaker: String,
    pub text: String,
}

/// The ordered script; never empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    turns: Vec<ConversationTurn>,
}

impl Conversation {
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ScriptError> {
        let turns: Vec<ConversationTurn> = serde_json::from_str(raw)?;
        Self::new(turns)
    }

    pub fn new(turns: Vec<ConversationTurn>) -> Result<Self, ScriptError> {
        if turns.is_empty() {
            return Err(ScriptError::Empty);
        }

        let mut normalized = Vec::with_capacity(turns.len());
        for (index, turn) in turns.into_iter().enumerate() {
            if turn.speaker.trim().is_empty() {
                return Err(ScriptError::BlankField {
                    index,
                    field: "speaker",
                });
            }
            if turn.text.trim().is_empty() {
                return Err(ScriptError::BlankField {
                    index,
                    field: "text",
                });
            }
            normalized.push(ConversationTurn {
                speaker: normalize_name(&turn.speaker),
                text: turn.text,
            });
        }

        Ok(Self { turns: normalized })
    }

    #[allow(clippy::len_without_is_empty)] // never empty by construction
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Whether `identity` speaks the opening line
    pub fn opened_by(&self, identity: &str) -> bool {
        self.turns[0].speaker == identity
    }

    /// Problems that don't stop the conversation but will make it sound wrong
    pub fn lint(&self, me: &str, peer: &str) -> Vec<String> {
        let mut warnings = Vec::new();

        for (index, turn) in self.turns.iter().enumerate() {
            if turn.speaker != me && turn.speaker != peer {
                warnings.push(format!(
                    "turn {index} is assigned to {:?}, which is neither {me:?} nor {peer:?}",
                    turn.speaker
                ));
            }
        }

        for (index, pair) in self.turns.windows(2).enumerate() {
            if pair[0].speaker == pair[1].speaker {
                warnings.push(format!(
                    "turns {index} and {} are both assigned to {:?}; lines are spoken by position",
                    index + 1,
                    pair[0].speaker
                ));
            }
        }

        warnings
    }
}
