use std::io;
use std::path::PathBuf;

use toml::de::Error as TomlError;

use crate::types::Pos;

#[derive(Debug, thiserror::Error)]
pub enum MapGenError {
    #[error("level {level} is outside the supported range 1..={max_level}")]
    InvalidLevel { level: u32, max_level: u32 },

    #[error("invalid generation rules: {reason}")]
    InvalidRules { reason: String },

    #[error("failed to read generation rules from {}: {source}", .path.display())]
    RulesIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse generation rules: {0}")]
    RulesParse(#[from] TomlError),

    /// A generated map broke one of its own structural invariants. This is a
    /// bug in the generator, never a property of the input.
    #[error("generated map is inconsistent at ({}, {}): {reason}", .pos.x, .pos.y)]
    InternalInconsistency { pos: Pos, reason: String },
}
