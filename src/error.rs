//! Crate error type
//!
//! Gameplay never fails; these cover configuration, level data and renderer setup.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArcadeError {
    #[error("unknown game `{0}` (try --list)")]
    UnknownGame(String),

    #[error("level {level}: unexpected `{ch}` at row {row}, column {col}")]
    LevelChar {
        level: String,
        row: usize,
        col: usize,
        ch: char,
    },

    #[error("level {level}: {reason}")]
    LevelShape { level: String, reason: &'static str },

    #[error("settings: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),

    #[error("bad argument: {0}")]
    Argument(String),

    #[error("renderer: {0}")]
    Renderer(String),
}

pub type Result<T, E = ArcadeError> = std::result::Result<T, E>;
