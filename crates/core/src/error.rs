//! Error types for chess-tutor-core

use thiserror::Error;

use crate::engine::EngineError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Notation error: {0}")]
    Notation(String),

    #[error("Position has {actual} to move, expected {expected}")]
    ColorMismatch { expected: String, actual: String },

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Lichess API error: {0}")]
    Lichess(String),

    #[error("PGN parsing error: {0}")]
    Pgn(String),

    #[error("Puzzle data error: {0}")]
    Puzzle(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
