//! Chess Tutor Core Library
//!
//! Explains *why* a recommended move was better than the one a player
//! chose, by naming the concrete tactics it contained.

pub mod config;
pub mod engine;
pub mod error;
pub mod lichess;
pub mod notation;
pub mod parser;
pub mod puzzles;
pub mod review;
pub mod tactics;

pub use config::TutorConfig;
pub use error::{Error, Result};
pub use lichess::LichessClient;
pub use review::{GameReviewer, MoveReview, Severity};
pub use tactics::{
    detect_missed_tactics, explain_move, DetectedTactic, DetectorOptions, MissedMove, TacticDetector, TacticKind,
};
