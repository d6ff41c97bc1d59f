//! Missed-tactic detection
//!
//! Explains, in concrete tactical terms, why an engine's recommended move
//! beats the move actually played. One ply only: the classifiers look at the
//! single position the recommended move produces.

pub mod alignment;
pub mod attacks;
pub mod fork;
pub mod hanging;
pub mod material;
pub mod ray;

mod detector;
mod types;

pub use detector::{
    detect_missed_tactics, explain_move, DetectorOptions, MissedMove, TacticDetector,
    DEFAULT_LOSS_THRESHOLD,
};
pub use types::*;
