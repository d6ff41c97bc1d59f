//! Position-evaluation engines
//!
//! Provides the interface to UCI-compatible engines like Stockfish.

pub mod analysis;
pub mod stockfish;

pub use analysis::{Evaluation, PositionAnalysis, MATE_SCORE};
pub use stockfish::{EngineError, StockfishEngine};

/// Anything that can suggest a best move and score for a position.
pub trait PositionEvaluator {
    /// Analyzes `fen` to `depth` plies. Scores are from the side to move's
    /// point of view.
    fn evaluate(&mut self, fen: &str, depth: u8) -> Result<PositionAnalysis, EngineError>;
}

impl<E: PositionEvaluator + ?Sized> PositionEvaluator for &mut E {
    fn evaluate(&mut self, fen: &str, depth: u8) -> Result<PositionAnalysis, EngineError> {
        (**self).evaluate(fen, depth)
    }
}
