//! Engine evaluation results

use std::fmt;

use serde::{Deserialize, Serialize};

/// Centipawn stand-in for a forced mate.
pub const MATE_SCORE: i32 = 10_000;

/// Position evaluation, always from the side to move's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Evaluation {
    /// Centipawn score (positive = side to move is better)
    Centipawns(i32),
    /// Forced mate in N moves (positive = side to move mates)
    Mate(i32),
}

impl Evaluation {
    /// Score in centipawns, with forced mates pinned to +/-MATE_SCORE.
    pub fn to_centipawns(&self) -> i32 {
        match *self {
            Evaluation::Centipawns(cp) => cp,
            Evaluation::Mate(moves) if moves > 0 => MATE_SCORE,
            Evaluation::Mate(_) => -MATE_SCORE,
        }
    }

    pub fn mate_distance(&self) -> Option<i32> {
        match *self {
            Evaluation::Mate(moves) => Some(moves),
            Evaluation::Centipawns(_) => None,
        }
    }

    /// Same evaluation seen from the other side.
    pub fn flipped(&self) -> Self {
        match *self {
            Evaluation::Centipawns(cp) => Evaluation::Centipawns(-cp),
            Evaluation::Mate(moves) => Evaluation::Mate(-moves),
        }
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evaluation::Centipawns(cp) => write!(f, "{:+.2}", *cp as f32 / 100.0),
            Evaluation::Mate(moves) => write!(f, "M{}", moves),
        }
    }
}

/// What an evaluation engine reports for one position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionAnalysis {
    /// Best move in UCI notation; empty when the side to move has no moves
    pub best_move: String,
    pub evaluation: Evaluation,
    /// Analysis depth reached
    pub depth: u8,
    /// Principal variation (UCI)
    pub pv: Vec<String>,
    /// Time spent analyzing (milliseconds)
    pub time_ms: u64,
    /// Nodes searched
    pub nodes: u64,
}

impl PositionAnalysis {
    pub fn summary(&self) -> String {
        format!(
            "Eval: {} | Best: {} | Depth: {} | PV: {}",
            self.evaluation,
            self.best_move,
            self.depth,
            self.pv.iter().take(5).cloned().collect::<Vec<_>>().join(" ")
        )
    }
}
