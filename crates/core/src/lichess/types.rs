//! Lichess API data types

use serde::{Deserialize, Serialize};
use shakmaty::Color;

use crate::engine::{Evaluation, PositionAnalysis};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudEval {
    pub fen: String,
    pub knodes: u64,
    pub depth: u8,
    pub pvs: Vec<PvLine>,
}

/// One principal variation. Scores are from white's point of view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PvLine {
    pub moves: String,
    #[serde(default)]
    pub cp: Option<i32>,
    #[serde(default)]
    pub mate: Option<i32>,
}

impl PvLine {
    fn white_evaluation(&self) -> Option<Evaluation> {
        match (self.mate, self.cp) {
            (Some(m), _) => Some(Evaluation::Mate(m)),
            (None, Some(cp)) => Some(Evaluation::Centipawns(cp)),
            (None, None) => None,
        }
    }
}

impl CloudEval {
    /// Converts the top line into the shape the local engine produces,
    /// re-scored for `side_to_move`.
    pub fn into_analysis(self, side_to_move: Color) -> Result<PositionAnalysis> {
        let top = self
            .pvs
            .into_iter()
            .next()
            .ok_or_else(|| Error::Lichess("cloud eval has no lines".into()))?;

        let white = top
            .white_evaluation()
            .ok_or_else(|| Error::Lichess("cloud eval line has no score".into()))?;
        let evaluation = match side_to_move {
            Color::White => white,
            Color::Black => white.flipped(),
        };

        let pv: Vec<String> = top.moves.split_whitespace().map(String::from).collect();

        Ok(PositionAnalysis {
            best_move: pv.first().cloned().unwrap_or_default(),
            evaluation,
            depth: self.depth,
            pv,
            time_ms: 0,
            nodes: self.knodes * 1000,
        })
    }
}
