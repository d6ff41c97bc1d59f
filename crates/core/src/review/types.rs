//! Review result types

use serde::{Deserialize, Serialize};

use crate::tactics::DetectedTactic;

/// Severity of a mistake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// >= 300 centipawn loss
    Blunder,
    /// >= 100 centipawn loss
    Mistake,
    /// >= 50 centipawn loss
    Inaccuracy,
}

impl Severity {
    pub fn from_cp_loss(cp_loss: i32) -> Option<Self> {
        match cp_loss {
            l if l >= 300 => Some(Severity::Blunder),
            l if l >= 100 => Some(Severity::Mistake),
            l if l >= 50 => Some(Severity::Inaccuracy),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Blunder => "blunder",
            Severity::Mistake => "mistake",
            Severity::Inaccuracy => "inaccuracy",
        }
    }
}

/// Engine verdict on one move, plus the tactics the better move had
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveReview {
    pub ply: u16,
    /// Fullmove number of the position the move was played from
    pub move_number: u32,
    /// SAN of the move played
    pub played: String,
    /// UCI of the engine's preferred move; empty if the engine had none
    pub best_move: String,
    pub cp_loss: i32,
    pub severity: Option<Severity>,
    pub fen_before: String,
    pub tactics: Vec<DetectedTactic>,
}

impl MoveReview {
    pub fn is_best(&self) -> bool {
        self.cp_loss == 0
    }

    pub fn description(&self) -> String {
        match self.severity {
            Some(severity) => format!(
                "Move {}: {} played {} instead of {} (-{} cp)",
                self.move_number,
                severity.as_str(),
                self.played,
                self.best_move,
                self.cp_loss
            ),
            None => format!("Move {}: {} (-{} cp)", self.move_number, self.played, self.cp_loss),
        }
    }
}
