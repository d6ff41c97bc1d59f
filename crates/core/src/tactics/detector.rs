//! Missed-tactic detection: why was the engine's move better than the one played?

use serde::{Deserialize, Serialize};
use shakmaty::{Chess, Color, Move, Position};
use tracing::debug;

use super::alignment::detect_alignments;
use super::fork::detect_fork;
use super::hanging::detect_hanging;
use super::material::{detect_capture, detect_check};
use super::types::DetectedTactic;
use crate::error::{Error, Result};
use crate::notation::{color_name, destination, parse_fen, resolve_uci, same_move, san_plus};

/// Centipawn loss below which a miss is not worth explaining.
pub const DEFAULT_LOSS_THRESHOLD: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectorOptions {
    pub loss_threshold: i32,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            loss_threshold: DEFAULT_LOSS_THRESHOLD,
        }
    }
}

/// One "you played X, the engine preferred Y" situation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissedMove<'a> {
    /// Position before the move, as FEN
    pub fen: &'a str,
    pub mover: Color,
    /// SAN of the move actually played
    pub played: &'a str,
    /// UCI of the engine's recommended move
    pub recommended: &'a str,
    pub cp_loss: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct TacticDetector {
    options: DetectorOptions,
}

impl TacticDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DetectorOptions) -> Self {
        Self { options }
    }

    pub fn with_threshold(loss_threshold: i32) -> Self {
        Self::with_options(DetectorOptions { loss_threshold })
    }

    pub fn options(&self) -> DetectorOptions {
        self.options
    }

    /// Tactics the recommended move would have created.
    ///
    /// Never fails: a malformed position, an unknown or illegal move, or a
    /// miss too small to matter all give an empty list.
    pub fn detect(&self, missed: &MissedMove<'_>) -> Vec<DetectedTactic> {
        if let Some(loss) = missed.cp_loss {
            if loss < self.options.loss_threshold {
                return Vec::new();
            }
        }

        match self.try_detect(missed) {
            Ok(tactics) => tactics,
            Err(e) => {
                debug!(fen = missed.fen, recommended = missed.recommended, error = %e, "tactic detection skipped");
                Vec::new()
            }
        }
    }

    fn try_detect(&self, missed: &MissedMove<'_>) -> Result<Vec<DetectedTactic>> {
        let position = parse_fen(missed.fen)?;
        if position.turn() != missed.mover {
            return Err(Error::ColorMismatch {
                expected: color_name(missed.mover).to_string(),
                actual: color_name(position.turn()).to_string(),
            });
        }

        let recommended = resolve_uci(&position, missed.recommended)?;
        if same_move(&position, missed.played, &recommended) {
            debug!(played = missed.played, "played move matches the recommendation");
            return Ok(Vec::new());
        }

        explain_move(&position, &recommended)
    }
}

/// Runs every classifier on the position reached by `mv`, in fixed order:
/// capture, check, pin/skewer, fork, hanging pieces.
///
/// `position` is left untouched; the move is applied to a clone.
pub fn explain_move(position: &Chess, mv: &Move) -> Result<Vec<DetectedTactic>> {
    let san = san_plus(position, mv);
    let mover = position.turn();
    let after = position
        .clone()
        .play(mv.clone())
        .map_err(|e| Error::IllegalMove(format!("{}: {}", san, e)))?;
    let board = after.board();

    let mut tactics = Vec::new();
    tactics.extend(detect_capture(&after, mv, &san));
    tactics.extend(detect_check(&after, mv, &san));
    tactics.extend(detect_alignments(board, mover, &san));
    tactics.extend(detect_fork(board, destination(mv), &san));
    tactics.extend(detect_hanging(board, mover, &san));

    debug!(mv = %san, found = tactics.len(), "classified recommended move");
    Ok(tactics)
}

/// [`TacticDetector::detect`] with the default 50cp threshold.
pub fn detect_missed_tactics(missed: &MissedMove<'_>) -> Vec<DetectedTactic> {
    TacticDetector::new().detect(missed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::to_fen;
    use crate::tactics::TacticKind;
    use shakmaty::Square;

    fn missed<'a>(fen: &'a str, played: &'a str, recommended: &'a str, cp_loss: Option<i32>) -> MissedMove<'a> {
        let mover = parse_fen(fen).map(|p| p.turn()).unwrap_or(Color::White);
        MissedMove { fen, mover, played, recommended, cp_loss }
    }

    fn kinds(tactics: &[DetectedTactic]) -> Vec<TacticKind> {
        tactics.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_small_loss_is_ignored() {
        let m = missed("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1", "Kf2", "d1d5", Some(49));
        assert!(detect_missed_tactics(&m).is_empty());
    }

    #[test]
    fn test_threshold_is_configurable() {
        let m = missed("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1", "Kf2", "d1d5", Some(120));
        assert!(TacticDetector::with_threshold(200).detect(&m).is_empty());
        assert!(!TacticDetector::with_threshold(100).detect(&m).is_empty());
    }

    #[test]
    fn test_same_move_is_not_a_miss() {
        let m = missed("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1", "Rxd5", "d1d5", Some(900));
        assert!(detect_missed_tactics(&m).is_empty());
    }

    #[test]
    fn test_clean_queen_capture() {
        let m = missed("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1", "Kf2", "d1d5", Some(900));
        let tactics = detect_missed_tactics(&m);
        let win = tactics.iter().find(|t| t.kind == TacticKind::WinPiece).unwrap();
        assert_eq!(win.material_delta, Some(900));
        assert_eq!(win.mv, "Rxd5");
    }

    #[test]
    fn test_check_is_reported() {
        let m = missed("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", "Kd2", "a1a8", Some(300));
        let tactics = detect_missed_tactics(&m);
        assert!(kinds(&tactics).contains(&TacticKind::Check));
        assert!(tactics.iter().all(|t| t.mv == "Ra8+"));
    }

    #[test]
    fn test_knight_fork() {
        // Nd5 hits the rook on b6 and the bishop on e7, neither defended
        let m = missed("7k/4b3/1r6/8/8/2N5/8/7K w - - 0 1", "Kg2", "c3d5", Some(250));
        let tactics = detect_missed_tactics(&m);
        let fork = tactics.iter().find(|t| t.kind == TacticKind::Fork).unwrap();
        assert_eq!(fork.affected_squares, vec![Square::B6, Square::E7]);
        assert_eq!(fork.piece_roles, vec!["black rook", "black bishop"]);
    }

    #[test]
    fn test_rook_pin_on_file() {
        let m = missed("4k3/8/4n3/8/8/8/8/K2R4 w - - 0 1", "Kb2", "d1e1", Some(150));
        let tactics = detect_missed_tactics(&m);
        let pin = tactics.iter().find(|t| t.kind == TacticKind::Pin).unwrap();
        assert_eq!(pin.affected_squares, vec![Square::E6, Square::E8]);
    }

    #[test]
    fn test_rook_skewer_on_rank() {
        let m = missed("7k/8/8/8/3q2r1/8/8/R6K w - - 0 1", "Kg2", "a1a4", Some(400));
        let tactics = detect_missed_tactics(&m);
        let skewer = tactics.iter().find(|t| t.kind == TacticKind::Skewer).unwrap();
        assert_eq!(skewer.affected_squares, vec![Square::D4, Square::G4]);
    }

    #[test]
    fn test_en_passant_capture() {
        let pos = parse_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        let mv = resolve_uci(&pos, "e5d6").unwrap();
        let tactics = explain_move(&pos, &mv).unwrap();
        assert_eq!(kinds(&tactics), vec![TacticKind::WinPawn]);
        assert_eq!(tactics[0].affected_squares[1], Square::D6);
        assert_eq!(tactics[0].material_delta, Some(100));
        assert_eq!(tactics[0].mv, "exd6");
    }

    #[test]
    fn test_castling_recommendation_uses_king_square() {
        // written king-takes-rook; the rook lands on f1 and checks f8
        let m = missed("5k2/8/8/8/8/8/8/4K2R w K - 0 1", "Kd2", "e1h1", Some(120));
        let tactics = detect_missed_tactics(&m);
        assert_eq!(kinds(&tactics), vec![TacticKind::Check]);
        assert_eq!(tactics[0].affected_squares, vec![Square::G1]);
        assert_eq!(tactics[0].mv, "O-O+");
    }

    #[test]
    fn test_quiet_move_finds_nothing() {
        let m = missed("4k3/pppp4/8/8/8/8/PPPP4/4K3 w - - 0 1", "Kf1", "e1e2", Some(80));
        assert!(detect_missed_tactics(&m).is_empty());
    }

    #[test]
    fn test_detection_is_deterministic() {
        let m = missed("7k/8/1r3b2/8/8/2N5/8/7K w - - 0 1", "Kg2", "c3d5", Some(250));
        assert_eq!(detect_missed_tactics(&m), detect_missed_tactics(&m));
    }

    #[test]
    fn test_bad_input_degrades_to_empty() {
        let bad_fen = MissedMove {
            fen: "not a position",
            mover: Color::White,
            played: "e4",
            recommended: "d2d4",
            cp_loss: Some(100),
        };
        assert!(detect_missed_tactics(&bad_fen).is_empty());

        let start = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        assert!(detect_missed_tactics(&missed(start, "e4", "e2e5", Some(100))).is_empty());
        assert!(detect_missed_tactics(&missed(start, "e4", "zz", Some(100))).is_empty());

        let wrong_side = MissedMove { mover: Color::Black, ..missed(start, "e4", "d2d4", Some(100)) };
        assert!(detect_missed_tactics(&wrong_side).is_empty());
    }

    #[test]
    fn test_explain_move_leaves_position_untouched() {
        let pos = parse_fen("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1").unwrap();
        let mv = resolve_uci(&pos, "d1d5").unwrap();
        let before = to_fen(&pos);
        let tactics = explain_move(&pos, &mv).unwrap();
        assert_eq!(to_fen(&pos), before);
        assert_eq!(kinds(&tactics), vec![TacticKind::WinPiece]);
    }
}
