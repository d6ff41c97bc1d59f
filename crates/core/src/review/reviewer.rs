//! Move and game review engine

use shakmaty::{san::San, Chess, Color, Move, Position};
use tracing::{info, warn};

use super::types::*;
use crate::engine::{PositionEvaluator, MATE_SCORE};
use crate::error::{Error, Result};
use crate::notation::{move_to_uci, parse_fen, strip_annotations, to_fen};
use crate::tactics::{MissedMove, TacticDetector};

pub struct GameReviewer<E> {
    evaluator: E,
    depth: u8,
    detector: TacticDetector,
}

impl<E: PositionEvaluator> GameReviewer<E> {
    pub fn new(evaluator: E, depth: u8) -> Self {
        Self {
            evaluator,
            depth,
            detector: TacticDetector::new(),
        }
    }

    pub fn with_detector(mut self, detector: TacticDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn into_evaluator(self) -> E {
        self.evaluator
    }

    /// Review a single move (SAN) played from `position`.
    pub fn review_move(&mut self, position: &Chess, played: &str) -> Result<MoveReview> {
        let mv = parse_san(position, played)?;
        self.review_at(position, &mv, played, 0)
    }

    /// Review every move `player` made in a game.
    ///
    /// moves: list of moves in SAN format (e.g., "e4", "Nf3")
    /// start: starting FEN, or None for the standard position
    pub fn review_game(&mut self, start: Option<&str>, moves: &[String], player: Color) -> Result<Vec<MoveReview>> {
        let mut position = match start {
            Some(fen) => parse_fen(fen)?,
            None => Chess::default(),
        };
        let mut reviews = Vec::new();

        for (ply, move_str) in moves.iter().enumerate() {
            let mv = match parse_san(&position, move_str) {
                Ok(m) => m,
                Err(e) => {
                    warn!(ply, error = %e, "stopping review at unreadable move");
                    break;
                }
            };

            if position.turn() == player {
                let review = self.review_at(&position, &mv, move_str, ply)?;
                info!(ply, played = %move_str, cp_loss = review.cp_loss, tactics = review.tactics.len(), "reviewed move");
                reviews.push(review);
            }

            position = match position.play(mv) {
                Ok(p) => p,
                Err(_) => break,
            };
        }

        Ok(reviews)
    }

    fn review_at(&mut self, position: &Chess, played: &Move, played_san: &str, ply: usize) -> Result<MoveReview> {
        let fen_before = to_fen(position);
        let best = self.evaluator.evaluate(&fen_before, self.depth)?;

        let cp_loss = if best.best_move.is_empty() || best.best_move == move_to_uci(played) {
            0
        } else {
            let after = position
                .clone()
                .play(played.clone())
                .map_err(|e| Error::IllegalMove(format!("{}: {}", played_san, e)))?;
            // score of the played move, from the mover's side
            let played_score = if after.is_checkmate() {
                MATE_SCORE
            } else if after.is_stalemate() {
                0
            } else {
                -self.evaluator.evaluate(&to_fen(&after), self.depth)?.evaluation.to_centipawns()
            };
            (best.evaluation.to_centipawns() - played_score).max(0)
        };

        let tactics = if best.best_move.is_empty() {
            Vec::new()
        } else {
            self.detector.detect(&MissedMove {
                fen: &fen_before,
                mover: position.turn(),
                played: played_san,
                recommended: &best.best_move,
                cp_loss: Some(cp_loss),
            })
        };

        Ok(MoveReview {
            ply: ply as u16,
            move_number: position.fullmoves().get(),
            played: played_san.to_string(),
            best_move: best.best_move,
            cp_loss,
            severity: Severity::from_cp_loss(cp_loss),
            fen_before,
            tactics,
        })
    }
}

fn parse_san(position: &Chess, san: &str) -> Result<Move> {
    let parsed: San = strip_annotations(san)
        .parse()
        .map_err(|e| Error::Notation(format!("could not parse SAN '{}': {}", san, e)))?;
    parsed
        .to_move(position)
        .map_err(|e| Error::Notation(format!("'{}' is not playable: {}", san, e)))
}
