//! Fork classifier
//!
//! Only the moved piece counts. Attacks uncovered by the move (discovered
//! attacks) are not considered.

use shakmaty::{Board, Square};

use super::attacks::piece_attacks;
use super::types::{piece_value, DetectedTactic, TacticKind, KNIGHT_VALUE};
use crate::notation::describe;

pub fn detect_fork(board: &Board, dest: Square, san: &str) -> Option<DetectedTactic> {
    let forker = board.piece_at(dest)?;

    let mut targets: Vec<_> = piece_attacks(board, dest, forker)
        .into_iter()
        .filter_map(|sq| board.piece_at(sq).map(|p| (sq, p)))
        .filter(|(_, p)| p.color != forker.color && piece_value(p.role) >= KNIGHT_VALUE)
        .collect();

    if targets.len() < 2 {
        return None;
    }

    // stable: equal values keep attack-generation order
    targets.sort_by_key(|(_, p)| std::cmp::Reverse(piece_value(p.role)));

    let tactic = targets
        .iter()
        .take(2)
        .fold(DetectedTactic::new(TacticKind::Fork, san), |tactic, (sq, p)| {
            tactic.with_square(*sq, describe(*p))
        });
    Some(tactic)
}
