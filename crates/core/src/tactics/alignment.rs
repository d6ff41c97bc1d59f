//! Pin and skewer classifier
//!
//! Walks every ray of every slider belonging to the side that just moved and
//! looks at the first two pieces met along it.

use shakmaty::{Board, Color, Piece, Role, Square};

use super::ray::{directions, ray};
use super::types::{piece_value, DetectedTactic, TacticKind, ROOK_VALUE};
use crate::notation::describe;

pub fn detect_alignments(board: &Board, mover: Color, san: &str) -> Vec<DetectedTactic> {
    let mut tactics = Vec::new();

    for from in board.by_color(mover) {
        let Some(slider) = board.piece_at(from) else {
            continue;
        };
        for &dir in directions(slider.role) {
            let mut occupied = ray(from, dir).filter_map(|sq| board.piece_at(sq).map(|p| (sq, p)));
            let (Some(near), Some(far)) = (occupied.next(), occupied.next()) else {
                continue;
            };
            if near.1.color == mover || far.1.color == mover {
                continue;
            }
            if let Some(kind) = classify(near.1, far.1) {
                tactics.push(tactic(kind, san, near, far));
            }
        }
    }

    tactics
}

/// Pin when the rear piece is worth more (or is the king); skewer when a
/// front piece worth at least a rook shields something cheaper.
fn classify(near: Piece, far: Piece) -> Option<TacticKind> {
    let near_value = piece_value(near.role);
    let far_value = piece_value(far.role);

    if far.role == Role::King || far_value > near_value {
        Some(TacticKind::Pin)
    } else if near_value > far_value && near_value >= ROOK_VALUE {
        Some(TacticKind::Skewer)
    } else {
        None
    }
}

fn tactic(kind: TacticKind, san: &str, near: (Square, Piece), far: (Square, Piece)) -> DetectedTactic {
    DetectedTactic::new(kind, san)
        .with_square(near.0, describe(near.1))
        .with_square(far.0, describe(far.1))
}
