//! Hanging-piece classifier
//!
//! "Undefended" means no piece of the owner's color attacks the square. A
//! defender that is itself pinned, or whose recapture would expose its own
//! king, still counts as a defender here.

use shakmaty::{Board, Color, Role};

use super::attacks::AttackMap;
use super::types::{piece_value, DetectedTactic, TacticKind};
use crate::notation::describe;

/// Opponent pieces attacked by `mover` and defended by nobody.
pub fn detect_hanging(board: &Board, mover: Color, san: &str) -> Vec<DetectedTactic> {
    let attacks = AttackMap::build(board, mover);
    let defenses = AttackMap::build(board, !mover);

    board
        .by_color(!mover)
        .into_iter()
        .filter_map(|sq| board.piece_at(sq).map(|p| (sq, p)))
        // attacks on the king are reported as check
        .filter(|(_, piece)| piece.role != Role::King)
        .filter(|(sq, _)| attacks.is_attacked(*sq) && !defenses.is_attacked(*sq))
        .map(|(sq, piece)| {
            DetectedTactic::new(TacticKind::HangingPiece, san)
                .with_square(sq, describe(piece))
                .with_material(piece_value(piece.role))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::parse_fen;
    use shakmaty::{Position, Square};

    fn hanging(fen: &str, mover: Color) -> Vec<DetectedTactic> {
        let pos = parse_fen(fen).unwrap();
        detect_hanging(pos.board(), mover, "--")
    }

    #[test]
    fn test_undefended_bishop_hangs() {
        let found = hanging("7k/8/8/3b4/8/8/8/3RK3 b - - 0 1", Color::White);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, TacticKind::HangingPiece);
        assert_eq!(found[0].affected_squares, vec![Square::D5]);
        assert_eq!(found[0].material_delta, Some(300));
    }

    #[test]
    fn test_defended_piece_does_not_hang() {
        // pawn on c6 guards the bishop
        let found = hanging("7k/8/2p5/3b4/8/8/8/3RK3 b - - 0 1", Color::White);
        assert!(found.is_empty());
    }

    #[test]
    fn test_unattacked_piece_does_not_hang() {
        let found = hanging("7k/8/8/2b5/8/8/8/3RK3 b - - 0 1", Color::White);
        assert!(found.is_empty());
    }

    #[test]
    fn test_king_is_never_hanging() {
        let found = hanging("3k4/8/8/8/8/8/8/3RK3 b - - 0 1", Color::White);
        assert!(found.is_empty());
    }
}
