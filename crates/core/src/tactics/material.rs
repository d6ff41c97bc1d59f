//! Capture and check classifiers

use shakmaty::{Chess, Move, Piece, Position};

use super::types::{piece_value, DetectedTactic, TacticKind, PAWN_VALUE};
use crate::notation::{describe, destination};

/// A capture the opponent cannot immediately answer on the same square.
///
/// `after` is the position once `mv` has been played, so the side to move is
/// the opponent. Records the capturing piece on its origin square, then the
/// captured piece on the landing square (for en passant, the square the
/// pawn moves to).
pub fn detect_capture(after: &Chess, mv: &Move, san: &str) -> Option<DetectedTactic> {
    let captured = mv.capture()?;
    let from = mv.from()?;
    let dest = destination(mv);

    let recapture = after.legal_moves().iter().any(|m| m.to() == dest);
    if recapture {
        return None;
    }

    let value = piece_value(captured);
    let kind = if value > PAWN_VALUE {
        TacticKind::WinPiece
    } else {
        TacticKind::WinPawn
    };
    let mover = Piece { color: !after.turn(), role: mv.role() };
    let victim = Piece { color: after.turn(), role: captured };

    Some(
        DetectedTactic::new(kind, san)
            .with_square(from, describe(mover))
            .with_square(dest, describe(victim))
            .with_material(value),
    )
}

/// The move leaves the opponent in check.
pub fn detect_check(after: &Chess, mv: &Move, san: &str) -> Option<DetectedTactic> {
    if !after.is_check() {
        return None;
    }
    let dest = destination(mv);
    let mover = after.board().piece_at(dest)?;
    Some(DetectedTactic::new(TacticKind::Check, san).with_square(dest, describe(mover)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::{parse_fen, resolve_uci};
    use shakmaty::Square;

    fn play(fen: &str, uci: &str) -> (Chess, Move) {
        let pos = parse_fen(fen).unwrap();
        let mv = resolve_uci(&pos, uci).unwrap();
        (pos.play(mv.clone()).unwrap(), mv)
    }

    #[test]
    fn test_free_queen_is_win_piece() {
        let (after, mv) = play("4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1", "d1d5");
        let tactic = detect_capture(&after, &mv, "Rxd5").unwrap();
        assert_eq!(tactic.kind, TacticKind::WinPiece);
        assert_eq!(tactic.material_delta, Some(900));
        assert_eq!(tactic.affected_squares, vec![Square::D1, Square::D5]);
        assert_eq!(tactic.piece_roles, vec!["white rook", "black queen"]);
        assert_eq!(tactic.summary(), "Wins a Piece (Rxd5): white rook on d1, black queen on d5 [+900 cp]");
    }

    #[test]
    fn test_defended_capture_is_suppressed() {
        // the black king on e6 can take back on d5
        let (after, mv) = play("8/8/4k3/3q4/8/8/8/3RK3 w - - 0 1", "d1d5");
        assert!(detect_capture(&after, &mv, "Rxd5").is_none());
    }

    #[test]
    fn test_pawn_capture_is_win_pawn() {
        let (after, mv) = play("4k3/8/8/3p4/8/8/8/3RK3 w - - 0 1", "d1d5");
        let tactic = detect_capture(&after, &mv, "Rxd5").unwrap();
        assert_eq!(tactic.kind, TacticKind::WinPawn);
        assert_eq!(tactic.material_delta, Some(100));
    }

    #[test]
    fn test_en_passant_is_win_pawn() {
        let (after, mv) = play("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1", "e5d6");
        let tactic = detect_capture(&after, &mv, "exd6").unwrap();
        assert_eq!(tactic.kind, TacticKind::WinPawn);
        assert_eq!(tactic.material_delta, Some(100));
        assert_eq!(tactic.affected_squares, vec![Square::E5, Square::D6]);
        assert_eq!(tactic.piece_roles, vec!["white pawn", "black pawn"]);
    }

    #[test]
    fn test_castling_check_lands_on_king_square() {
        let (after, mv) = play("5k2/8/8/8/8/8/8/4K2R w K - 0 1", "e1g1");
        assert!(detect_capture(&after, &mv, "O-O+").is_none());
        let tactic = detect_check(&after, &mv, "O-O+").unwrap();
        assert_eq!(tactic.affected_squares, vec![Square::G1]);
        assert_eq!(tactic.piece_roles, vec!["white king"]);

        let (after, mv) = play("3k4/8/8/8/8/8/8/R3K3 w Q - 0 1", "e1a1");
        let tactic = detect_check(&after, &mv, "O-O-O+").unwrap();
        assert_eq!(tactic.affected_squares, vec![Square::C1]);
    }

    #[test]
    fn test_quiet_move_is_not_a_capture() {
        let (after, mv) = play("4k3/8/8/8/8/8/8/3RK3 w - - 0 1", "d1d4");
        assert!(detect_capture(&after, &mv, "Rd4").is_none());
        assert!(detect_check(&after, &mv, "Rd4").is_none());
    }

    #[test]
    fn test_check_references_moved_piece() {
        let (after, mv) = play("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", "a1a8");
        let tactic = detect_check(&after, &mv, "Ra8+").unwrap();
        assert_eq!(tactic.kind, TacticKind::Check);
        assert_eq!(tactic.affected_squares, vec![Square::A8]);
        assert_eq!(tactic.piece_roles, vec!["white rook"]);
        assert_eq!(tactic.material_delta, None);
    }
}
