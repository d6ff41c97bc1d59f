//! Move and position notation helpers (FEN, UCI, SAN)

use shakmaty::{
    fen::Fen, san::San, uci::UciMove, CastlingMode, Chess, Color, EnPassantMode, Move, Piece, Position,
    Role, Square,
};

use crate::error::{Error, Result};

/// Parses a FEN string into a standard chess position.
pub fn parse_fen(fen: &str) -> Result<Chess> {
    let parsed: Fen = fen
        .trim()
        .parse()
        .map_err(|e| Error::InvalidPosition(format!("{}: {}", fen.trim(), e)))?;
    parsed
        .into_position(CastlingMode::Standard)
        .map_err(|e| Error::InvalidPosition(format!("{}: {}", fen.trim(), e)))
}

pub fn to_fen(position: &Chess) -> String {
    Fen::from_position(position, EnPassantMode::Legal).to_string()
}

/// Convert shakmaty Move to UCI string. Castling is written king-to-destination.
pub fn move_to_uci(mv: &Move) -> String {
    UciMove::from_standard(*mv).to_string()
}

/// Square the moving piece lands on. For castling this is the king's
/// square, not the rook's.
pub fn destination(mv: &Move) -> Square {
    match UciMove::from_standard(*mv) {
        UciMove::Normal { to, .. } | UciMove::Put { to, .. } => to,
        UciMove::Null => mv.to(),
    }
}

/// Finds the legal move matching a UCI string (`e2e4`, `e7e8q`). Castling
/// is accepted both as king-to-destination and as king-takes-rook.
pub fn resolve_uci(position: &Chess, uci: &str) -> Result<Move> {
    let uci = uci.trim().to_ascii_lowercase();
    let parsed = UciMove::from_ascii(uci.as_bytes())
        .map_err(|e| Error::Notation(format!("'{}' is not a UCI move: {}", uci, e)))?;
    parsed
        .to_move(position)
        .map_err(|e| Error::Notation(format!("'{}' is not legal in this position: {}", uci, e)))
}

/// SAN of `mv` in `position`, with a `+` or `#` suffix when it checks or mates.
pub fn san_plus(position: &Chess, mv: &Move) -> String {
    let san = San::from_move(position, *mv);
    let suffix = match position.clone().play(*mv) {
        Ok(after) if after.is_checkmate() => "#",
        Ok(after) if after.is_check() => "+",
        _ => "",
    };
    format!("{}{}", san, suffix)
}

/// Strips check, mate and annotation glyphs (`+ # ! ?`) from SAN text.
pub fn strip_annotations(san: &str) -> &str {
    san.trim().trim_end_matches(['+', '#', '!', '?'])
}

/// Whether the SAN text `played` denotes the same move as `mv`.
pub fn same_move(position: &Chess, played: &str, mv: &Move) -> bool {
    let played = strip_annotations(played);
    if let Ok(san) = played.parse::<San>() {
        if let Ok(played_move) = san.to_move(position) {
            return played_move == *mv;
        }
    }
    played == strip_annotations(&San::from_move(position, *mv).to_string())
}

pub fn parse_color(s: &str) -> Option<Color> {
    match s.trim().to_ascii_lowercase().as_str() {
        "white" | "w" => Some(Color::White),
        "black" | "b" => Some(Color::Black),
        _ => None,
    }
}

pub fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "white",
        Color::Black => "black",
    }
}

pub fn role_name(role: Role) -> &'static str {
    match role {
        Role::Pawn => "pawn",
        Role::Knight => "knight",
        Role::Bishop => "bishop",
        Role::Rook => "rook",
        Role::Queen => "queen",
        Role::King => "king",
    }
}

/// Human-readable piece description, e.g. "black queen".
pub fn describe(piece: Piece) -> String {
    format!("{} {}", color_name(piece.color), role_name(piece.role))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_uci_and_san() {
        let pos = Chess::default();
        let mv = resolve_uci(&pos, "g1f3").unwrap();
        assert_eq!(move_to_uci(&mv), "g1f3");
        assert_eq!(san_plus(&pos, &mv), "Nf3");
    }

    #[test]
    fn test_resolve_uci_rejects_garbage() {
        let pos = Chess::default();
        assert!(resolve_uci(&pos, "e2").is_err());
        assert!(resolve_uci(&pos, "e2e5").is_err());
        assert!(resolve_uci(&pos, "0000").is_err());
        assert!(resolve_uci(&pos, "e7e5").is_err());
    }

    #[test]
    fn test_castling_notation() {
        let pos = parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let short = resolve_uci(&pos, "e1g1").unwrap();
        assert_eq!(destination(&short), Square::G1);
        assert_eq!(move_to_uci(&short), "e1g1");

        assert_eq!(resolve_uci(&pos, "e1h1").unwrap(), short);

        let long = resolve_uci(&pos, "e1a1").unwrap();
        assert_eq!(destination(&long), Square::C1);
        assert_eq!(move_to_uci(&long), "e1c1");
        assert_eq!(resolve_uci(&pos, "E1C1").unwrap(), long);
    }

    #[test]
    fn test_same_move_ignores_suffixes() {
        let pos = parse_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
        let mv = resolve_uci(&pos, "a1a8").unwrap();
        assert_eq!(san_plus(&pos, &mv), "Ra8+");
        assert!(same_move(&pos, "Ra8+", &mv));
        assert!(same_move(&pos, "Ra8", &mv));
        assert!(!same_move(&pos, "Ra7", &mv));
    }

    #[test]
    fn test_parse_fen_rejects_garbage() {
        assert!(parse_fen("not a fen").is_err());
    }

    #[test]
    fn test_describe() {
        let piece = Piece { color: Color::Black, role: Role::Queen };
        assert_eq!(describe(piece), "black queen");
        assert_eq!(parse_color("W"), Some(Color::White));
        assert_eq!(parse_color("green"), None);
    }
}
