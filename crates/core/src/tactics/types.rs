//! Tactic types and material values

use serde::{Deserialize, Serialize};
use shakmaty::{Role, Square};

pub const PAWN_VALUE: i32 = 100;
pub const KNIGHT_VALUE: i32 = 300;
pub const BISHOP_VALUE: i32 = 300;
pub const ROOK_VALUE: i32 = 500;
pub const QUEEN_VALUE: i32 = 900;
/// Stands in for "infinite"; only ever compared, never summed.
pub const KING_VALUE: i32 = 10_000;

/// Material value of a piece type in centipawns.
pub fn piece_value(role: Role) -> i32 {
    match role {
        Role::Pawn => PAWN_VALUE,
        Role::Knight => KNIGHT_VALUE,
        Role::Bishop => BISHOP_VALUE,
        Role::Rook => ROOK_VALUE,
        Role::Queen => QUEEN_VALUE,
        Role::King => KING_VALUE,
    }
}

/// Kind of tactic the recommended move creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TacticKind {
    WinPiece,
    WinPawn,
    Pin,
    Skewer,
    Fork,
    Check,
    HangingPiece,
}

impl TacticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TacticKind::WinPiece => "win_piece",
            TacticKind::WinPawn => "win_pawn",
            TacticKind::Pin => "pin",
            TacticKind::Skewer => "skewer",
            TacticKind::Fork => "fork",
            TacticKind::Check => "check",
            TacticKind::HangingPiece => "hanging_piece",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TacticKind::WinPiece => "Wins a Piece",
            TacticKind::WinPawn => "Wins a Pawn",
            TacticKind::Pin => "Pin",
            TacticKind::Skewer => "Skewer",
            TacticKind::Fork => "Fork",
            TacticKind::Check => "Check",
            TacticKind::HangingPiece => "Hanging Piece",
        }
    }
}

/// A concrete reason the recommended move was better than the one played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedTactic {
    pub kind: TacticKind,
    #[serde(with = "square_list")]
    pub affected_squares: Vec<Square>,
    /// Piece descriptions, e.g. "white rook", in the same order as the squares
    /// they refer to.
    pub piece_roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material_delta: Option<i32>,
    /// SAN of the recommended move
    #[serde(rename = "move")]
    pub mv: String,
}

impl DetectedTactic {
    pub fn new(kind: TacticKind, mv: &str) -> Self {
        Self {
            kind,
            affected_squares: Vec::new(),
            piece_roles: Vec::new(),
            material_delta: None,
            mv: mv.to_string(),
        }
    }

    pub fn with_square(mut self, square: Square, role: String) -> Self {
        self.affected_squares.push(square);
        self.piece_roles.push(role);
        self
    }

    pub fn with_material(mut self, delta: i32) -> Self {
        self.material_delta = Some(delta);
        self
    }

    /// One-line summary, e.g. "Fork (Nc7): black rook on a8, black king on e8"
    pub fn summary(&self) -> String {
        let targets: Vec<String> = self
            .affected_squares
            .iter()
            .zip(&self.piece_roles)
            .map(|(sq, role)| format!("{} on {}", role, sq))
            .collect();
        let mut text = format!("{} ({}): {}", self.kind.display_name(), self.mv, targets.join(", "));
        if let Some(delta) = self.material_delta {
            text.push_str(&format!(" [+{} cp]", delta));
        }
        text
    }
}

/// Squares serialize as algebraic names ("e4").
mod square_list {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use shakmaty::Square;

    pub fn serialize<S: Serializer>(squares: &[Square], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(squares.iter().map(|sq| sq.to_string()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Square>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|s| s.parse::<Square>().map_err(D::Error::custom))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_values() {
        assert_eq!(piece_value(Role::Pawn), 100);
        assert_eq!(piece_value(Role::Knight), piece_value(Role::Bishop));
        assert!(piece_value(Role::King) > piece_value(Role::Queen));
    }

    #[test]
    fn test_tactic_json_shape() {
        let tactic = DetectedTactic::new(TacticKind::WinPiece, "Rxd5")
            .with_square(Square::D5, "white rook".to_string())
            .with_material(900);

        let json = serde_json::to_value(&tactic).unwrap();
        assert_eq!(json["kind"], "win_piece");
        assert_eq!(json["affected_squares"][0], "d5");
        assert_eq!(json["material_delta"], 900);
        assert_eq!(json["move"], "Rxd5");

        let back: DetectedTactic = serde_json::from_value(json).unwrap();
        assert_eq!(back, tactic);
    }

    #[test]
    fn test_summary() {
        let tactic = DetectedTactic::new(TacticKind::Check, "Ra8+")
            .with_square(Square::A8, "white rook".to_string());
        assert_eq!(tactic.summary(), "Check (Ra8+): white rook on a8");
    }
}
