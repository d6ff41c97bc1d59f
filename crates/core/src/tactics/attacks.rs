//! Board attack model: which squares each side's pieces attack

use std::collections::HashMap;

use shakmaty::{Board, Color, Piece, Role, Square};

use super::ray::{directions, offset, ray, Direction};

const KNIGHT_OFFSETS: [Direction; 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_OFFSETS: [Direction; 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
];

/// Squares attacked by `piece` standing on `from`.
///
/// Pawns attack their two forward diagonals only. Sliders include the first
/// occupied square on each ray (it can be captured) and nothing past it.
pub fn piece_attacks(board: &Board, from: Square, piece: Piece) -> Vec<Square> {
    match piece.role {
        Role::Pawn => {
            let forward = match piece.color {
                Color::White => 1,
                Color::Black => -1,
            };
            [(-1, forward), (1, forward)]
                .into_iter()
                .filter_map(|step| offset(from, step))
                .collect()
        }
        Role::Knight => leaps(from, &KNIGHT_OFFSETS),
        Role::King => leaps(from, &KING_OFFSETS),
        Role::Bishop | Role::Rook | Role::Queen => {
            let mut squares = Vec::new();
            for &dir in directions(piece.role) {
                for sq in ray(from, dir) {
                    squares.push(sq);
                    if board.piece_at(sq).is_some() {
                        break;
                    }
                }
            }
            squares
        }
    }
}

fn leaps(from: Square, table: &[Direction]) -> Vec<Square> {
    table.iter().filter_map(|&step| offset(from, step)).collect()
}

/// Target square -> origin squares of one color's pieces attacking it.
#[derive(Debug, Clone, Default)]
pub struct AttackMap {
    attackers: HashMap<Square, Vec<Square>>,
}

impl AttackMap {
    pub fn build(board: &Board, color: Color) -> Self {
        let mut attackers: HashMap<Square, Vec<Square>> = HashMap::new();

        for from in board.by_color(color) {
            let Some(piece) = board.piece_at(from) else {
                continue;
            };
            for target in piece_attacks(board, from, piece) {
                attackers.entry(target).or_default().push(from);
            }
        }

        Self { attackers }
    }

    pub fn attackers(&self, square: Square) -> &[Square] {
        self.attackers.get(&square).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_attacked(&self, square: Square) -> bool {
        !self.attackers(square).is_empty()
    }

    /// Number of distinct squares attacked.
    pub fn len(&self) -> usize {
        self.attackers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attackers.is_empty()
    }
}
