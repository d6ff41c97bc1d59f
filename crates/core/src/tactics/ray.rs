//! Ray geometry for sliding pieces
//!
//! Rays know nothing about occupancy. Callers decide where to stop: the
//! attack model stops at the first occupied square, the pin/skewer check
//! looks at the first two.

use shakmaty::{File, Rank, Role, Square};

/// (file delta, rank delta)
pub type Direction = (i32, i32);

pub const DIAGONALS: [Direction; 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const ORTHOGONALS: [Direction; 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub const ALL_DIRECTIONS: [Direction; 8] = [
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
];

/// Ray directions a piece type slides along. Empty for non-sliders.
pub fn directions(role: Role) -> &'static [Direction] {
    match role {
        Role::Bishop => &DIAGONALS,
        Role::Rook => &ORTHOGONALS,
        Role::Queen => &ALL_DIRECTIONS,
        Role::Pawn | Role::Knight | Role::King => &[],
    }
}

pub fn is_slider(role: Role) -> bool {
    !directions(role).is_empty()
}

/// Square reached by stepping `(df, dr)` from `square`, if it is on the board.
pub fn offset(square: Square, (df, dr): Direction) -> Option<Square> {
    let file = i32::from(square.file()) + df;
    let rank = i32::from(square.rank()) + dr;
    if (0..8).contains(&file) && (0..8).contains(&rank) {
        Some(Square::from_coords(File::new(file as u32), Rank::new(rank as u32)))
    } else {
        None
    }
}

/// Squares stepped outward from an origin (exclusive) to the board edge.
#[derive(Debug, Clone)]
pub struct Ray {
    next: Option<Square>,
    direction: Direction,
}

impl Iterator for Ray {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        let current = self.next?;
        self.next = offset(current, self.direction);
        Some(current)
    }
}

pub fn ray(origin: Square, direction: Direction) -> Ray {
    Ray {
        next: offset(origin, direction),
        direction,
    }
}
