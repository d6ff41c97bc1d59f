//! Engine-backed move review for a player's games

mod reviewer;
mod types;

pub use reviewer::GameReviewer;
pub use types::*;
