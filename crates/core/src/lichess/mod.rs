//! Lichess API integration

mod client;
mod types;

pub use client::LichessClient;
pub use types::*;
