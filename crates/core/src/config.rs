//! Runtime configuration shared by the CLI and the web service

use std::env;
use std::str::FromStr;

use tracing::warn;

use crate::tactics::DEFAULT_LOSS_THRESHOLD;

pub const DEFAULT_DEPTH: u8 = 12;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TutorConfig {
    /// Path to the stockfish binary (or "stockfish" if in PATH)
    pub stockfish_path: String,
    /// Search depth used when asking the engine for a best move
    pub depth: u8,
    /// Centipawn loss below which misses are not explained
    pub loss_threshold: i32,
    pub bind_addr: String,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            stockfish_path: "stockfish".to_string(),
            depth: DEFAULT_DEPTH,
            loss_threshold: DEFAULT_LOSS_THRESHOLD,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl TutorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `STOCKFISH_PATH`, `TUTOR_DEPTH`,
    /// `TUTOR_LOSS_THRESHOLD` and `TUTOR_ADDR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            stockfish_path: lookup("STOCKFISH_PATH").unwrap_or(defaults.stockfish_path),
            depth: parse_or("TUTOR_DEPTH", lookup("TUTOR_DEPTH"), defaults.depth),
            loss_threshold: parse_or(
                "TUTOR_LOSS_THRESHOLD",
                lookup("TUTOR_LOSS_THRESHOLD"),
                defaults.loss_threshold,
            ),
            bind_addr: lookup("TUTOR_ADDR").unwrap_or(defaults.bind_addr),
        }
    }

    pub fn stockfish_path(mut self, path: impl Into<String>) -> Self {
        self.stockfish_path = path.into();
        self
    }

    pub fn depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    pub fn loss_threshold(mut self, threshold: i32) -> Self {
        self.loss_threshold = threshold;
        self
    }

    pub fn bind_addr(mut self, addr: impl Into<String>) -> Self {
        self.bind_addr = addr.into();
        self
    }
}

fn parse_or<T: FromStr + Copy>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %value, "ignoring unparsable setting");
            default
        }),
    }
}
