//! Lichess puzzle fixtures for exercising the tactic detector
//!
//! Puzzles are pulled from the (decompressed) Lichess puzzle CSV, filtered
//! for quality, converted to JSON fixtures and checked against
//! [`explain_move`](crate::tactics::explain_move).

pub mod extract;
pub mod fixture;
pub mod validate;

pub use extract::{
    extract_for_pattern, is_configured, themes_for, to_fixture, write_marker, PuzzleCsv, PuzzleRow, QualityFilter,
    DEFAULT_PUZZLES_PER_PATTERN, MARKER_FILE, PATTERN_THEMES,
};
pub use fixture::{load_fixtures, save_fixtures, BestMove, ExpectedPattern, FixtureFile, PuzzleFixture, PuzzleMove};
pub use validate::{expected_kind, validate_dir, validate_file, validate_fixture, ValidationOutcome, ValidationReport};
