//! Fixture file format

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;

pub const LICHESS_PUZZLE_SOURCE: &str = "https://database.lichess.org/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleMove {
    pub uci: String,
    /// SAN with check/mate suffix
    pub san: String,
    /// True for the solver's moves, false for the opponent's replies
    pub player: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestMove {
    pub san: String,
    pub uci: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedPattern {
    /// Upper-cased pattern name, e.g. "FORK" or "BACK_RANK_WEAKNESS"
    #[serde(rename = "type")]
    pub kind: String,
}

/// One puzzle, positioned after the opponent's setup move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleFixture {
    pub id: String,
    pub initial_fen: String,
    pub side_to_move: String,
    pub rating: u32,
    pub best_move: BestMove,
    pub moves: Vec<PuzzleMove>,
    pub resulting_fen: String,
    pub expected_pattern: ExpectedPattern,
    pub context: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureFile {
    pub description: String,
    pub source: String,
    pub generated_at: String,
    pub cases: Vec<PuzzleFixture>,
}

impl FixtureFile {
    pub fn new(pattern: &str, cases: Vec<PuzzleFixture>) -> Self {
        Self {
            description: format!(
                "High-quality {} tactical puzzles from Lichess database",
                pattern.to_uppercase()
            ),
            source: LICHESS_PUZZLE_SOURCE.to_string(),
            generated_at: "auto-generated".to_string(),
            cases,
        }
    }
}

/// Writes `<dir>/<pattern>.json` as pretty JSON and returns its path.
pub fn save_fixtures(dir: &Path, pattern: &str, cases: Vec<PuzzleFixture>) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.json", pattern));
    let file = FixtureFile::new(pattern, cases);
    fs::write(&path, serde_json::to_string_pretty(&file)?)?;
    info!(path = %path.display(), cases = file.cases.len(), "saved fixtures");
    Ok(path)
}

pub fn load_fixtures(path: &Path) -> Result<FixtureFile> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> PuzzleFixture {
        PuzzleFixture {
            id: "t0001".into(),
            initial_fen: "r3k3/8/7p/3N4/8/8/8/4K3 w - - 0 2".into(),
            side_to_move: "white".into(),
            rating: 1200,
            best_move: BestMove { san: "Nc7+".into(), uci: "d5c7".into() },
            moves: vec![PuzzleMove { uci: "d5c7".into(), san: "Nc7+".into(), player: true }],
            resulting_fen: "r3k3/2N5/7p/8/8/8/8/4K3 b - - 1 2".into(),
            expected_pattern: ExpectedPattern { kind: "FORK".into() },
            context: "Lichess puzzle t0001 (Rating: 1200, Popularity: 92)".into(),
            tags: vec!["fork".into()],
        }
    }

    #[test]
    fn test_fixture_json_field_names() {
        let value = serde_json::to_value(FixtureFile::new("fork", vec![fixture()])).unwrap();
        assert_eq!(value["generatedAt"], "auto-generated");
        assert_eq!(value["description"], "High-quality FORK tactical puzzles from Lichess database");
        let case = &value["cases"][0];
        assert_eq!(case["initialFen"], "r3k3/8/7p/3N4/8/8/8/4K3 w - - 0 2");
        assert_eq!(case["sideToMove"], "white");
        assert_eq!(case["bestMove"]["uci"], "d5c7");
        assert_eq!(case["expectedPattern"]["type"], "FORK");
        assert_eq!(case["moves"][0]["player"], true);
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("tutor-fixtures-{}", std::process::id()));
        let path = save_fixtures(&dir, "fork", vec![fixture()]).unwrap();
        assert_eq!(path, dir.join("fork.json"));

        let loaded = load_fixtures(&path).unwrap();
        assert_eq!(loaded.cases, vec![fixture()]);
        fs::remove_dir_all(&dir).unwrap();
    }
}
