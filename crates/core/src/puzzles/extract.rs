//! Puzzle selection from the Lichess puzzle CSV

use std::collections::HashMap;
use std::fs;
use std::io::{BufRead, Lines};
use std::path::Path;

use shakmaty::Position;
use tracing::{debug, info, warn};

use super::fixture::{BestMove, ExpectedPattern, PuzzleFixture, PuzzleMove};
use crate::error::{Error, Result};
use crate::notation::{color_name, parse_fen, resolve_uci, san_plus, to_fen};

pub const DEFAULT_PUZZLES_PER_PATTERN: usize = 20;
pub const MARKER_FILE: &str = ".tactical_puzzles_configured";

/// Pattern name and the Lichess themes that select puzzles for it
pub const PATTERN_THEMES: &[(&str, &[&str])] = &[
    ("pin", &["pin"]),
    ("fork", &["fork"]),
    ("skewer", &["skewer"]),
    ("discovered_check", &["discoveredAttack"]),
    ("double_attack", &["doubleCheck", "fork"]),
    ("overloading", &["overloading"]),
    ("back_rank_weakness", &["backRankMate"]),
    ("trapped_piece", &["trappedPiece"]),
];

pub fn themes_for(pattern: &str) -> Option<&'static [&'static str]> {
    PATTERN_THEMES
        .iter()
        .find(|(name, _)| *name == pattern)
        .map(|(_, themes)| *themes)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityFilter {
    pub min_popularity: i32,
    pub min_rating: u32,
    pub max_rating: u32,
    pub min_plays: u32,
}

impl Default for QualityFilter {
    fn default() -> Self {
        Self {
            min_popularity: 50,
            min_rating: 800,
            max_rating: 2200,
            min_plays: 50,
        }
    }
}

impl QualityFilter {
    pub fn accepts(&self, row: &PuzzleRow) -> bool {
        row.popularity >= self.min_popularity
            && (self.min_rating..=self.max_rating).contains(&row.rating)
            && row.plays >= self.min_plays
    }
}

/// One row of the puzzle database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleRow {
    pub id: String,
    /// Position before the opponent's setup move
    pub fen: String,
    /// UCI moves; the first is the opponent's setup move
    pub moves: Vec<String>,
    pub rating: u32,
    pub popularity: i32,
    pub plays: u32,
    pub themes: Vec<String>,
}

impl PuzzleRow {
    pub fn has_any_theme(&self, themes: &[&str]) -> bool {
        self.themes.iter().any(|t| themes.contains(&t.as_str()))
    }
}

struct Columns {
    id: usize,
    fen: usize,
    moves: usize,
    rating: usize,
    popularity: usize,
    plays: usize,
    themes: usize,
}

/// Iterator over the rows of a puzzle CSV.
///
/// Columns are located by header name. Fields in this export are never
/// quoted, so rows are split on commas. Malformed rows are logged and
/// skipped.
pub struct PuzzleCsv<R> {
    lines: Lines<R>,
    columns: Columns,
    line_no: usize,
}

impl<R: BufRead> PuzzleCsv<R> {
    pub fn new(reader: R) -> Result<Self> {
        let mut lines = reader.lines();
        let header = lines
            .next()
            .ok_or_else(|| Error::Puzzle("empty puzzle file".into()))??;

        let index: HashMap<&str, usize> = header
            .trim()
            .split(',')
            .enumerate()
            .map(|(i, name)| (name.trim(), i))
            .collect();
        let column = |name: &str| {
            index
                .get(name)
                .copied()
                .ok_or_else(|| Error::Puzzle(format!("missing column {}", name)))
        };

        let columns = Columns {
            id: column("PuzzleId")?,
            fen: column("FEN")?,
            moves: column("Moves")?,
            rating: column("Rating")?,
            popularity: column("Popularity")?,
            plays: column("NbPlays")?,
            themes: column("Themes")?,
        };

        Ok(Self { lines, columns, line_no: 1 })
    }

    fn parse_row(&self, line: &str) -> Option<PuzzleRow> {
        let fields: Vec<&str> = line.split(',').collect();
        let field = |i: usize| fields.get(i).map(|f| f.trim());
        let c = &self.columns;

        let moves: Vec<String> = field(c.moves)?.split_whitespace().map(String::from).collect();
        if moves.len() < 2 {
            return None;
        }

        Some(PuzzleRow {
            id: field(c.id)?.to_string(),
            fen: field(c.fen)?.to_string(),
            moves,
            rating: field(c.rating)?.parse().ok()?,
            popularity: field(c.popularity)?.parse().ok()?,
            plays: field(c.plays)?.parse().ok()?,
            themes: field(c.themes)?.split_whitespace().map(String::from).collect(),
        })
    }
}

impl<R: BufRead> Iterator for PuzzleCsv<R> {
    type Item = PuzzleRow;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = %e, "stopped reading puzzle file");
                    return None;
                }
            };
            self.line_no += 1;

            if line.trim().is_empty() {
                continue;
            }
            match self.parse_row(&line) {
                Some(row) => return Some(row),
                None => warn!(line = self.line_no, "skipping malformed puzzle row"),
            }
        }
    }
}

/// Collects up to `max` rows carrying one of `themes` and passing `filter`,
/// most popular first. Reading stops as soon as `max` rows are found.
pub fn extract_for_pattern<I>(rows: I, themes: &[&str], filter: &QualityFilter, max: usize) -> Vec<PuzzleRow>
where
    I: IntoIterator<Item = PuzzleRow>,
{
    let mut puzzles: Vec<PuzzleRow> = rows
        .into_iter()
        .filter(|row| row.has_any_theme(themes) && filter.accepts(row))
        .take(max)
        .collect();

    puzzles.sort_by(|a, b| b.popularity.cmp(&a.popularity));
    debug!(?themes, found = puzzles.len(), "extracted puzzles");
    puzzles
}

/// Converts a database row into a fixture positioned after the opponent's
/// setup move.
pub fn to_fixture(row: &PuzzleRow, pattern: &str) -> Result<PuzzleFixture> {
    let (setup, solution) = row
        .moves
        .split_first()
        .ok_or_else(|| Error::Puzzle(format!("puzzle {} has no moves", row.id)))?;
    if solution.is_empty() {
        return Err(Error::Puzzle(format!("puzzle {} has no solution moves", row.id)));
    }

    let before = parse_fen(&row.fen)?;
    let setup_move = resolve_uci(&before, setup)?;
    let start = before
        .play(setup_move)
        .map_err(|e| Error::IllegalMove(format!("{} in puzzle {}: {}", setup, row.id, e)))?;

    let initial_fen = to_fen(&start);
    let side_to_move = color_name(start.turn()).to_string();

    let mut position = start;
    let mut moves = Vec::with_capacity(solution.len());
    for (i, uci) in solution.iter().enumerate() {
        let mv = resolve_uci(&position, uci)?;
        moves.push(PuzzleMove {
            uci: uci.clone(),
            san: san_plus(&position, &mv),
            // solver moves are the 1st, 3rd, 5th... after the setup move
            player: i % 2 == 0,
        });
        position = position
            .play(mv)
            .map_err(|e| Error::IllegalMove(format!("{} in puzzle {}: {}", uci, row.id, e)))?;
    }

    let best_move = BestMove {
        san: moves[0].san.clone(),
        uci: moves[0].uci.clone(),
    };

    Ok(PuzzleFixture {
        id: row.id.clone(),
        initial_fen,
        side_to_move,
        rating: row.rating,
        best_move,
        moves,
        resulting_fen: to_fen(&position),
        expected_pattern: ExpectedPattern { kind: pattern.to_uppercase() },
        context: format!(
            "Lichess puzzle {} (Rating: {}, Popularity: {})",
            row.id, row.rating, row.popularity
        ),
        tags: row.themes.clone(),
    })
}

pub fn write_marker(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(MARKER_FILE), "Tactical puzzles configured successfully\n")?;
    info!(dir = %dir.display(), "marked puzzle fixtures as configured");
    Ok(())
}

pub fn is_configured(dir: &Path) -> bool {
    dir.join(MARKER_FILE).exists()
}
