//! PGN file parsing functionality

use pgn_reader::{RawTag, SanPlus, Skip, Visitor};
use shakmaty::{Chess, Color, Position};
use std::fs;
use std::io::Cursor;
use std::ops::ControlFlow;
use std::path::Path;
use tracing::warn;

use crate::error::{Error, Result};
use crate::notation::{parse_fen, to_fen};

/// Represents a parsed chess game
#[derive(Debug, Clone)]
pub struct PgnGame {
    pub event: Option<String>,
    pub white: Option<String>,
    pub black: Option<String>,
    pub result: Option<String>,
    /// Starting FEN from the `FEN` tag, if the game did not start from the
    /// standard position
    pub start_fen: Option<String>,
    /// Moves in SAN, without check suffixes
    pub moves: Vec<String>,
    pub final_position: Chess,
}

impl PgnGame {
    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    /// The player's colour if `name` matches either side, ignoring case.
    pub fn color_of(&self, name: &str) -> Option<Color> {
        let matches = |player: &Option<String>| {
            player.as_deref().is_some_and(|p| p.eq_ignore_ascii_case(name))
        };
        if matches(&self.white) {
            Some(Color::White)
        } else if matches(&self.black) {
            Some(Color::Black)
        } else {
            None
        }
    }

    pub fn summary(&self) -> String {
        let white = self.white.as_deref().unwrap_or("Unknown");
        let black = self.black.as_deref().unwrap_or("Unknown");
        let result = self.result.as_deref().unwrap_or("*");
        format!("{} vs {} - {}", white, black, result)
    }
}

#[derive(Default)]
struct GameTags {
    event: Option<String>,
    white: Option<String>,
    black: Option<String>,
    result: Option<String>,
    fen: Option<String>,
}

struct GameMoves {
    tags: GameTags,
    start_fen: Option<String>,
    moves: Vec<String>,
    current_position: Chess,
    success: bool,
}

struct GameParser;

impl Visitor for GameParser {
    type Tags = GameTags;
    type Movetext = GameMoves;
    type Output = Option<PgnGame>;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        ControlFlow::Continue(GameTags::default())
    }

    fn tag(&mut self, tags: &mut Self::Tags, name: &[u8], value: RawTag<'_>) -> ControlFlow<Self::Output> {
        let value_str = value.decode_utf8_lossy().to_string();

        match name {
            b"Event" => tags.event = Some(value_str),
            b"White" => tags.white = Some(value_str),
            b"Black" => tags.black = Some(value_str),
            b"Result" => tags.result = Some(value_str),
            b"FEN" => tags.fen = Some(value_str),
            _ => {}
        }

        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, mut tags: Self::Tags) -> ControlFlow<Self::Output, Self::Movetext> {
        let (start, start_fen, success) = match tags.fen.take() {
            None => (Chess::default(), None, true),
            Some(fen) => match parse_fen(&fen) {
                Ok(position) => {
                    let normalized = to_fen(&position);
                    (position, Some(normalized), true)
                }
                Err(e) => {
                    warn!(fen = %fen, error = %e, "skipping game with unusable FEN tag");
                    (Chess::default(), None, false)
                }
            },
        };

        ControlFlow::Continue(GameMoves {
            tags,
            start_fen,
            moves: Vec::new(),
            current_position: start,
            success,
        })
    }

    fn san(&mut self, movetext: &mut Self::Movetext, san: SanPlus) -> ControlFlow<Self::Output> {
        if !movetext.success {
            return ControlFlow::Continue(());
        }

        movetext.moves.push(san.san.to_string());

        let played = san
            .san
            .to_move(&movetext.current_position)
            .ok()
            .and_then(|m| movetext.current_position.clone().play(m).ok());
        match played {
            Some(new_pos) => movetext.current_position = new_pos,
            None => movetext.success = false,
        }

        ControlFlow::Continue(())
    }

    fn begin_variation(&mut self, _movetext: &mut Self::Movetext) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn end_game(&mut self, movetext: Self::Movetext) -> Self::Output {
        if !movetext.success {
            warn!(moves = movetext.moves.len(), "dropping game with an illegal move");
            return None;
        }
        Some(PgnGame {
            event: movetext.tags.event,
            white: movetext.tags.white,
            black: movetext.tags.black,
            result: movetext.tags.result,
            start_fen: movetext.start_fen,
            moves: movetext.moves,
            final_position: movetext.current_position,
        })
    }
}

pub fn parse_pgn_file<P: AsRef<Path>>(path: P) -> Result<Vec<PgnGame>> {
    let contents = fs::read_to_string(path)?;
    parse_pgn_string(&contents)
}

/// Parses every game in `pgn`. Games containing an illegal move are
/// dropped; an input with no usable game is an error.
pub fn parse_pgn_string(pgn: &str) -> Result<Vec<PgnGame>> {
    let mut parser = GameParser;
    let mut games: Vec<PgnGame> = Vec::new();

    let cursor = Cursor::new(pgn.as_bytes());
    let mut reader = pgn_reader::Reader::new(cursor);

    loop {
        match reader.read_game(&mut parser) {
            Ok(Some(maybe_game)) => {
                if let Some(game) = maybe_game {
                    games.push(game);
                }
            }
            Ok(None) => break,
            Err(e) => return Err(Error::Pgn(e.to_string())),
        }
    }

    if games.is_empty() {
        Err(Error::Pgn("no valid games found".into()))
    } else {
        Ok(games)
    }
}
