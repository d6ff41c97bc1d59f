//! Stockfish chess engine interface
//!
//! Spawns Stockfish as a subprocess and communicates via UCI protocol.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use super::analysis::{Evaluation, PositionAnalysis};
use super::PositionEvaluator;

/// Error type for engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to start the engine process
    #[error("Failed to start engine: {0}")]
    Spawn(String),
    /// Failed to communicate with engine
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Engine closed its output mid-conversation
    #[error("Engine closed the connection")]
    Closed,
    /// Engine returned unexpected response
    #[error("Protocol error: {0}")]
    Protocol(String),
    /// Engine not initialized
    #[error("Engine not initialized")]
    NotInitialized,
}

/// Wrapper around Stockfish chess engine
pub struct StockfishEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    /// Whether UCI handshake completed
    initialized: bool,
}

impl StockfishEngine {
    /// Creates a new Stockfish engine instance
    ///
    /// # Arguments
    /// * `path` - Path to stockfish binary (or "stockfish" if in PATH)
    ///
    /// # Example
    /// ```ignore
    /// let mut engine = StockfishEngine::new("stockfish")?;
    /// ```
    pub fn new(path: &str) -> Result<Self, EngineError> {
        let mut process = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| EngineError::Spawn(format!("{}: {}", path, e)))?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| EngineError::Spawn("Failed to open stdin".into()))?;

        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| EngineError::Spawn("Failed to open stdout".into()))?;

        let mut engine = StockfishEngine {
            process,
            stdin,
            stdout: BufReader::new(stdout),
            initialized: false,
        };

        engine.init_uci()?;
        debug!(path, "engine ready");

        Ok(engine)
    }

    fn send(&mut self, cmd: &str) -> Result<(), EngineError> {
        writeln!(self.stdin, "{}", cmd)?;
        self.stdin.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, EngineError> {
        let mut line = String::new();
        if self.stdout.read_line(&mut line)? == 0 {
            return Err(EngineError::Closed);
        }
        Ok(line.trim().to_string())
    }

    /// Reads lines until one starts with `expected`
    fn read_until(&mut self, expected: &str) -> Result<(), EngineError> {
        loop {
            if self.read_line()?.starts_with(expected) {
                return Ok(());
            }
        }
    }

    fn init_uci(&mut self) -> Result<(), EngineError> {
        self.send("uci")?;
        self.read_until("uciok")?;

        self.send("isready")?;
        self.read_until("readyok")?;

        self.initialized = true;
        Ok(())
    }

    /// Sets a position from a FEN string
    ///
    /// # Arguments
    /// * `fen` - FEN string, or None for starting position
    /// * `moves` - Optional list of UCI moves to play from the position
    pub fn set_position(&mut self, fen: Option<&str>, moves: Option<&[String]>) -> Result<(), EngineError> {
        if !self.initialized {
            return Err(EngineError::NotInitialized);
        }

        let pos_str = match fen {
            Some(f) => format!("position fen {}", f),
            None => "position startpos".to_string(),
        };

        let cmd = match moves {
            Some(m) if !m.is_empty() => format!("{} moves {}", pos_str, m.join(" ")),
            _ => pos_str,
        };

        self.send(&cmd)
    }

    /// Searches the current position to `depth` and returns the final
    /// `info` line's data together with `bestmove`.
    pub fn analyze(&mut self, depth: u8) -> Result<PositionAnalysis, EngineError> {
        if !self.initialized {
            return Err(EngineError::NotInitialized);
        }

        self.send(&format!("go depth {}", depth))?;

        let mut analysis = PositionAnalysis {
            best_move: String::new(),
            evaluation: Evaluation::Centipawns(0),
            depth: 0,
            pv: Vec::new(),
            time_ms: 0,
            nodes: 0,
        };

        loop {
            let line = self.read_line()?;

            if line.starts_with("bestmove") {
                // "bestmove e2e4 ponder e7e5", or "bestmove (none)" when mated
                analysis.best_move = parse_bestmove(&line)?;
                break;
            } else if line.starts_with("info") {
                parse_info_line(&line, &mut analysis);
            }
        }

        Ok(analysis)
    }

    /// Quit the engine cleanly
    pub fn quit(&mut self) -> Result<(), EngineError> {
        self.send("quit")?;
        std::thread::sleep(Duration::from_millis(100));
        let _ = self.process.kill();
        Ok(())
    }
}

impl PositionEvaluator for StockfishEngine {
    fn evaluate(&mut self, fen: &str, depth: u8) -> Result<PositionAnalysis, EngineError> {
        self.set_position(Some(fen), None)?;
        self.analyze(depth)
    }
}

impl Drop for StockfishEngine {
    fn drop(&mut self) {
        if let Err(e) = self.quit() {
            warn!(error = %e, "engine did not shut down cleanly");
        }
    }
}

fn parse_bestmove(line: &str) -> Result<String, EngineError> {
    match line.split_whitespace().nth(1) {
        Some("(none)") => Ok(String::new()),
        Some(mv) => Ok(mv.to_string()),
        None => Err(EngineError::Protocol(format!("malformed bestmove line: {}", line))),
    }
}

/// Folds one `info` line into `analysis`. Unknown tokens are skipped;
/// lines without a score (e.g. `info string ...`) leave the score alone.
fn parse_info_line(line: &str, analysis: &mut PositionAnalysis) {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let mut i = 0;

    while i < parts.len() {
        match parts[i] {
            "string" => break,
            "depth" => {
                if let Some(d) = parts.get(i + 1).and_then(|s| s.parse().ok()) {
                    analysis.depth = d;
                }
                i += 2;
            }
            "score" => {
                let value = parts.get(i + 2).and_then(|s| s.parse::<i32>().ok());
                match (parts.get(i + 1).copied(), value) {
                    (Some("cp"), Some(cp)) => analysis.evaluation = Evaluation::Centipawns(cp),
                    (Some("mate"), Some(m)) => analysis.evaluation = Evaluation::Mate(m),
                    _ => {}
                }
                i += 3;
            }
            "time" => {
                if let Some(t) = parts.get(i + 1).and_then(|s| s.parse().ok()) {
                    analysis.time_ms = t;
                }
                i += 2;
            }
            "nodes" => {
                if let Some(n) = parts.get(i + 1).and_then(|s| s.parse().ok()) {
                    analysis.nodes = n;
                }
                i += 2;
            }
            "pv" => {
                // Everything after "pv" is the principal variation
                analysis.pv = parts[i + 1..].iter().map(|s| s.to_string()).collect();
                break;
            }
            _ => {
                i += 1;
            }
        }
    }
}
