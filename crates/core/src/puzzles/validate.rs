//! Checks fixtures against the tactic classifiers

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use super::fixture::{load_fixtures, FixtureFile, PuzzleFixture};
use crate::error::Result;
use crate::notation::{parse_fen, resolve_uci};
use crate::tactics::{explain_move, TacticKind};

/// The tactic kind a fixture pattern should produce, for patterns the
/// classifiers can recognise.
pub fn expected_kind(pattern: &str) -> Option<TacticKind> {
    match pattern.to_ascii_uppercase().as_str() {
        "PIN" => Some(TacticKind::Pin),
        "FORK" => Some(TacticKind::Fork),
        "SKEWER" => Some(TacticKind::Skewer),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Matched,
    Missed { detected: Vec<TacticKind> },
    Unsupported,
    Invalid(String),
}

pub fn validate_fixture(fixture: &PuzzleFixture) -> ValidationOutcome {
    let Some(expected) = expected_kind(&fixture.expected_pattern.kind) else {
        return ValidationOutcome::Unsupported;
    };

    let tactics = parse_fen(&fixture.initial_fen)
        .and_then(|position| {
            let mv = resolve_uci(&position, &fixture.best_move.uci)?;
            explain_move(&position, &mv)
        });

    match tactics {
        Err(e) => ValidationOutcome::Invalid(e.to_string()),
        Ok(tactics) if tactics.iter().any(|t| t.kind == expected) => ValidationOutcome::Matched,
        Ok(tactics) => ValidationOutcome::Missed {
            detected: tactics.iter().map(|t| t.kind).collect(),
        },
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub total: usize,
    pub matched: usize,
    pub missed: usize,
    pub unsupported: usize,
    pub invalid: usize,
    /// Puzzle ids with a short reason, for anything not matched or unsupported
    pub failures: Vec<(String, String)>,
}

impl ValidationReport {
    /// Share of supported fixtures the classifiers recognised.
    pub fn match_rate(&self) -> f64 {
        let supported = self.total - self.unsupported;
        if supported == 0 {
            0.0
        } else {
            self.matched as f64 / supported as f64
        }
    }
}

pub fn validate_file(file: &FixtureFile) -> ValidationReport {
    let mut report = ValidationReport::default();

    for fixture in &file.cases {
        report.total += 1;
        match validate_fixture(fixture) {
            ValidationOutcome::Matched => report.matched += 1,
            ValidationOutcome::Unsupported => report.unsupported += 1,
            ValidationOutcome::Missed { detected } => {
                report.missed += 1;
                let found: Vec<&str> = detected.iter().map(|k| k.as_str()).collect();
                report
                    .failures
                    .push((fixture.id.clone(), format!("detected [{}]", found.join(", "))));
            }
            ValidationOutcome::Invalid(reason) => {
                report.invalid += 1;
                report.failures.push((fixture.id.clone(), reason));
            }
        }
    }

    debug!(total = report.total, matched = report.matched, "validated fixture file");
    report
}

/// Validates every `*.json` fixture file in `dir`, sorted by file name.
pub fn validate_dir(dir: &Path) -> Result<Vec<(String, ValidationReport)>> {
    let mut paths: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut reports = Vec::with_capacity(paths.len());
    for path in paths {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let report = validate_file(&load_fixtures(&path)?);
        info!(pattern = %name, matched = report.matched, total = report.total, "validated");
        reports.push((name, report));
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzles::fixture::{BestMove, ExpectedPattern};

    fn fixture(id: &str, fen: &str, uci: &str, pattern: &str) -> PuzzleFixture {
        PuzzleFixture {
            id: id.into(),
            initial_fen: fen.into(),
            side_to_move: "white".into(),
            rating: 1200,
            best_move: BestMove { san: String::new(), uci: uci.into() },
            moves: Vec::new(),
            resulting_fen: String::new(),
            expected_pattern: ExpectedPattern { kind: pattern.into() },
            context: String::new(),
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_expected_kind() {
        assert_eq!(expected_kind("FORK"), Some(TacticKind::Fork));
        assert_eq!(expected_kind("pin"), Some(TacticKind::Pin));
        assert_eq!(expected_kind("BACK_RANK_WEAKNESS"), None);
    }

    #[test]
    fn test_validate_outcomes() {
        let fork = fixture("f1", "r3k3/8/7p/3N4/8/8/8/4K3 w - - 0 2", "d5c7", "FORK");
        assert_eq!(validate_fixture(&fork), ValidationOutcome::Matched);

        let pin = fixture("p1", "4k3/8/4n3/8/8/8/8/K2R4 w - - 0 1", "d1e1", "PIN");
        assert_eq!(validate_fixture(&pin), ValidationOutcome::Matched);

        let wrong = fixture("p2", "r3k3/8/7p/3N4/8/8/8/4K3 w - - 0 2", "d5c7", "SKEWER");
        assert!(matches!(validate_fixture(&wrong), ValidationOutcome::Missed { .. }));

        let trapped = fixture("t1", "r3k3/8/7p/3N4/8/8/8/4K3 w - - 0 2", "d5c7", "TRAPPED_PIECE");
        assert_eq!(validate_fixture(&trapped), ValidationOutcome::Unsupported);

        let broken = fixture("b1", "r3k3/8/7p/3N4/8/8/8/4K3 w - - 0 2", "d5d7", "FORK");
        assert!(matches!(validate_fixture(&broken), ValidationOutcome::Invalid(_)));
    }

    #[test]
    fn test_validate_file_report() {
        let file = FixtureFile::new(
            "fork",
            vec![
                fixture("f1", "r3k3/8/7p/3N4/8/8/8/4K3 w - - 0 2", "d5c7", "FORK"),
                fixture("f2", "4k3/8/8/8/8/8/8/K2R4 w - - 0 1", "d1d2", "FORK"),
                fixture("f3", "4k3/8/8/8/8/8/8/K2R4 w - - 0 1", "d1d2", "OVERLOADING"),
            ],
        );
        let report = validate_file(&file);
        assert_eq!(report.total, 3);
        assert_eq!(report.matched, 1);
        assert_eq!(report.missed, 1);
        assert_eq!(report.unsupported, 1);
        assert_eq!(report.failures[0].0, "f2");
        assert!((report.match_rate() - 0.5).abs() < f64::EPSILON);
    }
}
