//! Builds and checks tactic fixtures from the Lichess puzzle database
//!
//! Expects the decompressed `lichess_db_puzzle.csv` from
//! https://database.lichess.org/.

use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::process;

use chess_tutor_core::puzzles::{
    extract_for_pattern, is_configured, save_fixtures, to_fixture, validate_dir, write_marker, PuzzleCsv,
    QualityFilter, DEFAULT_PUZZLES_PER_PATTERN, PATTERN_THEMES,
};
use chess_tutor_core::Result;
use tracing::warn;

fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args: Vec<String> = env::args().collect();
    let outcome = match args.get(1).map(String::as_str) {
        Some("extract") if args.len() >= 4 => match parse_extract_flags(&args[4..]) {
            Some((max, force)) => extract(Path::new(&args[2]), Path::new(&args[3]), max, force),
            None => {
                print_usage(&args[0]);
                process::exit(1);
            }
        },
        Some("validate") if args.len() >= 3 => validate(Path::new(&args[2])),
        _ => {
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    if let Err(e) = outcome {
        println!("[ERROR] {}", e);
        process::exit(1);
    }
}

fn print_usage(program: &str) {
    println!("Usage: {} <command> [arguments]", program);
    println!();
    println!("Commands:");
    println!("  extract <puzzles.csv> <out-dir> [--max N] [--force]   Write one fixture file per pattern");
    println!("  validate <fixture-dir>                                Check fixtures against the detector");
}

/// `--max N` and `--force`, in any order.
fn parse_extract_flags(flags: &[String]) -> Option<(usize, bool)> {
    let mut max = DEFAULT_PUZZLES_PER_PATTERN;
    let mut force = false;
    let mut iter = flags.iter();
    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--force" => force = true,
            "--max" => max = iter.next()?.parse().ok()?,
            _ => return None,
        }
    }
    Some((max, force))
}

fn extract(csv: &Path, out_dir: &Path, max: usize, force: bool) -> Result<()> {
    if is_configured(out_dir) && !force {
        println!("[WARN] Tactical puzzles are already configured in {}", out_dir.display());
        println!("   Re-run with --force to regenerate them.");
        return Ok(());
    }

    println!("Configuration: {} puzzles per pattern", max);
    let filter = QualityFilter::default();
    let mut total = 0;

    for (pattern, themes) in PATTERN_THEMES {
        // the database is re-read per pattern so each scan can stop at the cap
        let rows = PuzzleCsv::new(BufReader::new(File::open(csv)?))?;
        let puzzles = extract_for_pattern(rows, themes, &filter, max);
        if puzzles.is_empty() {
            println!("[WARN] No puzzles found for {}", pattern.to_uppercase());
            continue;
        }

        let fixtures: Vec<_> = puzzles
            .iter()
            .filter_map(|row| match to_fixture(row, pattern) {
                Ok(fixture) => Some(fixture),
                Err(e) => {
                    warn!(puzzle = %row.id, error = %e, "skipping puzzle");
                    None
                }
            })
            .collect();

        if !fixtures.is_empty() {
            total += fixtures.len();
            let path = save_fixtures(out_dir, pattern, fixtures)?;
            println!("[OK] {} -> {}", pattern.to_uppercase(), path.display());
        }
    }

    write_marker(out_dir)?;
    println!();
    println!("[OK] Setup complete! {} tactical puzzles are ready to use.", total);
    Ok(())
}

fn validate(dir: &Path) -> Result<()> {
    for (pattern, report) in validate_dir(dir)? {
        println!("----------------------------------------");
        println!("{}", pattern.to_uppercase());
        println!(
            "   {} cases: {} matched, {} missed, {} invalid, {} unsupported",
            report.total, report.matched, report.missed, report.invalid, report.unsupported
        );
        if report.unsupported < report.total {
            println!("   Match rate: {:.0}%", report.match_rate() * 100.0);
        }
        for (id, reason) in report.failures.iter().take(5) {
            println!("   {}: {}", id, reason);
        }
    }
    Ok(())
}
