//! Command-line front end for the tactic explainer

use std::env;
use std::process;

use chess_tutor_core::engine::{PositionEvaluator, StockfishEngine};
use chess_tutor_core::notation::{parse_color, parse_fen, resolve_uci};
use chess_tutor_core::parser::parse_pgn_file;
use chess_tutor_core::{
    explain_move, DetectedTactic, GameReviewer, LichessClient, MissedMove, Result, TacticDetector, TutorConfig,
};
use shakmaty::Position;

fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    println!("Chess Tutor");
    println!("==================");
    println!();

    let args: Vec<String> = env::args().collect();
    let config = TutorConfig::from_env();

    if args.len() < 2 {
        print_usage(&args[0]);
        process::exit(1);
    }

    let outcome = match args[1].as_str() {
        "explain" => {
            if args.len() < 5 {
                println!("Usage: {} explain \"<fen>\" <played-san> <best-uci> [cp-loss]", args[0]);
                process::exit(1);
            }
            explain(&config, &args[2], &args[3], &args[4], args.get(5).map(String::as_str))
        }
        "review" => {
            if args.len() < 4 {
                println!("Usage: {} review <pgn_file> <white|black>", args[0]);
                process::exit(1);
            }
            review_games(&config, &args[2], &args[3])
        }
        "cloud" => {
            if args.len() < 3 {
                println!("Usage: {} cloud \"<fen>\"", args[0]);
                process::exit(1);
            }
            cloud(&args[2])
        }
        "test-engine" => test_engine(&config),
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
    println!("  explain \"<fen>\" <played> <best> [cp]   Explain why <best> beat <played>");
    println!("  review <pgn_file> <white|black>        Review one side's moves with Stockfish");
    println!("  cloud \"<fen>\"                          Ask Lichess for the best move and explain it");
    println!("  test-engine                            Test Stockfish connection");
    println!();
    println!("Examples:");
    println!("  {} explain \"4k3/8/8/3q4/8/8/8/3RK3 w - - 0 1\" Kf2 d1d5 900", program);
    println!("  {} review games.pgn white", program);
}

fn print_tactics(tactics: &[DetectedTactic]) {
    if tactics.is_empty() {
        println!("   No concrete tactic found; the difference is positional.");
        return;
    }
    for tactic in tactics {
        println!("   - {}", tactic.summary());
    }
}

fn explain(config: &TutorConfig, fen: &str, played: &str, best: &str, cp: Option<&str>) -> Result<()> {
    let position = parse_fen(fen)?;
    let cp_loss = match cp {
        Some(raw) => match raw.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                println!("[WARN] ignoring centipawn loss '{}'", raw);
                None
            }
        },
        None => None,
    };

    let detector = TacticDetector::with_threshold(config.loss_threshold);
    let tactics = detector.detect(&MissedMove {
        fen,
        mover: position.turn(),
        played,
        recommended: best,
        cp_loss,
    });

    println!("Played {}, engine preferred {}", played, best);
    print_tactics(&tactics);
    Ok(())
}

fn review_games(config: &TutorConfig, file_path: &str, side: &str) -> Result<()> {
    let Some(player) = parse_color(side) else {
        println!("[ERROR] side must be white or black, got '{}'", side);
        process::exit(1);
    };

    println!("Loading: {}", file_path);
    let games = parse_pgn_file(file_path)?;
    println!("[OK] Found {} game(s)", games.len());
    println!();

    let engine = StockfishEngine::new(&config.stockfish_path)?;
    println!("[OK] Stockfish engine ready");
    println!();

    let detector = TacticDetector::with_threshold(config.loss_threshold);
    let mut reviewer = GameReviewer::new(engine, config.depth).with_detector(detector);

    for (index, game) in games.iter().enumerate() {
        println!("================================================================");
        println!("Game {}: {}", index + 1, game.summary());
        println!("================================================================");

        let reviews = reviewer.review_game(game.start_fen.as_deref(), &game.moves, player)?;
        let mut flagged = 0;
        for review in reviews.iter().filter(|r| r.severity.is_some()) {
            flagged += 1;
            println!("   {}", review.description());
            print_tactics(&review.tactics);
        }
        println!("   {} of {} moves flagged", flagged, reviews.len());
        println!();
    }

    println!("[OK] Review complete!");
    Ok(())
}

fn cloud(fen: &str) -> Result<()> {
    let position = parse_fen(fen)?;
    let runtime = tokio::runtime::Runtime::new()?;

    let client = LichessClient::new()?;
    let eval = runtime.block_on(client.cloud_eval(fen, 1))?;
    let analysis = eval.into_analysis(position.turn())?;

    println!("----------------------------------------");
    println!("   {}", analysis.summary());
    println!("----------------------------------------");

    if analysis.best_move.is_empty() {
        return Ok(());
    }
    let best = resolve_uci(&position, &analysis.best_move)?;
    print_tactics(&explain_move(&position, &best)?);
    Ok(())
}

fn test_engine(config: &TutorConfig) -> Result<()> {
    println!("Testing Stockfish connection...");
    println!();

    let mut engine = match StockfishEngine::new(&config.stockfish_path) {
        Ok(engine) => engine,
        Err(e) => {
            println!("[ERROR] Failed to start Stockfish: {}", e);
            println!();
            println!("Make sure Stockfish is installed or set STOCKFISH_PATH:");
            println!("  sudo apt install stockfish");
            process::exit(1);
        }
    };
    println!("[OK] Stockfish started successfully!");
    println!();

    println!("Analyzing tactical position...");
    let tactical_fen = "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4";
    let analysis = engine.evaluate(tactical_fen, config.depth)?;
    println!("   Position: Scholar's Mate threat");
    println!("   Best move: {} (should be h5f7)", analysis.best_move);
    println!("   Evaluation: {}", analysis.evaluation);

    println!();
    println!("[OK] Engine test complete!");
    Ok(())
}
