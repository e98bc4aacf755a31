//! Command-line perft runner.
//!
//! Usage:
//! `cargo run --release --bin perft`
//! `cargo run --release --bin perft -- --depth 5 --divide`
//! `cargo run --release --bin perft -- --fen "<FEN>" --depth 3 --detailed --threads`
//! `cargo run --release --bin perft -- --seed 42`

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use chess_core::game_state::chess_rules::STARTING_POSITION_FEN;
use chess_core::game_state::game_state::GameState;
use chess_core::move_generation::legal_move_generator::LegalMoveGenerator;
use chess_core::move_generation::move_generator::MoveGenerator;
use chess_core::move_generation::perft::{
    perft, perft_detailed, perft_divide, perft_multi_threaded, PerftCounts,
};
use chess_core::search::zobrist::{initialize_with_seed, DEFAULT_ZOBRIST_SEED};
use chess_core::utils::render_game_state::render_game_state;

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn parse_arg_u8(args: &[String], flag: &str, default: u8) -> Result<u8, String> {
    match arg_value(args, flag) {
        Some(v) => v
            .parse::<u8>()
            .map_err(|_| format!("invalid value for {flag}: {v}")),
        None => Ok(default),
    }
}

fn parse_arg_u64(args: &[String], flag: &str, default: u64) -> Result<u64, String> {
    match arg_value(args, flag) {
        Some(v) => v
            .parse::<u64>()
            .map_err(|_| format!("invalid value for {flag}: {v}")),
        None => Ok(default),
    }
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|arg| arg == flag)
}

fn print_counts(counts: &PerftCounts) {
    println!(
        "captures={} en_passant={} castles={} promotions={} checks={} double_checks={} checkmates={}",
        counts.captures,
        counts.en_passant,
        counts.castles,
        counts.promotions,
        counts.checks,
        counts.double_checks,
        counts.checkmates
    );
}

fn run() -> Result<(), String> {
    let args: Vec<String> = std::env::args().collect();
    let depth = parse_arg_u8(&args, "--depth", 4)?;
    let seed = parse_arg_u64(&args, "--seed", DEFAULT_ZOBRIST_SEED)?;
    let fen = arg_value(&args, "--fen").unwrap_or_else(|| STARTING_POSITION_FEN.to_owned());

    if !initialize_with_seed(seed) {
        return Err("zobrist keys were initialized before the seed was applied".to_owned());
    }

    let mut game = GameState::from_fen(&fen).map_err(|e| e.to_string())?;

    println!(
        "perft run: started={} depth={depth} seed={seed:#x}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!("fen: {}", game.get_fen());
    println!("{}", render_game_state(&game));

    let start = Instant::now();
    let nodes = if has_flag(&args, "--divide") {
        let divide = perft_divide(&mut game, depth);
        for (mv, count) in &divide {
            println!("{mv}: {count}");
        }
        println!("moves: {}", divide.len());
        divide.iter().map(|(_, count)| count).sum()
    } else if has_flag(&args, "--threads") {
        let generator: Arc<dyn MoveGenerator> = Arc::new(LegalMoveGenerator);
        let counts = perft_multi_threaded(generator, &game, depth).map_err(|e| e.to_string())?;
        print_counts(&counts);
        counts.nodes
    } else if has_flag(&args, "--detailed") {
        let counts = perft_detailed(&LegalMoveGenerator, &mut game, depth);
        print_counts(&counts);
        counts.nodes
    } else {
        perft(&mut game, depth)
    };
    let elapsed = start.elapsed();

    let elapsed_ms = elapsed.as_millis();
    let nps = if elapsed.as_secs_f64() > 0.0 {
        (nodes as f64 / elapsed.as_secs_f64()) as u64
    } else {
        0
    };
    println!("nodes={nodes} elapsed_ms={elapsed_ms} nps={nps}");
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}
