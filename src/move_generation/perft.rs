//! Move-path enumeration for correctness checking and benchmarking.
//!
//! All variants walk the tree with in-place make/unmake. `perft` counts
//! leaves in bulk at the last ply; `perft_detailed` applies every leaf move to
//! classify it; `perft_multi_threaded` gives each root move its own cloned
//! position on a worker thread.

use std::sync::Arc;
use std::thread;

use crate::errors::PerftError;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_generator::{count_legal_moves, generate_moves_into};
use crate::move_generation::move_generator::MoveGenerator;
use crate::moves::move_descriptions::{Move, MoveKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub en_passant: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub double_checks: u64,
    pub checkmates: u64,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.double_checks += rhs.double_checks;
        self.checkmates += rhs.checkmates;
    }
}

/// Leaf count at `depth`.
pub fn perft(game_state: &mut GameState, depth: u8) -> u64 {
    let mut buffers: Vec<Vec<Move>> = vec![Vec::with_capacity(64); depth as usize];
    perft_recurse(game_state, depth, &mut buffers)
}

fn perft_recurse(game_state: &mut GameState, depth: u8, buffers: &mut [Vec<Move>]) -> u64 {
    match depth {
        0 => return 1,
        1 => return count_legal_moves(game_state) as u64,
        _ => {}
    }

    let Some((moves, rest)) = buffers.split_first_mut() else {
        return 0;
    };
    moves.clear();
    generate_moves_into(game_state, moves);

    let mut nodes = 0;
    for &mv in moves.iter() {
        game_state.apply_move(mv);
        nodes += perft_recurse(game_state, depth - 1, rest);
        game_state.undo_move(mv);
    }
    nodes
}

/// Leaf count below each root move, in generation order.
pub fn perft_divide(game_state: &mut GameState, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }

    let mut root = Vec::with_capacity(64);
    generate_moves_into(game_state, &mut root);

    let mut buffers: Vec<Vec<Move>> = vec![Vec::with_capacity(64); depth as usize];
    root.into_iter()
        .map(|mv| {
            game_state.apply_move(mv);
            let nodes = perft_recurse(game_state, depth - 1, &mut buffers);
            game_state.undo_move(mv);
            (mv, nodes)
        })
        .collect()
}

/// Leaf count plus classification of the moves played at the last ply.
pub fn perft_detailed<G: MoveGenerator + ?Sized>(
    generator: &G,
    game_state: &mut GameState,
    depth: u8,
) -> PerftCounts {
    let mut counts = PerftCounts::default();
    if depth == 0 {
        counts.nodes = 1;
        return counts;
    }
    detailed_recurse(generator, game_state, depth, &mut counts);
    counts
}

pub fn perft_multi_threaded(
    generator: Arc<dyn MoveGenerator>,
    game_state: &GameState,
    depth: u8,
) -> Result<PerftCounts, PerftError> {
    if depth == 0 {
        return Ok(PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        });
    }

    let root_moves = generator.generate_legal_moves(game_state);
    let mut handles = Vec::with_capacity(root_moves.len());

    for mv in root_moves {
        let generator_ref = Arc::clone(&generator);
        let mut local_state = game_state.clone();
        handles.push(thread::spawn(move || {
            let mut local = PerftCounts::default();
            if depth == 1 {
                record_leaf(&mut local_state, mv, &mut local);
            } else {
                local_state.apply_move(mv);
                detailed_recurse(generator_ref.as_ref(), &mut local_state, depth - 1, &mut local);
            }
            local
        }));
    }

    let mut total = PerftCounts::default();
    for handle in handles {
        let local = handle.join().map_err(|_| PerftError::WorkerPanicked)?;
        total.merge(local);
    }

    Ok(total)
}

fn detailed_recurse<G: MoveGenerator + ?Sized>(
    generator: &G,
    game_state: &mut GameState,
    depth: u8,
    counts: &mut PerftCounts,
) {
    let moves = generator.generate_legal_moves(game_state);
    for mv in moves {
        if depth == 1 {
            record_leaf(game_state, mv, counts);
        } else {
            game_state.apply_move(mv);
            detailed_recurse(generator, game_state, depth - 1, counts);
            game_state.undo_move(mv);
        }
    }
}

fn record_leaf(game_state: &mut GameState, mv: Move, counts: &mut PerftCounts) {
    counts.nodes += 1;
    match mv.kind() {
        MoveKind::EnPassant => {
            counts.captures += 1;
            counts.en_passant += 1;
        }
        MoveKind::Castle => counts.castles += 1,
        MoveKind::Promotion => counts.promotions += 1,
        MoveKind::Normal => {}
    }
    if mv.kind() != MoveKind::EnPassant && game_state.piece_on(mv.end()).is_some() {
        counts.captures += 1;
    }

    game_state.apply_move(mv);
    if game_state.is_check() {
        counts.checks += 1;
    }
    if game_state.is_double_check() {
        counts.double_checks += 1;
    }
    if game_state.game_over_reason() == Some(GameOverReason::Checkmate) {
        counts.checkmates += 1;
    }
    game_state.undo_move(mv);
}
