//! Full legal move generation pipeline.
//!
//! Walks the live-piece list of the side to move and dispatches to the
//! per-piece generators. Candidates are filtered against the position's
//! attack, pin and check data as they are produced, so every emitted move is
//! legal. In double check only the king is visited.

use std::ops::ControlFlow;

use crate::game_state::chess_types::*;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_slider::generate_slider_moves;
use crate::move_generation::move_generator::MoveGenerator;
use crate::moves::move_descriptions::Move;

/// Feed every legal move of the side to move into `sink` until it breaks.
pub fn for_each_legal_move<S>(game_state: &GameState, sink: &mut S) -> ControlFlow<()>
where
    S: FnMut(Move) -> ControlFlow<()>,
{
    if !game_state.double_check {
        let side = game_state.side_to_move;
        for (_, from) in game_state.live_pieces(side) {
            let Some(piece) = game_state.piece_on(from) else {
                continue;
            };
            match piece.kind() {
                PieceKind::Pawn => generate_pawn_moves(game_state, from, sink)?,
                PieceKind::Knight => generate_knight_moves(game_state, from, sink)?,
                PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
                    generate_slider_moves(game_state, piece.kind(), from, sink)?
                }
                PieceKind::King => {}
            }
        }
    }

    generate_king_moves(game_state, sink)
}

/// All legal moves for the side to move. Order is not significant.
pub fn generate_moves(game_state: &GameState) -> Vec<Move> {
    let mut out = Vec::with_capacity(64);
    generate_moves_into(game_state, &mut out);
    out
}

/// Append all legal moves to `out`, reusing its allocation.
pub fn generate_moves_into(game_state: &GameState, out: &mut Vec<Move>) {
    let _ = for_each_legal_move(game_state, &mut |mv| {
        out.push(mv);
        ControlFlow::Continue(())
    });
}

/// Stops at the first legal move found.
pub fn legal_moves_exist(game_state: &GameState) -> bool {
    for_each_legal_move(game_state, &mut |_| ControlFlow::Break(())).is_break()
}

/// Number of legal moves without collecting them.
pub fn count_legal_moves(game_state: &GameState) -> usize {
    let mut count = 0;
    let _ = for_each_legal_move(game_state, &mut |_| {
        count += 1;
        ControlFlow::Continue(())
    });
    count
}

/// Default generator behind the `MoveGenerator` seam.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegalMoveGenerator;

impl MoveGenerator for LegalMoveGenerator {
    fn generate_legal_moves(&self, game_state: &GameState) -> Vec<Move> {
        generate_moves(game_state)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;

    #[test]
    fn starting_position_has_twenty_moves() {
        let game = GameState::new_game();
        assert_eq!(generate_moves(&game).len(), 20);
        assert_eq!(count_legal_moves(&game), 20);
        assert!(legal_moves_exist(&game));
    }

    #[test]
    fn double_check_allows_only_king_moves() {
        let game = GameState::from_fen("4k3/8/8/8/1b6/3n4/7P/R3K3 w Q - 0 1").expect("FEN should parse");
        assert!(game.is_double_check());
        let king = game.king_square(Color::Light);
        let moves = generate_moves(&game);
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|mv| mv.start() == king));
    }

    #[test]
    fn checkmated_side_has_no_moves() {
        let game = GameState::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1").expect("FEN should parse");
        assert!(game.is_check());
        assert!(!legal_moves_exist(&game));
        assert!(generate_moves(&game).is_empty());
    }

    #[test]
    fn generated_moves_are_unique() {
        let game = GameState::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .expect("FEN should parse");
        let moves = generate_moves(&game);
        assert_eq!(moves.len(), 48);
        let mut bits: Vec<u32> = moves.iter().map(|m| m.bits()).collect();
        bits.sort_unstable();
        bits.dedup();
        assert_eq!(bits.len(), 48);
    }

    #[test]
    fn pinned_pieces_move_only_along_their_line() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut game = GameState::from_fen(STARTING_POSITION_FEN).expect("FEN should parse");

        for _ in 0..400 {
            let moves = generate_moves(&game);
            if moves.is_empty() || game.is_game_over() {
                game = GameState::new_game();
                continue;
            }

            let side = game.side_to_move();
            for mv in &moves {
                for &line in game.pin_lines(side) {
                    if line & square_bit(mv.start()) != 0 && mv.start() != game.king_square(side) {
                        assert_ne!(line & square_bit(mv.end()), 0, "{mv} leaves its pin line");
                    }
                }
            }

            let mv = moves[rng.random_range(0..moves.len())];
            game.apply_move(mv);
        }
    }

    #[test]
    fn trait_object_generates_the_same_moves() {
        let game = GameState::new_game();
        let generator: Box<dyn MoveGenerator> = Box::new(LegalMoveGenerator);
        assert_eq!(generator.generate_legal_moves(&game), generate_moves(&game));
    }
}
