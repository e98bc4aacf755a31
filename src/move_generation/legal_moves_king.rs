use std::ops::ControlFlow;

use crate::game_state::chess_rules::CASTLING_SIDES;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::{can_castle, is_legal_king_destination};
use crate::moves::geometry::geometry;
use crate::moves::move_descriptions::{Move, MoveKind};

pub fn generate_king_moves<S>(game_state: &GameState, sink: &mut S) -> ControlFlow<()>
where
    S: FnMut(Move) -> ControlFlow<()>,
{
    let side = game_state.side_to_move;
    let from = game_state.king_square(side);

    let mut targets = geometry().king_attacks(from) & !game_state.occupancy(side);
    while targets != 0 {
        let to = targets.trailing_zeros() as Square;
        if is_legal_king_destination(game_state, to) {
            sink(Move::normal(from, to))?;
        }
        targets &= targets - 1;
    }

    generate_castling_moves(game_state, sink)
}

fn generate_castling_moves<S>(game_state: &GameState, sink: &mut S) -> ControlFlow<()>
where
    S: FnMut(Move) -> ControlFlow<()>,
{
    let side = game_state.side_to_move;
    for castling in &CASTLING_SIDES[side.index()] {
        if can_castle(game_state, castling) {
            sink(Move::new(
                castling.king_from,
                castling.king_to,
                MoveKind::Castle,
                None,
            ))?;
        }
    }
    ControlFlow::Continue(())
}
