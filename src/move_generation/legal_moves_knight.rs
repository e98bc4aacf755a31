use std::ops::ControlFlow;

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_legal_destination;
use crate::moves::geometry::geometry;
use crate::moves::move_descriptions::Move;

pub fn generate_knight_moves<S>(
    game_state: &GameState,
    from: Square,
    sink: &mut S,
) -> ControlFlow<()>
where
    S: FnMut(Move) -> ControlFlow<()>,
{
    let own_occ = game_state.occupancy(game_state.side_to_move);
    let mut targets = geometry().knight_attacks(from) & !own_occ;

    while targets != 0 {
        let to = targets.trailing_zeros() as Square;
        if is_legal_destination(game_state, from, to) {
            sink(Move::normal(from, to))?;
        }
        targets &= targets - 1;
    }

    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinned_knight_has_no_moves() {
        let game = GameState::from_fen("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1").expect("FEN should parse");
        let mut count = 0;
        let _ = generate_knight_moves(&game, 52, &mut |_| {
            count += 1;
            ControlFlow::Continue(())
        });
        assert_eq!(count, 0);
    }

    #[test]
    fn corner_knight_skips_own_pieces() {
        let game = GameState::from_fen("4k3/8/8/8/8/1P6/8/N3K3 w - - 0 1").expect("FEN should parse");
        let mut out = Vec::new();
        let _ = generate_knight_moves(&game, 56, &mut |mv| {
            out.push(mv.to_string());
            ControlFlow::Continue(())
        });
        assert_eq!(out, vec!["a1c2"]);
    }
}
