//! Bishop, rook and queen moves: step along each direction until the board
//! edge or the first occupied square, which is included only if it holds an
//! enemy piece.

use std::ops::ControlFlow;

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_legal_destination;
use crate::moves::geometry::{geometry, slider_directions, step};
use crate::moves::move_descriptions::Move;

pub fn generate_slider_moves<S>(
    game_state: &GameState,
    kind: PieceKind,
    from: Square,
    sink: &mut S,
) -> ControlFlow<()>
where
    S: FnMut(Move) -> ControlFlow<()>,
{
    let g = geometry();
    let own_occ = game_state.occupancy(game_state.side_to_move);
    let occupied = game_state.occupancy_all();

    for &dir in slider_directions(kind) {
        let mut to = from;
        for _ in 0..g.edge_distance(dir, from) {
            to = step(to, dir);
            let bit = square_bit(to);
            if own_occ & bit != 0 {
                break;
            }
            if is_legal_destination(game_state, from, to) {
                sink(Move::normal(from, to))?;
            }
            if occupied & bit != 0 {
                break;
            }
        }
    }

    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slider_moves(fen: &str, kind: PieceKind, from: Square) -> Vec<String> {
        let game = GameState::from_fen(fen).expect("FEN should parse");
        let mut out = Vec::new();
        let _ = generate_slider_moves(&game, kind, from, &mut |mv| {
            out.push(mv.to_string());
            ControlFlow::Continue(())
        });
        out.sort();
        out
    }

    #[test]
    fn rook_stops_before_own_king() {
        let moves = slider_moves("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", PieceKind::Rook, 56);
        // a-file up to a8 and b1..d1.
        assert_eq!(moves.len(), 10);
        assert!(moves.contains(&"a1a8".to_owned()));
        assert!(!moves.contains(&"a1e1".to_owned()));
    }

    #[test]
    fn pinned_bishop_slides_only_along_the_pin() {
        let moves = slider_moves("4k3/8/8/8/8/2b5/3B4/4K3 w - - 0 1", PieceKind::Bishop, 51);
        assert_eq!(moves, vec!["d2c3"]);
    }

    #[test]
    fn queen_in_check_only_blocks_or_captures() {
        let moves = slider_moves("4k3/4r3/8/8/8/8/8/Q3K3 w - - 0 1", PieceKind::Queen, 56);
        assert_eq!(moves, vec!["a1e5"]);
    }
}
