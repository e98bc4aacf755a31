//! Legality filter driven by the position's attack, pin and check data.
//!
//! No candidate is ever applied to test it. A king may step onto any square
//! the enemy attack map leaves free; every other piece must respect double
//! check, the check line and its pin line.

use crate::game_state::chess_rules::CastlingSide;
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_apply::en_passant_capture_square;
use crate::moves::geometry::{geometry, step, QUEEN_DIRECTIONS};

/// Whether a non-king piece of the side to move may go from `from` to `to`.
#[inline]
pub fn is_legal_destination(game_state: &GameState, from: Square, to: Square) -> bool {
    if game_state.double_check {
        return false;
    }
    if game_state.checkers != 0 && game_state.check_line & square_bit(to) == 0 {
        return false;
    }
    respects_pins(game_state, from, to)
}

/// A piece standing on a pin line may only move along that line.
#[inline]
pub fn respects_pins(game_state: &GameState, from: Square, to: Square) -> bool {
    game_state
        .pin_lines(game_state.side_to_move)
        .iter()
        .all(|&line| line & square_bit(from) == 0 || line & square_bit(to) != 0)
}

/// Whether the king of the side to move may step to `to`.
#[inline]
pub fn is_legal_king_destination(game_state: &GameState, to: Square) -> bool {
    let us = game_state.side_to_move;
    let bit = square_bit(to);
    game_state.occupancy(us) & bit == 0 && game_state.attack_map(us.opposite()) & bit == 0
}

/// En passant removes two pieces from one rank, so besides the usual check
/// and pin tests the king's rays are rescanned with the post-capture occupancy.
pub fn is_legal_en_passant(game_state: &GameState, from: Square, to: Square) -> bool {
    if game_state.double_check {
        return false;
    }

    let captured = en_passant_capture_square(from, to);
    if game_state.checkers != 0
        && game_state.check_line & square_bit(to) == 0
        && game_state.checkers != square_bit(captured)
    {
        return false;
    }
    if !respects_pins(game_state, from, to) {
        return false;
    }

    let occupied = (game_state.occupancy_all() & !square_bit(from) & !square_bit(captured))
        | square_bit(to);
    !king_exposed_with_occupancy(game_state, occupied, square_bit(captured))
}

/// Whether an enemy slider would see the king of the side to move if the
/// board held `occupied` instead, ignoring enemy pieces in `removed`.
fn king_exposed_with_occupancy(game_state: &GameState, occupied: u64, removed: u64) -> bool {
    let g = geometry();
    let us = game_state.side_to_move;
    let king = game_state.king_square(us);
    let enemy = game_state.occupancy(us.opposite()) & !removed;

    for dir in QUEEN_DIRECTIONS {
        let mut target = king;
        for _ in 0..g.edge_distance(dir, king) {
            target = step(target, dir);
            let bit = square_bit(target);
            if occupied & bit == 0 {
                continue;
            }
            if enemy & bit != 0 {
                if let Some(piece) = game_state.piece_on(target) {
                    let slides = match piece.kind() {
                        PieceKind::Queen => true,
                        PieceKind::Rook => dir < 4,
                        PieceKind::Bishop => dir >= 4,
                        _ => false,
                    };
                    if slides {
                        return true;
                    }
                }
            }
            break;
        }
    }
    false
}

/// Castling needs the right, an empty path, no check and an unattacked
/// transit and landing square.
pub fn can_castle(game_state: &GameState, side: &CastlingSide) -> bool {
    let them = game_state.side_to_move.opposite();
    game_state.castling_rights & side.right != 0
        && game_state.checkers == 0
        && game_state.occupancy_all() & side.must_be_empty == 0
        && game_state.attack_map(them) & side.king_path == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_rules::CASTLING_SIDES;
    use crate::utils::algebraic::algebraic_to_square;

    fn sq(text: &str) -> Square {
        algebraic_to_square(text).expect("valid square")
    }

    #[test]
    fn pinned_piece_stays_on_its_line() {
        let game = GameState::from_fen("4k3/8/8/8/8/2b5/3B4/4K3 w - - 0 1").expect("FEN should parse");
        assert!(!is_legal_destination(&game, sq("d2"), sq("e3")));
        assert!(is_legal_destination(&game, sq("d2"), sq("c3")));
    }

    #[test]
    fn check_must_be_blocked_or_captured() {
        let game = GameState::from_fen("4k3/4r3/8/8/8/8/1B6/4K1N1 w - - 0 1").expect("FEN should parse");
        assert!(game.is_check());
        assert!(is_legal_destination(&game, sq("g1"), sq("e2")));
        assert!(!is_legal_destination(&game, sq("g1"), sq("f3")));
        assert!(!is_legal_king_destination(&game, sq("e2")));
        assert!(is_legal_king_destination(&game, sq("d1")));
    }

    #[test]
    fn king_cannot_retreat_along_checking_ray() {
        let game = GameState::from_fen("4k3/8/8/8/r3K3/8/8/8 w - - 0 1").expect("FEN should parse");
        assert!(!is_legal_king_destination(&game, sq("f4")));
        assert!(is_legal_king_destination(&game, sq("e3")));
    }

    #[test]
    fn en_passant_that_exposes_the_king_on_its_rank_is_illegal() {
        let game =
            GameState::from_fen("8/8/8/KPp4r/8/8/8/4k3 w - c6 0 2").expect("FEN should parse");
        assert!(!is_legal_en_passant(&game, sq("b5"), sq("c6")));

        let open =
            GameState::from_fen("8/8/8/1Pp4r/K7/8/8/4k3 w - c6 0 2").expect("FEN should parse");
        assert!(is_legal_en_passant(&open, sq("b5"), sq("c6")));
    }

    #[test]
    fn en_passant_may_capture_the_checking_pawn() {
        let game =
            GameState::from_fen("8/8/8/2pP4/3K4/8/8/7k w - c6 0 2").expect("FEN should parse");
        assert!(game.is_check());
        assert!(is_legal_en_passant(&game, sq("d5"), sq("c6")));
    }

    #[test]
    fn castling_through_attack_is_refused() {
        let game = GameState::from_fen("4k3/8/8/8/8/8/5r2/R3K2R w KQ - 0 1").expect("FEN should parse");
        let light = &CASTLING_SIDES[Color::Light.index()];
        assert!(!can_castle(&game, &light[0]));
        assert!(can_castle(&game, &light[1]));
    }
}
