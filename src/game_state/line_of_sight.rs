//! Attack bitboards, pin lines and check status.
//!
//! Each live piece owns a line of sight: leapers read their reachability set
//! from the geometry tables, sliders step outward until the first occupied
//! square (inclusive). A slider sees through the opposing king so the king
//! can never retreat along the ray that attacks it.

use crate::game_state::chess_types::*;
use crate::game_state::piece::Piece;
use crate::moves::geometry::{geometry, slider_directions, slides_along, step};

/// Squares attacked by `piece` standing on `square`, given current occupancy.
pub fn line_of_sight(game_state: &GameState, piece: Piece, square: Square) -> u64 {
    let g = geometry();
    match piece.kind() {
        PieceKind::Pawn => g.pawn_attacks(piece.color(), square),
        PieceKind::Knight => g.knight_attacks(square),
        PieceKind::King => g.king_attacks(square),
        kind => {
            let occupied = game_state.occupancy_all();
            let enemy_king = game_state.king_square(piece.color().opposite());
            let mut seen = 0u64;
            for &dir in slider_directions(kind) {
                let mut target = square;
                for _ in 0..g.edge_distance(dir, square) {
                    target = step(target, dir);
                    seen |= square_bit(target);
                    if occupied & square_bit(target) != 0 && target != enemy_king {
                        break;
                    }
                }
            }
            seen
        }
    }
}

/// Recompute every line of sight that crosses `changed`, plus any piece
/// standing on a changed square, then rebuild both attack maps.
pub fn refresh_attacks(game_state: &mut GameState, changed: u64) {
    for color in [Color::Light, Color::Dark] {
        let c = color.index();
        let mut map = 0u64;
        for slot in 0..game_state.piece_squares[c].len() {
            let Some(sq) = game_state.piece_squares[c][slot] else {
                game_state.attacks[c][slot] = 0;
                continue;
            };
            if (game_state.attacks[c][slot] | square_bit(sq)) & changed != 0 {
                if let Some(piece) = game_state.board[sq as usize] {
                    let seen = line_of_sight(game_state, piece, sq);
                    game_state.attacks[c][slot] = seen;
                }
            }
            map |= game_state.attacks[c][slot];
        }
        game_state.attack_map[c] = map;
    }
}

/// Rebuild pin lines for both colors.
///
/// A pin line runs from an enemy slider to the king (both inclusive) when
/// exactly one piece stands between them and it belongs to the king's side.
pub fn refresh_pin_lines(game_state: &mut GameState) {
    let g = geometry();
    let occupied = game_state.occupancy_all();

    for color in [Color::Light, Color::Dark] {
        let mut lines = std::mem::take(&mut game_state.pin_lines[color.index()]);
        lines.clear();

        let king = game_state.king_square(color);
        let own = game_state.occupancy(color);
        for (_, sq) in game_state.live_pieces(color.opposite()) {
            let Some(piece) = game_state.piece_on(sq) else {
                continue;
            };
            if !piece.kind().is_slider() {
                continue;
            }
            let Some(dir) = g.direction_between(sq, king) else {
                continue;
            };
            if !slides_along(piece.kind(), dir) {
                continue;
            }
            let between = g.between(sq, king);
            let blockers = between & occupied;
            if blockers.count_ones() == 1 && blockers & own != 0 {
                lines.push(between | square_bit(sq) | square_bit(king));
            }
        }

        game_state.pin_lines[color.index()] = lines;
    }
}

/// Rebuild checkers, check line and double-check for the side to move.
pub fn refresh_check(game_state: &mut GameState) {
    let g = geometry();
    let us = game_state.side_to_move;
    let them = us.opposite().index();
    let king = game_state.king_square(us);
    let king_bit = square_bit(king);

    let mut checkers = 0u64;
    if game_state.attack_map[them] & king_bit != 0 {
        for (slot, sq) in game_state.live_pieces(us.opposite()) {
            if game_state.attacks[them][slot] & king_bit != 0 {
                checkers |= square_bit(sq);
            }
        }
    }

    game_state.checkers = checkers;
    game_state.double_check = checkers.count_ones() >= 2;
    game_state.check_line = if checkers.count_ones() == 1 {
        let attacker = checkers.trailing_zeros() as Square;
        // Leapers and adjacent sliders have nothing between them and the king.
        square_bit(attacker) | g.between(attacker, king)
    } else {
        0
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::algebraic::algebraic_to_square;

    fn sq(text: &str) -> Square {
        algebraic_to_square(text).expect("valid square")
    }

    #[test]
    fn sliders_stop_at_first_blocker() {
        let game = GameState::from_fen("4k3/8/8/8/1p1R2P1/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let rook = game.attacks_from(sq("d4"));
        assert_ne!(rook & square_bit(sq("b4")), 0);
        assert_eq!(rook & square_bit(sq("a4")), 0);
        assert_ne!(rook & square_bit(sq("g4")), 0);
        assert_eq!(rook & square_bit(sq("h4")), 0);
        assert_ne!(rook & square_bit(sq("d8")), 0);
        assert_ne!(rook & square_bit(sq("d1")), 0);
    }

    #[test]
    fn sliders_see_through_the_enemy_king() {
        let game = GameState::from_fen("8/8/8/8/r3K3/8/8/k7 w - - 0 1").expect("FEN should parse");
        let rook = game.attacks_from(sq("a4"));
        assert_ne!(rook & square_bit(sq("e4")), 0);
        assert_ne!(rook & square_bit(sq("f4")), 0);
        assert_ne!(game.attack_map(Color::Dark) & square_bit(sq("h4")), 0);
        assert!(game.is_check());
        assert_eq!(game.checkers(), square_bit(sq("a4")));
        assert_eq!(game.check_line().count_ones(), 4);
    }

    #[test]
    fn pin_line_runs_from_pinner_to_king() {
        let game = GameState::from_fen("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1").expect("FEN should parse");
        let pins = game.pin_lines(Color::Light);
        assert_eq!(pins.len(), 1);
        let line = pins[0];
        for name in ["e7", "e6", "e5", "e4", "e3", "e2", "e1"] {
            assert_ne!(line & square_bit(sq(name)), 0, "{name} on pin line");
        }
        assert_eq!(line & square_bit(sq("e8")), 0);
        assert!(game.pin_lines(Color::Dark).is_empty());
    }

    #[test]
    fn two_blockers_do_not_pin() {
        let game = GameState::from_fen("4k3/4r3/8/8/4P3/8/4N3/4K3 w - - 0 1").expect("FEN should parse");
        assert!(game.pin_lines(Color::Light).is_empty());
    }

    #[test]
    fn knight_check_line_is_the_attacker_square() {
        let game = GameState::from_fen("4k3/8/8/8/8/3n4/8/4K3 w - - 0 1").expect("FEN should parse");
        assert!(game.is_check());
        assert!(!game.is_double_check());
        assert_eq!(game.check_line(), square_bit(sq("d3")));
    }

    #[test]
    fn double_check_is_flagged() {
        let game = GameState::from_fen("4k3/8/8/8/1b6/3n4/8/4K3 w - - 0 1").expect("FEN should parse");
        assert!(game.is_double_check());
        assert_eq!(game.checkers().count_ones(), 2);
        assert_eq!(game.check_line(), 0);
    }
}
