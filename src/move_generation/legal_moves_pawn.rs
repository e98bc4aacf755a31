use std::ops::ControlFlow;

use crate::game_state::chess_rules::{pawn_start_row, promotion_row};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::{is_legal_destination, is_legal_en_passant};
use crate::moves::geometry::geometry;
use crate::moves::move_descriptions::{Move, MoveKind};

pub fn generate_pawn_moves<S>(game_state: &GameState, from: Square, sink: &mut S) -> ControlFlow<()>
where
    S: FnMut(Move) -> ControlFlow<()>,
{
    let side = game_state.side_to_move;
    let empty = !game_state.occupancy_all();
    let enemy_occ = game_state.occupancy(side.opposite());
    let push = side.pawn_push();

    // Pawns never stand on their promotion row, so one step stays on the board.
    let one_step = (from as i8 + push) as Square;
    if empty & square_bit(one_step) != 0 {
        if is_legal_destination(game_state, from, one_step) {
            emit_pawn_move(side, from, one_step, sink)?;
        }

        if row_of(from) == pawn_start_row(side) {
            let two_step = (one_step as i8 + push) as Square;
            if empty & square_bit(two_step) != 0 && is_legal_destination(game_state, from, two_step)
            {
                sink(Move::normal(from, two_step))?;
            }
        }
    }

    let mut captures = geometry().pawn_attacks(side, from) & enemy_occ;
    while captures != 0 {
        let to = captures.trailing_zeros() as Square;
        if is_legal_destination(game_state, from, to) {
            emit_pawn_move(side, from, to, sink)?;
        }
        captures &= captures - 1;
    }

    if let Some(ep) = game_state.en_passant_square {
        if geometry().pawn_attacks(side, from) & square_bit(ep) != 0
            && is_legal_en_passant(game_state, from, ep)
        {
            sink(Move::new(from, ep, MoveKind::EnPassant, None))?;
        }
    }

    ControlFlow::Continue(())
}

/// Emit a push or capture, expanding it into four promotions on the last row.
fn emit_pawn_move<S>(side: Color, from: Square, to: Square, sink: &mut S) -> ControlFlow<()>
where
    S: FnMut(Move) -> ControlFlow<()>,
{
    if row_of(to) == promotion_row(side) {
        for kind in PROMOTION_KINDS {
            sink(Move::new(from, to, MoveKind::Promotion, Some(kind)))?;
        }
        ControlFlow::Continue(())
    } else {
        sink(Move::normal(from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pawn_moves(fen: &str, from: Square) -> Vec<Move> {
        let game = GameState::from_fen(fen).expect("FEN should parse");
        let mut out = Vec::new();
        let _ = generate_pawn_moves(&game, from, &mut |mv| {
            out.push(mv);
            ControlFlow::Continue(())
        });
        out
    }

    #[test]
    fn start_row_pawn_has_single_and_double_push() {
        let moves = pawn_moves(crate::game_state::chess_rules::STARTING_POSITION_FEN, 52);
        let text: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
        assert_eq!(text, vec!["e2e3", "e2e4"]);
    }

    #[test]
    fn blocked_pawn_cannot_jump() {
        let moves = pawn_moves("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1", 52);
        let text: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
        assert!(text.is_empty());
    }

    #[test]
    fn promotion_emits_four_pieces_per_square() {
        let moves = pawn_moves("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1", 8);
        assert_eq!(moves.len(), 8);
        assert!(moves.iter().all(|m| m.kind() == MoveKind::Promotion));
        assert_eq!(moves[0].promotion(), Some(PieceKind::Queen));
        assert_eq!(moves[3].promotion(), Some(PieceKind::Knight));
    }

    #[test]
    fn dark_pawn_captures_downward() {
        let moves = pawn_moves("4k3/8/8/3p4/2P1P3/8/8/4K3 b - - 0 1", 27);
        let mut text: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
        text.sort();
        assert_eq!(text, vec!["d5c4", "d5d4", "d5e4"]);
    }

    #[test]
    fn sink_can_stop_generation_early() {
        let game = GameState::new_game();
        let mut seen = 0;
        let flow = generate_pawn_moves(&game, 52, &mut |_| {
            seen += 1;
            ControlFlow::Break(())
        });
        assert_eq!(flow, ControlFlow::Break(()));
        assert_eq!(seen, 1);
    }
}
