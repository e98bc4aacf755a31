//! In-place make/unmake.
//!
//! `apply_move` mutates the position and pushes an `UndoState`; `undo_move`
//! pops it and restores the exact prior position. Both XOR hash terms in
//! matched pairs and refresh only the lines of sight the move touched.

use std::collections::hash_map::Entry;

use crate::game_state::chess_rules::castling_side_for;
use crate::game_state::chess_types::*;
use crate::game_state::game_state::evaluate_game_over;
use crate::game_state::line_of_sight::{refresh_attacks, refresh_check, refresh_pin_lines};
use crate::moves::geometry::geometry;
use crate::moves::move_descriptions::{Move, MoveKind};
use crate::search::zobrist::keys;

/// Square of the pawn removed by an en-passant capture.
#[inline]
pub fn en_passant_capture_square(from: Square, to: Square) -> Square {
    row_of(from) * 8 + file_of(to)
}

/// Apply a move generated for the current position.
///
/// Passing a move that was not generated for this exact position is a
/// contract violation; an empty start square panics.
pub fn apply_move(game_state: &mut GameState, mv: Move) {
    let zobrist = keys();
    let us = game_state.side_to_move;
    let them = us.opposite();
    let from = mv.start();
    let to = mv.end();

    let Some(moved) = game_state.piece_on(from) else {
        panic!("apply_move {mv}: no piece on start square");
    };
    debug_assert_eq!(moved.color(), us, "apply_move {mv}: piece of the wrong side");

    let captured_square = match mv.kind() {
        MoveKind::EnPassant => en_passant_capture_square(from, to),
        _ => to,
    };
    let captured = game_state.piece_on(captured_square);
    debug_assert!(
        captured.map_or(true, |p| p.color() == them && p.kind() != PieceKind::King),
        "apply_move {mv}: illegal capture target"
    );

    game_state.undo_stack.push(UndoState {
        mv,
        moved_piece: moved,
        captured_piece: captured,
        captured_square,
        prev_castling_rights: game_state.castling_rights,
        prev_en_passant_square: game_state.en_passant_square,
        prev_halfmove_clock: game_state.halfmove_clock,
        prev_fullmove_number: game_state.fullmove_number,
        prev_game_over: game_state.game_over,
        prev_zobrist_key: game_state.zobrist_key,
    });

    let mut hash = game_state.zobrist_key;
    let mut changed = square_bit(from) | square_bit(to);
    game_state.halfmove_clock = game_state.halfmove_clock.saturating_add(1);

    if let Some(victim) = captured {
        hash ^= zobrist.piece_square(them, victim.kind(), captured_square);
        game_state.lift_piece(captured_square);
        game_state.remove_remaining(victim);
        game_state.halfmove_clock = 0;
        changed |= square_bit(captured_square);
    }

    hash ^= zobrist.piece_square(us, moved.kind(), from);
    game_state.move_piece(from, to);
    let mut landed = moved.kind();
    let mut new_en_passant = None;

    match mv.kind() {
        MoveKind::Normal => {
            if moved.kind() == PieceKind::Pawn {
                game_state.halfmove_clock = 0;
                if from.abs_diff(to) == 16 {
                    new_en_passant = Some((from + to) / 2);
                }
            }
        }
        MoveKind::Castle => {
            if let Some(side) = castling_side_for(us, to) {
                hash ^= zobrist.piece_square(us, PieceKind::Rook, side.rook_from);
                hash ^= zobrist.piece_square(us, PieceKind::Rook, side.rook_to);
                game_state.move_piece(side.rook_from, side.rook_to);
                changed |= square_bit(side.rook_from) | square_bit(side.rook_to);
            }
        }
        MoveKind::EnPassant => {
            game_state.halfmove_clock = 0;
        }
        MoveKind::Promotion => {
            let kind = mv.promotion().unwrap_or(PieceKind::Queen);
            game_state.replace_piece(to, moved.with_kind(kind));
            landed = kind;
            game_state.halfmove_clock = 0;
        }
    }
    hash ^= zobrist.piece_square(us, landed, to);

    let g = geometry();
    let rights =
        game_state.castling_rights & !(g.castle_clear_mask(from) | g.castle_clear_mask(to));
    if rights != game_state.castling_rights {
        hash ^= zobrist.castling(game_state.castling_rights) ^ zobrist.castling(rights);
        game_state.castling_rights = rights;
    }

    if let Some(old) = game_state.en_passant_square {
        hash ^= zobrist.en_passant_file(file_of(old));
    }
    if let Some(new) = new_en_passant {
        hash ^= zobrist.en_passant_file(file_of(new));
    }
    game_state.en_passant_square = new_en_passant;

    hash ^= zobrist.side_to_move(us) ^ zobrist.side_to_move(them);
    game_state.side_to_move = them;
    if us == Color::Dark {
        game_state.fullmove_number = game_state.fullmove_number.saturating_add(1);
    }
    game_state.ply = game_state.ply.saturating_add(1);
    game_state.zobrist_key = hash;

    refresh_attacks(game_state, changed);
    refresh_pin_lines(game_state);
    refresh_check(game_state);

    *game_state.repetition_table.entry(hash).or_insert(0) += 1;
    game_state.game_over = evaluate_game_over(game_state);
}

/// Reverse the most recent `apply_move`.
///
/// Panics when no move has been applied; a mismatched `mv` trips a debug
/// assertion.
pub fn undo_move(game_state: &mut GameState, mv: Move) {
    let Some(undo) = game_state.undo_stack.pop() else {
        panic!("undo_move {mv}: no move to undo");
    };
    debug_assert_eq!(undo.mv, mv, "undo_move must reverse the most recent move");

    if let Entry::Occupied(mut entry) = game_state.repetition_table.entry(game_state.zobrist_key) {
        *entry.get_mut() -= 1;
        if *entry.get() == 0 {
            entry.remove();
        }
    }

    let zobrist = keys();
    let us = game_state.side_to_move.opposite();
    let them = game_state.side_to_move;
    let from = undo.mv.start();
    let to = undo.mv.end();
    let mut changed = square_bit(from) | square_bit(to);

    let mut hash = game_state.zobrist_key;
    hash ^= zobrist.side_to_move(them) ^ zobrist.side_to_move(us);
    if let Some(current) = game_state.en_passant_square {
        hash ^= zobrist.en_passant_file(file_of(current));
    }
    if let Some(previous) = undo.prev_en_passant_square {
        hash ^= zobrist.en_passant_file(file_of(previous));
    }
    if game_state.castling_rights != undo.prev_castling_rights {
        hash ^= zobrist.castling(game_state.castling_rights)
            ^ zobrist.castling(undo.prev_castling_rights);
    }
    if let Some(landed) = game_state.piece_on(to) {
        hash ^= zobrist.piece_square(us, landed.kind(), to);
    }
    hash ^= zobrist.piece_square(us, undo.moved_piece.kind(), from);
    if let Some(victim) = undo.captured_piece {
        hash ^= zobrist.piece_square(them, victim.kind(), undo.captured_square);
    }

    match undo.mv.kind() {
        MoveKind::Castle => {
            if let Some(side) = castling_side_for(us, to) {
                hash ^= zobrist.piece_square(us, PieceKind::Rook, side.rook_to);
                hash ^= zobrist.piece_square(us, PieceKind::Rook, side.rook_from);
                game_state.move_piece(side.rook_to, side.rook_from);
                changed |= square_bit(side.rook_from) | square_bit(side.rook_to);
            }
        }
        MoveKind::Promotion => {
            game_state.replace_piece(to, undo.moved_piece);
        }
        MoveKind::Normal | MoveKind::EnPassant => {}
    }
    game_state.move_piece(to, from);

    if let Some(victim) = undo.captured_piece {
        game_state.put_piece(victim, undo.captured_square);
        game_state.add_remaining(victim);
        changed |= square_bit(undo.captured_square);
    }

    game_state.side_to_move = us;
    game_state.castling_rights = undo.prev_castling_rights;
    game_state.en_passant_square = undo.prev_en_passant_square;
    game_state.halfmove_clock = undo.prev_halfmove_clock;
    game_state.fullmove_number = undo.prev_fullmove_number;
    game_state.game_over = undo.prev_game_over;
    game_state.ply = game_state.ply.saturating_sub(1);
    debug_assert_eq!(hash, undo.prev_zobrist_key, "undo_move {mv}: hash terms out of balance");
    game_state.zobrist_key = hash;

    refresh_attacks(game_state, changed);
    refresh_pin_lines(game_state);
    refresh_check(game_state);
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::game_state::piece::Piece;
    use crate::move_generation::legal_move_generator::generate_moves;
    use crate::search::zobrist::compute_zobrist_key;
    use crate::utils::long_algebraic::long_algebraic_to_move;

    /// Everything observable about a position, for before/after comparison.
    fn snapshot(game: &GameState) -> (String, Vec<Option<Piece>>, u64, Vec<u64>, u64, u64, u8) {
        let mut attacks = game.attack_map.to_vec();
        attacks.extend(game.attacks[0]);
        attacks.extend(game.attacks[1]);
        (
            game.get_fen(),
            game.board.to_vec(),
            game.zobrist_key(),
            attacks,
            game.checkers(),
            game.check_line(),
            game.repetition_count(),
        )
    }

    fn play(game: &mut GameState, text: &str) -> Move {
        let mv = long_algebraic_to_move(text, game).expect("move should be legal");
        game.apply_move(mv);
        mv
    }

    /// Attack data rebuilt from nothing must match the incremental copy.
    fn assert_derived_data_fresh(game: &GameState) {
        let rebuilt = GameState::from_fen(&game.get_fen()).expect("exported FEN should parse");
        for color in [Color::Light, Color::Dark] {
            assert_eq!(game.attack_map(color), rebuilt.attack_map(color), "{}", game.get_fen());
            let mut pins = game.pin_lines(color).to_vec();
            let mut fresh = rebuilt.pin_lines(color).to_vec();
            pins.sort_unstable();
            fresh.sort_unstable();
            assert_eq!(pins, fresh, "{}", game.get_fen());
        }
        for sq in 0..64u8 {
            assert_eq!(game.attacks_from(sq), rebuilt.attacks_from(sq), "{}", game.get_fen());
        }
        assert_eq!(game.checkers(), rebuilt.checkers());
        assert_eq!(game.check_line(), rebuilt.check_line());
        assert_eq!(game.is_double_check(), rebuilt.is_double_check());
    }

    #[test]
    fn double_push_sets_en_passant_and_flips_side() {
        let mut game = GameState::new_game();
        play(&mut game, "e2e4");
        assert_eq!(game.side_to_move(), Color::Dark);
        assert_eq!(game.en_passant_square(), Some(44));
        assert_eq!(game.fullmove_number(), 1);
        assert_eq!(game.ply(), 1);

        play(&mut game, "g8f6");
        assert_eq!(game.en_passant_square(), None);
        assert_eq!(game.fullmove_number(), 2);
        assert_eq!(game.halfmove_clock(), 1);
    }

    #[test]
    fn en_passant_capture_removes_the_passed_pawn() {
        let mut game =
            GameState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").expect("FEN should parse");
        let before = snapshot(&game);
        let mv = play(&mut game, "e5d6");
        assert_eq!(mv.kind(), MoveKind::EnPassant);
        assert!(game.piece_on(27).is_none());
        assert_eq!(game.remaining(PieceKind::Pawn, Color::Dark), 0);
        assert_eq!(game.zobrist_key(), compute_zobrist_key(&game));

        game.undo_move(mv);
        assert_eq!(snapshot(&game), before);
    }

    #[test]
    fn castling_moves_the_rook_and_clears_rights() {
        let mut game =
            GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        let before = snapshot(&game);
        let mv = play(&mut game, "e1g1");
        assert_eq!(mv.kind(), MoveKind::Castle);
        assert!(game.piece_on(61).is_some_and(|p| p.is(PieceKind::Rook, Color::Light)));
        assert!(game.piece_on(63).is_none());
        assert_eq!(game.castling_rights(), CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE);
        assert_derived_data_fresh(&game);

        game.undo_move(mv);
        assert_eq!(snapshot(&game), before);
    }

    #[test]
    fn capturing_a_home_rook_revokes_its_right() {
        let mut game =
            GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        play(&mut game, "a1a8");
        assert_eq!(game.castling_rights(), CASTLE_LIGHT_KINGSIDE | CASTLE_DARK_KINGSIDE);
        assert_eq!(game.zobrist_key(), compute_zobrist_key(&game));
    }

    #[test]
    fn promotion_keeps_slot_and_round_trips() {
        let mut game =
            GameState::from_fen("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let pawn_slot = game.piece_on(8).expect("pawn on a7").live_index();
        let before = snapshot(&game);

        let mv = play(&mut game, "a7b8n");
        let knight = game.piece_on(1).expect("promoted piece on b8");
        assert!(knight.is(PieceKind::Knight, Color::Light));
        assert_eq!(knight.live_index(), pawn_slot);
        assert_eq!(game.remaining(PieceKind::Pawn, Color::Light), 0);
        assert_eq!(game.remaining(PieceKind::Knight, Color::Light), 1);
        assert_eq!(game.remaining(PieceKind::Rook, Color::Dark), 0);
        assert_derived_data_fresh(&game);

        game.undo_move(mv);
        assert_eq!(snapshot(&game), before);
        assert_eq!(game.remaining(PieceKind::Knight, Color::Light), 0);
    }

    #[test]
    fn undo_unwinds_hash_terms_for_special_moves() {
        let cases = [
            ("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "e1c1"),
            ("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2", "e5d6"),
            ("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1", "a7b8q"),
            ("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1", "h1h8"),
            (crate::game_state::chess_rules::STARTING_POSITION_FEN, "e2e4"),
        ];
        for (fen, text) in cases {
            let mut game = GameState::from_fen(fen).expect("FEN should parse");
            let key = game.zobrist_key();
            let mv = play(&mut game, text);
            game.undo_move(mv);
            assert_eq!(game.zobrist_key(), key, "{fen} {text}");
            assert_eq!(game.zobrist_key(), compute_zobrist_key(&game), "{fen} {text}");
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "hash terms out of balance")]
    fn undo_checks_unwound_hash_against_record() {
        let mut game = GameState::new_game();
        let mv = play(&mut game, "g1f3");
        if let Some(record) = game.undo_stack.last_mut() {
            record.prev_zobrist_key ^= 1;
        }
        game.undo_move(mv);
    }

    #[test]
    #[should_panic]
    fn undo_without_apply_panics() {
        let mut game = GameState::new_game();
        game.undo_move(Move::normal(52, 36));
    }

    #[test]
    fn random_playouts_preserve_every_invariant() {
        let mut rng = StdRng::seed_from_u64(0x5EED);
        let starts = [
            crate::game_state::chess_rules::STARTING_POSITION_FEN,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        ];

        for fen in starts {
            for _ in 0..8 {
                let mut game = GameState::from_fen(fen).expect("FEN should parse");
                let mut played = Vec::new();
                let mut snapshots = Vec::new();

                for _ in 0..60 {
                    let moves = generate_moves(&game);
                    if moves.is_empty() {
                        break;
                    }
                    let mv = moves[rng.random_range(0..moves.len())];
                    snapshots.push(snapshot(&game));
                    game.apply_move(mv);
                    played.push(mv);

                    assert_eq!(game.zobrist_key(), compute_zobrist_key(&game));
                    assert_derived_data_fresh(&game);

                    let king = square_bit(game.king_square(game.side_to_move()));
                    let enemy = game.side_to_move().opposite();
                    let attacked = game
                        .live_pieces(enemy)
                        .any(|(slot, _)| game.attacks[enemy.index()][slot] & king != 0);
                    assert_eq!(game.is_check(), attacked);
                }

                while let Some(mv) = played.pop() {
                    game.undo_move(mv);
                    let expected = snapshots.pop().expect("one snapshot per move");
                    assert_eq!(snapshot(&game), expected);
                }
                assert_eq!(game.undo_depth(), 0);
                assert_eq!(game.get_fen(), GameState::from_fen(fen).expect("FEN should parse").get_fen());
            }
        }
    }
}
