//! Core incremental board state representation.
//!
//! `GameState` owns the square array, per-color live-piece lists, attack
//! bitboards, pin lines, check status, rights, clocks, repetition table and
//! the undo stack. Mutation goes through `apply_move` / `undo_move`; both
//! leave every derived field consistent with the squares on return.

use std::collections::HashMap;

use crate::errors::FenError;
use crate::game_state::chess_rules::{
    CASTLING_SIDES, FIFTY_MOVE_HALFMOVES, MAX_PIECES_PER_COLOR, REPETITION_LIMIT,
    STARTING_POSITION_FEN,
};
use crate::game_state::chess_types::*;
use crate::game_state::line_of_sight::{refresh_attacks, refresh_check, refresh_pin_lines};
use crate::game_state::piece::Piece;
use crate::move_generation::legal_move_apply;
use crate::move_generation::legal_move_generator::legal_moves_exist;
use crate::moves::move_descriptions::Move;
use crate::search::zobrist::compute_zobrist_key;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

/// Incremental game state optimized for fast move making/unmaking.
#[derive(Debug, Clone)]
pub struct GameState {
    // --- Board ---
    pub(crate) board: [Option<Piece>; 64],
    // [color][live index] -> square
    pub(crate) piece_squares: [[Option<Square>; MAX_PIECES_PER_COLOR]; 2],
    pub(crate) occupancy: [u64; 2],
    pub(crate) king_squares: [Square; 2],
    pub(crate) remaining_pieces: HashMap<Piece, u8>,

    // --- Attack data ---
    // [color][live index] -> line of sight
    pub(crate) attacks: [[u64; MAX_PIECES_PER_COLOR]; 2],
    pub(crate) attack_map: [u64; 2],
    pub(crate) pin_lines: [Vec<u64>; 2],
    pub(crate) checkers: u64,
    pub(crate) check_line: u64,
    pub(crate) double_check: bool,

    // --- Side and state flags ---
    pub(crate) side_to_move: Color,
    pub(crate) castling_rights: CastlingRights,
    pub(crate) en_passant_square: Option<Square>,

    // --- Clocks / move counters ---
    pub(crate) halfmove_clock: u16,
    pub(crate) fullmove_number: u16,
    pub(crate) ply: u16,

    // --- Hashing / repetition ---
    pub(crate) zobrist_key: u64,
    pub(crate) repetition_table: HashMap<u64, u8>,

    pub(crate) undo_stack: Vec<UndoState>,
    pub(crate) game_over: Option<GameOverReason>,
}

impl GameState {
    /// Board with no pieces; only the setup path uses it before `finish_setup`.
    pub(crate) fn new_empty() -> Self {
        Self {
            board: [None; 64],
            piece_squares: [[None; MAX_PIECES_PER_COLOR]; 2],
            occupancy: [0; 2],
            king_squares: [0; 2],
            remaining_pieces: HashMap::new(),

            attacks: [[0; MAX_PIECES_PER_COLOR]; 2],
            attack_map: [0; 2],
            pin_lines: [Vec::new(), Vec::new()],
            checkers: 0,
            check_line: 0,
            double_check: false,

            side_to_move: Color::Light,
            castling_rights: 0,
            en_passant_square: None,

            halfmove_clock: 0,
            fullmove_number: 1,
            ply: 0,

            zobrist_key: 0,
            repetition_table: HashMap::new(),

            undo_stack: Vec::new(),
            game_over: None,
        }
    }

    #[inline]
    pub fn new_game() -> Self {
        parse_fen(STARTING_POSITION_FEN).expect("starting FEN should always parse")
    }

    #[inline]
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        parse_fen(fen)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    #[inline]
    pub fn apply_move(&mut self, mv: Move) {
        legal_move_apply::apply_move(self, mv);
    }

    #[inline]
    pub fn undo_move(&mut self, mv: Move) {
        legal_move_apply::undo_move(self, mv);
    }

    // --- Queries ---

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn piece_on(&self, square: Square) -> Option<Piece> {
        self.board[square as usize]
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.king_squares[color.index()]
    }

    #[inline]
    pub fn occupancy(&self, color: Color) -> u64 {
        self.occupancy[color.index()]
    }

    #[inline]
    pub fn occupancy_all(&self) -> u64 {
        self.occupancy[0] | self.occupancy[1]
    }

    /// Every square attacked by `color`'s pieces.
    #[inline]
    pub fn attack_map(&self, color: Color) -> u64 {
        self.attack_map[color.index()]
    }

    /// Line of sight of the piece standing on `square`.
    pub fn attacks_from(&self, square: Square) -> u64 {
        match self.piece_on(square) {
            Some(piece) => self.attacks[piece.color().index()][piece.live_index()],
            None => 0,
        }
    }

    /// Pin lines constraining `color`'s pieces, each from pinner to king inclusive.
    #[inline]
    pub fn pin_lines(&self, color: Color) -> &[u64] {
        &self.pin_lines[color.index()]
    }

    #[inline]
    pub fn is_check(&self) -> bool {
        self.checkers != 0
    }

    #[inline]
    pub fn is_double_check(&self) -> bool {
        self.double_check
    }

    /// Squares of the pieces giving check to the side to move.
    #[inline]
    pub fn checkers(&self) -> u64 {
        self.checkers
    }

    /// Attacker square plus the squares up to the king; empty unless in single check.
    #[inline]
    pub fn check_line(&self) -> u64 {
        self.check_line
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    #[inline]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    #[inline]
    pub fn ply(&self) -> u16 {
        self.ply
    }

    #[inline]
    pub fn zobrist_key(&self) -> u64 {
        self.zobrist_key
    }

    /// How often the current position has occurred, itself included.
    #[inline]
    pub fn repetition_count(&self) -> u8 {
        self.repetition_table
            .get(&self.zobrist_key)
            .copied()
            .unwrap_or(0)
    }

    /// Number of live pieces of this kind and color.
    #[inline]
    pub fn remaining(&self, kind: PieceKind, color: Color) -> u8 {
        self.remaining_pieces
            .get(&Piece::create(kind, color))
            .copied()
            .unwrap_or(0)
    }

    /// Moves applied and not yet undone.
    #[inline]
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.game_over.is_some()
    }

    #[inline]
    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over
    }

    /// Live squares of `color`'s pieces, paired with their slot.
    pub(crate) fn live_pieces(&self, color: Color) -> impl Iterator<Item = (usize, Square)> + '_ {
        self.piece_squares[color.index()]
            .iter()
            .enumerate()
            .filter_map(|(slot, sq)| sq.map(|sq| (slot, sq)))
    }

    // --- Board mutation primitives ---

    /// Put a piece in its recorded slot on `square`.
    pub(crate) fn put_piece(&mut self, piece: Piece, square: Square) {
        let color = piece.color().index();
        debug_assert!(self.board[square as usize].is_none());
        debug_assert!(self.piece_squares[color][piece.live_index()].is_none());

        self.board[square as usize] = Some(piece);
        self.piece_squares[color][piece.live_index()] = Some(square);
        self.occupancy[color] |= square_bit(square);
        if piece.kind() == PieceKind::King {
            self.king_squares[color] = square;
        }
    }

    /// Take the piece off `square`, vacating its slot.
    pub(crate) fn lift_piece(&mut self, square: Square) -> Option<Piece> {
        let piece = self.board[square as usize].take()?;
        let color = piece.color().index();
        self.piece_squares[color][piece.live_index()] = None;
        self.attacks[color][piece.live_index()] = 0;
        self.occupancy[color] &= !square_bit(square);
        Some(piece)
    }

    /// Relocate the piece on `from` to the empty square `to`.
    pub(crate) fn move_piece(&mut self, from: Square, to: Square) {
        let Some(piece) = self.board[from as usize].take() else {
            panic!("no piece to move on square {from}");
        };
        debug_assert!(self.board[to as usize].is_none());

        let color = piece.color().index();
        self.board[to as usize] = Some(piece);
        self.piece_squares[color][piece.live_index()] = Some(to);
        self.occupancy[color] ^= square_bit(from) | square_bit(to);
        if piece.kind() == PieceKind::King {
            self.king_squares[color] = to;
        }
    }

    /// Swap the piece on `square` for `replacement`, which keeps the same slot.
    pub(crate) fn replace_piece(&mut self, square: Square, replacement: Piece) {
        if let Some(old) = self.board[square as usize] {
            debug_assert_eq!(old.live_index(), replacement.live_index());
            self.remove_remaining(old);
        }
        self.board[square as usize] = Some(replacement);
        self.add_remaining(replacement);
    }

    pub(crate) fn add_remaining(&mut self, piece: Piece) {
        *self.remaining_pieces.entry(piece.without_index()).or_insert(0) += 1;
    }

    pub(crate) fn remove_remaining(&mut self, piece: Piece) {
        let key = piece.without_index();
        if let Some(count) = self.remaining_pieces.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                self.remaining_pieces.remove(&key);
            }
        }
    }

    // --- Setup ---

    /// Place a piece during setup, assigning it the next free slot.
    pub(crate) fn add_setup_piece(&mut self, piece: Piece, square: Square) -> Result<(), FenError> {
        let color = piece.color();
        let slot = self.piece_squares[color.index()]
            .iter()
            .position(Option::is_none)
            .ok_or(FenError::TooManyPieces(color))?;

        let piece = piece.with_live_index(slot);
        self.put_piece(piece, square);
        self.add_remaining(piece);
        Ok(())
    }

    /// Derive hash, attacks, pins, check and game-over status from the squares.
    ///
    /// Fails when the side that just moved left its own king attacked.
    pub(crate) fn finish_setup(&mut self) -> Result<(), FenError> {
        self.castling_rights = sanitize_castling_rights(self, self.castling_rights);
        self.zobrist_key = compute_zobrist_key(self);

        refresh_attacks(self, u64::MAX);
        let waiting = self.side_to_move.opposite();
        if self.attack_map(self.side_to_move) & square_bit(self.king_square(waiting)) != 0 {
            return Err(FenError::KingCapturable(waiting));
        }
        refresh_pin_lines(self);
        refresh_check(self);

        self.repetition_table.clear();
        self.repetition_table.insert(self.zobrist_key, 1);
        self.game_over = evaluate_game_over(self);
        Ok(())
    }

    // --- Game-over ---

    /// Neither side can force mate: no pawns, rooks or queens, and each side
    /// has either a lone bishop or only knights beside the king.
    pub fn is_insufficient_material(&self) -> bool {
        for color in [Color::Light, Color::Dark] {
            if self.remaining(PieceKind::Pawn, color) > 0
                || self.remaining(PieceKind::Rook, color) > 0
                || self.remaining(PieceKind::Queen, color) > 0
            {
                return false;
            }

            let bishops = self.remaining(PieceKind::Bishop, color);
            let knights = self.remaining(PieceKind::Knight, color);
            if !(bishops == 0 || (bishops == 1 && knights == 0)) {
                return false;
            }
        }
        true
    }
}

/// Terminal status of the position for the side to move.
pub(crate) fn evaluate_game_over(game_state: &GameState) -> Option<GameOverReason> {
    if !legal_moves_exist(game_state) {
        return Some(if game_state.is_check() {
            GameOverReason::Checkmate
        } else {
            GameOverReason::Stalemate
        });
    }
    if game_state.repetition_count() > REPETITION_LIMIT {
        return Some(GameOverReason::ThreefoldRepetition);
    }
    if game_state.halfmove_clock >= FIFTY_MOVE_HALFMOVES {
        return Some(GameOverReason::FiftyMoveRule);
    }
    if game_state.is_insufficient_material() {
        return Some(GameOverReason::InsufficientMaterial);
    }
    None
}

/// Drop rights whose king or rook is not on its home square.
fn sanitize_castling_rights(game_state: &GameState, rights: CastlingRights) -> CastlingRights {
    let mut kept = 0;
    for color in [Color::Light, Color::Dark] {
        for side in &CASTLING_SIDES[color.index()] {
            let king_home = game_state
                .piece_on(side.king_from)
                .is_some_and(|p| p.is(PieceKind::King, color));
            let rook_home = game_state
                .piece_on(side.rook_from)
                .is_some_and(|p| p.is(PieceKind::Rook, color));
            if king_home && rook_home {
                kept |= side.right;
            }
        }
    }
    rights & kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_generation::legal_move_generator::generate_moves;
    use crate::utils::long_algebraic::long_algebraic_to_move;

    fn play(game: &mut GameState, moves: &[&str]) {
        for text in moves {
            let mv = long_algebraic_to_move(text, game).expect("move should be legal");
            game.apply_move(mv);
        }
    }

    #[test]
    fn new_game_has_full_piece_lists() {
        let game = GameState::new_game();
        assert_eq!(game.live_pieces(Color::Light).count(), 16);
        assert_eq!(game.live_pieces(Color::Dark).count(), 16);
        assert_eq!(game.king_square(Color::Light), 60);
        assert_eq!(game.king_square(Color::Dark), 4);
        assert_eq!(game.remaining(PieceKind::Pawn, Color::Light), 8);
        assert_eq!(game.remaining(PieceKind::Queen, Color::Dark), 1);
        assert_eq!(game.castling_rights(), CASTLE_ALL);
        assert_eq!(game.repetition_count(), 1);
        assert!(!game.is_check());
        assert!(!game.is_game_over());
    }

    #[test]
    fn slots_agree_with_squares() {
        let game = GameState::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
            .expect("FEN should parse");
        for color in [Color::Light, Color::Dark] {
            for (slot, sq) in game.live_pieces(color) {
                let piece = game.piece_on(sq).expect("slot points at a piece");
                assert_eq!(piece.live_index(), slot);
                assert_eq!(piece.color(), color);
            }
        }
    }

    #[test]
    fn two_kings_is_insufficient_material() {
        let game = GameState::from_fen("8/8/4k3/8/8/3K4/8/8 w - - 0 1").expect("FEN should parse");
        assert_eq!(game.game_over_reason(), Some(GameOverReason::InsufficientMaterial));
    }

    #[test]
    fn minor_piece_draw_heuristic() {
        let bishop = GameState::from_fen("8/8/4k3/8/8/3KB3/8/8 w - - 0 1").expect("FEN should parse");
        assert!(bishop.is_insufficient_material());

        let knights = GameState::from_fen("8/8/4k3/8/8/3KNN2/8/8 w - - 0 1").expect("FEN should parse");
        assert!(knights.is_insufficient_material());

        let bishop_knight =
            GameState::from_fen("8/8/4k3/8/8/3KBN2/8/8 w - - 0 1").expect("FEN should parse");
        assert!(!bishop_knight.is_insufficient_material());

        let rook = GameState::from_fen("8/8/3k4/8/8/4KR2/8/8 w - - 0 1").expect("FEN should parse");
        assert!(!rook.is_insufficient_material());
        assert!(!rook.is_game_over());
    }

    #[test]
    fn capture_down_to_bare_kings_ends_game() {
        let mut game = GameState::from_fen("k7/8/8/3Kp3/8/8/8/8 w - - 0 1").expect("FEN should parse");
        assert!(!game.is_game_over());
        play(&mut game, &["d5e5"]);

        let dark_pawn = Piece::create(PieceKind::Pawn, Color::Dark);
        assert_eq!(game.remaining(PieceKind::Pawn, Color::Dark), 0);
        assert!(!game.remaining_pieces.contains_key(&dark_pawn));
        assert_eq!(game.game_over_reason(), Some(GameOverReason::InsufficientMaterial));

        let mv = game.undo_stack.last().expect("one move applied").mv;
        game.undo_move(mv);
        assert_eq!(game.remaining(PieceKind::Pawn, Color::Dark), 1);
        assert!(!game.is_game_over());
    }

    #[test]
    fn fifty_move_rule_at_halfmove_one_hundred() {
        let mut game =
            GameState::from_fen("8/8/4k3/8/8/3K4/8/R7 w - - 99 80").expect("FEN should parse");
        assert!(!game.is_game_over());
        play(&mut game, &["a1a2"]);
        assert_eq!(game.halfmove_clock(), 100);
        assert_eq!(game.game_over_reason(), Some(GameOverReason::FiftyMoveRule));

        let mv = game.undo_stack.last().expect("one move applied").mv;
        game.undo_move(mv);
        assert_eq!(game.game_over_reason(), None);
        assert_eq!(game.halfmove_clock(), 99);
    }

    #[test]
    fn knight_shuffle_reaches_threefold_repetition() {
        let mut game = GameState::new_game();
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
        play(&mut game, &shuffle);
        assert_eq!(game.repetition_count(), 2);
        assert!(!game.is_game_over());
        play(&mut game, &shuffle);
        assert_eq!(game.repetition_count(), 3);
        assert_eq!(game.game_over_reason(), Some(GameOverReason::ThreefoldRepetition));
    }

    #[test]
    fn fools_mate_is_checkmate() {
        let mut game = GameState::new_game();
        play(&mut game, &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert!(game.is_check());
        assert!(generate_moves(&game).is_empty());
        assert_eq!(game.game_over_reason(), Some(GameOverReason::Checkmate));
    }

    #[test]
    fn stalemate_is_detected() {
        let game = GameState::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").expect("FEN should parse");
        assert!(!game.is_check());
        assert_eq!(game.game_over_reason(), Some(GameOverReason::Stalemate));
    }

    #[test]
    fn castling_rights_without_home_pieces_are_dropped() {
        let game = GameState::from_fen("4k3/8/8/8/8/8/8/4K2R w KQkq - 0 1").expect("FEN should parse");
        assert_eq!(game.castling_rights(), CASTLE_LIGHT_KINGSIDE);
        assert_eq!(game.get_fen(), "4k3/8/8/8/8/8/8/4K2R w K - 0 1");
    }
}
