//! Mailbox chess board representation.
//!
//! `Board` stores piece placement as an 8×8 grid of optional pieces plus
//! side to move, castling rights, en-passant square, and move counters.
//! Row 0 is rank 8 (Black's back rank), row 7 is rank 1.

use crate::engine::types::{
    CastlingRights, ChessError, Color, Move, MoveKind, Piece, PieceType, Square,
};

// ---------------------------------------------------------------------------
// BoardView — read-only query capability
// ---------------------------------------------------------------------------

/// Read-only placement queries the rule engine and the evaluator work
/// against. `Board` implements it; tests substitute lightweight doubles.
pub trait BoardView {
    /// What piece (if any) is on a given square?
    fn piece_at(&self, sq: Square) -> Option<Piece>;

    /// Is anything standing on the square?
    #[inline]
    fn is_occupied(&self, sq: Square) -> bool {
        self.piece_at(sq).is_some()
    }

    /// Square a pawn may capture onto en passant, if the previous move
    /// opened one.
    fn en_passant_target(&self) -> Option<Square> {
        None
    }
}

// ---------------------------------------------------------------------------
// UndoInfo — saved state for reversing a move
// ---------------------------------------------------------------------------

/// State that must be saved before applying a move so it can be restored.
#[derive(Clone, Debug)]
pub struct UndoInfo {
    pub captured: Option<Piece>,
    pub castling_rights: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u16,
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// A complete chess position: 8×8 piece grid plus the out-of-grid state a
/// legal-move decision needs (turn, castling rights, en passant, clocks).
#[derive(Clone, Debug)]
pub struct Board {
    /// Piece placement, `grid[row][col]`.
    grid: [[Option<Piece>; 8]; 8],

    /// Whose turn it is.
    pub side_to_move: Color,

    /// Castling availability (K/Q/k/q).
    pub castling_rights: CastlingRights,

    /// En-passant target square (the square *behind* the double-pushed pawn).
    pub en_passant: Option<Square>,

    /// Half-move clock (reset on pawn move or capture).
    pub halfmove_clock: u16,

    /// Full-move number (starts at 1, incremented after Black moves).
    pub fullmove_number: u16,
}

// ---------------------------------------------------------------------------
// Construction helpers
// ---------------------------------------------------------------------------

impl Board {
    /// Create an empty board with no pieces.
    pub fn empty() -> Self {
        Board {
            grid: [[None; 8]; 8],
            side_to_move: Color::White,
            castling_rights: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Standard starting position.
    pub fn starting() -> Self {
        Self::from_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .expect("starting FEN is always valid")
    }

    // -----------------------------------------------------------------------
    // Piece manipulation (low-level)
    // -----------------------------------------------------------------------

    /// Place a piece on a square, replacing whatever was there.
    #[inline]
    pub fn put_piece(&mut self, sq: Square, piece: Piece) {
        self.grid[sq.row() as usize][sq.col() as usize] = Some(piece);
    }

    /// Remove and return the piece on a square.
    #[inline]
    pub fn remove_piece(&mut self, sq: Square) -> Option<Piece> {
        self.grid[sq.row() as usize][sq.col() as usize].take()
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// What piece (if any) is on a given square?
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.grid[sq.row() as usize][sq.col() as usize]
    }

    /// Number of pieces on the board.
    pub fn piece_count(&self) -> usize {
        self.grid.iter().flatten().filter(|p| p.is_some()).count()
    }

    /// Find the king square for the given colour.
    ///
    /// Panics when the king is missing: every path that reaches here has
    /// already promised a well-formed position, so absence means corruption.
    pub fn king_square(&self, color: Color) -> Square {
        for row in 0..8 {
            for col in 0..8 {
                let sq = Square::new(row, col);
                if let Some(p) = self.piece_at(sq) {
                    if p.color == color && p.kind == PieceType::King {
                        return sq;
                    }
                }
            }
        }
        panic!("no {} king on the board:\n{}", color, self.board_string());
    }

    /// Check the structural invariants: exactly one king per side.
    pub fn verify_integrity(&self) -> Result<(), ChessError> {
        for color in [Color::White, Color::Black] {
            let mut kings = 0;
            for row in self.grid.iter() {
                for p in row.iter().flatten() {
                    if p.color == color && p.kind == PieceType::King {
                        kings += 1;
                    }
                }
            }
            if kings != 1 {
                return Err(ChessError::InvariantViolation(format!(
                    "{color} has {kings} kings (expected 1)"
                )));
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Apply / revert a move
    // -----------------------------------------------------------------------

    /// Apply a move to the board. Returns `UndoInfo` for reversal.
    ///
    /// The caller is responsible for ensuring the move is legal (i.e. the
    /// king is not left in check); the legality filter and the search both
    /// pair every `apply` with an exact `revert`.
    pub fn apply(&mut self, mv: Move) -> UndoInfo {
        let us = self.side_to_move;
        let them = !us;

        let undo_rights = self.castling_rights;
        let undo_ep = self.en_passant;
        let undo_clock = self.halfmove_clock;

        // ---- Capture first so the landing square is free ----
        let captured = match mv.kind {
            MoveKind::EnPassant => {
                // The victim pawn sits beside the landing square, one row
                // back toward its own side.
                let cap_sq = mv
                    .to
                    .offset(-us.pawn_dir(), 0)
                    .expect("en passant victim square is on the board");
                self.remove_piece(cap_sq)
            }
            _ => self.remove_piece(mv.to),
        };

        // ---- Move the piece (promotions land as the chosen piece) ----
        let moving = self
            .remove_piece(mv.from)
            .expect("no piece on the move's origin square");
        let landing = match mv.kind {
            MoveKind::Promotion(pt) => Piece::new(us, pt),
            _ => moving,
        };
        self.put_piece(mv.to, landing);

        // ---- Castling: move the rook ----
        if matches!(mv.kind, MoveKind::CastleKingside | MoveKind::CastleQueenside) {
            let (rook_from, rook_to) = castling_rook_squares(mv.to);
            let rook = self
                .remove_piece(rook_from)
                .expect("no rook on the castling origin square");
            self.put_piece(rook_to, rook);
        }

        // ---- Update castling rights ----
        // Moving king or rook, or capturing on a rook's home square.
        self.castling_rights.0 &= castling_mask(mv.from);
        self.castling_rights.0 &= castling_mask(mv.to);

        // ---- Double pawn push → set en passant ----
        self.en_passant = match mv.kind {
            MoveKind::DoublePush => mv.from.offset(us.pawn_dir(), 0),
            _ => None,
        };

        // ---- Halfmove clock ----
        if moving.kind == PieceType::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        // ---- Fullmove number ----
        if us == Color::Black {
            self.fullmove_number += 1;
        }

        // ---- Switch side ----
        self.side_to_move = them;

        UndoInfo {
            captured,
            castling_rights: undo_rights,
            en_passant: undo_ep,
            halfmove_clock: undo_clock,
        }
    }

    /// Reverse a move previously applied with `apply`.
    pub fn revert(&mut self, mv: Move, undo: &UndoInfo) {
        let them = self.side_to_move; // apply switched sides
        let us = !them;

        // ---- Switch side back ----
        self.side_to_move = us;

        // ---- Take the landed piece back (promotions revert to a pawn) ----
        let landed = self
            .remove_piece(mv.to)
            .expect("no piece on the move's landing square");
        let original = match mv.kind {
            MoveKind::Promotion(_) => Piece::new(us, PieceType::Pawn),
            _ => landed,
        };
        self.put_piece(mv.from, original);

        // ---- Restore the victim ----
        if let Some(victim) = undo.captured {
            let cap_sq = match mv.kind {
                MoveKind::EnPassant => mv
                    .to
                    .offset(-us.pawn_dir(), 0)
                    .expect("en passant victim square is on the board"),
                _ => mv.to,
            };
            self.put_piece(cap_sq, victim);
        }

        // ---- Undo castling: move the rook back ----
        if matches!(mv.kind, MoveKind::CastleKingside | MoveKind::CastleQueenside) {
            let (rook_from, rook_to) = castling_rook_squares(mv.to);
            let rook = self
                .remove_piece(rook_to)
                .expect("no rook on the castling landing square");
            self.put_piece(rook_from, rook);
        }

        // ---- Restore saved state ----
        self.castling_rights = undo.castling_rights;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;

        // Fullmove: decrement if we're undoing a Black move.
        if us == Color::Black {
            self.fullmove_number -= 1;
        }
    }

    // -----------------------------------------------------------------------
    // Board display (8×8 text grid)
    // -----------------------------------------------------------------------

    /// Render the board as an 8-line string (rank 8 at top), useful for
    /// debugging.
    pub fn board_string(&self) -> String {
        let mut s = String::with_capacity(200);
        for row in 0..8u8 {
            s.push((b'8' - row) as char);
            s.push(' ');
            for col in 0..8u8 {
                let ch = match self.piece_at(Square::new(row, col)) {
                    Some(p) => p.symbol(),
                    None => '.',
                };
                s.push(ch);
                if col < 7 {
                    s.push(' ');
                }
            }
            s.push('\n');
        }
        s.push_str("  a b c d e f g h");
        s
    }
}

impl BoardView for Board {
    #[inline]
    fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.grid[sq.row() as usize][sq.col() as usize]
    }

    #[inline]
    fn en_passant_target(&self) -> Option<Square> {
        self.en_passant
    }
}

// ---------------------------------------------------------------------------
// Castling helpers (free functions)
// ---------------------------------------------------------------------------

/// For a king-destination square (after castling), return (rook_from, rook_to).
fn castling_rook_squares(king_to: Square) -> (Square, Square) {
    let row = king_to.row();
    match king_to.col() {
        // Kingside: king e→g, rook h→f.
        6 => (Square::new(row, 7), Square::new(row, 5)),
        // Queenside: king e→c, rook a→d.
        2 => (Square::new(row, 0), Square::new(row, 3)),
        _ => panic!("invalid castling king destination: {king_to}"),
    }
}

/// Rights mask for a touched square. When a move touches a square, AND the
/// castling rights with this mask. E.g. if the rook on a1 moves (or is
/// captured), White-queenside goes away; the king's home square removes both
/// of that side's rights.
fn castling_mask(sq: Square) -> u8 {
    match (sq.row(), sq.col()) {
        (7, 0) => 0b1111 & !CastlingRights::WHITE_QUEENSIDE,
        (7, 4) => 0b1111 & !(CastlingRights::WHITE_KINGSIDE | CastlingRights::WHITE_QUEENSIDE),
        (7, 7) => 0b1111 & !CastlingRights::WHITE_KINGSIDE,
        (0, 0) => 0b1111 & !CastlingRights::BLACK_QUEENSIDE,
        (0, 4) => 0b1111 & !(CastlingRights::BLACK_KINGSIDE | CastlingRights::BLACK_QUEENSIDE),
        (0, 7) => 0b1111 & !CastlingRights::BLACK_KINGSIDE,
        _ => 0b1111,
    }
}

// ---------------------------------------------------------------------------
// FEN parsing & generation
// ---------------------------------------------------------------------------

impl Board {
    /// Parse a FEN string into a `Board`.
    ///
    /// Validates all 6 fields (piece placement, side to move, castling,
    /// en passant, halfmove clock, fullmove number) and ensures exactly one
    /// king per side.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(ChessError::InvalidFen(format!(
                "expected 6 fields, got {}",
                fields.len()
            )));
        }

        let mut board = Board::empty();

        // ----- Field 1: Piece placement -----
        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(ChessError::InvalidFen(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        // FEN lists rank 8 first, which is row 0.
        for (row, rank_str) in ranks.iter().enumerate() {
            let mut col: u8 = 0;
            for ch in rank_str.chars() {
                if col > 7 {
                    return Err(ChessError::InvalidFen(format!(
                        "too many squares in rank {}",
                        8 - row
                    )));
                }
                if let Some(digit) = ch.to_digit(10) {
                    if !(1..=8).contains(&digit) {
                        return Err(ChessError::InvalidFen(format!(
                            "invalid empty count '{ch}' in rank {}",
                            8 - row
                        )));
                    }
                    col += digit as u8;
                } else if let Some(piece) = Piece::from_symbol(ch) {
                    board.put_piece(Square::new(row as u8, col), piece);
                    col += 1;
                } else {
                    return Err(ChessError::InvalidFen(format!(
                        "invalid character '{ch}' in piece placement"
                    )));
                }
            }
            if col != 8 {
                return Err(ChessError::InvalidFen(format!(
                    "rank {} has {} squares instead of 8",
                    8 - row,
                    col
                )));
            }
        }

        // Validate exactly one king per side.
        board
            .verify_integrity()
            .map_err(|e| ChessError::InvalidFen(e.to_string()))?;

        // ----- Field 2: Side to move -----
        board.side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(ChessError::InvalidFen(format!(
                    "invalid side to move: '{other}'"
                )));
            }
        };

        // ----- Field 3: Castling availability -----
        board.castling_rights = CastlingRights::from_fen(fields[2]).ok_or_else(|| {
            ChessError::InvalidFen(format!("invalid castling string: '{}'", fields[2]))
        })?;

        // ----- Field 4: En passant target square -----
        if fields[3] != "-" {
            let ep_sq = Square::from_algebraic(fields[3]).ok_or_else(|| {
                ChessError::InvalidFen(format!("invalid en passant square: '{}'", fields[3]))
            })?;
            // En passant target must be on rank 3 (row 5) or rank 6 (row 2).
            if ep_sq.row() != 2 && ep_sq.row() != 5 {
                return Err(ChessError::InvalidFen(format!(
                    "en passant square {} is not on rank 3 or 6",
                    fields[3]
                )));
            }
            board.en_passant = Some(ep_sq);
        }

        // ----- Field 5: Halfmove clock -----
        board.halfmove_clock = fields[4].parse::<u16>().map_err(|_| {
            ChessError::InvalidFen(format!("invalid halfmove clock: '{}'", fields[4]))
        })?;

        // ----- Field 6: Fullmove number -----
        board.fullmove_number = fields[5].parse::<u16>().map_err(|_| {
            ChessError::InvalidFen(format!("invalid fullmove number: '{}'", fields[5]))
        })?;
        if board.fullmove_number == 0 {
            return Err(ChessError::InvalidFen(
                "fullmove number must be >= 1".to_string(),
            ));
        }

        Ok(board)
    }

    /// Export the board as a FEN string.
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(80);

        // ----- Field 1: Piece placement -----
        for row in 0..8u8 {
            let mut empty_count = 0u8;
            for col in 0..8u8 {
                match self.piece_at(Square::new(row, col)) {
                    Some(piece) => {
                        if empty_count > 0 {
                            fen.push((b'0' + empty_count) as char);
                            empty_count = 0;
                        }
                        fen.push(piece.symbol());
                    }
                    None => {
                        empty_count += 1;
                    }
                }
            }
            if empty_count > 0 {
                fen.push((b'0' + empty_count) as char);
            }
            if row < 7 {
                fen.push('/');
            }
        }

        // ----- Field 2: Side to move -----
        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        // ----- Field 3: Castling -----
        fen.push(' ');
        fen.push_str(&self.castling_rights.to_fen());

        // ----- Field 4: En passant -----
        fen.push(' ');
        match self.en_passant {
            Some(sq) => fen.push_str(&sq.to_algebraic()),
            None => fen.push('-'),
        }

        // ----- Field 5: Halfmove clock -----
        fen.push(' ');
        fen.push_str(&self.halfmove_clock.to_string());

        // ----- Field 6: Fullmove number -----
        fen.push(' ');
        fen.push_str(&self.fullmove_number.to_string());

        fen
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.board_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
