//! Per-piece movement and capture rules.
//!
//! Each piece answers three queries against a `BoardView`: the squares it
//! could capture on (`takes`), the squares it could quietly step to
//! (`peaceful_moves`), and both together (`candidate_moves`). The answers
//! are geometry plus occupancy only; king safety is the validator's job.

use crate::engine::board::BoardView;
use crate::engine::types::{Color, Piece, PieceType, Square};

// ---------------------------------------------------------------------------
// Direction tables
// ---------------------------------------------------------------------------

/// Straight-line directions (rooks).
const ROOK_DIRS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Diagonal directions (bishops).
const BISHOP_DIRS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// All eight directions (queens, king steps).
#[rustfmt::skip]
const QUEEN_DIRS: [(i8, i8); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

/// Knight jump offsets.
#[rustfmt::skip]
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-2, -1), (-2, 1),
    (-1, -2), (-1, 2),
    (1, -2),  (1, 2),
    (2, -1),  (2, 1),
];

// ---------------------------------------------------------------------------
// Piece rule queries
// ---------------------------------------------------------------------------

impl Piece {
    /// Squares this piece could capture on from `from`: reachable squares
    /// holding an opposing piece, plus the en-passant target for pawns.
    /// Own-occupied and empty squares never appear.
    pub fn takes(self, from: Square, board: &impl BoardView) -> Vec<Square> {
        match self.kind {
            PieceType::Pawn => pawn_takes(self.color, from, board),
            PieceType::Knight => step_takes(self.color, from, board, &KNIGHT_JUMPS),
            PieceType::Bishop => ray_takes(self.color, from, board, &BISHOP_DIRS),
            PieceType::Rook => ray_takes(self.color, from, board, &ROOK_DIRS),
            PieceType::Queen => ray_takes(self.color, from, board, &QUEEN_DIRS),
            PieceType::King => step_takes(self.color, from, board, &QUEEN_DIRS),
        }
    }

    /// Squares this piece could move to without capturing: reachable squares
    /// that are empty. For pawns this is the push squares only; the
    /// en-passant target counts as a take, not a peaceful move.
    pub fn peaceful_moves(self, from: Square, board: &impl BoardView) -> Vec<Square> {
        match self.kind {
            PieceType::Pawn => pawn_peaceful(self.color, from, board),
            PieceType::Knight => step_peaceful(from, board, &KNIGHT_JUMPS),
            PieceType::Bishop => ray_peaceful(from, board, &BISHOP_DIRS),
            PieceType::Rook => ray_peaceful(from, board, &ROOK_DIRS),
            PieceType::Queen => ray_peaceful(from, board, &QUEEN_DIRS),
            PieceType::King => step_peaceful(from, board, &QUEEN_DIRS),
        }
    }

    /// Takes first, then peaceful moves. The two sets are disjoint, so the
    /// combined length is always the sum; captures-first is the piece's
    /// enumeration order everywhere above this layer.
    pub fn candidate_moves(self, from: Square, board: &impl BoardView) -> Vec<Square> {
        let mut squares = self.takes(from, board);
        squares.extend(self.peaceful_moves(from, board));
        squares
    }
}

// ---------------------------------------------------------------------------
// Shared generators
// ---------------------------------------------------------------------------

/// Walk each ray until the edge or the first occupied square; an opposing
/// occupant is a take and ends the ray.
fn ray_takes(color: Color, from: Square, board: &impl BoardView, dirs: &[(i8, i8)]) -> Vec<Square> {
    let mut out = Vec::new();
    for &(dr, dc) in dirs {
        let mut cur = from;
        while let Some(next) = cur.offset(dr, dc) {
            match board.piece_at(next) {
                Some(p) => {
                    if p.color != color {
                        out.push(next);
                    }
                    break;
                }
                None => cur = next,
            }
        }
    }
    out
}

/// Walk each ray collecting empty squares, stopping before any occupant.
fn ray_peaceful(from: Square, board: &impl BoardView, dirs: &[(i8, i8)]) -> Vec<Square> {
    let mut out = Vec::new();
    for &(dr, dc) in dirs {
        let mut cur = from;
        while let Some(next) = cur.offset(dr, dc) {
            if board.is_occupied(next) {
                break;
            }
            out.push(next);
            cur = next;
        }
    }
    out
}

/// Fixed-offset targets (knight, king) holding an opposing piece.
fn step_takes(
    color: Color,
    from: Square,
    board: &impl BoardView,
    offsets: &[(i8, i8)],
) -> Vec<Square> {
    offsets
        .iter()
        .filter_map(|&(dr, dc)| from.offset(dr, dc))
        .filter(|&sq| matches!(board.piece_at(sq), Some(p) if p.color != color))
        .collect()
}

/// Fixed-offset targets (knight, king) that are empty.
fn step_peaceful(from: Square, board: &impl BoardView, offsets: &[(i8, i8)]) -> Vec<Square> {
    offsets
        .iter()
        .filter_map(|&(dr, dc)| from.offset(dr, dc))
        .filter(|&sq| !board.is_occupied(sq))
        .collect()
}

// ---------------------------------------------------------------------------
// Pawn rules
// ---------------------------------------------------------------------------

/// Row a pawn of this colour starts on (and may double-push from).
const fn pawn_start_row(color: Color) -> u8 {
    match color {
        Color::White => 6,
        Color::Black => 1,
    }
}

/// Row an en-passant capture by this colour lands on. White takes onto
/// rank 6 (row 2), Black onto rank 3 (row 5); a target on any other row
/// was opened against the other side.
const fn en_passant_row(color: Color) -> u8 {
    match color {
        Color::White => 2,
        Color::Black => 5,
    }
}

fn pawn_takes(color: Color, from: Square, board: &impl BoardView) -> Vec<Square> {
    let mut out = Vec::new();
    let dir = color.pawn_dir();
    for dc in [-1, 1] {
        if let Some(to) = from.offset(dir, dc) {
            let holds_opponent = matches!(board.piece_at(to), Some(p) if p.color != color);
            let en_passant =
                board.en_passant_target() == Some(to) && to.row() == en_passant_row(color);
            if holds_opponent || en_passant {
                out.push(to);
            }
        }
    }
    out
}

fn pawn_peaceful(color: Color, from: Square, board: &impl BoardView) -> Vec<Square> {
    let mut out = Vec::new();
    let dir = color.pawn_dir();
    if let Some(one) = from.offset(dir, 0) {
        if !board.is_occupied(one) {
            out.push(one);
            // Double push only from the start row, and only through an
            // empty square.
            if from.row() == pawn_start_row(color) {
                if let Some(two) = one.offset(dir, 0) {
                    if !board.is_occupied(two) {
                        out.push(two);
                    }
                }
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
