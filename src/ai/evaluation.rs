//! Static material evaluation.
//!
//! Returns a score from a fixed perspective: positive means the given
//! player is ahead, negative means behind. The unit is a tenth of a pawn,
//! so a pawn is worth 10 and a queen 90.

use crate::engine::board::BoardView;
use crate::engine::types::{Color, Piece, PieceType, Square};

/// Infinity sentinel. Larger than any realistic eval.
pub const INF: i32 = 100_000;

/// Checkmate score base. Actual mate scores are `MATE - ply` so closer mates
/// score higher.
pub const MATE: i32 = 90_000;

/// Is this score a forced-mate score?
#[inline]
pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= MATE - 500
}

// =========================================================================
// Material values
// =========================================================================

/// Base piece values, indexed by [`PieceType::index`].
///
/// The king value is a sentinel that dwarfs every other piece; search never
/// actually trades kings, but the sentinel keeps any hypothetical exchange
/// involving one off the table.
pub const PIECE_VALUE: [i32; PieceType::COUNT] = [
    10,   // Pawn
    30,   // Knight
    30,   // Bishop
    50,   // Rook
    90,   // Queen
    1000, // King (sentinel)
];

// =========================================================================
// Evaluation
// =========================================================================

/// Signed value of one square's occupant from `perspective`'s point of view.
///
/// Empty squares contribute 0, own pieces count positive, enemy pieces
/// negative.
#[inline]
pub fn piece_value(piece: Option<Piece>, perspective: Color) -> i32 {
    match piece {
        Some(p) => {
            let value = PIECE_VALUE[p.kind.index()];
            if p.color == perspective {
                value
            } else {
                -value
            }
        }
        None => 0,
    }
}

/// Evaluate a board by summing [`piece_value`] over all 64 squares.
pub fn evaluate(view: &impl BoardView, perspective: Color) -> i32 {
    let mut score = 0i32;
    for row in 0..8 {
        for col in 0..8 {
            score += piece_value(view.piece_at(Square::new(row, col)), perspective);
        }
    }
    score
}

// =========================================================================
// Tests
// =========================================================================
