//! Legal move generation.
//!
//! Pipeline:
//!   1. Scan the board row-major; each piece of the side to move contributes
//!      its candidate squares (takes first, then peaceful) from the rule
//!      engine, tagged into full `Move`s. King entries append castling.
//!   2. Filter: apply the move to a scratch copy, verify the mover's king is
//!      not in check, discard otherwise.
//!
//! The scan fixes the enumeration order end to end — row-major origins,
//! captures before quiet moves per piece, promotions Q/R/B/N, kingside
//! castling before queenside — which is what makes the AI's
//! first-encountered tie-break reproducible.

use crate::engine::board::{Board, BoardView};
use crate::engine::types::{Color, Move, MoveKind, Piece, PieceType, Square};

// =========================================================================
// Public API
// =========================================================================

/// Generate all legal moves for the side to move, in enumeration order.
pub fn legal_moves(board: &Board) -> Vec<Move> {
    let pseudo = pseudo_legal_moves(board);

    // Filter: after each move the mover's own king must not be in check.
    let mut legal = Vec::with_capacity(pseudo.len());
    for mv in pseudo {
        let mut copy = board.clone();
        copy.apply(mv);
        let us = !copy.side_to_move;
        if !is_in_check(&copy, us) {
            legal.push(mv);
        }
    }
    legal
}

/// Generate all legal moves originating from a specific square.
pub fn legal_moves_from(board: &Board, from: Square) -> Vec<Move> {
    legal_moves(board)
        .into_iter()
        .filter(|m| m.from == from)
        .collect()
}

/// Is `sq` attacked by any piece of colour `by`? True exactly when the
/// square appears in the union of take-sets over that side's pieces.
///
/// Take-sets only name occupied squares, so the query overlays a phantom
/// occupant on `sq`; an empty square (a castling path, say) then answers
/// the same question a real victim standing there would.
pub fn is_attacked(board: &Board, sq: Square, by: Color) -> bool {
    let probe = Probe {
        board,
        sq,
        occupant: Piece::new(!by, PieceType::Pawn),
    };
    for row in 0..8 {
        for col in 0..8 {
            let from = Square::new(row, col);
            if let Some(p) = board.piece_at(from) {
                if p.color == by && p.takes(from, &probe).contains(&sq) {
                    return true;
                }
            }
        }
    }
    false
}

/// View that pretends a piece stands on one square of an underlying board.
struct Probe<'a> {
    board: &'a Board,
    sq: Square,
    occupant: Piece,
}

impl BoardView for Probe<'_> {
    fn piece_at(&self, sq: Square) -> Option<Piece> {
        if sq == self.sq {
            Some(self.occupant)
        } else {
            self.board.piece_at(sq)
        }
    }

    fn en_passant_target(&self) -> Option<Square> {
        self.board.en_passant
    }
}

/// Is `color`'s king currently in check?
pub fn is_in_check(board: &Board, color: Color) -> bool {
    is_attacked(board, board.king_square(color), !color)
}

// =========================================================================
// Pseudo-legal generation (internal)
// =========================================================================

fn pseudo_legal_moves(board: &Board) -> Vec<Move> {
    let us = board.side_to_move;
    let mut moves = Vec::with_capacity(64);

    for row in 0..8 {
        for col in 0..8 {
            let from = Square::new(row, col);
            let piece = match board.piece_at(from) {
                Some(p) if p.color == us => p,
                _ => continue,
            };
            match piece.kind {
                PieceType::Pawn => push_pawn_moves(board, piece, from, &mut moves),
                PieceType::King => {
                    push_piece_moves(board, piece, from, &mut moves);
                    push_castling_moves(board, us, from, &mut moves);
                }
                _ => push_piece_moves(board, piece, from, &mut moves),
            }
        }
    }
    moves
}

// =========================================================================
// Knights, sliders, king steps
// =========================================================================

fn push_piece_moves(board: &Board, piece: Piece, from: Square, moves: &mut Vec<Move>) {
    for to in piece.takes(from, board) {
        let victim = board
            .piece_at(to)
            .expect("take target square must be occupied");
        moves.push(Move::capture(from, to, piece, victim));
    }
    for to in piece.peaceful_moves(from, board) {
        moves.push(Move::new(from, to, piece));
    }
}

// =========================================================================
// Pawn moves
// =========================================================================

fn push_pawn_moves(board: &Board, pawn: Piece, from: Square, moves: &mut Vec<Move>) {
    let us = pawn.color;
    let promo_row = (!us).back_row();

    // Captures first (including promotion captures and en passant).
    for to in pawn.takes(from, board) {
        match board.piece_at(to) {
            Some(victim) => {
                if to.row() == promo_row {
                    push_promotions(from, to, pawn, Some(victim), moves);
                } else {
                    moves.push(Move::capture(from, to, pawn, victim));
                }
            }
            None => {
                // An empty take square is the en-passant target; the victim
                // pawn stands beside it.
                let victim = Piece::new(!us, PieceType::Pawn);
                moves.push(Move::with_kind(
                    from,
                    to,
                    pawn,
                    Some(victim),
                    MoveKind::EnPassant,
                ));
            }
        }
    }

    // Pushes.
    for to in pawn.peaceful_moves(from, board) {
        if to.row() == promo_row {
            push_promotions(from, to, pawn, None, moves);
        } else if from.row().abs_diff(to.row()) == 2 {
            moves.push(Move::with_kind(from, to, pawn, None, MoveKind::DoublePush));
        } else {
            moves.push(Move::new(from, to, pawn));
        }
    }
}

/// Add all four promotion variants for a pawn push or capture.
fn push_promotions(
    from: Square,
    to: Square,
    pawn: Piece,
    captured: Option<Piece>,
    moves: &mut Vec<Move>,
) {
    for promo in [
        PieceType::Queen,
        PieceType::Rook,
        PieceType::Bishop,
        PieceType::Knight,
    ] {
        moves.push(Move::with_kind(
            from,
            to,
            pawn,
            captured,
            MoveKind::Promotion(promo),
        ));
    }
}

// =========================================================================
// Castling
// =========================================================================

fn push_castling_moves(board: &Board, us: Color, king_sq: Square, moves: &mut Vec<Move>) {
    let them = !us;

    // Can't castle while in check.
    if is_attacked(board, king_sq, them) {
        return;
    }

    let row = us.back_row();
    let king = Piece::new(us, PieceType::King);
    let rook = Piece::new(us, PieceType::Rook);

    // Kingside: king e→g; f and g must be clear and not attacked, and the
    // rook must actually be home (rights in a hand-written FEN may lie).
    if board.castling_rights.can_castle_kingside(us)
        && board.piece_at(Square::new(row, 7)) == Some(rook)
    {
        let f_sq = Square::new(row, 5);
        let g_sq = Square::new(row, 6);
        if !board.is_occupied(f_sq)
            && !board.is_occupied(g_sq)
            && !is_attacked(board, f_sq, them)
            && !is_attacked(board, g_sq, them)
        {
            moves.push(Move::with_kind(
                king_sq,
                g_sq,
                king,
                None,
                MoveKind::CastleKingside,
            ));
        }
    }

    // Queenside: king e→c; b, c, d must be clear; c and d not attacked.
    if board.castling_rights.can_castle_queenside(us)
        && board.piece_at(Square::new(row, 0)) == Some(rook)
    {
        let b_sq = Square::new(row, 1);
        let c_sq = Square::new(row, 2);
        let d_sq = Square::new(row, 3);
        if !board.is_occupied(b_sq)
            && !board.is_occupied(c_sq)
            && !board.is_occupied(d_sq)
            && !is_attacked(board, c_sq, them)
            && !is_attacked(board, d_sq, them)
        {
            moves.push(Move::with_kind(
                king_sq,
                c_sq,
                king,
                None,
                MoveKind::CastleQueenside,
            ));
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
