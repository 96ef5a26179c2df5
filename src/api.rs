//! Library boundary: move requests, AI requests, and snapshots.
//!
//! Hosts (a UI, a service, a test harness) drive a [`Game`] through these
//! free functions instead of reaching into the engine modules. All request
//! validation funnels into [`Game::make_move`], so an AI move and a human
//! move take the same path.

use serde::{Deserialize, Serialize};

use crate::ai::engine::MinimaxAi;
use crate::engine::game::Game;
use crate::engine::types::{ChessError, Color, GameStatus, Move, PieceType, Square};

// =========================================================================
// Move requests
// =========================================================================

/// Resolve and play a move given as origin, destination, and optional
/// promotion piece.
///
/// The request must name a piece of the side to move (`WrongTurn`
/// otherwise) and match a legal move exactly; a promotion move matches only
/// when `promotion` names its piece. Returns the game status after the
/// move.
pub fn request_move(
    game: &mut Game,
    from: Square,
    to: Square,
    promotion: Option<PieceType>,
) -> Result<GameStatus, ChessError> {
    if game.is_game_over() {
        return Err(ChessError::GameOver(format!(
            "game is over: {}",
            game.status()
        )));
    }

    let piece = match game.board().piece_at(from) {
        Some(p) => p,
        None => {
            return Err(ChessError::IllegalMove {
                from,
                to,
                reason: "no piece on the origin square".into(),
            })
        }
    };
    if piece.color != game.side_to_move() {
        return Err(ChessError::WrongTurn {
            player: piece.color,
        });
    }

    let mv = game
        .legal_moves_from(from)
        .into_iter()
        .find(|m| m.to == to && m.promotion() == promotion)
        .ok_or_else(|| ChessError::IllegalMove {
            from,
            to,
            reason: "not a legal move".into(),
        })?;

    game.make_move(mv)
}

/// Ask the engine for the best move for `player` at the given search depth.
///
/// Errors with `WrongTurn` unless it is `player`'s turn. The returned move
/// is not applied; callers feed it back through [`request_move`] or
/// [`Game::make_move`] like any other move.
pub fn request_best_move(game: &Game, player: Color, depth: u32) -> Result<Move, ChessError> {
    if player != game.side_to_move() {
        return Err(ChessError::WrongTurn { player });
    }

    // Search runs on a private copy of the board.
    let mut board = game.board().clone();
    let (best, _stats) = MinimaxAi::new().search_fixed_depth(&mut board, depth);
    best.ok_or_else(|| ChessError::GameOver("no legal moves".to_string()))
}

/// Destination squares reachable from `from`, deduplicated for highlighting
/// (the four promotion choices collapse to one square).
pub fn legal_destinations(game: &Game, from: Square) -> Vec<Square> {
    let mut squares = Vec::new();
    for mv in game.legal_moves_from(from) {
        if !squares.contains(&mv.to) {
            squares.push(mv.to);
        }
    }
    squares
}

// =========================================================================
// Snapshot
// =========================================================================

/// Serializable still image of a game's minimal state.
///
/// Row 0 of `board` is rank 8 (Black's back row); pieces use FEN letters,
/// uppercase for White. This is the same state FEN encodes, shaped for
/// hosts that want a grid instead of a packed string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub board: Vec<Vec<Option<char>>>,
    pub turn: String,
    pub castling: String,
    pub en_passant: Option<String>,
    pub fullmove_number: u16,
}

impl Snapshot {
    /// Capture the current state of a game.
    pub fn capture(game: &Game) -> Self {
        let board = game.board();
        let mut grid = Vec::with_capacity(8);
        for row in 0..8 {
            let mut cells = Vec::with_capacity(8);
            for col in 0..8 {
                cells.push(board.piece_at(Square::new(row, col)).map(|p| p.symbol()));
            }
            grid.push(cells);
        }

        Self {
            board: grid,
            turn: match board.side_to_move {
                Color::White => "white".to_string(),
                Color::Black => "black".to_string(),
            },
            castling: board.castling_rights.to_fen(),
            en_passant: board.en_passant.map(|sq| sq.to_algebraic()),
            fullmove_number: board.fullmove_number,
        }
    }

    /// Rebuild a game from a snapshot.
    ///
    /// The snapshot is rendered to FEN and funneled through the same
    /// validation as any FEN import; a malformed grid, turn, or castling
    /// string comes back as `ChessError::InvalidFen`.
    pub fn restore(&self) -> Result<Game, ChessError> {
        if self.board.len() != 8 || self.board.iter().any(|row| row.len() != 8) {
            return Err(ChessError::InvalidFen(
                "snapshot grid must be 8x8".to_string(),
            ));
        }

        let mut placement = String::new();
        for (row_idx, row) in self.board.iter().enumerate() {
            if row_idx > 0 {
                placement.push('/');
            }
            let mut empty_run = 0u8;
            for cell in row {
                match cell {
                    Some(c) => {
                        if empty_run > 0 {
                            placement.push((b'0' + empty_run) as char);
                            empty_run = 0;
                        }
                        placement.push(*c);
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                placement.push((b'0' + empty_run) as char);
            }
        }

        let turn = match self.turn.as_str() {
            "white" => "w",
            "black" => "b",
            other => {
                return Err(ChessError::InvalidFen(format!(
                    "snapshot turn must be \"white\" or \"black\", got {other:?}"
                )))
            }
        };

        let ep = self.en_passant.as_deref().unwrap_or("-");
        let fen = format!(
            "{placement} {turn} {castling} {ep} 0 {fullmove}",
            castling = self.castling,
            fullmove = self.fullmove_number,
        );
        Game::from_fen(&fen)
    }
}

// =========================================================================
// Tests
// =========================================================================
