//! Stateful game controller wrapping `Board`.
//!
//! `Game` manages the move history, the undo stack, and game status
//! detection (check, checkmate, stalemate). It is the primary type the
//! boundary API interacts with.

use tracing::debug;

use crate::engine::board::{Board, UndoInfo};
use crate::engine::movegen;
use crate::engine::types::{ChessError, Color, GameStatus, Move, Square};

// =========================================================================
// Game
// =========================================================================

/// A complete chess game with history, undo, and status tracking.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    /// Played moves paired with the undo data needed to revert them.
    history: Vec<(Move, UndoInfo)>,
    status: GameStatus,

    // FEN tracking
    started_from_fen: bool,
    starting_fen: String,
}

impl Game {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// Create a new game from the standard starting position.
    pub fn new() -> Self {
        let board = Board::starting();
        let fen = board.to_fen();
        Self {
            board,
            history: Vec::new(),
            status: GameStatus::Active,
            started_from_fen: false,
            starting_fen: fen,
        }
    }

    /// Create a game from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let board = Board::from_fen(fen)?;
        let mut game = Self {
            board,
            history: Vec::new(),
            status: GameStatus::Active,
            started_from_fen: true,
            starting_fen: fen.to_string(),
        };
        game.status = game.compute_status();
        Ok(game)
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    /// Current board state.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Current game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Side to move.
    pub fn side_to_move(&self) -> Color {
        self.board.side_to_move
    }

    /// Played moves, oldest first, each paired with its undo data.
    pub fn history(&self) -> &[(Move, UndoInfo)] {
        &self.history
    }

    /// All legal moves in the current position.
    pub fn legal_moves(&self) -> Vec<Move> {
        movegen::legal_moves(&self.board)
    }

    /// Legal moves from a specific square.
    pub fn legal_moves_from(&self, sq: Square) -> Vec<Move> {
        movegen::legal_moves_from(&self.board, sq)
    }

    /// Whether the side to move is in check.
    pub fn is_in_check(&self) -> bool {
        movegen::is_in_check(&self.board, self.board.side_to_move)
    }

    /// Whether the game is over.
    pub fn is_game_over(&self) -> bool {
        self.status.is_game_over()
    }

    /// Current position as FEN.
    pub fn to_fen(&self) -> String {
        self.board.to_fen()
    }

    /// Whether the game was started from a custom FEN.
    pub fn started_from_fen(&self) -> bool {
        self.started_from_fen
    }

    /// The starting FEN.
    pub fn starting_fen(&self) -> &str {
        &self.starting_fen
    }

    /// Fullmove number.
    pub fn fullmove_number(&self) -> u16 {
        self.board.fullmove_number
    }

    /// Halfmove clock.
    pub fn halfmove_clock(&self) -> u16 {
        self.board.halfmove_clock
    }

    // -----------------------------------------------------------------
    // Make move
    // -----------------------------------------------------------------

    /// Play a move and return the resulting game status.
    ///
    /// The move must be one produced by [`Game::legal_moves`]. Returns
    /// `ChessError::GameOver` if the game is already finished,
    /// `ChessError::WrongTurn` if the moving piece does not belong to the
    /// side to move, and `ChessError::IllegalMove` for anything else the
    /// rules reject.
    pub fn make_move(&mut self, mv: Move) -> Result<GameStatus, ChessError> {
        if self.status.is_game_over() {
            return Err(ChessError::GameOver(format!(
                "game is over: {}",
                self.status
            )));
        }

        if mv.piece.color != self.board.side_to_move {
            return Err(ChessError::WrongTurn {
                player: mv.piece.color,
            });
        }

        // Validate legality by containment in the generated move list.
        if !self.legal_moves().contains(&mv) {
            return Err(ChessError::IllegalMove {
                from: mv.from,
                to: mv.to,
                reason: "not a legal move".into(),
            });
        }

        let undo = self.board.apply(mv);
        self.history.push((mv, undo));
        self.status = self.compute_status();

        if self.status.is_game_over() {
            debug!(
                status = self.status.as_str(),
                fullmove = self.board.fullmove_number,
                "game over"
            );
        }

        Ok(self.status)
    }

    // -----------------------------------------------------------------
    // Undo move
    // -----------------------------------------------------------------

    /// Undo the last move. Returns the move that was undone.
    pub fn undo_move(&mut self) -> Result<Move, ChessError> {
        let (mv, undo) = self.history.pop().ok_or(ChessError::NoHistory)?;
        self.board.revert(mv, &undo);
        self.status = self.compute_status();
        Ok(mv)
    }

    // -----------------------------------------------------------------
    // Load a new FEN into an existing game (reset).
    // -----------------------------------------------------------------

    /// Load a FEN position, resetting all history.
    pub fn load_fen(&mut self, fen: &str) -> Result<(), ChessError> {
        let board = Board::from_fen(fen)?;
        self.board = board;
        self.history.clear();
        self.started_from_fen = true;
        self.starting_fen = fen.to_string();
        self.status = self.compute_status();
        Ok(())
    }

    // -----------------------------------------------------------------
    // Status detection
    // -----------------------------------------------------------------

    fn compute_status(&self) -> GameStatus {
        let legal = movegen::legal_moves(&self.board);
        let in_check = movegen::is_in_check(&self.board, self.board.side_to_move);

        if legal.is_empty() {
            if in_check {
                return GameStatus::Checkmate;
            } else {
                return GameStatus::Stalemate;
            }
        }

        if in_check {
            GameStatus::Check
        } else {
            GameStatus::Active
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================
