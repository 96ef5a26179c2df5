//! Chess rules engine with a minimax AI.
//!
//! The crate is a pure library: hosts own the UI, clocks, and persistence,
//! and drive games through [`api`]. The [`engine`] modules implement board
//! state, per-piece movement rules, and legal move generation; [`ai`]
//! implements evaluation and search.

pub mod ai;
pub mod api;
pub mod engine;

pub use ai::{AiEngine, MinimaxAi, RandomAi};
pub use api::{legal_destinations, request_best_move, request_move, Snapshot};
pub use engine::{
    Board, ChessError, Color, Difficulty, Game, GameStatus, Move, Piece, PieceType, Square,
};
