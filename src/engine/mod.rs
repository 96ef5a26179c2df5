pub mod board;
pub mod game;
pub mod movegen;
pub mod rules;
pub mod types;

pub use board::{Board, BoardView, UndoInfo};
pub use game::Game;
pub use movegen::{is_attacked, is_in_check, legal_moves, legal_moves_from};
pub use types::*;
