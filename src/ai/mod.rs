pub mod engine;
pub mod evaluation;

pub use engine::{AiEngine, MinimaxAi, RandomAi, SearchStats, default_engine};
