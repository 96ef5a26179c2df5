//! AI Engine — trait definition, RandomAi, and MinimaxAi.
//!
//! The `AiEngine` trait defines the interface for all AI engines.
//! Two implementations are provided:
//!   - `RandomAi`  — plays a random legal move (used for "harmless" difficulty).
//!   - `MinimaxAi` — minimax search with alpha-beta pruning.
//!
//! Scores are always taken from the root player's perspective: the search
//! maximizes at the root player's plies and minimizes at the opponent's,
//! rather than negating per ply.

use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use tracing::debug;

use crate::engine::board::Board;
use crate::engine::game::Game;
use crate::engine::movegen::{is_in_check, legal_moves};
use crate::engine::types::{ChessError, Color, Difficulty, Move, PieceType};

use super::evaluation::{evaluate, INF, MATE};

// =========================================================================
// AiEngine trait
// =========================================================================

/// The AI engine interface.
pub trait AiEngine: Send + Sync {
    /// Select the best move for the current position at the given difficulty.
    fn best_move(&self, game: &Game, difficulty: Difficulty) -> Result<Move, ChessError>;

    /// Human-readable name for this engine.
    fn name(&self) -> &str;
}

// =========================================================================
// RandomAi
// =========================================================================

/// Picks a random legal move. Used for "harmless" difficulty.
pub struct RandomAi;

impl AiEngine for RandomAi {
    fn best_move(&self, game: &Game, _difficulty: Difficulty) -> Result<Move, ChessError> {
        let moves = game.legal_moves();
        if moves.is_empty() {
            return Err(ChessError::GameOver("no legal moves".to_string()));
        }
        let mut rng = rand::thread_rng();
        Ok(*moves.choose(&mut rng).unwrap())
    }

    fn name(&self) -> &str {
        "RandomAi"
    }
}

// =========================================================================
// Move ordering (MVV-LVA)
// =========================================================================

/// Piece values for MVV-LVA ordering. Kings score 0 so a king capture never
/// drags its move down the list.
const ORDER_VALUE: [i32; PieceType::COUNT] = [10, 30, 30, 50, 90, 0];

/// Score a move for ordering. Higher = searched first.
fn move_order_score(mv: &Move) -> i32 {
    let mut score = 0i32;

    // Captures: most valuable victim, least valuable attacker.
    if let Some(victim) = mv.captured {
        score += 10_000 + ORDER_VALUE[victim.kind.index()] * 10
            - ORDER_VALUE[mv.piece.kind.index()];
    }

    if let Some(promo) = mv.promotion() {
        score += 8_000 + ORDER_VALUE[promo.index()];
    }

    score
}

/// Sort moves for alpha-beta search (best-first). The sort is stable, so
/// equally scored moves keep their generation order.
fn order_moves(moves: &mut [Move]) {
    moves.sort_by_key(|m| std::cmp::Reverse(move_order_score(m)));
}

// =========================================================================
// MinimaxAi — minimax with alpha-beta pruning
// =========================================================================

/// Search statistics.
#[derive(Debug, Default)]
pub struct SearchStats {
    pub nodes: u64,
    pub depth: u32,
    pub score: i32,
    pub time_ms: u64,
}

/// Bookkeeping for a single search.
struct SearchContext {
    time_limit: Option<Duration>,
    start_time: Instant,
    nodes: u64,
    aborted: bool,
}

impl SearchContext {
    fn new(time_limit: Option<Duration>) -> Self {
        Self {
            time_limit,
            start_time: Instant::now(),
            nodes: 0,
            aborted: false,
        }
    }

    /// Check the time budget every 1024 nodes.
    #[inline]
    fn check_time(&mut self) {
        if self.nodes & 1023 == 0 {
            if let Some(limit) = self.time_limit {
                if self.start_time.elapsed() >= limit {
                    self.aborted = true;
                }
            }
        }
    }
}

/// Minimax with alpha-beta pruning.
///
/// `root` is the player the score is for; the function maximizes when it is
/// `root`'s turn and minimizes otherwise. `ply` is the distance from the
/// root, used to prefer faster mates.
fn minimax(
    board: &mut Board,
    depth: u32,
    ply: u32,
    mut alpha: i32,
    mut beta: i32,
    root: Color,
    ctx: &mut SearchContext,
) -> i32 {
    if ctx.aborted {
        return 0;
    }

    ctx.nodes += 1;
    ctx.check_time();
    if ctx.aborted {
        return 0;
    }

    // Generate legal moves first so checkmate and stalemate are detected at
    // any depth — including depth 0. Without this, a depth-1 search calling
    // minimax(depth=0) would miss mate-in-1.
    let mut moves = legal_moves(board);

    // Terminal: no legal moves.
    if moves.is_empty() {
        if is_in_check(board, board.side_to_move) {
            // The side to move is mated; sign depends on whose king fell.
            let score = MATE - ply as i32;
            return if board.side_to_move == root {
                -score
            } else {
                score
            };
        }
        return 0; // Stalemate.
    }

    // Leaf node (after terminal check).
    if depth == 0 {
        return evaluate(board, root);
    }

    order_moves(&mut moves);

    let maximizing = board.side_to_move == root;
    let mut best_score = if maximizing { -INF } else { INF };

    for mv in &moves {
        let undo = board.apply(*mv);
        let score = minimax(board, depth - 1, ply + 1, alpha, beta, root, ctx);
        board.revert(*mv, &undo);

        if ctx.aborted {
            return best_score;
        }

        if maximizing {
            best_score = best_score.max(score);
            alpha = alpha.max(best_score);
        } else {
            best_score = best_score.min(score);
            beta = beta.min(best_score);
        }
        if alpha >= beta {
            break; // Cutoff.
        }
    }

    best_score
}

/// Minimax AI engine with alpha-beta pruning.
pub struct MinimaxAi {
    /// Optional time limit per search (if None, depth alone limits search).
    time_limit: Option<Duration>,
}

impl MinimaxAi {
    pub fn new() -> Self {
        Self { time_limit: None }
    }

    pub fn with_time_limit(time_limit: Duration) -> Self {
        Self {
            time_limit: Some(time_limit),
        }
    }

    /// Run a fixed-depth search. Returns (best_move, stats).
    ///
    /// The board is mutated during the search and restored before returning,
    /// even when the time budget expires mid-tree.
    pub fn search_fixed_depth(&self, board: &mut Board, depth: u32) -> (Option<Move>, SearchStats) {
        let mut ctx = SearchContext::new(self.time_limit);
        let start = Instant::now();
        let root = board.side_to_move;

        // Root moves stay in generation order, so equal scores resolve to
        // the first move enumerated.
        let moves = legal_moves(board);
        if moves.is_empty() {
            return (
                None,
                SearchStats {
                    nodes: 1,
                    depth,
                    score: 0,
                    time_ms: 0,
                },
            );
        }

        let mut best_move = moves[0];
        let mut best_score = -INF;

        for mv in &moves {
            let undo = board.apply(*mv);
            let score = minimax(
                board,
                depth.saturating_sub(1),
                1,
                best_score,
                INF,
                root,
                &mut ctx,
            );
            board.revert(*mv, &undo);

            if ctx.aborted {
                // Keep whatever we found so far.
                break;
            }

            if score > best_score {
                best_score = score;
                best_move = *mv;
            }
        }

        let stats = SearchStats {
            nodes: ctx.nodes,
            depth,
            score: best_score,
            time_ms: start.elapsed().as_millis() as u64,
        };
        debug!(
            nodes = stats.nodes,
            depth = stats.depth,
            score = stats.score,
            time_ms = stats.time_ms,
            aborted = ctx.aborted,
            "search complete"
        );
        (Some(best_move), stats)
    }
}

impl Default for MinimaxAi {
    fn default() -> Self {
        Self::new()
    }
}

impl AiEngine for MinimaxAi {
    fn best_move(&self, game: &Game, difficulty: Difficulty) -> Result<Move, ChessError> {
        let depth = difficulty.depth();

        // Harmless = random.
        if depth == 0 {
            return RandomAi.best_move(game, difficulty);
        }

        // Search on a private copy; the game's own board is never touched.
        let mut board = game.board().clone();
        let (best, _stats) = self.search_fixed_depth(&mut board, depth);

        match best {
            Some(mv) => Ok(mv),
            None => Err(ChessError::GameOver("no legal moves".to_string())),
        }
    }

    fn name(&self) -> &str {
        "MinimaxAi"
    }
}

/// Convenience: create the default AI engine.
pub fn default_engine() -> MinimaxAi {
    MinimaxAi::new()
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::evaluation::is_mate_score;
    use crate::engine::game::Game;
    use crate::engine::types::{Difficulty, GameStatus, Square};

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    // --- RandomAi ---

    #[test]
    fn random_ai_returns_legal_move() {
        let game = Game::new();
        let ai = RandomAi;
        for _ in 0..100 {
            let mv = ai.best_move(&game, Difficulty::Harmless).unwrap();
            let legal = game.legal_moves();
            assert!(legal.contains(&mv), "RandomAi returned illegal move: {mv}");
        }
    }

    #[test]
    fn random_ai_errors_when_no_moves() {
        // Fool's mate — no legal moves.
        let game = Game::from_fen("rnb1kbnr/pppp1ppp/4p3/8/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .unwrap();
        let ai = RandomAi;
        assert!(ai.best_move(&game, Difficulty::Harmless).is_err());
    }

    // --- Move ordering ---

    #[test]
    fn captures_ordered_before_quiet_moves() {
        let board =
            Board::from_fen("r1bqkb1r/pppppppp/2n2n2/4P3/8/8/PPPP1PPP/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        let mut moves = legal_moves(&board);
        order_moves(&mut moves);
        assert!(moves[0].is_capture(), "capture should be ordered first");
    }

    #[test]
    fn bigger_victims_ordered_first() {
        // The queen on c5 can take the rook on d5 or the pawn on b6.
        let board = Board::from_fen("4k3/8/1p6/2Qr4/8/8/8/4K3 w - - 0 1").unwrap();
        let mut moves = legal_moves(&board);
        order_moves(&mut moves);
        assert_eq!(moves[0].to, sq("d5"), "rook capture should outrank pawn capture");
    }

    // --- MinimaxAi ---

    #[test]
    fn minimax_finds_mate_in_one_white() {
        // Scholar's mate pattern: Qxf7# is available.
        let game =
            Game::from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4")
                .unwrap();
        let ai = MinimaxAi::new();
        let mv = ai.best_move(&game, Difficulty::Easy).unwrap();
        assert_eq!(mv.to, sq("f7"), "should find Qxf7# mate-in-1");
    }

    #[test]
    fn minimax_finds_mate_in_one_black() {
        // Fool's mate position: after 1.f3 e5 2.g4, Black plays Qh4#.
        let game = Game::from_fen("rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq g3 0 2")
            .unwrap();
        let ai = MinimaxAi::new();
        let mv = ai.best_move(&game, Difficulty::Easy).unwrap();

        let mut game_copy = game.clone();
        let status = game_copy.make_move(mv).unwrap();
        assert_eq!(status, GameStatus::Checkmate, "should find a mating move");
    }

    #[test]
    fn minimax_captures_hanging_piece() {
        // White queen can capture an undefended black rook.
        let game = Game::from_fen("4k3/8/8/3r4/8/8/3Q4/4K3 w - - 0 1").unwrap();
        let ai = MinimaxAi::new();
        let mv = ai.best_move(&game, Difficulty::Medium).unwrap();
        assert_eq!(mv.to, sq("d5"), "should capture hanging rook on d5");
    }

    #[test]
    fn minimax_rescues_attacked_queen() {
        // The white queen on d4 is attacked by the pawn on e5; leaving it
        // there loses queen for pawn.
        let game = Game::from_fen("4k3/8/8/4p3/3Q4/8/8/4K3 w - - 0 1").unwrap();
        let ai = MinimaxAi::new();
        let mv = ai.best_move(&game, Difficulty::Medium).unwrap();
        assert_eq!(mv.from, sq("d4"), "queen should move or take the pawn");
    }

    #[test]
    fn minimax_at_easy_returns_legal_move() {
        let game = Game::new();
        let ai = MinimaxAi::new();
        let mv = ai.best_move(&game, Difficulty::Easy).unwrap();
        assert!(game.legal_moves().contains(&mv));
    }

    #[test]
    fn harmless_delegates_to_random() {
        let game = Game::new();
        let ai = MinimaxAi::new();
        let mv = ai.best_move(&game, Difficulty::Harmless).unwrap();
        assert!(game.legal_moves().contains(&mv));
    }

    #[test]
    fn tie_break_is_first_enumerated_move() {
        // Every opening move scores 0 material, so the tie resolves to the
        // first move generated. Repeat runs must agree.
        let ai = MinimaxAi::new();
        let mut board = Board::starting();
        let (mv, stats) = ai.search_fixed_depth(&mut board, 1);
        assert_eq!(mv.unwrap().to_string(), "a2a3");
        assert_eq!(stats.score, 0);

        let (again, _) = ai.search_fixed_depth(&mut board, 1);
        assert_eq!(again.unwrap().to_string(), "a2a3");
    }

    #[test]
    fn board_restored_after_search() {
        let ai = MinimaxAi::new();
        let mut board =
            Board::from_fen("r1bqkb1r/pppppppp/2n2n2/4P3/8/8/PPPP1PPP/RNBQKBNR w KQkq - 1 3")
                .unwrap();
        let before = board.to_fen();
        ai.search_fixed_depth(&mut board, 3);
        assert_eq!(board.to_fen(), before);
    }

    #[test]
    fn aborted_search_restores_board_and_moves() {
        let game = Game::new();
        let ai = MinimaxAi::with_time_limit(Duration::from_millis(1));
        let mut board = game.board().clone();
        let before = board.to_fen();
        let (mv, _stats) = ai.search_fixed_depth(&mut board, 8);
        assert_eq!(board.to_fen(), before, "abort must leave the board pristine");
        assert!(game.legal_moves().contains(&mv.unwrap()));
    }

    #[test]
    fn search_with_time_limit() {
        let game = Game::new();
        let ai = MinimaxAi::with_time_limit(Duration::from_millis(100));
        let mv = ai.best_move(&game, Difficulty::Godlike).unwrap();
        assert!(game.legal_moves().contains(&mv));
    }

    #[test]
    fn search_stats_populated() {
        let ai = MinimaxAi::new();
        let mut board = Board::starting();
        let (_mv, stats) = ai.search_fixed_depth(&mut board, 3);
        assert!(stats.nodes > 0, "should have explored some nodes");
        assert_eq!(stats.depth, 3);
    }

    #[test]
    fn minimax_errors_when_game_over() {
        let game = Game::from_fen("rnb1kbnr/pppp1ppp/4p3/8/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .unwrap();
        let ai = MinimaxAi::new();
        assert!(matches!(
            ai.best_move(&game, Difficulty::Easy),
            Err(ChessError::GameOver(_))
        ));
    }

    #[test]
    fn default_engine_works() {
        let engine = default_engine();
        assert_eq!(engine.name(), "MinimaxAi");
        let game = Game::new();
        let mv = engine.best_move(&game, Difficulty::Easy).unwrap();
        assert!(game.legal_moves().contains(&mv));
    }

    #[test]
    fn mate_score_prefers_faster_mate() {
        // Qxf7# is mate-in-1; deeper mates must not outrank it.
        let game =
            Game::from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4")
                .unwrap();
        let ai = MinimaxAi::new();
        let mut board = game.board().clone();
        let (mv, stats) = ai.search_fixed_depth(&mut board, 3);
        assert_eq!(mv.unwrap().to, sq("f7"));
        assert!(
            is_mate_score(stats.score),
            "score should indicate forced mate: {}",
            stats.score
        );
    }

    // --- Pruning equivalence ---

    /// Reference minimax with no pruning and no ordering.
    fn plain_minimax(board: &mut Board, depth: u32, ply: u32, root: Color) -> i32 {
        let moves = legal_moves(board);
        if moves.is_empty() {
            if is_in_check(board, board.side_to_move) {
                let score = MATE - ply as i32;
                return if board.side_to_move == root {
                    -score
                } else {
                    score
                };
            }
            return 0;
        }
        if depth == 0 {
            return evaluate(board, root);
        }

        let maximizing = board.side_to_move == root;
        let mut best = if maximizing { -INF } else { INF };
        for mv in &moves {
            let undo = board.apply(*mv);
            let score = plain_minimax(board, depth - 1, ply + 1, root);
            board.revert(*mv, &undo);
            best = if maximizing {
                best.max(score)
            } else {
                best.min(score)
            };
        }
        best
    }

    fn plain_root(board: &mut Board, depth: u32) -> (Move, i32) {
        let root = board.side_to_move;
        let moves = legal_moves(board);
        let mut best_move = moves[0];
        let mut best_score = -INF;
        for mv in &moves {
            let undo = board.apply(*mv);
            let score = plain_minimax(board, depth.saturating_sub(1), 1, root);
            board.revert(*mv, &undo);
            if score > best_score {
                best_score = score;
                best_move = *mv;
            }
        }
        (best_move, best_score)
    }

    #[test]
    fn pruning_never_changes_the_root_choice() {
        let fens = [
            "4k3/8/8/3r4/8/8/3Q4/4K3 w - - 0 1",
            "r1bqkb1r/pppppppp/2n2n2/4P3/8/8/PPPP1PPP/RNBQKBNR w KQkq - 1 3",
        ];
        let ai = MinimaxAi::new();
        for fen in fens {
            let mut board = Board::from_fen(fen).unwrap();
            let (plain_mv, plain_score) = plain_root(&mut board, 2);
            let (pruned_mv, stats) = ai.search_fixed_depth(&mut board, 2);
            assert_eq!(pruned_mv.unwrap(), plain_mv, "choice diverged on {fen}");
            assert_eq!(stats.score, plain_score, "score diverged on {fen}");
        }
    }
}
