//! Fixed-depth minimax AI

use crate::board::Player;
use crate::eval::{evaluate, Heuristics};
use crate::movegen::{all_inputs, Candidate, CandidateOrder, Shuffled};
use crate::snapshot::Snapshot;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Plies searched, counting the evaluated leaf ply
pub const SEARCH_DEPTH: u32 = 4;

/// Seed used when none is configured
const DEFAULT_SEED: u64 = 42;

// ============================================================================
// MINIMAX AI
// ============================================================================

/// Outcome of one root search
#[derive(Clone, Debug)]
pub struct SearchReport {
    pub best: Option<Candidate>,
    pub score: i32,
    pub nodes: u64,
}

/// Minimax player. Red maximizes, Black minimizes.
///
/// Ties resolve to the latest candidate seen, so the candidate order (a
/// seeded shuffle by default) decides between equal moves.
#[derive(Clone, Debug)]
pub struct MinimaxAI<O = Shuffled> {
    pub depth: u32,
    /// Cut branches once alpha meets beta
    pub prune: bool,
    pub heuristics: Heuristics,
    order: O,
    nodes: u64,
}

impl MinimaxAI<Shuffled> {
    pub fn new(depth: u32, heuristics: Heuristics) -> Self {
        Self::with_seed(depth, heuristics, DEFAULT_SEED)
    }

    pub fn with_seed(depth: u32, heuristics: Heuristics, seed: u64) -> Self {
        Self::with_order(depth, heuristics, Shuffled::seeded(seed))
    }
}

impl<O: CandidateOrder> MinimaxAI<O> {
    pub fn with_order(depth: u32, heuristics: Heuristics, order: O) -> Self {
        Self {
            depth: depth.max(2),
            prune: false,
            heuristics,
            order,
            nodes: 0,
        }
    }

    pub fn with_pruning(mut self, prune: bool) -> Self {
        self.prune = prune;
        self
    }

    /// Best move for `player` on `snapshot`, or None if it has no move
    pub fn best_move(&mut self, player: Player, snapshot: &Snapshot) -> Option<Candidate> {
        self.search(player, snapshot).best
    }

    /// Run a full root search and report the chosen move and its score
    pub fn search(&mut self, player: Player, snapshot: &Snapshot) -> SearchReport {
        self.nodes = 0;
        let candidates = all_inputs(player, snapshot, &mut self.order);

        let mut best = None;
        let mut best_score = worst_for(player);
        let (mut alpha, mut beta) = (i32::MIN, i32::MAX);

        for candidate in candidates {
            // Widen the bound by one so a tied sibling comes back exact
            // rather than as a cut-off bound
            let score = match player {
                Player::Red => self.minimax(player.opponent(), 1, alpha.saturating_sub(1), beta, &candidate.snapshot),
                Player::Black => self.minimax(player.opponent(), 1, alpha, beta.saturating_add(1), &candidate.snapshot),
            };

            let better = match player {
                Player::Red => score >= best_score,
                Player::Black => score <= best_score,
            };
            if better {
                best_score = score;
                best = Some(candidate);
            }

            match player {
                Player::Red => alpha = alpha.max(best_score),
                Player::Black => beta = beta.min(best_score),
            }
        }

        tracing::debug!(
            player = %player,
            score = best_score,
            nodes = self.nodes,
            "search finished"
        );

        SearchReport {
            best,
            score: best_score,
            nodes: self.nodes,
        }
    }

    fn minimax(&mut self, player: Player, ply: u32, mut alpha: i32, mut beta: i32, snapshot: &Snapshot) -> i32 {
        self.nodes += 1;
        if ply + 1 >= self.depth {
            return evaluate(snapshot, &self.heuristics);
        }

        let candidates = all_inputs(player, snapshot, &mut self.order);
        let mut best_score = worst_for(player);

        for candidate in candidates {
            let score = self.minimax(player.opponent(), ply + 1, alpha, beta, &candidate.snapshot);

            match player {
                Player::Red => {
                    if score >= best_score {
                        best_score = score;
                    }
                    alpha = alpha.max(best_score);
                }
                Player::Black => {
                    if score <= best_score {
                        best_score = score;
                    }
                    beta = beta.min(best_score);
                }
            }

            if self.prune && alpha >= beta {
                break;
            }
        }

        best_score
    }
}

/// Score of a position where `player` has nothing to play
fn worst_for(player: Player) -> i32 {
    match player {
        Player::Red => i32::MIN,
        Player::Black => i32::MAX,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Cell};
    use crate::movegen::Natural;

    #[test]
    fn test_ai_returns_move() {
        let snap = Snapshot::of(&Board::initial());
        let mut ai = MinimaxAI::new(3, Heuristics::default());
        let mv = ai.best_move(Player::Red, &snap).unwrap();
        assert_eq!(mv.player, Player::Red);
    }

    #[test]
    fn test_no_moves_returns_none() {
        let snap = Snapshot::from_pebbles(&[(Cell::new(3, 3), Player::Black)]);
        let mut ai = MinimaxAI::new(SEARCH_DEPTH, Heuristics::default());
        assert!(ai.best_move(Player::Red, &snap).is_none());
    }

    #[test]
    fn test_single_legal_move_is_chosen() {
        // Red's only pebble is boxed into a corner except for (1, 1)
        let snap = Snapshot::from_pebbles(&[
            (Cell::new(0, 0), Player::Red),
            (Cell::new(0, 1), Player::Black),
            (Cell::new(1, 0), Player::Black),
            (Cell::new(3, 1), Player::Black),
        ]);
        assert_eq!(all_inputs(Player::Red, &snap, &mut Natural).len(), 1);

        for seed in 0..8 {
            let mut ai = MinimaxAI::with_seed(SEARCH_DEPTH, Heuristics::default(), seed);
            let mv = ai.best_move(Player::Red, &snap).unwrap();
            assert_eq!(mv.from, Cell::new(0, 0));
            assert_eq!(mv.to, Cell::new(1, 1));
        }
    }

    #[test]
    fn test_single_forced_capture_is_chosen() {
        // (1, 0) is walled in; its only move crosses the inner arc onto (0, 1)
        let snap = Snapshot::from_pebbles(&[
            (Cell::new(1, 0), Player::Red),
            (Cell::new(0, 0), Player::Black),
            (Cell::new(0, 1), Player::Black),
            (Cell::new(1, 1), Player::Black),
            (Cell::new(2, 0), Player::Black),
            (Cell::new(2, 1), Player::Black),
        ]);
        let inputs = all_inputs(Player::Red, &snap, &mut Natural);
        assert_eq!(inputs.len(), 1);

        for seed in 0..8 {
            let mut ai = MinimaxAI::with_seed(SEARCH_DEPTH, Heuristics::default(), seed);
            let mv = ai.best_move(Player::Red, &snap).unwrap();
            assert_eq!(mv.to, Cell::new(0, 1));
            assert_eq!(mv.captures, 1);
            assert_eq!(mv.direction(), Some(crate::board::Direction::Left));
        }
    }

    #[test]
    fn test_ai_takes_free_capture() {
        // Red on (2, 2) can run up column 2 and across the outer arc onto (2, 0)
        let snap = Snapshot::from_pebbles(&[
            (Cell::new(2, 2), Player::Red),
            (Cell::new(2, 0), Player::Black),
            (Cell::new(5, 5), Player::Red),
        ]);
        let mut ai = MinimaxAI::new(2, Heuristics::default());
        let mv = ai.best_move(Player::Red, &snap).unwrap();
        assert_eq!(mv.captures, 1);
        assert_eq!(mv.snapshot.count(Player::Black), 0);
    }

    #[test]
    fn test_pruning_keeps_score() {
        let snap = Snapshot::from_pebbles(&[
            (Cell::new(1, 1), Player::Red),
            (Cell::new(2, 3), Player::Red),
            (Cell::new(4, 2), Player::Black),
            (Cell::new(3, 4), Player::Black),
        ]);
        for player in [Player::Red, Player::Black] {
            let mut plain = MinimaxAI::with_order(SEARCH_DEPTH, Heuristics::default(), Natural);
            let mut pruned = MinimaxAI::with_order(SEARCH_DEPTH, Heuristics::default(), Natural).with_pruning(true);
            let a = plain.search(player, &snap);
            let b = pruned.search(player, &snap);

            assert_eq!(a.score, b.score);
            assert!(b.nodes <= a.nodes);
            // The pruned pick must score as well as the plain pick
            let picked = b.best.unwrap();
            let mut check = MinimaxAI::with_order(SEARCH_DEPTH, Heuristics::default(), Natural);
            let exact = check.minimax(player.opponent(), 1, i32::MIN, i32::MAX, &picked.snapshot);
            assert_eq!(exact, a.score);
        }
    }

    #[test]
    fn test_seeded_search_is_deterministic() {
        let snap = Snapshot::of(&Board::initial());
        let mut a = MinimaxAI::with_seed(3, Heuristics::default(), 9);
        let mut b = MinimaxAI::with_seed(3, Heuristics::default(), 9);
        let ma = a.best_move(Player::Black, &snap).unwrap();
        let mb = b.best_move(Player::Black, &snap).unwrap();
        assert_eq!((ma.from, ma.to, ma.kind), (mb.from, mb.to, mb.kind));
    }
}
