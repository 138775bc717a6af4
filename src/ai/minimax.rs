use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::policy::MovePolicy;
use crate::game::{Board, Mark, Outcome, RuleEngine};

pub const WIN_SCORE: i32 = 10;
pub const LOSS_SCORE: i32 = -WIN_SCORE;
pub const DRAW_SCORE: i32 = 0;

/// 一次完整搜索的结果。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    pub index: usize,
    pub score: i32,
    pub nodes: u64,
}

/// 困难难度：穷举极小化极大搜索，无剪枝、无置换表。
///
/// 终局得分不按深度折扣：快赢与慢赢同分，平局为 0。
/// 同分时取升序枚举中第一个出现的着法。
#[derive(Debug, Clone, Copy, Default)]
pub struct OptimalPolicy;

impl OptimalPolicy {
    /// 以 `ai` 为极大方搜索，`ai` 必须是当前执子方。
    pub fn search(&self, board: &Board, ai: Mark) -> Option<SearchResult> {
        let mut nodes = 1;
        let mut best: Option<(usize, i32)> = None;

        for index in board.empty_indices() {
            let Ok(child) = board.with_move(index, ai) else {
                continue;
            };
            let score = minimax(&child, ai.opponent(), ai, &mut nodes);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((index, score));
            }
        }

        let (index, score) = best?;
        log::trace!("minimax for {ai}: cell {index} scores {score} after {nodes} nodes");
        Some(SearchResult {
            index,
            score,
            nodes,
        })
    }
}

impl MovePolicy for OptimalPolicy {
    fn choose_move(&self, board: &Board, mark: Mark, _rng: &mut dyn RngCore) -> Option<usize> {
        self.search(board, mark).map(|result| result.index)
    }
}

fn terminal_score(outcome: Outcome, ai: Mark) -> Option<i32> {
    match outcome {
        Outcome::Win { mark, .. } if mark == ai => Some(WIN_SCORE),
        Outcome::Win { .. } => Some(LOSS_SCORE),
        Outcome::Draw => Some(DRAW_SCORE),
        Outcome::InProgress => None,
    }
}

fn minimax(board: &Board, to_move: Mark, ai: Mark, nodes: &mut u64) -> i32 {
    *nodes += 1;
    if let Some(score) = terminal_score(RuleEngine::evaluate(board), ai) {
        return score;
    }

    let maximizing = to_move == ai;
    let mut value = if maximizing { i32::MIN } else { i32::MAX };
    for index in board.empty_indices() {
        let Ok(child) = board.with_move(index, to_move) else {
            continue;
        };
        let score = minimax(&child, to_move.opponent(), ai, nodes);
        if maximizing {
            value = value.max(score);
        } else {
            value = value.min(score);
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::Cell::{Empty as E, Mark as M};
    use crate::game::board::Mark::{O, X};

    fn play_out(mut board: Board, mut to_move: Mark) -> Outcome {
        loop {
            let outcome = RuleEngine::evaluate(&board);
            if outcome.is_terminal() {
                return outcome;
            }
            let result = OptimalPolicy
                .search(&board, to_move)
                .expect("non-terminal board has empty cells");
            board.place(result.index, to_move).expect("search returns empty cells");
            to_move = to_move.opponent();
        }
    }

    #[test]
    fn takes_immediate_win() {
        let board = Board::from_cells([M(X), M(X), E, E, M(O), E, E, E, E]);
        let result = OptimalPolicy.search(&board, X).expect("board has empty cells");
        assert_eq!(result.index, 2);
        assert_eq!(result.score, WIN_SCORE);
    }

    #[test]
    fn answers_center_with_corner_and_holds_draw() {
        let mut board = Board::new();
        board.place(4, X).expect("center is free");

        let reply = OptimalPolicy.search(&board, O).expect("board has empty cells");
        assert!([0, 2, 6, 8].contains(&reply.index), "edge reply {} loses", reply.index);
        assert_eq!(reply.score, DRAW_SCORE);

        board.place(reply.index, O).expect("reply is empty");
        assert_eq!(play_out(board, X), Outcome::Draw);
    }

    #[test]
    fn corner_reply_after_center_and_opposite_corner_keeps_draw() {
        // X:4, O:8, X:0 之后，O 的应着不能给 X 留下双重威胁。
        let board = Board::from_cells([M(X), E, E, E, M(X), E, E, E, M(O)]);
        let reply = OptimalPolicy.search(&board, O).expect("board has empty cells");
        assert_eq!(reply.score, DRAW_SCORE);
        assert!([2, 6].contains(&reply.index), "reply {} allows a fork", reply.index);

        let after = board.with_move(reply.index, O).expect("reply is empty");
        assert_eq!(play_out(after, X), Outcome::Draw);
    }

    #[test]
    fn perfect_play_from_empty_board_is_draw() {
        assert_eq!(play_out(Board::new(), X), Outcome::Draw);
    }

    #[test]
    fn never_loses_as_o_against_any_x_sequence() {
        fn x_to_move(board: Board, games: &mut u64) {
            let outcome = RuleEngine::evaluate(&board);
            if outcome.is_terminal() {
                assert_ne!(outcome.winner(), Some(X), "O lost on\n{board}");
                *games += 1;
                return;
            }
            for index in board.empty_indices() {
                let after_x = board.with_move(index, X).expect("index is empty");
                let outcome = RuleEngine::evaluate(&after_x);
                if outcome.is_terminal() {
                    assert_ne!(outcome.winner(), Some(X), "O lost on\n{after_x}");
                    *games += 1;
                    continue;
                }
                let reply = OptimalPolicy
                    .search(&after_x, O)
                    .expect("non-terminal board has empty cells");
                let after_o = after_x.with_move(reply.index, O).expect("reply is empty");
                x_to_move(after_o, games);
            }
        }

        let mut games = 0;
        x_to_move(Board::new(), &mut games);
        assert!(games > 0);
    }

    #[test]
    fn ties_break_toward_lowest_index() {
        // 三个空格都导致平局，应选下标最小的那个。
        let board = Board::from_cells([
            M(X), M(X), M(O),
            M(O), E, M(X),
            E, M(O), E,
        ]);
        let result = OptimalPolicy.search(&board, X).expect("board has empty cells");
        assert_eq!(result.index, 4);
        assert_eq!(result.score, DRAW_SCORE);
    }
}
