use rand::seq::SliceRandom;
use rand::RngCore;

use crate::game::{Board, Mark, RuleEngine};

/// 电脑选点策略：给定棋盘与执子方，返回一个空格下标。
///
/// 只有棋盘已满时才返回 `None`，调用方应避免这种情况。
pub trait MovePolicy {
    fn choose_move(&self, board: &Board, mark: Mark, rng: &mut dyn RngCore) -> Option<usize>;
}

/// 简单难度：在空格中均匀随机选择。
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPolicy;

impl MovePolicy for RandomPolicy {
    fn choose_move(&self, board: &Board, _mark: Mark, rng: &mut dyn RngCore) -> Option<usize> {
        board.empty_indices().choose(rng).copied()
    }
}

/// 中等难度：能赢就赢，否则堵截对手，再否则随机。
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicPolicy;

impl HeuristicPolicy {
    /// 升序扫描，返回第一个能让 `mark` 立即获胜的空格。
    pub fn immediate_win(board: &Board, mark: Mark) -> Option<usize> {
        board
            .empty_indices()
            .into_iter()
            .find(|&index| RuleEngine::is_winning_move(board, index, mark))
    }
}

impl MovePolicy for HeuristicPolicy {
    fn choose_move(&self, board: &Board, mark: Mark, rng: &mut dyn RngCore) -> Option<usize> {
        if let Some(index) = Self::immediate_win(board, mark) {
            return Some(index);
        }
        if let Some(index) = Self::immediate_win(board, mark.opponent()) {
            return Some(index);
        }
        RandomPolicy.choose_move(board, mark, rng)
    }
}
