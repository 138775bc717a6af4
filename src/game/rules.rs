use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::board::{Board, Cell, Mark};

/// 构成三连的三个格子下标。
pub type WinLine = [usize; 3];

/// 固定的 8 条胜利线：三行、三列、两条对角线。
pub const WIN_LINES: [WinLine; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "type")]
pub enum Outcome {
    InProgress,
    Win { mark: Mark, line: WinLine },
    Draw,
}

impl Outcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    pub fn winner(&self) -> Option<Mark> {
        match self {
            Outcome::Win { mark, .. } => Some(*mark),
            Outcome::InProgress | Outcome::Draw => None,
        }
    }
}

impl Default for Outcome {
    fn default() -> Self {
        Outcome::InProgress
    }
}

/// 落子被拒绝的原因。全部可恢复，直接返回给调用方。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Error)]
#[serde(tag = "type")]
pub enum InvalidMove {
    #[error("cell {index} is outside the board")]
    OutOfRange { index: usize },
    #[error("cell {index} is already occupied")]
    Occupied { index: usize },
    #[error("the game is already over")]
    GameFinished,
    #[error("the computer is still choosing its move")]
    AiThinking,
    #[error("no computer move is pending")]
    NotAiTurn,
    #[error("decision was computed for an earlier game")]
    StaleDecision,
}

pub struct RuleEngine;

impl RuleEngine {
    /// 只依据当前棋盘判定胜负，不依赖历史。
    pub fn evaluate(board: &Board) -> Outcome {
        for line in WIN_LINES {
            let [a, b, c] = line;
            let first = board.cell_at(a);
            if let Some(Cell::Mark(mark)) = first {
                if first == board.cell_at(b) && first == board.cell_at(c) {
                    return Outcome::Win { mark, line };
                }
            }
        }

        if board.is_full() {
            Outcome::Draw
        } else {
            Outcome::InProgress
        }
    }

    pub fn is_winning_move(board: &Board, index: usize, mark: Mark) -> bool {
        board
            .with_move(index, mark)
            .map(|next| RuleEngine::evaluate(&next).winner() == Some(mark))
            .unwrap_or(false)
    }
}
