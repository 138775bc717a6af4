use std::fmt;

use serde::{Deserialize, Serialize};

use super::rules::InvalidMove;

/// 棋盘格子数量（3×3）。
pub const CELL_COUNT: usize = 9;
/// 棋盘边长。
pub const SIDE: usize = 3;

/// 棋子标记，X 永远先手。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

impl Default for Mark {
    fn default() -> Self {
        Mark::X
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mark::X => f.write_str("X"),
            Mark::O => f.write_str("O"),
        }
    }
}

/// 单个格子的内容。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "type", content = "mark")]
pub enum Cell {
    Empty,
    Mark(Mark),
}

impl Cell {
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn mark(self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Mark(mark) => Some(mark),
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Empty
    }
}

/// 3×3 棋盘，按行优先存储（0,1,2 / 3,4,5 / 6,7,8）。
///
/// `Board` 是 `Copy` 的值类型，搜索时直接复制分支而不会改动对局中的棋盘。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Cell; CELL_COUNT]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// 越界时返回 `None`。
    pub fn cell_at(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub fn place(&mut self, index: usize, mark: Mark) -> Result<(), InvalidMove> {
        let cell = self
            .cells
            .get_mut(index)
            .ok_or(InvalidMove::OutOfRange { index })?;
        if !cell.is_empty() {
            return Err(InvalidMove::Occupied { index });
        }
        *cell = Cell::Mark(mark);
        Ok(())
    }

    /// 在副本上落子，用于试探性评估。
    pub fn with_move(&self, index: usize, mark: Mark) -> Result<Board, InvalidMove> {
        let mut scratch = *self;
        scratch.place(index, mark)?;
        Ok(scratch)
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    pub fn empty_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_empty())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn marks_placed(&self) -> usize {
        CELL_COUNT - self.empty_indices().len()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..SIDE {
            for col in 0..SIDE {
                let index = row * SIDE + col;
                match self.cells[index] {
                    Cell::Empty => write!(f, "{}", index + 1)?,
                    Cell::Mark(mark) => write!(f, "{mark}")?,
                }
                if col + 1 < SIDE {
                    f.write_str("|")?;
                }
            }
            if row + 1 < SIDE {
                f.write_str("\n-+-+-\n")?;
            }
        }
        Ok(())
    }
}
