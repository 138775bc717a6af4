use serde::{Deserialize, Serialize};

use super::board::CELL_COUNT;

/// 键盘指令：数字键 1-9 对应格子 0-8，`r` 重开。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "index")]
pub enum KeyCommand {
    Cell(usize),
    Reset,
}

impl KeyCommand {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "r" | "R" => Some(KeyCommand::Reset),
            _ => {
                let digit: usize = key.parse().ok()?;
                (1..=CELL_COUNT)
                    .contains(&digit)
                    .then(|| KeyCommand::Cell(digit - 1))
            }
        }
    }
}
