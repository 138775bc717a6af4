//! 游戏核心逻辑模块（棋盘、规则判定、对局会话等）。

pub mod board;
pub mod config;
pub mod input;
pub mod rules;
pub mod score;
pub mod session;

pub use board::{Board, Cell, Mark, CELL_COUNT};
pub use config::{ConfigError, Mode};
pub use input::KeyCommand;
pub use rules::{InvalidMove, Outcome, RuleEngine, WinLine, WIN_LINES};
pub use score::Scoreboard;
pub use session::{AiTurn, GameEvent, GameSession, SessionPhase, SessionSnapshot};
