//! 电脑对手（随机、启发式、极小化极大搜索）。

pub mod agent;
pub mod minimax;
pub mod policy;

pub use agent::{AiAgent, AiConfig, AiDecision, AiStrategy, Difficulty};
pub use minimax::{OptimalPolicy, SearchResult};
pub use policy::{HeuristicPolicy, MovePolicy, RandomPolicy};
