use std::str::FromStr;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use super::minimax::OptimalPolicy;
use super::policy::{HeuristicPolicy, MovePolicy, RandomPolicy};
use crate::game::{Board, ConfigError, Mark};

/// 电脑难度。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" | "normal" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ConfigError::UnknownDifficulty(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AiStrategy {
    Random,
    Heuristic,
    Minimax,
}

impl AiStrategy {
    pub fn policy(self) -> &'static dyn MovePolicy {
        match self {
            AiStrategy::Random => &RandomPolicy,
            AiStrategy::Heuristic => &HeuristicPolicy,
            AiStrategy::Minimax => &OptimalPolicy,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AiConfig {
    pub difficulty: Difficulty,
    pub strategy: AiStrategy,
}

impl AiConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        let strategy = match difficulty {
            Difficulty::Easy => AiStrategy::Random,
            Difficulty::Medium => AiStrategy::Heuristic,
            Difficulty::Hard => AiStrategy::Minimax,
        };
        Self {
            difficulty,
            strategy,
        }
    }

    pub fn with_strategy(mut self, strategy: AiStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig::from_difficulty(Difficulty::default())
    }
}

/// 电脑的一次决策。`generation` 标记它属于哪一局，`turn` 标记局内第几次电脑回合，
/// 两者任一不符都视为过期决策。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AiDecision {
    pub index: usize,
    pub mark: Mark,
    pub strategy: AiStrategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
    #[serde(default)]
    pub nodes: u64,
    #[serde(default)]
    pub generation: u64,
    #[serde(default)]
    pub turn: u64,
}

pub struct AiAgent {
    config: AiConfig,
    rng: SmallRng,
}

impl AiAgent {
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_seed(config: AiConfig, seed: u64) -> Self {
        Self {
            config,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// 棋盘已满时返回 `None`。
    pub fn decide(&mut self, board: &Board, mark: Mark) -> Option<AiDecision> {
        let strategy = self.config.strategy;
        let decision = match strategy {
            AiStrategy::Minimax => {
                let result = OptimalPolicy.search(board, mark)?;
                AiDecision {
                    index: result.index,
                    mark,
                    strategy,
                    score: Some(result.score),
                    nodes: result.nodes,
                    generation: 0,
                    turn: 0,
                }
            }
            AiStrategy::Random | AiStrategy::Heuristic => {
                let index = strategy.policy().choose_move(board, mark, &mut self.rng)?;
                AiDecision {
                    index,
                    mark,
                    strategy,
                    score: None,
                    nodes: 0,
                    generation: 0,
                    turn: 0,
                }
            }
        };

        log::debug!(
            "{:?} ai ({:?}) plays {} at cell {} after {} nodes",
            self.config.difficulty,
            strategy,
            mark,
            decision.index,
            decision.nodes
        );
        Some(decision)
    }
}
