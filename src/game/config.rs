use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 配置阶段的错误，发生在开局前而不是落子时。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown difficulty `{0}`, expected easy, medium or hard")]
    UnknownDifficulty(String),
    #[error("unknown mode `{0}`, expected pvp or pvai")]
    UnknownMode(String),
}

/// 对局模式。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Mode {
    #[serde(rename = "pvp")]
    PlayerVsPlayer,
    #[serde(rename = "pvai")]
    PlayerVsAi,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::PlayerVsAi
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pvp" | "human" | "local" => Ok(Mode::PlayerVsPlayer),
            "pvai" | "pve" | "ai" | "computer" => Ok(Mode::PlayerVsAi),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}
