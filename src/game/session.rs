use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::board::{Board, Mark};
use super::config::Mode;
use super::input::KeyCommand;
use super::rules::{InvalidMove, Outcome, RuleEngine};
use crate::ai::{AiAgent, AiConfig, AiDecision, Difficulty};

/// 对外发出的事件流，界面层据此渲染、计分、播放音效。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum GameEvent {
    MoveApplied { index: usize, mark: Mark },
    OutcomeDecided { outcome: Outcome },
    TurnChanged { mark: Mark },
    AiThinkingStarted { mark: Mark },
    AiThinkingEnded { mark: Mark },
    GameReset { mode: Mode, difficulty: Difficulty },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    AwaitingMove,
    Thinking,
    Finished,
}

impl Default for SessionPhase {
    fn default() -> Self {
        SessionPhase::AwaitingMove
    }
}

/// 会话状态的只读快照，供界面层序列化使用。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub board: Board,
    pub mark_to_move: Mark,
    pub outcome: Outcome,
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub phase: SessionPhase,
    pub generation: u64,
}

/// 一次待执行的电脑决策。
///
/// 持有棋盘副本和独立的随机种子，可以被移入 future 或其他线程执行，
/// 结果通过 [`GameSession::apply_ai_decision`] 交回会话。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AiTurn {
    pub board: Board,
    pub mark: Mark,
    pub config: AiConfig,
    pub generation: u64,
    pub turn: u64,
    pub seed: u64,
}

impl AiTurn {
    pub fn decide(&self) -> Option<AiDecision> {
        let mut agent = AiAgent::with_seed(self.config, self.seed);
        let decision = agent.decide(&self.board, self.mark)?;
        Some(AiDecision {
            generation: self.generation,
            turn: self.turn,
            ..decision
        })
    }
}

/// 一局（及其后续重开）的唯一所有者，所有状态变更都经过这里。
pub struct GameSession {
    board: Board,
    mark_to_move: Mark,
    outcome: Outcome,
    mode: Mode,
    difficulty: Difficulty,
    phase: SessionPhase,
    generation: u64,
    ai_turn: u64,
    ai_seed: u64,
    rng: SmallRng,
}

impl GameSession {
    pub fn new(mode: Mode, difficulty: Difficulty) -> Self {
        Self::with_rng(mode, difficulty, SmallRng::from_entropy())
    }

    pub fn with_seed(mode: Mode, difficulty: Difficulty, seed: u64) -> Self {
        Self::with_rng(mode, difficulty, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(mode: Mode, difficulty: Difficulty, rng: SmallRng) -> Self {
        Self {
            board: Board::new(),
            mark_to_move: Mark::X,
            outcome: Outcome::InProgress,
            mode,
            difficulty,
            phase: SessionPhase::AwaitingMove,
            generation: 0,
            ai_turn: 0,
            ai_seed: 0,
            rng,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn mark_to_move(&self) -> Mark {
        self.mark_to_move
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_thinking(&self) -> bool {
        self.phase == SessionPhase::Thinking
    }

    /// 人机模式下电脑执 O。
    pub fn computer_mark(&self) -> Option<Mark> {
        match self.mode {
            Mode::PlayerVsAi => Some(Mark::O),
            Mode::PlayerVsPlayer => None,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            board: self.board,
            mark_to_move: self.mark_to_move,
            outcome: self.outcome,
            mode: self.mode,
            difficulty: self.difficulty,
            phase: self.phase,
            generation: self.generation,
        }
    }

    pub fn submit_move(&mut self, index: usize) -> Result<Vec<GameEvent>, InvalidMove> {
        match self.phase {
            SessionPhase::Finished => return Err(InvalidMove::GameFinished),
            SessionPhase::Thinking => return Err(InvalidMove::AiThinking),
            SessionPhase::AwaitingMove => {}
        }

        let mark = self.mark_to_move;
        self.board.place(index, mark)?;
        Ok(self.after_move(index, mark))
    }

    /// 正在等待电脑落子时返回本次决策的工作单元。
    pub fn pending_ai_turn(&self) -> Option<AiTurn> {
        if !self.is_thinking() {
            return None;
        }
        Some(AiTurn {
            board: self.board,
            mark: self.mark_to_move,
            config: AiConfig::from_difficulty(self.difficulty),
            generation: self.generation,
            turn: self.ai_turn,
            seed: self.ai_seed,
        })
    }

    pub fn apply_ai_decision(&mut self, decision: AiDecision) -> Result<Vec<GameEvent>, InvalidMove> {
        if decision.generation != self.generation || decision.turn != self.ai_turn {
            return Err(InvalidMove::StaleDecision);
        }
        if !self.is_thinking() || decision.mark != self.mark_to_move {
            return Err(InvalidMove::NotAiTurn);
        }

        let mark = self.mark_to_move;
        self.board.place(decision.index, mark)?;
        let mut events = self.after_move(decision.index, mark);
        events.push(GameEvent::AiThinkingEnded { mark });
        Ok(events)
    }

    /// 同步执行待处理的电脑回合。
    pub fn play_ai_turn(&mut self) -> Result<Vec<GameEvent>, InvalidMove> {
        let decision = self
            .pending_ai_turn()
            .and_then(|turn| turn.decide())
            .ok_or(InvalidMove::NotAiTurn)?;
        self.apply_ai_decision(decision)
    }

    pub fn apply_command(&mut self, command: KeyCommand) -> Result<Vec<GameEvent>, InvalidMove> {
        match command {
            KeyCommand::Cell(index) => self.submit_move(index),
            KeyCommand::Reset => Ok(self.reset()),
        }
    }

    /// 整体替换棋盘与回合，保留模式和难度；未完成的电脑决策随之作废。
    pub fn reset(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.is_thinking() {
            events.push(GameEvent::AiThinkingEnded {
                mark: self.mark_to_move,
            });
        }

        self.board = Board::new();
        self.mark_to_move = Mark::X;
        self.outcome = Outcome::InProgress;
        self.phase = SessionPhase::AwaitingMove;
        self.generation += 1;

        log::info!(
            "game {} started ({:?}, {:?})",
            self.generation,
            self.mode,
            self.difficulty
        );
        events.push(GameEvent::GameReset {
            mode: self.mode,
            difficulty: self.difficulty,
        });
        events.push(GameEvent::TurnChanged {
            mark: self.mark_to_move,
        });
        events
    }

    pub fn set_mode(&mut self, mode: Mode) -> Vec<GameEvent> {
        self.mode = mode;
        self.reset()
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> Vec<GameEvent> {
        self.difficulty = difficulty;
        self.reset()
    }

    fn after_move(&mut self, index: usize, mark: Mark) -> Vec<GameEvent> {
        log::debug!("{mark} placed at cell {index}");
        let mut events = vec![GameEvent::MoveApplied { index, mark }];

        self.outcome = RuleEngine::evaluate(&self.board);
        if self.outcome.is_terminal() {
            log::info!("game {} finished: {:?}", self.generation, self.outcome);
            self.phase = SessionPhase::Finished;
            events.push(GameEvent::OutcomeDecided {
                outcome: self.outcome,
            });
            return events;
        }

        self.mark_to_move = mark.opponent();
        events.push(GameEvent::TurnChanged {
            mark: self.mark_to_move,
        });

        if self.computer_mark() == Some(self.mark_to_move) {
            self.phase = SessionPhase::Thinking;
            self.ai_turn += 1;
            self.ai_seed = self.rng.gen();
            events.push(GameEvent::AiThinkingStarted {
                mark: self.mark_to_move,
            });
        } else {
            self.phase = SessionPhase::AwaitingMove;
        }
        events
    }
}
