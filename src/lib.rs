pub mod ai;
pub mod game;

use std::fmt::Display;
use std::str::FromStr;

use gloo_timers::future::TimeoutFuture;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::js_sys::{Function, Promise};

pub use ai::{
    AiAgent, AiConfig, AiDecision, AiStrategy, Difficulty, HeuristicPolicy, MovePolicy,
    OptimalPolicy, RandomPolicy, SearchResult,
};
pub use game::{
    AiTurn, Board, Cell, ConfigError, GameEvent, GameSession, InvalidMove, KeyCommand, Mark, Mode,
    Outcome, RuleEngine, Scoreboard, SessionPhase, SessionSnapshot, WinLine, WIN_LINES,
};

#[cfg(all(feature = "wee_alloc", target_arch = "wasm32"))]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    set_panic_hook();
    if console_log::init_with_level(log::Level::Debug).is_err() {
        web_sys::console::warn_1(&"logger was already initialised".into());
    }
}

fn to_js_error<E: Serialize + Display>(error: E) -> JsValue {
    to_value(&error).unwrap_or_else(|_| JsValue::from_str(&error.to_string()))
}

fn serde_to_js_error<E: Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn parse_config<T>(value: &str) -> Result<T, JsValue>
where
    T: FromStr<Err = ConfigError>,
{
    value.parse().map_err(serde_to_js_error)
}

/// 浏览器端的对局入口：持有唯一的会话与比分，并把事件转发给订阅者。
#[wasm_bindgen]
pub struct GameEngine {
    session: GameSession,
    scores: Scoreboard,
    listener: Option<Function>,
}

#[wasm_bindgen]
impl GameEngine {
    /// 未知的模式或难度在构造时直接报错。
    #[wasm_bindgen(constructor)]
    pub fn new(
        mode: Option<String>,
        difficulty: Option<String>,
        seed: Option<u32>,
    ) -> Result<GameEngine, JsValue> {
        let mode = match mode {
            Some(value) => parse_config(&value)?,
            None => Mode::default(),
        };
        let difficulty = match difficulty {
            Some(value) => parse_config(&value)?,
            None => Difficulty::default(),
        };
        let session = match seed {
            Some(seed) => GameSession::with_seed(mode, difficulty, u64::from(seed)),
            None => GameSession::new(mode, difficulty),
        };
        Ok(GameEngine {
            session,
            scores: Scoreboard::new(),
            listener: None,
        })
    }

    /// 注册事件回调，每个事件以单个对象参数调用一次。
    pub fn subscribe(&mut self, callback: Function) {
        self.listener = Some(callback);
    }

    pub fn unsubscribe(&mut self) {
        self.listener = None;
    }

    pub fn submit_move(&mut self, index: usize) -> Result<JsValue, JsValue> {
        let events = self.session.submit_move(index).map_err(to_js_error)?;
        self.dispatch(events)
    }

    pub fn reset(&mut self) -> Result<JsValue, JsValue> {
        let events = self.session.reset();
        self.dispatch(events)
    }

    pub fn reset_scores(&mut self) {
        self.scores.reset();
    }

    pub fn set_mode(&mut self, mode: &str) -> Result<JsValue, JsValue> {
        let mode = parse_config(mode)?;
        let events = self.session.set_mode(mode);
        self.dispatch(events)
    }

    pub fn set_difficulty(&mut self, difficulty: &str) -> Result<JsValue, JsValue> {
        let difficulty = parse_config(difficulty)?;
        let events = self.session.set_difficulty(difficulty);
        self.dispatch(events)
    }

    /// 未绑定的按键返回 `null`。
    pub fn handle_key(&mut self, key: &str) -> Result<JsValue, JsValue> {
        let Some(command) = KeyCommand::from_key(key) else {
            return Ok(JsValue::NULL);
        };
        let events = self.session.apply_command(command).map_err(to_js_error)?;
        self.dispatch(events)
    }

    pub fn is_thinking(&self) -> bool {
        self.session.is_thinking()
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_value(&self.session.snapshot()).map_err(JsValue::from)
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.snapshot()).map_err(serde_to_js_error)
    }

    pub fn scores(&self) -> Result<JsValue, JsValue> {
        to_value(&self.scores).map_err(JsValue::from)
    }

    /// 在 Promise 中计算电脑的应着，返回决策 JSON；结果需交给 `apply_ai_decision_json`。
    pub fn think_ai(&self, delay_ms: Option<u32>) -> Promise {
        let turn = self.session.pending_ai_turn();
        let delay = delay_ms.unwrap_or(0);

        future_to_promise(async move {
            let turn = turn.ok_or_else(|| to_js_error(InvalidMove::NotAiTurn))?;
            // 先让出事件循环，界面可以先渲染“思考中”。
            TimeoutFuture::new(delay).await;
            let decision = turn
                .decide()
                .ok_or_else(|| to_js_error(InvalidMove::GameFinished))?;
            let json = serde_json::to_string(&decision).map_err(serde_to_js_error)?;
            Ok(JsValue::from_str(&json))
        })
    }

    pub fn apply_ai_decision_json(&mut self, decision_json: &str) -> Result<JsValue, JsValue> {
        let decision: AiDecision =
            serde_json::from_str(decision_json).map_err(serde_to_js_error)?;
        let events = self
            .session
            .apply_ai_decision(decision)
            .map_err(to_js_error)?;
        self.dispatch(events)
    }

    pub fn play_ai_turn(&mut self) -> Result<JsValue, JsValue> {
        let events = self.session.play_ai_turn().map_err(to_js_error)?;
        self.dispatch(events)
    }

    /// 状态已经提交，回调抛错只记录日志，不影响返回值。
    fn dispatch(&mut self, events: Vec<GameEvent>) -> Result<JsValue, JsValue> {
        self.scores.record_all(&events);
        if let Some(listener) = &self.listener {
            let failure = deliver_events(&events, |event| {
                let value = to_value(event).map_err(JsValue::from)?;
                listener.call1(&JsValue::NULL, &value).map(|_| ())
            });
            if let Some(error) = failure {
                log::warn!("event listener failed: {:?}", error);
            }
        }
        to_value(&events).map_err(JsValue::from)
    }
}

/// 每个事件都投递一次，返回第一个失败。
fn deliver_events<E>(
    events: &[GameEvent],
    mut send: impl FnMut(&GameEvent) -> Result<(), E>,
) -> Option<E> {
    let mut first_error = None;
    for event in events {
        if let Err(error) = send(event) {
            first_error.get_or_insert(error);
        }
    }
    first_error
}

#[wasm_bindgen(js_name = "evaluateBoard")]
pub fn evaluate_board(board: JsValue) -> Result<JsValue, JsValue> {
    let board: Board = from_value(board).map_err(JsValue::from)?;
    to_value(&RuleEngine::evaluate(&board)).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "computeAiMove")]
pub fn compute_ai_move(
    board: JsValue,
    mark: JsValue,
    difficulty: &str,
    seed: Option<u32>,
) -> Result<JsValue, JsValue> {
    let board: Board = from_value(board).map_err(JsValue::from)?;
    let mark: Mark = from_value(mark).map_err(JsValue::from)?;
    let config = AiConfig::from_difficulty(parse_config(difficulty)?);
    let mut agent = match seed {
        Some(seed) => AiAgent::with_seed(config, u64::from(seed)),
        None => AiAgent::new(config),
    };
    let decision = agent.decide(&board, mark);
    to_value(&decision).map_err(JsValue::from)
}

#[cfg(feature = "console_error_panic_hook")]
fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(feature = "console_error_panic_hook"))]
fn set_panic_hook() {}
