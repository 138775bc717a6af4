#![cfg(target_arch = "wasm32")]

use tictactoe_core::{
    compute_ai_move, evaluate_board, AiDecision, Board, Cell, GameEngine, Mark, Outcome,
    Scoreboard, SessionSnapshot,
};
use wasm_bindgen_futures::JsFuture;
use web_sys::js_sys::Function;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn engine(mode: &str, difficulty: &str) -> GameEngine {
    GameEngine::new(Some(mode.into()), Some(difficulty.into()), Some(17))
        .expect("engine should accept known settings")
}

#[wasm_bindgen_test]
fn rejects_unknown_difficulty() {
    assert!(GameEngine::new(Some("pvai".into()), Some("expert".into()), None).is_err());
}

#[wasm_bindgen_test]
fn keyboard_moves_and_scores() {
    let mut engine = engine("pvp", "easy");
    for key in ["1", "4", "2", "5", "3"] {
        engine.handle_key(key).expect("key should map to a legal move");
    }
    let scores: Scoreboard =
        serde_wasm_bindgen::from_value(engine.scores().expect("scores serialize"))
            .expect("scores deserialize");
    assert_eq!(scores.x_wins, 1);
    assert!(engine.submit_move(8).is_err());
}

#[wasm_bindgen_test]
async fn ai_decision_resolves_through_promise() {
    let mut engine = engine("pvai", "hard");
    engine.submit_move(4).expect("center is free");
    assert!(engine.is_thinking());

    let value = JsFuture::from(engine.think_ai(None))
        .await
        .expect("thinking should resolve");
    let json = value.as_string().expect("decision is returned as json");
    let decision: AiDecision = serde_json::from_str(&json).expect("decision parses");
    assert!([0, 2, 6, 8].contains(&decision.index));

    engine
        .apply_ai_decision_json(&json)
        .expect("decision should apply");
    let snapshot: SessionSnapshot = serde_json::from_str(&engine.state_json().expect("state"))
        .expect("snapshot parses");
    assert_eq!(snapshot.board.marks_placed(), 2);
    assert!(!engine.is_thinking());
}

#[wasm_bindgen_test]
fn throwing_listener_does_not_fail_committed_move() {
    let mut engine = engine("pvp", "easy");
    engine.subscribe(Function::new_no_args("throw new Error('listener failed')"));
    for index in [0, 3, 1, 4] {
        engine.submit_move(index).expect("move commits despite listener");
    }
    engine.submit_move(2).expect("winning move commits despite listener");

    let scores: Scoreboard =
        serde_wasm_bindgen::from_value(engine.scores().expect("scores serialize"))
            .expect("scores deserialize");
    assert_eq!(scores.x_wins, 1);
    assert!(engine.submit_move(8).is_err());
}

#[wasm_bindgen_test]
fn evaluate_board_reports_row_win() {
    use Cell::{Empty as E, Mark as M};
    let board = Board::from_cells([
        M(Mark::X), M(Mark::X), M(Mark::X),
        M(Mark::O), M(Mark::O), E,
        E, E, E,
    ]);
    let value = evaluate_board(serde_wasm_bindgen::to_value(&board).expect("board serializes"))
        .expect("board evaluates");
    let outcome: Outcome = serde_wasm_bindgen::from_value(value).expect("outcome parses");
    assert_eq!(outcome, Outcome::Win { mark: Mark::X, line: [0, 1, 2] });
}

#[wasm_bindgen_test]
fn compute_ai_move_takes_the_win() {
    use Cell::{Empty as E, Mark as M};
    let board = Board::from_cells([M(Mark::X), M(Mark::X), E, E, M(Mark::O), E, E, E, E]);
    let value = compute_ai_move(
        serde_wasm_bindgen::to_value(&board).expect("board serializes"),
        serde_wasm_bindgen::to_value(&Mark::X).expect("mark serializes"),
        "hard",
        Some(5),
    )
    .expect("decision computes");
    let decision: Option<AiDecision> =
        serde_wasm_bindgen::from_value(value).expect("decision parses");
    assert_eq!(decision.map(|d| d.index), Some(2));
    assert!(compute_ai_move(
        serde_wasm_bindgen::to_value(&board).expect("board serializes"),
        serde_wasm_bindgen::to_value(&Mark::X).expect("mark serializes"),
        "expert",
        None,
    )
    .is_err());
}
