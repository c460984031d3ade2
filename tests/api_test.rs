//! Integration tests for the game API.
//!
//! Each test starts its own server on an ephemeral port.

mod common;

use std::sync::Arc;

use chess_core::model::MaterialModel;
use serde_json::{json, Value};
use server::config::Config;

const AFTER_E4: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";
const FOOLS_MATE: &str = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn post(server: &common::TestServer, path: &str, body: Value) -> reqwest::Response {
    common::client()
        .post(server.url(path))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_health() {
    let server = common::spawn_server().await;
    let resp = common::client()
        .get(server.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model"], "material");
}

#[test]
fn test_default_config_loads_material_model() {
    let model = server::load_model(&Config::default()).unwrap();
    assert_eq!(model.name(), "material");
}

#[tokio::test]
async fn test_new_game() {
    let server = common::spawn_server().await;
    let resp = common::client()
        .get(server.url("/api/game/new"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"]["fen"], common::START_FEN);
    assert_eq!(body["status"]["turn"], "white");
    assert_eq!(body["status"]["isGameOver"], false);
    assert_eq!(body["legalMoves"].as_array().unwrap().len(), 20);
    assert!(body.get("legal_moves").is_none());
}

#[tokio::test]
async fn test_status_reports_checkmate() {
    let server = common::spawn_server().await;
    let resp = post(&server, "/api/game/status", json!({ "fen": FOOLS_MATE })).await;
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"]["isCheckmate"], true);
    assert_eq!(body["status"]["winner"], "black");
    assert_eq!(body["status"]["message"], "Checkmate! Black wins!");
    assert!(body["legalMoves"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_human_move() {
    let server = common::spawn_server().await;
    let resp = post(
        &server,
        "/api/game/move",
        json!({ "fen": common::START_FEN, "uci": "e2e4" }),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["uci"], "e2e4");
    assert_eq!(body["label"], "Pe2-e4");
    assert_eq!(body["fen"], AFTER_E4);
    assert_eq!(body["status"]["turn"], "black");
}

#[tokio::test]
async fn test_illegal_human_move_is_rejected() {
    let server = common::spawn_server().await;

    let resp = post(
        &server,
        "/api/game/move",
        json!({ "fen": common::START_FEN, "uci": "e2e5" }),
    )
    .await;
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("Illegal move"));

    let resp = post(
        &server,
        "/api/game/move",
        json!({ "fen": common::START_FEN, "uci": "hello" }),
    )
    .await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_ai_move_replies_for_black() {
    let server = common::spawn_server().await;
    let resp = post(&server, "/api/game/ai-move", json!({ "fen": AFTER_E4 })).await;
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["candidates"], 20);
    assert_eq!(body["status"]["turn"], "white");

    // The reply must be one of Black's legal moves
    let status = post(&server, "/api/game/status", json!({ "fen": AFTER_E4 })).await;
    let status: Value = status.json().await.unwrap();
    let legal: Vec<&str> = status["legalMoves"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["uci"].as_str().unwrap())
        .collect();
    assert!(legal.contains(&body["uci"].as_str().unwrap()));
}

#[tokio::test]
async fn test_ai_move_takes_hanging_queen() {
    let server = common::spawn_server().await;
    let resp = post(
        &server,
        "/api/game/ai-move",
        json!({ "fen": "3qk3/8/8/8/8/8/8/3QK3 b - - 0 1" }),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["uci"], "d8d1");
    assert_eq!(body["label"], "qd8-d1");
}

#[tokio::test]
async fn test_ai_move_refuses_white_turn() {
    let server = common::spawn_server().await;
    let resp = post(&server, "/api/game/ai-move", json!({ "fen": common::START_FEN })).await;
    assert_eq!(resp.status(), 409);
}

#[tokio::test]
async fn test_ai_move_plays_white_when_configured() {
    let config = Config {
        engine_plays_both: true,
        ..Config::default()
    };
    let server = common::spawn_server_with(Arc::new(MaterialModel), config).await;
    let resp = post(&server, "/api/game/ai-move", json!({ "fen": common::START_FEN })).await;
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"]["turn"], "black");
}

#[tokio::test]
async fn test_ai_move_after_game_over() {
    let server = common::spawn_server().await;
    let resp = post(&server, "/api/game/ai-move", json!({ "fen": FOOLS_MATE })).await;
    assert_eq!(resp.status(), 409);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "Game is over");
}

#[tokio::test]
async fn test_invalid_fen() {
    let server = common::spawn_server().await;
    for path in ["/api/game/status", "/api/game/ai-move", "/api/select"] {
        let resp = post(&server, path, json!({ "fen": "not a fen" })).await;
        assert_eq!(resp.status(), 400, "{path}");
    }
}

#[tokio::test]
async fn test_history() {
    let server = common::spawn_server().await;
    let resp = post(
        &server,
        "/api/game/history",
        json!({ "moves": ["e2e4", "e7e5", "g1f3"] }),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["lines"], json!(["1. Pe2-e4 pe7-e5", "2. Ng1-f3"]));
    assert_eq!(body["status"]["turn"], "black");
}

#[tokio::test]
async fn test_history_undo() {
    let server = common::spawn_server().await;
    let resp = post(
        &server,
        "/api/game/history",
        json!({ "moves": ["e2e4"], "undo": true }),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["moves"], json!([]));
    assert_eq!(body["fen"], common::START_FEN);

    // Undo with nothing to take back
    let resp = post(&server, "/api/game/history", json!({ "undo": true })).await;
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_history_with_illegal_move() {
    let server = common::spawn_server().await;
    let resp = post(
        &server,
        "/api/game/history",
        json!({ "moves": ["e2e4", "e2e4"] }),
    )
    .await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_select() {
    let server = common::spawn_server().await;
    let resp = post(
        &server,
        "/api/select",
        json!({ "fen": "3qk3/8/8/8/8/8/8/3QK3 w - - 0 1" }),
    )
    .await;
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "uci": "d1d8" }));

    let resp = post(&server, "/api/select", json!({ "fen": FOOLS_MATE })).await;
    assert_eq!(resp.status(), 409);
}
