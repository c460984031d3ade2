//! Game endpoints. Every request carries its own position; nothing is stored
//! between requests.

use axum::{Extension, Json};
use chess_core::game::{self, GameStatus, MoveOption};
use chess_core::selector::{self, Selection};
use chess_core::SharedModel;
use serde::{Deserialize, Serialize};
use shakmaty::{Chess, Color, Position};

use crate::config::Config;
use crate::error::AppError;

#[derive(Deserialize)]
pub struct FenRequest {
    pub fen: String,
}

#[derive(Deserialize)]
pub struct MoveRequest {
    pub fen: String,
    pub uci: String,
}

#[derive(Deserialize)]
pub struct HistoryRequest {
    #[serde(default)]
    pub moves: Vec<String>,
    #[serde(default)]
    pub undo: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: GameStatus,
    pub legal_moves: Vec<MoveOption>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    pub uci: String,
    pub label: String,
    pub fen: String,
    pub status: GameStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiMoveResponse {
    pub uci: String,
    pub label: String,
    pub score: f32,
    pub candidates: usize,
    pub fen: String,
    pub status: GameStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub moves: Vec<String>,
    pub lines: Vec<String>,
    pub fen: String,
    pub status: GameStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectResponse {
    pub uci: String,
}

fn status_response(pos: &Chess) -> StatusResponse {
    StatusResponse {
        status: game::status(pos),
        legal_moves: game::legal_move_options(pos),
    }
}

/// Selection is CPU-bound, keep it off the async workers.
async fn run_selection(model: SharedModel, pos: Chess) -> Result<Selection, AppError> {
    let selection = tokio::task::spawn_blocking(move || {
        selector::select_from_position(&pos, model.as_ref())
    })
    .await
    .map_err(anyhow::Error::from)??;
    Ok(selection)
}

/// GET /api/game/new
pub async fn new_game() -> Json<StatusResponse> {
    Json(status_response(&Chess::default()))
}

/// POST /api/game/status
pub async fn game_status(Json(req): Json<FenRequest>) -> Result<Json<StatusResponse>, AppError> {
    let pos = game::parse_fen(&req.fen)?;
    Ok(Json(status_response(&pos)))
}

/// POST /api/game/move
/// Apply the human's move. The position in the request is left as is on error.
pub async fn human_move(Json(req): Json<MoveRequest>) -> Result<Json<MoveResponse>, AppError> {
    let pos = game::parse_fen(&req.fen)?;
    if pos.is_game_over() {
        return Err(AppError::Conflict("Game is over".into()));
    }

    let (next, mv) = game::apply_move(&pos, &req.uci)?;
    let label = game::move_label(&pos, &mv);
    tracing::info!("Human move: {label}");

    Ok(Json(MoveResponse {
        uci: game::to_uci(&mv).to_string(),
        label,
        fen: game::to_fen(&next),
        status: game::status(&next),
    }))
}

/// POST /api/game/ai-move
/// Let the model pick Black's reply and apply it.
pub async fn ai_move(
    Extension(model): Extension<SharedModel>,
    Extension(config): Extension<Config>,
    Json(req): Json<FenRequest>,
) -> Result<Json<AiMoveResponse>, AppError> {
    let pos = game::parse_fen(&req.fen)?;
    if pos.is_game_over() {
        return Err(AppError::Conflict("Game is over".into()));
    }
    if pos.turn() != Color::Black && !config.engine_plays_both {
        return Err(AppError::Conflict("Not the engine's turn".into()));
    }

    let selection = run_selection(model, pos.clone()).await?;
    let uci = selection.uci.to_string();

    // The selector only returns enumerated moves, but the board is only
    // updated after the move checks out against the position.
    let (next, mv) = game::apply_move(&pos, &uci).map_err(|e| {
        tracing::error!(fen = %req.fen, uci = %uci, "Engine suggested an illegal move");
        AppError::Internal(format!("Engine suggested an illegal move: {e}"))
    })?;
    let label = game::move_label(&pos, &mv);
    tracing::info!(score = selection.score, candidates = selection.candidates, "AI move: {label}");

    Ok(Json(AiMoveResponse {
        uci,
        label,
        score: selection.score,
        candidates: selection.candidates,
        fen: game::to_fen(&next),
        status: game::status(&next),
    }))
}

/// POST /api/game/history
/// Replay a move list from the initial position, optionally taking back the
/// last move.
pub async fn history(Json(req): Json<HistoryRequest>) -> Result<Json<HistoryResponse>, AppError> {
    let moves = if req.undo {
        game::undo_last(&req.moves).to_vec()
    } else {
        req.moves
    };

    let pos = game::replay(&Chess::default(), &moves)?;
    let lines = game::move_history(&moves)?;

    Ok(Json(HistoryResponse {
        moves,
        lines,
        fen: game::to_fen(&pos),
        status: game::status(&pos),
    }))
}

/// POST /api/select
/// The bare selection: FEN in, UCI out. No turn rule, nothing applied.
pub async fn select(
    Extension(model): Extension<SharedModel>,
    Json(req): Json<FenRequest>,
) -> Result<Json<SelectResponse>, AppError> {
    let pos = game::parse_fen(&req.fen)?;
    let selection = run_selection(model, pos).await?;
    Ok(Json(SelectResponse {
        uci: selection.uci.to_string(),
    }))
}
