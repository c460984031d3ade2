//! HTTP API for playing against the move-scoring model.

pub mod config;
pub mod error;
pub mod routes;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use chess_core::{model, ModelError, SharedModel};
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;

/// Load the scoring model named by the config.
pub fn load_model(config: &Config) -> Result<SharedModel, ModelError> {
    model::load_model(config.model_kind, config.model_path.as_deref())
}

pub fn router(model: SharedModel, config: Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api/game/new", get(routes::game::new_game))
        .route("/api/game/status", post(routes::game::game_status))
        .route("/api/game/move", post(routes::game::human_move))
        .route("/api/game/ai-move", post(routes::game::ai_move))
        .route("/api/game/history", post(routes::game::history))
        .route("/api/select", post(routes::game::select))
        // Shared state
        .layer(Extension(model))
        .layer(Extension(config))
        .layer(cors)
}
