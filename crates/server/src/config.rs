use std::env;
use std::path::PathBuf;

use chess_core::model::ModelKind;
use chess_core::ModelError;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Weights file for the scoring model. Unset means the built-in
    /// material evaluator.
    pub model_path: Option<PathBuf>,
    pub model_kind: ModelKind,
    /// Let the engine move for White too (self-play, testing).
    pub engine_plays_both: bool,
}

impl Config {
    /// Read the config from the environment. A set but unknown `MODEL_KIND`
    /// is an error.
    pub fn from_env() -> Result<Self, ModelError> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            model_path: env::var("MODEL_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            model_kind: parse_model_kind(env::var("MODEL_KIND").ok().as_deref())?,
            engine_plays_both: env::var("ENGINE_PLAYS_BOTH")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        })
    }
}

/// `MODEL_KIND` value to a backend kind. Unset means `auto`.
fn parse_model_kind(value: Option<&str>) -> Result<ModelKind, ModelError> {
    match value {
        None => Ok(ModelKind::Auto),
        Some(v) => v.parse().inspect_err(|e| {
            tracing::warn!("Invalid MODEL_KIND '{v}': {e}");
        }),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            model_path: None,
            model_kind: ModelKind::Auto,
            engine_plays_both: false,
        }
    }
}
