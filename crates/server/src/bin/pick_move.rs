//! Run one move selection from the command line.
//!
//! Usage: cargo run --bin pick-move -- --fen "<FEN>" [--model path] [--kind dense]
//!
//! Without --model, MODEL_PATH / MODEL_KIND from the environment are used,
//! falling back to the built-in material evaluator.

use std::path::PathBuf;

use chess_core::game;
use chess_core::model::ModelKind;
use chess_core::selector;
use server::config::Config;
use tracing_subscriber::EnvFilter;

/// Value following `flag` in the CLI args.
fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let fen = arg_value(&args, "--fen")
        .ok_or_else(|| anyhow::anyhow!("usage: pick-move --fen \"<FEN>\" [--model path] [--kind kind]"))?;

    let mut config = Config::from_env()?;
    if let Some(path) = arg_value(&args, "--model") {
        config.model_path = Some(PathBuf::from(path));
    }
    if let Some(kind) = arg_value(&args, "--kind") {
        config.model_kind = kind.parse::<ModelKind>()?;
    }

    let model = server::load_model(&config)?;
    let pos = game::parse_fen(&fen)?;
    let selection = selector::select_from_position(&pos, model.as_ref())?;

    println!("Model:      {}", model.name());
    println!("Candidates: {}", selection.candidates);
    println!("Score:      {}", selection.score);
    println!("Move:       {}", game::move_label(&pos, &selection.mv));
    println!("{}", selection.uci);

    Ok(())
}
