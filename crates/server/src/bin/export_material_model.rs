//! Write the material-balance network to a weights file the server can load.
//!
//! Usage: cargo run --bin export-material-model [-- path]
//!
//! The format follows the extension: `.json` for JSON, anything else bincode.

use std::fs;
use std::path::Path;

use chess_core::model::DenseModel;

/// Default output path.
const MODEL_FILE_PATH: &str = "data/material_model.bin";

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| MODEL_FILE_PATH.to_string());
    let path = Path::new(&path);

    // Ensure data directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let model = DenseModel::material()?;
    println!("Writing to {}...", path.display());
    model.save(path)?;

    // Reload to make sure the file is usable
    let reloaded = DenseModel::load(path)?;
    let file_size = fs::metadata(path)?.len();

    println!();
    println!("Export complete!");
    println!("  Layers:    {}", reloaded.layer_count());
    println!("  File size: {} KB", file_size / 1024);
    println!("  Path:      {}", path.display());

    Ok(())
}
