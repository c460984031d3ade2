//! Error types for encoding, scoring and move selection.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodingError {
    #[error("Unknown piece symbol '{0}'")]
    UnknownSymbol(char),

    #[error("Board grid has {0} rows, expected 8")]
    RowCount(usize),

    #[error("Board grid row {row} has {len} squares, expected 8")]
    RowLength { row: usize, len: usize },

    #[error("Board tensor has shape {0:?}, expected [8, 8, 13]")]
    TensorShape(Vec<usize>),

    #[error("Square at row {row}, column {col} is not one-hot")]
    NotOneHot { row: usize, col: usize },
}

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to read model file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode model weights: {0}")]
    Format(String),

    #[error("Invalid model weights: {0}")]
    InvalidWeights(String),

    #[error("Model input has shape {0:?}, expected [N, 8, 8, 13]")]
    InputShape(Vec<usize>),

    #[error("Model returned {found} scores for a batch of {expected}")]
    BatchMismatch { expected: usize, found: usize },

    #[error("Model returned a non-finite score at index {0}")]
    NonFinite(usize),

    #[error("Model inference failed: {0}")]
    Inference(String),

    #[error("Unsupported model: {0}")]
    Unsupported(String),
}

#[derive(Error, Debug)]
pub enum SelectError {
    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    #[error("Position has no legal moves")]
    NoLegalMoves,

    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

/// Errors from validating caller-supplied positions and moves.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    #[error("Invalid move format: {0}")]
    MalformedMove(String),

    #[error("Illegal move: {0}")]
    IllegalMove(String),
}
