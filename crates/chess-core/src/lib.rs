//! Move selection for the ML chess opponent.
//!
//! Positions come from shakmaty, get one-hot encoded into (8, 8, 13) tensors,
//! and a black-box scoring model ranks every legal reply in a single batch.
//! The main entry point is `selector::select_move()`.

pub mod encoding;
pub mod error;
pub mod game;
pub mod model;
pub mod selector;

pub use error::{EncodingError, GameError, ModelError, SelectError};
pub use model::{ScoringModel, SharedModel};
pub use selector::{select_move, Selection};
