//! Stateless game helpers on top of shakmaty.
//!
//! Callers own the canonical position and pass it in as FEN (or as a list of
//! UCI moves from the initial position). Nothing here mutates the caller's
//! position; new positions are returned.

use serde::Serialize;
use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, Position};

use crate::error::GameError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatus {
    pub fen: String,
    pub turn: &'static str,
    pub fullmove: u32,
    pub is_check: bool,
    pub is_checkmate: bool,
    pub is_stalemate: bool,
    pub is_insufficient_material: bool,
    pub is_game_over: bool,
    pub winner: Option<&'static str>,
    pub message: Option<String>,
}

/// A legal move as offered to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveOption {
    pub label: String,
    pub uci: String,
}

pub fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "white",
        Color::Black => "black",
    }
}

fn title_case(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}

pub(crate) fn position_from_fen(fen: &str) -> Result<Chess, String> {
    let fen: Fen = fen.trim().parse().map_err(|e| format!("{e}"))?;
    fen.into_position(CastlingMode::Standard)
        .map_err(|e| format!("{e}"))
}

pub fn parse_fen(fen: &str) -> Result<Chess, GameError> {
    position_from_fen(fen).map_err(GameError::InvalidFen)
}

pub fn to_fen(pos: &Chess) -> String {
    Fen::from_position(pos, EnPassantMode::Legal).to_string()
}

pub fn to_uci(mv: &Move) -> UciMove {
    mv.to_uci(CastlingMode::Standard)
}

pub fn status(pos: &Chess) -> GameStatus {
    let turn = pos.turn();
    let is_check = pos.is_check();
    let is_checkmate = pos.is_checkmate();
    let is_stalemate = pos.is_stalemate();
    let is_insufficient_material = pos.is_insufficient_material();
    let is_game_over = pos.is_game_over();

    let winner = is_checkmate.then(|| color_name(!turn));
    let message = if is_checkmate {
        Some(format!("Checkmate! {} wins!", title_case(!turn)))
    } else if is_check {
        Some("Check!".to_string())
    } else if is_stalemate {
        Some("Stalemate!".to_string())
    } else if is_game_over {
        Some("Game Over!".to_string())
    } else {
        None
    };

    GameStatus {
        fen: to_fen(pos),
        turn: color_name(turn),
        fullmove: pos.fullmoves().get(),
        is_check,
        is_checkmate,
        is_stalemate,
        is_insufficient_material,
        is_game_over,
        winner,
        message,
    }
}

/// Human-readable move text: piece symbol, origin, destination, and the
/// promotion piece if any. `Pe2-e4`, `pe7-e8=Q`, `Ke1-g1`.
pub fn move_label(pos: &Chess, mv: &Move) -> String {
    match to_uci(mv) {
        UciMove::Normal {
            from,
            to,
            promotion,
        } => {
            let piece = pos
                .board()
                .piece_at(from)
                .map(|p| p.char().to_string())
                .unwrap_or_default();
            let mut label = format!("{piece}{from}-{to}");
            if let Some(role) = promotion {
                label.push('=');
                label.push(role.upper_char());
            }
            label
        }
        other => other.to_string(),
    }
}

pub fn legal_move_options(pos: &Chess) -> Vec<MoveOption> {
    pos.legal_moves()
        .iter()
        .map(|mv| MoveOption {
            label: move_label(pos, mv),
            uci: to_uci(mv).to_string(),
        })
        .collect()
}

/// Check that a UCI string names a legal move in `pos`.
pub fn validate_move(pos: &Chess, uci: &str) -> Result<Move, GameError> {
    let trimmed = uci.trim();
    let parsed: UciMove = trimmed
        .parse()
        .map_err(|_| GameError::MalformedMove(trimmed.to_string()))?;
    parsed
        .to_move(pos)
        .map_err(|_| GameError::IllegalMove(trimmed.to_string()))
}

/// Validate and play a move on a copy of `pos`.
pub fn apply_move(pos: &Chess, uci: &str) -> Result<(Chess, Move), GameError> {
    let mv = validate_move(pos, uci)?;
    let mut next = pos.clone();
    next.play_unchecked(mv.clone());
    Ok((next, mv))
}

/// Play a sequence of UCI moves from `start`.
pub fn replay(start: &Chess, moves: &[String]) -> Result<Chess, GameError> {
    let mut pos = start.clone();
    for uci in moves {
        let (next, _) = apply_move(&pos, uci)?;
        pos = next;
    }
    Ok(pos)
}

/// Numbered move history from the initial position, one line per full move:
/// `1. Pe2-e4 pe7-e5`.
pub fn move_history(moves: &[String]) -> Result<Vec<String>, GameError> {
    let mut pos = Chess::default();
    let mut labels = Vec::with_capacity(moves.len());
    for uci in moves {
        let (next, mv) = apply_move(&pos, uci)?;
        labels.push(move_label(&pos, &mv));
        pos = next;
    }

    Ok(labels
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| match pair {
            [white, black] => format!("{}. {white} {black}", i + 1),
            [white] => format!("{}. {white}", i + 1),
            _ => String::new(),
        })
        .collect())
}

/// History with its last move taken back.
pub fn undo_last(moves: &[String]) -> &[String] {
    moves.split_last().map(|(_, rest)| rest).unwrap_or(&[])
}
