//! One-ply move selection.
//!
//! Every legal move is played on a copy of the position, the successors are
//! encoded and stacked, and the model scores the whole batch in one call.
//! Black takes the highest raw score, White the highest negated score (the
//! lowest raw score). Ties go to the first move in enumeration order.

use shakmaty::uci::UciMove;
use shakmaty::{Chess, Color, Move, Position};
use tracing::debug;

use crate::encoding::{self, BoardTensor};
use crate::error::{EncodingError, SelectError};
use crate::game;
use crate::model::{check_batch_output, ScoringModel};

/// A legal move paired with the encoded position it leads to.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub mv: Move,
    pub tensor: BoardTensor,
}

/// Outcome of a selection.
#[derive(Debug, Clone)]
pub struct Selection {
    pub mv: Move,
    pub uci: UciMove,
    /// Index of the move in enumeration order
    pub index: usize,
    /// Raw model score of the resulting position
    pub score: f32,
    /// Number of candidates scored
    pub candidates: usize,
}

/// Encode the position after each legal move, in the rules engine's order.
pub fn build_candidates(pos: &Chess) -> Result<Vec<Candidate>, EncodingError> {
    pos.legal_moves()
        .iter()
        .map(|mv| {
            let mut next = pos.clone();
            next.play_unchecked(mv.clone());
            Ok(Candidate {
                mv: mv.clone(),
                tensor: encoding::encode_position(&next)?,
            })
        })
        .collect()
}

/// Index of the best score for `side_to_move`; first occurrence wins ties.
/// Returns `None` for an empty slice.
pub fn pick_index(scores: &[f32], side_to_move: Color) -> Option<usize> {
    let oriented = |s: f32| match side_to_move {
        Color::Black => s,
        Color::White => -s,
    };

    let mut best: Option<(usize, f32)> = None;
    for (i, &score) in scores.iter().enumerate() {
        let value = oriented(score);
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((i, value)),
        }
    }
    best.map(|(i, _)| i)
}

/// Choose a move for the side to move in `pos`.
pub fn select_from_position<M>(pos: &Chess, model: &M) -> Result<Selection, SelectError>
where
    M: ScoringModel + ?Sized,
{
    let candidates = build_candidates(pos)?;
    if candidates.is_empty() {
        return Err(SelectError::NoLegalMoves);
    }

    let batch = encoding::stack(candidates.iter().map(|c| &c.tensor));
    let scores = check_batch_output(candidates.len(), model.score_batch(batch.view())?)?;

    let turn = pos.turn();
    let index = pick_index(&scores, turn).ok_or(SelectError::NoLegalMoves)?;
    let mv = candidates[index].mv.clone();
    let uci = game::to_uci(&mv);

    debug!(
        model = model.name(),
        turn = game::color_name(turn),
        candidates = candidates.len(),
        index,
        score = scores[index],
        uci = %uci,
        "Selected move"
    );

    Ok(Selection {
        mv,
        uci,
        index,
        score: scores[index],
        candidates: candidates.len(),
    })
}

/// Choose a move for the position given as FEN and return it in UCI notation.
pub fn select_move<M>(fen: &str, model: &M) -> Result<UciMove, SelectError>
where
    M: ScoringModel + ?Sized,
{
    let pos = game::position_from_fen(fen).map_err(SelectError::InvalidFen)?;
    Ok(select_from_position(&pos, model)?.uci)
}
