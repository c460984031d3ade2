//! One-hot board encoding for the scoring model.
//!
//! A board is rendered as an 8x8 grid of piece symbols (rank 8 first, file a
//! first, `.` for empty squares) and every square becomes a 13-wide indicator
//! vector. The symbol order is fixed: the trained model depends on it.

use ndarray::{Array3, Array4, ArrayView3, Axis};
use shakmaty::{Board, Chess, File, Position, Rank, Square};

use crate::error::EncodingError;

/// Category alphabet. Index in this array = channel in the tensor.
pub const PIECE_SYMBOLS: [char; 13] = [
    'r', 'n', 'b', 'q', 'k', 'p', 'R', 'N', 'B', 'Q', 'K', 'P', '.',
];

pub const EMPTY_SYMBOL: char = '.';
pub const BOARD_SIZE: usize = 8;
pub const NUM_CATEGORIES: usize = PIECE_SYMBOLS.len();

/// Flattened length of one board tensor (8 * 8 * 13).
pub const TENSOR_LEN: usize = BOARD_SIZE * BOARD_SIZE * NUM_CATEGORIES;

/// An (8, 8, 13) one-hot tensor. Only built by the encoder, so the shape and
/// the one-hot property always hold.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardTensor(Array3<f32>);

impl BoardTensor {
    pub fn view(&self) -> ArrayView3<'_, f32> {
        self.0.view()
    }

    pub fn into_inner(self) -> Array3<f32> {
        self.0
    }

    pub fn shape(&self) -> &[usize] {
        self.0.shape()
    }

    /// Category index set for the square at (row, col).
    pub fn category_at(&self, row: usize, col: usize) -> Option<usize> {
        self.0
            .slice(ndarray::s![row, col, ..])
            .iter()
            .position(|&v| v == 1.0)
    }
}

pub fn symbol_index(symbol: char) -> Result<usize, EncodingError> {
    PIECE_SYMBOLS
        .iter()
        .position(|&s| s == symbol)
        .ok_or(EncodingError::UnknownSymbol(symbol))
}

/// Grid row/column to board square. Row 0 is rank 8.
fn square_at(row: usize, col: usize) -> Square {
    Square::from_coords(
        File::new(col as u32),
        Rank::new((BOARD_SIZE - 1 - row) as u32),
    )
}

/// Render a board as 8 lines of 8 symbols with no separators.
pub fn board_grid(board: &Board) -> String {
    let mut grid = String::with_capacity(BOARD_SIZE * (BOARD_SIZE + 1));
    for row in 0..BOARD_SIZE {
        if row > 0 {
            grid.push('\n');
        }
        for col in 0..BOARD_SIZE {
            let symbol = board
                .piece_at(square_at(row, col))
                .map(|p| p.char())
                .unwrap_or(EMPTY_SYMBOL);
            grid.push(symbol);
        }
    }
    grid
}

/// One-hot encode a textual board grid.
///
/// Whitespace inside a line is ignored, so spaced renderings such as
/// `r n b q k b n r` are accepted too. Blank lines are skipped.
pub fn encode_grid(grid: &str) -> Result<BoardTensor, EncodingError> {
    let rows: Vec<Vec<char>> = grid
        .lines()
        .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
        .filter(|row| !row.is_empty())
        .collect();

    if rows.len() != BOARD_SIZE {
        return Err(EncodingError::RowCount(rows.len()));
    }

    let mut tensor = Array3::<f32>::zeros((BOARD_SIZE, BOARD_SIZE, NUM_CATEGORIES));
    for (row, symbols) in rows.iter().enumerate() {
        if symbols.len() != BOARD_SIZE {
            return Err(EncodingError::RowLength { row, len: symbols.len() });
        }
        for (col, &symbol) in symbols.iter().enumerate() {
            tensor[[row, col, symbol_index(symbol)?]] = 1.0;
        }
    }

    Ok(BoardTensor(tensor))
}

/// Encode a board through its grid rendering.
pub fn encode_board(board: &Board) -> Result<BoardTensor, EncodingError> {
    encode_grid(&board_grid(board))
}

pub fn encode_position(pos: &Chess) -> Result<BoardTensor, EncodingError> {
    encode_board(pos.board())
}

/// Inverse of encoding: turn an (8, 8, 13) array back into the symbol grid.
pub fn decode_tensor(tensor: ArrayView3<'_, f32>) -> Result<String, EncodingError> {
    if tensor.shape() != [BOARD_SIZE, BOARD_SIZE, NUM_CATEGORIES] {
        return Err(EncodingError::TensorShape(tensor.shape().to_vec()));
    }

    let mut grid = String::with_capacity(BOARD_SIZE * (BOARD_SIZE + 1));
    for row in 0..BOARD_SIZE {
        if row > 0 {
            grid.push('\n');
        }
        for col in 0..BOARD_SIZE {
            let slice = tensor.slice(ndarray::s![row, col, ..]);
            let ones: Vec<usize> = slice
                .iter()
                .enumerate()
                .filter(|(_, v)| **v == 1.0)
                .map(|(i, _)| i)
                .collect();
            let zeros = slice.iter().filter(|&&v| v == 0.0).count();
            if ones.len() != 1 || zeros != NUM_CATEGORIES - 1 {
                return Err(EncodingError::NotOneHot { row, col });
            }
            grid.push(PIECE_SYMBOLS[ones[0]]);
        }
    }

    Ok(grid)
}

/// Stack board tensors into a batch of shape (N, 8, 8, 13), preserving order.
pub fn stack<'a, I>(tensors: I) -> Array4<f32>
where
    I: IntoIterator<Item = &'a BoardTensor>,
{
    let tensors: Vec<&BoardTensor> = tensors.into_iter().collect();
    let mut batch = Array4::<f32>::zeros((tensors.len(), BOARD_SIZE, BOARD_SIZE, NUM_CATEGORIES));
    for (i, tensor) in tensors.iter().enumerate() {
        batch.index_axis_mut(Axis(0), i).assign(&tensor.0);
    }
    batch
}
