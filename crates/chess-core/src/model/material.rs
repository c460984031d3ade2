//! Hand-written material evaluator.

use ndarray::{Array1, ArrayView4, Axis};

use super::{check_batch_output, check_input_shape, ScoringModel};
use crate::error::ModelError;

/// Score contribution of each tensor category, Black-positive, in the order
/// of `encoding::PIECE_SYMBOLS`. Kings and empty squares count zero.
pub const MATERIAL_VALUES: [f32; 13] = [
    5.0, 3.0, 3.0, 9.0, 0.0, 1.0, // r n b q k p
    -5.0, -3.0, -3.0, -9.0, 0.0, -1.0, // R N B Q K P
    0.0, // .
];

/// Black material minus White material, read straight off the tensor.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialModel;

impl ScoringModel for MaterialModel {
    fn name(&self) -> &str {
        "material"
    }

    fn score_batch(&self, batch: ArrayView4<'_, f32>) -> Result<Vec<f32>, ModelError> {
        let n = check_input_shape(&batch)?;
        let values = Array1::from(MATERIAL_VALUES.to_vec());

        let scores: Vec<f32> = batch
            .axis_iter(Axis(0))
            .map(|board| {
                board
                    .lanes(Axis(2))
                    .into_iter()
                    .map(|square| square.dot(&values))
                    .sum::<f32>()
            })
            .collect();

        check_batch_output(n, scores)
    }
}
