//! Scoring model capability and its backends.
//!
//! A model takes a batch of board tensors of shape (N, 8, 8, 13) and returns
//! one score per tensor, in input order. Scores follow the convention of the
//! trained network: higher favours Black. That convention is a property of the
//! training data, not something the selector can check.

pub mod dense;
pub mod material;
#[cfg(feature = "onnx")]
pub mod onnx;

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use ndarray::ArrayView4;

use crate::encoding::{BOARD_SIZE, NUM_CATEGORIES};
use crate::error::ModelError;

pub use dense::{Activation, DenseLayerWeights, DenseModel, DenseWeights};
pub use material::MaterialModel;
#[cfg(feature = "onnx")]
pub use onnx::OnnxModel;

/// Anything that can score a batch of encoded positions.
pub trait ScoringModel: Send + Sync {
    /// Name used in logs and the health endpoint.
    fn name(&self) -> &str;

    /// Score every position in the batch. Must return exactly one score per
    /// row of `batch`, in the same order.
    fn score_batch(&self, batch: ArrayView4<'_, f32>) -> Result<Vec<f32>, ModelError>;
}

/// Model handle shared across request handlers.
pub type SharedModel = Arc<dyn ScoringModel>;

/// Reject inputs that are not (N, 8, 8, 13).
pub fn check_input_shape(batch: &ArrayView4<'_, f32>) -> Result<usize, ModelError> {
    let shape = batch.shape();
    if shape[1..] != [BOARD_SIZE, BOARD_SIZE, NUM_CATEGORIES] {
        return Err(ModelError::InputShape(shape.to_vec()));
    }
    Ok(shape[0])
}

/// Validate a backend's output against the batch it was given.
pub fn check_batch_output(expected: usize, scores: Vec<f32>) -> Result<Vec<f32>, ModelError> {
    if scores.len() != expected {
        return Err(ModelError::BatchMismatch {
            expected,
            found: scores.len(),
        });
    }
    if let Some(idx) = scores.iter().position(|s| !s.is_finite()) {
        return Err(ModelError::NonFinite(idx));
    }
    Ok(scores)
}

/// Which backend to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// Pick from the file extension, or the material model without a file.
    Auto,
    Material,
    Dense,
    Onnx,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelKind::Auto => "auto",
            ModelKind::Material => "material",
            ModelKind::Dense => "dense",
            ModelKind::Onnx => "onnx",
        };
        f.write_str(name)
    }
}

impl FromStr for ModelKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "" => Ok(ModelKind::Auto),
            "material" => Ok(ModelKind::Material),
            "dense" => Ok(ModelKind::Dense),
            "onnx" => Ok(ModelKind::Onnx),
            other => Err(ModelError::Unsupported(format!("unknown model kind '{other}'"))),
        }
    }
}

/// Load a scoring model.
pub fn load_model(kind: ModelKind, path: Option<&Path>) -> Result<SharedModel, ModelError> {
    match (kind, path) {
        (ModelKind::Material, _) | (ModelKind::Auto, None) => Ok(Arc::new(MaterialModel)),
        (ModelKind::Dense, Some(path)) => Ok(Arc::new(DenseModel::load(path)?)),
        (ModelKind::Onnx, Some(path)) => load_onnx(path),
        (ModelKind::Auto, Some(path)) => {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_ascii_lowercase())
                .unwrap_or_default();
            match ext.as_str() {
                "onnx" => load_onnx(path),
                "json" | "bin" => Ok(Arc::new(DenseModel::load(path)?)),
                _ => Err(ModelError::Unsupported(format!(
                    "cannot infer model type from {}",
                    path.display()
                ))),
            }
        }
        (kind, None) => Err(ModelError::Unsupported(format!(
            "{kind} model requires a model path"
        ))),
    }
}

#[cfg(feature = "onnx")]
fn load_onnx(path: &Path) -> Result<SharedModel, ModelError> {
    Ok(Arc::new(OnnxModel::load(path)?))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx(path: &Path) -> Result<SharedModel, ModelError> {
    Err(ModelError::Unsupported(format!(
        "{} needs the `onnx` feature",
        path.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;

    #[test]
    fn test_check_batch_output() {
        assert_eq!(check_batch_output(2, vec![0.5, -1.0]).unwrap(), vec![0.5, -1.0]);
        assert!(matches!(
            check_batch_output(3, vec![0.5, -1.0]),
            Err(ModelError::BatchMismatch { expected: 3, found: 2 })
        ));
        assert!(matches!(
            check_batch_output(2, vec![0.5, f32::NAN]),
            Err(ModelError::NonFinite(1))
        ));
    }

    #[test]
    fn test_check_input_shape() {
        let good = Array4::<f32>::zeros((5, 8, 8, 13));
        assert_eq!(check_input_shape(&good.view()).unwrap(), 5);

        let bad = Array4::<f32>::zeros((5, 8, 8, 12));
        assert!(matches!(
            check_input_shape(&bad.view()),
            Err(ModelError::InputShape(_))
        ));
    }

    #[test]
    fn test_model_kind_parse() {
        assert_eq!("Dense".parse::<ModelKind>().unwrap(), ModelKind::Dense);
        assert_eq!("".parse::<ModelKind>().unwrap(), ModelKind::Auto);
        assert!("keras".parse::<ModelKind>().is_err());
    }

    #[test]
    fn test_load_without_path() {
        let model = load_model(ModelKind::Auto, None).unwrap();
        assert_eq!(model.name(), "material");
        assert!(load_model(ModelKind::Dense, None).is_err());
    }

    #[test]
    fn test_load_unknown_extension() {
        let err = load_model(ModelKind::Auto, Some(Path::new("model.h5"))).err();
        assert!(matches!(err, Some(ModelError::Unsupported(_))));
    }
}
