//! ONNX Runtime backend for exported Keras models.
//!
//! Expects a single input of shape (N, 8, 8, 13) f32 and a first output with
//! one score per row, e.g. (N, 1).

use std::path::Path;
use std::sync::Mutex;

use ndarray::ArrayView4;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;

use super::{check_batch_output, check_input_shape, ScoringModel};
use crate::error::ModelError;

fn ort_error(e: impl std::fmt::Display) -> ModelError {
    ModelError::Inference(e.to_string())
}

/// `Session::run` needs `&mut`, so the session sits behind a mutex.
pub struct OnnxModel {
    name: String,
    session: Mutex<Session>,
}

impl OnnxModel {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let builder = Session::builder().map_err(ort_error)?;
        let builder = builder
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(ort_error)?;
        let builder = builder.with_intra_threads(1).map_err(ort_error)?;
        let session = builder.commit_from_file(path).map_err(ort_error)?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("onnx")
            .to_string();
        tracing::info!(path = %path.display(), name = %name, "Loaded ONNX model");

        Ok(Self {
            name,
            session: Mutex::new(session),
        })
    }
}

impl ScoringModel for OnnxModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn score_batch(&self, batch: ArrayView4<'_, f32>) -> Result<Vec<f32>, ModelError> {
        let n = check_input_shape(&batch)?;
        if n == 0 {
            return Ok(Vec::new());
        }

        let input = Tensor::from_array(batch.as_standard_layout().into_owned()).map_err(ort_error)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| ModelError::Inference("ONNX session lock poisoned".into()))?;
        let outputs = session.run(ort::inputs![input]).map_err(ort_error)?;
        let (_, scores) = outputs[0].try_extract_tensor::<f32>().map_err(ort_error)?;

        check_batch_output(n, scores.to_vec())
    }
}
