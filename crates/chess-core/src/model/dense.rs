//! Feed-forward network over the flattened board tensor.
//!
//! Weights are stored the Keras way: each layer has a kernel of shape
//! (inputs, outputs) and a bias of length `outputs`. Files ending in `.json`
//! are read as JSON, anything else as bincode.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use ndarray::{Array1, Array2, ArrayView2, ArrayView4};
use serde::{Deserialize, Serialize};

use super::material::MATERIAL_VALUES;
use super::{check_batch_output, check_input_shape, ScoringModel};
use crate::encoding::{NUM_CATEGORIES, TENSOR_LEN};
use crate::error::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Linear,
    Relu,
    Sigmoid,
    Tanh,
}

impl Activation {
    fn apply(self, v: f32) -> f32 {
        match self {
            Activation::Linear => v,
            Activation::Relu => v.max(0.0),
            Activation::Sigmoid => 1.0 / (1.0 + (-v).exp()),
            Activation::Tanh => v.tanh(),
        }
    }
}

/// On-disk form of one dense layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayerWeights {
    /// Shape (inputs, outputs).
    pub kernel: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
    pub activation: Activation,
}

/// On-disk form of a whole network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseWeights {
    pub name: String,
    pub layers: Vec<DenseLayerWeights>,
}

struct DenseLayer {
    kernel: Array2<f32>,
    bias: Array1<f32>,
    activation: Activation,
}

impl DenseLayer {
    fn forward(&self, input: ArrayView2<'_, f32>) -> Array2<f32> {
        let mut out = input.dot(&self.kernel);
        out += &self.bias;
        let activation = self.activation;
        out.mapv_inplace(|v| activation.apply(v));
        out
    }
}

pub struct DenseModel {
    name: String,
    layers: Vec<DenseLayer>,
}

impl DenseModel {
    /// Build a network, checking that layer shapes chain from 832 inputs
    /// down to a single output.
    pub fn from_weights(weights: DenseWeights) -> Result<Self, ModelError> {
        if weights.layers.is_empty() {
            return Err(ModelError::InvalidWeights("model has no layers".into()));
        }

        let mut inputs = TENSOR_LEN;
        let mut layers = Vec::with_capacity(weights.layers.len());

        for (i, layer) in weights.layers.into_iter().enumerate() {
            if layer.kernel.len() != inputs {
                return Err(ModelError::InvalidWeights(format!(
                    "layer {i} kernel has {} rows, expected {inputs}",
                    layer.kernel.len()
                )));
            }
            let outputs = layer.bias.len();
            if outputs == 0 {
                return Err(ModelError::InvalidWeights(format!("layer {i} has no outputs")));
            }
            if let Some(row) = layer.kernel.iter().position(|r| r.len() != outputs) {
                return Err(ModelError::InvalidWeights(format!(
                    "layer {i} kernel row {row} has {} columns, bias has {outputs}",
                    layer.kernel[row].len()
                )));
            }
            if layer
                .kernel
                .iter()
                .flatten()
                .chain(layer.bias.iter())
                .any(|v| !v.is_finite())
            {
                return Err(ModelError::InvalidWeights(format!(
                    "layer {i} contains non-finite weights"
                )));
            }

            let flat: Vec<f32> = layer.kernel.into_iter().flatten().collect();
            let kernel = Array2::from_shape_vec((inputs, outputs), flat)
                .map_err(|e| ModelError::InvalidWeights(e.to_string()))?;

            layers.push(DenseLayer {
                kernel,
                bias: Array1::from(layer.bias),
                activation: layer.activation,
            });
            inputs = outputs;
        }

        if inputs != 1 {
            return Err(ModelError::InvalidWeights(format!(
                "final layer has {inputs} outputs, expected 1"
            )));
        }

        Ok(Self {
            name: weights.name,
            layers,
        })
    }

    pub fn to_weights(&self) -> DenseWeights {
        DenseWeights {
            name: self.name.clone(),
            layers: self
                .layers
                .iter()
                .map(|layer| DenseLayerWeights {
                    kernel: layer.kernel.rows().into_iter().map(|r| r.to_vec()).collect(),
                    bias: layer.bias.to_vec(),
                    activation: layer.activation,
                })
                .collect(),
        }
    }

    /// Single linear layer that reproduces `MaterialModel`.
    pub fn material() -> Result<Self, ModelError> {
        let kernel = (0..TENSOR_LEN)
            .map(|i| vec![MATERIAL_VALUES[i % NUM_CATEGORIES]])
            .collect();
        let weights = DenseWeights {
            name: "dense-material".into(),
            layers: vec![DenseLayerWeights {
                kernel,
                bias: vec![0.0],
                activation: Activation::Linear,
            }],
        };
        Self::from_weights(weights)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let reader = BufReader::new(File::open(path)?);
        let weights: DenseWeights = if is_json(path) {
            serde_json::from_reader(reader).map_err(|e| ModelError::Format(e.to_string()))?
        } else {
            bincode::deserialize_from(reader).map_err(|e| ModelError::Format(e.to_string()))?
        };

        let model = Self::from_weights(weights)?;
        tracing::info!(
            path = %path.display(),
            name = %model.name,
            layers = model.layers.len(),
            "Loaded dense model"
        );
        Ok(model)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        let weights = self.to_weights();
        if is_json(path) {
            serde_json::to_writer(&mut writer, &weights)
                .map_err(|e| ModelError::Format(e.to_string()))?;
        } else {
            bincode::serialize_into(&mut writer, &weights)
                .map_err(|e| ModelError::Format(e.to_string()))?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

impl ScoringModel for DenseModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn score_batch(&self, batch: ArrayView4<'_, f32>) -> Result<Vec<f32>, ModelError> {
        let n = check_input_shape(&batch)?;
        let flat = batch
            .to_shape((n, TENSOR_LEN))
            .map_err(|e| ModelError::Inference(e.to_string()))?;

        let mut activations: Array2<f32> = flat.into_owned();
        for layer in &self.layers {
            activations = layer.forward(activations.view());
        }

        check_batch_output(n, activations.column(0).to_vec())
    }
}
