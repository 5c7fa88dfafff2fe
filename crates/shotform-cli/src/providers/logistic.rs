use serde::{Deserialize, Serialize};
use shotform_core::contracts::{QualityClassifier, QualityVerdict};
use shotform_core::quality::CLASSIFIER_INPUT_LEN;
use std::path::Path;

use crate::errors::{Result, ShotProcessingError};

/// Logistic-regression shot-quality model
///
/// Probability of good form is `sigmoid(w · x + b)` over the classifier input
/// vector; the reported probability is that of the predicted label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticClassifier {
    weights: Vec<f32>,
    bias: f32,
}

impl LogisticClassifier {
    pub fn new(weights: Vec<f32>, bias: f32) -> Result<Self> {
        if weights.len() != CLASSIFIER_INPUT_LEN {
            return Err(ShotProcessingError::ClassifierLoad(format!(
                "expected {} weights, found {}",
                CLASSIFIER_INPUT_LEN,
                weights.len()
            )));
        }
        Ok(Self { weights, bias })
    }

    /// Load weights from a JSON file of the form `{"weights": [...], "bias": b}`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ShotProcessingError::ClassifierLoad(format!(
                "Failed to read file {}: {}",
                path.display(),
                e
            ))
        })?;
        let model: LogisticClassifier = serde_json::from_str(&contents)
            .map_err(|e| ShotProcessingError::ClassifierLoad(e.to_string()))?;
        log::info!("Loaded quality classifier from {}", path.display());
        Self::new(model.weights, model.bias)
    }

    /// Probability that `input` shows good form
    pub fn probability(&self, input: &[f32]) -> f64 {
        let logit: f32 = self
            .weights
            .iter()
            .zip(input)
            .map(|(w, x)| w * x)
            .sum::<f32>()
            + self.bias;
        1.0 / (1.0 + (-f64::from(logit)).exp())
    }
}

impl QualityClassifier for LogisticClassifier {
    fn classify(&self, input: &[f32]) -> QualityVerdict {
        let p = self.probability(input);
        let passed = p > 0.5;
        QualityVerdict {
            passed,
            probability: if passed { p } else { 1.0 - p },
        }
    }
}
