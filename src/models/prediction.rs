//! Prediction model

use serde::{Deserialize, Serialize};

use super::TransactionInput;

/// Classifier output for a single transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted class id (index of the largest vote)
    pub prediction: usize,
    /// Per-class probabilities, aligned with the training class order
    pub probability: Vec<f64>,
}

impl Prediction {
    /// Probability assigned to the predicted class
    pub fn confidence(&self) -> f64 {
        self.probability.get(self.prediction).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: usize,
    pub probability: Vec<f64>,
    pub input: TransactionInput,
}

impl PredictResponse {
    pub fn new(prediction: Prediction, input: TransactionInput) -> Self {
        Self {
            prediction: prediction.prediction,
            probability: prediction.probability,
            input,
        }
    }
}
