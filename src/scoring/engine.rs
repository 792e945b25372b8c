//! Scoring Engine - index → encode → assemble → infer

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, ScoringError};
use crate::features::FeatureVector;
use crate::models::{Prediction, TransactionInput};
use super::artifacts::{ArtifactPaths, ModelArtifacts};

/// Engine status for `/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub model_loaded: bool,
    pub classes: usize,
    pub trees: usize,
    pub inference_count: u64,
    pub avg_latency_us: f64,
    pub loaded_at: DateTime<Utc>,
}

/// Process-wide scorer; read-only after construction apart from counters
#[derive(Debug)]
pub struct ScoringEngine {
    artifacts: ModelArtifacts,
    loaded_at: DateTime<Utc>,
    inference_count: AtomicU64,
    latency_sum_us: AtomicU64,
}

impl ScoringEngine {
    pub fn new(artifacts: ModelArtifacts) -> Self {
        Self {
            artifacts,
            loaded_at: Utc::now(),
            inference_count: AtomicU64::new(0),
            latency_sum_us: AtomicU64::new(0),
        }
    }

    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        Ok(Self::new(ModelArtifacts::load(paths)?))
    }

    /// Build the feature vector for one transaction
    pub fn features(&self, input: &TransactionInput) -> Result<FeatureVector, ScoringError> {
        let index = self.artifacts.indexer.index(&input.transaction_type)?;
        let type_vector = self.artifacts.encoder.encode(index)?;
        Ok(FeatureVector::assemble(type_vector, input))
    }

    /// Score one transaction
    pub fn score(&self, input: &TransactionInput) -> Result<Prediction, ScoringError> {
        let start = Instant::now();

        let features = self.features(input)?;
        let prediction = self.artifacts.forest.predict(features.as_slice())?;

        let elapsed_us = start.elapsed().as_micros() as u64;
        self.latency_sum_us.fetch_add(elapsed_us, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        tracing::debug!(
            transaction_type = %input.transaction_type,
            prediction = prediction.prediction,
            confidence = prediction.confidence(),
            inference_time_us = elapsed_us,
            "Transaction scored"
        );

        Ok(prediction)
    }

    pub fn artifacts(&self) -> &ModelArtifacts {
        &self.artifacts
    }

    pub fn status(&self) -> EngineStatus {
        let count = self.inference_count.load(Ordering::Relaxed);
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let avg = if count > 0 { sum as f64 / count as f64 } else { 0.0 };

        EngineStatus {
            model_loaded: true,
            classes: self.artifacts.forest.num_classes(),
            trees: self.artifacts.forest.num_trees(),
            inference_count: count,
            avg_latency_us: avg,
            loaded_at: self.loaded_at,
        }
    }
}
