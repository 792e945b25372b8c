//! Categorical index map (string label → category index)

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, ScoringError};

/// What to do with a label that was not seen at fit time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleInvalid {
    #[default]
    Error,
    Keep,
}

/// On-disk form of the fitted index map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexerSpec {
    pub input_col: String,
    pub output_col: String,
    /// Labels ordered by index
    pub labels: Vec<String>,
    #[serde(default)]
    pub handle_invalid: HandleInvalid,
}

/// Fitted string indexer
#[derive(Debug, Clone)]
pub struct StringIndexer {
    spec: IndexerSpec,
    lookup: HashMap<String, usize>,
}

impl StringIndexer {
    pub fn new(spec: IndexerSpec) -> Result<Self, ArtifactError> {
        if spec.labels.is_empty() {
            return Err(ArtifactError::Incompatible(
                "type indexer has an empty vocabulary".to_string(),
            ));
        }

        let mut lookup = HashMap::with_capacity(spec.labels.len());
        for (index, label) in spec.labels.iter().enumerate() {
            if lookup.insert(label.clone(), index).is_some() {
                return Err(ArtifactError::Incompatible(format!(
                    "type indexer lists label '{}' more than once",
                    label
                )));
            }
        }

        Ok(Self { spec, lookup })
    }

    /// Map a label to its category index
    pub fn index(&self, label: &str) -> Result<usize, ScoringError> {
        match self.lookup.get(label) {
            Some(&index) => Ok(index),
            None if self.spec.handle_invalid == HandleInvalid::Keep => Ok(self.spec.labels.len()),
            None => Err(ScoringError::UnsupportedCategory(label.to_string())),
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.spec.labels
    }

    /// Number of distinct indices this indexer can emit
    pub fn output_size(&self) -> usize {
        match self.spec.handle_invalid {
            HandleInvalid::Error => self.spec.labels.len(),
            HandleInvalid::Keep => self.spec.labels.len() + 1,
        }
    }

    pub fn spec(&self) -> &IndexerSpec {
        &self.spec
    }
}
