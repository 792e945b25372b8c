//! One-hot encoding table (category index → indicator vector)

use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, ScoringError};
use super::indexer::HandleInvalid;

fn default_drop_last() -> bool {
    true
}

/// On-disk form of the fitted encoder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderSpec {
    pub input_col: String,
    pub output_col: String,
    /// Number of categories seen at fit time
    pub category_size: usize,
    /// Encode the last category as the all-zero vector
    #[serde(default = "default_drop_last")]
    pub drop_last: bool,
    #[serde(default)]
    pub handle_invalid: HandleInvalid,
}

/// Fitted one-hot encoder
///
/// With `keep`, one extra trailing category absorbs invalid indices.
/// With `drop_last`, the last (possibly extra) category has no slot.
#[derive(Debug, Clone)]
pub struct OneHotEncoder {
    spec: EncoderSpec,
}

impl OneHotEncoder {
    pub fn new(spec: EncoderSpec) -> Result<Self, ArtifactError> {
        let encoder = Self { spec };
        if encoder.width() == 0 {
            return Err(ArtifactError::Incompatible(format!(
                "type encoder of size {} produces an empty vector",
                encoder.spec.category_size
            )));
        }
        Ok(encoder)
    }

    /// Categories including the invalid bucket when kept
    fn effective_size(&self) -> usize {
        match self.spec.handle_invalid {
            HandleInvalid::Error => self.spec.category_size,
            HandleInvalid::Keep => self.spec.category_size + 1,
        }
    }

    /// Length of the encoded vector
    pub fn width(&self) -> usize {
        let size = self.effective_size();
        if self.spec.drop_last {
            size.saturating_sub(1)
        } else {
            size
        }
    }

    pub fn encode(&self, index: usize) -> Result<Vec<f64>, ScoringError> {
        let slot = if index < self.spec.category_size {
            index
        } else {
            match self.spec.handle_invalid {
                HandleInvalid::Keep => self.spec.category_size,
                HandleInvalid::Error => {
                    return Err(ScoringError::CategoryOutOfRange {
                        index,
                        size: self.spec.category_size,
                    })
                }
            }
        };

        let mut vector = vec![0.0; self.width()];
        if let Some(cell) = vector.get_mut(slot) {
            *cell = 1.0;
        }
        Ok(vector)
    }

    pub fn spec(&self) -> &EncoderSpec {
        &self.spec
    }
}
