//! Feature Layout - Centralized Feature Definition
//!
//! **This file controls the feature schema the forest was trained on.**
//!
//! ## Rules:
//! 1. Add a column → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove a column → increment FEATURE_VERSION
//!
//! The model artifact records the expanded feature names it was trained
//! with; they are checked against this layout when the artifacts load.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Raw categorical input column the indexer reads
pub const TYPE_COLUMN: &str = "type";

/// Output column of the one-hot encoder
pub const TYPE_VECTOR_COLUMN: &str = "typeVec";

/// Numeric columns appended after the one-hot block, in order
pub const NUMERIC_COLUMNS: &[&str] = &[
    "step",           // simulation hour
    "amount",         // transaction amount
    "oldbalanceOrg",  // originator balance before
    "newbalanceOrig", // originator balance after
];

/// Assembled columns in exact vector order
pub const FEATURE_LAYOUT: &[&str] = &[
    TYPE_VECTOR_COLUMN, // expands to one slot per encoded category
    "step",
    "amount",
    "oldbalanceOrg",
    "newbalanceOrig",
];

/// Expand the layout into one name per vector slot.
///
/// The one-hot block contributes `typeVec_0 .. typeVec_{width-1}`.
pub fn expanded_feature_names(type_width: usize) -> Vec<String> {
    let mut names = Vec::with_capacity(type_width + NUMERIC_COLUMNS.len());
    for column in FEATURE_LAYOUT {
        if *column == TYPE_VECTOR_COLUMN {
            names.extend((0..type_width).map(|i| format!("{}_{}", TYPE_VECTOR_COLUMN, i)));
        } else {
            names.push(column.to_string());
        }
    }
    names
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 of the version and the expanded feature names
pub fn compute_layout_hash(type_width: usize) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);

    for name in expanded_feature_names(type_width) {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn for_type_width(type_width: usize) -> Self {
        let feature_names = expanded_feature_names(type_width);
        Self {
            version: FEATURE_VERSION,
            hash: compute_layout_hash(type_width),
            feature_count: feature_names.len(),
            feature_names,
        }
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when a model's recorded layout doesn't match this build
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutMismatchError {
    #[error("feature layout version mismatch: expected v{expected}, model has v{actual}")]
    Version { expected: u8, actual: u8 },

    #[error("feature count mismatch: expected {expected}, model has {actual}")]
    Count { expected: usize, actual: usize },

    #[error("feature {index} mismatch: expected '{expected}', model has '{actual}'")]
    Name {
        index: usize,
        expected: String,
        actual: String,
    },
}

/// Validate a model's recorded feature names against the compiled layout
pub fn validate_feature_names(
    version: u8,
    names: &[String],
    type_width: usize,
) -> Result<(), LayoutMismatchError> {
    if version != FEATURE_VERSION {
        return Err(LayoutMismatchError::Version {
            expected: FEATURE_VERSION,
            actual: version,
        });
    }

    let expected = expanded_feature_names(type_width);
    if names.len() != expected.len() {
        return Err(LayoutMismatchError::Count {
            expected: expected.len(),
            actual: names.len(),
        });
    }

    for (index, (want, got)) in expected.iter().zip(names).enumerate() {
        if want != got {
            return Err(LayoutMismatchError::Name {
                index,
                expected: want.clone(),
                actual: got.clone(),
            });
        }
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
