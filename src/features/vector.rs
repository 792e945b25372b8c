//! Feature Vector - assembled classifier input
//!
//! Values are laid out exactly as `FEATURE_LAYOUT` declares: the one-hot
//! type block first, then the numeric columns.

use serde::{Deserialize, Serialize};

use crate::models::TransactionInput;
use super::layout::NUMERIC_COLUMNS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    /// Concatenate the encoded type block with the numeric columns
    pub fn assemble(type_vector: Vec<f64>, input: &TransactionInput) -> Self {
        let mut values = type_vector;
        values.reserve(NUMERIC_COLUMNS.len());
        values.push(input.step as f64);
        values.push(input.amount);
        values.push(input.old_balance_org);
        values.push(input.new_balance_orig);
        Self { values }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
