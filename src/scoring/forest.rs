//! Random forest classifier
//!
//! Trees are stored as flat node arenas rooted at index 0. Each tree routes
//! a feature vector to one leaf; the leaf's class counts are normalized to
//! a distribution, scaled by the tree weight and summed into the vote
//! vector. Probabilities are the normalized votes and the predicted class
//! is the first index holding the largest vote.

use serde::{Deserialize, Serialize};

use crate::error::{ArtifactError, ScoringError};
use crate::models::Prediction;

fn default_tree_weight() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Leaf {
        /// Training class counts reaching this leaf
        stats: Vec<f64>,
    },
    Split {
        feature: usize,
        /// Go left when `x[feature] <= threshold`
        threshold: f64,
        left: usize,
        right: usize,
    },
    CategoricalSplit {
        feature: usize,
        /// Go left when `x[feature]` is one of these
        left_categories: Vec<f64>,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    #[serde(default = "default_tree_weight")]
    pub weight: f64,
    pub nodes: Vec<Node>,
}

impl DecisionTree {
    /// Check structure: children point forward, features and classes in range
    fn validate(&self, tree_id: usize, num_features: usize, num_classes: usize) -> Result<(), ArtifactError> {
        let fail = |msg: String| Err(ArtifactError::Incompatible(format!("tree {}: {}", tree_id, msg)));

        if !(self.weight.is_finite() && self.weight > 0.0) {
            return fail(format!("weight {} must be positive and finite", self.weight));
        }
        if self.nodes.is_empty() {
            return fail("has no nodes".to_string());
        }

        for (id, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf { stats } => {
                    if stats.len() != num_classes {
                        return fail(format!(
                            "leaf {} has {} class counts, expected {}",
                            id,
                            stats.len(),
                            num_classes
                        ));
                    }
                    if stats.iter().any(|s| !s.is_finite() || *s < 0.0) {
                        return fail(format!("leaf {} has a negative or non-finite count", id));
                    }
                    if stats.iter().sum::<f64>() <= 0.0 {
                        return fail(format!("leaf {} has no samples", id));
                    }
                }
                Node::Split { feature, left, right, .. }
                | Node::CategoricalSplit { feature, left, right, .. } => {
                    if *feature >= num_features {
                        return fail(format!(
                            "node {} splits on feature {} but the model has {}",
                            id, feature, num_features
                        ));
                    }
                    for child in [*left, *right] {
                        if child <= id || child >= self.nodes.len() {
                            return fail(format!("node {} has invalid child {}", id, child));
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Walk from the root to a leaf and return its class counts
    pub fn leaf_stats(&self, features: &[f64]) -> &[f64] {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Leaf { stats } => return stats,
                Node::Split { feature, threshold, left, right } => {
                    id = if features[*feature] <= *threshold { *left } else { *right };
                }
                Node::CategoricalSplit { feature, left_categories, left, right } => {
                    let value = features[*feature];
                    id = if left_categories.iter().any(|c| *c == value) { *left } else { *right };
                }
            }
        }
    }
}

/// On-disk form of the forest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestSpec {
    pub num_classes: usize,
    pub num_features: usize,
    pub layout_version: u8,
    pub feature_names: Vec<String>,
    pub trees: Vec<DecisionTree>,
}

/// Validated random forest
#[derive(Debug, Clone)]
pub struct RandomForest {
    spec: ForestSpec,
}

impl RandomForest {
    pub fn new(spec: ForestSpec) -> Result<Self, ArtifactError> {
        if spec.num_classes < 2 {
            return Err(ArtifactError::Incompatible(format!(
                "forest must have at least 2 classes, has {}",
                spec.num_classes
            )));
        }
        if spec.trees.is_empty() {
            return Err(ArtifactError::Incompatible("forest has no trees".to_string()));
        }
        for (tree_id, tree) in spec.trees.iter().enumerate() {
            tree.validate(tree_id, spec.num_features, spec.num_classes)?;
        }
        Ok(Self { spec })
    }

    /// Weighted sum of per-tree class distributions
    pub fn raw_votes(&self, features: &[f64]) -> Result<Vec<f64>, ScoringError> {
        if features.len() != self.spec.num_features {
            return Err(ScoringError::FeatureWidthMismatch {
                expected: self.spec.num_features,
                actual: features.len(),
            });
        }

        let mut votes = vec![0.0; self.spec.num_classes];
        for tree in &self.spec.trees {
            let stats = tree.leaf_stats(features);
            let total: f64 = stats.iter().sum();
            if total != 0.0 {
                for (vote, count) in votes.iter_mut().zip(stats) {
                    *vote += count / total * tree.weight;
                }
            }
        }
        Ok(votes)
    }

    pub fn predict(&self, features: &[f64]) -> Result<Prediction, ScoringError> {
        let votes = self.raw_votes(features)?;
        let prediction = argmax(&votes);

        let sum: f64 = votes.iter().sum();
        if sum.is_nan() || sum <= 0.0 {
            return Err(ScoringError::EmptyVote);
        }
        let probability = votes.iter().map(|v| v / sum).collect();

        Ok(Prediction { prediction, probability })
    }

    pub fn num_classes(&self) -> usize {
        self.spec.num_classes
    }

    pub fn num_features(&self) -> usize {
        self.spec.num_features
    }

    pub fn num_trees(&self) -> usize {
        self.spec.trees.len()
    }

    pub fn spec(&self) -> &ForestSpec {
        &self.spec
    }
}

/// Index of the first maximum
fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v > values[best] {
            best = i;
        }
    }
    best
}
