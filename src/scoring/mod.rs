//! Scoring Module - fitted transforms and the forest classifier
//!
//! The transaction type goes through the string indexer and the one-hot
//! encoder, the numeric columns are appended in layout order, and the
//! forest turns the vector into a class and a probability vector.

pub mod artifacts;
pub mod encoder;
pub mod engine;
pub mod forest;
pub mod indexer;

pub use artifacts::{ArtifactPaths, ModelArtifacts};
pub use encoder::{EncoderSpec, OneHotEncoder};
pub use engine::{EngineStatus, ScoringEngine};
pub use forest::{DecisionTree, ForestSpec, Node, RandomForest};
pub use indexer::{HandleInvalid, IndexerSpec, StringIndexer};

/// Demo artifacts shipped in the repository
#[cfg(test)]
pub(crate) fn bundled_artifact_dir() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("models")
}
