//! Model artifact loading and cross-artifact compatibility checks

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::ArtifactError;
use crate::features::layout::{
    validate_feature_names, LayoutInfo, TYPE_COLUMN, TYPE_VECTOR_COLUMN,
};
use super::encoder::{EncoderSpec, OneHotEncoder};
use super::forest::{ForestSpec, RandomForest};
use super::indexer::{IndexerSpec, StringIndexer};

/// Where the three artifacts live
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub indexer: PathBuf,
    pub encoder: PathBuf,
}

impl ArtifactPaths {
    /// Standard file names inside one directory
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            model: dir.join("rf_model.json"),
            indexer: dir.join("type_indexer.json"),
            encoder: dir.join("type_encoder.json"),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.model_path.clone(),
            indexer: config.indexer_path.clone(),
            encoder: config.encoder_path.clone(),
        }
    }
}

/// The fitted classifier and its two categorical transforms
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub indexer: StringIndexer,
    pub encoder: OneHotEncoder,
    pub forest: RandomForest,
}

impl ModelArtifacts {
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        tracing::info!(
            model = %paths.model.display(),
            indexer = %paths.indexer.display(),
            encoder = %paths.encoder.display(),
            "Loading model artifacts"
        );

        let indexer = StringIndexer::new(read_json::<IndexerSpec>(&paths.indexer)?)?;
        let encoder = OneHotEncoder::new(read_json::<EncoderSpec>(&paths.encoder)?)?;
        let forest = RandomForest::new(read_json::<ForestSpec>(&paths.model)?)?;

        Self::from_parts(indexer, encoder, forest)
    }

    /// Assemble already-built parts, enforcing that they agree
    pub fn from_parts(
        indexer: StringIndexer,
        encoder: OneHotEncoder,
        forest: RandomForest,
    ) -> Result<Self, ArtifactError> {
        let indexer_in = &indexer.spec().input_col;
        if indexer_in != TYPE_COLUMN {
            return Err(ArtifactError::Incompatible(format!(
                "indexer reads '{}' but transactions carry '{}'",
                indexer_in, TYPE_COLUMN
            )));
        }

        let indexer_out = &indexer.spec().output_col;
        let encoder_in = &encoder.spec().input_col;
        if indexer_out != encoder_in {
            return Err(ArtifactError::Incompatible(format!(
                "indexer writes '{}' but encoder reads '{}'",
                indexer_out, encoder_in
            )));
        }

        let encoder_out = &encoder.spec().output_col;
        if encoder_out != TYPE_VECTOR_COLUMN {
            return Err(ArtifactError::Incompatible(format!(
                "encoder writes '{}' but the feature layout expects '{}'",
                encoder_out, TYPE_VECTOR_COLUMN
            )));
        }

        // A kept-invalid indexer may emit one index past its vocabulary;
        // the encoder must have been fitted on that extra category.
        let category_size = encoder.spec().category_size;
        let vocabulary = indexer.labels().len();
        if category_size != vocabulary && category_size != indexer.output_size() {
            return Err(ArtifactError::Incompatible(format!(
                "encoder was fitted on {} categories but the indexer knows {}",
                category_size, vocabulary
            )));
        }

        let spec = forest.spec();
        validate_feature_names(spec.layout_version, &spec.feature_names, encoder.width())
            .map_err(|e| ArtifactError::Incompatible(e.to_string()))?;

        let layout = LayoutInfo::for_type_width(encoder.width());
        if forest.num_features() != layout.feature_count {
            return Err(ArtifactError::Incompatible(format!(
                "model declares {} features but the layout has {}",
                forest.num_features(),
                layout.feature_count
            )));
        }

        tracing::info!(
            classes = forest.num_classes(),
            trees = forest.num_trees(),
            categories = vocabulary,
            features = layout.feature_count,
            layout_hash = format!("{:08x}", layout.hash),
            "Model artifacts loaded"
        );

        Ok(Self { indexer, encoder, forest })
    }

    pub fn layout(&self) -> LayoutInfo {
        LayoutInfo::for_type_width(self.encoder.width())
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let raw = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&raw).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
