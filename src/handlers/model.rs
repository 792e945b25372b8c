//! Model summary handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::features::LayoutInfo;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ModelSummary {
    pub classes: usize,
    pub trees: usize,
    pub categories: Vec<String>,
    pub layout: LayoutInfo,
}

/// Describe the loaded artifacts
pub async fn summary(State(state): State<AppState>) -> Json<ModelSummary> {
    let artifacts = state.engine.artifacts();
    Json(ModelSummary {
        classes: artifacts.forest.num_classes(),
        trees: artifacts.forest.num_trees(),
        categories: artifacts.indexer.labels().to_vec(),
        layout: artifacts.layout(),
    })
}
