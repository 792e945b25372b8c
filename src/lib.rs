//! Fraud Scoring API
//!
//! Serves a random-forest fraud classifier behind a web form.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      FRAUD SCORING API                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌────────────────────────────────────────┐ │
//! │  │  Web Front │   │  Scoring Engine                        │ │
//! │  │  (Axum)    │──▶│  indexer → one-hot → layout → forest   │ │
//! │  └────────────┘   └───────────────────┬────────────────────┘ │
//! │                                       ▼                      │
//! │                    ┌─────────────────────────────────┐       │
//! │                    │ Model artifacts (JSON, startup) │       │
//! │                    └─────────────────────────────────┘       │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod analytics;
pub mod config;
pub mod error;
pub mod features;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod scoring;
pub mod views;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};

pub use error::{AppError, AppResult};
pub use scoring::ScoringEngine;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ScoringEngine>,
    pub config: config::Config,
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    // Web front
    let web_routes = Router::new()
        .route("/", get(handlers::form::show))
        .route("/predict", post(handlers::predict::form));

    // JSON API
    let api_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/model", get(handlers::model::summary))
        .route("/api/v1/predict", post(handlers::predict::json))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        );

    Router::new()
        .merge(web_routes)
        .merge(api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
