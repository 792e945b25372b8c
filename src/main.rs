//! Fraud Scoring API Server
//!
//! Loads the model artifacts once, then serves the form and the scoring
//! endpoints until the process is stopped.

use std::sync::Arc;

use anyhow::Context;
use fraud_scoring_api::{
    config::Config,
    create_router, logging,
    scoring::{ArtifactPaths, ScoringEngine},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize logging (stderr)
    logging::init(config.log_format);

    tracing::info!(environment = %config.environment, "Fraud Scoring API starting...");

    // Load model artifacts; the server does not start without them
    let paths = ArtifactPaths::from_config(&config);
    let engine = ScoringEngine::load(&paths).context("Failed to load model artifacts")?;

    let state = AppState {
        engine: Arc::new(engine),
        config: config.clone(),
    };

    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
