//! Error handling

use std::path::PathBuf;

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// A single form field that could not be turned into a typed value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("missing field '{field}'")]
    Missing { field: &'static str },

    #[error("invalid value '{value}' for field '{field}': {reason}")]
    Invalid {
        field: &'static str,
        value: String,
        reason: String,
    },
}

impl FieldError {
    pub fn field(&self) -> &'static str {
        match self {
            FieldError::Missing { field } | FieldError::Invalid { field, .. } => field,
        }
    }
}

/// Failures inside the scoring pipeline (index → encode → assemble → infer)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("unsupported transaction type '{0}'")]
    UnsupportedCategory(String),

    #[error("category index {index} is out of range for an encoder of size {size}")]
    CategoryOutOfRange { index: usize, size: usize },

    #[error("feature vector has {actual} values, model expects {expected}")]
    FeatureWidthMismatch { expected: usize, actual: usize },

    #[error("forest produced an all-zero vote vector")]
    EmptyVote,
}

/// Startup failures while loading model artifacts
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read artifact {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse artifact {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("incompatible artifacts: {0}")]
    Incompatible(String),
}

/// Request-boundary error
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("malformed request body: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Field(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Scoring(ScoringError::UnsupportedCategory(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Scoring(_) | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn chain(&self) -> String {
        error_chain(self)
    }
}

/// Render an error with every `source()` below it, outermost first.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = if status.is_server_error() {
            tracing::error!(error = %self.chain(), "Request processing failed");
            "Internal server error".to_string()
        } else {
            tracing::warn!(error = %self.chain(), "Request rejected");
            self.to_string()
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let missing = AppError::from(FieldError::Missing { field: "amount" });
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

        let bogus = AppError::from(ScoringError::UnsupportedCategory("BOGUS".into()));
        assert_eq!(bogus.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let empty = AppError::from(ScoringError::EmptyVote);
        assert_eq!(empty.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_messages() {
        let err = FieldError::Invalid {
            field: "step",
            value: "abc".into(),
            reason: "expected an integer".into(),
        };
        assert_eq!(err.field(), "step");
        assert_eq!(
            err.to_string(),
            "invalid value 'abc' for field 'step': expected an integer"
        );
        assert_eq!(
            ScoringError::UnsupportedCategory("BOGUS".into()).to_string(),
            "unsupported transaction type 'BOGUS'"
        );
    }

    #[test]
    fn test_chain_includes_sources() {
        let err = ArtifactError::Io {
            path: PathBuf::from("models/rf_model.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert_eq!(
            error_chain(&err),
            "failed to read artifact models/rf_model.json: no such file"
        );
    }
}
