//! Configuration module

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: IpAddr,

    /// Server port
    pub port: u16,

    /// Forest classifier artifact
    pub model_path: PathBuf,

    /// Categorical index map artifact
    pub indexer_path: PathBuf,

    /// One-hot encoding table artifact
    pub encoder_path: PathBuf,

    /// Log output format
    pub log_format: LogFormat,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let model_dir = PathBuf::from(lookup("MODEL_DIR").unwrap_or_else(|| "models".to_string()));
        let artifact = |key: &str, file: &str| {
            lookup(key)
                .map(PathBuf::from)
                .unwrap_or_else(|| model_dir.join(file))
        };

        Self {
            host: lookup("HOST")
                .and_then(|h| h.parse().ok())
                .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),

            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),

            model_path: artifact("MODEL_PATH", "rf_model.json"),
            indexer_path: artifact("INDEXER_PATH", "type_indexer.json"),
            encoder_path: artifact("ENCODER_PATH", "type_encoder.json"),

            log_format: lookup("LOG_FORMAT")
                .map(|f| LogFormat::parse(&f))
                .unwrap_or(LogFormat::Pretty),

            environment: lookup("ENVIRONMENT")
                .unwrap_or_else(|| "development".to_string()),
        }
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
