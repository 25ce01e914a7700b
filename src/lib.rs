//! Ripple-Engine: a batch-driven crawl engine
//!
//! This crate implements the execution core of a web crawler: a single driver
//! pulls bounded batches of requests from a queue, downloads each batch
//! concurrently, dispatches every response or failure to a spider handler, and
//! feeds follow-up requests back into the queue until no work remains.

pub mod config;
pub mod downloader;
pub mod engine;
pub mod http;
pub mod scheduler;
pub mod spider;
pub mod stats;

use thiserror::Error;

/// Main error type for Ripple-Engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Unknown downloader implementation: {0}")]
    UnknownDownloader(String),

    #[error("Unknown scheduler implementation: {0}")]
    UnknownScheduler(String),
}

/// Errors raised by spider handlers while processing a response
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("No handler registered under '{0}'")]
    UnknownHandler(String),

    #[error("Invalid follow-up URL: {0}")]
    InvalidUrl(#[from] ::url::ParseError),

    #[error("Handler '{handler}' failed: {message}")]
    Failed { handler: String, message: String },
}

impl HandlerError {
    /// Convenience constructor for handler code reporting its own failure
    pub fn failed(handler: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            handler: handler.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for Ripple-Engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use downloader::{Downloader, HttpDownloader, Outcome};
pub use engine::{build_engine, Engine};
pub use http::{Context, Failure, FailureCode, Request, Response};
pub use scheduler::{FifoQueue, LifoQueue, Queue, Scheduler};
pub use spider::{FollowUps, HandlerRegistry, HandlerResult, Spider};
pub use stats::{StatsCollector, StatsSink};
