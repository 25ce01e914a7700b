//! Configuration module for Ripple-Engine
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use ripple_engine::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("engine.toml")).unwrap();
//! println!("Batches hold up to {} requests", config.engine.concurrent_requests);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, DownloaderConfig, EngineConfig, SchedulerConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};

pub use validation::{DownloaderKind, SchedulerKind};
