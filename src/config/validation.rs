use crate::config::types::{Config, DownloaderConfig, EngineConfig, SchedulerConfig};
use crate::ConfigError;
use std::str::FromStr;
use url::Url;

/// Transport implementations selectable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloaderKind {
    /// reqwest-backed HTTP transport
    Http,
}

impl FromStr for DownloaderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" | "reqwest" => Ok(Self::Http),
            _ => Err(ConfigError::UnknownDownloader(s.to_string())),
        }
    }
}

/// Queue implementations selectable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerKind {
    /// First in, first out (breadth-first)
    Fifo,
    /// Last in, first out (depth-first)
    Lifo,
}

impl FromStr for SchedulerKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fifo" | "memory" => Ok(Self::Fifo),
            "lifo" => Ok(Self::Lifo),
            _ => Err(ConfigError::UnknownScheduler(s.to_string())),
        }
    }
}

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_engine_config(&config.engine)?;
    validate_downloader_config(&config.downloader)?;
    validate_scheduler_config(&config.scheduler)?;
    validate_seeds(&config.seeds)?;
    Ok(())
}

fn validate_engine_config(config: &EngineConfig) -> Result<(), ConfigError> {
    if config.concurrent_requests < 1 || config.concurrent_requests > 1000 {
        return Err(ConfigError::Validation(format!(
            "concurrent_requests must be between 1 and 1000, got {}",
            config.concurrent_requests
        )));
    }

    Ok(())
}

fn validate_downloader_config(config: &DownloaderConfig) -> Result<(), ConfigError> {
    config.kind.parse::<DownloaderKind>()?;

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be greater than 0".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_scheduler_config(config: &SchedulerConfig) -> Result<(), ConfigError> {
    config.kind.parse::<SchedulerKind>()?;
    Ok(())
}

/// Seeds must be absolute http(s) URLs
fn validate_seeds(seeds: &[String]) -> Result<(), ConfigError> {
    for seed in seeds {
        let url = Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Seed URL '{}' must use the http or https scheme",
                seed
            )));
        }
    }

    Ok(())
}
