use serde::Deserialize;

/// Main configuration structure for Ripple-Engine
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub engine: EngineConfig,
    #[serde(default)]
    pub downloader: DownloaderConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Seed URLs fetched by the command-line spider
    #[serde(default)]
    pub seeds: Vec<String>,
}

/// Drive loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Maximum number of requests in flight (and per batch)
    #[serde(rename = "concurrent-requests")]
    pub concurrent_requests: u32,

    /// Verbose engine and transport logging
    #[serde(default)]
    pub debug: bool,
}

/// Transport configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DownloaderConfig {
    /// Transport implementation selector
    #[serde(default = "default_downloader_kind")]
    pub kind: String,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Keep cookies across requests of one run
    #[serde(default = "default_true")]
    pub cookies: bool,

    /// Report 4xx/5xx responses as failures carrying the status code
    #[serde(rename = "http-errors", default = "default_true")]
    pub http_errors: bool,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            kind: default_downloader_kind(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            cookies: true,
            http_errors: true,
        }
    }
}

/// Queue configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Queue implementation selector
    #[serde(default = "default_scheduler_kind")]
    pub kind: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            kind: default_scheduler_kind(),
        }
    }
}

fn default_downloader_kind() -> String {
    "http".to_string()
}

fn default_scheduler_kind() -> String {
    "fifo".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("ripple-engine/{}", env!("CARGO_PKG_VERSION"))
}

fn default_true() -> bool {
    true
}
