//! HTTP transport built on reqwest
//!
//! This module handles:
//! - Building the shared HTTP client (user agent, timeouts, cookies, compression)
//! - Sending each request with its method and headers
//! - Classifying responses and transport errors into outcomes

use crate::config::DownloaderConfig;
use crate::downloader::{Downloader, Outcome};
use crate::http::{Failure, FailureCode, Request, Response};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The transport configuration
/// * `debug` - Enables verbose connection logging
///
/// # Example
///
/// ```no_run
/// use ripple_engine::config::DownloaderConfig;
/// use ripple_engine::downloader::build_http_client;
///
/// let client = build_http_client(&DownloaderConfig::default(), false).unwrap();
/// ```
pub fn build_http_client(config: &DownloaderConfig, debug: bool) -> Result<Client, reqwest::Error> {
    let timeout = Duration::from_secs(config.timeout_secs);

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .cookie_store(config.cookies)
        .connection_verbose(debug)
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed `Downloader`
#[derive(Debug, Clone)]
pub struct HttpDownloader {
    client: Client,
    http_errors: bool,
}

impl HttpDownloader {
    /// Creates a downloader with a client built from `config`
    pub fn new(config: &DownloaderConfig, debug: bool) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config, debug)?, config.http_errors))
    }

    /// Wraps an existing client
    ///
    /// With `http_errors` set, 4xx and 5xx responses are reported as failures
    /// whose code is the HTTP status.
    pub fn with_client(client: Client, http_errors: bool) -> Self {
        Self {
            client,
            http_errors,
        }
    }
}

#[async_trait]
impl Downloader for HttpDownloader {
    async fn fetch(&self, request: Request) -> Outcome {
        tracing::trace!("Fetching {} {}", request.method(), request.url());

        let sent = self
            .client
            .request(request.method().clone(), request.url().clone())
            .headers(request.headers().clone())
            .send()
            .await;

        let response = match sent {
            Ok(response) => response,
            Err(e) => return Outcome::Failure(Failure::from_reqwest(&request, &e)),
        };

        let status = response.status();
        if self.http_errors && (status.is_client_error() || status.is_server_error()) {
            let reason = status.canonical_reason().unwrap_or("HTTP error");
            return Outcome::Failure(Failure::new(
                &request,
                FailureCode::Status(status.as_u16()),
                format!("HTTP {} {}", status.as_u16(), reason),
            ));
        }

        let headers = response.headers().clone();
        match response.bytes().await {
            Ok(body) => Outcome::Success(Response::new(&request, status, headers, body.to_vec())),
            Err(e) => Outcome::Failure(Failure::from_reqwest(&request, &e)),
        }
    }
}
