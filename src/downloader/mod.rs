//! Transport layer: executes batches of requests with bounded concurrency
//!
//! This module contains:
//! - The `Downloader` trait the engine submits batches to
//! - `download_concurrently`, the bounded fan-out shared by implementations
//! - `HttpDownloader`, the reqwest-backed transport

mod http;

pub use http::{build_http_client, HttpDownloader};

use crate::http::{Failure, Request, Response};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};

/// Terminal result of one request
#[derive(Debug, Clone)]
pub enum Outcome {
    Success(Response),
    Failure(Failure),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// A transport that turns requests into outcomes
///
/// Implementations report exactly one outcome per request. Retries, redirects
/// and middleware are internal to the implementation.
#[async_trait]
pub trait Downloader: Send + Sync {
    /// Downloads a single request
    async fn fetch(&self, request: Request) -> Outcome;

    /// Downloads a whole batch, keeping at most `concurrency` requests in flight
    ///
    /// Returns once every request has resolved. Outcomes are in batch order.
    async fn download_batch(&self, batch: Vec<Request>, concurrency: usize) -> Vec<Outcome> {
        download_concurrently(self, batch, concurrency).await
    }
}

#[async_trait]
impl<D: Downloader + ?Sized> Downloader for Box<D> {
    async fn fetch(&self, request: Request) -> Outcome {
        (**self).fetch(request).await
    }

    async fn download_batch(&self, batch: Vec<Request>, concurrency: usize) -> Vec<Outcome> {
        (**self).download_batch(batch, concurrency).await
    }
}

/// Runs `fetch` over a batch with at most `concurrency` futures polled at once
pub async fn download_concurrently<D>(
    downloader: &D,
    batch: Vec<Request>,
    concurrency: usize,
) -> Vec<Outcome>
where
    D: Downloader + ?Sized,
{
    stream::iter(batch)
        .map(|request| downloader.fetch(request))
        .buffered(concurrency.max(1))
        .collect()
        .await
}
