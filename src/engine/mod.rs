//! Crawl engine - the batch drive loop
//!
//! The engine owns one queue and one downloader and runs a single driver:
//! 1. Schedule the spider's seed requests
//! 2. While the queue is not empty:
//!    a. Pull up to `concurrent_requests` requests
//!    b. Download the batch and wait for every request to resolve
//!    c. Dispatch each outcome, draining follow-ups into the queue
//! 3. Call the spider's completion hook
//!
//! A batch is fully resolved and dispatched before the next one is pulled, so
//! one slow request holds back the start of the following batch.

mod builder;
mod dispatcher;

pub use builder::build_engine;
pub use dispatcher::{Dispatched, Dispatcher};

use crate::downloader::Downloader;
use crate::http::Request;
use crate::scheduler::{Queue, Scheduler};
use crate::spider::{HandlerRegistry, Spider};
use crate::stats::{StatsSink, DOWNLOADER_REQUEST_COUNT, SCHEDULER_DEQUEUED};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Per-batch tallies, used for progress logging
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Requests pulled into the batch
    pub size: usize,
    pub succeeded: usize,
    pub download_failures: usize,
    pub handler_failures: usize,
    /// Requests scheduled while dispatching this batch
    pub follow_ups: usize,
}

/// Totals for one `open_spider` run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub batches: usize,
    pub requests: usize,
    pub elapsed: Duration,
}

/// Batch-driven crawl engine
///
/// The queue, downloader and stats sink are injected; see [`build_engine`]
/// for construction from a configuration file.
pub struct Engine<Q, D> {
    queue: Q,
    downloader: D,
    stats: Arc<dyn StatsSink>,
    concurrent_requests: usize,
}

impl<Q: Queue, D: Downloader> Engine<Q, D> {
    /// Creates an engine; `concurrent_requests` is raised to at least 1
    pub fn new(queue: Q, downloader: D, stats: Arc<dyn StatsSink>, concurrent_requests: usize) -> Self {
        Self {
            queue,
            downloader,
            stats,
            concurrent_requests: concurrent_requests.max(1),
        }
    }

    /// Shared stats sink of this run
    pub fn stats(&self) -> Arc<dyn StatsSink> {
        Arc::clone(&self.stats)
    }

    pub fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }

    /// Number of requests waiting in the queue
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Schedules a request; it runs in a later batch
    pub fn schedule(&mut self, request: Request) {
        self.scheduler().schedule(request);
    }

    /// Runs a spider until the queue is empty and every batch has resolved
    ///
    /// Seeds are scheduled first, then batches run back to back. The spider's
    /// `finish` hook is called exactly once, after the last batch.
    pub async fn open_spider<S: Spider>(&mut self, spider: &mut S) -> RunSummary {
        let start_time = Instant::now();
        let handlers = spider.handlers();

        tracing::info!(
            "Opening spider '{}' (concurrent_requests={}, named handlers={})",
            spider.name(),
            self.concurrent_requests,
            handlers.len()
        );

        let seeded = self.scheduler().schedule_all(spider.start_requests());
        tracing::info!("Scheduled {} seed requests", seeded);

        let mut summary = RunSummary::default();
        while !self.queue.is_empty() {
            let report = self.next_batch(spider, &handlers).await;
            summary.batches += 1;
            summary.requests += report.size;

            tracing::debug!(
                "Batch {}: {} requests ({} ok, {} failed, {} handler errors), {} follow-ups, {} pending",
                summary.batches,
                report.size,
                report.succeeded,
                report.download_failures,
                report.handler_failures,
                report.follow_ups,
                self.queue.len()
            );
        }

        spider.finish();
        summary.elapsed = start_time.elapsed();

        tracing::info!(
            "Spider '{}' finished: {} requests in {} batches ({:?})",
            spider.name(),
            summary.requests,
            summary.batches,
            summary.elapsed
        );

        summary
    }

    /// Runs one drive iteration: pull, download, dispatch
    async fn next_batch<S: Spider>(&mut self, spider: &mut S, handlers: &HandlerRegistry<S>) -> BatchReport {
        let batch = self.queue.dequeue_batch(self.concurrent_requests);
        let mut report = BatchReport {
            size: batch.len(),
            ..BatchReport::default()
        };

        for request in &batch {
            tracing::trace!("Dequeued {} {}", request.method(), request.url());
            self.stats.increment(SCHEDULER_DEQUEUED);
            self.stats.increment(DOWNLOADER_REQUEST_COUNT);
        }

        let outcomes = self
            .downloader
            .download_batch(batch, self.concurrent_requests)
            .await;

        let dispatcher = Dispatcher::new(handlers, self.stats.as_ref());
        let mut scheduler = Scheduler::new(&mut self.queue, self.stats.as_ref());
        for outcome in outcomes {
            match dispatcher.dispatch(spider, outcome, &mut scheduler) {
                Dispatched::Handled { follow_ups } => {
                    report.succeeded += 1;
                    report.follow_ups += follow_ups;
                }
                Dispatched::HandlerFailed => {
                    report.succeeded += 1;
                    report.handler_failures += 1;
                }
                Dispatched::DownloadFailed => report.download_failures += 1,
            }
        }

        report
    }

    fn scheduler(&mut self) -> Scheduler<'_> {
        Scheduler::new(&mut self.queue, self.stats.as_ref())
    }
}
