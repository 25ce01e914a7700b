//! Routes each download outcome to its handler
//!
//! Successes go to the handler named on the response (or the spider's
//! `parse`), and the follow-ups it returns are drained into the scheduler
//! before dispatch returns. Failures are counted and logged; they are never
//! retried or re-enqueued.

use crate::downloader::Outcome;
use crate::http::{Failure, Response};
use crate::scheduler::Scheduler;
use crate::spider::{Handler, HandlerRegistry, Spider};
use crate::stats::{response_status_key, StatsSink, SPIDER_HANDLER_ERRORS};
use crate::HandlerError;

/// What happened to one outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    /// A handler ran and its follow-ups were scheduled
    Handled { follow_ups: usize },
    /// The handler could not be resolved or returned an error
    HandlerFailed,
    /// The download itself failed
    DownloadFailed,
}

pub struct Dispatcher<'a, S> {
    handlers: &'a HandlerRegistry<S>,
    stats: &'a dyn StatsSink,
}

impl<'a, S: Spider> Dispatcher<'a, S> {
    pub fn new(handlers: &'a HandlerRegistry<S>, stats: &'a dyn StatsSink) -> Self {
        Self { handlers, stats }
    }

    pub fn dispatch(
        &self,
        spider: &mut S,
        outcome: Outcome,
        scheduler: &mut Scheduler<'_>,
    ) -> Dispatched {
        match outcome {
            Outcome::Success(response) => self.on_success(spider, response, scheduler),
            Outcome::Failure(failure) => self.on_failure(failure),
        }
    }

    fn on_success(
        &self,
        spider: &mut S,
        response: Response,
        scheduler: &mut Scheduler<'_>,
    ) -> Dispatched {
        self.stats
            .increment(&response_status_key(response.status().as_u16()));

        let url = response.url().clone();
        let handler_name = response.handler().unwrap_or("parse").to_string();

        let result = match self.resolve(response.handler()) {
            Ok(handler) => handler(spider, response, scheduler),
            Err(e) => Err(e),
        };

        match result {
            Ok(follow_ups) => {
                let follow_ups = scheduler.schedule_all(follow_ups);
                tracing::trace!(
                    "Handler '{}' for {} scheduled {} follow-ups",
                    handler_name,
                    url,
                    follow_ups
                );
                Dispatched::Handled { follow_ups }
            }
            Err(e) => {
                tracing::warn!("Handler '{}' failed for {}: {}", handler_name, url, e);
                self.stats.increment(SPIDER_HANDLER_ERRORS);
                Dispatched::HandlerFailed
            }
        }
    }

    fn on_failure(&self, failure: Failure) -> Dispatched {
        self.stats
            .increment(&response_status_key(failure.code()));
        tracing::warn!("Download failed: {}", failure);
        Dispatched::DownloadFailed
    }

    fn resolve(&self, name: Option<&str>) -> Result<Handler<S>, HandlerError> {
        match name {
            None => Ok(S::parse as Handler<S>),
            Some(name) => self
                .handlers
                .get(name)
                .ok_or_else(|| HandlerError::UnknownHandler(name.to_string())),
        }
    }
}
