//! Engine construction from configuration selectors

use crate::config::{Config, DownloaderKind, SchedulerKind};
use crate::downloader::{Downloader, HttpDownloader};
use crate::engine::Engine;
use crate::scheduler::{FifoQueue, LifoQueue, Queue};
use crate::stats::StatsSink;
use crate::EngineError;
use std::sync::Arc;

/// Builds an engine from the queue and transport named in `config`
///
/// An unknown selector fails here, before any request is scheduled.
///
/// # Example
///
/// ```no_run
/// use ripple_engine::config::load_config;
/// use ripple_engine::{build_engine, StatsCollector};
/// use std::path::Path;
/// use std::sync::Arc;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("engine.toml"))?;
/// let engine = build_engine(&config, Arc::new(StatsCollector::new()))?;
/// assert_eq!(engine.pending(), 0);
/// # Ok(())
/// # }
/// ```
pub fn build_engine(
    config: &Config,
    stats: Arc<dyn StatsSink>,
) -> Result<Engine<Box<dyn Queue>, Box<dyn Downloader>>, EngineError> {
    let queue: Box<dyn Queue> = match config.scheduler.kind.parse::<SchedulerKind>()? {
        SchedulerKind::Fifo => Box::new(FifoQueue::new()),
        SchedulerKind::Lifo => Box::new(LifoQueue::new()),
    };

    let downloader: Box<dyn Downloader> = match config.downloader.kind.parse::<DownloaderKind>()? {
        DownloaderKind::Http => Box::new(HttpDownloader::new(&config.downloader, config.engine.debug)?),
    };

    tracing::debug!(
        "Built engine with scheduler '{}' and downloader '{}'",
        config.scheduler.kind,
        config.downloader.kind
    );

    Ok(Engine::new(
        queue,
        downloader,
        stats,
        config.engine.concurrent_requests as usize,
    ))
}
