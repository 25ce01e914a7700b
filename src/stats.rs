//! Crawl counters
//!
//! The engine only ever increments counters, through the [`StatsSink`] trait.
//! [`StatsCollector`] is the in-memory sink created once per run; it also
//! offers the read path used for end-of-run reporting.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

/// Incremented once per scheduled request
pub const SCHEDULER_ENQUEUED: &str = "scheduler/enqueued";

/// Incremented once per request pulled into a batch
pub const SCHEDULER_DEQUEUED: &str = "scheduler/dequeued";

/// Incremented once per request submitted to the downloader
pub const DOWNLOADER_REQUEST_COUNT: &str = "downloader/request_count";

/// Incremented once per handler error
pub const SPIDER_HANDLER_ERRORS: &str = "spider/handler_errors";

/// Key counting responses (or failures) with the given status or error code
pub fn response_status_key(code: impl std::fmt::Display) -> String {
    format!("downloader/response_status_count/{}", code)
}

/// Write side of the stats store
pub trait StatsSink: Send + Sync {
    /// Adds one to the counter under `key`, creating it at zero if absent
    fn increment(&self, key: &str);
}

/// In-memory counter store
#[derive(Debug, Default)]
pub struct StatsCollector {
    counters: Mutex<HashMap<String, u64>>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a counter (zero if it was never incremented)
    pub fn get(&self, key: &str) -> u64 {
        self.lock().get(key).copied().unwrap_or(0)
    }

    /// Sorted copy of all counters
    pub fn snapshot(&self) -> BTreeMap<String, u64> {
        self.lock()
            .iter()
            .map(|(key, value)| (key.clone(), *value))
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, u64>> {
        // Counters stay valid even if a holder panicked mid-increment.
        self.counters
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StatsSink for StatsCollector {
    fn increment(&self, key: &str) {
        let mut counters = self.lock();
        match counters.get_mut(key) {
            Some(value) => *value += 1,
            None => {
                counters.insert(key.to_string(), 1);
            }
        }
    }
}

/// Prints counters to stdout in a formatted manner
pub fn print_statistics(stats: &StatsCollector) {
    let snapshot = stats.snapshot();

    println!("=== Crawl Statistics ===\n");

    if snapshot.is_empty() {
        println!("  (no counters recorded)");
        return;
    }

    let width = snapshot.keys().map(String::len).max().unwrap_or(0);
    for (key, value) in &snapshot {
        println!("  {:<width$}  {}", key, value, width = width);
    }
    println!();

    let enqueued = stats.get(SCHEDULER_ENQUEUED);
    let successes: u64 = snapshot
        .iter()
        .filter(|(key, _)| key.starts_with("downloader/response_status_count/2"))
        .map(|(_, value)| value)
        .sum();
    let success_rate = if enqueued > 0 {
        (successes as f64 / enqueued as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} requests answered with 2xx)",
        success_rate, successes, enqueued
    );
}
