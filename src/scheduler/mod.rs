//! Pending-request queue and the single insertion point into it
//!
//! This module handles:
//! - The `Queue` contract the engine drives (enqueue, batch dequeue, emptiness)
//! - FIFO and LIFO in-memory queues
//! - `Scheduler`, the handle through which every request enters a queue

mod queue;

pub use queue::{FifoQueue, LifoQueue};

use crate::http::Request;
use crate::stats::{StatsSink, SCHEDULER_ENQUEUED};

/// Storage for requests that have not been handed to a batch yet
///
/// Every enqueued request must eventually come back out of `dequeue_batch`.
/// Ordering and deduplication are up to the implementation.
pub trait Queue: Send {
    /// Adds a request to the pending set
    fn enqueue(&mut self, request: Request);

    /// Removes and returns up to `max_count` requests
    fn dequeue_batch(&mut self, max_count: usize) -> Vec<Request>;

    /// Whether no request is pending
    fn is_empty(&self) -> bool;

    /// Number of pending requests
    fn len(&self) -> usize;
}

impl<Q: Queue + ?Sized> Queue for Box<Q> {
    fn enqueue(&mut self, request: Request) {
        (**self).enqueue(request)
    }

    fn dequeue_batch(&mut self, max_count: usize) -> Vec<Request> {
        (**self).dequeue_batch(max_count)
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

/// Scheduling handle passed to spider handlers
///
/// Counts every request under `scheduler/enqueued` before it enters the queue.
pub struct Scheduler<'a> {
    queue: &'a mut dyn Queue,
    stats: &'a dyn StatsSink,
}

impl<'a> Scheduler<'a> {
    pub fn new(queue: &'a mut dyn Queue, stats: &'a dyn StatsSink) -> Self {
        Self { queue, stats }
    }

    /// Schedules a request for a later batch
    pub fn schedule(&mut self, request: Request) {
        tracing::trace!("Scheduling {} {}", request.method(), request.url());
        self.stats.increment(SCHEDULER_ENQUEUED);
        self.queue.enqueue(request);
    }

    /// Schedules every request of `requests`, consuming the sequence fully
    pub fn schedule_all<I>(&mut self, requests: I) -> usize
    where
        I: IntoIterator<Item = Request>,
    {
        let mut count = 0;
        for request in requests {
            self.schedule(request);
            count += 1;
        }
        count
    }

    /// Number of requests waiting in the queue
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatsCollector;

    #[test]
    fn test_schedule_counts_and_enqueues() {
        let stats = StatsCollector::new();
        let mut queue = FifoQueue::new();

        {
            let mut scheduler = Scheduler::new(&mut queue, &stats);
            scheduler.schedule(Request::get("https://example.com/a").unwrap());
            assert_eq!(scheduler.pending(), 1);
        }

        assert_eq!(queue.len(), 1);
        assert_eq!(stats.get(SCHEDULER_ENQUEUED), 1);
    }

    #[test]
    fn test_schedule_all_drains_sequence() {
        let stats = StatsCollector::new();
        let mut queue = FifoQueue::new();
        let requests = (0..5).map(|i| Request::get(&format!("https://example.com/{}", i)).unwrap());

        let count = Scheduler::new(&mut queue, &stats).schedule_all(requests);

        assert_eq!(count, 5);
        assert_eq!(queue.len(), 5);
        assert_eq!(stats.get(SCHEDULER_ENQUEUED), 5);
    }

    #[test]
    fn test_boxed_queue_forwards() {
        let mut queue: Box<dyn Queue> = Box::new(LifoQueue::new());
        queue.enqueue(Request::get("https://example.com/a").unwrap());

        assert!(!queue.is_empty());
        assert_eq!(queue.dequeue_batch(1).len(), 1);
        assert!(queue.is_empty());
    }
}
