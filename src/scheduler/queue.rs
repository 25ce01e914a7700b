//! In-memory queue implementations

use crate::http::Request;
use crate::scheduler::Queue;
use std::collections::VecDeque;

/// Breadth-first queue: requests leave in the order they were enqueued
#[derive(Debug, Default)]
pub struct FifoQueue {
    pending: VecDeque<Request>,
}

impl FifoQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Queue for FifoQueue {
    fn enqueue(&mut self, request: Request) {
        tracing::trace!("FIFO enqueue: {}", request.url());
        self.pending.push_back(request);
    }

    fn dequeue_batch(&mut self, max_count: usize) -> Vec<Request> {
        let count = max_count.min(self.pending.len());
        self.pending.drain(..count).collect()
    }

    fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn len(&self) -> usize {
        self.pending.len()
    }
}

/// Depth-first queue: the most recently enqueued request leaves first
#[derive(Debug, Default)]
pub struct LifoQueue {
    pending: Vec<Request>,
}

impl LifoQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Queue for LifoQueue {
    fn enqueue(&mut self, request: Request) {
        tracing::trace!("LIFO enqueue: {}", request.url());
        self.pending.push(request);
    }

    fn dequeue_batch(&mut self, max_count: usize) -> Vec<Request> {
        let count = max_count.min(self.pending.len());
        let split = self.pending.len() - count;
        let mut batch = self.pending.split_off(split);
        batch.reverse();
        batch
    }

    fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    fn len(&self) -> usize {
        self.pending.len()
    }
}
