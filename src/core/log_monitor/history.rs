use std::collections::VecDeque;

use super::snapshot::MetricsSnapshot;

const DEFAULT_HISTORY_SIZE: usize = 60;

/// Circular buffer of per-window totals (for sparklines)
#[derive(Debug, Clone)]
pub struct TrafficHistory {
    capacity: usize,
    pub hits: VecDeque<u64>,
    pub bytes: VecDeque<u64>,
}

impl TrafficHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            hits: VecDeque::with_capacity(capacity),
            bytes: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, snapshot: &MetricsSnapshot) {
        let capacity = self.capacity;
        Self::push_value(&mut self.hits, snapshot.total_hits, capacity);
        Self::push_value(&mut self.bytes, snapshot.total_bytes, capacity);
    }

    fn push_value<T>(queue: &mut VecDeque<T>, value: T, capacity: usize) {
        if queue.len() >= capacity {
            queue.pop_front();
        }
        queue.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Contiguous copy for the sparkline widget, oldest first
    pub fn hits_as_vec(&self) -> Vec<u64> {
        self.hits.iter().copied().collect()
    }

    pub fn bytes_as_vec(&self) -> Vec<u64> {
        self.bytes.iter().copied().collect()
    }
}

impl Default for TrafficHistory {
    fn default() -> Self {
        Self::new()
    }
}
