//! Concurrent monotonic counters with shadow copies for delta snapshots.
//!
//! Every family maps a key to an `AtomicU64`. Increments of an existing key
//! only take the read lock, so ingestion never contends with other
//! ingestion on the hot path. The shadow map remembers what the previous
//! snapshot saw; `current >= shadow` always holds because counters only grow.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};

use super::parser::AccessRecord;

/// One family of counters (hits by section, bytes by section, hits by status)
#[derive(Debug)]
pub struct CounterFamily<K> {
    current: RwLock<HashMap<K, AtomicU64>>,
    shadow: Mutex<HashMap<K, u64>>,
}

impl<K> CounterFamily<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            current: RwLock::new(HashMap::new()),
            shadow: Mutex::new(HashMap::new()),
        }
    }

    /// Add `n` to the counter for `key`, creating it on first observation.
    pub fn increment<Q>(&self, key: &Q, n: u64)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        if let Some(counter) = self.current.read().get(key) {
            counter.fetch_add(n, Ordering::Relaxed);
            return;
        }

        // Another writer may have inserted the key between the two locks
        self.current
            .write()
            .entry(key.to_owned())
            .or_insert_with(|| AtomicU64::new(0))
            .fetch_add(n, Ordering::Relaxed);
    }

    /// Current cumulative value for `key`
    pub fn get<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.current
            .read()
            .get(key)
            .map(|counter| counter.load(Ordering::Relaxed))
    }

    /// Sum of all current cumulative values. Does not touch the shadow map.
    pub fn total(&self) -> u64 {
        self.current
            .read()
            .values()
            .map(|counter| counter.load(Ordering::Relaxed))
            .sum()
    }

    /// Number of distinct keys observed so far
    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Compute `current - shadow` for every key and move the shadow forward.
    ///
    /// Each key's current value is loaded exactly once, so a concurrent
    /// increment lands either in this delta or the next one. Two snapshots
    /// of the same family are serialized by the shadow lock.
    pub fn snapshot_and_reset(&self) -> Vec<(K, u64)> {
        let current = self.current.read();
        let mut shadow = self.shadow.lock();

        current
            .iter()
            .map(|(key, counter)| {
                let now = counter.load(Ordering::Relaxed);
                let previous = shadow.insert(key.clone(), now).unwrap_or(0);
                (key.clone(), now.saturating_sub(previous))
            })
            .collect()
    }
}

impl<K> Default for CounterFamily<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// All counters shared between ingestion, the snapshot task and the alert task
#[derive(Debug, Default)]
pub struct CounterStore {
    pub hits: CounterFamily<String>,
    pub bytes: CounterFamily<String>,
    pub status: CounterFamily<u16>,
}

impl CounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_hits(&self, section: &str, n: u64) {
        self.hits.increment(section, n);
    }

    pub fn increment_bytes(&self, section: &str, n: u64) {
        self.bytes.increment(section, n);
    }

    pub fn increment_status(&self, code: u16, n: u64) {
        self.status.increment(&code, n);
    }

    /// Apply one parsed line to every family
    pub fn record(&self, record: &AccessRecord) {
        self.increment_hits(&record.section, 1);
        self.increment_bytes(&record.section, record.bytes);
        self.increment_status(record.status, 1);
    }
}
