//! Bounded event streams between the periodic tasks and their consumers.
//!
//! Each stream is a tokio broadcast channel. Publishing never waits: when a
//! consumer falls behind by more than the capacity, the oldest events are
//! overwritten and the consumer is told how many it missed.

use tokio::sync::broadcast::{
    self,
    error::{RecvError, TryRecvError},
};

use crate::error::{LogmonError, Result};

/// Default number of unread events kept per consumer
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Create a bounded drop-oldest stream named `name` (used in log messages).
///
/// The channel rounds `capacity` up to the next power of two.
pub fn event_stream<T: Clone>(
    name: &'static str,
    capacity: usize,
) -> (EventSender<T>, EventReceiver<T>) {
    let (tx, rx) = broadcast::channel(capacity.max(1));
    (
        EventSender { tx, name },
        EventReceiver {
            rx,
            name,
            dropped: 0,
        },
    )
}

/// Producer half of an event stream
#[derive(Debug, Clone)]
pub struct EventSender<T> {
    tx: broadcast::Sender<T>,
    name: &'static str,
}

impl<T: Clone> EventSender<T> {
    /// Publish without waiting. Returns the number of consumers reached.
    ///
    /// Fails only when nobody is subscribed; the event is discarded and the
    /// caller is free to keep publishing later.
    pub fn publish(&self, event: T) -> Result<usize> {
        self.tx
            .send(event)
            .map_err(|_| LogmonError::publish(format!("no active consumer on {} stream", self.name)))
    }

    /// Attach another consumer; it only sees events published from now on.
    pub fn subscribe(&self) -> EventReceiver<T> {
        EventReceiver {
            rx: self.tx.subscribe(),
            name: self.name,
            dropped: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Consumer half of an event stream
#[derive(Debug)]
pub struct EventReceiver<T> {
    rx: broadcast::Receiver<T>,
    name: &'static str,
    dropped: u64,
}

impl<T: Clone> EventReceiver<T> {
    /// Wait for the next event. `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<T> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(missed)) => self.record_lag(missed),
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next event if one is ready.
    pub fn try_recv(&mut self) -> Option<T> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(missed)) => self.record_lag(missed),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    /// Take every event that is ready right now, oldest first.
    pub fn drain(&mut self) -> Vec<T> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }

    /// Events overwritten before this consumer could read them
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    fn record_lag(&mut self, missed: u64) {
        self.dropped += missed;
        log::warn!(
            "{} consumer fell behind, {} event(s) dropped ({} total)",
            self.name,
            missed,
            self.dropped
        );
    }
}
