/*!
 * Event Collector
 * Fans notifications out to every subscriber over bounded channels
 *
 * Publishing never blocks: a subscriber whose channel is full misses the
 * event (counted as dropped), a subscriber that went away is pruned.
 */

use crate::core::limits::SUBSCRIBER_CHANNEL_CAPACITY;
use crate::core::types::Tick;
use crate::memory::{BlocksSnapshot, MemoryBlock, MemoryChangeKind};
use crate::monitoring::events::{Event, EventFilter, Payload};
use crate::task::TaskItem;
use flume::{Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

/// Event statistics for monitoring the observer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub events_produced: u64,
    pub events_delivered: u64,
    pub events_dropped: u64,
    pub active_subscribers: usize,
}

/// Unified event collector
pub struct Collector {
    subscribers: Arc<Mutex<Vec<Sender<Event>>>>,
    capacity: usize,
    sequence: Arc<AtomicU64>,
    delivered: Arc<AtomicU64>,
    dropped: Arc<AtomicU64>,
}

impl Collector {
    /// Create a new collector
    pub fn new() -> Self {
        Self::with_capacity(SUBSCRIBER_CHANNEL_CAPACITY)
    }

    /// Collector whose subscribers buffer up to `capacity` events each
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
            capacity: capacity.max(1),
            sequence: Arc::new(AtomicU64::new(0)),
            delivered: Arc::new(AtomicU64::new(0)),
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Emit an event (primary API)
    pub fn emit(&self, event: Event) {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let event = event.with_sequence(sequence);
        trace!(sequence, category = ?event.category, "Emitting event");

        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|tx| match tx.try_send(event.clone()) {
            Ok(()) => {
                self.delivered.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
    }

    /// Subscribe to every event emitted from now on
    pub fn subscribe(&self) -> Subscriber {
        let (tx, rx) = flume::bounded(self.capacity);
        self.subscribers.lock().push(tx);
        Subscriber {
            rx,
            local_consumed: 0,
        }
    }

    /// Get stream statistics
    pub fn stats(&self) -> StreamStats {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|tx| !tx.is_disconnected());
        StreamStats {
            events_produced: self.sequence.load(Ordering::Relaxed),
            events_delivered: self.delivered.load(Ordering::Relaxed),
            events_dropped: self.dropped.load(Ordering::Relaxed),
            active_subscribers: subscribers.len(),
        }
    }
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Collector {
    fn clone(&self) -> Self {
        Self {
            subscribers: Arc::clone(&self.subscribers),
            capacity: self.capacity,
            sequence: Arc::clone(&self.sequence),
            delivered: Arc::clone(&self.delivered),
            dropped: Arc::clone(&self.dropped),
        }
    }
}

impl std::fmt::Debug for Collector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collector")
            .field("capacity", &self.capacity)
            .field("subscribers", &self.subscribers.lock().len())
            .finish()
    }
}

/// Convenience functions for common events
impl Collector {
    pub fn memory_changed(
        &self,
        kind: MemoryChangeKind,
        block: Option<MemoryBlock>,
        snapshot: BlocksSnapshot,
    ) {
        self.emit(Event::new(Payload::MemoryChanged {
            kind,
            block,
            snapshot,
        }));
    }

    pub fn task_started(&self, task: &TaskItem) {
        self.emit(Event::new(Payload::TaskStarted { task: task.clone() }));
    }

    pub fn task_finished(&self, task: &TaskItem) {
        self.emit(Event::new(Payload::TaskFinished { task: task.clone() }));
    }

    pub fn task_timed_out(&self, task: &TaskItem) {
        self.emit(Event::new(Payload::TaskTimedOut { task: task.clone() }));
    }

    pub fn tick_advanced(&self, tick: Tick) {
        self.emit(Event::new(Payload::TickAdvanced { tick }));
    }
}

/// Event stream subscriber handle
pub struct Subscriber {
    rx: Receiver<Event>,
    local_consumed: u64,
}

impl Subscriber {
    /// Take the next buffered event without waiting
    #[inline]
    pub fn try_next(&mut self) -> Option<Event> {
        self.rx.try_recv().ok().map(|event| {
            self.local_consumed += 1;
            event
        })
    }

    /// Wait for the next event. `None` once every collector handle is gone.
    pub async fn recv(&mut self) -> Option<Event> {
        let event = self.rx.recv_async().await.ok()?;
        self.local_consumed += 1;
        Some(event)
    }

    /// Take every buffered event
    pub fn drain(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some(event) = self.try_next() {
            events.push(event);
        }
        events
    }

    /// Take every buffered event, keeping those matching `filter`
    pub fn filter(&mut self, filter: &EventFilter) -> Vec<Event> {
        self.drain()
            .into_iter()
            .filter(|event| event.matches(filter))
            .collect()
    }

    /// Get local consumption count
    #[inline]
    pub fn consumed(&self) -> u64 {
        self.local_consumed
    }
}
