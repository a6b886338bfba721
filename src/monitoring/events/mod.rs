/*!
 * Event System
 * Strongly-typed notifications emitted by the allocator and the scheduler
 */

use crate::core::types::{TaskId, Tick};
use crate::memory::{BlocksSnapshot, MemoryBlock, MemoryChangeKind};
use crate::task::TaskItem;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Event category for organization and querying
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Category {
    Memory,
    Scheduler,
}

/// Unified event type - every notification flows through this
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    /// Monotonic timestamp (nanoseconds since first event)
    pub timestamp_ns: u64,
    /// Emission order within a collector, assigned on emit
    pub sequence: u64,
    /// Event category
    pub category: Category,
    /// Event payload
    pub payload: Payload,
}

/// Event payload - one variant per notification kind
#[derive(Debug, Clone, Serialize)]
pub enum Payload {
    /// Allocate, free or reset succeeded
    MemoryChanged {
        kind: MemoryChangeKind,
        block: Option<MemoryBlock>,
        snapshot: BlocksSnapshot,
    },
    TaskStarted {
        task: TaskItem,
    },
    TaskFinished {
        task: TaskItem,
    },
    TaskTimedOut {
        task: TaskItem,
    },
    TickAdvanced {
        tick: Tick,
    },
}

impl Payload {
    #[inline]
    pub fn category(&self) -> Category {
        match self {
            Payload::MemoryChanged { .. } => Category::Memory,
            _ => Category::Scheduler,
        }
    }

    /// Task the payload is about, if any
    #[inline]
    pub fn task(&self) -> Option<&TaskItem> {
        match self {
            Payload::TaskStarted { task }
            | Payload::TaskFinished { task }
            | Payload::TaskTimedOut { task } => Some(task),
            _ => None,
        }
    }
}

impl Event {
    /// Create a new event with current timestamp
    #[inline]
    pub fn new(payload: Payload) -> Self {
        Self {
            timestamp_ns: Self::now_ns(),
            sequence: 0,
            category: payload.category(),
            payload,
        }
    }

    #[inline]
    pub(crate) fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    /// Get current time in nanoseconds (monotonic)
    #[inline]
    fn now_ns() -> u64 {
        static START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();
        let start = START.get_or_init(Instant::now);
        start.elapsed().as_nanos() as u64
    }

    /// Check if event matches filter criteria
    #[inline]
    pub fn matches(&self, filter: &EventFilter) -> bool {
        if let Some(category) = filter.category {
            if self.category != category {
                return false;
            }
        }

        if let Some(task) = filter.task {
            let owner = match &self.payload {
                Payload::MemoryChanged { block, .. } => block.as_ref().and_then(|b| b.owner()),
                other => other.task().map(|t| t.id()),
            };
            if owner != Some(task) {
                return false;
            }
        }

        true
    }
}

/// Event filter for querying
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub category: Option<Category>,
    pub task: Option<TaskId>,
}

impl EventFilter {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    #[inline]
    pub fn task(mut self, task: TaskId) -> Self {
        self.task = Some(task);
        self
    }
}
