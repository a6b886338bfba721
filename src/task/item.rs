/*!
 * Task Item
 * Static task description plus the runtime state machine
 */

use super::types::{TaskError, TaskResult, TaskSpec, TaskState};
use crate::core::types::{BlockId, Size, TaskId, Tick};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A task that needs `size_bytes` of contiguous memory for
/// `initial_duration` ticks and must start by `max_start_time`.
///
/// Deserializing reads a [`TaskSpec`] and validates it like [`TaskItem::new`],
/// producing a fresh waiting task with its own id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskSpec")]
pub struct TaskItem {
    id: TaskId,
    name: String,
    size_bytes: Size,
    max_start_time: Tick,
    initial_duration: Tick,
    remaining_duration: Tick,
    start_tick: Option<Tick>,
    state: TaskState,
    allocated_block: Option<BlockId>,
}

impl TaskItem {
    /// Create a waiting task, validating every parameter
    pub fn new(
        name: impl Into<String>,
        size_bytes: Size,
        max_start_time: Tick,
        duration: Tick,
    ) -> TaskResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TaskError::EmptyName);
        }
        if size_bytes == 0 {
            return Err(TaskError::InvalidSize(size_bytes));
        }
        if max_start_time == 0 {
            return Err(TaskError::InvalidMaxStartTime(max_start_time));
        }
        if duration == 0 {
            return Err(TaskError::InvalidDuration(duration));
        }

        Ok(Self {
            id: TaskId::next(),
            name,
            size_bytes,
            max_start_time,
            initial_duration: duration,
            remaining_duration: duration,
            start_tick: None,
            state: TaskState::Waiting,
            allocated_block: None,
        })
    }

    #[inline]
    pub fn id(&self) -> TaskId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn size_bytes(&self) -> Size {
        self.size_bytes
    }

    #[inline]
    pub fn max_start_time(&self) -> Tick {
        self.max_start_time
    }

    #[inline]
    pub fn initial_duration(&self) -> Tick {
        self.initial_duration
    }

    #[inline]
    pub fn remaining_duration(&self) -> Tick {
        self.remaining_duration
    }

    #[inline]
    pub fn start_tick(&self) -> Option<Tick> {
        self.start_tick
    }

    #[inline]
    pub fn state(&self) -> TaskState {
        self.state
    }

    #[inline]
    pub fn allocated_block(&self) -> Option<BlockId> {
        self.allocated_block
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Advance one tick. Returns `true` when this tick completed the task.
    ///
    /// Does nothing unless the task is running.
    pub fn tick(&mut self) -> bool {
        if self.state != TaskState::Running {
            return false;
        }

        self.remaining_duration = self.remaining_duration.saturating_sub(1);

        if self.remaining_duration == 0 {
            self.state = TaskState::Finished;
            return true;
        }

        false
    }

    /// Admit a waiting task to running with its allocated block
    pub(crate) fn start(&mut self, tick: Tick, block: BlockId) -> TaskResult<()> {
        self.transition(TaskState::Running)?;
        self.start_tick = Some(tick);
        self.allocated_block = Some(block);
        Ok(())
    }

    /// Give up on a waiting task whose deadline passed
    pub(crate) fn mark_timed_out(&mut self) -> TaskResult<()> {
        self.transition(TaskState::TimedOut)
    }

    /// Drop the block reference after the block was returned to the pool
    pub(crate) fn release_block(&mut self) -> Option<BlockId> {
        self.allocated_block.take()
    }

    fn transition(&mut self, to: TaskState) -> TaskResult<()> {
        if self.state != TaskState::Waiting {
            return Err(TaskError::InvalidTransition {
                task: self.id,
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}

impl TryFrom<TaskSpec> for TaskItem {
    type Error = TaskError;

    fn try_from(spec: TaskSpec) -> Result<Self, Self::Error> {
        TaskItem::new(spec.name, spec.size, spec.max_start_time, spec.duration)
    }
}

impl fmt::Display for TaskItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: size {} bytes; duration {}t; remaining {}t; {}",
            self.name, self.size_bytes, self.initial_duration, self.remaining_duration, self.state
        )
    }
}
