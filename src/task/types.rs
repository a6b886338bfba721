/*!
 * Task Types
 * Lifecycle states, validation errors and task descriptions
 */

use crate::core::types::{Size, TaskId, Tick};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Task operation result
pub type TaskResult<T> = Result<T, TaskError>;

/// Task lifecycle state
///
/// `Waiting -> Running -> Finished` or `Waiting -> TimedOut`.
/// `TimedOut` and `Finished` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Waiting,
    Running,
    TimedOut,
    Finished,
}

impl TaskState {
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::TimedOut | Self::Finished)
    }

    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Running => "running",
            Self::TimedOut => "timed_out",
            Self::Finished => "finished",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum TaskError {
    #[error("Task name must not be empty")]
    #[diagnostic(code(task::empty_name))]
    EmptyName,

    #[error("Task size must be positive, got {0}")]
    #[diagnostic(code(task::invalid_size))]
    InvalidSize(Size),

    #[error("Task max start time must be positive, got {0}")]
    #[diagnostic(
        code(task::invalid_max_start_time),
        help("The deadline is the last tick at which the task may still be started.")
    )]
    InvalidMaxStartTime(Tick),

    #[error("Task duration must be positive, got {0}")]
    #[diagnostic(code(task::invalid_duration))]
    InvalidDuration(Tick),

    #[error("Task {task} cannot move from {from} to {to}")]
    #[diagnostic(
        code(task::invalid_transition),
        help("Only waiting tasks can start or time out.")
    )]
    InvalidTransition {
        task: TaskId,
        from: TaskState,
        to: TaskState,
    },
}

/// Task description as supplied by a caller (e.g. a scenario file)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub name: String,
    pub size: Size,
    pub max_start_time: Tick,
    pub duration: Tick,
}
