/*!
 * Simulation Types
 * Per-step reports and aggregate statistics
 */

use crate::core::types::{TaskId, Tick};
use serde::{Deserialize, Serialize};

/// What a single `step` did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    /// Tick value after the step
    pub tick: Tick,
    /// Tasks admitted to running, in admission order
    pub started: Vec<TaskId>,
    /// Tasks that completed, in running-collection order
    pub finished: Vec<TaskId>,
    /// Tasks whose deadline passed, in arrival order
    pub timed_out: Vec<TaskId>,
}

impl StepReport {
    pub(super) fn new(tick: Tick) -> Self {
        Self {
            tick,
            ..Default::default()
        }
    }

    /// Whether any task changed state
    #[inline]
    pub fn is_quiet(&self) -> bool {
        self.started.is_empty() && self.finished.is_empty() && self.timed_out.is_empty()
    }
}

/// Simulation statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub current_tick: Tick,
    pub waiting: usize,
    pub running: usize,
    pub timed_out: usize,
    pub finished: usize,
}

impl SimulationStats {
    /// Tasks currently known to the simulation
    #[inline]
    pub fn total(&self) -> usize {
        self.waiting + self.running + self.timed_out + self.finished
    }
}
