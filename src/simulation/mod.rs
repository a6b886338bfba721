/*!
 * Simulation Manager
 *
 * Discrete-time scheduler that admits tasks into the memory pool.
 *
 * Tasks live in exactly one of four ordered collections matching their
 * state: waiting (arrival order), running, timed out and finished. Each
 * `step` advances the clock by one tick, retires finished tasks and frees
 * their memory, then walks the waiting tasks in arrival order, timing out
 * the overdue ones and trying to allocate for the rest.
 *
 * All state sits behind one mutex held for the whole of a step, so steps
 * never overlap and `enqueue` lands strictly before or after a step.
 */

mod operations;
mod snapshot;
mod types;

pub use types::{SimulationStats, StepReport};

use crate::core::types::{Size, Tick};
use crate::memory::{Allocator, MemoryManager};
use crate::monitoring::Collector;
use crate::task::TaskItem;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::info;

/// Clock plus one ordered collection per task state
#[derive(Debug, Default)]
pub(super) struct SimState {
    pub current_tick: Tick,
    pub queue: Vec<TaskItem>,
    pub running: Vec<TaskItem>,
    pub timed_out: Vec<TaskItem>,
    pub finished: Vec<TaskItem>,
}

/// Tick-driven task scheduler over any [`Allocator`]
///
/// Cloning yields another handle onto the same simulation when the
/// allocator's own clones share their pool, as [`MemoryManager`]'s do.
pub struct SimulationManager<A: Allocator = MemoryManager> {
    memory: A,
    state: Arc<Mutex<SimState>>,
    // Observability collector for event streaming
    collector: Option<Arc<Collector>>,
}

impl<A: Allocator> SimulationManager<A> {
    /// Scheduler allocating from `memory`, starting at tick 0
    pub fn new(memory: A) -> Self {
        let pool_size: Size = memory.blocks_snapshot().iter().map(|b| b.size()).sum();
        info!(pool_size, "Simulation manager initialized");
        Self {
            memory,
            state: Arc::new(Mutex::new(SimState::default())),
            collector: None,
        }
    }

    /// Add observability collector
    pub fn with_collector(mut self, collector: Arc<Collector>) -> Self {
        self.collector = Some(collector);
        self
    }

    /// Allocator backing this simulation
    pub fn memory(&self) -> &A {
        &self.memory
    }
}

impl<A: Allocator + Clone> Clone for SimulationManager<A> {
    fn clone(&self) -> Self {
        Self {
            memory: self.memory.clone(),
            state: Arc::clone(&self.state),
            collector: self.collector.as_ref().map(Arc::clone),
        }
    }
}

impl Default for SimulationManager {
    fn default() -> Self {
        Self::new(MemoryManager::new())
    }
}

impl<A: Allocator + std::fmt::Debug> std::fmt::Debug for SimulationManager<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationManager")
            .field("memory", &self.memory)
            .field("stats", &self.stats())
            .finish()
    }
}
