/*!
 * Simulation Snapshots
 * Read-only value copies of the task collections
 */

use super::types::SimulationStats;
use super::SimulationManager;
use crate::core::types::{TaskId, Tick};
use crate::memory::Allocator;
use crate::task::TaskItem;

impl<A: Allocator> SimulationManager<A> {
    /// Ticks elapsed since start
    pub fn current_tick(&self) -> Tick {
        self.state.lock().current_tick
    }

    /// Waiting tasks in arrival order
    pub fn queue_snapshot(&self) -> Vec<TaskItem> {
        self.state.lock().queue.clone()
    }

    pub fn running_snapshot(&self) -> Vec<TaskItem> {
        self.state.lock().running.clone()
    }

    pub fn timed_out_snapshot(&self) -> Vec<TaskItem> {
        self.state.lock().timed_out.clone()
    }

    pub fn finished_snapshot(&self) -> Vec<TaskItem> {
        self.state.lock().finished.clone()
    }

    /// Find a task in any collection
    pub fn task(&self, id: TaskId) -> Option<TaskItem> {
        let state = self.state.lock();
        state
            .queue
            .iter()
            .chain(&state.running)
            .chain(&state.timed_out)
            .chain(&state.finished)
            .find(|t| t.id() == id)
            .cloned()
    }

    /// Collection sizes and the clock
    pub fn stats(&self) -> SimulationStats {
        let state = self.state.lock();
        SimulationStats {
            current_tick: state.current_tick,
            waiting: state.queue.len(),
            running: state.running.len(),
            timed_out: state.timed_out.len(),
            finished: state.finished.len(),
        }
    }

    /// No task is waiting or running
    pub fn is_idle(&self) -> bool {
        let state = self.state.lock();
        state.queue.is_empty() && state.running.is_empty()
    }
}
