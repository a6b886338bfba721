/*!
 * Scheduler Core Operations
 * Enqueue and the per-tick step
 */

use super::types::StepReport;
use super::SimulationManager;
use crate::memory::Allocator;
use crate::task::{TaskItem, TaskState};
use tracing::{debug, debug_span, error, info, warn};

impl<A: Allocator> SimulationManager<A> {
    /// Queue a task for admission.
    ///
    /// Returns `false` without touching the simulation when the task's
    /// deadline is already at or behind the clock, when the task is not
    /// waiting, or when a task with the same id is already known.
    pub fn enqueue(&self, task: TaskItem) -> bool {
        let mut state = self.state.lock();

        if task.max_start_time() <= state.current_tick {
            warn!(
                task = %task.id(),
                name = task.name(),
                max_start_time = task.max_start_time(),
                current_tick = state.current_tick,
                "Rejected task: deadline already passed"
            );
            return false;
        }

        if task.state() != TaskState::Waiting {
            warn!(task = %task.id(), state = %task.state(), "Rejected task: not waiting");
            return false;
        }

        let id = task.id();
        let known = state
            .queue
            .iter()
            .chain(&state.running)
            .chain(&state.timed_out)
            .chain(&state.finished)
            .any(|t| t.id() == id);
        if known {
            warn!(task = %id, "Rejected task: already enqueued");
            return false;
        }

        info!(
            task = %id,
            name = task.name(),
            size = task.size_bytes(),
            max_start_time = task.max_start_time(),
            duration = task.initial_duration(),
            "Task enqueued"
        );
        state.queue.push(task);
        true
    }

    /// Advance the simulation by one tick.
    ///
    /// Running tasks are retired before any waiting task allocates, so memory
    /// released this tick is available to waiting tasks in the same tick.
    pub fn step(&self) -> StepReport {
        let mut state = self.state.lock();

        state.current_tick += 1;
        let tick = state.current_tick;
        let _span = debug_span!("step", tick).entered();
        let mut report = StepReport::new(tick);

        let running = std::mem::take(&mut state.running);
        for mut task in running {
            if !task.tick() {
                state.running.push(task);
                continue;
            }

            if let Some(block) = task.release_block() {
                if !self.memory.free(block) {
                    error!(task = %task.id(), block = %block, "Finished task held a block the pool did not know");
                }
            }

            info!(task = %task.id(), name = task.name(), "Task finished");
            report.finished.push(task.id());
            if let Some(ref collector) = self.collector {
                collector.task_finished(&task);
            }
            state.finished.push(task);
        }

        let waiting = std::mem::take(&mut state.queue);
        for mut task in waiting {
            if tick > task.max_start_time() {
                if let Err(err) = task.mark_timed_out() {
                    error!(%err, "Waiting collection held a task in the wrong state");
                    state.queue.push(task);
                    continue;
                }

                info!(
                    task = %task.id(),
                    name = task.name(),
                    max_start_time = task.max_start_time(),
                    "Task timed out"
                );
                report.timed_out.push(task.id());
                if let Some(ref collector) = self.collector {
                    collector.task_timed_out(&task);
                }
                state.timed_out.push(task);
                continue;
            }

            let block = match self.memory.allocate(task.size_bytes(), task.id()) {
                Ok(Some(block)) => block,
                Ok(None) => {
                    debug!(task = %task.id(), size = task.size_bytes(), "No memory yet, task keeps waiting");
                    state.queue.push(task);
                    continue;
                }
                Err(err) => {
                    error!(task = %task.id(), %err, "Allocation rejected");
                    state.queue.push(task);
                    continue;
                }
            };

            if let Err(err) = task.start(tick, block.id()) {
                error!(%err, "Could not start task, returning its block");
                self.memory.free(block.id());
                state.queue.push(task);
                continue;
            }

            info!(
                task = %task.id(),
                name = task.name(),
                offset = block.offset(),
                size = block.size(),
                "Task started"
            );
            report.started.push(task.id());
            if let Some(ref collector) = self.collector {
                collector.task_started(&task);
            }
            state.running.push(task);
        }

        if let Some(ref collector) = self.collector {
            collector.tick_advanced(tick);
        }

        report
    }
}
