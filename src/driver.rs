/*!
 * Tick Driver
 * Paces a simulation from wall-clock time
 *
 * Steps are issued one after another from a single loop, so they never
 * overlap. The first step fires one interval after `run` starts.
 */

use crate::core::config::SimulationConfig;
use crate::core::types::Tick;
use crate::memory::{Allocator, MemoryManager};
use crate::simulation::SimulationManager;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Why the driver loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Nothing left waiting or running
    Idle,
    /// Tick budget used up
    TickBudget,
    /// Shutdown requested through a [`ShutdownHandle`]
    Shutdown,
}

/// Outcome of a driver run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverSummary {
    /// Steps issued by this run
    pub steps: u64,
    /// Simulation clock when the run ended
    pub final_tick: Tick,
    pub reason: StopReason,
}

/// Requests a running driver to stop after its current step
#[derive(Debug, Clone)]
pub struct ShutdownHandle(Arc<watch::Sender<bool>>);

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.0.send_replace(true);
    }
}

/// Wall-clock tick source for a simulation
pub struct TickDriver<A: Allocator = MemoryManager> {
    sim: SimulationManager<A>,
    interval: Duration,
    stop_when_idle: bool,
    shutdown_tx: Arc<watch::Sender<bool>>,
    shutdown_rx: watch::Receiver<bool>,
}

impl<A: Allocator> TickDriver<A> {
    pub fn new(sim: SimulationManager<A>, interval: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            sim,
            interval,
            stop_when_idle: false,
            shutdown_tx: Arc::new(shutdown_tx),
            shutdown_rx,
        }
    }

    /// Driver paced by the configured tick interval
    pub fn from_config(sim: SimulationManager<A>, config: &SimulationConfig) -> Self {
        Self::new(sim, config.tick_interval())
    }

    /// Return as soon as no task is waiting or running
    pub fn stop_when_idle(mut self, stop: bool) -> Self {
        self.stop_when_idle = stop;
        self
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle(Arc::clone(&self.shutdown_tx))
    }

    pub fn simulation(&self) -> &SimulationManager<A> {
        &self.sim
    }

    /// Step once per interval until idle, shut down, or `max_ticks` steps
    pub async fn run(&self, max_ticks: u64) -> DriverSummary {
        info!(interval = ?self.interval, max_ticks, "Tick driver started");

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        interval.tick().await;

        let mut shutdown = self.shutdown_rx.clone();
        let mut steps = 0;
        let reason = loop {
            if *shutdown.borrow_and_update() {
                break StopReason::Shutdown;
            }
            if steps >= max_ticks {
                break StopReason::TickBudget;
            }
            if self.stop_when_idle && self.sim.is_idle() {
                break StopReason::Idle;
            }

            tokio::select! {
                biased;
                _ = shutdown.changed() => continue,
                _ = interval.tick() => {
                    let report = self.sim.step();
                    steps += 1;
                    debug!(
                        tick = report.tick,
                        started = report.started.len(),
                        finished = report.finished.len(),
                        timed_out = report.timed_out.len(),
                        "Driver step"
                    );
                }
            }
        };

        let summary = DriverSummary {
            steps,
            final_tick: self.sim.current_tick(),
            reason,
        };
        info!(steps, final_tick = summary.final_tick, ?reason, "Tick driver stopped");
        summary
    }
}
