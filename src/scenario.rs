/*!
 * Scenario Runner Support
 * Scenario files, bulk enqueueing and the end-of-run summary
 */

use crate::core::config::SimulationConfig;
use crate::core::types::TaskId;
use crate::driver::DriverSummary;
use crate::memory::{Allocator, MemoryManager, MemoryStats};
use crate::simulation::{SimulationManager, SimulationStats};
use crate::task::{TaskError, TaskItem, TaskSpec};
use miette::Diagnostic;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Scenario errors
#[derive(Error, Debug, Diagnostic)]
pub enum ScenarioError {
    #[error("Failed to read scenario {}", path.display())]
    #[diagnostic(code(scenario::io))]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse scenario {}", path.display())]
    #[diagnostic(
        code(scenario::parse),
        help("Expected a JSON array of {{name, size, max_start_time, duration}} objects.")
    )]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid task #{index} ({name:?})")]
    #[diagnostic(code(scenario::invalid_task))]
    Task {
        index: usize,
        name: String,
        #[source]
        source: TaskError,
    },
}

/// Read a JSON array of task descriptions
pub fn load_specs(path: &Path) -> Result<Vec<TaskSpec>, ScenarioError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let specs: Vec<TaskSpec> =
        serde_json::from_str(&raw).map_err(|source| ScenarioError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    info!(path = %path.display(), tasks = specs.len(), "Scenario loaded");
    Ok(specs)
}

/// Outcome of [`enqueue_all`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enqueued {
    /// Ids of accepted tasks, in file order
    pub accepted: Vec<TaskId>,
    /// Names of tasks the simulation refused
    pub rejected: Vec<String>,
}

/// Validate every spec, then enqueue them in order.
///
/// Nothing is enqueued if any spec is invalid.
pub fn enqueue_all<A: Allocator>(
    sim: &SimulationManager<A>,
    specs: Vec<TaskSpec>,
) -> Result<Enqueued, ScenarioError> {
    let tasks = specs
        .into_iter()
        .enumerate()
        .map(|(index, spec)| {
            let name = spec.name.clone();
            TaskItem::try_from(spec).map_err(|source| ScenarioError::Task {
                index,
                name,
                source,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut outcome = Enqueued::default();
    for task in tasks {
        let id = task.id();
        let name = task.name().to_string();
        if sim.enqueue(task) {
            outcome.accepted.push(id);
        } else {
            warn!(task = %name, "Task rejected at enqueue");
            outcome.rejected.push(name);
        }
    }
    Ok(outcome)
}

/// Printable end-of-run report
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub config: SimulationConfig,
    pub driver: DriverSummary,
    pub tasks: SimulationStats,
    pub memory: MemoryStats,
    pub finished: Vec<String>,
    pub timed_out: Vec<String>,
    pub waiting: Vec<String>,
    pub running: Vec<String>,
    /// Refused at enqueue, never part of the simulation
    pub rejected: Vec<String>,
}

impl RunSummary {
    pub fn collect(
        sim: &SimulationManager<MemoryManager>,
        config: SimulationConfig,
        driver: DriverSummary,
        rejected: Vec<String>,
    ) -> Self {
        Self {
            config,
            driver,
            tasks: sim.stats(),
            memory: sim.memory().stats(),
            finished: names(sim.finished_snapshot()),
            timed_out: names(sim.timed_out_snapshot()),
            waiting: names(sim.queue_snapshot()),
            running: names(sim.running_snapshot()),
            rejected,
        }
    }
}

fn names(tasks: Vec<TaskItem>) -> Vec<String> {
    tasks.into_iter().map(|t| t.name().to_string()).collect()
}
