/*!
 * Memory Pool Simulator Library
 * First-fit pool allocation driven by a discrete-time task scheduler
 */

pub mod core;
pub mod driver;
pub mod memory;
pub mod monitoring;
pub mod scenario;
pub mod simulation;
pub mod task;

// Re-exports
pub use crate::core::{
    BlockId, ConfigError, MemoryError, SimError, SimResult, SimulationConfig, Size, TaskError,
    TaskId, Tick,
};
pub use driver::{DriverSummary, ShutdownHandle, StopReason, TickDriver};
pub use memory::{
    Allocator, MemoryBlock, MemoryChangeKind, MemoryInfo, MemoryManager, MemoryPressure,
    MemoryStats,
};
pub use monitoring::{init_tracing, Collector, Event, EventFilter, Payload, Subscriber};
pub use scenario::{enqueue_all, load_specs, Enqueued, RunSummary, ScenarioError};
pub use simulation::{SimulationManager, SimulationStats, StepReport};
pub use task::{TaskItem, TaskSpec, TaskState};
