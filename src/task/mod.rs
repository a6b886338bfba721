/*!
 * Task Module
 * Task descriptions and their lifecycle state machine
 */

pub mod item;
pub mod types;

pub use item::TaskItem;
pub use types::{TaskError, TaskResult, TaskSpec, TaskState};
