/*!
 * Memory Module
 * First-fit pool allocation over a linear address space
 */

pub mod block;
pub mod manager;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use block::MemoryBlock;
pub use manager::MemoryManager;
pub use traits::*;
pub use types::*;
