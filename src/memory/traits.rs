/*!
 * Memory Traits
 * Allocator surface offered to collaborators
 */

use super::block::MemoryBlock;
use super::types::*;
use crate::core::types::{BlockId, Size, TaskId};

/// Pool allocator interface
pub trait Allocator: Send + Sync {
    /// Reserve `size` contiguous bytes for `owner`.
    ///
    /// `Ok(None)` means no free block is large enough right now.
    fn allocate(&self, size: Size, owner: TaskId) -> MemoryResult<Option<MemoryBlock>>;

    /// Release a block by identity. `false` if unknown or already free.
    fn free(&self, block: BlockId) -> bool;

    /// Ordered copy of all blocks
    fn blocks_snapshot(&self) -> BlocksSnapshot;

    /// Discard every block and start over with one free block of `total_size`
    fn reset(&self, total_size: Size) -> MemoryResult<()>;
}

/// Memory statistics provider
pub trait MemoryInfo: Send + Sync {
    /// Get overall memory statistics
    fn stats(&self) -> MemoryStats;

    /// Get memory info as (total, used, available)
    fn info(&self) -> (Size, Size, Size) {
        let stats = self.stats();
        (stats.total_memory, stats.used_memory, stats.available_memory)
    }

    /// Get memory pressure level
    fn pressure(&self) -> MemoryPressure {
        self.stats().memory_pressure()
    }
}
