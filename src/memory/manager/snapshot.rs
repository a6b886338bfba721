/*!
 * Pool Inspection and Reset
 */

use super::super::block::MemoryBlock;
use super::super::types::{BlocksSnapshot, MemoryChangeKind, MemoryError, MemoryResult, MemoryStats};
use super::MemoryManager;
use crate::core::types::{BlockId, Size, TaskId};
use tracing::{info, warn};

impl MemoryManager {
    /// Ordered copy of every block; unaffected by later changes
    pub fn blocks_snapshot(&self) -> BlocksSnapshot {
        self.pool.read().blocks.as_slice().into()
    }

    /// Discard all blocks and start over with one free block of `total_size`
    pub fn reset(&self, total_size: Size) -> MemoryResult<()> {
        if total_size < 1 {
            warn!(total_size, "Rejected pool reset");
            return Err(MemoryError::InvalidPoolSize(total_size));
        }

        let mut pool = self.pool.write();
        pool.total_memory = total_size;
        pool.blocks.clear();
        pool.blocks.push(MemoryBlock::free_at(0, total_size));

        info!(total_memory = total_size, "Memory pool reset");

        if let Some(ref collector) = self.collector {
            collector.memory_changed(MemoryChangeKind::Reset, None, pool.blocks.as_slice().into());
        }

        Ok(())
    }

    /// Configured pool size
    pub fn total_memory(&self) -> Size {
        self.pool.read().total_memory
    }

    /// Get overall memory statistics
    pub fn stats(&self) -> MemoryStats {
        let pool = self.pool.read();
        MemoryStats::from_blocks(pool.total_memory, &pool.blocks)
    }

    /// Look up a block by identity
    pub fn block(&self, id: BlockId) -> Option<MemoryBlock> {
        self.pool.read().blocks.iter().find(|b| b.id() == id).cloned()
    }

    /// Blocks currently owned by `task`
    pub fn owned_by(&self, task: TaskId) -> Vec<MemoryBlock> {
        self.pool
            .read()
            .blocks
            .iter()
            .filter(|b| b.owner() == Some(task))
            .cloned()
            .collect()
    }
}
