/*!
 * Memory Allocator Implementation
 * First-fit allocation and in-place release
 */

use super::super::block::MemoryBlock;
use super::super::types::{MemoryChangeKind, MemoryError, MemoryPressure, MemoryResult, MemoryStats};
use super::MemoryManager;
use crate::core::types::{BlockId, Size, TaskId};
use tracing::{debug, info, warn};

impl MemoryManager {
    /// Allocate `size` bytes for `owner` from the first free block that fits.
    ///
    /// `Ok(None)` when nothing fits. Zero-sized requests are rejected.
    pub fn allocate(&self, size: Size, owner: TaskId) -> MemoryResult<Option<MemoryBlock>> {
        let mut pool = self.pool.write();

        if size == 0 {
            warn!(task = %owner, "Rejected zero-byte allocation");
            return Err(MemoryError::InvalidSplitSize {
                requested: 0,
                available: pool.total_memory,
            });
        }

        let Some(index) = pool
            .blocks
            .iter()
            .position(|block| block.is_free() && block.size() >= size)
        else {
            debug!(task = %owner, size, "No free block large enough");
            return Ok(None);
        };

        let (occupied, remainder) = pool.blocks[index].split(size, owner)?;
        pool.blocks[index] = occupied.clone();
        if let Some(remainder) = remainder {
            debug!(
                offset = remainder.offset(),
                size = remainder.size(),
                "Split block, remainder stays free"
            );
            pool.blocks.insert(index + 1, remainder);
        }

        let stats = MemoryStats::from_blocks(pool.total_memory, &pool.blocks);
        if stats.memory_pressure() >= MemoryPressure::High {
            warn!(
                task = %owner,
                offset = occupied.offset(),
                size,
                pressure = %stats.memory_pressure(),
                usage_pct = stats.usage_percentage,
                "Allocated under memory pressure"
            );
        } else {
            info!(task = %owner, offset = occupied.offset(), size, "Allocated block");
        }

        if let Some(ref collector) = self.collector {
            collector.memory_changed(
                MemoryChangeKind::Allocated,
                Some(occupied.clone()),
                pool.blocks.as_slice().into(),
            );
        }

        Ok(Some(occupied))
    }

    /// Mark a block free again. No merging with free neighbours.
    pub fn free(&self, id: BlockId) -> bool {
        let mut pool = self.pool.write();

        let Some(block) = pool.blocks.iter_mut().find(|block| block.id() == id) else {
            warn!(block = %id, "Attempted to free unknown block");
            return false;
        };

        if block.is_free() {
            warn!(block = %id, "Attempted to free block that is already free");
            return false;
        }

        let owner = block.owner();
        block.release();
        let freed = block.clone();

        info!(
            block = %id,
            offset = freed.offset(),
            size = freed.size(),
            task = ?owner,
            "Freed block"
        );

        if let Some(ref collector) = self.collector {
            collector.memory_changed(
                MemoryChangeKind::Freed,
                Some(freed),
                pool.blocks.as_slice().into(),
            );
        }

        true
    }
}
