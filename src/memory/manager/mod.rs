/*!
 * Memory Management
 *
 * First-fit allocator over a fixed linear pool.
 *
 * ## Layout
 *
 * The pool is an ordered list of blocks that always partitions
 * `[0, total_memory)`: contiguous, non-overlapping, first offset 0.
 *
 * ## Allocation
 *
 * - **First-fit**: the lowest-offset free block large enough wins
 * - **Block splitting**: the chosen block is cut in place, the remainder
 *   follows it as a new free block
 * - **No coalescing**: a freed block stays its own block, so neighbouring
 *   free blocks accumulate and large requests may fail even with enough
 *   total free memory
 *
 * Every successful allocate/free/reset publishes a memory-changed event
 * carrying a fresh snapshot when a collector is attached.
 */

mod allocator;
mod snapshot;

use super::block::MemoryBlock;
use super::traits::{Allocator, MemoryInfo};
use super::types::{BlocksSnapshot, MemoryError, MemoryResult, MemoryStats};
use crate::core::limits::DEFAULT_MEMORY_POOL;
use crate::core::types::{BlockId, Size, TaskId};
use crate::monitoring::Collector;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// Blocks plus the size they partition
#[derive(Debug)]
pub(super) struct PoolState {
    pub total_memory: Size,
    pub blocks: Vec<MemoryBlock>,
}

impl PoolState {
    fn new(total_memory: Size) -> Self {
        Self {
            total_memory,
            blocks: vec![MemoryBlock::free_at(0, total_memory)],
        }
    }
}

/// Memory manager
///
/// Cloning yields another handle onto the same pool.
pub struct MemoryManager {
    pub(super) pool: Arc<RwLock<PoolState>>,
    // Observability collector for event streaming
    collector: Option<Arc<Collector>>,
}

impl MemoryManager {
    /// Pool of the default size
    pub fn new() -> Self {
        Self::build(DEFAULT_MEMORY_POOL)
    }

    /// Create memory manager with custom capacity
    pub fn with_capacity(total: Size) -> MemoryResult<Self> {
        if total < 1 {
            return Err(MemoryError::InvalidPoolSize(total));
        }
        Ok(Self::build(total))
    }

    fn build(total: Size) -> Self {
        info!(total_memory = total, "Memory manager initialized with first-fit allocator");
        Self {
            pool: Arc::new(RwLock::new(PoolState::new(total))),
            collector: None,
        }
    }

    /// Add observability collector
    pub fn with_collector(mut self, collector: Arc<Collector>) -> Self {
        self.collector = Some(collector);
        self
    }
}

// Implement trait interfaces
impl Allocator for MemoryManager {
    fn allocate(&self, size: Size, owner: TaskId) -> MemoryResult<Option<MemoryBlock>> {
        MemoryManager::allocate(self, size, owner)
    }

    fn free(&self, block: BlockId) -> bool {
        MemoryManager::free(self, block)
    }

    fn blocks_snapshot(&self) -> BlocksSnapshot {
        MemoryManager::blocks_snapshot(self)
    }

    fn reset(&self, total_size: Size) -> MemoryResult<()> {
        MemoryManager::reset(self, total_size)
    }
}

impl MemoryInfo for MemoryManager {
    fn stats(&self) -> MemoryStats {
        MemoryManager::stats(self)
    }
}

impl Clone for MemoryManager {
    fn clone(&self) -> Self {
        Self {
            pool: Arc::clone(&self.pool),
            collector: self.collector.as_ref().map(Arc::clone),
        }
    }
}

impl Default for MemoryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pool = self.pool.read();
        f.debug_struct("MemoryManager")
            .field("total_memory", &pool.total_memory)
            .field("blocks", &pool.blocks.len())
            .finish()
    }
}
