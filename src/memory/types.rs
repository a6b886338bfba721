/*!
 * Memory Types
 * Common types for memory management
 */

use super::block::MemoryBlock;
use crate::core::limits::{
    MEMORY_CRITICAL_THRESHOLD, MEMORY_MEDIUM_THRESHOLD, MEMORY_WARNING_THRESHOLD,
};
use crate::core::types::{BlockId, Size};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Point-in-time ordered copy of every block in the pool
pub type BlocksSnapshot = Arc<[MemoryBlock]>;

/// Memory errors
///
/// Only validation failures live here. "No block fits" and "already free"
/// are ordinary outcomes and are reported through `Option`/`bool` instead.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum MemoryError {
    #[error("Invalid split size: requested {requested} bytes from a {available} byte block")]
    #[diagnostic(
        code(memory::invalid_split_size),
        help("Requested size must be at least 1 and no larger than the block.")
    )]
    InvalidSplitSize { requested: Size, available: Size },

    #[error("Block {0} is already occupied")]
    #[diagnostic(code(memory::block_occupied))]
    BlockOccupied(BlockId),

    #[error("Invalid pool size: {0} (must be at least 1 byte)")]
    #[diagnostic(code(memory::invalid_pool_size))]
    InvalidPoolSize(Size),
}

/// What a memory change notification describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryChangeKind {
    Allocated,
    Freed,
    Reset,
}

impl std::fmt::Display for MemoryChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MemoryChangeKind::Allocated => write!(f, "allocated"),
            MemoryChangeKind::Freed => write!(f, "freed"),
            MemoryChangeKind::Reset => write!(f, "reset"),
        }
    }
}

/// Memory statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total_memory: Size,
    pub used_memory: Size,
    pub available_memory: Size,
    pub usage_percentage: f64,
    pub allocated_blocks: usize,
    pub free_blocks: usize,
    pub largest_free_block: Size,
    /// 0.0 when all free memory is one block, approaching 1.0 as it splinters
    pub fragmentation: f64,
}

impl MemoryStats {
    /// Derive statistics from an ordered block list
    pub fn from_blocks(total_memory: Size, blocks: &[MemoryBlock]) -> Self {
        let mut used_memory = 0;
        let mut allocated_blocks = 0;
        let mut free_blocks = 0;
        let mut largest_free_block = 0;

        for block in blocks {
            if block.is_free() {
                free_blocks += 1;
                largest_free_block = largest_free_block.max(block.size());
            } else {
                allocated_blocks += 1;
                used_memory += block.size();
            }
        }

        let available_memory = total_memory.saturating_sub(used_memory);
        let usage_percentage = if total_memory == 0 {
            0.0
        } else {
            used_memory as f64 / total_memory as f64 * 100.0
        };
        let fragmentation = if available_memory == 0 {
            0.0
        } else {
            1.0 - largest_free_block as f64 / available_memory as f64
        };

        Self {
            total_memory,
            used_memory,
            available_memory,
            usage_percentage,
            allocated_blocks,
            free_blocks,
            largest_free_block,
            fragmentation,
        }
    }

    pub fn memory_pressure(&self) -> MemoryPressure {
        let ratio = self.usage_percentage / 100.0;
        if ratio >= MEMORY_CRITICAL_THRESHOLD {
            MemoryPressure::Critical
        } else if ratio >= MEMORY_WARNING_THRESHOLD {
            MemoryPressure::High
        } else if ratio >= MEMORY_MEDIUM_THRESHOLD {
            MemoryPressure::Medium
        } else {
            MemoryPressure::Low
        }
    }
}

/// Memory pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "LOW"),
            MemoryPressure::Medium => write!(f, "MEDIUM"),
            MemoryPressure::High => write!(f, "HIGH"),
            MemoryPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}
