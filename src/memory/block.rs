/*!
 * Memory Block
 * One contiguous region of the pool and the split primitive
 */

use super::types::{MemoryError, MemoryResult};
use crate::core::types::{BlockId, Offset, Size, TaskId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Memory block metadata
///
/// A block is free exactly when it has no owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryBlock {
    id: BlockId,
    offset: Offset,
    size: Size,
    owner: Option<TaskId>,
}

impl MemoryBlock {
    /// Free block at `offset`
    pub(crate) fn free_at(offset: Offset, size: Size) -> Self {
        debug_assert!(size > 0, "blocks are never empty");
        Self {
            id: BlockId::new(),
            offset,
            size,
            owner: None,
        }
    }

    #[inline]
    pub fn id(&self) -> BlockId {
        self.id
    }

    #[inline]
    pub fn offset(&self) -> Offset {
        self.offset
    }

    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    /// First offset past the block
    #[inline]
    pub fn end(&self) -> Offset {
        self.offset + self.size
    }

    #[inline]
    pub fn owner(&self) -> Option<TaskId> {
        self.owner
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.owner.is_none()
    }

    /// Carve `requested` bytes for `owner` off the front of this block.
    ///
    /// Returns the occupied block and, when the request is smaller than the
    /// block, the free remainder that follows it. An exact fit keeps this
    /// block's identity; a partial fit yields two new identities. `self` is
    /// left untouched either way.
    pub fn split(
        &self,
        requested: Size,
        owner: TaskId,
    ) -> MemoryResult<(MemoryBlock, Option<MemoryBlock>)> {
        if !self.is_free() {
            return Err(MemoryError::BlockOccupied(self.id));
        }

        if requested == 0 || requested > self.size {
            return Err(MemoryError::InvalidSplitSize {
                requested,
                available: self.size,
            });
        }

        if requested == self.size {
            let mut occupied = self.clone();
            occupied.owner = Some(owner);
            return Ok((occupied, None));
        }

        let occupied = MemoryBlock {
            id: BlockId::new(),
            offset: self.offset,
            size: requested,
            owner: Some(owner),
        };
        let remainder = MemoryBlock::free_at(self.offset + requested, self.size - requested);

        Ok((occupied, Some(remainder)))
    }

    /// Drop the owner, making the block reusable in place
    pub(crate) fn release(&mut self) {
        self.owner = None;
    }
}

impl fmt::Display for MemoryBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.owner {
            None => write!(f, "[{}..{}) free", self.offset, self.end()),
            Some(owner) => write!(f, "[{}..{}) task {}", self.offset, self.end(), owner),
        }
    }
}
