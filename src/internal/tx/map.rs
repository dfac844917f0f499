//! Buffer index map: one node per hardware TX buffer slot.
//!
//! Nodes live in a fixed array addressed by [`BufferHandle::index`]. The
//! `next` field threads the per-FIFO request queues through the same array,
//! so enqueue and retire never allocate.

use crate::driver::error::{BufferError, BufferResult};
use crate::driver::types::{BufferHandle, TxBufferState};

/// Bookkeeping for one TX buffer slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferNode {
    /// FIFO the slot was allocated on
    pub fifo: u8,
    /// Allocation state
    pub state: TxBufferState,
    /// Upper layer wants a confirmation for this buffer
    pub confirm: bool,
    /// Egress timestamp capture was armed
    pub timestamp: bool,
    /// Next node in the FIFO's request queue
    pub next: Option<usize>,
}

impl BufferNode {
    /// An unallocated node
    pub const fn new() -> Self {
        Self {
            fifo: 0,
            state: TxBufferState::Free,
            confirm: false,
            timestamp: false,
            next: None,
        }
    }

    /// Return the slot to `Free`, dropping all per-frame flags
    #[inline]
    pub fn release(&mut self) {
        *self = Self::new();
    }
}

/// Fixed-capacity arena of [`BufferNode`]s
pub struct TxBufferMap<const N: usize> {
    nodes: [BufferNode; N],
}

impl<const N: usize> TxBufferMap<N> {
    /// Create a map with every slot free
    pub const fn new() -> Self {
        Self {
            nodes: [const { BufferNode::new() }; N],
        }
    }

    /// Node behind a handle
    #[inline]
    pub fn get(&self, handle: BufferHandle) -> Option<&BufferNode> {
        self.nodes.get(handle.index())
    }

    /// Mutable node behind a handle
    #[inline]
    pub fn get_mut(&mut self, handle: BufferHandle) -> Option<&mut BufferNode> {
        self.nodes.get_mut(handle.index())
    }

    /// Node at a raw queue link
    #[inline]
    pub fn node(&self, index: usize) -> &BufferNode {
        &self.nodes[index]
    }

    /// Mutable node at a raw queue link
    #[inline]
    pub fn node_mut(&mut self, index: usize) -> &mut BufferNode {
        &mut self.nodes[index]
    }

    /// Record a fresh allocation made by the hardware layer
    ///
    /// # Errors
    /// - `NotOk` - handle outside the map
    /// - `Busy` - slot still allocated (provided or in flight)
    pub fn allocate(&mut self, handle: BufferHandle, fifo: u8, len: usize) -> BufferResult<()> {
        let node = self.get_mut(handle).ok_or(BufferError::NotOk)?;
        if node.state.is_allocated() {
            return Err(BufferError::Busy);
        }
        *node = BufferNode {
            fifo,
            state: TxBufferState::Provided { len },
            confirm: false,
            timestamp: false,
            next: None,
        };
        Ok(())
    }

    /// Release every slot
    pub fn reset(&mut self) {
        for node in &mut self.nodes {
            node.release();
        }
    }

    /// Release slots that were provided but never enqueued
    ///
    /// Returns the number of slots released.
    pub fn release_provided(&mut self) -> usize {
        let mut released = 0;
        for node in &mut self.nodes {
            if matches!(node.state, TxBufferState::Provided { .. }) {
                node.release();
                released += 1;
            }
        }
        released
    }

    /// Count of slots that are not free
    pub fn allocated(&self) -> usize {
        self.nodes.iter().filter(|n| n.state.is_allocated()).count()
    }
}

impl<const N: usize> Default for TxBufferMap<N> {
    fn default() -> Self {
        Self::new()
    }
}
