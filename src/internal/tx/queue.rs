//! Per-FIFO transmission request queue.
//!
//! A singly linked FIFO threaded through [`TxBufferMap`] nodes. Insertion is
//! always at the tail and retirement always at the head.
//!
//! Invariants:
//! - `head.is_none()` iff the queue is empty
//! - walking `next` from `head` reaches `tail`, and `tail.next` is `None`

use super::map::TxBufferMap;

/// Head/tail links of one FIFO's request queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TxQueue {
    head: Option<usize>,
    tail: Option<usize>,
}

impl TxQueue {
    /// An empty queue
    pub const fn new() -> Self {
        Self {
            head: None,
            tail: None,
        }
    }

    /// True when no request is queued
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Oldest queued node
    #[inline(always)]
    pub const fn front(&self) -> Option<usize> {
        self.head
    }

    /// Append a node in O(1)
    ///
    /// The caller guarantees the node is not already linked into any queue.
    pub fn push_back<const N: usize>(&mut self, map: &mut TxBufferMap<N>, index: usize) {
        map.node_mut(index).next = None;
        match (self.head, self.tail) {
            (Some(_), Some(tail)) => map.node_mut(tail).next = Some(index),
            _ => self.head = Some(index),
        }
        self.tail = Some(index);
    }

    /// Unlink and return the head node
    ///
    /// The node is left allocated; the caller releases it.
    pub fn pop_front<const N: usize>(&mut self, map: &mut TxBufferMap<N>) -> Option<usize> {
        let index = self.head?;
        let node = map.node_mut(index);
        self.head = node.next.take();
        if self.head.is_none() {
            self.tail = None;
        }
        Some(index)
    }

    /// Release every queued node and empty the queue
    ///
    /// Returns the number of nodes released. No confirmation is produced.
    pub fn flush<const N: usize>(&mut self, map: &mut TxBufferMap<N>) -> usize {
        let mut released = 0;
        let mut cursor = self.head;
        while let Some(index) = cursor {
            // A queue can never hold more nodes than the map has slots.
            if released == N {
                break;
            }
            let node = map.node_mut(index);
            cursor = node.next;
            node.release();
            released += 1;
        }
        self.head = None;
        self.tail = None;
        released
    }

    /// Iterate queued node indices from head to tail
    pub fn iter<'a, const N: usize>(&self, map: &'a TxBufferMap<N>) -> Iter<'a, N> {
        Iter {
            map,
            cursor: self.head,
            remaining: N,
        }
    }

    /// Number of queued nodes
    pub fn len<const N: usize>(&self, map: &TxBufferMap<N>) -> usize {
        self.iter(map).count()
    }
}

/// Iterator over a [`TxQueue`]
pub struct Iter<'a, const N: usize> {
    map: &'a TxBufferMap<N>,
    cursor: Option<usize>,
    remaining: usize,
}

impl<const N: usize> Iterator for Iter<'_, N> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.cursor?;
        self.remaining -= 1;
        self.cursor = self.map.node(index).next;
        Some(index)
    }
}
