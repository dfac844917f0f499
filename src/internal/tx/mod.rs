//! TX bookkeeping: the buffer index map and the per-FIFO request queues.
//!
//! # Architecture
//!
//! - [`TxBufferMap`]: fixed arena of nodes addressed by buffer handle
//! - [`TxQueue`]: head/tail links of one FIFO, threaded through the arena
//!
//! Producers (application context) only append at a queue's tail; the
//! consumer (confirmation ISR) only removes at its head. Callers sharing a
//! driver between both contexts serialize access, e.g. with
//! `sync::SharedEth`.

mod map;
mod queue;

pub use map::TxBufferMap;
pub use queue::TxQueue;
