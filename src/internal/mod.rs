//! Internal Implementation Details
//!
//! This module contains implementation details that are not part of the public API.
//!
//! # Contents
//!
//! - [`constants`]: Frame layout and sizing constants
//! - [`frame`]: Ethernet II header codec
//! - [`tx`]: Buffer index map and per-FIFO request queues
//!
//! # Stability
//!
//! **WARNING:** This module is `pub(crate)` only. Do not depend on any types
//! or functions in this module from external code.

pub(crate) mod constants;
pub(crate) mod frame;
pub(crate) mod tx;
