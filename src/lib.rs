//! S32K3 GMAC Driver Core
//!
//! A `no_std`, `no_alloc` Ethernet driver core for the GMAC controllers of the
//! NXP S32K3 family, shaped after the AUTOSAR `Eth` module.
//!
//! The crate owns the parts of the driver that do not touch registers: TX
//! buffer bookkeeping, per-FIFO request queues, frame dispatch and
//! confirmation, the receive path and controller state/mode handling.
//! Register access is delegated to an [`EthHardware`] implementation.
//!
//! # Architecture
//!
//! 1. **Driver** ([`driver`]): the [`Eth`] instance with its lifecycle, TX
//!    engine and RX path
//! 2. **Upper layer** ([`ethif`]): [`EthIf`] notifications and the
//!    [`DiagnosticSink`] for development/runtime errors and DEM events
//! 3. **Hardware layer** ([`hal`]): the [`EthHardware`] contract
//!
//! ## TX path
//!
//! ```text
//! provide_tx_buffer ──> transmit ──> [FIFO request queue] ──> report_transmission
//!        │                  │                                        │
//!   hw buffer alloc    header + DMA submit              EthIf::tx_confirmation
//! ```
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting for public types and `defmt` logging
//! - `log`: Enable `log` facade diagnostics
//! - `critical-section`: Enable ISR-safe `SharedEth` wrapper
//!
//! # Example
//!
//! ```ignore
//! use s32k3_gmac::{ControllerConfig, ControllerMode, Eth, EthConfig, NoDiagnostics};
//!
//! let mut eth: Eth<Gmac, EthIfLayer, NoDiagnostics, 1, 2, 16> =
//!     Eth::new(Gmac::take(), EthIfLayer::new(), NoDiagnostics);
//!
//! let config = ControllerConfig::new()
//!     .with_mac_address([0x02, 0x00, 0x00, 0x12, 0x34, 0x56])
//!     .with_tx_fifos(2)
//!     .with_priority_fifo(6, 1)
//!     .with_priority_fifo(7, 1);
//!
//! eth.init(EthConfig::uniform(config)).unwrap();
//! eth.set_controller_mode(0, ControllerMode::Active).unwrap();
//!
//! let mut buf = eth.provide_tx_buffer(0, 7, 46).unwrap();
//! buf.fill(0);
//! let handle = buf.handle();
//! eth.transmit(0, handle, 0x88F7, true, 46, &[0x01, 0x80, 0xC2, 0x00, 0x00, 0x0E])
//!     .unwrap();
//!
//! // From the TX interrupt
//! eth.tx_irq_handler(0, 1);
//! ```

#![no_std]
#![deny(missing_docs)]
#![forbid(unsafe_code)]
// Clippy lint levels mirror the [lints] table in Cargo.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements,
    clippy::let_underscore_future
)]

// =============================================================================
// Modules
// =============================================================================

pub mod driver;
pub mod ethif;
pub mod hal;

// Internal implementation details (pub(crate) only)
mod internal;

#[cfg(feature = "critical-section")]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

// Test utilities (only available during testing)
#[cfg(test)]
mod test_utils;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::config::{ControllerConfig, DemEvents, EthConfig};
pub use driver::error::{
    BufferError, BufferResult, ConfigError, ConfigResult, Error, IoError, IoResult, Result,
};
pub use driver::eth::{Eth, EthDefault, EthLarge, EthSmall};
pub use driver::tx::TxBuffer;
pub use driver::types::{
    ApiId, BufferHandle, ControllerMode, ControllerState, FrameType, MacAddress, RxStatus,
    TimeStamp, TxBufferState, TxResult,
};
pub use ethif::{
    DemEventId, DemEventStatus, DiagnosticSink, EthIf, NoDiagnostics, RxIndication,
    TxConfirmation,
};
pub use hal::{EthHardware, RxFrame, TxAllocation, TxCompletion};

// Re-export sync types when critical-section is enabled
#[cfg(feature = "critical-section")]
pub use sync::SharedEth;

/// Shared driver constants.
///
/// These are grouped into a dedicated module to keep the top-level facade
/// focused on driver types.
pub mod constants {
    pub use crate::internal::constants::{
        // Frame layout
        BROADCAST_ADDR,
        // Defaults
        DEFAULT_MAC_ADDR,
        DEFAULT_TX_BUFFERS,
        DEFAULT_TX_FIFOS,
        ETH_HEADER_SIZE,
        MAC_ADDR_LEN,
        MAX_FRAME_LENGTH,
        MAX_PAYLOAD_LENGTH,
        // Limits
        RX_DRAIN_LIMIT,
        VLAN_PRIORITY_COUNT,
    };
}
