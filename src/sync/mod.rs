//! Interrupt-safe sharing of a driver instance
//!
//! The TX request queues are appended to from application context and
//! retired from the TX interrupt. [`SharedEth`] runs both sides inside a
//! critical section, which orders every queue append before the interrupt
//! handler that observes it.
//!
//! # Feature Flags
//!
//! - `critical-section`: Enables this module
//!
//! # Example
//!
//! ```ignore
//! use s32k3_gmac::sync::SharedEth;
//!
//! static ETH: SharedEth<Gmac, EthIfLayer, NoDiagnostics, 1, 2, 16> =
//!     SharedEth::new(Eth::new(Gmac::new(), EthIfLayer::new(), NoDiagnostics));
//!
//! fn main() {
//!     ETH.with(|eth| {
//!         eth.init(EthConfig::default()).unwrap();
//!         eth.set_controller_mode(0, ControllerMode::Active).unwrap();
//!     });
//! }
//!
//! #[interrupt]
//! fn GMAC0_CH0_TX() {
//!     ETH.on_tx_interrupt(0, 0);
//! }
//! ```

mod shared;

pub use shared::SharedEth;
