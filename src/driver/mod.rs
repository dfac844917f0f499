//! Core driver components for the S32K3 GMAC.
//!
//! - [`config`] - Controller configuration and builder methods
//! - [`error`] - Error types and result aliases
//! - [`types`] - Value types shared by the driver surface
//! - [`eth`] - The driver instance, controller state and mode
//! - [`tx`] - Buffer provisioning, frame dispatch and confirmation
//! - [`rx`] - Frame reception
//!
//! # Example
//!
//! ```ignore
//! use s32k3_gmac::driver::{ControllerConfig, EthConfig};
//!
//! let config = EthConfig::<1>::uniform(
//!     ControllerConfig::new()
//!         .with_mac_address([0x02, 0x00, 0x00, 0x00, 0x00, 0x01])
//!         .with_tx_fifos(2)
//!         .with_priority_fifo(7, 1),
//! );
//! ```

// Submodules
pub mod config;
pub mod error;
pub mod eth;
pub mod rx;
pub mod tx;
pub mod types;

// Re-exports for convenience
pub use config::{ControllerConfig, DemEvents, EthConfig};
pub use error::{
    BufferError, BufferResult, ConfigError, ConfigResult, Error, IoError, IoResult, Result,
};
pub use eth::{Eth, EthDefault, EthLarge, EthSmall};
pub use tx::TxBuffer;
pub use types::{
    ApiId, BufferHandle, ControllerMode, ControllerState, FrameType, MacAddress, RxStatus,
    TimeStamp, TxBufferState, TxResult,
};
