//! Upper-layer and diagnostic interfaces
//!
//! The driver reports upward through two traits:
//!
//! - [`EthIf`]: frame reception, transmit confirmation and controller mode
//!   indications for the Ethernet interface layer
//! - [`DiagnosticSink`]: development errors, runtime errors and DEM event
//!   status (the DET/DEM collaborators)
//!
//! Both are called synchronously from the context that invoked the driver,
//! which for the confirmation and receive paths is usually an ISR.

use crate::driver::error::{ConfigError, IoError};
use crate::driver::types::{
    ApiId, BufferHandle, ControllerMode, FrameType, MacAddress, TimeStamp, TxResult,
};

/// Received frame as handed to [`EthIf::rx_indication`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RxIndication<'a> {
    /// Controller index
    pub ctrl: u8,
    /// RX FIFO the frame arrived on
    pub fifo: u8,
    /// EtherType from the header
    pub frame_type: FrameType,
    /// Destination was FF:FF:FF:FF:FF:FF
    pub is_broadcast: bool,
    /// Source MAC from the header
    pub src: MacAddress,
    /// Bytes following the 14-byte header
    pub payload: &'a [u8],
    /// Ingress timestamp, when the MAC captured one
    pub timestamp: Option<TimeStamp>,
}

/// Retired TX buffer as handed to [`EthIf::tx_confirmation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxConfirmation {
    /// Controller index
    pub ctrl: u8,
    /// Buffer that left the hardware pipeline
    pub handle: BufferHandle,
    /// Transmission outcome
    pub result: TxResult,
    /// Egress timestamp, when one was requested and captured
    pub timestamp: Option<TimeStamp>,
}

/// Ethernet interface layer notified by the driver
pub trait EthIf {
    /// A valid frame was received
    fn rx_indication(&mut self, frame: &RxIndication<'_>);

    /// A buffer transmitted with confirmation requested was retired
    fn tx_confirmation(&mut self, confirmation: &TxConfirmation);

    /// A controller changed mode
    fn ctrl_mode_indication(&mut self, ctrl: u8, mode: ControllerMode);
}

// =============================================================================
// Diagnostics
// =============================================================================

/// DEM event identifier from the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DemEventId(pub u16);

/// Status reported for a DEM event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DemEventStatus {
    /// Monitor passed
    Passed,
    /// Monitor failed
    Failed,
    /// Monitor pre-failed (debouncing)
    PreFailed,
}

/// Sink for development errors, runtime errors and DEM events
///
/// Every method has an empty default so implementors pick what they record.
pub trait DiagnosticSink {
    /// A call was rejected for a configuration or sequencing error
    fn report_development_error(&mut self, _ctrl: u8, _api: ApiId, _error: ConfigError) {}

    /// A hardware or communication error occurred at runtime
    fn report_runtime_error(&mut self, _ctrl: u8, _api: ApiId, _error: IoError) {}

    /// A DEM monitor result
    fn report_dem_event(&mut self, _event: DemEventId, _status: DemEventStatus) {}
}

/// Diagnostic sink that discards every report
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDiagnostics;

impl DiagnosticSink for NoDiagnostics {}
