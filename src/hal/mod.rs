//! Hardware abstraction contract
//!
//! The driver core never touches GMAC or DMA registers. Everything it needs
//! from the hardware (descriptor-ring buffers, DMA submission, controller
//! enable/disable, completion and receive queries) goes through the
//! [`EthHardware`] trait, which a register-level IP layer implements.
//!
//! # Contract
//!
//! - Buffer handles returned by [`EthHardware::provide_tx_buffer`] are
//!   smaller than the buffer capacity the driver instance was built with, and
//!   a handle is not handed out again until its buffer completed or was
//!   returned with [`EthHardware::release_tx_buffer`].
//! - Completion is queried per handle with [`EthHardware::tx_status`]; the
//!   driver retires buffers strictly in submission order per FIFO.
//! - A frame returned by [`EthHardware::receive_frame`] stays valid until
//!   [`EthHardware::release_rx_frame`] is called for the same FIFO.
//!
//! # Example
//!
//! ```ignore
//! struct S32k3Gmac { /* register blocks, descriptor rings */ }
//!
//! impl EthHardware for S32k3Gmac {
//!     fn enable_controller(&mut self, ctrl: u8) -> IoResult<()> {
//!         self.regs(ctrl).start_dma();
//!         self.regs(ctrl).enable_mac();
//!         Ok(())
//!     }
//!     // ...
//! }
//! ```

use crate::driver::config::ControllerConfig;
use crate::driver::error::{BufferResult, IoResult};
use crate::driver::types::{BufferHandle, ControllerMode, MacAddress, TimeStamp};

/// Buffer granted by the hardware layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TxAllocation {
    /// Slot identifier
    pub handle: BufferHandle,
    /// Usable buffer length including the Ethernet header region
    pub len: usize,
}

/// Completion state of a submitted TX buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxCompletion {
    /// Still owned by DMA
    Pending,
    /// Transmitted
    Done,
    /// Released by DMA with an error
    Failed,
}

/// Frame delivered by the hardware receive ring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RxFrame<'a> {
    /// Complete frame bytes starting at the destination MAC (no FCS)
    pub data: &'a [u8],
    /// DMA reported an integrity error (CRC, overflow, runt)
    pub has_error: bool,
    /// Further frames are waiting in the same FIFO
    pub more_available: bool,
    /// Ingress timestamp captured by the MAC
    pub timestamp: Option<TimeStamp>,
}

/// Register-level collaborator of the driver core
pub trait EthHardware {
    /// Apply the controller configuration and reset its descriptor rings
    fn init_controller(&mut self, ctrl: u8, config: &ControllerConfig) -> IoResult<()>;

    /// True when the controller's registers respond
    fn check_access(&self, ctrl: u8) -> bool;

    /// Enable MAC transmitter/receiver and start DMA
    fn enable_controller(&mut self, ctrl: u8) -> IoResult<()>;

    /// Stop DMA and disable MAC transmitter/receiver
    fn disable_controller(&mut self, ctrl: u8) -> IoResult<()>;

    /// Mode the hardware is currently in
    fn controller_mode(&self, ctrl: u8) -> ControllerMode;

    /// Station address programmed in the MAC
    fn physical_address(&self, ctrl: u8) -> MacAddress;

    /// Program the station address
    fn set_physical_address(&mut self, ctrl: u8, addr: &MacAddress);

    /// Reserve a descriptor buffer of at least `len` bytes on a TX FIFO
    ///
    /// The granted length may be smaller than requested.
    fn provide_tx_buffer(&mut self, ctrl: u8, fifo: u8, len: usize)
    -> BufferResult<TxAllocation>;

    /// Return a reserved buffer that will never be submitted
    ///
    /// Called when the driver refuses a grant (too short, or its memory is
    /// unavailable). The slot must become available to `provide_tx_buffer`
    /// again.
    fn release_tx_buffer(&mut self, ctrl: u8, handle: BufferHandle);

    /// Memory of a reserved buffer, `None` for an unknown handle
    fn tx_buffer(&mut self, ctrl: u8, handle: BufferHandle) -> Option<&mut [u8]>;

    /// Hand a filled buffer of `len` bytes to DMA
    ///
    /// `end_of_frame` is false for all but the last buffer of a multi-buffer
    /// frame; DMA is only kicked once the last buffer arrives.
    fn transmit(
        &mut self,
        ctrl: u8,
        fifo: u8,
        handle: BufferHandle,
        len: usize,
        end_of_frame: bool,
    ) -> IoResult<()>;

    /// Completion state of a submitted buffer
    fn tx_status(&self, ctrl: u8, fifo: u8, handle: BufferHandle) -> TxCompletion;

    /// Arm egress timestamp capture for a buffer
    fn enable_egress_timestamp(&mut self, _ctrl: u8, _handle: BufferHandle) {}

    /// Egress timestamp captured for a completed buffer
    fn egress_timestamp(&self, _ctrl: u8, _fifo: u8, _handle: BufferHandle) -> Option<TimeStamp> {
        None
    }

    /// Current value of the controller's PTP clock
    fn current_time(&self, _ctrl: u8) -> Option<TimeStamp> {
        None
    }

    /// Next received frame of an RX FIFO, if any
    fn receive_frame(&mut self, ctrl: u8, fifo: u8) -> Option<RxFrame<'_>>;

    /// Return the frame obtained by `receive_frame` to the RX ring
    fn release_rx_frame(&mut self, ctrl: u8, fifo: u8);
}
