//! Value types shared across the driver surface.

use super::error::ConfigError;

/// 48-bit MAC address
pub type MacAddress = [u8; 6];

/// EtherType carried in bytes 12..14 of the Ethernet header
pub type FrameType = u16;

/// Opaque identifier of a hardware TX buffer slot.
///
/// Handles are issued by the hardware layer and index the per-controller
/// buffer map directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BufferHandle(u32);

impl BufferHandle {
    /// Wrap a raw handle value
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw handle value
    #[inline(always)]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Position in the buffer map
    #[inline(always)]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Lifecycle position of a TX buffer slot in the buffer map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxBufferState {
    /// Slot not allocated
    #[default]
    Free,
    /// Reserved by `provide_tx_buffer`, owned by the caller for filling
    Provided {
        /// Granted length including the header region
        len: usize,
    },
    /// Enqueued on its FIFO and handed (or about to be handed) to DMA
    InFlight,
}

impl TxBufferState {
    /// True unless the slot is free
    #[inline]
    pub const fn is_allocated(self) -> bool {
        !matches!(self, TxBufferState::Free)
    }
}

/// Controller initialization state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerState {
    /// `init` has not completed for this controller
    #[default]
    Uninit,
    /// Controller configured and ready for mode changes
    Init,
}

/// Controller communication mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerMode {
    /// Transmitter and receiver disabled
    #[default]
    Down,
    /// Transmitter, receiver and DMA enabled
    Active,
}

impl TryFrom<u8> for ControllerMode {
    type Error = ConfigError;

    /// Decode the raw `Eth_ModeType` value (0 = DOWN, 1 = ACTIVE)
    fn try_from(raw: u8) -> Result<Self, ConfigError> {
        match raw {
            0 => Ok(ControllerMode::Down),
            1 => Ok(ControllerMode::Active),
            _ => Err(ConfigError::InvalidMode),
        }
    }
}

/// Outcome of a single `receive` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RxStatus {
    /// One frame was processed and the FIFO is now empty
    Received,
    /// One frame was processed and more are pending
    ReceivedMoreDataAvailable,
    /// The FIFO held no frame
    NotReceived,
}

impl RxStatus {
    /// True when a frame was taken from the FIFO
    #[inline]
    pub const fn is_received(self) -> bool {
        !matches!(self, RxStatus::NotReceived)
    }
}

/// Result passed with a transmit confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxResult {
    /// Frame left the MAC
    Ok,
    /// DMA reported an error for the frame
    Failed,
}

/// Hardware time value (IEEE 1588 layout)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeStamp {
    /// Upper 16 bits of the 48-bit seconds field
    pub seconds_hi: u16,
    /// Lower 32 bits of the seconds field
    pub seconds: u32,
    /// Nanoseconds within the second
    pub nanoseconds: u32,
}

/// Driver entry point identifiers used when reporting errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ApiId {
    /// `init`
    Init,
    /// `set_controller_mode`
    SetControllerMode,
    /// `controller_mode`
    GetControllerMode,
    /// `physical_address`
    GetPhysAddr,
    /// `set_physical_address`
    SetPhysAddr,
    /// `provide_tx_buffer`
    ProvideTxBuffer,
    /// `transmit`
    Transmit,
    /// `send_frame` / `send_multi_buffer_frame`
    SendFrame,
    /// `receive`
    Receive,
    /// `tx_confirmation` / `report_transmission`
    TxConfirmation,
    /// `enable_egress_timestamp`
    EnableEgressTimeStamp,
    /// `current_time`
    GetCurrentTime,
    /// `main_function`
    MainFunction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_handle_index_matches_raw() {
        let handle = BufferHandle::new(7);
        assert_eq!(handle.raw(), 7);
        assert_eq!(handle.index(), 7);
    }

    #[test]
    fn controller_defaults_are_uninit_and_down() {
        assert_eq!(ControllerState::default(), ControllerState::Uninit);
        assert_eq!(ControllerMode::default(), ControllerMode::Down);
    }

    #[test]
    fn controller_mode_from_raw() {
        assert_eq!(ControllerMode::try_from(0), Ok(ControllerMode::Down));
        assert_eq!(ControllerMode::try_from(1), Ok(ControllerMode::Active));
        assert_eq!(ControllerMode::try_from(2), Err(ConfigError::InvalidMode));
    }

    #[test]
    fn rx_status_is_received() {
        assert!(RxStatus::Received.is_received());
        assert!(RxStatus::ReceivedMoreDataAvailable.is_received());
        assert!(!RxStatus::NotReceived.is_received());
    }

    #[test]
    fn timestamps_order_by_seconds_then_nanoseconds() {
        let a = TimeStamp {
            seconds_hi: 0,
            seconds: 1,
            nanoseconds: 999,
        };
        let b = TimeStamp {
            seconds_hi: 0,
            seconds: 2,
            nanoseconds: 0,
        };
        assert!(a < b);
    }
}
