//! Configuration types for the S32K3 GMAC driver

use super::error::{ConfigError, ConfigResult};
use super::types::MacAddress;
use crate::ethif::DemEventId;
use crate::internal::constants::{DEFAULT_MAC_ADDR, VLAN_PRIORITY_COUNT};

/// DEM events bound to a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DemEvents {
    /// Raised when the controller registers cannot be accessed
    pub access: Option<DemEventId>,
}

/// Static configuration of one GMAC controller
///
/// Immutable once handed to [`Eth::init`](crate::Eth::init).
///
/// # Example
///
/// ```ignore
/// let config = ControllerConfig::new()
///     .with_mac_address([0x02, 0x00, 0x00, 0x00, 0x00, 0x01])
///     .with_tx_fifos(2)
///     .with_priority_fifo(7, 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerConfig {
    /// MAC address programmed at init
    pub mac_address: MacAddress,
    /// Number of TX FIFOs (hardware TX queues)
    pub tx_fifo_count: u8,
    /// Number of RX FIFOs (hardware RX queues)
    pub rx_fifo_count: u8,
    /// VLAN priority (PCP) to TX FIFO mapping
    pub priority_to_fifo: [u8; VLAN_PRIORITY_COUNT],
    /// Egress timestamping may be requested on TX buffers
    pub egress_timestamps: bool,
    /// DEM event bindings
    pub dem: DemEvents,
}

impl ControllerConfig {
    /// Single TX/RX FIFO, every priority on FIFO 0, default MAC address.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mac_address: DEFAULT_MAC_ADDR,
            tx_fifo_count: 1,
            rx_fifo_count: 1,
            priority_to_fifo: [0; VLAN_PRIORITY_COUNT],
            egress_timestamps: false,
            dem: DemEvents { access: None },
        }
    }

    /// Set the MAC address
    #[must_use]
    pub const fn with_mac_address(mut self, addr: MacAddress) -> Self {
        self.mac_address = addr;
        self
    }

    /// Set the number of TX FIFOs
    #[must_use]
    pub const fn with_tx_fifos(mut self, count: u8) -> Self {
        self.tx_fifo_count = count;
        self
    }

    /// Set the number of RX FIFOs
    #[must_use]
    pub const fn with_rx_fifos(mut self, count: u8) -> Self {
        self.rx_fifo_count = count;
        self
    }

    /// Route one VLAN priority to a TX FIFO
    ///
    /// Out-of-range priorities are ignored here and rejected at use.
    #[must_use]
    pub const fn with_priority_fifo(mut self, priority: u8, fifo: u8) -> Self {
        if (priority as usize) < VLAN_PRIORITY_COUNT {
            self.priority_to_fifo[priority as usize] = fifo;
        }
        self
    }

    /// Replace the whole priority table
    #[must_use]
    pub const fn with_priority_map(mut self, map: [u8; VLAN_PRIORITY_COUNT]) -> Self {
        self.priority_to_fifo = map;
        self
    }

    /// Allow egress timestamp requests
    #[must_use]
    pub const fn with_egress_timestamps(mut self, enable: bool) -> Self {
        self.egress_timestamps = enable;
        self
    }

    /// Bind the DEM access event
    #[must_use]
    pub const fn with_access_event(mut self, event: DemEventId) -> Self {
        self.dem.access = Some(event);
        self
    }

    /// TX FIFO serving a VLAN priority, `None` for priorities above 7
    #[inline]
    pub fn fifo_for_priority(&self, priority: u8) -> Option<u8> {
        self.priority_to_fifo.get(priority as usize).copied()
    }

    /// Check the configuration against the driver's FIFO capacity
    ///
    /// # Errors
    /// - `InvalidConfig` - FIFO count zero or above `max_fifos`, or a
    ///   priority mapped to a FIFO that does not exist
    pub fn validate(&self, max_fifos: usize) -> ConfigResult<()> {
        let tx = self.tx_fifo_count as usize;
        let rx = self.rx_fifo_count as usize;
        if tx == 0 || tx > max_fifos || rx == 0 || rx > max_fifos {
            return Err(ConfigError::InvalidConfig);
        }
        if self.priority_to_fifo.iter().any(|&fifo| fifo >= self.tx_fifo_count) {
            return Err(ConfigError::InvalidConfig);
        }
        Ok(())
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration of every controller owned by one driver instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthConfig<const CTRLS: usize> {
    /// Per-controller configuration, indexed by controller index
    pub controllers: [ControllerConfig; CTRLS],
}

impl<const CTRLS: usize> EthConfig<CTRLS> {
    /// Build from an explicit per-controller array
    #[must_use]
    pub const fn new(controllers: [ControllerConfig; CTRLS]) -> Self {
        Self { controllers }
    }

    /// Use the same configuration for every controller
    #[must_use]
    pub const fn uniform(config: ControllerConfig) -> Self {
        Self {
            controllers: [config; CTRLS],
        }
    }

    /// Validate every controller configuration
    ///
    /// # Errors
    /// - `InvalidConfig` - any controller fails [`ControllerConfig::validate`]
    pub fn validate(&self, max_fifos: usize) -> ConfigResult<()> {
        self.controllers
            .iter()
            .try_for_each(|c| c.validate(max_fifos))
    }
}

impl<const CTRLS: usize> Default for EthConfig<CTRLS> {
    fn default() -> Self {
        Self::uniform(ControllerConfig::new())
    }
}
