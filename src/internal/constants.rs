//! Centralized Constants
//!
//! This module provides a single source of truth for the frame dimensions,
//! queue limits, and sizing defaults used throughout the GMAC driver.
//!
//! # Organization
//!
//! - **Frame sizes**: Ethernet header layout and length limits
//! - **Priorities**: VLAN priority range used for FIFO selection
//! - **Default configurations**: Default controller/FIFO/buffer counts

// =============================================================================
// Frame Layout
// =============================================================================

/// MAC address length in bytes
pub const MAC_ADDR_LEN: usize = 6;

/// Ethernet header size (dst MAC + src MAC + EtherType)
pub const ETH_HEADER_SIZE: usize = 14;

/// Offset of the destination MAC address within the header
pub const DST_MAC_OFFSET: usize = 0;

/// Offset of the source MAC address within the header
pub const SRC_MAC_OFFSET: usize = 6;

/// Offset of the big-endian EtherType within the header
pub const ETHER_TYPE_OFFSET: usize = 12;

/// Largest frame length expressible in the 16-bit length field
pub const MAX_FRAME_LENGTH: usize = u16::MAX as usize;

/// Largest payload that may be requested from `provide_tx_buffer`
pub const MAX_PAYLOAD_LENGTH: usize = MAX_FRAME_LENGTH - ETH_HEADER_SIZE;

/// Broadcast destination address
pub const BROADCAST_ADDR: [u8; MAC_ADDR_LEN] = [0xFF; MAC_ADDR_LEN];

// =============================================================================
// Priorities
// =============================================================================

/// Number of VLAN priority levels (PCP values 0-7)
pub const VLAN_PRIORITY_COUNT: usize = 8;

// =============================================================================
// Default Configurations
// =============================================================================

/// Default locally administered MAC address
pub const DEFAULT_MAC_ADDR: [u8; MAC_ADDR_LEN] = [0x02, 0x00, 0x00, 0x12, 0x34, 0x56];

/// Default number of hardware TX FIFOs per controller
pub const DEFAULT_TX_FIFOS: usize = 2;

/// Default number of TX buffers tracked per controller
pub const DEFAULT_TX_BUFFERS: usize = 16;

/// Upper bound on frames drained by one RX interrupt
pub const RX_DRAIN_LIMIT: usize = 64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_limit_leaves_room_for_header() {
        assert_eq!(MAX_PAYLOAD_LENGTH + ETH_HEADER_SIZE, 65535);
    }

    #[test]
    fn header_offsets_are_contiguous() {
        assert_eq!(SRC_MAC_OFFSET, DST_MAC_OFFSET + MAC_ADDR_LEN);
        assert_eq!(ETHER_TYPE_OFFSET, SRC_MAC_OFFSET + MAC_ADDR_LEN);
        assert_eq!(ETH_HEADER_SIZE, ETHER_TYPE_OFFSET + 2);
    }
}
