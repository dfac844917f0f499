//! Ethernet II header codec.

use super::constants::{
    BROADCAST_ADDR, DST_MAC_OFFSET, ETH_HEADER_SIZE, ETHER_TYPE_OFFSET, MAC_ADDR_LEN,
    SRC_MAC_OFFSET,
};
use crate::driver::types::{FrameType, MacAddress};

/// Write destination, source and big-endian EtherType into `buf[..14]`.
///
/// Returns `false` and leaves `buf` untouched when it is shorter than a header.
pub fn write_header(
    buf: &mut [u8],
    dst: &MacAddress,
    src: &MacAddress,
    frame_type: FrameType,
) -> bool {
    let Some(header) = buf.get_mut(..ETH_HEADER_SIZE) else {
        return false;
    };
    header[DST_MAC_OFFSET..DST_MAC_OFFSET + MAC_ADDR_LEN].copy_from_slice(dst);
    header[SRC_MAC_OFFSET..SRC_MAC_OFFSET + MAC_ADDR_LEN].copy_from_slice(src);
    header[ETHER_TYPE_OFFSET..ETH_HEADER_SIZE].copy_from_slice(&frame_type.to_be_bytes());
    true
}

/// Fields of a received Ethernet header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedFrame<'a> {
    /// EtherType
    pub frame_type: FrameType,
    /// Destination is the broadcast address
    pub is_broadcast: bool,
    /// Source MAC
    pub src: MacAddress,
    /// Bytes after the header
    pub payload: &'a [u8],
}

/// Split a frame into header fields and payload, `None` for runts.
pub fn parse(frame: &[u8]) -> Option<ParsedFrame<'_>> {
    if frame.len() < ETH_HEADER_SIZE {
        return None;
    }
    let (header, payload) = frame.split_at(ETH_HEADER_SIZE);

    let mut src = [0u8; MAC_ADDR_LEN];
    src.copy_from_slice(&header[SRC_MAC_OFFSET..SRC_MAC_OFFSET + MAC_ADDR_LEN]);

    Some(ParsedFrame {
        frame_type: u16::from_be_bytes([header[ETHER_TYPE_OFFSET], header[ETHER_TYPE_OFFSET + 1]]),
        is_broadcast: header[DST_MAC_OFFSET..DST_MAC_OFFSET + MAC_ADDR_LEN] == BROADCAST_ADDR,
        src,
        payload,
    })
}
