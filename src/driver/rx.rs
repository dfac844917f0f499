//! Receive path.
//!
//! Frames are pulled from the hardware RX ring one at a time, parsed and
//! forwarded to the upper layer. The ring slot is returned to the hardware
//! after every frame, including frames dropped for errors.

use super::error::{ConfigError, IoError, Result};
use super::eth::Eth;
use super::types::{ApiId, RxStatus};
use crate::ethif::{DiagnosticSink, EthIf, RxIndication};
use crate::hal::EthHardware;
use crate::internal::constants::RX_DRAIN_LIMIT;
use crate::internal::frame;

impl<H, U, D, const CTRLS: usize, const FIFOS: usize, const BUFS: usize>
    Eth<H, U, D, CTRLS, FIFOS, BUFS>
where
    H: EthHardware,
    U: EthIf,
    D: DiagnosticSink,
{
    /// Process at most one received frame of an RX FIFO
    ///
    /// A valid frame is indicated to the upper layer with its EtherType,
    /// broadcast flag, source address and payload. A frame flagged with a DMA
    /// error, or shorter than an Ethernet header, is dropped and reported as
    /// a runtime error. Either way the frame is released back to the ring.
    ///
    /// # Errors
    /// - `InvalidController` / `Uninit` / `InvalidMode` - controller not active
    /// - `InvalidParam` - unknown RX FIFO
    pub fn receive(&mut self, ctrl: u8, fifo: u8) -> Result<RxStatus> {
        let api = ApiId::Receive;
        let idx = self.gate(ctrl, api, true)?;
        if fifo >= self.controllers[idx].config.rx_fifo_count {
            return Err(self.dev_error(ctrl, api, ConfigError::InvalidParam));
        }

        let (status, valid) = {
            let Some(rx) = self.hw.receive_frame(ctrl, fifo) else {
                return Ok(RxStatus::NotReceived);
            };
            let status = if rx.more_available {
                RxStatus::ReceivedMoreDataAvailable
            } else {
                RxStatus::Received
            };

            let parsed = if rx.has_error { None } else { frame::parse(rx.data) };
            if let Some(parsed) = parsed {
                self.upper.rx_indication(&RxIndication {
                    ctrl,
                    fifo,
                    frame_type: parsed.frame_type,
                    is_broadcast: parsed.is_broadcast,
                    src: parsed.src,
                    payload: parsed.payload,
                    timestamp: rx.timestamp,
                });
            }
            (status, parsed.is_some())
        };

        if !valid {
            #[cfg(feature = "log")]
            log::warn!("eth{}: dropped errored frame on RX FIFO {}", ctrl, fifo);

            self.runtime_error(ctrl, api, IoError::FrameError);
        }

        self.hw.release_rx_frame(ctrl, fifo);
        Ok(status)
    }

    /// RX interrupt entry point
    ///
    /// Drains the FIFO until it is empty or `RX_DRAIN_LIMIT` frames were
    /// processed. An interrupt for an unusable controller or FIFO is ignored.
    /// Returns the number of frames taken from the ring.
    pub fn rx_irq_handler(&mut self, ctrl: u8, fifo: u8) -> usize {
        let usable = self
            .ready(ctrl, true)
            .is_ok_and(|idx| fifo < self.controllers[idx].config.rx_fifo_count);
        if !usable {
            return 0;
        }

        let mut taken = 0;
        while taken < RX_DRAIN_LIMIT {
            match self.receive(ctrl, fifo) {
                Ok(RxStatus::ReceivedMoreDataAvailable) => taken += 1,
                Ok(RxStatus::Received) => return taken + 1,
                _ => break,
            }
        }
        taken
    }
}
