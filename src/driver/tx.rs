//! Transmit engine: buffer provisioning, frame dispatch and confirmation.
//!
//! A TX buffer moves through the buffer map as follows:
//!
//! ```text
//! Free --provide_tx_buffer--> Provided --transmit--> InFlight --confirmed--> Free
//!                                 |                     |
//!                                 +----- mode DOWN -----+----------------> Free
//! ```
//!
//! `transmit` appends the buffer to its FIFO's request queue *before* asking
//! the hardware to submit it. Confirmation walks each queue from the head and
//! retires buffers only while the hardware reports them complete, so
//! confirmations reach the upper layer in submission order per FIFO.
//!
//! # Concurrency
//!
//! Provisioning and transmission run in application context; confirmation
//! usually runs in the TX interrupt. Neither side locks: the caller must
//! serialize them (mask the TX interrupt, or wrap the driver in
//! `sync::SharedEth`) so that every queue append
//! happens-before the ISR observes the new tail.

use core::ops::{Deref, DerefMut};

use super::error::{BufferError, ConfigError, Error, IoError, Result};
use super::eth::Eth;
use super::types::{
    ApiId, BufferHandle, FrameType, MacAddress, TimeStamp, TxBufferState, TxResult,
};
use crate::ethif::{DiagnosticSink, EthIf, TxConfirmation};
use crate::hal::{EthHardware, TxCompletion};
use crate::internal::constants::{ETH_HEADER_SIZE, MAX_FRAME_LENGTH, MAX_PAYLOAD_LENGTH};
use crate::internal::frame;

/// Payload region of a provided TX buffer
///
/// Dereferences to the bytes following the reserved Ethernet header. Its
/// length is the granted payload length, which may be less than requested.
#[derive(Debug)]
pub struct TxBuffer<'a> {
    handle: BufferHandle,
    payload: &'a mut [u8],
}

impl TxBuffer<'_> {
    /// Handle to pass to [`Eth::transmit`]
    #[inline(always)]
    pub fn handle(&self) -> BufferHandle {
        self.handle
    }

    /// Granted payload length
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// True when no payload bytes were granted
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

impl Deref for TxBuffer<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.payload
    }
}

impl DerefMut for TxBuffer<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.payload
    }
}

impl<H, U, D, const CTRLS: usize, const FIFOS: usize, const BUFS: usize>
    Eth<H, U, D, CTRLS, FIFOS, BUFS>
where
    H: EthHardware,
    U: EthIf,
    D: DiagnosticSink,
{
    // =========================================================================
    // Buffer Provisioning
    // =========================================================================

    /// Reserve a TX buffer for a frame of the given VLAN priority
    ///
    /// The priority selects the TX FIFO through the controller's priority
    /// table. The hardware is asked for `len` payload bytes plus the 14-byte
    /// header; the returned buffer starts after the header region.
    ///
    /// Not reentrant per controller: concurrent calls must be serialized by
    /// the caller.
    ///
    /// # Errors
    /// - `InvalidController` / `Uninit` / `InvalidMode` - controller not active
    /// - `InvalidParam` - priority above 7
    /// - `Overflow` - `len` greater than `65535 - 14`, or granted buffer too small
    /// - `Busy` / `NotOk` - propagated from the hardware layer, or the handle
    ///   it returned is still in flight
    pub fn provide_tx_buffer(
        &mut self,
        ctrl: u8,
        priority: u8,
        len: usize,
    ) -> Result<TxBuffer<'_>> {
        let api = ApiId::ProvideTxBuffer;
        let idx = self.gate(ctrl, api, true)?;

        let Some(fifo) = self.controllers[idx].config.fifo_for_priority(priority) else {
            return Err(self.dev_error(ctrl, api, ConfigError::InvalidParam));
        };

        if len > MAX_PAYLOAD_LENGTH {
            return Err(BufferError::Overflow.into());
        }

        let alloc = self.hw.provide_tx_buffer(ctrl, fifo, len + ETH_HEADER_SIZE)?;
        if alloc.len < ETH_HEADER_SIZE {
            self.hw.release_tx_buffer(ctrl, alloc.handle);
            return Err(BufferError::Overflow.into());
        }

        if let Err(e) = self.controllers[idx]
            .buffers
            .allocate(alloc.handle, fifo, alloc.len)
        {
            #[cfg(feature = "log")]
            log::warn!(
                "eth{}: hardware returned handle {} which is still allocated",
                ctrl,
                alloc.handle.raw()
            );

            return Err(e.into());
        }

        let mapped = self
            .hw
            .tx_buffer(ctrl, alloc.handle)
            .is_some_and(|buf| buf.len() >= alloc.len);
        if !mapped {
            self.discard_grant(idx, ctrl, alloc.handle);
            return Err(BufferError::NotOk.into());
        }

        self.hw
            .tx_buffer(ctrl, alloc.handle)
            .and_then(|buf| buf.get_mut(ETH_HEADER_SIZE..alloc.len))
            .map(|payload| TxBuffer {
                handle: alloc.handle,
                payload,
            })
            .ok_or(Error::Buffer(BufferError::NotOk))
    }

    /// Undo a grant the driver recorded but cannot use
    fn discard_grant(&mut self, idx: usize, ctrl: u8, handle: BufferHandle) {
        if let Some(node) = self.controllers[idx].buffers.get_mut(handle) {
            node.release();
        }
        self.hw.release_tx_buffer(ctrl, handle);
    }

    /// Arm egress timestamp capture on a provided buffer
    ///
    /// The timestamp is delivered with the buffer's confirmation.
    ///
    /// # Errors
    /// - `InvalidController` / `Uninit` / `InvalidMode` - controller not active
    /// - `InvalidParam` - egress timestamps not enabled in the configuration
    /// - `InvalidBuffer` - handle not in the `Provided` state
    pub fn enable_egress_timestamp(&mut self, ctrl: u8, handle: BufferHandle) -> Result<()> {
        let api = ApiId::EnableEgressTimeStamp;
        let idx = self.gate(ctrl, api, true)?;

        if !self.controllers[idx].config.egress_timestamps {
            return Err(self.dev_error(ctrl, api, ConfigError::InvalidParam));
        }

        let armed = match self.controllers[idx].buffers.get_mut(handle) {
            Some(node) if matches!(node.state, TxBufferState::Provided { .. }) => {
                node.timestamp = true;
                true
            }
            _ => false,
        };
        if !armed {
            return Err(self.dev_error(ctrl, api, ConfigError::InvalidBuffer));
        }

        self.hw.enable_egress_timestamp(ctrl, handle);
        Ok(())
    }

    /// Current time of the controller's PTP clock
    ///
    /// # Errors
    /// - `InvalidController` / `Uninit` - controller not usable
    /// - `HardwareFailure` - the clock could not be read
    pub fn current_time(&mut self, ctrl: u8) -> Result<TimeStamp> {
        let api = ApiId::GetCurrentTime;
        self.gate(ctrl, api, false)?;
        match self.hw.current_time(ctrl) {
            Some(ts) => Ok(ts),
            None => Err(self.runtime_error(ctrl, api, IoError::HardwareFailure)),
        }
    }

    // =========================================================================
    // Transmission
    // =========================================================================

    /// Transmit a provided buffer
    ///
    /// Writes the Ethernet header (destination, own MAC address, big-endian
    /// EtherType) in front of the `len` payload bytes, appends the buffer to
    /// its FIFO's request queue and submits it to DMA.
    ///
    /// The buffer is queued before submission. If the hardware then rejects
    /// it, it stays queued and only leaves the queue on confirmation or on a
    /// transition to `Down`.
    ///
    /// # Errors
    /// - `InvalidController` / `Uninit` / `InvalidMode` - controller not active
    /// - `InvalidBuffer` - handle out of range or not in the `Provided` state
    /// - `InvalidParam` - `len` exceeds the granted payload length
    /// - `HardwareFailure` - buffer memory unavailable or DMA submission rejected
    pub fn transmit(
        &mut self,
        ctrl: u8,
        handle: BufferHandle,
        frame_type: FrameType,
        confirm: bool,
        len: usize,
        dest: &MacAddress,
    ) -> Result<()> {
        let api = ApiId::Transmit;
        let idx = self.gate(ctrl, api, true)?;

        let slot = self.controllers[idx]
            .buffers
            .get(handle)
            .map(|node| (node.fifo, node.state));
        let (fifo, granted) = match slot {
            Some((fifo, TxBufferState::Provided { len })) => (fifo, len),
            _ => return Err(self.dev_error(ctrl, api, ConfigError::InvalidBuffer)),
        };

        let Some(frame_len) = len
            .checked_add(ETH_HEADER_SIZE)
            .filter(|&n| n <= granted)
        else {
            return Err(self.dev_error(ctrl, api, ConfigError::InvalidParam));
        };

        let src = self.hw.physical_address(ctrl);
        let written = self
            .hw
            .tx_buffer(ctrl, handle)
            .is_some_and(|buf| frame::write_header(buf, dest, &src, frame_type));
        if !written {
            return Err(self.runtime_error(ctrl, api, IoError::HardwareFailure));
        }

        self.enqueue(idx, fifo, handle, confirm);

        self.hw
            .transmit(ctrl, fifo, handle, frame_len, true)
            .map_err(|e| self.runtime_error(ctrl, api, e))
    }

    /// Transmit a complete frame supplied by the caller
    ///
    /// `frame` must start with the Ethernet header. Returns the handle of the
    /// buffer the frame was copied into.
    ///
    /// # Errors
    /// See [`send_multi_buffer_frame`](Self::send_multi_buffer_frame).
    pub fn send_frame(
        &mut self,
        ctrl: u8,
        fifo: u8,
        frame: &[u8],
        confirm: bool,
    ) -> Result<BufferHandle> {
        self.send_multi_buffer_frame(ctrl, fifo, &[frame], confirm)
    }

    /// Transmit a frame split over several caller-supplied buffers
    ///
    /// Each segment is copied into its own hardware buffer, queued and
    /// submitted in order; only the last one ends the frame. Only the first
    /// buffer carries the confirmation request, so the upper layer sees one
    /// confirmation per frame. Returns the handle of the first buffer.
    ///
    /// A failure part-way through leaves the segments already submitted on
    /// the queue.
    ///
    /// # Errors
    /// - `InvalidController` / `Uninit` / `InvalidMode` - controller not active
    /// - `InvalidParam` - unknown FIFO, no segments, or first segment shorter
    ///   than a header
    /// - `Overflow` - a segment longer than 65535 bytes or than its buffer
    /// - `Busy` / `NotOk` - propagated from the hardware layer
    /// - `HardwareFailure` - DMA submission rejected
    pub fn send_multi_buffer_frame(
        &mut self,
        ctrl: u8,
        fifo: u8,
        buffers: &[&[u8]],
        confirm: bool,
    ) -> Result<BufferHandle> {
        let api = ApiId::SendFrame;
        let idx = self.gate(ctrl, api, true)?;

        let valid = fifo < self.controllers[idx].config.tx_fifo_count
            && buffers.first().is_some_and(|b| b.len() >= ETH_HEADER_SIZE);
        if !valid {
            return Err(self.dev_error(ctrl, api, ConfigError::InvalidParam));
        }
        if buffers.iter().any(|b| b.len() > MAX_FRAME_LENGTH) {
            return Err(BufferError::Overflow.into());
        }

        let last = buffers.len() - 1;
        let mut first = None;
        for (i, segment) in buffers.iter().enumerate() {
            let handle = self.stage_segment(idx, ctrl, fifo, segment)?;
            self.enqueue(idx, fifo, handle, confirm && i == 0);
            first.get_or_insert(handle);

            self.hw
                .transmit(ctrl, fifo, handle, segment.len(), i == last)
                .map_err(|e| self.runtime_error(ctrl, api, e))?;
        }
        first.ok_or(Error::Buffer(BufferError::NotOk))
    }

    /// Allocate a buffer for one segment and copy it in
    fn stage_segment(
        &mut self,
        idx: usize,
        ctrl: u8,
        fifo: u8,
        segment: &[u8],
    ) -> Result<BufferHandle> {
        let alloc = self.hw.provide_tx_buffer(ctrl, fifo, segment.len())?;
        if alloc.len < segment.len() {
            self.hw.release_tx_buffer(ctrl, alloc.handle);
            return Err(BufferError::Overflow.into());
        }
        self.controllers[idx]
            .buffers
            .allocate(alloc.handle, fifo, alloc.len)?;

        match self.hw.tx_buffer(ctrl, alloc.handle) {
            Some(buf) if buf.len() >= segment.len() => {
                buf[..segment.len()].copy_from_slice(segment);
                Ok(alloc.handle)
            }
            _ => {
                self.discard_grant(idx, ctrl, alloc.handle);
                Err(BufferError::NotOk.into())
            }
        }
    }

    /// Mark a buffer in flight and append it to its FIFO's queue
    fn enqueue(&mut self, idx: usize, fifo: u8, handle: BufferHandle, confirm: bool) {
        let c = &mut self.controllers[idx];
        if let Some(node) = c.buffers.get_mut(handle) {
            node.confirm = confirm;
            node.state = TxBufferState::InFlight;
            c.queues[fifo as usize].push_back(&mut c.buffers, handle.index());
        }
    }

    // =========================================================================
    // Confirmation
    // =========================================================================

    /// Retire completed buffers of one TX FIFO
    ///
    /// Walks the FIFO's request queue from the head while the hardware
    /// reports the head buffer complete; each retired buffer is released and,
    /// if requested, confirmed to the upper layer. Stops at the first buffer
    /// still owned by DMA. Returns the number of buffers retired.
    ///
    /// # Errors
    /// - `InvalidController` / `Uninit` / `InvalidMode` - controller not active
    /// - `InvalidParam` - unknown FIFO
    pub fn report_transmission(&mut self, ctrl: u8, fifo: u8) -> Result<usize> {
        let api = ApiId::TxConfirmation;
        let idx = self.gate(ctrl, api, true)?;
        if fifo >= self.controllers[idx].config.tx_fifo_count {
            return Err(self.dev_error(ctrl, api, ConfigError::InvalidParam));
        }
        Ok(self.retire_completed(idx, ctrl, fifo))
    }

    /// Retire completed buffers on every TX FIFO of a controller
    ///
    /// # Errors
    /// - `InvalidController` / `Uninit` / `InvalidMode` - controller not active
    pub fn tx_confirmation(&mut self, ctrl: u8) -> Result<usize> {
        let idx = self.gate(ctrl, ApiId::TxConfirmation, true)?;
        let fifos = self.controllers[idx].config.tx_fifo_count;
        Ok((0..fifos)
            .map(|fifo| self.retire_completed(idx, ctrl, fifo))
            .sum())
    }

    /// TX interrupt entry point
    ///
    /// Same as [`report_transmission`](Self::report_transmission), except that
    /// a spurious interrupt for an unusable controller or FIFO is ignored
    /// without reporting an error.
    pub fn tx_irq_handler(&mut self, ctrl: u8, fifo: u8) -> usize {
        match self.ready(ctrl, true) {
            Ok(idx) if fifo < self.controllers[idx].config.tx_fifo_count => {
                self.retire_completed(idx, ctrl, fifo)
            }
            _ => 0,
        }
    }

    fn retire_completed(&mut self, idx: usize, ctrl: u8, fifo: u8) -> usize {
        let mut retired = 0;
        while retired < BUFS {
            let Some(index) = self.controllers[idx].queues[fifo as usize].front() else {
                break;
            };
            let handle = BufferHandle::new(index as u32);

            let result = match self.hw.tx_status(ctrl, fifo, handle) {
                TxCompletion::Pending => break,
                TxCompletion::Done => TxResult::Ok,
                TxCompletion::Failed => TxResult::Failed,
            };

            let c = &mut self.controllers[idx];
            c.queues[fifo as usize].pop_front(&mut c.buffers);
            let node = *c.buffers.node(index);
            c.buffers.node_mut(index).release();
            retired += 1;

            if result == TxResult::Failed {
                self.runtime_error(ctrl, ApiId::TxConfirmation, IoError::HardwareFailure);
            }

            if node.confirm {
                let timestamp = if node.timestamp {
                    self.hw.egress_timestamp(ctrl, fifo, handle)
                } else {
                    None
                };
                self.upper.tx_confirmation(&TxConfirmation {
                    ctrl,
                    handle,
                    result,
                    timestamp,
                });
            }
        }
        retired
    }

    /// Drop every queued and provided buffer of a controller
    ///
    /// No confirmations are produced. Returns the number of buffers released.
    pub(super) fn flush_tx(&mut self, idx: usize) -> usize {
        let c = &mut self.controllers[idx];
        let mut released = 0;
        for queue in c.queues.iter_mut().filter(|q| !q.is_empty()) {
            released += queue.flush(&mut c.buffers);
        }
        released + c.buffers.release_provided()
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// State of a TX buffer slot, `None` for unknown controllers or handles
    pub fn tx_buffer_state(&self, ctrl: u8, handle: BufferHandle) -> Option<TxBufferState> {
        self.controllers
            .get(ctrl as usize)?
            .buffers
            .get(handle)
            .map(|n| n.state)
    }

    /// Number of TX buffer slots provided or in flight on a controller
    pub fn allocated_tx_buffers(&self, ctrl: u8) -> usize {
        self.controllers
            .get(ctrl as usize)
            .map_or(0, |c| c.buffers.allocated())
    }

    /// Number of requests queued on a TX FIFO
    pub fn queue_len(&self, ctrl: u8, fifo: u8) -> usize {
        self.controllers
            .get(ctrl as usize)
            .and_then(|c| c.queues.get(fifo as usize).map(|q| q.len(&c.buffers)))
            .unwrap_or(0)
    }
}
