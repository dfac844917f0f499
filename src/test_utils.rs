//! Testing utilities and mock implementations
//!
//! Mock hardware layer, recording upper layer and recording diagnostic sink
//! for exercising the driver on the host.
//!
//! Only available when running `cargo test`.

// Note: The #[cfg(test)] attribute is applied in lib.rs where this module is declared
#![allow(missing_docs)]
#![allow(clippy::std_instead_of_core, clippy::std_instead_of_alloc)]

extern crate std;

use std::collections::{HashMap, VecDeque};
use std::vec;
use std::vec::Vec;

use crate::driver::config::{ControllerConfig, EthConfig};
use crate::driver::error::{BufferError, BufferResult, ConfigError, IoError, IoResult};
use crate::driver::eth::Eth;
use crate::driver::types::{
    ApiId, BufferHandle, ControllerMode, FrameType, MacAddress, TimeStamp,
};
use crate::ethif::{DemEventId, DemEventStatus, DiagnosticSink, EthIf, RxIndication, TxConfirmation};
use crate::hal::{EthHardware, RxFrame, TxAllocation, TxCompletion};

/// Controllers simulated by [`MockHardware`]
pub const MOCK_CTRLS: usize = 2;

/// TX buffer slots per simulated controller
pub const MOCK_SLOTS: usize = 8;

/// Station address used by [`test_config`]
pub const OWN_MAC: MacAddress = [0x11, 0x22, 0x33, 0x44, 0x55, 0x66];

/// Driver instance used throughout the unit tests
pub type TestEth = Eth<MockHardware, RecordingEthIf, RecordingDiagnostics, 2, 2, MOCK_SLOTS>;

/// Two controllers with two TX/RX FIFOs; priorities 0-3 on FIFO 0, 4-7 on FIFO 1
pub fn test_config() -> EthConfig<2> {
    EthConfig::uniform(
        ControllerConfig::new()
            .with_mac_address(OWN_MAC)
            .with_tx_fifos(2)
            .with_rx_fifos(2)
            .with_priority_map([0, 0, 0, 0, 1, 1, 1, 1])
            .with_egress_timestamps(true),
    )
}

/// Initialized driver with controller 0 active and empty recordings
pub fn active_eth() -> TestEth {
    let mut eth = Eth::new(
        MockHardware::new(),
        RecordingEthIf::new(),
        RecordingDiagnostics::new(),
    );
    eth.init(test_config()).unwrap();
    eth.set_controller_mode(0, ControllerMode::Active).unwrap();
    eth.upper_mut().clear();
    eth
}

// =============================================================================
// Mock Hardware
// =============================================================================

/// Per-controller state of the mock
#[derive(Debug)]
struct MockController {
    accessible: bool,
    fail_init: bool,
    mode: ControllerMode,
    mac: MacAddress,
    buffers: Vec<Vec<u8>>,
    in_use: Vec<bool>,
    completion: Vec<TxCompletion>,
    egress: Vec<bool>,
}

impl MockController {
    fn new() -> Self {
        Self {
            accessible: true,
            fail_init: false,
            mode: ControllerMode::Down,
            mac: [0; 6],
            buffers: vec![Vec::new(); MOCK_SLOTS],
            in_use: vec![false; MOCK_SLOTS],
            completion: vec![TxCompletion::Pending; MOCK_SLOTS],
            egress: vec![false; MOCK_SLOTS],
        }
    }

    /// Descriptor ring reset
    fn reset_ring(&mut self) {
        self.in_use.fill(false);
        self.completion.fill(TxCompletion::Pending);
        self.egress.fill(false);
    }
}

/// A frame handed to DMA
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub ctrl: u8,
    pub fifo: u8,
    pub handle: BufferHandle,
    pub end_of_frame: bool,
    pub data: Vec<u8>,
}

/// A frame waiting in a simulated RX ring
#[derive(Debug, Clone)]
struct MockRxFrame {
    data: Vec<u8>,
    has_error: bool,
    timestamp: Option<TimeStamp>,
}

/// Egress timestamp the mock reports for armed buffers
pub const EGRESS_STAMP: TimeStamp = TimeStamp {
    seconds_hi: 0,
    seconds: 42,
    nanoseconds: 1_000,
};

/// Simulated GMAC IP layer
///
/// Buffer slots are handed out lowest-free-first. A slot becomes free again
/// when the test completes it with [`complete`](Self::complete) or
/// [`fail_tx`](Self::fail_tx), or when the controller is disabled.
#[derive(Debug)]
pub struct MockHardware {
    ctrls: Vec<MockController>,
    /// Every DMA submission, in order
    pub submitted: Vec<Submission>,
    /// Error returned by the next buffer requests
    pub provide_error: Option<BufferError>,
    /// Cap on the granted buffer length
    pub grant_limit: Option<usize>,
    /// Handle returned regardless of slot occupancy
    pub forced_handle: Option<u32>,
    /// Reject DMA submissions
    pub transmit_fails: bool,
    /// Reject enable/disable
    pub mode_change_fails: bool,
    /// PTP clock value
    pub time: Option<TimeStamp>,
    rx: HashMap<(u8, u8), VecDeque<MockRxFrame>>,
    rx_current: HashMap<(u8, u8), MockRxFrame>,
    /// Number of `release_rx_frame` calls that returned a frame
    pub rx_released: usize,
}

impl MockHardware {
    pub fn new() -> Self {
        Self {
            ctrls: (0..MOCK_CTRLS).map(|_| MockController::new()).collect(),
            submitted: Vec::new(),
            provide_error: None,
            grant_limit: None,
            forced_handle: None,
            transmit_fails: false,
            mode_change_fails: false,
            time: None,
            rx: HashMap::new(),
            rx_current: HashMap::new(),
            rx_released: 0,
        }
    }

    fn ctrl(&self, ctrl: u8) -> &MockController {
        &self.ctrls[ctrl as usize]
    }

    fn ctrl_mut(&mut self, ctrl: u8) -> &mut MockController {
        &mut self.ctrls[ctrl as usize]
    }

    /// Make `init_controller` fail for one controller
    pub fn fail_init(&mut self, ctrl: u8) {
        self.ctrl_mut(ctrl).fail_init = true;
    }

    /// Make the controller's registers (un)reachable
    pub fn set_accessible(&mut self, ctrl: u8, accessible: bool) {
        self.ctrl_mut(ctrl).accessible = accessible;
    }

    /// Make enable/disable fail
    pub fn fail_mode_change(&mut self, fail: bool) {
        self.mode_change_fails = fail;
    }

    /// Drop the controller to a mode behind the driver's back
    pub fn force_mode(&mut self, ctrl: u8, mode: ControllerMode) {
        self.ctrl_mut(ctrl).mode = mode;
    }

    /// DMA finished a buffer successfully
    pub fn complete(&mut self, ctrl: u8, handle: BufferHandle) {
        let c = self.ctrl_mut(ctrl);
        c.completion[handle.index()] = TxCompletion::Done;
        c.in_use[handle.index()] = false;
    }

    /// DMA released a buffer with an error
    pub fn fail_tx(&mut self, ctrl: u8, handle: BufferHandle) {
        let c = self.ctrl_mut(ctrl);
        c.completion[handle.index()] = TxCompletion::Failed;
        c.in_use[handle.index()] = false;
    }

    /// Complete every buffer submitted on a controller
    pub fn complete_all(&mut self, ctrl: u8) {
        let handles: Vec<BufferHandle> = self
            .submitted
            .iter()
            .filter(|s| s.ctrl == ctrl)
            .map(|s| s.handle)
            .collect();
        for handle in handles {
            self.complete(ctrl, handle);
        }
    }

    /// Whether egress capture was armed for a slot
    pub fn egress_armed(&self, ctrl: u8, handle: BufferHandle) -> bool {
        self.ctrl(ctrl).egress[handle.index()]
    }

    /// Queue a good frame on an RX FIFO
    pub fn push_rx_frame(&mut self, ctrl: u8, fifo: u8, data: &[u8]) {
        self.push_rx(ctrl, fifo, data, false, None);
    }

    /// Queue a frame flagged with a DMA error
    pub fn push_rx_error(&mut self, ctrl: u8, fifo: u8, data: &[u8]) {
        self.push_rx(ctrl, fifo, data, true, None);
    }

    /// Queue a good frame carrying an ingress timestamp
    pub fn push_rx_timestamped(&mut self, ctrl: u8, fifo: u8, data: &[u8], ts: TimeStamp) {
        self.push_rx(ctrl, fifo, data, false, Some(ts));
    }

    fn push_rx(&mut self, ctrl: u8, fifo: u8, data: &[u8], has_error: bool, ts: Option<TimeStamp>) {
        self.rx.entry((ctrl, fifo)).or_default().push_back(MockRxFrame {
            data: data.to_vec(),
            has_error,
            timestamp: ts,
        });
    }

    /// Frames still waiting on an RX FIFO
    pub fn rx_pending(&self, ctrl: u8, fifo: u8) -> usize {
        self.rx.get(&(ctrl, fifo)).map_or(0, VecDeque::len)
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl EthHardware for MockHardware {
    fn init_controller(&mut self, ctrl: u8, config: &ControllerConfig) -> IoResult<()> {
        let c = self.ctrl_mut(ctrl);
        if c.fail_init {
            return Err(IoError::HardwareFailure);
        }
        c.mode = ControllerMode::Down;
        c.mac = config.mac_address;
        c.reset_ring();
        Ok(())
    }

    fn check_access(&self, ctrl: u8) -> bool {
        self.ctrl(ctrl).accessible
    }

    fn enable_controller(&mut self, ctrl: u8) -> IoResult<()> {
        if self.mode_change_fails {
            return Err(IoError::HardwareFailure);
        }
        self.ctrl_mut(ctrl).mode = ControllerMode::Active;
        Ok(())
    }

    fn disable_controller(&mut self, ctrl: u8) -> IoResult<()> {
        if self.mode_change_fails {
            return Err(IoError::HardwareFailure);
        }
        let c = self.ctrl_mut(ctrl);
        c.mode = ControllerMode::Down;
        c.reset_ring();
        Ok(())
    }

    fn controller_mode(&self, ctrl: u8) -> ControllerMode {
        self.ctrl(ctrl).mode
    }

    fn physical_address(&self, ctrl: u8) -> MacAddress {
        self.ctrl(ctrl).mac
    }

    fn set_physical_address(&mut self, ctrl: u8, addr: &MacAddress) {
        self.ctrl_mut(ctrl).mac = *addr;
    }

    fn provide_tx_buffer(
        &mut self,
        ctrl: u8,
        _fifo: u8,
        len: usize,
    ) -> BufferResult<TxAllocation> {
        if let Some(e) = self.provide_error {
            return Err(e);
        }
        let granted = self.grant_limit.map_or(len, |limit| len.min(limit));
        let forced = self.forced_handle;
        let c = self.ctrl_mut(ctrl);

        let index = match forced {
            Some(raw) => raw as usize,
            None => c.in_use.iter().position(|used| !used).ok_or(BufferError::Busy)?,
        };
        if !c.in_use[index] {
            c.in_use[index] = true;
            c.completion[index] = TxCompletion::Pending;
            c.egress[index] = false;
            c.buffers[index] = vec![0; granted];
        }
        Ok(TxAllocation {
            handle: BufferHandle::new(index as u32),
            len: granted,
        })
    }

    fn release_tx_buffer(&mut self, ctrl: u8, handle: BufferHandle) {
        if let Some(used) = self.ctrl_mut(ctrl).in_use.get_mut(handle.index()) {
            *used = false;
        }
    }

    fn tx_buffer(&mut self, ctrl: u8, handle: BufferHandle) -> Option<&mut [u8]> {
        self.ctrl_mut(ctrl)
            .buffers
            .get_mut(handle.index())
            .map(Vec::as_mut_slice)
    }

    fn transmit(
        &mut self,
        ctrl: u8,
        fifo: u8,
        handle: BufferHandle,
        len: usize,
        end_of_frame: bool,
    ) -> IoResult<()> {
        if self.transmit_fails {
            return Err(IoError::HardwareFailure);
        }
        let data = self.ctrl(ctrl).buffers[handle.index()][..len].to_vec();
        self.submitted.push(Submission {
            ctrl,
            fifo,
            handle,
            end_of_frame,
            data,
        });
        Ok(())
    }

    fn tx_status(&self, ctrl: u8, _fifo: u8, handle: BufferHandle) -> TxCompletion {
        self.ctrl(ctrl).completion[handle.index()]
    }

    fn enable_egress_timestamp(&mut self, ctrl: u8, handle: BufferHandle) {
        self.ctrl_mut(ctrl).egress[handle.index()] = true;
    }

    fn egress_timestamp(&self, ctrl: u8, _fifo: u8, handle: BufferHandle) -> Option<TimeStamp> {
        let c = self.ctrl(ctrl);
        let done = c.completion[handle.index()] != TxCompletion::Pending;
        (done && c.egress[handle.index()]).then_some(EGRESS_STAMP)
    }

    fn current_time(&self, _ctrl: u8) -> Option<TimeStamp> {
        self.time
    }

    fn receive_frame(&mut self, ctrl: u8, fifo: u8) -> Option<RxFrame<'_>> {
        let key = (ctrl, fifo);
        if !self.rx_current.contains_key(&key) {
            let next = self.rx.get_mut(&key)?.pop_front()?;
            self.rx_current.insert(key, next);
        }
        let more_available = self.rx.get(&key).is_some_and(|q| !q.is_empty());
        let frame = self.rx_current.get(&key)?;
        Some(RxFrame {
            data: &frame.data,
            has_error: frame.has_error,
            more_available,
            timestamp: frame.timestamp,
        })
    }

    fn release_rx_frame(&mut self, ctrl: u8, fifo: u8) {
        if self.rx_current.remove(&(ctrl, fifo)).is_some() {
            self.rx_released += 1;
        }
    }
}

// =============================================================================
// Recording Upper Layer
// =============================================================================

/// Owned copy of an [`RxIndication`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RxRecord {
    pub ctrl: u8,
    pub fifo: u8,
    pub frame_type: FrameType,
    pub is_broadcast: bool,
    pub src: MacAddress,
    pub payload: Vec<u8>,
    pub timestamp: Option<TimeStamp>,
}

/// Upper layer that records every notification
#[derive(Debug, Default)]
pub struct RecordingEthIf {
    pub rx: Vec<RxRecord>,
    pub confirmations: Vec<TxConfirmation>,
    pub mode_indications: Vec<(u8, ControllerMode)>,
}

impl RecordingEthIf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything recorded so far
    pub fn clear(&mut self) {
        self.rx.clear();
        self.confirmations.clear();
        self.mode_indications.clear();
    }

    /// Handles of confirmed buffers, in confirmation order
    pub fn confirmed_handles(&self) -> Vec<BufferHandle> {
        self.confirmations.iter().map(|c| c.handle).collect()
    }
}

impl EthIf for RecordingEthIf {
    fn rx_indication(&mut self, frame: &RxIndication<'_>) {
        self.rx.push(RxRecord {
            ctrl: frame.ctrl,
            fifo: frame.fifo,
            frame_type: frame.frame_type,
            is_broadcast: frame.is_broadcast,
            src: frame.src,
            payload: frame.payload.to_vec(),
            timestamp: frame.timestamp,
        });
    }

    fn tx_confirmation(&mut self, confirmation: &TxConfirmation) {
        self.confirmations.push(*confirmation);
    }

    fn ctrl_mode_indication(&mut self, ctrl: u8, mode: ControllerMode) {
        self.mode_indications.push((ctrl, mode));
    }
}

// =============================================================================
// Recording Diagnostics
// =============================================================================

/// One report received by [`RecordingDiagnostics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagEvent {
    Development(u8, ApiId, ConfigError),
    Runtime(u8, ApiId, IoError),
    Dem(DemEventId, DemEventStatus),
}

/// Diagnostic sink that records every report
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    pub events: Vec<DiagEvent>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DiagnosticSink for RecordingDiagnostics {
    fn report_development_error(&mut self, ctrl: u8, api: ApiId, error: ConfigError) {
        self.events.push(DiagEvent::Development(ctrl, api, error));
    }

    fn report_runtime_error(&mut self, ctrl: u8, api: ApiId, error: IoError) {
        self.events.push(DiagEvent::Runtime(ctrl, api, error));
    }

    fn report_dem_event(&mut self, event: DemEventId, status: DemEventStatus) {
        self.events.push(DiagEvent::Dem(event, status));
    }
}

/// Build a frame with the given header and payload
pub fn build_frame(
    dst: &MacAddress,
    src: &MacAddress,
    frame_type: FrameType,
    payload: &[u8],
) -> Vec<u8> {
    let mut frame = Vec::with_capacity(14 + payload.len());
    frame.extend_from_slice(dst);
    frame.extend_from_slice(src);
    frame.extend_from_slice(&frame_type.to_be_bytes());
    frame.extend_from_slice(payload);
    frame
}
