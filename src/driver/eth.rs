//! Core GMAC driver instance and controller lifecycle.
//!
//! This module contains the main [`Eth`] structure and the operations that
//! move controllers through their state and mode:
//!
//! - Initialization and configuration
//! - Controller mode changes (DOWN/ACTIVE) with TX queue flush
//! - Physical address access
//! - Periodic access monitoring
//!
//! For the transmit engine, see the [`tx`](super::tx) module.
//! For the receive path, see the [`rx`](super::rx) module.

use super::config::{ControllerConfig, EthConfig};
use super::error::{ConfigError, ConfigResult, Error, IoError, Result};
use super::types::{ApiId, ControllerMode, ControllerState, MacAddress};
use crate::ethif::{DemEventStatus, DiagnosticSink, EthIf};
use crate::hal::EthHardware;
use crate::internal::constants::{DEFAULT_TX_BUFFERS, DEFAULT_TX_FIFOS};
use crate::internal::tx::{TxBufferMap, TxQueue};

// =============================================================================
// Controller Runtime Record
// =============================================================================

/// Runtime record of one controller
pub(crate) struct Controller<const FIFOS: usize, const BUFS: usize> {
    /// Configuration applied at init
    pub(crate) config: ControllerConfig,
    /// Initialization state
    pub(crate) state: ControllerState,
    /// Last mode set through `set_controller_mode`
    pub(crate) mode: ControllerMode,
    /// Buffer index map
    pub(crate) buffers: TxBufferMap<BUFS>,
    /// One request queue per TX FIFO
    pub(crate) queues: [TxQueue; FIFOS],
}

impl<const FIFOS: usize, const BUFS: usize> Controller<FIFOS, BUFS> {
    const fn new() -> Self {
        Self {
            config: ControllerConfig::new(),
            state: ControllerState::Uninit,
            mode: ControllerMode::Down,
            buffers: TxBufferMap::new(),
            queues: [const { TxQueue::new() }; FIFOS],
        }
    }

    /// Drop all TX bookkeeping without notifying anyone
    fn reset_tx(&mut self) {
        self.buffers.reset();
        self.queues = [const { TxQueue::new() }; FIFOS];
    }
}

// =============================================================================
// Driver Instance
// =============================================================================

/// S32K3 GMAC driver
///
/// Owns the hardware collaborator, the upper layer and the diagnostic sink,
/// plus the runtime record of every controller.
///
/// # Type Parameters
/// * `H` - Register-level hardware layer
/// * `U` - Upper layer receiving indications and confirmations
/// * `D` - Development/runtime error and DEM sink
/// * `CTRLS` - Number of controllers
/// * `FIFOS` - Maximum TX/RX FIFOs per controller
/// * `BUFS` - TX buffer slots per controller (FIFO count x buffers per FIFO)
///
/// # Example
/// ```ignore
/// let mut eth: Eth<Gmac, MyEthIf, NoDiagnostics, 1, 2, 16> =
///     Eth::new(Gmac::take(), MyEthIf::new(), NoDiagnostics);
///
/// eth.init(EthConfig::uniform(ControllerConfig::new().with_tx_fifos(2)))?;
/// eth.set_controller_mode(0, ControllerMode::Active)?;
///
/// let mut buf = eth.provide_tx_buffer(0, 0, 64)?;
/// buf[..4].copy_from_slice(b"ping");
/// let handle = buf.handle();
/// eth.transmit(0, handle, 0x88B5, true, 4, &[0xFF; 6])?;
/// ```
///
/// # Module Organization
///
/// The driver is split across several modules for clarity:
/// - Lifecycle and mode control (this module)
/// - [`tx`](super::tx): buffer provisioning, transmission, confirmation
/// - [`rx`](super::rx): frame reception
pub struct Eth<H, U, D, const CTRLS: usize, const FIFOS: usize, const BUFS: usize> {
    /// Hardware layer
    pub(super) hw: H,
    /// Upper layer
    pub(super) upper: U,
    /// Diagnostic sink
    pub(super) diag: D,
    /// Controller runtime records
    pub(super) controllers: [Controller<FIFOS, BUFS>; CTRLS],
}

impl<H, U, D, const CTRLS: usize, const FIFOS: usize, const BUFS: usize>
    Eth<H, U, D, CTRLS, FIFOS, BUFS>
where
    H: EthHardware,
    U: EthIf,
    D: DiagnosticSink,
{
    /// Create a driver instance
    ///
    /// This is a const function suitable for static initialization.
    /// Every controller starts `Uninit` and `Down`.
    pub const fn new(hw: H, upper: U, diag: D) -> Self {
        Self {
            hw,
            upper,
            diag,
            controllers: [const { Controller::new() }; CTRLS],
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Hardware layer
    #[inline(always)]
    pub fn hardware(&self) -> &H {
        &self.hw
    }

    /// Mutable hardware layer
    #[inline(always)]
    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hw
    }

    /// Upper layer
    #[inline(always)]
    pub fn upper(&self) -> &U {
        &self.upper
    }

    /// Mutable upper layer
    #[inline(always)]
    pub fn upper_mut(&mut self) -> &mut U {
        &mut self.upper
    }

    /// Diagnostic sink
    #[inline(always)]
    pub fn diagnostics(&self) -> &D {
        &self.diag
    }

    /// Initialization state of a controller (`Uninit` for unknown indices)
    pub fn controller_state(&self, ctrl: u8) -> ControllerState {
        self.controllers
            .get(ctrl as usize)
            .map_or(ControllerState::Uninit, |c| c.state)
    }

    /// Configuration applied to a controller at init
    pub fn controller_config(&self, ctrl: u8) -> Option<&ControllerConfig> {
        self.controllers
            .get(ctrl as usize)
            .filter(|c| c.state == ControllerState::Init)
            .map(|c| &c.config)
    }

    // =========================================================================
    // Gating and Error Reporting
    // =========================================================================

    /// Check index, state and (optionally) mode without reporting
    pub(super) fn ready(&self, ctrl: u8, require_active: bool) -> ConfigResult<usize> {
        let idx = ctrl as usize;
        let c = self
            .controllers
            .get(idx)
            .ok_or(ConfigError::InvalidController)?;
        if c.state != ControllerState::Init {
            return Err(ConfigError::Uninit);
        }
        if require_active && c.mode != ControllerMode::Active {
            return Err(ConfigError::InvalidMode);
        }
        Ok(idx)
    }

    /// [`ready`](Self::ready), reporting any failure as a development error
    pub(super) fn gate(&mut self, ctrl: u8, api: ApiId, require_active: bool) -> Result<usize> {
        self.ready(ctrl, require_active)
            .map_err(|e| self.dev_error(ctrl, api, e))
    }

    /// Report a development error and convert it for return
    pub(super) fn dev_error(&mut self, ctrl: u8, api: ApiId, error: ConfigError) -> Error {
        #[cfg(feature = "log")]
        log::debug!("eth{}: {:?} rejected: {}", ctrl, api, error);

        self.diag.report_development_error(ctrl, api, error);
        error.into()
    }

    /// Report a runtime error and convert it for return
    pub(super) fn runtime_error(&mut self, ctrl: u8, api: ApiId, error: IoError) -> Error {
        #[cfg(feature = "log")]
        log::warn!("eth{}: {:?} failed: {}", ctrl, api, error);

        self.diag.report_runtime_error(ctrl, api, error);
        error.into()
    }

    /// Report the controller's access DEM event, if one is bound
    fn report_access(&mut self, idx: usize, status: DemEventStatus) {
        if let Some(event) = self.controllers[idx].config.dem.access {
            self.diag.report_dem_event(event, status);
        }
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Initialize every controller with the given configuration
    ///
    /// Each controller is reset to `Down` with an empty buffer map and empty
    /// request queues, its hardware is initialized and the configured MAC
    /// address is programmed. A controller whose hardware init fails stays
    /// `Uninit`; the others are still initialized.
    ///
    /// # Errors
    /// - `InvalidMode` - a controller is still `Active`
    /// - `InvalidConfig` - configuration rejected by validation
    /// - `AccessFailure` - hardware init failed for at least one controller
    pub fn init(&mut self, config: EthConfig<CTRLS>) -> Result<()> {
        if let Some(active) = self
            .controllers
            .iter()
            .position(|c| c.state == ControllerState::Init && c.mode == ControllerMode::Active)
        {
            return Err(self.dev_error(active as u8, ApiId::Init, ConfigError::InvalidMode));
        }

        if let Err(e) = config.validate(FIFOS) {
            return Err(self.dev_error(0, ApiId::Init, e));
        }

        let mut result = Ok(());
        for (idx, cfg) in config.controllers.iter().enumerate() {
            let ctrl = idx as u8;
            let c = &mut self.controllers[idx];
            c.config = *cfg;
            c.state = ControllerState::Uninit;
            c.mode = ControllerMode::Down;
            c.reset_tx();

            match self.hw.init_controller(ctrl, cfg) {
                Ok(()) => {
                    self.hw.set_physical_address(ctrl, &cfg.mac_address);
                    self.controllers[idx].state = ControllerState::Init;

                    #[cfg(feature = "defmt")]
                    defmt::info!("eth{}: initialized", ctrl);
                }
                Err(e) => {
                    self.report_access(idx, DemEventStatus::PreFailed);
                    let err = self.runtime_error(ctrl, ApiId::Init, e);
                    if result.is_ok() {
                        result = Err(err);
                    }
                }
            }
        }
        result
    }

    // =========================================================================
    // Controller Mode
    // =========================================================================

    /// Switch a controller between `Down` and `Active`
    ///
    /// `Active` enables the MAC and DMA. `Down` disables them and then flushes
    /// every TX request queue of the controller: queued buffers are released
    /// **without** a confirmation to the upper layer, and buffers provided but
    /// never transmitted are released as well.
    ///
    /// On success the upper layer receives a mode indication.
    ///
    /// # Errors
    /// - `InvalidController` / `Uninit` - controller not usable
    /// - `AccessFailure` - controller registers unreachable (DEM access event fails)
    /// - `HardwareFailure` - hardware refused the mode change
    pub fn set_controller_mode(&mut self, ctrl: u8, mode: ControllerMode) -> Result<()> {
        let idx = self.gate(ctrl, ApiId::SetControllerMode, false)?;

        if !self.hw.check_access(ctrl) {
            self.report_access(idx, DemEventStatus::Failed);
            return Err(self.runtime_error(ctrl, ApiId::SetControllerMode, IoError::AccessFailure));
        }

        let switched = match mode {
            ControllerMode::Active => self.hw.enable_controller(ctrl),
            ControllerMode::Down => self.hw.disable_controller(ctrl),
        };
        if let Err(e) = switched {
            return Err(self.runtime_error(ctrl, ApiId::SetControllerMode, e));
        }

        if mode == ControllerMode::Down {
            let _flushed = self.flush_tx(idx);

            #[cfg(feature = "log")]
            log::debug!("eth{}: down, {} TX buffers discarded", ctrl, _flushed);
        }

        self.controllers[idx].mode = mode;

        #[cfg(feature = "defmt")]
        defmt::info!("eth{}: mode {}", ctrl, mode);

        self.upper.ctrl_mode_indication(ctrl, mode);
        Ok(())
    }

    /// Mode the controller hardware reports
    ///
    /// # Errors
    /// - `InvalidController` / `Uninit` - controller not usable
    pub fn controller_mode(&mut self, ctrl: u8) -> Result<ControllerMode> {
        self.gate(ctrl, ApiId::GetControllerMode, false)?;
        Ok(self.hw.controller_mode(ctrl))
    }

    // =========================================================================
    // Physical Address
    // =========================================================================

    /// Station MAC address of a controller
    ///
    /// # Errors
    /// - `InvalidController` / `Uninit` - controller not usable
    pub fn physical_address(&mut self, ctrl: u8) -> Result<MacAddress> {
        self.gate(ctrl, ApiId::GetPhysAddr, false)?;
        Ok(self.hw.physical_address(ctrl))
    }

    /// Change the station MAC address of a controller
    ///
    /// Frames transmitted afterwards carry the new source address.
    ///
    /// # Errors
    /// - `InvalidController` / `Uninit` - controller not usable
    pub fn set_physical_address(&mut self, ctrl: u8, addr: &MacAddress) -> Result<()> {
        let idx = self.gate(ctrl, ApiId::SetPhysAddr, false)?;
        self.hw.set_physical_address(ctrl, addr);
        self.controllers[idx].config.mac_address = *addr;
        Ok(())
    }

    // =========================================================================
    // Periodic Processing
    // =========================================================================

    /// Periodic monitoring, called from a cyclic task
    ///
    /// Reports the DEM access event of every initialized controller as
    /// passed or failed depending on whether its registers respond.
    pub fn main_function(&mut self) {
        for idx in 0..CTRLS {
            if self.controllers[idx].state != ControllerState::Init {
                continue;
            }
            let status = if self.hw.check_access(idx as u8) {
                DemEventStatus::Passed
            } else {
                #[cfg(feature = "log")]
                log::warn!("eth{}: controller not accessible", idx);

                DemEventStatus::Failed
            };
            self.report_access(idx, status);
        }
    }
}

// =============================================================================
// Type Aliases
// =============================================================================

/// One controller, two TX/RX FIFOs, 16 TX buffer slots
pub type EthDefault<H, U, D> = Eth<H, U, D, 1, DEFAULT_TX_FIFOS, DEFAULT_TX_BUFFERS>;

/// One controller, one FIFO, 4 TX buffer slots
pub type EthSmall<H, U, D> = Eth<H, U, D, 1, 1, 4>;

/// Two controllers, four FIFOs each, 32 TX buffer slots each
pub type EthLarge<H, U, D> = Eth<H, U, D, 2, 4, 32>;

// =============================================================================
// Tests
// =============================================================================
