//! Critical-section protected driver wrapper.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::driver::eth::Eth;
use crate::ethif::{DiagnosticSink, EthIf};
use crate::hal::EthHardware;

/// ISR-safe [`Eth`] wrapper using critical sections.
///
/// All access goes through `critical_section::with()`, disabling interrupts
/// for the duration of the closure.
///
/// # Example
///
/// ```ignore
/// ETH.with(|eth| {
///     let mut buf = eth.provide_tx_buffer(0, 0, 64)?;
///     buf[..4].copy_from_slice(b"ping");
///     let handle = buf.handle();
///     eth.transmit(0, handle, 0x88B5, true, 4, &[0xFF; 6])
/// })?;
/// ```
pub struct SharedEth<H, U, D, const CTRLS: usize, const FIFOS: usize, const BUFS: usize> {
    inner: Mutex<RefCell<Eth<H, U, D, CTRLS, FIFOS, BUFS>>>,
}

impl<H, U, D, const CTRLS: usize, const FIFOS: usize, const BUFS: usize>
    SharedEth<H, U, D, CTRLS, FIFOS, BUFS>
{
    /// Wrap a driver instance (const, suitable for static initialization).
    pub const fn new(eth: Eth<H, U, D, CTRLS, FIFOS, BUFS>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(eth)),
        }
    }

    /// Execute a closure with exclusive access to the driver.
    ///
    /// Interrupts are disabled for the duration of the closure.
    ///
    /// # Panics
    /// Panics if called from within another `with` closure on the same
    /// instance; use [`try_with`](Self::try_with) where that can happen.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut Eth<H, U, D, CTRLS, FIFOS, BUFS>) -> R,
    {
        critical_section::with(|cs| {
            let mut eth = self.inner.borrow_ref_mut(cs);
            f(&mut eth)
        })
    }

    /// Try to execute a closure, returning `None` if already borrowed.
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut Eth<H, U, D, CTRLS, FIFOS, BUFS>) -> R,
    {
        critical_section::with(|cs| {
            self.inner
                .borrow(cs)
                .try_borrow_mut()
                .ok()
                .map(|mut eth| f(&mut eth))
        })
    }

    /// Unwrap the driver instance.
    pub fn into_inner(self) -> Eth<H, U, D, CTRLS, FIFOS, BUFS> {
        self.inner.into_inner().into_inner()
    }
}

impl<H, U, D, const CTRLS: usize, const FIFOS: usize, const BUFS: usize>
    SharedEth<H, U, D, CTRLS, FIFOS, BUFS>
where
    H: EthHardware,
    U: EthIf,
    D: DiagnosticSink,
{
    /// TX interrupt body: retire completed buffers of one FIFO.
    ///
    /// Returns 0 without touching the driver if it is already borrowed by
    /// the interrupted context.
    pub fn on_tx_interrupt(&self, ctrl: u8, fifo: u8) -> usize {
        self.try_with(|eth| eth.tx_irq_handler(ctrl, fifo))
            .unwrap_or(0)
    }

    /// RX interrupt body: drain one RX FIFO.
    pub fn on_rx_interrupt(&self, ctrl: u8, fifo: u8) -> usize {
        self.try_with(|eth| eth.rx_irq_handler(ctrl, fifo))
            .unwrap_or(0)
    }
}
