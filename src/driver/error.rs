//! Error types for the S32K3 GMAC driver
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: Development errors (uninitialized driver, bad index, bad mode)
//! - [`BufferError`]: Buffer request failures (`BUFREQ_E_*`)
//! - [`IoError`]: Runtime hardware and communication failures
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by most driver methods.

// =============================================================================
// Configuration Errors
// =============================================================================

/// Development errors
///
/// These are the static configuration and calling-sequence errors. Every
/// occurrence is also forwarded to the diagnostic sink as a development error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Controller has not been initialized
    Uninit,
    /// Controller index out of range
    InvalidController,
    /// Operation not permitted in the current controller mode
    InvalidMode,
    /// Parameter out of range (priority, FIFO, length)
    InvalidParam,
    /// Buffer handle out of range or not currently provided
    InvalidBuffer,
    /// Configuration rejected by validation
    InvalidConfig,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::Uninit => "controller not initialized",
            ConfigError::InvalidController => "invalid controller index",
            ConfigError::InvalidMode => "invalid controller mode",
            ConfigError::InvalidParam => "invalid parameter",
            ConfigError::InvalidBuffer => "invalid buffer handle",
            ConfigError::InvalidConfig => "invalid configuration",
        }
    }
}

// =============================================================================
// Buffer Errors
// =============================================================================

/// Buffer request errors
///
/// Non-OK results of a TX buffer request. `Overflow` is kept distinct from
/// generic failure so callers can retry with a smaller length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BufferError {
    /// Requested length exceeds the 16-bit frame length limit or the buffer size
    Overflow,
    /// All buffers of the FIFO are in use
    Busy,
    /// Generic buffer request failure
    NotOk,
}

impl core::fmt::Display for BufferError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BufferError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            BufferError::Overflow => "requested length overflows buffer",
            BufferError::Busy => "no buffer available",
            BufferError::NotOk => "buffer request failed",
        }
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Runtime hardware errors
///
/// These are reported through the runtime-error channel of the diagnostic
/// sink, separate from development errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// The hardware layer rejected the request (DMA submission, mode change)
    HardwareFailure,
    /// The controller registers could not be accessed
    AccessFailure,
    /// Received frame carried an integrity error and was dropped
    FrameError,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IoError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IoError::HardwareFailure => "hardware request failed",
            IoError::AccessFailure => "controller not accessible",
            IoError::FrameError => "frame error",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match eth.provide_tx_buffer(0, 0, len) {
///     Err(Error::Buffer(BufferError::Overflow)) => { /* shrink and retry */ }
///     Err(Error::Buffer(BufferError::Busy)) => { /* wait for confirmations */ }
///     Err(Error::Config(ConfigError::InvalidMode)) => { /* controller down */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Development error
    Config(ConfigError),
    /// Buffer request error
    Buffer(BufferError),
    /// Runtime I/O error
    Io(IoError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Buffer(e) => write!(f, "buffer: {}", e.as_str()),
            Error::Io(e) => write!(f, "io: {}", e.as_str()),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<BufferError> for Error {
    fn from(e: BufferError) -> Self {
        Error::Buffer(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

/// Result type alias for driver operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for buffer requests
pub type BufferResult<T> = core::result::Result<T, BufferError>;

/// Result type alias for I/O operations
pub type IoResult<T> = core::result::Result<T, IoError>;

// =============================================================================
// Unit Tests
// =============================================================================
