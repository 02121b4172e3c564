//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and display operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`Error`] - Runtime errors during display operations
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level GPIO errors
//! - [`PinBankError`](crate::gpio::PinBankError) - Errors from the pin array adapter
//!
//! ## Example
//!
//! ```
//! use hd44780_gpio::{Builder, BuilderError, ConfigError, ControlLine, DataBus, PinId};
//!
//! // Missing data lines
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingDataBus)));
//!
//! // Missing register select line, reported before any hardware access
//! let config = match Builder::new()
//!     .enable(PinId(2))
//!     .data_bus(DataBus::Four([PinId(4), PinId(5), PinId(6), PinId(7)]))
//!     .build()
//! {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//! assert_eq!(
//!     config.validate(),
//!     Err(ConfigError::MissingPin(ControlLine::RegisterSelect))
//! );
//! ```

use crate::config::{BusWidth, ConfigError};
use crate::interface::BusInterface;

/// Maximum number of display lines supported by the HD44780 addressing model
pub const MAX_LINES: u8 = 4;

/// Highest custom glyph slot in CGRAM
pub const MAX_CHAR_SLOT: u8 = 7;

/// Control line of the parallel bus
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlLine {
    /// Register select (RS)
    RegisterSelect,
    /// Read/write (R/W)
    ReadWrite,
    /// Enable (E)
    Enable,
}

impl core::fmt::Display for ControlLine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::RegisterSelect => write!(f, "register select"),
            Self::ReadWrite => write!(f, "read/write"),
            Self::Enable => write!(f, "enable"),
        }
    }
}

/// Broad category of an [`Error`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The configuration cannot drive a panel; nothing was sent
    Configuration,
    /// An argument was out of range; nothing was sent
    InvalidArgument,
    /// The GPIO layer failed, possibly part-way through a sequence
    Io,
}

/// Errors that can occur when interacting with the display
///
/// Generic over the interface type to preserve the specific error type.
/// This allows error handling code to match on the underlying hardware error.
#[derive(Debug)]
pub enum Error<I: BusInterface> {
    /// Interface error (GPIO)
    ///
    /// Wraps the underlying hardware error from the [`BusInterface`] implementation.
    /// The controller may be left mid-sequence and should be re-initialized.
    Interface(I::Error),
    /// A mandatory control line is not connected
    MissingPin(ControlLine),
    /// Invalid line count
    ///
    /// The controller addresses between 1 and [`MAX_LINES`] lines.
    InvalidLineCount {
        /// Line count requested
        lines: u8,
    },
    /// The interface frames bytes for a different bus width than the configuration
    ///
    /// The function-set instruction would select a mode the bus does not drive.
    BusWidthMismatch {
        /// Width the interface transmits with
        interface: BusWidth,
        /// Width selected by the configuration's data bus
        config: BusWidth,
    },
    /// Invalid custom character slot
    ///
    /// CGRAM holds eight glyphs, slots 0 to [`MAX_CHAR_SLOT`].
    InvalidCharSlot {
        /// Slot requested
        slot: u8,
    },
}

impl<I: BusInterface> Error<I> {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Interface(_) => ErrorKind::Io,
            Self::MissingPin(_) | Self::InvalidLineCount { .. } | Self::BusWidthMismatch { .. } => {
                ErrorKind::Configuration
            }
            Self::InvalidCharSlot { .. } => ErrorKind::InvalidArgument,
        }
    }
}

impl<I: BusInterface> From<ConfigError> for Error<I> {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::MissingPin(line) => Self::MissingPin(line),
            ConfigError::InvalidLineCount { lines } => Self::InvalidLineCount { lines },
        }
    }
}

impl<I: BusInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(_) => write!(f, "Interface error"),
            Self::MissingPin(line) => write!(f, "The {line} pin must be set"),
            Self::InvalidLineCount { lines } => {
                write!(f, "Invalid line count: {lines} (must be 1 to {MAX_LINES})")
            }
            Self::BusWidthMismatch { interface, config } => write!(
                f,
                "Bus width mismatch: interface is {interface:?}, configuration is {config:?}"
            ),
            Self::InvalidCharSlot { slot } => {
                write!(f, "Invalid character slot: {slot} (must be 0 to {MAX_CHAR_SLOT})")
            }
        }
    }
}

impl<I: BusInterface + core::fmt::Debug> core::error::Error for Error<I> {}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingPin(line) => write!(f, "The {line} pin must be set"),
            Self::InvalidLineCount { lines } => {
                write!(f, "Invalid line count: {lines} (must be 1 to {MAX_LINES})")
            }
        }
    }
}

impl core::error::Error for ConfigError {}

/// Errors that can occur when building configuration
///
/// These errors occur during the builder pattern before the display is created.
#[derive(Debug)]
pub enum BuilderError {
    /// Data lines were not specified
    ///
    /// [`Builder::data_bus()`](crate::config::Builder::data_bus) must be called before building.
    MissingDataBus,
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingDataBus => write!(f, "Data bus must be specified"),
        }
    }
}

impl core::error::Error for BuilderError {}
