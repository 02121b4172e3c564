//! HD44780 Character LCD Driver
//!
//! A driver for HD44780-family character LCD controllers (1602, 2004 and
//! friends) wired to a parallel GPIO bus.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 support
//! - 4-bit and 8-bit bus modes
//! - 1 to 4 line panels with configurable DDRAM row offsets
//! - Custom glyphs (8 CGRAM slots)
//! - `core::fmt::Write` support
//!
//! The bus is write-only: the busy flag is never polled, every instruction
//! is followed by a fixed worst-case delay.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use core::fmt::Write;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::OutputPin;
//! use hd44780_gpio::{Builder, DataBus, Display, PinBank, PinId};
//!
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let (rs, rw, en, d4, d5, d6, d7) = (MockPin, MockPin, MockPin, MockPin, MockPin, MockPin, MockPin);
//! # let delay = MockDelay;
//! let pins = PinBank::new([rs, rw, en, d4, d5, d6, d7]);
//! let config = match Builder::new()
//!     .register_select(PinId(0))
//!     .read_write(PinId(1))
//!     .enable(PinId(2))
//!     .data_bus(DataBus::Four([PinId(3), PinId(4), PinId(5), PinId(6)]))
//!     .line_count(2)
//!     .build()
//! {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut display = Display::with_gpio(pins, delay, config);
//! let _ = display.init();
//! let _ = display.clear();
//! let _ = display.print("> Hello World! <");
//! let _ = display.set_cursor(4, 1);
//! let _ = write!(display, "{:02}", 42);
//! ```

#![no_std]

#[cfg(test)]
extern crate alloc;

/// HD44780 instruction definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// GPIO capability and pin adapters
pub mod gpio;
/// Hardware interface abstraction
pub mod interface;

pub use config::{BusWidth, Builder, Config, ConfigError, DataBus, DEFAULT_ROW_OFFSETS, Font};
pub use display::{CLEAR_DELAY_MS, Display, POWER_ON_DELAY_MS};
pub use error::{BuilderError, ControlLine, Error, ErrorKind, MAX_CHAR_SLOT, MAX_LINES};
pub use gpio::{Direction, Gpio, PinBank, PinBankError, PinId};
pub use interface::{BusInterface, COMMAND_SETTLE_MS, Interface, InterfaceError, Register};
