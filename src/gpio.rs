//! GPIO capability
//!
//! The driver never touches hardware registers directly. Every control and
//! data line is driven through the [`Gpio`] trait, addressed by a [`PinId`].
//! This keeps the bus protocol independent of any particular HAL and lets it
//! run against a recording fake in tests.
//!
//! For HALs that hand out individual [`OutputPin`]s, [`PinBank`] adapts an
//! array of pins into a [`Gpio`] where `PinId(i)` is the `i`-th pin.
//!
//! ## Example
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::digital::{OutputPin, PinState};
//! use hd44780_gpio::{Direction, Gpio, PinBank, PinId};
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! // RS, EN, D4..D7
//! let mut bank = PinBank::new([MockPin, MockPin, MockPin, MockPin, MockPin, MockPin]);
//!
//! let _ = bank.set_direction(PinId(0), Direction::Output);
//! let _ = bank.set_level(PinId(0), PinState::High);
//! ```

use core::fmt::Debug;
use embedded_hal::digital::{OutputPin, PinState};

/// Identifier of a single GPIO line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PinId(pub u8);

impl core::fmt::Display for PinId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "GPIO{}", self.0)
    }
}

/// Direction of a GPIO line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    /// High-impedance input
    Input,
    /// Push-pull output
    #[default]
    Output,
}

/// Pin-level GPIO access consumed by [`Interface`](crate::interface::Interface)
///
/// Implement this on top of your platform's GPIO driver if its pins are
/// addressed by number. If the HAL gives you typed pins instead, wrap them in
/// a [`PinBank`].
pub trait Gpio {
    /// Error type for pin operations
    type Error: Debug;

    /// Configure the direction of `pin`
    ///
    /// # Errors
    ///
    /// Returns an error if the pin cannot be configured.
    fn set_direction(&mut self, pin: PinId, direction: Direction) -> Result<(), Self::Error>;

    /// Drive `pin` to `level`
    ///
    /// # Errors
    ///
    /// Returns an error if the level cannot be applied.
    fn set_level(&mut self, pin: PinId, level: PinState) -> Result<(), Self::Error>;
}

impl<G: Gpio + ?Sized> Gpio for &mut G {
    type Error = G::Error;

    fn set_direction(&mut self, pin: PinId, direction: Direction) -> Result<(), Self::Error> {
        G::set_direction(self, pin, direction)
    }

    fn set_level(&mut self, pin: PinId, level: PinState) -> Result<(), Self::Error> {
        G::set_level(self, pin, level)
    }
}

/// Errors raised by [`PinBank`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinBankError<PinErr> {
    /// The identifier does not address a pin in the bank
    UnknownPin(PinId),
    /// Bank pins are output-only
    InputUnsupported(PinId),
    /// Error from the underlying pin
    Pin(PinErr),
}

impl<PinErr: Debug> core::fmt::Display for PinBankError<PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownPin(pin) => write!(f, "No pin {pin} in bank"),
            Self::InputUnsupported(pin) => write!(f, "Pin {pin} cannot be used as input"),
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
        }
    }
}

impl<PinErr: Debug> core::error::Error for PinBankError<PinErr> {}

/// [`Gpio`] adapter over an array of embedded-hal output pins
///
/// `PinId(i)` addresses `pins[i]`. The pins are expected to already be
/// configured as outputs by the HAL, so requesting [`Direction::Output`] is a
/// no-op.
pub struct PinBank<P, const N: usize> {
    pins: [P; N],
}

impl<P: OutputPin, const N: usize> PinBank<P, N> {
    /// Create a bank from already-configured output pins
    pub fn new(pins: [P; N]) -> Self {
        Self { pins }
    }

    /// Release the wrapped pins
    pub fn release(self) -> [P; N] {
        self.pins
    }

    fn pin_mut(&mut self, pin: PinId) -> Result<&mut P, PinBankError<P::Error>> {
        self.pins
            .get_mut(pin.0 as usize)
            .ok_or(PinBankError::UnknownPin(pin))
    }
}

impl<P: OutputPin, const N: usize> Gpio for PinBank<P, N> {
    type Error = PinBankError<P::Error>;

    fn set_direction(&mut self, pin: PinId, direction: Direction) -> Result<(), Self::Error> {
        self.pin_mut(pin)?;
        match direction {
            Direction::Output => Ok(()),
            Direction::Input => Err(PinBankError::InputUnsupported(pin)),
        }
    }

    fn set_level(&mut self, pin: PinId, level: PinState) -> Result<(), Self::Error> {
        self.pin_mut(pin)?
            .set_state(level)
            .map_err(|e| PinBankError::Pin(e))
    }
}
