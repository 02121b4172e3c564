//! Hardware interface abstraction
//!
//! This module provides the [`BusInterface`] trait and the [`Interface`] struct
//! for clocking bytes into an HD44780 controller over its parallel bus.
//!
//! ## Hardware Requirements
//!
//! The HD44780 requires:
//! - 4 or 8 data lines (DB4..DB7, or DB0..DB7)
//! - 2 or 3 control lines:
//!   - **RS**: Register select (low=instruction, high=data)
//!   - **R/W**: Read/write (optional, held low; tie to ground if absent)
//!   - **E**: Enable, the falling edge latches the data lines
//!
//! The bus is write-only. The busy flag is never read; every transfer is
//! followed by a fixed delay covering the slowest instruction.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::PinState;
//! use hd44780_gpio::{BusInterface, Builder, DataBus, Direction, Gpio, Interface, PinId, Register};
//! # use core::convert::Infallible;
//! # struct MockGpio;
//! # impl Gpio for MockGpio {
//! #     type Error = Infallible;
//! #     fn set_direction(&mut self, _pin: PinId, _direction: Direction) -> Result<(), Infallible> { Ok(()) }
//! #     fn set_level(&mut self, _pin: PinId, _level: PinState) -> Result<(), Infallible> { Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let config = match Builder::new()
//! #     .register_select(PinId(1))
//! #     .enable(PinId(2))
//! #     .data_bus(DataBus::Four([PinId(4), PinId(5), PinId(6), PinId(7)]))
//! #     .build()
//! # {
//! #     Ok(config) => config,
//! #     Err(_) => return,
//! # };
//! // Create interface from GPIO, delay and the pin assignments
//! let mut interface = Interface::new(MockGpio, MockDelay, &config);
//!
//! // Drive all lines low as outputs
//! let _ = interface.configure();
//!
//! // Send an instruction (clear display), then a character
//! let _ = interface.transmit(0x01, Register::Instruction);
//! let _ = interface.transmit(b'A', Register::Data);
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::PinState;
use log::trace;

use crate::config::{BusWidth, Config, DataBus};
use crate::error::ControlLine;
use crate::gpio::{Direction, Gpio, PinId};

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Delay after every transmitted byte, covering the slowest instruction (ms)
pub const COMMAND_SETTLE_MS: u32 = 1;

/// Dwell time at each level of the enable pulse (ms)
pub const ENABLE_PULSE_MS: u32 = 1;

/// Controller register targeted by a transfer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Register {
    /// Instruction register (RS low)
    Instruction,
    /// Data register (RS high), DDRAM or CGRAM depending on the last address set
    Data,
}

impl From<Register> for PinState {
    fn from(register: Register) -> Self {
        match register {
            Register::Instruction => Self::Low,
            Register::Data => Self::High,
        }
    }
}

/// Trait for the bus transport to an HD44780 controller
///
/// This trait abstracts over different hardware implementations,
/// allowing the [`Display`](crate::display::Display) to work with any
/// bus that can latch bytes into the controller.
///
/// ## Implementing
///
/// For most cases, use the provided [`Interface`] struct. Implement this
/// trait yourself for buses the driver does not cover, or to record the
/// traffic in tests.
pub trait BusInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Width of the data bus
    fn bus_width(&self) -> BusWidth;

    /// Configure every control and data line as an output driven low
    ///
    /// # Errors
    ///
    /// Returns an error if any GPIO operation fails.
    fn configure(&mut self) -> InterfaceResult<(), Self::Error>;

    /// Latch a raw nibble into the instruction register
    ///
    /// Only used during the 4-bit initialization handshake, while the
    /// controller still samples the bus as 8-bit. The nibble is placed on
    /// the lowest four data lines and one enable pulse is issued.
    ///
    /// # Errors
    ///
    /// Returns an error if any GPIO operation fails.
    fn write_nibble(&mut self, nibble: u8) -> InterfaceResult<(), Self::Error>;

    /// Send one byte to the selected register
    ///
    /// The implementation must:
    /// 1. Set RS to match `register`
    /// 2. 8-bit: put bit `i` on data line `i`, pulse enable
    /// 3. 4-bit: put the high nibble on the lines, pulse enable, then the
    ///    low nibble, pulse enable
    /// 4. Wait at least [`COMMAND_SETTLE_MS`]
    ///
    /// # Errors
    ///
    /// Returns an error if any GPIO operation fails. A failed transfer may
    /// leave the controller out of nibble sync.
    fn transmit(&mut self, value: u8, register: Register) -> InterfaceResult<(), Self::Error>;

    /// Block for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}

/// Errors that can occur at the interface level
///
/// Generic over the GPIO error type.
#[derive(Debug)]
pub enum InterfaceError<PinErr> {
    /// GPIO pin error
    Gpio(PinErr),
    /// A control line needed for the transfer is not connected
    Unconnected(ControlLine),
}

impl<PinErr: Debug> core::fmt::Display for InterfaceError<PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Gpio(e) => write!(f, "GPIO error: {e:?}"),
            Self::Unconnected(line) => write!(f, "The {line} pin is not connected"),
        }
    }
}

impl<PinErr: Debug> core::error::Error for InterfaceError<PinErr> {}

/// Parallel bus implementation for HD44780
///
/// Implements [`BusInterface`] on top of a [`Gpio`] capability and an
/// embedded-hal [`DelayNs`].
///
/// ## Type Parameters
///
/// * `G` - GPIO capability implementing [`Gpio`]
/// * `D` - Delay implementing [`DelayNs`]
pub struct Interface<G, D> {
    /// GPIO capability driving every line
    gpio: G,
    /// Blocking delay
    delay: D,
    /// Register select line
    register_select: Option<PinId>,
    /// Read/write line, held low
    read_write: Option<PinId>,
    /// Enable line
    enable: Option<PinId>,
    /// Data lines
    data_bus: DataBus,
}

impl<G, D> Interface<G, D>
where
    G: Gpio,
    D: DelayNs,
{
    /// Create a new Interface using the pin assignments of `config`
    ///
    /// No pin is touched until [`BusInterface::configure`] is called.
    pub fn new(gpio: G, delay: D, config: &Config) -> Self {
        Self {
            gpio,
            delay,
            register_select: config.register_select,
            read_write: config.read_write,
            enable: config.enable,
            data_bus: config.data_bus,
        }
    }

    /// Release the GPIO capability and delay
    pub fn release(self) -> (G, D) {
        (self.gpio, self.delay)
    }

    fn control(&self, line: ControlLine) -> InterfaceResult<PinId, InterfaceError<G::Error>> {
        let pin = match line {
            ControlLine::RegisterSelect => self.register_select,
            ControlLine::ReadWrite => self.read_write,
            ControlLine::Enable => self.enable,
        };
        pin.ok_or(InterfaceError::Unconnected(line))
    }

    fn set(&mut self, pin: PinId, level: PinState) -> InterfaceResult<(), InterfaceError<G::Error>> {
        self.gpio
            .set_level(pin, level)
            .map_err(|e| InterfaceError::Gpio(e))
    }

    fn make_output(&mut self, pin: PinId) -> InterfaceResult<(), InterfaceError<G::Error>> {
        self.gpio
            .set_direction(pin, Direction::Output)
            .map_err(|e| InterfaceError::Gpio(e))?;
        self.set(pin, PinState::Low)
    }

    /// Put the low `lines` bits of `bits` on the first `lines` data lines
    fn put_bits(&mut self, bits: u8, lines: usize) -> InterfaceResult<(), InterfaceError<G::Error>> {
        let data_bus = self.data_bus;
        for (index, pin) in data_bus.pins().iter().take(lines).enumerate() {
            let level = PinState::from((bits >> index) & 0x01 != 0);
            self.set(*pin, level)?;
        }
        Ok(())
    }

    /// Clock the asserted data lines into the controller
    ///
    /// Enable goes low, high, low with [`ENABLE_PULSE_MS`] at each level.
    fn pulse_enable(&mut self) -> InterfaceResult<(), InterfaceError<G::Error>> {
        let enable = self.control(ControlLine::Enable)?;
        self.set(enable, PinState::Low)?;
        self.delay.delay_ms(ENABLE_PULSE_MS);
        self.set(enable, PinState::High)?;
        self.delay.delay_ms(ENABLE_PULSE_MS);
        self.set(enable, PinState::Low)?;
        self.delay.delay_ms(ENABLE_PULSE_MS);
        Ok(())
    }
}

impl<G, D> BusInterface for Interface<G, D>
where
    G: Gpio,
    D: DelayNs,
{
    type Error = InterfaceError<G::Error>;

    fn bus_width(&self) -> BusWidth {
        self.data_bus.width()
    }

    fn configure(&mut self) -> InterfaceResult<(), Self::Error> {
        let register_select = self.control(ControlLine::RegisterSelect)?;
        let enable = self.control(ControlLine::Enable)?;

        self.make_output(register_select)?;
        if let Some(read_write) = self.read_write {
            // Held low: the driver only ever writes
            self.make_output(read_write)?;
        }
        self.make_output(enable)?;

        let data_bus = self.data_bus;
        for pin in data_bus.pins() {
            self.make_output(*pin)?;
        }
        Ok(())
    }

    fn write_nibble(&mut self, nibble: u8) -> InterfaceResult<(), Self::Error> {
        let register_select = self.control(ControlLine::RegisterSelect)?;
        self.set(register_select, PinState::Low)?;
        self.put_bits(nibble & 0x0F, 4)?;
        self.pulse_enable()
    }

    fn transmit(&mut self, value: u8, register: Register) -> InterfaceResult<(), Self::Error> {
        trace!("transmit {value:#04x} to {register:?}");
        let register_select = self.control(ControlLine::RegisterSelect)?;
        self.set(register_select, register.into())?;

        match self.data_bus.width() {
            BusWidth::Eight => {
                self.put_bits(value, 8)?;
                self.pulse_enable()?;
            }
            BusWidth::Four => {
                // High nibble first
                self.put_bits(value >> 4, 4)?;
                self.pulse_enable()?;
                self.put_bits(value & 0x0F, 4)?;
                self.pulse_enable()?;
            }
        }

        self.delay.delay_ms(COMMAND_SETTLE_MS);
        Ok(())
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Builder;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Event {
        Direction(u8, Direction),
        Level(u8, bool),
        Delay(u32),
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct MockError;

    struct MockGpio {
        log: Log,
        fail_on: Option<u8>,
    }

    impl Gpio for MockGpio {
        type Error = MockError;

        fn set_direction(&mut self, pin: PinId, direction: Direction) -> Result<(), MockError> {
            self.log.borrow_mut().push(Event::Direction(pin.0, direction));
            Ok(())
        }

        fn set_level(&mut self, pin: PinId, level: PinState) -> Result<(), MockError> {
            if self.fail_on == Some(pin.0) {
                return Err(MockError);
            }
            self.log
                .borrow_mut()
                .push(Event::Level(pin.0, level == PinState::High));
            Ok(())
        }
    }

    struct MockDelay {
        log: Log,
    }

    impl DelayNs for MockDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.log.borrow_mut().push(Event::Delay(ns / 1_000_000));
        }

        fn delay_ms(&mut self, ms: u32) {
            self.log.borrow_mut().push(Event::Delay(ms));
        }
    }

    const RS: u8 = 1;
    const RW: u8 = 2;
    const EN: u8 = 3;

    fn test_interface(data_bus: DataBus) -> (Interface<MockGpio, MockDelay>, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let config = Builder::new()
            .register_select(PinId(RS))
            .read_write(PinId(RW))
            .enable(PinId(EN))
            .data_bus(data_bus)
            .build()
            .unwrap();
        let gpio = MockGpio {
            log: log.clone(),
            fail_on: None,
        };
        let delay = MockDelay { log: log.clone() };
        (Interface::new(gpio, delay, &config), log)
    }

    fn four_bit() -> DataBus {
        DataBus::Four([PinId(10), PinId(11), PinId(12), PinId(13)])
    }

    fn eight_bit() -> DataBus {
        DataBus::Eight([
            PinId(10),
            PinId(11),
            PinId(12),
            PinId(13),
            PinId(14),
            PinId(15),
            PinId(16),
            PinId(17),
        ])
    }

    /// Value on the data lines at each falling edge of enable
    fn latched(log: &[Event], data_pins: &[u8]) -> Vec<u8> {
        let mut levels = [false; 256];
        let mut enable_high = false;
        let mut out = Vec::new();
        for event in log {
            if let Event::Level(pin, high) = *event {
                if pin == EN {
                    if enable_high && !high {
                        let value = data_pins
                            .iter()
                            .enumerate()
                            .fold(0u8, |acc, (i, p)| acc | (u8::from(levels[*p as usize]) << i));
                        out.push(value);
                    }
                    enable_high = high;
                } else {
                    levels[pin as usize] = high;
                }
            }
        }
        out
    }

    fn last_level(log: &[Event], pin: u8) -> Option<bool> {
        log.iter().rev().find_map(|event| match *event {
            Event::Level(p, high) if p == pin => Some(high),
            _ => None,
        })
    }

    #[test]
    fn test_configure_drives_all_lines_low() {
        let (mut interface, log) = test_interface(four_bit());
        interface.configure().unwrap();

        let log = log.borrow();
        for pin in [RS, RW, EN, 10, 11, 12, 13] {
            assert!(log.contains(&Event::Direction(pin, Direction::Output)));
            assert_eq!(last_level(&log, pin), Some(false));
        }
        assert!(!log.iter().any(|e| matches!(e, Event::Delay(_))));
    }

    #[test]
    fn test_configure_without_read_write_line() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let config = Builder::new()
            .register_select(PinId(RS))
            .enable(PinId(EN))
            .data_bus(four_bit())
            .build()
            .unwrap();
        let gpio = MockGpio {
            log: log.clone(),
            fail_on: None,
        };
        let mut interface = Interface::new(gpio, MockDelay { log: log.clone() }, &config);
        interface.configure().unwrap();

        assert!(!log.borrow().iter().any(|e| matches!(e, Event::Direction(RW, _))));
    }

    #[test]
    fn test_four_bit_sends_high_nibble_first() {
        let (mut interface, log) = test_interface(four_bit());
        interface.transmit(0xA5, Register::Data).unwrap();

        let latched = latched(&log.borrow(), &[10, 11, 12, 13]);
        assert_eq!(latched, [0x0A, 0x05]);
    }

    #[test]
    fn test_four_bit_nibbles_for_every_byte() {
        for value in 0..=u8::MAX {
            let (mut interface, log) = test_interface(four_bit());
            interface.transmit(value, Register::Instruction).unwrap();
            let latched = latched(&log.borrow(), &[10, 11, 12, 13]);
            assert_eq!(latched, [value >> 4, value & 0x0F]);
        }
    }

    #[test]
    fn test_eight_bit_single_transfer() {
        let (mut interface, log) = test_interface(eight_bit());
        interface.transmit(0b1000_0001, Register::Instruction).unwrap();

        let log = log.borrow();
        let latched = latched(&log, &[10, 11, 12, 13, 14, 15, 16, 17]);
        assert_eq!(latched, [0b1000_0001]);
        assert_eq!(last_level(&log, 10), Some(true));
        assert_eq!(last_level(&log, 11), Some(false));
        assert_eq!(last_level(&log, 17), Some(true));
    }

    #[test]
    fn test_register_select_level() {
        let (mut interface, log) = test_interface(four_bit());
        interface.transmit(b'A', Register::Data).unwrap();
        assert_eq!(log.borrow().first(), Some(&Event::Level(RS, true)));

        let (mut interface, log) = test_interface(four_bit());
        interface.transmit(0x01, Register::Instruction).unwrap();
        assert_eq!(log.borrow().first(), Some(&Event::Level(RS, false)));
    }

    #[test]
    fn test_enable_pulse_timing_and_settle_delay() {
        let (mut interface, log) = test_interface(eight_bit());
        interface.transmit(0x00, Register::Instruction).unwrap();

        let log = log.borrow();
        let tail: Vec<Event> = log.iter().rev().take(7).rev().copied().collect();
        assert_eq!(
            tail,
            [
                Event::Level(EN, false),
                Event::Delay(1),
                Event::Level(EN, true),
                Event::Delay(1),
                Event::Level(EN, false),
                Event::Delay(1),
                Event::Delay(COMMAND_SETTLE_MS),
            ]
        );
    }

    #[test]
    fn test_write_nibble_single_pulse() {
        let (mut interface, log) = test_interface(four_bit());
        interface.write_nibble(0b0011).unwrap();

        let log = log.borrow();
        assert_eq!(latched(&log, &[10, 11, 12, 13]), [0b0011]);
        assert_eq!(last_level(&log, RS), Some(false));
    }

    #[test]
    fn test_gpio_error_aborts_transfer() {
        let (mut interface, log) = test_interface(four_bit());
        interface.gpio.fail_on = Some(EN);

        let result = interface.transmit(0xFF, Register::Data);
        assert!(matches!(result, Err(InterfaceError::Gpio(MockError))));
        assert!(!log.borrow().iter().any(|e| matches!(e, Event::Delay(_))));
    }

    #[test]
    fn test_unconnected_enable() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let config = Builder::new()
            .register_select(PinId(RS))
            .data_bus(four_bit())
            .build()
            .unwrap();
        let gpio = MockGpio {
            log: log.clone(),
            fail_on: None,
        };
        let mut interface = Interface::new(gpio, MockDelay { log }, &config);
        assert!(matches!(
            interface.configure(),
            Err(InterfaceError::Unconnected(ControlLine::Enable))
        ));
    }
}
