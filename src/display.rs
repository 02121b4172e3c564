//! Core display operations

use embedded_hal::delay::DelayNs;
use log::{debug, warn};

use crate::command::{self, CLEAR_DISPLAY, INIT_NIBBLE_4BIT, INIT_NIBBLE_8BIT, RETURN_HOME};
use crate::config::{BusWidth, Config, Font};
use crate::error::{Error, MAX_CHAR_SLOT};
use crate::gpio::Gpio;
use crate::interface::{BusInterface, Interface, Register};

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Controller power-on settle time (ms)
pub const POWER_ON_DELAY_MS: u32 = 50;

/// Delay after clear and home, which are the slow instructions (ms)
pub const CLEAR_DELAY_MS: u32 = 50;

/// Waits after the mode-forcing function sets of the 8-bit reset handshake (ms)
const RESET_DELAYS_8BIT_MS: [u32; 2] = [5, 1];

/// Waits after each `0b0011` nibble of the 4-bit reset handshake (ms)
const RESET_DELAYS_4BIT_MS: [u32; 3] = [5, 5, 1];

/// Core display driver for HD44780
///
/// This struct sequences the controller's instruction set over a
/// [`BusInterface`]. Create it, call [`Display::init`] once, then use the
/// remaining operations freely.
pub struct Display<I>
where
    I: BusInterface,
{
    /// Hardware interface
    interface: I,
    /// Display configuration
    config: Config,
}

impl<G, D> Display<Interface<G, D>>
where
    G: Gpio,
    D: DelayNs,
{
    /// Create a display driving the pins of `config` through `gpio`
    pub fn with_gpio(gpio: G, delay: D, config: Config) -> Self {
        let interface = Interface::new(gpio, delay, &config);
        Self::new(interface, config)
    }
}

impl<I> Display<I>
where
    I: BusInterface,
{
    /// Create a new Display instance
    ///
    /// No hardware access happens until [`Display::init`].
    pub fn new(interface: I, config: Config) -> Self {
        Self { interface, config }
    }

    /// Validate the configuration and run the controller reset handshake
    ///
    /// Leaves the display on, cursor and blink off, text running left to
    /// right without autoscroll.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingPin`, `Error::InvalidLineCount` or
    /// `Error::BusWidthMismatch` before touching any pin if the configuration
    /// is unusable, and
    /// `Error::Interface` if the GPIO layer fails.
    pub fn init(&mut self) -> DisplayResult<I> {
        if let Err(e) = self.config.validate() {
            debug!("refusing to initialize: {e}");
            return Err(e.into());
        }
        let (interface, config) = (self.interface.bus_width(), self.config.bus_width());
        if interface != config {
            debug!("refusing to initialize: {interface:?} bus with {config:?} configuration");
            return Err(Error::BusWidthMismatch { interface, config });
        }
        if self.config.font == Font::Dots5x10 && self.config.line_count > 1 {
            warn!("5x10 font is ignored by the controller in 2-line mode");
        }

        self.interface.configure().map_err(Error::Interface)?;
        self.interface.delay_ms(POWER_ON_DELAY_MS);

        let function_set = self.config.function_set();
        match self.interface.bus_width() {
            BusWidth::Eight => {
                for delay_ms in RESET_DELAYS_8BIT_MS {
                    self.send_command(function_set)?;
                    self.interface.delay_ms(delay_ms);
                }
                self.send_command(function_set)?;
            }
            BusWidth::Four => {
                // Controller may be in 8-bit mode or mid-byte; force 8-bit, then drop to 4-bit
                for delay_ms in RESET_DELAYS_4BIT_MS {
                    self.write_nibble(INIT_NIBBLE_8BIT)?;
                    self.interface.delay_ms(delay_ms);
                }
                self.write_nibble(INIT_NIBBLE_4BIT)?;
            }
        }

        self.send_command(function_set)?;
        self.set_display_mode(true, false, false)?;
        self.set_text_direction(true, false)?;

        debug!(
            "initialized with {:?} bus, {} line(s), function set {function_set:#04x}",
            self.interface.bus_width(),
            self.config.line_count
        );
        Ok(())
    }

    /// Clear the display and return the cursor to (0, 0)
    pub fn clear(&mut self) -> DisplayResult<I> {
        self.send_command(CLEAR_DISPLAY)?;
        self.interface.delay_ms(CLEAR_DELAY_MS);
        Ok(())
    }

    /// Return the cursor to (0, 0) and undo any display shift
    ///
    /// DDRAM content is kept.
    pub fn home(&mut self) -> DisplayResult<I> {
        self.send_command(RETURN_HOME)?;
        self.interface.delay_ms(CLEAR_DELAY_MS);
        Ok(())
    }

    /// Set display, cursor and cursor blink on or off
    pub fn set_display_mode(&mut self, display: bool, cursor: bool, blink: bool) -> DisplayResult<I> {
        self.send_command(command::display_control(display, cursor, blink))
    }

    /// Shift the visible window one column left
    ///
    /// DDRAM content is not moved.
    pub fn scroll_left(&mut self) -> DisplayResult<I> {
        self.send_command(command::display_shift(false))
    }

    /// Shift the visible window one column right
    pub fn scroll_right(&mut self) -> DisplayResult<I> {
        self.send_command(command::display_shift(true))
    }

    /// Set the direction the cursor moves after each write
    ///
    /// With `autoscroll`, the display shifts on each write so the cursor
    /// stays in place on screen.
    pub fn set_text_direction(&mut self, left_to_right: bool, autoscroll: bool) -> DisplayResult<I> {
        self.send_command(command::entry_mode(left_to_right, autoscroll))
    }

    /// Write text from left to right
    pub fn left_to_right(&mut self, autoscroll: bool) -> DisplayResult<I> {
        self.set_text_direction(true, autoscroll)
    }

    /// Write text from right to left
    pub fn right_to_left(&mut self, autoscroll: bool) -> DisplayResult<I> {
        self.set_text_direction(false, autoscroll)
    }

    /// Store a custom 5x8 glyph in CGRAM
    ///
    /// Each byte is one row, top first, using the low five bits. The glyph
    /// is then printed with character code `slot`.
    ///
    /// The address counter is left in CGRAM; call [`Display::set_cursor`]
    /// (or clear/home) before writing text again.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidCharSlot` if `slot` is greater than 7.
    pub fn create_custom_char(&mut self, slot: u8, glyph: &[u8; 8]) -> DisplayResult<I> {
        if slot > MAX_CHAR_SLOT {
            return Err(Error::InvalidCharSlot { slot });
        }
        self.send_command(command::set_cgram_slot(slot))?;
        for row in glyph {
            self.send_data(*row)?;
        }
        Ok(())
    }

    /// Move the cursor to `col`, `row`
    ///
    /// Rows past the last line of the panel are clamped to it. Columns are
    /// not checked.
    pub fn set_cursor(&mut self, col: u8, row: u8) -> DisplayResult<I> {
        let address = self.config.ddram_address(col, row);
        self.send_command(command::set_ddram_address(address))
    }

    /// Write a character code at the cursor
    pub fn write_char(&mut self, byte: u8) -> DisplayResult<I> {
        self.send_data(byte)
    }

    /// Write raw character codes at the cursor, in order
    pub fn write_bytes(&mut self, bytes: &[u8]) -> DisplayResult<I> {
        for byte in bytes {
            self.write_char(*byte)?;
        }
        Ok(())
    }

    /// Write the bytes of `text` at the cursor
    ///
    /// There is no wrapping: text past the end of a row lands wherever the
    /// controller's address counter goes next.
    pub fn print(&mut self, text: &str) -> DisplayResult<I> {
        self.write_bytes(text.as_bytes())
    }

    /// Send an instruction byte to the controller
    fn send_command(&mut self, cmd: u8) -> DisplayResult<I> {
        self.interface
            .transmit(cmd, Register::Instruction)
            .map_err(Error::Interface)
    }

    /// Send a data byte to the controller
    fn send_data(&mut self, data: u8) -> DisplayResult<I> {
        self.interface
            .transmit(data, Register::Data)
            .map_err(Error::Interface)
    }

    fn write_nibble(&mut self, nibble: u8) -> DisplayResult<I> {
        self.interface.write_nibble(nibble).map_err(Error::Interface)
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Access the underlying interface
    pub fn interface(&mut self) -> &mut I {
        &mut self.interface
    }

    /// Release the interface
    pub fn release(self) -> I {
        self.interface
    }
}

impl<I: BusInterface> core::fmt::Write for Display<I> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.print(s).map_err(|_| core::fmt::Error)
    }
}
