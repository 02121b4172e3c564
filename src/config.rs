//! Display configuration types and builder

pub use crate::error::{BuilderError, MAX_LINES};

use crate::command::{FUNCTION_2LINE, FUNCTION_5X10, FUNCTION_8BIT, FUNCTION_SET};
use crate::error::ControlLine;
use crate::gpio::PinId;

/// DDRAM row offsets shared by most 16x2, 20x2 and 20x4 panels
pub const DEFAULT_ROW_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

/// Width of the parallel data bus
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusWidth {
    /// Four data lines (DB4..DB7), each byte sent as two nibbles
    Four,
    /// Eight data lines (DB0..DB7)
    Eight,
}

/// Data lines, least significant first
///
/// In 4-bit mode these are the lines wired to DB4..DB7.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataBus {
    /// 4-bit bus
    Four([PinId; 4]),
    /// 8-bit bus
    Eight([PinId; 8]),
}

impl DataBus {
    /// Bus width selected by this wiring
    pub fn width(&self) -> BusWidth {
        match self {
            Self::Four(_) => BusWidth::Four,
            Self::Eight(_) => BusWidth::Eight,
        }
    }

    /// Data lines in bit order
    pub fn pins(&self) -> &[PinId] {
        match self {
            Self::Four(pins) => pins,
            Self::Eight(pins) => pins,
        }
    }
}

/// Character matrix size
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Font {
    /// 5x8 dots (5x7 glyph plus cursor line)
    #[default]
    Dots5x8,
    /// 5x10 dots, only honoured by the controller in 1-line mode
    Dots5x10,
}

/// Display configuration
///
/// The device descriptor for one panel. Use `Builder` to create a Config.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Register select line (low=instruction, high=data)
    pub register_select: Option<PinId>,
    /// Read/write line, `None` when tied to ground
    pub read_write: Option<PinId>,
    /// Enable (latch) line
    pub enable: Option<PinId>,
    /// Data lines and bus width
    pub data_bus: DataBus,
    /// Number of display lines (1 to 4)
    pub line_count: u8,
    /// DDRAM address of the first column of each row
    pub row_offsets: [u8; 4],
    /// Character matrix size
    pub font: Font,
}

impl Config {
    /// Check that the configuration can drive a panel
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingPin` if the register select or enable
    /// line is not connected, and `ConfigError::InvalidLineCount` if
    /// `line_count` is outside 1..=4.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.register_select.is_none() {
            return Err(ConfigError::MissingPin(ControlLine::RegisterSelect));
        }
        if self.enable.is_none() {
            return Err(ConfigError::MissingPin(ControlLine::Enable));
        }
        if self.line_count == 0 || self.line_count > MAX_LINES {
            return Err(ConfigError::InvalidLineCount {
                lines: self.line_count,
            });
        }
        Ok(())
    }

    /// Bus width selected by the data bus wiring
    pub fn bus_width(&self) -> BusWidth {
        self.data_bus.width()
    }

    /// Function-set instruction for this configuration
    ///
    /// Panels with more than one line run the controller in 2-line mode.
    pub fn function_set(&self) -> u8 {
        let mut value = FUNCTION_SET;
        if self.bus_width() == BusWidth::Eight {
            value |= FUNCTION_8BIT;
        }
        if self.line_count > 1 {
            value |= FUNCTION_2LINE;
        }
        if self.font == Font::Dots5x10 {
            value |= FUNCTION_5X10;
        }
        value
    }

    /// Row actually addressed for a requested row
    ///
    /// Rows past the last physical row clamp to it.
    pub fn clamp_row(&self, row: u8) -> u8 {
        let row = row.min(MAX_LINES - 1);
        row.min(self.line_count.saturating_sub(1))
    }

    /// DDRAM address of (`col`, `row`), after row clamping
    pub fn ddram_address(&self, col: u8, row: u8) -> u8 {
        self.row_offsets[self.clamp_row(row) as usize].wrapping_add(col)
    }
}

/// Configuration problems detected before any hardware access
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A mandatory control line is not connected
    MissingPin(ControlLine),
    /// Line count outside 1..=4
    InvalidLineCount {
        /// Line count requested
        lines: u8,
    },
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```rust,no_run
/// use hd44780_gpio::{Builder, DataBus, PinId};
///
/// let config = match Builder::new()
///     .register_select(PinId(10))
///     .read_write(PinId(11))
///     .enable(PinId(12))
///     .data_bus(DataBus::Four([PinId(35), PinId(36), PinId(37), PinId(38)]))
///     .line_count(2)
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// let _ = config;
/// ```
#[must_use]
pub struct Builder {
    /// Register select line (required before init)
    register_select: Option<PinId>,
    /// Read/write line
    read_write: Option<PinId>,
    /// Enable line (required before init)
    enable: Option<PinId>,
    /// Data lines (required)
    data_bus: Option<DataBus>,
    /// Number of display lines
    line_count: u8,
    /// DDRAM row offsets
    row_offsets: [u8; 4],
    /// Character matrix size
    font: Font,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            register_select: None,
            read_write: None,
            enable: None,
            data_bus: None,
            // Default: the ubiquitous 16x2 panel
            line_count: 2,
            row_offsets: DEFAULT_ROW_OFFSETS,
            font: Font::Dots5x8,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the register select line
    pub fn register_select(mut self, pin: PinId) -> Self {
        self.register_select = Some(pin);
        self
    }

    /// Set the read/write line
    ///
    /// Leave unset when R/W is tied to ground. When set, it is held low.
    pub fn read_write(mut self, pin: PinId) -> Self {
        self.read_write = Some(pin);
        self
    }

    /// Set the enable line
    pub fn enable(mut self, pin: PinId) -> Self {
        self.enable = Some(pin);
        self
    }

    /// Set the data lines (required)
    pub fn data_bus(mut self, bus: DataBus) -> Self {
        self.data_bus = Some(bus);
        self
    }

    /// Set the number of display lines
    pub fn line_count(mut self, lines: u8) -> Self {
        self.line_count = lines;
        self
    }

    /// Set DDRAM row offsets
    ///
    /// These depend on the panel geometry; check the module datasheet.
    pub fn row_offsets(mut self, offsets: [u8; 4]) -> Self {
        self.row_offsets = offsets;
        self
    }

    /// Set the character matrix size
    pub fn font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    /// Build the configuration
    ///
    /// Control line presence and line count are checked by
    /// [`Config::validate`] when the display is initialized.
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingDataBus` if the data lines were not set
    pub fn build(self) -> Result<Config, BuilderError> {
        Ok(Config {
            register_select: self.register_select,
            read_write: self.read_write,
            enable: self.enable,
            data_bus: self.data_bus.ok_or(BuilderError::MissingDataBus)?,
            line_count: self.line_count,
            row_offsets: self.row_offsets,
            font: self.font,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_bit() -> DataBus {
        DataBus::Four([PinId(4), PinId(5), PinId(6), PinId(7)])
    }

    fn config(lines: u8) -> Config {
        Builder::new()
            .register_select(PinId(1))
            .enable(PinId(2))
            .data_bus(four_bit())
            .line_count(lines)
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_without_data_bus_fails() {
        let result = Builder::new().build();
        assert!(matches!(result, Err(BuilderError::MissingDataBus)));
    }

    #[test]
    fn test_validate_missing_register_select() {
        let config = Builder::new()
            .enable(PinId(2))
            .data_bus(four_bit())
            .build()
            .unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingPin(ControlLine::RegisterSelect))
        );
    }

    #[test]
    fn test_validate_missing_enable() {
        let config = Builder::new()
            .register_select(PinId(1))
            .data_bus(four_bit())
            .build()
            .unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingPin(ControlLine::Enable))
        );
    }

    #[test]
    fn test_validate_line_count_range() {
        assert_eq!(
            config(0).validate(),
            Err(ConfigError::InvalidLineCount { lines: 0 })
        );
        assert_eq!(
            config(5).validate(),
            Err(ConfigError::InvalidLineCount { lines: 5 })
        );
        for lines in 1..=4 {
            assert!(config(lines).validate().is_ok());
        }
    }

    #[test]
    fn test_function_set_bits() {
        assert_eq!(config(2).function_set(), 0x28);
        assert_eq!(config(1).function_set(), 0x20);

        let mut eight = config(4);
        eight.data_bus = DataBus::Eight([
            PinId(0),
            PinId(1),
            PinId(2),
            PinId(3),
            PinId(4),
            PinId(5),
            PinId(6),
            PinId(7),
        ]);
        assert_eq!(eight.function_set(), 0x38);

        let mut large = config(1);
        large.font = Font::Dots5x10;
        assert_eq!(large.function_set(), 0x24);
    }

    #[test]
    fn test_clamp_row() {
        let two = config(2);
        assert_eq!(two.clamp_row(0), 0);
        assert_eq!(two.clamp_row(1), 1);
        assert_eq!(two.clamp_row(2), 1);
        assert_eq!(two.clamp_row(200), 1);

        let four = config(4);
        assert_eq!(four.clamp_row(3), 3);
        assert_eq!(four.clamp_row(4), 3);
        assert_eq!(four.clamp_row(u8::MAX), 3);
    }

    #[test]
    fn test_ddram_address() {
        let four = config(4);
        assert_eq!(four.ddram_address(4, 1), 0x44);
        assert_eq!(four.ddram_address(0, 2), 0x14);
        assert_eq!(four.ddram_address(19, 3), 0x67);
    }
}
