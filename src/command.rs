//! HD44780 instruction definitions
//!
//! This module defines the instruction bytes and flag bits of the HD44780
//! instruction set. Instructions are written with the register-select line
//! low; character and glyph bytes are written with it high.
//!
//! ## Instruction Structure
//!
//! Each instruction is a single byte whose highest set bit selects the
//! instruction, with the lower bits carrying its flags:
//!
//! | Instruction | Base | Flags |
//! |---|---|---|
//! | Clear display | `0x01` | none |
//! | Return home | `0x02` | none |
//! | Entry mode set | `0x04` | I/D, S |
//! | Display control | `0x08` | D, C, B |
//! | Cursor/display shift | `0x10` | S/C, R/L |
//! | Function set | `0x20` | DL, N, F |
//! | Set CGRAM address | `0x40` | 6-bit address |
//! | Set DDRAM address | `0x80` | 7-bit address |
//!
//! ## Example
//!
//! ```
//! use hd44780_gpio::command;
//!
//! let display_on = command::DISPLAY_CONTROL | command::DISPLAY_ON;
//! assert_eq!(display_on, 0x0C);
//! assert_eq!(command::display_control(true, true, true), 0x0F);
//! ```

/// Clear display (0x01)
///
/// Fills DDRAM with spaces and resets the address counter.
pub const CLEAR_DISPLAY: u8 = 0x01;

/// Return home (0x02)
///
/// Resets the address counter and display shift without touching DDRAM.
pub const RETURN_HOME: u8 = 0x02;

/// Entry mode set (0x04)
pub const ENTRY_MODE_SET: u8 = 0x04;
/// Entry mode: increment address after each write (left to right)
pub const ENTRY_INCREMENT: u8 = 0x02;
/// Entry mode: shift the display on each write
pub const ENTRY_SHIFT: u8 = 0x01;

/// Display on/off control (0x08)
pub const DISPLAY_CONTROL: u8 = 0x08;
/// Display control: display on
pub const DISPLAY_ON: u8 = 0x04;
/// Display control: underline cursor on
pub const CURSOR_ON: u8 = 0x02;
/// Display control: blinking block cursor on
pub const BLINK_ON: u8 = 0x01;

/// Cursor or display shift (0x10)
pub const CURSOR_SHIFT: u8 = 0x10;
/// Shift: move the whole display instead of the cursor
pub const SHIFT_DISPLAY: u8 = 0x08;
/// Shift: towards the right (left when clear)
pub const SHIFT_RIGHT: u8 = 0x04;

/// Function set (0x20)
pub const FUNCTION_SET: u8 = 0x20;
/// Function set: 8-bit bus
pub const FUNCTION_8BIT: u8 = 0x10;
/// Function set: 2-line mode
pub const FUNCTION_2LINE: u8 = 0x08;
/// Function set: 5x10 dot font
pub const FUNCTION_5X10: u8 = 0x04;

/// Set CGRAM address (0x40)
///
/// Custom glyph `n` starts at CGRAM address `n << 3`.
pub const SET_CGRAM_ADDR: u8 = 0x40;

/// Set DDRAM address (0x80)
pub const SET_DDRAM_ADDR: u8 = 0x80;

/// Nibble written three times while forcing the controller into 8-bit mode
pub const INIT_NIBBLE_8BIT: u8 = 0b0011;
/// Nibble that switches the controller into 4-bit mode
pub const INIT_NIBBLE_4BIT: u8 = 0b0010;

/// Display control byte for the given flags
pub const fn display_control(display: bool, cursor: bool, blink: bool) -> u8 {
    let mut value = DISPLAY_CONTROL;
    if display {
        value |= DISPLAY_ON;
    }
    if cursor {
        value |= CURSOR_ON;
    }
    if blink {
        value |= BLINK_ON;
    }
    value
}

/// Entry mode byte for the given text direction
pub const fn entry_mode(left_to_right: bool, autoscroll: bool) -> u8 {
    let mut value = ENTRY_MODE_SET;
    if left_to_right {
        value |= ENTRY_INCREMENT;
    }
    if autoscroll {
        value |= ENTRY_SHIFT;
    }
    value
}

/// Display shift byte, moving the visible window by one column
pub const fn display_shift(right: bool) -> u8 {
    if right {
        CURSOR_SHIFT | SHIFT_DISPLAY | SHIFT_RIGHT
    } else {
        CURSOR_SHIFT | SHIFT_DISPLAY
    }
}

/// Set-DDRAM-address byte
pub const fn set_ddram_address(address: u8) -> u8 {
    SET_DDRAM_ADDR | (address & 0x7F)
}

/// Set-CGRAM-address byte for the start of a glyph slot (0..=7)
pub const fn set_cgram_slot(slot: u8) -> u8 {
    SET_CGRAM_ADDR | ((slot & 0x07) << 3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_control_flags() {
        let byte = display_control(true, true, true);
        assert_eq!(byte & DISPLAY_ON, DISPLAY_ON);
        assert_eq!(byte & CURSOR_ON, CURSOR_ON);
        assert_eq!(byte & BLINK_ON, BLINK_ON);

        let byte = display_control(false, false, false);
        assert_eq!(byte, DISPLAY_CONTROL);
        assert_eq!(byte & (DISPLAY_ON | CURSOR_ON | BLINK_ON), 0);
    }

    #[test]
    fn test_entry_mode_defaults() {
        assert_eq!(entry_mode(true, false), 0x06);
        assert_eq!(entry_mode(false, true), 0x05);
    }

    #[test]
    fn test_display_shift() {
        assert_eq!(display_shift(false), 0x18);
        assert_eq!(display_shift(true), 0x1C);
    }

    #[test]
    fn test_address_instructions() {
        assert_eq!(set_ddram_address(0x44), 0xC4);
        assert_eq!(set_cgram_slot(0), 0x40);
        assert_eq!(set_cgram_slot(7), 0x78);
    }
}
