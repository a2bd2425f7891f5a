/// Bytes of addressable memory
pub const MEMORY_SIZE: usize = 4096;

/// Address that ROMs are loaded at and where the program counter starts
pub const PROGRAM_START: u16 = 0x200;

/// Address of the first glyph in the sprite sheet
pub const FONT_OFFSET: u16 = 0x000;

/// Bytes per glyph in the sprite sheet
pub const FONT_GLYPH_SIZE: u16 = 5;

/// Number of general purpose registers (V0..VF)
pub const REGISTER_COUNT: usize = 16;

/// Index of the flag register VF
pub const FLAG_REGISTER: usize = 0xF;

/// Number of return addresses the stack holds unless configured otherwise
pub const DEFAULT_STACK_DEPTH: usize = 16;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Rate at which the host should call `tick_timers`
pub const TIMER_HZ: u32 = 60;

/// Nanoseconds per CPU cycle for a 500Hz clock
pub const CLOCK_SPEED: u64 = 2_000_000;

/// # Sprite Sheet
/// Sixteen 8x5 glyphs for the hex digits 0..F, one byte per row.
/// Only the high nibble of each row is used, e.g. `0`:
///
/// ```text
/// 0xF0  ****
/// 0x90  *  *
/// 0x90  *  *
/// 0x90  *  *
/// 0xF0  ****
/// ```
pub const FONT_SET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
