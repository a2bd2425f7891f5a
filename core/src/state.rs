use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, FLAG_REGISTER, FONT_OFFSET, FONT_SET, MEMORY_SIZE,
    PROGRAM_START, REGISTER_COUNT,
};
use crate::error::Result;
use crate::memory::Memory;
use crate::stack::Stack;

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry/borrow/collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Timers
/// - 2 8-bit timers (delay & sound), counted down by the host at 60Hz
///
/// ## Memory
/// - a stack of return addresses, 16 deep unless configured otherwise
/// - 4096 bytes of addressable memory with the sprite sheet at 0x000
/// - 32x64 frame buffer
///     - stores the contents of the next frame to be drawn
///
/// ## Input
/// - Emulation halts while a register is waiting for a key's value
#[derive(Clone)]
pub struct State {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: Stack,
    pub memory: Memory,
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub register_needing_key: Option<u8>,
}

impl State {
    pub fn new(stack_depth: usize) -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        let font = usize::from(FONT_OFFSET);
        bytes[font..font + FONT_SET.len()].copy_from_slice(&FONT_SET);
        let memory = Memory::from(bytes);

        State {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            delay_timer: 0,
            sound_timer: 0,
            stack: Stack::new(stack_depth),
            memory,
            frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
            register_needing_key: None,
        }
    }

    pub fn vx(&self, x: u8) -> u8 {
        self.v[usize::from(x)]
    }

    pub fn set_vx(&mut self, x: u8, value: u8) {
        self.v[usize::from(x)] = value;
    }

    /// VF is only ever 0 or 1
    pub fn set_flag(&mut self, flag: bool) {
        self.v[FLAG_REGISTER] = u8::from(flag);
    }

    pub fn flag(&self) -> u8 {
        self.v[FLAG_REGISTER]
    }

    /// The opcode pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    pub fn fetch(&self) -> Result<u16> {
        self.memory.read_word(usize::from(self.pc))
    }

    pub fn clear_screen(&mut self) {
        self.frame_buffer = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    }
}

/// The FrameBuffer is indexed as [y][x]; a pixel is either 0 or 1
pub type FrameBuffer = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
