//! An interpreter core for the Chip-8 virtual machine.
//!
//! The core fetches, decodes and executes instructions and owns the 64x32
//! frame buffer that `DXYN` draws into. Everything else is left to the host:
//! - [`Chip8::step`] at the CPU rate, handing in its [`Keypad`]
//! - [`Chip8::tick_timers`] at 60Hz
//! - painting the frame buffer after [`SideEffect::Draw`] or [`SideEffect::ClearScreen`]
//! - answering [`SideEffect::WaitForKey`] with [`Chip8::provide_key`]
pub use chip8::{Chip8, RunState};
pub use config::{Config, JumpOffset};
pub use constants::CLOCK_SPEED;
pub use error::{Error, Result};
pub use instruction::{Context, Instruction};
pub use keypad::{Keypad, Keys};
pub use opcode::Opcode;
pub use side_effect::{SideEffect, TimerEvent};
pub use state::{FrameBuffer, State};

mod chip8;
mod config;
pub mod constants;
mod error;
mod instruction;
mod keypad;
pub mod memory;
mod opcode;
mod operations;
mod side_effect;
pub mod stack;
pub mod state;
