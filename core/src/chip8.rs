use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::config::Config;
use crate::constants::{MEMORY_SIZE, PROGRAM_START};
use crate::error::{Error, Result};
use crate::instruction::{execute_op, Context, Instruction};
use crate::keypad::Keypad;
use crate::opcode::Opcode;
use crate::side_effect::{SideEffect, TimerEvent};
use crate::state::{FrameBuffer, State};

/// Whether `step` will execute anything
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// `FX0A` is waiting for `provide_key` to fill `register`
    WaitingForKey { register: u8 },
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - the random source used by `CXNN`
///
/// Supplies interfaces for:
/// - loading roms
/// - advancing the CPU and resuming it after a key wait
/// - advancing its timers
/// - inspecting its frame buffer for rendering by some display
///
/// The host owns the clock: `step` at the CPU rate and `tick_timers` at 60Hz.
pub struct Chip8<R = StdRng> {
    state: State,
    config: Config,
    rng: R,
}

impl Chip8<StdRng> {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Seeds `CXNN` from `config.seed` if there is one and the OS otherwise
    pub fn with_config(config: Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: RngCore> Chip8<R> {
    pub fn with_rng(config: Config, rng: R) -> Self {
        Chip8 {
            state: State::new(config.stack_depth),
            config,
            rng,
        }
    }

    /// Back to power-on: zeroed memory with the sprite sheet, registers, stack
    /// and frame buffer cleared, pc at 0x200. The program has to be loaded again.
    pub fn reset(&mut self) {
        log::debug!("resetting");
        self.state = State::new(self.config.stack_depth);
    }

    /// Copies a program into memory at 0x200
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        let max = MEMORY_SIZE - usize::from(PROGRAM_START);
        if program.len() > max {
            return Err(Error::ProgramTooLarge {
                size: program.len(),
                max,
            });
        }
        self.state
            .memory
            .load(usize::from(PROGRAM_START), program)?;
        log::debug!("loaded {} byte program", program.len());
        Ok(())
    }

    /// Load a rom from a source file
    ///
    /// # Arguments
    /// * `reader` a reader that contains a ROM
    pub fn load_rom(&mut self, reader: &mut dyn std::io::Read) -> Result<()> {
        let mut program = Vec::new();
        reader.read_to_end(&mut program)?;
        self.load_program(&program)
    }

    /// Advances the CPU by a single cycle
    /// - does nothing while awaiting a keypress
    /// - otherwise fetches, decodes and executes the opcode at the pc
    ///
    /// A failed step leaves the machine exactly as it was.
    pub fn step(&mut self, keypad: &dyn Keypad) -> Result<SideEffect> {
        if self.state.register_needing_key.is_some() {
            return Ok(SideEffect::None);
        }

        let pc = self.state.pc;
        let op = Opcode(self.state.fetch().map_err(|e| {
            log::warn!("fetch at {:#05X} failed: {}", pc, e);
            e
        })?);
        if log::log_enabled!(log::Level::Trace) {
            let text = Instruction::decode(op)
                .map(|instruction| instruction.to_string())
                .unwrap_or_else(|_| String::from("???"));
            log::trace!(
                "{:04X} {} {:<14} v{:02X?} i{:04X}",
                pc,
                op,
                text,
                self.state.v,
                self.state.i
            );
        }

        let mut ctx = Context {
            keypad,
            rng: &mut self.rng,
            jump_offset: self.config.jump_offset,
        };
        let effect = execute_op(op, &mut self.state, &mut ctx).map_err(|e| {
            log::warn!("{} at {:#05X} failed: {}", op, pc, e);
            e
        })?;

        if let Some(register) = self.state.register_needing_key {
            log::debug!("V{:X} waiting for a key", register);
        }
        Ok(effect)
    }

    /// Delivers the key a `FX0A` is waiting for and resumes execution.
    /// Returns false, ignoring the key, if nothing was waiting.
    pub fn provide_key(&mut self, key: u8) -> bool {
        match self.state.register_needing_key.take() {
            Some(register) => {
                let key = key & 0xF;
                log::debug!("V{:X} = key {:X}", register, key);
                self.state.set_vx(register, key);
                true
            }
            None => false,
        }
    }

    /// Counts both timers down toward zero; to be called at 60Hz.
    /// Reports a beep on the tick where the sound timer runs out.
    pub fn tick_timers(&mut self) -> TimerEvent {
        if self.state.delay_timer > 0 {
            self.state.delay_timer -= 1;
        }

        match self.state.sound_timer {
            0 => TimerEvent::None,
            1 => {
                self.state.sound_timer = 0;
                TimerEvent::Beep
            }
            _ => {
                self.state.sound_timer -= 1;
                TimerEvent::None
            }
        }
    }

    /// Whether a tone should currently be playing
    pub fn sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    pub fn run_state(&self) -> RunState {
        match self.state.register_needing_key {
            Some(register) => RunState::WaitingForKey { register },
            None => RunState::Running,
        }
    }

    pub fn is_waiting_for_key(&self) -> bool {
        self.state.register_needing_key.is_some()
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Returns the FrameBuffer if the display should be redrawn, unsetting the draw flag
    pub fn take_frame(&mut self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Default for Chip8<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypad::Keys;

    fn chip8_with(program: &[u8]) -> Chip8 {
        let mut chip8 = Chip8::with_config(Config::default().seed(0));
        chip8.load_program(program).unwrap();
        chip8
    }

    #[test]
    fn test_cycles_while_no_register_needs_key() {
        // insert a cls opcode so we don't fail at reading an unknown opcode
        let mut chip8 = chip8_with(&[0x00, 0xE0]);
        let effect = chip8.step(&Keys::new()).unwrap();
        assert_eq!(effect, SideEffect::ClearScreen);
        assert_eq!(chip8.state.pc, 0x202);
    }

    #[test]
    fn test_doesnt_cycle_while_register_needs_key() {
        let mut chip8 = chip8_with(&[0xF1, 0x0A, 0x61, 0x22]);
        assert_eq!(chip8.step(&Keys::new()).unwrap(), SideEffect::WaitForKey);
        assert_eq!(chip8.run_state(), RunState::WaitingForKey { register: 0x1 });
        for _ in 0..3 {
            assert_eq!(chip8.step(&Keys::new()).unwrap(), SideEffect::None);
            assert_eq!(chip8.state.pc, 0x202);
        }
    }

    #[test]
    fn test_captures_key_presses() {
        let mut chip8 = chip8_with(&[0xF1, 0x0A, 0x61, 0x22]);
        chip8.step(&Keys::new()).unwrap();
        assert!(chip8.provide_key(0xE));
        assert_eq!(chip8.run_state(), RunState::Running);
        assert_eq!(chip8.state.v[0x1], 0xE);
        chip8.step(&Keys::new()).unwrap();
        assert_eq!(chip8.state.v[0x1], 0x22);
    }

    #[test]
    fn test_ignores_keys_nobody_waits_for() {
        let mut chip8 = chip8_with(&[]);
        assert!(!chip8.provide_key(0x3));
        assert_eq!(chip8.state.v, [0; 16]);
    }

    #[test]
    fn test_skp_reads_the_given_keypad() {
        let mut chip8 = chip8_with(&[0x60, 0x05, 0xE0, 0x9E]);
        let mut keys = Keys::new();
        keys.press(0x5);
        chip8.step(&keys).unwrap();
        chip8.step(&keys).unwrap();
        assert_eq!(chip8.state.pc, 0x206);
    }

    #[test]
    fn test_unknown_opcode_is_fatal_and_leaves_state() {
        let mut chip8 = chip8_with(&[0xFF, 0xFF]);
        let result = chip8.step(&Keys::new());
        assert!(matches!(
            result,
            Err(Error::UnimplementedOpcode { opcode: 0xFFFF })
        ));
        assert_eq!(chip8.state.pc, 0x200);
    }

    #[test]
    fn test_fetch_past_the_end_fails() {
        let mut chip8 = chip8_with(&[0x1F, 0xFF]);
        chip8.step(&Keys::new()).unwrap();
        assert!(matches!(
            chip8.step(&Keys::new()),
            Err(Error::OutOfBoundsAccess { .. })
        ));
        assert_eq!(chip8.state.pc, 0xFFF);
    }

    #[test]
    fn test_call_and_return() {
        // 0x200: CALL 0x206; 0x202: LD V2, 0x02; 0x206: LD V1, 0x01; RET
        let mut chip8 = chip8_with(&[0x22, 0x06, 0x62, 0x02, 0x00, 0x00, 0x61, 0x01, 0x00, 0xEE]);
        for _ in 0..4 {
            chip8.step(&Keys::new()).unwrap();
        }
        assert_eq!(chip8.state.v[0x1], 0x01);
        assert_eq!(chip8.state.v[0x2], 0x02);
        assert_eq!(chip8.state.pc, 0x204);
        assert!(chip8.state.stack.is_empty());
    }

    #[test]
    fn test_timers_floor_at_zero() {
        let mut chip8 = chip8_with(&[]);
        chip8.state.delay_timer = 0x1;
        chip8.tick_timers();
        assert_eq!(chip8.state.delay_timer, 0x0);
        assert_eq!(chip8.tick_timers(), TimerEvent::None);
        assert_eq!(chip8.state.delay_timer, 0x0);
        assert_eq!(chip8.state.sound_timer, 0x0);
    }

    #[test]
    fn test_beeps_once_when_sound_runs_out() {
        let mut chip8 = chip8_with(&[]);
        chip8.state.sound_timer = 0x3;
        let events: Vec<TimerEvent> = (0..5).map(|_| chip8.tick_timers()).collect();
        assert_eq!(
            events,
            [
                TimerEvent::None,
                TimerEvent::None,
                TimerEvent::Beep,
                TimerEvent::None,
                TimerEvent::None
            ]
        );
        assert!(!chip8.sound_active());
    }

    #[test]
    fn test_step_doesnt_touch_timers() {
        let mut chip8 = chip8_with(&[0x00, 0xE0]);
        chip8.state.delay_timer = 0x5;
        chip8.step(&Keys::new()).unwrap();
        assert_eq!(chip8.state.delay_timer, 0x5);
    }

    #[test]
    fn test_take_frame_unsets_draw_flag() {
        let mut chip8 = chip8_with(&[0xD0, 0x05]);
        assert!(chip8.take_frame().is_none());
        chip8.step(&Keys::new()).unwrap();
        assert_eq!(chip8.take_frame().map(|frame| frame[0][0]), Some(1));
        assert!(chip8.take_frame().is_none());
    }

    #[test]
    fn test_rejects_oversized_programs() {
        let mut chip8 = Chip8::new();
        let program = vec![0xAA; 0xE01];
        assert!(matches!(
            chip8.load_program(&program),
            Err(Error::ProgramTooLarge { size: 0xE01, max: 0xE00 })
        ));
        assert!(chip8.load_program(&program[..0xE00]).is_ok());
    }

    #[test]
    fn test_loads_rom_from_reader() {
        let mut chip8 = Chip8::new();
        let mut rom: &[u8] = &[0x12, 0x34];
        chip8.load_rom(&mut rom).unwrap();
        assert_eq!(chip8.state.memory.read_word(0x200).unwrap(), 0x1234);
    }

    #[test]
    fn test_reset_clears_everything_but_the_font() {
        let mut chip8 = chip8_with(&[0x61, 0x22, 0xF1, 0x0A]);
        chip8.step(&Keys::new()).unwrap();
        chip8.step(&Keys::new()).unwrap();
        chip8.reset();
        assert_eq!(chip8.run_state(), RunState::Running);
        assert_eq!(chip8.state.pc, 0x200);
        assert_eq!(chip8.state.v, [0; 16]);
        assert_eq!(chip8.state.memory.read_word(0x200).unwrap(), 0x0000);
        assert_eq!(chip8.state.memory.read(0x0).unwrap(), 0xF0);
    }

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let program = [0xC1, 0xFF, 0xC2, 0xFF];
        let mut a = chip8_with(&program);
        let mut b = chip8_with(&program);
        for _ in 0..2 {
            a.step(&Keys::new()).unwrap();
            b.step(&Keys::new()).unwrap();
        }
        assert_eq!(a.state.v, b.state.v);
    }
}
