use std::fmt;

use rand::RngCore;

use crate::config::JumpOffset;
use crate::error::{Error, Result};
use crate::keypad::Keypad;
use crate::opcode::Opcode;
use crate::operations::*;
use crate::side_effect::SideEffect;
use crate::state::State;

/// A decoded opcode with its operands pulled out of the payload nibbles
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    Cls,
    Ret,
    Sys { addr: u16 },
    Jp { addr: u16 },
    Call { addr: u16 },
    Se { x: u8, nn: u8 },
    Sne { x: u8, nn: u8 },
    SeReg { x: u8, y: u8 },
    Ld { x: u8, nn: u8 },
    Add { x: u8, nn: u8 },
    Mov { x: u8, y: u8 },
    Or { x: u8, y: u8 },
    And { x: u8, y: u8 },
    Xor { x: u8, y: u8 },
    AddReg { x: u8, y: u8 },
    Sub { x: u8, y: u8 },
    Shr { x: u8 },
    Subn { x: u8, y: u8 },
    Shl { x: u8 },
    SneReg { x: u8, y: u8 },
    LdI { addr: u16 },
    JpOffset { addr: u16 },
    Rnd { x: u8, nn: u8 },
    Drw { x: u8, y: u8, n: u8 },
    Skp { x: u8 },
    Sknp { x: u8 },
    LdDelay { x: u8 },
    WaitKey { x: u8 },
    SetDelay { x: u8 },
    SetSound { x: u8 },
    AddI { x: u8 },
    Font { x: u8 },
    Bcd { x: u8 },
    Store { x: u8 },
    Read { x: u8 },
}

/// Everything outside of `State` that an instruction may consult
pub struct Context<'a> {
    pub keypad: &'a dyn Keypad,
    pub rng: &'a mut dyn RngCore,
    pub jump_offset: JumpOffset,
}

impl Instruction {
    /// Selects the correct Instruction for a given Opcode.
    /// Fixed opcodes are matched before the family they'd otherwise fall into.
    pub fn decode(op: Opcode) -> Result<Self> {
        use Instruction::*;

        let (x, y, n, nn, addr) = (op.x(), op.y(), op.n(), op.nn(), op.nnn());
        let instruction = match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Cls,
            (0x0, 0x0, 0xE, 0xE) => Ret,
            (0x0, ..) => Sys { addr },
            (0x1, ..) => Jp { addr },
            (0x2, ..) => Call { addr },
            (0x3, ..) => Se { x, nn },
            (0x4, ..) => Sne { x, nn },
            (0x5, .., 0x0) => SeReg { x, y },
            (0x6, ..) => Ld { x, nn },
            (0x7, ..) => Add { x, nn },
            (0x8, .., 0x0) => Mov { x, y },
            (0x8, .., 0x1) => Or { x, y },
            (0x8, .., 0x2) => And { x, y },
            (0x8, .., 0x3) => Xor { x, y },
            (0x8, .., 0x4) => AddReg { x, y },
            (0x8, .., 0x5) => Sub { x, y },
            (0x8, .., 0x6) => Shr { x },
            (0x8, .., 0x7) => Subn { x, y },
            (0x8, .., 0xE) => Shl { x },
            (0x9, .., 0x0) => SneReg { x, y },
            (0xA, ..) => LdI { addr },
            (0xB, ..) => JpOffset { addr },
            (0xC, ..) => Rnd { x, nn },
            (0xD, ..) => Drw { x, y, n },
            (0xE, _, 0x9, 0xE) => Skp { x },
            (0xE, _, 0xA, 0x1) => Sknp { x },
            (0xF, _, 0x0, 0x7) => LdDelay { x },
            (0xF, _, 0x0, 0xA) => WaitKey { x },
            (0xF, _, 0x1, 0x5) => SetDelay { x },
            (0xF, _, 0x1, 0x8) => SetSound { x },
            (0xF, _, 0x1, 0xE) => AddI { x },
            (0xF, _, 0x2, 0x9) => Font { x },
            (0xF, _, 0x3, 0x3) => Bcd { x },
            (0xF, _, 0x5, 0x5) => Store { x },
            (0xF, _, 0x6, 0x5) => Read { x },
            _ => return Err(Error::UnimplementedOpcode { opcode: op.0 }),
        };
        Ok(instruction)
    }

    /// Runs the instruction against `state`.
    ///
    /// The pc is expected to already point past this instruction; jumps overwrite
    /// it and skips bump it once more.
    pub fn execute(self, state: &mut State, ctx: &mut Context) -> Result<SideEffect> {
        use Instruction::*;

        match self {
            Cls => clr(state),
            Ret => rts(state),
            Sys { .. } => sys(state),
            Jp { addr } => jump(state, addr),
            Call { addr } => call(state, addr),
            Se { x, nn } => ske(state, x, nn),
            Sne { x, nn } => skne(state, x, nn),
            SeReg { x, y } => skre(state, x, y),
            Ld { x, nn } => load(state, x, nn),
            Add { x, nn } => add(state, x, nn),
            Mov { x, y } => mv(state, x, y),
            Or { x, y } => or(state, x, y),
            And { x, y } => and(state, x, y),
            Xor { x, y } => xor(state, x, y),
            AddReg { x, y } => addr(state, x, y),
            Sub { x, y } => sub(state, x, y),
            Shr { x } => shr(state, x),
            Subn { x, y } => subn(state, x, y),
            Shl { x } => shl(state, x),
            SneReg { x, y } => skrne(state, x, y),
            LdI { addr } => loadi(state, addr),
            JpOffset { addr } => jumpi(state, addr, ctx.jump_offset),
            Rnd { x, nn } => rnd(state, x, nn, &mut *ctx.rng),
            Drw { x, y, n } => draw(state, x, y, n),
            Skp { x } => skpr(state, x, ctx.keypad),
            Sknp { x } => skup(state, x, ctx.keypad),
            LdDelay { x } => moved(state, x),
            WaitKey { x } => keyd(state, x),
            SetDelay { x } => loads(state, x),
            SetSound { x } => ld(state, x),
            AddI { x } => addi(state, x),
            Font { x } => ldspr(state, x),
            Bcd { x } => bcd(state, x),
            Store { x } => stor(state, x),
            Read { x } => read(state, x),
        }
    }
}

/// Decodes and runs `op` as though it had just been fetched from `state.pc`.
///
/// The pc is advanced past the instruction before the handler runs. If decoding
/// or the handler fails the pc is put back, and since handlers check their
/// preconditions before writing, the state is then exactly as it was.
pub fn execute_op(op: Opcode, state: &mut State, ctx: &mut Context) -> Result<SideEffect> {
    let instruction = Instruction::decode(op)?;
    let pc = state.pc;
    state.pc = pc.wrapping_add(0x2);
    match instruction.execute(state, ctx) {
        Ok(effect) => Ok(effect),
        Err(e) => {
            state.pc = pc;
            Err(e)
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use Instruction::*;

        match *self {
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Sys { addr } => write!(f, "SYS {:#05X}", addr),
            Jp { addr } => write!(f, "JP {:#05X}", addr),
            Call { addr } => write!(f, "CALL {:#05X}", addr),
            Se { x, nn } => write!(f, "SE V{:X}, {:#04X}", x, nn),
            Sne { x, nn } => write!(f, "SNE V{:X}, {:#04X}", x, nn),
            SeReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            Ld { x, nn } => write!(f, "LD V{:X}, {:#04X}", x, nn),
            Add { x, nn } => write!(f, "ADD V{:X}, {:#04X}", x, nn),
            Mov { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            Shr { x } => write!(f, "SHR V{:X}", x),
            Subn { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Shl { x } => write!(f, "SHL V{:X}", x),
            SneReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LdI { addr } => write!(f, "LD I, {:#05X}", addr),
            // The base register depends on `Config::jump_offset`
            JpOffset { addr } => write!(f, "JP +{:#05X}", addr),
            Rnd { x, nn } => write!(f, "RND V{:X}, {:#04X}", x, nn),
            Drw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            Skp { x } => write!(f, "SKP V{:X}", x),
            Sknp { x } => write!(f, "SKNP V{:X}", x),
            LdDelay { x } => write!(f, "LD V{:X}, DT", x),
            WaitKey { x } => write!(f, "LD V{:X}, K", x),
            SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            SetSound { x } => write!(f, "LD ST, V{:X}", x),
            AddI { x } => write!(f, "ADD I, V{:X}", x),
            Font { x } => write!(f, "LD F, V{:X}", x),
            Bcd { x } => write!(f, "LD B, V{:X}", x),
            Store { x } => write!(f, "LD [I], V{:X}", x),
            Read { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}
