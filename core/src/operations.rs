use rand::{Rng, RngCore};

use crate::config::JumpOffset;
use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_GLYPH_SIZE, FONT_OFFSET};
use crate::error::Result;
use crate::keypad::Keypad;
use crate::side_effect::SideEffect;
use crate::state::State;

// Every handler runs with the pc already pointing at the next instruction.

fn skip_if(state: &mut State, condition: bool) -> Result<SideEffect> {
    if condition {
        state.pc = state.pc.wrapping_add(0x2);
    }
    Ok(SideEffect::None)
}

/// clear
pub fn clr(state: &mut State) -> Result<SideEffect> {
    state.clear_screen();
    state.draw_flag = true;
    Ok(SideEffect::ClearScreen)
}

/// PC = STACK.pop()
pub fn rts(state: &mut State) -> Result<SideEffect> {
    state.pc = state.stack.pop()?;
    Ok(SideEffect::None)
}

/// machine code routine; ignored
pub fn sys(_state: &mut State) -> Result<SideEffect> {
    Ok(SideEffect::None)
}

/// PC = addr
pub fn jump(state: &mut State, addr: u16) -> Result<SideEffect> {
    state.pc = addr;
    Ok(SideEffect::None)
}

/// STACK.push(PC); PC = addr
pub fn call(state: &mut State, addr: u16) -> Result<SideEffect> {
    state.stack.push(state.pc)?;
    state.pc = addr;
    Ok(SideEffect::None)
}

/// if Vx == nn then pc += 2
pub fn ske(state: &mut State, x: u8, nn: u8) -> Result<SideEffect> {
    let condition = state.vx(x) == nn;
    skip_if(state, condition)
}

/// if Vx != nn then pc += 2
pub fn skne(state: &mut State, x: u8, nn: u8) -> Result<SideEffect> {
    let condition = state.vx(x) != nn;
    skip_if(state, condition)
}

/// if Vx == Vy then pc += 2
pub fn skre(state: &mut State, x: u8, y: u8) -> Result<SideEffect> {
    let condition = state.vx(x) == state.vx(y);
    skip_if(state, condition)
}

/// Vx = nn
pub fn load(state: &mut State, x: u8, nn: u8) -> Result<SideEffect> {
    state.set_vx(x, nn);
    Ok(SideEffect::None)
}

/// Vx += nn
/// Add nn to Vx; allow for overflow but implicitly drop it
pub fn add(state: &mut State, x: u8, nn: u8) -> Result<SideEffect> {
    state.set_vx(x, state.vx(x).wrapping_add(nn));
    Ok(SideEffect::None)
}

/// Vx = Vy
pub fn mv(state: &mut State, x: u8, y: u8) -> Result<SideEffect> {
    state.set_vx(x, state.vx(y));
    Ok(SideEffect::None)
}

/// Vx |= Vy
pub fn or(state: &mut State, x: u8, y: u8) -> Result<SideEffect> {
    state.set_vx(x, state.vx(x) | state.vx(y));
    Ok(SideEffect::None)
}

/// Vx &= Vy
pub fn and(state: &mut State, x: u8, y: u8) -> Result<SideEffect> {
    state.set_vx(x, state.vx(x) & state.vx(y));
    Ok(SideEffect::None)
}

/// Vx ^= Vy
pub fn xor(state: &mut State, x: u8, y: u8) -> Result<SideEffect> {
    state.set_vx(x, state.vx(x) ^ state.vx(y));
    Ok(SideEffect::None)
}

/// Vx += Vy; VF = overflow
pub fn addr(state: &mut State, x: u8, y: u8) -> Result<SideEffect> {
    let (res, over) = state.vx(x).overflowing_add(state.vx(y));
    state.set_vx(x, res);
    state.set_flag(over);
    Ok(SideEffect::None)
}

/// Vx = a - b, wrapping; VF = a > b
/// Equal operands count as a borrow.
fn subtract(state: &mut State, x: u8, a: u8, b: u8) -> Result<SideEffect> {
    state.set_vx(x, a.wrapping_sub(b));
    state.set_flag(a > b);
    Ok(SideEffect::None)
}

/// Vx -= Vy; VF = !borrow
pub fn sub(state: &mut State, x: u8, y: u8) -> Result<SideEffect> {
    let (vx, vy) = (state.vx(x), state.vx(y));
    subtract(state, x, vx, vy)
}

/// Vx /= 2; VF = lsb
pub fn shr(state: &mut State, x: u8) -> Result<SideEffect> {
    let vx = state.vx(x);
    state.set_flag(vx & 0x1 == 0x1);
    state.set_vx(x, vx >> 1);
    Ok(SideEffect::None)
}

/// Vx = Vy - Vx; VF = !borrow
pub fn subn(state: &mut State, x: u8, y: u8) -> Result<SideEffect> {
    let (vx, vy) = (state.vx(x), state.vx(y));
    subtract(state, x, vy, vx)
}

/// Vx *= 2; VF = msb
pub fn shl(state: &mut State, x: u8) -> Result<SideEffect> {
    let vx = state.vx(x);
    state.set_flag((vx & 0x80) >> 7 == 0x1);
    state.set_vx(x, vx << 1);
    Ok(SideEffect::None)
}

/// if Vx != Vy then pc += 2
pub fn skrne(state: &mut State, x: u8, y: u8) -> Result<SideEffect> {
    let condition = state.vx(x) != state.vx(y);
    skip_if(state, condition)
}

/// I = addr
pub fn loadi(state: &mut State, addr: u16) -> Result<SideEffect> {
    state.i = addr;
    Ok(SideEffect::None)
}

/// PC = I + addr, or V0 + addr
pub fn jumpi(state: &mut State, addr: u16, offset: JumpOffset) -> Result<SideEffect> {
    let base = match offset {
        JumpOffset::Index => state.i,
        JumpOffset::V0 => u16::from(state.v[0x0]),
    };
    state.pc = base.wrapping_add(addr);
    Ok(SideEffect::None)
}

/// Vx = rand_byte & nn
pub fn rnd(state: &mut State, x: u8, nn: u8, rng: &mut dyn RngCore) -> Result<SideEffect> {
    let rand_byte: u8 = rng.gen();
    state.set_vx(x, rand_byte & nn);
    Ok(SideEffect::None)
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer with wrapping.
/// Sets VF if any pixels were erased
pub fn draw(state: &mut State, x: u8, y: u8, n: u8) -> Result<SideEffect> {
    let sprite = state.memory.slice(usize::from(state.i), usize::from(n))?;
    let (x0, y0) = (usize::from(state.vx(x)), usize::from(state.vx(y)));

    let mut collision = false;
    for (row, &byte) in sprite.iter().enumerate() {
        let py = (y0 + row) % DISPLAY_HEIGHT;
        for bit in 0..8 {
            let px = (x0 + bit) % DISPLAY_WIDTH;
            let pixel = (byte >> (7 - bit)) & 0x1;
            let current = &mut state.frame_buffer[py][px];
            collision |= pixel & *current == 0x1;
            *current ^= pixel;
        }
    }

    state.set_flag(collision);
    state.draw_flag = true;
    Ok(SideEffect::Draw)
}

/// if Vx.pressed then pc += 2
pub fn skpr(state: &mut State, x: u8, keypad: &dyn Keypad) -> Result<SideEffect> {
    let condition = keypad.is_key_down(state.vx(x) & 0xF);
    skip_if(state, condition)
}

/// if !Vx.pressed then pc += 2
pub fn skup(state: &mut State, x: u8, keypad: &dyn Keypad) -> Result<SideEffect> {
    let condition = !keypad.is_key_down(state.vx(x) & 0xF);
    skip_if(state, condition)
}

/// Vx = DT
pub fn moved(state: &mut State, x: u8) -> Result<SideEffect> {
    state.set_vx(x, state.delay_timer);
    Ok(SideEffect::None)
}

/// await keypress for Vx
pub fn keyd(state: &mut State, x: u8) -> Result<SideEffect> {
    state.register_needing_key = Some(x);
    Ok(SideEffect::WaitForKey)
}

/// DT = Vx
pub fn loads(state: &mut State, x: u8) -> Result<SideEffect> {
    state.delay_timer = state.vx(x);
    Ok(SideEffect::None)
}

/// ST = Vx
pub fn ld(state: &mut State, x: u8) -> Result<SideEffect> {
    state.sound_timer = state.vx(x);
    Ok(SideEffect::None)
}

/// I += Vx
pub fn addi(state: &mut State, x: u8) -> Result<SideEffect> {
    state.i = state.i.wrapping_add(u16::from(state.vx(x)));
    Ok(SideEffect::None)
}

/// I = Vx * 5
/// Set I to the memory address of the glyph for Vx
/// See constants::FONT_SET for more details
pub fn ldspr(state: &mut State, x: u8) -> Result<SideEffect> {
    state.i = FONT_OFFSET + u16::from(state.vx(x)) * FONT_GLYPH_SIZE;
    Ok(SideEffect::None)
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(state: &mut State, x: u8) -> Result<SideEffect> {
    let vx = state.vx(x);
    let bcd = [vx / 100 % 10, vx / 10 % 10, vx % 10];
    state.memory.load(usize::from(state.i), &bcd)?;
    Ok(SideEffect::None)
}

/// mem[I..=I+x] = V0..=Vx
pub fn stor(state: &mut State, x: u8) -> Result<SideEffect> {
    let count = usize::from(x) + 1;
    state
        .memory
        .load(usize::from(state.i), &state.v[..count])?;
    Ok(SideEffect::None)
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(state: &mut State, x: u8) -> Result<SideEffect> {
    let count = usize::from(x) + 1;
    let bytes = state.memory.slice(usize::from(state.i), count)?;
    state.v[..count].copy_from_slice(bytes);
    Ok(SideEffect::None)
}

#[cfg(test)]
mod test_operations {
    use super::*;

    #[test]
    fn test_shift_flag_wins_over_vf_as_operand() {
        // VF is written before Vx, so with x = F the shifted value is kept
        let mut state = State::new(16);
        state.v[0xF] = 0x3;
        shr(&mut state, 0xF).unwrap();
        assert_eq!(state.v[0xF], 0x1);
        state.v[0xF] = 0x81;
        shl(&mut state, 0xF).unwrap();
        assert_eq!(state.v[0xF], 0x02);
    }

    #[test]
    fn test_arithmetic_flag_overwrites_vf_as_operand() {
        let mut state = State::new(16);
        state.v[0xF] = 0xFF;
        state.v[0x1] = 0x01;
        addr(&mut state, 0xF, 0x1).unwrap();
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_skip_adds_to_current_pc() {
        let mut state = State::new(16);
        state.pc = 0x300;
        skip_if(&mut state, true).unwrap();
        assert_eq!(state.pc, 0x302);
        skip_if(&mut state, false).unwrap();
        assert_eq!(state.pc, 0x302);
    }

    #[test]
    fn test_draw_sets_draw_flag() {
        let mut state = State::new(16);
        draw(&mut state, 0x0, 0x0, 0x0).unwrap();
        assert!(state.draw_flag);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_drawing_twice_erases_and_collides() {
        let mut state = State::new(16);
        state.i = 0x5;
        draw(&mut state, 0x0, 0x0, 0x5).unwrap();
        assert_eq!(state.v[0xF], 0x0);
        draw(&mut state, 0x0, 0x0, 0x5).unwrap();
        assert_eq!(state.v[0xF], 0x1);
        assert!(state.frame_buffer.iter().all(|row| row.iter().all(|&p| p == 0)));
    }

    #[test]
    fn test_ldspr_points_at_glyph() {
        let mut state = State::new(16);
        state.v[0x3] = 0xF;
        ldspr(&mut state, 0x3).unwrap();
        assert_eq!(state.i, 0x4B);
    }
}
