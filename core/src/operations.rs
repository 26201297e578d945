use crate::chip8::{Chip8, Exit};
use crate::constants::{FLAG_REGISTER, GLYPH_SIZE};
use crate::error::Result;
use crate::opcode::Opcode;
use crate::peripherals::{Display, Keypad};

// Every operation runs with pc already pointing at the next instruction.

fn skip_if<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, condition: bool) {
    if condition {
        vm.registers.set_pc(vm.registers.pc().wrapping_add(0x2));
    }
}

/// VF for a subtraction; 1 means no borrow
fn not_borrow<D: Display, K: Keypad>(vm: &Chip8<D, K>, minuend: u8, subtrahend: u8) -> u8 {
    if vm.config.quirks.borrow_on_equal {
        u8::from(minuend > subtrahend)
    } else {
        u8::from(minuend >= subtrahend)
    }
}

/// clear
pub fn cls<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, _op: u16) -> Result<()> {
    vm.display.clear();
    vm.display.refresh();
    Ok(())
}

/// PC = STACK.pop()
pub fn rts<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, _op: u16) -> Result<()> {
    let addr = vm.registers.pop()?;
    vm.registers.set_pc(addr);
    Ok(())
}

/// PC = addr
pub fn jump<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    vm.registers.set_pc(op.addr());
    Ok(())
}

/// STACK.push(PC); PC = addr
pub fn call<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    let pc = vm.registers.pc();
    vm.registers.push(pc)?;
    vm.registers.set_pc(op.addr());
    Ok(())
}

/// if Vx == kk then pc += 2
pub fn ske<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    let vx = vm.registers.v(op.x())?;
    skip_if(vm, vx == op.kk());
    Ok(())
}

/// if Vx != kk then pc += 2
pub fn skne<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    let vx = vm.registers.v(op.x())?;
    skip_if(vm, vx != op.kk());
    Ok(())
}

/// if Vx == Vy then pc += 2
pub fn skre<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    let vx = vm.registers.v(op.x())?;
    let vy = vm.registers.v(op.y())?;
    skip_if(vm, vx == vy);
    Ok(())
}

/// Vx = kk
pub fn load<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    vm.registers.set_v(op.x(), op.kk())
}

/// Vx += kk
/// Add kk to Vx; allow for overflow but implicitly drop it
pub fn add<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    let vx = vm.registers.v(op.x())?;
    vm.registers.set_v(op.x(), vx.wrapping_add(op.kk()))
}

/// Vx = Vy
pub fn mv<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    let vy = vm.registers.v(op.y())?;
    vm.registers.set_v(op.x(), vy)
}

/// Vx |= Vy
pub fn or<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    let (vx, vy) = (vm.registers.v(op.x())?, vm.registers.v(op.y())?);
    vm.registers.set_v(op.x(), vx | vy)
}

/// Vx &= Vy
pub fn and<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    let (vx, vy) = (vm.registers.v(op.x())?, vm.registers.v(op.y())?);
    vm.registers.set_v(op.x(), vx & vy)
}

/// Vx ^= Vy
pub fn xor<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    let (vx, vy) = (vm.registers.v(op.x())?, vm.registers.v(op.y())?);
    vm.registers.set_v(op.x(), vx ^ vy)
}

// The ALU operations below write VF last, so when x is F the flag wins.

/// Vx += Vy; VF = overflow
pub fn addr<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    let (vx, vy) = (vm.registers.v(op.x())?, vm.registers.v(op.y())?);
    let (res, over) = vx.overflowing_add(vy);
    vm.registers.set_v(op.x(), res)?;
    vm.registers.set_v(FLAG_REGISTER, u8::from(over))
}

/// Vx -= Vy; VF = !borrow
pub fn sub<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    let (vx, vy) = (vm.registers.v(op.x())?, vm.registers.v(op.y())?);
    let flag = not_borrow(vm, vx, vy);
    vm.registers.set_v(op.x(), vx.wrapping_sub(vy))?;
    vm.registers.set_v(FLAG_REGISTER, flag)
}

/// Vx >>= 1; VF = lsb
pub fn shr<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    let vx = vm.registers.v(op.x())?;
    vm.registers.set_v(op.x(), vx >> 1)?;
    vm.registers.set_v(FLAG_REGISTER, vx & 0x1)
}

/// Vx = Vy - Vx; VF = !borrow
pub fn subn<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    let (vx, vy) = (vm.registers.v(op.x())?, vm.registers.v(op.y())?);
    let flag = not_borrow(vm, vy, vx);
    vm.registers.set_v(op.x(), vy.wrapping_sub(vx))?;
    vm.registers.set_v(FLAG_REGISTER, flag)
}

/// Vx <<= 1; VF = msb
pub fn shl<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    let vx = vm.registers.v(op.x())?;
    vm.registers.set_v(op.x(), vx << 1)?;
    vm.registers.set_v(FLAG_REGISTER, vx >> 7)
}

/// if Vx != Vy then pc += 2
pub fn skrne<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    let vx = vm.registers.v(op.x())?;
    let vy = vm.registers.v(op.y())?;
    skip_if(vm, vx != vy);
    Ok(())
}

/// I = addr
pub fn loadi<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    vm.registers.set_i(op.addr());
    Ok(())
}

/// PC = V0 + addr
pub fn jumpi<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    vm.registers.set_pc(op.addr() + u16::from(vm.registers.v(0x0)?));
    Ok(())
}

/// Vx = rand_byte & kk
pub fn rand<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    let rand_byte: u8 = rand::random();
    vm.registers.set_v(op.x(), rand_byte & op.kk())
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the display with wrapping.
/// Sets VF if any pixels were erased
pub fn draw<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    let x = vm.registers.v(op.x())? as usize;
    let y = vm.registers.v(op.y())? as usize;
    let i = vm.registers.i();
    vm.memory.check_range(i, op.n() as usize)?;

    let mut erased = false;
    for row in 0..op.n() {
        let byte = vm.memory.read8(i + u16::from(row))?;
        erased |= vm.display.xor_byte(byte, x, y + row as usize);
    }

    vm.registers.set_v(FLAG_REGISTER, u8::from(erased))?;
    vm.display.refresh();
    Ok(())
}

/// if Vx.pressed then pc += 2
pub fn skpr<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    let key = vm.registers.v(op.x())?;
    let pressed = vm.keypad.is_pressed(key);
    skip_if(vm, pressed);
    Ok(())
}

/// if !Vx.pressed then pc += 2
/// With `legacy_key_skip` this skips when the key is pressed instead
pub fn skup<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    let key = vm.registers.v(op.x())?;
    let pressed = vm.keypad.is_pressed(key);
    let skip = if vm.config.quirks.legacy_key_skip {
        pressed
    } else {
        !pressed
    };
    skip_if(vm, skip);
    Ok(())
}

/// Vx = DT
pub fn moved<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    let delay = vm.timers.delay();
    vm.registers.set_v(op.x(), delay)
}

/// await keypress for Vx
/// Blocks the CPU, but not the timers, until a key is held
pub fn keyd<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    match vm.keypad.wait_for_keypress(vm.config.key_poll_interval) {
        Some(key) => vm.registers.set_v(op.x(), key),
        None => {
            // Point back at this instruction so a resumed run waits again
            vm.registers.set_pc(vm.registers.pc() - 0x2);
            vm.exit = Some(Exit::KeypadClosed);
            Ok(())
        }
    }
}

/// DT = Vx
pub fn loads<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    vm.timers.set_delay(vm.registers.v(op.x())?);
    Ok(())
}

/// ST = Vx
pub fn ld<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    vm.timers.set_sound(vm.registers.v(op.x())?);
    Ok(())
}

/// I += Vx
pub fn addi<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    let vx = vm.registers.v(op.x())?;
    vm.registers.set_i(vm.registers.i().wrapping_add(u16::from(vx)));
    Ok(())
}

/// I = Vx * 5
/// Set I to the memory address of the font glyph for Vx
/// See constants::FONT for more details
pub fn ldspr<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    vm.registers.set_i(u16::from(vm.registers.v(op.x())?) * GLYPH_SIZE);
    Ok(())
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    let vx = vm.registers.v(op.x())?;
    let i = vm.registers.i();
    vm.memory.check_range(i, 3)?;
    vm.memory.write8(i, vx / 100)?;
    vm.memory.write8(i + 1, vx / 10 % 10)?;
    vm.memory.write8(i + 2, vx % 10)
}

/// mem[I..=I+x] = V0..=Vx; I += x + 1
pub fn stor<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    let i = vm.registers.i();
    let count = u16::from(op.x()) + 1;
    vm.memory.check_range(i, count as usize)?;
    for register in 0..=op.x() {
        let value = vm.registers.v(register)?;
        vm.memory.write8(i + u16::from(register), value)?;
    }
    vm.registers.set_i(i.wrapping_add(count));
    Ok(())
}

/// V0..=Vx = mem[I..=I+x]; I += x + 1
pub fn read<D: Display, K: Keypad>(vm: &mut Chip8<D, K>, op: u16) -> Result<()> {
    let i = vm.registers.i();
    let count = u16::from(op.x()) + 1;
    vm.memory.check_range(i, count as usize)?;
    for register in 0..=op.x() {
        let value = vm.memory.read8(i + u16::from(register))?;
        vm.registers.set_v(register, value)?;
    }
    vm.registers.set_i(i.wrapping_add(count));
    Ok(())
}
