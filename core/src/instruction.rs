use crate::chip8::Chip8;
use crate::error::{Error, Result};
use crate::opcode::Opcode;
use crate::operations::*;
use crate::peripherals::{Display, Keypad};

/// An opcode handler; mutates the machine given the raw opcode
pub type Operation<D, K> = fn(vm: &mut Chip8<D, K>, op: u16) -> Result<()>;

/// A decoded instruction
pub struct Instruction<D: Display, K: Keypad> {
    pub mnemonic: &'static str,
    pub execute: Operation<D, K>,
}

/// Selects the correct Instruction for a given Opcode
///
/// Dispatches on the family nibble, then on the low nibble for 0x8 and the low byte for
/// 0x0, 0xE and 0xF.
pub fn decode<D: Display, K: Keypad>(op: u16) -> Result<Instruction<D, K>> {
    let (mnemonic, execute): (&'static str, Operation<D, K>) = match op.family() {
        0x0 => return decode_system(op),
        0x1 => ("JP", jump),
        0x2 => ("CALL", call),
        0x3 => ("SE", ske),
        0x4 => ("SNE", skne),
        0x5 if op.n() == 0x0 => ("SE", skre),
        0x6 => ("LD", load),
        0x7 => ("ADD", add),
        0x8 => return decode_alu(op),
        0x9 if op.n() == 0x0 => ("SNE", skrne),
        0xA => ("LD", loadi),
        0xB => ("JP", jumpi),
        0xC => ("RND", rand),
        0xD => ("DRW", draw),
        0xE => return decode_keypad(op),
        0xF => return decode_misc(op),
        _ => return Err(Error::UnknownOpcode { opcode: op }),
    };
    Ok(Instruction { mnemonic, execute })
}

/// 0x00E0 and 0x00EE
fn decode_system<D: Display, K: Keypad>(op: u16) -> Result<Instruction<D, K>> {
    let (mnemonic, execute): (&'static str, Operation<D, K>) = match op {
        0x00E0 => ("CLS", cls),
        0x00EE => ("RET", rts),
        _ => return Err(Error::UnknownOpcode { opcode: op }),
    };
    Ok(Instruction { mnemonic, execute })
}

/// 0x8XYn register-register arithmetic and logic
fn decode_alu<D: Display, K: Keypad>(op: u16) -> Result<Instruction<D, K>> {
    let (mnemonic, execute): (&'static str, Operation<D, K>) = match op.n() {
        0x0 => ("LD", mv),
        0x1 => ("OR", or),
        0x2 => ("AND", and),
        0x3 => ("XOR", xor),
        0x4 => ("ADD", addr),
        0x5 => ("SUB", sub),
        0x6 => ("SHR", shr),
        0x7 => ("SUBN", subn),
        0xE => ("SHL", shl),
        _ => return Err(Error::UnknownOpcode { opcode: op }),
    };
    Ok(Instruction { mnemonic, execute })
}

/// 0xEXkk keypad skips
fn decode_keypad<D: Display, K: Keypad>(op: u16) -> Result<Instruction<D, K>> {
    let (mnemonic, execute): (&'static str, Operation<D, K>) = match op.kk() {
        0x9E => ("SKP", skpr),
        0xA1 => ("SKNP", skup),
        _ => return Err(Error::UnknownOpcode { opcode: op }),
    };
    Ok(Instruction { mnemonic, execute })
}

/// 0xFXkk timers, keypad wait and memory transfers
fn decode_misc<D: Display, K: Keypad>(op: u16) -> Result<Instruction<D, K>> {
    let (mnemonic, execute): (&'static str, Operation<D, K>) = match op.kk() {
        0x07 => ("LD", moved),
        0x0A => ("LD", keyd),
        0x15 => ("LD", loads),
        0x18 => ("LD", ld),
        0x1E => ("ADD", addi),
        0x29 => ("LD", ldspr),
        0x33 => ("LD", bcd),
        0x55 => ("LD", stor),
        0x65 => ("LD", read),
        _ => return Err(Error::UnknownOpcode { opcode: op }),
    };
    Ok(Instruction { mnemonic, execute })
}
