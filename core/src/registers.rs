use crate::constants::{PROGRAM_START, REGISTER_COUNT, STACK_DEPTH};
use crate::error::{Error, Result};

/// # Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry flag
/// - (i) a 16-bit memory address register; only its low 12 bits address memory
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) the number of return addresses on the stack
///
/// Stack
/// - 16 return addresses pushed by CALL and popped by RET
///
/// The delay and sound timers live in `TimerPair` since they tick on their own schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    v: [u8; REGISTER_COUNT],
    i: u16,
    pc: u16,
    sp: usize,
    stack: [u16; STACK_DEPTH],
}

impl Registers {
    pub fn new() -> Self {
        Registers {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            stack: [0; STACK_DEPTH],
        }
    }

    /// Reads Vx
    pub fn v(&self, index: u8) -> Result<u8> {
        self.v
            .get(index as usize)
            .copied()
            .ok_or(Error::InvalidRegister { index })
    }

    /// Writes Vx
    pub fn set_v(&mut self, index: u8, value: u8) -> Result<()> {
        match self.v.get_mut(index as usize) {
            Some(register) => {
                *register = value;
                Ok(())
            }
            None => Err(Error::InvalidRegister { index }),
        }
    }

    /// All of V0..VF
    pub fn v_all(&self) -> &[u8; REGISTER_COUNT] {
        &self.v
    }

    pub fn i(&self) -> u16 {
        self.i
    }

    pub fn set_i(&mut self, addr: u16) {
        self.i = addr
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn set_pc(&mut self, addr: u16) {
        self.pc = addr
    }

    pub fn sp(&self) -> usize {
        self.sp
    }

    pub fn push(&mut self, addr: u16) -> Result<()> {
        if self.sp == STACK_DEPTH {
            return Err(Error::StackOverflow);
        }
        self.stack[self.sp] = addr;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16> {
        if self.sp == 0 {
            return Err(Error::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.stack[self.sp])
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_program_start() {
        let registers = Registers::new();
        assert_eq!(registers.pc(), 0x200);
        assert_eq!(registers.i(), 0);
        assert_eq!(registers.sp(), 0);
        assert_eq!(registers.v_all(), &[0; 16]);
    }

    #[test]
    fn test_set_i_and_pc() {
        let mut registers = Registers::new();
        registers.set_i(0xABC);
        registers.set_pc(0x300);
        assert_eq!(registers.i(), 0xABC);
        assert_eq!(registers.pc(), 0x300);
    }

    #[test]
    fn test_set_and_get_v() {
        let mut registers = Registers::new();
        registers.set_v(0xE, 0x42).unwrap();
        assert_eq!(registers.v(0xE), Ok(0x42));
    }

    #[test]
    fn test_invalid_register() {
        let mut registers = Registers::new();
        assert_eq!(registers.v(0x10), Err(Error::InvalidRegister { index: 0x10 }));
        assert_eq!(
            registers.set_v(0xFF, 1),
            Err(Error::InvalidRegister { index: 0xFF })
        );
    }

    #[test]
    fn test_stack_is_lifo() {
        let mut registers = Registers::new();
        registers.push(0x202).unwrap();
        registers.push(0x404).unwrap();
        assert_eq!(registers.pop(), Ok(0x404));
        assert_eq!(registers.pop(), Ok(0x202));
    }

    #[test]
    fn test_stack_overflow() {
        let mut registers = Registers::new();
        for addr in 0..STACK_DEPTH as u16 {
            registers.push(addr).unwrap();
        }
        assert_eq!(registers.push(0xFFF), Err(Error::StackOverflow));
        assert_eq!(registers.sp(), STACK_DEPTH);
    }

    #[test]
    fn test_stack_underflow() {
        let mut registers = Registers::new();
        assert_eq!(registers.pop(), Err(Error::StackUnderflow));
    }
}
