use log::{debug, info, trace, warn};

use crate::config::Config;
use crate::constants::MEMORY_SIZE;
use crate::error::{Fault, Result};
use crate::instruction::decode;
use crate::memory::Memory;
use crate::peripherals::{Display, Keypad};
use crate::registers::Registers;
use crate::timers::TimerPair;

/// Why the run loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Execution fell through to the end of the loaded ROM
    EndOfProgram,
    /// A jump left the program counter where it can no longer fetch a whole instruction
    EndOfMemory,
    /// FX0A was waiting on a keypad that closed
    KeypadClosed,
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Owns:
///  - `memory` holding the font and the loaded ROM
///  - `registers` including the call stack
///  - `timers` ticking on their own schedule
///  - a `display` and `keypad` that instructions call out to
///
/// Supplies interfaces for:
/// - advancing the CPU one instruction at a time or until it stops
/// - advancing manually driven timers
/// - inspecting state for rendering, debugging and tests
pub struct Chip8<D: Display, K: Keypad> {
    pub(crate) memory: Memory,
    pub(crate) registers: Registers,
    pub(crate) timers: TimerPair,
    pub(crate) display: D,
    pub(crate) keypad: K,
    pub(crate) config: Config,
    pub(crate) exit: Option<Exit>,
}

impl<D: Display, K: Keypad> Chip8<D, K> {
    /// Loads `rom` and starts the timers
    ///
    /// # Arguments
    /// * `rom` raw program bytes, loaded at 0x200
    /// * `display` where sprites get drawn
    /// * `keypad` where key presses come from
    /// * `config` timer mode and quirks
    pub fn new(rom: &[u8], display: D, keypad: K, config: Config) -> Result<Self> {
        let memory = Memory::initialize(rom)?;
        debug!(
            "loaded {} byte ROM ending at {:#05X}",
            rom.len(),
            memory.program_end()
        );
        Ok(Chip8 {
            memory,
            registers: Registers::new(),
            timers: TimerPair::new(config.timers),
            display,
            keypad,
            config,
            exit: None,
        })
    }

    /// Executes a single instruction
    /// - fetches the word at pc and moves pc past it
    /// - skips the instruction if it doesn't decode
    /// - otherwise executes it; any error it raises is fatal
    pub fn step(&mut self) -> std::result::Result<Option<Exit>, Fault> {
        let pc = self.registers.pc();
        let end = self.memory.program_end();
        // Falling through to the end of the ROM halts, but code jumped to beyond it still runs
        if (end.saturating_sub(1)..=end).contains(&(pc as usize)) {
            info!("pc {:#05X} reached the end of the program", pc);
            return Ok(Some(Exit::EndOfProgram));
        }
        if pc as usize >= MEMORY_SIZE - 1 {
            info!("pc {:#05X} ran off the end of memory", pc);
            return Ok(Some(Exit::EndOfMemory));
        }

        let op = self.memory.read16(pc).map_err(|source| Fault {
            pc,
            opcode: 0,
            source,
        })?;
        // Bumped before executing so jumps overwrite it
        self.registers.set_pc(pc + 2);

        match decode::<D, K>(op) {
            Ok(instruction) => {
                trace!(
                    "{:03X}: {:04X} {:<4} v{:02X?} i{:04X}",
                    pc,
                    op,
                    instruction.mnemonic,
                    self.registers.v_all(),
                    self.registers.i()
                );
                (instruction.execute)(self, op).map_err(|source| Fault {
                    pc,
                    opcode: op,
                    source,
                })?;
            }
            Err(e) => warn!("skipping {} at {:#05X}", e, pc),
        }

        Ok(self.exit.take())
    }

    /// Steps until the program stops or faults
    pub fn run(&mut self) -> std::result::Result<Exit, Fault> {
        loop {
            if let Some(exit) = self.step()? {
                info!("halted: {:?}", exit);
                return Ok(exit);
            }
        }
    }

    /// Ticks both timers `ticks` times; only meaningful with `TimerMode::Manual`
    pub fn advance_timers(&self, ticks: u32) {
        self.timers.advance(ticks)
    }

    pub fn registers(&self) -> &Registers {
        &self.registers
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn timers(&self) -> &TimerPair {
        &self.timers
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn keypad_mut(&mut self) -> &mut K {
        &mut self.keypad
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::peripherals::{FrameBuffer, KeyState};

    fn chip8(rom: &[u8]) -> Chip8<FrameBuffer, KeyState> {
        Chip8::new(rom, FrameBuffer::new(), KeyState::new(), Config::manual()).unwrap()
    }

    #[test]
    fn test_step_advances_pc() {
        let mut chip8 = chip8(&[0x00, 0xE0]);
        assert_eq!(chip8.step(), Ok(None));
        assert_eq!(chip8.registers.pc(), 0x202);
    }

    #[test]
    fn test_unknown_opcode_is_skipped() {
        let mut chip8 = chip8(&[0x81, 0x2F, 0x61, 0x05]);
        assert_eq!(chip8.step(), Ok(None));
        assert_eq!(chip8.registers.pc(), 0x202);
        chip8.step().unwrap();
        assert_eq!(chip8.registers.v(0x1), Ok(0x05));
    }

    #[test]
    fn test_stops_at_end_of_memory() {
        let mut chip8 = chip8(&[0x1F, 0xFE]);
        chip8.step().unwrap();
        assert_eq!(chip8.registers.pc(), 0xFFE);
        // 0xFFE holds 0x0000, which is skipped
        assert_eq!(chip8.step(), Ok(None));
        assert_eq!(chip8.step(), Ok(Some(Exit::EndOfMemory)));
    }

    #[test]
    fn test_odd_pc_at_last_byte_stops() {
        let mut chip8 = chip8(&[0x1F, 0xFF]);
        chip8.step().unwrap();
        assert_eq!(chip8.step(), Ok(Some(Exit::EndOfMemory)));
    }

    #[test]
    fn test_stops_after_last_instruction() {
        let mut chip8 = chip8(&[0x60, 0x05, 0x61, 0x03, 0x80, 0x14]);
        for _ in 0..3 {
            assert_eq!(chip8.step(), Ok(None));
        }
        assert_eq!(chip8.step(), Ok(Some(Exit::EndOfProgram)));
        assert_eq!(chip8.registers.pc(), 0x206);
    }

    #[test]
    fn test_odd_length_rom_stops_on_partial_word() {
        let mut chip8 = chip8(&[0x60, 0x05, 0x61]);
        assert_eq!(chip8.step(), Ok(None));
        assert_eq!(chip8.step(), Ok(Some(Exit::EndOfProgram)));
    }

    #[test]
    fn test_empty_rom_stops_immediately() {
        let mut chip8 = chip8(&[]);
        assert_eq!(chip8.step(), Ok(Some(Exit::EndOfProgram)));
    }

    #[test]
    fn test_jump_past_program_keeps_running() {
        // 200: jump 300; 300: V1 = 7 written below
        let mut chip8 = chip8(&[0x13, 0x00]);
        chip8.memory.write8(0x300, 0x61).unwrap();
        chip8.memory.write8(0x301, 0x07).unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.step(), Ok(None));
        assert_eq!(chip8.registers.v(0x1), Ok(0x07));
    }

    #[test]
    fn test_fault_reports_pc_and_opcode() {
        let mut chip8 = chip8(&[0x00, 0xEE]);
        assert_eq!(
            chip8.step(),
            Err(Fault {
                pc: 0x200,
                opcode: 0x00EE,
                source: Error::StackUnderflow
            })
        );
    }

    #[test]
    fn test_rejects_oversized_rom() {
        let result = Chip8::new(
            &[0; 0xE01],
            FrameBuffer::new(),
            KeyState::new(),
            Config::manual(),
        );
        assert!(matches!(result, Err(Error::RomTooLarge { size: 0xE01, .. })));
    }

    #[test]
    fn test_run_until_end_of_program() {
        let mut chip8 = chip8(&[0x60, 0x05, 0x61, 0x03, 0x80, 0x14]);
        assert_eq!(chip8.run(), Ok(Exit::EndOfProgram));
        assert_eq!(chip8.registers.v(0x0), Ok(0x08));
        assert_eq!(chip8.registers.v(0xF), Ok(0x00));
    }

    #[test]
    fn test_run_stops_when_keypad_closes() {
        let mut chip8 = chip8(&[0xF3, 0x0A]);
        chip8.keypad_mut().close();
        assert_eq!(chip8.run(), Ok(Exit::KeypadClosed));
        // Left pointing at FX0A so it waits again if resumed
        assert_eq!(chip8.registers.pc(), 0x200);
    }

    #[test]
    fn test_advance_timers() {
        let chip8 = chip8(&[]);
        chip8.timers().set_delay(10);
        chip8.advance_timers(4);
        assert_eq!(chip8.timers().delay(), 6);
    }
}
