use crate::constants::{FONT, MAX_ROM_SIZE, MEMORY_SIZE, PROGRAM_START};
use crate::error::{Error, Result};

/// # Memory
/// 4096 bytes of addressable memory.
///
/// ```text
/// 0x000..0x050  font sprites for 0..F
/// 0x050..0x200  zeroed; never executed
/// 0x200..0x1000 program
/// ```
///
/// Every access is bounds checked; addresses never wrap.
#[derive(Clone)]
pub struct Memory {
    bytes: Box<[u8; MEMORY_SIZE]>,
    program_end: usize,
}

impl Memory {
    /// Lays out the font and copies `rom` in at `PROGRAM_START`
    ///
    /// # Arguments
    /// * `rom` raw program bytes with no header
    pub fn initialize(rom: &[u8]) -> Result<Self> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Error::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }

        let mut bytes = Box::new([0; MEMORY_SIZE]);
        bytes[..FONT.len()].copy_from_slice(&FONT);

        let start = PROGRAM_START as usize;
        bytes[start..start + rom.len()].copy_from_slice(rom);

        Ok(Memory {
            bytes,
            program_end: start + rom.len(),
        })
    }

    /// The first address past the loaded ROM
    pub fn program_end(&self) -> usize {
        self.program_end
    }

    pub fn read8(&self, addr: u16) -> Result<u8> {
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or(Error::OutOfBounds {
                address: addr as usize,
            })
    }

    pub fn write8(&mut self, addr: u16, value: u8) -> Result<()> {
        match self.bytes.get_mut(addr as usize) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(Error::OutOfBounds {
                address: addr as usize,
            }),
        }
    }

    /// Reads a big-endian word; the high byte lives at `addr`
    pub fn read16(&self, addr: u16) -> Result<u16> {
        let high = self.read8(addr)?;
        let low = self.read8(addr.checked_add(1).ok_or(Error::OutOfBounds {
            address: addr as usize + 1,
        })?)?;
        Ok(u16::from(high) << 8 | u16::from(low))
    }

    /// Ensures `len` bytes starting at `addr` are all addressable
    pub fn check_range(&self, addr: u16, len: usize) -> Result<()> {
        match len {
            0 => Ok(()),
            _ if addr as usize + len <= MEMORY_SIZE => Ok(()),
            _ => Err(Error::OutOfBounds {
                address: addr as usize + len - 1,
            }),
        }
    }
}
