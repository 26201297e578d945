use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while loading or executing a ROM.
///
/// Only `UnknownOpcode` is recoverable; the run loop logs it and moves on.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("ROM is {size} bytes but at most {max} bytes fit in memory")]
    RomTooLarge { size: usize, max: usize },

    #[error("memory access at {address:#06X} is out of bounds")]
    OutOfBounds { address: usize },

    #[error("register V{index:X} does not exist")]
    InvalidRegister { index: u8 },

    #[error("call stack overflow")]
    StackOverflow,

    #[error("return with an empty call stack")]
    StackUnderflow,

    #[error("unknown opcode {opcode:#06X}")]
    UnknownOpcode { opcode: u16 },
}

/// A fatal error together with where it happened
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("fault at {pc:#05X} executing {opcode:#06X}: {source}")]
pub struct Fault {
    /// Address the faulting instruction was fetched from
    pub pc: u16,
    pub opcode: u16,
    #[source]
    pub source: Error,
}
