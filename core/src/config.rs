use std::time::Duration;

use crate::constants::KEY_POLL_INTERVAL;
use crate::timers::TimerMode;

/// Deviations from common CHIP-8 behaviour that some ROMs were written against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Quirks {
    /// EXA1 skips when the key IS pressed, the same as EX9E
    pub legacy_key_skip: bool,
    /// 8XY5/8XY7 clear VF when both operands are equal instead of setting it
    pub borrow_on_equal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub timers: TimerMode,
    pub quirks: Quirks,
    /// How often FX0A re-reads the keypad while waiting
    pub key_poll_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            timers: TimerMode::RealTime,
            quirks: Quirks::default(),
            key_poll_interval: KEY_POLL_INTERVAL,
        }
    }
}

impl Config {
    /// Timers advanced by hand, for deterministic runs
    pub fn manual() -> Self {
        Config {
            timers: TimerMode::Manual,
            ..Config::default()
        }
    }

    pub fn with_quirks(self, quirks: Quirks) -> Self {
        Config { quirks, ..self }
    }
}
