use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use log::debug;

use crate::constants::TIMER_PERIOD;

/// An 8-bit counter that counts down to 0 and stays there.
///
/// Writes from the CPU and decrements from a ticker are each a single atomic operation,
/// so neither can observe the other half-done.
#[derive(Debug, Default)]
struct Countdown(AtomicU8);

impl Countdown {
    fn get(&self) -> u8 {
        self.0.load(Ordering::Acquire)
    }

    fn set(&self, value: u8) {
        self.0.store(value, Ordering::Release)
    }

    fn tick(&self) {
        // Err means the counter was already 0
        self.0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |value| value.checked_sub(1))
            .ok();
    }
}

/// How the timers are driven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    /// Each timer gets its own thread that ticks it at 60Hz
    RealTime,
    /// Timers only tick when `TimerPair::advance` is called
    Manual,
}

/// # Timers
/// The delay and sound timers.
///
/// Each one, while non-zero, loses 1 every 1/60th of a second independently of how fast
/// instructions execute. Reading them is the only way the CPU can see that time has passed.
pub struct TimerPair {
    delay: Arc<Countdown>,
    sound: Arc<Countdown>,
    running: Arc<AtomicBool>,
    tickers: Vec<JoinHandle<()>>,
}

impl TimerPair {
    pub fn new(mode: TimerMode) -> Self {
        let mut timers = TimerPair {
            delay: Arc::new(Countdown::default()),
            sound: Arc::new(Countdown::default()),
            running: Arc::new(AtomicBool::new(true)),
            tickers: Vec::new(),
        };
        if mode == TimerMode::RealTime {
            let delay = timers.spawn_ticker("delay", Arc::clone(&timers.delay));
            let sound = timers.spawn_ticker("sound", Arc::clone(&timers.sound));
            timers.tickers = vec![delay, sound];
        }
        timers
    }

    /// Ticks `countdown` at a fixed rate until the pair is dropped
    fn spawn_ticker(&self, name: &'static str, countdown: Arc<Countdown>) -> JoinHandle<()> {
        let running = Arc::clone(&self.running);
        debug!("starting {} timer", name);
        thread::spawn(move || {
            let mut next = Instant::now() + TIMER_PERIOD;
            while running.load(Ordering::Acquire) {
                let now = Instant::now();
                if next > now {
                    spin_sleep::sleep(next - now);
                }
                countdown.tick();
                // Schedule from the previous deadline so sleep overshoot doesn't accumulate
                next += TIMER_PERIOD;
            }
            debug!("stopped {} timer", name);
        })
    }

    pub fn delay(&self) -> u8 {
        self.delay.get()
    }

    pub fn set_delay(&self, value: u8) {
        self.delay.set(value)
    }

    pub fn sound(&self) -> u8 {
        self.sound.get()
    }

    pub fn set_sound(&self, value: u8) {
        self.sound.set(value)
    }

    /// A tone should be playing while the sound timer is non-zero
    pub fn is_sounding(&self) -> bool {
        self.sound() > 0
    }

    /// Advances both timers by `ticks` 60Hz periods
    pub fn advance(&self, ticks: u32) {
        for _ in 0..ticks {
            self.delay.tick();
            self.sound.tick();
        }
    }
}

impl Drop for TimerPair {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
        for ticker in self.tickers.drain(..) {
            let _ = ticker.join();
        }
    }
}
