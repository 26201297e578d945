use std::error::Error;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use log::{info, warn};

use emu8_core::{Chip8, Config, FrameBuffer, Keypad, Quirks};
use emu8_display::Screen;

use crate::keymap::SdlKeypad;

/// Options the frontend passes through to the interpreter
pub struct Settings {
    pub clock_hz: u32,
    pub scale: u32,
    pub quirks: Quirks,
}

pub fn run(rom: &Path, settings: Settings) -> Result<(), Box<dyn Error>> {
    let rom = fs::read(rom)?;
    info!("read {} byte ROM", rom.len());

    // Get SDL2 context
    let sdl = sdl2::init()?;
    let mut screen = Screen::new(&sdl, settings.scale)?;
    let keypad = SdlKeypad::new(sdl.event_pump()?);

    let config = Config::default().with_quirks(settings.quirks);
    let mut chip8 = Chip8::new(&rom, FrameBuffer::new(), keypad, config)?;
    warn!("the sound timer is tracked but no tone is played");

    // Set initial timing
    let cycle_time = Duration::from_secs(1) / settings.clock_hz;
    let mut last_cycle = Instant::now();

    loop {
        // If the draw flag is set, unset it and render the current frame
        if let Some(frame) = chip8.display_mut().take_frame() {
            screen.render(frame)?;
        }

        // Handle input
        chip8.keypad_mut().pump();
        if chip8.keypad_mut().is_closed() {
            info!("window closed");
            return Ok(());
        }

        // Update state
        if let Some(exit) = chip8.step()? {
            info!("program stopped: {:?}", exit);
            return Ok(());
        }

        // Handle timing
        let elapsed_cycle_time = last_cycle.elapsed();
        if !chip8.keypad_mut().fast_forward() && cycle_time > elapsed_cycle_time {
            std::thread::sleep(cycle_time - elapsed_cycle_time);
        }
        last_cycle = Instant::now();
    }
}
