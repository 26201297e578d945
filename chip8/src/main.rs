use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use emu8_core::{Quirks, CLOCK_SPEED};
use emu8_display::DEFAULT_SCALE;

mod keymap;
mod run;

/// Runs a Chip-8 ROM in a window.
///
/// Keys 1-4, Q-R, A-F and Z-V make up the keypad. Hold Space to fast forward and press
/// Escape to quit.
#[derive(Parser, Debug)]
#[command(name = "emu8", version)]
struct Args {
    /// Path to the ROM file
    rom: PathBuf,

    /// Instructions executed per second
    #[arg(long, default_value_t = CLOCK_SPEED, value_parser = clap::value_parser!(u32).range(1..))]
    clock_hz: u32,

    /// Size of each Chip-8 pixel on screen
    #[arg(long, default_value_t = DEFAULT_SCALE, value_parser = clap::value_parser!(u32).range(1..))]
    scale: u32,

    /// Make EXA1 skip when the key is pressed, as some interpreters did
    #[arg(long, default_value_t = false)]
    legacy_key_skip: bool,

    /// Clear VF when 8XY5/8XY7 subtract equal values
    #[arg(long, default_value_t = false)]
    borrow_on_equal: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let settings = run::Settings {
        clock_hz: args.clock_hz,
        scale: args.scale,
        quirks: Quirks {
            legacy_key_skip: args.legacy_key_skip,
            borrow_on_equal: args.borrow_on_equal,
        },
    };
    run::run(&args.rom, settings)
}
