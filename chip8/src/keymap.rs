use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::EventPump;

use emu8_core::{KeyState, Keypad};

/// # Keymap
/// Chip-8 input is generated with a hexadecimal keypad.
///
/// This original layout is mapped to the left 4 alphanumeric columns.
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  ->  |Q|W|E|R|
/// |7|8|9|E|  ->  |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
pub fn keymap(key: Keycode) -> Option<u8> {
    match key {
        Keycode::X => Some(0x0),
        Keycode::Num1 => Some(0x1),
        Keycode::Num2 => Some(0x2),
        Keycode::Num3 => Some(0x3),
        Keycode::Q => Some(0x4),
        Keycode::W => Some(0x5),
        Keycode::E => Some(0x6),
        Keycode::A => Some(0x7),
        Keycode::S => Some(0x8),
        Keycode::D => Some(0x9),
        Keycode::Z => Some(0xA),
        Keycode::C => Some(0xB),
        Keycode::Num4 => Some(0xC),
        Keycode::R => Some(0xD),
        Keycode::F => Some(0xE),
        Keycode::V => Some(0xF),
        _ => None,
    }
}

/// # SdlKeypad
/// A `Keypad` fed by SDL2 keyboard events.
///
/// Besides the 16 mapped keys it tracks:
/// - Space, held to run faster than the clock speed
/// - Escape or closing the window, to quit
pub struct SdlKeypad {
    events: EventPump,
    keys: KeyState,
    fast_forward: bool,
    quit: bool,
}

impl SdlKeypad {
    pub fn new(events: EventPump) -> Self {
        SdlKeypad {
            events,
            keys: KeyState::new(),
            fast_forward: false,
            quit: false,
        }
    }

    /// Drains pending SDL2 events into the key state
    pub fn pump(&mut self) {
        for event in self.events.poll_iter() {
            match event {
                Event::Quit { .. } => self.quit = true,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => self.keys.press(kc),
                    (Keycode::Space, _) => self.fast_forward = true,
                    (Keycode::Escape, _) => self.quit = true,
                    _ => continue,
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => self.keys.release(kc),
                    (Keycode::Space, _) => self.fast_forward = false,
                    _ => continue,
                },
                _ => continue,
            };
        }
        if self.quit {
            self.keys.close();
        }
    }

    /// Whether the default clock speed should be ignored
    pub fn fast_forward(&self) -> bool {
        self.fast_forward
    }
}

impl Keypad for SdlKeypad {
    fn is_pressed(&mut self, key: u8) -> bool {
        self.pump();
        self.keys.is_pressed(key)
    }

    fn is_closed(&self) -> bool {
        self.keys.is_closed()
    }
}
