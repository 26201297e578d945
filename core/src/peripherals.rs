use std::thread;
use std::time::Duration;

use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, KEY_COUNT};

/// Something the CPU can draw sprites on.
///
/// The display is 64x32 monochrome pixels; coordinates wrap around both edges.
pub trait Display {
    /// Turns every pixel off
    fn clear(&mut self);

    /// XORs the bits of `byte`, most significant first, onto the 8 pixels starting at
    /// (`x`, `y`), wrapping both coordinates.
    ///
    /// Returns true if any pixel went from on to off.
    fn xor_byte(&mut self, byte: u8, x: usize, y: usize) -> bool;

    /// Called after an instruction has finished changing the display
    fn refresh(&mut self) {}
}

/// The hexadecimal keypad
///
/// ```text
/// |1|2|3|C|
/// |4|5|6|D|
/// |7|8|9|E|
/// |A|0|B|F|
/// ```
pub trait Keypad {
    /// Whether `key` (0..F) is currently held down
    fn is_pressed(&mut self, key: u8) -> bool;

    /// Whether the keypad has been disconnected and will never report another press
    fn is_closed(&self) -> bool {
        false
    }

    /// Blocks until any key is held and returns the lowest one held, re-reading the keypad
    /// every `poll_interval`.
    ///
    /// Returns None if the keypad closes while waiting.
    fn wait_for_keypress(&mut self, poll_interval: Duration) -> Option<u8> {
        loop {
            if let Some(key) = (0..KEY_COUNT).find(|&key| self.is_pressed(key)) {
                return Some(key);
            }
            if self.is_closed() {
                return None;
            }
            thread::sleep(poll_interval);
        }
    }
}

/// The FrameBuffer is indexed as [y][x]
pub type Frame = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// # FrameBuffer
/// An in-memory `Display`.
///
/// Frontends render it whenever `take_frame` hands back a frame, which happens at most
/// once per refresh.
#[derive(Clone)]
pub struct FrameBuffer {
    frame: Frame,
    draw_flag: bool,
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            frame: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
        }
    }

    /// The current contents, whether or not they changed
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Returns the frame if the display should be redrawn, and lowers the draw flag
    pub fn take_frame(&mut self) -> Option<&Frame> {
        if self.draw_flag {
            self.draw_flag = false;
            Some(&self.frame)
        } else {
            None
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.frame[y % DISPLAY_HEIGHT][x % DISPLAY_WIDTH]
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for FrameBuffer {
    fn clear(&mut self) {
        self.frame = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    }

    fn xor_byte(&mut self, byte: u8, x: usize, y: usize) -> bool {
        let row = &mut self.frame[y % DISPLAY_HEIGHT];
        let mut erased = false;
        for bit in 0..8 {
            let pixel = &mut row[(x + bit) % DISPLAY_WIDTH];
            let value = (byte >> (7 - bit)) & 1;
            erased |= value & *pixel == 1;
            *pixel ^= value;
        }
        erased
    }

    fn refresh(&mut self) {
        self.draw_flag = true;
    }
}

/// # KeyState
/// An in-memory `Keypad` whose keys are pressed and released by the host.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    pressed: [bool; KEY_COUNT as usize],
    closed: bool,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was pressed
    pub fn press(&mut self, key: u8) {
        if let Some(pressed) = self.pressed.get_mut(key as usize) {
            *pressed = true;
        }
    }

    /// Unset the pressed status of key
    pub fn release(&mut self, key: u8) {
        if let Some(pressed) = self.pressed.get_mut(key as usize) {
            *pressed = false;
        }
    }

    /// Stops any pending `wait_for_keypress` that has nothing to return
    pub fn close(&mut self) {
        self.closed = true;
    }
}

impl Keypad for KeyState {
    fn is_pressed(&mut self, key: u8) -> bool {
        self.pressed.get(key as usize).copied().unwrap_or(false)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
