pub const CHIP8_KEY_COUNT: usize = 16;

/// Level state of the 16 hex keys; written by the input side, read by the
/// interpreter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; CHIP8_KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    /// keys outside 0x0-0xf are ignored
    pub fn set(&mut self, key: u8, down: bool) {
        if let Some(k) = self.keys.get_mut(key as usize) {
            *k = down;
        }
    }

    pub fn press(&mut self, key: u8) {
        self.set(key, true);
    }

    pub fn release(&mut self, key: u8) {
        self.set(key, false);
    }

    pub fn release_all(&mut self) {
        self.keys = [false; CHIP8_KEY_COUNT];
    }

    /// keys outside 0x0-0xf are never pressed
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }

    /// lowest-numbered key currently held down
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&k| k).map(|k| k as u8)
    }
}

impl From<[bool; CHIP8_KEY_COUNT]> for Keypad {
    fn from(keys: [bool; CHIP8_KEY_COUNT]) -> Self {
        Keypad { keys }
    }
}
