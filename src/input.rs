use crate::keypad::{Keypad, CHIP8_KEY_COUNT};
use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal;
use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

/// left-hand side of a qwerty keyboard, laid out like the COSMAC VIP keypad:
///   1 2 3 4      1 2 3 C
///   q w e r  ->  4 5 6 D
///   a s d f      7 8 9 E
///   z x c v      A 0 B F
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00), // x
    ('1', 0x01), // 1
    ('2', 0x02), // 2
    ('3', 0x03), // 3
    ('q', 0x04), // q
    ('w', 0x05), // w
    ('e', 0x06), // e
    ('a', 0x07), // a
    ('s', 0x08), // s
    ('d', 0x09), // d
    ('z', 0x0a), // z
    ('c', 0x0b), // c
    ('4', 0x0c), // 4
    ('r', 0x0d), // r
    ('f', 0x0e), // f
    ('v', 0x0f), // v
];

/// what the host needs from the input side once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub keys: Keypad,
    pub quit: bool,
}

/// reads the keypad
pub trait Input {
    /// current level state of every key, plus whether the user asked to stop
    fn poll(&mut self) -> Result<InputState, io::Error>;
}

/// Terminals report key presses (and auto-repeat) but not releases, so a key
/// counts as held for `hold` after the last press seen for it.
struct KeyHold {
    hold: Duration,
    last_press: [Option<Instant>; CHIP8_KEY_COUNT],
}

impl KeyHold {
    fn new(hold: Duration) -> Self {
        KeyHold {
            hold,
            last_press: [None; CHIP8_KEY_COUNT],
        }
    }

    fn press(&mut self, key: u8, now: Instant) {
        if let Some(slot) = self.last_press.get_mut(key as usize) {
            *slot = Some(now);
        }
    }

    fn keypad(&self, now: Instant) -> Keypad {
        let mut keys = Keypad::new();
        for (key, pressed) in self.last_press.iter().enumerate() {
            if let Some(at) = pressed {
                keys.set(key as u8, now.saturating_duration_since(*at) < self.hold);
            }
        }
        keys
    }
}

/// keyboard input from the terminal, via crossterm in raw mode
pub struct TermInput {
    keymap: HashMap<char, u8>,
    held: KeyHold,
}

impl TermInput {
    pub fn new(hold: Duration) -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(TermInput {
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            held: KeyHold::new(hold),
        })
    }

    /// drain pending events; returns true if the user asked to quit
    fn read_events(&mut self) -> Result<bool, io::Error> {
        let mut quit = false;
        while poll(Duration::from_millis(0))? {
            match read()? {
                Event::Key(KeyEvent {
                    code: KeyCode::Char('c'),
                    modifiers,
                    ..
                }) if modifiers.contains(KeyModifiers::CONTROL) => quit = true,
                Event::Key(evt) => match evt.code {
                    KeyCode::Char(key) => match self.keymap.get(&key.to_ascii_lowercase()) {
                        Some(&mapped_key) => self.held.press(mapped_key, Instant::now()),
                        None => log::warn!("can't map {:?} to a COSMAC key", key),
                    },
                    KeyCode::Esc => quit = true,
                    other => log::debug!("ignoring key {:?}", other),
                },
                other => log::debug!("ignoring event {:?}", other),
            }
        }
        Ok(quit)
    }
}

impl Drop for TermInput {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Input for TermInput {
    fn poll(&mut self) -> Result<InputState, io::Error> {
        let quit = self.read_events()?;
        Ok(InputState {
            keys: self.held.keypad(Instant::now()),
            quit,
        })
    }
}

/// dummy Input implementation for testing: the given keys are held down
/// forever, optionally asking to quit after some number of polls
pub struct DummyInput {
    keys: Keypad,
    quit_after: Option<usize>,
    polls: usize,
}

impl DummyInput {
    pub fn new(keys: &[u8]) -> Self {
        let mut keypad = Keypad::new();
        for &k in keys {
            keypad.press(k);
        }
        DummyInput {
            keys: keypad,
            quit_after: None,
            polls: 0,
        }
    }

    pub fn quit_after(mut self, polls: usize) -> Self {
        self.quit_after = Some(polls);
        self
    }
}

impl Input for DummyInput {
    fn poll(&mut self) -> Result<InputState, io::Error> {
        self.polls += 1;
        Ok(InputState {
            keys: self.keys,
            quit: self.quit_after.map_or(false, |n| self.polls > n),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keymap_covers_every_key() {
        let map = HashMap::from(CHIP8_CONVENTIONAL_KEYMAP);
        let mut seen: Vec<u8> = map.values().copied().collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..16).collect::<Vec<u8>>());
        assert_eq!(map[&'4'], 0xc);
        assert_eq!(map[&'v'], 0xf);
    }

    #[test]
    fn test_key_hold_expires() {
        let t0 = Instant::now();
        let mut held = KeyHold::new(Duration::from_millis(100));
        held.press(0x5, t0);
        assert!(held.keypad(t0 + Duration::from_millis(50)).is_pressed(0x5));
        assert!(!held.keypad(t0 + Duration::from_millis(150)).is_pressed(0x5));
    }

    #[test]
    fn test_key_hold_repress_extends() {
        let t0 = Instant::now();
        let mut held = KeyHold::new(Duration::from_millis(100));
        held.press(0x1, t0);
        held.press(0x1, t0 + Duration::from_millis(80));
        assert!(held.keypad(t0 + Duration::from_millis(150)).is_pressed(0x1));
    }

    #[test]
    fn test_dummy_input() -> Result<(), io::Error> {
        let mut input = DummyInput::new(&[0x2, 0xb]).quit_after(1);
        let first = input.poll()?;
        assert!(first.keys.is_pressed(0x2));
        assert!(first.keys.is_pressed(0xb));
        assert!(!first.quit);
        assert!(input.poll()?.quit);
        Ok(())
    }
}
