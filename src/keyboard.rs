use std::collections::HashSet;
use std::iter::FromIterator;

pub const NUM_KEYS: usize = 16;

/// Key's variants are the 16 keys from the CHIP-8's hexadecimal keyboard.
/// The recommended key mapping is:
///
/// Keypad                   Keyboard
/// +-+-+-+-+                +-+-+-+-+
/// |1|2|3|C|                |1|2|3|4|
/// +-+-+-+-+                +-+-+-+-+
/// |4|5|6|D|                |Q|W|E|R|
/// +-+-+-+-+       =>       +-+-+-+-+
/// |7|8|9|E|                |A|S|D|F|
/// +-+-+-+-+                +-+-+-+-+
/// |A|0|B|F|                |Z|X|C|V|
/// +-+-+-+-+                +-+-+-+-+
#[derive(Debug, Eq, PartialEq, Hash, Copy, Clone)]
pub enum Key {
    Key1,
    Key2,
    Key3,
    C,
    Key4,
    Key5,
    Key6,
    D,
    Key7,
    Key8,
    Key9,
    E,
    A,
    Key0,
    B,
    F,
}

impl From<Key> for usize {
    fn from(key: Key) -> usize {
        match key {
            Key::Key0 => 0x0,
            Key::Key1 => 0x1,
            Key::Key2 => 0x2,
            Key::Key3 => 0x3,
            Key::Key4 => 0x4,
            Key::Key5 => 0x5,
            Key::Key6 => 0x6,
            Key::Key7 => 0x7,
            Key::Key8 => 0x8,
            Key::Key9 => 0x9,
            Key::A => 0xA,
            Key::B => 0xB,
            Key::C => 0xC,
            Key::D => 0xD,
            Key::E => 0xE,
            Key::F => 0xF,
        }
    }
}

/// Implemented by the host's input layer. The emulator polls it between cycles
/// to find out which of the 16 keys are currently held down.
pub trait AsKeyboard {
    fn keys_down(&self) -> Vec<Key>;
}

/// The up/down state of the CHIP-8's 16 keys. Written by the host between
/// cycles, read by the key instructions.
#[derive(Debug, Default, PartialEq)]
pub struct Keyboard {
    key_input: [bool; NUM_KEYS],
}

impl Keyboard {
    pub fn new() -> Self {
        Keyboard {
            key_input: [false; NUM_KEYS],
        }
    }

    /// Handle the key down event for one of the 16 possible keys
    #[cfg(test)]
    pub fn handle_key_down(&mut self, k: Key) {
        self.set_key_down(k.into());
    }

    fn set_key_down(&mut self, idx: usize) {
        if idx < NUM_KEYS {
            self.key_input[idx] = true;
        }
    }

    /// Handle the key up event for one of the 16 possible keys
    #[cfg(test)]
    pub fn handle_key_up(&mut self, k: Key) {
        self.set_key_up(k.into());
    }

    fn set_key_up(&mut self, idx: usize) {
        if idx < NUM_KEYS {
            self.key_input[idx] = false;
        }
    }

    /// Given the keys pressed down on the system keyboard, fire the appropriate
    /// key_up and key_down handlers
    pub fn update_keyboard_with_vec(&mut self, keys: &[Key]) {
        let set: HashSet<usize> = HashSet::from_iter(keys.iter().map(|&k| usize::from(k)));

        // check each of the 16 keys to see which have changed from up to down or vice versa
        for i in 0..NUM_KEYS {
            let system_key_is_down = set.contains(&i);
            let interpreter_key_is_down = self.get_key_state(i);

            if system_key_is_down && !interpreter_key_is_down {
                self.set_key_down(i);
            } else if !system_key_is_down && interpreter_key_is_down {
                self.set_key_up(i);
            }
        }
    }

    /// Overwrite the whole latch at once
    pub fn set_all(&mut self, keys: &[bool; NUM_KEYS]) {
        self.key_input = *keys;
    }

    /// Return the state of the key at the given index. Indices past 0xF are never pressed.
    pub fn get_key_state(&self, idx: usize) -> bool {
        self.key_input.get(idx).copied().unwrap_or(false)
    }

    /// The lowest-numbered key currently held down
    pub fn first_pressed(&self) -> Option<u8> {
        self.key_input.iter().position(|&down| down).map(|idx| idx as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_down_and_up() {
        let mut keyboard = Keyboard::new();

        keyboard.handle_key_down(Key::C);
        assert!(keyboard.get_key_state(0xC));

        keyboard.handle_key_up(Key::C);
        assert!(!keyboard.get_key_state(0xC));
    }

    #[test]
    fn update_with_vec_releases_missing_keys() {
        let mut keyboard = Keyboard::new();
        keyboard.handle_key_down(Key::Key0);

        keyboard.update_keyboard_with_vec(&[Key::Key7, Key::F]);

        assert!(!keyboard.get_key_state(0x0));
        assert!(keyboard.get_key_state(0x7));
        assert!(keyboard.get_key_state(0xF));
    }

    #[test]
    fn first_pressed_scans_ascending() {
        let mut keyboard = Keyboard::new();
        assert_eq!(keyboard.first_pressed(), None);

        keyboard.handle_key_down(Key::E);
        keyboard.handle_key_down(Key::Key9);

        assert_eq!(keyboard.first_pressed(), Some(9));
    }

    #[test]
    fn out_of_range_key_is_up() {
        let mut keyboard = Keyboard::new();
        keyboard.set_all(&[true; NUM_KEYS]);

        assert!(keyboard.get_key_state(0xF));
        assert!(!keyboard.get_key_state(0x10));
        assert!(!keyboard.get_key_state(0xFF));
    }
}
