pub const KEY_COUNT: usize = 16;

/// Latched state of the hexadecimal keypad, written by the input source
/// before each cycle and only read by the interpreter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, keys: [bool; KEY_COUNT]) {
        self.keys = keys;
    }

    pub fn press(&mut self, key: u8) {
        if let Some(latch) = self.keys.get_mut(usize::from(key)) {
            *latch = true;
        }
    }

    pub fn release(&mut self, key: u8) {
        if let Some(latch) = self.keys.get_mut(usize::from(key)) {
            *latch = false;
        }
    }

    pub fn release_all(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    /// Keys past 0xF do not exist and are never pressed.
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys.get(usize::from(key)).copied().unwrap_or(false)
    }

    /// Highest-numbered key currently held.
    pub fn last_pressed(&self) -> Option<u8> {
        self.keys.iter().rposition(|&down| down).map(|key| key as u8)
    }

    pub fn keys(&self) -> [bool; KEY_COUNT] {
        self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release() {
        let mut keypad = Keypad::new();
        assert_eq!(keypad.last_pressed(), None);
        keypad.press(0xC);
        keypad.press(0x3);
        assert!(keypad.is_pressed(0xC));
        assert_eq!(keypad.last_pressed(), Some(0xC));
        keypad.release(0xC);
        assert_eq!(keypad.last_pressed(), Some(0x3));
        keypad.release_all();
        assert_eq!(keypad.keys(), [false; KEY_COUNT]);
    }

    #[test]
    fn nonexistent_keys_are_ignored() {
        let mut keypad = Keypad::new();
        keypad.press(0x10);
        assert_eq!(keypad.last_pressed(), None);
        assert!(!keypad.is_pressed(0xFF));
    }
}
