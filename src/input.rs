use std::io;
use std::time::Duration;

use chipvm_chip8::KEY_COUNT;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// The left-hand QWERTY block laid over the hex keypad:
///
/// ```text
/// 1 2 3 4      1 2 3 C
/// Q W E R      4 5 6 D
/// A S D F  ->  7 8 9 E
/// Z X C V      A 0 B F
/// ```
const KEYMAP: [(char, u8); KEY_COUNT] = [
    ('1', 0x1),
    ('2', 0x2),
    ('3', 0x3),
    ('4', 0xC),
    ('q', 0x4),
    ('w', 0x5),
    ('e', 0x6),
    ('r', 0xD),
    ('a', 0x7),
    ('s', 0x8),
    ('d', 0x9),
    ('f', 0xE),
    ('z', 0xA),
    ('x', 0x0),
    ('c', 0xB),
    ('v', 0xF),
];

pub fn map_key(code: KeyCode) -> Option<u8> {
    match code {
        KeyCode::Char(ch) => KEYMAP
            .iter()
            .find(|(mapped, _)| *mapped == ch.to_ascii_lowercase())
            .map(|&(_, key)| key),
        _ => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputAction {
    Continue,
    Quit,
}

/// Keypad state fed from terminal key events.
///
/// Most terminals report presses and auto-repeats but never releases, so a
/// press holds its key down for `hold_cycles` and each repeat extends it.
#[derive(Debug)]
pub struct KeyboardInput {
    hold_cycles: u64,
    held_until: [u64; KEY_COUNT],
    pinned: [bool; KEY_COUNT],
}

impl KeyboardInput {
    /// `pinned` keys stay down for the whole run.
    pub fn new(hold_cycles: u64, pinned: &[u8]) -> Self {
        let mut keys = [false; KEY_COUNT];
        for &key in pinned {
            if let Some(slot) = keys.get_mut(usize::from(key)) {
                *slot = true;
            }
        }
        Self {
            hold_cycles,
            held_until: [0; KEY_COUNT],
            pinned: keys,
        }
    }

    pub fn handle(&mut self, key: KeyEvent, cycle: u64) -> InputAction {
        let ctrl_c =
            key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c');
        if ctrl_c || key.code == KeyCode::Esc {
            return InputAction::Quit;
        }
        let Some(hex) = map_key(key.code) else {
            tracing::trace!(code = ?key.code, "unmapped key");
            return InputAction::Continue;
        };
        self.held_until[usize::from(hex)] = match key.kind {
            KeyEventKind::Release => cycle,
            KeyEventKind::Press | KeyEventKind::Repeat => cycle + self.hold_cycles,
        };
        InputAction::Continue
    }

    /// Drains every pending terminal event without blocking.
    pub fn poll(&mut self, cycle: u64) -> io::Result<InputAction> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if self.handle(key, cycle) == InputAction::Quit {
                    return Ok(InputAction::Quit);
                }
            }
        }
        Ok(InputAction::Continue)
    }

    pub fn keys(&self, cycle: u64) -> [bool; KEY_COUNT] {
        std::array::from_fn(|idx| self.pinned[idx] || self.held_until[idx] > cycle)
    }
}
