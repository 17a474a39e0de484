//! Key label to keycode table

use rustc_hash::FxHashMap;

const KEYS: &[(&str, u32)] = &[
    ("backspace", 8),
    ("tab", 9),
    ("enter", 13),
    ("escape", 27),
    ("spacebar", 32),
    ("delete", 127),
    ("numpadenter", 271),
    ("up", 273),
    ("down", 274),
    ("right", 275),
    ("left", 276),
    ("home", 278),
    ("end", 279),
    ("pageup", 280),
    ("pagedown", 281),
    ("capslock", 301),
    ("numlock", 300),
    ("screenlock", 145),
    ("shift", 304),
    ("rshift", 303),
    ("ctrl", 305),
    ("lctrl", 305),
    ("rctrl", 306),
    ("alt", 308),
    ("ralt", 307),
    ("meta", 309),
    ("super", 309),
    ("f1", 282),
    ("f2", 283),
    ("f3", 284),
    ("f4", 285),
    ("f5", 286),
    ("f6", 287),
    ("f7", 288),
    ("f8", 289),
    ("f9", 290),
    ("f10", 291),
    ("f11", 292),
    ("f12", 293),
];

/// Maps lower-case key labels to keycodes
///
/// Single printable ASCII characters map to their code point.
pub struct KeyMap {
    named: FxHashMap<&'static str, u32>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            named: KEYS.iter().copied().collect(),
        }
    }
}

impl KeyMap {
    pub fn code(&self, label: &str) -> Option<u32> {
        if let Some(code) = self.named.get(label) {
            return Some(*code);
        }
        let mut chars = label.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_graphic() => Some(c as u32),
            _ => None,
        }
    }
}
