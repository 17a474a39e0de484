//! Keyboard key presses

use std::pin::Pin;
use std::time::Duration;

use async_stream::try_stream;
use futures::stream::Stream;
use probe_platform::{KeyboardEvent, Modifier};
use tracing::trace;

use crate::error::{InputError, Result};
use crate::event::{KeyPhase, KeyStroke};
use crate::pacing::FrameSync;

/// A lazily-driven key press sequence
pub type KeyStream<'a> = Pin<Box<dyn Stream<Item = Result<KeyStroke>> + 'a>>;

/// Keycodes that never produce text input
const NON_PRINTABLE: &[u32] = &[
    27,  // escape
    9,   // tab
    8,   // backspace
    13,  // enter
    127, // delete
    271, // numpad enter
    273, 274, 275, 276, // arrows
    278, 279, // home, end
    280, 281, // page up, page down
    300, // numlock
    301, // capslock
    145, // screenlock
];

/// Options for [`keyboard_key`]
#[derive(Clone, Debug)]
pub struct KeyPress {
    pub key: String,
    /// Modifier names; each must be one of shift, alt, ctrl, meta
    pub modifiers: Vec<String>,
    /// Total time over all presses
    pub duration: Duration,
    pub presses: u32,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Vec::new(),
            duration: Duration::from_millis(50),
            presses: 1,
        }
    }

    pub fn modifiers<I, M>(mut self, modifiers: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        self.modifiers = modifiers.into_iter().map(Into::into).collect();
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn presses(mut self, presses: u32) -> Self {
        self.presses = presses;
        self
    }
}

/// The key label as dispatched: a literal space becomes `spacebar`
fn normalize_key(key: &str) -> String {
    if key == " " {
        "spacebar".to_string()
    } else {
        key.to_string()
    }
}

fn parse_modifiers(names: &[String]) -> Result<Vec<Modifier>> {
    let mut modifiers = Vec::with_capacity(names.len());
    let mut unknown = Vec::new();
    for name in names {
        match name.parse::<Modifier>() {
            Ok(modifier) => modifiers.push(modifier),
            Err(name) => unknown.push(name),
        }
    }
    if unknown.is_empty() {
        Ok(modifiers)
    } else {
        Err(InputError::UnknownModifier(unknown))
    }
}

/// Best-effort text for a key
///
/// The code point of the keycode, or the key label itself when it is not
/// already lower case (so `"A"` types `A` whatever the host layout).
fn key_text(key: &str, key_lower: &str, keycode: u32) -> Option<String> {
    if key_lower != key {
        return Some(key.to_string());
    }
    char::from_u32(keycode).map(String::from)
}

fn produces_text(key: &str, keycode: u32, modifiers: &[Modifier]) -> bool {
    !Modifier::is_modifier_name(key) && !NON_PRINTABLE.contains(&keycode) && modifiers.is_empty()
}

/// Press a key `presses` times and release it once
///
/// Every press sleeps `duration / presses` first. Presses of printable keys
/// without held modifiers are followed by a text input notification.
pub fn keyboard_key<S: FrameSync>(sync: &S, options: KeyPress) -> KeyStream<'_> {
    Box::pin(try_stream! {
        if options.presses == 0 {
            Err::<(), _>(InputError::InvalidPressCount)?;
        }
        let modifiers = parse_modifiers(&options.modifiers)?;
        let window = sync.window();

        let key = normalize_key(&options.key);
        let key_lower = key.to_lowercase();
        let keycode = window
            .keycode(&key_lower)
            .ok_or_else(|| InputError::UnknownKey(key.clone()))?;
        let text = key_text(&key, &key_lower, keycode);
        let stroke = |phase| KeyStroke {
            phase,
            key: key.clone(),
            keycode,
            scancode: 0,
            text: text.clone(),
            modifiers: modifiers.clone(),
        };

        let dt = options.duration / options.presses;
        for _ in 0..options.presses {
            sync.sleep(dt).await;

            window.dispatch_key(KeyboardEvent::KeyDown {
                keycode,
                scancode: 0,
                text: text.clone(),
                modifiers: modifiers.clone(),
            });
            if produces_text(&key, keycode, &modifiers) {
                if let Some(text) = &text {
                    window.dispatch_key(KeyboardEvent::TextInput { text: text.clone() });
                }
            }
            sync.wait_frames(1).await;
            trace!(key = %key, keycode, "key down");
            yield stroke(KeyPhase::Down);
        }

        window.dispatch_key(KeyboardEvent::KeyUp {
            keycode,
            scancode: 0,
        });
        sync.wait_frames(1).await;
        trace!(key = %key, keycode, "key up");
        yield stroke(KeyPhase::Up);
    })
}
