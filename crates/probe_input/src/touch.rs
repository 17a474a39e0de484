//! Simulated pointer contact
//!
//! A contact moves through `idle -> down -> move* -> up`. Each transition
//! dispatches the matching notification to the surface.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use probe_platform::{TouchPhase, TouchPoint, Window};
use tracing::trace;

use crate::error::{InputError, Result};

static NEXT_CONTACT_ID: AtomicU64 = AtomicU64::new(1);

/// Lifecycle state of a contact
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactState {
    Idle,
    Down,
    Moved,
    Up,
}

/// One simulated pointer, from press to release
pub struct TouchContact {
    id: u64,
    pos: (f32, f32),
    state: ContactState,
    exclusive: bool,
    window: Arc<dyn Window>,
}

impl TouchContact {
    /// Create an idle contact at a surface position
    pub fn new(window: Arc<dyn Window>, x: f32, y: f32) -> Self {
        Self {
            id: NEXT_CONTACT_ID.fetch_add(1, Ordering::Relaxed),
            pos: (x, y),
            state: ContactState::Idle,
            exclusive: false,
            window,
        }
    }

    /// Allow a widget to grab the contact exclusively
    pub fn exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn pos(&self) -> (f32, f32) {
        self.pos
    }

    pub fn state(&self) -> ContactState {
        self.state
    }

    pub fn touch_down(&mut self) -> Result<()> {
        match self.state {
            ContactState::Idle => {}
            ContactState::Up => return Err(InputError::ContactClosed(self.id)),
            _ => return Err(InputError::ContactActive(self.id)),
        }
        self.dispatch(TouchPhase::Begin);
        self.state = ContactState::Down;
        Ok(())
    }

    pub fn touch_move(&mut self, x: f32, y: f32) -> Result<()> {
        self.ensure_down()?;
        self.pos = (x, y);
        self.dispatch(TouchPhase::Update);
        self.state = ContactState::Moved;
        Ok(())
    }

    pub fn touch_up(&mut self) -> Result<()> {
        self.ensure_down()?;
        self.dispatch(TouchPhase::End);
        self.state = ContactState::Up;
        Ok(())
    }

    fn ensure_down(&self) -> Result<()> {
        match self.state {
            ContactState::Down | ContactState::Moved => Ok(()),
            ContactState::Idle => Err(InputError::ContactNotDown(self.id)),
            ContactState::Up => Err(InputError::ContactClosed(self.id)),
        }
    }

    fn dispatch(&self, phase: TouchPhase) {
        let mut point = TouchPoint::new(self.id, self.pos.0, self.pos.1, self.window.size());
        point.exclusive = self.exclusive;
        trace!(id = self.id, ?phase, x = self.pos.0, y = self.pos.1, "touch");
        self.window.dispatch_touch(phase, &point);
    }
}

#[cfg(test)]
mod tests {
    use probe_platform_headless::{HeadlessToolkit, InputRecord};
    use probe_platform::Toolkit;

    use super::*;

    #[test]
    fn test_contact_lifecycle() {
        let toolkit = HeadlessToolkit::new();
        let window = toolkit.window();
        let mut contact = TouchContact::new(window.clone(), 10.0, 20.0);

        assert!(matches!(contact.touch_move(1.0, 1.0), Err(InputError::ContactNotDown(_))));
        contact.touch_down().unwrap();
        assert!(matches!(contact.touch_down(), Err(InputError::ContactActive(_))));
        contact.touch_move(30.0, 40.0).unwrap();
        contact.touch_up().unwrap();
        assert_eq!(contact.state(), ContactState::Up);

        assert!(matches!(contact.touch_move(1.0, 1.0), Err(InputError::ContactClosed(_))));
        assert!(matches!(contact.touch_up(), Err(InputError::ContactClosed(_))));
        assert!(matches!(contact.touch_down(), Err(InputError::ContactClosed(_))));

        let phases: Vec<TouchPhase> = window
            .history()
            .into_iter()
            .filter_map(|record| match record {
                InputRecord::Touch { phase, id, .. } if id == contact.id() => Some(phase),
                _ => None,
            })
            .collect();
        assert_eq!(
            phases,
            vec![TouchPhase::Begin, TouchPhase::Update, TouchPhase::End]
        );
    }

    #[test]
    fn test_contacts_get_distinct_ids() {
        let toolkit = HeadlessToolkit::new();
        let a = TouchContact::new(toolkit.window(), 0.0, 0.0);
        let b = TouchContact::new(toolkit.window(), 0.0, 0.0);
        assert_ne!(a.id(), b.id());
    }
}
