//! Drag that chases a moving widget

use std::time::Duration;

use async_stream::try_stream;
use tracing::{trace, warn};

use crate::error::InputError;
use crate::event::{GestureEvent, Phase};
use crate::gestures::GestureStream;
use crate::pacing::{step_budget, FrameSync};
use crate::target::Target;
use crate::touch::TouchContact;

/// Options for [`touch_drag_follow`]
#[derive(Clone, Debug)]
pub struct DragFollow {
    pub origin: Target,
    /// Widget-relative destination, re-resolved after every step
    pub target: Target,
    pub long_press: Duration,
    pub duration: Duration,
    /// Planned number of moves
    pub steps: u32,
    /// Moves allowed before giving up on a fleeing target
    pub max_steps: u32,
    /// Absolute distance on each axis that counts as arrived
    pub tolerance: f32,
}

impl DragFollow {
    pub fn new(origin: Target, target: Target) -> Self {
        Self {
            origin,
            target,
            long_press: Duration::ZERO,
            duration: Duration::from_millis(200),
            steps: 5,
            max_steps: 25,
            tolerance: 1.0,
        }
    }

    pub fn long_press(mut self, long_press: Duration) -> Self {
        self.long_press = long_press;
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }

    pub fn max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }
}

fn arrived(pos: (f32, f32), target: (f32, f32), tolerance: f32) -> bool {
    (pos.0 - target.0).abs() <= tolerance && (pos.1 - target.1).abs() <= tolerance
}

/// Press, then move toward the target widget's live position until within
/// `tolerance` of it, then release
///
/// Each move covers `1 / max(1, steps - i)` of the remaining distance.
/// Fails with [`InputError::Convergence`] once `max_steps` moves have not
/// been enough.
pub fn touch_drag_follow<S: FrameSync>(sync: &S, options: DragFollow) -> GestureStream<'_> {
    Box::pin(try_stream! {
        if options.target.widget_ref().is_none() {
            Err::<(), _>(InputError::InvalidTarget(
                "a follow drag needs a widget target".into(),
            ))?;
        }
        let (x, y) = options.origin.resolve()?;
        let mut contact = TouchContact::new(sync.window(), x, y);

        contact.touch_down()?;
        sync.wait_frames(1).await;
        if !options.long_press.is_zero() {
            sync.sleep(options.long_press).await;
        }
        yield GestureEvent::new(Phase::Down, contact.pos());

        let start = sync.now();
        let mut target = options.target.resolve()?;
        let mut i = 0u32;
        while !arrived(contact.pos(), target, options.tolerance) {
            if i >= options.max_steps {
                warn!(steps = i, pos = ?contact.pos(), ?target, "follow drag did not converge");
                Err::<(), _>(InputError::Convergence {
                    steps: i,
                    pos: contact.pos(),
                    target,
                })?;
            }

            let remaining = options.steps.saturating_sub(i).max(1);
            let elapsed = sync.now().duration_since(start);
            sync.sleep(step_budget(options.duration, elapsed, remaining)).await;
            i += 1;

            let (cx, cy) = contact.pos();
            let n = remaining as f32;
            contact.touch_move(cx + (target.0 - cx) / n, cy + (target.1 - cy) / n)?;
            sync.wait_frames(1).await;
            trace!(step = i, pos = ?contact.pos(), ?target, "follow");
            yield GestureEvent::new(Phase::Move, contact.pos());

            target = options.target.resolve()?;
        }

        contact.touch_up()?;
        sync.wait_frames(1).await;
        yield GestureEvent::new(Phase::Up, contact.pos());
    })
}
