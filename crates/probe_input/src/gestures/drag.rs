//! Straight-line drag to a fixed point

use std::time::Duration;

use async_stream::try_stream;
use tracing::trace;

use crate::event::{GestureEvent, Phase};
use crate::gestures::GestureStream;
use crate::pacing::{step_budget, FrameSync};
use crate::target::Target;
use crate::touch::TouchContact;

/// Options for [`touch_drag`]
#[derive(Clone, Debug)]
pub struct Drag {
    /// Where the press happens
    pub origin: Target,
    /// Displacement from the origin, in the origin's coordinate system, used
    /// when no destination is given
    pub delta: (f32, f32),
    /// Where the release happens
    pub to: Option<Target>,
    /// Hold time after the press, before `down` is emitted
    pub long_press: Duration,
    pub duration: Duration,
    /// Number of interpolated moves
    pub steps: u32,
}

impl Drag {
    pub fn new(origin: Target) -> Self {
        Self {
            origin,
            delta: (0.0, 0.0),
            to: None,
            long_press: Duration::ZERO,
            duration: Duration::from_millis(200),
            steps: 5,
        }
    }

    pub fn by(mut self, dx: f32, dy: f32) -> Self {
        self.delta = (dx, dy);
        self
    }

    pub fn to(mut self, target: Target) -> Self {
        self.to = Some(target);
        self
    }

    pub fn long_press(mut self, long_press: Duration) -> Self {
        self.long_press = long_press;
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Number of interpolated moves; at least one
    pub fn steps(mut self, steps: u32) -> Self {
        self.steps = steps.max(1);
        self
    }

    fn destination(&self) -> crate::Result<(f32, f32)> {
        match &self.to {
            Some(target) => target.resolve(),
            None => self
                .origin
                .clone()
                .offset(self.delta.0, self.delta.1)
                .resolve(),
        }
    }
}

/// Press, drag along a straight line in `steps` moves, release
///
/// The step sleeps split the time left over the steps left. When the last
/// interpolated point misses the destination an extra move lands on it
/// exactly.
pub fn touch_drag<S: FrameSync>(sync: &S, options: Drag) -> GestureStream<'_> {
    Box::pin(try_stream! {
        let (x, y) = options.origin.resolve()?;
        let (tx, ty) = options.destination()?;
        let steps = options.steps.max(1);
        let mut contact = TouchContact::new(sync.window(), x, y);

        contact.touch_down()?;
        sync.wait_frames(1).await;
        if !options.long_press.is_zero() {
            sync.sleep(options.long_press).await;
        }
        yield GestureEvent::new(Phase::Down, contact.pos());

        let step_x = (tx - x) / steps as f32;
        let step_y = (ty - y) / steps as f32;
        let start = sync.now();
        for i in 0..steps {
            let elapsed = sync.now().duration_since(start);
            sync.sleep(step_budget(options.duration, elapsed, steps - i)).await;

            let n = (i + 1) as f32;
            contact.touch_move(x + n * step_x, y + n * step_y)?;
            sync.wait_frames(1).await;
            trace!(step = i, pos = ?contact.pos(), "drag");
            yield GestureEvent::new(Phase::Move, contact.pos());
        }

        if contact.pos() != (tx, ty) {
            contact.touch_move(tx, ty)?;
            sync.wait_frames(1).await;
            yield GestureEvent::new(Phase::Move, contact.pos());
        }

        contact.touch_up()?;
        sync.wait_frames(1).await;
        yield GestureEvent::new(Phase::Up, contact.pos());
    })
}
