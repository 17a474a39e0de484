//! Press and release, optionally jittering in between

use std::time::Duration;

use async_stream::try_stream;
use rand::Rng;
use tracing::trace;

use crate::error::InputError;
use crate::event::{GestureEvent, Phase};
use crate::gestures::GestureStream;
use crate::pacing::FrameSync;
use crate::target::{read_coord, Target};
use crate::touch::TouchContact;

/// Random displacement applied while the contact is held
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Jitter {
    /// At most `dx`/`dy` away from the anchor on each axis
    Fixed(f32, f32),
    /// At most half the target widget's width/height
    WidgetExtent,
}

/// Options for [`touch_down_up`]
#[derive(Clone, Debug)]
pub struct TouchDownUp {
    pub target: Target,
    /// How long the contact is held
    pub duration: Duration,
    pub jitter: Option<Jitter>,
    /// Interval between jitter moves
    pub jitter_dt: Duration,
    /// Return to the anchor before releasing when jitter moved the contact
    pub end_on_pos: bool,
}

impl TouchDownUp {
    pub fn new(target: Target) -> Self {
        Self {
            target,
            duration: Duration::from_millis(200),
            jitter: None,
            jitter_dt: Duration::from_secs_f64(1.0 / 15.0),
            end_on_pos: false,
        }
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn jitter(mut self, jitter: Jitter) -> Self {
        self.jitter = Some(jitter);
        self
    }

    pub fn jitter_dt(mut self, jitter_dt: Duration) -> Self {
        self.jitter_dt = jitter_dt;
        self
    }

    pub fn end_on_pos(mut self, end_on_pos: bool) -> Self {
        self.end_on_pos = end_on_pos;
        self
    }

    fn jitter_extent(&self) -> Result<Option<(f32, f32)>, InputError> {
        match self.jitter {
            None => Ok(None),
            Some(Jitter::Fixed(dx, dy)) => Ok(Some((dx, dy))),
            Some(Jitter::WidgetExtent) => {
                let widget = self.target.widget_ref().ok_or_else(|| {
                    InputError::InvalidTarget("widget jitter needs a widget target".into())
                })?;
                let width = read_coord(widget, "width")?;
                let height = read_coord(widget, "height")?;
                Ok(Some((width / 2.0, height / 2.0)))
            }
        }
    }
}

/// Tap (or hold) a target
///
/// Emits `down`, then either `up` after `duration`, or a `move` every
/// `jitter_dt` until `duration` has elapsed since the press followed by
/// `up`.
pub fn touch_down_up<S: FrameSync>(sync: &S, options: TouchDownUp) -> GestureStream<'_> {
    Box::pin(try_stream! {
        let (x, y) = options.target.resolve()?;
        let jitter = options.jitter_extent()?;
        let mut contact = TouchContact::new(sync.window(), x, y);

        let start = sync.now();
        contact.touch_down()?;
        sync.wait_frames(1).await;
        yield GestureEvent::new(Phase::Down, contact.pos());

        match jitter {
            None => {
                sync.sleep(options.duration).await;
            }
            Some((dx, dy)) => {
                let mut moved = false;
                while sync.now().duration_since(start) < options.duration {
                    moved = true;
                    sync.sleep(options.jitter_dt).await;

                    let (jx, jy) = {
                        let mut rng = rand::thread_rng();
                        (rng.gen_range(-1.0f32..=1.0), rng.gen_range(-1.0f32..=1.0))
                    };
                    contact.touch_move(x + jx * dx, y + jy * dy)?;
                    sync.wait_frames(1).await;
                    trace!(pos = ?contact.pos(), "jitter");
                    yield GestureEvent::new(Phase::Move, contact.pos());
                }

                if options.end_on_pos && moved {
                    contact.touch_move(x, y)?;
                    sync.wait_frames(1).await;
                    yield GestureEvent::new(Phase::Move, contact.pos());
                }
            }
        }

        contact.touch_up()?;
        sync.wait_frames(1).await;
        yield GestureEvent::new(Phase::Up, contact.pos());
    })
}
