//! Drag along an explicit polyline

use std::time::Duration;

use async_stream::try_stream;
use probe_platform::WidgetRef;
use tracing::trace;

use crate::error::InputError;
use crate::event::{GestureEvent, Phase};
use crate::gestures::GestureStream;
use crate::pacing::{step_budget, FrameSync};
use crate::touch::TouchContact;

/// Options for [`touch_drag_path`]
#[derive(Clone)]
pub struct DragPath {
    /// Press at the first point, move through the rest
    pub path: Vec<(f32, f32)>,
    /// Interpret the points in this widget's local coordinates
    pub axis_widget: Option<WidgetRef>,
    pub long_press: Duration,
    pub duration: Duration,
}

impl DragPath {
    pub fn new(path: impl IntoIterator<Item = (f32, f32)>) -> Self {
        Self {
            path: path.into_iter().collect(),
            axis_widget: None,
            long_press: Duration::ZERO,
            duration: Duration::from_millis(200),
        }
    }

    pub fn axis_widget(mut self, widget: WidgetRef) -> Self {
        self.axis_widget = Some(widget);
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

    fn surface_points(&self) -> Vec<(f32, f32)> {
        match &self.axis_widget {
            Some(widget) => self
                .path
                .iter()
                .map(|&(x, y)| widget.to_window(x, y, false))
                .collect(),
            None => self.path.clone(),
        }
    }
}

impl std::fmt::Debug for DragPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragPath")
            .field("path", &self.path)
            .field("axis_widget", &self.axis_widget.as_ref().map(probe_platform::describe_widget))
            .field("duration", &self.duration)
            .finish()
    }
}

/// Press at the first point, move through each following point, release at
/// the last one
pub fn touch_drag_path<S: FrameSync>(sync: &S, options: DragPath) -> GestureStream<'_> {
    Box::pin(try_stream! {
        let points = options.surface_points();
        let (&(x, y), rest) = points.split_first().ok_or(InputError::EmptyPath)?;
        let mut contact = TouchContact::new(sync.window(), x, y);

        contact.touch_down()?;
        sync.wait_frames(1).await;
        if !options.long_press.is_zero() {
            sync.sleep(options.long_press).await;
        }
        yield GestureEvent::new(Phase::Down, contact.pos());

        let start = sync.now();
        let n = rest.len() as u32;
        for (i, &(px, py)) in rest.iter().enumerate() {
            let elapsed = sync.now().duration_since(start);
            sync.sleep(step_budget(options.duration, elapsed, n - i as u32)).await;

            contact.touch_move(px, py)?;
            sync.wait_frames(1).await;
            trace!(step = i, pos = ?contact.pos(), "path");
            yield GestureEvent::new(Phase::Move, contact.pos());
        }

        contact.touch_up()?;
        sync.wait_frames(1).await;
        yield GestureEvent::new(Phase::Up, contact.pos());
    })
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;
    use probe_platform_headless::HeadlessWidget;

    use super::*;
    use crate::testing::{close, VirtualFrames};

    #[test]
    fn test_path_events() {
        let frames = VirtualFrames::new();
        let events: Vec<GestureEvent> = pollster::block_on(
            touch_drag_path(&frames, DragPath::new([(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]))
                .collect::<Vec<_>>(),
        )
        .into_iter()
        .map(Result::unwrap)
        .collect();

        assert_eq!(
            events,
            vec![
                GestureEvent::new(Phase::Down, (0.0, 0.0)),
                GestureEvent::new(Phase::Move, (10.0, 0.0)),
                GestureEvent::new(Phase::Move, (10.0, 10.0)),
                GestureEvent::new(Phase::Up, (10.0, 10.0)),
            ]
        );
        // first move gets half the budget
        assert!(close(frames.sleeps()[1], Duration::from_millis(100)));
    }

    #[test]
    fn test_path_in_widget_coordinates() {
        let frames = VirtualFrames::new();
        let panel = HeadlessWidget::new("Panel")
            .with_geometry(50.0, 60.0, 100.0, 100.0)
            .with_local_origin();
        frames.surface().attach(panel.clone());

        let events: Vec<GestureEvent> = pollster::block_on(
            touch_drag_path(
                &frames,
                DragPath::new([(0.0, 0.0), (10.0, 10.0)]).axis_widget(panel.as_widget()),
            )
            .collect::<Vec<_>>(),
        )
        .into_iter()
        .map(Result::unwrap)
        .collect();

        assert_eq!(events[0].pos, (50.0, 60.0));
        assert_eq!(events.last().unwrap().pos, (60.0, 70.0));
    }

    #[test]
    fn test_single_point_path_is_a_tap() {
        let frames = VirtualFrames::new();
        let events = pollster::block_on(
            touch_drag_path(&frames, DragPath::new([(3.0, 4.0)])).collect::<Vec<_>>(),
        );
        let phases: Vec<Phase> = events.into_iter().map(|e| e.unwrap().phase).collect();
        assert_eq!(phases, vec![Phase::Down, Phase::Up]);
    }

    #[test]
    fn test_empty_path() {
        let frames = VirtualFrames::new();
        let events = pollster::block_on(
            touch_drag_path(&frames, DragPath::new(Vec::new())).collect::<Vec<_>>(),
        );
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Err(InputError::EmptyPath)));
    }
}
