//! Global animation registry
//!
//! Animations keep ticking every frame until they finish or are cancelled.
//! A session cancels everything on exit so no timer outlives it.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

struct AnimationState {
    name: String,
    active: AtomicBool,
    ticks: AtomicU64,
    duration_frames: Option<u64>,
}

/// Handle to a registered animation
#[derive(Clone)]
pub struct Animation {
    state: Arc<AnimationState>,
}

impl Animation {
    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn is_active(&self) -> bool {
        self.state.active.load(Ordering::Acquire)
    }

    /// Frames advanced so far
    pub fn ticks(&self) -> u64 {
        self.state.ticks.load(Ordering::Acquire)
    }
}

#[derive(Default)]
pub struct AnimationRegistry {
    live: Mutex<Vec<Arc<AnimationState>>>,
}

impl AnimationRegistry {
    /// Register an animation; `duration_frames == None` repeats forever
    pub fn start(&self, name: impl Into<String>, duration_frames: Option<u64>) -> Animation {
        let state = Arc::new(AnimationState {
            name: name.into(),
            active: AtomicBool::new(true),
            ticks: AtomicU64::new(0),
            duration_frames,
        });
        self.live.lock().push(state.clone());
        Animation { state }
    }

    /// Advance every live animation by one frame, dropping finished ones
    pub fn advance(&self) {
        self.live.lock().retain(|state| {
            let ticks = state.ticks.fetch_add(1, Ordering::AcqRel) + 1;
            let finished = state.duration_frames.is_some_and(|d| ticks >= d);
            if finished {
                state.active.store(false, Ordering::Release);
            }
            !finished
        });
    }

    /// Stop and unregister everything, returning the count
    pub fn cancel_all(&self) -> usize {
        let cancelled = std::mem::take(&mut *self.live.lock());
        for state in &cancelled {
            state.active.store(false, Ordering::Release);
        }
        cancelled.len()
    }

    pub fn len(&self) -> usize {
        self.live.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_animation_finishes() {
        let registry = AnimationRegistry::default();
        let fade = registry.start("fade", Some(2));
        registry.advance();
        assert!(fade.is_active());
        registry.advance();
        assert!(!fade.is_active());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_cancel_all() {
        let registry = AnimationRegistry::default();
        let spin = registry.start("spin", None);
        registry.start("pulse", None);
        for _ in 0..10 {
            registry.advance();
        }
        assert_eq!(spin.ticks(), 10);
        assert_eq!(registry.cancel_all(), 2);
        assert!(!spin.is_active());
        assert_eq!(registry.cancel_all(), 0);
    }
}
