//! Application release tracking

use std::any::Any;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, error};

use crate::error::{Result, SessionError};

struct Tracked {
    label: String,
    app: Weak<dyn Any + Send + Sync>,
}

/// Weak references to launched applications
///
/// Cloning shares the record, so one tracker can collect applications over
/// many sessions and be checked once at the end of a run.
#[derive(Clone, Default)]
pub struct ReleaseTracker {
    tracked: Arc<Mutex<Vec<Tracked>>>,
}

impl ReleaseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `app` without keeping it alive
    pub fn track<A: Any + Send + Sync>(&self, label: impl Into<String>, app: &Arc<A>) {
        let app: Arc<dyn Any + Send + Sync> = app.clone();
        let label = label.into();
        debug!(app = %label, "tracking application release");
        self.tracked.lock().push(Tracked {
            label,
            app: Arc::downgrade(&app),
        });
    }

    /// Number of tracked applications still alive
    pub fn alive(&self) -> usize {
        self.tracked
            .lock()
            .iter()
            .filter(|t| t.app.strong_count() > 0)
            .count()
    }

    pub fn len(&self) -> usize {
        self.tracked.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.lock().is_empty()
    }

    /// Fail with the labels of every tracked application still referenced,
    /// forgetting the released ones
    pub fn check(&self) -> Result<()> {
        let mut tracked = self.tracked.lock();
        tracked.retain(|t| t.app.strong_count() > 0);
        if tracked.is_empty() {
            return Ok(());
        }
        let leaked: Vec<String> = tracked.iter().map(|t| t.label.clone()).collect();
        error!(?leaked, "applications were not released");
        Err(SessionError::Leaked(leaked))
    }
}

impl std::fmt::Debug for ReleaseTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReleaseTracker")
            .field("tracked", &self.len())
            .field("alive", &self.alive())
            .finish()
    }
}
