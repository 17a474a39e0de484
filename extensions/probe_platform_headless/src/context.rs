//! Execution context stack
//!
//! The toolkit keeps a stack of pushed contexts; the top entry owns the
//! clock every global lookup resolves to.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use probe_platform::{ExecutionContext, PlatformError, Result};
use tracing::trace;

use crate::clock::HeadlessClock;

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

struct Entry {
    id: u64,
    clock: Arc<HeadlessClock>,
}

#[derive(Default)]
pub(crate) struct ContextStack {
    entries: Mutex<Vec<Entry>>,
}

impl ContextStack {
    pub(crate) fn top_clock(&self) -> Option<Arc<HeadlessClock>> {
        self.entries.lock().last().map(|e| e.clock.clone())
    }

    pub(crate) fn depth(&self) -> usize {
        self.entries.lock().len()
    }
}

/// A context owning a fresh clock
pub struct HeadlessContext {
    id: u64,
    clock: Arc<HeadlessClock>,
    stack: Arc<ContextStack>,
    active: bool,
}

impl HeadlessContext {
    pub(crate) fn new(stack: Arc<ContextStack>) -> Self {
        Self {
            id: NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed),
            clock: Arc::new(HeadlessClock::default()),
            stack,
            active: false,
        }
    }

    pub fn clock(&self) -> &Arc<HeadlessClock> {
        &self.clock
    }
}

impl ExecutionContext for HeadlessContext {
    fn push(&mut self) -> Result<()> {
        if self.active {
            return Err(PlatformError::ContextMisuse(format!(
                "context {} is already pushed",
                self.id
            )));
        }
        self.stack.entries.lock().push(Entry {
            id: self.id,
            clock: self.clock.clone(),
        });
        self.active = true;
        trace!(id = self.id, "context pushed");
        Ok(())
    }

    fn pop(&mut self) -> Result<()> {
        if !self.active {
            return Err(PlatformError::ContextMisuse(format!(
                "context {} is not pushed",
                self.id
            )));
        }
        let mut entries = self.stack.entries.lock();
        match entries.last() {
            Some(top) if top.id == self.id => {
                entries.pop();
            }
            _ => {
                return Err(PlatformError::ContextMisuse(format!(
                    "context {} is not on top of the stack",
                    self.id
                )))
            }
        }
        self.active = false;
        trace!(id = self.id, "context popped");
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
