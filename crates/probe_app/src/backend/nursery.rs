//! Structured concurrency backend

use std::future::Future;
use std::pin::{pin, Pin};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use async_io::Timer;
use futures::future::{self, BoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use parking_lot::Mutex;
use probe_platform::SleepFn;
use tracing::debug;

use super::AsyncBackend;
use crate::config::BackendKind;
use crate::error::Result;

/// Completes on its second poll
struct YieldNow(bool);

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            return Poll::Ready(());
        }
        self.0 = true;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

async fn timer_sleep(duration: Duration) {
    if duration.is_zero() {
        YieldNow(false).await;
    } else {
        Timer::after(duration).await;
    }
}

/// Runs the application as a child of a nursery owned by the session
///
/// Children make progress only while the session suspends in
/// [`AsyncBackend::sleep`]; a panicking child unwinds into the session.
/// Shutting down closes the nursery and drops every child.
#[derive(Default)]
pub struct NurseryBackend {
    children: Mutex<FuturesUnordered<BoxFuture<'static, ()>>>,
}

impl NurseryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of children still running
    pub fn pending(&self) -> usize {
        self.children.lock().len()
    }

    fn poll_children(&self, cx: &mut Context<'_>) -> Poll<()> {
        let mut children = self.children.lock();
        loop {
            match children.poll_next_unpin(cx) {
                Poll::Ready(Some(())) => debug!("nursery child finished"),
                // the parent's timer decides when the sleep ends
                Poll::Ready(None) | Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl AsyncBackend for NurseryBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::AsyncIo
    }

    async fn sleep(&self, duration: Duration) {
        let timer = pin!(timer_sleep(duration));
        let children = pin!(future::poll_fn(|cx| self.poll_children(cx)));
        future::select(timer, children).await;
    }

    fn sleeper(&self) -> SleepFn {
        Arc::new(|duration| timer_sleep(duration).boxed())
    }

    fn spawn_app(&self, task: BoxFuture<'static, ()>) -> Result<()> {
        self.children.lock().push(task);
        Ok(())
    }

    fn cancel_app(&self) -> bool {
        let mut children = self.children.lock();
        let pending = !children.is_empty();
        children.clear();
        pending
    }

    async fn shutdown(&self) {
        let dropped = {
            let mut children = self.children.lock();
            let n = children.len();
            children.clear();
            n
        };
        if dropped > 0 {
            debug!(children = dropped, "nursery closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[test]
    fn test_children_progress_while_parent_sleeps() {
        let backend = NurseryBackend::new();
        let ticks = Arc::new(AtomicU32::new(0));
        let counter = ticks.clone();
        let sleep = backend.sleeper();
        backend
            .spawn_app(
                async move {
                    for _ in 0..3 {
                        counter.fetch_add(1, Ordering::SeqCst);
                        sleep(Duration::ZERO).await;
                    }
                }
                .boxed(),
            )
            .unwrap();

        async_io::block_on(async {
            let mut rounds = 0;
            while backend.pending() > 0 && rounds < 100 {
                backend.sleep(Duration::from_millis(1)).await;
                rounds += 1;
            }
        });
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
        assert_eq!(backend.pending(), 0);
    }

    #[test]
    fn test_shutdown_drops_children() {
        let backend = NurseryBackend::new();
        backend
            .spawn_app(future::pending::<()>().boxed())
            .unwrap();
        async_io::block_on(backend.sleep(Duration::ZERO));
        assert_eq!(backend.pending(), 1);

        async_io::block_on(backend.shutdown());
        assert_eq!(backend.pending(), 0);
        assert!(!backend.cancel_app());
    }

    #[test]
    #[should_panic(expected = "child failed")]
    fn test_child_panic_propagates() {
        let backend = NurseryBackend::new();
        backend
            .spawn_app(async { panic!("child failed") }.boxed())
            .unwrap();
        async_io::block_on(backend.sleep(Duration::from_millis(1)));
    }
}
