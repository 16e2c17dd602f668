//! Full-Snapshot Subscriptions
//!
//! A live change subscription delivers the entire current collection on every
//! event. The handle that tears it down runs its teardown at most once, and
//! once cancelled the event stream ends even if the transport keeps pushing.

use futures::stream::{AbortHandle, Abortable, LocalBoxStream};
use futures::{Stream, StreamExt};

use crate::domain::{BackendError, Todo};

/// One delivery from the change stream
pub type SnapshotEvent = Result<Vec<Todo>, BackendError>;

/// Stream half of a subscription
pub type SnapshotStream = LocalBoxStream<'static, SnapshotEvent>;

/// Teardown half of a subscription.
///
/// Dropping a handle that was never cancelled cancels it.
pub struct CancelHandle {
    abort: AbortHandle,
    teardown: Option<Box<dyn FnOnce()>>,
}

impl CancelHandle {
    /// Cancel the subscription. Returns `true` only for the call that
    /// actually performed the teardown.
    pub fn cancel(&mut self) -> bool {
        match self.teardown.take() {
            Some(teardown) => {
                self.abort.abort();
                teardown();
                true
            }
            None => false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.teardown.is_none()
    }
}

impl Drop for CancelHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelHandle")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// A live change subscription
pub struct Subscription {
    events: SnapshotStream,
    handle: CancelHandle,
}

impl Subscription {
    /// Wrap a transport stream and the function that closes the transport.
    pub fn new<S, F>(events: S, teardown: F) -> Self
    where
        S: Stream<Item = SnapshotEvent> + 'static,
        F: FnOnce() + 'static,
    {
        let (abort, registration) = AbortHandle::new_pair();
        Self {
            events: Abortable::new(events, registration).boxed_local(),
            handle: CancelHandle {
                abort,
                teardown: Some(Box::new(teardown)),
            },
        }
    }

    /// A subscription that could not be opened: yields the error once, then ends.
    pub fn failed(error: BackendError) -> Self {
        Self::new(futures::stream::iter([SnapshotEvent::Err(error)]), || {})
    }

    /// Next event, or `None` once cancelled or the transport closed.
    pub async fn next(&mut self) -> Option<SnapshotEvent> {
        self.events.next().await
    }

    pub fn cancel(&mut self) -> bool {
        self.handle.cancel()
    }

    pub fn is_cancelled(&self) -> bool {
        self.handle.is_cancelled()
    }

    /// Split so the stream can be driven by a task while the handle stays
    /// with the component that owns the subscription's lifetime.
    pub fn into_parts(self) -> (SnapshotStream, CancelHandle) {
        (self.events, self.handle)
    }
}

/// Holds at most one live subscription for a mounted list.
///
/// Attaching a new handle cancels the previous one; releasing cancels the
/// current one. Each handle is therefore cancelled exactly once.
#[derive(Debug, Default)]
pub struct SubscriptionSlot {
    current: Option<CancelHandle>,
}

impl SubscriptionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, handle: CancelHandle) {
        self.release();
        self.current = Some(handle);
    }

    /// Cancel the held subscription, if any. Returns whether one was cancelled.
    pub fn release(&mut self) -> bool {
        match self.current.take() {
            Some(mut handle) => handle.cancel(),
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.current.as_ref().is_some_and(|h| !h.is_cancelled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TodoId;
    use futures::channel::mpsc;
    use std::cell::Cell;
    use std::rc::Rc;

    fn snapshot(ids: &[&str]) -> Vec<Todo> {
        ids.iter()
            .map(|id| Todo::new(TodoId::assigned(*id), format!("todo {id}"), 0))
            .collect()
    }

    #[tokio::test]
    async fn test_cancel_runs_teardown_once() {
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let mut sub = Subscription::new(futures::stream::pending::<SnapshotEvent>(), move || {
            counter.set(counter.get() + 1)
        });

        assert!(sub.cancel());
        assert!(!sub.cancel());
        drop(sub);
        assert_eq!(count.get(), 1);
    }

    #[tokio::test]
    async fn test_drop_cancels_uncancelled_subscription() {
        let count = Rc::new(Cell::new(0));
        let counter = count.clone();
        let sub = Subscription::new(futures::stream::pending::<SnapshotEvent>(), move || {
            counter.set(counter.get() + 1)
        });
        drop(sub);
        assert_eq!(count.get(), 1);
    }

    #[tokio::test]
    async fn test_stream_ends_after_cancel_even_if_transport_pushes() {
        let (tx, rx) = mpsc::unbounded();
        let (mut events, mut handle) = Subscription::new(rx, || {}).into_parts();

        tx.unbounded_send(Ok(snapshot(&["1"]))).unwrap();
        assert_eq!(events.next().await.unwrap().unwrap().len(), 1);

        handle.cancel();
        let _ = tx.unbounded_send(Ok(snapshot(&["1", "2"])));
        assert!(events.next().await.is_none());
    }

    #[tokio::test]
    async fn test_failed_subscription_yields_error_then_ends() {
        let mut sub = Subscription::failed(BackendError::Subscription("offline".into()));
        assert!(matches!(sub.next().await, Some(Err(BackendError::Subscription(_)))));
        assert!(sub.next().await.is_none());
    }

    #[test]
    fn test_slot_attach_replaces_and_cancels_previous() {
        let count = Rc::new(Cell::new(0));
        let mut slot = SubscriptionSlot::new();

        for _ in 0..2 {
            let counter = count.clone();
            let (_, handle) =
                Subscription::new(futures::stream::pending::<SnapshotEvent>(), move || counter.set(counter.get() + 1))
                    .into_parts();
            slot.attach(handle);
        }
        assert_eq!(count.get(), 1);
        assert!(slot.is_active());

        assert!(slot.release());
        assert!(!slot.release());
        assert_eq!(count.get(), 2);
        assert!(!slot.is_active());
    }
}
