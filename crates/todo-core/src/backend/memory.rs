//! In-Memory Backend
//!
//! Process-local stand-in for the managed data API. Ids are server-assigned
//! (uuid v4), and after every successful mutation each live subscriber
//! receives the full current collection. Failures can be injected so callers'
//! degradation paths can be exercised.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use futures::channel::mpsc::{self, UnboundedSender};

use super::{ListResult, TodoBackend, TodoChanges};
use crate::domain::{BackendError, BackendResult, NewTodo, Todo, TodoId};
use crate::subscription::{SnapshotEvent, Subscription};

#[derive(Default)]
struct Inner {
    todos: Mutex<Vec<Todo>>,
    subscribers: Mutex<BTreeMap<u64, UnboundedSender<SnapshotEvent>>>,
    next_subscriber: AtomicU64,
    list_calls: AtomicUsize,
    cancelled_subscriptions: AtomicUsize,
    fail_create: AtomicBool,
    fail_delete: AtomicBool,
    fail_list: AtomicBool,
    partial_list: AtomicBool,
}

/// Cheaply clonable handle; clones share the same collection
#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<Inner>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with existing records (ids assigned here)
    pub fn with_todos<'a>(contents: impl IntoIterator<Item = &'a str>) -> Self {
        let backend = Self::new();
        {
            let mut todos = lock(&backend.inner.todos);
            for content in contents {
                todos.push(Todo::new(next_id(), content, 0));
            }
        }
        backend
    }

    pub fn snapshot(&self) -> Vec<Todo> {
        lock(&self.inner.todos).clone()
    }

    pub fn list_calls(&self) -> usize {
        self.inner.list_calls.load(Ordering::SeqCst)
    }

    pub fn active_subscriptions(&self) -> usize {
        lock(&self.inner.subscribers).len()
    }

    pub fn cancelled_subscriptions(&self) -> usize {
        self.inner.cancelled_subscriptions.load(Ordering::SeqCst)
    }

    pub fn fail_creates(&self, fail: bool) {
        self.inner.fail_create.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.inner.fail_delete.store(fail, Ordering::SeqCst);
    }

    pub fn fail_lists(&self, fail: bool) {
        self.inner.fail_list.store(fail, Ordering::SeqCst);
    }

    /// Make list calls return their data together with an error
    pub fn partial_lists(&self, partial: bool) {
        self.inner.partial_list.store(partial, Ordering::SeqCst);
    }

    /// Push a transport error to every live subscriber
    pub fn push_stream_error(&self, message: &str) {
        self.send_all(|| Err(BackendError::Subscription(message.to_string())));
    }

    /// Re-send the current collection to every live subscriber
    pub fn broadcast(&self) {
        let snapshot = self.snapshot();
        self.send_all(|| Ok(snapshot.clone()));
    }

    fn send_all(&self, event: impl Fn() -> SnapshotEvent) {
        let mut subscribers = lock(&self.inner.subscribers);
        subscribers.retain(|_, tx| tx.unbounded_send(event()).is_ok());
    }
}

fn next_id() -> TodoId {
    TodoId::assigned(uuid::Uuid::new_v4().to_string())
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl TodoBackend for MemoryBackend {
    async fn create(&self, todo: NewTodo) -> BackendResult<Todo> {
        if self.inner.fail_create.load(Ordering::SeqCst) {
            return Err(BackendError::Network("create failed".to_string()));
        }
        let created = Todo::new(next_id(), todo.content, todo.priority);
        lock(&self.inner.todos).push(created.clone());
        log::debug!("memory backend: created {}", created.id);
        self.broadcast();
        Ok(created)
    }

    async fn delete(&self, id: &TodoId) -> BackendResult<()> {
        if self.inner.fail_delete.load(Ordering::SeqCst) {
            return Err(BackendError::Network("delete failed".to_string()));
        }
        {
            let mut todos = lock(&self.inner.todos);
            let before = todos.len();
            todos.retain(|t| &t.id != id);
            if todos.len() == before {
                return Err(BackendError::NotFound(id.to_string()));
            }
        }
        self.broadcast();
        Ok(())
    }

    async fn list(&self) -> BackendResult<ListResult> {
        self.inner.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_list.load(Ordering::SeqCst) {
            return Err(BackendError::Network("list failed".to_string()));
        }
        let mut result = ListResult::ok(self.snapshot());
        if self.inner.partial_list.load(Ordering::SeqCst) {
            result
                .errors
                .push(BackendError::rejected("some records could not be read"));
        }
        Ok(result)
    }
}

impl TodoChanges for MemoryBackend {
    fn subscribe_to_changes(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded();
        // The first event is the current collection
        let _ = tx.unbounded_send(Ok(self.snapshot()));

        let key = self.inner.next_subscriber.fetch_add(1, Ordering::SeqCst);
        lock(&self.inner.subscribers).insert(key, tx);

        let inner = Arc::clone(&self.inner);
        Subscription::new(rx, move || {
            lock(&inner.subscribers).remove(&key);
            inner.cancelled_subscriptions.fetch_add(1, Ordering::SeqCst);
        })
    }
}
