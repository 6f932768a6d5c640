// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Handler<A> = Arc<dyn Fn(&A) + Send + Sync>;

/// Identifies one handler registered on an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Handlers<A> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Handler<A>)>,
}

/// A synchronous multicast delegate.
///
/// Cloning an `Event` yields another handle onto the same handler list.
/// [`Event::invoke`] snapshots the handlers and releases the lock before
/// calling them, so handlers are free to subscribe or unsubscribe.
pub struct Event<A> {
    inner: Arc<Mutex<Handlers<A>>>,
}

impl<A> Event<A> {
    /// Creates an event with no handlers.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Handlers {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Handlers<A>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a handler and returns its id.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&A) + Send + Sync + 'static,
    {
        let mut handlers = self.lock();
        let id = SubscriptionId(handlers.next_id);
        handlers.next_id += 1;
        handlers.entries.push((id, Arc::new(handler)));
        id
    }

    /// Registers a handler that is removed when the returned guard drops.
    #[must_use = "dropping the subscription immediately unsubscribes the handler"]
    pub fn subscribe_scoped<F>(&self, handler: F) -> Subscription
    where
        A: 'static,
        F: Fn(&A) + Send + Sync + 'static,
    {
        let id = self.subscribe(handler);
        let weak: Weak<Mutex<Handlers<A>>> = Arc::downgrade(&self.inner);
        Subscription {
            id,
            detach: Some(Box::new(move |id| {
                if let Some(inner) = weak.upgrade() {
                    let mut handlers = inner.lock().unwrap_or_else(PoisonError::into_inner);
                    handlers.entries.retain(|(entry, _)| *entry != id);
                }
            })),
        }
    }

    /// Removes a handler. Returns `false` if the id was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.lock();
        let before = handlers.entries.len();
        handlers.entries.retain(|(entry, _)| *entry != id);
        handlers.entries.len() != before
    }

    /// Calls every handler registered at the time of the call.
    pub fn invoke(&self, args: &A) {
        let snapshot: Vec<Handler<A>> = self
            .lock()
            .entries
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        for handler in snapshot {
            handler(args);
        }
    }

    /// Removes every handler.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    /// Returns `true` when no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Returns the number of registered handlers.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }
}

impl<A> Clone for Event<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A> Default for Event<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for Event<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("handlers", &self.len())
            .finish()
    }
}

/// RAII guard returned by [`Event::subscribe_scoped`].
///
/// Dropping it unsubscribes the handler. If the event has already been
/// dropped, nothing happens.
pub struct Subscription {
    id: SubscriptionId,
    detach: Option<Box<dyn FnOnce(SubscriptionId) + Send + Sync>>,
}

impl Subscription {
    /// The id of the guarded handler.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Keeps the handler registered for the lifetime of the event.
    pub fn forget(mut self) {
        self.detach = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach(self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
