//! Resize notifications, scoped to the sessions that asked for them.
//!
//! A session holds a [`ResizeSubscription`] only while it is active and
//! fit-text sizing is on. Dropping the subscription unsubscribes, so a
//! disabled or dropped session never hears about another resize.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;
use uuid::Uuid;

pub type SessionId = Uuid;

#[derive(Debug, Clone, Default)]
pub struct ResizeHub {
    subscribers: Arc<Mutex<Vec<SessionId>>>,
}

impl ResizeHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, id: SessionId) -> ResizeSubscription {
        let mut subs = self.lock();
        if !subs.contains(&id) {
            subs.push(id);
        }
        debug!(session_id = %id, subscribers = subs.len(), "resize: subscribed");
        ResizeSubscription {
            hub: self.clone(),
            id,
        }
    }

    /// A payload-free "the container changed size" signal. Returns the
    /// sessions to recompute, in subscription order.
    pub fn notify(&self) -> Vec<SessionId> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn unsubscribe(&self, id: SessionId) {
        let mut subs = self.lock();
        subs.retain(|s| *s != id);
        debug!(session_id = %id, subscribers = subs.len(), "resize: unsubscribed");
    }

    fn lock(&self) -> MutexGuard<'_, Vec<SessionId>> {
        // the list stays consistent even if a holder panicked
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Live subscription; unsubscribes on drop.
#[derive(Debug)]
pub struct ResizeSubscription {
    hub: ResizeHub,
    id: SessionId,
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.id);
    }
}
