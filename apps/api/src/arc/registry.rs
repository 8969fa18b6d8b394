//! In-memory registry of live arc sessions, one per text instance.
//!
//! The mutex is the host-side serialization point: only one call touches a
//! given session at a time. Layout passes are tiny and run under the lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};
use uuid::Uuid;

use crate::arc::session::Session;
use crate::errors::AppError;
use crate::layout::FontMeasurer;

/// A session plus the font it is measured with.
#[derive(Debug)]
pub struct ArcEntry {
    pub session: Session,
    pub font: FontMeasurer,
}

#[derive(Debug, Clone)]
pub struct SessionRegistry {
    entries: Arc<Mutex<HashMap<Uuid, ArcEntry>>>,
    max_sessions: usize,
}

impl SessionRegistry {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            max_sessions,
        }
    }

    pub fn insert(&self, entry: ArcEntry) -> Result<Uuid, AppError> {
        let mut entries = self.lock();
        if entries.len() >= self.max_sessions {
            return Err(AppError::CapacityExceeded(format!(
                "session limit of {} reached",
                self.max_sessions
            )));
        }
        let id = entry.session.id();
        entries.insert(id, entry);
        info!(session_id = %id, live = entries.len(), "registry: session stored");
        Ok(id)
    }

    /// Runs `f` on the entry for `id`, or on `None` if there is no such
    /// session.
    pub fn with_entry<R>(&self, id: Uuid, f: impl FnOnce(Option<&mut ArcEntry>) -> R) -> R {
        let mut entries = self.lock();
        f(entries.get_mut(&id))
    }

    /// Removes the session; its resize subscription goes with it.
    pub fn remove(&self, id: Uuid) -> Option<ArcEntry> {
        let removed = self.lock().remove(&id);
        if removed.is_some() {
            debug!(session_id = %id, "registry: session removed");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, ArcEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
