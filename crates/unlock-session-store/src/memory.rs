//! In-memory backend for scripted runs and tests.

use crate::{SessionRecord, SessionStore, StoreError, StoreResult};
use std::sync::Mutex;

/// Keeps the record in memory and remembers every save.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    current: Mutex<SessionRecord>,
    history: Mutex<Vec<SessionRecord>>,
    fail_saves: bool,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing record.
    pub fn with_record(record: SessionRecord) -> Self {
        Self {
            current: Mutex::new(record),
            ..Self::default()
        }
    }

    /// A store whose saves always fail.
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    /// Every record passed to `save`, oldest first.
    pub fn saves(&self) -> Vec<SessionRecord> {
        lock(&self.history).clone()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> SessionRecord {
        lock(&self.current).clone()
    }

    fn save(&self, record: &SessionRecord) -> StoreResult<()> {
        if self.fail_saves {
            return Err(StoreError::Unavailable("saves disabled".to_string()));
        }
        *lock(&self.current) = record.clone();
        lock(&self.history).push(record.clone());
        Ok(())
    }

    fn clear(&self) -> StoreResult<bool> {
        let mut current = lock(&self.current);
        let had_state = !current.is_empty();
        *current = SessionRecord::default();
        Ok(had_state)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
