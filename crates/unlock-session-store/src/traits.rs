//! Storage trait definitions.

use crate::{SessionRecord, StoreResult};

/// Trait for session record backends.
///
/// Single-writer: a store is never shared across processes, so no locking
/// is performed.
pub trait SessionStore: Send + Sync {
    /// Load the persisted record. Absent or corrupt state yields `SessionRecord::default()`.
    fn load(&self) -> SessionRecord;

    /// Persist the record, replacing any previous one.
    fn save(&self, record: &SessionRecord) -> StoreResult<()>;

    /// Remove the persisted record. Returns true if something was removed.
    fn clear(&self) -> StoreResult<bool>;
}
