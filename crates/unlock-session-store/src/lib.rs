//! Durable session record for the unlock workflow.
//!
//! The store is the only owner of on-disk session state. Loading never
//! fails: a missing, unreadable or corrupt file yields an empty record.
//! Saving is best-effort and reports failures to the caller, which decides
//! whether to warn or abort.

mod file;
mod memory;
mod record;
mod traits;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;
pub use record::SessionRecord;
pub use traits::SessionStore;

use thiserror::Error;

/// Error type for store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// IO error while writing or deleting the record
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding error
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Backend refused the write (used by in-memory test stores)
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "store_io",
            Self::Encoding(_) => "store_encoding",
            Self::Unavailable(_) => "store_unavailable",
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
