//! JSON file backend.

use crate::{SessionRecord, SessionStore, StoreResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Stores the session record as pretty-printed JSON in a single file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> SessionRecord {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No session record found");
                return SessionRecord::default();
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Session record unreadable, starting fresh");
                return SessionRecord::default();
            }
        };

        match serde_json::from_str::<SessionRecord>(&content) {
            Ok(record) => {
                if !record.is_consistent() {
                    warn!("Session record has a user id without a confirmed login, dropping it");
                }
                record.normalized()
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Session record corrupt, starting fresh");
                SessionRecord::default()
            }
        }
    }

    fn save(&self, record: &SessionRecord) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(record)?;
        fs::write(&self.path, content)?;
        restrict_permissions(&self.path)?;

        debug!(path = %self.path.display(), "Session record saved");
        Ok(())
    }

    fn clear(&self) -> StoreResult<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

/// The record holds the credential in cleartext; keep it owner-only.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
