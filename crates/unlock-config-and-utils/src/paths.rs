//! File system paths for the unlock tool.

use crate::{CoreError, CoreResult};
use std::path::PathBuf;

/// Directory name under the platform config directory.
const APP_DIR_NAME: &str = "miunlocktool";
/// Persisted session record filename.
const SESSION_FILE_NAME: &str = "miunlockdata.json";
/// Structured log filename under the logs directory.
const LOG_FILE_NAME: &str = "miunlock.jsonl";

/// Manages file system paths for the tool.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directory (e.g. ~/.config/miunlocktool)
    base_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance rooted at the platform config directory.
    pub fn new() -> CoreResult<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CoreError::Path("Could not determine config directory".to_string()))?;

        Ok(Self {
            base_dir: config_dir.join(APP_DIR_NAME),
        })
    }

    /// Create a new Paths instance with a custom base directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Config file path (<base>/config.json).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Persisted session record (<base>/miunlockdata.json).
    pub fn session_file(&self) -> PathBuf {
        self.base_dir.join(SESSION_FILE_NAME)
    }

    /// Directory holding the short-lived staging artifact.
    pub fn staging_dir(&self) -> PathBuf {
        self.base_dir.clone()
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Structured log file (<base>/logs/miunlock.jsonl).
    pub fn log_file(&self) -> PathBuf {
        self.logs_dir().join(LOG_FILE_NAME)
    }

    /// Ensure all required directories exist.
    pub fn ensure_dirs(&self) -> CoreResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_paths_with_base_dir() {
        let base = PathBuf::from("/tmp/test-miunlock");
        let paths = Paths::with_base_dir(base.clone());

        assert_eq!(paths.base_dir(), &base);
        assert_eq!(paths.config_file(), base.join("config.json"));
        assert_eq!(paths.session_file(), base.join("miunlockdata.json"));
        assert_eq!(paths.staging_dir(), base);
        assert_eq!(paths.logs_dir(), base.join("logs"));
        assert_eq!(paths.log_file(), base.join("logs/miunlock.jsonl"));
    }

    #[test]
    fn test_paths_default_lives_under_config_dir() {
        if let Some(config_dir) = dirs::config_dir() {
            let paths = Paths::new().unwrap();
            assert_eq!(paths.base_dir(), &config_dir.join("miunlocktool"));
        }
    }

    #[test]
    fn test_ensure_dirs_creates_directories() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("miunlocktool");
        let paths = Paths::with_base_dir(base.clone());

        assert!(!base.exists());

        paths.ensure_dirs().unwrap();
        paths.ensure_dirs().unwrap();

        assert!(base.is_dir());
        assert!(paths.logs_dir().is_dir());
        assert!(paths.log_file().starts_with(paths.logs_dir()));
    }
}
