//! CLI command implementations.

mod device;
mod session;
mod unlock;

pub use device::device;
pub use session::{forget, status};
pub use unlock::unlock;

use anyhow::Result;
use fastboot_ops::{resolve_fastboot_executable, FastbootRunner};
use unlock_config_and_utils::{Config, Paths};
use unlock_session_store::FileSessionStore;

/// Resolved configuration shared by every command.
pub struct AppContext {
    pub paths: Paths,
    pub config: Config,
    fastboot_override: Option<String>,
}

impl AppContext {
    pub fn new(paths: Paths, config: Config, fastboot_override: Option<String>) -> Self {
        Self {
            paths,
            config,
            fastboot_override,
        }
    }

    pub fn session_store(&self) -> FileSessionStore {
        FileSessionStore::new(self.paths.session_file())
    }

    pub fn fastboot_runner(&self) -> FastbootRunner {
        let explicit = self
            .fastboot_override
            .as_deref()
            .or(self.config.fastboot_path.as_deref());
        FastbootRunner::new(resolve_fastboot_executable(explicit))
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        self.paths.ensure_dirs()?;
        Ok(())
    }
}
