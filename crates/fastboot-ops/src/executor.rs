//! Stages a granted credential on the device and issues the unlock.

use crate::parse::parse_variable;
use crate::{CommandRunner, ExecutionReport, FastbootError, FastbootResult};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File name of the staged credential inside the staging directory.
pub const STAGING_FILE_NAME: &str = "encryptData";

/// Decode the hex-encoded credential returned by the unlock service.
pub fn decode_credential(credential_hex: &str) -> FastbootResult<Vec<u8>> {
    Ok(hex::decode(credential_hex)?)
}

/// Runs the stage and unlock commands against the device.
pub struct UnlockExecutor<'a> {
    runner: &'a dyn CommandRunner,
    staging_dir: PathBuf,
}

impl<'a> UnlockExecutor<'a> {
    pub fn new(runner: &'a dyn CommandRunner, staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            staging_dir: staging_dir.into(),
        }
    }

    pub fn staging_path(&self) -> PathBuf {
        self.staging_dir.join(STAGING_FILE_NAME)
    }

    /// Decode, stage and apply `credential_hex`.
    ///
    /// The staged artifact is removed on every exit path. A rejected stage
    /// never reaches the unlock command.
    pub async fn execute(&self, credential_hex: &str) -> FastbootResult<ExecutionReport> {
        let payload = decode_credential(credential_hex)?;
        let artifact = StagedArtifact::write(self.staging_path(), &payload)?;
        debug!(path = %artifact.path().display(), bytes = payload.len(), "Credential staged on disk");

        let serial = self.read_serial().await;
        if let Some(serial) = &serial {
            info!(serial = %serial, "Unlocking device");
        }

        let path_arg = artifact.path().to_string_lossy().into_owned();
        let stage = self.runner.run(&["stage", &path_arg]).await?;
        if !stage.success() {
            warn!(exit_code = ?stage.exit_code, "Device rejected the staged credential");
            return Err(FastbootError::StageRejected {
                output: stage.output,
            });
        }

        let unlock = self.runner.run(&["oem", "unlock"]).await;
        drop(artifact);
        let unlock = unlock?;

        if !unlock.success() {
            return Err(FastbootError::UnlockRejected {
                exit_code: unlock.exit_code,
                output: unlock.output,
            });
        }

        info!("Unlock command accepted");
        Ok(ExecutionReport {
            serial,
            output: unlock.output,
        })
    }

    async fn read_serial(&self) -> Option<String> {
        match self.runner.run(&["getvar", "serialno"]).await {
            Ok(output) if output.success() => parse_variable("serialno", &output.output),
            Ok(_) => None,
            Err(err) => {
                debug!(error = %err, "Serial number query could not run");
                None
            }
        }
    }
}

/// The credential file on disk. Deleted when dropped.
struct StagedArtifact {
    path: PathBuf,
}

impl StagedArtifact {
    fn write(path: PathBuf, payload: &[u8]) -> FastbootResult<Self> {
        if let Err(source) = write_owner_only(&path, payload) {
            let _ = fs::remove_file(&path);
            return Err(FastbootError::Staging { path, source });
        }
        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedArtifact {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Staged credential removed"),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Failed to remove staged credential")
            }
        }
    }
}

fn write_owner_only(path: &Path, payload: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(payload)?;
    file.sync_all()
}
