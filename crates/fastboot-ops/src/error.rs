use std::path::PathBuf;
use thiserror::Error;

/// Error taxonomy for device-control orchestration.
#[derive(Debug, Error)]
pub enum FastbootError {
    #[error("device-control executable not found: {executable}")]
    NotInstalled { executable: String },

    #[error("failed to run `{command}`: {message}")]
    Spawn { command: String, message: String },

    #[error("unlock credential is not valid hex: {0}")]
    Decode(#[from] hex::FromHexError),

    #[error("failed to write staging artifact {}: {source}", path.display())]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("device rejected the staged credential: {output}")]
    StageRejected { output: String },

    #[error("unlock command failed (exit code {exit_code:?}): {output}")]
    UnlockRejected {
        exit_code: Option<i32>,
        output: String,
    },
}

impl FastbootError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotInstalled { .. } => "fastboot_not_installed",
            Self::Spawn { .. } => "fastboot_spawn_failed",
            Self::Decode(_) => "credential_decode",
            Self::Staging { .. } => "staging_write_failed",
            Self::StageRejected { .. } => "stage_rejected",
            Self::UnlockRejected { .. } => "unlock_rejected",
        }
    }

    /// True when the device or the executable failed rather than our input.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::NotInstalled { .. }
                | Self::Spawn { .. }
                | Self::StageRejected { .. }
                | Self::UnlockRejected { .. }
        )
    }
}

pub type FastbootResult<T> = Result<T, FastbootError>;
