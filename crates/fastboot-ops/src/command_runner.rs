use crate::{FastbootError, FastbootResult};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

#[cfg(windows)]
const FASTBOOT_BINARY: &str = "fastboot.exe";
#[cfg(not(windows))]
const FASTBOOT_BINARY: &str = "fastboot";

/// Raw output of one device-control invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
    /// stdout followed by stderr. fastboot reports most values on stderr.
    pub output: String,
}

impl CommandOutput {
    pub fn new(exit_code: Option<i32>, output: impl Into<String>) -> Self {
        Self {
            exit_code,
            output: output.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Seam between the workflow and the device-control executable.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the executable with `args` and capture its combined output.
    async fn run(&self, args: &[&str]) -> FastbootResult<CommandOutput>;
}

/// Runs a real device-control executable as a subprocess.
#[derive(Debug, Clone)]
pub struct FastbootRunner {
    executable: String,
}

impl FastbootRunner {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }
}

#[async_trait]
impl CommandRunner for FastbootRunner {
    async fn run(&self, args: &[&str]) -> FastbootResult<CommandOutput> {
        let command_repr = format!("{} {}", self.executable, args.join(" "));
        debug!(command = %command_repr, "Running device-control command");

        let output = Command::new(&self.executable)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|err| {
                if err.kind() == std::io::ErrorKind::NotFound {
                    FastbootError::NotInstalled {
                        executable: self.executable.clone(),
                    }
                } else {
                    FastbootError::Spawn {
                        command: command_repr.clone(),
                        message: err.to_string(),
                    }
                }
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        let exit_code = output.status.code();
        debug!(command = %command_repr, exit_code = ?exit_code, "Device-control command finished");

        Ok(CommandOutput::new(exit_code, combined))
    }
}

/// Pick the device-control executable to invoke.
///
/// Order: explicit path, `FASTBOOT_PATH`, a `platform-tools` directory in the
/// working directory or next to the running binary, well-known install
/// locations, then the bare name for a PATH lookup at spawn time.
pub fn resolve_fastboot_executable(explicit: Option<&str>) -> String {
    if let Some(path) = explicit.map(str::trim).filter(|p| !p.is_empty()) {
        return path.to_string();
    }

    if let Ok(path) = std::env::var("FASTBOOT_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut bundled = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        bundled.push(cwd.join("platform-tools").join(FASTBOOT_BINARY));
    }
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        bundled.push(exe_dir.join("platform-tools").join(FASTBOOT_BINARY));
    }
    if let Some(found) = bundled.iter().find(|p| p.is_file()) {
        return found.to_string_lossy().into_owned();
    }

    for candidate in [
        "/opt/homebrew/bin/fastboot",
        "/usr/local/bin/fastboot",
        "/usr/bin/fastboot",
    ] {
        if Path::new(candidate).is_file() {
            return candidate.to_string();
        }
    }

    FASTBOOT_BINARY.to_string()
}
