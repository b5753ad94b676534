//! Scripted [`CommandRunner`] for driving the probe and executor without a
//! device attached.

use crate::{CommandOutput, CommandRunner, FastbootError, FastbootResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Answers commands from a fixed script and records every invocation.
///
/// Unscripted commands exit with status 1 and no output.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    responses: HashMap<String, CommandOutput>,
    stage_response: Option<CommandOutput>,
    missing: bool,
    calls: Mutex<Vec<Vec<String>>>,
    staged: Mutex<Vec<StagedCopy>>,
}

#[derive(Debug, Clone)]
struct StagedCopy {
    payload: Vec<u8>,
    #[cfg_attr(not(unix), allow(dead_code))]
    mode: u32,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command fails as if the executable were not installed.
    pub fn missing_executable() -> Self {
        Self {
            missing: true,
            ..Self::default()
        }
    }

    pub fn respond(mut self, args: &[&str], exit_code: i32, output: &str) -> Self {
        self.responses
            .insert(args.join(" "), CommandOutput::new(Some(exit_code), output));
        self
    }

    /// Answer `stage <path>` for any path, capturing the staged file.
    pub fn respond_any_stage(mut self, exit_code: i32, output: &str) -> Self {
        self.stage_response = Some(CommandOutput::new(Some(exit_code), output));
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        lock(&self.calls).clone()
    }

    pub fn was_called(&self, args: &[&str]) -> bool {
        lock(&self.calls)
            .iter()
            .any(|call| call.iter().map(String::as_str).eq(args.iter().copied()))
    }

    /// Contents of each file passed to `stage`, read at call time.
    pub fn staged_payloads(&self) -> Vec<Vec<u8>> {
        lock(&self.staged).iter().map(|s| s.payload.clone()).collect()
    }

    /// Permission bits of each file passed to `stage`.
    #[cfg(unix)]
    pub fn staged_modes(&self) -> Vec<u32> {
        lock(&self.staged).iter().map(|s| s.mode & 0o777).collect()
    }

    fn capture_stage(&self, path: &str) {
        let payload = std::fs::read(path).unwrap_or_default();
        #[cfg(unix)]
        let mode = {
            use std::os::unix::fs::PermissionsExt;
            std::fs::metadata(path)
                .map(|m| m.permissions().mode())
                .unwrap_or_default()
        };
        #[cfg(not(unix))]
        let mode = 0;
        lock(&self.staged).push(StagedCopy { payload, mode });
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, args: &[&str]) -> FastbootResult<CommandOutput> {
        lock(&self.calls).push(args.iter().map(|a| a.to_string()).collect());

        if self.missing {
            return Err(FastbootError::NotInstalled {
                executable: "fastboot".to_string(),
            });
        }

        if let ["stage", path] = args {
            self.capture_stage(path);
            if let Some(response) = &self.stage_response {
                return Ok(response.clone());
            }
        }

        Ok(self
            .responses
            .get(&args.join(" "))
            .cloned()
            .unwrap_or_else(|| CommandOutput::new(Some(1), "")))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
