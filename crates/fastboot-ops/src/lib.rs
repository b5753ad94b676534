//! # fastboot-ops
//!
//! Typed orchestration of the device-control executable.
//!
//! This crate owns process execution, line-oriented output parsing and
//! error normalization. Everything above it sees typed [`DeviceFacts`]
//! and [`ExecutionReport`] values, never raw subprocess text.

mod command_runner;
mod error;
mod executor;
mod parse;
mod probe;
pub mod testing;
mod types;

pub use command_runner::{
    resolve_fastboot_executable, CommandOutput, CommandRunner, FastbootRunner,
};
pub use error::{FastbootError, FastbootResult};
pub use executor::{decode_credential, UnlockExecutor, STAGING_FILE_NAME};
pub use parse::{parse_variable, DETECTED_SENTINEL};
pub use probe::query_device;
pub use types::{DeviceFacts, ExecutionReport, LockState, SocFamily};
